//! The CPU record and step loop.
//!
//! Grounded on the `Cpu` struct and `step(&mut self, memory_bus: &mut
//! MemoryBus) -> CpuResult<u16>` shape in
//! `examples/0hmX-GameboyEmulatorInRust/core/src/cpu.rs`: a plain,
//! non-generic struct whose handlers take the memory collaborator as an
//! explicit borrowed parameter rather than an owned field, keeping `Cpu` free
//! of a lifetime parameter. Memory and board are generalized from a single
//! concrete `MemoryBus` to `&mut dyn Memory`/`&mut dyn Board` trait objects,
//! since this interpreter doesn't own a single fixed memory map.

use crate::board::Board;
use crate::config::{IllegalInstructionPolicy, InterpreterConfig};
use crate::error::CpuResult;
use crate::memory::Memory;
use crate::psw::{ExecutionMode, Psw};
use crate::registers::RegisterFile;

pub mod arm;
pub mod thumb;

/// Signature shared by every decoded T/A-encoding handler.
pub type Handler = fn(&mut Cpu, &mut dyn Memory, &mut dyn Board, u32) -> CpuResult<()>;

/// The architectural state this interpreter advances one instruction at a
/// time.
pub struct Cpu {
    regs: RegisterFile,
    psw: Psw,
    cycles: u64,
    config: InterpreterConfig,
}

impl Cpu {
    pub fn new(config: InterpreterConfig) -> Self {
        Cpu {
            regs: RegisterFile::new(),
            psw: Psw::default(),
            cycles: 0,
            config,
        }
    }

    /// Clear registers, set PC/SP per reset vector, set execution-mode per
    /// reset configuration, zero the cycle counter.
    pub fn reset(&mut self, entry: u32, sp: u32, mode: ExecutionMode) {
        self.regs.reset();
        self.regs.set_pc(entry);
        self.regs.set_sp(sp);
        self.psw = Psw::new(mode);
        self.cycles = 0;
    }

    pub fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn psw(&self) -> &Psw {
        &self.psw
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn config(&self) -> InterpreterConfig {
        self.config
    }

    /// Force execution-mode to A or T and re-fetch PC-aligned.
    pub fn set_mode(&mut self, t_mode: bool) {
        let mode = if t_mode { ExecutionMode::T } else { ExecutionMode::A };
        self.psw.execution_mode = mode;
        let pc = self.regs.pc();
        match mode {
            ExecutionMode::T => self.regs.set_pc(pc & !0x1),
            ExecutionMode::A => self.regs.set_pc(pc & !0x3),
        }
    }

    /// Advance execution by exactly one instruction.
    pub fn step(&mut self, memory: &mut dyn Memory, board: &mut dyn Board) -> CpuResult<()> {
        match self.psw.execution_mode {
            ExecutionMode::T => self.step_thumb(memory, board),
            ExecutionMode::A => self.step_arm(memory, board),
        }
    }

    fn step_thumb(&mut self, memory: &mut dyn Memory, board: &mut dyn Board) -> CpuResult<()> {
        let width = ExecutionMode::T.encoding_width();
        let current_addr = self.regs.pc();
        self.regs.set_pc(current_addr.wrapping_add(width));
        let opcode = memory.fetch16(current_addr) as u32;
        let handler = thumb::TABLE[(opcode as usize >> 6) & 0x3FF];
        let result = handler(self, memory, board, opcode);
        self.cycles = self
            .cycles
            .wrapping_add(1 + memory.active_prefetch_cycles16() as u64);
        self.finish(result)
    }

    fn step_arm(&mut self, memory: &mut dyn Memory, board: &mut dyn Board) -> CpuResult<()> {
        let width = ExecutionMode::A.encoding_width();
        let current_addr = self.regs.pc();
        self.regs.set_pc(current_addr.wrapping_add(width));
        let opcode = memory.fetch32(current_addr);
        let index = (((opcode >> 16) & 0xFF0) | ((opcode >> 4) & 0x00F)) as usize;
        let handler = arm::TABLE[index & 0xFFF];
        let result = handler(self, memory, board, opcode);
        self.cycles = self
            .cycles
            .wrapping_add(1 + memory.active_prefetch_cycles32() as u64);
        self.finish(result)
    }

    fn finish(&mut self, result: CpuResult<()>) -> CpuResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(msg) => match self.config.illegal_instruction {
                IllegalInstructionPolicy::LogAndContinue => {
                    log::warn!("{}", msg);
                    Ok(())
                }
                IllegalInstructionPolicy::Halt => {
                    log::error!("{}", msg);
                    Err(msg)
                }
            },
        }
    }

    /// The PC value a handler sees when it reads PC directly, carrying the
    /// architecture's pipeline fiction: address-of-current-instruction +
    /// 2·encoding-width. Used by PC-relative loads, branch offset computation, and
    /// BL link-register setup.
    pub(crate) fn pipeline_pc(&self) -> u32 {
        self.regs.pc().wrapping_add(self.psw.execution_mode.encoding_width())
    }

    /// The T-encoding PC-write ritual: align to halfword.
    pub(crate) fn write_pc_thumb(&mut self, target: u32) {
        self.regs.set_pc(target & !0x1);
    }

    /// The A-encoding PC-write ritual: align to word.
    pub(crate) fn write_pc_arm(&mut self, target: u32) {
        self.regs.set_pc(target & !0x3);
    }

    pub(crate) fn set_execution_mode(&mut self, mode: ExecutionMode) {
        self.psw.execution_mode = mode;
    }

    pub(crate) fn regs_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    pub(crate) fn psw_mut(&mut self) -> &mut Psw {
        &mut self.psw
    }

    pub(crate) fn add_cycles(&mut self, extra: u64) {
        self.cycles = self.cycles.wrapping_add(extra);
    }
}

/// Installed in every T-table slot with no defined semantics.
pub(crate) fn illegal_thumb(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    Err(format!(
        "illegal T-encoding opcode {:#06X} at PC {:#010X}",
        opcode,
        cpu.regs.pc()
    ))
}

/// `BKPT`: architecturally a deliberate trap, not a decode failure, but this
/// crate has no debug-stub collaborator to hand it to, so it shares the
/// illegal-instruction fault path with a distinguishing log line.
pub(crate) fn breakpoint_trap(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    Err(format!(
        "BKPT trap (opcode {:#06X}) at PC {:#010X}",
        opcode,
        cpu.regs.pc()
    ))
}

/// Installed in every A-table slot. A-encoding op execution is out of scope
/// for this interpreter; every slot routes here, logged distinctly from a
/// genuine T-encoding decode failure.
pub(crate) fn unimplemented_arm(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    Err(format!(
        "unimplemented A-encoding opcode {:#010X} at PC {:#010X}",
        opcode,
        cpu.regs.pc()
    ))
}
