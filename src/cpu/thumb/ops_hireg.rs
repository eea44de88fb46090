//! Format 5: hi-register operations and branch/exchange — ADD4/CMP3/MOV3/BX.
//!
//! Grounded on `examples/original_source/src/arm/isa-thumb.c`'s
//! `DEFINE_INSTRUCTION_WITH_HIGH_THUMB` family: H1/H2 extend the 3-bit Rd/Rs
//! fields to the full 4-bit register number, which is how this format
//! reaches r8-r15 (including PC and SP) from 16-bit encoding space. `BX`'s
//! misalignment correction only triggers when Rm is PC — confirmed directly
//! from the source, not stated in the prose description of the instruction.

use crate::board::Board;
use crate::cpu::Cpu;
use crate::error::CpuResult;
use crate::flags::subtraction;
use crate::memory::Memory;
use crate::psw::ExecutionMode;
use crate::registers::PC;

#[inline(always)]
fn full_registers(opcode: u32) -> (usize, usize) {
    let h1 = (opcode >> 7) & 1;
    let h2 = (opcode >> 6) & 1;
    let rs = (((opcode >> 3) & 0x7) | (h2 << 3)) as usize;
    let rd = ((opcode & 0x7) | (h1 << 3)) as usize;
    (rs, rd)
}

pub fn dispatch(sel: u8) -> super::super::Handler {
    let op = (sel >> 2) & 0x3;
    match op {
        0 => add4,
        1 => cmp3,
        2 => mov3,
        3 => bx,
        _ => unreachable!(),
    }
}

/// `ADD4`: high-register add, no flags affected. Writing to
/// PC goes through the T-encoding PC-write ritual rather than a plain
/// register store.
pub fn add4(cpu: &mut Cpu, _m: &mut dyn Memory, _b: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rs, rd) = full_registers(opcode);
    let value = cpu.regs().get(rd).wrapping_add(cpu.regs().get(rs));
    write_register_or_pc(cpu, rd, value);
    Ok(())
}

pub fn cmp3(cpu: &mut Cpu, _m: &mut dyn Memory, _b: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rs, rd) = full_registers(opcode);
    let m = cpu.regs().get(rd);
    let n = cpu.regs().get(rs);
    let d = m.wrapping_sub(n);
    subtraction(m, n, d).apply(cpu.psw_mut());
    Ok(())
}

pub fn mov3(cpu: &mut Cpu, _m: &mut dyn Memory, _b: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rs, rd) = full_registers(opcode);
    let value = cpu.regs().get(rs);
    write_register_or_pc(cpu, rd, value);
    Ok(())
}

/// `BX`: interworking branch. Mode is taken from Rm's low bit; the target
/// misalignment correction applies only when Rm is PC.
pub fn bx(cpu: &mut Cpu, _m: &mut dyn Memory, _b: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rm, _rd) = full_registers(opcode);
    let rm_value = if rm == PC { cpu.pipeline_pc() } else { cpu.regs().get(rm) };
    let new_mode = ExecutionMode::from_interwork_bit(rm_value & 1 != 0);
    let misalign = if rm == PC { rm_value & 0x2 } else { 0 };
    let target = (rm_value & 0xFFFF_FFFE).wrapping_sub(misalign);
    cpu.set_execution_mode(new_mode);
    match new_mode {
        ExecutionMode::T => cpu.write_pc_thumb(target),
        ExecutionMode::A => cpu.write_pc_arm(target),
    }
    Ok(())
}

fn write_register_or_pc(cpu: &mut Cpu, rd: usize, value: u32) {
    if rd == PC {
        cpu.write_pc_thumb(value);
    } else {
        cpu.regs_mut().set(rd, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::RecordingBoard;
    use crate::config::InterpreterConfig;
    use crate::memory::FlatMemory;

    fn harness() -> (Cpu, FlatMemory, RecordingBoard) {
        let mut cpu = Cpu::new(InterpreterConfig::new());
        cpu.reset(0, 0x1000, ExecutionMode::T);
        (cpu, FlatMemory::new(0x100), RecordingBoard::default())
    }

    #[test]
    fn bx_to_arm_mode_aligns_to_four() {
        let (mut cpu, mut mem, mut board) = harness();
        cpu.regs_mut().set(7, 0x0800_0000);
        // BX r7: H1=0,H2=1,rs3=7 -> opcode bits: H2<<6 | rs3<<3
        bx(&mut cpu, &mut mem, &mut board, (1 << 6) | (7 << 3)).unwrap();
        assert_eq!(cpu.psw().execution_mode, ExecutionMode::A);
        assert_eq!(cpu.regs().pc(), 0x0800_0000);
    }

    #[test]
    fn bx_to_thumb_mode_clears_bit0_only() {
        let (mut cpu, mut mem, mut board) = harness();
        cpu.regs_mut().set(7, 0x0800_0001);
        bx(&mut cpu, &mut mem, &mut board, (1 << 6) | (7 << 3)).unwrap();
        assert_eq!(cpu.psw().execution_mode, ExecutionMode::T);
        assert_eq!(cpu.regs().pc(), 0x0800_0000);
    }

    #[test]
    fn add4_reaches_sp_via_high_register_extension() {
        let (mut cpu, mut mem, mut board) = harness();
        cpu.regs_mut().set_sp(0x0300_0100);
        cpu.regs_mut().set(2, 0x40);
        // ADD sp, r2 : rd = SP(13) = 5|H1<<3 -> H1=1,rd3=5 ; rs=r2(no H2)
        add4(&mut cpu, &mut mem, &mut board, (1 << 7) | (5) | (2 << 3)).unwrap();
        assert_eq!(cpu.regs().sp(), 0x0300_0140);
    }
}
