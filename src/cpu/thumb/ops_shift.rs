//! Format 1: move shifted register — LSL1/LSR1/ASR1.
//!
//! Grounded on the rotate/shift handlers in
//! `examples/0hmX-GameboyEmulatorInRust/core/src/cpu/ops_rot_shift.rs` for the
//! "compute result, derive C from the shifted-out bit, apply the neutral
//! flag pattern" shape; the shift-by-zero special cases for LSR/ASR (treated
//! as shift-by-32) are grounded directly on
//! `examples/original_source/src/arm/isa-thumb.c`.

use crate::board::Board;
use crate::cpu::Cpu;
use crate::error::CpuResult;
use crate::flags::neutral;
use crate::memory::Memory;

#[inline(always)]
fn operands(opcode: u32) -> (u32, usize, usize) {
    let immediate = (opcode >> 6) & 0x1F;
    let rs = ((opcode >> 3) & 0x7) as usize;
    let rd = (opcode & 0x7) as usize;
    (immediate, rs, rd)
}

pub fn lsl1(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (immediate, rs, rd) = operands(opcode);
    let value = cpu.regs().get(rs);
    let result = if immediate == 0 {
        value
    } else {
        let carry = (value >> (32 - immediate)) & 1 != 0;
        cpu.psw_mut().c = carry;
        value << immediate
    };
    cpu.regs_mut().set(rd, result);
    neutral(result).apply(cpu.psw_mut());
    Ok(())
}

pub fn lsr1(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (immediate, rs, rd) = operands(opcode);
    let value = cpu.regs().get(rs);
    let result = if immediate == 0 {
        cpu.psw_mut().c = (value >> 31) & 1 != 0;
        0
    } else {
        let carry = (value >> (immediate - 1)) & 1 != 0;
        cpu.psw_mut().c = carry;
        value >> immediate
    };
    cpu.regs_mut().set(rd, result);
    neutral(result).apply(cpu.psw_mut());
    Ok(())
}

pub fn asr1(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (immediate, rs, rd) = operands(opcode);
    let value = cpu.regs().get(rs) as i32;
    let result = if immediate == 0 {
        cpu.psw_mut().c = (value >> 31) & 1 != 0;
        if value < 0 { 0xFFFF_FFFFu32 } else { 0 }
    } else {
        let carry = ((value as u32) >> (immediate - 1)) & 1 != 0;
        cpu.psw_mut().c = carry;
        (value >> immediate.min(31)) as u32
    };
    cpu.regs_mut().set(rd, result);
    neutral(result).apply(cpu.psw_mut());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::RecordingBoard;
    use crate::config::InterpreterConfig;
    use crate::memory::FlatMemory;
    use crate::psw::ExecutionMode;

    fn harness() -> (Cpu, FlatMemory, RecordingBoard) {
        let mut cpu = Cpu::new(InterpreterConfig::new());
        cpu.reset(0, 0x1000, ExecutionMode::T);
        (cpu, FlatMemory::new(0x100), RecordingBoard::default())
    }

    #[test]
    fn lsl_by_zero_is_a_move_and_leaves_carry_untouched() {
        let (mut cpu, mut mem, mut board) = harness();
        cpu.regs_mut().set(1, 0xABCD_EF01);
        cpu.psw_mut().c = true;
        // LSL r0, r1, #0
        lsl1(&mut cpu, &mut mem, &mut board, 0x0008).unwrap();
        assert_eq!(cpu.regs().get(0), 0xABCD_EF01);
        assert!(cpu.psw().c, "shift-by-zero must not touch C");
    }

    #[test]
    fn lsr_by_zero_is_shift_by_32() {
        let (mut cpu, mut mem, mut board) = harness();
        cpu.regs_mut().set(1, 0x8000_0000);
        // LSR r0, r1, #0
        lsr1(&mut cpu, &mut mem, &mut board, 0x0008).unwrap();
        assert_eq!(cpu.regs().get(0), 0);
        assert!(cpu.psw().c);
        assert!(cpu.psw().z);
    }

    #[test]
    fn asr_preserves_sign_on_shift_by_32() {
        let (mut cpu, mut mem, mut board) = harness();
        cpu.regs_mut().set(1, 0x8000_0001);
        // ASR r0, r1, #0
        asr1(&mut cpu, &mut mem, &mut board, 0x0008).unwrap();
        assert_eq!(cpu.regs().get(0), 0xFFFF_FFFF);
        assert!(cpu.psw().n);
    }

    #[test]
    fn lsl_by_one_reports_correct_carry() {
        let (mut cpu, mut mem, mut board) = harness();
        cpu.regs_mut().set(1, 0x8000_0000);
        // LSL r0, r1, #1
        lsl1(&mut cpu, &mut mem, &mut board, 0x0048).unwrap();
        assert_eq!(cpu.regs().get(0), 0);
        assert!(cpu.psw().c);
        assert!(cpu.psw().z);
    }
}
