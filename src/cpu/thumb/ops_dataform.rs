//! Format 2 (add/subtract) and format 3 (move/compare/add/subtract
//! immediate) — ADD1/ADD2/ADD3/SUB1/SUB2/SUB3/MOV1/CMP1.
//!
//! Grounded on the `add_a`/`sub_a` flag-setting pattern in
//! `examples/0hmX-GameboyEmulatorInRust/core/src/cpu/ops_alu.rs`, generalized
//! to 32-bit words via [`crate::flags`].

use crate::board::Board;
use crate::cpu::Cpu;
use crate::error::CpuResult;
use crate::flags::{addition, subtraction};
use crate::memory::Memory;

#[inline(always)]
fn format2_operands(opcode: u32) -> (u32, usize, usize) {
    let rn_or_imm3 = (opcode >> 6) & 0x7;
    let rs = ((opcode >> 3) & 0x7) as usize;
    let rd = (opcode & 0x7) as usize;
    (rn_or_imm3, rs, rd)
}

pub fn add3(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rn, rs, rd) = format2_operands(opcode);
    let m = cpu.regs().get(rs);
    let n = cpu.regs().get(rn as usize);
    let d = m.wrapping_add(n);
    cpu.regs_mut().set(rd, d);
    addition(m, n, d).apply(cpu.psw_mut());
    Ok(())
}

pub fn sub3(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rn, rs, rd) = format2_operands(opcode);
    let m = cpu.regs().get(rs);
    let n = cpu.regs().get(rn as usize);
    let d = m.wrapping_sub(n);
    cpu.regs_mut().set(rd, d);
    subtraction(m, n, d).apply(cpu.psw_mut());
    Ok(())
}

pub fn add1(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (imm3, rs, rd) = format2_operands(opcode);
    let m = cpu.regs().get(rs);
    let d = m.wrapping_add(imm3);
    cpu.regs_mut().set(rd, d);
    addition(m, imm3, d).apply(cpu.psw_mut());
    Ok(())
}

pub fn sub1(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (imm3, rs, rd) = format2_operands(opcode);
    let m = cpu.regs().get(rs);
    let d = m.wrapping_sub(imm3);
    cpu.regs_mut().set(rd, d);
    subtraction(m, imm3, d).apply(cpu.psw_mut());
    Ok(())
}

#[inline(always)]
fn format3_operands(opcode: u32) -> (usize, u32) {
    let rd = ((opcode >> 8) & 0x7) as usize;
    let imm8 = opcode & 0xFF;
    (rd, imm8)
}

/// `MOV1`: only N and Z are affected.
pub fn mov1(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rd, imm8) = format3_operands(opcode);
    cpu.regs_mut().set(rd, imm8);
    cpu.psw_mut().n = false; // imm8 is an 8-bit unsigned value, bit 31 is always 0
    cpu.psw_mut().z = imm8 == 0;
    Ok(())
}

pub fn cmp1(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rd, imm8) = format3_operands(opcode);
    let m = cpu.regs().get(rd);
    let d = m.wrapping_sub(imm8);
    subtraction(m, imm8, d).apply(cpu.psw_mut());
    Ok(())
}

pub fn add2(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rd, imm8) = format3_operands(opcode);
    let m = cpu.regs().get(rd);
    let d = m.wrapping_add(imm8);
    cpu.regs_mut().set(rd, d);
    addition(m, imm8, d).apply(cpu.psw_mut());
    Ok(())
}

pub fn sub2(cpu: &mut Cpu, _memory: &mut dyn Memory, _board: &mut dyn Board, opcode: u32) -> CpuResult<()> {
    let (rd, imm8) = format3_operands(opcode);
    let m = cpu.regs().get(rd);
    let d = m.wrapping_sub(imm8);
    cpu.regs_mut().set(rd, d);
    subtraction(m, imm8, d).apply(cpu.psw_mut());
    Ok(())
}
