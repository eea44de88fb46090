//! T-encoding decode table.
//!
//! Grounded on the `lazy_static! { pub static ref INSTRUCTIONS: [Instruction;
//! 256] = [...] }` shape in
//! `examples/0hmX-GameboyEmulatorInRust/core/src/instruction.rs`: a table of
//! function pointers built once at first use rather than a giant match on
//! every raw opcode. The table is built by testing each of the 1024 possible
//! `opcode >> 6` index values against the format-discriminating bits (all of
//! which live in bits 15-6, confirmed against
//! `examples/original_source/src/arm/isa-thumb.c`) and installing ONE
//! canonical handler per semantic class — not 1024 source-level
//! specializations. Each handler re-extracts whatever register fields and
//! immediates it needs from the full opcode it's called with.

use super::{illegal_thumb, Handler};
use lazy_static::lazy_static;

pub mod ops_alu;
pub mod ops_block;
pub mod ops_branch;
pub mod ops_dataform;
pub mod ops_hireg;
pub mod ops_mem_imm;
pub mod ops_mem_reg;
pub mod ops_shift;

lazy_static! {
    /// The 1024-entry T-encoding dispatch table, indexed by `opcode >> 6`.
    pub static ref TABLE: [Handler; 1024] = build_table();
}

fn build_table() -> [Handler; 1024] {
    let mut table: [Handler; 1024] = [illegal_thumb; 1024];
    for (idx, slot) in table.iter_mut().enumerate() {
        *slot = decode(idx as u16);
    }
    table
}

/// Select the canonical handler for a given `opcode >> 6` index by testing
/// the format-discriminating bits directly on the index (each index bit `j`
/// corresponds to opcode bit `j + 6`).
fn decode(idx: u16) -> Handler {
    let prefix5 = (idx >> 5) & 0x1F;
    match prefix5 {
        0x00 => ops_shift::lsl1,
        0x01 => ops_shift::lsr1,
        0x02 => ops_shift::asr1,
        0x03 => {
            let immediate = (idx >> 4) & 1 != 0;
            let op = (idx >> 3) & 1 != 0;
            match (immediate, op) {
                (false, false) => ops_dataform::add3,
                (false, true) => ops_dataform::sub3,
                (true, false) => ops_dataform::add1,
                (true, true) => ops_dataform::sub1,
            }
        }
        0x04 => ops_dataform::mov1,
        0x05 => ops_dataform::cmp1,
        0x06 => ops_dataform::add2,
        0x07 => ops_dataform::sub2,
        0x08 => {
            if idx & 0x10 == 0 {
                ops_alu::dispatch((idx & 0xF) as u8)
            } else {
                ops_hireg::dispatch((idx & 0xF) as u8)
            }
        }
        0x09 => ops_mem_imm::ldr3,
        0x0A | 0x0B => {
            let is_format8 = (idx >> 3) & 1 != 0;
            let hi = (idx >> 5) & 1 != 0;
            let lo = (idx >> 4) & 1 != 0;
            if !is_format8 {
                match (hi, lo) {
                    (false, false) => ops_mem_reg::str2,
                    (false, true) => ops_mem_reg::strb2,
                    (true, false) => ops_mem_reg::ldr2,
                    (true, true) => ops_mem_reg::ldrb2,
                }
            } else {
                match (hi, lo) {
                    (false, false) => ops_mem_reg::strh2,
                    (false, true) => ops_mem_reg::ldrsb,
                    (true, false) => ops_mem_reg::ldrh2,
                    (true, true) => ops_mem_reg::ldrsh,
                }
            }
        }
        0x0C | 0x0D | 0x0E | 0x0F => {
            let b = (idx >> 6) & 1 != 0;
            let l = (idx >> 5) & 1 != 0;
            match (b, l) {
                (false, false) => ops_mem_imm::str1,
                (false, true) => ops_mem_imm::ldr1,
                (true, false) => ops_mem_imm::strb1,
                (true, true) => ops_mem_imm::ldrb1,
            }
        }
        0x10 | 0x11 => {
            if (idx >> 5) & 1 == 0 { ops_mem_imm::strh1 } else { ops_mem_imm::ldrh1 }
        }
        0x12 | 0x13 => {
            if (idx >> 5) & 1 == 0 { ops_mem_imm::str3 } else { ops_mem_imm::ldr4 }
        }
        0x14 | 0x15 => {
            if (idx >> 5) & 1 == 0 { ops_mem_imm::add5 } else { ops_mem_imm::add6 }
        }
        0x16 | 0x17 => {
            let sel4 = (idx >> 2) & 0xF;
            match sel4 {
                0x0 => {
                    if (idx >> 1) & 1 == 0 { ops_mem_imm::add7 } else { ops_mem_imm::sub4 }
                }
                0x4 => ops_block::push,
                0x5 => ops_block::pushr,
                0xC => ops_block::pop,
                0xD => ops_block::popr,
                0xE => super::breakpoint_trap,
                _ => illegal_thumb,
            }
        }
        0x18 | 0x19 => {
            if (idx >> 5) & 1 == 0 { ops_block::stmia } else { ops_block::ldmia }
        }
        0x1A | 0x1B => {
            let cond4 = (idx >> 2) & 0xF;
            match cond4 {
                0xF => ops_branch::swi,
                0xE => illegal_thumb,
                _ => ops_branch::bcc,
            }
        }
        0x1C => ops_branch::b,
        0x1D => illegal_thumb,
        0x1E => ops_branch::bl1,
        0x1F => ops_branch::bl2,
        _ => illegal_thumb,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format1_prefixes_select_shift_handlers() {
        assert_eq!(decode(0x000) as usize, ops_shift::lsl1 as usize);
        assert_eq!(decode(0x020) as usize, ops_shift::lsr1 as usize);
        assert_eq!(decode(0x040) as usize, ops_shift::asr1 as usize);
    }

    #[test]
    fn format2_four_way_split() {
        assert_eq!(decode(0x060) as usize, ops_dataform::add3 as usize);
        assert_eq!(decode(0x068) as usize, ops_dataform::sub3 as usize);
        assert_eq!(decode(0x070) as usize, ops_dataform::add1 as usize);
        assert_eq!(decode(0x078) as usize, ops_dataform::sub1 as usize);
    }

    #[test]
    fn alu_and_hireg_share_prefix_0x08() {
        assert_eq!(decode(0x100) as usize, ops_alu::dispatch(0) as usize);
        assert_eq!(decode(0x110) as usize, ops_hireg::dispatch(0) as usize);
    }

    #[test]
    fn branch_families_decode() {
        assert_eq!(decode(0x380) as usize, ops_branch::b as usize); // 0x1C << 5
        assert_eq!(decode(0x3C0) as usize, ops_branch::bl1 as usize); // 0x1E << 5
        assert_eq!(decode(0x3E0) as usize, ops_branch::bl2 as usize); // 0x1F << 5
    }

    #[test]
    fn reserved_prefix_0x1d_is_illegal() {
        assert_eq!(decode(0x1D << 5) as usize, illegal_thumb as usize);
    }

    #[test]
    fn format16_cond_0xe_is_illegal_and_0xf_is_swi() {
        let base = 0x1A << 5;
        assert_eq!(decode(base | (0xE << 2)) as usize, illegal_thumb as usize);
        assert_eq!(decode(base | (0xF << 2)) as usize, ops_branch::swi as usize);
    }
}
