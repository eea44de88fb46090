//! A-encoding decode table.
//!
//! This interpreter scopes the A-encoding to table *structure* only: every
//! one of the 4096 `((opcode>>16)&0xFF0)|((opcode>>4)&0xF)` slots resolves to
//! a real [`Handler`](super::Handler), but the handler itself reports
//! "unimplemented" rather than decoding A-encoding semantics, which this
//! crate does not implement. Grounded on the same
//! `lazy_static! { pub static ref TABLE: [...; N] = build_table(); }` shape
//! the T-encoding table uses, so both dispatch paths share one idiom even
//! though only one of them currently does real work.

use super::{unimplemented_arm, Handler};
use lazy_static::lazy_static;

lazy_static! {
    /// The 4096-entry A-encoding dispatch table, indexed by
    /// `((opcode >> 16) & 0xFF0) | ((opcode >> 4) & 0xF)`.
    /// Every slot currently resolves to [`unimplemented_arm`].
    pub static ref TABLE: [Handler; 4096] = [unimplemented_arm; 4096];
}
