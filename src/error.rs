//! Shared result type for CPU handlers.
//!
//! Grounded on `pub type CpuResult<T> = Result<T, String>` in
//! `examples/0hmX-GameboyEmulatorInRust/core/src/cpu.rs`: handlers that can
//! hit an architecturally undefined encoding return `Err`, everything else
//! returns `Ok(())`. The step loop never panics or unwinds on guest data.

/// Result of dispatching a single instruction.
pub type CpuResult<T> = Result<T, String>;
