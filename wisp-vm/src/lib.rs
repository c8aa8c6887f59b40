//! Wisp VM implementation.
//!
//! A tiny register machine embedded in a host executable: 16 word
//! registers, a bounded call stack, compare flags, a 1 MiB virtual memory
//! region shared between guest threads, a scoped-variable store addressed
//! by a hashed key, a curated guest→host syscall bridge, and a fork
//! primitive that spawns a cooperating guest thread.
//!
//! The wire format lives in [`wisp_asm`]; this crate owns the semantics:
//! operand evaluation, the opcode handlers, the syscall bridge, the fork
//! handshake, and the emulation driver. The host syscall layer targets
//! Linux on x86-64, matching the guest ABI's syscall numbering.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod consts;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod loader;
pub mod memory;
pub mod stack;
pub mod state;

#[cfg(feature = "test-helpers")]
pub mod util;

#[doc(no_inline)]
pub use wisp_asm;

pub mod prelude {
    //! Re-exports for embedders.

    #[doc(no_inline)]
    pub use wisp_asm::{
        Flags, Opcode, RegId, Syscall, Vip, Width, Word, VIP_SENTINEL,
    };

    pub use crate::{
        consts::*,
        error::VmError,
        host::{Host, LinuxHost},
        interpreter::{scope_slot, Interpreter},
        loader,
        memory::Vmem,
        stack::CallStack,
        state::{ExecuteState, ProgramState},
    };

    #[cfg(feature = "test-helpers")]
    pub use crate::util::test_helpers::{RecordingHost, SyscallRecord, TestVm};
}
