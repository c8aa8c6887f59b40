//! Runtime interpreter error implementation.
//!
//! The guest has no structured error channel: recoverable conditions raise
//! the ERR flag and execution falls through, while the faults below are
//! terminal for the emulation loop. Embedders map them to process exit
//! codes through [`VmError::exit_code`].

use crate::consts::{CALL_STACK_CAPACITY, STACK_EXHAUSTED_EXIT};
use wisp_asm::{DecodeError, Vip};

/// Terminal interpreter fault.
#[derive(Debug, thiserror::Error)]
pub enum VmError {
    /// Instruction bytes at this VIP run past the end of the code buffer,
    /// typically after a jump out of range.
    #[error("code access out of bounds at {vip:#08x}")]
    CodeOverflow {
        /// VIP of the faulting access.
        vip: Vip,
    },
    /// A CALL found the call stack full.
    #[error("call stack exhausted ({CALL_STACK_CAPACITY} frames)")]
    CallStackOverflow,
    /// The host refused to spawn a guest thread for FORK.
    #[error("failed to spawn guest thread: {0}")]
    ForkFailed(#[from] std::io::Error),
}

impl VmError {
    /// Process exit code under the host's diagnostic convention: the
    /// dedicated stack-exhaustion code, the thread-spawn syscall number,
    /// or all-ones for a wild code access.
    pub fn exit_code(&self) -> u32 {
        match self {
            Self::CodeOverflow { .. } => u32::MAX,
            Self::CallStackOverflow => STACK_EXHAUSTED_EXIT,
            Self::ForkFailed(_) => libc::SYS_clone3 as u32,
        }
    }
}

impl From<DecodeError> for VmError {
    fn from(e: DecodeError) -> Self {
        Self::CodeOverflow { vip: e.vip }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(VmError::CallStackOverflow.exit_code(), 0xEF32);
        assert_eq!(VmError::CodeOverflow { vip: 0 }.exit_code(), u32::MAX);
    }

    #[test]
    fn decode_error_carries_vip() {
        let err = VmError::from(DecodeError { vip: 0x1234 });
        assert!(matches!(err, VmError::CodeOverflow { vip: 0x1234 }));
    }
}
