//! Runtime state representation for the VM.

use wisp_asm::Vip;

/// Resulting state of a single instruction's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecuteState {
    /// Fall through: the driver advances to the decoded next-VIP field.
    Proceed,
    /// Transfer control to an absolute VIP.
    Jump(Vip),
    /// Terminate the current guest thread with an exit code.
    Exit(u32),
}

impl Default for ExecuteState {
    fn default() -> Self {
        Self::Proceed
    }
}

/// Resulting state of a full emulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramState {
    /// The loop reached the sentinel VIP.
    Finished,
    /// The guest executed EXIT with this code.
    Exited(u32),
}

impl ProgramState {
    /// Process exit code under the host convention: the EXIT argument, or
    /// all-ones when the loop simply ran to the sentinel.
    pub const fn exit_code(&self) -> u32 {
        match self {
            Self::Finished => u32::MAX,
            Self::Exited(code) => *code,
        }
    }
}
