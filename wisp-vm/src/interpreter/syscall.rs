//! Guest→host syscall bridge.
//!
//! One indirection: a curated table maps the guest number to a host
//! syscall number plus a marshalling spec for the four argument registers.
//! Pointer arguments are rebased into the VM memory region so the kernel
//! reads and writes guest buffers directly. Numbers outside the table pass
//! through to the host untranslated — a documented hazard of the ABI, not
//! corrected here; build with `strict-syscalls` to refuse them instead.

use super::Interpreter;
use crate::host::Host;
use crate::state::ExecuteState;
use wisp_asm::{Operand, RegId, Syscall, Word};

/// How one argument register reaches the host.
#[derive(Debug, Clone, Copy)]
enum ArgSpec {
    /// Register value as-is.
    Val,
    /// Register value rebased as a pointer into VM memory.
    Ptr,
    /// Unused by the host operation.
    Unused,
}

use ArgSpec::{Ptr, Unused, Val};

/// Host syscall number and argument marshalling for a guest syscall.
fn plan(call: Syscall) -> (libc::c_long, [ArgSpec; 4]) {
    match call {
        Syscall::Sleep => (libc::SYS_nanosleep, [Ptr, Unused, Unused, Unused]),
        Syscall::Getpid => (libc::SYS_getpid, [Unused; 4]),
        Syscall::Getppid => (libc::SYS_getppid, [Unused; 4]),
        Syscall::Kill => (libc::SYS_kill, [Val, Val, Unused, Unused]),
        Syscall::Tod => (libc::SYS_gettimeofday, [Ptr, Unused, Unused, Unused]),
        Syscall::Open => (libc::SYS_open, [Ptr, Val, Unused, Unused]),
        Syscall::Read => (libc::SYS_read, [Val, Ptr, Val, Unused]),
        Syscall::Write => (libc::SYS_write, [Val, Ptr, Val, Unused]),
        Syscall::Close => (libc::SYS_close, [Val, Unused, Unused, Unused]),
        Syscall::Lseek => (libc::SYS_lseek, [Val, Val, Val, Unused]),
        Syscall::InotifyInit => (libc::SYS_inotify_init, [Val, Unused, Unused, Unused]),
        Syscall::InotifyAddWatch => {
            (libc::SYS_inotify_add_watch, [Val, Ptr, Val, Unused])
        }
        Syscall::InotifyRmWatch => {
            (libc::SYS_inotify_rm_watch, [Val, Val, Unused, Unused])
        }
        Syscall::Futex => (libc::SYS_futex, [Ptr, Val, Val, Ptr]),
    }
}

impl<H: Host> Interpreter<H> {
    /// Bridge the guest syscall named by the operand. The host's return
    /// value lands in `R0` truncated to a word; failures surface there as
    /// negative errno values for the guest to check.
    pub(crate) fn syscall(&mut self, op1: &Operand<'_>) -> ExecuteState {
        let code = self.operand_read(op1);
        let f = [
            self.register(RegId::F0),
            self.register(RegId::F1),
            self.register(RegId::F2),
            self.register(RegId::F3),
        ];

        let (no, args) = match Syscall::try_from(code) {
            Ok(call) => {
                let (no, spec) = plan(call);
                let mut args = [0u64; 4];
                for (arg, (kind, value)) in args.iter_mut().zip(spec.into_iter().zip(f)) {
                    *arg = match kind {
                        Val => u64::from(value),
                        Ptr => self.memory.host_addr(value),
                        Unused => 0,
                    };
                }
                (i64::from(no), args)
            }
            Err(raw) => {
                if cfg!(feature = "strict-syscalls") {
                    tracing::warn!(code = raw, "refusing unmapped guest syscall");
                    self.set_register(RegId::R0, (-libc::ENOSYS) as Word);
                    return ExecuteState::Proceed;
                }
                tracing::debug!(code = raw, "passing through unmapped guest syscall");
                (i64::from(raw), f.map(u64::from))
            }
        };

        tracing::trace!(no, ?args, "host syscall");
        let ret = self.host.syscall(no, args);
        self.set_register(RegId::R0, ret as Word);
        ExecuteState::Proceed
    }
}
