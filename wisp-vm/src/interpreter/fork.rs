//! FORK: spawn a cooperating guest thread.
//!
//! The child shares the memory region and code buffer but owns fresh
//! registers, flags and call stack, and runs on its own 128-KiB stack. A
//! futex word choreographs the start: the parent may not proceed until the
//! child has published readiness from its own stack, and the child pauses
//! for a second after publishing so the parent can commit its wait. The
//! child's writes before the readiness store happen-before the parent's
//! resumption.

use super::Interpreter;
use crate::consts::GUEST_STACK_SIZE;
use crate::error::VmError;
use crate::host::Host;
use crate::state::ExecuteState;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use wisp_asm::Operand;

impl<H: Host> Interpreter<H> {
    pub(crate) fn fork(
        &mut self,
        op1: &Operand<'_>,
        op2: &Operand<'_>,
    ) -> Result<ExecuteState, VmError> {
        if !self.condition_met(op2) {
            return Ok(ExecuteState::Proceed);
        }
        let dst = self.operand_read(op1);

        let ready = Arc::new(AtomicU32::new(0));
        let child_ready = Arc::clone(&ready);
        let child = Interpreter::new(
            Arc::clone(&self.memory),
            Arc::clone(&self.code),
            self.host.clone(),
        );

        let handle = thread::Builder::new()
            .name("wisp-guest".into())
            .stack_size(GUEST_STACK_SIZE)
            .spawn(move || {
                let mut vm = child;
                child_ready.store(1, Ordering::Release);
                vm.host.futex_wake(&child_ready);
                // Give the parent a beat to commit its wait.
                thread::sleep(Duration::from_secs(1));
                match vm.run(dst) {
                    Ok(state) => tracing::debug!(?state, "guest thread finished"),
                    Err(err) => tracing::debug!(%err, "guest thread faulted"),
                }
            })?;
        // The guest thread owns its lifetime; nothing joins it.
        drop(handle);

        while ready.load(Ordering::Acquire) == 0 {
            self.host.futex_wait(&ready, 0);
        }
        Ok(ExecuteState::Proceed)
    }
}
