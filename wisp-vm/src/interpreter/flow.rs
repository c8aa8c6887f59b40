//! Control flow: CMP, JMP, CALL, RET, EXIT.

use super::Interpreter;
use crate::error::VmError;
use crate::host::Host;
use crate::state::ExecuteState;
use core::cmp::Ordering;
use wisp_asm::{next_vip, Decoded, Flags, Operand, Vip, VIP_SENTINEL};

impl<H: Host> Interpreter<H> {
    /// Rewrite the flags from an unsigned comparison, preserving ERR.
    /// Exactly one of EQ/LT/GT comes out set.
    pub(crate) fn cmp(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        let a = self.operand_read(op1);
        let b = self.operand_read(op2);
        let outcome = match a.cmp(&b) {
            Ordering::Equal => Flags::EQ,
            Ordering::Less => Flags::LT,
            Ordering::Greater => Flags::GT,
        };
        self.flags = (self.flags & Flags::ERR) | outcome;
        ExecuteState::Proceed
    }

    /// An absent condition operand means unconditional; a present one must
    /// intersect the flags.
    pub(crate) fn condition_met(&self, cond: &Operand<'_>) -> bool {
        !cond.is_present() || self.flags.meets(self.operand_read(cond))
    }

    pub(crate) fn jmp(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        let dst = self.operand_read(op1);
        if self.condition_met(op2) {
            ExecuteState::Jump(dst)
        } else {
            ExecuteState::Proceed
        }
    }

    /// CALL pushes the decoded fallthrough address as the return address,
    /// then jumps. A full stack is terminal.
    pub(crate) fn call(
        &mut self,
        vip: Vip,
        d: &Decoded<'_>,
    ) -> Result<ExecuteState, VmError> {
        let dst = self.operand_read(&d.op1);
        if !self.condition_met(&d.op2) {
            return Ok(ExecuteState::Proceed);
        }
        let returnto = next_vip(&self.code, d.skip, vip)?;
        self.stack
            .push(returnto)
            .map_err(|_| VmError::CallStackOverflow)?;
        Ok(ExecuteState::Jump(dst))
    }

    /// RET's condition travels in operand 1. An empty stack yields the
    /// sentinel, ending the loop.
    pub(crate) fn ret(&mut self, op1: &Operand<'_>) -> ExecuteState {
        if !self.condition_met(op1) {
            return ExecuteState::Proceed;
        }
        ExecuteState::Jump(self.stack.pop().unwrap_or(VIP_SENTINEL))
    }

    /// EXIT's code defaults to 0 when the operand is absent.
    pub(crate) fn exit(&mut self, op1: &Operand<'_>) -> ExecuteState {
        ExecuteState::Exit(if op1.is_present() {
            self.operand_read(op1)
        } else {
            0
        })
    }
}
