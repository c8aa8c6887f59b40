//! Arithmetic and bitwise handlers.
//!
//! All of these share one read-modify-write shape: evaluate the source,
//! combine it with the destination's current value, truncate the result to
//! the destination's width and write it back, leaving a register's
//! untouched bytes alone. Division and remainder guard the zero divisor by
//! raising ERR and leaving the destination as it was.

use super::Interpreter;
use crate::host::Host;
use crate::state::ExecuteState;
use wisp_asm::{Flags, Operand, OperandType, Word};

impl<H: Host> Interpreter<H> {
    /// `dst = f(dst, src)` at the destination's width.
    fn binary(
        &mut self,
        op1: &Operand<'_>,
        op2: &Operand<'_>,
        f: impl FnOnce(Word, Word) -> Word,
    ) -> ExecuteState {
        let src = self.operand_read(op2);
        match op1.t {
            OperandType::Reg => {
                let r = op1.reg();
                let current = self.register(r);
                let result = op1.v.truncate(f(current, src));
                self.set_register(r, op1.v.clear(current) | result);
            }
            OperandType::Mem => {
                let at = self.operand_offset(op1);
                let current = self.memory.load(at, op1.v);
                self.memory.store(at, op1.v, f(current, src));
            }
            OperandType::None | OperandType::Imm => {}
        }
        ExecuteState::Proceed
    }

    pub(crate) fn add(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.binary(op1, op2, Word::wrapping_add)
    }

    pub(crate) fn sub(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.binary(op1, op2, Word::wrapping_sub)
    }

    pub(crate) fn mul(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.binary(op1, op2, Word::wrapping_mul)
    }

    pub(crate) fn div(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        if self.operand_read(op2) == 0 {
            self.flags |= Flags::ERR;
            return ExecuteState::Proceed;
        }
        self.binary(op1, op2, |dst, src| dst / src)
    }

    pub(crate) fn rem(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        if self.operand_read(op2) == 0 {
            self.flags |= Flags::ERR;
            return ExecuteState::Proceed;
        }
        self.binary(op1, op2, |dst, src| dst % src)
    }

    pub(crate) fn and(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.binary(op1, op2, |dst, src| dst & src)
    }

    pub(crate) fn or(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.binary(op1, op2, |dst, src| dst | src)
    }

    pub(crate) fn xor(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.binary(op1, op2, |dst, src| dst ^ src)
    }

    pub(crate) fn shl(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.binary(op1, op2, |dst, src| dst.checked_shl(src).unwrap_or(0))
    }

    pub(crate) fn shr(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.binary(op1, op2, |dst, src| dst.checked_shr(src).unwrap_or(0))
    }

    /// `dst = !src`; not a read-modify-write, but width handling matches.
    pub(crate) fn not(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        let value = op1.v.truncate(!self.operand_read(op2));
        self.operand_write(op1, value);
        ExecuteState::Proceed
    }
}
