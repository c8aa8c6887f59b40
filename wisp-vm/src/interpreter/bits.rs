//! Bit-manipulation handlers: SWAP, REV, PACKHI, PACKLO, ROL, ROR.
//!
//! Halves are taken within the source's width: nibbles of a byte, bytes of
//! a short, halfwords of an int. A width-less source has no halves and
//! collapses to zero; a width-less rotation has no modulus and raises ERR.

use super::Interpreter;
use crate::host::Host;
use crate::state::ExecuteState;
use wisp_asm::{Flags, Operand, Width};

/// Mask of the upper half and the distance to the lower half.
const fn upper_half(width: Width) -> (u32, u32) {
    match width {
        Width::Null => (0, 0),
        Width::Byte => (0xF0, 4),
        Width::Short => (0xFF00, 8),
        Width::Int => (0xFFFF_0000, 16),
    }
}

impl<H: Host> Interpreter<H> {
    /// Swap the upper and lower halves of the source within its width.
    pub(crate) fn swap(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        let src = self.operand_read(op2);
        let (mask, half) = upper_half(op2.v);
        let swapped = if half == 0 {
            0
        } else {
            ((src & mask) >> half) | ((src & (mask >> half)) << half)
        };
        self.operand_write(op1, swapped);
        ExecuteState::Proceed
    }

    /// Reverse the source's bits within its width.
    pub(crate) fn rev(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        let mut src = self.operand_read(op2);
        let mut reversed = 0;
        for _ in 0..op2.v.bit_len() {
            reversed = (reversed << 1) | (src & 1);
            src >>= 1;
        }
        self.operand_write(op1, reversed);
        ExecuteState::Proceed
    }

    /// Place the source's upper half into the destination's lower half,
    /// keeping the destination's upper half. Halves follow the source's
    /// width; the destination is read through it and written through its
    /// own.
    pub(crate) fn packhi(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        let src = self.operand_read(op2);
        let dst = self.operand_read(&Operand { v: op2.v, ..*op1 });
        let (mask, half) = upper_half(op2.v);
        let packed = if half == 0 {
            0
        } else {
            (dst & mask) | ((src & mask) >> half)
        };
        self.operand_write(op1, packed);
        ExecuteState::Proceed
    }

    /// Place the source's lower half into the destination's upper half,
    /// keeping the destination's lower half.
    pub(crate) fn packlo(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        let src = self.operand_read(op2);
        let dst = self.operand_read(&Operand { v: op2.v, ..*op1 });
        let (upper, half) = upper_half(op2.v);
        let mask = upper >> half;
        let packed = if half == 0 {
            0
        } else {
            (dst & mask) | ((src & mask) << half)
        };
        self.operand_write(op1, packed);
        ExecuteState::Proceed
    }

    /// Rotate the destination left by the source, within the destination's
    /// width.
    pub(crate) fn rol(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.rotate(op1, op2, false)
    }

    /// Rotate the destination right by the source.
    pub(crate) fn ror(&mut self, op1: &Operand<'_>, op2: &Operand<'_>) -> ExecuteState {
        self.rotate(op1, op2, true)
    }

    fn rotate(
        &mut self,
        op1: &Operand<'_>,
        op2: &Operand<'_>,
        right: bool,
    ) -> ExecuteState {
        let width = op1.v.bit_len();
        if width == 0 {
            self.flags |= Flags::ERR;
            return ExecuteState::Proceed;
        }
        let mut rot = self.operand_read(op2) % width;
        if right {
            rot = (width - rot) % width;
        }
        let value = self.operand_read(op1);
        let rotated = if rot == 0 {
            value
        } else {
            op1.v.truncate((value << rot) | (value >> (width - rot)))
        };
        self.operand_write(op1, rotated);
        ExecuteState::Proceed
    }
}
