//! Operand evaluation against registers and the memory region.

use super::Interpreter;
use crate::consts::ADDR_MASK;
use wisp_asm::{MemMode, Operand, OperandType, Word};

impl<H> Interpreter<H> {
    /// Absolute memory offset named by a memory operand: base plus
    /// displacement, each register contribution truncated by its own width
    /// tag, folded into the region.
    pub(crate) fn operand_offset(&self, op: &Operand<'_>) -> u32 {
        let (base, disp) = match op.mem_mode() {
            MemMode::RegReg {
                base,
                base_w,
                index,
                index_w,
            } => (
                base_w.truncate(self.register(base)),
                index_w.truncate(self.register(index)),
            ),
            MemMode::RegImm { base, base_w, disp } => {
                (base_w.truncate(self.register(base)), disp)
            }
            MemMode::Abs { disp } => (0, disp),
        };
        base.wrapping_add(disp) & ADDR_MASK
    }

    /// Evaluate an operand as a source value. Absent operands read as 0;
    /// register and immediate sources are truncated by their width tag;
    /// memory sources load big-endian at theirs.
    pub(crate) fn operand_read(&self, op: &Operand<'_>) -> Word {
        match op.t {
            OperandType::None => 0,
            OperandType::Reg => op.v.truncate(self.register(op.reg())),
            OperandType::Imm => op.v.truncate(op.imm()),
            OperandType::Mem => self.memory.load(self.operand_offset(op), op.v),
        }
    }

    /// Write a value through a destination operand. A register destination
    /// has its low width-bits cleared first, so narrow writes preserve the
    /// high bytes; a memory destination takes a big-endian store at the
    /// operand's width; immediate and absent destinations swallow the
    /// write.
    pub(crate) fn operand_write(&mut self, op: &Operand<'_>, value: Word) {
        match op.t {
            OperandType::Reg => {
                let r = op.reg();
                let cleared = op.v.clear(self.register(r));
                self.set_register(r, cleared | value);
            }
            OperandType::Mem => {
                let at = self.operand_offset(op);
                self.memory.store(at, op.v, value);
            }
            OperandType::None | OperandType::Imm => {}
        }
    }
}
