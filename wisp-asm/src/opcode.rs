use core::fmt;

/// Operation selector recovered from the packed instruction header.
///
/// The header transports the opcode as two 5-bit halves combined with an
/// optional complement (see [`InsnHeader`](crate::InsnHeader)); values
/// `28..=31` are representable on the wire but map to no operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Opcode {
    /// Copy the source operand into the destination.
    MOV = 0x00,
    /// Treat the source as an address, dereference it, load the result.
    LEA = 0x01,
    /// Store a scoped variable keyed by the current call frame.
    PUT = 0x02,
    /// Load a scoped variable keyed by the current call frame.
    GET = 0x03,
    /// `dst = dst + src`, wrapping.
    ADD = 0x04,
    /// `dst = dst - src`, wrapping.
    SUB = 0x05,
    /// `dst = dst * src`, wrapping.
    MUL = 0x06,
    /// `dst = dst / src`; a zero divisor raises ERR instead.
    DIV = 0x07,
    /// `dst = dst % src`; a zero divisor raises ERR instead.
    MOD = 0x08,
    /// Compare two operands and rewrite the flags.
    CMP = 0x09,
    /// Transfer to an absolute VIP, optionally conditional.
    JMP = 0x0a,
    /// Push the fallthrough address and transfer, optionally conditional.
    CALL = 0x0b,
    /// Pop a return address, optionally conditional; empty stack ends the
    /// loop.
    RET = 0x0c,
    /// Terminate the guest thread with an exit code.
    EXIT = 0x0d,
    /// `dst = dst & src`.
    AND = 0x0e,
    /// `dst = dst | src`.
    OR = 0x0f,
    /// `dst = dst ^ src`.
    XOR = 0x10,
    /// `dst = dst << src`.
    SHL = 0x11,
    /// `dst = dst >> src`.
    SHR = 0x12,
    /// `dst = !src`.
    NOT = 0x13,
    /// Bridge a guest syscall to the host.
    SYSCALL = 0x14,
    /// Swap the upper and lower halves of the source within its width.
    SWAP = 0x15,
    /// Reverse the bits of the source within its width.
    REV = 0x16,
    /// Pack the source's high half into the destination's low half.
    PACKHI = 0x17,
    /// Pack the source's low half into the destination's high half.
    PACKLO = 0x18,
    /// Rotate the destination left by the source, within its width.
    ROL = 0x19,
    /// Rotate the destination right by the source, within its width.
    ROR = 0x1a,
    /// Spawn a cooperating guest thread at an absolute VIP.
    FORK = 0x1b,
}

/// The byte does not name an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOpcode(pub u8);

impl fmt::Display for InvalidOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid opcode {:#04x}", self.0)
    }
}

impl std::error::Error for InvalidOpcode {}

impl TryFrom<u8> for Opcode {
    type Error = InvalidOpcode;

    fn try_from(b: u8) -> Result<Self, InvalidOpcode> {
        use Opcode::*;
        Ok(match b {
            0x00 => MOV,
            0x01 => LEA,
            0x02 => PUT,
            0x03 => GET,
            0x04 => ADD,
            0x05 => SUB,
            0x06 => MUL,
            0x07 => DIV,
            0x08 => MOD,
            0x09 => CMP,
            0x0a => JMP,
            0x0b => CALL,
            0x0c => RET,
            0x0d => EXIT,
            0x0e => AND,
            0x0f => OR,
            0x10 => XOR,
            0x11 => SHL,
            0x12 => SHR,
            0x13 => NOT,
            0x14 => SYSCALL,
            0x15 => SWAP,
            0x16 => REV,
            0x17 => PACKHI,
            0x18 => PACKLO,
            0x19 => ROL,
            0x1a => ROR,
            0x1b => FORK,
            _ => return Err(InvalidOpcode(b)),
        })
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
