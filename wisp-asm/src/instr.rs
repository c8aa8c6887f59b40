//! Instruction constructors and program assembly.
//!
//! The inverse of [`decode`](crate::decode): an [`Instr`] describes one
//! instruction abstractly, and [`ProgramBuilder`] lays a sequence of them
//! out, linking every fallthrough field to the following instruction and
//! resolving jump labels to absolute VIPs. The last instruction's
//! fallthrough links to the sentinel, so a program that runs off the end
//! terminates.

use crate::header::{InsnHeader, XorMode, HEADER_LEN};
use crate::opcode::Opcode;
use crate::operand::{OperandType, Width, NEXT_LEN, NEXT_VIP_XOR};
use crate::reg::RegId;
use crate::{Vip, VIP_SENTINEL};
use core::fmt;

/// Memory reference in an instruction being encoded.
#[derive(Debug, Clone, Copy)]
pub enum MemRef {
    /// Absolute displacement; encoded with three displacement bytes.
    Abs(u32),
    /// Register base plus immediate displacement (two displacement bytes).
    BaseDisp {
        /// Base register.
        base: RegId,
        /// Width applied to the base register's contribution.
        base_w: Width,
        /// Displacement, up to 16 bits.
        disp: u16,
    },
    /// Register base plus register displacement.
    BaseIndex {
        /// Base register.
        base: RegId,
        /// Width applied to the base register's contribution.
        base_w: Width,
        /// Displacement register.
        index: RegId,
        /// Width applied to the displacement register's contribution.
        index_w: Width,
    },
}

impl MemRef {
    const fn wire_len(&self) -> u8 {
        match self {
            Self::Abs(_) => 4,
            Self::BaseDisp { .. } => 3,
            Self::BaseIndex { .. } => 2,
        }
    }

    fn emit(&self, out: &mut Vec<u8>) {
        match *self {
            Self::Abs(disp) => {
                out.push(0x00);
                out.extend_from_slice(&[
                    (disp >> 16) as u8,
                    (disp >> 8) as u8,
                    disp as u8,
                ]);
            }
            Self::BaseDisp { base, base_w, disp } => {
                out.push(0x80 | (base_w.bits() << 4) | base.to_u8());
                out.extend_from_slice(&disp.to_be_bytes());
            }
            Self::BaseIndex {
                base,
                base_w,
                index,
                index_w,
            } => {
                out.push(
                    0x40 | (base_w.bits() << 4)
                        | (index_w.bits() << 2)
                        | (base.to_u8() >> 2),
                );
                out.push(((base.to_u8() & 0x03) << 6) | (index.to_u8() << 2));
            }
        }
    }
}

/// Label naming a position inside a [`ProgramBuilder`] program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

/// Operand of an instruction being encoded.
#[derive(Debug, Clone, Copy)]
pub enum Op {
    /// Register operand.
    Reg(RegId, Width),
    /// Immediate with an explicit payload length (1, 2, 3 or 4 bytes).
    Imm {
        /// Immediate value; a 3-byte payload carries the low 24 bits.
        value: u32,
        /// Width tag.
        width: Width,
        /// Payload length in bytes.
        len: u8,
    },
    /// Memory operand.
    Mem(MemRef, Width),
    /// Control-transfer target resolved by the program builder; encoded as
    /// a 3-byte full-width immediate.
    Target(Label),
}

impl Op {
    /// Full-width register operand.
    pub const fn reg(r: RegId) -> Self {
        Self::Reg(r, Width::Int)
    }

    /// Register operand at an explicit width.
    pub const fn reg_w(r: RegId, w: Width) -> Self {
        Self::Reg(r, w)
    }

    /// Full-width 4-byte immediate.
    pub const fn imm(value: u32) -> Self {
        Self::Imm {
            value,
            width: Width::Int,
            len: 4,
        }
    }

    /// Byte-width single-byte immediate.
    pub const fn imm8(value: u8) -> Self {
        Self::Imm {
            value: value as u32,
            width: Width::Byte,
            len: 1,
        }
    }

    /// Short-width two-byte immediate.
    pub const fn imm16(value: u16) -> Self {
        Self::Imm {
            value: value as u32,
            width: Width::Short,
            len: 2,
        }
    }

    /// Full-width three-byte immediate (24-bit value).
    pub const fn imm24(value: u32) -> Self {
        Self::Imm {
            value,
            width: Width::Int,
            len: 3,
        }
    }

    /// Memory operand.
    pub const fn mem(mref: MemRef, w: Width) -> Self {
        Self::Mem(mref, w)
    }

    /// Target operand naming a builder label.
    pub const fn label(label: Label) -> Self {
        Self::Target(label)
    }

    const fn otype(&self) -> OperandType {
        match self {
            Self::Reg(..) => OperandType::Reg,
            Self::Imm { .. } | Self::Target(_) => OperandType::Imm,
            Self::Mem(..) => OperandType::Mem,
        }
    }

    const fn width(&self) -> Width {
        match self {
            Self::Reg(_, w) | Self::Mem(_, w) => *w,
            Self::Imm { width, .. } => *width,
            Self::Target(_) => Width::Int,
        }
    }

    const fn wire_len(&self) -> u8 {
        match self {
            Self::Reg(..) => 1,
            Self::Imm { len, .. } => *len,
            Self::Mem(mref, _) => mref.wire_len(),
            Self::Target(_) => 3,
        }
    }

    fn emit(&self, resolve: &dyn Fn(Label) -> Result<Vip, AsmError>, out: &mut Vec<u8>) -> Result<(), AsmError> {
        match *self {
            Self::Reg(r, _) => out.push(r.to_u8()),
            Self::Imm { value, len, .. } => match len {
                1 => out.push(value as u8),
                2 => out.extend_from_slice(&[(value >> 8) as u8, value as u8]),
                3 => out.extend_from_slice(&[
                    (value >> 16) as u8,
                    (value >> 8) as u8,
                    value as u8,
                ]),
                _ => out.extend_from_slice(&value.to_be_bytes()),
            },
            Self::Target(label) => {
                let vip = resolve(label)?;
                out.extend_from_slice(&[
                    (vip >> 16) as u8,
                    (vip >> 8) as u8,
                    vip as u8,
                ]);
            }
            Self::Mem(mref, _) => mref.emit(out),
        }
        Ok(())
    }
}

/// One instruction to encode.
#[derive(Debug, Clone, Copy)]
pub struct Instr {
    opcode: Opcode,
    xor: XorMode,
    op1: Option<Op>,
    op2: Option<Op>,
}

impl Instr {
    /// Instruction without operands.
    pub const fn op0(opcode: Opcode) -> Self {
        Self {
            opcode,
            xor: XorMode::from_bits(opcode as u8),
            op1: None,
            op2: None,
        }
    }

    /// Instruction with a single operand.
    pub const fn op1(opcode: Opcode, op1: Op) -> Self {
        Self {
            opcode,
            xor: XorMode::from_bits(opcode as u8),
            op1: Some(op1),
            op2: None,
        }
    }

    /// Instruction with both operands.
    pub const fn op2(opcode: Opcode, op1: Op, op2: Op) -> Self {
        Self {
            opcode,
            xor: XorMode::from_bits(opcode as u8),
            op1: Some(op1),
            op2: Some(op2),
        }
    }

    /// Override the opcode-complement selector.
    pub const fn xor(mut self, xor: XorMode) -> Self {
        self.xor = xor;
        self
    }

    /// Encoded size in bytes: header, present operand payloads, next field.
    pub const fn size(&self) -> u32 {
        let op1 = match &self.op1 {
            Some(op) => op.wire_len() as u32,
            None => 0,
        };
        let op2 = match &self.op2 {
            Some(op) => op.wire_len() as u32,
            None => 0,
        };
        HEADER_LEN as u32 + op1 + op2 + NEXT_LEN as u32
    }

    fn encode_into(
        &self,
        resolve: &dyn Fn(Label) -> Result<Vip, AsmError>,
        next: Vip,
        out: &mut Vec<u8>,
    ) -> Result<(), AsmError> {
        // The decoder locates operand 2 past operand 1's declared length,
        // so a lone second operand has no encoding.
        debug_assert!(self.op1.is_some() || self.op2.is_none());

        let salt = (next ^ (next >> 8) ^ 0x1a) as u8;
        let (opcode_l, opcode_r) =
            InsnHeader::split_opcode(self.opcode as u8, self.xor, salt);
        let header = InsnHeader {
            opcode_l,
            opcode_r,
            xor: self.xor,
            op1_t: self.op1.map_or(OperandType::None, |op| op.otype()),
            op1_v: self.op1.map_or(Width::Null, |op| op.width()),
            op1_l: self.op1.map_or(1, |op| op.wire_len()),
            op2_t: self.op2.map_or(OperandType::None, |op| op.otype()),
            op2_v: self.op2.map_or(Width::Null, |op| op.width()),
            op2_l: self.op2.map_or(1, |op| op.wire_len()),
        };
        out.extend_from_slice(&header.to_bytes());
        if let Some(op) = &self.op1 {
            op.emit(resolve, out)?;
        }
        if let Some(op) = &self.op2 {
            op.emit(resolve, out)?;
        }
        let masked = next ^ NEXT_VIP_XOR;
        out.extend_from_slice(&[masked as u8, (masked >> 8) as u8, (masked >> 16) as u8]);
        Ok(())
    }
}

/// Shorthand constructors, one per operation.
pub mod op {
    use super::{Instr, Op};
    use crate::opcode::Opcode;

    macro_rules! two_operand {
        ($($(#[$doc:meta])* $name:ident => $opcode:ident),* $(,)?) => {
            $(
                $(#[$doc])*
                pub fn $name(dst: Op, src: Op) -> Instr {
                    Instr::op2(Opcode::$opcode, dst, src)
                }
            )*
        };
    }

    two_operand! {
        /// Copy `src` into `dst`.
        mov => MOV,
        /// Dereference the address named by `src` into `dst`.
        lea => LEA,
        /// Store scoped variable `id` (dst operand) with value `src`.
        put => PUT,
        /// Load scoped variable `id` (src operand) into `dst`.
        get => GET,
        /// Wrapping add.
        add => ADD,
        /// Wrapping subtract.
        sub => SUB,
        /// Wrapping multiply.
        mul => MUL,
        /// Unsigned divide.
        div => DIV,
        /// Unsigned remainder.
        modulo => MOD,
        /// Compare and rewrite the flags.
        cmp => CMP,
        /// Bitwise and.
        and => AND,
        /// Bitwise or.
        or => OR,
        /// Bitwise exclusive or.
        xor => XOR,
        /// Logical shift left.
        shl => SHL,
        /// Logical shift right.
        shr => SHR,
        /// Bitwise complement of `src` into `dst`.
        not => NOT,
        /// Swap the halves of `src` into `dst`.
        swap => SWAP,
        /// Bit-reverse `src` into `dst`.
        rev => REV,
        /// Pack `src`'s high half into `dst`'s low half.
        packhi => PACKHI,
        /// Pack `src`'s low half into `dst`'s high half.
        packlo => PACKLO,
        /// Rotate `dst` left by `src`.
        rol => ROL,
        /// Rotate `dst` right by `src`.
        ror => ROR,
    }

    /// Unconditional jump to `dst`.
    pub fn jmp(dst: Op) -> Instr {
        Instr::op1(Opcode::JMP, dst)
    }

    /// Jump to `dst` when `cond` intersects the flags.
    pub fn jmp_if(dst: Op, cond: Op) -> Instr {
        Instr::op2(Opcode::JMP, dst, cond)
    }

    /// Unconditional call to `dst`.
    pub fn call(dst: Op) -> Instr {
        Instr::op1(Opcode::CALL, dst)
    }

    /// Call `dst` when `cond` intersects the flags.
    pub fn call_if(dst: Op, cond: Op) -> Instr {
        Instr::op2(Opcode::CALL, dst, cond)
    }

    /// Unconditional return.
    pub fn ret() -> Instr {
        Instr::op0(Opcode::RET)
    }

    /// Return when `cond` intersects the flags.
    pub fn ret_if(cond: Op) -> Instr {
        Instr::op1(Opcode::RET, cond)
    }

    /// Terminate the guest thread with `code`.
    pub fn exit(code: Op) -> Instr {
        Instr::op1(Opcode::EXIT, code)
    }

    /// Terminate the guest thread with code 0.
    pub fn exit0() -> Instr {
        Instr::op0(Opcode::EXIT)
    }

    /// Bridge guest syscall `code` to the host.
    pub fn syscall(code: Op) -> Instr {
        Instr::op1(Opcode::SYSCALL, code)
    }

    /// Spawn a guest thread at `dst`.
    pub fn fork(dst: Op) -> Instr {
        Instr::op1(Opcode::FORK, dst)
    }

    /// Spawn a guest thread at `dst` when `cond` intersects the flags.
    pub fn fork_if(dst: Op, cond: Op) -> Instr {
        Instr::op2(Opcode::FORK, dst, cond)
    }
}

/// Program assembly failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmError {
    /// A label was referenced but never bound.
    UnboundLabel(usize),
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundLabel(id) => write!(f, "label {id} was never bound"),
        }
    }
}

impl std::error::Error for AsmError {}

/// Sequential program assembler.
///
/// Instructions are laid out in push order starting at VIP 0; each
/// fallthrough field links to the following instruction, and the last one
/// links to the sentinel.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    instrs: Vec<Instr>,
    labels: Vec<Option<usize>>,
}

impl ProgramBuilder {
    /// Empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh unbound label.
    pub fn label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    /// Bind `label` to the next pushed instruction.
    pub fn bind(&mut self, label: Label) {
        self.labels[label.0] = Some(self.instrs.len());
    }

    /// Append an instruction.
    pub fn push(&mut self, instr: Instr) -> &mut Self {
        self.instrs.push(instr);
        self
    }

    /// Lay the program out, linking fallthroughs and resolving labels.
    pub fn finish(self) -> Result<Vec<u8>, AsmError> {
        let mut offsets = Vec::with_capacity(self.instrs.len());
        let mut at: Vip = 0;
        for instr in &self.instrs {
            offsets.push(at);
            at += instr.size();
        }
        let end = at;

        let labels = &self.labels;
        let offsets_ref = &offsets;
        let resolve = move |label: Label| -> Result<Vip, AsmError> {
            let index = labels[label.0].ok_or(AsmError::UnboundLabel(label.0))?;
            Ok(offsets_ref.get(index).copied().unwrap_or(end))
        };

        let mut out = Vec::with_capacity(end as usize);
        for (i, instr) in self.instrs.iter().enumerate() {
            let next = offsets.get(i + 1).copied().unwrap_or(VIP_SENTINEL);
            instr.encode_into(&resolve, next, &mut out)?;
        }
        Ok(out)
    }
}
