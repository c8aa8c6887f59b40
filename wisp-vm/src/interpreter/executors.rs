//! The fetch–decode–dispatch–execute loop.

use super::Interpreter;
use crate::error::VmError;
use crate::host::Host;
use crate::state::{ExecuteState, ProgramState};
use std::sync::Arc;
use wisp_asm::{decode, next_vip, Decoded, Flags, Opcode, Vip, VIP_SENTINEL};

impl<H: Host> Interpreter<H> {
    /// Run the emulation loop from `entry` until the sentinel VIP, an
    /// EXIT, or a terminal fault. Thread-local state starts zeroed; shared
    /// memory keeps whatever earlier runs and sibling threads put there.
    pub fn run(&mut self, entry: Vip) -> Result<ProgramState, VmError> {
        self.reset();
        let code = Arc::clone(&self.code);
        let mut vip = entry;
        while vip != VIP_SENTINEL {
            let decoded = decode(&code, vip)?;
            let state = self.dispatch(vip, &decoded)?;
            vip = match state {
                ExecuteState::Proceed => next_vip(&code, decoded.skip, vip)?,
                ExecuteState::Jump(dst) => dst,
                ExecuteState::Exit(status) => return Ok(ProgramState::Exited(status)),
            };
        }
        Ok(ProgramState::Finished)
    }

    /// Select and run the handler for one decoded instruction. Opcode
    /// bytes above the table raise ERR and fall through.
    fn dispatch(
        &mut self,
        vip: Vip,
        d: &Decoded<'_>,
    ) -> Result<ExecuteState, VmError> {
        let Ok(opcode) = Opcode::try_from(d.opcode) else {
            tracing::debug!(vip, raw = d.opcode, "unmapped opcode; raising ERR");
            self.flags |= Flags::ERR;
            return Ok(ExecuteState::Proceed);
        };
        tracing::trace!(vip, %opcode, "execute");

        let (op1, op2) = (&d.op1, &d.op2);
        let state = match opcode {
            Opcode::MOV => self.mov(op1, op2),
            Opcode::LEA => self.lea(op1, op2),
            Opcode::PUT => self.put(op1, op2),
            Opcode::GET => self.get(op1, op2),
            Opcode::ADD => self.add(op1, op2),
            Opcode::SUB => self.sub(op1, op2),
            Opcode::MUL => self.mul(op1, op2),
            Opcode::DIV => self.div(op1, op2),
            Opcode::MOD => self.rem(op1, op2),
            Opcode::CMP => self.cmp(op1, op2),
            Opcode::JMP => self.jmp(op1, op2),
            Opcode::CALL => return self.call(vip, d),
            Opcode::RET => self.ret(op1),
            Opcode::EXIT => self.exit(op1),
            Opcode::AND => self.and(op1, op2),
            Opcode::OR => self.or(op1, op2),
            Opcode::XOR => self.xor(op1, op2),
            Opcode::SHL => self.shl(op1, op2),
            Opcode::SHR => self.shr(op1, op2),
            Opcode::NOT => self.not(op1, op2),
            Opcode::SYSCALL => self.syscall(op1),
            Opcode::SWAP => self.swap(op1, op2),
            Opcode::REV => self.rev(op1, op2),
            Opcode::PACKHI => self.packhi(op1, op2),
            Opcode::PACKLO => self.packlo(op1, op2),
            Opcode::ROL => self.rol(op1, op2),
            Opcode::ROR => self.ror(op1, op2),
            Opcode::FORK => return self.fork(op1, op2),
        };
        Ok(state)
    }
}
