use ntest::timeout;
use wisp_asm::{op, MemRef, Op, ProgramBuilder, RegId, Width};
use wisp_vm::prelude::*;

/// The parent spins on a scratch byte the child eventually writes; the
/// fork handshake guarantees the child is live on its own stack before the
/// parent resumes, and the shared memory region carries the byte across.
#[test]
#[timeout(30000)]
fn forked_thread_shares_the_memory_region() {
    let mut p = ProgramBuilder::new();
    let child = p.label();
    let spin = p.label();
    p.push(op::fork(Op::label(child)));
    p.bind(spin);
    p.push(op::mov(
        Op::reg(RegId::R1),
        Op::mem(MemRef::Abs(0x3_0000), Width::Byte),
    ));
    p.push(op::cmp(Op::reg_w(RegId::R1, Width::Byte), Op::imm8(0x55)));
    p.push(op::jmp_if(Op::label(spin), Op::imm8(Flags::NEQ.bits() as u8)));
    p.push(op::exit(Op::imm8(0)));
    p.bind(child);
    p.push(op::mov(
        Op::mem(MemRef::Abs(0x3_0000), Width::Byte),
        Op::imm8(0x55),
    ));
    p.push(op::exit(Op::imm8(1)));

    let mut vm = TestVm::new(p.finish().expect("labels bound"));
    assert_eq!(vm.run().expect("runs"), ProgramState::Exited(0));
    assert_eq!(vm.vm.memory().load_u8(0x3_0000), 0x55);
}

#[test]
fn conditional_fork_not_taken_spawns_nothing() {
    let mut p = ProgramBuilder::new();
    let child = p.label();
    p.push(op::cmp(Op::imm(1), Op::imm(1)));
    p.push(op::fork_if(Op::label(child), Op::imm8(Flags::NEQ.bits() as u8)));
    p.push(op::exit(Op::imm8(3)));
    p.bind(child);
    p.push(op::mov(
        Op::mem(MemRef::Abs(0x3_0000), Width::Byte),
        Op::imm8(0xEE),
    ));
    p.push(op::exit(Op::imm8(9)));

    let mut vm = TestVm::new(p.finish().expect("labels bound"));
    assert_eq!(vm.run().expect("runs"), ProgramState::Exited(3));
    assert_eq!(vm.vm.memory().load_u8(0x3_0000), 0);
}

/// Guest threads see each other's scratch writes both ways: the parent
/// hands the child an input through memory before forking.
#[test]
#[timeout(30000)]
fn forked_thread_reads_parent_writes() {
    let mut p = ProgramBuilder::new();
    let child = p.label();
    let spin = p.label();
    p.push(op::mov(
        Op::mem(MemRef::Abs(0x3_0010), Width::Short),
        Op::imm16(0x0042),
    ));
    p.push(op::fork(Op::label(child)));
    p.bind(spin);
    p.push(op::mov(
        Op::reg(RegId::R1),
        Op::mem(MemRef::Abs(0x3_0020), Width::Short),
    ));
    p.push(op::cmp(Op::reg_w(RegId::R1, Width::Short), Op::imm16(0x0084)));
    p.push(op::jmp_if(Op::label(spin), Op::imm8(Flags::NEQ.bits() as u8)));
    p.push(op::exit(Op::reg(RegId::R1)));
    p.bind(child);
    // Double the input word and echo it back.
    p.push(op::mov(
        Op::reg(RegId::R2),
        Op::mem(MemRef::Abs(0x3_0010), Width::Short),
    ));
    p.push(op::add(Op::reg(RegId::R2), Op::reg(RegId::R2)));
    p.push(op::mov(
        Op::mem(MemRef::Abs(0x3_0020), Width::Short),
        Op::reg_w(RegId::R2, Width::Short),
    ));
    p.push(op::exit0());

    let mut vm = TestVm::new(p.finish().expect("labels bound"));
    assert_eq!(vm.run().expect("runs"), ProgramState::Exited(0x0084));
}
