use wisp_asm::{op, Op, RegId, Width};
use wisp_vm::prelude::*;

fn run(program: wisp_asm::ProgramBuilder) -> (TestVm, ProgramState) {
    let mut vm = TestVm::new(program.finish().expect("labels bound"));
    let state = vm.run().expect("program runs");
    (vm, state)
}

#[test]
fn byte_add_wraps_and_preserves_high_bytes() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R0), Op::imm(0x0102_0301)));
    p.push(op::add(Op::reg_w(RegId::R0, Width::Byte), Op::imm8(0xFF)));
    p.push(op::cmp(Op::reg_w(RegId::R0, Width::Byte), Op::imm8(0)));
    p.push(op::exit(Op::reg(RegId::R0)));
    let (vm, state) = run(p);
    // 0x01 + 0xFF wraps to 0x00 in the low byte; the rest is untouched.
    assert_eq!(state, ProgramState::Exited(0x0102_0300));
    assert!(vm.vm.flags().contains(Flags::EQ));
}

#[test]
fn sub_wraps_below_zero() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R0), Op::imm(2)));
    p.push(op::sub(Op::reg(RegId::R0), Op::imm(5)));
    p.push(op::exit(Op::reg(RegId::R0)));
    let (_, state) = run(p);
    assert_eq!(state, ProgramState::Exited(0xFFFF_FFFD));
}

#[test]
fn mul_truncates_to_destination_width() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R1), Op::imm(0x1234)));
    p.push(op::mul(Op::reg_w(RegId::R1, Width::Short), Op::imm16(0x100)));
    p.push(op::exit(Op::reg(RegId::R1)));
    let (_, state) = run(p);
    assert_eq!(state, ProgramState::Exited(0x3400));
}

#[test]
fn div_and_mod() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R0), Op::imm(17)));
    p.push(op::mov(Op::reg(RegId::R1), Op::imm(17)));
    p.push(op::div(Op::reg(RegId::R0), Op::imm(5)));
    p.push(op::modulo(Op::reg(RegId::R1), Op::imm(5)));
    p.push(op::mul(Op::reg(RegId::R0), Op::imm(0x100)));
    p.push(op::or(Op::reg(RegId::R0), Op::reg(RegId::R1)));
    p.push(op::exit(Op::reg(RegId::R0)));
    let (vm, state) = run(p);
    // 17 / 5 = 3 in the high byte, 17 % 5 = 2 in the low one.
    assert_eq!(state, ProgramState::Exited(0x0302));
    assert!(!vm.vm.flags().contains(Flags::ERR));
}

#[test]
fn div_by_zero_raises_err_and_keeps_destination() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R3), Op::imm(42)));
    p.push(op::div(Op::reg(RegId::R3), Op::imm(0)));
    p.push(op::exit(Op::reg(RegId::R3)));
    let (vm, state) = run(p);
    assert_eq!(state, ProgramState::Exited(42));
    assert!(vm.vm.flags().contains(Flags::ERR));
}

#[test]
fn mod_by_zero_raises_err() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R3), Op::imm(42)));
    p.push(op::modulo(Op::reg(RegId::R3), Op::imm(0)));
    p.push(op::exit(Op::reg(RegId::R3)));
    let (vm, state) = run(p);
    assert_eq!(state, ProgramState::Exited(42));
    assert!(vm.vm.flags().contains(Flags::ERR));
}

#[test]
fn bitwise_not_honors_destination_width() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::not(Op::reg_w(RegId::R1, Width::Short), Op::imm16(0x00FF)));
    p.push(op::exit(Op::reg(RegId::R1)));
    let (_, state) = run(p);
    assert_eq!(state, ProgramState::Exited(0xFF00));
}

#[test]
fn xor_clears_a_register() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R2), Op::imm(0xDEAD_BEEF)));
    p.push(op::xor(Op::reg(RegId::R2), Op::reg(RegId::R2)));
    p.push(op::exit(Op::reg(RegId::R2)));
    let (_, state) = run(p);
    assert_eq!(state, ProgramState::Exited(0));
}

#[test]
fn shift_by_word_size_or_more_is_zero() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R0), Op::imm(1)));
    p.push(op::shl(Op::reg(RegId::R0), Op::imm(40)));
    p.push(op::exit(Op::reg(RegId::R0)));
    let (_, state) = run(p);
    assert_eq!(state, ProgramState::Exited(0));
}

#[test]
fn shifts_move_bits() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::mov(Op::reg(RegId::R0), Op::imm(0x10)));
    p.push(op::shl(Op::reg(RegId::R0), Op::imm(8)));
    p.push(op::shr(Op::reg(RegId::R0), Op::imm(4)));
    p.push(op::exit(Op::reg(RegId::R0)));
    let (_, state) = run(p);
    assert_eq!(state, ProgramState::Exited(0x100));
}

#[test]
fn memory_destination_read_modify_write() {
    let mut p = wisp_asm::ProgramBuilder::new();
    p.push(op::add(
        Op::mem(wisp_asm::MemRef::Abs(0x3_0000), Width::Int),
        Op::imm(5),
    ));
    p.push(op::exit0());
    let mut vm = TestVm::new(p.finish().expect("labels bound"));
    vm.vm.memory().store(0x3_0000, Width::Int, 10);
    let state = vm.run().expect("program runs");
    assert_eq!(state, ProgramState::Exited(0));
    assert_eq!(vm.vm.memory().load(0x3_0000, Width::Int), 15);
}
