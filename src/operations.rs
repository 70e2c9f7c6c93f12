//! Operation kernels, one per mnemonic family. Each opcode table entry
//! carries an [`Operation`] descriptor; the engine dispatches it here by
//! pattern match, so no per-instruction allocation is ever needed.

use crate::addressing::{resolve_address, resolve_set_value, resolve_value, AddressingMode};
use crate::cpu::{State, N_THREADS, VECTOR24_BREAK, VECTOR_BREAK};
use crate::memory::{get_24bits, get_word, Memory};
use crate::opcodes::Opcode;
use crate::registers::{AddressWidth, Reg, RegisterWidth, StatusFlags};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogicOp {
    And,
    Or,
    Xor,
}

/// What an opcode does, independently of how its operand is addressed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operation {
    Load(Reg),
    Store(Reg),
    Transfer(Reg, Reg),
    IncDec { increment: bool },
    Shift { left: bool, rotate: bool },
    Logic(LogicOp),
    Adc,
    /// 65c02 ADC: BCD fixes Z and N and costs one extra cycle.
    AdcFixed,
    Sbc,
    SbcFixed,
    Compare(Reg),
    Bit,
    Trb,
    Tsb,
    Branch { flag: StatusFlags, test: bool },
    BranchOnBit { bit: u8, test: bool },
    SetMemBit { bit: u8, set: bool },
    UpdateFlag { flag: StatusFlags, value: bool },
    Push(Reg),
    Pull(Reg),
    PushStatus,
    PullStatus,
    Jmp,
    Jsr,
    Rts,
    Rti,
    Brk,
    /// 65c02 BRK additionally clears the D flag.
    BrkFixed,
    Stz,
    Nop,
    Halt,
    // 65C24T8 extensions
    CpuId,
    A24,
    R16,
    R24,
    W16,
    W24,
    Sws,
}

impl Operation {
    pub(crate) fn execute(self, s: &mut State, line: &[u8], opcode: &Opcode) {
        match self {
            Operation::Load(reg) => op_load(s, line, opcode, reg),
            Operation::Store(reg) => op_store(s, line, opcode, reg),
            Operation::Transfer(src, dst) => op_transfer(s, src, dst),
            Operation::IncDec { increment } => op_inc_dec(s, line, opcode, increment),
            Operation::Shift { left, rotate } => op_shift(s, line, opcode, left, rotate),
            Operation::Logic(op) => op_logic(s, line, opcode, op),
            Operation::Adc => op_adc(s, line, opcode),
            Operation::AdcFixed => op_adc_fixed(s, line, opcode),
            Operation::Sbc => op_sbc(s, line, opcode),
            Operation::SbcFixed => op_sbc_fixed(s, line, opcode),
            Operation::Compare(reg) => op_compare(s, line, opcode, reg),
            Operation::Bit => op_bit(s, line, opcode),
            Operation::Trb => op_trb(s, line, opcode),
            Operation::Tsb => op_tsb(s, line, opcode),
            Operation::Branch { flag, test } => op_branch(s, line, opcode, flag, test),
            Operation::BranchOnBit { bit, test } => op_branch_on_bit(s, line, opcode, bit, test),
            Operation::SetMemBit { bit, set } => op_set_mem_bit(s, line, opcode, bit, set),
            Operation::UpdateFlag { flag, value } => s.reg.update_flag(flag, value),
            Operation::Push(reg) => op_push(s, reg),
            Operation::Pull(reg) => op_pull(s, reg),
            Operation::PushStatus => op_push_status(s),
            Operation::PullStatus => op_pull_status(s),
            Operation::Jmp => op_jmp(s, line, opcode),
            Operation::Jsr => op_jsr(s, line, opcode),
            Operation::Rts => op_rts(s),
            Operation::Rti => op_rti(s),
            Operation::Brk => op_brk(s),
            Operation::BrkFixed => op_brk_fixed(s),
            Operation::Stz => op_stz(s, line, opcode),
            Operation::Nop => {}
            Operation::Halt => op_halt(s),
            Operation::CpuId => op_cpu_id(s),
            Operation::A24 => s.ab_width = AddressWidth::Ab24,
            Operation::R16 => s.r_width = RegisterWidth::R16,
            Operation::R24 => s.r_width = RegisterWidth::R24,
            Operation::W16 => {
                s.ab_width = AddressWidth::Ab24;
                s.r_width = RegisterWidth::R16;
            }
            Operation::W24 => {
                s.ab_width = AddressWidth::Ab24;
                s.r_width = RegisterWidth::R24;
            }
            Operation::Sws => s.s_width = s.r_width,
        }
    }
}

fn op_load(s: &mut State, line: &[u8], opcode: &Opcode, reg: Reg) {
    let value = resolve_value(s, line, opcode);
    s.reg.set(s.r_width, reg, value);
    s.reg.update_zn(s.r_width, value);
}

fn op_store(s: &mut State, line: &[u8], opcode: &Opcode, reg: Reg) {
    let value = s.reg.get(s.r_width, reg);
    resolve_set_value(s, line, opcode, value);
}

fn op_transfer(s: &mut State, src: Reg, dst: Reg) {
    let value;
    if src == Reg::Sp {
        value = s.reg.sp(s.s_width);
        s.reg.set(s.r_width, dst, value);
    } else if dst == Reg::Sp {
        value = s.reg.get(s.r_width, src);
        s.reg.set_sp(s.s_width, value);
    } else {
        value = s.reg.get(s.r_width, src);
        s.reg.set(s.r_width, dst, value);
    }

    if dst != Reg::Sp {
        s.reg.update_zn(s.r_width, value);
    }
}

fn op_inc_dec(s: &mut State, line: &[u8], opcode: &Opcode, increment: bool) {
    let mut value = resolve_value(s, line, opcode);
    if opcode.mode == AddressingMode::AbsoluteX || opcode.mode == AddressingMode::AbsoluteY {
        // The hardware reads the operand twice on these modes; observable
        // through soft switches, so the bus traffic is reproduced.
        value = resolve_value(s, line, opcode);
    }
    if increment {
        value = value.wrapping_add(1);
    } else {
        value = value.wrapping_sub(1);
    }
    s.reg.update_zn(s.r_width, value);
    resolve_set_value(s, line, opcode, value);
}

fn op_shift(s: &mut State, line: &[u8], opcode: &Opcode, left: bool, rotate: bool) {
    let mut value = resolve_value(s, line, opcode);
    let old_carry = u32::from(s.reg.flag_bit(StatusFlags::CARRY));
    let carry;
    if left {
        value <<= 1;
        if rotate {
            value += old_carry;
        }
        carry = value & (s.r_width.mask() + 1) != 0;
        value &= s.r_width.mask();
    } else {
        carry = value & 0x01 != 0;
        value >>= 1;
        if rotate {
            value += old_carry << (s.r_width.bits() - 1);
            value &= s.r_width.mask();
        }
    }
    s.reg.update_flag(StatusFlags::CARRY, carry);
    s.reg.update_zn(s.r_width, value);
    resolve_set_value(s, line, opcode, value);
}

fn op_logic(s: &mut State, line: &[u8], opcode: &Opcode, op: LogicOp) {
    let value = resolve_value(s, line, opcode);
    let result = match op {
        LogicOp::And => value & s.reg.a(s.r_width),
        LogicOp::Or => value | s.reg.a(s.r_width),
        LogicOp::Xor => value ^ s.reg.a(s.r_width),
    };
    s.reg.set_a(s.r_width, result);
    s.reg.update_zn(s.r_width, result);
}

fn op_adc(s: &mut State, line: &[u8], opcode: &Opcode) {
    let value = resolve_value(s, line, opcode);
    let a_value = s.reg.a(s.r_width);
    let carry = s.reg.flag_bit(StatusFlags::CARRY);

    let total = a_value + value + u32::from(carry);
    let signed_total = match s.r_width {
        RegisterWidth::R24 => a_value as i32 + value as i32 + i32::from(carry),
        RegisterWidth::R16 => {
            i32::from(a_value as u16 as i16) + i32::from(value as u16 as i16) + i32::from(carry)
        }
        RegisterWidth::R8 => {
            i32::from(a_value as u8 as i8) + i32::from(value as u8 as i8) + i32::from(carry)
        }
    };
    let truncated = total & s.r_width.mask();

    if s.reg.flag(StatusFlags::DECIMAL_MODE) {
        let mut total_bcd_lo = (a_value & 0x0F) + (value & 0x0F) + u32::from(carry);
        let mut total_bcd_hi = (a_value >> 4) + (value >> 4);
        if total_bcd_lo >= 10 {
            total_bcd_lo -= 10;
            total_bcd_hi += 1;
        }
        let total_bcd_hi_prenormalised = (total_bcd_hi & 0xF) as u8;
        let mut new_carry = false;
        if total_bcd_hi >= 10 {
            total_bcd_hi -= 10;
            new_carry = true;
        }
        let total_bcd = ((total_bcd_hi as u8) << 4).wrapping_add((total_bcd_lo as u8) & 0xF);
        s.reg.set_a(RegisterWidth::R8, u32::from(total_bcd));
        s.reg.update_flag(StatusFlags::CARRY, new_carry);
        s.reg.update_flag(
            StatusFlags::OVERFLOW,
            (value as u8 >> 7 == a_value as u8 >> 7)
                && (value as u8 >> 7 != total_bcd_hi_prenormalised >> 3),
        );
    } else {
        s.reg.set_a(s.r_width, truncated);
        s.reg
            .update_flag(StatusFlags::CARRY, total > s.r_width.mask());
        let overflow = match s.r_width {
            RegisterWidth::R24 => !(-8_388_608..=8_388_607).contains(&signed_total),
            RegisterWidth::R16 => !(-32_768..=32_767).contains(&signed_total),
            RegisterWidth::R8 => !(-128..=127).contains(&signed_total),
        };
        // See http://www.6502.org/tutorials/vflag.html
        s.reg.update_flag(StatusFlags::OVERFLOW, overflow);
    }

    // Z and N behave for BCD as if the operation was binary
    s.reg.update_zn(s.r_width, truncated);
}

fn op_adc_fixed(s: &mut State, line: &[u8], opcode: &Opcode) {
    op_adc(s, line, opcode);
    if s.reg.flag(StatusFlags::DECIMAL_MODE) {
        s.extra_cycle_bcd = true;
    }

    // The Z and N flags on BCD are fixed in the 65c02
    let a_value = s.reg.a(s.r_width);
    s.reg.update_zn(s.r_width, a_value);
}

fn op_sbc(s: &mut State, line: &[u8], opcode: &Opcode) {
    let value = resolve_value(s, line, opcode);
    let a_value = s.reg.a(s.r_width);
    let carry = s.reg.flag_bit(StatusFlags::CARRY);

    let borrow_base = s.r_width.mask() + 1;
    let total = (borrow_base + a_value + u32::from(carry))
        .wrapping_sub(value)
        .wrapping_sub(1);
    let signed_total = match s.r_width {
        RegisterWidth::R24 => a_value as i32 - value as i32 + i32::from(carry) - 1,
        RegisterWidth::R16 => {
            i32::from(a_value as u16 as i16) - i32::from(value as u16 as i16) + i32::from(carry)
                - 1
        }
        RegisterWidth::R8 => {
            i32::from(a_value as u8 as i8) - i32::from(value as u8 as i8) + i32::from(carry) - 1
        }
    };
    let truncated = total & s.r_width.mask();

    if s.reg.flag(StatusFlags::DECIMAL_MODE) {
        let mut total_bcd_lo =
            (a_value & 0x0F) as i32 - (value & 0x0F) as i32 + i32::from(carry) - 1;
        let mut total_bcd_hi = (a_value >> 4) as i32 - (value >> 4) as i32;
        if total_bcd_lo < 0 {
            total_bcd_lo += 10;
            total_bcd_hi -= 1;
        }
        let mut new_carry = true;
        if total_bcd_hi < 0 {
            total_bcd_hi += 10;
            new_carry = false;
        }
        let total_bcd = ((total_bcd_hi as u8) << 4).wrapping_add((total_bcd_lo as u8) & 0xF);
        s.reg.set_a(RegisterWidth::R8, u32::from(total_bcd));
        s.reg.update_flag(StatusFlags::CARRY, new_carry);
    } else {
        s.reg.set_a(s.r_width, truncated);
        s.reg
            .update_flag(StatusFlags::CARRY, total > s.r_width.mask());
    }

    // Z, N and V behave for BCD as if the operation was binary
    s.reg.update_zn(s.r_width, truncated);
    let overflow = match s.r_width {
        RegisterWidth::R24 => !(-8_388_608..=8_388_607).contains(&signed_total),
        RegisterWidth::R16 => !(-32_768..=32_767).contains(&signed_total),
        RegisterWidth::R8 => !(-128..=127).contains(&signed_total),
    };
    s.reg.update_flag(StatusFlags::OVERFLOW, overflow);
}

fn op_sbc_fixed(s: &mut State, line: &[u8], opcode: &Opcode) {
    op_sbc(s, line, opcode);
    if s.reg.flag(StatusFlags::DECIMAL_MODE) {
        s.extra_cycle_bcd = true;
    }

    // The Z and N flags on BCD are fixed in the 65c02
    let a_value = s.reg.a(s.r_width);
    s.reg.update_zn(s.r_width, a_value);
}

fn op_compare(s: &mut State, line: &[u8], opcode: &Opcode, reg: Reg) {
    let value = resolve_value(s, line, opcode);
    let reference = s.reg.get(s.r_width, reg);
    s.reg.update_zn(s.r_width, reference.wrapping_sub(value));
    s.reg.update_flag(StatusFlags::CARRY, reference >= value);
}

fn op_bit(s: &mut State, line: &[u8], opcode: &Opcode) {
    let value = resolve_value(s, line, opcode);
    let acc = s.reg.a(s.r_width);
    s.reg.update_flag(StatusFlags::ZERO, value & acc == 0);
    // The immediate addressing mode (65c02 only) does not affect N and V
    if opcode.mode != AddressingMode::Immediate {
        let sign = s.r_width.sign_bit();
        s.reg.update_flag(StatusFlags::NEGATIVE, value & sign != 0);
        s.reg
            .update_flag(StatusFlags::OVERFLOW, value & (sign >> 1) != 0);
    }
}

fn op_trb(s: &mut State, line: &[u8], opcode: &Opcode) {
    let value = resolve_value(s, line, opcode);
    let a = s.reg.a(s.r_width);
    s.reg.update_flag(StatusFlags::ZERO, value & a == 0);
    resolve_set_value(s, line, opcode, value & !a);
}

fn op_tsb(s: &mut State, line: &[u8], opcode: &Opcode) {
    let value = resolve_value(s, line, opcode);
    let a = s.reg.a(s.r_width);
    s.reg.update_flag(StatusFlags::ZERO, value & a == 0);
    resolve_set_value(s, line, opcode, value | a);
}

fn op_branch(s: &mut State, line: &[u8], opcode: &Opcode, flag: StatusFlags, test: bool) {
    if s.reg.flag(flag) == test {
        s.extra_cycle_branch_taken = true;
        let address = resolve_address(s, line, opcode);
        s.reg.set_pc(address);
    }
}

fn op_branch_on_bit(s: &mut State, line: &[u8], opcode: &Opcode, bit: u8, test: bool) {
    // Two addressing modes at once: the zero-page operand is read here, the
    // relative jump is resolved through the addressing code.
    let value = s.mem.peek(u32::from(line[1]));
    let bit_value = (value >> bit) & 1 == 1;

    if bit_value == test {
        let address = resolve_address(s, line, opcode);
        s.reg.set_pc(address);
    }
}

fn op_set_mem_bit(s: &mut State, line: &[u8], opcode: &Opcode, bit: u8, set: bool) {
    let value = resolve_value(s, line, opcode);
    let value = if set {
        value | (1 << bit)
    } else {
        value & !(1u32 << bit)
    };
    resolve_set_value(s, line, opcode, value);
}

const STACK_ADDRESS: u32 = 0x0100;

pub(crate) fn push_byte(s: &mut State, value: u8) {
    let address = if s.s_width == RegisterWidth::R8 {
        STACK_ADDRESS + s.reg.sp(s.s_width)
    } else {
        s.reg.sp(s.s_width)
    };
    s.mem.poke(address, value);
    let sp = s.reg.sp(s.s_width).wrapping_sub(1);
    s.reg.set_sp(s.s_width, sp);
}

pub(crate) fn pull_byte(s: &mut State) -> u8 {
    let sp = s.reg.sp(s.s_width).wrapping_add(1);
    s.reg.set_sp(s.s_width, sp);
    let address = if s.s_width == RegisterWidth::R8 {
        STACK_ADDRESS + s.reg.sp(s.s_width)
    } else {
        s.reg.sp(s.s_width)
    };
    s.mem.peek(address)
}

pub(crate) fn push_word(s: &mut State, value: u16) {
    push_byte(s, (value >> 8) as u8);
    push_byte(s, value as u8);
}

pub(crate) fn pull_word(s: &mut State) -> u16 {
    u16::from(pull_byte(s)) | (u16::from(pull_byte(s)) << 8)
}

pub(crate) fn push_24bits(s: &mut State, value: u32) {
    push_byte(s, (value >> 16) as u8);
    push_byte(s, (value >> 8) as u8);
    push_byte(s, value as u8);
}

pub(crate) fn pull_24bits(s: &mut State) -> u32 {
    u32::from(pull_byte(s)) | (u32::from(pull_byte(s)) << 8) | (u32::from(pull_byte(s)) << 16)
}

fn op_push(s: &mut State, reg: Reg) {
    let value = s.reg.get(s.r_width, reg);
    match s.r_width {
        RegisterWidth::R24 => push_24bits(s, value),
        RegisterWidth::R16 => push_word(s, value as u16),
        RegisterWidth::R8 => push_byte(s, value as u8),
    }
}

fn op_pull(s: &mut State, reg: Reg) {
    let value = match s.r_width {
        RegisterWidth::R24 => pull_24bits(s),
        RegisterWidth::R16 => u32::from(pull_word(s)),
        RegisterWidth::R8 => u32::from(pull_byte(s)),
    };
    s.reg.set(s.r_width, reg, value);
    s.reg.update_zn(s.r_width, value);
}

fn op_push_status(s: &mut State) {
    let value = s.reg.p() | (StatusFlags::BREAK | StatusFlags::UNUSED).bits();
    push_byte(s, value);
}

fn op_pull_status(s: &mut State) {
    let value = pull_byte(s);
    s.reg.set_p(value);
    s.reg.update_flag_5b();
}

fn op_jmp(s: &mut State, line: &[u8], opcode: &Opcode) {
    let address = resolve_address(s, line, opcode);
    s.reg.set_pc(address);
}

fn op_jsr(s: &mut State, line: &[u8], opcode: &Opcode) {
    let return_address = s.reg.pc().wrapping_sub(1);
    match s.ab_width {
        AddressWidth::Ab24 => push_24bits(s, return_address),
        AddressWidth::Ab16 => push_word(s, return_address as u16),
    }
    let address = resolve_address(s, line, opcode);
    s.reg.set_pc(address);
}

fn op_rts(s: &mut State) {
    let address = match s.ab_width {
        AddressWidth::Ab24 => pull_24bits(s).wrapping_add(1),
        AddressWidth::Ab16 => u32::from(pull_word(s).wrapping_add(1)),
    };
    s.reg.set_pc(address);
}

fn op_rti(s: &mut State) {
    let value = pull_byte(s);
    s.reg.set_p(value);
    s.reg.update_flag_5b();
    let address = match s.ab_width {
        AddressWidth::Ab24 => pull_24bits(s),
        AddressWidth::Ab16 => u32::from(pull_word(s)),
    };
    s.reg.set_pc(address);
}

fn op_brk(s: &mut State) {
    let next = s.reg.pc().wrapping_add(1);
    match s.ab_width {
        AddressWidth::Ab24 => push_24bits(s, next),
        AddressWidth::Ab16 => push_word(s, next as u16),
    }
    let status = s.reg.p() | (StatusFlags::BREAK | StatusFlags::UNUSED).bits();
    push_byte(s, status);
    s.reg.set_flag(StatusFlags::INTERRUPT_DISABLE);
    let address = match s.ab_width {
        AddressWidth::Ab24 => get_24bits(s.mem.as_mut(), VECTOR24_BREAK),
        AddressWidth::Ab16 => u32::from(get_word(s.mem.as_mut(), VECTOR_BREAK)),
    };
    s.reg.set_pc(address);
}

fn op_brk_fixed(s: &mut State) {
    op_brk(s);
    // Unlike the NMOS part, the 65c02 clears decimal mode on BRK
    s.reg.clear_flag(StatusFlags::DECIMAL_MODE);
}

fn op_stz(s: &mut State, line: &[u8], opcode: &Opcode) {
    resolve_set_value(s, line, opcode, 0);
}

fn op_halt(s: &mut State) {
    let pc = s.reg.pc();
    // In 16-bit address mode a halt at $0000 rolls back to $FFFF
    let pc = if s.ab_width == AddressWidth::Ab16 && pc == 0 {
        0xFFFF
    } else {
        pc.wrapping_sub(1)
    };
    s.reg.set_pc(pc);
}

fn op_cpu_id(s: &mut State) {
    let capabilities =
        0x0065_0200 | AddressWidth::Ab24 as u32 | RegisterWidth::R24 as u32 | N_THREADS;
    s.reg.set_a(RegisterWidth::R24, capabilities);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cpu::State;
    use crate::memory::FlatMemory;
    use crate::opcodes::OPCODES_NMOS6502;

    fn nmos_state() -> State {
        State::new_nmos6502(Box::new(FlatMemory::new()))
    }

    #[test]
    fn test_transfer_to_sp_leaves_flags() {
        let mut s = nmos_state();
        s.reg.set_x(RegisterWidth::R8, 0x00);
        s.reg.set_p(0x00);
        op_transfer(&mut s, Reg::X, Reg::Sp);
        assert_eq!(s.reg.sp(RegisterWidth::R8), 0x00);
        assert!(!s.reg.flag(StatusFlags::ZERO));
    }

    #[test]
    fn test_transfer_sets_zn() {
        let mut s = nmos_state();
        s.reg.set_a(RegisterWidth::R8, 0x80);
        op_transfer(&mut s, Reg::A, Reg::X);
        assert_eq!(s.reg.x(RegisterWidth::R8), 0x80);
        assert!(s.reg.flag(StatusFlags::NEGATIVE));
        assert!(!s.reg.flag(StatusFlags::ZERO));
    }

    #[test]
    fn test_shift_rol_injects_carry() {
        let mut s = nmos_state();
        s.reg.set_a(RegisterWidth::R8, 0x81);
        s.reg.set_flag(StatusFlags::CARRY);
        let opcode = OPCODES_NMOS6502[0x2A]; // ROL A
        let line = [0x2A, 0x00, 0x00, 0x00];
        op_shift(&mut s, &line, &opcode, true, true);
        assert_eq!(s.reg.a(RegisterWidth::R8), 0x03);
        assert!(s.reg.flag(StatusFlags::CARRY));
    }

    #[test]
    fn test_shift_ror_ejects_low_bit() {
        let mut s = nmos_state();
        s.reg.set_a(RegisterWidth::R8, 0x01);
        let opcode = OPCODES_NMOS6502[0x6A]; // ROR A
        let line = [0x6A, 0x00, 0x00, 0x00];
        op_shift(&mut s, &line, &opcode, false, true);
        assert_eq!(s.reg.a(RegisterWidth::R8), 0x00);
        assert!(s.reg.flag(StatusFlags::CARRY));
        assert!(s.reg.flag(StatusFlags::ZERO));
    }

    #[test]
    fn test_compare_sets_carry_on_greater_or_equal() {
        let mut s = nmos_state();
        s.reg.set_a(RegisterWidth::R8, 0x40);
        s.mem.poke(0x10, 0x30);
        let opcode = OPCODES_NMOS6502[0xC5]; // CMP zeropage
        let line = [0xC5, 0x10, 0x00, 0x00];
        op_compare(&mut s, &line, &opcode, Reg::A);
        assert!(s.reg.flag(StatusFlags::CARRY));
        assert!(!s.reg.flag(StatusFlags::ZERO));
    }

    #[test]
    fn test_stack_push_pull_round_trip() {
        let mut s = nmos_state();
        s.reg.set_sp(RegisterWidth::R8, 0xFF);
        push_word(&mut s, 0x1234);
        assert_eq!(s.reg.sp(RegisterWidth::R8), 0xFD);
        assert_eq!(s.mem.peek(0x01FF), 0x12);
        assert_eq!(s.mem.peek(0x01FE), 0x34);
        assert_eq!(pull_word(&mut s), 0x1234);
        assert_eq!(s.reg.sp(RegisterWidth::R8), 0xFF);
    }

    #[test]
    fn test_push_status_sets_break_and_unused() {
        let mut s = nmos_state();
        s.reg.set_sp(RegisterWidth::R8, 0xFF);
        s.reg.set_p(0x00);
        op_push_status(&mut s);
        assert_eq!(s.mem.peek(0x01FF), 0x30);
    }

    #[test]
    fn test_pull_status_forces_bit5_clears_break() {
        let mut s = nmos_state();
        s.reg.set_sp(RegisterWidth::R8, 0xFE);
        s.mem.poke(0x01FF, 0xDF); // everything but bit 5
        op_pull_status(&mut s);
        assert_eq!(s.reg.p(), 0xEF); // bit 5 in, B out
    }

    #[test]
    fn test_bit_wide_uses_top_bits() {
        let mut s = nmos_state();
        s.r_width = RegisterWidth::R16;
        s.reg.set_a(RegisterWidth::R16, 0xC000);
        s.mem.poke(0x10, 0x00);
        s.mem.poke(0x11, 0xC0);
        let opcode = OPCODES_NMOS6502[0x24]; // BIT zeropage
        let line = [0x24, 0x10, 0x00, 0x00];
        op_bit(&mut s, &line, &opcode);
        assert!(s.reg.flag(StatusFlags::NEGATIVE));
        assert!(s.reg.flag(StatusFlags::OVERFLOW));
        assert!(!s.reg.flag(StatusFlags::ZERO));
    }

    #[test]
    fn test_halt_rolls_pc_in_16_bit_mode() {
        let mut s = nmos_state();
        s.reg.set_pc(0x0000);
        op_halt(&mut s);
        assert_eq!(s.reg.pc(), 0xFFFF);

        s.reg.set_pc(0x0203);
        op_halt(&mut s);
        assert_eq!(s.reg.pc(), 0x0202);
    }

    #[test]
    fn test_cpu_id_capability_word() {
        let mut s = nmos_state();
        op_cpu_id(&mut s);
        assert_eq!(s.reg.a(RegisterWidth::R24), 0x65_0268);
    }
}
