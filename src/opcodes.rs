//! The three 256-entry opcode tables: NMOS 6502, CMOS 65c02 and the
//! mythical 65C24T8. Each table is built once and shared by reference;
//! an entry with `cycles == 0` marks an undefined opcode.
//!
//! References:
//!   https://www.masswerk.at/6502/6502_instruction_set.html
//!   http://www.emulator101.com/reference/6502-reference.html
//!   http://www.6502.org/tutorials/65c02opcodes.html

use crate::addressing::AddressingMode;
use crate::operations::{LogicOp, Operation};
use crate::registers::{Reg, StatusFlags};

/// One entry of an opcode table.
#[derive(Clone, Copy, Debug)]
pub struct Opcode {
    pub mnemonic: &'static str,
    /// Instruction length in bytes before any width adjustment.
    pub bytes: u16,
    /// Base cycle count; penalties are added by the engine. Zero means the
    /// opcode is undefined on this part.
    pub cycles: u8,
    /// Width prefixes hold their widths through the next instruction.
    pub is_prefix: bool,
    pub mode: AddressingMode,
    pub op: Operation,
}

impl Opcode {
    const UNDEFINED: Opcode = Opcode {
        mnemonic: "",
        bytes: 0,
        cycles: 0,
        is_prefix: false,
        mode: AddressingMode::Implicit,
        op: Operation::Nop,
    };

    fn new(
        mnemonic: &'static str,
        bytes: u16,
        cycles: u8,
        mode: AddressingMode,
        op: Operation,
    ) -> Self {
        Opcode {
            mnemonic,
            bytes,
            cycles,
            is_prefix: false,
            mode,
            op,
        }
    }

    fn prefix(mnemonic: &'static str, op: Operation) -> Self {
        Opcode {
            mnemonic,
            bytes: 1,
            cycles: 2,
            is_prefix: true,
            mode: AddressingMode::Implicit,
            op,
        }
    }
}

lazy_static! {
    /// The NMOS 6502 matrix: the documented set plus the undocumented
    /// NOP/DOP/TOP/KIL subset. Other undocumented opcodes stay undefined.
    pub static ref OPCODES_NMOS6502: [Opcode; 256] = nmos6502_table();

    /// The WDC/Rockwell 65c02 matrix. Every slot is defined.
    pub static ref OPCODES_CMOS65C02: [Opcode; 256] = cmos65c02_table();

    /// The 65C24T8 matrix: the 65c02 set minus the Rockwell bit ops, plus
    /// the width prefixes and the capability and stack-width opcodes.
    pub static ref OPCODES_65C24T8: [Opcode; 256] = mythical65c24t8_table();
}

fn nmos6502_table() -> [Opcode; 256] {
    use AddressingMode::*;
    use Operation::*;

    let mut t = [Opcode::UNDEFINED; 256];

    t[0x00] = Opcode::new("BRK", 1, 7, Implicit, Brk);
    t[0x4C] = Opcode::new("JMP", 3, 3, Absolute, Jmp);
    t[0x6C] = Opcode::new("JMP", 3, 5, Indirect, Jmp);
    t[0x20] = Opcode::new("JSR", 3, 6, Absolute, Jsr);
    t[0x40] = Opcode::new("RTI", 1, 6, Implicit, Rti);
    t[0x60] = Opcode::new("RTS", 1, 6, Implicit, Rts);

    t[0x48] = Opcode::new("PHA", 1, 3, Implicit, Push(Reg::A));
    t[0x08] = Opcode::new("PHP", 1, 3, Implicit, PushStatus);
    t[0x68] = Opcode::new("PLA", 1, 4, Implicit, Pull(Reg::A));
    t[0x28] = Opcode::new("PLP", 1, 4, Implicit, PullStatus);

    t[0x09] = Opcode::new("ORA", 2, 2, Immediate, Logic(LogicOp::Or));
    t[0x05] = Opcode::new("ORA", 2, 3, ZeroPage, Logic(LogicOp::Or));
    t[0x15] = Opcode::new("ORA", 2, 4, ZeroPageX, Logic(LogicOp::Or));
    t[0x0D] = Opcode::new("ORA", 3, 4, Absolute, Logic(LogicOp::Or));
    t[0x1D] = Opcode::new("ORA", 3, 4, AbsoluteX, Logic(LogicOp::Or)); // Extra cycles
    t[0x19] = Opcode::new("ORA", 3, 4, AbsoluteY, Logic(LogicOp::Or)); // Extra cycles
    t[0x01] = Opcode::new("ORA", 2, 6, IndexedIndirectX, Logic(LogicOp::Or));
    t[0x11] = Opcode::new("ORA", 2, 5, IndirectIndexedY, Logic(LogicOp::Or)); // Extra cycles

    t[0x29] = Opcode::new("AND", 2, 2, Immediate, Logic(LogicOp::And));
    t[0x25] = Opcode::new("AND", 2, 3, ZeroPage, Logic(LogicOp::And));
    t[0x35] = Opcode::new("AND", 2, 4, ZeroPageX, Logic(LogicOp::And));
    t[0x2D] = Opcode::new("AND", 3, 4, Absolute, Logic(LogicOp::And));
    t[0x3D] = Opcode::new("AND", 3, 4, AbsoluteX, Logic(LogicOp::And)); // Extra cycles
    t[0x39] = Opcode::new("AND", 3, 4, AbsoluteY, Logic(LogicOp::And)); // Extra cycles
    t[0x21] = Opcode::new("AND", 2, 6, IndexedIndirectX, Logic(LogicOp::And));
    t[0x31] = Opcode::new("AND", 2, 5, IndirectIndexedY, Logic(LogicOp::And)); // Extra cycles

    t[0x49] = Opcode::new("EOR", 2, 2, Immediate, Logic(LogicOp::Xor));
    t[0x45] = Opcode::new("EOR", 2, 3, ZeroPage, Logic(LogicOp::Xor));
    t[0x55] = Opcode::new("EOR", 2, 4, ZeroPageX, Logic(LogicOp::Xor));
    t[0x4D] = Opcode::new("EOR", 3, 4, Absolute, Logic(LogicOp::Xor));
    t[0x5D] = Opcode::new("EOR", 3, 4, AbsoluteX, Logic(LogicOp::Xor)); // Extra cycles
    t[0x59] = Opcode::new("EOR", 3, 4, AbsoluteY, Logic(LogicOp::Xor)); // Extra cycles
    t[0x41] = Opcode::new("EOR", 2, 6, IndexedIndirectX, Logic(LogicOp::Xor));
    t[0x51] = Opcode::new("EOR", 2, 5, IndirectIndexedY, Logic(LogicOp::Xor)); // Extra cycles

    t[0x69] = Opcode::new("ADC", 2, 2, Immediate, Adc);
    t[0x65] = Opcode::new("ADC", 2, 3, ZeroPage, Adc);
    t[0x75] = Opcode::new("ADC", 2, 4, ZeroPageX, Adc);
    t[0x6D] = Opcode::new("ADC", 3, 4, Absolute, Adc);
    t[0x7D] = Opcode::new("ADC", 3, 4, AbsoluteX, Adc); // Extra cycles
    t[0x79] = Opcode::new("ADC", 3, 4, AbsoluteY, Adc); // Extra cycles
    t[0x61] = Opcode::new("ADC", 2, 6, IndexedIndirectX, Adc);
    t[0x71] = Opcode::new("ADC", 2, 5, IndirectIndexedY, Adc); // Extra cycles

    t[0xE9] = Opcode::new("SBC", 2, 2, Immediate, Sbc);
    t[0xE5] = Opcode::new("SBC", 2, 3, ZeroPage, Sbc);
    t[0xF5] = Opcode::new("SBC", 2, 4, ZeroPageX, Sbc);
    t[0xED] = Opcode::new("SBC", 3, 4, Absolute, Sbc);
    t[0xFD] = Opcode::new("SBC", 3, 4, AbsoluteX, Sbc); // Extra cycles
    t[0xF9] = Opcode::new("SBC", 3, 4, AbsoluteY, Sbc); // Extra cycles
    t[0xE1] = Opcode::new("SBC", 2, 6, IndexedIndirectX, Sbc);
    t[0xF1] = Opcode::new("SBC", 2, 5, IndirectIndexedY, Sbc); // Extra cycles

    t[0x24] = Opcode::new("BIT", 2, 3, ZeroPage, Bit);
    t[0x2C] = Opcode::new("BIT", 3, 4, Absolute, Bit);

    t[0xC9] = Opcode::new("CMP", 2, 2, Immediate, Compare(Reg::A));
    t[0xC5] = Opcode::new("CMP", 2, 3, ZeroPage, Compare(Reg::A));
    t[0xD5] = Opcode::new("CMP", 2, 4, ZeroPageX, Compare(Reg::A));
    t[0xCD] = Opcode::new("CMP", 3, 4, Absolute, Compare(Reg::A));
    t[0xDD] = Opcode::new("CMP", 3, 4, AbsoluteX, Compare(Reg::A)); // Extra cycles
    t[0xD9] = Opcode::new("CMP", 3, 4, AbsoluteY, Compare(Reg::A)); // Extra cycles
    t[0xC1] = Opcode::new("CMP", 2, 6, IndexedIndirectX, Compare(Reg::A));
    t[0xD1] = Opcode::new("CMP", 2, 5, IndirectIndexedY, Compare(Reg::A)); // Extra cycles

    t[0xE0] = Opcode::new("CPX", 2, 2, Immediate, Compare(Reg::X));
    t[0xE4] = Opcode::new("CPX", 2, 3, ZeroPage, Compare(Reg::X));
    t[0xEC] = Opcode::new("CPX", 3, 4, Absolute, Compare(Reg::X));

    t[0xC0] = Opcode::new("CPY", 2, 2, Immediate, Compare(Reg::Y));
    t[0xC4] = Opcode::new("CPY", 2, 3, ZeroPage, Compare(Reg::Y));
    t[0xCC] = Opcode::new("CPY", 3, 4, Absolute, Compare(Reg::Y));

    t[0x2A] = Opcode::new("ROL", 1, 2, Accumulator, Shift { left: true, rotate: true });
    t[0x26] = Opcode::new("ROL", 2, 5, ZeroPage, Shift { left: true, rotate: true });
    t[0x36] = Opcode::new("ROL", 2, 6, ZeroPageX, Shift { left: true, rotate: true });
    t[0x2E] = Opcode::new("ROL", 3, 6, Absolute, Shift { left: true, rotate: true });
    t[0x3E] = Opcode::new("ROL", 3, 7, AbsoluteX, Shift { left: true, rotate: true });

    t[0x6A] = Opcode::new("ROR", 1, 2, Accumulator, Shift { left: false, rotate: true });
    t[0x66] = Opcode::new("ROR", 2, 5, ZeroPage, Shift { left: false, rotate: true });
    t[0x76] = Opcode::new("ROR", 2, 6, ZeroPageX, Shift { left: false, rotate: true });
    t[0x6E] = Opcode::new("ROR", 3, 6, Absolute, Shift { left: false, rotate: true });
    t[0x7E] = Opcode::new("ROR", 3, 7, AbsoluteX, Shift { left: false, rotate: true });

    t[0x0A] = Opcode::new("ASL", 1, 2, Accumulator, Shift { left: true, rotate: false });
    t[0x06] = Opcode::new("ASL", 2, 5, ZeroPage, Shift { left: true, rotate: false });
    t[0x16] = Opcode::new("ASL", 2, 6, ZeroPageX, Shift { left: true, rotate: false });
    t[0x0E] = Opcode::new("ASL", 3, 6, Absolute, Shift { left: true, rotate: false });
    t[0x1E] = Opcode::new("ASL", 3, 7, AbsoluteX, Shift { left: true, rotate: false });

    t[0x4A] = Opcode::new("LSR", 1, 2, Accumulator, Shift { left: false, rotate: false });
    t[0x46] = Opcode::new("LSR", 2, 5, ZeroPage, Shift { left: false, rotate: false });
    t[0x56] = Opcode::new("LSR", 2, 6, ZeroPageX, Shift { left: false, rotate: false });
    t[0x4E] = Opcode::new("LSR", 3, 6, Absolute, Shift { left: false, rotate: false });
    t[0x5E] = Opcode::new("LSR", 3, 7, AbsoluteX, Shift { left: false, rotate: false });

    t[0x38] = Opcode::new("SEC", 1, 2, Implicit, UpdateFlag { flag: StatusFlags::CARRY, value: true });
    t[0xF8] = Opcode::new("SED", 1, 2, Implicit, UpdateFlag { flag: StatusFlags::DECIMAL_MODE, value: true });
    t[0x78] = Opcode::new("SEI", 1, 2, Implicit, UpdateFlag { flag: StatusFlags::INTERRUPT_DISABLE, value: true });
    t[0x18] = Opcode::new("CLC", 1, 2, Implicit, UpdateFlag { flag: StatusFlags::CARRY, value: false });
    t[0xD8] = Opcode::new("CLD", 1, 2, Implicit, UpdateFlag { flag: StatusFlags::DECIMAL_MODE, value: false });
    t[0x58] = Opcode::new("CLI", 1, 2, Implicit, UpdateFlag { flag: StatusFlags::INTERRUPT_DISABLE, value: false });
    t[0xB8] = Opcode::new("CLV", 1, 2, Implicit, UpdateFlag { flag: StatusFlags::OVERFLOW, value: false });

    t[0xE6] = Opcode::new("INC", 2, 5, ZeroPage, IncDec { increment: true });
    t[0xF6] = Opcode::new("INC", 2, 6, ZeroPageX, IncDec { increment: true });
    t[0xEE] = Opcode::new("INC", 3, 6, Absolute, IncDec { increment: true });
    t[0xFE] = Opcode::new("INC", 3, 7, AbsoluteX, IncDec { increment: true });
    t[0xC6] = Opcode::new("DEC", 2, 5, ZeroPage, IncDec { increment: false });
    t[0xD6] = Opcode::new("DEC", 2, 6, ZeroPageX, IncDec { increment: false });
    t[0xCE] = Opcode::new("DEC", 3, 6, Absolute, IncDec { increment: false });
    t[0xDE] = Opcode::new("DEC", 3, 7, AbsoluteX, IncDec { increment: false });
    t[0xE8] = Opcode::new("INX", 1, 2, ImplicitX, IncDec { increment: true });
    t[0xC8] = Opcode::new("INY", 1, 2, ImplicitY, IncDec { increment: true });
    t[0xCA] = Opcode::new("DEX", 1, 2, ImplicitX, IncDec { increment: false });
    t[0x88] = Opcode::new("DEY", 1, 2, ImplicitY, IncDec { increment: false });

    t[0xAA] = Opcode::new("TAX", 1, 2, Implicit, Transfer(Reg::A, Reg::X));
    t[0xA8] = Opcode::new("TAY", 1, 2, Implicit, Transfer(Reg::A, Reg::Y));
    t[0x8A] = Opcode::new("TXA", 1, 2, Implicit, Transfer(Reg::X, Reg::A));
    t[0x98] = Opcode::new("TYA", 1, 2, Implicit, Transfer(Reg::Y, Reg::A));
    t[0x9A] = Opcode::new("TXS", 1, 2, Implicit, Transfer(Reg::X, Reg::Sp));
    t[0xBA] = Opcode::new("TSX", 1, 2, Implicit, Transfer(Reg::Sp, Reg::X));

    t[0xA9] = Opcode::new("LDA", 2, 2, Immediate, Load(Reg::A));
    t[0xA5] = Opcode::new("LDA", 2, 3, ZeroPage, Load(Reg::A));
    t[0xB5] = Opcode::new("LDA", 2, 4, ZeroPageX, Load(Reg::A));
    t[0xAD] = Opcode::new("LDA", 3, 4, Absolute, Load(Reg::A));
    t[0xBD] = Opcode::new("LDA", 3, 4, AbsoluteX, Load(Reg::A)); // Extra cycles
    t[0xB9] = Opcode::new("LDA", 3, 4, AbsoluteY, Load(Reg::A)); // Extra cycles
    t[0xA1] = Opcode::new("LDA", 2, 6, IndexedIndirectX, Load(Reg::A));
    t[0xB1] = Opcode::new("LDA", 2, 5, IndirectIndexedY, Load(Reg::A)); // Extra cycles
    t[0xA2] = Opcode::new("LDX", 2, 2, Immediate, Load(Reg::X));
    t[0xA6] = Opcode::new("LDX", 2, 3, ZeroPage, Load(Reg::X));
    t[0xB6] = Opcode::new("LDX", 2, 4, ZeroPageY, Load(Reg::X));
    t[0xAE] = Opcode::new("LDX", 3, 4, Absolute, Load(Reg::X));
    t[0xBE] = Opcode::new("LDX", 3, 4, AbsoluteY, Load(Reg::X)); // Extra cycles
    t[0xA0] = Opcode::new("LDY", 2, 2, Immediate, Load(Reg::Y));
    t[0xA4] = Opcode::new("LDY", 2, 3, ZeroPage, Load(Reg::Y));
    t[0xB4] = Opcode::new("LDY", 2, 4, ZeroPageX, Load(Reg::Y));
    t[0xAC] = Opcode::new("LDY", 3, 4, Absolute, Load(Reg::Y));
    t[0xBC] = Opcode::new("LDY", 3, 4, AbsoluteX, Load(Reg::Y)); // Extra cycles

    t[0x85] = Opcode::new("STA", 2, 3, ZeroPage, Store(Reg::A));
    t[0x95] = Opcode::new("STA", 2, 4, ZeroPageX, Store(Reg::A));
    t[0x8D] = Opcode::new("STA", 3, 4, Absolute, Store(Reg::A));
    t[0x9D] = Opcode::new("STA", 3, 5, AbsoluteX, Store(Reg::A));
    t[0x99] = Opcode::new("STA", 3, 5, AbsoluteY, Store(Reg::A));
    t[0x81] = Opcode::new("STA", 2, 6, IndexedIndirectX, Store(Reg::A));
    t[0x91] = Opcode::new("STA", 2, 6, IndirectIndexedY, Store(Reg::A));
    t[0x86] = Opcode::new("STX", 2, 3, ZeroPage, Store(Reg::X));
    t[0x96] = Opcode::new("STX", 2, 4, ZeroPageY, Store(Reg::X));
    t[0x8E] = Opcode::new("STX", 3, 4, Absolute, Store(Reg::X));
    t[0x84] = Opcode::new("STY", 2, 3, ZeroPage, Store(Reg::Y));
    t[0x94] = Opcode::new("STY", 2, 4, ZeroPageX, Store(Reg::Y));
    t[0x8C] = Opcode::new("STY", 3, 4, Absolute, Store(Reg::Y));

    t[0x90] = Opcode::new("BCC", 2, 2, Relative, Branch { flag: StatusFlags::CARRY, test: false }); // Extra cycles
    t[0xB0] = Opcode::new("BCS", 2, 2, Relative, Branch { flag: StatusFlags::CARRY, test: true }); // Extra cycles
    t[0xD0] = Opcode::new("BNE", 2, 2, Relative, Branch { flag: StatusFlags::ZERO, test: false }); // Extra cycles
    t[0xF0] = Opcode::new("BEQ", 2, 2, Relative, Branch { flag: StatusFlags::ZERO, test: true }); // Extra cycles
    t[0x10] = Opcode::new("BPL", 2, 2, Relative, Branch { flag: StatusFlags::NEGATIVE, test: false }); // Extra cycles
    t[0x30] = Opcode::new("BMI", 2, 2, Relative, Branch { flag: StatusFlags::NEGATIVE, test: true }); // Extra cycles
    t[0x50] = Opcode::new("BVC", 2, 2, Relative, Branch { flag: StatusFlags::OVERFLOW, test: false }); // Extra cycles
    t[0x70] = Opcode::new("BVS", 2, 2, Relative, Branch { flag: StatusFlags::OVERFLOW, test: true }); // Extra cycles

    t[0xEA] = Opcode::new("NOP", 1, 2, Implicit, Nop);

    // Undocumented opcodes,
    //   see http://bbc.nvg.org/doc/6502OpList.txt
    //   see https://www.nesdev.com/undocumented_opcodes.txt
    for code in [0x1A, 0x3A, 0x5A, 0x7A, 0xDA, 0xFA] {
        t[code] = Opcode::new("NOP", 1, 2, Implicit, Nop);
    }

    t[0x04] = Opcode::new("DOP", 2, 3, Implicit, Nop);
    t[0x14] = Opcode::new("DOP", 2, 4, Implicit, Nop);
    t[0x34] = Opcode::new("DOP", 2, 4, Implicit, Nop);
    t[0x44] = Opcode::new("DOP", 2, 3, Implicit, Nop);
    t[0x54] = Opcode::new("DOP", 2, 4, Implicit, Nop);
    t[0x64] = Opcode::new("DOP", 2, 3, Implicit, Nop);
    t[0x74] = Opcode::new("DOP", 2, 4, Implicit, Nop);
    t[0x80] = Opcode::new("DOP", 2, 2, Implicit, Nop);
    t[0x82] = Opcode::new("DOP", 2, 2, Implicit, Nop);
    t[0x89] = Opcode::new("DOP", 2, 2, Implicit, Nop);
    t[0xC2] = Opcode::new("DOP", 2, 2, Implicit, Nop);
    t[0xD4] = Opcode::new("DOP", 2, 4, Implicit, Nop);
    t[0xE2] = Opcode::new("DOP", 2, 2, Implicit, Nop);
    t[0xF4] = Opcode::new("DOP", 2, 4, Implicit, Nop);

    t[0x0C] = Opcode::new("TOP", 3, 3, Implicit, Nop);
    for code in [0x1C, 0x3C, 0x5C, 0x7C, 0xDC, 0xFC] {
        t[code] = Opcode::new("TOP", 3, 4, Implicit, Nop);
    }

    for code in [
        0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
    ] {
        t[code] = Opcode::new("KIL", 1, 3, Implicit, Halt);
    }

    t
}

/// The 65c02 changes as a sparse overlay on the NMOS table.
fn cmos65c02_delta() -> [Opcode; 256] {
    use AddressingMode::*;
    use Operation::*;

    let mut t = [Opcode::UNDEFINED; 256];

    // Functional differences
    t[0x00] = Opcode::new("BRK", 1, 7, Implicit, BrkFixed);
    t[0x6C] = Opcode::new("JMP", 3, 6, Indirect65c02Fix, Jmp);

    // Fixed BCD flags, one extra cycle in decimal mode
    t[0x69] = Opcode::new("ADC", 2, 2, Immediate, AdcFixed);
    t[0x65] = Opcode::new("ADC", 2, 3, ZeroPage, AdcFixed);
    t[0x75] = Opcode::new("ADC", 2, 4, ZeroPageX, AdcFixed);
    t[0x6D] = Opcode::new("ADC", 3, 4, Absolute, AdcFixed);
    t[0x7D] = Opcode::new("ADC", 3, 4, AbsoluteX, AdcFixed); // Extra cycles
    t[0x79] = Opcode::new("ADC", 3, 4, AbsoluteY, AdcFixed); // Extra cycles
    t[0x61] = Opcode::new("ADC", 2, 6, IndexedIndirectX, AdcFixed);
    t[0x71] = Opcode::new("ADC", 2, 5, IndirectIndexedY, AdcFixed); // Extra cycles
    t[0xE9] = Opcode::new("SBC", 2, 2, Immediate, SbcFixed);
    t[0xE5] = Opcode::new("SBC", 2, 3, ZeroPage, SbcFixed);
    t[0xF5] = Opcode::new("SBC", 2, 4, ZeroPageX, SbcFixed);
    t[0xED] = Opcode::new("SBC", 3, 4, Absolute, SbcFixed);
    t[0xFD] = Opcode::new("SBC", 3, 4, AbsoluteX, SbcFixed); // Extra cycles
    t[0xF9] = Opcode::new("SBC", 3, 4, AbsoluteY, SbcFixed); // Extra cycles
    t[0xE1] = Opcode::new("SBC", 2, 6, IndexedIndirectX, SbcFixed);
    t[0xF1] = Opcode::new("SBC", 2, 5, IndirectIndexedY, SbcFixed); // Extra cycles

    // Read-modify-write on absolute,X drops to 6 cycles but keeps the
    // page-crossing penalty
    t[0x1E] = Opcode::new("ASL", 3, 6, AbsoluteX65c02, Shift { left: true, rotate: false });
    t[0x3E] = Opcode::new("ROL", 3, 6, AbsoluteX65c02, Shift { left: true, rotate: true });
    t[0x5E] = Opcode::new("LSR", 3, 6, AbsoluteX65c02, Shift { left: false, rotate: false });
    t[0x7E] = Opcode::new("ROR", 3, 6, AbsoluteX65c02, Shift { left: false, rotate: true });

    // New addressing modes for existing opcodes
    t[0x12] = Opcode::new("ORA", 2, 5, IndirectZeroPage, Logic(LogicOp::Or));
    t[0x32] = Opcode::new("AND", 2, 5, IndirectZeroPage, Logic(LogicOp::And));
    t[0x52] = Opcode::new("EOR", 2, 5, IndirectZeroPage, Logic(LogicOp::Xor));
    t[0x72] = Opcode::new("ADC", 2, 5, IndirectZeroPage, AdcFixed);
    t[0x92] = Opcode::new("STA", 2, 5, IndirectZeroPage, Store(Reg::A));
    t[0xB2] = Opcode::new("LDA", 2, 5, IndirectZeroPage, Load(Reg::A));
    t[0xD2] = Opcode::new("CMP", 2, 5, IndirectZeroPage, Compare(Reg::A));
    t[0xF2] = Opcode::new("SBC", 2, 5, IndirectZeroPage, SbcFixed);
    t[0x7C] = Opcode::new("JMP", 3, 6, AbsoluteIndexedIndirectX, Jmp);
    t[0x34] = Opcode::new("BIT", 2, 4, ZeroPageX, Bit);
    t[0x3C] = Opcode::new("BIT", 3, 4, AbsoluteX, Bit); // Extra cycles
    t[0x89] = Opcode::new("BIT", 2, 2, Immediate, Bit);

    // New opcodes
    t[0x80] = Opcode::new("BRA", 2, 3, Relative, Jmp); // Extra cycles
    t[0xDA] = Opcode::new("PHX", 1, 3, Implicit, Push(Reg::X));
    t[0x5A] = Opcode::new("PHY", 1, 3, Implicit, Push(Reg::Y));
    t[0xFA] = Opcode::new("PLX", 1, 4, Implicit, Pull(Reg::X));
    t[0x7A] = Opcode::new("PLY", 1, 4, Implicit, Pull(Reg::Y));
    t[0x64] = Opcode::new("STZ", 2, 3, ZeroPage, Stz);
    t[0x74] = Opcode::new("STZ", 2, 4, ZeroPageX, Stz);
    t[0x9C] = Opcode::new("STZ", 3, 4, Absolute, Stz);
    t[0x9E] = Opcode::new("STZ", 3, 5, AbsoluteX, Stz);
    t[0x04] = Opcode::new("TSB", 2, 5, ZeroPage, Tsb);
    t[0x0C] = Opcode::new("TSB", 3, 6, Absolute, Tsb);
    t[0x14] = Opcode::new("TRB", 2, 5, ZeroPage, Trb);
    t[0x1C] = Opcode::new("TRB", 3, 6, Absolute, Trb);
    t[0x1A] = Opcode::new("INC", 1, 2, Accumulator, IncDec { increment: true });
    t[0x3A] = Opcode::new("DEC", 1, 2, Accumulator, IncDec { increment: false });

    // Rockwell bit extensions
    for bit in 0..8u8 {
        let row = usize::from(bit) << 4;
        t[0x07 + row] = Opcode::new(
            RMB_NAMES[usize::from(bit)],
            2,
            5,
            ZeroPage,
            SetMemBit { bit, set: false },
        );
        t[0x87 + row] = Opcode::new(
            SMB_NAMES[usize::from(bit)],
            2,
            5,
            ZeroPage,
            SetMemBit { bit, set: true },
        );
        t[0x0F + row] = Opcode::new(
            BBR_NAMES[usize::from(bit)],
            3,
            5,
            ZeroPageAndRelative,
            BranchOnBit { bit, test: false },
        );
        t[0x8F + row] = Opcode::new(
            BBS_NAMES[usize::from(bit)],
            3,
            5,
            ZeroPageAndRelative,
            BranchOnBit { bit, test: true },
        );
    }

    t
}

const RMB_NAMES: [&str; 8] = ["RMB0", "RMB1", "RMB2", "RMB3", "RMB4", "RMB5", "RMB6", "RMB7"];
const SMB_NAMES: [&str; 8] = ["SMB0", "SMB1", "SMB2", "SMB3", "SMB4", "SMB5", "SMB6", "SMB7"];
const BBR_NAMES: [&str; 8] = ["BBR0", "BBR1", "BBR2", "BBR3", "BBR4", "BBR5", "BBR6", "BBR7"];
const BBS_NAMES: [&str; 8] = ["BBS0", "BBS1", "BBS2", "BBS3", "BBS4", "BBS5", "BBS6", "BBS7"];

/// On the CMOS parts every undefined opcode is a NOP with a documented
/// length and cycle count. The single-byte columns are filled only where
/// still empty so the Rockwell rows survive.
fn add_65c02_nops(t: &mut [Opcode; 256]) {
    use AddressingMode::*;
    use Operation::*;

    for row in (0x00..=0xF0).step_by(0x10) {
        for column in [0x03, 0x07, 0x0B, 0x0F] {
            if t[row + column].cycles == 0 {
                t[row + column] = Opcode::new("NOP", 1, 1, Implicit, Nop);
            }
        }
    }

    for code in [0x02, 0x22, 0x42, 0x62, 0x82, 0xC2, 0xE2] {
        t[code] = Opcode::new("NOP", 2, 2, Immediate, Nop);
    }
    t[0x44] = Opcode::new("NOP", 2, 3, Immediate, Nop);
    for code in [0x54, 0xD4, 0xF4] {
        t[code] = Opcode::new("NOP", 2, 4, Immediate, Nop);
    }
    t[0x5C] = Opcode::new("NOP", 3, 8, Absolute, Nop);
    t[0xDC] = Opcode::new("NOP", 3, 4, Absolute, Nop);
    t[0xFC] = Opcode::new("NOP", 3, 4, Absolute, Nop);
}

fn cmos65c02_table() -> [Opcode; 256] {
    let mut t = nmos6502_table();
    let delta = cmos65c02_delta();
    for i in 0..256 {
        if delta[i].cycles != 0 {
            t[i] = delta[i];
        }
    }
    add_65c02_nops(&mut t);
    t
}

fn mythical65c24t8_table() -> [Opcode; 256] {
    use AddressingMode::Implicit;
    use Operation::*;

    let mut t = nmos6502_table();
    let delta = cmos65c02_delta();
    for i in 0..256 {
        // The Rockwell rows are reclaimed by the extension
        let rockwell = (i & 0x07) == 0x07 || (i & 0x0F) == 0x0F;
        if delta[i].cycles != 0 && !rockwell {
            t[i] = delta[i];
        }
    }
    add_65c02_nops(&mut t);

    t[0x0F] = Opcode::new("CPU", 1, 2, Implicit, CpuId);
    t[0x1F] = Opcode::prefix("R16", R16);
    t[0x2F] = Opcode::prefix("R24", R24);
    t[0x4F] = Opcode::prefix("A24", A24);
    t[0x5F] = Opcode::prefix("W16", W16);
    t[0x6F] = Opcode::prefix("W24", W24);
    t[0xFC] = Opcode::new("SWS", 1, 2, Implicit, Sws);

    t
}
