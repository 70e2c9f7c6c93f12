//! The processor itself: construction, reset, the fetch/dispatch loop,
//! the width/prefix state machine, cycle accounting and persistence.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::trace;

use crate::addressing::{format_line, AddressingMode};
use crate::memory::{get_24bits, get_word, Memory};
use crate::opcodes::{self, Opcode};
use crate::registers::{AddressWidth, RegisterWidth, Registers, StatusFlags};

const MAX_INSTRUCTION_SIZE: usize = 4;

pub const VECTOR_NMI: u32 = 0xFFFA;
pub const VECTOR_RESET: u32 = 0xFFFC;
pub const VECTOR_BREAK: u32 = 0xFFFE;

// The 24-bit parts use 3-byte NMI/RESET/BRK vectors at the top of the
// 24-bit address space
pub const VECTOR24_NMI: u32 = 0xFF_FFF7;
pub const VECTOR24_RESET: u32 = 0xFF_FFFA;
pub const VECTOR24_BREAK: u32 = 0xFF_FFFD;

/// Hardware thread count advertised in the 65C24T8 capability word.
pub(crate) const N_THREADS: u32 = 8;

/// State of the simulated processor.
pub struct State {
    opcodes: &'static [Opcode; 256],
    trace: bool,

    pub(crate) reg: Registers,
    pub(crate) mem: Box<dyn Memory>,
    cycles: u64,

    // Current and maximum address and register widths
    was_prefix: bool,
    pub(crate) ab_width: AddressWidth,
    ab_max_width: AddressWidth,
    pub(crate) r_width: RegisterWidth,
    r_max_width: RegisterWidth,
    pub(crate) s_width: RegisterWidth,

    pub(crate) extra_cycle_crossing_boundaries: bool,
    pub(crate) extra_cycle_branch_taken: bool,
    pub(crate) extra_cycle_bcd: bool,

    // The instruction image is assembled here to avoid an allocation per
    // step
    line_cache: [u8; MAX_INSTRUCTION_SIZE],
}

impl State {
    fn with_table(
        mem: Box<dyn Memory>,
        table: &'static [Opcode; 256],
        ab_max_width: AddressWidth,
        r_max_width: RegisterWidth,
    ) -> State {
        State {
            opcodes: table,
            trace: false,
            reg: Registers::new(),
            mem,
            cycles: 0,
            was_prefix: false,
            ab_width: ab_max_width,
            ab_max_width,
            r_width: RegisterWidth::R8,
            r_max_width,
            s_width: RegisterWidth::R8,
            extra_cycle_crossing_boundaries: false,
            extra_cycle_branch_taken: false,
            extra_cycle_bcd: false,
            line_cache: [0; MAX_INSTRUCTION_SIZE],
        }
    }

    /// Returns an initialized NMOS 6502.
    pub fn new_nmos6502(mem: Box<dyn Memory>) -> State {
        State::with_table(
            mem,
            &opcodes::OPCODES_NMOS6502,
            AddressWidth::Ab16,
            RegisterWidth::R8,
        )
    }

    /// Returns an initialized 65c02.
    pub fn new_cmos_65c02(mem: Box<dyn Memory>) -> State {
        State::with_table(
            mem,
            &opcodes::OPCODES_CMOS65C02,
            AddressWidth::Ab16,
            RegisterWidth::R8,
        )
    }

    /// Returns an initialized (mythical) 65C24T8.
    pub fn new_mythical_65c24t8(mem: Box<dyn Memory>) -> State {
        State::with_table(
            mem,
            &opcodes::OPCODES_65C24T8,
            AddressWidth::Ab24,
            RegisterWidth::R24,
        )
    }

    /// Executes one instruction, including the width fixup and the cycle
    /// accounting.
    pub fn execute_instruction(&mut self) {
        let mut pc = self.reg.pc();
        let opcode_id = self.mem.peek_code(pc);
        let opcode = self.opcodes[usize::from(opcode_id)];

        if opcode.cycles == 0 {
            panic!("Unknown opcode 0x{:02x}", opcode_id);
        }

        // A prefix holds its widths through exactly one real instruction;
        // anything else reverts to the narrow 16/8 defaults before dispatch.
        if !self.was_prefix && !opcode.is_prefix {
            self.ab_width = AddressWidth::Ab16;
            self.r_width = RegisterWidth::R8;
        }
        self.was_prefix = opcode.is_prefix;

        let mut n_bytes = opcode.bytes;
        // One more byte when an opcode carries an address or a long branch
        if self.ab_width == AddressWidth::Ab24
            && (n_bytes >= 3 || opcode.mode == AddressingMode::Relative)
        {
            n_bytes += 1;
        }
        // Wide immediates
        if opcode.mode == AddressingMode::Immediate {
            match self.r_width {
                RegisterWidth::R16 => n_bytes += 1,
                RegisterWidth::R24 => n_bytes += 2,
                RegisterWidth::R8 => {}
            }
        }
        for i in 0..usize::from(n_bytes) {
            self.line_cache[i] = self.mem.peek_code(pc);
            pc += 1;

            // In 16-bit address mode the PC rolls from $FFFF to $0000
            if self.ab_width == AddressWidth::Ab16 && pc == 0x0001_0000 {
                pc = 0;
            }
        }
        self.reg.set_pc(pc);

        let line = self.line_cache;
        let traced = if self.trace {
            Some(format_line(self, &line, &opcode))
        } else {
            None
        };

        opcode.op.execute(self, &line, &opcode);
        self.cycles += u64::from(opcode.cycles);

        // Extra cycles
        if self.extra_cycle_branch_taken {
            self.cycles += 1;
            self.extra_cycle_branch_taken = false;
        }
        if self.extra_cycle_crossing_boundaries {
            self.cycles += 1;
            self.extra_cycle_crossing_boundaries = false;
        }
        if self.extra_cycle_bcd {
            self.cycles += 1;
            self.extra_cycle_bcd = false;
        }

        if let Some(text) = traced {
            trace!(
                "{:#08x} {:<13}: {}, {:02x?} <w{:x}/{:x}>",
                pc.wrapping_sub(u32::from(n_bytes)) & 0x00FF_FFFF,
                text,
                self.reg,
                &line[..usize::from(opcode.bytes)],
                self.ab_width as u8,
                self.r_width as u8,
            );
        }
    }

    /// Resets the processor: the program counter is loaded from the reset
    /// vector ($FFFC, or $FFFFFA on a 24-bit part) and 6 cycles are spent.
    pub fn reset(&mut self) {
        let start_address = match self.ab_max_width {
            AddressWidth::Ab24 => {
                self.ab_width = self.ab_max_width;
                get_24bits(self.mem.as_mut(), VECTOR24_RESET)
            }
            AddressWidth::Ab16 => u32::from(get_word(self.mem.as_mut(), VECTOR_RESET)),
        };
        self.cycles += 6;
        self.reg.set_pc(start_address);
    }

    /// Count of CPU cycles since the last reset.
    pub fn get_cycles(&self) -> u64 {
        self.cycles
    }

    /// Activates tracing of the execution.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn get_trace(&self) -> bool {
        self.trace
    }

    /// Changes the memory provider.
    pub fn set_memory(&mut self, mem: Box<dyn Memory>) {
        self.mem = mem;
    }

    /// Access to the bus for host-side reads and writes between steps.
    pub fn memory_mut(&mut self) -> &mut dyn Memory {
        self.mem.as_mut()
    }

    /// The current program counter and stack pointer.
    pub fn get_pc_sp(&self) -> (u32, u32) {
        (self.reg.pc(), self.reg.sp(self.s_width))
    }

    /// The carry flag and the accumulator, at the current register width.
    pub fn get_carry_and_acc(&self) -> (bool, u32) {
        (self.reg.flag(StatusFlags::CARRY), self.reg.a(self.r_width))
    }

    /// The A, X, Y and P registers.
    pub fn get_axyp(&self) -> (u32, u32, u32, u8) {
        (
            self.reg.a(self.r_width),
            self.reg.x(self.r_width),
            self.reg.y(self.r_width),
            self.reg.p(),
        )
    }

    /// Changes the A, X, Y and P registers.
    pub fn set_axyp(&mut self, reg_a: u32, reg_x: u32, reg_y: u32, reg_p: u8) {
        self.reg.set_a(self.r_width, reg_a);
        self.reg.set_x(self.r_width, reg_x);
        self.reg.set_y(self.r_width, reg_y);
        self.reg.set_p(reg_p);
    }

    /// Changes the program counter, as a JMP instruction would.
    pub fn set_pc(&mut self, pc: u32) {
        self.reg.set_pc(pc);
    }

    pub fn address_width(&self) -> AddressWidth {
        self.ab_width
    }

    pub fn address_max_width(&self) -> AddressWidth {
        self.ab_max_width
    }

    pub fn register_width(&self) -> RegisterWidth {
        self.r_width
    }

    pub fn register_max_width(&self) -> RegisterWidth {
        self.r_max_width
    }

    /// Saves the cycle counter and the A, X, Y and SP registers as a
    /// big-endian stream. P, PC, the widths and memory are not included;
    /// hosts serialize those separately.
    pub fn save<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u64::<BigEndian>(self.cycles)?;
        for word in self.reg.data.iter() {
            writer.write_u32::<BigEndian>(*word)?;
        }
        Ok(())
    }

    /// Loads the state previously written by [`State::save`].
    pub fn load<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        self.cycles = reader.read_u64::<BigEndian>()?;
        for word in self.reg.data.iter_mut() {
            *word = reader.read_u32::<BigEndian>()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::memory::{Flat256KMemory, FlatMemory};

    fn nmos_with_program(program: &[u8]) -> State {
        let mut mem = FlatMemory::new();
        mem.load(0x0600, program);
        mem.load(VECTOR_RESET, &[0x00, 0x06]);
        let mut s = State::new_nmos6502(Box::new(mem));
        s.reset();
        s
    }

    fn cmos_with_program(program: &[u8]) -> State {
        let mut mem = FlatMemory::new();
        mem.load(0x0600, program);
        mem.load(VECTOR_RESET, &[0x00, 0x06]);
        let mut s = State::new_cmos_65c02(Box::new(mem));
        s.reset();
        s
    }

    #[test]
    fn test_lda_immediate() {
        let mut s = nmos_with_program(&[0xA9, 0x42]);
        s.execute_instruction();

        assert_eq!(s.reg.a(RegisterWidth::R8), 0x42);
        assert_eq!(s.reg.pc(), 0x0602);
        assert!(!s.reg.flag(StatusFlags::ZERO));
        assert!(!s.reg.flag(StatusFlags::NEGATIVE));
        assert_eq!(s.get_cycles(), 6 + 2);
    }

    #[test]
    fn test_jmp_absolute() {
        let mut s = nmos_with_program(&[0x4C, 0x34, 0x12]);
        s.execute_instruction();

        assert_eq!(s.reg.pc(), 0x1234);
        assert_eq!(s.get_cycles(), 6 + 3);
    }

    #[test]
    fn test_jsr_rts() {
        let mut s = nmos_with_program(&[0x20, 0x00, 0x10]);
        s.mem.poke(0x1000, 0x60); // RTS
        s.reg.set_sp(RegisterWidth::R8, 0xFF);

        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x1000);
        assert_eq!(s.reg.sp(RegisterWidth::R8), 0xFD);
        assert_eq!(s.mem.peek(0x01FF), 0x06);
        assert_eq!(s.mem.peek(0x01FE), 0x02);

        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x0603);
        assert_eq!(s.reg.sp(RegisterWidth::R8), 0xFF);
    }

    #[test]
    fn test_adc_signed_overflow() {
        // CLC; LDA #$80; ADC #$80
        let mut s = nmos_with_program(&[0x18, 0xA9, 0x80, 0x69, 0x80]);
        s.execute_instruction();
        s.execute_instruction();
        s.execute_instruction();

        assert_eq!(s.reg.a(RegisterWidth::R8), 0x00);
        assert!(s.reg.flag(StatusFlags::CARRY));
        assert!(s.reg.flag(StatusFlags::OVERFLOW));
        assert!(s.reg.flag(StatusFlags::ZERO));
        assert!(!s.reg.flag(StatusFlags::NEGATIVE));
    }

    #[test]
    fn test_bcd_adc_nmos() {
        // SED; LDA #$15; ADC #$27 with C clear
        let mut s = nmos_with_program(&[0xF8, 0xA9, 0x15, 0x69, 0x27]);
        s.execute_instruction();
        s.execute_instruction();
        let before = s.get_cycles();
        s.execute_instruction();

        assert_eq!(s.reg.a(RegisterWidth::R8), 0x42);
        assert!(!s.reg.flag(StatusFlags::CARRY));
        assert!(!s.reg.flag(StatusFlags::ZERO));
        // No BCD penalty on the NMOS part
        assert_eq!(s.get_cycles() - before, 2);
    }

    #[test]
    fn test_bcd_adc_cmos_extra_cycle() {
        let mut s = cmos_with_program(&[0xF8, 0xA9, 0x15, 0x69, 0x27]);
        s.execute_instruction();
        s.execute_instruction();
        let before = s.get_cycles();
        s.execute_instruction();

        assert_eq!(s.reg.a(RegisterWidth::R8), 0x42);
        assert!(!s.reg.flag(StatusFlags::CARRY));
        assert!(!s.reg.flag(StatusFlags::ZERO));
        assert!(!s.reg.flag(StatusFlags::NEGATIVE));
        assert_eq!(s.get_cycles() - before, 3);
    }

    #[test]
    fn test_branch_taken_and_page_cross_penalties() {
        let mut mem = FlatMemory::new();
        // BEQ +4 from $01FD lands on the next page
        mem.load(0x01FD, &[0xF0, 0x04]);
        mem.load(VECTOR_RESET, &[0xFD, 0x01]);
        let mut s = State::new_nmos6502(Box::new(mem));
        s.reset();
        s.reg.set_flag(StatusFlags::ZERO);

        let before = s.get_cycles();
        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x0203);
        assert_eq!(s.get_cycles() - before, 2 + 2);
    }

    #[test]
    fn test_branch_not_taken_stays_at_base_cycles() {
        let mut s = nmos_with_program(&[0xF0, 0x04]);
        let before = s.get_cycles();
        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x0602);
        assert_eq!(s.get_cycles() - before, 2);
    }

    #[test]
    fn test_jmp_indirect_page_wrap_bug() {
        let mut s = nmos_with_program(&[0x6C, 0xFF, 0x02]);
        s.mem.poke(0x02FF, 0x34);
        s.mem.poke(0x0200, 0x12);
        s.mem.poke(0x0300, 0x56);
        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x1234);
    }

    #[test]
    fn test_jmp_indirect_fixed_on_cmos() {
        let mut s = cmos_with_program(&[0x6C, 0xFF, 0x02]);
        s.mem.poke(0x02FF, 0x34);
        s.mem.poke(0x0300, 0x56);
        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x5634);
    }

    #[test]
    fn test_kil_spins_in_place() {
        let mut s = nmos_with_program(&[0x02]);
        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x0600);
        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x0600);
    }

    #[test]
    fn test_brk_pushes_and_loads_vector() {
        let mut s = nmos_with_program(&[0x00]);
        s.mem.poke(VECTOR_BREAK, 0x00);
        s.mem.poke(VECTOR_BREAK + 1, 0x80);
        s.reg.set_sp(RegisterWidth::R8, 0xFF);
        s.execute_instruction();

        assert_eq!(s.reg.pc(), 0x8000);
        assert!(s.reg.flag(StatusFlags::INTERRUPT_DISABLE));
        // PC+1 pushed, then P with B and bit 5 set
        assert_eq!(s.mem.peek(0x01FF), 0x06);
        assert_eq!(s.mem.peek(0x01FE), 0x02);
        assert_eq!(s.mem.peek(0x01FD) & 0x30, 0x30);
    }

    #[test]
    fn test_reset_twice() {
        let mut s = nmos_with_program(&[0xEA]);
        assert_eq!(s.get_cycles(), 6);
        s.reset();
        assert_eq!(s.get_cycles(), 12);
        assert_eq!(s.reg.pc(), 0x0600);
    }

    #[test]
    fn test_cmos_rmb_smb_bbr_bbs() {
        // SMB3 $40; BBS3 $40 +2
        let mut s = cmos_with_program(&[0xB7, 0x40, 0xBF, 0x40, 0x02]);
        s.execute_instruction();
        assert_eq!(s.mem.peek(0x40), 0x08);

        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x0607);

        // RMB3 $40
        let mut s = cmos_with_program(&[0x37, 0x40]);
        s.mem.poke(0x40, 0xFF);
        s.execute_instruction();
        assert_eq!(s.mem.peek(0x40), 0xF7);
    }

    #[test]
    fn test_cmos_trb_tsb() {
        let mut s = cmos_with_program(&[0x04, 0x40, 0x14, 0x40]);
        s.mem.poke(0x40, 0x0F);
        s.reg.set_a(RegisterWidth::R8, 0xF0);

        s.execute_instruction(); // TSB
        assert_eq!(s.mem.peek(0x40), 0xFF);
        assert!(s.reg.flag(StatusFlags::ZERO));

        s.execute_instruction(); // TRB
        assert_eq!(s.mem.peek(0x40), 0x0F);
        assert!(!s.reg.flag(StatusFlags::ZERO));
    }

    #[test]
    fn test_cmos_stz_and_bra() {
        let mut s = cmos_with_program(&[0x9C, 0x40, 0x02, 0x80, 0x02]);
        s.mem.poke(0x0240, 0xAA);

        s.execute_instruction();
        assert_eq!(s.mem.peek(0x0240), 0x00);

        let before = s.get_cycles();
        s.execute_instruction(); // BRA +2
        assert_eq!(s.reg.pc(), 0x0607);
        assert_eq!(s.get_cycles() - before, 3);
    }

    #[test]
    fn test_t8_reset_uses_24_bit_vector() {
        let mut mem = Flat256KMemory::new();
        mem.poke(VECTOR24_RESET, 0xBA);
        mem.poke(VECTOR24_RESET + 1, 0xDC);
        mem.poke(VECTOR24_RESET + 2, 0xFE);
        let mut s = State::new_mythical_65c24t8(Box::new(mem));
        s.reset();
        assert_eq!(s.reg.pc(), 0x00FE_DCBA);
        assert_eq!(s.get_cycles(), 6);
    }

    #[test]
    fn test_t8_prefix_widens_one_instruction() {
        let mut mem = Flat256KMemory::new();
        // A24; LDA $010000; NOP
        mem.load(0x0600, &[0x4F, 0xAD, 0x00, 0x00, 0x01, 0xEA]);
        mem.poke(0x01_0000, 0x77);
        let mut s = State::new_mythical_65c24t8(Box::new(mem));
        s.set_pc(0x0600);

        s.execute_instruction(); // A24
        assert_eq!(s.address_width(), AddressWidth::Ab24);

        s.execute_instruction(); // LDA with a 3-byte operand
        assert_eq!(s.reg.a(RegisterWidth::R8), 0x77);
        assert_eq!(s.reg.pc(), 0x0605);

        s.execute_instruction(); // NOP reverts to the narrow defaults
        assert_eq!(s.address_width(), AddressWidth::Ab16);
        assert_eq!(s.register_width(), RegisterWidth::R8);
    }

    #[test]
    fn test_t8_w24_wide_immediate_and_revert() {
        let mut mem = Flat256KMemory::new();
        // W24; LDA #$123456; NOP
        mem.load(0x0600, &[0x6F, 0xA9, 0x56, 0x34, 0x12, 0xEA]);
        let mut s = State::new_mythical_65c24t8(Box::new(mem));
        s.set_pc(0x0600);

        s.execute_instruction();
        assert_eq!(s.register_width(), RegisterWidth::R24);

        s.execute_instruction();
        assert_eq!(s.reg.a(RegisterWidth::R24), 0x12_3456);
        assert_eq!(s.reg.pc(), 0x0605);
        assert!(!s.reg.flag(StatusFlags::ZERO));

        s.execute_instruction();
        assert_eq!(s.register_width(), RegisterWidth::R8);
        // The widened value survives in storage, masked on read
        assert_eq!(s.reg.a(RegisterWidth::R8), 0x56);
    }

    #[test]
    fn test_t8_consecutive_prefixes_chain() {
        let mut mem = Flat256KMemory::new();
        // A24; R16; LDA #$1234
        mem.load(0x0600, &[0x4F, 0x1F, 0xA9, 0x34, 0x12]);
        let mut s = State::new_mythical_65c24t8(Box::new(mem));
        s.set_pc(0x0600);

        s.execute_instruction();
        s.execute_instruction();
        assert_eq!(s.address_width(), AddressWidth::Ab24);
        assert_eq!(s.register_width(), RegisterWidth::R16);

        s.execute_instruction();
        assert_eq!(s.reg.a(RegisterWidth::R16), 0x1234);
    }

    #[test]
    fn test_t8_pc_rolls_in_16_bit_mode() {
        let mut mem = Flat256KMemory::new();
        mem.poke(0xFFFF, 0xEA); // NOP at the top of the 64K bank
        let mut s = State::new_mythical_65c24t8(Box::new(mem));
        s.set_pc(0xFFFF);
        s.execute_instruction();
        assert_eq!(s.reg.pc(), 0x0000);
    }

    #[test]
    fn test_t8_sws_selects_stack_width() {
        let mut mem = Flat256KMemory::new();
        // R24; SWS; PHA
        mem.load(0x0600, &[0x2F, 0xFC, 0x48]);
        let mut s = State::new_mythical_65c24t8(Box::new(mem));
        s.set_pc(0x0600);
        s.reg.set_sp(RegisterWidth::R24, 0x02_0000);

        s.execute_instruction(); // R24
        s.execute_instruction(); // SWS
        s.execute_instruction(); // PHA, back in R8 but with a flat stack
        assert_eq!(s.reg.sp(RegisterWidth::R24), 0x01_FFFF);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut s = nmos_with_program(&[0xA9, 0x42, 0xAA]);
        s.execute_instruction();
        s.execute_instruction();

        let mut buffer = Vec::new();
        s.save(&mut buffer).unwrap();
        assert_eq!(buffer.len(), 8 + 4 * 4);

        let mut other = State::new_nmos6502(Box::new(FlatMemory::new()));
        other.load(&mut buffer.as_slice()).unwrap();
        assert_eq!(other.get_cycles(), s.get_cycles());
        assert_eq!(other.reg.a(RegisterWidth::R8), 0x42);
        assert_eq!(other.reg.x(RegisterWidth::R8), 0x42);
    }

    #[test]
    fn test_get_set_axyp() {
        let mut s = nmos_with_program(&[0xEA]);
        s.set_axyp(1, 2, 3, 0x30);
        let (a, x, y, p) = s.get_axyp();
        assert_eq!((a, x, y, p), (1, 2, 3, 0x30));
    }

    #[test]
    fn test_penalty_flags_cleared_after_step() {
        let mut s = nmos_with_program(&[0xBD, 0xF8, 0x02]); // LDA $02F8,X
        s.reg.set_x(RegisterWidth::R8, 0x10);
        let before = s.get_cycles();
        s.execute_instruction();
        assert_eq!(s.get_cycles() - before, 5);
        assert!(!s.extra_cycle_crossing_boundaries);
        assert!(!s.extra_cycle_branch_taken);
        assert!(!s.extra_cycle_bcd);
    }

    #[test]
    fn test_inc_absolute_x_has_no_page_cross_penalty() {
        let mut s = nmos_with_program(&[0xFE, 0xF8, 0x02]); // INC $02F8,X
        s.reg.set_x(RegisterWidth::R8, 0x10);
        s.mem.poke(0x0308, 0x41);
        let before = s.get_cycles();
        s.execute_instruction();
        assert_eq!(s.mem.peek(0x0308), 0x42);
        assert_eq!(s.get_cycles() - before, 7);
    }

    #[test]
    fn test_cmos_asl_absolute_x_keeps_page_cross_penalty() {
        let mut s = cmos_with_program(&[0x1E, 0xF8, 0x02]); // ASL $02F8,X
        s.reg.set_x(RegisterWidth::R8, 0x10);
        s.mem.poke(0x0308, 0x01);
        let before = s.get_cycles();
        s.execute_instruction();
        assert_eq!(s.mem.peek(0x0308), 0x02);
        assert_eq!(s.get_cycles() - before, 7);
    }

    #[test]
    fn test_plp_forces_bit_5() {
        let mut s = nmos_with_program(&[0x28]); // PLP
        s.reg.set_sp(RegisterWidth::R8, 0xFE);
        s.mem.poke(0x01FF, 0x00);
        s.execute_instruction();
        assert!(s.reg.flag(StatusFlags::UNUSED));
        assert!(!s.reg.flag(StatusFlags::BREAK));
    }

    #[test]
    fn test_tsx_sets_flags_from_stack_pointer() {
        let mut s = nmos_with_program(&[0xBA]); // TSX
        s.reg.set_sp(RegisterWidth::R8, 0x80);
        s.execute_instruction();
        assert_eq!(s.reg.x(RegisterWidth::R8), 0x80);
        assert!(s.reg.flag(StatusFlags::NEGATIVE));
    }

    #[test]
    #[should_panic(expected = "Unknown opcode")]
    fn test_unknown_opcode_panics() {
        let mut s = nmos_with_program(&[0x03]);
        s.execute_instruction();
    }

    #[test]
    fn test_set_memory_swaps_bus() {
        let mut s = nmos_with_program(&[0xEA]);
        let mut other = FlatMemory::new();
        other.poke(0x1234, 0x99);
        s.set_memory(Box::new(other));
        assert_eq!(s.memory_mut().peek(0x1234), 0x99);
    }
}
