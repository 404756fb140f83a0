// Fetch/decode/execute, interrupt servicing, disassembly and trace logging

use crate::bus::Bus;
use crate::cpu::addressing::{AddressingMode, AddressingResult};
use crate::cpu::opcodes::{OpcodeInfo, OPCODE_TABLE};
use crate::cpu::{flags, Cpu};

/// Cycles consumed by an NMI or IRQ entry sequence
const INTERRUPT_CYCLES: u8 = 7;

impl Cpu {
    /// Execute one instruction (or service a pending interrupt) atomically
    ///
    /// Returns the total cycle cost: base cycles, plus the page-crossing
    /// penalty for eligible opcodes, plus branch-taken cycles.
    pub fn step(&mut self, bus: &mut Bus) -> u8 {
        // Interrupts are honored only here, at the instruction boundary.
        if let Some(vector) = self.take_interrupt() {
            let cost = self.service_interrupt(bus, vector);
            self.cycles = self.cycles.wrapping_add(cost as u64);
            return cost;
        }

        let opcode = bus.read(self.pc);
        let info = &OPCODE_TABLE[opcode as usize];
        self.pc = self.pc.wrapping_add(1);

        let operand = self.resolve_operand(bus, info.mode);
        let extra = self.execute_instruction(opcode, bus, &operand);

        let mut cost = info.cycles;
        // Branch rows never carry page_cycle; their penalty comes back
        // through `extra` instead.
        if info.page_cycle && operand.page_crossed {
            cost += 1;
        }
        cost += extra;

        self.cycles = self.cycles.wrapping_add(cost as u64);
        cost
    }

    /// Hardware interrupt entry: push PC and status (B clear), set I,
    /// load the handler address from the vector
    fn service_interrupt(&mut self, bus: &mut Bus, vector: u16) -> u8 {
        self.stack_push_u16(bus, self.pc);
        self.stack_push(bus, (self.status & !flags::BREAK) | flags::RESERVED);
        self.set_flag(flags::INTERRUPT_DISABLE, true);
        self.pc = self.read_u16(bus, vector);
        INTERRUPT_CYCLES
    }

    /// Run the addressing-mode resolver for the decoded instruction
    fn resolve_operand(&mut self, bus: &mut Bus, mode: AddressingMode) -> AddressingResult {
        match mode {
            AddressingMode::Implied => self.addr_implied(),
            AddressingMode::Accumulator => self.addr_accumulator(),
            AddressingMode::Immediate => self.addr_immediate(),
            AddressingMode::ZeroPage => self.addr_zero_page(bus),
            AddressingMode::ZeroPageX => self.addr_zero_page_x(bus),
            AddressingMode::ZeroPageY => self.addr_zero_page_y(bus),
            AddressingMode::Relative => self.addr_relative(bus),
            AddressingMode::Absolute => self.addr_absolute(bus),
            AddressingMode::AbsoluteX => self.addr_absolute_x(bus),
            AddressingMode::AbsoluteY => self.addr_absolute_y(bus),
            AddressingMode::Indirect => self.addr_indirect(bus),
            AddressingMode::IndexedIndirect => self.addr_indexed_indirect(bus),
            AddressingMode::IndirectIndexed => self.addr_indirect_indexed(bus),
        }
    }

    /// Operation dispatch; returns extra cycles (branches only)
    #[allow(clippy::too_many_lines)]
    fn execute_instruction(&mut self, opcode: u8, bus: &mut Bus, operand: &AddressingResult) -> u8 {
        match opcode {
            // Load/store
            0xA9 | 0xA5 | 0xB5 | 0xAD | 0xBD | 0xB9 | 0xA1 | 0xB1 => self.lda(bus, operand),
            0xA2 | 0xA6 | 0xB6 | 0xAE | 0xBE => self.ldx(bus, operand),
            0xA0 | 0xA4 | 0xB4 | 0xAC | 0xBC => self.ldy(bus, operand),
            0x85 | 0x95 | 0x8D | 0x9D | 0x99 | 0x81 | 0x91 => self.sta(bus, operand),
            0x86 | 0x96 | 0x8E => self.stx(bus, operand),
            0x84 | 0x94 | 0x8C => self.sty(bus, operand),

            // Arithmetic
            0x69 | 0x65 | 0x75 | 0x6D | 0x7D | 0x79 | 0x61 | 0x71 => self.adc(bus, operand),
            0xE9 | 0xE5 | 0xF5 | 0xED | 0xFD | 0xF9 | 0xE1 | 0xF1 | 0xEB => self.sbc(bus, operand),
            0xE6 | 0xF6 | 0xEE | 0xFE => self.inc(bus, operand),
            0xC6 | 0xD6 | 0xCE | 0xDE => self.dec(bus, operand),
            0xE8 => self.inx(),
            0xC8 => self.iny(),
            0xCA => self.dex(),
            0x88 => self.dey(),

            // Logic
            0x29 | 0x25 | 0x35 | 0x2D | 0x3D | 0x39 | 0x21 | 0x31 => self.and(bus, operand),
            0x09 | 0x05 | 0x15 | 0x0D | 0x1D | 0x19 | 0x01 | 0x11 => self.ora(bus, operand),
            0x49 | 0x45 | 0x55 | 0x4D | 0x5D | 0x59 | 0x41 | 0x51 => self.eor(bus, operand),
            0x24 | 0x2C => self.bit(bus, operand),

            // Shifts and rotates
            0x0A => self.asl(bus, operand, true),
            0x06 | 0x16 | 0x0E | 0x1E => self.asl(bus, operand, false),
            0x4A => self.lsr(bus, operand, true),
            0x46 | 0x56 | 0x4E | 0x5E => self.lsr(bus, operand, false),
            0x2A => self.rol(bus, operand, true),
            0x26 | 0x36 | 0x2E | 0x3E => self.rol(bus, operand, false),
            0x6A => self.ror(bus, operand, true),
            0x66 | 0x76 | 0x6E | 0x7E => self.ror(bus, operand, false),

            // Compare
            0xC9 | 0xC5 | 0xD5 | 0xCD | 0xDD | 0xD9 | 0xC1 | 0xD1 => self.cmp(bus, operand),
            0xE0 | 0xE4 | 0xEC => self.cpx(bus, operand),
            0xC0 | 0xC4 | 0xCC => self.cpy(bus, operand),

            // Branches return their taken/page-cross cycles
            0x90 => return self.bcc(operand),
            0xB0 => return self.bcs(operand),
            0xF0 => return self.beq(operand),
            0x30 => return self.bmi(operand),
            0xD0 => return self.bne(operand),
            0x10 => return self.bpl(operand),
            0x50 => return self.bvc(operand),
            0x70 => return self.bvs(operand),

            // Jumps and subroutines
            0x4C | 0x6C => self.jmp(operand),
            0x20 => self.jsr(bus, operand),
            0x60 => self.rts(bus),

            // Stack
            0x48 => self.pha(bus),
            0x68 => self.pla(bus),
            0x08 => self.php(bus),
            0x28 => self.plp(bus),
            0x9A => self.txs(),
            0xBA => self.tsx(),

            // Transfers
            0xAA => self.tax(),
            0xA8 => self.tay(),
            0x8A => self.txa(),
            0x98 => self.tya(),

            // Flags
            0x18 => self.clc(),
            0x38 => self.sec(),
            0xD8 => self.cld(),
            0xF8 => self.sed(),
            0x58 => self.cli(),
            0x78 => self.sei(),
            0xB8 => self.clv(),

            // Interrupts
            0x00 => self.brk(bus),
            0x40 => self.rti(bus),

            // Undocumented
            0xA3 | 0xA7 | 0xAF | 0xB3 | 0xB7 | 0xBF => self.lax(bus, operand),
            0x83 | 0x87 | 0x8F | 0x97 => self.sax(bus, operand),
            0xC3 | 0xC7 | 0xCF | 0xD3 | 0xD7 | 0xDB | 0xDF => self.dcp(bus, operand),

            // Everything else, documented or not, is a NOP; the resolver
            // already consumed any operand bytes.
            _ => self.nop(),
        }
        0
    }

    // ========================================
    // Disassembly and trace logging
    // ========================================

    /// Disassemble the instruction at `addr` into "MNEMONIC operand" text
    ///
    /// Reads only the instruction bytes, so CPU state is untouched and no
    /// operand target (which could be a live register) is dereferenced.
    pub fn disassemble(&self, bus: &mut Bus, addr: u16) -> String {
        let opcode = bus.read(addr);
        let info = &OPCODE_TABLE[opcode as usize];
        let byte1 = bus.read(addr.wrapping_add(1));
        let byte2 = bus.read(addr.wrapping_add(2));
        let word = u16::from_le_bytes([byte1, byte2]);

        let operand = match info.mode {
            AddressingMode::Implied => String::new(),
            AddressingMode::Accumulator => "A".to_string(),
            AddressingMode::Immediate => format!("#${:02X}", byte1),
            AddressingMode::ZeroPage => format!("${:02X}", byte1),
            AddressingMode::ZeroPageX => format!("${:02X},X", byte1),
            AddressingMode::ZeroPageY => format!("${:02X},Y", byte1),
            AddressingMode::Absolute => format!("${:04X}", word),
            AddressingMode::AbsoluteX => format!("${:04X},X", word),
            AddressingMode::AbsoluteY => format!("${:04X},Y", word),
            AddressingMode::Indirect => format!("(${:04X})", word),
            AddressingMode::IndexedIndirect => format!("(${:02X},X)", byte1),
            AddressingMode::IndirectIndexed => format!("(${:02X}),Y", byte1),
            AddressingMode::Relative => {
                let target = addr
                    .wrapping_add(2)
                    .wrapping_add(byte1 as i8 as u16);
                format!("${:04X}", target)
            }
        };

        if operand.is_empty() {
            info.mnemonic.to_string()
        } else {
            format!("{} {}", info.mnemonic, operand)
        }
    }

    /// Build one golden-log trace line for the instruction at PC
    ///
    /// ```text
    /// PCPC  BB BB BB  MNE operand           A:AA X:XX Y:YY P:PP SP:SS
    /// ```
    ///
    /// The raw bytes are padded to 8 columns and the disassembly to
    /// column 48; registers print in uppercase hex.
    pub fn trace(&self, bus: &mut Bus) -> String {
        let opcode = bus.read(self.pc);
        let info: &OpcodeInfo = &OPCODE_TABLE[opcode as usize];

        let mut raw = format!("{:02X}", opcode);
        for i in 1..3u16 {
            if i < info.bytes as u16 {
                raw.push_str(&format!(" {:02X}", bus.read(self.pc.wrapping_add(i))));
            } else {
                raw.push_str("   ");
            }
        }

        let disassembly = self.disassemble(bus, self.pc);
        let mut line = format!("{:04X}  {}  {}", self.pc, raw, disassembly);
        while line.len() < 48 {
            line.push(' ');
        }
        line.push_str(&format!(
            "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
            self.a, self.x, self.y, self.status, self.sp
        ));
        line
    }
}
