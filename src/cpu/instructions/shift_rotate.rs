// Shift and rotate instructions
//
// Each comes in an accumulator form and a read-modify-write memory form;
// the dispatcher passes which one the opcode selected.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::{flags, Cpu};

impl Cpu {
    /// ASL - arithmetic shift left. C takes bit 7. Flags: C, Z, N
    pub(crate) fn asl(&mut self, bus: &mut Bus, operand: &AddressingResult, accumulator: bool) {
        let value = self.read_operand(bus, operand);
        self.set_flag(flags::CARRY, value & 0x80 != 0);
        let result = value << 1;
        self.set_zero_negative(result);
        self.write_shift_result(bus, operand, accumulator, result);
    }

    /// LSR - logical shift right. C takes bit 0; N always clears
    pub(crate) fn lsr(&mut self, bus: &mut Bus, operand: &AddressingResult, accumulator: bool) {
        let value = self.read_operand(bus, operand);
        self.set_flag(flags::CARRY, value & 0x01 != 0);
        let result = value >> 1;
        self.set_zero_negative(result);
        self.write_shift_result(bus, operand, accumulator, result);
    }

    /// ROL - rotate left through carry. Flags: C, Z, N
    pub(crate) fn rol(&mut self, bus: &mut Bus, operand: &AddressingResult, accumulator: bool) {
        let value = self.read_operand(bus, operand);
        let carry_in = self.get_flag(flags::CARRY) as u8;
        self.set_flag(flags::CARRY, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.set_zero_negative(result);
        self.write_shift_result(bus, operand, accumulator, result);
    }

    /// ROR - rotate right through carry. Flags: C, Z, N
    pub(crate) fn ror(&mut self, bus: &mut Bus, operand: &AddressingResult, accumulator: bool) {
        let value = self.read_operand(bus, operand);
        let carry_in = (self.get_flag(flags::CARRY) as u8) << 7;
        self.set_flag(flags::CARRY, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.set_zero_negative(result);
        self.write_shift_result(bus, operand, accumulator, result);
    }

    fn write_shift_result(
        &mut self,
        bus: &mut Bus,
        operand: &AddressingResult,
        accumulator: bool,
        result: u8,
    ) {
        if accumulator {
            self.a = result;
        } else {
            bus.write(operand.address, result);
        }
    }
}
