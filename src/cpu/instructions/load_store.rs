// Load and store instructions

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    /// LDA - load accumulator. Flags: Z, N
    pub(crate) fn lda(&mut self, bus: &mut Bus, operand: &AddressingResult) {
        self.a = self.read_operand(bus, operand);
        self.set_zero_negative(self.a);
    }

    /// LDX - load X. Flags: Z, N
    pub(crate) fn ldx(&mut self, bus: &mut Bus, operand: &AddressingResult) {
        self.x = self.read_operand(bus, operand);
        self.set_zero_negative(self.x);
    }

    /// LDY - load Y. Flags: Z, N
    pub(crate) fn ldy(&mut self, bus: &mut Bus, operand: &AddressingResult) {
        self.y = self.read_operand(bus, operand);
        self.set_zero_negative(self.y);
    }

    /// STA - store accumulator
    pub(crate) fn sta(&mut self, bus: &mut Bus, operand: &AddressingResult) {
        bus.write(operand.address, self.a);
    }

    /// STX - store X
    pub(crate) fn stx(&mut self, bus: &mut Bus, operand: &AddressingResult) {
        bus.write(operand.address, self.x);
    }

    /// STY - store Y
    pub(crate) fn sty(&mut self, bus: &mut Bus, operand: &AddressingResult) {
        bus.write(operand.address, self.y);
    }
}
