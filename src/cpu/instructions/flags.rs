// Flag set/clear instructions

use crate::cpu::{flags, Cpu};

impl Cpu {
    /// CLC - clear carry
    pub(crate) fn clc(&mut self) {
        self.set_flag(flags::CARRY, false);
    }

    /// SEC - set carry
    pub(crate) fn sec(&mut self) {
        self.set_flag(flags::CARRY, true);
    }

    /// CLD - clear decimal mode (a no-op arithmetically on the 2A03)
    pub(crate) fn cld(&mut self) {
        self.set_flag(flags::DECIMAL, false);
    }

    /// SED - set decimal mode (tracked but never honored)
    pub(crate) fn sed(&mut self) {
        self.set_flag(flags::DECIMAL, true);
    }

    /// CLI - clear interrupt disable
    pub(crate) fn cli(&mut self) {
        self.set_flag(flags::INTERRUPT_DISABLE, false);
    }

    /// SEI - set interrupt disable
    pub(crate) fn sei(&mut self) {
        self.set_flag(flags::INTERRUPT_DISABLE, true);
    }

    /// CLV - clear overflow
    pub(crate) fn clv(&mut self) {
        self.set_flag(flags::OVERFLOW, false);
    }
}
