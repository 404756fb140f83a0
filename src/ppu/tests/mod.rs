//! PPU test suites
//!
//! Shared helpers for building a PPU wired to a CHR-RAM cartridge so the
//! rendering tests can author pattern data through the public register
//! interface.

mod registers;
mod rendering;

use super::*;
use crate::cartridge::{create_mapper, Cartridge, Mapper};
use std::cell::RefCell;
use std::rc::Rc;

/// A PPU with an NROM CHR-RAM cartridge attached (writable pattern tables)
fn ppu_with_chr_ram() -> Ppu {
    let image = crate::cartridge::tests::build_ines(1, 0, 0x00, 0x00);
    let cartridge = Cartridge::from_ines_bytes(&image).unwrap();
    let mapper: Rc<RefCell<Box<dyn Mapper>>> =
        Rc::new(RefCell::new(create_mapper(cartridge).unwrap()));

    let mut ppu = Ppu::new();
    ppu.set_mapper(mapper);
    ppu
}

/// Write one byte through the PPUADDR/PPUDATA register pair
fn vram_write(ppu: &mut Ppu, addr: u16, data: u8) {
    ppu.register_write(6, (addr >> 8) as u8);
    ppu.register_write(6, (addr & 0xFF) as u8);
    ppu.register_write(7, data);
}

/// Advance the PPU to the given scanline and dot
fn run_to(ppu: &mut Ppu, scanline: u32, dot: u32) {
    while ppu.scanline() != scanline || ppu.scanline_dot() != dot {
        ppu.tick();
    }
}
