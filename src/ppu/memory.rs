// PPU memory access: pattern tables via the mapper, nametables with
// cartridge-selected mirroring, palette RAM with its mirror quirk.

use super::constants::NAMETABLE_SIZE;
use super::Ppu;
use crate::cartridge::Mirroring;

impl Ppu {
    /// Map a nametable address ($2000-$2FFF) into the 2 KiB of physical VRAM
    ///
    /// The address space has room for four tables but the console carries
    /// two; the cartridge decides which pairs alias.
    pub(super) fn mirror_nametable_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let physical = match self.mirroring {
            // $2000=$2400, $2800=$2C00
            Mirroring::Horizontal => table / 2,
            // $2000=$2800, $2400=$2C00
            Mirroring::Vertical => table % 2,
        };

        physical * NAMETABLE_SIZE + offset
    }

    /// Map a palette address into the 32-byte palette RAM
    ///
    /// $3F10/$3F14/$3F18/$3F1C alias $3F00/$3F04/$3F08/$3F0C: sprite
    /// palette entry 0 is the shared backdrop color.
    pub(super) fn mirror_palette_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x001F) as usize;
        if addr >= 16 && addr % 4 == 0 {
            addr - 16
        } else {
            addr
        }
    }

    /// Read from PPU-visible memory ($0000-$3FFF)
    pub(super) fn read_ppu_memory(&self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        match addr {
            // Pattern tables live in cartridge CHR
            0x0000..=0x1FFF => match &self.mapper {
                Some(mapper) => mapper.borrow().ppu_read(addr),
                None => 0,
            },
            0x2000..=0x2FFF => self.nametables[self.mirror_nametable_addr(addr)],
            // $3000-$3EFF mirrors the nametables
            0x3000..=0x3EFF => self.nametables[self.mirror_nametable_addr(addr - 0x1000)],
            0x3F00..=0x3FFF => self.palette_ram[self.mirror_palette_addr(addr)],
            _ => unreachable!(),
        }
    }

    /// Write to PPU-visible memory ($0000-$3FFF)
    pub(super) fn write_ppu_memory(&mut self, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => {
                if let Some(mapper) = &self.mapper {
                    mapper.borrow_mut().ppu_write(addr, data);
                }
            }
            0x2000..=0x2FFF => {
                let index = self.mirror_nametable_addr(addr);
                self.nametables[index] = data;
            }
            0x3000..=0x3EFF => {
                let index = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[index] = data;
            }
            0x3F00..=0x3FFF => {
                let index = self.mirror_palette_addr(addr);
                self.palette_ram[index] = data;
            }
            _ => unreachable!(),
        }
    }
}
