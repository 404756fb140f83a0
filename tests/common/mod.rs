// Shared helpers for the integration suites
//
// Builds minimal NROM images in memory so tests can exercise the public
// load path instead of poking at internals.

#![allow(dead_code)]

use nescore::{Bus, Cartridge, Cpu};

/// Size of one PRG bank (16 KiB)
pub const PRG_BANK: usize = 16 * 1024;

/// Build an iNES NROM image with `program` placed at CPU address `entry`
/// and the reset vector pointing at it
pub fn nrom_image(program: &[u8], entry: u16) -> Vec<u8> {
    let mut prg = vec![0u8; PRG_BANK];

    // A single 16 KiB bank appears at both $8000 and $C000
    let offset = (entry as usize - 0x8000) & (PRG_BANK - 1);
    prg[offset..offset + program.len()].copy_from_slice(program);

    // Reset vector lives at the top of the bank
    prg[PRG_BANK - 4] = (entry & 0xFF) as u8;
    prg[PRG_BANK - 3] = (entry >> 8) as u8;

    let mut image = vec![0u8; 16];
    image[0..4].copy_from_slice(b"NES\x1A");
    image[4] = 1; // one PRG bank
    image[5] = 1; // one CHR bank
    image.extend_from_slice(&prg);
    image.extend(std::iter::repeat(0).take(8 * 1024));
    image
}

/// A CPU and bus reset into `program` at `entry`
pub fn cpu_with_rom(program: &[u8], entry: u16) -> (Cpu, Bus) {
    let cartridge = Cartridge::from_ines_bytes(&nrom_image(program, entry)).unwrap();
    let mut bus = Bus::new();
    bus.attach_cartridge(cartridge).unwrap();

    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}
