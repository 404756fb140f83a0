//! PPU register file tests: address/scroll latches, PPUDATA strides and
//! buffering, OAM ports, memory mirroring

use super::*;

#[test]
fn test_ppuaddr_two_writes_build_address() {
    let mut ppu = ppu_with_chr_ram();

    vram_write(&mut ppu, 0x2100, 0x42);
    assert_eq!(ppu.nametables[ppu.mirror_nametable_addr(0x2100)], 0x42);
}

#[test]
fn test_ppuaddr_high_write_masks_to_six_bits() {
    let mut ppu = Ppu::new();

    ppu.register_write(6, 0xFF); // only the low 6 bits survive
    ppu.register_write(6, 0x00);
    assert_eq!(ppu.v, 0x3F00);
}

#[test]
fn test_ppudata_increment_by_1() {
    let mut ppu = ppu_with_chr_ram();

    ppu.register_write(6, 0x21);
    ppu.register_write(6, 0x00);
    ppu.register_write(7, 0x11);
    ppu.register_write(7, 0x22);

    assert_eq!(ppu.nametables[ppu.mirror_nametable_addr(0x2100)], 0x11);
    assert_eq!(ppu.nametables[ppu.mirror_nametable_addr(0x2101)], 0x22);
}

#[test]
fn test_ppudata_increment_by_32() {
    // With PPUCTRL bit 2 set, three PPUDATA writes starting
    // at $2100 land in $2100, $2120 and $2140.
    let mut ppu = ppu_with_chr_ram();

    ppu.register_write(0, ctrl::VRAM_INCREMENT_32);
    ppu.register_write(6, 0x21);
    ppu.register_write(6, 0x00);
    ppu.register_write(7, 0xAA);
    ppu.register_write(7, 0xBB);
    ppu.register_write(7, 0xCC);

    assert_eq!(ppu.nametables[ppu.mirror_nametable_addr(0x2100)], 0xAA);
    assert_eq!(ppu.nametables[ppu.mirror_nametable_addr(0x2120)], 0xBB);
    assert_eq!(ppu.nametables[ppu.mirror_nametable_addr(0x2140)], 0xCC);
}

#[test]
fn test_ppudata_reads_are_buffered() {
    let mut ppu = ppu_with_chr_ram();

    vram_write(&mut ppu, 0x2000, 0x55);
    vram_write(&mut ppu, 0x2001, 0x66);

    ppu.register_write(6, 0x20);
    ppu.register_write(6, 0x00);

    // First read returns the stale buffer, then values lag by one
    let _ = ppu.register_read(7);
    assert_eq!(ppu.register_read(7), 0x55);
    assert_eq!(ppu.register_read(7), 0x66);
}

#[test]
fn test_ppudata_palette_reads_are_immediate() {
    let mut ppu = ppu_with_chr_ram();

    vram_write(&mut ppu, 0x3F00, 0x21);

    ppu.register_write(6, 0x3F);
    ppu.register_write(6, 0x00);
    assert_eq!(ppu.register_read(7), 0x21, "palette reads skip the buffer");
}

#[test]
fn test_ppustatus_read_resets_write_latch() {
    let mut ppu = ppu_with_chr_ram();

    // Half-written address pair, then a PPUSTATUS read resets the latch
    ppu.register_write(6, 0x21);
    let _ = ppu.register_read(2);

    vram_write(&mut ppu, 0x2345, 0x99);
    assert_eq!(ppu.nametables[ppu.mirror_nametable_addr(0x2345)], 0x99);
}

#[test]
fn test_ppuscroll_two_write_latch() {
    let mut ppu = Ppu::new();

    ppu.register_write(5, 24); // X
    ppu.register_write(5, 13); // Y
    assert_eq!(ppu.scroll_x, 24);
    assert_eq!(ppu.scroll_y, 13);
}

#[test]
fn test_write_only_registers_read_zero() {
    let mut ppu = Ppu::new();
    ppu.register_write(0, 0xFF);
    ppu.register_write(1, 0xFF);
    ppu.register_write(3, 0x10);
    ppu.register_write(5, 0x20);

    assert_eq!(ppu.register_read(0), 0);
    assert_eq!(ppu.register_read(1), 0);
    assert_eq!(ppu.register_read(3), 0);
    assert_eq!(ppu.register_read(5), 0);
    assert_eq!(ppu.register_read(6), 0);
}

// ========================================
// OAM Ports
// ========================================

#[test]
fn test_oamdata_write_advances_address() {
    let mut ppu = Ppu::new();

    ppu.register_write(3, 0x10);
    ppu.register_write(4, 0xAB);
    ppu.register_write(4, 0xCD);

    assert_eq!(ppu.oam[0x10], 0xAB);
    assert_eq!(ppu.oam[0x11], 0xCD);
    assert_eq!(ppu.oam_addr, 0x12);
}

#[test]
fn test_oamdata_read_does_not_advance() {
    let mut ppu = Ppu::new();
    ppu.oam[0x20] = 0x77;

    ppu.register_write(3, 0x20);
    assert_eq!(ppu.register_read(4), 0x77);
    assert_eq!(ppu.register_read(4), 0x77, "reads leave OAMADDR in place");
}

#[test]
fn test_oamaddr_wraps() {
    let mut ppu = Ppu::new();
    ppu.register_write(3, 0xFF);
    ppu.register_write(4, 0x11);
    ppu.register_write(4, 0x22);

    assert_eq!(ppu.oam[0xFF], 0x11);
    assert_eq!(ppu.oam[0x00], 0x22);
}

// ========================================
// Memory Mirroring
// ========================================

#[test]
fn test_horizontal_nametable_mirroring() {
    let ppu = Ppu::new(); // horizontal by default
    assert_eq!(
        ppu.mirror_nametable_addr(0x2000),
        ppu.mirror_nametable_addr(0x2400)
    );
    assert_eq!(
        ppu.mirror_nametable_addr(0x2800),
        ppu.mirror_nametable_addr(0x2C00)
    );
    assert_ne!(
        ppu.mirror_nametable_addr(0x2000),
        ppu.mirror_nametable_addr(0x2800)
    );
}

#[test]
fn test_vertical_nametable_mirroring() {
    let mut ppu = Ppu::new();
    ppu.mirroring = crate::cartridge::Mirroring::Vertical;

    assert_eq!(
        ppu.mirror_nametable_addr(0x2000),
        ppu.mirror_nametable_addr(0x2800)
    );
    assert_eq!(
        ppu.mirror_nametable_addr(0x2400),
        ppu.mirror_nametable_addr(0x2C00)
    );
    assert_ne!(
        ppu.mirror_nametable_addr(0x2000),
        ppu.mirror_nametable_addr(0x2400)
    );
}

#[test]
fn test_palette_backdrop_mirrors() {
    let ppu = Ppu::new();
    assert_eq!(ppu.mirror_palette_addr(0x3F10), ppu.mirror_palette_addr(0x3F00));
    assert_eq!(ppu.mirror_palette_addr(0x3F14), ppu.mirror_palette_addr(0x3F04));
    assert_ne!(ppu.mirror_palette_addr(0x3F11), ppu.mirror_palette_addr(0x3F01));
}

#[test]
fn test_palette_range_mask() {
    let mut ppu = ppu_with_chr_ram();
    // $3FE0 mirrors down into the 32-byte window
    vram_write(&mut ppu, 0x3FE1, 0x2A);
    assert_eq!(ppu.palette_ram[1], 0x2A);
}
