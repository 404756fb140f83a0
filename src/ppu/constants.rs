// PPU constants (NTSC timing)

/// Screen width in pixels
pub const SCREEN_WIDTH: usize = 256;

/// Screen height in pixels
pub const SCREEN_HEIGHT: usize = 240;

/// Size of one nametable in bytes
pub(super) const NAMETABLE_SIZE: usize = 1024;

/// Bytes per 8x8 tile in a pattern table (two bit planes)
pub(super) const TILE_BYTES: u16 = 16;

/// Size of palette RAM in bytes
pub(super) const PALETTE_SIZE: usize = 32;

/// Dots per scanline, including horizontal blanking
pub const DOTS_PER_SCANLINE: u32 = 341;

/// Scanlines per frame, including vertical blanking
pub const SCANLINES_PER_FRAME: u32 = 262;

/// Total dots per frame: 341 x 262 = 89,342
pub const DOTS_PER_FRAME: u32 = DOTS_PER_SCANLINE * SCANLINES_PER_FRAME;

/// Last visible scanline
pub(super) const LAST_VISIBLE_SCANLINE: u32 = 239;

/// Scanline on which the VBlank flag rises (at dot 1)
pub(super) const VBLANK_SCANLINE: u32 = 241;

/// Pre-render scanline; VBlank and sprite flags clear at dot 1
pub(super) const PRERENDER_SCANLINE: u32 = 261;
