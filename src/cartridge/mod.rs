// Cartridge module - iNES ROM loading and mapper dispatch
//
// A cartridge is created by parsing an iNES image (16-byte header followed by
// PRG-ROM and CHR-ROM banks). The mapper number selects the concrete mapper
// implementation that routes CPU and PPU accesses into those banks.
//
// # iNES layout
//
// ```text
// off  size  meaning
// 0    4     "NES\x1A" magic
// 4    1     PRG-ROM size in 16 KiB units
// 5    1     CHR-ROM size in 8 KiB units
// 6    1     flags6: mapper low nibble, mirroring, battery, trainer
// 7    1     flags7: mapper high nibble
// 8-15       ignored by this core
// 16..       [512-byte trainer if flagged] PRG-ROM bytes, then CHR-ROM bytes
// ```

pub mod mappers;

pub use mappers::{create_mapper, MapperError};

use log::info;
use std::fs;
use std::path::Path;

/// Size of the iNES header in bytes
const HEADER_SIZE: usize = 16;

/// Size of one PRG-ROM bank (16 KiB)
const PRG_BANK_SIZE: usize = 16 * 1024;

/// Size of one CHR-ROM bank (8 KiB)
const CHR_BANK_SIZE: usize = 8 * 1024;

/// Size of the optional trainer block
const TRAINER_SIZE: usize = 512;

/// Nametable mirroring arrangement, selected by the cartridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    /// $2000=$2400, $2800=$2C00 (vertical scrolling layouts)
    Horizontal,
    /// $2000=$2800, $2400=$2C00 (horizontal scrolling layouts)
    Vertical,
}

/// Error type for iNES image loading
#[derive(Debug)]
pub enum INesError {
    /// The file could not be read
    Io(std::io::Error),
    /// The image does not start with "NES\x1A"
    BadMagic,
    /// The image is shorter than its header declares
    Truncated { expected: usize, actual: usize },
}

impl std::fmt::Display for INesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            INesError::Io(err) => write!(f, "failed to read ROM file: {}", err),
            INesError::BadMagic => write!(f, "not an iNES image (bad magic)"),
            INesError::Truncated { expected, actual } => {
                write!(
                    f,
                    "truncated iNES image: header declares {} bytes, file has {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for INesError {}

impl From<std::io::Error> for INesError {
    fn from(err: std::io::Error) -> Self {
        INesError::Io(err)
    }
}

/// Parsed 16-byte iNES header
///
/// Only the fields this core needs are decoded; bytes 8-15 are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct INesHeader {
    /// PRG-ROM size in 16 KiB units
    pub prg_banks: u8,
    /// CHR-ROM size in 8 KiB units (0 means the cartridge uses 8 KiB CHR-RAM)
    pub chr_banks: u8,
    /// Mapper number: high nibble of flags7 | low nibble of flags6
    pub mapper: u8,
    /// Nametable mirroring from flags6 bit 0
    pub mirroring: Mirroring,
    /// A 512-byte trainer precedes the PRG-ROM (flags6 bit 2)
    pub has_trainer: bool,
}

impl INesHeader {
    /// Parse the first 16 bytes of an iNES image
    pub fn parse(data: &[u8]) -> Result<Self, INesError> {
        if data.len() < HEADER_SIZE || &data[0..4] != b"NES\x1A" {
            return Err(INesError::BadMagic);
        }

        let flags6 = data[6];
        let flags7 = data[7];

        Ok(INesHeader {
            prg_banks: data[4],
            chr_banks: data[5],
            mapper: (flags6 >> 4) | (flags7 & 0xF0),
            mirroring: if flags6 & 0x01 != 0 {
                Mirroring::Vertical
            } else {
                Mirroring::Horizontal
            },
            has_trainer: flags6 & 0x04 != 0,
        })
    }
}

/// A loaded cartridge: header plus raw PRG/CHR banks
///
/// The cartridge owns the ROM buffers; a `Mapper` built from it decides how
/// CPU and PPU addresses land in them.
pub struct Cartridge {
    /// Parsed header
    pub header: INesHeader,
    /// PRG-ROM data (`prg_banks` * 16 KiB)
    pub prg_rom: Vec<u8>,
    /// CHR-ROM data, or 8 KiB of zeroed CHR-RAM when `chr_banks` is 0
    pub chr_rom: Vec<u8>,
    /// CHR memory is RAM (writable) rather than ROM
    pub chr_is_ram: bool,
}

impl Cartridge {
    /// Load a cartridge from an iNES file on disk
    ///
    /// # Errors
    ///
    /// Returns `INesError` when the file is missing, not an iNES image, or
    /// shorter than its header declares. All are fatal at load time.
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, INesError> {
        let data = fs::read(path.as_ref())?;
        let cartridge = Self::from_ines_bytes(&data)?;
        info!(
            "loaded {}: mapper {}, {} x 16K PRG, {} x 8K CHR, {:?} mirroring",
            path.as_ref().display(),
            cartridge.header.mapper,
            cartridge.header.prg_banks,
            cartridge.header.chr_banks,
            cartridge.header.mirroring,
        );
        Ok(cartridge)
    }

    /// Load a cartridge from an in-memory iNES image
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, INesError> {
        let header = INesHeader::parse(data)?;

        let prg_size = header.prg_banks as usize * PRG_BANK_SIZE;
        let chr_size = header.chr_banks as usize * CHR_BANK_SIZE;

        // The trainer, when present, sits between the header and PRG-ROM.
        let prg_start = HEADER_SIZE + if header.has_trainer { TRAINER_SIZE } else { 0 };
        let chr_start = prg_start + prg_size;

        let expected = chr_start + chr_size;
        if data.len() < expected {
            return Err(INesError::Truncated {
                expected,
                actual: data.len(),
            });
        }

        let prg_rom = data[prg_start..prg_start + prg_size].to_vec();

        // chr_banks == 0 declares CHR-RAM; allocate a writable 8 KiB bank.
        let (chr_rom, chr_is_ram) = if header.chr_banks == 0 {
            (vec![0; CHR_BANK_SIZE], true)
        } else {
            (data[chr_start..chr_start + chr_size].to_vec(), false)
        };

        Ok(Cartridge {
            header,
            prg_rom,
            chr_rom,
            chr_is_ram,
        })
    }

    /// Nametable mirroring selected by the header
    pub fn mirroring(&self) -> Mirroring {
        self.header.mirroring
    }
}

/// Mapper capability set
///
/// A mapper routes the cartridge windows of the CPU address space
/// ($4020-$FFFF) and the PPU pattern-table space ($0000-$1FFF) into the
/// cartridge's ROM banks. Kept minimal so banked mappers (MMC1, UxROM) can
/// be added without touching the bus.
pub trait Mapper {
    /// Read from the CPU-visible cartridge window
    fn cpu_read(&self, addr: u16) -> u8;

    /// Write to the CPU-visible cartridge window
    fn cpu_write(&mut self, addr: u16, data: u8);

    /// Read from the PPU-visible pattern-table window
    fn ppu_read(&self, addr: u16) -> u8;

    /// Write to the PPU-visible pattern-table window
    fn ppu_write(&mut self, addr: u16, data: u8);

    /// Nametable mirroring this cartridge selects
    fn mirroring(&self) -> Mirroring;
}
