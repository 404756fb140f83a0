// Mappers module - cartridge mapper factory
//
// Each mapper implements the `Mapper` trait and handles the address routing
// for one cartridge hardware type. Only NROM (Mapper 0) is implemented;
// every other mapper number is rejected at load time.

mod nrom;

pub use nrom::Nrom;

use super::{Cartridge, Mapper};

/// Error type for mapper creation
#[derive(Debug)]
pub enum MapperError {
    /// The requested mapper number is not supported
    UnsupportedMapper(u8),
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapperError::UnsupportedMapper(num) => {
                write!(f, "mapper {} is not supported", num)
            }
        }
    }
}

impl std::error::Error for MapperError {}

/// Create the mapper implementation for a loaded cartridge
///
/// The mapper number comes from the iNES header. Unsupported numbers are a
/// fatal load-time error.
///
/// # Errors
///
/// Returns `MapperError::UnsupportedMapper` for any mapper other than 0.
pub fn create_mapper(cartridge: Cartridge) -> Result<Box<dyn Mapper>, MapperError> {
    match cartridge.header.mapper {
        0 => Ok(Box::new(Nrom::new(cartridge))),
        num => Err(MapperError::UnsupportedMapper(num)),
    }
}
