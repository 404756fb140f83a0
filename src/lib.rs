// nescore - NES emulator core library
//
// The core is the 6502 interpreter and the PPU scanline pipeline, joined
// by the bus and driven by the `Emulator` tick loop. The display module
// is a thin host adapter over the core's public surface.

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod debug;
pub mod display;
pub mod emulator;
pub mod input;
pub mod ppu;

// Re-export the main types for convenience
pub use bus::Bus;
pub use cartridge::{Cartridge, INesError, INesHeader, Mapper, MapperError, Mirroring};
pub use cpu::Cpu;
pub use debug::Debugger;
pub use emulator::{Emulator, EmulatorConfig};
pub use input::{Button, ControllerIo};
pub use ppu::Ppu;
