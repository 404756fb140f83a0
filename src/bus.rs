// Bus module - CPU-visible address decoder
//
// The bus owns everything the CPU can reach and routes each access by
// address range:
//
// ```text
// $0000-$1FFF  2 KiB internal RAM, mirrored (address & $07FF)
// $2000-$3FFF  PPU registers, mirrored every 8 bytes (address & $0007)
// $4000-$401F  APU/IO: $4014 OAM DMA, $4016/$4017 joypads, rest stubbed
// $4020-$FFFF  cartridge, dispatched through the mapper
// ```
//
// Unmapped reads return 0 and unmapped writes drop; the APU register file
// accepts traffic without synthesizing anything.
//
// With no cartridge attached the cartridge window falls back to a flat
// writable buffer, which is what the debugger's raw-program loading and
// the test suites run against.

use crate::cartridge::{create_mapper, Cartridge, Mapper, MapperError};
use crate::input::ControllerIo;
use crate::ppu::Ppu;
use std::cell::RefCell;
use std::rc::Rc;

/// CPU cycles an OAM DMA transfer steals from the CPU
const OAM_DMA_STALL: u16 = 513;

/// Size of the fallback buffer covering $4020-$FFFF
const FALLBACK_SIZE: usize = 0x10000 - 0x4020;

/// The CPU-visible bus: RAM, PPU, controller ports and the cartridge
pub struct Bus {
    /// 2 KiB internal RAM
    ram: [u8; 2048],
    /// PPU, reached through $2000-$3FFF and the $4014 DMA port
    ppu: Ppu,
    /// Joypad register file at $4016/$4017
    controllers: ControllerIo,
    /// Cartridge mapper; shared with the PPU for pattern-table access
    mapper: Option<Rc<RefCell<Box<dyn Mapper>>>>,
    /// Flat cartridge-window memory used while no mapper is attached
    fallback: Vec<u8>,
    /// CPU cycles still owed for an in-flight OAM DMA
    pub(crate) dma_stall: u16,
}

impl Bus {
    /// Create a bus with no cartridge attached
    pub fn new() -> Self {
        Bus {
            ram: [0; 2048],
            ppu: Ppu::new(),
            controllers: ControllerIo::new(),
            mapper: None,
            fallback: vec![0; FALLBACK_SIZE],
            dma_stall: 0,
        }
    }

    /// Attach a loaded cartridge, selecting its mapper
    ///
    /// The mapper is shared with the PPU so pattern-table fetches reach
    /// the cartridge CHR banks.
    ///
    /// # Errors
    ///
    /// Fails for mapper numbers this core does not implement.
    pub fn attach_cartridge(&mut self, cartridge: Cartridge) -> Result<(), MapperError> {
        let mapper: Rc<RefCell<Box<dyn Mapper>>> =
            Rc::new(RefCell::new(create_mapper(cartridge)?));
        self.ppu.set_mapper(Rc::clone(&mapper));
        self.mapper = Some(mapper);
        Ok(())
    }

    /// Read one byte from the CPU address space
    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => self.ppu.register_read(addr & 0x0007),
            0x4016 => self.controllers.read_joypad1(),
            0x4017 => self.controllers.read_joypad2(),
            // APU registers and the IO test range read as 0
            0x4000..=0x401F => 0,
            0x4020..=0xFFFF => match &self.mapper {
                Some(mapper) => mapper.borrow().cpu_read(addr),
                None => self.fallback[(addr - 0x4020) as usize],
            },
        }
    }

    /// Write one byte to the CPU address space
    pub fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = data,
            0x2000..=0x3FFF => self.ppu.register_write(addr & 0x0007, data),
            0x4014 => self.oam_dma(data),
            0x4016 => self.controllers.write_strobe(data),
            // Remaining APU/IO registers accept and drop writes
            0x4000..=0x401F => {}
            0x4020..=0xFFFF => match &self.mapper {
                Some(mapper) => mapper.borrow_mut().cpu_write(addr, data),
                None => self.fallback[(addr - 0x4020) as usize] = data,
            },
        }
    }

    /// OAM DMA ($4014): copy CPU page `data << 8` into sprite memory
    ///
    /// The transfer stalls the CPU for 513 cycles, charged through
    /// `dma_stall` by the tick driver.
    fn oam_dma(&mut self, page: u8) {
        let base = (page as u16) << 8;
        for offset in 0..256u16 {
            let value = self.read(base + offset);
            self.ppu.write_oam(offset as u8, value);
        }
        self.dma_stall += OAM_DMA_STALL;
    }

    /// Load raw bytes at an address (debugger path; no cartridge needed)
    pub fn load_program(&mut self, addr: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.write(addr.wrapping_add(i as u16), byte);
        }
    }

    /// Read a little-endian word (debugger convenience)
    pub fn read_u16(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerIo {
        &mut self.controllers
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
