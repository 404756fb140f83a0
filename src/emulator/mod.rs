// Emulator module - the tick driver that couples CPU and PPU
//
// One `tick` advances the PPU one dot; every third dot advances the CPU
// one cycle (the NTSC 3:1 ratio). The PPU's VBlank/NMI latch is sampled at
// CPU-cycle granularity and turned into an edge on the CPU's NMI line, so
// the CPU observes it at its next instruction boundary, never
// mid-instruction.

pub mod config;

pub use config::{ControlsConfig, EmulatorConfig, VideoConfig};

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use std::path::Path;

/// PPU dots per CPU cycle (NTSC)
const DOTS_PER_CPU_CYCLE: u8 = 3;

/// The emulator: CPU plus the bus that owns everything else
pub struct Emulator {
    cpu: Cpu,
    bus: Bus,
    /// Dot phase within the current CPU cycle (0..3)
    dot_phase: u8,
    /// The PPU interrupt latch was already turned into an NMI edge
    nmi_edge_sent: bool,
}

impl Emulator {
    pub fn new() -> Self {
        Emulator {
            cpu: Cpu::new(),
            bus: Bus::new(),
            dot_phase: 0,
            nmi_edge_sent: false,
        }
    }

    /// Load an iNES ROM and reset into it
    ///
    /// Fatal on missing/truncated images and on unsupported mappers.
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let cartridge = Cartridge::from_ines_file(path)?;
        self.bus.attach_cartridge(cartridge)?;
        self.reset();
        Ok(())
    }

    /// Load an iNES image already in memory (test harness path)
    pub fn load_rom_bytes(&mut self, data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let cartridge = Cartridge::from_ines_bytes(data)?;
        self.bus.attach_cartridge(cartridge)?;
        self.reset();
        Ok(())
    }

    /// Reset CPU and PPU as if the console reset button was pressed
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.bus.ppu_mut().reset();
        self.dot_phase = 0;
        self.nmi_edge_sent = false;
    }

    /// Advance one PPU dot, and the CPU on every third dot
    pub fn tick(&mut self) {
        self.bus.ppu_mut().tick();

        self.dot_phase += 1;
        if self.dot_phase == DOTS_PER_CPU_CYCLE {
            self.dot_phase = 0;
            self.cpu_cycle();
        }
    }

    /// One CPU cycle: deliver NMI edges, pay DMA stalls, then tick
    fn cpu_cycle(&mut self) {
        if self.bus.ppu().interrupt_pending() {
            if !self.nmi_edge_sent {
                self.cpu.nmi();
                self.nmi_edge_sent = true;
            }
        } else {
            self.nmi_edge_sent = false;
        }

        if self.bus.dma_stall > 0 {
            self.bus.dma_stall -= 1;
        } else {
            self.cpu.tick(&mut self.bus);
        }
    }

    /// Run until the PPU signals a completed frame
    pub fn step_frame(&mut self) {
        loop {
            self.tick();
            if self.bus.ppu_mut().should_draw() {
                break;
            }
        }
    }

    /// Execute one whole CPU instruction and keep the PPU in step
    ///
    /// The debugger's unit of progress: the instruction's full cycle cost
    /// is paid up front and the PPU runs 3 dots per cycle to match.
    pub fn step_instruction(&mut self) -> u8 {
        if self.bus.ppu().interrupt_pending() {
            if !self.nmi_edge_sent {
                self.cpu.nmi();
                self.nmi_edge_sent = true;
            }
        } else {
            self.nmi_edge_sent = false;
        }

        let cost = self.cpu.step(&mut self.bus);
        for _ in 0..cost as u32 * DOTS_PER_CPU_CYCLE as u32 {
            self.bus.ppu_mut().tick();
        }
        cost
    }

    /// The rendered frame: 256x240 RGBA pixels
    pub fn frame(&self) -> &[u32] {
        self.bus.ppu().frame()
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Split borrow for trace/disassembly helpers that read the CPU while
    /// walking the bus
    pub fn cpu_bus_mut(&mut self) -> (&Cpu, &mut Bus) {
        (&self.cpu, &mut self.bus)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::vectors;
    use crate::ppu::{ctrl, DOTS_PER_FRAME};

    /// An emulator spinning on a JMP-to-self at $8000
    fn emulator_with_spin_loop() -> Emulator {
        let mut emulator = Emulator::new();
        emulator.bus_mut().load_program(0x8000, &[0x4C, 0x00, 0x80]);
        emulator.bus_mut().write(vectors::RESET, 0x00);
        emulator.bus_mut().write(vectors::RESET + 1, 0x80);
        emulator.reset();
        emulator
    }

    #[test]
    fn test_three_dots_per_cpu_cycle() {
        let mut emulator = emulator_with_spin_loop();

        let cpu_cycles_before = emulator.cpu().cycles;
        for _ in 0..30 {
            emulator.tick();
        }
        // 30 dots = 10 CPU ticks; the 3-cycle JMP executes on ticks 1, 4,
        // 7 and 10, and each boundary pays its cost up front.
        let elapsed = emulator.cpu().cycles - cpu_cycles_before;
        assert_eq!(elapsed, 12, "four spin-loop iterations started");
    }

    #[test]
    fn test_step_frame_produces_one_frame() {
        let mut emulator = emulator_with_spin_loop();

        emulator.step_frame();
        assert_eq!(emulator.bus().ppu().frame_count(), 1);
        assert_eq!(emulator.frame().len(), 256 * 240);
    }

    #[test]
    fn test_nmi_delivered_on_vblank() {
        // With PPUCTRL bit 7 set, VBlank pushes PC and status
        // (B clear), sets I, and lands on the $FFFA handler.
        let mut emulator = emulator_with_spin_loop();
        // Handler: infinite loop at $9000
        emulator.bus_mut().load_program(0x9000, &[0x4C, 0x00, 0x90]);
        emulator.bus_mut().write(vectors::NMI, 0x00);
        emulator.bus_mut().write(vectors::NMI + 1, 0x90);

        // Enable NMI generation
        emulator.bus_mut().write(0x2000, ctrl::NMI_ENABLE);

        // Run one frame; VBlank starts at scanline 241
        for _ in 0..DOTS_PER_FRAME {
            emulator.tick();
        }

        assert_eq!(
            emulator.cpu().pc & 0xFF00,
            0x9000,
            "CPU is spinning in the NMI handler"
        );
        assert!(
            emulator.cpu().get_flag(crate::cpu::flags::INTERRUPT_DISABLE),
            "I set during the handler"
        );
    }

    #[test]
    fn test_nmi_edge_fires_once_per_vblank() {
        // The handler increments $10 then returns; two frames -> two NMIs
        let mut emulator = emulator_with_spin_loop();
        // INC $10; RTI
        emulator.bus_mut().load_program(0x9000, &[0xE6, 0x10, 0x40]);
        emulator.bus_mut().write(vectors::NMI, 0x00);
        emulator.bus_mut().write(vectors::NMI + 1, 0x90);
        emulator.bus_mut().write(0x2000, ctrl::NMI_ENABLE);

        for _ in 0..2 * DOTS_PER_FRAME {
            emulator.tick();
        }

        assert_eq!(
            emulator.bus_mut().read(0x0010),
            2,
            "exactly one NMI per VBlank"
        );
    }

    #[test]
    fn test_dma_stall_delays_cpu() {
        let mut emulator = emulator_with_spin_loop();

        emulator.bus_mut().write(0x4014, 0x02);
        let cycles_before = emulator.cpu().cycles;

        // 513 stalled CPU cycles = 1539 dots with no CPU progress
        for _ in 0..513 * 3 {
            emulator.tick();
        }
        assert_eq!(emulator.cpu().cycles, cycles_before, "CPU stalled by DMA");

        for _ in 0..30 {
            emulator.tick();
        }
        assert!(emulator.cpu().cycles > cycles_before, "CPU resumes after");
    }
}
