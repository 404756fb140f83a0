// Interactive CLI debugger
//
// An auxiliary inspector over the core's public state. The prompt shows
// the instruction about to execute; an empty line single-steps.
//
// Commands:
//
// ```text
// run [N]       run N more instructions (no argument: run until break)
// break <hex>   arm a one-shot breakpoint at the address
// dump <hex>    dump 8 rows of 16 bytes starting at the address
// regs          print the register file
// nmi           inject an NMI before the next instruction
// int           inject an IRQ before the next instruction
// exit          leave the debugger
// ```
//
// Every executed instruction is also appended to the trace writer (when
// one is attached) in the golden-log line format.

use crate::emulator::Emulator;
use std::io::{BufRead, Write};

/// Interactive debugger driving an `Emulator`
pub struct Debugger {
    emulator: Emulator,
    /// Instruction counter value until which execution auto-continues
    run_until: u64,
    /// One-shot breakpoint; cleared when hit
    breakpoint: Option<u16>,
    /// Inject an NMI before the next instruction
    pending_nmi: bool,
    /// Inject an IRQ before the next instruction
    pending_irq: bool,
    /// Trace log sink
    trace_writer: Option<Box<dyn Write>>,
    done: bool,
}

impl Debugger {
    pub fn new(emulator: Emulator) -> Self {
        Debugger {
            emulator,
            run_until: 0,
            breakpoint: None,
            pending_nmi: false,
            pending_irq: false,
            trace_writer: None,
            done: false,
        }
    }

    /// Stream each executed instruction's trace line into `writer`
    pub fn set_trace_writer(&mut self, writer: Box<dyn Write>) {
        self.trace_writer = Some(writer);
    }

    pub fn emulator_mut(&mut self) -> &mut Emulator {
        &mut self.emulator
    }

    /// Run the debugger loop until `exit` or end of input
    pub fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> std::io::Result<()> {
        let mut counter: u64 = 1;

        while !self.done {
            let pc = self.emulator.cpu().pc;

            // A hit breakpoint disarms itself and drops to the prompt
            if self.breakpoint == Some(pc) {
                self.breakpoint = None;
                self.run_until = 0;
                writeln!(output, "break at ${:04X}", pc)?;
            }

            if counter > self.run_until && self.breakpoint.is_none() {
                self.prompt(counter, output, input)?;
            }
            if self.done {
                break;
            }

            if let Some(writer) = &mut self.trace_writer {
                let line = {
                    let (cpu, bus) = self.emulator.cpu_bus_mut();
                    cpu.trace(bus)
                };
                writeln!(writer, "{}", line)?;
            }

            if self.pending_nmi {
                self.pending_nmi = false;
                self.emulator.cpu_mut().nmi();
            }
            if self.pending_irq {
                self.pending_irq = false;
                self.emulator.cpu_mut().irq();
            }

            self.emulator.step_instruction();
            counter += 1;
        }
        Ok(())
    }

    /// Show the prompt and process commands until a step is requested
    fn prompt(
        &mut self,
        counter: u64,
        output: &mut dyn Write,
        input: &mut dyn BufRead,
    ) -> std::io::Result<()> {
        loop {
            let pc = self.emulator.cpu().pc;
            let raw = self.raw_bytes(pc);
            let disassembly = {
                let (cpu, bus) = self.emulator.cpu_bus_mut();
                cpu.disassemble(bus, pc)
            };
            write!(output, "{} ${:04X}: {}   {}> ", counter, pc, raw, disassembly)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                self.done = true;
                return Ok(());
            }
            let command = line.trim();
            if command.is_empty() {
                return Ok(()); // single-step
            }

            self.handle_command(command, counter, output)?;
            if self.done || counter <= self.run_until {
                return Ok(());
            }
        }
    }

    /// Execute one debugger command
    fn handle_command(
        &mut self,
        command: &str,
        counter: u64,
        output: &mut dyn Write,
    ) -> std::io::Result<()> {
        let mut parts = command.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let arg = parts.next();

        match verb {
            "exit" => self.done = true,
            "regs" => self.print_regs(output)?,
            "run" => {
                self.run_until = match arg.and_then(|a| a.parse::<u64>().ok()) {
                    // The prompted instruction counts as the first of the N
                    Some(count) => counter.saturating_add(count).saturating_sub(1),
                    None => u64::MAX,
                };
            }
            "break" => match arg.and_then(|a| u16::from_str_radix(a, 16).ok()) {
                Some(addr) => {
                    self.breakpoint = Some(addr);
                    self.run_until = u64::MAX;
                }
                None => writeln!(output, "usage: break <hex-address>")?,
            },
            "dump" => match arg.and_then(|a| u16::from_str_radix(a, 16).ok()) {
                Some(addr) => self.dump_memory(addr, output)?,
                None => writeln!(output, "usage: dump <hex-address>")?,
            },
            "nmi" => {
                self.pending_nmi = true;
                writeln!(output, "nmi queued")?;
            }
            "int" => {
                self.pending_irq = true;
                writeln!(output, "interrupt queued")?;
            }
            _ => writeln!(output, "unknown command '{}'", command)?,
        }
        Ok(())
    }

    /// The 1-3 raw instruction bytes, padded to 8 columns
    fn raw_bytes(&mut self, pc: u16) -> String {
        let bus = self.emulator.bus_mut();
        let opcode = bus.read(pc);
        let length = crate::cpu::opcodes::OPCODE_TABLE[opcode as usize].bytes as u16;

        let mut raw = format!("{:02X}", opcode);
        for i in 1..3 {
            if i < length {
                raw.push_str(&format!(" {:02X}", bus.read(pc.wrapping_add(i))));
            } else {
                raw.push_str("   ");
            }
        }
        raw
    }

    /// Register dump in the `st: 24 (nv-bdIzc)` style
    fn print_regs(&mut self, output: &mut dyn Write) -> std::io::Result<()> {
        let cpu = self.emulator.cpu();
        let st = cpu.status;
        let flag_letters: String = [
            (0x80, 'N'),
            (0x40, 'V'),
            (0x20, '-'),
            (0x10, 'B'),
            (0x08, 'D'),
            (0x04, 'I'),
            (0x02, 'Z'),
            (0x01, 'C'),
        ]
        .iter()
        .map(|&(mask, letter)| {
            if letter == '-' {
                '-'
            } else if st & mask != 0 {
                letter
            } else {
                letter.to_ascii_lowercase()
            }
        })
        .collect();

        writeln!(
            output,
            "A: {:02X}, X: {:02X}, Y: {:02X}, SP: {:02X}, PC: {:04X}, st: {:02X} ({})",
            cpu.a, cpu.x, cpu.y, cpu.sp, cpu.pc, st, flag_letters
        )
    }

    /// 8 rows of 16 bytes from `addr`
    fn dump_memory(&mut self, addr: u16, output: &mut dyn Write) -> std::io::Result<()> {
        let bus = self.emulator.bus_mut();
        for row in 0..8u16 {
            let base = addr.wrapping_add(row * 16);
            write!(output, "${:04X}: ", base)?;
            for col in 0..16u16 {
                write!(output, "{:02X} ", bus.read(base.wrapping_add(col)))?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}
