// nescore - entry point
//
// Usage:
//   nescore <rom.nes>                     run in a window
//   nescore --debug <rom.nes>             interactive CLI debugger
//   nescore --debug --trace <log> <rom>   debugger, streaming a trace log

use nescore::debug::Debugger;
use nescore::display;
use nescore::emulator::{config::CONFIG_FILE, Emulator, EmulatorConfig};
use std::fs::File;
use std::io::{self, BufWriter};

struct Args {
    rom: String,
    debug: bool,
    trace: Option<String>,
}

fn parse_args() -> Option<Args> {
    let mut rom = None;
    let mut debug = false;
    let mut trace = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debug" => debug = true,
            "--trace" => trace = Some(args.next()?),
            _ => rom = Some(arg),
        }
    }

    Some(Args {
        rom: rom?,
        debug,
        trace,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let Some(args) = parse_args() else {
        eprintln!("usage: nescore [--debug] [--trace <log-file>] <rom.nes>");
        std::process::exit(2);
    };

    let config = EmulatorConfig::load_or_default(CONFIG_FILE);

    let mut emulator = Emulator::new();
    emulator.load_rom(&args.rom)?;

    if args.debug {
        let mut debugger = Debugger::new(emulator);
        if let Some(trace_path) = &args.trace {
            let writer = BufWriter::new(File::create(trace_path)?);
            debugger.set_trace_writer(Box::new(writer));
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        debugger.run(&mut input, &mut output)?;
    } else {
        display::run_emulator(emulator, config)?;
    }

    Ok(())
}
