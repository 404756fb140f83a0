// Debug module - interactive CLI debugger over the emulator core

mod debugger;

pub use debugger::Debugger;
