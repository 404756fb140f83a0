// CPU interpreter benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use nescore::{Bus, Cpu};
use std::hint::black_box;

/// A CPU spinning over `program` looped at $8000 via the fallback window
fn cpu_with_loop(program: &[u8]) -> (Cpu, Bus) {
    let mut bus = Bus::new();
    bus.load_program(0x8000, program);
    // Jump back to the top so iterations never run off the program
    let end = 0x8000 + program.len() as u16;
    bus.load_program(end, &[0x4C, 0x00, 0x80]);
    bus.write(0xFFFC, 0x00);
    bus.write(0xFFFD, 0x80);

    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}

fn bench_instruction_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_dispatch");

    group.bench_function("nop", |b| {
        let (mut cpu, mut bus) = cpu_with_loop(&[0xEA; 64]);
        b.iter(|| cpu.step(black_box(&mut bus)));
    });

    group.bench_function("lda_sta_zero_page", |b| {
        let (mut cpu, mut bus) = cpu_with_loop(&[0xA9, 0x42, 0x85, 0x10, 0xA5, 0x10]);
        b.iter(|| cpu.step(black_box(&mut bus)));
    });

    group.bench_function("adc_loop", |b| {
        let (mut cpu, mut bus) = cpu_with_loop(&[0x18, 0x69, 0x01, 0xAA, 0xE8]);
        b.iter(|| cpu.step(black_box(&mut bus)));
    });

    group.bench_function("indexed_indirect_load", |b| {
        let (mut cpu, mut bus) = cpu_with_loop(&[0xA1, 0x40, 0xB1, 0x42]);
        b.iter(|| cpu.step(black_box(&mut bus)));
    });

    group.finish();
}

fn bench_tick_countdown(c: &mut Criterion) {
    c.bench_function("cpu_tick", |b| {
        let (mut cpu, mut bus) = cpu_with_loop(&[0xEA; 16]);
        b.iter(|| cpu.tick(black_box(&mut bus)));
    });
}

fn bench_trace_line(c: &mut Criterion) {
    c.bench_function("cpu_trace", |b| {
        let (cpu, mut bus) = cpu_with_loop(&[0xAD, 0x34, 0x12]);
        b.iter(|| cpu.trace(black_box(&mut bus)));
    });
}

criterion_group!(
    benches,
    bench_instruction_dispatch,
    bench_tick_countdown,
    bench_trace_line
);
criterion_main!(benches);
