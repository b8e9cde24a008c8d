//! Instruction dispatch and interrupt core for the Sharp LR35902.
//!
//! [`Cpu`] decodes and executes one instruction per [`Cpu::step`] against any
//! [`Bus`], then services pending interrupts. [`Machine`] pairs it with the
//! flat reference bus.

pub mod cpu;
pub mod machine;

pub use cpu::{
    decode, Access, BreakAction, BreakpointHit, Bus, Cpu, CpuError, Flag, Instruction,
    InterruptController, InterruptFlags, InterruptIo, InterruptSource, MemoryFault, MemoryPort,
    PauseHandler, PauseReport, PendingSources, Registers, StdinPause, INTERRUPT_SERVICE_CYCLES,
    WAIT_IDLE_CYCLES,
};
pub use machine::{FlatBus, Machine, RunStats};
