use super::FlatBus;
use crate::cpu::{Cpu, CpuError};

/// Totals for one [`Machine::run`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub steps: u64,
    pub cycles: u64,
    /// The CPU cleared its running flag (STOP) before the step budget ran out.
    pub stopped: bool,
}

/// A CPU wired to a [`FlatBus`].
///
/// Owns both halves and drives the CPU one step at a time. The CPU only ever
/// sees the bus through the `Bus` trait.
#[derive(Debug, Default)]
pub struct Machine {
    pub cpu: Cpu,
    pub bus: FlatBus,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: FlatBus::new(),
        }
    }

    /// Map a ROM image at address 0. PC already starts at 0x0100.
    pub fn load_rom(&mut self, rom: &[u8]) {
        let mapped = self.bus.load_rom(rom);
        log::info!("loaded {mapped} ROM bytes");
    }

    /// Reset the CPU to its power-on state. Memory is left as it is.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    #[inline]
    pub fn step(&mut self) -> Result<u32, CpuError> {
        self.cpu.step(&mut self.bus)
    }

    /// Step until `max_steps` have run or the CPU stops itself.
    ///
    /// An error aborts the run; the steps completed before it are lost from
    /// the returned totals but still visible in the CPU's counter.
    pub fn run(&mut self, max_steps: u64) -> Result<RunStats, CpuError> {
        let mut stats = RunStats::default();

        while stats.steps < max_steps && self.cpu.is_running() {
            let cycles = self.step()?;
            stats.steps += 1;
            stats.cycles += u64::from(cycles);
        }

        stats.stopped = !self.cpu.is_running();
        log::debug!(
            "run finished: steps={} cycles={} stopped={}",
            stats.steps,
            stats.cycles,
            stats.stopped
        );
        Ok(stats)
    }
}
