mod alu;
mod bus;
mod debug;
mod decode;
mod disasm;
mod error;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;

pub use bus::{Access, Bus, InterruptIo, MemoryFault, MemoryPort};
pub use debug::{BreakAction, BreakpointHit, PauseHandler, PauseReport, StdinPause};
pub use decode::{decode, Instruction};
pub use error::CpuError;
pub use interrupts::{InterruptController, InterruptFlags, InterruptSource, PendingSources};
pub use regs::{Flag, Registers};

use debug::Debugger;

/// T-states charged for each forced call made while servicing an interrupt.
pub const INTERRUPT_SERVICE_CYCLES: u32 = 20;

/// T-states charged for a step spent in the wait (HALT) state.
pub const WAIT_IDLE_CYCLES: u32 = 4;

/// Sharp LR35902 CPU core.
///
/// Owns the register file, the interrupt controller, the cycle counter and
/// the debug hooks. Memory and I/O are reached through a [`Bus`] passed to
/// [`Cpu::step`] by the owning machine.
#[derive(Debug)]
pub struct Cpu {
    pub regs: Registers,
    irq: InterruptController,
    /// Elapsed T-states since construction or the last reset.
    cycles: u64,
    /// Cleared by STOP or [`Cpu::stop`]. The driver decides what to do with it.
    running: bool,
    /// Set by HALT or [`Cpu::wait`]; cleared once any interrupt is pending.
    waiting: bool,
    last_opcode: u8,
    /// F as seen after the previous step, used for flag-change tracing.
    last_flags: u8,
    debugger: Debugger,
}

impl Cpu {
    /// Total T-states elapsed since power-on or the last [`Cpu::reset`].
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Opcode fetched by the most recent step.
    #[inline]
    pub fn last_opcode(&self) -> u8 {
        self.last_opcode
    }

    /// Current value of the master interrupt enable flag.
    #[inline]
    pub fn ime(&self) -> bool {
        self.irq.ime()
    }

    #[inline]
    pub fn interrupts(&self) -> &InterruptController {
        &self.irq
    }

    /// Cycle counter value at which `source` was last serviced, if ever.
    pub fn last_serviced(&self, source: InterruptSource) -> Option<u64> {
        self.irq.last_serviced(source)
    }

    /// Schedule the master interrupt flag to turn on after two steps.
    pub fn enable_interrupts(&mut self) {
        self.irq.schedule_enable();
    }

    /// Schedule the master interrupt flag to turn off after two steps.
    pub fn disable_interrupts(&mut self) {
        self.irq.schedule_disable();
    }

    /// Request that the driver stop calling [`Cpu::step`].
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Enter the wait state until an interrupt becomes pending.
    pub fn wait(&mut self) {
        self.waiting = true;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    #[inline]
    fn add_cycles(&mut self, cycles: u32) {
        debug_assert!(
            self.cycles.checked_add(u64::from(cycles)).is_some(),
            "cycle counter overflow"
        );
        self.cycles = self.cycles.wrapping_add(u64::from(cycles));
    }
}

#[cfg(test)]
mod tests;
