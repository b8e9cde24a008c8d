use super::super::{Bus, Cpu, CpuError, InterruptSource, INTERRUPT_SERVICE_CYCLES};

impl Cpu {
    /// End-of-step interrupt processing.
    ///
    /// Ticks the EI/DI latency, then, if IME is set, dispatches every source
    /// pending at this point in priority order. Each dispatch is a forced
    /// call that costs [`INTERRUPT_SERVICE_CYCLES`]. IME is left cleared.
    ///
    /// Returns the T-states spent on dispatch, already added to the counter.
    pub(in crate::cpu) fn handle_interrupts<B: Bus>(
        &mut self,
        bus: &mut B,
    ) -> Result<u32, CpuError> {
        self.irq.tick_latency();
        if !self.irq.ime() {
            return Ok(0);
        }

        let pending = bus.interrupt_mask();
        if pending.is_empty() {
            return Ok(0);
        }

        let mut cycles = 0;
        for source in pending.sources() {
            self.service_interrupt(bus, source)?;
            cycles += INTERRUPT_SERVICE_CYCLES;
        }
        self.irq.set_ime(false);
        Ok(cycles)
    }

    fn service_interrupt<B: Bus>(
        &mut self,
        bus: &mut B,
        source: InterruptSource,
    ) -> Result<(), CpuError> {
        let pc = self.regs.pc;
        // A faulted push leaves the request pending.
        self.push_u16(bus, pc)?;
        self.regs.pc = source.vector();
        bus.acknowledge_interrupt(source);
        self.add_cycles(INTERRUPT_SERVICE_CYCLES);
        self.irq.record_service(source, self.cycles);

        log::debug!(
            "interrupt {}: vector=0x{:04X} pc=0x{:04X} sp=0x{:04X} IF=0x{:02X} IE=0x{:02X}",
            source.name(),
            source.vector(),
            pc,
            self.regs.sp,
            bus.read_if(),
            bus.read_ie(),
        );
        Ok(())
    }
}
