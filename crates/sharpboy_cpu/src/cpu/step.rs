use super::{decode, Bus, Cpu, CpuError, Instruction, WAIT_IDLE_CYCLES};

impl Cpu {
    /// Execute one instruction (or one idle slot while waiting), then service
    /// interrupts.
    ///
    /// Returns the T-states consumed, interrupt dispatch included. A memory
    /// fault aborts the step where it happened; registers are left as the
    /// failing access left them.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        if self.waiting {
            return self.step_waiting(bus);
        }

        let pc = self.regs.pc;
        let opcode = bus.read8(pc)?;
        self.last_opcode = opcode;
        let instr = decode(opcode);

        self.run_debug_hooks(bus, pc, opcode, instr);
        if log::log_enabled!(log::Level::Trace) {
            self.trace_instruction(bus, pc, opcode, instr);
        }

        self.regs.pc = pc.wrapping_add(1);
        let cycles = self.execute(bus, instr, opcode)?;
        self.add_cycles(cycles);

        if log::log_enabled!(log::Level::Trace) {
            self.trace_flags();
        }

        let service = self.handle_interrupts(bus)?;
        Ok(cycles + service)
    }

    /// HALT idles until any enabled source is requested, even with IME off.
    fn step_waiting<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        if !bus.interrupt_mask().is_empty() {
            self.waiting = false;
        }
        self.add_cycles(WAIT_IDLE_CYCLES);
        let service = self.handle_interrupts(bus)?;
        Ok(WAIT_IDLE_CYCLES + service)
    }

    fn trace_instruction<B: Bus>(&self, bus: &mut B, pc: u16, opcode: u8, instr: Instruction) {
        let text = instr.disassemble(opcode, pc, &self.regs, bus);
        log::trace!(
            "{}: [pc 0x{pc:04X}] opcode 0x{opcode:02X}: {text} ({})",
            self.cycles,
            instr.name()
        );
    }

    fn trace_flags(&mut self) {
        let flags = self.regs.flags();
        if flags != self.last_flags {
            log::trace!(
                "flags: {} (F=0x{:02X} -> 0x{flags:02X})",
                self.regs.flag_string(),
                self.last_flags
            );
            self.last_flags = flags;
        }
    }
}
