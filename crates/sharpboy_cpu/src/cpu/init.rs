use super::{debug::Debugger, Cpu, InterruptController, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            irq: InterruptController::default(),
            cycles: 0,
            running: true,
            waiting: false,
            last_opcode: 0,
            last_flags: 0,
            debugger: Debugger::default(),
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// Reset the CPU to its power-on state.
    ///
    /// Registers, interrupt state, the cooperative flags and the cycle
    /// counter are restored. Breakpoints and the pause configuration are
    /// left alone since they belong to whoever is debugging the machine.
    pub fn reset(&mut self) {
        self.irq = InterruptController::default();
        self.cycles = 0;
        self.running = true;
        self.waiting = false;
        self.last_opcode = 0;
        self.apply_dmg_boot_state();
    }

    /// Load the register values the DMG boot ROM leaves behind when it
    /// hands control to the cartridge at 0x0100 (per Pan Docs).
    fn apply_dmg_boot_state(&mut self) {
        self.regs = Registers::default();
        self.regs.set_af(0x01B0);
        self.regs.set_bc(0x0013);
        self.regs.set_de(0x00D8);
        self.regs.set_hl(0x014D);
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;
        self.last_flags = self.regs.flags();
    }
}
