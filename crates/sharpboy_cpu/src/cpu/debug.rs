use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};

use super::{Bus, Cpu, Instruction, Registers};

/// Returned by a breakpoint callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BreakAction {
    /// Keep running.
    #[default]
    Continue,
    /// Enter a blocking pause before the next step.
    Pause,
}

/// Snapshot handed to a breakpoint callback, taken before the instruction runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakpointHit {
    pub pc: u16,
    pub opcode: u8,
    pub regs: Registers,
    pub ime: bool,
    pub cycles: u64,
}

/// Machine state shown while paused.
///
/// The `*_word` fields are speculative reads; `None` means the read faulted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PauseReport {
    pub pc: u16,
    pub opcode: u8,
    pub disassembly: String,
    pub regs: Registers,
    pub if_reg: u8,
    pub ie_reg: u8,
    pub ime: bool,
    pub cycles: u64,
    pub hl_word: Option<u16>,
    pub sp_word: Option<u16>,
    pub sram_word: Option<u16>,
}

fn word(value: Option<u16>) -> String {
    value.map_or_else(|| "????".to_string(), |v| format!("0x{v:04X}"))
}

impl fmt::Display for PauseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: [pc 0x{:04X}] opcode 0x{:02X}: {}",
            self.cycles, self.pc, self.opcode, self.disassembly
        )?;
        writeln!(f, "  {}", self.regs)?;
        writeln!(
            f,
            "  IF=0x{:02X} IE=0x{:02X} IME={}",
            self.if_reg,
            self.ie_reg,
            u8::from(self.ime)
        )?;
        write!(
            f,
            "  (HL)={} (SP)={} (0xA000)={}",
            word(self.hl_word),
            word(self.sp_word),
            word(self.sram_word)
        )
    }
}

/// Blocking hook invoked while single-stepping or after a requested pause.
///
/// Returning from [`PauseHandler::pause`] resumes execution.
pub trait PauseHandler {
    fn pause(&mut self, report: &PauseReport);
}

impl<F: FnMut(&PauseReport)> PauseHandler for F {
    fn pause(&mut self, report: &PauseReport) {
        self(report)
    }
}

/// Prints the report and waits for a line on stdin.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinPause;

impl PauseHandler for StdinPause {
    fn pause(&mut self, report: &PauseReport) {
        let mut stdout = io::stdout().lock();
        // A closed terminal only means nobody is watching; keep running.
        let _ = writeln!(stdout, "{report}");
        let _ = write!(stdout, "-- paused, press enter to continue --");
        let _ = stdout.flush();

        let mut line = String::new();
        if let Err(err) = io::stdin().lock().read_line(&mut line) {
            log::warn!("pause: failed to read stdin: {err}");
        }
    }
}

type BreakpointFn = Box<dyn FnMut(&BreakpointHit) -> BreakAction>;

/// Breakpoints and pause state owned by a [`Cpu`].
pub(super) struct Debugger {
    breakpoints: HashMap<u16, BreakpointFn>,
    single_step: bool,
    break_requested: bool,
    pause_handler: Box<dyn PauseHandler>,
}

impl Default for Debugger {
    fn default() -> Self {
        Self {
            breakpoints: HashMap::new(),
            single_step: false,
            break_requested: false,
            pause_handler: Box::new(StdinPause),
        }
    }
}

impl fmt::Debug for Debugger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut addrs: Vec<_> = self.breakpoints.keys().copied().collect();
        addrs.sort_unstable();
        f.debug_struct("Debugger")
            .field("breakpoints", &addrs)
            .field("single_step", &self.single_step)
            .field("break_requested", &self.break_requested)
            .finish_non_exhaustive()
    }
}

impl Cpu {
    /// Install `callback` at `addr`, replacing any previous one there.
    ///
    /// The callback runs just before the instruction at `addr` executes and
    /// only observes state; it cannot change what the step does.
    pub fn register_breakpoint<F>(&mut self, addr: u16, callback: F)
    where
        F: FnMut(&BreakpointHit) -> BreakAction + 'static,
    {
        self.debugger.breakpoints.insert(addr, Box::new(callback));
    }

    /// Returns whether a breakpoint was registered at `addr`.
    pub fn remove_breakpoint(&mut self, addr: u16) -> bool {
        self.debugger.breakpoints.remove(&addr).is_some()
    }

    pub fn clear_breakpoints(&mut self) {
        self.debugger.breakpoints.clear();
    }

    pub fn has_breakpoint(&self, addr: u16) -> bool {
        self.debugger.breakpoints.contains_key(&addr)
    }

    /// Pause before every instruction while enabled.
    pub fn set_single_step(&mut self, enabled: bool) {
        self.debugger.single_step = enabled;
    }

    pub fn is_single_step(&self) -> bool {
        self.debugger.single_step
    }

    /// Pause once, before the next instruction.
    pub fn break_now(&mut self) {
        self.debugger.break_requested = true;
    }

    pub fn set_pause_handler<H: PauseHandler + 'static>(&mut self, handler: H) {
        self.debugger.pause_handler = Box::new(handler);
    }

    /// Run the pause handler or the breakpoint at `pc`, before execution.
    pub(in crate::cpu) fn run_debug_hooks<B: Bus>(
        &mut self,
        bus: &mut B,
        pc: u16,
        opcode: u8,
        instr: Instruction,
    ) {
        if self.debugger.single_step || self.debugger.break_requested {
            self.debugger.break_requested = false;
            let report = self.pause_report(bus, pc, opcode, instr);
            self.debugger.pause_handler.pause(&report);
            return;
        }

        if self.debugger.breakpoints.is_empty() {
            return;
        }
        let hit = BreakpointHit {
            pc,
            opcode,
            regs: self.regs,
            ime: self.irq.ime(),
            cycles: self.cycles,
        };
        if let Some(callback) = self.debugger.breakpoints.get_mut(&pc) {
            if callback(&hit) == BreakAction::Pause {
                self.debugger.break_requested = true;
            }
        }
    }

    fn pause_report<B: Bus>(
        &self,
        bus: &mut B,
        pc: u16,
        opcode: u8,
        instr: Instruction,
    ) -> PauseReport {
        PauseReport {
            pc,
            opcode,
            disassembly: instr.disassemble(opcode, pc, &self.regs, bus),
            regs: self.regs,
            if_reg: bus.read_if(),
            ie_reg: bus.read_ie(),
            ime: self.irq.ime(),
            cycles: self.cycles,
            hl_word: bus.read16(self.regs.hl()).ok(),
            sp_word: bus.read16(self.regs.sp).ok(),
            sram_word: bus.read16(0xA000).ok(),
        }
    }
}
