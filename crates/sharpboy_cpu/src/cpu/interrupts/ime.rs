use super::InterruptSource;

/// Master interrupt enable plus the delayed EI/DI requests.
///
/// A request arms a countdown of [`InterruptController::LATENCY`] steps. The
/// countdowns tick once per step after the instruction cost is accounted for,
/// and the flag flips when one reaches zero. Enable is applied before
/// disable, so a disable that expires in the same step wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterruptController {
    ime: bool,
    enable_countdown: u8,
    disable_countdown: u8,
    last_serviced: [Option<u64>; 5],
}

impl InterruptController {
    /// Steps between an EI/DI request and the flag changing.
    pub const LATENCY: u8 = 2;

    #[inline]
    pub fn ime(&self) -> bool {
        self.ime
    }

    /// Steps left before a requested enable takes effect; 0 if none pending.
    #[inline]
    pub fn pending_enable(&self) -> u8 {
        self.enable_countdown
    }

    #[inline]
    pub fn pending_disable(&self) -> u8 {
        self.disable_countdown
    }

    pub fn schedule_enable(&mut self) {
        self.enable_countdown = Self::LATENCY;
    }

    pub fn schedule_disable(&mut self) {
        self.disable_countdown = Self::LATENCY;
    }

    /// Set the flag immediately, bypassing the countdowns (RETI, dispatch).
    #[inline]
    pub(in crate::cpu) fn set_ime(&mut self, ime: bool) {
        self.ime = ime;
    }

    /// Advance both countdowns by one step.
    pub(in crate::cpu) fn tick_latency(&mut self) {
        if self.enable_countdown > 0 {
            self.enable_countdown -= 1;
            if self.enable_countdown == 0 {
                self.ime = true;
            }
        }
        if self.disable_countdown > 0 {
            self.disable_countdown -= 1;
            if self.disable_countdown == 0 {
                self.ime = false;
            }
        }
    }

    /// Cycle counter value at which `source` was last dispatched.
    pub fn last_serviced(&self, source: InterruptSource) -> Option<u64> {
        self.last_serviced[source.index()]
    }

    pub(in crate::cpu) fn record_service(&mut self, source: InterruptSource, cycles: u64) {
        self.last_serviced[source.index()] = Some(cycles);
    }
}
