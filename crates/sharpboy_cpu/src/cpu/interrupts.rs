mod ime;
mod poll;
mod service;

use bitflags::bitflags;

pub use ime::InterruptController;
pub use poll::PendingSources;

bitflags! {
    /// Interrupt request/enable bits as laid out in IF (`0xFF0F`) and IE (`0xFFFF`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 0x01;
        const LCD_STAT = 0x02;
        const TIMER = 0x04;
        const SERIAL = 0x08;
        const JOYPAD = 0x10;
    }
}

/// One of the five maskable interrupt sources, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterruptSource {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl InterruptSource {
    /// All sources, highest priority first.
    pub const ALL: [InterruptSource; 5] = [
        InterruptSource::VBlank,
        InterruptSource::LcdStat,
        InterruptSource::Timer,
        InterruptSource::Serial,
        InterruptSource::Joypad,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn flag(self) -> InterruptFlags {
        InterruptFlags::from_bits_truncate(1 << self.index())
    }

    /// Address of the service routine the forced call jumps to.
    #[inline]
    pub const fn vector(self) -> u16 {
        0x0040 + 8 * self.index() as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            InterruptSource::VBlank => "VBlank",
            InterruptSource::LcdStat => "LCD STAT",
            InterruptSource::Timer => "Timer",
            InterruptSource::Serial => "Serial",
            InterruptSource::Joypad => "Joypad",
        }
    }
}

impl InterruptFlags {
    /// Sources whose bit is set, in priority order.
    pub fn sources(self) -> PendingSources {
        PendingSources::new(self)
    }
}
