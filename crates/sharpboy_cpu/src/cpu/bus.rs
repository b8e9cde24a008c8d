use std::fmt;

use thiserror::Error;

use super::{InterruptFlags, InterruptSource};

/// Kind of access that triggered a [`MemoryFault`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Raised by a [`MemoryPort`] when an address cannot be accessed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("memory fault: {access} at 0x{addr:04X}")]
pub struct MemoryFault {
    pub addr: u16,
    pub access: Access,
}

impl MemoryFault {
    pub fn read(addr: u16) -> Self {
        Self {
            addr,
            access: Access::Read,
        }
    }

    pub fn write(addr: u16) -> Self {
        Self {
            addr,
            access: Access::Write,
        }
    }
}

/// Byte and word access to the 16-bit address space.
///
/// Word accessors are little-endian and default to two byte accesses, with
/// the address of the high byte wrapping at 0xFFFF.
pub trait MemoryPort {
    fn read8(&mut self, addr: u16) -> Result<u8, MemoryFault>;
    fn write8(&mut self, addr: u16, value: u8) -> Result<(), MemoryFault>;

    fn read16(&mut self, addr: u16) -> Result<u16, MemoryFault> {
        let lo = self.read8(addr)?;
        let hi = self.read8(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    fn write16(&mut self, addr: u16, value: u16) -> Result<(), MemoryFault> {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo)?;
        self.write8(addr.wrapping_add(1), hi)
    }
}

/// Interrupt registers of the I/O subsystem.
///
/// The CPU observes request bits here but never raises them; peripherals
/// (PPU, timer, serial, joypad) own that side.
pub trait InterruptIo {
    /// Raw IF register (`0xFF0F`), for diagnostics.
    fn read_if(&self) -> u8;

    /// Raw IE register (`0xFFFF`), for diagnostics.
    fn read_ie(&self) -> u8;

    /// Sources that are both requested and enabled.
    fn interrupt_mask(&self) -> InterruptFlags {
        InterruptFlags::from_bits_truncate(self.read_if() & self.read_ie())
    }

    /// Clear the request bit of a source after the CPU dispatched it.
    fn acknowledge_interrupt(&mut self, source: InterruptSource);
}

/// Everything the CPU needs from the machine it runs in.
pub trait Bus: MemoryPort + InterruptIo {}

impl<T: MemoryPort + InterruptIo> Bus for T {}
