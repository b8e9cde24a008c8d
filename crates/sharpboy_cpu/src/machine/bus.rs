use std::ops::RangeInclusive;

use super::{MEMORY_SIZE, ROM_WINDOW};
use crate::cpu::{InterruptIo, InterruptSource, MemoryFault, MemoryPort};

const IF_ADDR: u16 = 0xFF0F;
const IE_ADDR: u16 = 0xFFFF;

/// Flat 64 KiB memory with the two interrupt registers.
///
/// Every address is plain RAM except IF (`0xFF0F`) and IE (`0xFFFF`), and any
/// range marked with [`FlatBus::unmap`], which faults on access.
#[derive(Clone, Debug)]
pub struct FlatBus {
    memory: Vec<u8>,
    /// Lower five bits only; reads OR in the unused upper bits.
    if_reg: u8,
    ie_reg: u8,
    unmapped: Vec<RangeInclusive<u16>>,
}

impl Default for FlatBus {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatBus {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE],
            // The DMG boot ROM leaves a VBlank request behind.
            if_reg: 0x01,
            ie_reg: 0x00,
            unmapped: Vec::new(),
        }
    }

    /// Copy a ROM image to address 0. Anything past 32 KiB is dropped.
    ///
    /// Returns the number of bytes mapped.
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        let len = rom.len().min(ROM_WINDOW);
        if len < rom.len() {
            log::warn!(
                "ROM is {} bytes; only the first {ROM_WINDOW} are mapped",
                rom.len()
            );
        }
        self.memory[..len].copy_from_slice(&rom[..len]);
        len
    }

    /// Make every access inside `range` fault.
    pub fn unmap(&mut self, range: RangeInclusive<u16>) {
        self.unmapped.push(range);
    }

    /// Remove all unmapped ranges.
    pub fn map_all(&mut self) {
        self.unmapped.clear();
    }

    pub fn is_mapped(&self, addr: u16) -> bool {
        !self.unmapped.iter().any(|range| range.contains(&addr))
    }

    /// Raise the request bit of `source` in IF, as a peripheral would.
    pub fn request_interrupt(&mut self, source: InterruptSource) {
        self.if_reg |= source.flag().bits();
    }

    /// Read a byte, ignoring unmapped ranges. No side effects.
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            IF_ADDR => 0xE0 | self.if_reg,
            IE_ADDR => self.ie_reg,
            _ => self.memory[usize::from(addr)],
        }
    }

    /// Write a byte, ignoring unmapped ranges.
    pub fn poke(&mut self, addr: u16, value: u8) {
        match addr {
            IF_ADDR => self.if_reg = value & 0x1F,
            IE_ADDR => self.ie_reg = value,
            _ => self.memory[usize::from(addr)] = value,
        }
    }

    /// Write `bytes` starting at `addr`, wrapping at the top of memory.
    pub fn poke_slice(&mut self, addr: u16, bytes: &[u8]) {
        let mut addr = addr;
        for &byte in bytes {
            self.poke(addr, byte);
            addr = addr.wrapping_add(1);
        }
    }
}

impl MemoryPort for FlatBus {
    fn read8(&mut self, addr: u16) -> Result<u8, MemoryFault> {
        if !self.is_mapped(addr) {
            return Err(MemoryFault::read(addr));
        }
        Ok(self.peek(addr))
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<(), MemoryFault> {
        if !self.is_mapped(addr) {
            return Err(MemoryFault::write(addr));
        }
        self.poke(addr, value);
        Ok(())
    }
}

impl InterruptIo for FlatBus {
    fn read_if(&self) -> u8 {
        self.peek(IF_ADDR)
    }

    fn read_ie(&self) -> u8 {
        self.ie_reg
    }

    fn acknowledge_interrupt(&mut self, source: InterruptSource) {
        self.if_reg &= !source.flag().bits();
    }
}
