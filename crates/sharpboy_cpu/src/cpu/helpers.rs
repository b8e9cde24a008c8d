use super::{Cpu, Flag, MemoryFault, MemoryPort};

impl Cpu {
    /// Read an 8-bit register or (HL) by its 3-bit opcode index.
    ///
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        index: u8,
    ) -> Result<u8, MemoryFault> {
        Ok(match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => mem.read8(self.regs.hl())?,
            _ => self.regs.a,
        })
    }

    /// Write an 8-bit register or (HL) by index; same encoding as `read_reg8`.
    #[inline]
    pub(super) fn write_reg8<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        index: u8,
        value: u8,
    ) -> Result<(), MemoryFault> {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => mem.write8(self.regs.hl(), value)?,
            _ => self.regs.a = value,
        }
        Ok(())
    }

    /// 16-bit pair by the 2-bit `rp` field: BC, DE, HL, SP.
    #[inline]
    pub(super) fn read_rp(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_rp(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    /// Fetch the byte at PC and advance PC past it.
    #[inline]
    pub(super) fn fetch8<M: MemoryPort>(&mut self, mem: &mut M) -> Result<u8, MemoryFault> {
        let value = mem.read8(self.regs.pc)?;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        Ok(value)
    }

    #[inline]
    pub(super) fn fetch16<M: MemoryPort>(&mut self, mem: &mut M) -> Result<u16, MemoryFault> {
        let lo = self.fetch8(mem)?;
        let hi = self.fetch8(mem)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Push a word: SP drops by two and the word lands at the new SP.
    #[inline]
    pub(super) fn push_u16<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        value: u16,
    ) -> Result<(), MemoryFault> {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        mem.write16(self.regs.sp, value)
    }

    #[inline]
    pub(super) fn pop_u16<M: MemoryPort>(&mut self, mem: &mut M) -> Result<u16, MemoryFault> {
        let value = mem.read16(self.regs.sp)?;
        self.regs.sp = self.regs.sp.wrapping_add(2);
        Ok(value)
    }

    /// Branch condition by the 2-bit `cc` field: NZ, Z, NC, C.
    #[inline]
    pub(super) fn cc_condition(&self, cc: u8) -> bool {
        match cc & 0x03 {
            0 => !self.get_flag(Flag::Z),
            1 => self.get_flag(Flag::Z),
            2 => !self.get_flag(Flag::C),
            _ => self.get_flag(Flag::C),
        }
    }
}
