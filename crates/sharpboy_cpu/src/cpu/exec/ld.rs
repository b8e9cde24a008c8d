use crate::cpu::{Cpu, MemoryFault, MemoryPort};

impl Cpu {
    pub(super) fn exec_ld_a16_sp<M: MemoryPort>(
        &mut self,
        mem: &mut M,
    ) -> Result<u32, MemoryFault> {
        let addr = self.fetch16(mem)?;
        mem.write16(addr, self.regs.sp)?;
        Ok(20)
    }

    pub(super) fn exec_ld_r_r<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(opcode & 0xC0 == 0x40 && opcode != 0x76);

        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let value = self.read_reg8(mem, src)?;
        self.write_reg8(mem, dst, value)?;

        Ok(if dst == 6 || src == 6 { 8 } else { 4 })
    }

    pub(super) fn exec_ld_rr_d16<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));

        let value = self.fetch16(mem)?;
        self.write_rp(opcode >> 4, value);
        Ok(12)
    }

    /// `LD (BC),A`, `LD (DE),A` and the reverse loads; bit 3 selects the direction.
    pub(super) fn exec_ld_indirect<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(matches!(opcode, 0x02 | 0x0A | 0x12 | 0x1A));

        let addr = self.read_rp(opcode >> 4);
        if opcode & 0x08 == 0 {
            mem.write8(addr, self.regs.a)?;
        } else {
            self.regs.a = mem.read8(addr)?;
        }
        Ok(8)
    }

    pub(super) fn exec_ld_r_d8<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(opcode & 0xC7 == 0x06);

        let reg = (opcode >> 3) & 0x07;
        let value = self.fetch8(mem)?;
        self.write_reg8(mem, reg, value)?;

        Ok(if reg == 6 { 12 } else { 8 })
    }

    /// `LD (HL+),A`, `LD A,(HL+)`, `LD (HL-),A`, `LD A,(HL-)`.
    ///
    /// HL only moves once the access succeeded.
    pub(super) fn exec_ld_hl_inc_dec<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(matches!(opcode, 0x22 | 0x2A | 0x32 | 0x3A));

        let addr = self.regs.hl();
        if opcode & 0x08 == 0 {
            mem.write8(addr, self.regs.a)?;
        } else {
            self.regs.a = mem.read8(addr)?;
        }

        let next = if opcode & 0x10 == 0 {
            addr.wrapping_add(1)
        } else {
            addr.wrapping_sub(1)
        };
        self.regs.set_hl(next);
        Ok(8)
    }

    pub(super) fn exec_ld_a16_a<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(matches!(opcode, 0xEA | 0xFA));

        let addr = self.fetch16(mem)?;
        if opcode == 0xEA {
            mem.write8(addr, self.regs.a)?;
        } else {
            self.regs.a = mem.read8(addr)?;
        }
        Ok(16)
    }

    /// High-page accesses at `0xFF00 + a8` (E0/F0) or `0xFF00 + C` (E2/F2).
    pub(super) fn exec_ldh<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(matches!(opcode, 0xE0 | 0xE2 | 0xF0 | 0xF2));

        let (offset, cycles) = if opcode & 0x02 == 0 {
            (self.fetch8(mem)?, 12)
        } else {
            (self.regs.c, 8)
        };
        let addr = 0xFF00 | u16::from(offset);

        if opcode & 0x10 == 0 {
            mem.write8(addr, self.regs.a)?;
        } else {
            self.regs.a = mem.read8(addr)?;
        }
        Ok(cycles)
    }
}
