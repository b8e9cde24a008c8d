use crate::cpu::{Cpu, MemoryFault, MemoryPort};

impl Cpu {
    /// `JR e` (0x18) and `JR cc,e`.
    pub(super) fn exec_jr<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(matches!(opcode, 0x18 | 0x20 | 0x28 | 0x30 | 0x38));

        let offset = self.fetch8(mem)? as i8;
        let taken = opcode == 0x18 || self.cc_condition((opcode >> 3) & 0x03);
        if !taken {
            return Ok(8);
        }

        self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
        Ok(12)
    }

    /// `JP a16` (0xC3) and `JP cc,a16`.
    pub(super) fn exec_jp<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(matches!(opcode, 0xC3 | 0xC2 | 0xCA | 0xD2 | 0xDA));

        let addr = self.fetch16(mem)?;
        let taken = opcode == 0xC3 || self.cc_condition((opcode >> 3) & 0x03);
        if !taken {
            return Ok(12);
        }

        self.regs.pc = addr;
        Ok(16)
    }

    pub(super) fn exec_jp_hl(&mut self) -> u32 {
        self.regs.pc = self.regs.hl();
        4
    }

    /// `CALL a16` (0xCD) and `CALL cc,a16`.
    ///
    /// The return address pushed is the byte after the operand.
    pub(super) fn exec_call<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(matches!(opcode, 0xCD | 0xC4 | 0xCC | 0xD4 | 0xDC));

        let addr = self.fetch16(mem)?;
        let taken = opcode == 0xCD || self.cc_condition((opcode >> 3) & 0x03);
        if !taken {
            return Ok(12);
        }

        let ret = self.regs.pc;
        self.push_u16(mem, ret)?;
        self.regs.pc = addr;
        Ok(24)
    }
}
