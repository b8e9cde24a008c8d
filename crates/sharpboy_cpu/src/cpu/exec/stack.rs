use crate::cpu::{Cpu, MemoryFault, MemoryPort};

impl Cpu {
    /// `PUSH rr` (bit 2 set) / `POP rr` over BC, DE, HL, AF.
    pub(super) fn exec_push_pop<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(opcode & 0xCB == 0xC1);

        let rp = (opcode >> 4) & 0x03;
        if opcode & 0x04 != 0 {
            let value = if rp == 3 { self.regs.af() } else { self.read_rp(rp) };
            self.push_u16(mem, value)?;
            return Ok(16);
        }

        let value = self.pop_u16(mem)?;
        if rp == 3 {
            // Low nibble of F always reads back as zero.
            self.regs.set_af(value);
        } else {
            self.write_rp(rp, value);
        }
        Ok(12)
    }

    /// `RET`, `RETI` and `RET cc`.
    pub(super) fn exec_ret<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        match opcode {
            0xC9 => {
                self.regs.pc = self.pop_u16(mem)?;
                Ok(16)
            }
            0xD9 => {
                self.regs.pc = self.pop_u16(mem)?;
                self.irq.set_ime(true);
                Ok(16)
            }
            _ => {
                debug_assert!(matches!(opcode, 0xC0 | 0xC8 | 0xD0 | 0xD8));
                if !self.cc_condition((opcode >> 3) & 0x03) {
                    return Ok(8);
                }
                self.regs.pc = self.pop_u16(mem)?;
                Ok(20)
            }
        }
    }

    pub(super) fn exec_rst<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(opcode & 0xC7 == 0xC7);

        let ret = self.regs.pc;
        self.push_u16(mem, ret)?;
        self.regs.pc = u16::from(opcode & 0x38);
        Ok(16)
    }
}
