use crate::cpu::{Cpu, MemoryFault, MemoryPort};

impl Cpu {
    /// `INC rr` (bit 3 clear) / `DEC rr` (bit 3 set). Flags are untouched.
    pub(super) fn exec_inc_dec_rr(&mut self, opcode: u8) -> u32 {
        debug_assert!(opcode & 0xC7 == 0x03, "unexpected INC/DEC rr opcode {opcode:#04x}");

        let rp = opcode >> 4;
        let value = self.read_rp(rp);
        let value = if opcode & 0x08 == 0 {
            value.wrapping_add(1)
        } else {
            value.wrapping_sub(1)
        };
        self.write_rp(rp, value);
        8
    }

    /// `INC r` (bit 0 clear) / `DEC r` (bit 0 set), including (HL).
    pub(super) fn exec_inc_dec_r<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        debug_assert!(opcode & 0xC6 == 0x04, "unexpected INC/DEC r opcode {opcode:#04x}");

        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(mem, reg)?;
        let result = if opcode & 0x01 == 0 {
            self.alu_inc8(value)
        } else {
            self.alu_dec8(value)
        };
        self.write_reg8(mem, reg, result)?;

        Ok(if reg == 6 { 12 } else { 4 })
    }
}
