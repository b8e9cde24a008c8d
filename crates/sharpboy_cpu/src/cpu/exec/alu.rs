use crate::cpu::alu::AluOp;
use crate::cpu::{Cpu, Flag, MemoryFault, MemoryPort};

impl Cpu {
    /// `ADD/ADC/SUB/SBC/AND/XOR/OR/CP` with a register, (HL) or d8 operand.
    ///
    /// 0x80..=0xBF take the operand from the low three bits; the 0xC6
    /// family reads an immediate.
    pub(super) fn exec_alu<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        let op = AluOp::from_opcode(opcode);
        let (value, cycles) = if opcode & 0xC0 == 0xC0 {
            (self.fetch8(mem)?, 8)
        } else {
            let src = opcode & 0x07;
            (self.read_reg8(mem, src)?, if src == 6 { 8 } else { 4 })
        };

        self.alu_apply(op, value);
        Ok(cycles)
    }

    pub(super) fn exec_rotate_a(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));

        let a = self.regs.a;
        let carry_in = self.get_flag(Flag::C);
        let (result, carry_out) = match opcode {
            // RLCA
            0x07 => (a.rotate_left(1), a & 0x80 != 0),
            // RRCA
            0x0F => (a.rotate_right(1), a & 0x01 != 0),
            // RLA
            0x17 => ((a << 1) | u8::from(carry_in), a & 0x80 != 0),
            // RRA
            _ => ((a >> 1) | (u8::from(carry_in) << 7), a & 0x01 != 0),
        };

        self.regs.a = result;
        self.set_flags(false, false, false, carry_out);
        4
    }

    pub(super) fn exec_scf_ccf(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x37 | 0x3F));

        let carry = if opcode == 0x37 { true } else { !self.get_flag(Flag::C) };
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, carry);
        4
    }

    pub(super) fn exec_daa_cpl(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x27 | 0x2F));

        if opcode == 0x27 {
            self.alu_daa();
        } else {
            self.regs.a = !self.regs.a;
            self.set_flag(Flag::N, true);
            self.set_flag(Flag::H, true);
        }
        4
    }

    pub(super) fn exec_add_hl_rr(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));

        let value = self.read_rp(opcode >> 4);
        self.alu_add16_hl(value);
        8
    }

    /// `ADD SP,e` (E8), `LD HL,SP+e` (F8) and `LD SP,HL` (F9).
    pub(super) fn exec_sp_arith<M: MemoryPort>(
        &mut self,
        mem: &mut M,
        opcode: u8,
    ) -> Result<u32, MemoryFault> {
        match opcode {
            0xE8 => {
                let offset = self.fetch8(mem)?;
                self.regs.sp = self.alu_sp_offset(offset);
                Ok(16)
            }
            0xF8 => {
                let offset = self.fetch8(mem)?;
                let value = self.alu_sp_offset(offset);
                self.regs.set_hl(value);
                Ok(12)
            }
            _ => {
                debug_assert_eq!(opcode, 0xF9);
                self.regs.sp = self.regs.hl();
                Ok(8)
            }
        }
    }
}
