use super::{Cpu, Flag};

/// ALU operation selected by bits 3..=5 of the ALU opcode families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub(super) const fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }

    pub(super) const fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        }
    }
}

impl Cpu {
    /// Apply `op` to A and `value`, updating A (except for CP) and all flags.
    pub(super) fn alu_apply(&mut self, op: AluOp, value: u8) {
        let a = self.regs.a;
        let carry = u8::from(self.get_flag(Flag::C));
        match op {
            AluOp::Add | AluOp::Adc => {
                let carry_in = if op == AluOp::Adc { carry } else { 0 };
                let full = u16::from(a) + u16::from(value) + u16::from(carry_in);
                let half = (a & 0x0F) + (value & 0x0F) + carry_in > 0x0F;
                let result = full as u8;
                self.regs.a = result;
                self.set_flags(result == 0, false, half, full > 0xFF);
            }
            AluOp::Sub | AluOp::Sbc | AluOp::Cp => {
                let borrow_in = if op == AluOp::Sbc { carry } else { 0 };
                let full = i16::from(a) - i16::from(value) - i16::from(borrow_in);
                let half = i16::from(a & 0x0F) - i16::from(value & 0x0F) - i16::from(borrow_in) < 0;
                let result = full as u8;
                if op != AluOp::Cp {
                    self.regs.a = result;
                }
                self.set_flags(result == 0, true, half, full < 0);
            }
            AluOp::And => {
                self.regs.a = a & value;
                self.set_flags(self.regs.a == 0, false, true, false);
            }
            AluOp::Xor => {
                self.regs.a = a ^ value;
                self.set_flags(self.regs.a == 0, false, false, false);
            }
            AluOp::Or => {
                self.regs.a = a | value;
                self.set_flags(self.regs.a == 0, false, false, false);
            }
        }
    }

    /// Decimal adjust A after a BCD add or subtract. N is preserved.
    pub(super) fn alu_daa(&mut self) {
        let subtract = self.get_flag(Flag::N);
        let mut correction = 0u8;
        let mut carry = self.get_flag(Flag::C);
        let mut a = self.regs.a;

        if self.get_flag(Flag::H) || (!subtract && (a & 0x0F) > 0x09) {
            correction |= 0x06;
        }
        if carry || (!subtract && a > 0x99) {
            correction |= 0x60;
            carry = true;
        }

        a = if subtract {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };

        self.regs.a = a;
        self.set_flags(a == 0, subtract, false, carry);
    }

    /// INC r / INC (HL): Z, N, H updated, C untouched.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, value & 0x0F == 0x0F);
        result
    }

    /// DEC r / DEC (HL): Z, N, H updated, C untouched.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, value & 0x0F == 0);
        result
    }

    /// ADD HL,rr: Z untouched, N cleared, H from bit 11, C from bit 15.
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let (result, carry) = hl.overflowing_add(value);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, carry);
        self.regs.set_hl(result);
    }

    /// SP plus a signed 8-bit offset, as used by `ADD SP,e` and `LD HL,SP+e`.
    ///
    /// Z and N are cleared; H and C come from the unsigned low-byte add.
    pub(super) fn alu_sp_offset(&mut self, offset: u8) -> u16 {
        let sp = self.regs.sp;
        let extended = offset as i8 as i16 as u16;
        let half = (sp & 0x000F) + (extended & 0x000F) > 0x000F;
        let carry = (sp & 0x00FF) + (extended & 0x00FF) > 0x00FF;
        self.set_flags(false, false, half, carry);
        sp.wrapping_add(extended)
    }
}
