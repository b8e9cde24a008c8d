mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu, CpuError, Instruction};

impl Cpu {
    /// Run the handler for a decoded instruction and return its T-state cost.
    ///
    /// PC already points past the opcode; handlers fetch their own operands.
    pub(super) fn execute<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: Instruction,
        opcode: u8,
    ) -> Result<u32, CpuError> {
        let cycles = match instr {
            Instruction::Nop => 4,
            Instruction::LdA16Sp => self.exec_ld_a16_sp(bus)?,
            Instruction::Halt => self.exec_halt(),
            Instruction::LdRR => self.exec_ld_r_r(bus, opcode)?,
            Instruction::LdRrD16 => self.exec_ld_rr_d16(bus, opcode)?,
            Instruction::LdIndirect => self.exec_ld_indirect(bus, opcode)?,
            Instruction::IncDecRr => self.exec_inc_dec_rr(opcode),
            Instruction::IncDecR => self.exec_inc_dec_r(bus, opcode)?,
            Instruction::RotateA => self.exec_rotate_a(opcode),
            Instruction::Stop => self.exec_stop(bus)?,
            Instruction::Jr => self.exec_jr(bus, opcode)?,
            Instruction::LdRD8 => self.exec_ld_r_d8(bus, opcode)?,
            Instruction::LdHlIncDec => self.exec_ld_hl_inc_dec(bus, opcode)?,
            Instruction::ScfCcf => self.exec_scf_ccf(opcode),
            Instruction::Alu => self.exec_alu(bus, opcode)?,
            Instruction::PushPop => self.exec_push_pop(bus, opcode)?,
            Instruction::Ret => self.exec_ret(bus, opcode)?,
            Instruction::Rst => self.exec_rst(bus, opcode)?,
            Instruction::Jp => self.exec_jp(bus, opcode)?,
            Instruction::Call => self.exec_call(bus, opcode)?,
            Instruction::LdA16A => self.exec_ld_a16_a(bus, opcode)?,
            Instruction::Ldh => self.exec_ldh(bus, opcode)?,
            Instruction::DiEi => self.exec_di_ei(opcode),
            Instruction::Prefix => return self.exec_prefix(bus),
            Instruction::DaaCpl => self.exec_daa_cpl(opcode),
            Instruction::AddHlRr => self.exec_add_hl_rr(opcode),
            Instruction::SpArith => self.exec_sp_arith(bus, opcode)?,
            Instruction::JpHl => self.exec_jp_hl(),
            Instruction::Unimplemented => return Err(self.unimplemented(opcode)),
        };
        Ok(cycles)
    }
}
