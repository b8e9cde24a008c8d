use crate::cpu::{Cpu, CpuError, MemoryPort};

impl Cpu {
    pub(super) fn exec_halt(&mut self) -> u32 {
        self.wait();
        4
    }

    /// STOP is two bytes long; the padding byte is fetched and discarded.
    pub(super) fn exec_stop<M: MemoryPort>(&mut self, mem: &mut M) -> Result<u32, CpuError> {
        let _padding = self.fetch8(mem)?;
        self.stop();
        Ok(4)
    }

    /// `DI` (0xF3) / `EI` (0xFB). Both take effect two steps later.
    pub(super) fn exec_di_ei(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xF3 | 0xFB));

        if opcode == 0xF3 {
            self.disable_interrupts();
        } else {
            self.enable_interrupts();
        }
        4
    }

    /// The 0xCB table is not implemented. The sub-opcode is consumed so PC
    /// ends up past the whole instruction before the error is reported.
    pub(super) fn exec_prefix<M: MemoryPort>(&mut self, mem: &mut M) -> Result<u32, CpuError> {
        let pc = self.regs.pc.wrapping_sub(1);
        let opcode = self.fetch8(mem)?;
        log::warn!("unsupported extension opcode CB {opcode:02X} at 0x{pc:04X}");
        Err(CpuError::UnsupportedExtension { opcode, pc })
    }

    pub(super) fn unimplemented(&self, opcode: u8) -> CpuError {
        let pc = self.regs.pc.wrapping_sub(1);
        log::error!("unimplemented opcode 0x{opcode:02X} at 0x{pc:04X}; {}", self.regs);
        CpuError::UnimplementedOpcode { opcode, pc }
    }
}
