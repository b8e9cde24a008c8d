use thiserror::Error;

use super::MemoryFault;

/// Abnormal termination of a single [`Cpu::step`](super::Cpu::step).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error(transparent)]
    Memory(#[from] MemoryFault),

    /// The opcode matched no decoder family.
    #[error("unimplemented opcode 0x{opcode:02X} at PC=0x{pc:04X}")]
    UnimplementedOpcode { opcode: u8, pc: u16 },

    /// A `0xCB`-prefixed opcode was executed; `opcode` is the second byte.
    #[error("unsupported extended opcode 0xCB 0x{opcode:02X} at PC=0x{pc:04X}")]
    UnsupportedExtension { opcode: u8, pc: u16 },
}
