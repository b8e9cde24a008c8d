mod bus;
mod driver;

pub use bus::FlatBus;
pub use driver::{Machine, RunStats};

/// Size of the flat address space (64 KiB).
const MEMORY_SIZE: usize = 0x10000;

/// Largest ROM image mapped by [`FlatBus::load_rom`]: two 16 KiB banks, no mapper.
pub const ROM_WINDOW: usize = 0x8000;
