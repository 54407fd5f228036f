#[cfg(test)]
#[macro_use]
mod test_utils;

// Modules
pub mod clock;
pub mod debug;
pub mod display;
pub mod emulator;
mod error;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod peripherals;
pub mod quirks;
pub mod rng;
pub mod rom;
pub mod snapshot;
pub mod stack;
pub mod state;
pub mod timer;

// Reexports
pub use emulator::{Emulator, EmulatorConfig, Status};
pub use error::Error;
pub use interpreter::Step;
pub use quirks::{Profile, Quirks};
pub use rom::Rom;

// Private helpers
type Result<T> = std::result::Result<T, Error>;
