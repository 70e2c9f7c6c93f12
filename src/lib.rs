pub mod addressing;
pub mod cpu;
pub mod memory;
pub mod opcodes;
pub mod operations;
pub mod registers;

pub use cpu::State;
pub use memory::{Flat256KMemory, FlatMemory, Memory};
pub use registers::{AddressWidth, RegisterWidth, StatusFlags};

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate bitflags;
