//! Command implementations for the simulator.

mod check;
mod generate;

pub use check::Check;
pub use generate::Generate;
