//! Strategy assembly and result types

pub mod assembler;
pub mod result;

pub use assembler::StrategyAssembler;
pub use result::{StrategyReport, StrategyResult};
