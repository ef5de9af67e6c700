// Public API exports

pub mod dialect;
pub mod error;
pub mod rule;
pub mod stream;
pub mod tables;
pub mod transducer;
pub mod transpiler;
