pub mod engine;
pub mod indicators;
pub mod scorer;
pub mod trend;

#[cfg(test)]
mod indicators_tests;

pub use engine::*;
pub use indicators::*;
pub use scorer::*;
pub use trend::*;
