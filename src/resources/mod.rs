pub use super::error::*;

mod rule;
pub use rule::*;
mod mode;
pub use mode::*;
mod priority;
pub use priority::*;
