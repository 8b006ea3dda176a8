mod field;
mod frame;

pub use field::*;
pub use frame::*;
