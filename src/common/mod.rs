pub mod time;
pub mod types;

pub use time::*;
