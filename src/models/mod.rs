pub mod calc;
pub mod common;
pub mod split_event;

pub use calc::*;
pub use common::*;
pub use split_event::*;
