pub mod pagination;
pub mod share_code;
pub mod validation;

pub use pagination::*;
pub use validation::*;
