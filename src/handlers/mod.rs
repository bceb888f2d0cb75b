pub mod calc;
pub mod event;
pub mod share;

pub use calc::calc_config;
pub use event::event_config;
pub use share::share_config;
