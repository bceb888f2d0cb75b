pub mod split_events;

pub use split_events as split_event_entity;
