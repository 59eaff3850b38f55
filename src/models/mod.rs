pub mod chat;
pub mod document;
pub mod events;
pub mod wire;
