//! Conversation core: message store, turn lifecycle, disclosure state and
//! the background engine that performs assistant calls.

pub mod disclosure;
pub mod engine;
pub mod events;
pub mod ops;
pub mod session;
pub mod store;
pub mod turn;
