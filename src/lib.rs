//! MUJ assistant - scripted university-information chat
//!
//! A response catalog plus a conversation state machine with a pure
//! transition function. The runtime drives one session per tokio task and
//! broadcasts updates to whatever renders the chat.

pub mod catalog;
pub mod config;
pub mod message;
pub mod runtime;
pub mod session;
pub mod state_machine;
