//! Conversation engine: the customer-facing ordering dialogue.
//!
//! Split into a pure decision core ([`engine`]), the message templates
//! it renders ([`replies`]), and the I/O adapter that persists state
//! and talks to the messaging gateway ([`runner`]).

pub mod engine;
pub mod replies;
pub mod runner;
