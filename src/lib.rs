//! Chatbubble - a desktop chat widget for an LLM bot endpoint.
//!
//! Architecture:
//! - Main thread: runs the egui UI
//! - Backend thread: runs a Tokio runtime for the HTTP requests
//! - Communication via crossbeam channels (lock-free, sync-safe)
//!
//! The interesting part is the message-rendering pipeline: `markup`
//! formats raw bot text into a safe marker string exactly once, and
//! `reveal` discloses that string character by character for the latest
//! bot message.

pub mod app;
pub mod backend;
pub mod config;
pub mod events;
pub mod input_state;
pub mod logging;
pub mod markup;
pub mod message;
pub mod protocol;
pub mod reveal;
pub mod state;
pub mod ui;
pub mod validation;

#[cfg(test)]
mod integration_tests;
