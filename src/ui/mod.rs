//! UI rendering modules for the chat widget.
//!
//! All egui-based rendering code, organized by component:
//! - `header`: title bar with assistant identity and controls
//! - `messages`: conversation area with bubbles and code rendering
//! - `input`: compose field, attachments, and send button
//! - `theme`: color schemes and styling utilities

mod header;
mod input;
mod messages;
pub mod theme;

pub use header::*;
pub use input::*;
pub use messages::*;
