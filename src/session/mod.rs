//! Editing session management module
//!
//! This module contains:
//! - Session state (annotation list, tool modes, in-progress draft)
//! - Message types for drawing and share-intake interactions
//! - The rendezvous map used by the share intake

pub mod messages;
pub mod rendezvous;
pub mod state;
