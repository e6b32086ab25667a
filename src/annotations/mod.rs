//! Annotation message handling
//!
//! This module provides the message handlers for DrawMsg, routing tool
//! toggles and drag events into the session's annotation state.

pub mod handlers;
