//! Message types for the editing session
//!
//! This module contains:
//! - DrawAction/DrawMsg for annotation drawing operations
//! - Msg for session-level events such as share-intake delivery

// ============================================================================
// Drawing Action Types
// ============================================================================

/// Common draw action for the rectangle tools (outline, redact, pixelate)
#[derive(Debug, Clone)]
pub enum DrawAction {
    /// Toggle drawing mode on/off
    ModeToggle,
    /// Start drawing at position
    Start(f32, f32),
    /// Extend the in-progress drag to position
    Move(f32, f32),
    /// End drawing at position
    End(f32, f32),
}

/// All drawing/annotation messages
#[derive(Debug, Clone)]
pub enum DrawMsg {
    /// Dashed rectangle outline actions
    Outline(DrawAction),
    /// Redaction (solid box) actions
    Redact(DrawAction),
    /// Pixelation actions
    Pixelate(DrawAction),
    /// Clear all outline annotations (keeps redactions)
    ClearShapes,
    /// Clear all redactions (keeps outlines)
    ClearRedactions,
    /// Undo last annotation
    Undo,
    /// Redo undone annotation
    Redo,
}

// ============================================================================
// Session Events
// ============================================================================

/// Session-level messages
#[derive(Debug, Clone)]
pub enum Msg {
    /// An image arrived through the share intake
    LoadImage { name: String, bytes: Vec<u8> },
}
