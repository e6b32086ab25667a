//! Session state for the annotation tools

use crate::domain::{Annotation, RectDraft};

/// Which rectangle tool is armed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Outline,
    Redact,
    Pixelate,
}

/// Annotation list, tool modes, and the in-progress draft
#[derive(Clone, Debug, Default)]
pub struct AnnotationState {
    /// Unified ordered annotation list
    pub annotations: Vec<Annotation>,
    /// Annotations at index and beyond are undone
    pub annotation_index: usize,
    pub outline_mode: bool,
    pub redact_mode: bool,
    pub pixelate_mode: bool,
    /// The rectangle currently being dragged, if any
    pub draft: Option<RectDraft>,
}

impl AnnotationState {
    /// Commit an annotation, truncating any redo tail
    pub fn add(&mut self, annotation: Annotation) {
        self.annotations.truncate(self.annotation_index);
        self.annotations.push(annotation);
        self.annotation_index = self.annotations.len();
    }

    /// Annotations that are currently visible (not undone)
    pub fn visible(&self) -> &[Annotation] {
        &self.annotations[..self.annotation_index]
    }

    pub fn undo(&mut self) {
        self.annotation_index = self.annotation_index.saturating_sub(1);
    }

    pub fn redo(&mut self) {
        if self.annotation_index < self.annotations.len() {
            self.annotation_index += 1;
        }
    }

    /// True if any tool mode is armed
    pub fn any_mode(&self) -> bool {
        self.outline_mode || self.redact_mode || self.pixelate_mode
    }

    pub fn clear_all(&mut self) {
        self.annotations.clear();
        self.annotation_index = 0;
        self.outline_mode = false;
        self.redact_mode = false;
        self.pixelate_mode = false;
        self.draft = None;
    }

    pub fn clear_shapes(&mut self) {
        self.outline_mode = false;
        self.annotations.retain(Annotation::is_redaction);
        self.annotation_index = self.annotations.len();
    }

    pub fn clear_redactions(&mut self) {
        self.redact_mode = false;
        self.pixelate_mode = false;
        self.annotations.retain(Annotation::is_shape);
        self.annotation_index = self.annotations.len();
    }
}
