//! Annotation types for redacting regions of an image
//!
//! All annotation types store coordinates in image pixel coordinates.

use crate::config::ShapeColor;

/// Outline rectangle annotation (dashed stroke, no fill)
#[derive(Clone, Debug, PartialEq)]
pub struct RectOutlineAnnotation {
    /// Start point
    pub start_x: f32,
    pub start_y: f32,
    /// End point
    pub end_x: f32,
    pub end_y: f32,
    /// Color of this rectangle
    pub color: ShapeColor,
    /// Optional text label
    pub label: Option<String>,
}

/// Redaction annotation (solid rectangle) for hiding sensitive content
#[derive(Clone, Debug, PartialEq)]
pub struct RedactAnnotation {
    /// Top-left point
    pub x: f32,
    pub y: f32,
    /// Bottom-right point
    pub x2: f32,
    pub y2: f32,
    /// Optional text label
    pub label: Option<String>,
}

/// Pixelation annotation for obscuring sensitive content with a mosaic
#[derive(Clone, Debug, PartialEq)]
pub struct PixelateAnnotation {
    /// Top-left point
    pub x: f32,
    pub y: f32,
    /// Bottom-right point
    pub x2: f32,
    pub y2: f32,
    /// Block size for this pixelation
    pub block_size: u32,
    /// Optional text label
    pub label: Option<String>,
}

/// Unified annotation type for ordered drawing and undo/redo
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Rectangle(RectOutlineAnnotation),
    Redact(RedactAnnotation),
    Pixelate(PixelateAnnotation),
}

impl Annotation {
    /// Check if this is a shape annotation (outline rectangle)
    pub fn is_shape(&self) -> bool {
        matches!(self, Annotation::Rectangle(_))
    }

    /// Check if this is a redaction annotation (redact, pixelate)
    pub fn is_redaction(&self) -> bool {
        matches!(self, Annotation::Redact(_) | Annotation::Pixelate(_))
    }

    /// The annotation's label, if one was set
    pub fn label(&self) -> Option<&str> {
        match self {
            Annotation::Rectangle(r) => r.label.as_deref(),
            Annotation::Redact(r) => r.label.as_deref(),
            Annotation::Pixelate(p) => p.label.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction_discriminators() {
        let redact = Annotation::Redact(RedactAnnotation {
            x: 0.0,
            y: 0.0,
            x2: 1.0,
            y2: 1.0,
            label: None,
        });
        assert!(redact.is_redaction());
        assert!(!redact.is_shape());

        let outline = Annotation::Rectangle(RectOutlineAnnotation {
            start_x: 0.0,
            start_y: 0.0,
            end_x: 1.0,
            end_y: 1.0,
            color: ShapeColor::default(),
            label: Some("note".to_string()),
        });
        assert!(outline.is_shape());
        assert!(!outline.is_redaction());
        assert_eq!(outline.label(), Some("note"));
    }
}
