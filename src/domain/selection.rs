//! Drag-to-draw lifecycle for a single rectangle

use super::geometry::{Point, Rect};

/// Caller-supplied starting state for a [`RectDraft`]
#[derive(Clone, Debug, Default)]
pub struct DraftInit {
    pub rect: Rect,
    pub sensitive: bool,
    pub show: bool,
    pub label: Option<String>,
}

/// A rectangle being drawn or edited.
///
/// Tracks the two drag anchors and keeps a normalized box derived from
/// them, so the box is always non-negative-sized regardless of drag
/// direction. A draft is `drawing` between `restart` and `release`, and
/// `show` controls whether it renders at all.
#[derive(Clone, Debug, Default)]
pub struct RectDraft {
    anchor: Point,
    cursor: Point,
    /// Normalized box derived from the two anchors
    pub rect: Rect,
    /// Redaction fill (blank/pixelate) when true, dashed outline when false
    pub sensitive: bool,
    /// Whether the draft renders at all
    pub show: bool,
    /// True between drag start and release
    pub drawing: bool,
    /// Optional text label carried onto the committed annotation
    pub label: Option<String>,
}

impl RectDraft {
    /// Create a draft from explicit starting state
    pub fn from_init(init: DraftInit) -> Self {
        let anchor = Point::new(init.rect.x, init.rect.y);
        let cursor = Point::new(init.rect.right(), init.rect.bottom());
        Self {
            anchor,
            cursor,
            rect: init.rect,
            sensitive: init.sensitive,
            show: init.show,
            drawing: false,
            label: init.label,
        }
    }

    fn normalize(&mut self) {
        self.rect = Rect::from_corners(self.anchor, self.cursor);
    }

    /// Begin a new drag: collapse both anchors to `point` and show the draft
    pub fn restart(&mut self, point: Point) {
        self.anchor = point;
        self.cursor = point;
        self.normalize();
        self.show = true;
        self.drawing = true;
    }

    /// Extend the drag to `point`, re-normalizing the box
    pub fn update(&mut self, point: Point) {
        self.cursor = point;
        self.normalize();
        self.show = true;
    }

    /// End the drag at `point`
    pub fn release(&mut self, point: Point) {
        self.update(point);
        self.drawing = false;
    }

    /// Extract a snapshot of the normalized box and hide the draft
    pub fn take_rect(&mut self) -> Rect {
        self.show = false;
        self.rect
    }

    /// Flip between outline mode and the redaction fill
    pub fn toggle_sensitive(&mut self) {
        self.sensitive = !self.sensitive;
    }

    /// Set the redaction fill explicitly
    pub fn set_sensitive(&mut self, flag: bool) {
        self.sensitive = flag;
    }
}
