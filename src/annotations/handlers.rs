//! Annotation message handlers
//!
//! Handles DrawMsg for all annotation drawing operations. Every commit
//! goes through the draft's drag lifecycle (restart/update/release), so
//! the normalized box is computed in exactly one place.

use crate::config::MosaicConfig;
use crate::domain::{
    Annotation, PixelateAnnotation, Point, RectDraft, RectOutlineAnnotation, RedactAnnotation,
};
use crate::session::messages::{DrawAction, DrawMsg};
use crate::session::state::{AnnotationState, Tool};

/// Handle a DrawMsg, modifying annotation state
pub fn handle_draw_msg(state: &mut AnnotationState, config: &MosaicConfig, msg: DrawMsg) {
    match msg {
        DrawMsg::Outline(action) => handle_tool(state, config, Tool::Outline, action),
        DrawMsg::Redact(action) => handle_tool(state, config, Tool::Redact, action),
        DrawMsg::Pixelate(action) => handle_tool(state, config, Tool::Pixelate, action),
        DrawMsg::ClearShapes => state.clear_shapes(),
        DrawMsg::ClearRedactions => state.clear_redactions(),
        DrawMsg::Undo => state.undo(),
        DrawMsg::Redo => state.redo(),
    }
}

fn mode(state: &mut AnnotationState, tool: Tool) -> &mut bool {
    match tool {
        Tool::Outline => &mut state.outline_mode,
        Tool::Redact => &mut state.redact_mode,
        Tool::Pixelate => &mut state.pixelate_mode,
    }
}

fn handle_tool(state: &mut AnnotationState, config: &MosaicConfig, tool: Tool, action: DrawAction) {
    match action {
        DrawAction::ModeToggle => {
            let armed = !*mode(state, tool);
            *mode(state, tool) = armed;
            if armed {
                disable_other_modes(state, tool);
            } else {
                state.draft = None;
            }
        }
        DrawAction::Start(x, y) => {
            if *mode(state, tool) {
                let mut draft = RectDraft::default();
                draft.set_sensitive(tool != Tool::Outline);
                draft.restart(Point::new(x, y));
                state.draft = Some(draft);
            }
        }
        DrawAction::Move(x, y) => {
            if let Some(draft) = state.draft.as_mut() {
                draft.update(Point::new(x, y));
            }
        }
        DrawAction::End(x, y) => {
            if let Some(mut draft) = state.draft.take() {
                draft.release(Point::new(x, y));
                let label = draft.label.take();
                let rect = draft.take_rect();
                let annotation = match tool {
                    Tool::Outline => Annotation::Rectangle(RectOutlineAnnotation {
                        start_x: rect.x,
                        start_y: rect.y,
                        end_x: rect.right(),
                        end_y: rect.bottom(),
                        color: config.shape_color,
                        label,
                    }),
                    Tool::Redact => Annotation::Redact(RedactAnnotation {
                        x: rect.x,
                        y: rect.y,
                        x2: rect.right(),
                        y2: rect.bottom(),
                        label,
                    }),
                    Tool::Pixelate => Annotation::Pixelate(PixelateAnnotation {
                        x: rect.x,
                        y: rect.y,
                        x2: rect.right(),
                        y2: rect.bottom(),
                        block_size: config.pixelation_block_size,
                        label,
                    }),
                };
                state.add(annotation);
            }
        }
    }
}

fn disable_other_modes(state: &mut AnnotationState, keep: Tool) {
    if keep != Tool::Outline {
        state.outline_mode = false;
    }
    if keep != Tool::Redact {
        state.redact_mode = false;
    }
    if keep != Tool::Pixelate {
        state.pixelate_mode = false;
    }
    state.draft = None;
}
