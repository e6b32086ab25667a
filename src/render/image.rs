//! Drawing annotations onto an image
//!
//! These functions draw annotations onto an RgbaImage: dashed outline
//! strokes and solid fills go through tiny-skia, pixelation works on the
//! raw pixel buffer directly.

use image::RgbaImage;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use super::geometry::{self, OutlineOptions};
use crate::config::{MosaicConfig, RedactTool};
use crate::domain::{
    Annotation, PixelateAnnotation, RectDraft, RectOutlineAnnotation, RedactAnnotation,
};

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

/// Draw dashed rectangle outlines onto an image
pub fn draw_rect_outlines_on_image(
    img: &mut RgbaImage,
    rects: &[RectOutlineAnnotation],
    options: &OutlineOptions,
) {
    if rects.is_empty() {
        return;
    }

    with_pixmap(img, |pixmap| {
        for rect in rects {
            let [r, g, b, a] = rect.color.to_rgba_u8();

            let (min_x, min_y, max_x, max_y) =
                geometry::normalize_rect(rect.start_x, rect.start_y, rect.end_x, rect.end_y);

            // Build rectangle path
            let mut pb = PathBuilder::new();
            pb.move_to(min_x, min_y);
            pb.line_to(max_x, min_y);
            pb.line_to(max_x, max_y);
            pb.line_to(min_x, max_y);
            pb.close();
            let Some(path) = pb.finish() else {
                continue;
            };

            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, a);
            paint.anti_alias = true;

            // An invalid dash pattern falls back to a solid stroke
            let stroke = Stroke {
                width: options.thickness.max(1.0),
                dash: StrokeDash::new(options.dash.clone(), 0.0),
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    });
}

/// Draw solid redaction rectangles onto an image
pub fn draw_redactions_on_image(img: &mut RgbaImage, redactions: &[RedactAnnotation]) {
    if redactions.is_empty() {
        return;
    }

    with_pixmap(img, |pixmap| {
        let mut paint = Paint::default();
        paint.set_color(Color::BLACK);

        for redact in redactions {
            let (min_x, min_y, max_x, max_y) =
                geometry::normalize_rect(redact.x, redact.y, redact.x2, redact.y2);

            if let Some(rect) =
                tiny_skia::Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
            {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
    });
}

/// Draw pixelation rectangles onto an image.
///
/// The region is partitioned into `block_size` squares; each block is
/// replaced by the channel-wise average of the pixels it covers, with
/// alpha forced to fully opaque. Block windows are clamped both to the
/// region and to the image bounds.
pub fn draw_pixelations_on_image(img: &mut RgbaImage, pixelations: &[PixelateAnnotation]) {
    if img.width() == 0 || img.height() == 0 {
        return;
    }

    for pixelate in pixelations {
        let block_size = pixelate.block_size.max(1);
        let x1 = pixelate.x.round() as i32;
        let y1 = pixelate.y.round() as i32;
        let x2 = pixelate.x2.round() as i32;
        let y2 = pixelate.y2.round() as i32;

        let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
        let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };

        // Entirely outside the image
        if max_x < 0 || max_y < 0 || min_x >= img.width() as i32 || min_y >= img.height() as i32 {
            continue;
        }

        let min_x = min_x.max(0) as u32;
        let max_x = (max_x as u32).min(img.width() - 1);
        let min_y = min_y.max(0) as u32;
        let max_y = (max_y as u32).min(img.height() - 1);

        let mut block_y = min_y;
        while block_y <= max_y {
            let block_end_y = (block_y + block_size - 1).min(max_y);

            let mut block_x = min_x;
            while block_x <= max_x {
                let block_end_x = (block_x + block_size - 1).min(max_x);

                // Calculate average color for this block
                let mut total_r: u64 = 0;
                let mut total_g: u64 = 0;
                let mut total_b: u64 = 0;
                let mut pixel_count: u64 = 0;

                for py in block_y..=block_end_y {
                    for px in block_x..=block_end_x {
                        let pixel = img.get_pixel(px, py);
                        total_r += pixel[0] as u64;
                        total_g += pixel[1] as u64;
                        total_b += pixel[2] as u64;
                        pixel_count += 1;
                    }
                }

                if pixel_count > 0 {
                    let avg_color = image::Rgba([
                        (total_r / pixel_count) as u8,
                        (total_g / pixel_count) as u8,
                        (total_b / pixel_count) as u8,
                        255,
                    ]);

                    for py in block_y..=block_end_y {
                        for px in block_x..=block_end_x {
                            img.put_pixel(px, py, avg_color);
                        }
                    }
                }

                block_x += block_size;
            }
            block_y += block_size;
        }
    }
}

/// Draw an in-progress draft rectangle.
///
/// No-op unless the draft is visible. Sensitive drafts are filled with
/// the configured redact tool, others are stroked with a dashed outline.
pub fn draw_draft_on_image(
    img: &mut RgbaImage,
    draft: &RectDraft,
    config: &MosaicConfig,
    options: &OutlineOptions,
) {
    if !draft.show {
        return;
    }

    if draft.sensitive {
        match config.primary_redact_tool {
            RedactTool::Redact => {
                let redact = RedactAnnotation {
                    x: draft.rect.x,
                    y: draft.rect.y,
                    x2: draft.rect.right(),
                    y2: draft.rect.bottom(),
                    label: None,
                };
                draw_redactions_on_image(img, std::slice::from_ref(&redact));
            }
            RedactTool::Pixelate => {
                let pixelate = PixelateAnnotation {
                    x: draft.rect.x,
                    y: draft.rect.y,
                    x2: draft.rect.right(),
                    y2: draft.rect.bottom(),
                    block_size: config.pixelation_block_size,
                    label: None,
                };
                draw_pixelations_on_image(img, std::slice::from_ref(&pixelate));
            }
        }
    } else {
        let outline = RectOutlineAnnotation {
            start_x: draft.rect.x,
            start_y: draft.rect.y,
            end_x: draft.rect.right(),
            end_y: draft.rect.bottom(),
            color: config.shape_color,
            label: None,
        };
        draw_rect_outlines_on_image(img, std::slice::from_ref(&outline), options);
    }
}

/// Draw all annotations in order (for proper layering and undo/redo support)
///
/// Redactions and pixelations are ALWAYS drawn first (in their relative
/// order), then outline rectangles are drawn on top (in their relative
/// order). This ensures outlines are never obscured by redactions.
pub fn draw_annotations_in_order(
    img: &mut RgbaImage,
    annotations: &[Annotation],
    options: &OutlineOptions,
) {
    // First pass: draw all redactions and pixelations (in order)
    for annotation in annotations {
        match annotation {
            Annotation::Redact(redact) => {
                draw_redactions_on_image(img, std::slice::from_ref(redact));
            }
            Annotation::Pixelate(pixelate) => {
                draw_pixelations_on_image(img, std::slice::from_ref(pixelate));
            }
            Annotation::Rectangle(_) => {}
        }
    }

    // Second pass: draw outline rectangles on top (in order)
    for annotation in annotations {
        if let Annotation::Rectangle(rect) = annotation {
            draw_rect_outlines_on_image(img, std::slice::from_ref(rect), options);
        }
    }
}
