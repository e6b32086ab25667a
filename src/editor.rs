//! Image editing pipeline: load, apply a redaction plan, save
//!
//! The plan is replayed through the draw message handlers, so batch
//! application and interactive drawing share one commit path.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::annotations::handlers::handle_draw_msg;
use crate::config::MosaicConfig;
use crate::render::geometry::OutlineOptions;
use crate::render::image::draw_annotations_in_order;
use crate::session::messages::{DrawAction, DrawMsg, Msg};
use crate::session::state::AnnotationState;

/// A redaction plan: an ordered list of regions to apply
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RedactPlan {
    pub regions: Vec<PlanRegion>,
}

/// One region of a redaction plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanRegion {
    pub tool: PlanTool,
    /// Drag start point
    pub start: (f32, f32),
    /// Drag end point
    pub end: (f32, f32),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Per-region pixelation block size override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u32>,
}

/// Tool applied to a plan region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanTool {
    Outline,
    Redact,
    Pixelate,
}

impl RedactPlan {
    /// Load a plan from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed plan {}", path.display()))
    }
}

/// An editing session over one image
#[derive(Debug)]
pub struct Editor {
    pub image: RgbaImage,
    pub state: AnnotationState,
    config: MosaicConfig,
}

impl Editor {
    /// Open an image file
    pub fn open(path: &Path, config: MosaicConfig) -> anyhow::Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .to_rgba8();
        log::debug!(
            "Loaded {}: {}x{} pixels",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self {
            image,
            state: AnnotationState::default(),
            config,
        })
    }

    /// Decode an in-memory image, e.g. one delivered by the share intake
    pub fn from_bytes(name: &str, bytes: &[u8], config: MosaicConfig) -> anyhow::Result<Self> {
        let image = image::load_from_memory(bytes)
            .with_context(|| format!("Failed to decode {}", name))?
            .to_rgba8();
        log::debug!("Loaded {}: {}x{} pixels", name, image.width(), image.height());
        Ok(Self {
            image,
            state: AnnotationState::default(),
            config,
        })
    }

    /// Handle a session message
    pub fn handle_message(&mut self, msg: Msg) -> anyhow::Result<()> {
        match msg {
            Msg::LoadImage { name, bytes } => {
                self.image = image::load_from_memory(&bytes)
                    .with_context(|| format!("Failed to decode {}", name))?
                    .to_rgba8();
                self.state.clear_all();
                log::info!(
                    "Replaced image with {} ({}x{})",
                    name,
                    self.image.width(),
                    self.image.height()
                );
                Ok(())
            }
        }
    }

    /// Replay a plan region as a drag gesture for its tool
    fn replay_region(&mut self, region: &PlanRegion) {
        let msg: fn(DrawAction) -> DrawMsg = match region.tool {
            PlanTool::Outline => DrawMsg::Outline,
            PlanTool::Redact => DrawMsg::Redact,
            PlanTool::Pixelate => DrawMsg::Pixelate,
        };

        // Per-region block size override applies for this gesture only
        let saved_block_size = self.config.pixelation_block_size;
        if let Some(block_size) = region.block_size {
            self.config.pixelation_block_size = block_size;
        }

        handle_draw_msg(&mut self.state, &self.config, msg(DrawAction::ModeToggle));
        handle_draw_msg(
            &mut self.state,
            &self.config,
            msg(DrawAction::Start(region.start.0, region.start.1)),
        );
        if let Some(draft) = self.state.draft.as_mut() {
            draft.label = region.label.clone();
        }
        handle_draw_msg(
            &mut self.state,
            &self.config,
            msg(DrawAction::End(region.end.0, region.end.1)),
        );
        handle_draw_msg(&mut self.state, &self.config, msg(DrawAction::ModeToggle));

        self.config.pixelation_block_size = saved_block_size;
    }

    /// Apply every region of a plan
    pub fn apply_plan(&mut self, plan: &RedactPlan) {
        for region in &plan.regions {
            if let Some(label) = &region.label {
                log::info!("Applying {:?} region: {}", region.tool, label);
            }
            self.replay_region(region);
        }
    }

    /// Render all visible annotations onto the image
    pub fn render(&mut self) {
        let options = OutlineOptions {
            dash: self.config.dash_pattern.clone(),
            thickness: crate::render::geometry::dash::THICKNESS,
        };
        draw_annotations_in_order(&mut self.image, self.state.visible(), &options);
    }

    /// Save the image as PNG
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let mut file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_png(&mut file, &self.image)
            .with_context(|| format!("Failed to encode {}", path.display()))
    }

    /// Default output path: the configured save directory plus a
    /// timestamped file name.
    pub fn default_output_path(&self) -> PathBuf {
        let name = chrono::Local::now()
            .format("Mosaic_%Y-%m-%d_%H-%M-%S.png")
            .to_string();
        self.config.save_location.directory().join(name)
    }
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Annotation;
    use image::Rgba;

    fn editor_with_white_image(w: u32, h: u32) -> Editor {
        Editor {
            image: RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])),
            state: AnnotationState::default(),
            config: MosaicConfig::default(),
        }
    }

    fn plan_json() -> &'static str {
        r#"{
            "regions": [
                { "tool": "redact", "start": [2, 2], "end": [8, 8] },
                { "tool": "pixelate", "start": [10, 0], "end": [20, 10],
                  "block_size": 4, "label": "card number" },
                { "tool": "outline", "start": [0, 0], "end": [19, 19] }
            ]
        }"#
    }

    #[test]
    fn test_plan_parses_from_json() {
        let plan: RedactPlan = serde_json::from_str(plan_json()).unwrap();
        assert_eq!(plan.regions.len(), 3);
        assert_eq!(plan.regions[0].tool, PlanTool::Redact);
        assert_eq!(plan.regions[1].block_size, Some(4));
        assert_eq!(plan.regions[1].label.as_deref(), Some("card number"));
        assert_eq!(plan.regions[2].tool, PlanTool::Outline);
    }

    #[test]
    fn test_apply_plan_commits_in_order() {
        let plan: RedactPlan = serde_json::from_str(plan_json()).unwrap();
        let mut editor = editor_with_white_image(20, 20);

        editor.apply_plan(&plan);

        let visible = editor.state.visible();
        assert_eq!(visible.len(), 3);
        let Annotation::Pixelate(pix) = &visible[1] else {
            panic!("expected the pixelation second");
        };
        assert_eq!(pix.block_size, 4);
        assert_eq!(pix.label.as_deref(), Some("card number"));
        assert!(visible[2].is_shape());

        // All tool modes were disarmed after replay
        assert!(!editor.state.any_mode());
        // The per-region block size override did not stick
        assert_eq!(editor.config.pixelation_block_size, 10);
    }

    #[test]
    fn test_apply_plan_then_render_redacts_pixels() {
        let plan = RedactPlan {
            regions: vec![PlanRegion {
                tool: PlanTool::Redact,
                start: (2.0, 2.0),
                end: (8.0, 8.0),
                label: None,
                block_size: None,
            }],
        };
        let mut editor = editor_with_white_image(10, 10);
        editor.apply_plan(&plan);
        editor.render();

        assert_eq!(*editor.image.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*editor.image.get_pixel(9, 9), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_save_writes_a_decodable_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let editor = editor_with_white_image(6, 4);
        editor.save(&path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (6, 4));
        assert_eq!(*reloaded.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_load_image_message_replaces_image_and_state() {
        let mut editor = editor_with_white_image(4, 4);
        editor.state.add(Annotation::Redact(crate::domain::RedactAnnotation {
            x: 0.0,
            y: 0.0,
            x2: 1.0,
            y2: 1.0,
            label: None,
        }));

        // Encode a 2x3 image to PNG bytes
        let small = RgbaImage::from_pixel(2, 3, Rgba([9, 9, 9, 255]));
        let mut bytes = Vec::new();
        write_png(&mut bytes, &small).unwrap();

        editor
            .handle_message(Msg::LoadImage {
                name: "shared.png".to_string(),
                bytes,
            })
            .unwrap();

        assert_eq!(editor.image.dimensions(), (2, 3));
        assert!(editor.state.visible().is_empty());
    }

    #[test]
    fn test_undecodable_share_payload_is_an_error() {
        let mut editor = editor_with_white_image(4, 4);
        let result = editor.handle_message(Msg::LoadImage {
            name: "junk.bin".to_string(),
            bytes: vec![0, 1, 2],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_load_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{regions: oops").unwrap();

        assert!(RedactPlan::load(&path).is_err());
        assert!(RedactPlan::load(&dir.path().join("absent.json")).is_err());
    }
}
