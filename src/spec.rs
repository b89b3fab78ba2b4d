//! Layout specification: the JSON contract describing canvas, colors,
//! fonts and named regions. Existing spec files must keep parsing, so the
//! field names here are the schema.

use std::path::{Path, PathBuf};

use image::Rgba;
use serde::Deserialize;

use crate::error::CardError;

#[derive(Debug, Clone, Deserialize)]
pub struct CardSpec {
    pub canvas: Canvas,
    pub colors: Colors,
    pub fonts: FontSet,
    pub layout: Layout,
    /// Directory of the spec file; relative asset paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Canvas {
    pub template_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Colors {
    pub primary: String,
    pub accent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FontSet {
    pub headline: FontSpec,
    pub subhead: FontSpec,
    pub body: FontSpec,
    pub small: FontSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FontSpec {
    #[serde(default)]
    pub path: String,
    pub size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Layout {
    pub title: TitleRegion,
    pub longevity_header: HeaderRegion,
    pub longevity_value: Region,
    pub projection_header: HeaderRegion,
    pub projection_value: Region,
    pub divider: DividerRegion,
    pub description: ParagraphRegion,
    pub year: LabelRegion,
    pub rating: LabelRegion,
    pub right_col: RightCol,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub xy: [i32; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitleRegion {
    pub xy: [i32; 2],
    #[serde(default = "default_accent_words")]
    pub accent_words: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeaderRegion {
    pub xy: [i32; 2],
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DividerRegion {
    pub xy: [i32; 2],
    pub to: [i32; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParagraphRegion {
    pub xy: [i32; 2],
    pub max_width: f32,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelRegion {
    pub xy: [i32; 2],
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RightCol {
    pub when: SectionRegion,
    #[serde(rename = "where")]
    pub where_: SectionRegion,
    pub profile: SectionRegion,
    pub notes: SectionRegion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionRegion {
    pub header_xy: [i32; 2],
    pub list_xy: [i32; 2],
    pub items_spacing: i32,
}

fn default_accent_words() -> usize {
    1
}

fn default_line_spacing() -> f32 {
    6.0
}

impl CardSpec {
    pub fn load(path: &Path) -> Result<CardSpec, CardError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CardError::Config(format!("failed to read spec {}: {e}", path.display())))?;
        let mut spec: CardSpec = serde_json::from_str(&raw)
            .map_err(|e| CardError::Config(format!("invalid spec {}: {e}", path.display())))?;
        spec.base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        Ok(spec)
    }

    pub fn template_path(&self) -> PathBuf {
        self.base_dir.join(&self.canvas.template_path)
    }
}

pub fn hex_color(s: &str) -> Result<Rgba<u8>, CardError> {
    let s = s.trim().trim_start_matches('#');
    if s.len() != 6 {
        return Err(CardError::Config(format!("invalid color: {s}")));
    }
    let b = hex::decode(s).map_err(|_| CardError::Config(format!("invalid color: {s}")))?;
    Ok(Rgba([b[0], b[1], b[2], 255]))
}
