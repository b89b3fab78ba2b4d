//! Font resolution with a fixed three-tier fallback chain: the requested
//! file, then well-known system fonts, then a built-in 8x8 bitmap font.
//! Resolution never fails; rendering always has some usable face.

use std::{collections::HashMap, path::Path, sync::Arc};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::{Font, Scale};
use tracing::debug;

/// Cell size of the built-in bitmap font. Fixed; ignores the requested size.
pub const BUILTIN_PX: f32 = 8.0;

const SYSTEM_FALLBACKS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
];

static FONT_CACHE: Lazy<Mutex<HashMap<String, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn load_truetype(path: &Path) -> Option<Arc<Font<'static>>> {
    let key = path.to_string_lossy().to_string();
    if let Some(f) = FONT_CACHE.lock().get(&key) {
        return Some(Arc::clone(f));
    }
    let bytes = std::fs::read(path).ok()?;
    let f = Arc::new(Font::try_from_vec(bytes)?);
    FONT_CACHE.lock().insert(key, Arc::clone(&f));
    Some(f)
}

#[derive(Clone)]
pub enum FontHandle {
    Truetype { font: Arc<Font<'static>>, size: f32 },
    /// 8x8 bitmap glyphs, last-resort tier.
    Builtin,
}

impl FontHandle {
    /// Resolve a requested font to a usable handle. Tier 1: the given path.
    /// Tier 2: system fonts at the same size. Tier 3: the built-in font.
    pub fn resolve(path: Option<&str>, size: u32) -> FontHandle {
        let size = size as f32;
        if let Some(p) = path {
            if !p.trim().is_empty() {
                if let Some(font) = load_truetype(Path::new(p)) {
                    return FontHandle::Truetype { font, size };
                }
                debug!("font {p} unavailable, falling back to system fonts");
            }
        }
        for candidate in SYSTEM_FALLBACKS {
            if let Some(font) = load_truetype(Path::new(candidate)) {
                return FontHandle::Truetype { font, size };
            }
        }
        debug!("no system font available, using built-in bitmap font");
        FontHandle::Builtin
    }

    /// Nominal pixel size; line advance during wrapping is size + spacing.
    pub fn size(&self) -> f32 {
        match self {
            FontHandle::Truetype { size, .. } => *size,
            FontHandle::Builtin => BUILTIN_PX,
        }
    }

    pub fn ascent(&self) -> f32 {
        match self {
            FontHandle::Truetype { font, size } => {
                font.v_metrics(Scale::uniform(*size)).ascent
            }
            FontHandle::Builtin => BUILTIN_PX,
        }
    }

    /// Advance width of `text` in pixels. Matches the caret advance used by
    /// drawing, so measured lines land where measurement said they would.
    pub fn measure(&self, text: &str) -> f32 {
        match self {
            FontHandle::Truetype { font, size } => {
                let scale = Scale::uniform(*size);
                text.chars()
                    .map(|ch| font.glyph(ch).scaled(scale).h_metrics().advance_width)
                    .sum()
            }
            FontHandle::Builtin => text.chars().count() as f32 * BUILTIN_PX,
        }
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontHandle::Truetype { size, .. } => write!(f, "Truetype({size}px)"),
            FontHandle::Builtin => write!(f, "Builtin"),
        }
    }
}
