//! Layout-driven fragrance card renderer: normalized records plus a JSON
//! layout spec in, raster card images out.

pub mod error;
pub mod export;
pub mod font;
pub mod input;
pub mod lookup;
pub mod record;
pub mod render;
pub mod spec;
pub mod text;

pub use error::CardError;
pub use record::{FragranceRecord, RawRecord};
pub use render::{render_card, save_card};
pub use spec::CardSpec;
