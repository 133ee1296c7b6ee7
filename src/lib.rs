//! `glyphscope` library crate root.
//!
//! An interactive viewer for a single font glyph as a triangle mesh: type a
//! character to switch glyphs, Space cycles contour / wireframe / solid
//! rendering, Esc quits.
//!
//! The binary target stays thin and calls into [`run_viewer`]; the modules
//! are public so the pipeline pieces (font resolution, tessellation, the
//! viewer core) can be used on their own.

pub mod font;
pub mod mesh;
pub mod render;
pub mod viewer;

pub use font::FontFace;
pub use font::tessellate::QualityTier;
pub use mesh::GlyphMesh;
pub use render::app::{ViewerOptions, run_viewer};
pub use viewer::{GlyphViewer, RenderMode};
