//! Font loading and glyph resolution.
//!
//! The viewer needs exactly one face for its whole lifetime, acquired either
//! from an explicit file path or by querying the system font database. The
//! face owns the raw font bytes and re-parses them with `ttf-parser` on each
//! glyph lookup; parsing is cheap and keeps [`FontFace`] free of self-borrow
//! gymnastics.
//!
//! [`OutlineSource`] is the seam between font resolution and the viewer
//! core: the viewer only ever asks "give me the outline for this character",
//! which lets tests drive the mesh cache with synthetic outlines instead of
//! real font files.

pub mod outline;
pub mod tessellate;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source};

use crate::font::outline::{GlyphOutline, OutlineCollector};

/// Errors produced while resolving font resources.
#[derive(thiserror::Error, Debug)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse font face")]
    Parse,

    #[error("no fonts found on this system")]
    NoFontsAvailable,

    #[error("selected system font face is not file-backed")]
    NonFileBackedSource,

    #[error("font has no glyph for {ch:?}")]
    GlyphNotFound { ch: char },

    #[error("glyph for {ch:?} has no drawable outline")]
    EmptyOutline { ch: char },
}

/// Anything that can resolve a character to a glyph outline.
///
/// Implemented by [`FontFace`]; test code supplies stub implementations.
pub trait OutlineSource {
    fn glyph_outline(&self, ch: char) -> Result<GlyphOutline, FontError>;
}

/// A loaded font face: owned file bytes plus the face index within them.
///
/// Created once at startup and kept for the process lifetime.
#[derive(Debug)]
pub struct FontFace {
    bytes: Arc<[u8]>,
    index: u32,
    units_per_em: f32,
}

impl FontFace {
    /// Load the first face of a font file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| FontError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(Arc::from(data), 0)
    }

    /// Parse a face from owned bytes (collections select via `index`).
    pub fn from_bytes(bytes: Arc<[u8]>, index: u32) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&bytes, index).map_err(|_| FontError::Parse)?;
        let units_per_em = f32::from(face.units_per_em());
        Ok(Self {
            bytes,
            index,
            units_per_em,
        })
    }

    /// Resolve a face from the system font database.
    ///
    /// Tries the given family names in order, then generic serif, then
    /// whatever face the database lists first.
    pub fn from_system(families: &[String]) -> Result<Self, FontError> {
        let mut db = Database::new();
        db.load_system_fonts();

        let first = db.faces().next().ok_or(FontError::NoFontsAvailable)?.id;

        let named: Vec<Family<'_>> = families
            .iter()
            .map(|f| match f.trim() {
                s if s.eq_ignore_ascii_case("serif") => Family::Serif,
                s if s.eq_ignore_ascii_case("sans-serif") => Family::SansSerif,
                s if s.eq_ignore_ascii_case("monospace") => Family::Monospace,
                s => Family::Name(s),
            })
            .collect();

        let id = db
            .query(&Query {
                families: &named,
                weight: fontdb::Weight::NORMAL,
                stretch: fontdb::Stretch::Normal,
                style: fontdb::Style::Normal,
            })
            .or_else(|| {
                let fallback = [Family::Serif];
                db.query(&Query {
                    families: &fallback,
                    weight: fontdb::Weight::NORMAL,
                    stretch: fontdb::Stretch::Normal,
                    style: fontdb::Style::Normal,
                })
            })
            .unwrap_or(first);

        let info = db.face(id).ok_or(FontError::NoFontsAvailable)?;
        match &info.source {
            Source::File(path) => {
                let data = fs::read(path).map_err(|source| FontError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_bytes(Arc::from(data), info.index)
            }
            _ => Err(FontError::NonFileBackedSource),
        }
    }

    /// The face's family name from its name table, if present.
    pub fn family_name(&self) -> Option<String> {
        let face = self.parse().ok()?;
        face.names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    #[inline]
    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    fn parse(&self) -> Result<ttf_parser::Face<'_>, FontError> {
        ttf_parser::Face::parse(&self.bytes, self.index).map_err(|_| FontError::Parse)
    }
}

impl OutlineSource for FontFace {
    /// Extract the outline for a character, scaled into em units.
    fn glyph_outline(&self, ch: char) -> Result<GlyphOutline, FontError> {
        let face = self.parse()?;
        let glyph_id = face
            .glyph_index(ch)
            .ok_or(FontError::GlyphNotFound { ch })?;

        let mut collector = OutlineCollector::new(1.0 / self.units_per_em);
        // `outline_glyph` returns the bounding box, or None for glyphs with
        // no outline data (space and friends).
        if face.outline_glyph(glyph_id, &mut collector).is_none() {
            return Err(FontError::EmptyOutline { ch });
        }

        let outline = collector.finish();
        if outline.is_empty() {
            return Err(FontError::EmptyOutline { ch });
        }
        Ok(outline)
    }
}
