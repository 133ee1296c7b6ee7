//! Viewer core: the glyph mesh cache and the render-mode state machine.
//!
//! [`GlyphViewer`] is the single owned aggregate holding everything the
//! renderer reads each frame: the active symbol's mesh (at most one alive at
//! any time) and the current [`RenderMode`]. It is generic over an
//! [`OutlineSource`] so the cache semantics are testable without font files.

pub mod input;

use log::debug;

use crate::font::tessellate::{self, MeshError, QualityTier};
use crate::font::{FontError, OutlineSource};
use crate::mesh::GlyphMesh;

/// Why a symbol could not be displayed: resolution vs. synthesis.
#[derive(thiserror::Error, Debug)]
pub enum SymbolError {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Visualization style for the current mesh. Cyclic; advances only through
/// [`RenderMode::advance`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Contours,
    Wireframe,
    Solid,
}

impl RenderMode {
    /// The next mode in the Contours → Wireframe → Solid → Contours cycle.
    #[must_use]
    pub fn advance(self) -> Self {
        match self {
            Self::Contours => Self::Wireframe,
            Self::Wireframe => Self::Solid,
            Self::Solid => Self::Contours,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Contours => "contours",
            Self::Wireframe => "wireframe",
            Self::Solid => "solid",
        }
    }
}

/// The viewer aggregate: font source, single-slot mesh cache, mode state.
pub struct GlyphViewer<S> {
    source: S,
    quality: QualityTier,
    symbol: char,
    mesh: Option<GlyphMesh>,
    mode: RenderMode,
}

impl<S: OutlineSource> GlyphViewer<S> {
    /// Build a viewer showing `symbol`. Fails if the initial symbol cannot
    /// be resolved or meshed; startup treats that as fatal.
    pub fn new(source: S, symbol: char, quality: QualityTier) -> Result<Self, SymbolError> {
        let mut viewer = Self {
            source,
            quality,
            symbol,
            mesh: None,
            mode: RenderMode::default(),
        };
        viewer.set_active_symbol(symbol)?;
        Ok(viewer)
    }

    /// Switch the displayed symbol, rebuilding the mesh.
    ///
    /// The previous mesh is dropped before the new build starts, so a failed
    /// lookup or tessellation leaves the slot empty rather than showing a
    /// stale glyph. The error says which stage failed; the viewer keeps
    /// running either way.
    pub fn set_active_symbol(&mut self, ch: char) -> Result<(), SymbolError> {
        self.mesh = None;
        self.symbol = ch;

        let outline = self.source.glyph_outline(ch)?;
        let mesh = tessellate::tessellate_outline(&outline, self.quality)?;
        debug!(
            "symbol {:?}: {} vertices, {} faces, {} contours",
            ch,
            mesh.positions.len(),
            mesh.face_count(),
            mesh.contours.len()
        );

        self.mesh = Some(mesh);
        Ok(())
    }

    /// The cached mesh, if the last rebuild succeeded. The reference is
    /// valid until the next [`Self::set_active_symbol`] call.
    #[inline]
    pub fn current_mesh(&self) -> Option<&GlyphMesh> {
        self.mesh.as_ref()
    }

    #[inline]
    pub fn active_symbol(&self) -> char {
        self.symbol
    }

    #[inline]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Cycle to the next render mode and return it.
    pub fn advance_mode(&mut self) -> RenderMode {
        self.mode = self.mode.advance();
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::outline::GlyphOutline;
    use lyon::math::point;
    use lyon::path::Path;

    /// Stub source: 's' resolves to a unit square, 'o' to a square ring,
    /// everything else is missing from the "font".
    struct StubSource;

    fn square_path() -> Path {
        let mut b = Path::builder();
        b.begin(point(0.0, 0.0));
        b.line_to(point(1.0, 0.0));
        b.line_to(point(1.0, 1.0));
        b.line_to(point(0.0, 1.0));
        b.close();
        b.build()
    }

    fn ring_path() -> Path {
        let mut b = Path::builder();
        b.begin(point(0.0, 0.0));
        b.line_to(point(1.0, 0.0));
        b.line_to(point(1.0, 1.0));
        b.line_to(point(0.0, 1.0));
        b.close();
        // Inner contour wound the opposite way punches a hole.
        b.begin(point(0.25, 0.25));
        b.line_to(point(0.25, 0.75));
        b.line_to(point(0.75, 0.75));
        b.line_to(point(0.75, 0.25));
        b.close();
        b.build()
    }

    impl OutlineSource for StubSource {
        fn glyph_outline(&self, ch: char) -> Result<GlyphOutline, FontError> {
            match ch {
                's' => Ok(GlyphOutline::from_path(square_path())),
                'o' => Ok(GlyphOutline::from_path(ring_path())),
                _ => Err(FontError::GlyphNotFound { ch }),
            }
        }
    }

    fn viewer() -> GlyphViewer<StubSource> {
        GlyphViewer::new(StubSource, 's', QualityTier::Normal).unwrap()
    }

    #[test]
    fn resolvable_symbol_yields_mesh_with_faces() {
        let v = viewer();
        assert_eq!(v.active_symbol(), 's');
        let mesh = v.current_mesh().unwrap();
        assert!(mesh.face_count() > 0);
    }

    #[test]
    fn missing_symbol_clears_previous_mesh() {
        let mut v = viewer();
        assert!(v.current_mesh().is_some());

        let err = v.set_active_symbol('?').unwrap_err();
        assert!(matches!(
            err,
            SymbolError::Font(FontError::GlyphNotFound { ch: '?' })
        ));
        // Fail-closed: no stale mesh survives a failed switch.
        assert!(v.current_mesh().is_none());
        assert_eq!(v.active_symbol(), '?');
    }

    #[test]
    fn recovery_after_failed_switch() {
        let mut v = viewer();
        v.set_active_symbol('?').unwrap_err();
        v.set_active_symbol('o').unwrap();
        let mesh = v.current_mesh().unwrap();
        assert_eq!(mesh.contours.len(), 2);
    }

    #[test]
    fn startup_failure_when_initial_symbol_missing() {
        assert!(GlyphViewer::new(StubSource, '?', QualityTier::Normal).is_err());
    }

    #[test]
    fn initial_mode_is_contours() {
        assert_eq!(viewer().mode(), RenderMode::Contours);
    }

    #[test]
    fn mode_cycle_has_period_three() {
        for start in [
            RenderMode::Contours,
            RenderMode::Wireframe,
            RenderMode::Solid,
        ] {
            assert_eq!(start.advance().advance().advance(), start);
        }
    }

    #[test]
    fn two_advances_reach_solid_then_wrap() {
        let mut v = viewer();
        v.advance_mode();
        assert_eq!(v.mode(), RenderMode::Wireframe);
        v.advance_mode();
        assert_eq!(v.mode(), RenderMode::Solid);
        v.advance_mode();
        assert_eq!(v.mode(), RenderMode::Contours);
    }

    #[test]
    fn mode_survives_symbol_switches() {
        let mut v = viewer();
        v.advance_mode();
        v.set_active_symbol('o').unwrap();
        assert_eq!(v.mode(), RenderMode::Wireframe);
        v.set_active_symbol('?').unwrap_err();
        assert_eq!(v.mode(), RenderMode::Wireframe);
    }
}
