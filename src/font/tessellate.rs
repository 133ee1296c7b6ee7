//! Outline-to-mesh tessellation.
//!
//! Converts a [`GlyphOutline`] into a [`GlyphMesh`] with lyon's
//! `FillTessellator`. Fonts are authored for non-zero winding, so that is the
//! fill rule used; tolerance comes from the [`QualityTier`], in em units
//! (the outline space), so a tier means the same fidelity for every face.

use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, FillVertexConstructor,
    TessellationError, VertexBuffers,
};

use crate::font::outline::GlyphOutline;
use crate::mesh::GlyphMesh;

/// Discrete triangulation fidelity setting.
///
/// Smaller tolerance means curves are approximated by more, shorter segments
/// and the fill produces more triangles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum QualityTier {
    Low,
    #[default]
    Normal,
    High,
}

impl QualityTier {
    /// Flattening tolerance in em units.
    #[inline]
    pub fn tolerance(self) -> f32 {
        match self {
            Self::Low => 0.01,
            Self::Normal => 0.002,
            Self::High => 0.0005,
        }
    }
}

impl std::str::FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unknown quality tier {other:?} (expected low, normal or high)"
            )),
        }
    }
}

/// Mesh synthesis failures.
#[derive(thiserror::Error, Debug)]
pub enum MeshError {
    #[error("fill tessellation failed: {0:?}")]
    Tessellation(TessellationError),
    #[error("tessellation produced no faces")]
    Empty,
}

struct EmVertex;

impl FillVertexConstructor<[f32; 2]> for EmVertex {
    fn new_vertex(&mut self, vertex: FillVertex) -> [f32; 2] {
        let p = vertex.position();
        [p.x, p.y]
    }
}

/// Tessellate a glyph outline at the given quality tier.
///
/// The result is a pure function of `(outline, tier)`: the tessellator holds
/// no state across calls. An outline whose fill collapses to nothing (all
/// contours degenerate) is an error, so callers never end up holding a mesh
/// with zero faces.
pub fn tessellate_outline(
    outline: &GlyphOutline,
    tier: QualityTier,
) -> Result<GlyphMesh, MeshError> {
    let mut tessellator = FillTessellator::new();
    let mut buffers: VertexBuffers<[f32; 2], u16> = VertexBuffers::new();

    let options = FillOptions::tolerance(tier.tolerance()).with_fill_rule(FillRule::NonZero);

    tessellator
        .tessellate_path(
            outline.path(),
            &options,
            &mut BuffersBuilder::new(&mut buffers, EmVertex),
        )
        .map_err(MeshError::Tessellation)?;

    if buffers.indices.is_empty() {
        return Err(MeshError::Empty);
    }

    Ok(GlyphMesh {
        positions: buffers.vertices,
        indices: buffers.indices,
        contours: outline.flatten_contours(tier.tolerance()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;
    use lyon::path::Path;

    /// Axis-aligned square contour from (x, y) with side `s`.
    fn square(builder: &mut lyon::path::Builder, x: f32, y: f32, s: f32, clockwise: bool) {
        if clockwise {
            builder.begin(point(x, y));
            builder.line_to(point(x, y + s));
            builder.line_to(point(x + s, y + s));
            builder.line_to(point(x + s, y));
        } else {
            builder.begin(point(x, y));
            builder.line_to(point(x + s, y));
            builder.line_to(point(x + s, y + s));
            builder.line_to(point(x, y + s));
        }
        builder.close();
    }

    fn square_outline() -> GlyphOutline {
        let mut builder = Path::builder();
        square(&mut builder, 0.0, 0.0, 1.0, false);
        GlyphOutline::from_path(builder.build())
    }

    /// Outer square with an opposite-winding inner square: a ring.
    fn ring_outline() -> GlyphOutline {
        let mut builder = Path::builder();
        square(&mut builder, 0.0, 0.0, 1.0, false);
        square(&mut builder, 0.25, 0.25, 0.5, true);
        GlyphOutline::from_path(builder.build())
    }

    #[test]
    fn square_tessellates_to_faces_inside_bounds() {
        let mesh = tessellate_outline(&square_outline(), QualityTier::Normal).unwrap();
        assert!(mesh.face_count() >= 2);

        let (min, max) = mesh.bounds().unwrap();
        assert!(min[0] >= -1e-4 && min[1] >= -1e-4);
        assert!(max[0] <= 1.0 + 1e-4 && max[1] <= 1.0 + 1e-4);
    }

    #[test]
    fn ring_keeps_both_contours() {
        let mesh = tessellate_outline(&ring_outline(), QualityTier::Normal).unwrap();
        assert_eq!(mesh.contours.len(), 2);
        assert!(mesh.face_count() > 0);

        assert_eq!(mesh.wire_indices().len(), mesh.face_count() * 6);
    }

    #[test]
    fn empty_outline_is_an_error() {
        let outline = GlyphOutline::from_path(Path::builder().build());
        assert!(matches!(
            tessellate_outline(&outline, QualityTier::Normal),
            Err(MeshError::Empty)
        ));
    }

    #[test]
    fn tolerance_tightens_with_tier() {
        assert!(QualityTier::High.tolerance() < QualityTier::Normal.tolerance());
        assert!(QualityTier::Normal.tolerance() < QualityTier::Low.tolerance());
    }

    #[test]
    fn tier_parses_from_cli_names() {
        assert_eq!("low".parse::<QualityTier>().unwrap(), QualityTier::Low);
        assert_eq!("high".parse::<QualityTier>().unwrap(), QualityTier::High);
        assert!("ultra".parse::<QualityTier>().is_err());
    }
}
