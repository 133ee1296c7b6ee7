//! Orthographic projection of glyph space onto the viewport.
//!
//! Glyph outlines are in em units, so a glyph roughly fills the unit square
//! above the baseline. The fixed view bounds add margin for descenders and
//! side bearings: x ∈ [-0.5, 1], y ∈ [-0.5, 1]. There is no user camera;
//! the only variable is the viewport size, and the matrix is recomputed from
//! it on every frame.

use glam::Mat4;

/// Fixed glyph design-space view bounds (em units), min corner.
pub const VIEW_MIN: [f32; 2] = [-0.5, -0.5];
/// Fixed glyph design-space view bounds (em units), max corner.
pub const VIEW_MAX: [f32; 2] = [1.0, 1.0];

/// Build the clip-from-em matrix for a viewport.
///
/// The view bounds are widened symmetrically on one axis to match the
/// viewport aspect ratio, so the glyph is never stretched and everything
/// inside the bounds stays visible at any window size.
pub fn ortho_matrix(width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;

    let (mut min_x, mut min_y) = (VIEW_MIN[0], VIEW_MIN[1]);
    let (mut max_x, mut max_y) = (VIEW_MAX[0], VIEW_MAX[1]);
    let span_x = max_x - min_x;
    let span_y = max_y - min_y;
    let bounds_aspect = span_x / span_y;

    if aspect > bounds_aspect {
        let extra = span_y * aspect - span_x;
        min_x -= extra * 0.5;
        max_x += extra * 0.5;
    } else {
        let extra = span_x / aspect - span_y;
        min_y -= extra * 0.5;
        max_y += extra * 0.5;
    }

    Mat4::orthographic_rh(min_x, max_x, min_y, max_y, -1.0, 1.0)
}
