//! Glyph outline representation.
//!
//! A [`GlyphOutline`] is a set of closed contours stored as a
//! `lyon::path::Path` in em units (font units divided by units-per-em).
//! Keeping the path in em units means the rest of the pipeline never needs to
//! know the face's units-per-em: a typical glyph sits inside the unit square
//! above the baseline, which is exactly the space the viewer's orthographic
//! projection expects.
//!
//! [`OutlineCollector`] bridges `ttf-parser`'s outline callbacks into a lyon
//! path builder. A glyph may contain several contours; `move_to` starts a new
//! one and `close` ends it.

use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};

/// Closed glyph contours as a lyon fill path, in em units.
#[derive(Debug, Clone)]
pub struct GlyphOutline {
    path: Path,
}

impl GlyphOutline {
    pub fn from_path(path: Path) -> Self {
        Self { path }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the path carries no contours at all (e.g. a space glyph).
    pub fn is_empty(&self) -> bool {
        self.path.iter().next().is_none()
    }

    /// Flatten curves into closed polylines, one per contour, in outline
    /// order. The closing edge back to the first point is implicit.
    pub fn flatten_contours(&self, tolerance: f32) -> Vec<Vec<[f32; 2]>> {
        let mut contours = Vec::new();
        let mut current: Vec<[f32; 2]> = Vec::new();

        for event in self.path.iter().flattened(tolerance) {
            match event {
                PathEvent::Begin { at } => {
                    current.clear();
                    current.push([at.x, at.y]);
                }
                PathEvent::Line { to, .. } => current.push([to.x, to.y]),
                PathEvent::End { .. } => {
                    // The flattener may emit an explicit segment back to the
                    // start; the loop closure is implicit in our format.
                    if current.len() > 1 && current.first() == current.last() {
                        current.pop();
                    }
                    if current.len() >= 2 {
                        contours.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
                _ => {}
            }
        }

        contours
    }
}

/// Collects `ttf-parser` outline callbacks into a lyon path, scaling every
/// coordinate from font units into em units as it goes.
pub struct OutlineCollector {
    builder: lyon::path::Builder,
    scale: f32,
    contour_open: bool,
}

impl OutlineCollector {
    /// `scale` is `1.0 / units_per_em` of the face being outlined.
    pub fn new(scale: f32) -> Self {
        Self {
            builder: Path::builder(),
            scale,
            contour_open: false,
        }
    }

    pub fn finish(mut self) -> GlyphOutline {
        if self.contour_open {
            self.builder.close();
        }
        GlyphOutline::from_path(self.builder.build())
    }

    #[inline]
    fn pt(&self, x: f32, y: f32) -> lyon::math::Point {
        point(x * self.scale, y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.contour_open {
            self.builder.close();
        }
        self.builder.begin(self.pt(x, y));
        self.contour_open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.pt(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quadratic_bezier_to(self.pt(x1, y1), self.pt(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder
            .cubic_bezier_to(self.pt(x1, y1), self.pt(x2, y2), self.pt(x, y));
    }

    fn close(&mut self) {
        if self.contour_open {
            self.builder.close();
            self.contour_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_parser::OutlineBuilder as _;

    #[test]
    fn collector_scales_to_em_units() {
        // Emulate a 1000-upm face drawing a 1000x1000 square.
        let mut collector = OutlineCollector::new(1.0 / 1000.0);
        collector.move_to(0.0, 0.0);
        collector.line_to(1000.0, 0.0);
        collector.line_to(1000.0, 1000.0);
        collector.line_to(0.0, 1000.0);
        collector.close();

        let outline = collector.finish();
        let contours = outline.flatten_contours(0.01);
        assert_eq!(contours.len(), 1);
        for &[x, y] in &contours[0] {
            assert!((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn unclosed_contour_is_closed_on_finish() {
        let mut collector = OutlineCollector::new(1.0);
        collector.move_to(0.0, 0.0);
        collector.line_to(1.0, 0.0);
        collector.line_to(1.0, 1.0);
        // no explicit close()

        let outline = collector.finish();
        assert!(!outline.is_empty());
        assert_eq!(outline.flatten_contours(0.01).len(), 1);
    }

    #[test]
    fn empty_outline_reports_empty() {
        let outline = OutlineCollector::new(1.0).finish();
        assert!(outline.is_empty());
        assert!(outline.flatten_contours(0.01).is_empty());
    }

    #[test]
    fn curves_flatten_into_multiple_segments() {
        let mut collector = OutlineCollector::new(1.0);
        collector.move_to(0.0, 0.0);
        collector.quad_to(0.5, 1.0, 1.0, 0.0);
        collector.close();

        let outline = collector.finish();
        let contours = outline.flatten_contours(0.001);
        assert_eq!(contours.len(), 1);
        // A tight tolerance must break the curve into more than one segment.
        assert!(contours[0].len() > 3);
    }
}
