use opencv::core::{Point, Vec4i};

/// Multiplier used to turn the law-of-cosines result into degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegreeConversion {
    /// 180/π
    #[default]
    Exact,
    /// The whole-number multiplier 57, kept for parity with older recordings
    Approximate,
}

impl DegreeConversion {
    pub fn factor(self) -> f64 {
        match self {
            DegreeConversion::Exact => 180.0 / std::f64::consts::PI,
            DegreeConversion::Approximate => 57.0,
        }
    }

    pub fn to_degrees(self, radians: f64) -> f64 {
        radians * self.factor()
    }
}

/// A convexity defect, as indices into the contour it was computed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defect {
    pub start: usize,
    pub end: usize,
    pub far: usize,
    /// Distance from the far point to the hull, in pixels
    pub depth: f32,
}

impl Defect {
    /// Decode OpenCV's packed form. Depth is fixed point with 8 fractional bits.
    pub fn from_vec4i(raw: Vec4i) -> Option<Self> {
        Some(Self {
            start: usize::try_from(raw[0]).ok()?,
            end: usize::try_from(raw[1]).ok()?,
            far: usize::try_from(raw[2]).ok()?,
            depth: raw[3] as f32 / 256.0,
        })
    }

    /// Look up the triangle vertices in `contour`. Returns None if any index is out of range.
    pub fn triangle(&self, contour: &[Point]) -> Option<Triangle> {
        Some(Triangle {
            start: *contour.get(self.start)?,
            end: *contour.get(self.end)?,
            far: *contour.get(self.far)?,
        })
    }
}

/// The triangle spanned by a defect's start, end and far points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub start: Point,
    pub end: Point,
    pub far: Point,
}

impl Triangle {
    /// Side lengths `(a, b, c)`: `a` is opposite `far`, `b` runs far→start, `c` runs end→far.
    pub fn sides(&self) -> (f64, f64, f64) {
        (
            distance(self.start, self.end),
            distance(self.start, self.far),
            distance(self.far, self.end),
        )
    }

    /// Interior angle at `far` via the law of cosines.
    ///
    /// Degenerate triangles, where `far` coincides with `start` or `end`, have no angle.
    pub fn angle_at_far(&self, conversion: DegreeConversion) -> Option<f64> {
        let (a, b, c) = self.sides();
        angle_from_sides(a, b, c, conversion)
    }
}

/// Angle between sides `b` and `c` of a triangle whose third side is `a`
pub fn angle_from_sides(a: f64, b: f64, c: f64, conversion: DegreeConversion) -> Option<f64> {
    if b == 0.0 || c == 0.0 {
        return None;
    }

    let cosine = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
    Some(conversion.to_degrees(cosine.acos()))
}

/// Euclidean distance between two pixel positions
pub fn distance(p: Point, q: Point) -> f64 {
    let dx = (q.x - p.x) as f64;
    let dy = (q.y - p.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// A defect accepted as the gap between two raised fingers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valley {
    pub far: Point,
    pub angle: f64,
}

/// Per-frame result of the finger counter
#[derive(Debug, Clone, PartialEq)]
pub struct HandReading {
    pub contour_index: usize,
    pub contour_area: f64,
    pub valley_count: usize,
    pub finger_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn right_angle_at_far() {
        let tri = Triangle {
            start: Point::new(0, 30),
            end: Point::new(40, 0),
            far: Point::new(0, 0),
        };

        let exact = tri.angle_at_far(DegreeConversion::Exact).unwrap();
        assert!((exact - 90.0).abs() < EPS, "got {exact}");

        let approx = tri.angle_at_far(DegreeConversion::Approximate).unwrap();
        assert!((approx - std::f64::consts::FRAC_PI_2 * 57.0).abs() < EPS);
        assert!(approx <= 90.0);
    }

    #[test]
    fn equilateral_angle_uses_conversion_factor() {
        let l = 7.0;
        let approx = angle_from_sides(l, l, l, DegreeConversion::Approximate).unwrap();
        let expected = 60.0 * (57.0 / (180.0 / std::f64::consts::PI));
        assert!((approx - expected).abs() < 1e-9, "got {approx}");

        let exact = angle_from_sides(l, l, l, DegreeConversion::Exact).unwrap();
        assert!((exact - 60.0).abs() < 1e-9, "got {exact}");
    }

    #[test]
    fn near_equilateral_triangle() {
        // 56/97 approximates sqrt(3)/2 closely enough for a one-degree check
        let tri = Triangle {
            start: Point::new(0, 0),
            end: Point::new(112, 0),
            far: Point::new(56, 97),
        };
        let exact = tri.angle_at_far(DegreeConversion::Exact).unwrap();
        assert!((exact - 60.0).abs() < 0.1, "got {exact}");

        let approx = tri.angle_at_far(DegreeConversion::Approximate).unwrap();
        assert!((approx - exact * 57.0 / DegreeConversion::Exact.factor()).abs() < 1e-9);
    }

    #[test]
    fn straight_line_is_180_degrees() {
        let tri = Triangle {
            start: Point::new(0, 0),
            end: Point::new(10, 0),
            far: Point::new(5, 0),
        };
        let angle = tri.angle_at_far(DegreeConversion::Exact).unwrap();
        assert!((angle - 180.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_has_no_angle() {
        let tri = Triangle {
            start: Point::new(3, 3),
            end: Point::new(10, 0),
            far: Point::new(3, 3),
        };
        assert_eq!(tri.angle_at_far(DegreeConversion::Exact), None);
    }

    #[test]
    fn decodes_fixed_point_depth() {
        let defect = Defect::from_vec4i(Vec4i::from_array([4, 9, 6, 512 + 128])).unwrap();
        assert_eq!((defect.start, defect.end, defect.far), (4, 9, 6));
        assert!((defect.depth - 2.5).abs() < f32::EPSILON);

        assert!(Defect::from_vec4i(Vec4i::from_array([-1, 0, 0, 0])).is_none());
    }

    #[test]
    fn triangle_lookup_rejects_out_of_range_indices() {
        let contour = [Point::new(0, 0), Point::new(5, 5)];
        let defect = Defect { start: 0, end: 1, far: 2, depth: 0.0 };
        assert!(defect.triangle(&contour).is_none());
    }
}
