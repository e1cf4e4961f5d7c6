use serde::{Deserialize, Serialize};

/// Scale applied to the view half-extents by one zoom-in step.
pub const ZOOM_IN_FACTOR: f64 = 0.8;
/// Scale applied to the view half-extents by one zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 1.2;

/// A point in graph space. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self(x, y)
    }

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    /// Per-axis (Chebyshev) closeness: both coordinates must be within `tolerance`.
    pub fn within(&self, other: &Point, tolerance: f64) -> bool {
        (self.0 - other.0).abs() <= tolerance && (self.1 - other.1).abs() <= tolerance
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point(v.0, v.1)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Visible graph-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            xmin: -10.0,
            xmax: 10.0,
            ymin: -10.0,
            ymax: 10.0,
        }
    }
}

impl View {
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> Point {
        Point((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }

    /// Rescale both axes independently around the current center.
    pub fn scaled(&self, factor: f64) -> View {
        let c = self.center();
        let half_w = self.width() / 2.0 * factor;
        let half_h = self.height() / 2.0 * factor;
        View {
            xmin: c.0 - half_w,
            xmax: c.0 + half_w,
            ymin: c.1 - half_h,
            ymax: c.1 + half_h,
        }
    }

    /// Inverse mapping from viewport pixels to graph space. Pixel y grows
    /// downwards, graph y grows upwards.
    pub fn to_graph(&self, viewport: Viewport, px: f64, py: f64) -> (f64, f64) {
        let gx = self.xmin + (px / viewport.width) * self.width();
        let gy = self.ymax - (py / viewport.height) * self.height();
        (gx, gy)
    }

    /// Forward mapping from graph space to viewport pixels.
    pub fn to_pixel(&self, viewport: Viewport, p: Point) -> (f64, f64) {
        let px = (p.0 - self.xmin) / self.width() * viewport.width;
        let py = (self.ymax - p.1) / self.height() * viewport.height;
        (px, py)
    }
}

/// Pixel dimensions of the surface the view is drawn onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Round `value` to the nearest multiple of `step`.
pub fn snap(value: f64, step: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) {
        return value.round() + 0.0;
    }
    // adding 0.0 folds -0.0 into 0.0
    (value / step).round() * step + 0.0
}

pub fn snap_point(x: f64, y: f64, step: f64) -> Point {
    Point(snap(x, step), snap(y, step))
}
