pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
/// Axis-aligned region given by its minimum and maximum corners.
pub type Bounds = euclid::Box2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Builds bounds from `[[x_min, y_min], [x_max, y_max]]`.
pub fn bounds(min: [f64; 2], max: [f64; 2]) -> Bounds {
    Bounds::new(point(min[0], min[1]), point(max[0], max[1]))
}

/// Component-wise maximum of two sizes.
pub(crate) fn max_size(a: Size, b: Size) -> Size {
    size(a.width.max(b.width), a.height.max(b.height))
}
