use crate::geom::{Point, Size, point};

/// A simulated rectangle. `x`/`y` is the top-left corner; forces only touch the velocity
/// (and, inside [`crate::BoundedBox`]'s reflection step, the position).
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T = ()> {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub data: T,
}

impl Node<()> {
    pub fn new(index: usize, x: f64, y: f64) -> Self {
        Self::with_data(index, x, y, ())
    }
}

impl<T> Node<T> {
    pub fn with_data(index: usize, x: f64, y: f64, data: T) -> Self {
        Self {
            index,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            data,
        }
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn center(&self, size: Size) -> Point {
        point(self.x + size.width / 2.0, self.y + size.height / 2.0)
    }

    /// Center after the velocity accumulated so far this tick is applied.
    pub fn projected_center(&self, size: Size) -> Point {
        point(
            self.x + self.vx + size.width / 2.0,
            self.y + self.vy + size.height / 2.0,
        )
    }
}

/// Checks that every node's `index` matches its position in `nodes`.
pub(crate) fn validate_indices<T>(nodes: &[Node<T>]) -> crate::Result<()> {
    for (position, node) in nodes.iter().enumerate() {
        if node.index != position {
            return Err(crate::Error::IndexMismatch {
                position,
                index: node.index,
            });
        }
    }
    Ok(())
}
