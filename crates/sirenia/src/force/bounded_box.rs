//! Keeps rectangles inside an axis-aligned region by reflecting and clamping their velocity.

use tracing::debug;

use super::{Force, SizeFn, check_bound_len, constant_size};
use crate::error::{Error, Result};
use crate::geom::{Bounds, Size};
use crate::node::{Node, validate_indices};

pub struct BoundedBox<T = ()> {
    size: SizeFn<T>,
    bounds: Option<Bounds>,
    sizes: Vec<Size>,
}

impl<T: 'static> Default for BoundedBox<T> {
    fn default() -> Self {
        Self {
            size: constant_size(Size::zero()),
            bounds: None,
            sizes: Vec::new(),
        }
    }
}

impl<T> std::fmt::Debug for BoundedBox<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedBox")
            .field("bounds", &self.bounds)
            .field("nodes", &self.sizes.len())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> BoundedBox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, f: impl Fn(&Node<T>) -> Size + Send + Sync + 'static) -> Self {
        self.set_size(f);
        self
    }

    pub fn with_size_value(mut self, size: Size) -> Self {
        self.set_size_value(size);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.set_bounds(bounds);
        self
    }

    /// Takes effect on the next [`Force::initialize`].
    pub fn set_size(
        &mut self,
        f: impl Fn(&Node<T>) -> Size + Send + Sync + 'static,
    ) -> &mut Self {
        self.size = Box::new(f);
        self
    }

    pub fn set_size_value(&mut self, size: Size) -> &mut Self {
        self.size = constant_size(size);
        self
    }
}

impl<T> BoundedBox<T> {
    pub fn size(&self) -> &(dyn Fn(&Node<T>) -> Size + Send + Sync) {
        self.size.as_ref()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) -> &mut Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn sizes(&self) -> &[Size] {
        &self.sizes
    }
}

/// One axis of the reflection: `pos`/`vel` are the node's coordinate and velocity on that axis,
/// `extent` its size along it. Returns whether the node was corrected.
fn contain_axis(pos: &mut f64, vel: &mut f64, min: f64, max: f64, extent: f64) -> bool {
    let projected = *pos + *vel;
    // Velocity range that keeps the rectangle inside once `pos` has advanced to `projected`.
    let low = min - projected;
    let high = max - (projected + extent);
    if !(low > 0.0 || high < 0.0) {
        return false;
    }
    *pos = projected;
    *vel = -*vel;
    if *vel < low {
        *vel = low;
    }
    if *vel > high {
        *vel = high;
    }
    true
}

impl<T> Force<T> for BoundedBox<T> {
    fn initialize(&mut self, nodes: &[Node<T>]) -> Result<()> {
        validate_indices(nodes)?;
        self.sizes = nodes.iter().map(|n| (self.size)(n)).collect();
        Ok(())
    }

    fn force(&mut self, nodes: &mut [Node<T>]) -> Result<()> {
        let bounds = self.bounds.ok_or(Error::MissingBounds)?;
        check_bound_len(self.sizes.len(), nodes.len())?;

        let mut corrected = 0usize;
        for (node, size) in nodes.iter_mut().zip(&self.sizes) {
            let horizontal = contain_axis(
                &mut node.x,
                &mut node.vx,
                bounds.min.x,
                bounds.max.x,
                size.width,
            );
            let vertical = contain_axis(
                &mut node.y,
                &mut node.vy,
                bounds.min.y,
                bounds.max.y,
                size.height,
            );
            if horizontal || vertical {
                corrected += 1;
            }
        }
        debug!(nodes = nodes.len(), corrected, "bounded box applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::contain_axis;

    #[test]
    fn inside_is_left_alone() {
        let (mut pos, mut vel) = (10.0, 3.0);
        assert!(!contain_axis(&mut pos, &mut vel, 0.0, 100.0, 20.0));
        assert_eq!((pos, vel), (10.0, 3.0));
    }

    #[test]
    fn plain_reflection_when_reversal_is_enough() {
        // Right edge would reach 115; reversing the velocity lands at 85.
        let (mut pos, mut vel) = (85.0, 20.0);
        assert!(contain_axis(&mut pos, &mut vel, 0.0, 100.0, 10.0));
        assert_eq!((pos, vel), (105.0, -20.0));
        assert_eq!(pos + vel, 85.0);
    }

    #[test]
    fn reversed_velocity_is_clamped_to_the_far_edge() {
        let (mut pos, mut vel) = (95.0, 1.0);
        assert!(contain_axis(&mut pos, &mut vel, 0.0, 100.0, 10.0));
        assert_eq!(pos, 96.0);
        assert_eq!(vel, -6.0);
        assert_eq!(pos + vel + 10.0, 100.0);
    }

    #[test]
    fn crossing_the_low_edge_clamps_upwards() {
        let (mut pos, mut vel) = (-8.0, -1.0);
        assert!(contain_axis(&mut pos, &mut vel, 0.0, 100.0, 10.0));
        assert_eq!(pos, -9.0);
        assert_eq!(vel, 9.0);
    }
}
