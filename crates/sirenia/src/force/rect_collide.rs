//! Rectangle collision: pushes overlapping axis-aligned rectangles apart along the axis of
//! least overlap, splitting the correction by relative area.
//!
//! Each pass indexes nodes by their projected centers (position plus the velocity accumulated
//! so far this tick) in a [`Quadtree`] whose quads carry the largest width and height found in
//! their subtree. A quad can be skipped for node `A` as soon as even the largest rectangle it
//! might contain cannot reach `A`.

use tracing::{debug, trace};

use super::{Force, SizeFn, check_bound_len, constant_size};
use crate::error::Result;
use crate::geom::{Point, Size, max_size};
use crate::node::{Node, validate_indices};
use crate::quadtree::{Quad, Quadtree};

pub struct RectCollide<T = ()> {
    size: SizeFn<T>,
    strength: f64,
    iterations: usize,
    sizes: Vec<Size>,
    masses: Vec<f64>,
}

impl<T: 'static> Default for RectCollide<T> {
    fn default() -> Self {
        Self {
            size: constant_size(Size::zero()),
            strength: 1.0,
            iterations: 1,
            sizes: Vec::new(),
            masses: Vec::new(),
        }
    }
}

impl<T> std::fmt::Debug for RectCollide<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RectCollide")
            .field("strength", &self.strength)
            .field("iterations", &self.iterations)
            .field("nodes", &self.sizes.len())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> RectCollide<T> {
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

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.set_strength(strength);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.set_iterations(iterations);
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

    pub fn set_strength(&mut self, strength: f64) -> &mut Self {
        self.strength = strength;
        self
    }

    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }
}

impl<T> RectCollide<T> {
    pub fn size(&self) -> &(dyn Fn(&Node<T>) -> Size + Send + Sync) {
        self.size.as_ref()
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Sizes derived at the last `initialize`, aligned with node indices.
    pub fn sizes(&self) -> &[Size] {
        &self.sizes
    }

    /// Areas derived at the last `initialize`, aligned with node indices.
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    fn iterate(&self, nodes: &mut [Node<T>]) -> usize {
        let sizes = &self.sizes;
        let mut tree: Quadtree<Size> = Quadtree::from_points(
            nodes
                .iter()
                .enumerate()
                .map(|(i, n)| (i, n.projected_center(sizes[i]))),
        );
        tree.aggregate(
            |items| {
                items
                    .iter()
                    .fold(Size::zero(), |acc, &i| max_size(acc, sizes[i]))
            },
            |a, b| max_size(*a, *b),
        );

        let mut resolved = 0;
        for a in 0..nodes.len() {
            let size_a = sizes[a];
            // Held fixed for the whole traversal, even as `a`'s velocity changes.
            let center_a = nodes[a].projected_center(size_a);
            tree.visit(|quad| {
                for &b in quad.items() {
                    if b <= a {
                        continue;
                    }
                    if self.separate(nodes, a, b, center_a) {
                        resolved += 1;
                    }
                }
                out_of_reach(quad, center_a, size_a)
            });
        }
        resolved
    }

    /// Resolves the overlap between `a` (the querying node) and `b` if there is one. `a`'s
    /// center is the one captured before the traversal; `b`'s reflects corrections already
    /// applied during this pass.
    fn separate(&self, nodes: &mut [Node<T>], a: usize, b: usize, center_a: Point) -> bool {
        debug_assert!(a < b);
        let (head, tail) = nodes.split_at_mut(b);
        let (node_a, node_b) = (&mut head[a], &mut tail[0]);

        let size_a = self.sizes[a];
        let size_b = self.sizes[b];
        let center_b = node_b.projected_center(size_b);
        let dx = center_a.x - center_b.x;
        let dy = center_a.y - center_b.y;
        let xd = dx.abs() - (size_a.width + size_b.width) / 2.0;
        let yd = dy.abs() - (size_a.height + size_b.height) / 2.0;
        if !(xd < 0.0 && yd < 0.0) {
            return false;
        }

        let total = self.masses[a] + self.masses[b];
        // Share of the correction absorbed by `a`.
        let m = if total > 0.0 {
            self.masses[b] / total
        } else {
            0.5
        };

        let dist = (dx * dx + dy * dy).sqrt();
        let horizontal = xd.abs() < yd.abs();
        let (d, depth) = if horizontal { (dx, xd) } else { (dy, yd) };
        // Coincident centers carry no direction: `a` goes towards positive, `b` towards negative.
        let delta = if dist > 0.0 {
            d * depth / dist * self.strength
        } else {
            depth * self.strength
        };

        trace!(a, b, horizontal, delta, "separating overlapping rectangles");
        if horizontal {
            node_a.vx -= delta * m;
            node_b.vx += delta * (1.0 - m);
        } else {
            node_a.vy -= delta * m;
            node_b.vy += delta * (1.0 - m);
        }
        true
    }
}

/// True when nothing stored under `quad` can overlap a rectangle of `size` centered at
/// `center`.
fn out_of_reach(quad: &Quad<Size>, center: Point, size: Size) -> bool {
    let reach_x = (size.width + quad.value().width) / 2.0;
    let reach_y = (size.height + quad.value().height) / 2.0;
    let extent = quad.extent();
    extent.min.x > center.x + reach_x
        || extent.min.y > center.y + reach_y
        || extent.max.x < center.x - reach_x
        || extent.max.y < center.y - reach_y
}

impl<T> Force<T> for RectCollide<T> {
    fn initialize(&mut self, nodes: &[Node<T>]) -> Result<()> {
        validate_indices(nodes)?;
        self.sizes = nodes.iter().map(|n| (self.size)(n)).collect();
        self.masses = self.sizes.iter().map(|s| s.area()).collect();
        Ok(())
    }

    fn force(&mut self, nodes: &mut [Node<T>]) -> Result<()> {
        check_bound_len(self.sizes.len(), nodes.len())?;
        if nodes.is_empty() {
            return Ok(());
        }
        let mut resolved = 0;
        for _ in 0..self.iterations {
            resolved += self.iterate(nodes);
        }
        debug!(
            nodes = nodes.len(),
            iterations = self.iterations,
            resolved,
            "rect collide applied"
        );
        Ok(())
    }
}
