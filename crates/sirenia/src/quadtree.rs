//! Arena-backed point quadtree with bottom-up aggregation and pruned top-down traversal.
//!
//! Items are identified by `usize` ids (node indices for the forces in this crate). Each leaf
//! stores the items sitting on a single point; internal quads have up to four children laid out
//! as `[top-left, top-right, bottom-left, bottom-right]` (y grows downwards).
//!
//! The tree is meant to be cheap to rebuild: the forces build one per pass and drop it at the
//! end of the pass.

use crate::geom::{Bounds, Point, point};

/// Subdivision cap; points that are still not separated at this depth share a leaf.
pub const MAX_DEPTH: u32 = 64;

#[derive(Debug, Clone)]
enum QuadKind {
    Leaf { point: Point, items: Vec<usize> },
    Internal { children: [Option<usize>; 4] },
}

#[derive(Debug, Clone)]
pub struct Quad<A> {
    extent: Bounds,
    depth: u32,
    kind: QuadKind,
    value: A,
}

impl<A> Quad<A> {
    pub fn extent(&self) -> Bounds {
        self.extent
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, QuadKind::Leaf { .. })
    }

    /// Items stored on this quad. Always empty for internal quads.
    pub fn items(&self) -> &[usize] {
        match &self.kind {
            QuadKind::Leaf { items, .. } => items,
            QuadKind::Internal { .. } => &[],
        }
    }

    /// The shared point of a leaf's items.
    pub fn point(&self) -> Option<Point> {
        match &self.kind {
            QuadKind::Leaf { point, .. } => Some(*point),
            QuadKind::Internal { .. } => None,
        }
    }

    /// The aggregated value; `A::default()` until [`Quadtree::aggregate`] runs.
    pub fn value(&self) -> &A {
        &self.value
    }

    fn children(&self) -> [Option<usize>; 4] {
        match &self.kind {
            QuadKind::Leaf { .. } => [None; 4],
            QuadKind::Internal { children } => *children,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Quadtree<A = ()> {
    quads: Vec<Quad<A>>,
    len: usize,
}

impl<A: Default> Default for Quadtree<A> {
    fn default() -> Self {
        Self {
            quads: Vec::new(),
            len: 0,
        }
    }
}

impl<A: Default> Quadtree<A> {
    /// Builds a tree over `(id, point)` pairs. Non-finite points are skipped.
    pub fn from_points(points: impl IntoIterator<Item = (usize, Point)>) -> Self {
        let points: Vec<(usize, Point)> = points
            .into_iter()
            .filter(|(_, p)| p.x.is_finite() && p.y.is_finite())
            .collect();

        let mut tree = Self::default();
        let Some(extent) = cover(&points) else {
            return tree;
        };
        tree.quads.push(Quad {
            extent,
            depth: 0,
            kind: QuadKind::Internal {
                children: [None; 4],
            },
            value: A::default(),
        });
        for (id, p) in points {
            tree.insert(id, p);
        }
        tree
    }

    fn insert(&mut self, id: usize, p: Point) {
        self.len += 1;
        let mut current = 0;
        loop {
            let extent = self.quads[current].extent;
            let depth = self.quads[current].depth;
            match &self.quads[current].kind {
                QuadKind::Internal { children } => {
                    let q = quadrant(&extent, p);
                    if let Some(child) = children[q] {
                        current = child;
                        continue;
                    }
                    self.push_child(
                        current,
                        q,
                        QuadKind::Leaf {
                            point: p,
                            items: vec![id],
                        },
                    );
                    return;
                }
                QuadKind::Leaf { point, .. } => {
                    let occupied = *point;
                    if occupied == p || depth >= MAX_DEPTH {
                        if let QuadKind::Leaf { items, .. } = &mut self.quads[current].kind {
                            items.push(id);
                        }
                        return;
                    }
                    // Push the occupant one level down and retry from the new internal quad.
                    let existing = std::mem::replace(
                        &mut self.quads[current].kind,
                        QuadKind::Internal {
                            children: [None; 4],
                        },
                    );
                    self.push_child(current, quadrant(&extent, occupied), existing);
                }
            }
        }
    }

    fn push_child(&mut self, parent: usize, q: usize, kind: QuadKind) {
        let extent = child_extent(&self.quads[parent].extent, q);
        let depth = self.quads[parent].depth + 1;
        let child = self.quads.len();
        self.quads.push(Quad {
            extent,
            depth,
            kind,
            value: A::default(),
        });
        if let QuadKind::Internal { children } = &mut self.quads[parent].kind {
            children[q] = Some(child);
        }
    }
}

impl<A> Quadtree<A> {
    /// Number of items stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn extent(&self) -> Option<Bounds> {
        self.quads.first().map(|q| q.extent)
    }

    pub fn root(&self) -> Option<&Quad<A>> {
        self.quads.first()
    }

    fn post_order(&self) -> Vec<usize> {
        if self.quads.is_empty() {
            return Vec::new();
        }
        let mut stack = vec![0];
        let mut order = Vec::with_capacity(self.quads.len());
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.quads[id].children().into_iter().flatten());
        }
        order.reverse();
        order
    }

    /// Post-order visit: every quad is seen after all of its children.
    pub fn visit_after(&self, mut f: impl FnMut(&Quad<A>)) {
        for id in self.post_order() {
            f(&self.quads[id]);
        }
    }

    /// Pre-order visit. Returning `true` from `f` skips the quad's children.
    pub fn visit(&self, mut f: impl FnMut(&Quad<A>) -> bool) {
        if self.quads.is_empty() {
            return;
        }
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            let quad = &self.quads[id];
            if f(quad) {
                continue;
            }
            // Reversed so that children are visited in quadrant order.
            stack.extend(quad.children().into_iter().rev().flatten());
        }
    }

    /// Computes every quad's value bottom-up: leaves from their items, internal quads by
    /// folding `combine` over the values of their children.
    pub fn aggregate(
        &mut self,
        mut leaf: impl FnMut(&[usize]) -> A,
        mut combine: impl FnMut(&A, &A) -> A,
    ) where
        A: Clone + Default,
    {
        for id in self.post_order() {
            let value = match &self.quads[id].kind {
                QuadKind::Leaf { items, .. } => leaf(items),
                QuadKind::Internal { children } => children
                    .iter()
                    .flatten()
                    .map(|&c| &self.quads[c].value)
                    .fold(None, |acc: Option<A>, v| {
                        Some(match acc {
                            None => v.clone(),
                            Some(a) => combine(&a, v),
                        })
                    })
                    .unwrap_or_default(),
            };
            self.quads[id].value = value;
        }
    }
}

fn cover(points: &[(usize, Point)]) -> Option<Bounds> {
    let (_, first) = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for (_, p) in points {
        min = min.min(*p);
        max = max.max(*p);
    }
    let mut side = (max.x - min.x).max(max.y - min.y);
    if !(side > 0.0) {
        side = 1.0;
    }
    Some(Bounds::new(min, point(min.x + side, min.y + side)))
}

fn quadrant(extent: &Bounds, p: Point) -> usize {
    let mid = extent.center();
    let right = p.x >= mid.x;
    let bottom = p.y >= mid.y;
    (right as usize) | ((bottom as usize) << 1)
}

fn child_extent(extent: &Bounds, q: usize) -> Bounds {
    let mid = extent.center();
    let (x0, x1) = if q & 1 == 0 {
        (extent.min.x, mid.x)
    } else {
        (mid.x, extent.max.x)
    };
    let (y0, y1) = if q & 2 == 0 {
        (extent.min.y, mid.y)
    } else {
        (mid.y, extent.max.y)
    };
    Bounds::new(point(x0, y0), point(x1, y1))
}

#[cfg(test)]
mod tests {
    use super::{MAX_DEPTH, Quadtree};
    use crate::geom::point;

    #[test]
    fn empty_input_builds_an_empty_tree() {
        let tree: Quadtree = Quadtree::from_points(Vec::new());
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        let mut visited = 0;
        tree.visit(|_| {
            visited += 1;
            false
        });
        assert_eq!(visited, 0);
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let tree: Quadtree = Quadtree::from_points(vec![
            (0, point(0.0, 0.0)),
            (1, point(f64::NAN, 1.0)),
            (2, point(4.0, f64::INFINITY)),
        ]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn coincident_points_share_one_leaf() {
        let tree: Quadtree = Quadtree::from_points(vec![
            (0, point(3.0, 3.0)),
            (1, point(3.0, 3.0)),
            (2, point(9.0, 9.0)),
        ]);
        let mut leaves = Vec::new();
        tree.visit_after(|q| {
            if q.is_leaf() {
                leaves.push(q.items().to_vec());
            }
        });
        leaves.sort();
        assert_eq!(leaves, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn nearly_coincident_points_stop_at_the_depth_cap() {
        let a = point(1.0, 1.0);
        let b = point(1.0 + f64::EPSILON, 1.0);
        let tree: Quadtree = Quadtree::from_points(vec![(0, a), (1, b), (2, point(2.0, 2.0))]);
        let mut deepest = 0;
        tree.visit_after(|q| deepest = deepest.max(q.depth()));
        assert!(deepest <= MAX_DEPTH);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn root_extent_is_square_and_covers_all_points() {
        let tree: Quadtree =
            Quadtree::from_points(vec![(0, point(-5.0, 2.0)), (1, point(15.0, 4.0))]);
        let extent = tree.extent().expect("extent");
        assert_eq!(extent.width(), extent.height());
        assert!(extent.min.x <= -5.0 && extent.max.x >= 15.0);
        assert!(extent.min.y <= 2.0 && extent.max.y >= 4.0);
    }
}
