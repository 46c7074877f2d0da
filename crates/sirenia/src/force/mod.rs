//! Velocity forces for rectangular nodes.
//!
//! A host simulation calls [`Force::initialize`] whenever its node list is (re)built and
//! [`Force::force`] one or more times per tick, then integrates velocities into positions.

pub mod bounded_box;
pub mod rect_collide;

use crate::error::Result;
use crate::geom::Size;
use crate::node::Node;

pub use bounded_box::BoundedBox;
pub use rect_collide::RectCollide;

/// Per-node size accessor shared by both forces.
pub type SizeFn<T> = Box<dyn Fn(&Node<T>) -> Size + Send + Sync>;

pub trait Force<T> {
    /// Binds the force to `nodes`, deriving any per-node data it caches. Calling it again
    /// discards the previous binding.
    fn initialize(&mut self, nodes: &[Node<T>]) -> Result<()>;

    /// Applies one tick's worth of velocity adjustment to the bound nodes.
    fn force(&mut self, nodes: &mut [Node<T>]) -> Result<()>;
}

/// Returns an accessor that ignores the node and always yields `value`.
pub fn constant<V: Clone, T>(value: V) -> impl Fn(&Node<T>) -> V + Clone + Send + Sync
where
    V: Send + Sync,
{
    move |_: &Node<T>| value.clone()
}

pub(crate) fn constant_size<T: 'static>(value: Size) -> SizeFn<T> {
    Box::new(constant(value))
}

pub(crate) fn check_bound_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(crate::Error::NodeCountMismatch { expected, actual });
    }
    Ok(())
}
