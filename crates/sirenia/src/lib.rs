#![forbid(unsafe_code)]

//! Rectangle collision and bounded-box forces for iterative node layout simulations.
//!
//! `sirenia` does not own a simulation loop. A host keeps a `Vec<Node<T>>`, binds each force
//! with [`Force::initialize`], and per tick calls [`Force::force`] on every force before
//! integrating velocities into positions:
//!
//! ```
//! use sirenia::{BoundedBox, Force, Node, RectCollide, geom};
//!
//! let mut nodes = vec![Node::new(0, 0.0, 0.0), Node::new(1, 4.0, 2.0)];
//! let mut collide = RectCollide::new().with_size_value(geom::size(10.0, 10.0));
//! let mut bounds = BoundedBox::new()
//!     .with_size_value(geom::size(10.0, 10.0))
//!     .with_bounds(geom::bounds([0.0, 0.0], [100.0, 100.0]));
//! collide.initialize(&nodes)?;
//! bounds.initialize(&nodes)?;
//!
//! collide.force(&mut nodes)?;
//! bounds.force(&mut nodes)?;
//! for n in &mut nodes {
//!     n.x += n.vx;
//!     n.y += n.vy;
//! }
//! # Ok::<(), sirenia::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod force;
pub mod geom;
pub mod node;
pub mod quadtree;

pub use config::{BoundedBoxOptions, ForcesConfig, RectCollideOptions};
pub use error::{Error, Result};
pub use force::{BoundedBox, Force, RectCollide, SizeFn, constant};
pub use node::Node;
