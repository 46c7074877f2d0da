//! Scene file model and the tick loop that drives the forces over it.

use serde::{Deserialize, Serialize};
use sirenia::geom::{Size, size};
use sirenia::{Force, ForcesConfig, Node};
use tracing::{debug, info};

pub const DEFAULT_TICKS: usize = 300;
pub const DEFAULT_VELOCITY_DECAY: f64 = 0.4;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub forces: ForcesConfig,
    pub ticks: Option<usize>,
    pub velocity_decay: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneNode {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
}

#[derive(Debug, Serialize)]
pub struct LayoutOut {
    pub ticks: usize,
    pub nodes: Vec<NodeOut>,
}

#[derive(Debug, Serialize)]
pub struct NodeOut {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Minimal host loop: forces adjust velocities, then positions integrate and velocities decay.
pub struct Simulation {
    nodes: Vec<Node<Size>>,
    forces: Vec<Box<dyn Force<Size>>>,
    velocity_decay: f64,
}

impl Simulation {
    pub fn new(nodes: Vec<Node<Size>>, velocity_decay: f64) -> Self {
        Self {
            nodes,
            forces: Vec::new(),
            velocity_decay,
        }
    }

    /// Builds the simulation and forces described by `scene`. Forces without a constant size
    /// use each node's own width and height.
    pub fn from_scene(scene: &Scene, velocity_decay: f64) -> sirenia::Result<Self> {
        if !(0.0..=1.0).contains(&velocity_decay) {
            return Err(sirenia::Error::InvalidConfig {
                message: format!("velocity decay must be within [0, 1], got {velocity_decay}"),
            });
        }
        scene.forces.validate()?;
        let nodes = scene
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                Node::with_data(i, n.x, n.y, size(n.width, n.height)).with_velocity(n.vx, n.vy)
            })
            .collect();
        let mut sim = Self::new(nodes, velocity_decay);

        if let Some(opts) = scene.forces.collide.clone() {
            let per_node = opts.size.is_none();
            let mut force = opts.into_force::<Size>()?;
            if per_node {
                force.set_size(|n: &Node<Size>| n.data);
            }
            sim.add_force(force)?;
        }
        if let Some(opts) = scene.forces.bounded_box.clone() {
            let per_node = opts.size.is_none();
            let mut force = opts.into_force::<Size>()?;
            if per_node {
                force.set_size(|n: &Node<Size>| n.data);
            }
            sim.add_force(force)?;
        }
        Ok(sim)
    }

    pub fn add_force(&mut self, mut force: impl Force<Size> + 'static) -> sirenia::Result<()> {
        force.initialize(&self.nodes)?;
        self.forces.push(Box::new(force));
        Ok(())
    }

    pub fn tick(&mut self) -> sirenia::Result<()> {
        for force in &mut self.forces {
            force.force(&mut self.nodes)?;
        }
        let keep = 1.0 - self.velocity_decay;
        for n in &mut self.nodes {
            n.vx *= keep;
            n.vy *= keep;
            n.x += n.vx;
            n.y += n.vy;
        }
        Ok(())
    }

    pub fn run(&mut self, ticks: usize) -> sirenia::Result<()> {
        info!(
            nodes = self.nodes.len(),
            forces = self.forces.len(),
            ticks,
            "running simulation"
        );
        for tick in 0..ticks {
            self.tick()?;
            debug!(tick, "tick done");
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[Node<Size>] {
        &self.nodes
    }

    pub fn layout(&self, ticks: usize) -> LayoutOut {
        LayoutOut {
            ticks,
            nodes: self
                .nodes()
                .iter()
                .map(|n| NodeOut {
                    index: n.index,
                    x: n.x,
                    y: n.y,
                    width: n.data.width,
                    height: n.data.height,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Scene, Simulation};

    fn scene(json: &str) -> Scene {
        serde_json::from_str(json).expect("scene")
    }

    #[test]
    fn overlapping_nodes_spread_out_inside_the_bounds() {
        let s = scene(
            r#"{
                "nodes": [
                    {"x": 40, "y": 40, "width": 20, "height": 10},
                    {"x": 45, "y": 42, "width": 20, "height": 10},
                    {"x": 42, "y": 38, "width": 10, "height": 20}
                ],
                "forces": {
                    "collide": {"iterations": 4},
                    "boundedBox": {"bounds": [[0, 0], [100, 100]]}
                }
            }"#,
        );
        let mut sim = Simulation::from_scene(&s, 0.4).expect("simulation");
        sim.run(200).expect("run");

        let nodes = sim.nodes();
        for n in nodes {
            assert!(n.x >= -1e-6 && n.x + n.data.width <= 100.0 + 1e-6, "x {}", n.x);
            assert!(n.y >= -1e-6 && n.y + n.data.height <= 100.0 + 1e-6, "y {}", n.y);
        }
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (a, b) = (&nodes[i], &nodes[j]);
                let xd = ((a.x + a.data.width / 2.0) - (b.x + b.data.width / 2.0)).abs()
                    - (a.data.width + b.data.width) / 2.0;
                let yd = ((a.y + a.data.height / 2.0) - (b.y + b.data.height / 2.0)).abs()
                    - (a.data.height + b.data.height) / 2.0;
                assert!(xd > -1e-3 || yd > -1e-3, "{i} and {j} overlap: {xd} {yd}");
            }
        }
    }

    #[test]
    fn bounded_box_without_bounds_fails_on_first_tick() {
        let s = scene(
            r#"{
                "nodes": [{"x": 0, "y": 0, "width": 1, "height": 1}],
                "forces": {"boundedBox": {}}
            }"#,
        );
        let mut sim = Simulation::from_scene(&s, 0.4).expect("simulation");
        assert!(matches!(sim.tick(), Err(sirenia::Error::MissingBounds)));
    }

    #[test]
    fn velocity_decay_outside_the_unit_range_is_rejected() {
        let s = scene(
            r#"{
                "nodes": [
                    {"x": 40, "y": 40, "width": 20, "height": 10},
                    {"x": 45, "y": 42, "width": 20, "height": 10}
                ],
                "forces": {"collide": {}}
            }"#,
        );
        for decay in [2.5, -0.1, f64::NAN] {
            assert!(
                matches!(
                    Simulation::from_scene(&s, decay),
                    Err(sirenia::Error::InvalidConfig { .. })
                ),
                "decay {decay} accepted"
            );
        }
        Simulation::from_scene(&s, 1.0).expect("upper edge");
        Simulation::from_scene(&s, 0.0).expect("lower edge");
    }
}
