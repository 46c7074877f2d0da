//! Serializable force options, for hosts that configure forces from JSON (or any serde format).
//!
//! Only constant sizes can be expressed here; per-node size functions are installed on the built
//! force with `set_size`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::force::{BoundedBox, RectCollide};
use crate::geom::{bounds, size};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForcesConfig {
    pub collide: Option<RectCollideOptions>,
    pub bounded_box: Option<BoundedBoxOptions>,
}

impl ForcesConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(c) = &self.collide {
            c.validate()?;
        }
        if let Some(b) = &self.bounded_box {
            b.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RectCollideOptions {
    /// Constant `[width, height]` for every node.
    pub size: Option<[f64; 2]>,
    pub strength: f64,
    pub iterations: usize,
}

impl Default for RectCollideOptions {
    fn default() -> Self {
        Self {
            size: None,
            strength: 1.0,
            iterations: 1,
        }
    }
}

impl RectCollideOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.strength.is_finite() {
            return Err(invalid(format!(
                "collide strength must be finite, got {}",
                self.strength
            )));
        }
        if self.iterations == 0 {
            return Err(invalid("collide iterations must be at least 1".to_string()));
        }
        validate_size("collide", self.size)
    }

    pub fn into_force<T: 'static>(self) -> Result<RectCollide<T>> {
        self.validate()?;
        let mut force = RectCollide::new()
            .with_strength(self.strength)
            .with_iterations(self.iterations);
        if let Some([w, h]) = self.size {
            force.set_size_value(size(w, h));
        }
        Ok(force)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoundedBoxOptions {
    /// Constant `[width, height]` for every node.
    pub size: Option<[f64; 2]>,
    /// `[[x_min, y_min], [x_max, y_max]]`.
    pub bounds: Option<[[f64; 2]; 2]>,
}

impl BoundedBoxOptions {
    pub fn validate(&self) -> Result<()> {
        validate_size("boundedBox", self.size)?;
        let Some([min, max]) = self.bounds else {
            return Ok(());
        };
        if min.iter().chain(max.iter()).any(|v| !v.is_finite()) {
            return Err(invalid(format!(
                "boundedBox bounds must be finite, got {min:?}..{max:?}"
            )));
        }
        if min[0] > max[0] || min[1] > max[1] {
            return Err(invalid(format!(
                "boundedBox bounds minimum {min:?} exceeds maximum {max:?}"
            )));
        }
        Ok(())
    }

    /// Leaves the bounds unset when none are configured; applying the force then fails with
    /// [`Error::MissingBounds`].
    pub fn into_force<T: 'static>(self) -> Result<BoundedBox<T>> {
        self.validate()?;
        let mut force = BoundedBox::new();
        if let Some([w, h]) = self.size {
            force.set_size_value(size(w, h));
        }
        if let Some([min, max]) = self.bounds {
            force.set_bounds(bounds(min, max));
        }
        Ok(force)
    }
}

fn validate_size(force: &str, value: Option<[f64; 2]>) -> Result<()> {
    match value {
        Some([w, h]) if !(w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0) => Err(
            invalid(format!("{force} size must be finite and non-negative, got [{w}, {h}]")),
        ),
        _ => Ok(()),
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig { message }
}

#[cfg(test)]
mod tests {
    use super::{BoundedBoxOptions, ForcesConfig, RectCollideOptions};

    #[test]
    fn empty_object_uses_force_defaults() {
        let cfg: ForcesConfig = serde_json::from_str(r#"{"collide": {}}"#).expect("parse");
        assert_eq!(cfg.collide, Some(RectCollideOptions::default()));
        assert_eq!(cfg.bounded_box, None);

        let force = cfg.collide.unwrap().into_force::<()>().expect("force");
        assert_eq!(force.strength(), 1.0);
        assert_eq!(force.iterations(), 1);
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let cfg: ForcesConfig = serde_json::from_str(
            r#"{
                "collide": {"size": [10, 20], "strength": 0.5, "iterations": 4},
                "boundedBox": {"size": [10, 20], "bounds": [[0, 0], [640, 480]]}
            }"#,
        )
        .expect("parse");
        cfg.validate().expect("valid");

        let bb = cfg.bounded_box.unwrap().into_force::<()>().expect("force");
        let b = bb.bounds().expect("bounds");
        assert_eq!((b.min.x, b.min.y, b.max.x, b.max.y), (0.0, 0.0, 640.0, 480.0));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let opts = BoundedBoxOptions {
            size: None,
            bounds: Some([[10.0, 0.0], [0.0, 10.0]]),
        };
        let err = opts.validate().unwrap_err().to_string();
        assert!(err.contains("exceeds maximum"), "unexpected error: {err}");
    }

    #[test]
    fn zero_iterations_and_negative_sizes_are_rejected() {
        let opts = RectCollideOptions {
            iterations: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());

        let opts = RectCollideOptions {
            size: Some([-1.0, 4.0]),
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }
}
