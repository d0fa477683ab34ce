//! The bounded rectangle spines are scattered in, and random pose sampling.

use std::f64::consts::PI;

use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::{Result, SpineError};
use crate::geometry::Point;
use crate::spine::Spine;

/// The rectangle `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
        }
    }
}

impl Field {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let field = Self { width, height };
        field.validate()?;
        Ok(field)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SpineError::InvalidConfig(format!(
                "field must have positive sides, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Uniform center in the rectangle and uniform orientation in `[0, π)`.
    pub fn sample_pose<R: Rng + ?Sized>(&self, rng: &mut R) -> (Point, f64) {
        let x = Uniform::new_inclusive(0.0, self.width).sample(rng);
        let y = Uniform::new_inclusive(0.0, self.height).sample(rng);
        let theta = Uniform::new(0.0, PI).sample(rng);
        (Point::new(x, y), theta)
    }
}

/// One spine at a random pose. Overlap with anything else is allowed.
pub fn random_spine<R: Rng + ?Sized>(
    rng: &mut R,
    field: &Field,
    length: f64,
    identifier: Option<&str>,
) -> Spine {
    let (center, theta) = field.sample_pose(rng);
    debug!(
        "random_spine {:?} x={:.3}, y={:.3}, theta={:.3}",
        identifier, center.x, center.y, theta
    );
    let spine = Spine::new(center, theta, length);
    match identifier {
        Some(id) => spine.with_identifier(id),
        None => spine,
    }
}

/// `count` random spines identified `"0"`, `"1"`, ... in generation order.
pub fn random_spines<R: Rng + ?Sized>(
    rng: &mut R,
    field: &Field,
    length: f64,
    count: usize,
) -> Vec<Spine> {
    (0..count)
        .map(|i| random_spine(rng, field, length, Some(i.to_string().as_str())))
        .collect()
}
