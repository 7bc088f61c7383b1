//! Axis-aligned bounding boxes
//!
//! The only collision shape in the game. Edges are inclusive.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of the given half extents around `center`
    pub fn centered(center: Vec2, half_width: f32, half_height: f32) -> Self {
        let half = Vec2::new(half_width, half_height);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Grow every edge outward by `amount`
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_inclusive() {
        let b = Aabb::centered(Vec2::new(10.0, 0.0), 30.5, 24.0);
        assert!(b.contains(Vec2::new(-20.5, 24.0)));
        assert!(b.contains(Vec2::new(40.5, -24.0)));
        assert!(!b.contains(Vec2::new(40.6, 0.0)));
    }

    #[test]
    fn test_inflate() {
        let b = Aabb::centered(Vec2::ZERO, 50.0, 30.0).inflate(3.0);
        assert_eq!(b.width(), 106.0);
        assert_eq!(b.height(), 66.0);
        assert_eq!(b.center(), Vec2::ZERO);
    }
}
