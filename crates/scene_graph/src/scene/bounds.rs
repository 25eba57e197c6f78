//! Axis-aligned bounding boxes

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Bounds {
    /// Create a new box from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Zero-extent box at a point
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Create a box centered at a point with given half extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Axis-aligned union of two boxes
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the extents (half-size) of the box
    pub fn extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// The 8 corner points of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// Box enclosing this one after transforming all 8 corners
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self
            .corners()
            .map(|corner| matrix.transform_point(&Point3::from(corner)).coords);
        corners[1..].iter().fold(Self::from_point(corners[0]), |bounds, corner| {
            bounds.merge(&Self::from_point(*corner))
        })
    }
}
