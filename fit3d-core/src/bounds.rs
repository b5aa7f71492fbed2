//! Axis-aligned bounding boxes

use nalgebra::{Matrix4, Point3, Vector3};

use crate::fit::FitError;

/// Axis-aligned box with `min <= max` on every axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    /// Create a box, rejecting non-finite or inverted corners
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Result<Self, FitError> {
        for axis in 0..3 {
            if !min[axis].is_finite() || !max[axis].is_finite() {
                return Err(FitError::InvalidInput(format!(
                    "non-finite corner component on axis {}",
                    axis
                )));
            }
            if min[axis] > max[axis] {
                return Err(FitError::InvalidInput(format!(
                    "min {} exceeds max {} on axis {}",
                    min[axis], max[axis], axis
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Zero-volume box at a single point
    pub fn point(p: Point3<f32>) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing every point, `None` when there are none
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut points = points.into_iter();
        let mut bounds = Self::point(points.next()?);
        for p in points {
            bounds.expand_to_include(&p);
        }
        Some(bounds)
    }

    pub fn expand_to_include(&mut self, p: &Point3<f32>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grow this box so it also contains `other`
    pub fn extend(&mut self, other: &BoundingBox) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut merged = *self;
        merged.extend(other);
        merged
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Largest edge length
    pub fn max_extent(&self) -> f32 {
        self.size().max()
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|c| c.is_finite())
    }

    pub fn is_degenerate(&self) -> bool {
        self.max_extent() == 0.0
    }

    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        (0..3).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// World-space box enclosing this box after applying `matrix`
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> BoundingBox {
        let corners = self.corners();
        let mut bounds = Self::point(matrix.transform_point(&corners[0]));
        for corner in &corners[1..] {
            bounds.expand_to_include(&matrix.transform_point(corner));
        }
        bounds
    }

    /// Scale uniformly about the center; negative factors are treated as zero
    pub fn scaled_about_center(&self, factor: f32) -> BoundingBox {
        let center = self.center();
        let half = self.size() * (factor.max(0.0) * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }
}
