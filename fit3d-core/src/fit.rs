//! Camera fit calculator.
//!
//! Given a set of scene objects, [`union_bounds`] merges their world-space
//! boxes and [`fit_camera`] derives how far a perspective camera has to
//! back away from the union's center for the largest box dimension to fill
//! the vertical field of view. Nothing here touches a camera; callers apply
//! the [`FitResult`] themselves (see `Camera::apply_fit`).

use nalgebra::{Point3, Vector3};

use crate::bounds::BoundingBox;

/// Errors from bounds construction and camera fitting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),
}

/// Anything placed in 3D space with a computable extent.
pub trait SceneObject {
    /// World-space box at the object's current transform.
    fn world_bounds(&self) -> BoundingBox;
}

impl SceneObject for BoundingBox {
    fn world_bounds(&self) -> BoundingBox {
        *self
    }
}

impl<T: SceneObject + ?Sized> SceneObject for &T {
    fn world_bounds(&self) -> BoundingBox {
        (**self).world_bounds()
    }
}

impl<T: SceneObject + ?Sized> SceneObject for Box<T> {
    fn world_bounds(&self) -> BoundingBox {
        (**self).world_bounds()
    }
}

/// Union of every object's world box. The first object seeds the result.
pub fn union_bounds<'a, O, I>(objects: I) -> Result<BoundingBox, FitError>
where
    O: SceneObject + ?Sized + 'a,
    I: IntoIterator<Item = &'a O>,
{
    let mut objects = objects.into_iter();
    let primary = objects
        .next()
        .ok_or_else(|| FitError::InvalidInput("cannot fit an empty object list".to_string()))?;

    let mut bounds = finite_bounds(primary.world_bounds())?;
    let mut count = 1usize;
    for object in objects {
        bounds.extend(&finite_bounds(object.world_bounds())?);
        count += 1;
    }

    tracing::debug!(count, min = ?bounds.min, max = ?bounds.max, "computed union bounds");
    Ok(bounds)
}

fn finite_bounds(bounds: BoundingBox) -> Result<BoundingBox, FitError> {
    if bounds.is_finite() {
        Ok(bounds)
    } else {
        Err(FitError::InvalidInput(format!(
            "non-finite bounds min={:?} max={:?}",
            bounds.min, bounds.max
        )))
    }
}

/// Union of a primary object plus any number of additional ones.
pub fn union_with<P, A>(primary: &P, additional: &[A]) -> BoundingBox
where
    P: SceneObject + ?Sized,
    A: SceneObject,
{
    additional.iter().fold(primary.world_bounds(), |mut bounds, object| {
        bounds.extend(&object.world_bounds());
        bounds
    })
}

/// Where a camera should look and how far back it should sit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub center: Point3<f32>,
    pub distance: f32,
    /// Largest edge of the fitted box, for sizing clip planes
    pub max_extent: f32,
}

impl FitResult {
    /// True when the fitted box had no extent, leaving the camera at the center.
    pub fn is_degenerate(&self) -> bool {
        self.distance == 0.0
    }

    pub fn with_min_distance(self, min_distance: f32) -> Self {
        Self {
            distance: self.distance.max(min_distance),
            ..self
        }
    }

    pub fn camera_position(&self, axis: ViewAxis) -> Point3<f32> {
        self.center + axis.direction() * self.distance
    }
}

/// Principal axis the camera is offset along, pointing from the center to the eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewAxis {
    PosX,
    NegX,
    PosY,
    NegY,
    #[default]
    PosZ,
    NegZ,
}

impl ViewAxis {
    pub fn direction(self) -> Vector3<f32> {
        match self {
            ViewAxis::PosX => Vector3::x(),
            ViewAxis::NegX => -Vector3::x(),
            ViewAxis::PosY => Vector3::y(),
            ViewAxis::NegY => -Vector3::y(),
            ViewAxis::PosZ => Vector3::z(),
            ViewAxis::NegZ => -Vector3::z(),
        }
    }
}

/// Check that a vertical field of view lies strictly between 0 and 180 degrees.
pub fn validate_fov(vertical_fov_degrees: f32) -> Result<f32, FitError> {
    if vertical_fov_degrees.is_finite()
        && vertical_fov_degrees > 0.0
        && vertical_fov_degrees < 180.0
    {
        Ok(vertical_fov_degrees)
    } else {
        Err(FitError::InvalidFov(vertical_fov_degrees))
    }
}

/// Fit a perspective camera with the given vertical FOV around `bounds`.
pub fn fit_camera(bounds: &BoundingBox, vertical_fov_degrees: f32) -> Result<FitResult, FitError> {
    let fov = validate_fov(vertical_fov_degrees)?;

    let center = bounds.center();
    let max_extent = bounds.max_extent();
    // Catches NaN corners as well as finite corners whose span overflows
    if !center.iter().all(|c| c.is_finite()) || !max_extent.is_finite() {
        return Err(FitError::InvalidInput(format!(
            "cannot fit non-finite bounds min={:?} max={:?}",
            bounds.min, bounds.max
        )));
    }
    let distance = max_extent / (2.0 * (fov.to_radians() / 2.0).tan());

    let result = FitResult {
        center,
        distance,
        max_extent,
    };
    if result.is_degenerate() {
        tracing::warn!(?center, "fitting a zero-size box, camera distance is 0");
    } else {
        tracing::debug!(?center, distance, fov, "fitted camera");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(min: [f32; 3], max: [f32; 3]) -> BoundingBox {
        BoundingBox::new(Point3::from(min), Point3::from(max)).unwrap()
    }

    fn sample_boxes() -> Vec<BoundingBox> {
        vec![
            bbox([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]),
            bbox([2.0, -3.0, 0.0], [4.0, 0.5, 0.25]),
            bbox([-6.0, 0.0, -2.0], [-5.0, 7.0, 9.0]),
            BoundingBox::point(Point3::new(0.0, -8.0, 0.0)),
        ]
    }

    #[test]
    fn test_union_is_componentwise_min_max() {
        let boxes = sample_boxes();
        let union = union_bounds(&boxes).unwrap();
        assert_eq!(union.min, Point3::new(-6.0, -8.0, -2.0));
        assert_eq!(union.max, Point3::new(4.0, 7.0, 9.0));
        for b in &boxes {
            assert!(union.contains_box(b));
        }
    }

    #[test]
    fn test_union_empty_is_invalid_input() {
        let boxes: Vec<BoundingBox> = Vec::new();
        assert!(matches!(union_bounds(&boxes), Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn test_union_single_is_identity() {
        let only = bbox([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);
        assert_eq!(union_bounds([&only]).unwrap(), only);
        assert_eq!(union_with(&only, &[] as &[BoundingBox]), only);
    }

    #[test]
    fn test_union_order_independent() {
        let boxes = sample_boxes();
        let forward = union_bounds(&boxes).unwrap();

        let mut reversed = boxes.clone();
        reversed.reverse();
        assert_eq!(union_bounds(&reversed).unwrap(), forward);

        let mut rotated = boxes.clone();
        rotated.rotate_left(2);
        assert_eq!(union_bounds(&rotated).unwrap(), forward);

        // Grouping: union of two partial unions
        let left = union_bounds(&boxes[..2]).unwrap();
        let right = union_bounds(&boxes[2..]).unwrap();
        assert_eq!(union_bounds([&left, &right]).unwrap(), forward);
    }

    #[test]
    fn test_union_with_matches_union_bounds() {
        let boxes = sample_boxes();
        assert_eq!(
            union_with(&boxes[0], &boxes[1..]),
            union_bounds(&boxes).unwrap()
        );
    }

    #[test]
    fn test_union_over_trait_objects() {
        let a = bbox([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = bbox([-1.0, 2.0, 0.0], [0.0, 3.0, 0.5]);
        let objects: Vec<Box<dyn SceneObject>> = vec![Box::new(a), Box::new(b)];
        let union = union_bounds(objects.iter().map(|o| &**o)).unwrap();
        assert_eq!(union, bbox([-1.0, 0.0, 0.0], [1.0, 3.0, 1.0]));
    }

    #[test]
    fn test_fit_cube_at_75_degrees() {
        let fit = fit_camera(&bbox([-5.0, -5.0, -5.0], [5.0, 5.0, 5.0]), 75.0).unwrap();
        assert_eq!(fit.center, Point3::origin());
        assert!((fit.distance - 6.5161).abs() < 1e-3);
        let expected = 10.0 / (2.0 * 37.5f32.to_radians().tan());
        assert!((fit.distance - expected).abs() < 1e-5);
    }

    #[test]
    fn test_fit_degenerate_point() {
        let fit = fit_camera(&BoundingBox::point(Point3::new(2.0, 3.0, 4.0)), 60.0).unwrap();
        assert_eq!(fit.center, Point3::new(2.0, 3.0, 4.0));
        assert_eq!(fit.distance, 0.0);
        assert!(fit.is_degenerate());

        let clamped = fit.with_min_distance(0.5);
        assert_eq!(clamped.distance, 0.5);
        assert_eq!(clamped.center, fit.center);
    }

    #[test]
    fn test_fit_rejects_out_of_range_fov() {
        let bounds = bbox([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        for fov in [0.0, -10.0, 180.0, 270.0, f32::NAN, f32::INFINITY] {
            assert!(
                matches!(fit_camera(&bounds, fov), Err(FitError::InvalidFov(_))),
                "fov {} should be rejected",
                fov
            );
        }
        assert!(fit_camera(&bounds, 0.01).is_ok());
        assert!(fit_camera(&bounds, 179.9).is_ok());
    }

    #[test]
    fn test_fit_distance_scales_linearly() {
        let bounds = bbox([-1.0, 0.0, 2.0], [3.0, 1.5, 4.0]);
        let base = fit_camera(&bounds, 50.0).unwrap();
        for k in [0.5f32, 2.0, 3.0, 10.0] {
            let scaled = fit_camera(&bounds.scaled_about_center(k), 50.0).unwrap();
            assert!((scaled.distance - base.distance * k).abs() < 1e-4 * k);
            assert!((scaled.center - base.center).norm() < 1e-5);
        }
    }

    #[test]
    fn test_fit_uses_largest_dimension() {
        let flat = bbox([0.0, 0.0, 0.0], [8.0, 1.0, 2.0]);
        let fit = fit_camera(&flat, 90.0).unwrap();
        // tan(45 deg) == 1, so distance == max_extent / 2
        assert!((fit.distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_fit_rejects_non_finite_bounds() {
        let infinite = BoundingBox {
            min: Point3::new(f32::NEG_INFINITY, 0.0, 0.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        assert!(matches!(fit_camera(&infinite, 45.0), Err(FitError::InvalidInput(_))));

        let nan = BoundingBox {
            min: Point3::new(f32::NAN, f32::NAN, f32::NAN),
            max: Point3::new(f32::NAN, f32::NAN, f32::NAN),
        };
        assert!(matches!(fit_camera(&nan, 45.0), Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn test_fit_rejects_overflowing_extent() {
        // Both corners are finite but max - min overflows f32
        let huge = bbox([-3.0e38, 0.0, 0.0], [3.0e38, 1.0, 1.0]);
        assert!(huge.size().x.is_infinite());
        assert!(matches!(fit_camera(&huge, 45.0), Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn test_union_rejects_non_finite_object() {
        let good = bbox([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let bad = BoundingBox {
            min: Point3::new(0.0, f32::NAN, 0.0),
            max: Point3::new(1.0, 1.0, f32::INFINITY),
        };
        assert!(matches!(union_bounds([&good, &bad]), Err(FitError::InvalidInput(_))));
        assert!(matches!(union_bounds([&bad, &good]), Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn test_fit_reports_max_extent() {
        let fit = fit_camera(&bbox([0.0, 0.0, 0.0], [2.0, 7.0, 3.0]), 60.0).unwrap();
        assert_eq!(fit.max_extent, 7.0);
        assert_eq!(fit.with_min_distance(100.0).max_extent, 7.0);
    }

    #[test]
    fn test_camera_position_along_axis() {
        let fit = FitResult {
            center: Point3::new(1.0, 2.0, 3.0),
            distance: 4.0,
            max_extent: 1.0,
        };
        assert_eq!(fit.camera_position(ViewAxis::PosZ), Point3::new(1.0, 2.0, 7.0));
        assert_eq!(fit.camera_position(ViewAxis::NegX), Point3::new(-3.0, 2.0, 3.0));
        assert_eq!(ViewAxis::default(), ViewAxis::PosZ);
    }
}
