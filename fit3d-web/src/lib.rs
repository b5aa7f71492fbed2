//! fit3d web bindings
//!
//! Exposes the camera fit calculator to a browser scene graph. The page
//! computes world-space boxes with its own engine, passes them in as flat
//! `[min_x, min_y, min_z, max_x, max_y, max_z]` runs, and applies the
//! returned center and distance to its camera.

use fit3d_core::{fit_camera, union_bounds, BoundingBox, FitError, FitResult, ViewAxis};
use nalgebra::Point3;
use wasm_bindgen::prelude::*;

const BOX_STRIDE: usize = 6;

/// Framing result handed back to JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct FitView {
    inner: FitResult,
}

#[wasm_bindgen]
impl FitView {
    #[wasm_bindgen(getter)]
    pub fn center_x(&self) -> f32 {
        self.inner.center.x
    }

    #[wasm_bindgen(getter)]
    pub fn center_y(&self) -> f32 {
        self.inner.center.y
    }

    #[wasm_bindgen(getter)]
    pub fn center_z(&self) -> f32 {
        self.inner.center.z
    }

    #[wasm_bindgen(getter)]
    pub fn distance(&self) -> f32 {
        self.inner.distance
    }

    #[wasm_bindgen(getter)]
    pub fn degenerate(&self) -> bool {
        self.inner.is_degenerate()
    }

    /// Raise the distance to at least `min_distance`
    #[wasm_bindgen(js_name = withMinDistance)]
    pub fn with_min_distance(&self, min_distance: f32) -> FitView {
        FitView {
            inner: self.inner.with_min_distance(min_distance),
        }
    }

    /// Camera position for an axis name such as `"+z"` or `"-x"`
    #[wasm_bindgen(js_name = cameraPosition)]
    pub fn camera_position(&self, axis: &str) -> Result<Vec<f32>, JsValue> {
        let axis = parse_axis(axis).map_err(to_js)?;
        let p = self.inner.camera_position(axis);
        Ok(vec![p.x, p.y, p.z])
    }
}

fn to_js(err: FitError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_axis(name: &str) -> Result<ViewAxis, FitError> {
    match name.to_ascii_lowercase().as_str() {
        "+x" | "x" => Ok(ViewAxis::PosX),
        "-x" => Ok(ViewAxis::NegX),
        "+y" | "y" => Ok(ViewAxis::PosY),
        "-y" => Ok(ViewAxis::NegY),
        "+z" | "z" => Ok(ViewAxis::PosZ),
        "-z" => Ok(ViewAxis::NegZ),
        other => Err(FitError::InvalidInput(format!("unknown view axis '{}'", other))),
    }
}

fn boxes_from_flat(values: &[f32]) -> Result<Vec<BoundingBox>, FitError> {
    if values.len() % BOX_STRIDE != 0 {
        return Err(FitError::InvalidInput(format!(
            "expected a multiple of {} values, got {}",
            BOX_STRIDE,
            values.len()
        )));
    }
    values
        .chunks_exact(BOX_STRIDE)
        .map(|c| BoundingBox::new(Point3::new(c[0], c[1], c[2]), Point3::new(c[3], c[4], c[5])))
        .collect()
}

fn union_flat(values: &[f32]) -> Result<Vec<f32>, FitError> {
    let bounds = union_bounds(&boxes_from_flat(values)?)?;
    Ok(vec![
        bounds.min.x,
        bounds.min.y,
        bounds.min.z,
        bounds.max.x,
        bounds.max.y,
        bounds.max.z,
    ])
}

fn fit_flat(values: &[f32], vertical_fov_degrees: f32) -> Result<FitResult, FitError> {
    let bounds = union_bounds(&boxes_from_flat(values)?)?;
    fit_camera(&bounds, vertical_fov_degrees)
}

/// Union of `n` boxes packed as `6 * n` floats; returns one packed box
#[wasm_bindgen(js_name = unionBounds)]
pub fn union_bounds_js(boxes: &[f32]) -> Result<Vec<f32>, JsValue> {
    union_flat(boxes).map_err(to_js)
}

/// Fit a camera around a single box
#[wasm_bindgen(js_name = fitCamera)]
pub fn fit_camera_js(
    min_x: f32,
    min_y: f32,
    min_z: f32,
    max_x: f32,
    max_y: f32,
    max_z: f32,
    vertical_fov_degrees: f32,
) -> Result<FitView, JsValue> {
    fit_flat(&[min_x, min_y, min_z, max_x, max_y, max_z], vertical_fov_degrees)
        .map(|inner| FitView { inner })
        .map_err(to_js)
}

/// Union then fit in one call, for scenes with several objects
#[wasm_bindgen(js_name = fitCameraToBoxes)]
pub fn fit_camera_to_boxes_js(boxes: &[f32], vertical_fov_degrees: f32) -> Result<FitView, JsValue> {
    fit_flat(boxes, vertical_fov_degrees)
        .map(|inner| FitView { inner })
        .map_err(to_js)
}
