//! Wedge geometry shared by the spin engine and the wheel renderer.
//!
//! Segment `i` of `n` covers `[i * 360/n, (i + 1) * 360/n)` degrees, measured
//! clockwise from the pointer in wheel coordinates. Turning the wheel by
//! `rotation` moves every wedge `rotation` degrees counter-clockwise on
//! screen, so the pointer (fixed at 12 o'clock) sits over wheel angle
//! `rotation mod 360`.

use serde::{Deserialize, Serialize};

use crate::wheels::models::Segment;

const PALETTE: [&str; 6] = [
    "#F94144", "#F8961E", "#F9C74F", "#90BE6D", "#43AA8B", "#577590",
];

/// Finest arc sampling honoured, in degrees. Caps a full circle at 720 points.
pub const MIN_ARC_STEP: f64 = 0.5;

pub fn angle_per_segment(count: usize) -> f64 {
    360.0 / count as f64
}

/// Index of the wedge under the pointer after the wheel has turned by
/// `rotation` degrees.
pub fn segment_at_rotation(count: usize, rotation: f64) -> Option<usize> {
    if count == 0 || !rotation.is_finite() {
        return None;
    }
    let angle = rotation.rem_euclid(360.0);
    let index = (angle / angle_per_segment(count)).floor() as usize;
    Some(index.min(count - 1))
}

/// Fill colour for wedge `index` of `count`. Adjacent wedges, including the
/// last/first pair, never share a colour.
pub fn wedge_color(index: usize, count: usize) -> &'static str {
    let slot = index % PALETTE.len();
    if count > 1 && index == count - 1 && slot == 0 {
        return PALETTE[1];
    }
    PALETTE[slot]
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WheelGeometry {
    pub radius: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Distance of label anchors from the centre, as a fraction of `radius`.
    pub label_radius_ratio: f64,
    /// Largest angular gap between sampled arc points, in degrees. Values
    /// below [`MIN_ARC_STEP`] are raised to it.
    pub max_arc_step: f64,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            radius: 150.0,
            center_x: 150.0,
            center_y: 150.0,
            label_radius_ratio: 0.65,
            max_arc_step: 5.0,
        }
    }
}

impl WheelGeometry {
    /// Screen point at `angle` degrees clockwise from 12 o'clock.
    pub fn point_at(&self, angle: f64, distance: f64) -> Point {
        let theta = angle.to_radians();
        Point {
            x: self.center_x + distance * theta.sin(),
            y: self.center_y - distance * theta.cos(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wedge {
    pub segment_id: String,
    pub label: String,
    pub index: usize,
    /// On-screen span in degrees clockwise from the pointer; may be negative.
    pub start_angle: f64,
    pub end_angle: f64,
    pub label_angle: f64,
    pub label_position: Point,
    /// Closed outline: centre, then arc points from start to end.
    pub path: Vec<Point>,
    pub fill_color: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WheelLayout {
    pub rotation: f64,
    pub pointer_index: Option<usize>,
    pub wedges: Vec<Wedge>,
}

pub fn layout_wheel(
    segments: &[Segment],
    selected_segment_id: Option<&str>,
    rotation: f64,
    geometry: &WheelGeometry,
) -> WheelLayout {
    let count = segments.len();
    let rotation = if rotation.is_finite() {
        rotation.rem_euclid(360.0)
    } else {
        0.0
    };

    let wedges = segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let span = angle_per_segment(count);
            let start_angle = index as f64 * span - rotation;
            let end_angle = start_angle + span;
            let label_angle = start_angle + span / 2.0;

            Wedge {
                segment_id: segment.id.clone(),
                label: segment.label.clone(),
                index,
                start_angle,
                end_angle,
                label_angle,
                label_position: geometry
                    .point_at(label_angle, geometry.radius * geometry.label_radius_ratio),
                path: wedge_path(geometry, start_angle, end_angle),
                fill_color: wedge_color(index, count).to_string(),
                highlighted: selected_segment_id == Some(segment.id.as_str()),
            }
        })
        .collect();

    WheelLayout {
        rotation,
        pointer_index: segment_at_rotation(count, rotation),
        wedges,
    }
}

fn wedge_path(geometry: &WheelGeometry, start_angle: f64, end_angle: f64) -> Vec<Point> {
    let sweep = end_angle - start_angle;
    let step = if geometry.max_arc_step.is_finite() && geometry.max_arc_step > 0.0 {
        geometry.max_arc_step.max(MIN_ARC_STEP)
    } else {
        WheelGeometry::default().max_arc_step
    };
    let steps = (sweep / step - 1e-9).ceil().max(1.0) as usize;

    let mut path = Vec::with_capacity(steps + 2);
    path.push(Point {
        x: geometry.center_x,
        y: geometry.center_y,
    });
    path.extend((0..=steps).map(|n| {
        let angle = start_angle + sweep * n as f64 / steps as f64;
        geometry.point_at(angle, geometry.radius)
    }));
    path
}
