//! Canonical activity schema, as produced by [`crate::migrations::normalize`].
//!
//! The serialized form uses the camelCase keys of the schema "1" JSON so a
//! normalized config can be written out and read back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::geometry::{Point, View};
use crate::transform::Transform;

pub const DEFAULT_ACTIVITY_TYPE: &str = "transformations";

/// Config format generation. Decides which normalization path runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum SchemaVersion {
    #[serde(rename = "0")]
    #[strum(serialize = "0")]
    Legacy,
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    V1,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ui {
    pub title: String,
    pub subtitle: String,
    pub instructions: String,
    pub legend: Vec<String>,
}

/// Capture strategy for clicks on the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionMode {
    PlacePoints,
    DrawPolyline,
    DragHandles,
    SelectInterval,
    Other(String),
}

impl From<String> for InteractionMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "placePoints" => InteractionMode::PlacePoints,
            "drawPolyline" => InteractionMode::DrawPolyline,
            "dragHandles" => InteractionMode::DragHandles,
            "selectInterval" => InteractionMode::SelectInterval,
            _ => InteractionMode::Other(s),
        }
    }
}

impl From<InteractionMode> for String {
    fn from(mode: InteractionMode) -> Self {
        match mode {
            InteractionMode::PlacePoints => "placePoints".to_string(),
            InteractionMode::DrawPolyline => "drawPolyline".to_string(),
            InteractionMode::DragHandles => "dragHandles".to_string(),
            InteractionMode::SelectInterval => "selectInterval".to_string(),
            InteractionMode::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub mode: InteractionMode,
    /// Grid step clicks snap to. Always > 0.
    pub snap_step: f64,
    /// Max pixel distance between a click and the grid point it snaps to. Always >= 0.
    pub hit_radius_px: f64,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            mode: InteractionMode::PlacePoints,
            snap_step: 1.0,
            hit_radius_px: 12.0,
        }
    }
}

/// Post-submission behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPolicy {
    pub show_expected_points_on_fail: bool,
    pub show_solution_on_fail: bool,
    pub allow_hints: bool,
}

impl Default for FeedbackPolicy {
    fn default() -> Self {
        Self {
            show_expected_points_on_fail: false,
            show_solution_on_fail: true,
            allow_hints: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashed: Option<bool>,
}

/// A named point sequence drawn on the plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `points` or `polyline`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<SeriesStyle>,
}

impl Series {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role) || self.id.as_deref() == Some(role)
    }

    pub fn is_polyline(&self) -> bool {
        self.kind.as_deref() == Some("polyline")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Original {
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_lines: Option<bool>,
}

impl Original {
    /// Points are joined with segments unless the config says `false`.
    pub fn connects_lines(&self) -> bool {
        self.connect_lines != Some(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            kind: DEFAULT_ACTIVITY_TYPE.to_string(),
            transform: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityConfig {
    pub schema_version: SchemaVersion,
    pub view: View,
    pub ui: Ui,
    pub interaction: Interaction,
    pub feedback: FeedbackPolicy,
    pub series: Vec<Series>,
    pub original: Original,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    pub activity: Activity,
    /// Mirrors `activity.kind`; selects the validator.
    pub activity_type: String,
}

impl ActivityConfig {
    /// Fails when the config lacks what the renderer needs to draw anything.
    pub fn check_renderable(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.original.points.is_empty() {
            missing.push("original.points");
        }
        if !(self.view.xmin < self.view.xmax && self.view.ymin < self.view.ymax) {
            missing.push("view");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingFields(missing))
        }
    }

    /// Instruction line: the authored text, else the transform's default.
    pub fn instructions(&self) -> String {
        if !self.ui.instructions.is_empty() {
            return self.ui.instructions.clone();
        }
        self.transform
            .as_ref()
            .and_then(Transform::instructions)
            .unwrap_or_default()
            .to_string()
    }

    /// Series drawn in addition to the original graph.
    pub fn overlay_series(&self) -> impl Iterator<Item = &Series> {
        self.series
            .iter()
            .filter(|s| !s.has_role("original") && !s.points.is_empty())
    }
}
