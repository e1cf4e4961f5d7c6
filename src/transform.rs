use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::Point;

/// Transformation the student has to apply to the original graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransformKind {
    /// (x, y) -> (x, -y)
    ReflectX,
    /// (x, y) -> (-x, y)
    ReflectY,
    /// Anything else. Applied as the identity.
    Other(String),
}

impl From<String> for TransformKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "reflect_x" => TransformKind::ReflectX,
            "reflect_y" => TransformKind::ReflectY,
            _ => TransformKind::Other(s),
        }
    }
}

impl From<TransformKind> for String {
    fn from(kind: TransformKind) -> Self {
        match kind {
            TransformKind::ReflectX => "reflect_x".to_string(),
            TransformKind::ReflectY => "reflect_y".to_string(),
            TransformKind::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransformKind>,
    /// Extra parameters carried for transform types this build does not know.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl Transform {
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind: Some(kind),
            params: Map::new(),
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        // + 0.0 keeps reflected zeros from turning into -0.0
        match self.kind {
            Some(TransformKind::ReflectX) => Point(p.0, -p.1 + 0.0),
            Some(TransformKind::ReflectY) => Point(-p.0 + 0.0, p.1),
            Some(TransformKind::Other(_)) | None => p,
        }
    }

    /// Default how-to sentence for the student, if the transform has one.
    pub fn instructions(&self) -> Option<&'static str> {
        match self.kind {
            Some(TransformKind::ReflectX) => Some(
                "Reflect the graph across the x-axis: keep x-values the same and negate y-values.",
            ),
            Some(TransformKind::ReflectY) => Some(
                "Reflect the graph across the y-axis: keep y-values the same and negate x-values.",
            ),
            _ => None,
        }
    }
}

/// Image of `points` under `transform`, index for index. A missing or
/// unrecognised transform yields a copy of the input.
pub fn compute_expected(points: &[Point], transform: Option<&Transform>) -> Vec<Point> {
    match transform {
        Some(t) => points.iter().map(|p| t.apply(*p)).collect(),
        None => points.to_vec(),
    }
}
