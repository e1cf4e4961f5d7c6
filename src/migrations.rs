//! Raw activity JSON -> canonical [`ActivityConfig`].
//!
//! Two generations of authored content exist. Schema "1" nests everything
//! under `view`/`ui`/`interaction`/`feedback`/`series`/`activity`; anything
//! else is the legacy flat shape (`title`, `grid`, `original`, `transform`).
//! Normalization never fails: each field is derived on its own, and a bad
//! field falls back to its default without taking the rest of the config
//! down with it.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{
    Activity, ActivityConfig, FeedbackPolicy, Interaction, InteractionMode, Original,
    SchemaVersion, Series, SeriesStyle, Ui, DEFAULT_ACTIVITY_TYPE,
};
use crate::geometry::{Point, View};
use crate::transform::{Transform, TransformKind};

/// Role lookup order when the original graph has to come from `series`.
const ORIGINAL_ROLES: [&str; 3] = ["original", "reference", "base"];

pub fn normalize(raw: &Value) -> ActivityConfig {
    let version = schema_version(raw);
    debug!(%version, "normalizing activity config");
    match version {
        SchemaVersion::V1 => normalize_v1(raw),
        SchemaVersion::Legacy => normalize_legacy(raw),
    }
}

fn schema_version(raw: &Value) -> SchemaVersion {
    match raw.get("schemaVersion").and_then(text) {
        Some(v) if v == "1" => SchemaVersion::V1,
        _ => SchemaVersion::Legacy,
    }
}

fn normalize_v1(raw: &Value) -> ActivityConfig {
    let series = series_v1(raw);
    let original = explicit_original(raw).unwrap_or_else(|| original_from_series(&series));
    let activity = activity(raw);
    let transform = raw
        .get("transform")
        .and_then(transform)
        .or_else(|| activity.transform.clone());

    ActivityConfig {
        schema_version: SchemaVersion::V1,
        view: view(object_at(raw, "view").or_else(|| object_at(raw, "grid"))),
        ui: ui(raw, UiPrecedence::Nested),
        interaction: interaction(raw.get("interaction")),
        feedback: feedback(raw.get("feedback")),
        series,
        original,
        transform,
        activity_type: activity.kind.clone(),
        activity,
    }
}

/// Legacy content is already in the shape the engine expects; it is read
/// as-is, with the canonical keys accepted too so that re-normalizing a
/// normalized legacy config is a no-op.
fn normalize_legacy(raw: &Value) -> ActivityConfig {
    let activity = activity(raw);

    ActivityConfig {
        schema_version: SchemaVersion::Legacy,
        view: view(object_at(raw, "grid").or_else(|| object_at(raw, "view"))),
        ui: ui(raw, UiPrecedence::TopLevel),
        interaction: interaction(raw.get("interaction")),
        feedback: feedback(raw.get("feedback")),
        series: raw.get("series").map(series_list).unwrap_or_default(),
        original: explicit_original(raw).unwrap_or_default(),
        transform: raw.get("transform").and_then(transform),
        activity_type: activity.kind.clone(),
        activity,
    }
}

fn view(source: Option<&Value>) -> View {
    let default = View::default();
    let Some(source) = source.filter(|v| v.is_object()) else {
        return default;
    };

    let mut view = View {
        xmin: number_or(source.get("xmin"), default.xmin),
        xmax: number_or(source.get("xmax"), default.xmax),
        ymin: number_or(source.get("ymin"), default.ymin),
        ymax: number_or(source.get("ymax"), default.ymax),
    };
    if view.xmin >= view.xmax {
        warn!(xmin = view.xmin, xmax = view.xmax, "empty x range, using default");
        view.xmin = default.xmin;
        view.xmax = default.xmax;
    }
    if view.ymin >= view.ymax {
        warn!(ymin = view.ymin, ymax = view.ymax, "empty y range, using default");
        view.ymin = default.ymin;
        view.ymax = default.ymax;
    }
    view
}

#[derive(Clone, Copy)]
enum UiPrecedence {
    /// `ui.title` wins over top-level `title`
    Nested,
    /// top-level `title` wins over `ui.title`
    TopLevel,
}

fn ui(raw: &Value, precedence: UiPrecedence) -> Ui {
    let nested = raw.get("ui").filter(|v| v.is_object());
    let pick = |key: &str| {
        let from_ui = nested.and_then(|u| u.get(key));
        let top = raw.get(key);
        match precedence {
            UiPrecedence::Nested => from_ui.and_then(non_null).or(top),
            UiPrecedence::TopLevel => top.and_then(non_null).or(from_ui),
        }
        .and_then(non_null)
    };

    Ui {
        title: pick("title").and_then(text).unwrap_or_default(),
        subtitle: pick("subtitle").and_then(text).unwrap_or_default(),
        instructions: pick("instructions").and_then(text).unwrap_or_default(),
        legend: pick("legend").map(legend).unwrap_or_default(),
    }
}

fn legend(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(o) => o.get("label").and_then(text),
                other => text(other),
            })
            .collect(),
        other => text(other).into_iter().collect(),
    }
}

fn interaction(source: Option<&Value>) -> Interaction {
    let default = Interaction::default();
    let Some(source) = source.filter(|v| v.is_object()) else {
        return default;
    };

    let mode = source
        .get("mode")
        .and_then(text)
        .map(InteractionMode::from)
        .unwrap_or(default.mode);

    let mut snap_step = number_or(source.get("snapStep"), default.snap_step);
    if snap_step <= 0.0 {
        warn!(snap_step, "non-positive snapStep, using default");
        snap_step = default.snap_step;
    }

    let mut hit_radius_px = number_or(source.get("hitRadiusPx"), default.hit_radius_px);
    if hit_radius_px < 0.0 {
        warn!(hit_radius_px, "negative hitRadiusPx, using default");
        hit_radius_px = default.hit_radius_px;
    }

    Interaction {
        mode,
        snap_step,
        hit_radius_px,
    }
}

fn feedback(source: Option<&Value>) -> FeedbackPolicy {
    let default = FeedbackPolicy::default();
    let flag = |key: &str, fallback: bool| {
        source
            .and_then(|s| s.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(fallback)
    };
    FeedbackPolicy {
        show_expected_points_on_fail: flag(
            "showExpectedPointsOnFail",
            default.show_expected_points_on_fail,
        ),
        show_solution_on_fail: flag("showSolutionOnFail", default.show_solution_on_fail),
        allow_hints: flag("allowHints", default.allow_hints),
    }
}

fn series_v1(raw: &Value) -> Vec<Series> {
    if let Some(list) = raw.get("series").filter(|v| v.is_array()) {
        return series_list(list);
    }
    match raw
        .get("original")
        .and_then(|o| o.get("points"))
        .and_then(points)
    {
        Some(points) => vec![Series {
            id: Some("original".into()),
            role: Some("original".into()),
            points,
            ..Series::default()
        }],
        None => Vec::new(),
    }
}

fn series_list(value: &Value) -> Vec<Series> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let parsed = entry.as_object().map(series_entry);
            if parsed.is_none() {
                warn!(?entry, "skipping series entry that is not an object");
            }
            parsed
        })
        .collect()
}

fn series_entry(entry: &Map<String, Value>) -> Series {
    let nested_points = |key: &str| entry.get(key).and_then(|v| v.get("points"));
    let points = entry
        .get("points")
        .and_then(points)
        .or_else(|| nested_points("geometry").and_then(points))
        .or_else(|| nested_points("data").and_then(points))
        .unwrap_or_default();

    Series {
        id: entry.get("id").and_then(text),
        role: entry.get("role").and_then(text),
        label: entry.get("label").and_then(text),
        kind: entry.get("type").and_then(text),
        points,
        style: entry
            .get("style")
            .and_then(Value::as_object)
            .map(series_style),
    }
}

fn series_style(style: &Map<String, Value>) -> SeriesStyle {
    SeriesStyle {
        r: style.get("r").and_then(number),
        fill: style.get("fill").and_then(text),
        stroke: style.get("stroke").and_then(text),
        stroke_width: style.get("strokeWidth").and_then(number),
        opacity: style.get("opacity").and_then(number),
        dashed: style.get("dashed").and_then(Value::as_bool),
    }
}

fn explicit_original(raw: &Value) -> Option<Original> {
    let original = raw.get("original")?;
    let points = original.get("points").and_then(points)?;
    Some(Original {
        points,
        connect_lines: original.get("connectLines").and_then(Value::as_bool),
    })
}

fn original_from_series(series: &[Series]) -> Original {
    let candidate = ORIGINAL_ROLES
        .iter()
        .find_map(|role| series.iter().find(|s| s.has_role(role)))
        .or_else(|| series.first());

    match candidate {
        Some(s) => {
            debug!(id = ?s.id, role = ?s.role, "original graph taken from series");
            Original {
                points: s.points.clone(),
                connect_lines: None,
            }
        }
        None => {
            warn!("no original points and no series to take them from");
            Original::default()
        }
    }
}

fn activity(raw: &Value) -> Activity {
    let source = raw.get("activity").and_then(Value::as_object);
    let kind = source
        .and_then(|s| s.get("type"))
        .and_then(text)
        .or_else(|| raw.get("activityType").and_then(text))
        .unwrap_or_else(|| DEFAULT_ACTIVITY_TYPE.to_string());

    let mut extra = source.cloned().unwrap_or_default();
    extra.remove("type");
    let transform = extra.remove("transform").as_ref().and_then(transform);

    Activity {
        kind,
        transform,
        extra,
    }
}

fn transform(value: &Value) -> Option<Transform> {
    let mut params = value.as_object()?.clone();
    let kind = params
        .remove("type")
        .as_ref()
        .and_then(text)
        .map(TransformKind::from);
    Some(Transform { kind, params })
}

fn points(value: &Value) -> Option<Vec<Point>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| {
                let p = point(item);
                if p.is_none() {
                    warn!(?item, "skipping malformed point");
                }
                p
            })
            .collect(),
    )
}

/// `[x, y]` or `{ "x": x, "y": y }`
fn point(value: &Value) -> Option<Point> {
    match value {
        Value::Array(xy) if xy.len() >= 2 => Some(Point(number(&xy[0])?, number(&xy[1])?)),
        Value::Object(o) => Some(Point(number(o.get("x")?)?, number(o.get("y")?)?)),
        _ => None,
    }
}

/// Finite number, or a string that parses as one.
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn number_or(value: Option<&Value>, fallback: f64) -> f64 {
    match value.and_then(number) {
        Some(n) => n,
        None => {
            if value.is_some_and(|v| !v.is_null()) {
                warn!(?value, fallback, "not a number, using fallback");
            }
            fallback
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn object_at<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| v.is_object())
}

fn non_null(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renormalize(cfg: &ActivityConfig) -> ActivityConfig {
        normalize(&serde_json::to_value(cfg).unwrap())
    }

    #[test]
    fn test_legacy_config_passes_through() {
        let raw = json!({
            "title": "Reflect across the x-axis",
            "grid": { "xmin": -5, "xmax": 5, "ymin": -6, "ymax": 6 },
            "original": { "points": [[-2, 4], [0, 0], [2, 4]], "connectLines": false },
            "transform": { "type": "reflect_x" }
        });
        let cfg = normalize(&raw);

        assert_eq!(cfg.schema_version, SchemaVersion::Legacy);
        assert_eq!(cfg.ui.title, "Reflect across the x-axis");
        assert_eq!(
            cfg.view,
            View { xmin: -5.0, xmax: 5.0, ymin: -6.0, ymax: 6.0 }
        );
        assert_eq!(cfg.original.points, vec![Point(-2.0, 4.0), Point(0.0, 0.0), Point(2.0, 4.0)]);
        assert!(!cfg.original.connects_lines());
        assert_eq!(cfg.transform, Some(Transform::new(TransformKind::ReflectX)));
        assert_eq!(cfg.activity_type, "transformations");
        assert!(cfg.series.is_empty());
    }

    #[test]
    fn test_legacy_never_infers_transform_from_title() {
        let raw = json!({
            "title": "Reflect across the x-axis",
            "grid": {},
            "original": { "points": [[1, 1]] }
        });
        assert_eq!(normalize(&raw).transform, None);
    }

    #[test]
    fn test_numeric_schema_version_selects_v1() {
        let cfg = normalize(&json!({ "schemaVersion": 1 }));
        assert_eq!(cfg.schema_version, SchemaVersion::V1);
        let cfg = normalize(&json!({ "schemaVersion": "2" }));
        assert_eq!(cfg.schema_version, SchemaVersion::Legacy);
    }

    #[test]
    fn test_v1_full_config() {
        let raw = json!({
            "schemaVersion": "1",
            "view": { "xmin": -8, "xmax": 8, "ymin": -4, "ymax": 4 },
            "ui": { "title": "T", "subtitle": "S", "instructions": "I", "legend": ["f(x)", { "label": "g(x)" }] },
            "interaction": { "mode": "placePoints", "snapStep": 0.5, "hitRadiusPx": 20 },
            "feedback": { "showExpectedPointsOnFail": true, "showSolutionOnFail": false, "allowHints": false },
            "series": [
                { "id": "f", "role": "original", "type": "polyline", "points": [[1, 2], [3, 4]],
                  "style": { "stroke": "#2563eb", "strokeWidth": 2, "dashed": true } }
            ],
            "activity": { "type": "transformations", "transform": { "type": "reflect_y" }, "level": 2 }
        });
        let cfg = normalize(&raw);

        assert_eq!(cfg.schema_version, SchemaVersion::V1);
        assert_eq!(cfg.view.xmax, 8.0);
        assert_eq!(cfg.ui.legend, vec!["f(x)", "g(x)"]);
        assert_eq!(cfg.interaction.snap_step, 0.5);
        assert_eq!(cfg.interaction.hit_radius_px, 20.0);
        assert!(cfg.feedback.show_expected_points_on_fail);
        assert!(!cfg.feedback.show_solution_on_fail);
        assert!(!cfg.feedback.allow_hints);
        assert_eq!(cfg.original.points, vec![Point(1.0, 2.0), Point(3.0, 4.0)]);
        assert_eq!(cfg.transform, Some(Transform::new(TransformKind::ReflectY)));
        assert_eq!(cfg.activity.extra.get("level"), Some(&json!(2)));
        let style = cfg.series[0].style.as_ref().unwrap();
        assert_eq!(style.dashed, Some(true));
        assert_eq!(style.stroke_width, Some(2.0));
    }

    #[test]
    fn test_v1_defaults_for_empty_input() {
        let cfg = normalize(&json!({ "schemaVersion": "1" }));
        assert_eq!(cfg.view, View::default());
        assert_eq!(cfg.ui, Ui::default());
        assert_eq!(cfg.interaction, Interaction::default());
        assert_eq!(cfg.feedback, FeedbackPolicy::default());
        assert!(cfg.series.is_empty());
        assert!(cfg.original.points.is_empty());
        assert_eq!(cfg.transform, None);
        assert_eq!(cfg.activity_type, DEFAULT_ACTIVITY_TYPE);
        assert!(cfg.check_renderable().is_err());
    }

    #[test]
    fn test_view_falls_back_to_grid_then_field_by_field() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "grid": { "xmin": "-3", "xmax": "oops", "ymin": null, "ymax": 7 }
        }));
        assert_eq!(cfg.view, View { xmin: -3.0, xmax: 10.0, ymin: -10.0, ymax: 7.0 });
    }

    #[test]
    fn test_inverted_view_axis_resets_that_axis() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "view": { "xmin": 5, "xmax": -5, "ymin": 0, "ymax": 3 }
        }));
        assert_eq!(cfg.view, View { xmin: -10.0, xmax: 10.0, ymin: 0.0, ymax: 3.0 });
    }

    #[test]
    fn test_ui_falls_back_to_legacy_top_level_keys() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "title": "Legacy title",
            "ui": { "subtitle": "New subtitle", "title": null }
        }));
        assert_eq!(cfg.ui.title, "Legacy title");
        assert_eq!(cfg.ui.subtitle, "New subtitle");
        assert_eq!(cfg.ui.instructions, "");
    }

    #[test]
    fn test_bad_interaction_numbers_use_defaults() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "interaction": { "mode": "dragHandles", "snapStep": 0, "hitRadiusPx": -4 }
        }));
        assert_eq!(cfg.interaction.mode, InteractionMode::DragHandles);
        assert_eq!(cfg.interaction.snap_step, 1.0);
        assert_eq!(cfg.interaction.hit_radius_px, 12.0);
    }

    #[test]
    fn test_series_synthesized_from_original_points() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "original": { "points": [[0, 1]] }
        }));
        assert_eq!(cfg.series.len(), 1);
        assert!(cfg.series[0].has_role("original"));
        assert_eq!(cfg.series[0].points, vec![Point(0.0, 1.0)]);
        assert_eq!(cfg.original.points, vec![Point(0.0, 1.0)]);
    }

    #[test]
    fn test_original_resolved_by_role_priority() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "series": [
                { "id": "helper", "points": [[9, 9]] },
                { "role": "base", "points": [[1, 1]] },
                { "role": "reference", "geometry": { "points": [[2, 2]] } }
            ]
        }));
        assert_eq!(cfg.original.points, vec![Point(2.0, 2.0)]);
    }

    #[test]
    fn test_original_falls_back_to_first_series_and_data_points() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "series": [
                { "id": "g", "data": { "points": [{ "x": 1, "y": -1 }, "junk"] } },
                { "id": "h", "points": [[5, 5]] }
            ]
        }));
        assert_eq!(cfg.original.points, vec![Point(1.0, -1.0)]);
    }

    #[test]
    fn test_series_matches_original_by_id() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "series": [
                { "id": "other", "points": [[3, 3]] },
                { "id": "original", "points": [[4, 4]] }
            ]
        }));
        assert_eq!(cfg.original.points, vec![Point(4.0, 4.0)]);
    }

    #[test]
    fn test_transform_prefers_top_level_over_activity() {
        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "transform": { "type": "reflect_x" },
            "activity": { "transform": { "type": "reflect_y" } }
        }));
        assert_eq!(cfg.transform, Some(Transform::new(TransformKind::ReflectX)));

        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "transform": null,
            "activity": { "transform": { "type": "reflect_y" } }
        }));
        assert_eq!(cfg.transform, Some(Transform::new(TransformKind::ReflectY)));
    }

    #[test]
    fn test_activity_type_fallback_chain() {
        let cfg = normalize(&json!({ "schemaVersion": "1", "activityType": "graphing" }));
        assert_eq!(cfg.activity.kind, "graphing");
        assert_eq!(cfg.activity_type, "graphing");

        let cfg = normalize(&json!({
            "schemaVersion": "1",
            "activityType": "graphing",
            "activity": { "type": "transformations" }
        }));
        assert_eq!(cfg.activity_type, "transformations");
    }

    #[test]
    fn test_non_object_input_does_not_panic() {
        for raw in [json!(null), json!([1, 2, 3]), json!("config"), json!(42)] {
            let cfg = normalize(&raw);
            assert_eq!(cfg.schema_version, SchemaVersion::Legacy);
            assert!(cfg.original.points.is_empty());
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            json!({
                "schemaVersion": "1",
                "grid": { "xmin": -4, "xmax": 4, "ymin": -4, "ymax": 4 },
                "title": "t",
                "series": [{ "role": "base", "geometry": { "points": [[1, 2], [2, 3]] } }],
                "activity": { "transform": { "type": "reflect_x" }, "hint": "flip it" }
            }),
            json!({
                "schemaVersion": "1",
                "original": { "points": [], "connectLines": true },
                "interaction": { "snapStep": "2" }
            }),
            json!({
                "title": "legacy",
                "grid": { "xmin": 0, "xmax": 6, "ymin": 0, "ymax": 6 },
                "original": { "points": [[1, 1]] },
                "transform": { "type": "reflect_y" }
            }),
        ];
        for raw in samples {
            let once = normalize(&raw);
            assert_eq!(renormalize(&once), once);
        }
    }
}
