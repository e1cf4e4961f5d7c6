use std::fmt;

use tracing::{debug, info};

use crate::config::ActivityConfig;
use crate::geometry::{Point, View, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use crate::matcher::order_student_points;
use crate::transform::compute_expected;
use crate::validator::{ValidatorRegistry, Verdict};

/// Tolerance used for the live ordered match.
pub const MATCH_TOLERANCE: f64 = 0.0;

/// What happened to a click or a direct point placement.
#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
pub enum ClickOutcome {
    #[strum(to_string = "placed")]
    Accepted(Point),
    /// Every expected point is already matched.
    #[strum(to_string = "all points placed")]
    Full,
    /// The snapped point was placed before.
    #[strum(to_string = "point already placed")]
    Duplicate,
    /// The nearest grid point is farther than the configured hit radius.
    #[strum(to_string = "click closer to a grid point")]
    OutsideHitRadius,
    #[strum(to_string = "outside the graph")]
    OutsideViewport,
    /// The configured interaction mode does not place points.
    #[strum(to_string = "this activity does not take point clicks")]
    UnsupportedMode,
}

impl ClickOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ClickOutcome::Accepted(_))
    }
}

type ChangeHook = Box<dyn FnMut(&ActivitySession)>;

/// State of one loaded activity. Created once per load and owned by the
/// caller driving the UI; every operation runs to completion before the
/// next one starts.
pub struct ActivitySession {
    config: ActivityConfig,
    view: View,
    expected_points: Vec<Point>,
    student_points: Vec<Point>,
    ordered_student_points: Vec<Point>,
    show_solution: bool,
    last_submit_correct: Option<bool>,
    feedback: String,
    validators: ValidatorRegistry,
    on_change: Option<ChangeHook>,
}

impl ActivitySession {
    pub fn new(config: ActivityConfig) -> Self {
        Self::with_validators(config, ValidatorRegistry::default())
    }

    pub fn with_validators(config: ActivityConfig, validators: ValidatorRegistry) -> Self {
        let expected_points = compute_expected(&config.original.points, config.transform.as_ref());
        info!(
            activity_type = %config.activity_type,
            expected = expected_points.len(),
            "activity session created"
        );
        Self {
            view: config.view,
            expected_points,
            config,
            student_points: Vec::new(),
            ordered_student_points: Vec::new(),
            show_solution: false,
            last_submit_correct: None,
            feedback: String::new(),
            validators,
            on_change: None,
        }
    }

    /// Called after every state change, e.g. to redraw.
    pub fn set_on_change(&mut self, hook: impl FnMut(&ActivitySession) + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn expected_points(&self) -> &[Point] {
        &self.expected_points
    }

    pub fn student_points(&self) -> &[Point] {
        &self.student_points
    }

    pub fn ordered_student_points(&self) -> &[Point] {
        &self.ordered_student_points
    }

    pub fn show_solution(&self) -> bool {
        self.show_solution
    }

    pub fn last_submit_correct(&self) -> Option<bool> {
        self.last_submit_correct
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn validators_mut(&mut self) -> &mut ValidatorRegistry {
        &mut self.validators
    }

    /// Capacity is measured on matched points, so wrong clicks never block
    /// a student from placing the remaining correct ones.
    pub fn is_full(&self) -> bool {
        self.ordered_student_points.len() >= self.expected_points.len()
    }

    pub fn add_point(&mut self, p: Point) -> ClickOutcome {
        if self.is_full() {
            debug!(point = %p, "activity full, point rejected");
            return ClickOutcome::Full;
        }
        if self.student_points.iter().any(|q| *q == p) {
            debug!(point = %p, "duplicate point rejected");
            return ClickOutcome::Duplicate;
        }

        self.student_points.push(p);
        self.rematch();
        self.feedback.clear();
        debug!(
            point = %p,
            placed = self.student_points.len(),
            matched = self.ordered_student_points.len(),
            "point placed"
        );
        self.notify();
        ClickOutcome::Accepted(p)
    }

    /// Remove the most recent click. Nothing happens when there is none.
    pub fn undo(&mut self) -> Option<Point> {
        let removed = self.student_points.pop()?;
        self.rematch();
        self.feedback.clear();
        self.notify();
        Some(removed)
    }

    /// Back to the freshly loaded state. The view and expected points stay.
    pub fn reset(&mut self) {
        self.student_points.clear();
        self.ordered_student_points.clear();
        self.feedback.clear();
        self.show_solution = false;
        self.last_submit_correct = None;
        self.notify();
    }

    pub fn zoom_in(&mut self) {
        self.view = self.view.scaled(ZOOM_IN_FACTOR);
        self.notify();
    }

    pub fn zoom_out(&mut self) {
        self.view = self.view.scaled(ZOOM_OUT_FACTOR);
        self.notify();
    }

    /// Judge the current clicks with the validator registered for the
    /// activity type. A failed attempt reveals the expected points only
    /// when the config asks for it.
    pub fn submit(&mut self) -> Verdict {
        let verdict = self.validators.validate(&self.config.activity_type, self);
        info!(
            correct = verdict.is_correct,
            placed = self.student_points.len(),
            message = verdict.message(),
            "submission judged"
        );

        self.feedback = verdict.message().to_string();
        self.last_submit_correct = Some(verdict.is_correct);
        if !verdict.is_correct && self.config.feedback.show_expected_points_on_fail {
            self.show_solution = true;
        }
        self.notify();
        verdict
    }

    pub fn enable_solution(&mut self) {
        self.show_solution = true;
        self.notify();
    }

    pub fn clear_solution(&mut self) {
        self.show_solution = false;
        self.notify();
    }

    /// Whether the UI should offer a "see solution" action.
    pub fn can_reveal_solution(&self) -> bool {
        self.last_submit_correct == Some(false) && self.config.feedback.show_solution_on_fail
    }

    pub fn hint(&self) -> Option<String> {
        if !self.config.feedback.allow_hints {
            return None;
        }
        let text = self.config.instructions();
        (!text.is_empty()).then_some(text)
    }

    fn rematch(&mut self) {
        self.ordered_student_points =
            order_student_points(&self.expected_points, &self.student_points, MATCH_TOLERANCE);
    }

    fn notify(&mut self) {
        if let Some(mut hook) = self.on_change.take() {
            hook(self);
            self.on_change = Some(hook);
        }
    }
}

impl fmt::Debug for ActivitySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivitySession")
            .field("view", &self.view)
            .field("expected_points", &self.expected_points)
            .field("student_points", &self.student_points)
            .field("ordered_student_points", &self.ordered_student_points)
            .field("show_solution", &self.show_solution)
            .field("last_submit_correct", &self.last_submit_correct)
            .field("feedback", &self.feedback)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}
