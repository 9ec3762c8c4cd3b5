//! # Production Timeline
//!
//! Resolves declarative process templates (levain, bulk ferment, cold
//! proof, bake, ...) into concrete timestamped steps. Every template step is
//! positioned by a signed minute offset from the moment the bake starts.
//!
//! ## Usage
//!
//! ```rust
//! use bakehouse::timeline::generate_timeline;
//! use chrono::{TimeZone, Utc};
//!
//! let bake_at = Utc.with_ymd_and_hms(2026, 3, 14, 7, 0, 0).unwrap();
//! let steps = generate_timeline("yeasted-sandwich-loaf", bake_at);
//!
//! assert_eq!(steps[0].name, "Mix and knead");
//! assert!(generate_timeline("no-such-template", bake_at).is_empty());
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::MAX_TEMPLATE_OFFSET_MINUTES;
use crate::errors::TemplateError;

/// Embedded built-in templates
static BUILTIN_TEMPLATES_JSON: &str = include_str!("data/timeline_templates.json");

static BUILTIN_REGISTRY: LazyLock<TemplateRegistry> = LazyLock::new(|| {
    TemplateRegistry::from_json_str(BUILTIN_TEMPLATES_JSON)
        .expect("built-in timeline templates should be valid")
});

/// Kind of production step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Levain,
    Autolyse,
    Mix,
    BulkFerment,
    StretchAndFold,
    Divide,
    Shape,
    Proof,
    ColdProof,
    Preheat,
    Bake,
    Cool,
    #[serde(other)]
    Other,
}

impl StepType {
    /// Short label for schedules
    pub fn label(&self) -> &'static str {
        match self {
            StepType::Levain => "Levain",
            StepType::Autolyse => "Autolyse",
            StepType::Mix => "Mix",
            StepType::BulkFerment => "Bulk ferment",
            StepType::StretchAndFold => "Stretch & fold",
            StepType::Divide => "Divide",
            StepType::Shape => "Shape",
            StepType::Proof => "Proof",
            StepType::ColdProof => "Cold proof",
            StepType::Preheat => "Preheat",
            StepType::Bake => "Bake",
            StepType::Cool => "Cool",
            StepType::Other => "Other",
        }
    }

    /// Display colour for calendar views, as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            StepType::Levain => "#c9a227",
            StepType::Autolyse => "#8d6e63",
            StepType::Mix => "#6d4c41",
            StepType::BulkFerment => "#f9a825",
            StepType::StretchAndFold => "#fbc02d",
            StepType::Divide => "#7cb342",
            StepType::Shape => "#558b2f",
            StepType::Proof => "#29b6f6",
            StepType::ColdProof => "#1565c0",
            StepType::Preheat => "#ef6c00",
            StepType::Bake => "#c62828",
            StepType::Cool => "#78909c",
            StepType::Other => "#9e9e9e",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One step of a template, positioned relative to bake start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineTemplateStep {
    pub step_type: StepType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Minutes from bake start; negative steps happen before the bake
    pub offset_minutes_from_bake: i64,
    pub duration_minutes: u32,
}

impl TimelineTemplateStep {
    /// Minutes from bake start at which this step ends
    pub fn end_offset_minutes(&self) -> i64 {
        self.offset_minutes_from_bake
            .saturating_add(i64::from(self.duration_minutes))
    }

    /// Start and end of this step for a given bake time, `None` past chrono's range
    fn resolve(
        &self,
        target_bake_time: DateTime<Utc>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = target_bake_time
            .checked_add_signed(Duration::try_minutes(self.offset_minutes_from_bake)?)?;
        let end =
            start.checked_add_signed(Duration::try_minutes(i64::from(self.duration_minutes))?)?;
        Some((start, end))
    }
}

/// A named production process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<TimelineTemplateStep>,
}

/// A template step resolved against a concrete bake time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub step_type: StepType,
    pub name: String,
    pub description: String,
    pub offset_minutes_from_bake: i64,
    pub duration_minutes: u32,
    pub scheduled_start_at: DateTime<Utc>,
    pub scheduled_end_at: DateTime<Utc>,
}

impl fmt::Display for TimelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}  [{}] {}",
            self.scheduled_start_at.format("%a %H:%M"),
            self.scheduled_end_at.format("%a %H:%M"),
            self.step_type,
            self.name
        )
    }
}

/// Resolve every step of `template` against `target_bake_time`.
///
/// Steps come back ordered by start time, which can differ from the order
/// in which the template declares them. Steps starting at the same time
/// keep their declared order.
pub fn generate_timeline_from_template(
    template: &TimelineTemplate,
    target_bake_time: DateTime<Utc>,
) -> Vec<TimelineStep> {
    let mut steps: Vec<TimelineStep> = template
        .steps
        .iter()
        .filter_map(|step| {
            let Some((scheduled_start_at, scheduled_end_at)) = step.resolve(target_bake_time) else {
                warn!(
                    template = %template.id,
                    step = %step.name,
                    offset = step.offset_minutes_from_bake,
                    "Step falls outside the representable time range"
                );
                return None;
            };

            Some(TimelineStep {
                step_type: step.step_type,
                name: step.name.clone(),
                description: step.description.clone(),
                offset_minutes_from_bake: step.offset_minutes_from_bake,
                duration_minutes: step.duration_minutes,
                scheduled_start_at,
                scheduled_end_at,
            })
        })
        .collect();

    steps.sort_by_key(|step| step.scheduled_start_at);

    debug!(
        template = %template.id,
        steps = steps.len(),
        bake_at = %target_bake_time,
        "Generated timeline"
    );

    steps
}

/// Bake start such that the template's last step ends at `ready_at`.
///
/// `None` when the result falls outside chrono's range.
pub fn bake_start_for_completion(
    template: &TimelineTemplate,
    ready_at: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let last_end = template
        .steps
        .iter()
        .map(TimelineTemplateStep::end_offset_minutes)
        .max()
        .unwrap_or(0);
    ready_at.checked_sub_signed(Duration::try_minutes(last_end)?)
}

/// Timeline for a template whose last step must end at `ready_at`
pub fn generate_timeline_for_completion(
    template: &TimelineTemplate,
    ready_at: DateTime<Utc>,
) -> Vec<TimelineStep> {
    match bake_start_for_completion(template, ready_at) {
        Some(bake_at) => generate_timeline_from_template(template, bake_at),
        None => {
            warn!(template = %template.id, ready_at = %ready_at, "Cannot place bake start");
            Vec::new()
        }
    }
}

/// Timeline for a built-in template id; empty when the id is unknown
pub fn generate_timeline(template_id: &str, target_bake_time: DateTime<Utc>) -> Vec<TimelineStep> {
    TemplateRegistry::builtin().generate(template_id, target_bake_time)
}

#[derive(Deserialize)]
struct TemplateDocument {
    templates: Vec<TimelineTemplate>,
}

/// Ordered set of timeline templates, looked up by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateRegistry {
    templates: Vec<TimelineTemplate>,
}

impl TemplateRegistry {
    /// The templates shipped with the crate
    pub fn builtin() -> &'static TemplateRegistry {
        &BUILTIN_REGISTRY
    }

    /// Parse a `{"templates": [...]}` document.
    ///
    /// Ids must be non-empty and unique within the document, and every step
    /// must start and end within [`MAX_TEMPLATE_OFFSET_MINUTES`] of the bake.
    pub fn from_json_str(json: &str) -> Result<Self, TemplateError> {
        let document: TemplateDocument = serde_json::from_str(json)?;

        let mut seen = HashSet::new();
        for template in &document.templates {
            if template.id.trim().is_empty() {
                return Err(TemplateError::MissingId);
            }
            if !seen.insert(template.id.as_str()) {
                return Err(TemplateError::DuplicateId(template.id.clone()));
            }
            for step in &template.steps {
                let in_range = |minutes: i64| {
                    (-MAX_TEMPLATE_OFFSET_MINUTES..=MAX_TEMPLATE_OFFSET_MINUTES).contains(&minutes)
                };
                if !in_range(step.offset_minutes_from_bake) || !in_range(step.end_offset_minutes()) {
                    return Err(TemplateError::InvalidOffset {
                        template: template.id.clone(),
                        step: step.name.clone(),
                        offset_minutes: step.offset_minutes_from_bake,
                    });
                }
            }
        }

        Ok(Self {
            templates: document.templates,
        })
    }

    /// Parse a template document from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Built-in templates plus those in `path`; a custom template replaces a
    /// built-in one with the same id
    pub fn with_custom_file<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let custom = Self::from_path(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            templates = custom.templates.len(),
            "Loaded custom timeline templates"
        );
        Ok(Self::builtin().clone().merged(custom))
    }

    /// This registry with `other`'s templates added, replacing equal ids
    pub fn merged(mut self, other: TemplateRegistry) -> Self {
        for template in other.templates {
            match self.templates.iter_mut().find(|t| t.id == template.id) {
                Some(existing) => *existing = template,
                None => self.templates.push(template),
            }
        }
        self
    }

    /// Template with the given id
    pub fn get(&self, id: &str) -> Option<&TimelineTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Template ids in registry order
    pub fn ids(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.id.as_str()).collect()
    }

    /// All templates in registry order
    pub fn templates(&self) -> &[TimelineTemplate] {
        &self.templates
    }

    /// Timeline for `template_id`; empty when the id is unknown
    pub fn generate(
        &self,
        template_id: &str,
        target_bake_time: DateTime<Utc>,
    ) -> Vec<TimelineStep> {
        match self.get(template_id) {
            Some(template) => generate_timeline_from_template(template, target_bake_time),
            None => {
                warn!(template = %template_id, "Unknown timeline template");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bake_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 8, 0, 0).unwrap()
    }

    fn step(step_type: StepType, name: &str, offset: i64, duration: u32) -> TimelineTemplateStep {
        TimelineTemplateStep {
            step_type,
            name: name.to_string(),
            description: String::new(),
            offset_minutes_from_bake: offset,
            duration_minutes: duration,
        }
    }

    fn template(steps: Vec<TimelineTemplateStep>) -> TimelineTemplate {
        TimelineTemplate {
            id: "test".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            steps,
        }
    }

    #[test]
    fn test_builtin_templates_load() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(
            registry.ids(),
            vec!["sourdough-loaf", "yeasted-sandwich-loaf", "overnight-baguette"]
        );
        assert!(registry.templates().iter().all(|t| !t.steps.is_empty()));
    }

    #[test]
    fn test_offsets_resolve_against_bake_time() {
        let steps = generate_timeline_from_template(
            &template(vec![step(StepType::Proof, "Proof", -90, 60)]),
            bake_time(),
        );
        assert_eq!(steps[0].scheduled_start_at, Utc.with_ymd_and_hms(2026, 5, 2, 6, 30, 0).unwrap());
        assert_eq!(steps[0].scheduled_end_at, Utc.with_ymd_and_hms(2026, 5, 2, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_output_sorted_by_start() {
        let steps = generate_timeline_from_template(
            &template(vec![
                step(StepType::Bake, "Bake", 0, 40),
                step(StepType::Preheat, "Preheat", -45, 45),
                step(StepType::Mix, "Mix", -300, 15),
            ]),
            bake_time(),
        );
        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Mix", "Preheat", "Bake"]);
    }

    #[test]
    fn test_equal_starts_keep_declared_order() {
        let steps = generate_timeline_from_template(
            &template(vec![
                step(StepType::BulkFerment, "Bulk", -60, 60),
                step(StepType::StretchAndFold, "Folds", -60, 30),
            ]),
            bake_time(),
        );
        assert_eq!(steps[0].name, "Bulk");
        assert_eq!(steps[1].name, "Folds");
    }

    #[test]
    fn test_unknown_id_yields_empty_timeline() {
        assert!(TemplateRegistry::builtin().generate("croquembouche", bake_time()).is_empty());
    }

    #[test]
    fn test_bake_start_for_completion() {
        let t = template(vec![
            step(StepType::Bake, "Bake", 0, 40),
            step(StepType::Cool, "Cool", 40, 80),
        ]);
        let ready_at = Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).unwrap();
        assert_eq!(bake_start_for_completion(&t, ready_at), Some(bake_time()));

        let steps = generate_timeline_for_completion(&t, ready_at);
        assert_eq!(steps.last().unwrap().scheduled_end_at, ready_at);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"templates": [
            {"id": "a", "name": "A", "steps": []},
            {"id": "a", "name": "A again", "steps": []}
        ]}"#;
        assert_eq!(
            TemplateRegistry::from_json_str(json),
            Err(TemplateError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        let json = r#"{"templates": [{"id": "x", "name": "X", "steps": [
            {"stepType": "bake", "name": "Bake", "offsetMinutesFromBake": 200000000000, "durationMinutes": 30}
        ]}]}"#;
        assert_eq!(
            TemplateRegistry::from_json_str(json),
            Err(TemplateError::InvalidOffset {
                template: "x".to_string(),
                step: "Bake".to_string(),
                offset_minutes: 200_000_000_000,
            })
        );

        let json = r#"{"templates": [{"id": "y", "name": "Y", "steps": [
            {"stepType": "cool", "name": "Cool", "offsetMinutesFromBake": 527000, "durationMinutes": 100}
        ]}]}"#;
        assert!(matches!(
            TemplateRegistry::from_json_str(json),
            Err(TemplateError::InvalidOffset { .. })
        ));
    }

    #[test]
    fn test_unrepresentable_steps_are_skipped() {
        let t = template(vec![
            step(StepType::Mix, "Mix", -60, 15),
            step(StepType::Bake, "Bake", 200_000_000_000, 30),
        ]);
        let steps = generate_timeline_from_template(&t, bake_time());
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "Mix");

        let ready_at = Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).unwrap();
        assert_eq!(bake_start_for_completion(&t, ready_at), None);
        assert!(generate_timeline_for_completion(&t, ready_at).is_empty());
    }

    #[test]
    fn test_empty_id_rejected() {
        let json = r#"{"templates": [{"id": " ", "name": "Blank"}]}"#;
        assert_eq!(TemplateRegistry::from_json_str(json), Err(TemplateError::MissingId));
    }

    #[test]
    fn test_unrecognized_step_type_is_other() {
        let json = r#"{"templates": [{"id": "x", "name": "X", "steps": [
            {"stepType": "laminate", "name": "Laminate", "offsetMinutesFromBake": -120, "durationMinutes": 30}
        ]}]}"#;
        let registry = TemplateRegistry::from_json_str(json).unwrap();
        assert_eq!(registry.get("x").unwrap().steps[0].step_type, StepType::Other);
    }

    #[test]
    fn test_merged_replaces_equal_ids() {
        let custom = TemplateRegistry::from_json_str(
            r#"{"templates": [
                {"id": "sourdough-loaf", "name": "House sourdough", "steps": []},
                {"id": "brioche", "name": "Brioche", "steps": []}
            ]}"#,
        )
        .unwrap();
        let registry = TemplateRegistry::builtin().clone().merged(custom);
        assert_eq!(registry.get("sourdough-loaf").unwrap().name, "House sourdough");
        assert_eq!(registry.ids().len(), 4);
        assert_eq!(registry.ids()[3], "brioche");
    }

    #[test]
    fn test_step_type_colors_are_hex() {
        for step_type in [StepType::Levain, StepType::BulkFerment, StepType::ColdProof, StepType::Bake] {
            let color = step_type.color();
            assert!(color.starts_with('#') && color.len() == 7);
        }
    }
}
