//! Validation & Scoring - Rule/Policy Separation
//!
//! Rules inspect assembled text and produce structured violations.
//! Scoring and the production gate are policy over those violations.
//!
//! Coverage is read from literal markers in the text (`[ABSOLUTE]`,
//! section headers), not from structured blocks. Thresholds depend on it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::assembler::{
    ASPECT_RATIO_LABEL, CONSTRAINTS_MARKER, MANDATORY_SECTIONS, QUALITY_MARKER,
};
use crate::config::ScoringConfig;
use crate::constraints::{Severity, CONTEXT_RULES_TITLE, SPECIFICATION_ADHERENCE_TITLE};

static BLOCKING_WARNING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)critical|low placement confidence").expect("valid blocking warning regex")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Messages of error-severity violations.
    pub issues: Vec<String>,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationReport {
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Warning)
    }
}

/// What the rules look at.
#[derive(Debug, Clone, Copy)]
pub struct PromptInspection<'a> {
    pub text: &'a str,
    pub max_length: usize,
    pub product_name: &'a str,
    pub product_type: &'a str,
}

/// Validation rule trait - produces violations
pub trait PromptRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, input: &PromptInspection) -> Vec<ValidationViolation>;
}

fn framed(header: &str) -> String {
    format!("=== {} ===", header)
}

// --- Concrete Rules ---

pub struct LengthBudgetRule;

impl PromptRule for LengthBudgetRule {
    fn name(&self) -> &'static str { "length_budget" }

    fn validate(&self, input: &PromptInspection) -> Vec<ValidationViolation> {
        let length = input.text.chars().count();
        if length == 0 {
            return vec![ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: "Prompt is empty".to_string(),
                expected: Some("non-empty prompt".to_string()),
                actual: Some("0 characters".to_string()),
                remediation: vec!["Re-run assembly with a valid product specification".to_string()],
            }];
        }
        if length > input.max_length {
            return vec![ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("Prompt length {} exceeds maximum {}", length, input.max_length),
                expected: Some(format!("<= {} characters", input.max_length)),
                actual: Some(format!("{} characters", length)),
                remediation: vec!["Shorten notes or raise maxPromptLength".to_string()],
            }];
        }
        vec![]
    }
}

pub struct RequiredMarkerRule {
    pub rule: &'static str,
    pub marker: &'static str,
}

impl PromptRule for RequiredMarkerRule {
    fn name(&self) -> &'static str { self.rule }

    fn validate(&self, input: &PromptInspection) -> Vec<ValidationViolation> {
        if input.text.contains(&framed(self.marker)) {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Error,
            message: format!("Missing required section: {}", self.marker),
            expected: Some(framed(self.marker)),
            actual: None,
            remediation: vec![
                "Assembly did not complete its fixed sequence; check for truncation".to_string(),
            ],
        }]
    }
}

pub struct RequiredFieldsRule;

impl PromptRule for RequiredFieldsRule {
    fn name(&self) -> &'static str { "required_fields" }

    fn validate(&self, input: &PromptInspection) -> Vec<ValidationViolation> {
        [("product name", input.product_name), ("product type", input.product_type)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("Missing required field: {}", field),
                expected: Some(format!("non-empty {}", field)),
                actual: Some("empty".to_string()),
                remediation: vec![format!("Supply a {}", field)],
            })
            .collect()
    }
}

pub struct SeverityCoverageRule;

impl PromptRule for SeverityCoverageRule {
    fn name(&self) -> &'static str { "severity_coverage" }

    fn validate(&self, input: &PromptInspection) -> Vec<ValidationViolation> {
        if count_severity_markers(input.text).absolute > 0 {
            return vec![];
        }
        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Warning,
            message: "No absolute-severity constraint present".to_string(),
            expected: Some(Severity::Absolute.marker()),
            actual: None,
            remediation: vec!["Ensure the human exclusion block survives assembly".to_string()],
        }]
    }
}

/// Validator orchestrates rules
pub struct PromptValidator {
    rules: Vec<Box<dyn PromptRule>>,
}

impl PromptValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(LengthBudgetRule),
                Box::new(RequiredMarkerRule { rule: "quality_marker", marker: QUALITY_MARKER }),
                Box::new(RequiredMarkerRule { rule: "constraints_marker", marker: CONSTRAINTS_MARKER }),
                Box::new(RequiredFieldsRule),
                Box::new(SeverityCoverageRule),
            ],
        }
    }

    pub fn validate(&self, input: &PromptInspection) -> ValidationReport {
        let violations: Vec<ValidationViolation> =
            self.rules.iter().flat_map(|rule| rule.validate(input)).collect();

        let issues: Vec<String> = violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| v.message.clone())
            .collect();

        ValidationReport { is_valid: issues.is_empty(), issues, violations }
    }
}

impl Default for PromptValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Occurrences of each severity tag in the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerCounts {
    pub absolute: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
}

pub fn count_severity_markers(text: &str) -> MarkerCounts {
    let count = |severity: Severity| text.matches(severity.marker().as_str()).count();
    MarkerCounts {
        absolute: count(Severity::Absolute),
        critical: count(Severity::Critical),
        high: count(Severity::High),
        medium: count(Severity::Medium),
    }
}

/// Critical production concerns the text visibly addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalConcerns {
    pub product_integrity: bool,
    pub context_adherence: bool,
    pub format_compliance: bool,
    pub quality_assurance: bool,
    pub process_alignment: bool,
}

impl CriticalConcerns {
    pub fn inspect(text: &str) -> Self {
        let markers = count_severity_markers(text);

        let mut last = 0;
        let mut in_order = true;
        for header in MANDATORY_SECTIONS {
            match text.find(&framed(header)) {
                Some(pos) if pos >= last => last = pos,
                _ => {
                    in_order = false;
                    break;
                }
            }
        }

        Self {
            product_integrity: text.contains(SPECIFICATION_ADHERENCE_TITLE) && markers.absolute > 0,
            context_adherence: text.contains(CONTEXT_RULES_TITLE),
            format_compliance: text.contains(ASPECT_RATIO_LABEL),
            quality_assurance: text.contains(&framed(QUALITY_MARKER)),
            process_alignment: in_order,
        }
    }

    pub fn addressed(&self) -> usize {
        [
            self.product_integrity,
            self.context_adherence,
            self.format_compliance,
            self.quality_assurance,
            self.process_alignment,
        ]
        .iter()
        .filter(|flag| **flag)
        .count()
    }
}

/// `100 - issues*penalty - warnings*penalty + concerns*bonus`, clamped to 0..=100.
pub fn score_prompt(
    issues: usize,
    warnings: usize,
    concerns: &CriticalConcerns,
    scoring: &ScoringConfig,
) -> u8 {
    let raw = 100_i64 - issues as i64 * scoring.issue_penalty as i64
        - warnings as i64 * scoring.warning_penalty as i64
        + concerns.addressed() as i64 * scoring.compliance_bonus as i64;
    raw.clamp(0, 100) as u8
}

pub fn is_blocking_warning(warning: &str) -> bool {
    BLOCKING_WARNING_RE.is_match(warning)
}

/// Gate: score threshold, no issues, an absolute marker, no blocking warning.
pub fn is_production_ready(
    score: u8,
    report: &ValidationReport,
    markers: &MarkerCounts,
    warnings: &[String],
    scoring: &ScoringConfig,
) -> bool {
    score >= scoring.production_threshold
        && report.issues.is_empty()
        && markers.absolute >= 1
        && !warnings.iter().any(|w| is_blocking_warning(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspect(text: &str) -> PromptInspection<'_> {
        PromptInspection { text, max_length: 10_000, product_name: "Chair", product_type: "chair" }
    }

    fn complete_text() -> String {
        let mut text = String::new();
        for header in MANDATORY_SECTIONS {
            text.push_str(&format!("=== {} ===\nbody\n", header));
        }
        text.push_str("Aspect ratio: 1:1\n[ABSOLUTE] HUMAN ELEMENT EXCLUSION\n");
        text.push_str("[CRITICAL] SPECIFICATION ADHERENCE\n[MEDIUM] CONTEXT RULES: LIFESTYLE SCENE\n");
        text
    }

    #[test]
    fn test_complete_text_is_valid() {
        let text = complete_text();
        let report = PromptValidator::new().validate(&inspect(&text));
        assert!(report.is_valid);
        assert!(report.violations.is_empty());

        let concerns = CriticalConcerns::inspect(&text);
        assert_eq!(concerns.addressed(), 5);
    }

    #[test]
    fn test_empty_text_collects_issues() {
        let input = PromptInspection { text: "", max_length: 100, product_name: "", product_type: " " };
        let report = PromptValidator::new().validate(&input);
        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 5);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_over_budget_is_an_issue() {
        let text = complete_text();
        let input = PromptInspection { max_length: 10, ..inspect(&text) };
        let report = PromptValidator::new().validate(&input);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("exceeds maximum 10"));
    }

    #[test]
    fn test_out_of_order_sections_fail_alignment() {
        let text = format!("=== {} ===\n{}", QUALITY_MARKER, complete_text().replacen(&framed(QUALITY_MARKER), "", 1));
        let concerns = CriticalConcerns::inspect(&text);
        assert!(!concerns.process_alignment);
        assert!(concerns.quality_assurance);
    }

    #[test]
    fn test_marker_counts() {
        let counts = count_severity_markers("[ABSOLUTE] a\n[CRITICAL] b\n[CRITICAL] c\nABSOLUTE > CRITICAL");
        assert_eq!(counts, MarkerCounts { absolute: 1, critical: 2, high: 0, medium: 0 });
    }

    #[test]
    fn test_score_clamps() {
        let scoring = ScoringConfig::default();
        let all = CriticalConcerns::inspect(&complete_text());
        assert_eq!(score_prompt(0, 0, &all, &scoring), 100);
        assert_eq!(score_prompt(0, 1, &all, &scoring), 100);
        assert_eq!(score_prompt(1, 1, &CriticalConcerns::default(), &scoring), 80);
        assert_eq!(score_prompt(50, 50, &CriticalConcerns::default(), &scoring), 0);
    }

    #[test]
    fn test_production_gate() {
        let scoring = ScoringConfig::default();
        let text = complete_text();
        let report = PromptValidator::new().validate(&inspect(&text));
        let markers = count_severity_markers(&text);

        assert!(is_production_ready(100, &report, &markers, &[], &scoring));
        assert!(!is_production_ready(84, &report, &markers, &[], &scoring));
        assert!(!is_production_ready(100, &report, &MarkerCounts::default(), &[], &scoring));

        let warned = vec!["Low placement confidence (0.65): keeping floor-standing".to_string()];
        assert!(!is_production_ready(100, &report, &markers, &warned, &scoring));
        let critical = vec!["CRITICAL: something".to_string()];
        assert!(!is_production_ready(100, &report, &markers, &critical, &scoring));
        let benign = vec!["No dimensions supplied".to_string()];
        assert!(is_production_ready(100, &report, &markers, &benign, &scoring));
    }
}
