//! Synthesis Pipeline - Single Entry Point
//!
//! Data flows one way: input checks, classification, placement,
//! standards, constraints, assembly, validation and scoring.
//! Only malformed input is an error; everything later is reported as data.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::assembler::{assemble_prompt, AssemblyInput, SectionKind};
use crate::classifier::{classify_product, ProductCategory, ProductIntelligence};
use crate::config::{ConfigError, EngineConfig};
use crate::constraints::{build_constraints, ConstraintBlock, ConstraintStats};
use crate::hashing::{prompt_digest, request_fingerprint, synthesis_id};
use crate::placement::{analyze_placement, PlacementAnalysis};
use crate::product::{ContextPreset, ProductSpecification, SynthesisRequest};
use crate::standards::standards_for;
use crate::validation::{
    count_severity_markers, is_production_ready, score_prompt, CriticalConcerns, MarkerCounts,
    PromptInspection, PromptValidator, ValidationReport,
};
use crate::ENGINE_VERSION;

pub const MAX_VARIATIONS: u8 = 8;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SynthesisError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field: field.to_string(), reason: reason.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAssemblyResult {
    pub synthesis_id: String,
    pub request_fingerprint: String,
    pub engine_version: String,
    pub prompt: String,
    pub length: usize,
    pub prompt_digest: String,
    pub truncated: bool,
    pub sections: Vec<SectionKind>,
    pub applied_optimizations: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub quality_score: u8,
    pub production_ready: bool,
    pub validation: ValidationReport,
    pub concerns: CriticalConcerns,
    pub marker_counts: MarkerCounts,
    pub constraint_stats: ConstraintStats,
    pub constraints: Vec<ConstraintBlock>,
    pub intelligence: ProductIntelligence,
    pub placement: PlacementAnalysis,
    pub context: ContextPreset,
    pub aspect_ratio: String,
    pub reference_image_count: usize,
}

/// The synthesis engine. Holds configuration only; no per-call state.
pub struct PromptEngine {
    config: EngineConfig,
    validator: PromptValidator,
}

impl PromptEngine {
    /// Build an engine; the config is validated the same way `EngineConfig::load` does.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, validator: PromptValidator::new() })
    }

    /// Classification only, after the same input checks as synthesis.
    pub fn classify(&self, spec: &ProductSpecification) -> Result<ProductIntelligence, SynthesisError> {
        check_specification(spec)?;
        Ok(classify_product(spec))
    }

    /// Run the rule set over arbitrary prompt text.
    pub fn validate_prompt(&self, text: &str, spec: &ProductSpecification) -> ValidationReport {
        self.validator.validate(&PromptInspection {
            text,
            max_length: self.config.max_prompt_length,
            product_name: &spec.name,
            product_type: &spec.product_type,
        })
    }

    pub fn synthesize(&self, request: &SynthesisRequest) -> Result<PromptAssemblyResult, SynthesisError> {
        if let Err(e) = check_request(request) {
            warn!(error = %e, "Rejected synthesis request");
            return Err(e);
        }

        let fingerprint = request_fingerprint(request)?;
        let spec = &request.product;
        let settings = &request.settings;

        let intelligence = classify_product(spec);
        debug!(
            category = %intelligence.category,
            placement = %intelligence.placement,
            material = %intelligence.material.primary,
            "Classified product"
        );

        let placement = analyze_placement(
            spec,
            intelligence.category,
            intelligence.placement,
            &self.config.placement,
        );
        let standards = standards_for(settings.context);

        let constraints = build_constraints(spec, &intelligence, placement.resolved, settings);
        let constraint_stats = ConstraintStats::from_blocks(&constraints);
        debug!(blocks = constraint_stats.blocks, statements = constraint_stats.statements, "Built constraints");

        let assembled = assemble_prompt(
            &AssemblyInput {
                spec,
                settings,
                intelligence: &intelligence,
                placement: &placement,
                standards,
                constraints: &constraints,
                reference_count: request.reference_images.len(),
            },
            self.config.max_prompt_length,
        );
        if assembled.truncated {
            warn!(max = self.config.max_prompt_length, "Prompt truncated to length budget");
        }

        let mut warnings = placement.warnings.clone();
        let mut recommendations = placement.recommendations.clone();
        if intelligence.category == ProductCategory::Unknown {
            warnings.push(format!(
                "Unknown product category for type \"{}\"; generic guidance applied",
                spec.product_type.trim()
            ));
            recommendations.push(
                "Use a recognizable product type such as chair, table, shelf, desk or lamp".to_string(),
            );
        }
        if !intelligence.material.recognized() {
            warnings.push("No recognized material; default composite rendering applied".to_string());
        }
        if let Some(requested) = settings.resolve_background().overridden {
            let applied = settings.context.default_background();
            warnings.push(format!(
                "Background {} conflicts with the {} context; rendering {} instead",
                requested, settings.context, applied
            ));
            recommendations.push(format!(
                "Choose a background the {} context permits, or switch context",
                settings.context
            ));
        }
        if spec.known_dimensions().is_none() {
            recommendations.push(
                "Supply product dimensions to anchor scale and proportions".to_string(),
            );
        }
        if assembled.truncated {
            warnings.push(format!(
                "Prompt truncated to {} characters; trailing sections omitted",
                self.config.max_prompt_length
            ));
        }

        let validation = self.validate_prompt(&assembled.text, spec);
        warnings.extend(validation.warnings().map(|v| v.message.clone()));

        let concerns = CriticalConcerns::inspect(&assembled.text);
        let marker_counts = count_severity_markers(&assembled.text);
        let quality_score = score_prompt(
            validation.issues.len(),
            warnings.len(),
            &concerns,
            &self.config.scoring,
        );
        let production_ready = is_production_ready(
            quality_score,
            &validation,
            &marker_counts,
            &warnings,
            &self.config.scoring,
        );

        info!(
            fingerprint = %fingerprint,
            length = assembled.length,
            score = quality_score,
            production_ready,
            "Synthesized prompt"
        );

        Ok(PromptAssemblyResult {
            synthesis_id: synthesis_id(&fingerprint).to_string(),
            request_fingerprint: fingerprint,
            engine_version: ENGINE_VERSION.to_string(),
            prompt_digest: prompt_digest(&assembled.text),
            length: assembled.length,
            truncated: assembled.truncated,
            sections: assembled.sections,
            applied_optimizations: assembled.optimizations,
            prompt: assembled.text,
            warnings,
            recommendations,
            quality_score,
            production_ready,
            validation,
            concerns,
            marker_counts,
            constraint_stats,
            constraints,
            intelligence,
            placement,
            context: settings.context,
            aspect_ratio: standards.technical.aspect_ratio.to_string(),
            reference_image_count: request.reference_images.len(),
        })
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self { config: EngineConfig::default(), validator: PromptValidator::new() }
    }
}

fn check_specification(spec: &ProductSpecification) -> Result<(), SynthesisError> {
    if spec.name.trim().is_empty() {
        return Err(SynthesisError::invalid("name", "product name is required"));
    }
    if spec.product_type.trim().is_empty() {
        return Err(SynthesisError::invalid("type", "product type is required"));
    }
    if let Some(dims) = &spec.dimensions {
        for (field, value) in [("width", dims.width), ("height", dims.height), ("depth", dims.depth)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(SynthesisError::invalid(
                        &format!("dimensions.{}", field),
                        format!("must be a positive number, got {}", v),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn check_request(request: &SynthesisRequest) -> Result<(), SynthesisError> {
    check_specification(&request.product)?;
    let count = request.settings.variation_count;
    if !(1..=MAX_VARIATIONS).contains(&count) {
        return Err(SynthesisError::invalid(
            "variationCount",
            format!("must be between 1 and {}, got {}", MAX_VARIATIONS, count),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ConfigurationSettings, Dimensions};
    use serde_json::json;

    fn request(value: serde_json::Value) -> SynthesisRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_synthesize_chair_is_production_ready() {
        let engine = PromptEngine::default();
        let result = engine.synthesize(&request(json!({
            "product": {"name": "Meridian", "type": "executive office chair", "materials": "black leather, chrome base"},
            "settings": {"context": "catalog"}
        }))).unwrap();

        assert_eq!(result.intelligence.category, ProductCategory::Seating);
        assert!(result.validation.is_valid);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.quality_score, 100);
        assert!(result.production_ready);
        assert_eq!(result.aspect_ratio, "1:1");
        assert!(result.recommendations.iter().any(|r| r.contains("dimensions")));
    }

    #[test]
    fn test_unknown_product_is_scored_but_not_ready() {
        let engine = PromptEngine::default();
        let result = engine.synthesize(&request(json!({
            "product": {"name": "Thing", "type": "gizmo"}
        }))).unwrap();

        assert_eq!(result.intelligence.category, ProductCategory::Unknown);
        assert!(result.warnings.iter().any(|w| w.starts_with("Unknown product category")));
        assert!(result.warnings.iter().any(|w| w.starts_with("No recognized material")));
        assert!(result.warnings.iter().any(|w| w.starts_with("Low placement confidence")));
        assert!(result.quality_score <= 100);
        assert!(!result.production_ready);
    }

    #[test]
    fn test_rejects_missing_fields() {
        let engine = PromptEngine::default();
        let err = engine.synthesize(&request(json!({"product": {"name": "  ", "type": "chair"}}))).unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidInput { ref field, .. } if field == "name"));

        let err = engine.synthesize(&request(json!({"product": {"name": "A", "type": ""}}))).unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidInput { ref field, .. } if field == "type"));
    }

    #[test]
    fn test_rejects_bad_variation_count_and_dimensions() {
        let engine = PromptEngine::default();
        let mut req = SynthesisRequest {
            product: ProductSpecification::new("A", "chair", "oak"),
            settings: ConfigurationSettings { variation_count: 0, ..Default::default() },
            reference_images: vec![],
        };
        assert!(engine.synthesize(&req).is_err());

        req.settings.variation_count = 2;
        req.product.dimensions = Some(Dimensions { width: Some(-1.0), ..Default::default() });
        let err = engine.synthesize(&req).unwrap_err();
        assert!(err.to_string().contains("dimensions.width"));
    }

    #[test]
    fn test_truncated_prompt_is_invalid() {
        let config = EngineConfig { max_prompt_length: 1500, ..Default::default() };
        let engine = PromptEngine::new(config).unwrap();
        let result = engine.synthesize(&request(json!({
            "product": {"name": "Oslo", "type": "wall mounted shelf", "materials": "walnut"}
        }))).unwrap();

        assert!(result.truncated);
        assert!(result.length <= 1500);
        assert!(!result.validation.is_valid);
        assert!(!result.production_ready);
        assert!(result.warnings.iter().any(|w| w.starts_with("Prompt truncated")));
    }

    #[test]
    fn test_catalog_overrides_contextual_background() {
        let engine = PromptEngine::default();
        let result = engine.synthesize(&request(json!({
            "product": {"name": "Meridian", "type": "office chair", "materials": "leather"},
            "settings": {"context": "catalog", "backgroundStyle": "contextual"}
        }))).unwrap();

        assert!(result.prompt.contains("Background: seamless pure white (#FFFFFF) background"));
        assert!(!result.prompt.contains("restrained interior setting"));
        assert!(result.prompt.contains("pure-white background"));
        assert!(result.warnings.iter().any(|w| w.starts_with("Background contextual conflicts with the catalog context")));
        assert!(result.recommendations.iter().any(|r| r.contains("background the catalog context permits")));
        assert!(result.production_ready);
    }

    #[test]
    fn test_lifestyle_defaults_to_contextual_background() {
        let engine = PromptEngine::default();
        let result = engine.synthesize(&request(json!({
            "product": {"name": "Oslo", "type": "wall mounted shelf", "materials": "solid walnut"},
            "settings": {"context": "lifestyle"}
        }))).unwrap();

        assert!(result.prompt.contains("Background: restrained interior setting"));
        assert!(!result.prompt.contains("#FFFFFF"));
        assert!(!result.warnings.iter().any(|w| w.starts_with("Background")));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let tiny = EngineConfig { max_prompt_length: 5, ..Default::default() };
        assert!(matches!(PromptEngine::new(tiny), Err(ConfigError::Invalid(_))));
        assert!(PromptEngine::new(EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_identical_requests_share_identity() {
        let engine = PromptEngine::default();
        let req = request(json!({"product": {"name": "Oslo", "type": "shelf", "materials": "oak"}}));
        let a = engine.synthesize(&req).unwrap();
        let b = engine.synthesize(&req).unwrap();
        assert_eq!(a.synthesis_id, b.synthesis_id);
        assert_eq!(a.prompt_digest, b.prompt_digest);
        assert_eq!(a, b);
    }
}
