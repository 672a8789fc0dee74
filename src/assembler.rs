//! Prompt Assembler - Fixed-Order Composition Under a Length Budget
//!
//! Section order is a contract: validation looks for the quality and
//! constraints markers, which only exist once the full sequence ran.

use serde::{Deserialize, Serialize};

use crate::classifier::ProductIntelligence;
use crate::constraints::{render_blocks, ConstraintBlock};
use crate::placement::{PlacementAnalysis, PlacementDecision};
use crate::product::{ConfigurationSettings, ProductSpecification, QualityTier};
use crate::standards::ContextStandards;

pub const SPECIFICATION_HEADER: &str = "PRODUCT SPECIFICATION";
pub const PLACEMENT_HEADER: &str = "PLACEMENT REQUIREMENTS";
pub const MATERIAL_HEADER: &str = "MATERIAL RENDERING";
pub const PHOTOGRAPHY_HEADER: &str = "PHOTOGRAPHY STANDARD";
pub const LIGHTING_HEADER: &str = "LIGHTING SPECIFICATION";
pub const SETTINGS_HEADER: &str = "SETTINGS INTEGRATION";
pub const REFERENCE_HEADER: &str = "REFERENCE IMAGERY";
pub const QUALITY_MARKER: &str = "QUALITY ASSURANCE CHECKLIST";
pub const CONSTRAINTS_MARKER: &str = "MANDATORY CONSTRAINTS";
pub const TRUNCATION_MARKER: &str = "[TRUNCATED";
pub const ASPECT_RATIO_LABEL: &str = "Aspect ratio:";

/// Headers every complete prompt carries, in emission order.
pub const MANDATORY_SECTIONS: &[&str] = &[
    SPECIFICATION_HEADER,
    PLACEMENT_HEADER,
    MATERIAL_HEADER,
    PHOTOGRAPHY_HEADER,
    LIGHTING_HEADER,
    SETTINGS_HEADER,
    QUALITY_MARKER,
    CONSTRAINTS_MARKER,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Specification,
    Placement,
    Material,
    Photography,
    Lighting,
    Settings,
    Reference,
    QualityAssurance,
    Constraints,
}

/// Everything the assembler reads for one call.
pub struct AssemblyInput<'a> {
    pub spec: &'a ProductSpecification,
    pub settings: &'a ConfigurationSettings,
    pub intelligence: &'a ProductIntelligence,
    pub placement: &'a PlacementAnalysis,
    pub standards: &'a ContextStandards,
    pub constraints: &'a [ConstraintBlock],
    pub reference_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledPrompt {
    pub text: String,
    /// Length in characters, not bytes.
    pub length: usize,
    pub truncated: bool,
    pub sections: Vec<SectionKind>,
    pub optimizations: Vec<String>,
}

fn section(heading: &str, lines: &[String]) -> String {
    let mut out = format!("=== {} ===\n", heading);
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn specification_section(input: &AssemblyInput) -> String {
    let spec = input.spec;
    let intel = input.intelligence;
    let mut lines = vec![
        format!(
            "Professional product photograph of \"{}\", a {}.",
            spec.name.trim(),
            spec.product_type.trim()
        ),
        format!("Category: {}", intel.category),
    ];
    if !spec.materials.trim().is_empty() {
        lines.push(format!("Materials: {}", spec.materials.trim()));
    }
    lines.push(intel.scale.dimensional_context.clone());
    if !spec.notes.trim().is_empty() {
        lines.push(format!("Notes: {}", spec.notes.trim()));
    }
    section(SPECIFICATION_HEADER, &lines)
}

fn placement_section(input: &AssemblyInput) -> String {
    let analysis = input.placement;
    let mut lines = vec![format!(
        "Placement: {} (confidence {:.2})",
        analysis.resolved, analysis.confidence
    )];
    if analysis.decision == PlacementDecision::Override && analysis.detected != analysis.classifier_placement {
        lines.push(format!(
            "Placement determined from product signals; do not render as {}",
            analysis.classifier_placement
        ));
    }
    let scale = &input.intelligence.scale;
    lines.push(format!(
        "Proportional anchors: {}",
        scale.proportional_elements.join("; ")
    ));
    lines.push(format!("Viewing distance: {}", scale.viewing_distance));
    section(PLACEMENT_HEADER, &lines)
}

fn material_section(input: &AssemblyInput) -> String {
    let material = &input.intelligence.material;
    let mut lines = vec![format!("Primary material: {}", material.primary)];
    if !material.secondary.is_empty() {
        let secondary: Vec<String> = material.secondary.iter().map(|m| m.to_string()).collect();
        lines.push(format!("Secondary materials: {}", secondary.join(", ")));
    }
    lines.push(format!(
        "Texture complexity: {}; surface finish: {}",
        material.texture_complexity, material.reflectance
    ));
    lines.push("Render grain, weave and finish at true scale with physically accurate response to light.".into());
    section(MATERIAL_HEADER, &lines)
}

fn photography_section(input: &AssemblyInput) -> String {
    let s = input.standards;
    let mut lines = vec![
        format!("Standard: {}", s.name),
        format!("Composition: {}", s.composition),
        format!("Product placement: {}", s.product_placement),
        format!("Negative space: {}", s.negative_space),
        format!("Visual hierarchy: {}", s.visual_hierarchy),
        format!("{} {}", ASPECT_RATIO_LABEL, s.technical.aspect_ratio),
        format!(
            "Focus: {}; depth of field: {}; camera: {}",
            s.technical.focus, s.technical.depth_of_field, s.technical.camera_angle
        ),
        format!(
            "Image quality: {} sharpness, noise {}, color {}, dynamic range {}",
            s.quality.sharpness, s.quality.noise, s.quality.color_accuracy, s.quality.dynamic_range
        ),
    ];
    for note in s.optimization_notes {
        lines.push(format!("Output note: {}", note));
    }
    section(PHOTOGRAPHY_HEADER, &lines)
}

fn lighting_section(input: &AssemblyInput) -> String {
    let lighting = &input.intelligence.lighting;
    let mut lines = vec![
        format!("Required intensity: {}", input.intelligence.material.lighting_intensity),
        format!("Key light: {}", lighting.angle),
        format!("Fill ratio: {}", lighting.fill_ratio),
        format!("Shadows: {}", lighting.shadow_style),
        format!("Color temperature: {}K", lighting.color_temperature_k),
    ];
    for requirement in &lighting.special_requirements {
        lines.push(format!("Special: {}", requirement));
    }
    section(LIGHTING_HEADER, &lines)
}

fn settings_section(input: &AssemblyInput) -> String {
    let settings = input.settings;
    let mut lines = vec![
        format!("Background: {}", settings.resolve_background().style.describe()),
        format!("Product position: {}", settings.product_position.describe()),
        format!("Lighting preference: {}", settings.lighting_preference.describe()),
        format!("Quality tier: {}", settings.quality),
        format!("Variations: {}", settings.variation_count),
    ];
    if let Some(zone) = settings.reserved_text_zone {
        lines.push(format!("Reserved text zone: {}", zone));
    }
    section(SETTINGS_HEADER, &lines)
}

fn reference_section(count: usize) -> String {
    let lines = vec![
        format!(
            "{} reference image{} supplied.",
            count,
            if count == 1 { "" } else { "s" }
        ),
        "Reproduce the exact product shown: silhouette, proportions, materials, colors and hardware.".into(),
        "Do NOT copy reference backgrounds, lighting or surrounding objects.".into(),
        "Where the reference and the written specification disagree, the written specification wins.".into(),
    ];
    section(REFERENCE_HEADER, &lines)
}

fn quality_section(input: &AssemblyInput) -> String {
    let s = input.standards;
    let settings = input.settings;
    let mut lines = vec![
        "[ ] Product identical to the specification in type, materials and proportions".to_string(),
        format!("[ ] Placement physically correct for {}", input.placement.resolved),
        format!(
            "[ ] Lighting at {}K with {} shadows",
            input.intelligence.lighting.color_temperature_k, input.intelligence.lighting.shadow_style
        ),
        format!("[ ] Composition follows the {} standard at {}", s.name, s.technical.aspect_ratio),
        "[ ] No people, no unapproved objects, no rendering artifacts".to_string(),
    ];
    match settings.quality {
        QualityTier::High => {
            lines.push(format!("[ ] Large-format ready: {} sharpness", s.quality.sharpness));
            lines.push(format!("[ ] Color accuracy: {}", s.quality.color_accuracy));
        }
        QualityTier::Medium => lines.push("[ ] Web-ready detail and clean edges".to_string()),
        QualityTier::Low => {
            lines.push("[ ] Draft quality acceptable; geometry and materials still exact".to_string())
        }
    }
    if settings.variation_count > 1 {
        lines.push(format!(
            "[ ] Across {} variations the product stays identical; vary only angle and framing",
            settings.variation_count
        ));
    }
    section(QUALITY_MARKER, &lines)
}

fn constraints_section(blocks: &[ConstraintBlock]) -> String {
    format!(
        "=== {} ===\nEvery constraint below is binding. Severity order: ABSOLUTE > CRITICAL > HIGH > MEDIUM.\n\n{}",
        CONSTRAINTS_MARKER,
        render_blocks(blocks)
    )
}

/// Cut the tail so the result, notice included, fits in `max_length` characters.
pub fn apply_length_budget(text: String, max_length: usize) -> (String, bool) {
    if text.chars().count() <= max_length {
        return (text, false);
    }

    let notice = format!(
        "\n{} to {} characters; trailing content omitted]",
        TRUNCATION_MARKER, max_length
    );
    let notice_len = notice.chars().count();
    if notice_len >= max_length {
        return (notice.trim_start().chars().take(max_length).collect(), true);
    }

    let mut kept: String = text.chars().take(max_length - notice_len).collect();
    if let Some(pos) = kept.rfind('\n') {
        kept.truncate(pos);
    }
    kept.push_str(&notice);
    (kept, true)
}

/// Compose the prompt in fixed section order, then enforce the budget.
pub fn assemble_prompt(input: &AssemblyInput, max_length: usize) -> AssembledPrompt {
    let mut parts: Vec<(SectionKind, String)> = vec![
        (SectionKind::Specification, specification_section(input)),
        (SectionKind::Placement, placement_section(input)),
        (SectionKind::Material, material_section(input)),
        (SectionKind::Photography, photography_section(input)),
        (SectionKind::Lighting, lighting_section(input)),
        (SectionKind::Settings, settings_section(input)),
    ];
    if input.reference_count > 0 {
        parts.push((SectionKind::Reference, reference_section(input.reference_count)));
    }
    parts.push((SectionKind::QualityAssurance, quality_section(input)));
    parts.push((SectionKind::Constraints, constraints_section(input.constraints)));

    let sections: Vec<SectionKind> = parts.iter().map(|(kind, _)| *kind).collect();
    let full = parts.into_iter().map(|(_, body)| body).collect::<Vec<_>>().join("\n");
    let (text, truncated) = apply_length_budget(full, max_length);

    let mut optimizations = vec![format!("context-standards:{}", input.standards.preset)];
    if input.placement.decision == PlacementDecision::Override {
        if input.placement.detected != input.placement.classifier_placement {
            optimizations.push(format!("placement-override:{}", input.placement.resolved));
        } else {
            optimizations.push(format!("placement-confirmed:{}", input.placement.resolved));
        }
    }
    optimizations.push(format!(
        "material-lighting:{}",
        input.intelligence.material.lighting_intensity
    ));
    if input.reference_count > 0 {
        optimizations.push(format!("reference-guidance:{}", input.reference_count));
    }
    if input.settings.strict_mode {
        optimizations.push("strict-mode".to_string());
    }
    let props = input.settings.normalized_props();
    if !props.is_empty() {
        optimizations.push(format!("approved-props:{}", props.len()));
    }
    optimizations.push(format!("quality-tier:{}", input.settings.quality));
    if truncated {
        optimizations.push("length-budget:truncated".to_string());
    }

    AssembledPrompt {
        length: text.chars().count(),
        text,
        truncated,
        sections,
        optimizations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_product;
    use crate::config::PlacementThresholds;
    use crate::constraints::build_constraints;
    use crate::placement::analyze_placement;
    use crate::standards::standards_for;

    fn assemble(spec: &ProductSpecification, settings: &ConfigurationSettings, refs: usize, max: usize) -> AssembledPrompt {
        let intel = classify_product(spec);
        let placement = analyze_placement(spec, intel.category, intel.placement, &PlacementThresholds::default());
        let blocks = build_constraints(spec, &intel, placement.resolved, settings);
        let input = AssemblyInput {
            spec,
            settings,
            intelligence: &intel,
            placement: &placement,
            standards: standards_for(settings.context),
            constraints: &blocks,
            reference_count: refs,
        };
        assemble_prompt(&input, max)
    }

    fn shelf() -> ProductSpecification {
        ProductSpecification::new("Oslo Shelf", "wall mounted shelf", "solid walnut")
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let prompt = assemble(&shelf(), &ConfigurationSettings::default(), 0, 10_000);
        assert!(!prompt.truncated);

        let positions: Vec<usize> = MANDATORY_SECTIONS
            .iter()
            .map(|h| prompt.text.find(h).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(!prompt.sections.contains(&SectionKind::Reference));
        assert_eq!(prompt.sections.last(), Some(&SectionKind::Constraints));
    }

    #[test]
    fn test_reference_section_sits_before_checklist() {
        let prompt = assemble(&shelf(), &ConfigurationSettings::default(), 2, 10_000);
        let reference = prompt.text.find(REFERENCE_HEADER).unwrap();
        let settings = prompt.text.find(SETTINGS_HEADER).unwrap();
        let quality = prompt.text.find(QUALITY_MARKER).unwrap();
        assert!(settings < reference && reference < quality);
        assert!(prompt.text.contains("2 reference images supplied."));
        assert!(prompt.optimizations.contains(&"reference-guidance:2".to_string()));
    }

    #[test]
    fn test_budget_truncates_with_notice() {
        let prompt = assemble(&shelf(), &ConfigurationSettings::default(), 0, 1200);
        assert!(prompt.truncated);
        assert!(prompt.length <= 1200);
        assert!(prompt.text.contains(TRUNCATION_MARKER));
        assert!(!prompt.text.contains(CONSTRAINTS_MARKER));
        assert!(prompt.optimizations.contains(&"length-budget:truncated".to_string()));
    }

    #[test]
    fn test_length_budget_counts_characters() {
        let text = "é".repeat(900);
        let (out, truncated) = apply_length_budget(text, 600);
        assert!(truncated);
        assert!(out.chars().count() <= 600);
        assert!(out.ends_with("trailing content omitted]"));

        let (tiny, _) = apply_length_budget("x".repeat(100), 10);
        assert_eq!(tiny.chars().count(), 10);
    }

    #[test]
    fn test_default_budget_fits_a_full_prompt() {
        let mut spec = ProductSpecification::new(
            "Meridian Executive",
            "executive office chair",
            "black leather, chrome base, walnut armrests, glass accents",
        );
        spec.notes = "Five-star base with casters; tilt mechanism visible from the side".into();
        let settings = ConfigurationSettings {
            strict_mode: true,
            variation_count: 4,
            approved_props: vec!["plant".into(), "books".into()],
            ..Default::default()
        };
        let prompt = assemble(&spec, &settings, 3, 10_000);
        assert!(!prompt.truncated, "length was {}", prompt.length);
        assert!(prompt.text.contains(CONSTRAINTS_MARKER));
    }
}
