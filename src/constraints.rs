//! Constraint Builder - Severity-Tagged Prohibition Blocks
//!
//! Pure template text. Block order is fixed:
//! human exclusion, irrelevant objects, artifacts, placement,
//! specification adherence, context rules.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::classifier::{PlacementType, ProductIntelligence, Reflectance};
use crate::product::{ConfigurationSettings, ContextPreset, ProductSpecification, TextZone};
use crate::standards::standards_for;

pub const HUMAN_EXCLUSION_TITLE: &str = "HUMAN ELEMENT EXCLUSION";
pub const IRRELEVANT_OBJECTS_TITLE: &str = "IRRELEVANT OBJECT EXCLUSION";
pub const ARTIFACT_PREVENTION_TITLE: &str = "ARTIFACT PREVENTION";
pub const PLACEMENT_ENFORCEMENT_TITLE: &str = "PLACEMENT ENFORCEMENT";
pub const SPECIFICATION_ADHERENCE_TITLE: &str = "SPECIFICATION ADHERENCE";
pub const CONTEXT_RULES_TITLE: &str = "CONTEXT RULES";

const DEFAULT_HERO_TEXT_ZONE: TextZone = TextZone::Left;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Absolute,
    Critical,
    High,
    Medium,
}

impl Severity {
    /// Literal tag written into the prompt, e.g. `[ABSOLUTE]`.
    pub fn marker(&self) -> String {
        format!("[{}]", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintCategory {
    HumanExclusion,
    IrrelevantObjects,
    ArtifactPrevention,
    PlacementEnforcement,
    SpecificationAdherence,
    ContextRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintBlock {
    pub category: ConstraintCategory,
    pub severity: Severity,
    pub title: String,
    pub statements: Vec<String>,
}

impl ConstraintBlock {
    fn new(category: ConstraintCategory, severity: Severity, title: impl Into<String>) -> Self {
        Self { category, severity, title: title.into(), statements: vec![] }
    }

    fn push(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    pub fn render(&self) -> String {
        let mut out = format!("{} {}\n", self.severity.marker(), self.title);
        for statement in &self.statements {
            out.push_str("- ");
            out.push_str(statement);
            out.push('\n');
        }
        out
    }
}

/// Structured per-severity counts over generated blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintStats {
    pub absolute: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub blocks: usize,
    pub statements: usize,
}

impl ConstraintStats {
    pub fn from_blocks(blocks: &[ConstraintBlock]) -> Self {
        let mut stats = Self { blocks: blocks.len(), ..Self::default() };
        for block in blocks {
            match block.severity {
                Severity::Absolute => stats.absolute += 1,
                Severity::Critical => stats.critical += 1,
                Severity::High => stats.high += 1,
                Severity::Medium => stats.medium += 1,
            }
            stats.statements += block.statements.len();
        }
        stats
    }
}

/// Forbidden object vocabulary, grouped as written into the prompt.
const PROP_GROUPS: &[(&str, &[&str])] = &[
    ("dining items", &["plates", "cups", "glasses", "cutlery", "food", "drinks", "bottles"]),
    ("personal items", &["phones", "laptops", "bags", "keys", "books", "magazines", "eyewear"]),
    ("decorative objects", &["vases", "sculptures", "candles", "picture frames", "clocks", "bowls"]),
    ("textiles", &["throws", "cushions", "rugs", "curtains", "blankets"]),
    ("botanical elements", &["plants", "flowers", "greenery", "succulents", "trees"]),
    ("additional lighting fixtures", &["lamps", "pendant lights", "sconces", "string lights"]),
];

fn prop_matches(item: &str, prop: &str) -> bool {
    item == prop
        || item.strip_suffix('s') == Some(prop)
        || item.strip_suffix("es") == Some(prop)
        || prop.strip_suffix('s') == Some(item)
}

/// Build every constraint block for one synthesis call.
pub fn build_constraints(
    spec: &ProductSpecification,
    intel: &ProductIntelligence,
    placement: PlacementType,
    settings: &ConfigurationSettings,
) -> Vec<ConstraintBlock> {
    vec![
        human_exclusion(intel),
        irrelevant_objects(settings),
        artifact_prevention(intel),
        placement_enforcement(placement),
        specification_adherence(spec, intel, settings),
        context_rules(placement, settings),
    ]
}

pub fn render_blocks(blocks: &[ConstraintBlock]) -> String {
    blocks.iter().map(ConstraintBlock::render).collect::<Vec<_>>().join("\n")
}

fn human_exclusion(intel: &ProductIntelligence) -> ConstraintBlock {
    let mut block = ConstraintBlock::new(
        ConstraintCategory::HumanExclusion,
        Severity::Absolute,
        HUMAN_EXCLUSION_TITLE,
    );
    block.push("NO people of any kind, fully or partially visible, in focus or blurred");
    block.push("NO body parts: hands, arms, legs, feet, faces, silhouettes or human shadows");
    block.push("NO clothing, shoes or worn accessories that imply a person");
    block.push(
        "NO staged-human implications: half-finished drinks, open books, rumpled cushions, used tableware",
    );
    if intel.scale.human_reference {
        let cue = intel
            .scale
            .proportional_elements
            .get(1)
            .or_else(|| intel.scale.proportional_elements.first())
            .map(String::as_str)
            .unwrap_or("standard ergonomic proportions");
        block.push(format!(
            "Convey human scale through ergonomic proportions ({}), never through a person",
            cue
        ));
    }
    block
}

fn irrelevant_objects(settings: &ConfigurationSettings) -> ConstraintBlock {
    let props = settings.normalized_props();
    let mut block = ConstraintBlock::new(
        ConstraintCategory::IrrelevantObjects,
        Severity::Critical,
        IRRELEVANT_OBJECTS_TITLE,
    );

    if props.is_empty() {
        block.push("Approved props: none. The product must appear entirely alone");
    } else {
        block.push(format!("Approved props (sole exceptions): {}", props.join(", ")));
        block.push("Approved props stay secondary to the product in scale, focus and contrast");
        block.push("Every object enumerated below is FORBIDDEN");
    }
    block.push("The product itself is exempt from every exclusion in this block");

    for (group, items) in PROP_GROUPS {
        let remaining: Vec<&str> = items
            .iter()
            .copied()
            .filter(|item| !props.iter().any(|p| prop_matches(item, p)))
            .collect();
        if !remaining.is_empty() {
            block.push(format!("NO {}: {}", group, remaining.join(", ")));
        }
    }
    block
}

fn artifact_prevention(intel: &ProductIntelligence) -> ConstraintBlock {
    let mut block = ConstraintBlock::new(
        ConstraintCategory::ArtifactPrevention,
        Severity::High,
        ARTIFACT_PREVENTION_TITLE,
    );
    block.push("NO non-photorealistic rendering: no CGI sheen, illustration, painting or cartoon styling");
    block.push("NO optical artifacts: lens flare, chromatic aberration, heavy vignetting, bent straight lines");
    block.push("NO processing artifacts: oversharpening halos, banding, compression blocks, smeared noise");
    block.push("NO material or surface inconsistencies: grain, texture and color continuous across each surface");
    block.push("NO duplicated, fused or missing parts and NO physically impossible geometry or composition");
    if matches!(intel.material.reflectance, Reflectance::Gloss | Reflectance::Mirror) {
        block.push("NO reflections of cameras, photographers or studio equipment in reflective surfaces");
    }
    block
}

fn placement_enforcement(placement: PlacementType) -> ConstraintBlock {
    let mut block = ConstraintBlock::new(
        ConstraintCategory::PlacementEnforcement,
        Severity::Critical,
        format!("{}: {}", PLACEMENT_ENFORCEMENT_TITLE, placement.to_string().to_uppercase()),
    );
    match placement {
        PlacementType::WallMounted => {
            block.push("ZERO floor contact: the product must not touch, rest on or lean against the floor");
            block.push("VISIBLE mounting hardware: brackets, cleats or fixings shown and physically plausible");
            block.push("Minimum clearance of 20 cm between the product's lowest edge and the floor");
            block.push("Back panel flush against a flat wall plane; no floating without support");
        }
        PlacementType::FloorStanding => {
            block.push("FULL support contact: every leg, runner or base point rests on the floor");
            block.push("Realistic wall clearance of 5-15 cm when placed near a wall");
            block.push("NO floating, tilting, sinking or hovering above the floor plane");
            block.push("Contact shadows present beneath every support point");
        }
        PlacementType::CeilingMounted => {
            block.push("VISIBLE suspension: cord, rod or chain connected to a ceiling canopy");
            block.push("ZERO floor contact and no supporting stand beneath the product");
            block.push("Hanging height leaves realistic head clearance beneath the product");
            block.push("Suspension hangs plumb under gravity; no impossible angles");
        }
        PlacementType::Tabletop => {
            block.push("Product rests on a visible supporting surface: table, desk, shelf or counter");
            block.push("FULL base contact with the surface; no overhang beyond physical stability");
            block.push("Supporting surface scaled correctly to the product");
        }
        PlacementType::BuiltIn => {
            block.push("Product integrated flush into surrounding architecture or cabinetry");
            block.push("NO gaps, seams or misalignment at junctions with walls, floor or ceiling");
            block.push("Surrounding construction consistent in finish and proportion");
        }
    }
    block
}

fn specification_adherence(
    spec: &ProductSpecification,
    intel: &ProductIntelligence,
    settings: &ConfigurationSettings,
) -> ConstraintBlock {
    let severity = if settings.strict_mode { Severity::Absolute } else { Severity::Critical };
    let mut block = ConstraintBlock::new(
        ConstraintCategory::SpecificationAdherence,
        severity,
        SPECIFICATION_ADHERENCE_TITLE,
    );

    block.push(format!("Product type MUST remain: {}", spec.product_type.trim()));
    if spec.materials.trim().is_empty() {
        block.push("Materials MUST match the reference product; no invented finishes");
    } else {
        block.push(format!("Materials MUST match exactly: {}", spec.materials.trim()));
    }
    block.push(format!(
        "Dimensions and proportions MUST follow: {}",
        intel.scale.dimensional_context
    ));
    block.push("Do NOT add, remove or restyle components such as legs, handles, hardware or cushions");
    block.push(format!(
        "Settings MUST be honored: {} background, product {}, {} lighting",
        settings.resolve_background().style,
        settings.product_position,
        settings.lighting_preference
    ));
    if !spec.notes.trim().is_empty() {
        block.push(format!("Additional requirements: {}", spec.notes.trim()));
    }
    if settings.strict_mode {
        block.push(
            "ZERO TOLERANCE: any deviation from the stated type, materials, dimensions or settings invalidates the image",
        );
    }
    block
}

fn context_rules(placement: PlacementType, settings: &ConfigurationSettings) -> ConstraintBlock {
    let context = settings.context;
    let severity = match context {
        ContextPreset::Catalog => Severity::Critical,
        ContextPreset::Hero | ContextPreset::Detail => Severity::High,
        ContextPreset::Lifestyle | ContextPreset::SocialSquare | ContextPreset::SocialStory => Severity::Medium,
    };
    let standards = standards_for(context);
    let mut block = ConstraintBlock::new(
        ConstraintCategory::ContextRules,
        severity,
        format!("{}: {}", CONTEXT_RULES_TITLE, standards.name.to_uppercase()),
    );

    match context {
        ContextPreset::Catalog => {
            block.push("NO environmental staging: no room, furniture, windows or architectural features");
            block.push("NO props beyond the approved list");
            block.push("Background MUST be seamless and uniform in tone");
            block.push("Only a soft grounding shadow beneath the product");
            if placement == PlacementType::WallMounted {
                block.push("A plain seamless wall plane is permitted solely to show the mounting");
            }
        }
        ContextPreset::Lifestyle => {
            block.push("Environment limited to architecture suited to the product: floor, walls, windows");
            block.push("NO props beyond the approved list");
            block.push("Environment must not compete with the product in color or contrast");
            block.push("One coherent light direction across the whole scene");
        }
        ContextPreset::Hero => {
            let zone = settings.reserved_text_zone.unwrap_or(DEFAULT_HERO_TEXT_ZONE);
            block.push(format!(
                "TEXT ZONE ({}): reserve the {} 40% of the frame as clean, low-detail negative space",
                zone, zone
            ));
            block.push("Product must not intrude into the reserved text zone");
            block.push("NO text, letters, numbers, logos or watermarks anywhere in the image");
        }
        ContextPreset::SocialSquare => {
            block.push("Product must remain recognizable at thumbnail size");
            block.push("NO text, stickers or graphic overlays");
            block.push("Square 1:1 framing with the product dominant");
        }
        ContextPreset::SocialStory => {
            block.push("Top and bottom 15% of the frame kept free of the product and key detail");
            block.push("NO text, stickers or interface elements");
            block.push("Vertical 9:16 composition");
        }
        ContextPreset::Detail => {
            block.push("Crop to the featured material, joinery or hardware detail");
            block.push("NO full room environment");
            block.push("True material texture; no smoothing or retouched grain");
        }
    }

    if context != ContextPreset::Hero {
        if let Some(zone) = settings.reserved_text_zone {
            block.push(format!("Keep the {} area clear for text overlay; no text rendered in it", zone));
        }
    }
    block
}
