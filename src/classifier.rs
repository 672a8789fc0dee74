//! Product Classifier - Raw Attributes to Structured Intelligence
//!
//! Keyword tables are frozen and matched in declaration order.
//! Classification never fails; unrecognised text resolves to safe defaults.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::product::ProductSpecification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductCategory {
    Seating,
    Tables,
    Storage,
    Workstations,
    Lighting,
    Decor,
    Textiles,
    Outdoor,
    Unknown,
}

/// Physical mounting/support mode. Declaration order breaks confidence ties.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PlacementType {
    FloorStanding,
    WallMounted,
    CeilingMounted,
    Tabletop,
    BuiltIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MaterialKind {
    Wood,
    Metal,
    Fabric,
    Leather,
    Glass,
    Plastic,
    Stone,
    Ceramic,
    /// Fallback when no known vocabulary is found.
    Composite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TextureComplexity {
    Simple,
    Moderate,
    Complex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Reflectance {
    Matte,
    Satin,
    Gloss,
    Mirror,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LightingIntensity {
    Soft,
    Balanced,
    Dramatic,
    Technical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewingDistance {
    Close,
    Medium,
    Distant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialProfile {
    pub primary: MaterialKind,
    pub secondary: Vec<MaterialKind>,
    pub texture_complexity: TextureComplexity,
    pub reflectance: Reflectance,
    pub lighting_intensity: LightingIntensity,
}

impl MaterialProfile {
    pub fn recognized(&self) -> bool {
        self.primary != MaterialKind::Composite
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleGuidance {
    pub human_reference: bool,
    pub proportional_elements: Vec<String>,
    pub dimensional_context: String,
    pub viewing_distance: ViewingDistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingProfile {
    pub angle: String,
    pub fill_ratio: String,
    pub shadow_style: String,
    pub color_temperature_k: u32,
    pub special_requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIntelligence {
    pub category: ProductCategory,
    pub placement: PlacementType,
    pub material: MaterialProfile,
    pub scale: ScaleGuidance,
    pub lighting: LightingProfile,
}

// --- Keyword tables ---

const CATEGORY_KEYWORDS: &[(ProductCategory, &[&str])] = &[
    (ProductCategory::Seating, &[
        "chair", "sofa", "couch", "stool", "bench", "armchair", "recliner", "ottoman", "loveseat", "seat",
    ]),
    (ProductCategory::Tables, &["table", "nightstand", "console"]),
    (ProductCategory::Storage, &[
        "shelf", "shelving", "bookcase", "cabinet", "dresser", "wardrobe", "drawer", "sideboard",
        "credenza", "storage", "rack",
    ]),
    (ProductCategory::Workstations, &["desk", "workstation", "workbench"]),
    (ProductCategory::Lighting, &["lamp", "light", "pendant", "chandelier", "sconce", "lantern"]),
    (ProductCategory::Outdoor, &["outdoor", "patio", "garden", "deck"]),
    (ProductCategory::Textiles, &["rug", "carpet", "curtain", "cushion", "pillow", "throw", "blanket"]),
    (ProductCategory::Decor, &["mirror", "vase", "artwork", "frame", "sculpture", "clock", "decor"]),
];

const PLACEMENT_KEYWORDS: &[(PlacementType, &[&str])] = &[
    (PlacementType::WallMounted, &["wall", "mounted", "hanging", "floating"]),
    (PlacementType::CeilingMounted, &["ceiling", "pendant", "suspended"]),
    (PlacementType::Tabletop, &["tabletop", "desktop"]),
    (PlacementType::BuiltIn, &["built", "integrated", "custom"]),
];

const MATERIAL_KEYWORDS: &[(MaterialKind, &[&str])] = &[
    (MaterialKind::Wood, &[
        "wood", "walnut", "oak", "teak", "maple", "pine", "birch", "beech", "mahogany", "bamboo",
        "plywood", "veneer", "rattan",
    ]),
    (MaterialKind::Metal, &[
        "metal", "steel", "chrome", "aluminum", "aluminium", "iron", "brass", "copper", "bronze",
    ]),
    (MaterialKind::Fabric, &[
        "fabric", "linen", "cotton", "wool", "velvet", "boucle", "upholster", "polyester", "textile",
    ]),
    (MaterialKind::Leather, &["leather", "suede"]),
    (MaterialKind::Glass, &["glass"]),
    (MaterialKind::Plastic, &["plastic", "acrylic", "polypropylene", "resin", "nylon"]),
    (MaterialKind::Stone, &["stone", "marble", "granite", "travertine", "concrete", "quartz"]),
    (MaterialKind::Ceramic, &["ceramic", "porcelain", "terracotta"]),
];

/// Classify a product specification. Pure and infallible.
pub fn classify_product(spec: &ProductSpecification) -> ProductIntelligence {
    let category = detect_category(&spec.product_type);
    let placement = detect_placement(&spec.product_type);
    let material = build_material_profile(&spec.materials);
    let scale = build_scale_guidance(category, spec);
    let lighting = build_lighting_profile(category, &material);

    ProductIntelligence { category, placement, material, scale, lighting }
}

/// First category whose keyword occurs in the type string.
pub fn detect_category(product_type: &str) -> ProductCategory {
    let t = product_type.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| t.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(ProductCategory::Unknown)
}

/// Keyword placement; floor-standing when nothing matches.
pub fn detect_placement(product_type: &str) -> PlacementType {
    let t = product_type.to_lowercase();
    PLACEMENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| t.contains(k)))
        .map(|(placement, _)| *placement)
        .unwrap_or(PlacementType::FloorStanding)
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Words that contain a material keyword without naming the material.
const MATERIAL_FALSE_HITS: &[&str] = &["cloak", "croak", "soak", "spine", "steak", "environ"];

/// Known materials ordered by where they first occur, without repeats.
/// Keywords match anywhere in the text, so "hardwood" reads as wood.
pub fn detect_materials(materials: &str) -> Vec<MaterialKind> {
    let mut scan = materials.to_lowercase();
    for word in MATERIAL_FALSE_HITS {
        scan = scan.replace(word, &" ".repeat(word.len()));
    }

    let mut found: Vec<(usize, MaterialKind)> = MATERIAL_KEYWORDS
        .iter()
        .filter_map(|(kind, keywords)| {
            keywords.iter().filter_map(|k| scan.find(k)).min().map(|pos| (pos, *kind))
        })
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, kind)| kind).collect()
}

fn has_prefix(words: &[String], prefixes: &[&str]) -> bool {
    words.iter().any(|w| prefixes.iter().any(|p| w.starts_with(p)))
}

fn detect_reflectance(materials: &str, primary: MaterialKind) -> Reflectance {
    let words = tokens(materials);

    if has_prefix(&words, &["mirror", "reflective"]) {
        Reflectance::Mirror
    } else if has_prefix(&words, &["satin", "semi"]) {
        Reflectance::Satin
    } else if has_prefix(&words, &["gloss", "polished", "lacquer"]) {
        Reflectance::Gloss
    } else {
        match primary {
            MaterialKind::Metal => Reflectance::Satin,
            MaterialKind::Glass => Reflectance::Gloss,
            _ => Reflectance::Matte,
        }
    }
}

/// Fixed (material, reflectance) to lighting intensity mapping.
pub fn required_intensity(primary: MaterialKind, reflectance: Reflectance) -> LightingIntensity {
    match (primary, reflectance) {
        (MaterialKind::Glass, _) | (_, Reflectance::Mirror) => LightingIntensity::Technical,
        (MaterialKind::Metal, _) | (_, Reflectance::Gloss) => LightingIntensity::Dramatic,
        (MaterialKind::Fabric, _) | (MaterialKind::Leather, _) => LightingIntensity::Soft,
        _ => LightingIntensity::Balanced,
    }
}

pub fn build_material_profile(materials: &str) -> MaterialProfile {
    let detected = detect_materials(materials);
    let primary = detected.first().copied().unwrap_or(MaterialKind::Composite);
    let secondary: Vec<MaterialKind> = detected.iter().skip(1).copied().collect();

    let texture_complexity = match secondary.len() {
        0 => TextureComplexity::Simple,
        1 => TextureComplexity::Moderate,
        _ => TextureComplexity::Complex,
    };
    let reflectance = detect_reflectance(materials, primary);
    let lighting_intensity = required_intensity(primary, reflectance);

    MaterialProfile { primary, secondary, texture_complexity, reflectance, lighting_intensity }
}

fn proportional_elements(category: ProductCategory) -> &'static [&'static str] {
    match category {
        ProductCategory::Seating => &[
            "floor contact at every leg or base point",
            "seat height 45-50 cm",
            "backrest proportion relative to seat depth",
        ],
        ProductCategory::Tables => &[
            "tabletop height 72-76 cm for dining, 40-45 cm for coffee tables",
            "leg placement and apron proportion",
            "top thickness relative to span",
        ],
        ProductCategory::Storage => &[
            "shelf spacing 25-40 cm",
            "carcass depth 30-45 cm",
            "door and drawer front proportions",
        ],
        ProductCategory::Workstations => &[
            "work surface height 72-76 cm",
            "knee clearance beneath the surface",
            "usable depth 60-80 cm",
        ],
        ProductCategory::Lighting => &[
            "shade diameter relative to base or canopy",
            "cord or stem length",
            "mounting height",
        ],
        ProductCategory::Decor => &[
            "object size relative to adjacent surfaces",
            "frame or edge thickness",
        ],
        ProductCategory::Textiles => &[
            "pile height or weave thickness",
            "drape and fold behaviour",
            "edge finishing",
        ],
        ProductCategory::Outdoor => &[
            "ground contact on outdoor surfaces",
            "seat or surface height consistent with outdoor use",
            "weather-resistant finish proportions",
        ],
        ProductCategory::Unknown => &[
            "consistent real-world proportions",
            "stable support contact",
        ],
    }
}

fn build_scale_guidance(category: ProductCategory, spec: &ProductSpecification) -> ScaleGuidance {
    let human_reference = matches!(
        category,
        ProductCategory::Seating | ProductCategory::Tables | ProductCategory::Workstations
    );

    let dimensional_context = match spec.known_dimensions() {
        Some(dims) => format!("Actual dimensions: {}", dims.describe()),
        None => format!("No dimensions supplied; use standard {} proportions", category),
    };

    let viewing_distance = match category {
        ProductCategory::Decor | ProductCategory::Textiles => ViewingDistance::Close,
        ProductCategory::Outdoor => ViewingDistance::Distant,
        _ => ViewingDistance::Medium,
    };

    ScaleGuidance {
        human_reference,
        proportional_elements: proportional_elements(category).iter().map(|s| s.to_string()).collect(),
        dimensional_context,
        viewing_distance,
    }
}

fn build_lighting_profile(category: ProductCategory, material: &MaterialProfile) -> LightingProfile {
    let (angle, fill_ratio, shadow_style) = match material.lighting_intensity {
        LightingIntensity::Soft => (
            "45-degree key from upper left through large diffusion",
            "1:2",
            "soft shadows with gradual falloff",
        ),
        LightingIntensity::Balanced => (
            "45-degree key with even frontal fill",
            "1:3",
            "natural shadows with moderate definition",
        ),
        LightingIntensity::Dramatic => (
            "30-degree low key with rim accent light",
            "1:4",
            "defined shadows with crisp edges",
        ),
        LightingIntensity::Technical => (
            "overhead panel with dual side diffusion",
            "1:1.5",
            "minimal, tightly controlled shadows",
        ),
    };

    let color_temperature_k = match material.primary {
        MaterialKind::Wood => 3000,
        MaterialKind::Metal => 5600,
        _ => 5000,
    };

    let mut special_requirements = vec![];
    if matches!(material.reflectance, Reflectance::Gloss | Reflectance::Mirror) {
        special_requirements.push(
            "Control specular highlights with polarized diffusion; no blown-out glare or reflected light sources"
                .to_string(),
        );
    }
    if matches!(material.primary, MaterialKind::Fabric | MaterialKind::Leather) {
        special_requirements.push(
            "Use low-angle directional light to reveal weave, grain and stitching texture".to_string(),
        );
    }
    if category == ProductCategory::Lighting {
        special_requirements.push(
            "Show the fixture switched on with a physically plausible glow; form must remain readable as in the off state"
                .to_string(),
        );
    }

    LightingProfile {
        angle: angle.to_string(),
        fill_ratio: fill_ratio.to_string(),
        shadow_style: shadow_style.to_string(),
        color_temperature_k,
        special_requirements,
    }
}
