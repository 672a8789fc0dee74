//! Context Standards Registry
//!
//! Frozen photography rules per output context, built once on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::product::ContextPreset;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSpecs {
    pub aspect_ratio: &'static str,
    pub focus: &'static str,
    pub depth_of_field: &'static str,
    pub camera_angle: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRequirements {
    pub sharpness: &'static str,
    pub noise: &'static str,
    pub color_accuracy: &'static str,
    pub dynamic_range: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextStandards {
    pub preset: ContextPreset,
    pub name: &'static str,
    pub composition: &'static str,
    pub product_placement: &'static str,
    pub negative_space: &'static str,
    pub visual_hierarchy: &'static str,
    pub technical: TechnicalSpecs,
    pub quality: QualityRequirements,
    pub optimization_notes: &'static [&'static str],
}

static STANDARDS: Lazy<HashMap<ContextPreset, ContextStandards>> = Lazy::new(|| {
    HashMap::from([
        (ContextPreset::Catalog, catalog()),
        (ContextPreset::Lifestyle, lifestyle()),
        (ContextPreset::Hero, hero()),
        (ContextPreset::SocialSquare, social_square()),
        (ContextPreset::SocialStory, social_story()),
        (ContextPreset::Detail, detail()),
    ])
});

static FALLBACK: Lazy<ContextStandards> = Lazy::new(catalog);

/// O(1) lookup; a preset without an entry resolves to the catalog rules.
pub fn standards_for(preset: ContextPreset) -> &'static ContextStandards {
    STANDARDS.get(&preset).unwrap_or_else(|| &*FALLBACK)
}

/// All entries ordered by preset.
pub fn list_standards() -> Vec<&'static ContextStandards> {
    let mut all: Vec<_> = STANDARDS.values().collect();
    all.sort_by_key(|s| s.preset);
    all
}

fn catalog() -> ContextStandards {
    ContextStandards {
        preset: ContextPreset::Catalog,
        name: "Catalog shot",
        composition: "Full product in frame with 10-15% even margin on every side",
        product_placement: "Product isolated and centered, shown at a three-quarter front angle",
        negative_space: "Uniform clean background; no environment, no props",
        visual_hierarchy: "The product is the only subject; nothing competes for attention",
        technical: TechnicalSpecs {
            aspect_ratio: "1:1",
            focus: "Edge-to-edge sharp focus across the entire product",
            depth_of_field: "Deep (f/8-f/11 equivalent), no background blur needed",
            camera_angle: "Eye level to slightly elevated, 10-15 degrees",
        },
        quality: QualityRequirements {
            sharpness: "maximum",
            noise: "none visible",
            color_accuracy: "true-to-material, calibrated neutral white balance",
            dynamic_range: "full, no clipped highlights or crushed shadows",
        },
        optimization_notes: &[
            "Consistent angle and lighting across a product range",
            "Background must cut out cleanly for e-commerce listings",
        ],
    }
}

fn lifestyle() -> ContextStandards {
    ContextStandards {
        preset: ContextPreset::Lifestyle,
        name: "Lifestyle scene",
        composition: "Product as the clear focal point inside a believable interior, rule of thirds",
        product_placement: "Product placed where it would be used, occupying 40-60% of the frame",
        negative_space: "Quiet architectural surfaces around the product; no clutter",
        visual_hierarchy: "Product first, supporting architecture second",
        technical: TechnicalSpecs {
            aspect_ratio: "3:2",
            focus: "Product tack-sharp; environment gently softer",
            depth_of_field: "Moderate (f/4-f/5.6 equivalent)",
            camera_angle: "Natural standing eye level",
        },
        quality: QualityRequirements {
            sharpness: "high on product",
            noise: "minimal",
            color_accuracy: "natural, product colors must not shift with ambient tint",
            dynamic_range: "high, window highlights retained",
        },
        optimization_notes: &[
            "Scene must read as real photography, not a render",
            "Environment style must not overpower the product",
        ],
    }
}

fn hero() -> ContextStandards {
    ContextStandards {
        preset: ContextPreset::Hero,
        name: "Hero banner",
        composition: "Wide cinematic framing with the product offset to one side",
        product_placement: "Product on the opposite side of the reserved text zone, 30-45% of frame width",
        negative_space: "A large clean zone reserved for headline text overlay",
        visual_hierarchy: "Product, then reserved text zone; background stays subordinate",
        technical: TechnicalSpecs {
            aspect_ratio: "16:9",
            focus: "Product sharp; background controlled falloff",
            depth_of_field: "Moderate to shallow (f/2.8-f/4 equivalent)",
            camera_angle: "Slightly low angle to add presence",
        },
        quality: QualityRequirements {
            sharpness: "high",
            noise: "none visible at full-width display",
            color_accuracy: "brand-consistent, accurate product colors",
            dynamic_range: "high with smooth tonal gradients, no banding",
        },
        optimization_notes: &[
            "Must survive cropping to 21:9 on wide screens",
            "Text zone must have low detail and even tone",
        ],
    }
}

fn social_square() -> ContextStandards {
    ContextStandards {
        preset: ContextPreset::SocialSquare,
        name: "Social square",
        composition: "Centered, bold framing that reads at thumbnail size",
        product_placement: "Product fills 60-70% of the frame",
        negative_space: "Tight margins; simple background",
        visual_hierarchy: "Immediate product recognition at small size",
        technical: TechnicalSpecs {
            aspect_ratio: "1:1",
            focus: "Product sharp throughout",
            depth_of_field: "Moderate (f/4-f/5.6 equivalent)",
            camera_angle: "Eye level or slightly elevated",
        },
        quality: QualityRequirements {
            sharpness: "high",
            noise: "minimal",
            color_accuracy: "vivid but true to material",
            dynamic_range: "standard",
        },
        optimization_notes: &[
            "Legible at 320 px",
            "Avoid fine detail that disappears after compression",
        ],
    }
}

fn social_story() -> ContextStandards {
    ContextStandards {
        preset: ContextPreset::SocialStory,
        name: "Social story",
        composition: "Vertical framing with the product in the central band",
        product_placement: "Product between 20% and 80% of frame height",
        negative_space: "Top and bottom 15% kept clear for platform interface elements",
        visual_hierarchy: "Product dominant in the safe central band",
        technical: TechnicalSpecs {
            aspect_ratio: "9:16",
            focus: "Product sharp throughout",
            depth_of_field: "Moderate (f/4 equivalent)",
            camera_angle: "Eye level, vertical orientation",
        },
        quality: QualityRequirements {
            sharpness: "high",
            noise: "minimal",
            color_accuracy: "vivid but true to material",
            dynamic_range: "standard",
        },
        optimization_notes: &[
            "Safe zones respected for overlaid interface",
            "Optimized for full-screen mobile display",
        ],
    }
}

fn detail() -> ContextStandards {
    ContextStandards {
        preset: ContextPreset::Detail,
        name: "Detail shot",
        composition: "Close crop on material, joinery or hardware",
        product_placement: "Detail area fills the frame; partial product view is expected",
        negative_space: "Minimal; the surface itself is the subject",
        visual_hierarchy: "Texture and craftsmanship first",
        technical: TechnicalSpecs {
            aspect_ratio: "4:5",
            focus: "Critical focus on the featured detail",
            depth_of_field: "Shallow (f/2.8 equivalent) with controlled focus falloff",
            camera_angle: "Angle chosen to reveal surface texture",
        },
        quality: QualityRequirements {
            sharpness: "maximum, macro-level",
            noise: "none visible",
            color_accuracy: "exact material color and grain",
            dynamic_range: "full, texture retained in highlights and shadows",
        },
        optimization_notes: &[
            "Material authenticity over drama",
            "No surface defects invented or hidden",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_preset_has_an_entry() {
        for preset in ContextPreset::iter() {
            assert_eq!(standards_for(preset).preset, preset);
        }
        assert_eq!(list_standards().len(), 6);
    }

    #[test]
    fn test_aspect_ratios() {
        assert_eq!(standards_for(ContextPreset::Hero).technical.aspect_ratio, "16:9");
        assert_eq!(standards_for(ContextPreset::SocialStory).technical.aspect_ratio, "9:16");
        assert_eq!(standards_for(ContextPreset::parse_lossy("unknown")).name, "Catalog shot");
    }

    #[test]
    fn test_lookup_is_stable() {
        let a = standards_for(ContextPreset::Lifestyle) as *const ContextStandards;
        let b = standards_for(ContextPreset::Lifestyle) as *const ContextStandards;
        assert_eq!(a, b);
    }
}
