//! Contract Invariant Tests
//!
//! Guarantees every synthesis call must keep, checked over a fixed request corpus.

use promptforge_core::{
    assembler::TRUNCATION_MARKER,
    classifier::{build_material_profile, detect_placement},
    config::ScoringConfig,
    product::{DimensionUnit, Dimensions},
    ConfigurationSettings, ContextPreset, EngineConfig, PlacementType, ProductCategory,
    ProductSpecification, PromptEngine, SynthesisError, SynthesisRequest,
};
use serde_json::json;

fn request(product: ProductSpecification, settings: ConfigurationSettings) -> SynthesisRequest {
    SynthesisRequest { product, settings, reference_images: vec![] }
}

fn corpus() -> Vec<SynthesisRequest> {
    let mut chair = ProductSpecification::new("Meridian", "executive office chair", "black leather, chrome base");
    chair.notes = "Five-star base with casters".into();

    let mut desk = ProductSpecification::new("Rise", "standing desk", "oak veneer, steel frame");
    desk.dimensions = Some(Dimensions { width: Some(1.4), height: Some(1.2), depth: Some(0.7), unit: DimensionUnit::M });

    vec![
        request(ProductSpecification::new("Oslo", "wall mounted shelf", "solid walnut"), ConfigurationSettings::for_context(ContextPreset::Lifestyle)),
        request(chair, ConfigurationSettings::for_context(ContextPreset::Catalog)),
        request(desk, ConfigurationSettings::for_context(ContextPreset::Hero)),
        request(ProductSpecification::new("Halo", "pendant lamp", "brass, opal glass"), ConfigurationSettings::for_context(ContextPreset::Detail)),
        request(ProductSpecification::new("Dune", "wool rug", "wool"), ConfigurationSettings::for_context(ContextPreset::SocialStory)),
        request(ProductSpecification::new("x", "?", ""), ConfigurationSettings::for_context(ContextPreset::SocialSquare)),
        request(
            ProductSpecification::new("Verde", "lounge chair", "boucle, travertine, walnut, brass"),
            ConfigurationSettings {
                strict_mode: true,
                variation_count: 8,
                approved_props: vec!["plant".into()],
                ..Default::default()
            },
        ),
    ]
}

#[test]
fn invariant_wall_or_mounted_type_is_wall_mounted() {
    for product_type in ["wall shelf", "mounted tv cabinet", "Wall-Mounted Desk", "floating wall unit", "ceiling mounted lamp"] {
        assert_eq!(detect_placement(product_type), PlacementType::WallMounted, "{}", product_type);
    }
}

#[test]
fn invariant_secondary_materials_is_k_minus_one() {
    let cases = [
        ("walnut", 1),
        ("oak and steel", 2),
        ("black leather, chrome base", 2),
        ("linen, marble, glass, brass", 4),
        ("walnut, oak, teak", 1),
        ("hardwood and metal", 2),
        ("sandstone top, oak legs", 2),
    ];
    for (materials, k) in cases {
        let profile = build_material_profile(materials);
        assert_eq!(profile.secondary.len(), k - 1, "{}", materials);
    }
}

#[test]
fn invariant_length_never_exceeds_budget() {
    for max in [512, 900, 2000, 4000, 10_000] {
        let engine = PromptEngine::new(EngineConfig { max_prompt_length: max, ..Default::default() }).unwrap();
        for req in corpus() {
            let result = engine.synthesize(&req).unwrap();
            assert!(result.length <= max, "length {} > {}", result.length, max);
            assert_eq!(result.length, result.prompt.chars().count());
            if result.truncated {
                assert!(result.prompt.contains(TRUNCATION_MARKER));
            }
        }
    }

    let engine = PromptEngine::new(EngineConfig { max_prompt_length: 512, ..Default::default() }).unwrap();
    let result = engine.synthesize(&corpus()[0]).unwrap();
    assert!(result.truncated);
    assert!(result.prompt.contains(TRUNCATION_MARKER));
}

#[test]
fn invariant_score_is_bounded() {
    let engine = PromptEngine::default();
    for req in corpus() {
        let result = engine.synthesize(&req).unwrap();
        assert!(result.quality_score <= 100);
    }

    let harsh = EngineConfig {
        max_prompt_length: 512,
        scoring: ScoringConfig { issue_penalty: 60, warning_penalty: 40, ..Default::default() },
        ..Default::default()
    };
    let result = PromptEngine::new(harsh).unwrap().synthesize(&corpus()[5]).unwrap();
    assert_eq!(result.quality_score, 0);
}

#[test]
fn invariant_production_ready_implies_gates() {
    for max in [600, 10_000] {
        let engine = PromptEngine::new(EngineConfig { max_prompt_length: max, ..Default::default() }).unwrap();
        for req in corpus() {
            let result = engine.synthesize(&req).unwrap();
            if result.production_ready {
                assert!(result.quality_score >= 85);
                assert!(result.marker_counts.absolute >= 1);
                assert!(result.constraint_stats.absolute >= 1);
                assert!(result.validation.issues.is_empty());
                assert!(!result.truncated);
            }
        }
    }
}

#[test]
fn invariant_deterministic_output() {
    let engine = PromptEngine::default();
    for req in corpus() {
        let a = serde_json::to_string(&engine.synthesize(&req).unwrap()).unwrap();
        let b = serde_json::to_string(&engine.synthesize(&req.clone()).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn invariant_missing_name_or_type_rejected() {
    let engine = PromptEngine::default();
    for (name, product_type) in [("", "chair"), ("Chair", ""), ("   ", "  ")] {
        let req = request(ProductSpecification::new(name, product_type, "oak"), ConfigurationSettings::default());
        assert!(matches!(engine.synthesize(&req), Err(SynthesisError::InvalidInput { .. })));
    }
}

#[test]
fn scenario_wall_mounted_shelf_lifestyle() {
    let req: SynthesisRequest = serde_json::from_value(json!({
        "product": {"name": "Oslo", "type": "wall mounted shelf", "materials": "solid walnut"},
        "settings": {"context": "lifestyle"}
    }))
    .unwrap();
    let result = PromptEngine::default().synthesize(&req).unwrap();

    assert_eq!(result.placement.resolved, PlacementType::WallMounted);
    assert_eq!(serde_json::to_value(result.placement.resolved).unwrap(), json!("wall-mounted"));
    assert!(result.prompt.contains("ZERO floor contact"));
    assert!(result.prompt.contains("VISIBLE mounting hardware"));
}

#[test]
fn scenario_executive_chair_catalog() {
    let req: SynthesisRequest = serde_json::from_value(json!({
        "product": {"name": "Meridian", "type": "executive office chair", "materials": "black leather, chrome base"},
        "settings": {"context": "catalog"}
    }))
    .unwrap();
    let result = PromptEngine::default().synthesize(&req).unwrap();

    assert_eq!(result.intelligence.category, ProductCategory::Seating);
    assert!(result.prompt.contains("[CRITICAL] CONTEXT RULES: CATALOG SHOT"));
    assert!(result.prompt.contains("NO environmental staging"));
    assert!(result.prompt.contains("NO props beyond the approved list"));
    assert!(result.prompt.contains("Approved props: none"));
}

#[test]
fn scenario_strict_mode_single_approved_prop() {
    let req: SynthesisRequest = serde_json::from_value(json!({
        "product": {"name": "Verde", "type": "lounge chair", "materials": "boucle"},
        "settings": {"strictMode": true, "approvedProps": ["plant"]}
    }))
    .unwrap();
    let result = PromptEngine::default().synthesize(&req).unwrap();

    assert!(result.prompt.contains("Approved props (sole exceptions): plant\n"));
    assert!(result.prompt.contains("Every object enumerated below is FORBIDDEN"));
    assert!(result.prompt.contains("NO dining items: plates"));
    assert!(result.prompt.contains("[ABSOLUTE] SPECIFICATION ADHERENCE"));
    assert!(result.applied_optimizations.contains(&"strict-mode".to_string()));
}
