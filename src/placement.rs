//! Placement Analyzer - Confidence-Scored Placement Detection
//!
//! Corroborates or overrides the classifier's keyword placement.
//! Signals are summed per placement; the strongest candidate wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::{PlacementType, ProductCategory};
use crate::config::PlacementThresholds;
use crate::product::ProductSpecification;

const TYPE_KEYWORD_WEIGHT: f64 = 0.8;
const EXTRA_KEYWORD_WEIGHT: f64 = 0.1;
const WEAK_MOUNTED_WEIGHT: f64 = 0.5;
const NOTE_KEYWORD_WEIGHT: f64 = 0.3;
const DIMENSION_WEIGHT: f64 = 0.1;
const FREESTANDING_FORM_WEIGHT: f64 = 0.1;

const ANALYZER_KEYWORDS: &[(PlacementType, &[&str])] = &[
    (PlacementType::FloorStanding, &["floor", "freestanding", "free-standing", "standing"]),
    (PlacementType::WallMounted, &["wall", "hanging", "floating"]),
    (PlacementType::CeilingMounted, &["ceiling", "pendant", "suspended", "chandelier"]),
    (PlacementType::Tabletop, &["tabletop", "desktop", "countertop", "table lamp"]),
    (PlacementType::BuiltIn, &["built-in", "built in", "integrated", "custom", "fitted"]),
];

/// Furniture forms that stand on the floor unless the type says otherwise.
const FREESTANDING_FORMS: &[&str] = &[
    "bookcase", "wardrobe", "dresser", "sideboard", "credenza", "chest of drawers", "rug", "carpet",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    TypeKeyword,
    NoteKeyword,
    CategoryPrior,
    Dimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSignal {
    pub placement: PlacementType,
    pub source: SignalSource,
    pub weight: f64,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementDecision {
    /// Detection replaces the classifier placement.
    Override,
    /// Classifier placement kept, flagged as uncertain.
    LowConfidence,
    /// Classifier placement kept; manual review advised.
    VerifyManually,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementAnalysis {
    pub detected: PlacementType,
    pub classifier_placement: PlacementType,
    pub resolved: PlacementType,
    pub confidence: f64,
    pub decision: PlacementDecision,
    pub signals: Vec<PlacementSignal>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn category_prior(category: ProductCategory) -> Option<(PlacementType, f64)> {
    match category {
        ProductCategory::Seating | ProductCategory::Tables | ProductCategory::Outdoor => {
            Some((PlacementType::FloorStanding, 0.7))
        }
        ProductCategory::Workstations => Some((PlacementType::FloorStanding, 0.6)),
        ProductCategory::Storage | ProductCategory::Textiles => Some((PlacementType::FloorStanding, 0.6)),
        ProductCategory::Lighting => Some((PlacementType::CeilingMounted, 0.3)),
        ProductCategory::Decor => Some((PlacementType::WallMounted, 0.3)),
        ProductCategory::Unknown => None,
    }
}

fn keyword_signals(spec: &ProductSpecification) -> Vec<PlacementSignal> {
    let product_type = spec.product_type.to_lowercase();
    let secondary = format!("{} {}", spec.name, spec.notes).to_lowercase();
    let mut signals = vec![];

    for (placement, keywords) in ANALYZER_KEYWORDS {
        let mut matched: Vec<&str> = keywords.iter().copied().filter(|k| product_type.contains(k)).collect();
        // "mounted" alone is ambiguous between wall and ceiling
        let weak_mounted = *placement == PlacementType::WallMounted && product_type.contains("mounted");

        if !matched.is_empty() {
            if weak_mounted {
                matched.push("mounted");
            }
            let weight = TYPE_KEYWORD_WEIGHT + EXTRA_KEYWORD_WEIGHT * (matched.len() - 1) as f64;
            signals.push(PlacementSignal {
                placement: *placement,
                source: SignalSource::TypeKeyword,
                weight,
                detail: format!("type mentions {}", matched.join(", ")),
            });
        } else if weak_mounted {
            signals.push(PlacementSignal {
                placement: *placement,
                source: SignalSource::TypeKeyword,
                weight: WEAK_MOUNTED_WEIGHT,
                detail: "type mentions mounted".to_string(),
            });
        }

        if let Some(k) = keywords.iter().find(|k| secondary.contains(*k)) {
            signals.push(PlacementSignal {
                placement: *placement,
                source: SignalSource::NoteKeyword,
                weight: NOTE_KEYWORD_WEIGHT,
                detail: format!("name or notes mention {}", k),
            });
        }
    }

    if let Some(form) = FREESTANDING_FORMS.iter().find(|f| product_type.contains(*f)) {
        signals.push(PlacementSignal {
            placement: PlacementType::FloorStanding,
            source: SignalSource::TypeKeyword,
            weight: FREESTANDING_FORM_WEIGHT,
            detail: format!("a {} is a free-standing form", form),
        });
    }

    signals
}

fn dimension_signals(spec: &ProductSpecification, category: ProductCategory) -> Vec<PlacementSignal> {
    let Some(dims) = spec.known_dimensions() else {
        return vec![];
    };
    let mut signals = vec![];

    if let Some(depth) = dims.depth_cm() {
        if depth <= 35.0 && matches!(category, ProductCategory::Storage | ProductCategory::Decor) {
            signals.push(PlacementSignal {
                placement: PlacementType::WallMounted,
                source: SignalSource::Dimensions,
                weight: DIMENSION_WEIGHT,
                detail: format!("shallow depth {} cm suits wall mounting", round2(depth)),
            });
        }
    }

    if let Some(depth) = dims.depth_cm() {
        if depth >= 40.0 && matches!(category, ProductCategory::Storage | ProductCategory::Textiles) {
            signals.push(PlacementSignal {
                placement: PlacementType::FloorStanding,
                source: SignalSource::Dimensions,
                weight: DIMENSION_WEIGHT,
                detail: format!("full depth {} cm needs floor support", round2(depth)),
            });
        }
    }

    if let Some(height) = dims.height_cm() {
        if height >= 150.0 {
            signals.push(PlacementSignal {
                placement: PlacementType::FloorStanding,
                source: SignalSource::Dimensions,
                weight: DIMENSION_WEIGHT,
                detail: format!("height {} cm implies floor support", round2(height)),
            });
        }
    }

    if let (Some(height), Some(width)) = (dims.height_cm(), dims.width_cm()) {
        if height <= 60.0
            && width <= 60.0
            && matches!(category, ProductCategory::Lighting | ProductCategory::Decor)
        {
            signals.push(PlacementSignal {
                placement: PlacementType::Tabletop,
                source: SignalSource::Dimensions,
                weight: DIMENSION_WEIGHT,
                detail: "compact footprint suits a tabletop".to_string(),
            });
        }
    }

    signals
}

/// Collect placement signals for a product in the given category.
pub fn collect_signals(spec: &ProductSpecification, category: ProductCategory) -> Vec<PlacementSignal> {
    let mut signals = keyword_signals(spec);

    if let Some((placement, weight)) = category_prior(category) {
        signals.push(PlacementSignal {
            placement,
            source: SignalSource::CategoryPrior,
            weight,
            detail: format!("{} are usually {}", category, placement),
        });
    }

    signals.extend(dimension_signals(spec, category));
    signals
}

/// Detect placement and decide whether it overrides the classifier's value.
pub fn analyze_placement(
    spec: &ProductSpecification,
    category: ProductCategory,
    classifier_placement: PlacementType,
    thresholds: &PlacementThresholds,
) -> PlacementAnalysis {
    let signals = collect_signals(spec, category);

    let mut totals: BTreeMap<PlacementType, f64> = BTreeMap::new();
    for signal in &signals {
        *totals.entry(signal.placement).or_insert(0.0) += signal.weight;
    }

    // BTreeMap iterates in enum order, so strict > keeps the earliest on ties
    let mut best: Option<(PlacementType, f64)> = None;
    for (placement, total) in &totals {
        if best.map_or(true, |(_, score)| *total > score) {
            best = Some((*placement, *total));
        }
    }

    let (detected, confidence) = match best {
        Some((placement, total)) => (placement, round2(total.min(1.0))),
        None => (classifier_placement, 0.0),
    };

    let mut recommendations = vec![];
    let mut warnings = vec![];

    let decision = if confidence >= thresholds.override_confidence {
        if detected != classifier_placement {
            recommendations.push(format!(
                "Placement corrected from {} to {} (confidence {:.2})",
                classifier_placement, detected, confidence
            ));
        }
        PlacementDecision::Override
    } else if confidence >= thresholds.warning_confidence {
        warnings.push(format!(
            "Low placement confidence ({:.2}): keeping {}",
            confidence, classifier_placement
        ));
        recommendations.push(format!(
            "State the placement explicitly in the product type, e.g. \"{} {}\"",
            classifier_placement,
            spec.product_type.trim()
        ));
        PlacementDecision::LowConfidence
    } else {
        warnings.push(format!(
            "Low placement confidence ({:.2}): placement {} is unverified",
            confidence, classifier_placement
        ));
        recommendations.push(format!(
            "Verify placement manually before generation; assumed {}",
            classifier_placement
        ));
        PlacementDecision::VerifyManually
    };

    let resolved = match decision {
        PlacementDecision::Override => detected,
        _ => classifier_placement,
    };

    debug!(
        detected = %detected,
        resolved = %resolved,
        confidence,
        signals = signals.len(),
        "placement analyzed"
    );

    PlacementAnalysis {
        detected,
        classifier_placement,
        resolved,
        confidence,
        decision,
        signals,
        recommendations,
        warnings,
    }
}
