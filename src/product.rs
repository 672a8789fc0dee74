//! Request Model - Product Specification and Rendering Settings
//!
//! Everything here is supplied per request and never mutated by the engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Output use-case selecting a fixed set of photography rules.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case", from = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum ContextPreset {
    #[default]
    Catalog,
    Lifestyle,
    Hero,
    SocialSquare,
    SocialStory,
    Detail,
}

impl ContextPreset {
    /// Parse a preset name; anything unrecognised resolves to `Catalog`.
    pub fn parse_lossy(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['_', ' '], "-");
        normalized.parse().unwrap_or(ContextPreset::Catalog)
    }

    /// Background used when the request names none.
    pub fn default_background(&self) -> BackgroundStyle {
        match self {
            Self::Lifestyle => BackgroundStyle::Contextual,
            _ => BackgroundStyle::PureWhite,
        }
    }

    /// Lifestyle needs a real environment; isolated formats forbid one.
    pub fn allows_background(&self, style: BackgroundStyle) -> bool {
        match self {
            Self::Lifestyle => style == BackgroundStyle::Contextual,
            Self::Catalog | Self::SocialSquare | Self::SocialStory => style != BackgroundStyle::Contextual,
            Self::Hero | Self::Detail => true,
        }
    }
}

impl From<String> for ContextPreset {
    fn from(raw: String) -> Self {
        Self::parse_lossy(&raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QualityTier {
    #[default]
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BackgroundStyle {
    #[default]
    PureWhite,
    LightGray,
    Gradient,
    Contextual,
}

impl BackgroundStyle {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::PureWhite => "seamless pure white (#FFFFFF) background",
            Self::LightGray => "seamless light gray studio background",
            Self::Gradient => "soft neutral gradient background, lighter toward the product",
            Self::Contextual => "restrained interior setting consistent with the context rules",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProductPosition {
    #[default]
    Center,
    LeftThird,
    RightThird,
}

impl ProductPosition {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Center => "centered horizontally and vertically",
            Self::LeftThird => "anchored on the left third vertical line",
            Self::RightThird => "anchored on the right third vertical line",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LightingPreference {
    #[default]
    Studio,
    Natural,
    Soft,
    Dramatic,
}

impl LightingPreference {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Studio => "controlled multi-light studio setup",
            Self::Natural => "daylight-balanced window light with natural falloff",
            Self::Soft => "large diffused sources with gentle shadows",
            Self::Dramatic => "directional key with deliberate contrast",
        }
    }
}

/// Frame region kept free of content for later text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TextZone {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DimensionUnit {
    Mm,
    #[default]
    Cm,
    M,
    In,
}

impl DimensionUnit {
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            Self::Mm => value / 10.0,
            Self::Cm => value,
            Self::M => value * 100.0,
            Self::In => value * 2.54,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
    #[serde(default)]
    pub unit: DimensionUnit,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.depth.is_none()
    }

    pub fn width_cm(&self) -> Option<f64> {
        self.width.map(|v| self.unit.to_cm(v))
    }

    pub fn height_cm(&self) -> Option<f64> {
        self.height.map(|v| self.unit.to_cm(v))
    }

    pub fn depth_cm(&self) -> Option<f64> {
        self.depth.map(|v| self.unit.to_cm(v))
    }

    /// "W 120 × H 75 × D 60 cm", listing only the supplied axes.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = [("W", self.width), ("H", self.height), ("D", self.depth)]
            .iter()
            .filter_map(|(axis, value)| value.map(|v| format!("{} {}", axis, v)))
            .collect();
        format!("{} {}", parts.join(" × "), self.unit)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpecification {
    pub name: String,
    /// Free-text category hint, e.g. "wall mounted desk".
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub materials: String,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub notes: String,
}

impl ProductSpecification {
    pub fn new(name: impl Into<String>, product_type: impl Into<String>, materials: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product_type: product_type.into(),
            materials: materials.into(),
            dimensions: None,
            notes: String::new(),
        }
    }

    /// Supplied dimensions, ignoring an all-empty block.
    pub fn known_dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref().filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSettings {
    #[serde(default)]
    pub context: ContextPreset,
    /// `None` takes the context's default background.
    #[serde(default)]
    pub background_style: Option<BackgroundStyle>,
    #[serde(default)]
    pub product_position: ProductPosition,
    #[serde(default)]
    pub lighting_preference: LightingPreference,
    #[serde(default)]
    pub strict_mode: bool,
    #[serde(default)]
    pub quality: QualityTier,
    #[serde(default = "default_variation_count")]
    pub variation_count: u8,
    #[serde(default)]
    pub approved_props: Vec<String>,
    #[serde(default)]
    pub reserved_text_zone: Option<TextZone>,
}

fn default_variation_count() -> u8 { 1 }

impl Default for ConfigurationSettings {
    fn default() -> Self {
        Self {
            context: ContextPreset::default(),
            background_style: None,
            product_position: ProductPosition::default(),
            lighting_preference: LightingPreference::default(),
            strict_mode: false,
            quality: QualityTier::default(),
            variation_count: default_variation_count(),
            approved_props: vec![],
            reserved_text_zone: None,
        }
    }
}

impl ConfigurationSettings {
    pub fn for_context(context: ContextPreset) -> Self {
        Self { context, ..Self::default() }
    }

    /// Background actually rendered once the context rules are applied.
    pub fn resolve_background(&self) -> ResolvedBackground {
        match self.background_style {
            Some(style) if self.context.allows_background(style) => {
                ResolvedBackground { style, overridden: None }
            }
            Some(style) => ResolvedBackground {
                style: self.context.default_background(),
                overridden: Some(style),
            },
            None => ResolvedBackground { style: self.context.default_background(), overridden: None },
        }
    }

    /// Approved props trimmed, lower-cased and de-duplicated in supplied order.
    pub fn normalized_props(&self) -> Vec<String> {
        let mut props: Vec<String> = vec![];
        for prop in &self.approved_props {
            let p = prop.trim().to_lowercase();
            if !p.is_empty() && !props.contains(&p) {
                props.push(p);
            }
        }
        props
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBackground {
    pub style: BackgroundStyle,
    /// The requested style, when the context rules replaced it.
    pub overridden: Option<BackgroundStyle>,
}

/// Descriptor of a reference photo. Only presence and count reach the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub label: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    pub product: ProductSpecification,
    #[serde(default)]
    pub settings: ConfigurationSettings,
    #[serde(default)]
    pub reference_images: Vec<ReferenceImage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_context_falls_back_to_catalog() {
        assert_eq!(ContextPreset::parse_lossy("billboard"), ContextPreset::Catalog);
        assert_eq!(ContextPreset::parse_lossy("Social_Story"), ContextPreset::SocialStory);
        assert_eq!(ContextPreset::parse_lossy(" hero "), ContextPreset::Hero);
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: SynthesisRequest = serde_json::from_value(json!({
            "product": {"name": "Oslo Shelf", "type": "wall mounted shelf", "materials": "solid walnut"},
            "settings": {"context": "lifestyle", "approvedProps": ["Plant", " plant "]}
        }))
        .unwrap();

        assert_eq!(request.settings.context, ContextPreset::Lifestyle);
        assert_eq!(request.settings.variation_count, 1);
        assert_eq!(request.settings.normalized_props(), vec!["plant".to_string()]);
        assert!(request.reference_images.is_empty());
        assert!(request.product.known_dimensions().is_none());
    }

    #[test]
    fn test_unknown_context_in_payload_is_catalog() {
        let settings: ConfigurationSettings =
            serde_json::from_value(json!({"context": "poster"})).unwrap();
        assert_eq!(settings.context, ContextPreset::Catalog);
    }

    #[test]
    fn test_background_follows_context_rules() {
        let lifestyle = ConfigurationSettings::for_context(ContextPreset::Lifestyle);
        assert_eq!(lifestyle.resolve_background().style, BackgroundStyle::Contextual);
        assert_eq!(lifestyle.resolve_background().overridden, None);

        let catalog = ConfigurationSettings {
            background_style: Some(BackgroundStyle::Contextual),
            ..Default::default()
        };
        let resolved = catalog.resolve_background();
        assert_eq!(resolved.style, BackgroundStyle::PureWhite);
        assert_eq!(resolved.overridden, Some(BackgroundStyle::Contextual));

        let white_lifestyle = ConfigurationSettings {
            context: ContextPreset::Lifestyle,
            background_style: Some(BackgroundStyle::PureWhite),
            ..Default::default()
        };
        assert_eq!(white_lifestyle.resolve_background().style, BackgroundStyle::Contextual);

        let gray_catalog = ConfigurationSettings {
            background_style: Some(BackgroundStyle::LightGray),
            ..Default::default()
        };
        assert_eq!(gray_catalog.resolve_background(), ResolvedBackground {
            style: BackgroundStyle::LightGray,
            overridden: None,
        });
        assert_eq!(ContextPreset::default(), ContextPreset::Catalog);
    }

    #[test]
    fn test_dimensions_describe_and_convert() {
        let dims = Dimensions {
            width: Some(120.0),
            height: Some(75.0),
            depth: None,
            unit: DimensionUnit::Cm,
        };
        assert_eq!(dims.describe(), "W 120 × H 75 cm");

        let inches = Dimensions { height: Some(1.0), unit: DimensionUnit::In, ..Default::default() };
        assert_eq!(inches.height_cm(), Some(2.54));
    }
}
