//! Generation Strategy - Caller-Side Provider Boundary
//!
//! The engine never calls a provider. This helper is for callers: it
//! gates on quota and readiness, then tries reference-guided generation
//! and records a text-only fallback as an explicit outcome.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::pipeline::PromptAssemblyResult;
use crate::product::ReferenceImage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub url: String,
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider rate limited: {0}")]
    RateLimited(String),

    #[error("Provider rejected request: {0}")]
    Rejected(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// `generate(promptText, aspectRatio, referenceImages?) -> images`
pub trait ImageProvider {
    fn generate(
        &self,
        prompt: &str,
        aspect_ratio: &str,
        reference_images: Option<&[ReferenceImage]>,
    ) -> Result<Vec<GeneratedImage>, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDecision {
    pub allowed: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

pub trait QuotaGate {
    fn check_quota(&self, user: &str) -> QuotaDecision;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Primary { images: Vec<GeneratedImage> },
    Fallback { reason: String, images: Vec<GeneratedImage> },
}

impl GenerationOutcome {
    pub fn images(&self) -> &[GeneratedImage] {
        match self {
            Self::Primary { images } | Self::Fallback { images, .. } => images,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Quota denied: {0}")]
    QuotaDenied(String),

    #[error("Prompt not production ready (score {0})")]
    NotProductionReady(u8),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub fn generate_with_fallback<P, Q>(
    provider: &P,
    quota: &Q,
    user: &str,
    result: &PromptAssemblyResult,
    reference_images: &[ReferenceImage],
) -> Result<GenerationOutcome, GenerationError>
where
    P: ImageProvider + ?Sized,
    Q: QuotaGate + ?Sized,
{
    let decision = quota.check_quota(user);
    if !decision.allowed {
        let reason = decision.reason.unwrap_or_else(|| "quota exhausted".to_string());
        return Err(GenerationError::QuotaDenied(reason));
    }
    if !result.production_ready {
        return Err(GenerationError::NotProductionReady(result.quality_score));
    }

    let prompt = result.prompt.as_str();
    let aspect_ratio = result.aspect_ratio.as_str();

    if reference_images.is_empty() {
        let images = provider.generate(prompt, aspect_ratio, None)?;
        return Ok(GenerationOutcome::Primary { images });
    }

    match provider.generate(prompt, aspect_ratio, Some(reference_images)) {
        Ok(images) => Ok(GenerationOutcome::Primary { images }),
        Err(e) => {
            warn!(error = %e, references = reference_images.len(), "Reference generation failed, retrying text-only");
            let images = provider.generate(prompt, aspect_ratio, None)?;
            info!(images = images.len(), "Text-only fallback succeeded");
            Ok(GenerationOutcome::Fallback { reason: e.to_string(), images })
        }
    }
}
