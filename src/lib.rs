//! PromptForge Core - Prompt Synthesis & Validation Engine
//!
//! # Contract
//! 1. Pure: identical requests produce identical results
//! 2. Fixed section order; markers prove assembly completed
//! 3. Only malformed input is an error
//! 4. Scoring gates production; the engine never calls a provider

pub mod product;
pub mod classifier;
pub mod standards;
pub mod placement;
pub mod constraints;
pub mod assembler;
pub mod validation;
pub mod config;
pub mod hashing;
pub mod pipeline;
pub mod strategy;

pub use product::{ConfigurationSettings, ContextPreset, ProductSpecification, ReferenceImage, SynthesisRequest};
pub use classifier::{classify_product, PlacementType, ProductCategory, ProductIntelligence};
pub use standards::{list_standards, standards_for, ContextStandards};
pub use placement::{analyze_placement, PlacementAnalysis, PlacementDecision};
pub use constraints::{build_constraints, ConstraintBlock, ConstraintStats, Severity};
pub use assembler::{assemble_prompt, AssembledPrompt};
pub use validation::{PromptRule, PromptValidator, ValidationReport, ValidationViolation, ViolationSeverity};
pub use config::{ConfigError, EngineConfig};
pub use hashing::{canonical_json, request_fingerprint};
pub use pipeline::{PromptAssemblyResult, PromptEngine, SynthesisError};
pub use strategy::{generate_with_fallback, GenerationError, GenerationOutcome, ImageProvider, QuotaGate};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
