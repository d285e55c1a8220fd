//! Styling module - prompts, the multi-variant pipeline and single calls

pub mod direct;
pub mod pipeline;
pub mod prompt;

pub use direct::{DirectGenerator, DirectOutput, MatchOutfitRequest, MatchOutput, PromptRequest};
pub use pipeline::{StylingAdvice, StylingPipeline, StylingRequest, VariantError};
pub use prompt::{EncodedImage, PromptBuilder, StyleVariant, STYLING_TEMPLATE};
