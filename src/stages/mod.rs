pub mod stage0_normalize;
pub mod stage1_align;
pub mod stage2_resolve;
pub mod stage3_render;

pub use stage0_normalize::*;
pub use stage1_align::*;
pub use stage2_resolve::*;
pub use stage3_render::*;

use crate::heuristics::ResolverConfig;
use crate::llm::AnthropicClient;
use crate::models::{RawDiarizationTurn, TranscriptionOutcome, TranscriptionToken};

/// Tuning for the whole pipeline; every empirically chosen constant lives
/// here rather than at a call site.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub normalize: NormalizeConfig,
    pub align: AlignConfig,
    pub resolver: ResolverConfig,
}

/// Run the core pipeline over the two timelines:
/// normalize -> align -> resolve -> render.
///
/// Both engine outputs must be complete before this runs; the stages
/// themselves are pure and are never retried. Zero turns or zero tokens
/// produce a successful outcome with an empty segment list.
pub async fn run_pipeline(
    raw_turns: Vec<RawDiarizationTurn>,
    tokens: Vec<TranscriptionToken>,
    language: Option<String>,
    enrichment: Option<&AnthropicClient>,
    config: &PipelineConfig,
) -> TranscriptionOutcome {
    let normalized = normalize_diarization(raw_turns, &config.normalize);
    let mut segments = align_tokens(&tokens, &normalized.turns, &config.align);
    resolve_speakers(&mut segments, enrichment, &config.resolver).await;
    build_outcome(segments, language)
}
