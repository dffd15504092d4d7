use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use colloquy::{
    read_diarization_file, read_transcription_file, run_pipeline, transcribe_file,
    write_human_transcript, AnthropicClient, AnthropicConfig, EngineConfig, JobContext,
    PipelineConfig, ResultEnvelope, TranscriptionOutcome,
};

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(author, version, about = "Speaker-attributed transcription pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe an audio file with speaker attribution
    Transcribe {
        /// Input audio file (mp3, wav, m4a, ogg, webm, flac)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the JSON result
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the human-readable transcript (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        #[command(flatten)]
        tuning: Tuning,

        /// Skip LLM name enrichment even when an API key is configured
        #[arg(long)]
        no_enrichment: bool,

        /// Engine wait cap in seconds
        #[arg(long, default_value = "600")]
        engine_timeout_secs: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Align captured diarization and transcription timelines (no engines)
    Align {
        /// Diarization timeline file (JSONL, one {"segment": ...} per line)
        #[arg(short, long)]
        diarization: PathBuf,

        /// Transcription result file (JSON with text and segments)
        #[arg(short, long)]
        transcription: PathBuf,

        /// Output file for the JSON result
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the human-readable transcript (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        #[command(flatten)]
        tuning: Tuning,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Pipeline tuning flags shared by both subcommands
#[derive(clap::Args)]
struct Tuning {
    /// Gap threshold for merging same-speaker fragments, in milliseconds
    #[arg(long, default_value = "500")]
    merge_gap_ms: u64,

    /// Minimum overlap ratio for a token/turn candidate pairing
    #[arg(long, default_value = "0.2")]
    min_overlap_ratio: f64,

    /// How many leading segments to scan for self-introductions
    #[arg(long, default_value = "20")]
    intro_scan_segments: usize,
}

impl Tuning {
    fn into_pipeline_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.normalize.merge_gap_ms = self.merge_gap_ms;
        config.align.min_overlap_ratio = self.min_overlap_ratio;
        config.resolver.intro_scan_segments = self.intro_scan_segments;
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Transcribe {
            input,
            output,
            human_readable,
            tuning,
            no_enrichment,
            engine_timeout_secs,
            verbose,
        } => {
            setup_logging(verbose);
            transcribe(
                input,
                output,
                human_readable,
                tuning.into_pipeline_config(),
                no_enrichment,
                engine_timeout_secs,
            )
            .await
        }
        Commands::Align {
            diarization,
            transcription,
            output,
            human_readable,
            tuning,
            verbose,
        } => {
            setup_logging(verbose);
            align(
                diarization,
                transcription,
                output,
                human_readable,
                tuning.into_pipeline_config(),
            )
            .await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Build the optional enrichment client from the environment
fn enrichment_client(no_enrichment: bool) -> Option<AnthropicClient> {
    if no_enrichment {
        return None;
    }
    match AnthropicConfig::from_env() {
        Ok(config) => Some(AnthropicClient::new(config)),
        Err(err) => {
            warn!("Name enrichment disabled: {err:#}");
            None
        }
    }
}

async fn transcribe(
    input: PathBuf,
    output: PathBuf,
    human_readable: Option<PathBuf>,
    pipeline: PipelineConfig,
    no_enrichment: bool,
    engine_timeout_secs: u64,
) -> Result<()> {
    let mut engines = EngineConfig::from_env();
    engines.timeout = std::time::Duration::from_secs(engine_timeout_secs);

    let ctx = JobContext::new(engines, pipeline).context("Failed to create job context")?;
    let client = enrichment_client(no_enrichment);

    let outcome = transcribe_file(&input, &ctx, client.as_ref())
        .await
        .context("Transcription job failed")?;

    write_outputs(&outcome, &ctx.job_id.to_string(), &output, human_readable.as_deref())?;
    print_summary(&outcome);
    Ok(())
}

async fn align(
    diarization: PathBuf,
    transcription: PathBuf,
    output: PathBuf,
    human_readable: Option<PathBuf>,
    pipeline: PipelineConfig,
) -> Result<()> {
    info!("Loading diarization timeline from {:?}", diarization);
    let raw_turns =
        read_diarization_file(&diarization).context("Failed to read diarization timeline")?;

    info!("Loading transcription from {:?}", transcription);
    let transcription_output =
        read_transcription_file(&transcription).context("Failed to read transcription result")?;

    info!(
        "Loaded {} diarization regions, {} transcription segments",
        raw_turns.len(),
        transcription_output.segments.len()
    );

    let tokens = transcription_output.tokens();
    let outcome = run_pipeline(
        raw_turns,
        tokens,
        transcription_output.language.clone(),
        None,
        &pipeline,
    )
    .await;

    write_outputs(&outcome, "offline", &output, human_readable.as_deref())?;
    print_summary(&outcome);
    Ok(())
}

fn write_outputs(
    outcome: &TranscriptionOutcome,
    job_id: &str,
    output: &std::path::Path,
    human_readable: Option<&std::path::Path>,
) -> Result<()> {
    ResultEnvelope::new(job_id.to_string(), outcome)
        .write_json(output)
        .context("Failed to write result JSON")?;
    info!("Result written to {:?}", output);

    if let Some(path) = human_readable {
        write_human_transcript(path, &outcome.formatted_transcript)
            .context("Failed to write human-readable transcript")?;
        info!("Human-readable transcript written to {:?}", path);
    }

    Ok(())
}

fn print_summary(outcome: &TranscriptionOutcome) {
    info!(
        "Complete: {} segments, {} speakers",
        outcome.segments.len(),
        outcome.stats.len()
    );

    let mut speakers: Vec<_> = outcome.stats.iter().collect();
    speakers.sort_by(|a, b| a.0.cmp(b.0));
    for (name, stats) in speakers {
        info!(
            "  {}: {} segments, {} words, {:.1}s speaking time",
            name,
            stats.segment_count,
            stats.total_words,
            stats.total_time_ms as f64 / 1000.0
        );
    }
}
