//! scenevoice CLI - renders a scripted dialogue into one mixed audio track
//!
//! Reads a dialogue script and a voice configuration, synthesizes every line
//! through the speech service, concatenates the clips with the configured
//! pauses, exports the final track, and appends one log record per line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use scenevoice::audio::{ExportFormat, LameMp3Encoder};
use scenevoice::core::error::SceneError;
use scenevoice::engine::{AzureSpeechEngine, EngineOutputFormat, SpeechCredentials};
use scenevoice::log::append_entries;
use scenevoice::pipeline::{build_final_track, render_script};
use scenevoice::script::load_script;
use scenevoice::ssml::SsmlBuilder;
use scenevoice::voice::VoiceConfig;
use scenevoice::VERSION;

/// Render a scripted dialogue into a single mixed audio track
#[derive(Parser, Debug)]
#[command(name = "scenevoice")]
#[command(author, version, about, long_about = "
Renders a scripted dialogue into one mixed audio track.

Each line of the script is synthesized through the speech service with the
voice profile resolved for its speaker, the clips are concatenated with the
configured pauses, and the result is exported to the path given by --out.
A newline-delimited JSON synthesis log is appended per run.

Credentials are read from AZURE_SPEECH_KEY and AZURE_SPEECH_REGION (a .env
file next to the working directory is honored).

Examples:
  scenevoice --script data/script_scene1.json --voices config/voices.yaml \\
             --out output/scene1/scene1_final.mp3
")]
struct Cli {
    /// Path to the dialogue script (JSON array; YAML accepted by extension)
    #[arg(long, default_value = "data/script_scene1.json")]
    script: PathBuf,

    /// Path to the voice configuration file
    #[arg(long, default_value = "config/voices.yaml")]
    voices: PathBuf,

    /// Final track path; the extension selects the export format
    #[arg(long, default_value = "output/scene1/scene1_final.mp3")]
    out: PathBuf,

    /// Directory for the synthesis log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Scene identifier for the scratch directory and log file name
    /// (default: the script file stem)
    #[arg(long)]
    scene_id: Option<String>,

    /// Synthesize empty text lines as silence instead of failing
    #[arg(long)]
    allow_empty_lines: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn scene_id(&self) -> String {
        self.scene_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| {
                self.script
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "scene".to_string())
    }

    /// Export format: output extension, else `OUTPUT_AUDIO_FORMAT`, else mp3.
    fn export_format(&self) -> scenevoice::Result<ExportFormat> {
        if let Some(ext) = self
            .out
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.trim().is_empty())
        {
            return ExportFormat::parse(ext);
        }

        if let Ok(value) = std::env::var("OUTPUT_AUDIO_FORMAT") {
            if !value.trim().is_empty() {
                return ExportFormat::parse(&value);
            }
        }

        Ok(ExportFormat::Mp3)
    }

    fn segment_dir(&self, scene_id: &str) -> PathBuf {
        self.out
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join(scene_id)
    }

    fn log_file_path(&self, scene_id: &str) -> PathBuf {
        self.log_dir.join(format!("synth_{scene_id}.jsonl"))
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env with the speech service credentials
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    info!("scenevoice v{}", VERSION);

    let scene_id = cli.scene_id();
    let export_format = cli.export_format()?;

    let voice_config =
        VoiceConfig::load(&cli.voices).context("Failed to load voice configuration")?;
    let lines = load_script(&cli.script).context("Failed to load dialogue script")?;
    anyhow::ensure!(!lines.is_empty(), "Dialogue script is empty");

    // Credentials and engine output format are fatal configuration errors
    // before any synthesis is attempted.
    let credentials = SpeechCredentials::from_env()?;
    let output_format = match voice_config.defaults.output_format.as_deref() {
        Some(name) if !name.trim().is_empty() => {
            EngineOutputFormat::from_name(name).ok_or_else(|| SceneError::Config {
                message: format!("unsupported speech output format '{name}'"),
                path: Some(cli.voices.clone()),
            })?
        }
        _ => EngineOutputFormat::default(),
    };
    let engine = AzureSpeechEngine::new(credentials, output_format)?;

    let segment_dir = cli.segment_dir(&scene_id);
    fs::create_dir_all(&cli.log_dir).context("Failed to create log directory")?;

    info!(
        script = %cli.script.display(),
        lines = lines.len(),
        scene = %scene_id,
        format = export_format.as_str(),
        "starting synthesis"
    );

    let builder = SsmlBuilder::new();
    let rendered = render_script(
        &engine,
        &voice_config,
        &builder,
        &lines,
        &segment_dir,
        cli.allow_empty_lines,
    )
    .await?;

    let encoder = LameMp3Encoder::default();
    let entries = build_final_track(&rendered, &cli.out, export_format, &encoder)?;
    append_entries(&cli.log_file_path(&scene_id), &entries)?;

    info!(output = %cli.out.display(), "synthesis complete");
    println!("Synthesis complete. Output: {}", cli.out.display());

    Ok(())
}
