//! reader - Summarize documents and read them aloud

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use reader::summary::{DocumentStats, Summary};
use reader::text::process_document;
use reader::{Document, Notice, ReaderConfig, ReaderSession, to_braille};
use speech_client::{SpeechProvider, get_provider};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "reader")]
#[command(about = "Summarize text documents and read them aloud", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the key points of a document
    Summarize {
        /// Path to a UTF-8 text file
        file: PathBuf,

        /// Number of key points (default from config)
        #[arg(short = 'n', long)]
        key_points: Option<usize>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print word, sentence and reading time statistics
    Stats {
        /// Path to a UTF-8 text file
        file: PathBuf,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read a document aloud (Ctrl-C stops)
    Read {
        /// Path to a UTF-8 text file
        file: PathBuf,

        /// Speaking rate (0.5-2.0, default from config)
        #[arg(short, long)]
        speed: Option<f32>,

        /// Read the summary instead of the full text
        #[arg(long)]
        summary: bool,
    },
    /// Show how a document is split for playback
    Chunks {
        /// Path to a UTF-8 text file
        file: PathBuf,

        /// Maximum chunk size in characters (default from config)
        #[arg(long)]
        max_len: Option<usize>,
    },
    /// Transcribe text into Braille
    Braille {
        /// Text to transcribe
        text: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default speaking rate
    SetSpeed {
        /// Value (0.5-2.0)
        value: f32,
    },
    /// Set default number of key points
    SetKeyPoints {
        /// Number of sentences
        value: usize,
    },
    /// Set speech engine (espeak-ng, espeak, say, spd-say, or "auto")
    SetEngine {
        /// Engine name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = ReaderConfig::load().context("Failed to load configuration")?;
    log::debug!("Config: {:?}", config);

    match args.command {
        Commands::Summarize {
            file,
            key_points,
            json,
        } => {
            let document = load_document(&file, &config)?;
            let summary = Summary::build(&document.text, key_points.unwrap_or(config.key_points));
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.announcement());
                if !summary.is_empty() {
                    println!();
                    println!("{}", summary.numbered());
                }
            }
        }
        Commands::Stats { file, json } => {
            let document = load_document(&file, &config)?;
            let stats = DocumentStats::from_text(&document.text);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Words:        {}", stats.words);
                println!("Sentences:    {}", stats.sentences);
                println!("Reading time: {} min", stats.reading_minutes);
            }
        }
        Commands::Read {
            file,
            speed,
            summary,
        } => {
            let mut config = config;
            if let Some(speed) = speed {
                config.set_speed(speed);
            }
            let raw = read_input(&file)?;
            read_aloud(&config, raw, summary).await?;
        }
        Commands::Chunks { file, max_len } => {
            let document = load_document(&file, &config)?;
            let chunks = process_document(&document.text, max_len.unwrap_or(config.max_chunk_len));
            for chunk in &chunks {
                println!("[{}] ({} chars) {}", chunk.index, chunk.len(), chunk.text);
            }
            eprintln!("Total chunks: {}", chunks.len());
        }
        Commands::Braille { text } => {
            println!("{}", to_braille(&text));
        }
        Commands::Config { action } => handle_config_command(&action)?,
    }

    Ok(())
}

/// `--debug` forces debug output; otherwise RUST_LOG applies, defaulting to warn.
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = ReaderConfig::load()?;
            let path = ReaderConfig::config_path()?;
            println!("Config file: {}", path.display());
            println!();
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::SetSpeed { value } => {
            let mut config = ReaderConfig::load()?;
            config.set_speed(*value);
            config.save()?;
            println!("Default speed set to: {}x", config.speed);
        }
        ConfigAction::SetKeyPoints { value } => {
            let mut config = ReaderConfig::load()?;
            config.key_points = *value;
            config.save()?;
            println!("Default key points set to: {}", value);
        }
        ConfigAction::SetEngine { name } => {
            let mut config = ReaderConfig::load()?;
            if name.eq_ignore_ascii_case("auto") {
                config.speech.engine = None;
                println!("Speech engine set to: auto-detect");
            } else {
                let kind = speech_client::EngineKind::from_str(name)?;
                config.speech.engine = Some(kind.binary().to_string());
                println!("Speech engine set to: {}", kind.binary());
            }
            config.save()?;
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_document(path: &Path, config: &ReaderConfig) -> Result<Document> {
    let raw = read_input(path)?;
    Ok(Document::new(raw, config.repair_ocr_joins))
}

/// Play a document through the configured engine with a progress bar over chunks.
async fn read_aloud(config: &ReaderConfig, raw: String, summary_only: bool) -> Result<()> {
    let provider: Arc<dyn SpeechProvider> =
        Arc::from(get_provider(&config.speech).context("Failed to initialize speech engine")?);
    eprintln!("Speech engine: {}", provider.name());

    let (mut session, mut notices) = ReaderSession::from_config(config, provider);
    session.load_text(raw);
    if summary_only {
        session.read_summary().await;
    } else {
        session.read_aloud().await;
    }

    let mut snapshot = session.playback().subscribe();
    let initial = snapshot.borrow_and_update().clone();

    let pb = ProgressBar::new(initial.queue_len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chunks ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;
    let mut last = None;

    if !initial.is_idle() {
        loop {
            tokio::select! {
                Some(notice) = notices.recv() => {
                    pb.set_message(notice.to_string());
                    last = Some(notice);
                }
                changed = snapshot.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = snapshot.borrow_and_update().clone();
                    if current.is_idle() {
                        break;
                    }
                    pb.set_position(current.index as u64);
                }
                _ = &mut ctrl_c, if !interrupted => {
                    interrupted = true;
                    session.playback().stop().await;
                }
            }
        }
    }

    while let Ok(notice) = notices.try_recv() {
        last = Some(notice);
    }

    match last {
        Some(Notice::Finished) => {
            pb.finish_with_message(Notice::Finished.to_string());
            Ok(())
        }
        Some(Notice::Stopped) => {
            pb.abandon_with_message(Notice::Stopped.to_string());
            Ok(())
        }
        Some(notice) if notice.is_error() => {
            pb.abandon();
            anyhow::bail!("{}", notice)
        }
        _ => {
            pb.finish_and_clear();
            Ok(())
        }
    }
}
