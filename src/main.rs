// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lingbridge::app_config::{self, Config};
use lingbridge::file_utils::FileManager;
use lingbridge::providers::local_store::LocalArtifactStore;
use lingbridge::providers::mock::MockEngine;
use lingbridge::translation::{DocumentFormat, TranslationService};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for DocumentFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Text,
    Json,
    Csv,
}

impl From<CliFormat> for DocumentFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => DocumentFormat::Text,
            CliFormat::Json => DocumentFormat::Json,
            CliFormat::Csv => DocumentFormat::Csv,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a piece of text
    Text {
        /// Text to translate
        #[arg(value_name = "TEXT")]
        text: String,

        /// Source language code (e.g., 'eng_Latn', 'hin_Deva', 'zh')
        #[arg(short, long)]
        source_language: String,

        /// Target language code
        #[arg(short, long)]
        target_language: String,
    },

    /// Translate a document, or every document in a directory
    File {
        /// Input .txt/.json/.csv file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Source language code
        #[arg(short, long)]
        source_language: String,

        /// Target language code
        #[arg(short, long)]
        target_language: String,

        /// Document format (detected from the extension when omitted)
        #[arg(long, value_enum)]
        format: Option<CliFormat>,

        /// Output file (single input only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// List supported languages and direct pairs
    Languages,

    /// List targets reachable from a source language
    Targets {
        /// Source language code
        #[arg(value_name = "SOURCE")]
        source_language: String,

        /// Only list targets served by a direct model
        #[arg(long)]
        direct_only: bool,
    },

    /// Show engine, catalog and cache information
    Info {
        /// Also check that the inference engine is reachable
        #[arg(long)]
        check: bool,
    },

    /// Generate shell completions for lingbridge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// lingbridge - language-pair routing for neural machine translation
///
/// Translates text and documents with per-pair models, pivoting through a
/// hub language when no direct model exists.
#[derive(Parser, Debug)]
#[command(name = "lingbridge")]
#[command(version = "0.1.0")]
#[command(about = "Routed neural machine translation")]
#[command(long_about = "lingbridge translates text and documents with language-pair specific models.
Pairs without a dedicated model are translated in two hops through the hub language.

EXAMPLES:
    lingbridge text -s eng_Latn -t hin_Deva \"Good morning\"
    lingbridge file -s eng_Latn -t zh notes.txt          # writes notes_translated.txt
    lingbridge file -s hin_Deva -t eng_Latn ./docs/       # every .txt/.json/.csv under docs/
    lingbridge targets hin_Deva                           # direct and two-hop targets
    lingbridge --dry-run file -s eng_Latn -t zh data.csv # mock engine, no server needed
    lingbridge completions bash > lingbridge.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Use the in-process mock engine instead of the inference server
    #[arg(long, global = true)]
    dry_run: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "lingbridge", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level.clone())?;
    log::set_max_level(level_filter(&config.log_level));

    let service = build_service(config, cli.dry_run)?;

    match cli.command {
        Commands::Text {
            text,
            source_language,
            target_language,
        } => {
            let result = service
                .translate_text(&text, &source_language, &target_language)
                .await;
            print_json(&result)?;
            if !result.is_success() {
                return Err(anyhow!(
                    "Translation failed: {}",
                    result.error.unwrap_or_default()
                ));
            }
        }
        Commands::File {
            input_path,
            source_language,
            target_language,
            format,
            output,
            force_overwrite,
        } => {
            let request = FileRequest {
                source_language: &source_language,
                target_language: &target_language,
                format: format.map(DocumentFormat::from),
                force_overwrite,
            };

            if input_path.is_file() {
                run_file(&service, &input_path, output.as_deref(), &request).await?;
            } else if input_path.is_dir() {
                if output.is_some() {
                    return Err(anyhow!("--output can only be used with a single input file"));
                }
                run_folder(&service, &input_path, &request).await?;
            } else {
                return Err(anyhow!("Input path does not exist: {:?}", input_path));
            }
        }
        Commands::Languages => print_json(&service.list_supported_languages())?,
        Commands::Targets {
            source_language,
            direct_only,
        } => {
            if !service.catalog().is_supported(&source_language) {
                return Err(anyhow!("Unsupported source language: {}", source_language));
            }
            print_json(&service.list_available_targets(&source_language, !direct_only))?;
        }
        Commands::Info { check } => {
            print_json(&service.system_info())?;
            if check {
                service
                    .test_connection()
                    .await
                    .context("Inference engine is not reachable")?;
                info!("Inference engine is reachable");
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the configuration, creating a default one when missing
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

fn build_service(config: Config, dry_run: bool) -> Result<TranslationService> {
    if dry_run {
        info!("Dry run: using the mock engine");
        let store = LocalArtifactStore::new(std::env::temp_dir().join("lingbridge-dry-run"), false);
        TranslationService::with_engine(config, Arc::new(store), Arc::new(MockEngine::echo()))
    } else {
        TranslationService::new(config)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

struct FileRequest<'a> {
    source_language: &'a str,
    target_language: &'a str,
    format: Option<DocumentFormat>,
    force_overwrite: bool,
}

fn detect_format(path: &Path, explicit: Option<DocumentFormat>) -> Result<DocumentFormat> {
    if let Some(format) = explicit {
        return Ok(format);
    }

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(DocumentFormat::from_extension(&extension)?)
}

async fn run_file(
    service: &TranslationService,
    input: &Path,
    output: Option<&Path>,
    request: &FileRequest<'_>,
) -> Result<()> {
    let format = detect_format(input, request.format)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| FileManager::translated_output_path(input, None));

    if output.exists() && !request.force_overwrite {
        warn!("Output file already exists: {:?}. Use -f to force overwrite.", output);
        return Ok(());
    }

    let outcome = service
        .translate_document_to(input, &output, format, request.source_language, request.target_language)
        .await?;
    print_json(&outcome)
}

async fn run_folder(service: &TranslationService, input_dir: &Path, request: &FileRequest<'_>) -> Result<()> {
    let documents = FileManager::find_documents(input_dir)?;
    if documents.is_empty() {
        return Err(anyhow!("No .txt, .json or .csv files found in directory: {:?}", input_dir));
    }

    let folder_pb = ProgressBar::new(documents.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    folder_pb.set_style(style.progress_chars("█▓▒░"));

    let mut success_count = 0;
    let mut error_count = 0;
    let mut skip_count = 0;

    for document in &documents {
        let file_name = document
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        folder_pb.set_message(format!("Processing: {}", file_name));

        let output = FileManager::translated_output_path(document, None);
        if output.exists() && !request.force_overwrite {
            skip_count += 1;
            folder_pb.inc(1);
            continue;
        }

        let result = match detect_format(document, request.format) {
            Ok(format) => service
                .translate_document_to(document, &output, format, request.source_language, request.target_language)
                .await
                .map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => success_count += 1,
            Err(e) => {
                folder_pb.suspend(|| error!("Failed to translate {:?}: {}", document, e));
                error_count += 1;
            }
        }
        folder_pb.inc(1);
    }

    folder_pb.finish_with_message("Done");
    info!(
        "Translated {} file(s), {} skipped, {} failed",
        success_count, skip_count, error_count
    );

    if error_count > 0 {
        return Err(anyhow!("{} file(s) failed to translate", error_count));
    }
    Ok(())
}
