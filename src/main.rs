// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use mtdesk::app_config::{Config, LogLevel, TranslationProvider};
use mtdesk::console::{self, Console};
use mtdesk::{Desk, ModelRegistry, TranslateOutcome, TranslationService};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "huggingface", alias = "hf")]
    HuggingFace,
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::HuggingFace => TranslationProvider::HuggingFace,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive translation session (default command)
    Interactive,

    /// Translate a text or a .txt file once and print the result
    Translate {
        /// Text to translate
        #[arg(value_name = "TEXT", conflicts_with = "file")]
        text: Option<String>,

        /// Text file to translate instead of TEXT
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Model pair: label, list number, or language codes like en-de
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the available model pairs
    Models,

    /// Test the connection to the configured provider
    Check,

    /// Generate shell completions for mtdesk
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// mtdesk - Machine translation desk
///
/// Translate text and .txt files with pretrained source-target model pairs,
/// keeping a per-session history of translations and uploads.
#[derive(Parser, Debug)]
#[command(name = "mtdesk")]
#[command(version)]
#[command(about = "Interactive machine translation desk")]
#[command(long_about = "mtdesk translates text with pretrained source-target model pairs and keeps a history of the session.

EXAMPLES:
    mtdesk                                      # Interactive session with default config
    mtdesk translate \"Hello world\"              # One-shot translation, English to German
    mtdesk translate -m fr-en -f letter.txt     # Translate a file from French to English
    mtdesk -p ollama translate \"Good morning\"   # Use a local Ollama model instead
    mtdesk models                               # List the model pairs
    mtdesk check                                # Test the provider connection
    mtdesk completions bash > mtdesk.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    huggingface - Hugging Face inference API running the opus-mt models (default)
    ollama      - Local Ollama server (default: llama3.2:3b)
    anthropic   - Anthropic Claude API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Translation provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// API key or access token for the provider
    #[arg(long, global = true, env = "MTDESK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum length of a translation
    #[arg(long, global = true)]
    max_length: Option<usize>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "mtdesk", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(Commands::Models) = &cli.command {
        // Listing needs no provider; the config only supplies the marked default
        let config = Config::load_or_create(&cli.config)?;
        let mut stdout = std::io::stdout();
        console::render_models(ModelRegistry::builtin(), config.default_model_entry()?, &mut stdout)?;
        return Ok(());
    }

    let config = load_config(&cli)?;
    let service = Arc::new(
        TranslationService::new(config.translation.clone())
            .context("Failed to create translation service")?,
    );

    let selected = config.default_model_entry()?;
    let max_length = config.translation.common.max_length;

    match cli.command {
        Some(Commands::Check) => {
            service.test_connection().await.map_err(|e| {
                error!("Connection to {} failed: {}", service.provider_name(), e);
                anyhow!(e)
            })?;
            info!("Connection to {} OK", service.provider_name());
            Ok(())
        }
        Some(Commands::Translate { text, file, model }) => {
            let mut desk = Desk::new(service, selected, max_length);
            run_translate(&mut desk, text, file, model).await
        }
        Some(Commands::Interactive) | None => {
            let desk = Desk::new(service, selected, max_length);
            run_interactive(desk).await
        }
        Some(Commands::Models) | Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// Load the configuration and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(provider) = &cli.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(api_key) = &cli.api_key {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    }

    if config.translation.get_api_key().is_empty() {
        let env_var = match config.translation.provider {
            TranslationProvider::HuggingFace => Some("HF_API_TOKEN"),
            TranslationProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
            TranslationProvider::Ollama => None,
        };
        if let Some(key) = env_var.and_then(|name| std::env::var(name).ok()) {
            config.translation.active_provider_config_mut().api_key = key;
        }
    }

    if let Some(max_length) = cli.max_length {
        config.translation.common.max_length = max_length;
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

/// One-shot translation printed to stdout
async fn run_translate(
    desk: &mut Desk,
    text: Option<String>,
    file: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    if let Some(query) = model {
        desk.select_model(&query)?;
    }

    match (text, file) {
        (_, Some(path)) => {
            desk.upload_file(&path)?;
        }
        (Some(text), None) => desk.set_draft(text),
        (None, None) => return Err(anyhow!("Provide TEXT or --file to translate")),
    }

    match desk.translate().await? {
        TranslateOutcome::Translated(record) => {
            println!("{}", record.output());
            Ok(())
        }
        TranslateOutcome::EmptyInput => {
            warn!("Nothing to translate");
            Ok(())
        }
    }
}

/// Interactive session over stdin and stdout
async fn run_interactive(desk: Desk) -> Result<()> {
    let interactive = std::io::stdin().is_terminal();
    let input = tokio::io::BufReader::new(tokio::io::stdin());

    let mut console = Console::new(desk, std::io::stdout(), interactive, Config::default_export_dir());
    console.run(input).await
}
