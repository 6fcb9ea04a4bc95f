//! Command-line interface for mwql
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Field vocabulary selection
//! - One-shot subcommands (annotate, suggest, fields, config, completion)

pub mod completion;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::Result;
use crate::formatter::Formatter;
use crate::parser::annotate;
use crate::repl::completion::suggest_fields;
use crate::vocabulary::{FieldVocabulary, ObjectType};

/// Live annotation and field completion for MWDB search queries
#[derive(Parser, Debug)]
#[command(
    name = "mwql",
    version,
    about = "MWDB query editor with live highlighting and field completion",
    long_about = "Interactive editor for the MWDB search query language. Highlights queries
as they are typed, completes field names from a field vocabulary and refuses
to submit malformed queries. Subcommands run the same machinery one-shot."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Field vocabulary file (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    pub vocabulary: Option<PathBuf>,

    /// Output format (shell, json, json-pretty, table)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Disable syntax highlighting in the editor
    #[arg(long = "no-highlight")]
    pub no_highlight: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for mwql
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate a query and print its spans and field path
    Annotate {
        /// Query text
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Suggest field names for the query as typed so far
    Suggest {
        /// Query text
        #[arg(value_name = "QUERY")]
        query: String,

        /// Cursor position as a byte offset (defaults to the end)
        #[arg(long, value_name = "OFFSET")]
        cursor: Option<usize>,
    },

    /// List the field vocabulary
    Fields {
        /// Only list fields of this object type (object, file, config, text_blob)
        #[arg(long = "object-type", value_name = "TYPE")]
        object_type: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show version information
    Version,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        // Logging is not initialised yet, so report on stderr directly
        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {e}");
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Load the field vocabulary
    ///
    /// `--vocabulary` wins over `vocabulary.file` from the configuration;
    /// with neither, the built-in MWDB table is used.
    ///
    /// # Returns
    /// * `Result<Arc<FieldVocabulary>>` - Shared, immutable vocabulary
    pub fn load_vocabulary(&self) -> Result<Arc<FieldVocabulary>> {
        let path = self
            .args
            .vocabulary
            .as_deref()
            .or(self.config.vocabulary.file.as_deref());
        let vocabulary = FieldVocabulary::load(path)?;
        let source = path.map_or_else(|| "built-in".to_string(), |p| p.display().to_string());
        tracing::debug!(%source, fields = vocabulary.len(), "field vocabulary ready");
        Ok(Arc::new(vocabulary))
    }

    /// Formatter for the effective display settings
    pub fn formatter(&self) -> Formatter {
        Formatter::new(
            self.config.display.format,
            self.config.display.color_output,
        )
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);
    }

    /// Apply display-related CLI arguments to configuration
    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if let Some(format_str) = &args.format {
            config.display.format = Self::parse_output_format(format_str);
        }

        if args.no_color {
            config.display.color_output = false;
        }

        if args.no_highlight {
            config.display.syntax_highlighting = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Parse output format string
    fn parse_output_format(format_str: &str) -> OutputFormat {
        match format_str.to_lowercase().as_str() {
            "shell" => OutputFormat::Shell,
            "json" => OutputFormat::Json,
            "json-pretty" | "jsonpretty" => OutputFormat::JsonPretty,
            "table" => OutputFormat::Table,
            _ => {
                eprintln!("Warning: Unknown format '{format_str}', using default");
                OutputFormat::Shell
            }
        }
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand was handled, false to start the editor
    pub fn handle_subcommand(&self) -> Result<bool> {
        let Some(command) = &self.args.command else {
            return Ok(false);
        };

        match command {
            Commands::Version => self.show_version(),
            Commands::Completion { shell } => {
                print!("{}", completion::generate_completion(shell)?);
            }
            Commands::Config { show, validate } => {
                self.handle_config_command(*show, *validate)?;
            }
            Commands::Annotate { .. } | Commands::Suggest { .. } | Commands::Fields { .. } => {
                let vocabulary = self.load_vocabulary()?;
                if let Some(output) = self.run_query_command(command, &vocabulary)? {
                    println!("{output}");
                }
            }
        }

        Ok(true)
    }

    /// Run a query-related subcommand and return its output
    ///
    /// # Arguments
    /// * `command` - Subcommand to run
    /// * `vocabulary` - Field vocabulary for suggestions and listings
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Formatted output, `None` for other subcommands
    pub fn run_query_command(
        &self,
        command: &Commands,
        vocabulary: &FieldVocabulary,
    ) -> Result<Option<String>> {
        let formatter = self.formatter();

        let output = match command {
            Commands::Annotate { query } => formatter.format_annotated(&annotate(query))?,
            Commands::Suggest { query, cursor } => {
                let end = cursor.unwrap_or(query.len()).min(query.len());
                let before_cursor = query.get(..end).unwrap_or(query);
                let annotated = annotate(before_cursor);
                let suggestions = suggest_fields(&annotated.current_field_path, vocabulary);
                formatter.format_suggestions(&suggestions)?
            }
            Commands::Fields { object_type } => {
                let object_type = object_type
                    .as_deref()
                    .map(str::parse::<ObjectType>)
                    .transpose()?;
                formatter.format_fields(vocabulary, object_type)?
            }
            _ => return Ok(None),
        };

        Ok(Some(output))
    }

    /// Show version information
    fn show_version(&self) {
        println!("mwql version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {e}"),
            },
            Err(e) => println!("❌ Failed to load configuration: {e}"),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml_with_comments()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::FieldEntry;

    fn cli(argv: &[&str]) -> CliInterface {
        let args = CliArgs::try_parse_from(argv).unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args);
        CliInterface { args, config }
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from(["mwql"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.vocabulary.is_none());
    }

    #[test]
    fn test_cli_args_with_flags() {
        let args = CliArgs::try_parse_from(["mwql", "--no-color", "--quiet"]).unwrap();
        assert!(args.no_color);
        assert!(args.quiet);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            CliArgs::try_parse_from(["mwql", "annotate", "tag:x", "--format", "json"]).unwrap();
        assert_eq!(args.format.as_deref(), Some("json"));
        assert!(matches!(args.command, Some(Commands::Annotate { ref query }) if query == "tag:x"));
    }

    #[test]
    fn test_args_override_config() {
        let cli = cli(&["mwql", "--format", "table", "--no-color", "--no-highlight", "--vv"]);
        assert_eq!(cli.config().display.format, OutputFormat::Table);
        assert!(!cli.config().display.color_output);
        assert!(!cli.config().display.syntax_highlighting);
        assert_eq!(cli.config().logging.level, LogLevel::Trace);
    }

    #[test]
    fn test_unknown_format_falls_back_to_shell() {
        assert_eq!(CliInterface::parse_output_format("xml"), OutputFormat::Shell);
        assert_eq!(
            CliInterface::parse_output_format("JSON-PRETTY"),
            OutputFormat::JsonPretty
        );
    }

    #[test]
    fn test_annotate_command() {
        let cli = cli(&["mwql", "--no-color", "annotate", "(tag:a"]);
        let command = cli.args().command.as_ref().unwrap();
        let output = cli
            .run_query_command(command, &FieldVocabulary::builtin())
            .unwrap()
            .unwrap();
        assert_eq!(output, "(tag:a\nfield path: -");
    }

    #[test]
    fn test_suggest_command_with_cursor() {
        let cli = cli(&["mwql", "--format", "json", "suggest", "upl AND x:y", "--cursor", "3"]);
        let command = cli.args().command.as_ref().unwrap();
        let vocabulary = FieldVocabulary::new().with_fields(
            ObjectType::Object,
            vec![FieldEntry::new("uploader", "Uploader")],
        );
        let output = cli.run_query_command(command, &vocabulary).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["name"], "uploader");
        assert_eq!(value[0]["object_type"], "object");
    }

    #[test]
    fn test_fields_command_rejects_unknown_type() {
        let cli = cli(&["mwql", "fields", "--object-type", "sample"]);
        let command = cli.args().command.as_ref().unwrap();
        assert!(cli.run_query_command(command, &FieldVocabulary::builtin()).is_err());
    }

    #[test]
    fn test_vocabulary_flag_wins() {
        let path = std::env::temp_dir().join(format!("mwql-cli-vocab-{}.toml", std::process::id()));
        std::fs::write(&path, "[[file]]\nname = \"entropy\"\n").unwrap();

        let mut cli = cli(&["mwql", "--vocabulary", path.to_str().unwrap()]);
        cli.config.vocabulary.file = Some(PathBuf::from("/nonexistent/fields.toml"));
        let vocabulary = cli.load_vocabulary().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(vocabulary.len(), 1);
        assert!(vocabulary.find(ObjectType::File, "entropy").is_some());
    }

    #[test]
    fn test_builtin_vocabulary_by_default() {
        let cli = cli(&["mwql"]);
        let vocabulary = cli.load_vocabulary().unwrap();
        assert_eq!(*vocabulary, FieldVocabulary::builtin());
    }
}
