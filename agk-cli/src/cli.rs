use agk_telemetry::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "agk")]
#[command(author, version, about = "Generate multi-agent Go projects for AgenticGoKit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log output format
    #[arg(long, value_enum, global = true, default_value = "console")]
    pub log_format: CliLogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliLogFormat {
    Console,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(cli: CliLogFormat) -> Self {
        match cli {
            CliLogFormat::Console => LogFormat::Console,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a project from a configuration file
    Create {
        /// Project configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory the project directory is created in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Override the project name from the configuration
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Check a configuration file without writing anything
    Validate {
        /// Project configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Print the sanitized configuration as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the known embedding models
    Models {
        /// Only show models for this provider
        #[arg(short, long)]
        provider: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from(["agk", "create", "--config", "demo.toml", "-o", "out"]).unwrap();
        match cli.command {
            Commands::Create { config, output, name } => {
                assert_eq!(config, PathBuf::from("demo.toml"));
                assert_eq!(output, PathBuf::from("out"));
                assert!(name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(matches!(cli.log_format, CliLogFormat::Console));
    }

    #[test]
    fn test_global_log_format() {
        let cli = Cli::try_parse_from(["agk", "models", "--log-format", "json"]).unwrap();
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Json);
    }

    #[test]
    fn test_create_requires_config() {
        assert!(Cli::try_parse_from(["agk", "create"]).is_err());
    }
}
