use node_group::{
    group_pairs, load_csv, pairs_from_table, ConfigOverrides, IngestionOptions, NodeGroupConfig,
};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "node-group")]
#[command(about = "Group linked identifiers from a CSV table into entities")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print identity groups as a JSON array of arrays
    Group {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print extracted identifier pairs, one per line
    Pairs {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(ClapArgs)]
struct SourceArgs {
    /// CSV file with a header row; each column is an identifier kind
    csv: PathBuf,

    /// Comma-separated list of columns to use (default: all)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Only use columns whose name matches this regex
    #[arg(long)]
    column_pattern: Option<String>,

    /// JSON config file (or set NODE_GROUP_CONFIG env var)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trim whitespace around column names and values
    #[arg(long)]
    trim: bool,

    /// Lowercase column names before using them as identifier kinds
    #[arg(long)]
    case_insensitive_kinds: bool,

    /// Lowercase cell values
    #[arg(long)]
    case_insensitive_values: bool,

    /// Keep identifiers that never co-occur with another column as singleton groups
    #[arg(long)]
    emit_singletons: bool,
}

impl SourceArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            columns: self.columns.clone(),
            column_pattern: self.column_pattern.clone(),
            trim_whitespace: self.trim,
            case_insensitive_kinds: self.case_insensitive_kinds,
            case_insensitive_values: self.case_insensitive_values,
            emit_singletons: self.emit_singletons,
        }
    }

    /// Config file first, then command-line flags on top
    fn ingestion_options(&self) -> Result<IngestionOptions> {
        let config = NodeGroupConfig::resolve(self.config.as_deref())?;
        Ok(config.apply_overrides(&self.overrides()))
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // stdout carries the result; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Group { source, pretty } => {
            let options = source.ingestion_options()?;
            let df = load_csv(&source.csv)
                .with_context(|| format!("Failed to load {}", source.csv.display()))?;
            let pairs = pairs_from_table(&df, &options)?;
            let groups = group_pairs(&pairs);

            let stats = groups.stats();
            info!(
                "{} identifiers, {} links, {} groups (largest {})",
                stats.identifiers, stats.links, stats.groups, stats.largest_group
            );

            let json = if pretty {
                serde_json::to_string_pretty(&groups)?
            } else {
                serde_json::to_string(&groups)?
            };
            println!("{}", json);
        }
        Commands::Pairs { source } => {
            let options = source.ingestion_options()?;
            let df = load_csv(&source.csv)
                .with_context(|| format!("Failed to load {}", source.csv.display()))?;
            let pairs = pairs_from_table(&df, &options)?;

            let mut out = io::stdout().lock();
            for pair in &pairs {
                writeln!(out, "{}", pair)?;
            }
            out.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_group::CaseMode;
    use std::io::Write;

    fn source(argv: &[&str]) -> SourceArgs {
        match Args::try_parse_from(argv).unwrap().command {
            Commands::Group { source, .. } | Commands::Pairs { source } => source,
        }
    }

    #[test]
    fn test_columns_flag_splits_on_commas() {
        let args = source(&["node-group", "pairs", "ids.csv", "--columns", "email,device_id"]);
        assert_eq!(
            args.overrides().columns,
            Some(vec!["email".to_string(), "device_id".to_string()])
        );
        assert_eq!(args.csv, PathBuf::from("ids.csv"));
    }

    #[test]
    fn test_group_subcommand_flags() {
        let args = Args::try_parse_from([
            "node-group",
            "group",
            "ids.csv",
            "--pretty",
            "--emit-singletons",
            "--case-insensitive-kinds",
        ])
        .unwrap();
        let Commands::Group { source, pretty } = args.command else {
            panic!("expected group subcommand");
        };
        assert!(pretty);

        let overrides = source.overrides();
        assert!(overrides.emit_singletons);
        assert!(overrides.case_insensitive_kinds);
        assert!(!overrides.trim_whitespace);
        assert_eq!(overrides.columns, None);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        config
            .write_all(
                br#"{"canonical": {"value_case": "insensitive"}, "ingestion": {"columns": ["email"]}}"#,
            )
            .unwrap();
        let path = config.path().to_str().unwrap();

        let args = source(&[
            "node-group", "pairs", "ids.csv", "-c", path, "--columns", "cookie,device", "--trim",
        ]);
        let options = args.ingestion_options().unwrap();

        assert_eq!(
            options.columns,
            Some(vec!["cookie".to_string(), "device".to_string()])
        );
        assert!(options.canonical.trim_whitespace);
        assert_eq!(options.canonical.value_case, CaseMode::Insensitive);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let args = source(&["node-group", "pairs", "ids.csv", "--config", "/no/such/config.json"]);
        assert!(args.ingestion_options().is_err());
    }
}
