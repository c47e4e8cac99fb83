// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use artifact_lint_model::Strictness;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "artifact-lint", version, disable_help_subcommand = true)]
#[command(about = "Structural linter for Markdown templates, generated artifacts and agent docs")]
pub struct Cli {
    /// Repository root; defaults to the current directory.
    #[arg(long, global = true)]
    pub repo_root: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate templates, agent links, standards and artifacts.
    Check {
        /// relaxed or standard.
        #[arg(
            long,
            env = "STRICTNESS",
            default_value = "relaxed",
            value_parser = Strictness::parse
        )]
        strictness: Strictness,
        /// TOML catalog replacing the built-in schema table.
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },
    /// Print the effective catalog.
    Catalog {
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = CatalogFormatArg::Text)]
        format: CatalogFormatArg,
    },
    /// Validate a catalog file and list every problem.
    Doctor {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print the JSON schema of the `check --format json` report.
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
    Github,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogFormatArg {
    Text,
    Json,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn check_defaults() {
        let cli = Cli::try_parse_from(["artifact-lint", "check"]).expect("parse");
        match cli.command {
            Command::Check {
                strictness,
                catalog,
                format,
            } => {
                assert_eq!(strictness, Strictness::Relaxed);
                assert!(catalog.is_none());
                assert_eq!(format, FormatArg::Text);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.log_json);
    }

    #[test]
    fn check_accepts_strictness_and_format() {
        let cli = Cli::try_parse_from([
            "artifact-lint",
            "--repo-root",
            "/tmp/repo",
            "check",
            "--strictness",
            "standard",
            "--format",
            "github",
        ])
        .expect("parse");
        assert_eq!(cli.repo_root, Some(PathBuf::from("/tmp/repo")));
        match cli.command {
            Command::Check {
                strictness, format, ..
            } => {
                assert_eq!(strictness, Strictness::Standard);
                assert_eq!(format, FormatArg::Github);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_strictness_is_rejected() {
        let err = Cli::try_parse_from(["artifact-lint", "check", "--strictness", "strict"])
            .expect_err("strict is not a level");
        assert!(err.to_string().contains("expected relaxed or standard"));
    }

    #[test]
    fn strictness_value_is_trimmed() {
        let cli = Cli::try_parse_from(["artifact-lint", "check", "--strictness", " standard "])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Check {
                strictness: Strictness::Standard,
                ..
            }
        ));
    }
}
