// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use artifact_lint_core::{
    catalog_doctor, exit_code_for_report, load_catalog, render_catalog_text, render_github,
    render_json, render_text, run_lint, Catalog, CatalogError, LintRequest, RealFs,
};
use artifact_lint_model::report_json_schema;
use clap::Parser;
use cli::{CatalogFormatArg, Cli, Command, FormatArg};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: u8 = 2;

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_repo_root(arg: Option<PathBuf>) -> Result<PathBuf, String> {
    match arg {
        Some(path) => Ok(path),
        None => std::env::current_dir()
            .map_err(|err| format!("cannot resolve current directory: {err}")),
    }
}

fn resolve_catalog(repo_root: &Path, path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => {
            tracing::info!(catalog = %path.display(), "loading catalog file");
            load_catalog(&RealFs, repo_root, path)
        }
        None => Catalog::builtin(),
    }
}

fn run(cli: Cli) -> Result<u8, String> {
    let repo_root = resolve_repo_root(cli.repo_root)?;
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");
    match cli.command {
        Command::Check {
            strictness,
            catalog,
            format,
        } => {
            let catalog =
                resolve_catalog(&repo_root, catalog.as_deref()).map_err(|err| err.to_string())?;
            let request = LintRequest {
                repo_root,
                strictness,
            };
            let report = run_lint(&RealFs, &RealFs, &catalog, &request);
            let rendered = match format {
                FormatArg::Text => render_text(&report),
                FormatArg::Github => render_github(&report),
                FormatArg::Json => render_json(&report)?,
            };
            println!("{rendered}");
            Ok(u8::try_from(exit_code_for_report(&report)).unwrap_or(1))
        }
        Command::Catalog { catalog, format } => {
            let catalog =
                resolve_catalog(&repo_root, catalog.as_deref()).map_err(|err| err.to_string())?;
            let rendered = match format {
                CatalogFormatArg::Text => render_catalog_text(&catalog),
                CatalogFormatArg::Json => {
                    serde_json::to_string_pretty(&catalog).map_err(|err| err.to_string())?
                }
            };
            println!("{rendered}");
            Ok(0)
        }
        Command::Doctor { catalog } => {
            let problems = match catalog {
                Some(path) => catalog_doctor(&RealFs, &repo_root, &path),
                None => Catalog::builtin().err().map(|err| err.problems()).unwrap_or_default(),
            };
            if problems.is_empty() {
                println!("catalog ok");
                return Ok(0);
            }
            for problem in &problems {
                println!("error: {problem}");
            }
            println!("catalog has {} problem(s)", problems.len());
            Ok(EXIT_USAGE)
        }
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&report_json_schema())
                .map_err(|err| err.to_string())?;
            println!("{schema}");
            Ok(0)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("artifact-lint: {err}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}
