//! `vortex-resolve` binary entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vortex_analyzers::{Analyzer, Issue, UnresolvedPlaceholderAnalyzer};
use vortex_cli::error::CliError;
use vortex_cli::{args::Args, env_overlay, output};
use vortex_resolver::{resolve, ResolveOptions, Warning};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::from(error.exit_code() as u8)
        },
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    let overlay = env_overlay::build(
        &args.env.env_files,
        !args.env.no_system_env,
        &args.env.env_overrides,
    )?;

    let options = ResolveOptions {
        project_path: args.project_path.clone(),
        profiles: args.selection.profiles.clone(),
        extra_resource_roots: args.selection.resources.clone(),
        include_test: args.selection.include_test,
        env: overlay,
    };

    tracing::info!(
        project = %args.project_path.display(),
        profiles = ?args.selection.profiles,
        "resolving effective configuration"
    );

    let result = resolve(&options)?;
    report_warnings(&result.warnings);
    report_issues(&UnresolvedPlaceholderAnalyzer.analyze(&result.config, &result.sources));

    let rendered = output::render(&result.config, &result.sources, &args.project_path);
    write_output(args, &result.active_profiles, &rendered)
}

/// Prints accumulated warnings to standard error, grouped by category, per
/// the error-handling design's "accumulate, print at the end" contract.
fn report_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }
    let grouped = vortex_resolver::model::group_warnings(warnings);
    for (category, items) in grouped {
        eprintln!(
            "warning: {} ({} issue{})",
            category.label(),
            items.len(),
            if items.len() == 1 { "" } else { "s" }
        );
        for warning in items {
            eprintln!("  - {}", warning.message);
        }
    }
}

fn write_output(args: &Args, requested_profiles: &[String], rendered: &str) -> Result<(), CliError> {
    if args.output.stdout {
        print!("{rendered}");
        return Ok(());
    }

    std::fs::create_dir_all(&args.output.output_dir).map_err(|source| CliError::OutputDir {
        path: args.output.output_dir.clone(),
        source,
    })?;

    let path = args.output.output_dir.join(default_filename(requested_profiles));
    std::fs::write(&path, rendered).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), "wrote effective configuration");
    Ok(())
}

/// Prints findings from the pluggable post-resolution analyzers. These
/// are observational sinks -- they never affect the exit code, which is
/// driven solely by the resolver's own errors.
fn report_issues(issues: &[Issue]) {
    for issue in issues {
        eprintln!(
            "[{:?}] {} ({}): {}",
            issue.severity, issue.path, issue.rule, issue.message
        );
    }
}

/// `application-<p1>-<p2>-...-computed.yml`, the default output path.
fn default_filename(profiles: &[String]) -> String {
    if profiles.is_empty() {
        "application-computed.yml".to_string()
    } else {
        format!("application-{}-computed.yml", profiles.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filename_joins_profiles() {
        assert_eq!(
            default_filename(&["prod".to_string(), "cloud".to_string()]),
            "application-prod-cloud-computed.yml"
        );
    }

    #[test]
    fn test_default_filename_with_no_profiles() {
        assert_eq!(default_filename(&[]), "application-computed.yml");
    }
}
