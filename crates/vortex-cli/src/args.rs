//! Command-line surface for `vortex-resolve`.
//!
//! Grouped the way a single-verb CLI groups its flags: one struct per
//! logical concern (selection, environment ingestion, output) flattened
//! into a single top-level [`Args`], following the derive-heavy style used
//! for CLI argument structs elsewhere in this workspace's history.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser};

/// Resolves the effective configuration a Spring-Boot-style application
/// would observe at runtime for a given set of active profiles.
#[derive(Debug, Parser)]
#[command(name = "vortex-resolve", author, version, about, long_about = None)]
pub struct Args {
    /// Root of the project to resolve (contains `src/main/resources`).
    pub project_path: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub env: EnvArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Increase log verbosity, for debugging. Supports up to -vvv.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Flags selecting which profiles are active and which resource roots
/// contribute documents.
#[derive(Debug, ClapArgs)]
pub struct SelectionArgs {
    /// Comma-separated list of requested profile names, in activation order.
    #[arg(short = 'p', long, value_delimiter = ',', required = true)]
    pub profiles: Vec<String>,

    /// Comma-separated list of extra main-resource roots, applied after the
    /// conventional `src/main/resources` root.
    #[arg(short = 'r', long = "resources", value_delimiter = ',')]
    pub resources: Vec<PathBuf>,

    /// Also load `src/test/resources`, applied last.
    #[arg(short = 't', long = "include-test")]
    pub include_test: bool,
}

/// Flags controlling how the environment overlay is built.
#[derive(Debug, ClapArgs)]
pub struct EnvArgs {
    /// Path(s) to `KEY=VAL` env files; later files win over earlier ones.
    #[arg(long = "env-file")]
    pub env_files: Vec<PathBuf>,

    /// Explicit `KEY=VAL` override, repeatable; wins over env files and the
    /// process environment.
    #[arg(long = "env", value_name = "KEY=VAL")]
    pub env_overrides: Vec<String>,

    /// Ignore the process environment entirely.
    #[arg(long = "no-system-env")]
    pub no_system_env: bool,
}

/// Flags controlling where the annotated result is written.
#[derive(Debug, ClapArgs)]
pub struct OutputArgs {
    /// Output directory for the resolved configuration file.
    #[arg(short = 'o', long = "output", default_value = ".computed")]
    pub output_dir: PathBuf,

    /// Write to standard output instead of a file.
    #[arg(long)]
    pub stdout: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_minimal_invocation() {
        let args = Args::parse_from(["vortex-resolve", "/tmp/project", "-p", "prod"]);
        assert_eq!(args.project_path, PathBuf::from("/tmp/project"));
        assert_eq!(args.selection.profiles, vec!["prod".to_string()]);
        assert_eq!(args.output.output_dir, PathBuf::from(".computed"));
        assert!(!args.output.stdout);
    }

    #[test]
    fn test_parses_comma_separated_profiles_and_resources() {
        let args = Args::parse_from([
            "vortex-resolve",
            ".",
            "-p",
            "prod,cloud",
            "-r",
            "config/extra,config/override",
            "-t",
        ]);
        assert_eq!(
            args.selection.profiles,
            vec!["prod".to_string(), "cloud".to_string()]
        );
        assert_eq!(
            args.selection.resources,
            vec![PathBuf::from("config/extra"), PathBuf::from("config/override")]
        );
        assert!(args.selection.include_test);
    }

    #[test]
    fn test_repeatable_env_override() {
        let args = Args::parse_from([
            "vortex-resolve",
            ".",
            "-p",
            "dev",
            "--env",
            "FOO=bar",
            "--env",
            "BAZ=qux",
        ]);
        assert_eq!(
            args.env.env_overrides,
            vec!["FOO=bar".to_string(), "BAZ=qux".to_string()]
        );
    }

    #[test]
    fn test_verbose_count() {
        let args = Args::parse_from(["vortex-resolve", ".", "-p", "dev", "-vv"]);
        assert_eq!(args.verbose, 2);
    }
}
