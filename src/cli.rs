//! CLI argument parsing module for modup

use crate::scan::{AuxiliaryMode, DEFAULT_CONCURRENCY};
use crate::select::{FilterPolicy, DEFAULT_PAGE_SIZE};
use clap::Parser;
use std::path::PathBuf;

/// Parse a count that must be at least 1
fn parse_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if value == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(value)
}

/// Interactive Go module upgrader
#[derive(Parser, Debug, Clone)]
#[command(
    name = "modup",
    version,
    about = "Find, review and apply Go module upgrades"
)]
pub struct CliArgs {
    /// Module directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Discovery options
    /// Number of concurrent update lookups
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_positive)]
    pub parallel: usize,

    /// Also offer indirect dependencies
    #[arg(long)]
    pub indirect: bool,

    /// Skip `go tool` dependencies
    #[arg(long)]
    pub no_tools: bool,

    /// Scheduling of tool dependency lookups
    #[arg(long, value_enum, default_value_t = AuxiliaryMode::Batched)]
    pub aux_mode: AuxiliaryMode,

    // Review options
    /// Update every available module without asking
    #[arg(long)]
    pub force: bool,

    /// Rows per page in the review list
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_positive)]
    pub pagesize: usize,

    /// What the review filter matches against
    #[arg(long, value_enum, default_value_t = FilterPolicy::StripDomain)]
    pub filter_mode: FilterPolicy,

    // Apply options
    /// Show what would be updated without running `go get`
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Number of concurrent upgrades (1 applies them in order)
    #[arg(long, default_value_t = 1, value_parser = parse_positive)]
    pub apply_parallel: usize,

    /// Executable run as `<hook> <module> <from> <to>` after each upgrade
    #[arg(long, value_name = "EXE")]
    pub hook: Option<PathBuf>,

    // Output options
    /// Output the summary in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - errors only
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["modup"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.parallel, 10);
        assert_eq!(args.pagesize, 12);
        assert_eq!(args.apply_parallel, 1);
        assert_eq!(args.aux_mode, AuxiliaryMode::Batched);
        assert_eq!(args.filter_mode, FilterPolicy::StripDomain);
        assert!(!args.force);
        assert!(!args.dry_run);
        assert!(!args.indirect);
        assert!(!args.no_tools);
        assert!(args.hook.is_none());
        assert!(!args.json);
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["modup", "/some/path"]);
        assert_eq!(args.path, PathBuf::from("/some/path"));
    }

    #[test]
    fn test_parallel_flags() {
        let args = CliArgs::parse_from(["modup", "-p", "3"]);
        assert_eq!(args.parallel, 3);
        let args = CliArgs::parse_from(["modup", "--parallel", "25"]);
        assert_eq!(args.parallel, 25);
    }

    #[test]
    fn test_zero_counts_rejected() {
        assert!(CliArgs::try_parse_from(["modup", "-p", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["modup", "--pagesize", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["modup", "--apply-parallel", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["modup", "-p", "many"]).is_err());
    }

    #[test]
    fn test_dry_run_short_flag() {
        let args = CliArgs::parse_from(["modup", "-n"]);
        assert!(args.dry_run);
    }

    #[test]
    fn test_value_enums() {
        let args = CliArgs::parse_from([
            "modup",
            "--filter-mode",
            "full",
            "--aux-mode",
            "unbatched",
        ]);
        assert_eq!(args.filter_mode, FilterPolicy::Full);
        assert_eq!(args.aux_mode, AuxiliaryMode::Unbatched);
        assert!(CliArgs::try_parse_from(["modup", "--filter-mode", "fuzzy"]).is_err());
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "modup",
            "./svc",
            "--force",
            "--hook",
            "./notify.sh",
            "--indirect",
            "--no-tools",
            "--json",
            "-q",
        ]);
        assert_eq!(args.path, PathBuf::from("./svc"));
        assert!(args.force);
        assert_eq!(args.hook, Some(PathBuf::from("./notify.sh")));
        assert!(args.indirect);
        assert!(args.no_tools);
        assert!(args.json);
        assert!(args.quiet);
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("1").unwrap(), 1);
        assert_eq!(parse_positive(" 12 ").unwrap(), 12);
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-1").is_err());
        assert!(parse_positive("").is_err());
    }
}
