//! clustermatch - Match freshly computed clusters to existing records.

mod files;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use clustermatch::{Overrides, cluster_assignment, cost};
use tracing::info;
use tracing_subscriber::EnvFilter;

use files::SignatureId;

/// Match freshly computed clusters to existing records.
///
/// Reads the clusters currently stored in the system of record (--old) and
/// the result of a new clustering run (--new), pairs them so that existing
/// record ids are kept wherever possible, and prints the matched clusters
/// plus the new clusters that need fresh records.
#[derive(Parser, Debug)]
#[command(name = "clustermatch")]
#[command(about = "Match new clusters to existing records")]
#[command(version)]
struct Args {
    /// Existing clusters (JSON: record id -> signature ids)
    #[arg(long)]
    old: PathBuf,

    /// Newly computed clusters (JSON: label -> signature ids)
    #[arg(long)]
    new: PathBuf,

    /// Signatures claimed by records (JSON: record id -> signature ids)
    #[arg(long)]
    claims: Option<PathBuf>,

    /// Signatures rejected by records (JSON: record id -> signature ids)
    #[arg(long)]
    rejections: Option<PathBuf>,

    /// Cost of pairing a new cluster with a record
    #[arg(long, value_enum, default_value_t = CostKind::Intersection)]
    cost: CostKind,

    /// Output JSON file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

type CostFn = fn(&[SignatureId], &[SignatureId], &[SignatureId], &[SignatureId]) -> f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CostKind {
    /// Every pairing costs the same
    Constant,
    /// Prefer the largest shared set of signatures
    Intersection,
    /// Prefer large overlap, penalize signatures a record would lose
    Overlap,
}

impl CostKind {
    fn function(self) -> CostFn {
        match self {
            Self::Constant => cost::constant,
            Self::Intersection => cost::intersection,
            Self::Overlap => cost::overlap,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let old = files::read_clusters(&args.old)?;
    let new = files::read_clusters(&args.new)?;
    let overrides = Overrides::new()
        .with_claims(files::read_optional(args.claims.as_deref())?)
        .with_rejections(files::read_optional(args.rejections.as_deref())?);

    info!(
        old = old.len(),
        new = new.len(),
        cost = ?args.cost,
        "matching clusters"
    );

    let result = cluster_assignment(&old, &new, args.cost.function(), &overrides)?;
    files::write_assignment(&result, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn parse_defaults() {
        let args = Args::try_parse_from(["clustermatch", "--old", "a.json", "--new", "b.json"]).unwrap();
        assert_eq!(args.cost, CostKind::Intersection);
        assert!(args.claims.is_none());
        assert!(args.output.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn parse_cost_choice() {
        let args = Args::try_parse_from([
            "clustermatch", "--old", "a.json", "--new", "b.json", "--cost", "overlap", "-o", "out.json",
        ])
        .unwrap();
        assert_eq!(args.cost, CostKind::Overlap);
        assert_eq!(args.output, Some(PathBuf::from("out.json")));

        assert!(Args::try_parse_from(["clustermatch", "--old", "a.json"]).is_err());
        assert!(
            Args::try_parse_from(["clustermatch", "--old", "a", "--new", "b", "--cost", "cosine"]).is_err()
        );
    }

    #[test]
    fn run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, json: &str| {
            let path = dir.path().join(name);
            fs::write(&path, json).unwrap();
            path
        };

        let args = Args {
            old: write("old.json", r#"{"1": [1, 2], "2": [3]}"#),
            new: write("new.json", r#"{"a": [1], "b": [2, 3], "c": ["s9"]}"#),
            claims: Some(write("claims.json", r#"{"1": [2]}"#)),
            rejections: None,
            cost: CostKind::Intersection,
            output: Some(dir.path().join("out.json")),
            verbose: false,
        };
        run(&args).unwrap();

        let out: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap()).unwrap();
        assert_eq!(
            out,
            serde_json::json!({"assigned": {"1": [1, 2], "2": [3]}, "unassigned": [["s9"]]})
        );
    }

    #[test]
    fn run_rejects_unknown_claimant() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.json");
        let claims = dir.path().join("claims.json");
        fs::write(&old, r#"{"1": [1]}"#).unwrap();
        fs::write(&claims, r#"{"9": [1]}"#).unwrap();

        let args = Args {
            old: old.clone(),
            new: old,
            claims: Some(claims),
            rejections: None,
            cost: CostKind::Constant,
            output: None,
            verbose: false,
        };
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("unknown old group"));
    }
}
