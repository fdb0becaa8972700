use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(
    name = "cairn",
    about = "cairn: validate and resolve Git refs and commit ranges",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format; defaults to `output` from the config file.
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Config file; defaults to ./cairn.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate and classify ref names
    Check(CheckArgs),
    /// Parse a ref kind name
    Kind(KindArgs),
    /// Build a commit range spec
    Range(RangeArgs),
    /// Resolve a commit range against `git show-ref --head -d` output
    Resolve(ResolveArgs),
    /// Build a tag
    Tag(TagArgs),
    /// Decode and validate a JSON or YAML file
    Decode(DecodeArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(required = true)]
    pub refs: Vec<String>,
}

#[derive(Args)]
pub struct KindArgs {
    pub name: String,
}

#[derive(Args)]
pub struct RangeArgs {
    /// `<from>..<to>`; overrides --from/--to
    pub range: Option<String>,
    #[arg(long)]
    pub from: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub range: RangeArgs,
    /// File holding `git show-ref --head -d` output
    #[arg(long)]
    pub refs: PathBuf,
}

#[derive(Args)]
pub struct TagArgs {
    #[arg(long)]
    pub name: String,
    /// Object the tag ref points at
    #[arg(long)]
    pub object: String,
    /// Peeled commit; defaults to --object
    #[arg(long)]
    pub commit: Option<String>,
    #[arg(short, long)]
    pub annotated: bool,
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum DecodeType {
    Range,
    ResolvedRange,
    Tag,
    RefKind,
}

#[derive(Args)]
pub struct DecodeArgs {
    #[arg(long = "type", value_enum)]
    pub kind: DecodeType,
    pub input: PathBuf,
    /// Treat the input as YAML (implied by a .yaml/.yml extension)
    #[arg(long)]
    pub yaml: bool,
}
