use std::fmt::Display;
use std::path::Path;

use anyhow::{bail, Context};
use cairn_refs::{InMemoryResolver, RefResolver};
use cairn_types::codec::{self, Format};
use cairn_types::{
    CommitRange, CommitRangeSpec, Hash, Model, RefKind, RefName, Tag, TagName,
};
use colored::Colorize;
use serde::Serialize;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.output);
    match cli.command {
        Command::Check(args) => cmd_check(args, format),
        Command::Kind(args) => cmd_kind(args, format),
        Command::Range(args) => emit(&build_spec(&args, &config)?, format),
        Command::Resolve(args) => cmd_resolve(args, &config, format),
        Command::Tag(args) => emit(&build_tag(args)?, format),
        Command::Decode(args) => cmd_decode(args),
    }
}

/// Print a model value as text (its `Display` form) or encoded.
fn emit<T: Model + Display>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{value}"),
        OutputFormat::Json => println!("{}", codec::to_json_pretty(value)?),
        OutputFormat::Yaml => print!("{}", codec::to_yaml(value)?),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckReport {
    input: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<RefKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn check_ref(input: &str) -> CheckReport {
    match RefName::parse(input) {
        Ok(name) => CheckReport {
            input: input.to_string(),
            valid: true,
            kind: Some(name.kind()),
            error: None,
        },
        Err(e) => CheckReport {
            input: input.to_string(),
            valid: false,
            kind: None,
            error: Some(e.to_string()),
        },
    }
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let reports: Vec<CheckReport> = args.refs.iter().map(|r| check_ref(r)).collect();
    match format {
        OutputFormat::Text => {
            for report in &reports {
                if report.valid {
                    let kind = report.kind.unwrap_or_default();
                    println!("{} {} ({})", "✓".green(), report.input.bold(), kind.to_string().cyan());
                } else {
                    println!("{} {}", "✗".red(), report.error.as_deref().unwrap_or_default());
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&reports)?),
    }
    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        bail!("{failed} of {} refs failed validation", reports.len());
    }
    Ok(())
}

fn cmd_kind(args: KindArgs, format: OutputFormat) -> anyhow::Result<()> {
    let kind = RefKind::parse(&args.name)?;
    match format {
        OutputFormat::Text => println!("{} = {}", kind.to_string().cyan(), kind.as_u8()),
        _ => emit(&kind, format)?,
    }
    Ok(())
}

/// The range from a positional `from..to`, else from flags layered over the
/// configured defaults.
pub fn build_spec(args: &RangeArgs, config: &CliConfig) -> anyhow::Result<CommitRangeSpec> {
    if let Some(range) = &args.range {
        return range
            .parse::<CommitRangeSpec>()
            .with_context(|| format!("invalid range {range:?}"));
    }
    if args.from.is_none() && args.to.is_none() {
        return Ok(config.default_spec()?);
    }
    let from = match &args.from {
        Some(raw) => RefName::parse(raw).context("invalid --from")?,
        None => config.range.from.clone(),
    };
    let to = match &args.to {
        Some(raw) => RefName::parse(raw).context("invalid --to")?,
        None => config.range.to.clone(),
    };
    Ok(CommitRangeSpec::new(from, to)?)
}

fn cmd_resolve(args: ResolveArgs, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let spec = build_spec(&args.range, config)?;
    let dump = std::fs::read_to_string(&args.refs)
        .with_context(|| format!("failed to read {}", args.refs.display()))?;
    let resolver = InMemoryResolver::from_show_ref(&dump)
        .with_context(|| format!("failed to load refs from {}", args.refs.display()))?;
    let range: CommitRange = resolver
        .resolve_range(&spec)
        .with_context(|| format!("failed to resolve {spec}"))?;
    match format {
        OutputFormat::Text => {
            println!("{} {}", "range:".bold(), spec);
            println!("  from: {}", if range.from_beginning() { "(beginning)".dimmed().to_string() } else { range.from.to_string().yellow().to_string() });
            println!("  to:   {}", range.to.to_string().yellow());
            println!("  git:  {}", range.rev_range());
            Ok(())
        }
        _ => emit(&range, format),
    }
}

pub fn build_tag(args: TagArgs) -> anyhow::Result<Tag> {
    let name = TagName::parse(&args.name)?;
    let object = Hash::parse(&args.object).context("invalid --object")?;
    let commit = match &args.commit {
        Some(raw) => Hash::parse(raw).context("invalid --commit")?,
        None => object.clone(),
    };
    Ok(Tag::new(
        name,
        object,
        commit,
        args.annotated,
        args.message.unwrap_or_default(),
    )?)
}

fn input_format(args: &DecodeArgs) -> Format {
    let yaml_ext = matches!(
        args.input.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if args.yaml || yaml_ext {
        Format::Yaml
    } else {
        Format::Json
    }
}

fn decode_file<T: Model + Display>(path: &Path, format: Format) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: T = codec::decode(&text, format)?;
    Ok(value.to_string())
}

fn cmd_decode(args: DecodeArgs) -> anyhow::Result<()> {
    let format = input_format(&args);
    let shown = match args.kind {
        DecodeType::Range => decode_file::<CommitRangeSpec>(&args.input, format)?,
        DecodeType::ResolvedRange => decode_file::<CommitRange>(&args.input, format)?,
        DecodeType::Tag => decode_file::<Tag>(&args.input, format)?,
        DecodeType::RefKind => decode_file::<RefKind>(&args.input, format)?,
    };
    println!("{} {} ({})", "✓".green().bold(), shown, format);
    Ok(())
}
