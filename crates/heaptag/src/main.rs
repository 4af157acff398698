use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use heaptag::config::ModelConfig;
use heaptag::dispatch::DispatchTableBuilder;
use heaptag::report::{CatalogReport, CheckReport, ClassifyReport, LookupReport};
use heaptag::standard::{self, OpaqueBehaviors, StandardLayouts, StandardRanges};
use heaptag::{Category, ObjectModel, TagId};

#[derive(Parser)]
#[command(name = "heaptag")]
#[command(about = "Inspect the tagged heap-object model.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Clone, Copy)]
struct ModelArgs {
    /// Append the internal tier (overrides HEAPTAG_INTERNAL_TAGS).
    #[arg(long)]
    internal_tags: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print every tag of the standard catalog with its category.
    Catalog {
        /// Only list kinds of this category (e.g. runtime-kind).
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Classify one tag.
    Classify {
        tag: u32,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Show which operations the dispatch table holds for one tag.
    Lookup {
        tag: u32,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Run the dispatch completeness check for the standard subsystems.
    Check {
        #[command(flatten)]
        model: ModelArgs,
    },
}

fn main() -> std::process::ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::ExitCode::from(2)
        }
    }
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw).ok_or_else(|| {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category {raw:?} (expected one of {})", names.join(", "))
    })
}

fn config_for(args: ModelArgs) -> Result<ModelConfig> {
    if args.internal_tags {
        return Ok(ModelConfig {
            include_internal_tags: true,
        });
    }
    ModelConfig::from_env()
}

fn emit<T: Serialize>(report: &T, ok: bool) -> Result<std::process::ExitCode> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(if ok {
        std::process::ExitCode::SUCCESS
    } else {
        std::process::ExitCode::from(1)
    })
}

fn try_main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Catalog {
            category,
            model: args,
        } => {
            let cfg = config_for(args)?;
            let space = standard::standard_space(cfg.include_internal_tags)
                .context("build standard tag space")?;
            let ranges = StandardRanges::resolve(&space).context("resolve standard ranges")?;
            emit(&CatalogReport::new(&space, Some(&ranges), category), true)
        }
        Cmd::Classify { tag, model: args } => {
            let cfg = config_for(args)?;
            let model = ObjectModel::standard(&cfg).context("build object model")?;
            let tag = TagId::new(tag);
            let category = model.classify(tag).map_err(|e| e.to_string());
            let report = ClassifyReport::new(model.space(), tag, category);
            let ok = report.ok;
            emit(&report, ok)
        }
        Cmd::Lookup { tag, model: args } => {
            let cfg = config_for(args)?;
            let model = ObjectModel::standard(&cfg).context("build object model")?;
            let tag = TagId::new(tag);
            let entry = model.lookup(tag).map_err(|e| e.to_string());
            let report = LookupReport::new(model.space(), tag, entry);
            let ok = report.ok;
            emit(&report, ok)
        }
        Cmd::Check { model: args } => {
            let cfg = config_for(args)?;
            let space = Arc::new(
                standard::standard_space(cfg.include_internal_tags)
                    .context("build standard tag space")?,
            );
            let mut builder = DispatchTableBuilder::new(Arc::clone(&space))?;
            builder.install(&StandardLayouts)?;
            builder.install(&OpaqueBehaviors::new())?;
            let report = CheckReport::new(&space, builder.gaps());
            let ok = report.ok;
            emit(&report, ok)
        }
    }
}
