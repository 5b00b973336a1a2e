use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use spsr_graph::{
    config,
    metrics::{CompletionMetric, Lcp, MetricOptions, RougeLcp},
    run,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "spsr-corpus",
    version,
    about = "Build repository-level code completion corpora from an SPSR graph"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a repository, build its graph and write the training corpus
    Build {
        /// Repository root
        repo: PathBuf,

        /// YAML config file (default: $SPSR_CONFIG, then <repo>/spsr.yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory (default: <repo>/spsr_corpus/<timestamp>)
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long)]
        max_depth: Option<usize>,

        #[arg(long)]
        max_children: Option<usize>,

        /// Do not follow type edges into class/struct units
        #[arg(long)]
        no_structs: bool,

        /// Context length budget in characters
        #[arg(long)]
        budget: Option<usize>,

        /// Worker threads (0 = auto)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Score one completion with LCP and ROUGE-LCP
    Score {
        #[arg(long)]
        prediction: String,

        #[arg(long)]
        reference: String,

        #[arg(long, default_value = "false")]
        ignore_case: bool,
    },
}

fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,spsr_graph=info"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Build {
            repo,
            config: config_path,
            out,
            max_depth,
            max_children,
            no_structs,
            budget,
            threads,
        } => {
            let mut cfg = config::load(&repo, config_path.as_deref())?;
            if let Some(v) = max_depth {
                cfg.sampling.max_depth = v;
            }
            if let Some(v) = max_children {
                cfg.sampling.max_children = v;
            }
            if no_structs {
                cfg.sampling.include_structs = false;
            }
            if let Some(v) = budget {
                cfg.sampling.length_budget = v;
            }
            if let Some(v) = threads {
                cfg.threads = v;
            }
            if out.is_some() {
                cfg.output.out_dir = out;
            }

            if cfg.threads > 0 {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(cfg.threads)
                    .build_global()?;
            }

            let summary = run::build_corpus(&repo, &cfg)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Score {
            prediction,
            reference,
            ignore_case,
        } => {
            let options = MetricOptions {
                case_sensitive: !ignore_case,
                ..MetricOptions::default()
            };
            let lcp = Lcp { options };
            let rouge = RougeLcp { options };
            let out = json!({
                "lcp": lcp.score(&prediction, &reference),
                "rouge_lcp": rouge.score(&prediction, &reference),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
