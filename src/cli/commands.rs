//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::pricing::Provider;
use crate::thinking::{ThinkingConfig, ThinkingLevel};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List priced models
    Models {
        /// Only show one vendor's models
        #[arg(long, value_enum)]
        provider: Option<ProviderFilter>,
    },
    /// Estimate the cost of recorded usage reports
    Estimate {
        /// Model to price against (defaults to config default_model)
        #[arg(short, long)]
        model: Option<String>,
        /// Usage report or provider response files (globs allowed)
        #[arg(required = true, value_name = "USAGE")]
        usage: Vec<String>,
    },
    /// Issue a generation request, estimate its cost and record it
    Run(RunArgs),
    /// Show the thinking budget a level maps to for a model
    Budget {
        #[arg(short, long)]
        model: Option<String>,
        #[arg(short, long, value_enum, ignore_case = true)]
        level: ThinkingLevel,
    },
    /// Inspect and maintain a history file
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

#[derive(Args)]
pub(crate) struct RunArgs {
    #[arg(short, long)]
    pub(crate) model: Option<String>,
    #[arg(short, long, default_value = "")]
    pub(crate) prompt: String,
    #[arg(short, long)]
    pub(crate) title: Option<String>,
    /// File to attach (repeatable)
    #[arg(short, long = "attach", value_name = "FILE")]
    pub(crate) attachments: Vec<PathBuf>,
    /// Explicit thinking budget in tokens
    #[arg(long, conflicts_with = "thinking_level")]
    pub(crate) thinking_budget: Option<u32>,
    /// Named thinking level
    #[arg(long, value_enum, ignore_case = true)]
    pub(crate) thinking_level: Option<ThinkingLevel>,
    /// Recorded provider response to replay instead of a live call
    #[arg(long, value_name = "FILE")]
    pub(crate) replay: Option<PathBuf>,
    /// History file to append to (defaults to config history, then the data dir)
    #[arg(long, value_name = "FILE")]
    pub(crate) history: Option<PathBuf>,
}

impl RunArgs {
    pub(crate) fn thinking(&self) -> ThinkingConfig {
        match (self.thinking_budget, self.thinking_level) {
            (Some(budget), _) => ThinkingConfig::Budget { budget },
            (None, Some(level)) => ThinkingConfig::Level { level },
            (None, None) => ThinkingConfig::None,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum HistoryCommands {
    /// List entries, newest first
    List {
        /// History file (defaults to config history, then the data dir)
        file: Option<PathBuf>,
    },
    /// Show one entry by id or id prefix
    Show { file: PathBuf, id: String },
    /// Import an exported history into FILE
    Merge {
        file: PathBuf,
        source: PathBuf,
        /// Discard FILE's entries instead of keeping them after the imported ones
        #[arg(long)]
        replace: bool,
    },
    /// Recompute every estimate with the current catalog
    Reprice { file: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ProviderFilter {
    Google,
    Openai,
    Anthropic,
}

impl From<ProviderFilter> for Provider {
    fn from(filter: ProviderFilter) -> Self {
        match filter {
            ProviderFilter::Google => Provider::Google,
            ProviderFilter::Openai => Provider::Openai,
            ProviderFilter::Anthropic => Provider::Anthropic,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn run_args(args: &[&str]) -> RunArgs {
        let mut full = vec!["mmcost", "run"];
        full.extend_from_slice(args);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Run(run) => run,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn thinking_from_flags() {
        assert_eq!(run_args(&["-p", "x"]).thinking(), ThinkingConfig::None);
        assert_eq!(
            run_args(&["-p", "x", "--thinking-budget", "900"]).thinking(),
            ThinkingConfig::Budget { budget: 900 }
        );
        assert_eq!(
            run_args(&["-p", "x", "--thinking-level", "high"]).thinking(),
            ThinkingConfig::Level {
                level: ThinkingLevel::High
            }
        );
    }

    #[test]
    fn budget_and_level_conflict() {
        let result = Cli::try_parse_from([
            "mmcost",
            "run",
            "--thinking-budget",
            "1",
            "--thinking-level",
            "LOW",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn repeated_attachments() {
        let run = run_args(&["-a", "a.png", "--attach", "b.wav"]);
        assert_eq!(run.attachments.len(), 2);
    }

    #[test]
    fn estimate_requires_usage() {
        assert!(Cli::try_parse_from(["mmcost", "estimate", "-m", "x"]).is_err());
    }
}
