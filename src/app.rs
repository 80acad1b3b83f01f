use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::cli::{Cli, Commands, HistoryCommands, RunArgs};
use crate::config::Config;
use crate::core::estimate;
use crate::error::AppError;
use crate::history::{History, HistoryEntry, LoadMode, default_history_path, import_json};
use crate::output::{
    EstimateRow, NumberFormat, TableOptions, emit_json, models_json, print_estimate_detail,
    print_estimate_table, print_history_entry, print_history_table, print_models_table,
    print_reprice_summary, reprice_json, select_models,
};
use crate::pricing::{Catalog, CatalogOptions, Provider};
use crate::provider::{Attachment, GenerationRequest, provider_for, read_recording};
use crate::thinking::{ThinkingConfig, ThinkingLevel, budget_for_level};
use crate::utils::expand_patterns;

pub(crate) struct App {
    cli: Cli,
    config: Config,
    table: TableOptions,
}

impl App {
    pub(crate) fn new(cli: Cli, config: Config) -> Result<Self, AppError> {
        let table = TableOptions {
            use_color: cli.use_color(),
            number_format: NumberFormat::from_locale(cli.locale.as_deref())?,
        };
        Ok(Self { cli, config, table })
    }

    pub(crate) fn run(&self) -> Result<(), AppError> {
        match &self.cli.command {
            Commands::Models { provider } => self.models(provider.map(Into::into)),
            Commands::Estimate { model, usage } => self.estimate(model.as_deref(), usage),
            Commands::Run(args) => self.generate(args),
            Commands::Budget { model, level } => self.budget(model.as_deref(), *level),
            Commands::History { command } => self.history(command),
        }
    }

    fn jq(&self) -> Option<&str> {
        self.cli.jq.as_deref()
    }

    fn catalog(&self) -> Result<Catalog, AppError> {
        Catalog::load(&CatalogOptions {
            path: self.cli.catalog.clone(),
            url: self.config.catalog_url.clone(),
            offline: self.cli.offline,
        })
    }

    fn model<'a>(&'a self, arg: Option<&'a str>) -> Result<&'a str, AppError> {
        arg.or(self.config.default_model.as_deref())
            .ok_or(AppError::NoModel)
    }

    fn history_path(&self, arg: Option<&Path>) -> Result<PathBuf, AppError> {
        arg.map(Path::to_path_buf)
            .or_else(|| self.config.history.clone())
            .or_else(default_history_path)
            .ok_or(AppError::NoHistoryPath)
    }

    fn models(&self, provider: Option<Provider>) -> Result<(), AppError> {
        let catalog = self.catalog()?;
        let entries = select_models(catalog.entries(), provider);
        if self.cli.wants_json() {
            return emit_json(&models_json(entries), self.jq());
        }
        print_models_table(&entries, self.table);
        Ok(())
    }

    fn estimate(&self, model: Option<&str>, patterns: &[String]) -> Result<(), AppError> {
        let start = Instant::now();
        let catalog = self.catalog()?;
        let paths = expand_patterns(patterns)?;

        // Collecting into Result keeps argument order and stops at the first failure
        let rows: Vec<EstimateRow> = paths
            .par_iter()
            .map(|path| {
                let response = read_recording(path)?;
                let model = model
                    .map(str::to_string)
                    .or(response.model)
                    .or_else(|| self.config.default_model.clone())
                    .ok_or(AppError::NoModel)?;
                let estimate = estimate(&catalog, &model, &response.usage)?;
                Ok(EstimateRow {
                    source: path.display().to_string(),
                    model,
                    estimate,
                })
            })
            .collect::<Result<_, AppError>>()?;

        tracing::debug!(
            files = rows.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "estimated batch"
        );
        if self.cli.wants_json() {
            return emit_json(&rows, self.jq());
        }
        print_estimate_table(&rows, self.table);
        Ok(())
    }

    fn generate(&self, args: &RunArgs) -> Result<(), AppError> {
        let catalog = self.catalog()?;
        let model = self.model(args.model.as_deref())?;
        let entry = catalog.get(model)?;

        let attachments = args
            .attachments
            .iter()
            .map(|p| Attachment::from_path(p))
            .collect::<Result<Vec<_>, _>>()?;
        let request = GenerationRequest {
            model: model.to_string(),
            prompt: args.prompt.clone(),
            title: args.title.clone(),
            attachments,
            thinking: args.thinking(),
        };
        request.validate()?;

        let budget = request.thinking.directive(entry);
        if request.thinking != ThinkingConfig::None && budget.is_none() {
            tracing::warn!(model, "model does not support thinking; directive dropped");
        }

        let provider = provider_for(entry.provider, args.replay.clone());
        let response = provider.fetch_usage(&request, budget)?;
        let estimate = estimate(&catalog, model, &response.usage)?;

        let path = self.history_path(args.history.as_deref())?;
        let mut history = History::load(&path)?;
        let record = HistoryEntry::new(entry.provider, request, response, estimate);
        history.record(record.clone());
        history.save(&path)?;
        tracing::info!(
            id = %record.id,
            provider = provider.name(),
            path = %path.display(),
            "recorded generation"
        );

        if self.cli.wants_json() {
            return emit_json(&record, self.jq());
        }
        if let Some(text) = &record.result.text {
            println!("{text}");
        }
        print_estimate_detail(model, &record.result.estimate, self.table);
        println!("  recorded {} in {}", record.id, path.display());
        Ok(())
    }

    fn budget(&self, model: Option<&str>, level: ThinkingLevel) -> Result<(), AppError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct BudgetJson<'a> {
            model: &'a str,
            level: &'static str,
            supports_thinking: bool,
            budget: Option<u32>,
        }

        let catalog = self.catalog()?;
        let model = self.model(model)?;
        let entry = catalog.get(model)?;
        let budget = ThinkingConfig::Level { level }.directive(entry);

        if self.cli.wants_json() {
            let out = BudgetJson {
                model,
                level: level.as_str(),
                supports_thinking: entry.supports_thinking,
                budget,
            };
            return emit_json(&out, self.jq());
        }
        match budget {
            Some(tokens) => println!("{model} {}: {tokens} tokens", level.as_str()),
            None => println!(
                "{model} does not support thinking ({} would be {} tokens)",
                level.as_str(),
                budget_for_level(level, entry.is_pro_class())
            ),
        }
        Ok(())
    }

    fn history(&self, command: &HistoryCommands) -> Result<(), AppError> {
        match command {
            HistoryCommands::List { file } => {
                let history = History::load(&self.history_path(file.as_deref())?)?;
                if self.cli.wants_json() {
                    return emit_json(history.entries(), self.jq());
                }
                print_history_table(history.entries(), self.table);
            }
            HistoryCommands::Show { file, id } => {
                let history = History::load(file)?;
                let entry = history.find(id)?;
                if self.cli.wants_json() {
                    return emit_json(entry, self.jq());
                }
                print_history_entry(entry, self.table);
            }
            HistoryCommands::Merge {
                file,
                source,
                replace,
            } => {
                let content = std::fs::read_to_string(source).map_err(|e| AppError::Read {
                    path: source.clone(),
                    source: e,
                })?;
                let loaded = import_json(&content)?;
                let imported = loaded.len();
                let mode = if *replace {
                    LoadMode::Replace
                } else {
                    LoadMode::Append
                };
                let mut history = History::load(file)?;
                history.merge(loaded, mode);
                history.save(file)?;
                tracing::info!(imported, total = history.len(), ?mode, "merged history");
                if self.cli.wants_json() {
                    return emit_json(history.entries(), self.jq());
                }
                println!(
                    "Imported {imported} entries into {} ({} total)",
                    file.display(),
                    history.len()
                );
            }
            HistoryCommands::Reprice { file } => {
                let catalog = self.catalog()?;
                let mut history = History::load(file)?;
                let report = history.reprice(&catalog);
                for (id, model) in &report.unpriced {
                    tracing::warn!(%id, %model, "no price for model, estimate kept");
                }
                history.save(file)?;
                let total = history.total_cost();
                if self.cli.wants_json() {
                    return emit_json(&reprice_json(&report, total), self.jq());
                }
                print_reprice_summary(&report, total, self.table);
            }
        }
        Ok(())
    }
}
