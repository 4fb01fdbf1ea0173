use std::{io::Write, path::PathBuf, process::ExitCode};

use action_center::{format::fr_number, ActionCatalog, ActionFilter, PlanFormat};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_insights, load_results, render, ActionsClient, ActionsPage, CalculationBackend,
    CalculationClient, PageState, ResultsView, DEFAULT_CALCULATION_SERVICE_URL,
};
use shared::domain::CalculationId;

#[derive(Parser, Debug)]
#[command(name = "carbon", about = "Carbon footprint results and action center")]
struct Cli {
    #[arg(long, env = "CALCULATION_SERVICE_URL", default_value = DEFAULT_CALCULATION_SERVICE_URL)]
    calculation_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CatalogSource {
    /// Front server serving `/api/actions`.
    #[arg(long, env = "CARBON_APP_URL", default_value = "http://127.0.0.1:3000")]
    app_url: String,
    /// Use the built-in catalog instead of fetching one.
    #[arg(long)]
    offline: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recommended actions.
    Actions {
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long, default_value = "all")]
        complexity: String,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long = "select", num_args = 1..)]
        selected: Vec<String>,
        #[command(flatten)]
        source: CatalogSource,
    },
    /// Aggregate a set of actions into a scenario.
    Scenario {
        #[arg(required = true)]
        action_ids: Vec<String>,
        #[arg(long)]
        export: Option<PathBuf>,
        #[arg(long, default_value = "markdown")]
        format: PlanFormat,
        #[command(flatten)]
        source: CatalogSource,
    },
    /// Show the results page of a calculation.
    Results { calculation_id: String },
    /// Generate AI insights for a calculation.
    Insights { calculation_id: String },
    /// List recent calculations.
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

async fn load_page(source: &CatalogSource) -> Result<ActionsPage> {
    if source.offline {
        return Ok(ActionsPage::new(ActionCatalog::fallback()));
    }
    let client = ActionsClient::new(&source.app_url)?;
    Ok(ActionsPage::load(&client).await)
}

/// Writes a loaded page to `out` and a failed one to `err`. Returns whether the
/// calculation loaded.
fn write_results_page(
    page: &PageState<ResultsView>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<bool> {
    let text = render::render_results_page(page);
    if page.is_ready() {
        out.write_all(text.as_bytes())?;
        Ok(true)
    } else {
        err.write_all(text.as_bytes())?;
        Ok(false)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Actions {
            category,
            complexity,
            search,
            selected,
            source,
        } => {
            let mut page = load_page(&source).await?;
            page.filter = ActionFilter::new()
                .category_str(&category)
                .complexity_str(&complexity)
                .search(&search);
            page.selection = selected.into_iter().collect();
            print!("{}", render::render_actions(&page.visible(), &page.selection));
            if !page.selection.is_empty() {
                let result = page.run_scenario()?;
                print!("\n{}", render::render_scenario(result));
            }
        }
        Command::Scenario {
            action_ids,
            export,
            format,
            source,
        } => {
            let mut page = load_page(&source).await?;
            page.selection = action_ids.into_iter().collect();
            let result = page.run_scenario()?;
            print!("{}", render::render_scenario(result));

            if let Some(path) = export {
                let plan = page.export_plan().context("no scenario to export")?;
                std::fs::write(&path, plan.render(format)?)
                    .with_context(|| format!("failed to write plan to {}", path.display()))?;
                println!("plan written to {}", path.display());
            }
        }
        Command::Results { calculation_id } => {
            let client = CalculationClient::new(&cli.calculation_url)?;
            let page = load_results(&client, &CalculationId(calculation_id)).await;
            let loaded =
                write_results_page(&page, &mut std::io::stdout(), &mut std::io::stderr())?;
            if !loaded {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Insights { calculation_id } => {
            let client = CalculationClient::new(&cli.calculation_url)?;
            let insights = load_insights(&client, &CalculationId(calculation_id))
                .await
                .context("Erreur lors de la génération des insights IA")?;
            print!("{}", render::render_insights(&insights));
        }
        Command::History { limit, offset } => {
            let client = CalculationClient::new(&cli.calculation_url)?;
            let list = client.list_calculations(limit, offset).await?;
            println!("{} calcul(s) au total", list.total);
            for calc in &list.calculations {
                let date = calc
                    .calculated_on()
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{}  {}  {} kgCO₂e  {}",
                    calc.calculation_id,
                    date,
                    fr_number(calc.total_co2e, 0),
                    calc.sustainability_grade.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_arguments_parse() {
        let cli = Cli::try_parse_from([
            "carbon",
            "scenario",
            "renewable_energy",
            "remote_work",
            "--format",
            "json",
            "--offline",
        ])
        .expect("parse");
        match cli.command {
            Command::Scenario {
                action_ids,
                format,
                source,
                export,
            } => {
                assert_eq!(action_ids, vec!["renewable_energy", "remote_work"]);
                assert_eq!(format, PlanFormat::Json);
                assert!(source.offline);
                assert!(export.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn scenario_requires_action_ids() {
        assert!(Cli::try_parse_from(["carbon", "scenario"]).is_err());
    }

    #[test]
    fn actions_filters_default_to_all() {
        let cli = Cli::try_parse_from(["carbon", "actions", "--offline"]).expect("parse");
        match cli.command {
            Command::Actions {
                category,
                complexity,
                search,
                selected,
                ..
            } => {
                assert_eq!(category, "all");
                assert_eq!(complexity, "all");
                assert!(search.is_empty());
                assert!(selected.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn failed_results_page_is_written_once_to_stderr() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let loaded =
            write_results_page(&PageState::NotFound, &mut out, &mut err).expect("write");
        assert!(!loaded);
        assert!(out.is_empty());
        let text = String::from_utf8(err).expect("utf8");
        assert_eq!(text.matches("Résultats non trouvés").count(), 1);
    }

    #[tokio::test]
    async fn offline_page_uses_builtin_catalog() {
        let page = load_page(&CatalogSource {
            app_url: "http://127.0.0.1:3000".into(),
            offline: true,
        })
        .await
        .expect("page");
        assert_eq!(page.catalog().len(), 6);
    }
}
