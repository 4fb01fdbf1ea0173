use serde::{Deserialize, Serialize};
use shared::domain::{Action, ScenarioResult};

use crate::format::{fr_number, kilo_euros, percent, tonnes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanFormat {
    #[default]
    Json,
    Markdown,
}

impl std::str::FromStr for PlanFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(PlanFormat::Json),
            "markdown" | "md" => Ok(PlanFormat::Markdown),
            other => Err(format!("unsupported plan format `{other}`")),
        }
    }
}

/// A scenario together with the actions it was computed from, ready to be
/// handed over as an action plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPlan {
    pub scenario: ScenarioResult,
    pub actions: Vec<Action>,
}

impl ScenarioPlan {
    pub fn new(scenario: ScenarioResult, actions: Vec<Action>) -> Self {
        Self { scenario, actions }
    }

    pub fn render(&self, format: PlanFormat) -> serde_json::Result<String> {
        match format {
            PlanFormat::Json => serde_json::to_string_pretty(self),
            PlanFormat::Markdown => Ok(self.to_markdown()),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Plan d'action carbone\n\n");
        out.push_str("| # | Action | Catégorie | Impact | Investissement | Délai |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for action in &self.actions {
            out.push_str(&format!(
                "| {} | {} | {} | {} CO₂e | {} | {} |\n",
                action.priority_rank,
                action.title,
                action.category.label(),
                tonnes(action.impact_co2e),
                action.cost_estimate,
                action.implementation_time,
            ));
        }

        let scenario = &self.scenario;
        out.push_str("\n## Synthèse\n\n");
        out.push_str(&format!(
            "- Réduction CO₂e totale : {} ({} kg)\n",
            tonnes(scenario.total_reduction),
            fr_number(scenario.total_reduction, 0)
        ));
        out.push_str(&format!(
            "- Investissement total : {}\n",
            kilo_euros(scenario.total_cost)
        ));
        match scenario.roi_timeline {
            Some(months) => out.push_str(&format!("- Mois pour ROI : {months}\n")),
            None => out.push_str("- Mois pour ROI : non calculable\n"),
        }
        out.push_str(&format!(
            "- Faisabilité : {}\n",
            percent(scenario.feasibility_score)
        ));
        out
    }
}
