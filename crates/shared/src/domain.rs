use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(ActionId);
id_newtype!(CalculationId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Energy,
    Transport,
    Waste,
    Procurement,
    Operations,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 5] = [
        ActionCategory::Energy,
        ActionCategory::Transport,
        ActionCategory::Waste,
        ActionCategory::Procurement,
        ActionCategory::Operations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionCategory::Energy => "energy",
            ActionCategory::Transport => "transport",
            ActionCategory::Waste => "waste",
            ActionCategory::Procurement => "procurement",
            ActionCategory::Operations => "operations",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionCategory::Energy => "Énergie",
            ActionCategory::Transport => "Transport",
            ActionCategory::Waste => "Déchets",
            ActionCategory::Procurement => "Achats",
            ActionCategory::Operations => "Opérations",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionCategory {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| UnknownVariant(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Low, Complexity::Medium, Complexity::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Complexity::Low => "Facile",
            Complexity::Medium => "Modéré",
            Complexity::High => "Complexe",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| UnknownVariant(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant `{0}`")]
pub struct UnknownVariant(pub String);

/// A recommended reduction action. Loaded once per page view and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub title: String,
    pub description: String,
    pub category: ActionCategory,
    /// Avoided emissions, kg CO2e per year.
    pub impact_co2e: f64,
    /// Display-only investment range, e.g. "5 000 - 15 000 €".
    pub cost_estimate: String,
    pub feasibility_score: f64,
    pub roi_score: f64,
    pub priority_rank: u32,
    pub implementation_time: String,
    pub complexity: Complexity,
    #[serde(default)]
    pub sector_relevance: BTreeSet<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Aggregated projection for a user-selected set of actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub total_reduction: f64,
    pub total_cost: f64,
    /// Months to break even; `None` when the selection avoids no emissions.
    pub roi_timeline: Option<i64>,
    pub feasibility_score: f64,
    pub selected_actions: Vec<ActionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEmission {
    pub month: u32,
    pub emissions: f64,
    pub factor: f64,
}

/// Output of the external calculation service. Advanced KPIs are optional and
/// default to empty values when the service omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub calculation_id: CalculationId,
    pub status: String,
    pub total_co2e: f64,
    pub scope_1: f64,
    pub scope_2: f64,
    pub scope_3: f64,
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub benchmark_position: String,
    #[serde(default)]
    pub intensity_per_employee: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_per_revenue: Option<f64>,
    pub calculated_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_efficiency_score: Option<f64>,
    #[serde(default)]
    pub reduction_potential: BTreeMap<String, f64>,
    #[serde(default)]
    pub trajectory_2030: BTreeMap<String, f64>,
    #[serde(default)]
    pub sustainability_grade: Option<String>,
    #[serde(default)]
    pub cost_of_carbon: Option<f64>,
    #[serde(default)]
    pub equivalent_metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub monthly_breakdown: Vec<MonthlyEmission>,
    #[serde(default)]
    pub peer_comparison: BTreeMap<String, f64>,
    #[serde(default)]
    pub certification_readiness: BTreeMap<String, bool>,
    #[serde(default)]
    pub ai_insights: BTreeMap<String, String>,
}

impl CalculationResult {
    /// Calendar date of `calculated_at`. The service emits either RFC 3339 or a
    /// naive ISO timestamp without offset.
    pub fn calculated_on(&self) -> Option<NaiveDate> {
        let raw = self.calculated_at.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.date_naive());
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(ts.date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    pub fn benchmark_tier(&self) -> BenchmarkTier {
        BenchmarkTier::from_position(&self.benchmark_position)
    }

    pub fn total_reduction_potential(&self) -> f64 {
        self.reduction_potential.values().sum()
    }

    /// Share of `total_co2e`, in percent. Zero when nothing was emitted.
    pub fn share_of_total(&self, emissions: f64) -> f64 {
        if self.total_co2e > 0.0 {
            emissions / self.total_co2e * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkTier {
    Excellent,
    Good,
    Average,
    Poor,
}

impl BenchmarkTier {
    pub fn from_position(position: &str) -> Self {
        if position.contains("Excellent") {
            BenchmarkTier::Excellent
        } else if position.contains("Bon") {
            BenchmarkTier::Good
        } else if position.contains("Moyen") {
            BenchmarkTier::Average
        } else {
            BenchmarkTier::Poor
        }
    }

    pub fn is_favourable(self) -> bool {
        matches!(self, BenchmarkTier::Excellent | BenchmarkTier::Good)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub impact_co2e: f64,
    #[serde(default)]
    pub cout_estime: String,
    #[serde(default)]
    pub delai: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strategy2030 {
    #[serde(default)]
    pub objectif: String,
    #[serde(default)]
    pub etapes: Vec<String>,
}

/// AI-generated commentary for a calculation. Field names follow the service's
/// French JSON contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiInsights {
    #[serde(default)]
    pub diagnostic: Vec<String>,
    #[serde(default)]
    pub plan_action: Vec<PlannedAction>,
    #[serde(default)]
    pub strategie_2030: Strategy2030,
    #[serde(default)]
    pub opportunites: Vec<String>,
    #[serde(default)]
    pub risques: Vec<String>,
    #[serde(default)]
    pub score_maturite: f64,
    #[serde(default)]
    pub prochaines_etapes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Energy".parse::<ActionCategory>(), Ok(ActionCategory::Energy));
        assert_eq!(" waste ".parse::<ActionCategory>(), Ok(ActionCategory::Waste));
        assert!("all".parse::<ActionCategory>().is_err());
    }

    #[test]
    fn calculation_result_accepts_minimal_payload() {
        let raw = serde_json::json!({
            "calculation_id": "abc",
            "status": "completed",
            "total_co2e": 1000.0,
            "scope_1": 100.0,
            "scope_2": 200.0,
            "scope_3": 700.0,
            "calculated_at": "2024-03-05T10:20:30.123456"
        });
        let result: CalculationResult = serde_json::from_value(raw).expect("parse");
        assert!(result.breakdown.is_empty());
        assert!(result.carbon_efficiency_score.is_none());
        assert_eq!(
            result.calculated_on(),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn share_of_total_guards_zero_emissions() {
        let raw = serde_json::json!({
            "calculation_id": "zero",
            "status": "completed",
            "total_co2e": 0.0,
            "scope_1": 0.0,
            "scope_2": 0.0,
            "scope_3": 0.0,
            "calculated_at": "2024-03-05T10:20:30Z"
        });
        let result: CalculationResult = serde_json::from_value(raw).expect("parse");
        assert_eq!(result.share_of_total(50.0), 0.0);
    }

    #[test]
    fn benchmark_tier_follows_position_text() {
        assert_eq!(
            BenchmarkTier::from_position("Excellent - top 10%"),
            BenchmarkTier::Excellent
        );
        assert_eq!(BenchmarkTier::from_position("Bon élève"), BenchmarkTier::Good);
        assert_eq!(
            BenchmarkTier::from_position("Moyen du secteur"),
            BenchmarkTier::Average
        );
        assert_eq!(BenchmarkTier::from_position("À améliorer"), BenchmarkTier::Poor);
    }

    #[test]
    fn ai_insights_defaults_missing_sections() {
        let insights: AiInsights =
            serde_json::from_str(r#"{"diagnostic":["a"],"score_maturite":42}"#).expect("parse");
        assert_eq!(insights.diagnostic, vec!["a".to_string()]);
        assert!(insights.plan_action.is_empty());
        assert_eq!(insights.score_maturite, 42.0);
    }
}
