use shared::domain::{Action, ScenarioResult};
use thiserror::Error;

use crate::{catalog::ActionCatalog, selection::Selection};

/// Flat investment assumed for every selected action, in euros. Placeholder
/// until per-action costing is available.
pub const PER_ACTION_COST: f64 = 25_000.0;

/// Value of one avoided kg CO2e per year used by the break-even estimate.
const ANNUAL_VALUE_PER_KG: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("select at least one action from the catalog to analyse a scenario")]
    EmptySelection,
}

/// Aggregates the selected actions. Ids not present in the catalog are ignored.
pub fn analyze(
    catalog: &ActionCatalog,
    selection: &Selection,
) -> Result<ScenarioResult, ScenarioError> {
    aggregate(&catalog.resolve(selection))
}

pub fn aggregate(actions: &[&Action]) -> Result<ScenarioResult, ScenarioError> {
    if actions.is_empty() {
        return Err(ScenarioError::EmptySelection);
    }

    let count = actions.len() as f64;
    let total_reduction: f64 = actions.iter().map(|action| action.impact_co2e).sum();
    let feasibility_score =
        actions.iter().map(|action| action.feasibility_score).sum::<f64>() / count;
    let total_cost = count * PER_ACTION_COST;

    Ok(ScenarioResult {
        total_reduction,
        total_cost,
        roi_timeline: roi_months(total_cost, total_reduction),
        feasibility_score,
        selected_actions: actions.iter().map(|action| action.id.clone()).collect(),
    })
}

/// Months to break even, or `None` when nothing is avoided.
pub fn roi_months(total_cost: f64, total_reduction: f64) -> Option<i64> {
    if total_reduction <= 0.0 || !total_reduction.is_finite() {
        return None;
    }
    let months = (total_cost / (total_reduction * ANNUAL_VALUE_PER_KG) * 12.0).round();
    months.is_finite().then_some(months as i64)
}
