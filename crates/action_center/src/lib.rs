//! Recommended-action catalog, filtering and scenario aggregation.

use shared::{
    domain::{Action, ScenarioResult},
    error::{ApiError, ErrorCode},
    protocol::{ActionsQuery, ScenarioRequest},
};

pub mod catalog;
pub mod export;
pub mod filter;
pub mod format;
pub mod scenario;
pub mod selection;

pub use catalog::{ActionCatalog, CatalogError};
pub use export::{PlanFormat, ScenarioPlan};
pub use filter::{ActionFilter, Criterion};
pub use scenario::{analyze, ScenarioError, PER_ACTION_COST};
pub use selection::Selection;

pub fn list_actions(catalog: &ActionCatalog, query: &ActionsQuery) -> Vec<Action> {
    catalog.filter(&ActionFilter::from_query(query))
}

pub fn run_scenario(
    catalog: &ActionCatalog,
    request: &ScenarioRequest,
) -> Result<ScenarioResult, ApiError> {
    let selection: Selection = request.selected_actions.iter().cloned().collect();
    analyze(catalog, &selection).map_err(validation)
}

pub fn build_plan(
    catalog: &ActionCatalog,
    request: &ScenarioRequest,
) -> Result<ScenarioPlan, ApiError> {
    let selection: Selection = request.selected_actions.iter().cloned().collect();
    let actions = catalog.resolve(&selection);
    let scenario = scenario::aggregate(&actions).map_err(validation)?;
    Ok(ScenarioPlan::new(
        scenario,
        actions.into_iter().cloned().collect(),
    ))
}

fn validation(err: ScenarioError) -> ApiError {
    ApiError::new(ErrorCode::Validation, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
