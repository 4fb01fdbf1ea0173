//! Page-level state: what a results or actions view holds between the fetch
//! and the render.

use action_center::{ActionCatalog, ActionFilter, ScenarioError, ScenarioPlan, Selection};
use shared::domain::{Action, ActionId, AiInsights, CalculationId, CalculationResult, ScenarioResult};
use shared::error::RESULTS_NOT_FOUND;
use tracing::{error, warn};

use crate::{ActionsClient, CalculationBackend, FetchError};

#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    /// The calculation service answered with a non-success status.
    NotFound,
    Failed(String),
    Ready(T),
}

impl<T> PageState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PageState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::NotFound => Some(RESULTS_NOT_FOUND),
            PageState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A loaded calculation plus the optional AI commentary requested for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub result: CalculationResult,
    pub insights: Option<AiInsights>,
}

impl ResultsView {
    pub fn new(result: CalculationResult) -> Self {
        Self {
            result,
            insights: None,
        }
    }
}

pub async fn load_results(
    backend: &dyn CalculationBackend,
    id: &CalculationId,
) -> PageState<ResultsView> {
    match backend.fetch_calculation(id).await {
        Ok(result) => PageState::Ready(ResultsView::new(result)),
        Err(err) => {
            warn!(calculation_id = %id, error = %err, "failed to load calculation");
            match err {
                FetchError::Status { .. } => PageState::NotFound,
                other => PageState::Failed(other.user_message()),
            }
        }
    }
}

/// Requests AI insights. Failures are logged and leave the view in its empty
/// state.
pub async fn load_insights(
    backend: &dyn CalculationBackend,
    id: &CalculationId,
) -> Option<AiInsights> {
    match backend.generate_ai_insights(id).await {
        Ok(insights) => Some(insights),
        Err(err) => {
            error!(calculation_id = %id, error = %err, "failed to generate ai insights");
            None
        }
    }
}

/// The action center: catalog, filter criteria, current selection and the
/// last scenario analysis.
#[derive(Debug, Clone, Default)]
pub struct ActionsPage {
    catalog: ActionCatalog,
    pub filter: ActionFilter,
    pub selection: Selection,
    scenario: Option<ScenarioResult>,
}

impl ActionsPage {
    pub fn new(catalog: ActionCatalog) -> Self {
        Self {
            catalog,
            filter: ActionFilter::new(),
            selection: Selection::new(),
            scenario: None,
        }
    }

    /// Fetches the catalog once. A failed fetch is logged and leaves the page
    /// with no actions.
    pub async fn load(client: &ActionsClient) -> Self {
        match client.fetch_actions().await {
            Ok(catalog) => Self::new(catalog),
            Err(err) => {
                error!(error = %err, "error fetching actions");
                Self::new(ActionCatalog::empty())
            }
        }
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn visible(&self) -> Vec<Action> {
        self.catalog.filter(&self.filter)
    }

    pub fn toggle(&mut self, id: impl Into<ActionId>) -> bool {
        self.selection.toggle(id)
    }

    /// Recomputes the scenario for the current selection.
    pub fn run_scenario(&mut self) -> Result<&ScenarioResult, ScenarioError> {
        let result = action_center::analyze(&self.catalog, &self.selection)?;
        Ok(self.scenario.insert(result))
    }

    pub fn export_plan(&self) -> Option<ScenarioPlan> {
        let scenario = self.scenario.clone()?;
        let actions = scenario
            .selected_actions
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .cloned()
            .collect();
        Some(ScenarioPlan::new(scenario, actions))
    }
}
