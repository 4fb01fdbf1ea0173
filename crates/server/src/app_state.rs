use std::sync::Arc;

use action_center::ActionCatalog;
use client_core::CalculationBackend;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) catalog: ActionCatalog,
    pub(crate) calculations: Arc<dyn CalculationBackend>,
}
