use serde::{Deserialize, Serialize};

use crate::domain::{Action, ActionId, AiInsights, CalculationId, CalculationResult};

/// Body of `GET /api/actions`. A missing `actions` field means the caller
/// should use its built-in fallback catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioRequest {
    #[serde(default)]
    pub selected_actions: Vec<ActionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInsightsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_id: Option<CalculationId>,
    pub ai_insights: AiInsights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

/// Page of `GET /api/v1/calculations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationList {
    #[serde(default)]
    pub calculations: Vec<CalculationResult>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}
