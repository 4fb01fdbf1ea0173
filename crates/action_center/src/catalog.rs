use std::{collections::HashSet, fs, path::Path};

use shared::{
    domain::{Action, ActionCategory, ActionId, Complexity},
    protocol::ActionsResponse,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{filter::ActionFilter, selection::Selection};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate action id `{0}` in catalog")]
    DuplicateId(ActionId),
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// The immutable list of recommended actions for a page view.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCatalog {
    actions: Vec<Action>,
}

impl ActionCatalog {
    pub fn from_actions(actions: Vec<Action>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(actions.len());
        for action in &actions {
            if !seen.insert(&action.id) {
                return Err(CatalogError::DuplicateId(action.id.clone()));
            }
        }
        Ok(Self { actions })
    }

    pub fn empty() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    pub fn fallback() -> Self {
        Self {
            actions: fallback_actions(),
        }
    }

    /// Uses the payload's actions, or the fallback list when the field is absent.
    pub fn from_response(response: ActionsResponse) -> Result<Self, CatalogError> {
        match response.actions {
            Some(actions) => Self::from_actions(actions),
            None => {
                info!("actions payload has no `actions` field; using fallback catalog");
                Ok(Self::fallback())
            }
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: display.clone(),
            source,
        })?;
        let response: ActionsResponse =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: display,
                source,
            })?;
        Self::from_response(response)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, id: &ActionId) -> Option<&Action> {
        self.actions.iter().find(|action| &action.id == id)
    }

    pub fn filter(&self, filter: &ActionFilter) -> Vec<Action> {
        filter.apply(&self.actions)
    }

    /// Selected actions in selection order. Ids missing from the catalog are
    /// skipped.
    pub fn resolve(&self, selection: &Selection) -> Vec<&Action> {
        selection
            .ids()
            .iter()
            .filter_map(|id| {
                let action = self.get(id);
                if action.is_none() {
                    warn!(action_id = %id, "selected action is not in the catalog");
                }
                action
            })
            .collect()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

#[allow(clippy::too_many_arguments)]
fn action(
    id: &str,
    title: &str,
    description: &str,
    category: ActionCategory,
    impact_co2e: f64,
    cost_estimate: &str,
    feasibility_score: f64,
    roi_score: f64,
    priority_rank: u32,
    implementation_time: &str,
    complexity: Complexity,
    sector_relevance: &[&str],
    tags: &[&str],
) -> Action {
    Action {
        id: ActionId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        category,
        impact_co2e,
        cost_estimate: cost_estimate.to_string(),
        feasibility_score,
        roi_score,
        priority_rank,
        implementation_time: implementation_time.to_string(),
        complexity,
        sector_relevance: sector_relevance.iter().map(|s| s.to_string()).collect(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
    }
}

fn fallback_actions() -> Vec<Action> {
    vec![
        action(
            "renewable_energy",
            "Transition vers l'énergie renouvelable",
            "Installation de panneaux solaires ou souscription à un contrat d'énergie verte pour réduire les émissions du scope 2",
            ActionCategory::Energy,
            15420.0,
            "25 000 - 50 000 €",
            0.8,
            0.75,
            1,
            "6-12 mois",
            Complexity::Medium,
            &["industrie", "services", "commerce"],
            &["scope2", "économies", "image"],
        ),
        action(
            "electric_vehicles",
            "Électrification de la flotte",
            "Remplacement progressif des véhicules thermiques par des véhicules électriques",
            ActionCategory::Transport,
            8750.0,
            "40 000 - 80 000 €",
            0.6,
            0.65,
            2,
            "12-24 mois",
            Complexity::High,
            &["transport", "services", "commerce"],
            &["scope1", "innovation", "subventions"],
        ),
        action(
            "energy_efficiency",
            "Amélioration de l'efficacité énergétique",
            "Isolation, éclairage LED, équipements performants pour réduire la consommation",
            ActionCategory::Energy,
            6200.0,
            "5 000 - 15 000 €",
            0.9,
            0.85,
            3,
            "3-6 mois",
            Complexity::Low,
            &["industrie", "services", "commerce", "construction"],
            &["scope2", "économies", "facile"],
        ),
        action(
            "remote_work",
            "Développement du télétravail",
            "Politique de télétravail pour réduire les déplacements domicile-travail",
            ActionCategory::Transport,
            4300.0,
            "2 000 - 8 000 €",
            0.95,
            0.9,
            4,
            "1-3 mois",
            Complexity::Low,
            &["services", "technologie"],
            &["scope3", "productivité", "wellbeing"],
        ),
        action(
            "local_sourcing",
            "Approvisionnement local",
            "Privilégier les fournisseurs locaux pour réduire le transport de marchandises",
            ActionCategory::Procurement,
            3800.0,
            "1 000 - 5 000 €",
            0.7,
            0.6,
            5,
            "3-9 mois",
            Complexity::Medium,
            &["commerce", "restauration", "industrie"],
            &["scope3", "local", "supply-chain"],
        ),
        action(
            "waste_reduction",
            "Programme de réduction des déchets",
            "Mise en place du tri sélectif, compostage, et réduction des emballages",
            ActionCategory::Waste,
            2100.0,
            "3 000 - 10 000 €",
            0.85,
            0.55,
            6,
            "2-6 mois",
            Complexity::Low,
            &["services", "commerce", "restauration"],
            &["scope3", "circular-economy", "engagement"],
        ),
    ]
}
