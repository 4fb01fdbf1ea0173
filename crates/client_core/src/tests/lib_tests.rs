use super::*;
use crate::render::{render_actions, render_results_page, render_scenario};
use action_center::Selection;
use axum::{
    extract::Path,
    http::StatusCode as HttpStatus,
    routing::{get, post},
    Json, Router,
};
use shared::domain::ActionId;
use tokio::net::TcpListener;

fn sample_result(id: &str) -> serde_json::Value {
    serde_json::json!({
        "calculation_id": id,
        "status": "completed",
        "total_co2e": 42000.0,
        "scope_1": 12000.0,
        "scope_2": 10000.0,
        "scope_3": 20000.0,
        "breakdown": { "electricite": 10000.0, "achats": 20000.0, "vehicules": 12000.0 },
        "recommendations": ["Passer à une électricité verte"],
        "benchmark_position": "Bon - au-dessus de la moyenne",
        "intensity_per_employee": 1400.0,
        "calculated_at": "2024-06-01T09:30:00.000001",
        "carbon_efficiency_score": 72.0,
        "sustainability_grade": "B",
        "cost_of_carbon": 4200.0,
        "reduction_potential": { "electricite": 4000.0, "achats": 2300.0 },
        "equivalent_metrics": { "trees_to_plant": 1900.0, "cars_off_road": 9.4 }
    })
}

async fn calculation(Path(id): Path<String>) -> Result<Json<serde_json::Value>, HttpStatus> {
    if id == "known" {
        Ok(Json(sample_result(&id)))
    } else {
        Err(HttpStatus::NOT_FOUND)
    }
}

async fn insights(Path(id): Path<String>) -> Result<Json<serde_json::Value>, HttpStatus> {
    if id == "known" {
        Ok(Json(serde_json::json!({
            "calculation_id": id,
            "ai_insights": {
                "diagnostic": ["Achats dominants"],
                "plan_action": [{"action": "Fournisseurs bas carbone", "impact_co2e": 2300, "cout_estime": "Moyen", "delai": "6 mois"}],
                "strategie_2030": {"objectif": "Réduction 55%", "etapes": ["Phase 1"]},
                "score_maturite": 61
            },
            "generated_at": "2024-06-01T10:00:00"
        })))
    } else {
        Err(HttpStatus::INTERNAL_SERVER_ERROR)
    }
}

async fn calculations() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "calculations": [sample_result("known")],
        "total": 1,
        "limit": 5,
        "offset": 0
    }))
}

async fn spawn_calculation_service() -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/v1/calculation/:id", get(calculation))
        .route("/api/v1/ai-insights/:id", post(insights))
        .route("/api/v1/calculations", get(calculations));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn spawn_actions_server(body: serde_json::Value) -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route(
        "/api/actions",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[test]
fn service_url_is_normalised() {
    let url = parse_service_url(" http://localhost:8001/ ").expect("url");
    assert_eq!(url.as_str(), "http://localhost:8001/");
    assert_eq!(
        endpoint(&url, &["api", "v1", "calculation", "a b"]).as_str(),
        "http://localhost:8001/api/v1/calculation/a%20b"
    );

    let nested = parse_service_url("https://example.org/carbon/").expect("url");
    assert_eq!(
        endpoint(&nested, &["api", "actions"]).as_str(),
        "https://example.org/carbon/api/actions"
    );

    assert!(parse_service_url("ftp://example.org").is_err());
    assert!(parse_service_url("not a url").is_err());
}

#[tokio::test]
async fn fetches_calculation_and_renders_results_page() {
    let base = spawn_calculation_service().await.expect("server");
    let client = CalculationClient::new(&base).expect("client");
    let id = CalculationId::from("known");

    let state = load_results(&client, &id).await;
    let view = state.ready().expect("ready");
    assert_eq!(view.result.total_co2e, 42000.0);
    assert_eq!(view.result.sustainability_grade.as_deref(), Some("B"));

    let page = render_results_page(&state);
    assert!(page.contains("Calculé le 01/06/2024"));
    assert!(page.contains("42 000 kgCO₂e"));
    assert!(page.contains("🛒 Achats"));
    assert!(page.contains("Grade durabilité: B"));
    assert!(page.contains("Aucun insight généré"));
    let achats = page.find("🛒 Achats").expect("achats row");
    let vehicules = page.find("🚗 Véhicules").expect("vehicules row");
    assert!(achats < vehicules, "breakdown is sorted by emissions");
}

#[tokio::test]
async fn not_found_calculation_renders_error_state() {
    let base = spawn_calculation_service().await.expect("server");
    let client = CalculationClient::new(&base).expect("client");

    let err = client
        .fetch_calculation(&CalculationId::from("missing"))
        .await
        .expect_err("should fail");
    assert!(err.is_not_found());

    let state = load_results(&client, &CalculationId::from("missing")).await;
    assert_eq!(state, PageState::NotFound);
    assert_eq!(state.error(), Some(RESULTS_NOT_FOUND));
    assert!(render_results_page(&state).contains("Résultats non trouvés"));
}

#[tokio::test]
async fn unreachable_service_reports_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let client = CalculationClient::new(&format!("http://{addr}")).expect("client");
    let state = load_results(&client, &CalculationId::from("known")).await;
    assert!(matches!(state, PageState::Failed(_)));
    let message = state.error().expect("failed state");
    assert_ne!(message, RESULTS_NOT_FOUND);
    assert!(!message.is_empty());
}

#[tokio::test]
async fn ai_insights_load_and_failures_fall_back_to_none() {
    let base = spawn_calculation_service().await.expect("server");
    let client = CalculationClient::new(&base).expect("client");

    let insights = load_insights(&client, &CalculationId::from("known"))
        .await
        .expect("insights");
    assert_eq!(insights.diagnostic, vec!["Achats dominants".to_string()]);
    assert_eq!(insights.plan_action[0].delai, "6 mois");
    assert!(insights.opportunites.is_empty());

    assert!(load_insights(&client, &CalculationId::from("missing"))
        .await
        .is_none());
}

#[tokio::test]
async fn lists_recent_calculations() {
    let base = spawn_calculation_service().await.expect("server");
    let client = CalculationClient::new(&base).expect("client");
    let list = client.list_calculations(5, 0).await.expect("list");
    assert_eq!(list.total, 1);
    assert_eq!(list.calculations[0].calculation_id.as_str(), "known");
}

#[tokio::test]
async fn missing_actions_field_uses_fallback_catalog() {
    let base = spawn_actions_server(serde_json::json!({})).await.expect("server");
    let client = ActionsClient::new(&base).expect("client");
    let page = ActionsPage::load(&client).await;
    assert_eq!(page.catalog().len(), 6);
}

#[tokio::test]
async fn served_actions_replace_fallback_catalog() {
    let mut action = action_center::ActionCatalog::fallback().into_actions().remove(0);
    action.id = ActionId::from("solar_roof");
    let base = spawn_actions_server(serde_json::json!({ "actions": [action] }))
        .await
        .expect("server");
    let client = ActionsClient::new(&base).expect("client");
    let catalog = client.fetch_actions().await.expect("catalog");
    assert_eq!(catalog.len(), 1);
    assert!(catalog.get(&ActionId::from("solar_roof")).is_some());
}

#[tokio::test]
async fn failed_actions_fetch_leaves_page_empty() {
    let base = spawn_actions_server(serde_json::json!({ "actions": "oops" }))
        .await
        .expect("server");
    let client = ActionsClient::new(&base).expect("client");
    let page = ActionsPage::load(&client).await;
    assert!(page.catalog().is_empty());
    assert!(page.visible().is_empty());
}

#[test]
fn actions_page_selection_drives_scenario_and_export() {
    let mut page = ActionsPage::default();
    assert!(page.run_scenario().is_err());

    assert!(page.toggle("renewable_energy"));
    assert!(page.toggle("energy_efficiency"));
    assert!(page.toggle("remote_work"));
    assert!(!page.toggle("remote_work"));

    let result = page.run_scenario().expect("scenario").clone();
    assert_eq!(result.total_reduction, 21620.0);
    assert_eq!(result.total_cost, 50000.0);

    let summary = render_scenario(&result);
    assert!(summary.contains("21,6t"));
    assert!(summary.contains("50k€"));

    let plan = page.export_plan().expect("plan");
    assert_eq!(plan.actions.len(), 2);

    page.filter = action_center::ActionFilter::new().category_str("energy");
    let listing = render_actions(&page.visible(), &page.selection);
    assert!(listing.starts_with("Centre d'Actions\n2 actions"));
    assert!(listing.contains("[x] #1 Transition vers l'énergie renouvelable"));
    assert!(listing.contains("ROI: 75%"));
    assert!(listing.contains("Analyser le scénario (2)"));
}

#[test]
fn exported_plan_matches_last_analysis_after_toggle() {
    let mut page = ActionsPage::default();
    page.toggle("renewable_energy");
    page.toggle("energy_efficiency");
    page.run_scenario().expect("scenario");

    assert!(!page.toggle("energy_efficiency"));
    let plan = page.export_plan().expect("plan");
    assert_eq!(plan.scenario.total_reduction, 21620.0);
    let plan_ids: Vec<&ActionId> = plan.actions.iter().map(|a| &a.id).collect();
    let scenario_ids: Vec<&ActionId> = plan.scenario.selected_actions.iter().collect();
    assert_eq!(plan_ids, scenario_ids);
    assert_eq!(plan.actions.len(), 2);
}

#[test]
fn empty_listing_uses_singular_count() {
    let listing = render_actions(&[], &Selection::new());
    assert!(listing.contains("0 action\n"));
}
