//! Plain-text renderings of the results, insights and action-center pages.

use std::fmt::Write as _;

use action_center::{
    format::{fr_number, kilo_euros, percent, tonnes},
    Selection,
};
use shared::{
    domain::{Action, AiInsights, BenchmarkTier, CalculationResult, ScenarioResult},
    error::RESULTS_NOT_FOUND,
};

use crate::page::{PageState, ResultsView};

const BAR_WIDTH: usize = 30;

pub fn category_label(key: &str) -> &str {
    match key {
        "electricite" => "⚡ Électricité",
        "gaz" => "🔥 Gaz naturel",
        "carburants" => "⛽ Carburants",
        "vehicules" => "🚗 Véhicules",
        "vols_domestiques" => "✈️ Vols domestiques",
        "vols_internationaux" => "🌍 Vols internationaux",
        "achats" => "🛒 Achats",
        other => other,
    }
}

fn bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Entries sorted by value, largest first.
fn sorted_desc(entries: impl IntoIterator<Item = (String, f64)>) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = entries.into_iter().collect();
    entries.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    entries
}

pub fn render_results_page(state: &PageState<ResultsView>) -> String {
    match state {
        PageState::Loading => "Chargement des résultats...\n".to_string(),
        PageState::NotFound => format!("Erreur\n\n{RESULTS_NOT_FOUND}\n"),
        PageState::Failed(message) => format!("Erreur\n\n{message}\n"),
        PageState::Ready(view) => {
            let mut out = render_results(&view.result);
            match &view.insights {
                Some(insights) => out.push_str(&render_insights(insights)),
                None => out.push_str(
                    "\nInsights IA\n  Aucun insight généré pour ce calcul. Lancez la génération pour obtenir une analyse détaillée.\n",
                ),
            }
            out
        }
    }
}

pub fn render_results(result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Résultats de votre Empreinte Carbone");
    if let Some(date) = result.calculated_on() {
        let _ = writeln!(out, "Calculé le {}", date.format("%d/%m/%Y"));
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total      {} kgCO₂e  ({} kgCO₂e/employé)",
        fr_number(result.total_co2e, 0),
        fr_number(result.intensity_per_employee, 1)
    );
    let _ = writeln!(out, "Scope 1    {} kgCO₂e", fr_number(result.scope_1, 0));
    let _ = writeln!(out, "Scope 2    {} kgCO₂e", fr_number(result.scope_2, 0));
    let _ = writeln!(out, "Scope 3    {} kgCO₂e", fr_number(result.scope_3, 0));
    if let Some(per_revenue) = result.intensity_per_revenue {
        let _ = writeln!(out, "Intensité  {} kgCO₂e/k€", fr_number(per_revenue, 2));
    }

    let _ = writeln!(out, "\nRépartition détaillée");
    for (category, emissions) in sorted_desc(result.breakdown.clone()) {
        let share = result.share_of_total(emissions);
        let _ = writeln!(
            out,
            "  {:<24} {} {:>12} kg {:>6}%",
            category_label(&category),
            bar(share),
            fr_number(emissions, 0),
            fr_number(share, 1)
        );
    }

    let _ = writeln!(out, "\nRecommandations IA");
    for (index, recommendation) in result.recommendations.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", index + 1, recommendation);
    }

    let tier = result.benchmark_tier();
    let _ = writeln!(out, "\nPosition sectorielle");
    let _ = writeln!(
        out,
        "  {} {} ({})",
        if tier.is_favourable() { "✔" } else { "⚠" },
        result.benchmark_position,
        benchmark_label(tier)
    );
    let _ = writeln!(
        out,
        "  Votre intensité carbone: {} kgCO₂e par employé",
        fr_number(result.intensity_per_employee, 1)
    );

    if result.carbon_efficiency_score.is_some() {
        render_advanced(&mut out, result);
    }
    out
}

fn render_advanced(out: &mut String, result: &CalculationResult) {
    let score = result.carbon_efficiency_score.unwrap_or_default();
    let _ = writeln!(out, "\nScore d'efficacité carbone");
    let _ = writeln!(out, "  {} {}/100", bar(score), fr_number(score, 0));
    if let Some(grade) = &result.sustainability_grade {
        let _ = writeln!(out, "  Grade durabilité: {grade}");
    }
    if let Some(cost) = result.cost_of_carbon {
        let _ = writeln!(out, "  Coût du carbone: {}", kilo_euros(cost));
    }

    let metric = |key: &str| result.equivalent_metrics.get(key).copied().unwrap_or_default();
    let _ = writeln!(out, "\nÉquivalences Concrètes");
    let _ = writeln!(out, "  Arbres à planter      {}", fr_number(metric("trees_to_plant"), 0));
    let _ = writeln!(out, "  Voitures retirées     {}", fr_number(metric("cars_off_road"), 0));
    let _ = writeln!(out, "  Foyers (énergie/an)   {}", fr_number(metric("homes_energy_year"), 0));
    let _ = writeln!(out, "  Vols Paris–New York   {}", fr_number(metric("flights_paris_ny"), 0));

    let _ = writeln!(out, "\nPotentiel de Réduction");
    for (category, potential) in sorted_desc(result.reduction_potential.clone()) {
        let share = result.share_of_total(potential);
        let _ = writeln!(
            out,
            "  {:<24} {} -{} kg {:>6}%",
            category_label(&category),
            bar(share),
            fr_number(potential, 0),
            fr_number(share, 1)
        );
    }
    let total = result.total_reduction_potential();
    let _ = writeln!(out, "  Total: -{} kgCO₂e", fr_number(total, 0));
    let _ = writeln!(
        out,
        "  Soit {}% de vos émissions actuelles",
        fr_number(result.share_of_total(total), 1)
    );

    if !result.certification_readiness.is_empty() {
        let _ = writeln!(out, "\nPréparation aux certifications");
        for (name, ready) in &result.certification_readiness {
            let _ = writeln!(out, "  {} {name}", if *ready { "✔" } else { "✘" });
        }
    }
}

pub fn render_insights(insights: &AiInsights) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nInsights IA (maturité {}/100)", fr_number(insights.score_maturite, 0));

    let mut section = |title: &str, items: &[String]| {
        if items.is_empty() {
            return;
        }
        let _ = writeln!(out, "\n{title}");
        for item in items {
            let _ = writeln!(out, "  • {item}");
        }
    };
    section("Diagnostic", &insights.diagnostic);
    section("Opportunités", &insights.opportunites);
    section("Risques", &insights.risques);
    section("Prochaines étapes", &insights.prochaines_etapes);

    if !insights.plan_action.is_empty() {
        let _ = writeln!(out, "\nPlan d'action prioritaire");
        for (index, planned) in insights.plan_action.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} (-{} kgCO₂e, {}, {})",
                index + 1,
                planned.action,
                fr_number(planned.impact_co2e, 0),
                planned.cout_estime,
                planned.delai
            );
        }
    }

    let strategy = &insights.strategie_2030;
    if !strategy.objectif.is_empty() || !strategy.etapes.is_empty() {
        let _ = writeln!(out, "\nStratégie 2030: {}", strategy.objectif);
        for step in &strategy.etapes {
            let _ = writeln!(out, "  → {step}");
        }
    }
    out
}

fn render_action_card(out: &mut String, action: &Action, selected: bool) {
    let _ = writeln!(
        out,
        "{} #{} {} [{} · {}]",
        if selected { "[x]" } else { "[ ]" },
        action.priority_rank,
        action.title,
        action.category.label(),
        action.complexity.label()
    );
    let _ = writeln!(out, "    {}", action.description);
    let _ = writeln!(
        out,
        "    {} CO₂e économisé · Investissement {} · ROI: {} · {}",
        tonnes(action.impact_co2e),
        action.cost_estimate,
        percent(action.roi_score),
        action.implementation_time
    );
    if !action.tags.is_empty() {
        let tags: Vec<&str> = action.tags.iter().take(3).map(String::as_str).collect();
        let _ = writeln!(out, "    {}", tags.join(" · "));
    }
}

pub fn render_actions(actions: &[Action], selection: &Selection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Centre d'Actions");
    let _ = writeln!(
        out,
        "{} action{}\n",
        actions.len(),
        if actions.len() > 1 { "s" } else { "" }
    );
    for action in actions {
        render_action_card(&mut out, action, selection.contains(&action.id));
        let _ = writeln!(out);
    }
    if !selection.is_empty() {
        let _ = writeln!(out, "Analyser le scénario ({})", selection.len());
    }
    out
}

pub fn render_scenario(result: &ScenarioResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analyse de Scénario");
    let _ = writeln!(out, "  Réduction CO₂e totale  {}", tonnes(result.total_reduction));
    let _ = writeln!(out, "  Investissement total   {}", kilo_euros(result.total_cost));
    match result.roi_timeline {
        Some(months) => {
            let _ = writeln!(out, "  Mois pour ROI          {months}");
        }
        None => {
            let _ = writeln!(out, "  Mois pour ROI          -");
        }
    }
    let _ = writeln!(out, "  Faisabilité            {}", percent(result.feasibility_score));
    out
}

pub fn benchmark_label(tier: BenchmarkTier) -> &'static str {
    match tier {
        BenchmarkTier::Excellent => "Excellent",
        BenchmarkTier::Good => "Bon",
        BenchmarkTier::Average => "Moyen",
        BenchmarkTier::Poor => "À améliorer",
    }
}
