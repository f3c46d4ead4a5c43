use std::path::Path;

use pantry_core::config::AppConfig;
use pantry_service::RecommendationReport;

use super::{build_runtime, failure_from, CommandResult};

pub async fn run(
    config: &AppConfig,
    history_path: &Path,
    catalog_path: Option<&Path>,
    json: bool,
) -> CommandResult {
    let (service, ledger) = match build_runtime(config, history_path, catalog_path) {
        Ok(parts) => parts,
        Err(error) => return failure_from(&error, json),
    };

    let report = match service.ranked(&ledger).await {
        Ok(report) => report,
        Err(error) => return failure_from(&anyhow::Error::new(error), json),
    };

    if json {
        return CommandResult::json(&report);
    }
    CommandResult::success(render(&report))
}

fn render(report: &RecommendationReport) -> String {
    let mut lines = vec![
        format!(
            "Purchase recommendations generated {}",
            report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        ),
        format!("{} products analyzed, {} ranked", report.analyzed, report.ranked),
    ];

    if report.recommendations.is_empty() {
        lines.push("Nothing to recommend yet: no product has enough history.".to_string());
        return lines.join("\n");
    }

    let id_width = report
        .recommendations
        .iter()
        .map(|item| item.product_id().as_str().len())
        .max()
        .unwrap_or(0)
        .max("product".len());

    lines.push(String::new());
    lines.push(format!(
        "{:>3}  {:<id_width$}  {:<10}  {:>5}  {:>10}  {:>8}  {}",
        "#", "product", "due", "days", "confidence", "urgency", "title",
    ));
    for (position, item) in report.recommendations.iter().enumerate() {
        let recommendation = &item.recommendation;
        lines.push(format!(
            "{:>3}  {:<id_width$}  {:<10}  {:>5}  {:>10.2}  {:>8.3}  {}",
            position + 1,
            recommendation.product_id.as_str(),
            recommendation.predicted_due_on.to_string(),
            recommendation.days_until_due,
            recommendation.confidence,
            recommendation.urgency,
            item.metadata.as_ref().map_or("-", |metadata| metadata.title.as_str()),
        ));
    }

    lines.join("\n")
}
