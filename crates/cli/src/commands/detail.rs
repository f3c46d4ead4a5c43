use std::path::Path;

use pantry_core::config::AppConfig;
use pantry_core::ProductId;
use pantry_service::ProductDetail;

use super::{build_runtime, failure_from, CommandResult};

pub async fn run(
    config: &AppConfig,
    product_id: &str,
    history_path: &Path,
    catalog_path: Option<&Path>,
    json: bool,
) -> CommandResult {
    let (service, ledger) = match build_runtime(config, history_path, catalog_path) {
        Ok(parts) => parts,
        Err(error) => return failure_from(&error, json),
    };

    let detail = match service.product_detail(&ledger, &ProductId::from(product_id)).await {
        Ok(detail) => detail,
        Err(error) => return failure_from(&anyhow::Error::new(error), json),
    };

    if json {
        return CommandResult::json(&detail);
    }
    CommandResult::success(render(&detail))
}

fn render(detail: &ProductDetail) -> String {
    let mut lines = Vec::new();
    match detail.metadata.as_ref() {
        Some(metadata) => lines.push(format!("{} ({})", detail.product_id, metadata.title)),
        None => lines.push(detail.product_id.to_string()),
    }

    lines.push(format!("  purchases:     {}", detail.profile.purchase_count));
    lines.push(format!("  median basket: {}", detail.profile.median_quantity));
    if let Some(price) = detail.profile.median_unit_price {
        lines.push(format!("  median price:  {price}"));
    }
    if detail.stats.sample_count > 0 {
        lines.push(format!(
            "  cadence:       every {:.1} days (\u{00b1}{:.1})",
            detail.stats.mean_interval_days, detail.stats.dispersion_days,
        ));
    }
    lines.push(format!("  last purchase: {}", detail.stats.last_purchase_on));

    match &detail.recommendation {
        Some(recommendation) => {
            lines.push(format!(
                "  next due:      {} ({})",
                recommendation.predicted_due_on,
                due_phrase(recommendation.days_until_due),
            ));
            lines.push(format!("  confidence:    {:.2}", recommendation.confidence));
            lines.push(format!("  urgency:       {:.3}", recommendation.urgency));
        }
        None => lines.push("  next due:      not enough history to predict".to_string()),
    }

    lines.push(String::new());
    lines.push(detail.explanation.clone());
    lines.join("\n")
}

fn due_phrase(days_until_due: i64) -> String {
    match days_until_due {
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        days if days < 0 => format!("{} days overdue", -days),
        days => format!("due in {days} days"),
    }
}
