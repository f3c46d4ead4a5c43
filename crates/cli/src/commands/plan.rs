use std::path::Path;

use pantry_core::config::AppConfig;
use pantry_core::UrgencyLevel;
use pantry_service::{ShoppingItem, ShoppingList};

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

    let list = match service.shopping_list(&ledger).await {
        Ok(list) => list,
        Err(error) => return failure_from(&anyhow::Error::new(error), json),
    };

    if json {
        return CommandResult::json(&list);
    }
    CommandResult::success(render(&list))
}

fn render(list: &ShoppingList) -> String {
    let mut lines = vec![format!(
        "Shopping list for the next {} days (generated {})",
        list.planning_horizon_days,
        list.generated_at.format("%Y-%m-%d"),
    )];

    if list.items.is_empty() {
        lines.push("Nothing needs buying within the horizon.".to_string());
        return lines.join("\n");
    }

    let id_width = list
        .items
        .iter()
        .map(|item| item.product_id.as_str().len())
        .max()
        .unwrap_or(0);

    for (level, heading) in [(UrgencyLevel::Needed, "NEEDED"), (UrgencyLevel::Soon, "SOON")] {
        let tier: Vec<&ShoppingItem> =
            list.items.iter().filter(|item| item.urgency == level).collect();
        if tier.is_empty() {
            continue;
        }

        lines.push(String::new());
        lines.push(heading.to_string());
        for item in tier {
            let cost = item
                .estimated_cost
                .map_or_else(|| "-".to_string(), |cost| cost.to_string());
            lines.push(format!(
                "  {:<id_width$}  x{:<2}  {:<16}  {:>8}  {}",
                item.product_id.as_str(),
                item.suggested_quantity,
                due_phrase(item.days_until_due),
                cost,
                item.metadata.as_ref().map_or("-", |metadata| metadata.title.as_str()),
            ));
        }
    }

    if let Some(total) = list.estimated_total {
        lines.push(String::new());
        lines.push(format!("estimated total for needed items: {total}"));
    }

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
