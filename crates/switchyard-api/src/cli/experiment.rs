//! Experiment CLI commands: assign, list.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::state::ConcreteSelector;

/// Print the variant `user_id` lands in for `experiment`.
pub fn assign(
    selector: &ConcreteSelector,
    experiment: &str,
    user_id: &str,
    json: bool,
) -> Result<()> {
    let assignment = selector.select(experiment, user_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assignment)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} {} {}",
        style(&assignment.user_id).bold(),
        style("→").dim(),
        style(&assignment.variant).green().bold(),
        style(format!("({})", assignment.experiment_name)).dim()
    );
    println!();
    Ok(())
}

/// Table of every configured experiment with its variants' bucket ranges.
///
/// Experiments whose weights do not add up are listed as misconfigured.
pub fn list_experiments(selector: &ConcreteSelector, json: bool) -> Result<()> {
    let names = selector.experiment_names();

    if json {
        let entries: Vec<serde_json::Value> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "experiment": selector.catalog().get(name),
                    "ranges": selector.ranges(name),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if names.is_empty() {
        println!();
        println!(
            "  {} No experiments configured. Add them to {}",
            style("i").blue().bold(),
            style("config/experiments.json").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Experiment").fg(Color::White),
        Cell::new("Variant").fg(Color::White),
        Cell::new("Weight").fg(Color::White),
        Cell::new("Buckets").fg(Color::White),
    ]);

    for name in &names {
        match selector.ranges(name) {
            Some(ranges) => {
                for (i, range) in ranges.iter().enumerate() {
                    let label = if i == 0 { name.to_string() } else { String::new() };
                    table.add_row(vec![
                        Cell::new(label).fg(Color::Cyan),
                        Cell::new(&range.variant),
                        Cell::new(range.weight()),
                        Cell::new(format!("{}..{}", range.start, range.end)).fg(Color::DarkGrey),
                    ]);
                }
            }
            None => {
                table.add_row(vec![
                    Cell::new(name).fg(Color::Cyan),
                    Cell::new("misconfigured").fg(Color::Red),
                    Cell::new("-"),
                    Cell::new("-"),
                ]);
            }
        }
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} experiment{}",
        style(names.len()).bold(),
        if names.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
