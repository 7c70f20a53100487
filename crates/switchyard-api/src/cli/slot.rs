//! Time slot CLI commands: seed, list, book.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use switchyard_infra::sqlite::pool::DatabasePool;
use switchyard_infra::sqlite::seed::{seed_slots, SeedPlan};
use switchyard_types::slot::{SlotId, TimeSlot};

use crate::state::ConcreteSlotService;

/// Seed one day of open slots.
pub async fn seed(pool: &DatabasePool, plan: &SeedPlan, json: bool) -> Result<()> {
    let planned = plan.intervals()?.len();
    let inserted = seed_slots(pool, plan).await?;

    if json {
        let summary = serde_json::json!({
            "date": plan.date,
            "planned": planned,
            "inserted": inserted,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Seeded {} new slot{} for {} ({} already present)",
        style("✓").green().bold(),
        style(inserted).bold(),
        if inserted == 1 { "" } else { "s" },
        style(plan.date).cyan(),
        planned as u64 - inserted
    );
    println!();
    Ok(())
}

/// Table of open slots for one page.
pub async fn list_slots(
    service: &ConcreteSlotService,
    page: u32,
    page_size: u32,
    json: bool,
) -> Result<()> {
    let result = service.list_available(page, page_size).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.slots.is_empty() {
        println!();
        println!(
            "  {} No open slots on page {}. Create some with: {}",
            style("i").blue().bold(),
            page,
            style("swyd seed").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Date").fg(Color::White),
        Cell::new("Start").fg(Color::White),
        Cell::new("End").fg(Color::White),
        Cell::new("Length").fg(Color::White),
    ]);

    for slot in &result.slots {
        table.add_row(vec![
            Cell::new(slot.id).fg(Color::Cyan),
            Cell::new(slot.start_time.format("%Y-%m-%d")),
            Cell::new(slot.start_time.format("%H:%M")).fg(Color::Green),
            Cell::new(slot.end_time.format("%H:%M")),
            Cell::new(format_length(slot)).fg(Color::DarkGrey),
        ]);
    }

    let pagination = &result.pagination;
    println!();
    println!("{table}");
    println!();
    println!(
        "  Page {} of {} {} {} open slot{}",
        style(pagination.page).bold(),
        pagination.total_pages.max(1),
        style("·").dim(),
        style(pagination.total_count).bold(),
        if pagination.total_count == 1 { "" } else { "s" }
    );
    if pagination.has_next {
        println!(
            "  {}",
            style(format!("Next: swyd slots --page {}", pagination.page + 1)).dim()
        );
    }
    println!();

    Ok(())
}

/// Book a slot and print the confirmation.
pub async fn book_slot(
    service: &ConcreteSlotService,
    slot_id: i64,
    email: &str,
    json: bool,
) -> Result<()> {
    let confirmation = service.book(SlotId(slot_id), email).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&confirmation)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("✓").green().bold(),
        confirmation.message
    );
    println!(
        "  {} {} - {}",
        style("When:").bold(),
        confirmation.start_time.format("%Y-%m-%d %H:%M"),
        confirmation.end_time.format("%H:%M UTC")
    );
    println!();
    Ok(())
}

fn format_length(slot: &TimeSlot) -> String {
    let minutes = (slot.end_time - slot.start_time).num_minutes();
    if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{minutes}m")
    }
}
