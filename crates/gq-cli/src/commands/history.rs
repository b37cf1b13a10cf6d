use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use gq_core::HistoryStore;

pub fn run(data_dir: Option<&Path>) -> Result<(), String> {
    let store = HistoryStore::new(super::open_store(data_dir)?);
    let entries = store.load_all();

    if entries.is_empty() {
        println!("  No sessions recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Date", "Mode", "Attempts", "Départements", "Score"]);

    for entry in &entries {
        let stats = entry.stats();
        table.add_row(vec![
            entry.date.format("%Y-%m-%d %H:%M").to_string(),
            entry.mode.to_string(),
            entry.max_guesses.to_string(),
            stats.total.to_string(),
            stats.summary(entry.max_guesses),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        entries.len(),
        if entries.len() == 1 { "" } else { "s" }
    );

    Ok(())
}
