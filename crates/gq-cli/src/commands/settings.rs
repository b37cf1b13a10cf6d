use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use gq_core::{GameMode, RegionIdentifiers, Settings};

pub struct SettingsChanges {
    pub attempts: Option<u32>,
    pub mode: Option<GameMode>,
    pub targets: Option<usize>,
    pub ids: Option<String>,
    pub cities: Option<bool>,
    pub regions: Option<bool>,
}

impl SettingsChanges {
    fn is_empty(&self) -> bool {
        self.attempts.is_none()
            && self.mode.is_none()
            && self.targets.is_none()
            && self.ids.is_none()
            && self.cities.is_none()
            && self.regions.is_none()
    }
}

pub fn run(data_dir: Option<&Path>, changes: SettingsChanges) -> Result<(), String> {
    let mut store = super::open_store(data_dir)?;
    let pool_size = super::load_pool()?.len();
    let mut settings = Settings::load(&store);

    if !changes.is_empty() {
        apply(&mut settings, &changes, pool_size).map_err(|e| e.to_string())?;
        settings.save(&mut store).map_err(|e| e.to_string())?;
        println!("  Settings saved.");
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["mode".to_string(), settings.game_mode.to_string()]);
    table.add_row(vec![
        "attempts".to_string(),
        settings.max_guesses.to_string(),
    ]);
    let targets = match settings.number_of_targets {
        Some(n) => n.min(pool_size).to_string(),
        None => format!("all ({pool_size})"),
    };
    table.add_row(vec!["targets".to_string(), targets]);
    table.add_row(vec!["ids".to_string(), ids_list(&settings.ids)]);
    table.add_row(vec![
        "cities".to_string(),
        switch(settings.visibility.cities).to_string(),
    ]);
    table.add_row(vec![
        "regions".to_string(),
        switch(settings.visibility.regions).to_string(),
    ]);
    println!("{table}");

    Ok(())
}

/// Validate every requested change before touching `settings`.
fn apply(
    settings: &mut Settings,
    changes: &SettingsChanges,
    pool_size: usize,
) -> gq_core::QuizResult<()> {
    let attempts = changes
        .attempts
        .map(Settings::validate_max_guesses)
        .transpose()?;
    let targets = changes
        .targets
        .map(|n| Settings::validate_targets(n, pool_size))
        .transpose()?;
    let ids = changes
        .ids
        .as_deref()
        .map(RegionIdentifiers::parse_list)
        .transpose()?;

    if let Some(attempts) = attempts {
        settings.max_guesses = attempts;
    }
    if let Some(targets) = targets {
        settings.number_of_targets = Some(targets);
    }
    if let Some(ids) = ids {
        settings.ids = ids;
    }
    if let Some(mode) = changes.mode {
        settings.game_mode = mode;
    }
    if let Some(cities) = changes.cities {
        settings.visibility.cities = cities;
    }
    if let Some(regions) = changes.regions {
        settings.visibility.regions = regions;
    }
    Ok(())
}

fn ids_list(ids: &RegionIdentifiers) -> String {
    let mut parts = Vec::new();
    if ids.code {
        parts.push("code");
    }
    if ids.name {
        parts.push("nom");
    }
    if ids.prefecture {
        parts.push("prefecture");
    }
    parts.join(",")
}

fn switch(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
