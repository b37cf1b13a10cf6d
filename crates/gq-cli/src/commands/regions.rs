use comfy_table::{ContentArrangement, Table};
use gq_core::resolver::suggest_regions;

pub fn run(filter: Option<&str>) -> Result<(), String> {
    let pool = super::load_pool()?;
    let regions = match filter {
        Some(filter) => suggest_regions(pool.regions(), filter, pool.len()),
        None => pool.regions().iter().collect(),
    };

    if regions.is_empty() {
        println!("  No départements found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Code", "Name", "Prefecture"]);
    for region in &regions {
        table.add_row(vec![
            region.code.as_str(),
            region.name.as_str(),
            region.prefecture.as_deref().unwrap_or("-"),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} départements", regions.len());

    Ok(())
}
