//! List the selectable package groups

use anyhow::Result;
use colored::Colorize;
use comfy_table::{
    Cell, Color, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};

use crate::catalog::Catalog;

/// Print the catalog as a table or as JSON
pub fn cmd_groups(catalog: &Catalog, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(catalog.groups())?);
        }
        _ => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("Id").fg(Color::Cyan),
                    Cell::new("Group").fg(Color::Cyan),
                    Cell::new("Packages").fg(Color::Cyan),
                    Cell::new("Description").fg(Color::Cyan),
                ]);

            for group in catalog.groups() {
                table.add_row(vec![
                    Cell::new(&group.id),
                    Cell::new(&group.label),
                    Cell::new(group.packages.join(" ")),
                    Cell::new(&group.description),
                ]);
            }

            println!("{table}");
            println!("{} {} groups", ">".cyan(), catalog.groups().len());
        }
    }

    Ok(())
}
