//! Load a data directory and summarize the registry it produces.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use content_core::FloorId;
use content_loaders::ContentFactory;

/// Load the data directory and report what registered
#[derive(Parser)]
pub struct Check {
    /// Exit with an error if any manifest entry was rejected
    #[arg(long)]
    strict: bool,
}

impl Check {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        let factory = ContentFactory::new(data_dir);
        let (session, report) = factory
            .build_session()
            .with_context(|| format!("Failed to load content from {}", data_dir.display()))?;
        let registry = session.registry();
        let rooms = registry.rooms();

        println!("{} {}", style("Data Dir:").bold().cyan(), data_dir.display());
        println!("{} {}", style("Accepted:").bold().cyan(), report.accepted);
        println!("{} {}", style("Rejected:").bold().cyan(), report.rejected.len());
        println!();

        println!("{}", style("Tables:").bold().yellow());
        println!("  Characters: {}", registry.characters().len());
        println!("  Items: {}", registry.items().len());
        println!("  Events: {}", registry.events().len());
        println!("  Textures: {}", registry.textures().len());
        println!("  Room definitions: {}", rooms.len());
        println!("  Hall builders: {}", registry.builders().standard_hall_builders().len());
        println!();

        println!("{}", style("Custom Rooms:").bold().yellow());
        for category in rooms.categories().custom() {
            let name = rooms.categories().name(category).unwrap_or("?");
            let copies = rooms.rooms_for_category(category).count();
            println!("  {name} ({category}): {copies} definition(s)");
        }
        println!();

        println!("{}", style("Rooms per Floor:").bold().yellow());
        for floor in FloorId::ALL {
            println!("  {floor}: {}", rooms.rooms_for_floor(floor).count());
        }

        if !report.rejected.is_empty() {
            println!();
            println!("{}", style("Rejections:").bold().red());
            for rejection in &report.rejected {
                println!("  {rejection}");
            }
        }

        if self.strict && !report.is_clean() {
            anyhow::bail!("{} manifest entries were rejected", report.rejected.len());
        }
        Ok(())
    }
}
