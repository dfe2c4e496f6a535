use anyhow::Result;
use dialoguer::Select;

use crate::discovery::Country;

/// Prompt for a country; returns an index into `countries`
pub fn select_country(countries: &[Country]) -> Result<usize> {
    println!("\n🌍 Available countries\n");

    let items: Vec<String> =
        countries.iter().map(|c| format!("{}. {}", c.number, c.name)).collect();
    let selection = Select::new()
        .with_prompt("Select a country")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(selection)
}
