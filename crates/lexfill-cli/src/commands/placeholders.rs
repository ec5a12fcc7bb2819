use anyhow::Result;
use colored::Colorize;
use lexfill_application::FillService;
use std::path::Path;

pub async fn run(service: &FillService, template: &Path) -> Result<()> {
    let placeholders = service.placeholders(template).await?;

    if placeholders.is_empty() {
        println!("{}", "No placeholders found.".bright_black());
        return Ok(());
    }

    println!("📋 {} placeholder(s) in {}:", placeholders.len(), template.display());
    for (index, placeholder) in placeholders.iter().enumerate() {
        println!("  {:>2}. {}  {}", index + 1, placeholder.as_str().bright_cyan(), format!("({})", placeholder.label()).bright_black());
    }
    Ok(())
}
