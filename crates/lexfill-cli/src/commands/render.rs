use anyhow::Result;
use colored::Colorize;
use lexfill_application::{FillService, load_answers};
use std::path::Path;

pub async fn run(
    service: &FillService,
    template: &Path,
    answers: &Path,
    doc_type: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let answers = load_answers(answers).await?;
    let outcome = service.fill_batch(template, &answers, doc_type).await?;
    let path = service.write_document(&outcome.document, output).await?;

    println!(
        "{}",
        format!(
            "✅ Filled {} placeholder(s), saved to {}",
            outcome.session.snapshot().len(),
            path.display()
        )
        .bright_green()
    );
    Ok(())
}
