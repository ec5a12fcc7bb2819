use crate::repl::{FillHelper, QUIT_COMMAND, STATUS_COMMAND, TRANSCRIPT_COMMAND, print_entry};
use anyhow::Result;
use colored::Colorize;
use lexfill_application::FillService;
use lexfill_core::session::{SessionController, SessionState};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, Helper};
use std::path::Path;

/// Runs the interactive fill REPL for `template`.
///
/// The session is driven until every placeholder is answered, then the
/// filled document is rendered and written. A failed render is offered again
/// since the completed session is still intact. `/quit` or CTRL-D abandons
/// the session without writing anything.
pub async fn run(
    service: &FillService,
    template: &Path,
    doc_type: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let mut controller = service.start(template, doc_type).await?;

    println!("{}", "=== LEXFILL ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "{} | doc type: {} | {} placeholder(s) | questions: {}",
            template.display(),
            controller.session().doc_type(),
            controller.session().placeholders().len(),
            service.phraser_name()
        )
        .bright_black()
    );
    println!(
        "{}",
        format!("Answer each question, or use {STATUS_COMMAND}, {TRANSCRIPT_COMMAND}, {QUIT_COMMAND}.").bright_black()
    );
    println!();

    let mut printed = print_new_entries(&controller, 0);

    let mut rl = Editor::new()?;
    rl.set_helper(Some(FillHelper::new()));

    while controller.state() == SessionState::Collecting {
        let prompt = controller
            .active_placeholder()
            .map(|placeholder| format!("{} >> ", placeholder.label()))
            .unwrap_or_else(|| ">> ".to_string());

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    QUIT_COMMAND => {
                        println!("{}", "Session abandoned. Nothing was written.".yellow());
                        return Ok(());
                    }
                    STATUS_COMMAND => print_status(&controller),
                    TRANSCRIPT_COMMAND => {
                        for entry in controller.transcript() {
                            print_entry(entry);
                        }
                    }
                    _ if trimmed.starts_with('/') => {
                        println!("{}", format!("Unknown command: {}", trimmed).bright_black());
                    }
                    _ => {
                        let _ = rl.add_history_entry(trimmed);
                        match controller.answer_active(trimmed).await {
                            Ok(_) => printed = print_new_entries(&controller, printed),
                            Err(err) => println!("{}", format!("⚠️  {}", err).yellow()),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", format!("CTRL-C detected. Type '{}' to exit.", QUIT_COMMAND).yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Nothing was written.".bright_green());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }

    let document = loop {
        match controller.render().await {
            Ok(document) => break document.clone(),
            Err(err) => {
                println!("{}", format!("⚠️  {}", err).yellow());
                if !confirm_retry(&mut rl)? {
                    println!("{}", "Session abandoned. Nothing was written.".yellow());
                    return Ok(());
                }
            }
        }
    };
    let path = service.write_document(&document, output).await?;
    println!("{}", format!("📄 Filled document saved to {}", path.display()).bright_green());

    Ok(())
}

fn confirm_retry<H: Helper>(rl: &mut Editor<H, DefaultHistory>) -> Result<bool> {
    match rl.readline("Retry rendering? [Y/n] ") {
        Ok(line) => Ok(wants_retry(&line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Empty input or anything starting with `y` means yes.
fn wants_retry(line: &str) -> bool {
    let answer = line.trim().to_ascii_lowercase();
    answer.is_empty() || answer.starts_with('y')
}

/// Prints transcript entries from index `from` on and returns the new count.
fn print_new_entries(controller: &SessionController, from: usize) -> usize {
    let entries = controller.transcript();
    for entry in entries.iter().skip(from) {
        print_entry(entry);
    }
    entries.len()
}

fn print_status(controller: &SessionController) {
    let session = controller.session();
    println!("{} {}", "state:".bright_black(), session.state());
    if let Some(active) = session.active_placeholder() {
        println!("{} {}", "asking:".bright_black(), active.as_str().bright_cyan());
    }
    println!(
        "{} {} answered, {} remaining",
        "progress:".bright_black(),
        session.answers().len(),
        session.remaining()
    );
}
