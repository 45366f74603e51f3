//! Advise command implementation.
//!
//! Forwards a conflicted dataset to the LLM collaborator for human-readable
//! workarounds. Only meaningful when the engine finds no schedule, so that
//! is checked first.

use anyhow::{Context, Result, bail};

use tb_core::{Course, enumerate};
use tb_llm::{Client, ConflictKind};

/// Run the advise command.
pub fn run(courses: &[Course], kind: ConflictKind, model: &str) -> Result<()> {
    let schedules = enumerate(courses);
    if !schedules.is_empty() {
        println!(
            "{} conflict-free schedule(s) exist; nothing to advise. Run 'tb solve' to see them.",
            schedules.len()
        );
        return Ok(());
    }

    let api_key = match std::env::var("ANTHROPIC_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => bail!("Set ANTHROPIC_API_KEY to get LLM-powered scheduling advice"),
    };

    let client = Client::new(api_key).context("failed to build LLM client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    tracing::debug!(%kind, model, "requesting scheduling advice");
    let suggestions = runtime
        .block_on(client.suggest_alternatives(model, courses, kind))
        .context("advice request failed")?;

    if suggestions.is_empty() {
        println!("No suggestions returned.");
    } else {
        for suggestion in &suggestions {
            println!("- {suggestion}");
        }
    }
    Ok(())
}
