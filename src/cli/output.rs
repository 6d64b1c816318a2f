//! CLI output formatting

use crate::fact::{Fact, PublishOutcome};
use crate::phase::ConfigureOutcome;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");

/// Format the result of the configure phase
pub fn format_configure_outcome(outcome: &ConfigureOutcome) -> String {
    match outcome {
        ConfigureOutcome::NoPom => format!("{}{}", INFO, style("No pom.xml, nothing configured").dim()),
        ConfigureOutcome::Configured { pom, pipeline } => format!(
            "{}Configured {} and {}",
            CHECK,
            style(pom.display()).bold(),
            style(pipeline.display()).bold()
        ),
    }
}

/// Format a published fact with its measurements
pub fn format_fact(fact: &Fact, outcome: PublishOutcome) -> String {
    let status = match outcome {
        PublishOutcome::Created => style("created").green(),
        PublishOutcome::AlreadyExisted => style("already existed").yellow(),
    };

    let mut lines = vec![format!(
        "{}Fact {} {} (subject {})",
        CHECK,
        style(fact.name()).bold(),
        status,
        style(&fact.spec.subject.name).cyan()
    )];

    let width = fact
        .spec
        .measurements
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(0);
    for m in &fact.spec.measurements {
        lines.push(format!(
            "  {:width$}  {}",
            m.name,
            style(m.measurement_value).cyan(),
            width = width
        ));
    }
    lines.join("\n")
}

/// Format a failure for display
pub fn format_error(error: &anyhow::Error) -> String {
    let mut message = format!("{}{}", CROSS, style(error).red());
    for cause in error.chain().skip(1) {
        message.push_str(&format!("\n  caused by: {}", cause));
    }
    message
}
