//! Subcommand implementations and the wiring they share.

pub mod batch;
pub mod config_cmd;
pub mod init;
pub mod interactive;
pub mod research;

use sleuth_agent::{ResearchAgent, ResearchOptions};
use sleuth_config::AppConfig;
use sleuth_core::event::{DomainEvent, EventBus};
use sleuth_core::research::ResearchResult;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Providers that run locally and need no API key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama", "vllm", "llamacpp", "llama.cpp"];

/// Load config, check credentials, and assemble a ready-to-use agent.
pub(crate) fn build_agent(
    verbose: bool,
) -> Result<(ResearchAgent, AppConfig, Progress), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early; give a clear error
    if !config.has_api_key() && !KEYLESS_PROVIDERS.contains(&config.default_provider.as_str()) {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export OPENAI_API_KEY='sk-...'");
        eprintln!("    export OPENROUTER_API_KEY='sk-or-v1-...'   (with SLEUTH_PROVIDER=openrouter)");
        eprintln!("    export SLEUTH_API_KEY='...'                 (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = sleuth_providers::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    let model = sleuth_providers::resolve_model(&config);

    let event_bus = Arc::new(EventBus::default());
    let progress = Progress(verbose.then(|| spawn_progress_printer(&event_bus)));

    let agent = ResearchAgent::new(
        provider,
        model,
        config.default_temperature,
        sleuth_tools::default_registry(&config.tools),
        event_bus,
    )
    .with_max_tokens(config.default_max_tokens)
    .with_memory(sleuth_memory::from_config(&config.history))
    .with_settings(config.research.clone());

    Ok((agent, config, progress))
}

/// The verbose progress printer, if one is running.
pub(crate) struct Progress(Option<JoinHandle<()>>);

impl Progress {
    /// Drop the agent, which closes its event bus, and wait until every
    /// queued progress line has been printed.
    pub(crate) async fn finish(self, agent: ResearchAgent) {
        drop(agent);
        if let Some(printer) = self.0 {
            let _ = printer.await;
        }
    }
}

pub(crate) fn options(config: &AppConfig, max_iterations: Option<u32>, verbose: bool) -> ResearchOptions {
    ResearchOptions::new(max_iterations.unwrap_or(config.research.max_iterations)).verbose(verbose)
}

/// Print round-by-round progress to stderr until the bus closes.
fn spawn_progress_printer(bus: &EventBus) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(line) = progress_line(&event) {
                        eprintln!("{line}");
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn progress_line(event: &DomainEvent) -> Option<String> {
    match event {
        DomainEvent::RoundStarted { iteration, .. } => Some(format!("\n🔹 Iteration {iteration}")),
        DomainEvent::ToolExecuted {
            tool_name,
            success,
            duration_ms,
            ..
        } => {
            let mark = if *success { "🔧" } else { "⚠️" };
            Some(format!("{mark} {tool_name} ({duration_ms} ms)"))
        }
        DomainEvent::UnknownToolRequested { tool_name, .. } => {
            Some(format!("❔ Ignoring unknown tool: {tool_name}"))
        }
        DomainEvent::RoundFailed { error_message, .. } => Some(format!("⚠️ Error: {error_message}")),
        DomainEvent::ResearchCompleted {
            outcome, iterations, ..
        } => Some(format!("✅ Research {outcome} after {iterations} iteration(s)")),
        _ => None,
    }
}

/// Human-readable rendering of a result.
pub(crate) fn print_result(result: &ResearchResult) {
    println!();
    println!("{}", "=".repeat(60));
    println!("✅ RESULTS");
    println!("{}", "=".repeat(60));
    println!("\n📌 Topic: {}", result.topic);
    println!("\n📊 Summary:\n{}", result.summary);
    if !result.sources.is_empty() {
        println!("\n🔗 Sources: {}", result.sources.join(", "));
    }
    if !result.tools_used.is_empty() {
        println!("\n🛠️ Tools Used: {}", result.tools_used.join(", "));
    }
    if !result.converged() {
        println!(
            "\n⚠️  Stopped after {} iteration(s) without converging; the summary may be incomplete.",
            result.iterations
        );
    }
}

/// The first `max_chars` characters of `text`, with "..." if cut.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
