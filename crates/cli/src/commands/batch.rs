//! `sleuth batch`: research several queries with one agent.
//!
//! The agent is shared, so later queries see earlier answers as history.

use std::path::PathBuf;

const SUMMARY_PREVIEW_CHARS: usize = 150;

pub async fn run(
    mut queries: Vec<String>,
    file: Option<PathBuf>,
    max_iterations: Option<u32>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = file {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        queries.extend(read_queries(&content));
    }
    queries.retain(|q| !q.trim().is_empty());

    if queries.is_empty() {
        return Err("No queries provided. Pass them as arguments or with --file.".into());
    }

    let (mut agent, config, progress) = super::build_agent(verbose)?;
    let options = super::options(&config, max_iterations, verbose);

    println!("{}", "=".repeat(60));
    println!("Batch Research: {} queries", queries.len());
    println!("{}", "=".repeat(60));

    let mut converged = 0;
    for query in &queries {
        println!("\n📝 Researching: {query}");
        let result = agent.research(query.trim(), options).await;
        if result.converged() {
            converged += 1;
        }
        println!(
            "✅ Summary: {}",
            super::preview(&result.summary, SUMMARY_PREVIEW_CHARS)
        );
    }

    progress.finish(agent).await;
    println!("\n{converged}/{} queries converged", queries.len());
    Ok(())
}

/// One query per line; blank lines and `#` comments are skipped.
fn read_queries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
