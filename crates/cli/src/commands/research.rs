//! `sleuth research`: research one query.

use std::path::PathBuf;

pub async fn run(
    query: String,
    max_iterations: Option<u32>,
    save: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = query.trim();
    if query.is_empty() {
        return Err("No query provided.".into());
    }

    let (mut agent, config, progress) = super::build_agent(verbose)?;

    eprintln!("\n🚀 Researching: '{query}'...");
    let result = agent
        .research(query, super::options(&config, max_iterations, verbose))
        .await;
    progress.finish(agent).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        super::print_result(&result);
    }

    if let Some(path) = save {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, result.to_plain_text()).await?;
        eprintln!("\n💾 Saved to {}", path.display());
    }

    Ok(())
}
