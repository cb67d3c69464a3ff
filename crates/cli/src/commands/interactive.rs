//! `sleuth interactive`: ask questions in a loop.

use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// What a line of user input asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Clear,
    Skip,
    Query(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Input::Quit,
        "clear" => Input::Clear,
        "" => Input::Skip,
        _ => Input::Query(line),
    }
}

fn prompt() -> std::io::Result<()> {
    print!("\n📝 What can I help you research? (or 'quit' to exit): ");
    std::io::stdout().flush()
}

pub async fn run(max_iterations: Option<u32>, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut agent, config, progress) = super::build_agent(verbose)?;
    let options = super::options(&config, max_iterations, verbose);

    println!();
    println!("{}", "=".repeat(60));
    println!("🔬 Interactive Research Agent");
    println!("{}", "=".repeat(60));
    println!("  Model:    {}", agent.model());
    println!(
        "  Tools:    {}",
        agent.tools().names().into_iter().collect::<Vec<_>>().join(", ")
    );
    println!("  History:  {}", config.history.backend);
    println!("  Type 'clear' to forget previous questions.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        match classify(&line) {
            Input::Quit => break,
            Input::Skip => {}
            Input::Clear => match agent.clear_history().await {
                Ok(()) => println!("🗑️ Conversation history cleared"),
                Err(e) => eprintln!("❌ Error: {e}"),
            },
            Input::Query(query) => {
                println!("\n🚀 Researching: '{query}'...");
                let result = agent.research(query, options).await;
                super::print_result(&result);
            }
        }
        prompt()?;
    }

    progress.finish(agent).await;
    println!("\n👋 Goodbye!");
    Ok(())
}
