//! `sleuth config`: show the effective configuration.

use sleuth_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("🔍 Configuration");
    println!(
        "   File:       {}{}",
        config_path.display(),
        if config_path.exists() { "" } else { " (not found, using defaults)" }
    );

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    };

    println!("   API key:    {}", if config.has_api_key() { "set" } else { "missing" });
    println!("   Provider:   {}", config.default_provider);
    println!("   Model:      {}", sleuth_providers::resolve_model(&config));
    println!("   Temp:       {}", config.default_temperature);
    println!("   Max tokens: {}", config.default_max_tokens);
    println!();
    println!("   Research:");
    println!("     max_iterations:            {}", config.research.max_iterations);
    println!("     min_tools_for_convergence: {}", config.research.min_tools_for_convergence);
    println!("     history_window:            {}", config.research.history_window);
    println!();
    println!("   Tools:");
    println!("     search_url: {}", config.tools.search_url);
    println!("     wiki_url:   {}", config.tools.wiki_url);
    println!("     save_path:  {}", config.tools.save_path.display());
    println!();
    println!("   History:    {}", config.history.backend);
    if config.history.backend == "file" {
        println!("     path:     {}", config.history.resolved_path().display());
    }
    if !config.providers.is_empty() {
        let mut names: Vec<_> = config.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        println!("   Providers:  {}", names.join(", "));
    }

    Ok(())
}
