//! `paperscope init` — First-time setup.

use paperscope_config::AppConfig;
use paperscope_pipeline::prompt;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("📄 paperscope — First-Time Setup");
    println!("================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !config_path.exists() {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml");
    } else {
        println!("  config.toml exists, leaving it alone");
    }

    let interests_path = config_dir.join("research_interests.md");
    if !interests_path.exists() {
        std::fs::write(&interests_path, AppConfig::default_interests())?;
        println!("✅ Created research_interests.md");
    } else {
        println!("  research_interests.md exists, leaving it alone");
    }

    // Editable copies of the prompt templates; `run` prefers these over the
    // embedded defaults.
    let prompts_dir = config_dir.join("prompts");
    std::fs::create_dir_all(&prompts_dir)?;
    for (file, default) in [
        ("title_filter.md", prompt::TITLE_FILTER_TEMPLATE),
        ("abstract_review.md", prompt::ABSTRACT_REVIEW_TEMPLATE),
    ] {
        let path = prompts_dir.join(file);
        if !path.exists() {
            std::fs::write(&path, default)?;
            println!("✅ Created prompts/{file}");
        } else {
            println!("  prompts/{file} exists, leaving it alone");
        }
    }

    println!("\nNext steps:");
    println!("  1. Edit {} with your actual interests", interests_path.display());
    println!("  2. Pick your arXiv categories in {}", config_path.display());
    println!("  3. Export an API key (PAPERSCOPE_API_KEY or OPENROUTER_API_KEY)");
    println!("  4. Run `paperscope run`");

    Ok(())
}
