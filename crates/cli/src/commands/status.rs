//! `paperscope status` — Per-stage cache state for a date.

use chrono::NaiveDate;
use paperscope_cache::StageCache;
use paperscope_config::AppConfig;
use paperscope_core::Stage;

pub async fn run(date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let cache = StageCache::new(config.data_dir());
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    println!("📄 paperscope status — {date}");
    println!("==============================\n");

    for stage in Stage::all() {
        let path = cache.artifact_path(date, stage);
        if path.exists() {
            println!("  {:<8} ✅ {}", stage.as_str(), path.display());
        } else {
            println!("  {:<8} —", stage.as_str());
        }
    }

    println!("\nState: {}", cache.state(date));

    if let Some(latest) = cache.latest() {
        println!("Latest completed date: {latest}");
    } else {
        println!("No completed runs yet");
    }

    Ok(())
}
