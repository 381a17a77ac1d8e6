//! `paperscope show` — Print a day's report.

use chrono::NaiveDate;
use paperscope_cache::StageCache;
use paperscope_config::AppConfig;

pub async fn run(date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let cache = StageCache::new(config.data_dir());

    let date = match date.or_else(|| cache.latest()) {
        Some(d) => d,
        None => return Err("No completed runs yet. Run `paperscope run` first.".into()),
    };

    match cache.load_report(date) {
        Some(report) => {
            print!("{report}");
            if !report.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        None => Err(format!("No report for {date}. Run `paperscope run --date {date}`.").into()),
    }
}
