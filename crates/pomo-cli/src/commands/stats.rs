use chrono::Local;
use clap::Args;
use pomo_core::stats::{fetch_report, format_compact, today_work, StatsReport, MAX_HEATMAP_MONTHS};
use pomo_core::{Config, Database, StatsError};

#[derive(Args)]
pub struct StatsArgs {
    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
    /// Whole months before the current one to include in the monthly series
    #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_HEATMAP_MONTHS)))]
    months: Option<u32>,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let months = args.months.unwrap_or(config.stats.heatmap_months);

    let db = Database::open().map_err(StatsError::Connect)?;
    let report = fetch_report(&db, Local::now().date_naive(), months)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &StatsReport) {
    let today = Local::now().date_naive();
    let all = &report.all_time;

    println!("Pomodoro statistics");
    println!();
    println!("sessions    {}", all.total_sessions);
    println!(
        "total       work {}, break {}",
        format_compact(all.total_work_duration),
        format_compact(all.total_break_duration)
    );
    println!("today work  {}", format_compact(today_work(&report.weekly, today)));
    println!(
        "streak      {} current, {} best",
        days(report.streak.current_streak),
        days(report.streak.best_streak)
    );
    println!();
    for stat in &report.weekly {
        println!(
            "{}  {}",
            stat.date.format("%a %Y-%m-%d"),
            format_compact(stat.work_duration)
        );
    }
}

fn days(n: u32) -> String {
    if n == 1 {
        "1 day".into()
    } else {
        format!("{n} days")
    }
}
