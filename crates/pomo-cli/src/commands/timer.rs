use std::io::Write;

use chrono::Utc;
use clap::Args;
use pomo_core::timer::Snapshot;
use pomo_core::{
    Config, ConfirmChoice, Database, EffectRunner, Input, PostActions, SessionStore, Task,
    TaskType, TimerEngine, TimerState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

#[derive(Args)]
pub struct StartArgs {
    /// Task to begin with (work or break)
    #[arg(default_value = "work")]
    task: TaskType,
    /// Quit when the interval ends instead of asking to continue
    #[arg(long)]
    no_confirm: bool,
    /// Keep this run out of the statistics
    #[arg(long)]
    no_stats: bool,
}

/// Rings the terminal bell when an interval ends.
struct TerminalBell;

impl PostActions for TerminalBell {
    fn run(&self, task_type: TaskType, task: &Task) {
        tracing::info!(%task_type, title = %task.title, "interval finished");
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
}

pub fn run(args: StartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut options = config.engine_options();
    if args.no_confirm {
        options.ask_to_continue = false;
    }

    // A missing database only costs the statistics, never the timer.
    let db = if config.stats.enabled && !args.no_stats {
        match Database::open() {
            Ok(db) => Some(db),
            Err(e) => {
                tracing::warn!(error = %e, "session database unavailable, not recording");
                None
            }
        }
    } else {
        None
    };

    let engine = TimerEngine::new(args.task, options);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(event_loop(engine, db.as_ref()));
    // The stdin reader blocks in a thread that cannot be cancelled.
    rt.shutdown_background();
    let engine = result?;

    println!();
    println!("{}", engine.summary());
    Ok(())
}

/// One event at a time: a tick or a line of input is handled and its effects
/// executed before the next one is taken.
async fn event_loop(
    mut engine: TimerEngine,
    db: Option<&Database>,
) -> std::io::Result<TimerEngine> {
    let hook = TerminalBell;
    let runner = EffectRunner::new(db.map(|db| db as &dyn SessionStore), &hook);

    let period = engine
        .tick_interval()
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(1));
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    print_help();
    render(&engine.snapshot())?;

    loop {
        let input = tokio::select! {
            _ = ticker.tick() => Some(Input::Tick),
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => parse_key(&line, engine.state()),
                // closed input ends the run like a quit
                None => {
                    stdin_open = false;
                    Some(match engine.state() {
                        TimerState::ShowingConfirm => Input::Choice(ConfirmChoice::Cancel),
                        _ => Input::Quit,
                    })
                }
            },
        };
        let Some(input) = input else {
            continue;
        };

        let effects = engine.handle(input, Utc::now());
        let quit = runner.run(&effects);
        render(&engine.snapshot())?;

        if quit || engine.state() == TimerState::Quitting {
            return Ok(engine);
        }
    }
}

/// Map one line of input to an engine input for the current state.
fn parse_key(line: &str, state: TimerState) -> Option<Input> {
    let key = line.trim();
    if state == TimerState::ShowingConfirm {
        return match key {
            "" | "y" => Some(Input::Choice(ConfirmChoice::Confirm)),
            "s" => Some(Input::Choice(ConfirmChoice::ShortSession)),
            "n" | "q" => Some(Input::Choice(ConfirmChoice::Cancel)),
            _ => None,
        };
    }
    match key {
        "p" => Some(Input::Pause),
        "r" => Some(Input::Reset),
        "s" => Some(Input::Skip),
        "q" => Some(Input::Quit),
        "+" => Some(Input::AddMinute),
        _ => None,
    }
}

fn print_help() {
    println!("keys (then enter): p pause/resume, r reset, s skip, + one more minute, q quit");
}

fn render(snapshot: &Snapshot) -> std::io::Result<()> {
    let mut out = std::io::stdout();
    write!(out, "\r\x1b[2K{}", status_line(snapshot))?;
    out.flush()
}

fn status_line(s: &Snapshot) -> String {
    match s.state {
        TimerState::Running => format!(
            "{}  {} left  {:>3.0}%",
            s.title,
            clock(s.remaining_ms),
            s.percent * 100.0
        ),
        TimerState::Paused => format!("{}  {} left  (paused)", s.title, clock(s.remaining_ms)),
        TimerState::ShowingConfirm => format!(
            "{} done, idle {}. continue? [y]es / [s]hort session / [n]o",
            s.title,
            clock(s.idle_ms)
        ),
        TimerState::Quitting => String::new(),
    }
}

/// `mm:ss`, or `h:mm:ss` past an hour.
fn clock(ms: i64) -> String {
    let total = ms.max(0) / 1000;
    let (h, m, sec) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{sec:02}")
    } else {
        format!("{m:02}:{sec:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_keys() {
        assert_eq!(parse_key("p", TimerState::Running), Some(Input::Pause));
        assert_eq!(parse_key(" s \n", TimerState::Paused), Some(Input::Skip));
        assert_eq!(parse_key("+", TimerState::Running), Some(Input::AddMinute));
        assert_eq!(parse_key("y", TimerState::Running), None);
    }

    #[test]
    fn confirm_keys() {
        assert_eq!(
            parse_key("", TimerState::ShowingConfirm),
            Some(Input::Choice(ConfirmChoice::Confirm))
        );
        assert_eq!(
            parse_key("s", TimerState::ShowingConfirm),
            Some(Input::Choice(ConfirmChoice::ShortSession))
        );
        assert_eq!(
            parse_key("q", TimerState::ShowingConfirm),
            Some(Input::Choice(ConfirmChoice::Cancel))
        );
        assert_eq!(parse_key("p", TimerState::ShowingConfirm), None);
    }

    #[test]
    fn clock_format() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(61_500), "01:01");
        assert_eq!(clock(3_725_000), "1:02:05");
        assert_eq!(clock(-5), "00:00");
    }
}
