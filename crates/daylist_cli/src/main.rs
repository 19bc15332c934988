//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `daylist_core` linkage.
//! - Run a deterministic in-memory walkthrough of the board operations.

use daylist_core::{FilterMode, MemoryStore, StoreResult, TaskBoard, TaskDate};

fn main() {
    println!("daylist_core ping={}", daylist_core::ping());
    println!("daylist_core version={}", daylist_core::core_version());

    match walkthrough() {
        Ok(summary) => println!("daylist_core walkthrough={summary}"),
        Err(err) => {
            eprintln!("daylist_core walkthrough failed: {err}");
            std::process::exit(1);
        }
    }
}

// Fixed dates keep output stable regardless of the host clock.
fn walkthrough() -> StoreResult<String> {
    let today = TaskDate::parse("2025-01-05")?;
    let mut board = TaskBoard::open(MemoryStore::new())?;

    board.submit_task("Buy milk", "2025-01-10")?;
    let rent = board.submit_task("Pay rent", "2025-01-05")?;
    board.request_toggle_complete(rent.id, today, |_| false)?;
    board.set_filter_mode(FilterMode::Active);

    let view = board.view(today);
    let order = view
        .visible_tasks
        .iter()
        .map(|task| task.date.to_string())
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!(
        "total={} completed={} pending={} daily_percent={} visible={}",
        view.stats.total, view.stats.completed, view.stats.pending, view.daily_percent, order
    ))
}
