//! Text rendering of the state.

use std::fmt::Write;

use todo_core::{Filter, TodoState};

const TITLE: &str = "Todo Master";
const SUBTITLE: &str = "Organize your tasks efficiently";

/// Render the whole screen. Pure; the caller decides where it goes.
pub fn render(state: &TodoState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_screen(&mut out, state);
    out
}

fn write_screen(out: &mut String, state: &TodoState) -> std::fmt::Result {
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{SUBTITLE}")?;
    writeln!(out)?;

    if let Some(banner) = state.banner() {
        writeln!(out, "! {}", banner.message)?;
        writeln!(out)?;
    }

    let stats = state.stats();
    writeln!(
        out,
        "{}    {} active · {} done",
        filter_bar(state.filter()),
        stats.active,
        stats.completed
    )?;

    if state.is_loading() {
        return writeln!(out, "  Loading todos...");
    }

    let mut shown = 0;
    for todo in state.visible() {
        let mark = if todo.completed { "x" } else { " " };
        writeln!(out, "  [{mark}] {:>3}  {}", todo.id, todo.title)?;
        shown += 1;
    }
    if shown == 0 {
        match state.filter() {
            Filter::All => writeln!(out, "  No todos yet - start adding some!")?,
            other => writeln!(out, "  No {other} todos")?,
        }
    }
    Ok(())
}

fn filter_bar(active: Filter) -> String {
    Filter::ALL
        .iter()
        .map(|f| {
            if *f == active {
                format!("[{f}]")
            } else {
                f.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
