//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::{ColoredString, Colorize};

use crate::domain::{LeanColor, LifespanStatus, PreventiveStatus};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print failure status (red X, indented)
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", "✗".red(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

pub fn lean_color(color: LeanColor) -> ColoredString {
    let label = color.to_string();
    match color {
        LeanColor::Green => label.green().bold(),
        LeanColor::Yellow => label.yellow().bold(),
        LeanColor::Red => label.red().bold(),
    }
}

pub fn lifespan_status(status: LifespanStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        LifespanStatus::Ok => label.green(),
        LifespanStatus::Warning => label.yellow(),
        LifespanStatus::Critical => label.red(),
        LifespanStatus::Exceeded => label.red().bold(),
    }
}

/// Grid cell for one month of the preventive schedule.
pub fn preventive_status(status: PreventiveStatus) -> ColoredString {
    let cell = status.symbol().to_string();
    match status {
        PreventiveStatus::NotApplicable => cell.dimmed(),
        PreventiveStatus::Programmed => cell.cyan(),
        PreventiveStatus::Done => cell.green(),
        PreventiveStatus::Late => cell.red().bold(),
        PreventiveStatus::Rescheduled => cell.yellow(),
    }
}
