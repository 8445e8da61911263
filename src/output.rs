use owo_colors::OwoColorize;

use crate::reconcile::{Outcome, Reporter, Severity, Summary};

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

/// The per-task status channel: always stdout, one line per outcome.
fn print_status(severity: Severity, msg: &str) {
    let label = match severity {
        Severity::Ok => "ok:",
        Severity::Info => "info:",
        Severity::Warn => "warn:",
        Severity::Error => "error:",
    };
    if is_tty() {
        let colored = match severity {
            Severity::Ok => label.green().bold().to_string(),
            Severity::Info => label.cyan().bold().to_string(),
            Severity::Warn => label.yellow().bold().to_string(),
            Severity::Error => label.red().bold().to_string(),
        };
        println!("{} {}", colored, msg);
    } else {
        println!("{} {}", label, msg);
    }
}

pub fn print_info(msg: &str) {
    print_status(Severity::Info, msg);
}

/// Out-of-band warnings (e.g. signal handling) go to stderr.
pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

/// Fatal errors go to stderr.
pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_outcome(outcome: &Outcome) {
    print_status(outcome.severity(), &outcome.to_string());
}

pub fn print_summary(summary: &Summary) {
    print_info(&format!("done: {summary}"));
}

/// Reporter that prints each outcome as it happens.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, outcome: &Outcome) {
        print_outcome(outcome);
    }
}
