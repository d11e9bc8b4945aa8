//! Terminal output: status lines, listings, tables and spinners.
//!
//! Human-facing output is suppressed in JSON mode, where only
//! [`Output::json`] documents and errors are printed.

use std::fmt::Display;
use std::time::Duration;

use chrono::{Local, TimeZone};
use console::{measure_text_width, pad_str, style, Alignment};
use indicatif::{ProgressBar, ProgressStyle};

/// Which standard stream a line goes to.
#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print one human-facing line, unless in JSON mode.
    fn line(&self, stream: Stream, text: impl Display) {
        if self.json {
            return;
        }
        match stream {
            Stream::Stdout => println!("{text}"),
            Stream::Stderr => eprintln!("{text}"),
        }
    }

    pub fn info(&self, msg: &str) {
        self.line(Stream::Stdout, format_args!("{} {msg}", style("ℹ").blue()));
    }

    pub fn success(&self, msg: &str) {
        self.line(Stream::Stdout, format_args!("{} {msg}", style("✓").green()));
    }

    pub fn warn(&self, msg: &str) {
        self.line(Stream::Stderr, format_args!("{} {msg}", style("⚠").yellow()));
    }

    /// Print an error; in JSON mode it is an `{"error": ...}` document on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            self.line(Stream::Stderr, format_args!("{} {}", style("✗").red(), style(msg).red()));
        }
    }

    /// Print a message only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.line(Stream::Stderr, format_args!("{} {}", style("→").dim(), style(msg).dim()));
        }
    }

    /// Print a section title.
    pub fn header(&self, msg: &str) {
        self.line(Stream::Stdout, format_args!("\n{}", style(msg).bold().underlined()));
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.line(Stream::Stdout, format_args!("  {}: {value}", style(key).dim()));
    }

    pub fn list_item(&self, item: &str) {
        self.line(Stream::Stdout, format_args!("  {} {item}", style("•").dim()));
    }

    /// Print `rows` under `header`, each column as wide as its widest cell.
    pub fn table(&self, header: &[&str], rows: &[Vec<String>]) {
        if self.json {
            return;
        }
        let mut widths: Vec<usize> = header.iter().map(|h| measure_text_width(h)).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(measure_text_width(cell));
            }
        }

        let header: Vec<String> = header.iter().map(|h| style(h).dim().to_string()).collect();
        println!("{}", table_line(&header, &widths));
        for row in rows {
            println!("{}", table_line(row, &widths));
        }
    }

    /// Print a JSON document, regardless of mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!(error = %e, "failed to serialize output"),
        }
    }

    /// Spinner for a network round trip; hidden in JSON mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner().with_message(msg.to_string());
        if let Ok(template) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            spinner.set_style(template);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// One indented table line; styled cells are padded by their visible width.
fn table_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<_> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| pad_str(cell, width, Alignment::Left, None))
        .collect();
    format!("  {}", padded.join("  ").trim_end())
}

/// Stock badge for a variant.
pub fn stock_badge(stock: i64) -> String {
    if stock > 0 {
        style(format!("in stock ({stock})")).green().to_string()
    } else {
        style("out of stock").red().to_string()
    }
}

/// Coarse remaining time: seconds under a minute, hours once past one.
fn format_remaining(secs: u64) -> String {
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m {seconds}s"),
        _ => format!("{hours}h {minutes}m"),
    }
}

/// Describe an expiry instant relative to `now` (both epoch millis).
pub fn format_expiry(expires_at: i64, now: i64) -> String {
    let at = Local
        .timestamp_millis_opt(expires_at)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| expires_at.to_string());
    if expires_at <= now {
        return format!("expired (at {at})");
    }
    let remaining = u64::try_from((expires_at - now) / 1000).unwrap_or_default();
    format!("in {} (at {at})", format_remaining(remaining))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(42), "42s");
        assert_eq!(format_remaining(14 * 60 + 3), "14m 3s");
        assert_eq!(format_remaining(2 * 3600 + 5 * 60 + 9), "2h 5m");
    }

    #[test]
    fn test_format_expiry() {
        let now = 1_700_000_000_000;
        assert!(format_expiry(now + 90_000, now).starts_with("in 1m 30s"));
        assert!(format_expiry(now - 1, now).starts_with("expired"));
    }

    #[test]
    fn test_table_line_pads_by_visible_width() {
        let plain = table_line(&["1".to_string(), "Tee".to_string()], &[3, 5]);
        assert_eq!(plain, "  1    Tee");

        let badge = style("out").red().force_styling(true).to_string();
        let styled = table_line(&[badge, "x".to_string()], &[5, 1]);
        assert_eq!(console::strip_ansi_codes(&styled), "  out    x");
    }
}
