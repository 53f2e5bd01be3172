//! Human-readable output formatting for ikiflow.

use chrono::Duration;
use colored::Colorize;

use crate::config::{Config, Paths};
use crate::presenter::widget::{render_bars, TOTAL_BARS};
use crate::presenter::OverlayEvent;
use crate::session::{format_duration, format_duration_mmss, SessionEvent};
use crate::simulate::{SimulationReport, TraceEntry, TraceEvent};
use crate::update::UpdateOffer;

/// Format a simulation report as a readable trace
#[must_use]
pub fn format_report_pretty(report: &SimulationReport) -> String {
    let mut lines = Vec::new();

    lines.push(
        format!(
            "Simulated cycle: {} focus, {} break",
            format_duration(Duration::seconds(report.focus_seconds)),
            format_duration(Duration::seconds(i64::from(report.break_seconds)))
        )
        .bold()
        .to_string(),
    );
    lines.push("─".repeat(48));

    for entry in &report.entries {
        lines.push(format_entry(entry, report.break_seconds));
    }

    lines.push(String::new());
    if let Some(second) = report.break_started_at() {
        let progress = report
            .overlay_progress()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" → ");
        lines.push(format!("Break began at t+{second}s, overlay counted {progress}"));
    }
    if report.completed {
        lines.push("✅ Cycle complete, ready for the next session".green().to_string());
    } else {
        lines.push("⏳ Step budget ran out before the cycle finished".yellow().to_string());
    }

    lines.join("\n")
}

fn format_entry(entry: &TraceEntry, break_seconds: u32) -> String {
    let time = format!("t+{:>4}s", entry.second).dimmed();
    let phase = format!("{:<8}", entry.state.phase.to_string());

    let detail = match entry.event {
        TraceEvent::Started { remaining_seconds } => format!(
            "▶️  started  {}  {}",
            format_duration_mmss(Duration::seconds(remaining_seconds)),
            render_bars(TOTAL_BARS, TOTAL_BARS)
        ),
        TraceEvent::Session(SessionEvent::Tick {
            remaining_seconds,
            bars_lit,
        }) => format!(
            "   tick     {}  {}",
            format_duration_mmss(Duration::seconds(remaining_seconds)),
            render_bars(bars_lit, TOTAL_BARS)
        ),
        TraceEvent::Session(SessionEvent::BreakStarted { break_seconds }) => {
            format!("☕ break    overlay shown for {break_seconds}s")
                .cyan()
                .to_string()
        }
        TraceEvent::Session(SessionEvent::Overlay { overlay }) => match overlay {
            OverlayEvent::Progress(value) => format!(
                "   overlay  {value:>3}/{break_seconds}  {}",
                overlay_bar(value, break_seconds)
            ),
            OverlayEvent::FadeStarted => "   overlay  fading out".to_string(),
            OverlayEvent::Closed => "   overlay  closed".to_string(),
        },
        TraceEvent::Session(SessionEvent::BreakEnded) => {
            "⏹️  idle     break over".green().to_string()
        }
    };

    format!("{time}  {phase} {detail}")
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn overlay_bar(value: u32, max: u32) -> String {
    let width = 20usize;
    let filled = if max == 0 {
        0
    } else {
        ((f64::from(value) / f64::from(max)) * width as f64).round() as usize
    };
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width.saturating_sub(filled)))
}

/// Format the effective configuration
#[must_use]
pub fn format_config_pretty(config: &Config, paths: &Paths) -> String {
    let source = if paths.config_file.exists() {
        paths.config_file.display().to_string()
    } else {
        format!("{} (not present, using defaults)", paths.config_file.display())
    };

    let mut lines = vec![
        "⚙️  Configuration".bold().to_string(),
        "─".repeat(40),
        format!("File:          {source}"),
        format!(
            "Focus:         {}",
            format_duration(Duration::minutes(i64::from(config.session.focus_minutes)))
        ),
        format!(
            "Break:         {}",
            format_duration(Duration::seconds(i64::from(config.session.break_seconds)))
        ),
        format!("Focus slider:  1-{} min", config.session.max_focus_minutes),
        format!(
            "Update check:  {}",
            if config.update.enabled { "on" } else { "off" }
        ),
    ];
    if config.update.enabled {
        lines.push(format!("Manifest:      {}", config.update.manifest_url).dimmed().to_string());
    }

    lines.join("\n")
}

/// Format an update check result
#[must_use]
pub fn format_update_pretty(offer: Option<&UpdateOffer>, current: &str) -> String {
    match offer {
        Some(offer) => [
            format!("🚀 ikiflow {} is available", offer.latest).green().to_string(),
            format!("   Current:  {}", offer.current),
            format!("   Download: {}", offer.download_url),
        ]
        .join("\n"),
        None => format!("ikiflow {current} is up to date (or no release information was reachable)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::simulate;

    #[test]
    fn test_report_pretty_mentions_every_stage() {
        colored::control::set_override(false);
        let text = format_report_pretty(&simulate(2, 3, None).unwrap());

        assert!(text.contains("started"));
        assert!(text.contains("tick"));
        assert!(text.contains("overlay shown for 3s"));
        assert!(text.contains("fading out"));
        assert!(text.contains("break over"));
        assert!(text.contains("Cycle complete"));
        assert!(text.contains("Break began at t+2s, overlay counted 2 → 1 → 0"));
    }

    #[test]
    fn test_report_pretty_without_break() {
        colored::control::set_override(false);
        let text = format_report_pretty(&simulate(10, 3, Some(2)).unwrap());
        assert!(!text.contains("Break began"));
        assert!(text.contains("Step budget ran out"));
    }

    #[test]
    fn test_overlay_bar() {
        assert_eq!(overlay_bar(0, 3), format!("[{}]", "░".repeat(20)));
        assert_eq!(overlay_bar(3, 3), format!("[{}]", "█".repeat(20)));
        assert_eq!(overlay_bar(1, 0), format!("[{}]", "░".repeat(20)));
    }

    #[test]
    fn test_update_pretty() {
        colored::control::set_override(false);
        let offer = UpdateOffer {
            current: "0.1.0".to_string(),
            latest: "0.2.0".to_string(),
            download_url: "https://example.com".to_string(),
        };
        assert!(format_update_pretty(Some(&offer), "0.1.0").contains("0.2.0 is available"));
        assert!(format_update_pretty(None, "0.1.0").contains("up to date"));
    }
}
