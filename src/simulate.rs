//! Headless compressed-time driver.
//!
//! Runs one full focus/break cycle against a synthetic clock, one second per
//! step, and records everything the controller reports. Useful for checking
//! the state machine without a terminal.

use std::time::Instant;

use chrono::Duration;
use serde::Serialize;

use crate::error::IkiflowError;
use crate::session::{Phase, SessionConfig, SessionController, SessionEvent, SessionState, TICK};

/// Width of the pretend display the widget is centered on.
const SIMULATED_DISPLAY_WIDTH: u16 = 80;

/// Longest focus or break a simulated cycle accepts, in ticks (one day).
pub const MAX_SIMULATED_TICKS: u32 = 86_400;

/// What happened at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// The session was started.
    Started { remaining_seconds: i64 },
    /// The controller reported an event.
    Session(SessionEvent),
}

/// One line of the trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceEntry {
    /// Seconds since Start.
    pub second: u32,
    /// Controller state after the event.
    #[serde(flatten)]
    pub state: SessionState,
    pub event: TraceEvent,
}

/// Result of a simulated cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub focus_seconds: i64,
    pub break_seconds: u32,
    /// Whether the cycle got back to idle within the step budget.
    pub completed: bool,
    pub entries: Vec<TraceEntry>,
}

impl SimulationReport {
    /// Countdown values the overlay showed, in order.
    #[must_use]
    pub fn overlay_progress(&self) -> Vec<u32> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.event {
                TraceEvent::Session(SessionEvent::Overlay {
                    overlay: crate::presenter::OverlayEvent::Progress(value),
                }) => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Second at which the break started, if it did.
    #[must_use]
    pub fn break_started_at(&self) -> Option<u32> {
        self.entries.iter().find_map(|entry| match entry.event {
            TraceEvent::Session(SessionEvent::BreakStarted { .. }) => Some(entry.second),
            _ => None,
        })
    }
}

/// Steps needed for a complete cycle: the focus ticks, the break, and the fade.
#[must_use]
pub fn full_cycle_steps(focus_seconds: i64, break_seconds: u32) -> u32 {
    let focus = u32::try_from(focus_seconds.max(1)).unwrap_or(u32::MAX);
    focus.saturating_add(break_seconds.max(1)).saturating_add(1)
}

fn check_ticks(name: &str, value: i64) -> Result<(), IkiflowError> {
    if (1..=i64::from(MAX_SIMULATED_TICKS)).contains(&value) {
        Ok(())
    } else {
        Err(IkiflowError::InvalidArgument(format!(
            "{name} must be between 1 and {MAX_SIMULATED_TICKS}, got {value}"
        )))
    }
}

/// Simulate one cycle, stopping early once the controller is idle again.
///
/// `max_steps` defaults to [`full_cycle_steps`].
///
/// # Errors
///
/// Returns `IkiflowError::InvalidArgument` if either duration is outside
/// `1..=MAX_SIMULATED_TICKS` or `max_steps` is zero.
pub fn simulate(
    focus_seconds: i64,
    break_seconds: u32,
    max_steps: Option<u32>,
) -> Result<SimulationReport, IkiflowError> {
    check_ticks("--focus-ticks", focus_seconds)?;
    check_ticks("--break-seconds", i64::from(break_seconds))?;
    if max_steps == Some(0) {
        return Err(IkiflowError::InvalidArgument(
            "--ticks must be at least 1".to_string(),
        ));
    }

    let config = SessionConfig::with_durations(Duration::seconds(focus_seconds), break_seconds);
    let mut controller = SessionController::new(config, SIMULATED_DISPLAY_WIDTH);

    let start = Instant::now();
    let mut entries = Vec::new();
    controller.start(start);
    entries.push(TraceEntry {
        second: 0,
        state: controller.state(),
        event: TraceEvent::Started {
            remaining_seconds: controller.remaining().num_seconds(),
        },
    });

    let steps = max_steps.unwrap_or_else(|| {
        full_cycle_steps(
            config.focus_duration().num_seconds(),
            config.break_seconds(),
        )
    });

    let mut completed = false;
    for second in 1..=steps {
        for event in controller.pump(start + TICK * second) {
            entries.push(TraceEntry {
                second,
                state: controller.state(),
                event: TraceEvent::Session(event),
            });
        }
        if controller.phase() == Phase::Idle {
            completed = true;
            break;
        }
    }

    controller.shutdown();

    Ok(SimulationReport {
        focus_seconds: config.focus_duration().num_seconds(),
        break_seconds: config.break_seconds(),
        completed,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::OverlayEvent;

    #[test]
    fn test_compressed_cycle() {
        let report = simulate(2, 3, None).unwrap();

        assert!(report.completed);
        assert_eq!(report.break_started_at(), Some(2));
        assert_eq!(report.overlay_progress(), vec![2, 1, 0]);

        let fades: Vec<u32> = report
            .entries
            .iter()
            .filter(|e| {
                e.event
                    == TraceEvent::Session(SessionEvent::Overlay {
                        overlay: OverlayEvent::FadeStarted,
                    })
            })
            .map(|e| e.second)
            .collect();
        // Third overlay tick, counted from the start of the break
        assert_eq!(fades, vec![5]);

        let last = report.entries.last().unwrap();
        assert_eq!(last.event, TraceEvent::Session(SessionEvent::BreakEnded));
        assert_eq!(last.state.phase, Phase::Idle);
        assert_eq!(last.state.remaining_seconds, 2);
        assert_eq!(last.second, 6);
    }

    #[test]
    fn test_step_budget() {
        let report = simulate(10, 5, Some(4)).unwrap();
        assert!(!report.completed);
        assert_eq!(report.break_started_at(), None);
        assert_eq!(report.entries.len(), 5);

        // The state snapshot follows the countdown
        let last = report.entries.last().unwrap();
        assert_eq!(last.state.phase, Phase::Running);
        assert_eq!(last.state.remaining_seconds, 6);
        assert!((last.state.progress_fraction - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_durations_rejected() {
        for (focus, brk) in [
            (0, 3),
            (-5, 3),
            (i64::from(MAX_SIMULATED_TICKS) + 1, 3),
            (10_000_000_000_000_000, 3),
            (2, 0),
            (2, MAX_SIMULATED_TICKS + 1),
        ] {
            let err = simulate(focus, brk, Some(1)).unwrap_err();
            assert!(matches!(err, IkiflowError::InvalidArgument(_)), "{focus}/{brk}");
            assert_eq!(err.exit_code(), 2);
        }
        assert!(simulate(i64::from(MAX_SIMULATED_TICKS), 3, Some(1)).is_ok());
    }

    #[test]
    fn test_zero_step_budget_rejected() {
        assert!(matches!(
            simulate(2, 3, Some(0)),
            Err(IkiflowError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_full_cycle_steps() {
        assert_eq!(full_cycle_steps(2, 3), 6);
        assert_eq!(full_cycle_steps(0, 0), 3);
    }
}
