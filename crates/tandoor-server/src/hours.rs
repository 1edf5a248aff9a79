//! Restaurant opening hours and the order-taking cutoff.
//!
//! Calls that arrive too close to closing (or outside a shift entirely)
//! are routed to the after-hours agent, which answers questions but takes
//! no orders.

use chrono::Weekday;

use crate::config::{ConfigError, HoursConfig, ShiftConfig};

/// One open window in minutes-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shift {
    open: u32,
    close: u32,
}

/// Weekly opening shifts with the order cutoff applied at the end of each
/// shift.
#[derive(Debug, Clone)]
pub struct WeeklyHours {
    days: [Vec<Shift>; 7],
    cutoff_minutes: u32,
}

fn parse_wall_clock(value: &str) -> Result<u32, ConfigError> {
    let (hours, minutes) = value
        .split_once(':')
        .ok_or_else(|| ConfigError::Invalid(format!("bad wall-clock time '{value}'")))?;
    let hours: u32 = hours
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("bad wall-clock time '{value}'")))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("bad wall-clock time '{value}'")))?;
    if hours > 23 || minutes > 59 {
        return Err(ConfigError::Invalid(format!(
            "wall-clock time '{value}' out of range"
        )));
    }
    Ok(hours * 60 + minutes)
}

fn parse_shifts(shifts: &[ShiftConfig]) -> Result<Vec<Shift>, ConfigError> {
    shifts
        .iter()
        .map(|shift| {
            let open = parse_wall_clock(&shift.open)?;
            let close = parse_wall_clock(&shift.close)?;
            if close <= open {
                return Err(ConfigError::Invalid(format!(
                    "shift closes at or before it opens ({} - {})",
                    shift.open, shift.close
                )));
            }
            Ok(Shift { open, close })
        })
        .collect()
}

impl WeeklyHours {
    /// Parses the configured shifts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for unparseable times or shifts that
    /// close before they open.
    pub fn from_config(config: &HoursConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            days: [
                parse_shifts(&config.monday)?,
                parse_shifts(&config.tuesday)?,
                parse_shifts(&config.wednesday)?,
                parse_shifts(&config.thursday)?,
                parse_shifts(&config.friday)?,
                parse_shifts(&config.saturday)?,
                parse_shifts(&config.sunday)?,
            ],
            cutoff_minutes: config.cutoff_minutes,
        })
    }

    /// Whether orders are being accepted at the given local time.
    ///
    /// True only inside a shift and more than `cutoff_minutes` before its
    /// close.
    pub fn accepting_orders(&self, weekday: Weekday, minutes_of_day: u32) -> bool {
        let shifts = &self.days[weekday.num_days_from_monday() as usize];
        shifts.iter().any(|shift| {
            let cutoff = shift.close.saturating_sub(self.cutoff_minutes);
            minutes_of_day >= shift.open && minutes_of_day < cutoff
        })
    }
}

impl Default for WeeklyHours {
    fn default() -> Self {
        Self::from_config(&HoursConfig::default()).expect("default hours are valid")
    }
}
