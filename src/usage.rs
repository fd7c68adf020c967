//! Usage record: the structured snapshot of one billing cycle's allowance and consumption.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Display format for [`UsageRecord::last_updated_label`].
pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The four raw quantities read from the report, in gigabytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageFigures {
    pub carried_over_gb: f64,
    pub base_allowance_gb: f64,
    pub paid_addon_gb: f64,
    pub used_gb: f64,
}

/// A complete usage snapshot. Never partially populated.
///
/// Derived fields (`total_gb`, `remaining_gb`, `percentage_used`) are computed
/// once in [`UsageRecord::from_figures_at`] and stored so the cached JSON is
/// self-describing for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Capture instant (RFC 3339).
    pub timestamp: DateTime<Utc>,
    pub carried_over_gb: f64,
    pub base_allowance_gb: f64,
    pub paid_addon_gb: f64,
    pub used_gb: f64,
    /// carried_over + base_allowance + paid_addon.
    pub total_gb: f64,
    /// total - used. Negative when usage exceeds the allowance.
    pub remaining_gb: f64,
    /// used / total * 100, one decimal place; 0 when total <= 0.
    pub percentage_used: f64,
    pub last_updated_label: String,
}

impl UsageRecord {
    /// Build a record stamped with the current instant.
    pub fn from_figures(figures: UsageFigures) -> Self {
        Self::from_figures_at(figures, Utc::now())
    }

    /// Components are rounded to 2 dp first; total, remaining and percentage
    /// are derived from the rounded values so the stored fields agree.
    pub fn from_figures_at(figures: UsageFigures, captured_at: DateTime<Utc>) -> Self {
        let carried_over = round_to(figures.carried_over_gb, 2);
        let base_allowance = round_to(figures.base_allowance_gb, 2);
        let paid_addon = round_to(figures.paid_addon_gb, 2);
        let used = round_to(figures.used_gb, 2);

        let total = round_to(carried_over + base_allowance + paid_addon, 2);
        let remaining = round_to(total - used, 2);
        let percentage = if total > 0.0 {
            round_to(used / total * 100.0, 1)
        } else {
            0.0
        };

        Self {
            timestamp: captured_at,
            carried_over_gb: carried_over,
            base_allowance_gb: base_allowance,
            paid_addon_gb: paid_addon,
            used_gb: used,
            total_gb: total,
            remaining_gb: remaining,
            percentage_used: percentage,
            last_updated_label: captured_at
                .with_timezone(&Local)
                .format(LABEL_FORMAT)
                .to_string(),
        }
    }

    /// Fraction of the allowance still available, clamped to `0.0..=1.0`.
    ///
    /// Useful for sizing a remaining/used chart; `0.0` when there is no allowance.
    pub fn remaining_fraction(&self) -> f64 {
        if self.total_gb <= 0.0 {
            return 0.0;
        }
        (self.remaining_gb / self.total_gb).clamp(0.0, 1.0)
    }

    /// `true` when consumption has exceeded the allowance.
    pub fn is_over_allowance(&self) -> bool {
        self.remaining_gb < 0.0
    }
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
