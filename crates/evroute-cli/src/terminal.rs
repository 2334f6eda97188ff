//! Terminal styling for plan listings.
//!
//! Colors are resolved once into a [`ColorPalette`]; a disabled palette holds
//! empty strings so formatting code never branches on color support.

/// ANSI escape codes used by the plan listing.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";

    pub const TAG_START: &str = "\x1b[1;7;32m";
    pub const TAG_DRIVE: &str = "\x1b[1;7;36m";
    pub const TAG_CHARGE: &str = "\x1b[1;7;33m";
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";

    pub const EDGE: &str = "\x1b[1;97m";
    pub const MUTED: &str = "\x1b[90m";

    pub const SOC_HEALTHY: &str = "\x1b[32m";
    /// 256-color orange.
    pub const SOC_LOW: &str = "\x1b[38;5;208m";
    pub const SOC_CRITICAL: &str = "\x1b[31m";
}

/// Charge band used to color SoC percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocLevel {
    /// Below 10%.
    Critical,
    /// Below 30%.
    Low,
    Healthy,
}

impl SocLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 10.0 {
            SocLevel::Critical
        } else if percent < 30.0 {
            SocLevel::Low
        } else {
            SocLevel::Healthy
        }
    }
}

/// Resolved escape codes for one output stream.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_drive: &'static str,
    pub tag_charge: &'static str,
    pub tag_goal: &'static str,
    /// Edge and vehicle identifiers.
    pub edge: &'static str,
    /// Secondary details such as durations.
    pub muted: &'static str,
    /// Infeasible plan notice.
    pub alert: &'static str,
    /// Indexed by [`SocLevel`]: critical, low, healthy.
    soc_levels: [&'static str; 3],
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_drive: colors::TAG_DRIVE,
            tag_charge: colors::TAG_CHARGE,
            tag_goal: colors::TAG_GOAL,
            edge: colors::EDGE,
            muted: colors::MUTED,
            alert: colors::SOC_CRITICAL,
            soc_levels: [colors::SOC_CRITICAL, colors::SOC_LOW, colors::SOC_HEALTHY],
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_drive: "",
            tag_charge: "",
            tag_goal: "",
            edge: "",
            muted: "",
            alert: "",
            soc_levels: ["", "", ""],
        }
    }

    /// Colored unless `NO_COLOR` is set or `TERM=dumb`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Color for a state-of-charge percentage.
    #[must_use]
    pub fn soc(&self, percent: f64) -> &'static str {
        let slot = match SocLevel::from_percent(percent) {
            SocLevel::Critical => 0,
            SocLevel::Low => 1,
            SocLevel::Healthy => 2,
        };
        self.soc_levels[slot]
    }
}

/// Honors `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    !std::env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb"))
}

/// Format a number with comma thousand separators.
///
/// ```
/// # use evroute_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a distance in meters, switching to kilometers from 10 km up.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters >= 10_000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", format_with_separators(meters.max(0.0).round() as u64))
    }
}
