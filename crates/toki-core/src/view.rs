//! Text rendering of a running session.
//!
//! Everything here is a pure function of the runner's state. The output is a
//! plain string with ANSI styling; painting it is up to the caller.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};
use crossterm::style::{Color, Stylize};

use crate::timer::StageRunner;

pub const DEFAULT_PADDING: u16 = 2;
pub const DEFAULT_MAX_WIDTH: u16 = 80;
/// Bar width used until the first resize event arrives.
pub const DEFAULT_BAR_WIDTH: u16 = 40;

const FULL_CELL: char = '█';
const EMPTY_CELL: char = '░';
const GRADIENT_START: (u8, u8, u8) = (0x5A, 0x56, 0xE0);
const GRADIENT_END: (u8, u8, u8) = (0xEE, 0x6F, 0xF8);
const EMPTY_COLOR: Color = Color::Rgb {
    r: 0x60,
    g: 0x60,
    b: 0x60,
};

/// Clock format used for the stage start and end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// `3:04PM`
    #[default]
    Kitchen,
    /// `15:04`
    TwentyFour,
}

impl TimeFormat {
    /// `24h` (any case) selects the 24-hour clock; anything else is kitchen.
    pub fn from_flag(value: &str) -> Self {
        if value.eq_ignore_ascii_case("24h") {
            TimeFormat::TwentyFour
        } else {
            TimeFormat::Kitchen
        }
    }

    pub fn format(self, at: &DateTime<Local>) -> String {
        match self {
            TimeFormat::Kitchen => at.format("%-I:%M%p").to_string(),
            TimeFormat::TwentyFour => at.format("%H:%M").to_string(),
        }
    }
}

/// Presentation settings fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Optional label shown next to the clock. Empty means none.
    pub name: String,
    pub fullscreen: bool,
    pub time_format: TimeFormat,
    /// Upper bound on the bar width in inline layout.
    pub max_width: u16,
    /// Horizontal padding; also the left margin in full-screen layout.
    pub padding: u16,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            fullscreen: false,
            time_format: TimeFormat::default(),
            max_width: DEFAULT_MAX_WIDTH,
            padding: DEFAULT_PADDING,
        }
    }
}

impl DisplayOptions {
    pub fn name(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    /// Bar width for a terminal of `width` columns.
    pub fn bar_width(&self, width: u16) -> u16 {
        let bar = width.saturating_sub(self.padding.saturating_mul(2)).saturating_sub(4);
        if !self.fullscreen && bar > self.max_width {
            self.max_width
        } else {
            bar
        }
    }
}

/// Render the live view. Empty once the session has stopped.
pub fn render(runner: &StageRunner) -> String {
    if runner.is_stopped() {
        return String::new();
    }

    let display = runner.display();
    let format = display.time_format;
    let start = runner.stage_started_at();
    let end = TimeDelta::from_std(runner.stage_duration())
        .ok()
        .and_then(|delta| start.checked_add_signed(delta))
        .map(|end| format.format(&end))
        .unwrap_or_else(|| "-".to_string());

    let mut result = format.format(&start).bold().to_string();
    if let Some(name) = display.name() {
        let _ = write!(result, ": {}", name.italic());
    }
    let _ = write!(
        result,
        " - {} - {}\n{}",
        end.bold(),
        format_countdown(runner.remaining()).bold(),
        progress_bar(runner.bar_width(), runner.progress())
    );

    if display.fullscreen {
        let margin = " ".repeat(usize::from(display.padding));
        let top = usize::from(runner.viewport_height().saturating_sub(2) / 2);
        let body = result
            .lines()
            .map(|line| format!("{margin}{line}"))
            .collect::<Vec<_>>()
            .join("\n");
        return format!("{}{body}", "\n".repeat(top));
    }
    result
}

/// Countdown readout such as `1h2m3s`, `4m0s`, `59.9s` or `900ms`.
pub fn format_countdown(remaining: Duration) -> String {
    let total_ms = remaining.as_millis();
    if total_ms == 0 {
        return "0s".to_string();
    }
    if total_ms < 1_000 {
        return format!("{total_ms}ms");
    }

    let hours = total_ms / 3_600_000;
    let minutes = total_ms / 60_000 % 60;
    let seconds = total_ms / 1_000 % 60;
    let millis = total_ms % 1_000;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    let _ = write!(out, "{seconds}");
    if millis > 0 {
        let fraction = format!("{millis:03}");
        let _ = write!(out, ".{}", fraction.trim_end_matches('0'));
    }
    out.push('s');
    out
}

/// Gradient progress bar followed by a right-aligned percentage.
///
/// `width` covers the whole bar including the percentage text.
pub fn progress_bar(width: u16, fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let percent = format!(" {:>3}%", (fraction * 100.0).round() as u64);
    let cells = usize::from(width).saturating_sub(percent.len());
    let filled = ((cells as f64) * fraction).round() as usize;

    let mut bar = String::new();
    for i in 0..filled {
        let t = if cells > 1 {
            i as f64 / (cells - 1) as f64
        } else {
            0.0
        };
        let _ = write!(bar, "{}", FULL_CELL.with(gradient(t)));
    }
    if cells > filled {
        let empty: String = std::iter::repeat(EMPTY_CELL).take(cells - filled).collect();
        let _ = write!(bar, "{}", empty.with(EMPTY_COLOR));
    }
    bar.push_str(&percent);
    bar
}

fn gradient(t: f64) -> Color {
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Color::Rgb {
        r: lerp(GRADIENT_START.0, GRADIENT_END.0),
        g: lerp(GRADIENT_START.1, GRADIENT_END.1),
        b: lerp(GRADIENT_START.2, GRADIENT_END.2),
    }
}

/// Closing line printed after a successful session.
pub fn finished_message(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("{name} finished!"),
        _ => "finished!".to_string(),
    }
}

#[cfg(test)]
pub(crate) fn strip_ansi(s: &str) -> String {
    let re = regex::Regex::new("\x1b\\[[0-9;]*[A-Za-z]").unwrap();
    re.replace_all(s, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::timer::{StageRunner, TimerSpec};
    use crate::Event;

    fn nine_am() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 9, 5, 0).unwrap()
    }

    fn runner(stages: &[u64], display: DisplayOptions) -> StageRunner {
        let spec = TimerSpec::new(stages.iter().map(|s| Duration::from_secs(*s)).collect()).unwrap();
        StageRunner::with_clock(spec, display, nine_am)
    }

    #[test]
    fn time_format_flag() {
        assert_eq!(TimeFormat::from_flag("24h"), TimeFormat::TwentyFour);
        assert_eq!(TimeFormat::from_flag("24H"), TimeFormat::TwentyFour);
        assert_eq!(TimeFormat::from_flag("kitchen"), TimeFormat::Kitchen);
        assert_eq!(TimeFormat::from_flag(""), TimeFormat::Kitchen);
        assert_eq!(TimeFormat::from_flag("12h"), TimeFormat::Kitchen);
    }

    #[test]
    fn time_format_rendering() {
        let at = Local.with_ymd_and_hms(2024, 1, 15, 15, 4, 0).unwrap();
        assert_eq!(TimeFormat::Kitchen.format(&at), "3:04PM");
        assert_eq!(TimeFormat::TwentyFour.format(&at), "15:04");
    }

    #[test]
    fn countdown_readout() {
        assert_eq!(format_countdown(Duration::ZERO), "0s");
        assert_eq!(format_countdown(Duration::from_millis(900)), "900ms");
        assert_eq!(format_countdown(Duration::from_millis(59_900)), "59.9s");
        assert_eq!(format_countdown(Duration::from_secs(240)), "4m0s");
        assert_eq!(format_countdown(Duration::from_secs(3_723)), "1h2m3s");
        assert_eq!(format_countdown(Duration::from_secs(3_600)), "1h0m0s");
        assert_eq!(format_countdown(Duration::from_millis(1_250)), "1.25s");
    }

    #[test]
    fn bar_has_requested_width() {
        for fraction in [0.0, 0.32, 1.0] {
            let plain = strip_ansi(&progress_bar(40, fraction));
            assert_eq!(plain.chars().count(), 40);
        }
        assert_eq!(strip_ansi(&progress_bar(15, 0.5)), "█████░░░░░  50%");
        assert_eq!(strip_ansi(&progress_bar(10, 1.0)), "█████ 100%");
    }

    #[test]
    fn bar_width_clamps_only_inline() {
        let inline = DisplayOptions::default();
        assert_eq!(inline.bar_width(60), 52);
        assert_eq!(inline.bar_width(200), DEFAULT_MAX_WIDTH);
        assert_eq!(inline.bar_width(3), 0);

        let fullscreen = DisplayOptions {
            fullscreen: true,
            ..DisplayOptions::default()
        };
        assert_eq!(fullscreen.bar_width(200), 192);
    }

    #[test]
    fn inline_view_shows_clock_name_and_countdown() {
        let mut r = runner(
            &[600],
            DisplayOptions {
                name: "tea".into(),
                ..DisplayOptions::default()
            },
        );
        r.handle(Event::Resize { width: 30, height: 10 });
        let view = strip_ansi(&r.view());
        let mut lines = view.lines();
        assert_eq!(lines.next(), Some("9:05AM: tea - 9:15AM - 10m0s"));
        assert_eq!(lines.next().map(|l| l.chars().count()), Some(22));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn twenty_four_hour_view_without_name() {
        let r = runner(
            &[45],
            DisplayOptions {
                time_format: TimeFormat::TwentyFour,
                ..DisplayOptions::default()
            },
        );
        let view = strip_ansi(&r.view());
        assert!(view.starts_with("09:05 - 09:05 - 45s\n"), "{view}");
    }

    #[test]
    fn fullscreen_view_has_margins() {
        let mut r = runner(
            &[90],
            DisplayOptions {
                fullscreen: true,
                ..DisplayOptions::default()
            },
        );
        r.handle(Event::Resize { width: 50, height: 12 });
        let view = strip_ansi(&r.view());
        assert!(view.starts_with("\n\n\n\n\n  9:05AM - 9:06AM - 1m30s\n  "), "{view:?}");
    }

    #[test]
    fn stopped_session_renders_nothing() {
        let mut r = runner(&[5], DisplayOptions::default());
        r.handle(Event::Quit);
        assert_eq!(r.view(), "");
    }

    #[test]
    fn finished_line() {
        assert_eq!(finished_message(Some("pasta")), "pasta finished!");
        assert_eq!(finished_message(Some("")), "finished!");
        assert_eq!(finished_message(None), "finished!");
    }
}
