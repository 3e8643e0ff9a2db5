use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. Anything else yields
/// [`BackgroundType::Unknown`].
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|val| val.split(';').next_back().map(str::to_string))
        .and_then(|bg| bg.parse::<u8>().ok())
        .map_or(BackgroundType::Unknown, |bg| {
            if bg <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            }
        })
}

/// Deep green used for the largest bar of each chart.
const GREEN_DEEP: Color = Color::Rgb(0x18, 0x63, 0x01);
/// Lighter green used for every other bar.
const GREEN_SOFT: Color = Color::Rgb(0x49, 0xa1, 0x41);

/// Every style the dashboard components draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    /// The large "total orders" figure.
    pub metric: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Bars ─────────────────────────────────────────────────────────────────
    /// The largest bar in a chart.
    pub bar_highlight: Style,
    /// All other bars.
    pub bar_normal: Style,
    /// Third colour so adjacent share segments stay distinguishable.
    pub bar_alt: Style,
    pub bar_empty: Style,
    pub bar_label: Style,

    // ── Line chart ───────────────────────────────────────────────────────────
    pub chart_line: Style,
    pub chart_axis: Style,

    // ── Month selectors ──────────────────────────────────────────────────────
    pub selector_active: Style,
    pub selector_inactive: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            metric: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_highlight: Style::default().fg(GREEN_SOFT),
            bar_normal: Style::default().fg(GREEN_DEEP),
            bar_alt: Style::default().fg(Color::Gray),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::Gray),

            chart_line: Style::default().fg(GREEN_SOFT),
            chart_axis: Style::default().fg(Color::Gray),

            selector_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            selector_inactive: Style::default().fg(Color::White),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// On a light canvas the deep green reads as the stronger colour, so it
    /// takes the highlight role.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            metric: Style::default()
                .fg(GREEN_DEEP)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_highlight: Style::default().fg(GREEN_DEEP),
            bar_normal: Style::default().fg(GREEN_SOFT),
            bar_alt: Style::default().fg(Color::DarkGray),
            bar_empty: Style::default().fg(Color::Gray),
            bar_label: Style::default().fg(Color::DarkGray),

            chart_line: Style::default().fg(GREEN_DEEP),
            chart_axis: Style::default().fg(Color::DarkGray),

            selector_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            selector_inactive: Style::default().fg(Color::Black),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Basic 8-colour ANSI palette without bold modifiers, for minimal
    /// terminals that cannot render RGB colours.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            metric: Style::default().fg(Color::Green),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_highlight: Style::default().fg(Color::LightGreen),
            bar_normal: Style::default().fg(Color::Green),
            bar_alt: Style::default().fg(Color::White),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::White),

            chart_line: Style::default().fg(Color::Green),
            chart_axis: Style::default().fg(Color::White),

            selector_active: Style::default().fg(Color::Black).bg(Color::White),
            selector_inactive: Style::default().fg(Color::White),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Bar style for the item at `rank` in a count-descending summary.
    pub fn bar_style(&self, rank: usize) -> Style {
        if rank == 0 {
            self.bar_highlight
        } else {
            self.bar_normal
        }
    }

    /// Segment style for the share bar, cycling so neighbours differ.
    pub fn share_style(&self, rank: usize) -> Style {
        match rank {
            0 => self.bar_highlight,
            r if r % 2 == 1 => self.bar_normal,
            _ => self.bar_alt,
        }
    }

    pub fn selector_style(&self, active: bool) -> Style {
        if active {
            self.selector_active
        } else {
            self.selector_inactive
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.bar_highlight.fg, Some(GREEN_SOFT));
        assert_eq!(t.bar_normal.fg, Some(GREEN_DEEP));
        assert_eq!(t.warning.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_light_theme_swaps_bar_greens() {
        let t = Theme::light();
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.bar_highlight.fg, Some(GREEN_DEEP));
        assert_eq!(t.bar_normal.fg, Some(GREEN_SOFT));
    }

    #[test]
    fn test_classic_theme_has_no_rgb_or_bold() {
        let t = Theme::classic();
        for style in [t.bar_highlight, t.bar_normal, t.chart_line, t.metric] {
            assert!(!matches!(style.fg, Some(Color::Rgb(..))));
        }
        assert!(!t.value.add_modifier.contains(Modifier::BOLD));
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        assert!(!Theme::from_name("classic")
            .header
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("neon");
        assert!(t.header.fg.is_some());
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    #[test]
    fn test_bar_style_highlights_first_rank_only() {
        let t = Theme::dark();
        assert_eq!(t.bar_style(0), t.bar_highlight);
        assert_eq!(t.bar_style(1), t.bar_normal);
        assert_eq!(t.bar_style(4), t.bar_normal);
    }

    #[test]
    fn test_share_style_neighbours_differ() {
        let t = Theme::dark();
        for rank in 0..5 {
            assert_ne!(t.share_style(rank), t.share_style(rank + 1), "rank {rank}");
        }
    }

    #[test]
    fn test_selector_style() {
        let t = Theme::dark();
        assert_eq!(t.selector_style(true), t.selector_active);
        assert_eq!(t.selector_style(false), t.selector_inactive);
    }
}
