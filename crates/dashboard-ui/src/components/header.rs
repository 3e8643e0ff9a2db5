use dashboard_core::month::MonthRange;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Width of the `=` separator under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Selected range and end-boundary mode in `[ range | mode ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Range currently selected, `None` when the dataset has no months.
    pub range: Option<MonthRange>,
    /// How the end month bounds the range, e.g. `"end-of-month"`.
    pub boundary: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(range: Option<MonthRange>, boundary: &'a str, theme: &'a Theme) -> Self {
        Self {
            range,
            boundary,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let range = self
            .range
            .map_or_else(|| "no months available".to_string(), |r| r.to_string());

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" E-COMMERCE PUBLIC DATASET ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(range, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.boundary, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
