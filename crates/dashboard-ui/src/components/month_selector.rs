use dashboard_core::month::YearMonth;
use dashboard_runtime::selector::{Active, RangeSelector};
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// The start/end month pickers drawn as one line:
///
/// ```text
/// Start ◀ 2017-01 ▶    End ◀ 2018-08 ▶    (20 months)
/// ```
///
/// The picker receiving arrow keys is drawn in the active style.
pub struct MonthSelectorLine<'a> {
    pub selector: &'a RangeSelector,
    pub theme: &'a Theme,
}

impl<'a> MonthSelectorLine<'a> {
    pub fn new(selector: &'a RangeSelector, theme: &'a Theme) -> Self {
        Self { selector, theme }
    }

    fn picker(&self, label: &'static str, value: String, active: bool) -> Vec<Span<'a>> {
        let arrows = if active {
            self.theme.info
        } else {
            self.theme.dim
        };
        vec![
            Span::styled(label, self.theme.label),
            Span::styled(" ◀ ", arrows),
            Span::styled(value, self.theme.selector_style(active)),
            Span::styled(" ▶", arrows),
        ]
    }

    pub fn to_line(&self) -> Line<'a> {
        if self.selector.is_empty() {
            return Line::from(Span::styled("No months to select", self.theme.dim));
        }

        let show =
            |m: Option<YearMonth>| m.map_or_else(|| "-------".to_string(), |m| m.to_string());
        let active = self.selector.active();
        let (start, end) = self.selector.indices();

        let mut spans = self.picker(
            "Start",
            show(self.selector.start()),
            active == Active::Start,
        );
        spans.push(Span::raw("    "));
        spans.extend(self.picker("End", show(self.selector.end()), active == Active::End));
        spans.push(Span::raw("    "));

        if start > end {
            spans.push(Span::styled("(start is after end)", self.theme.warning));
        } else {
            let months = end - start + 1;
            let unit = if months == 1 { "month" } else { "months" };
            spans.push(Span::styled(format!("({months} {unit})"), self.theme.dim));
        }
        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
