use dashboard_core::formatting::{format_count, format_share};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Visual configuration shared by the span-drawn bars.
#[derive(Debug, Clone, Copy)]
pub struct BarConfig {
    /// Columns available to the bar itself (labels excluded).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

/// Pad `label` with trailing spaces to `width` display columns.
///
/// Labels wider than `width` are returned unchanged.
pub fn pad_label(label: &str, width: usize) -> String {
    let shown = label.width();
    if shown >= width {
        label.to_string()
    } else {
        format!("{label}{}", " ".repeat(width - shown))
    }
}

// ── HorizontalBar ────────────────────────────────────────────────────────────

/// One labelled row of a horizontal bar chart.
///
/// The bar length is `count / max` of the configured width; the count follows
/// the bar with thousands separators.
pub struct HorizontalBar<'a> {
    pub label: String,
    pub count: usize,
    /// Count of the longest bar in the chart.
    pub max: usize,
    /// Display columns reserved for the label.
    pub label_width: usize,
    /// Draw in the highlight colour.
    pub highlight: bool,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> HorizontalBar<'a> {
    pub fn new(label: impl Into<String>, count: usize, max: usize, theme: &'a Theme) -> Self {
        let label = label.into();
        let label_width = label.width();
        Self {
            label,
            count,
            max,
            label_width,
            highlight: false,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Filled column count, rounded, never above the configured width.
    pub fn filled(&self) -> u16 {
        if self.max == 0 {
            return 0;
        }
        let ratio = (self.count as f64 / self.max as f64).min(1.0);
        (ratio * f64::from(self.config.width)).round() as u16
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled();
        let empty = self.config.width.saturating_sub(filled);
        let bar_style = if self.highlight {
            self.theme.bar_highlight
        } else {
            self.theme.bar_normal
        };

        let filled_str: String =
            self.config.filled_char.to_string().repeat(filled as usize);
        let empty_str: String =
            self.config.empty_char.to_string().repeat(empty as usize);

        Line::from(vec![
            Span::styled(
                format!("{} ", pad_label(&self.label, self.label_width)),
                self.theme.label,
            ),
            Span::styled(filled_str, bar_style),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(format!(" {}", format_count(self.count)), self.theme.bar_label),
        ])
    }
}

// ── ShareBar ─────────────────────────────────────────────────────────────────

/// A proportional multi-coloured bar with a percentage legend.
///
/// Each `(label, count)` part becomes a contiguous segment whose width is its
/// share of the total. The last segment absorbs rounding so the bar always
/// spans exactly the configured width.
pub struct ShareBar<'a> {
    /// Parts in display order, largest first.
    pub parts: Vec<(String, usize)>,
    pub theme: &'a Theme,
    pub width: u16,
}

impl<'a> ShareBar<'a> {
    pub fn new(parts: Vec<(String, usize)>, theme: &'a Theme) -> Self {
        Self {
            parts,
            theme,
            width: 40,
        }
    }

    fn total(&self) -> usize {
        self.parts.iter().map(|(_, c)| c).sum()
    }

    /// The bar itself.
    pub fn bar_line(&self) -> Line<'a> {
        let width = usize::from(self.width);
        let total = self.total();
        if total == 0 {
            return Line::from(Span::styled("░".repeat(width), self.theme.bar_empty));
        }

        let visible: Vec<(usize, usize)> = self
            .parts
            .iter()
            .map(|(_, c)| *c)
            .enumerate()
            .filter(|(_, c)| *c > 0)
            .collect();

        let mut spans = Vec::with_capacity(visible.len());
        let mut used = 0usize;
        for (i, (rank, count)) in visible.iter().enumerate() {
            let cols = if i + 1 == visible.len() {
                width.saturating_sub(used)
            } else {
                ((*count as f64 / total as f64) * width as f64).floor() as usize
            };
            let cols = cols.min(width.saturating_sub(used));
            if cols > 0 {
                spans.push(Span::styled("█".repeat(cols), self.theme.share_style(*rank)));
                used += cols;
            }
        }
        Line::from(spans)
    }

    /// Legend in the form `5: 57.8% | 4: 19.3% | ...`, coloured per segment.
    pub fn legend_line(&self) -> Line<'a> {
        let total = self.total();
        if total == 0 {
            return Line::from(Span::styled("No data", self.theme.dim));
        }

        let mut spans = Vec::new();
        for (rank, (label, count)) in self.parts.iter().enumerate() {
            if rank > 0 {
                spans.push(Span::styled(" | ", self.theme.dim));
            }
            spans.push(Span::styled(
                format!("{label}: {}", format_share(*count, total)),
                self.theme.share_style(rank),
            ));
        }
        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
