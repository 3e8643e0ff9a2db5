//! Interactive dashboard screen.
//!
//! Layout, top to bottom: header, month selectors, the total-orders metric,
//! the monthly orders line chart, then review scores and payment types side
//! by side, and a key-help footer.

use dashboard_core::formatting::format_count;
use dashboard_core::models::{MonthlyOrderCount, PaymentTypeCount, ReviewScoreCount};
use dashboard_runtime::controller::DashboardSnapshot;
use dashboard_runtime::selector::RangeSelector;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::components::bar::{HorizontalBar, ShareBar};
use crate::components::header::Header;
use crate::components::month_selector::MonthSelectorLine;
use crate::themes::Theme;

/// Key bindings shown in the footer.
pub const HELP_TEXT: &str =
    "Tab switch month · ←/→ move · Home/End first/last · r reset · q quit";

// ── Line builders ─────────────────────────────────────────────────────────────

/// `Total orders: 1,234`
pub fn metric_line<'a>(total_orders: usize, theme: &'a Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled("Total orders: ", theme.label),
        Span::styled(format_count(total_orders), theme.metric),
    ])
}

/// One horizontal bar per payment type, largest first and highlighted.
pub fn payment_lines<'a>(
    payments: &[PaymentTypeCount],
    width: u16,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let Some(max) = payments.iter().map(|p| p.count).max() else {
        return vec![Line::from(Span::styled("No payments in range", theme.dim))];
    };
    let label_width = payments
        .iter()
        .map(|p| p.payment_type.width())
        .max()
        .unwrap_or(0);
    let max_count_width = format_count(max).len();
    // label, gap, bar, gap, count
    let bar_width = width.saturating_sub((label_width + max_count_width + 2) as u16);

    payments
        .iter()
        .enumerate()
        .map(|(rank, p)| {
            HorizontalBar::new(p.payment_type.clone(), p.count, max, theme)
                .label_width(label_width)
                .width(bar_width)
                .highlight(rank == 0)
                .to_line()
        })
        .collect()
}

/// Chart points: x is the month index, y the order count.
pub fn monthly_points(monthly: &[MonthlyOrderCount]) -> Vec<(f64, f64)> {
    monthly
        .iter()
        .enumerate()
        .map(|(i, m)| (i as f64, m.order_count as f64))
        .collect()
}

/// First, middle and last month labels for the x axis.
///
/// A lone month is paired with a blank label, since the axis spreads labels
/// from its left edge to its right edge.
pub fn month_axis_labels(monthly: &[MonthlyOrderCount]) -> Vec<String> {
    match monthly {
        [] => Vec::new(),
        [only] => vec![only.month.to_string(), String::new()],
        [first, last] => vec![first.month.to_string(), last.month.to_string()],
        _ => vec![
            monthly[0].month.to_string(),
            monthly[(monthly.len() - 1) / 2].month.to_string(),
            monthly[monthly.len() - 1].month.to_string(),
        ],
    }
}

/// Reviews ordered by score for the x axis, with the most frequent score
/// flagged for highlighting.
fn review_bars_by_score(reviews: &[ReviewScoreCount]) -> Vec<(ReviewScoreCount, bool)> {
    let top = reviews.first().map(|r| r.score);
    let mut bars: Vec<(ReviewScoreCount, bool)> =
        reviews.iter().map(|r| (*r, Some(r.score) == top)).collect();
    bars.sort_by_key(|(r, _)| r.score);
    bars
}

// ── Panels ────────────────────────────────────────────────────────────────────

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(title, theme.table_header))
}

fn render_monthly_chart(
    frame: &mut Frame,
    area: Rect,
    monthly: &[MonthlyOrderCount],
    theme: &Theme,
) {
    if monthly.is_empty() {
        return;
    }
    let points = monthly_points(monthly);
    let max = monthly.iter().map(|m| m.order_count).max().unwrap_or(0);
    let y_max = (max as f64 * 1.1).max(1.0);
    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("orders")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.chart_line)
            .data(&points),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(theme.bar_highlight)
            .data(&points),
    ];

    let y_labels = vec!["0".to_string(), format_count(max / 2), format_count(max)];

    let chart = Chart::new(datasets)
        .block(panel(" Monthly Orders ", theme))
        .x_axis(
            Axis::default()
                .title(Span::styled("Month", theme.label))
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(month_axis_labels(monthly)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Orders", theme.label))
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_review_panel(
    frame: &mut Frame,
    area: Rect,
    reviews: &[ReviewScoreCount],
    theme: &Theme,
) {
    let block = panel(" Review Scores ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if reviews.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No reviews in range", theme.dim)),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(inner);

    let bars: Vec<Bar> = review_bars_by_score(reviews)
        .into_iter()
        .map(|(r, top)| {
            let style = if top {
                theme.bar_highlight
            } else {
                theme.bar_normal
            };
            Bar::default()
                .value(r.count as u64)
                .label(Line::from(r.score.to_string()))
                .text_value(format_count(r.count))
                .style(style)
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2)
        .label_style(theme.label)
        .value_style(theme.value);
    frame.render_widget(chart, rows[0]);

    // Percentage breakdown of the scores.
    let mut share = ShareBar::new(
        reviews
            .iter()
            .map(|r| (r.score.to_string(), r.count))
            .collect(),
        theme,
    );
    share.width = rows[1].width;
    frame.render_widget(
        Paragraph::new(vec![share.bar_line(), share.legend_line()]),
        rows[1],
    );
}

fn render_payment_panel(
    frame: &mut Frame,
    area: Rect,
    payments: &[PaymentTypeCount],
    theme: &Theme,
) {
    let block = panel(" Payment Types ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(payment_lines(payments, inner.width, theme)),
        inner,
    );
}

/// Placeholder for a range that selects no orders.
pub fn render_no_orders(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No orders in range", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Move the start or end month to widen the selection.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'r' to select every month", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(panel(" Orders Dashboard ", theme)),
        area,
    );
}

// ── Main render ───────────────────────────────────────────────────────────────

/// Render the full dashboard for `snapshot` into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    selector: &RangeSelector,
    boundary: &str,
    theme: &Theme,
) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Header::new(snapshot.range, boundary, theme);
    frame.render_widget(Paragraph::new(header.to_lines()), sections[0]);
    frame.render_widget(
        Paragraph::new(MonthSelectorLine::new(selector, theme).to_line()),
        sections[1],
    );
    frame.render_widget(
        Paragraph::new(metric_line(snapshot.total_orders, theme)),
        sections[2],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(HELP_TEXT, theme.dim)),
        sections[4],
    );

    if snapshot.is_empty() {
        render_no_orders(frame, sections[3], theme);
        return;
    }

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(sections[3]);
    render_monthly_chart(frame, body[0], &snapshot.monthly, theme);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[1]);
    render_review_panel(frame, bottom[0], &snapshot.review_scores, theme);
    render_payment_panel(frame, bottom[1], &snapshot.payment_types, theme);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
