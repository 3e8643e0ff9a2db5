//! Static summary tables for the selected range.
//!
//! Renders the monthly, review-score and payment-type summaries as three
//! bordered [`ratatui::widgets::Table`]s side by side, each with a
//! highlighted totals row.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::formatting::{format_count, format_share};
use dashboard_runtime::controller::DashboardSnapshot;

use crate::components::header::Header;
use crate::themes::Theme;

/// One summary ready to be drawn as a table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub title: &'static str,
    /// Header of the key column, e.g. `"Month"`.
    pub key_header: &'static str,
    /// Header of the count column, e.g. `"Orders"`.
    pub count_header: &'static str,
    /// `(key, count)` in display order.
    pub rows: Vec<(String, usize)>,
}

impl SummaryTable {
    pub fn total(&self) -> usize {
        self.rows.iter().map(|(_, c)| c).sum()
    }
}

/// The three summaries of `snapshot`, in display order.
pub fn summary_tables(snapshot: &DashboardSnapshot) -> [SummaryTable; 3] {
    [
        SummaryTable {
            title: "Monthly Orders",
            key_header: "Month",
            count_header: "Orders",
            rows: snapshot
                .monthly
                .iter()
                .map(|m| (m.month.to_string(), m.order_count))
                .collect(),
        },
        SummaryTable {
            title: "Review Scores",
            key_header: "Score",
            count_header: "Reviews",
            rows: snapshot
                .review_scores
                .iter()
                .map(|r| (r.score.to_string(), r.count))
                .collect(),
        },
        SummaryTable {
            title: "Payment Types",
            key_header: "Type",
            count_header: "Payments",
            rows: snapshot
                .payment_types
                .iter()
                .map(|p| (p.payment_type.clone(), p.count))
                .collect(),
        },
    ]
}

fn render_summary_table(frame: &mut Frame, area: Rect, summary: &SummaryTable, theme: &Theme) {
    let total = summary.total();

    let header = Row::new(
        [summary.key_header, summary.count_header, "Share"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = summary
        .rows
        .iter()
        .enumerate()
        .map(|(i, (key, count))| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(key.clone()),
                Cell::from(format_count(*count)),
                Cell::from(format_share(*count, total)),
            ])
            .style(style)
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(format_count(total)),
            Cell::from(format!("{} rows", summary.rows.len())),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Min(12),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", summary.title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the header and the three summary tables into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    boundary: &str,
    theme: &Theme,
) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Header::new(snapshot.range, boundary, theme);
    frame.render_widget(Paragraph::new(header.to_lines()), sections[0]);
    frame.render_widget(
        Paragraph::new(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
        sections[2],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(sections[1]);

    for (summary, column) in summary_tables(snapshot).iter().zip(columns.iter()) {
        render_summary_table(frame, *column, summary, theme);
    }
}

/// Render a "no data" placeholder when the range holds no orders.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No orders found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Check --data-dir and the --start/--end months.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Orders Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
