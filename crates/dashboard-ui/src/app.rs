//! Main application state and TUI event loop for the orders dashboard.
//!
//! [`App`] owns the theme, view mode, month selector and the snapshot for the
//! selected range. Every selector change recomputes the snapshot through the
//! [`DashboardController`] before the next frame is drawn.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::debug;

use dashboard_runtime::controller::{DashboardController, DashboardSnapshot};
use dashboard_runtime::selector::RangeSelector;

use crate::dashboard_view;
use crate::table_view;
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Interactive dashboard with month pickers and charts.
    Dashboard,
    /// Static summary tables for the initial range.
    Table,
}

impl ViewMode {
    /// Map a `--view` value to a mode; anything unknown is the dashboard.
    pub fn from_name(name: &str) -> Self {
        match name {
            "table" => Self::Table,
            _ => Self::Dashboard,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the orders dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    /// End-boundary label shown in the header, e.g. `"end-of-month"`.
    pub boundary_label: &'static str,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    pub controller: DashboardController,
    pub selector: RangeSelector,
    /// Snapshot for the selector's current range.
    pub snapshot: DashboardSnapshot,
}

impl App {
    /// Construct the application and compute the first snapshot.
    pub fn new(
        theme_name: &str,
        view_mode: ViewMode,
        controller: DashboardController,
        selector: RangeSelector,
    ) -> Self {
        let snapshot = controller.render_selection(&selector);
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            boundary_label: controller.boundary().as_str(),
            should_quit: false,
            controller,
            selector,
            snapshot,
        }
    }

    /// Recompute the snapshot for the current selection.
    pub fn refresh(&mut self) {
        self.snapshot = self.controller.render_selection(&self.selector);
    }

    /// Apply one key press.
    ///
    /// Returns `true` when the selection changed and the snapshot was
    /// recomputed. Quit keys set [`App::should_quit`] instead. The table view
    /// only reacts to quit keys.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        let changed = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                false
            }
            // The table view is static.
            _ if self.view_mode == ViewMode::Table => false,
            KeyCode::Tab | KeyCode::BackTab => {
                self.selector.toggle_active();
                false
            }
            KeyCode::Left | KeyCode::Char('h') => self.selector.step(-1),
            KeyCode::Right | KeyCode::Char('l') => self.selector.step(1),
            KeyCode::Home => self.selector.jump_first(),
            KeyCode::End => self.selector.jump_last(),
            KeyCode::Char('r') => self.selector.reset(),
            _ => false,
        };

        if changed {
            self.refresh();
            debug!(
                start = ?self.selector.start(),
                end = ?self.selector.end(),
                "selection changed"
            );
        }
        changed
    }

    /// Set [`App::should_quit`] once `shutdown` has been raised from outside
    /// the event loop (the OS Ctrl+C handler).
    pub fn check_shutdown(&mut self, shutdown: &AtomicBool) {
        if shutdown.load(Ordering::Relaxed) {
            self.should_quit = true;
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the TUI in the current view mode until `q`, `Q`, `Ctrl+C` or
    /// `shutdown` is raised.
    ///
    /// Blocking: `crossterm::event::poll` waits at most 250 ms per iteration,
    /// so a raised `shutdown` is seen within one tick. The terminal is
    /// restored on every exit path, including I/O errors inside the loop.
    pub fn run(mut self, shutdown: &AtomicBool) -> io::Result<()> {
        let mut terminal = enter_terminal()?;
        with_restore(
            &mut terminal,
            |terminal| self.event_loop(terminal, shutdown),
            leave_terminal,
        )
    }

    fn event_loop(
        &mut self,
        terminal: &mut DashboardTerminal,
        shutdown: &AtomicBool,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);

        loop {
            self.check_shutdown(shutdown);
            if self.should_quit {
                return Ok(());
            }

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        match self.view_mode {
            ViewMode::Dashboard => dashboard_view::render_dashboard(
                frame,
                area,
                &self.snapshot,
                &self.selector,
                self.boundary_label,
                &self.theme,
            ),
            ViewMode::Table => {
                if self.controller.dataset().is_empty() {
                    table_view::render_no_data(frame, area, &self.theme);
                } else {
                    table_view::render_table_view(
                        frame,
                        area,
                        &self.snapshot,
                        self.boundary_label,
                        &self.theme,
                    );
                }
            }
        }
    }
}

type DashboardTerminal = Terminal<CrosstermBackend<io::Stdout>>;

fn enter_terminal() -> io::Result<DashboardTerminal> {
    enable_raw_mode()?;
    let entered = execute!(io::stdout(), EnterAlternateScreen)
        .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));
    if entered.is_err() {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
    entered
}

fn leave_terminal(terminal: &mut DashboardTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Run `body` on `target`, then always run `restore`.
///
/// An error from `body` wins over one from `restore`.
fn with_restore<T, R>(
    target: &mut T,
    body: impl FnOnce(&mut T) -> io::Result<R>,
    restore: impl FnOnce(&mut T) -> io::Result<()>,
) -> io::Result<R> {
    let result = body(target);
    let restored = restore(target);
    let value = result?;
    restored?;
    Ok(value)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use dashboard_core::models::UnifiedRecord;
    use dashboard_data::dataset::Dataset;
    use dashboard_data::filter::EndBoundary;
    use dashboard_runtime::selector::Active;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn row(order_id: &str, ts: &str, score: u8, payment: &str) -> UnifiedRecord {
        UnifiedRecord {
            order_id: order_id.to_string(),
            purchase_timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            review_id: Some(format!("r-{order_id}")),
            review_score: Some(score),
            payment_type: Some(payment.to_string()),
        }
    }

    fn controller() -> DashboardController {
        let dataset = Dataset::from_records(vec![
            row("O1", "2023-01-15 10:00:00", 5, "credit_card"),
            row("O2", "2023-02-10 09:30:00", 3, "credit_card"),
            row("O2", "2023-02-10 09:30:00", 3, "voucher"),
            row("O3", "2023-03-01 00:00:00", 4, "boleto"),
        ]);
        DashboardController::new(Arc::new(dataset), EndBoundary::EndOfMonth)
    }

    fn app() -> App {
        let controller = controller();
        let selector = controller.selector(None, None);
        App::new("dark", ViewMode::Dashboard, controller, selector)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    // ── ViewMode ──────────────────────────────────────────────────────────────

    #[test]
    fn test_view_mode_from_name() {
        assert_eq!(ViewMode::from_name("table"), ViewMode::Table);
        assert_eq!(ViewMode::from_name("dashboard"), ViewMode::Dashboard);
        assert_eq!(ViewMode::from_name("realtime"), ViewMode::Dashboard);
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_computes_full_range_snapshot() {
        let app = app();
        assert!(!app.should_quit);
        assert_eq!(app.boundary_label, "end-of-month");
        assert_eq!(app.snapshot.total_orders, 3);
        assert_eq!(app.snapshot.monthly.len(), 3);
    }

    #[test]
    fn test_app_creation_unknown_theme_falls_back() {
        let controller = controller();
        let selector = controller.selector(None, None);
        let app = App::new("neon", ViewMode::Table, controller, selector);
        assert_eq!(app.view_mode, ViewMode::Table);
    }

    #[test]
    fn test_app_creation_empty_dataset() {
        let dataset = Arc::new(Dataset::from_records(Vec::new()));
        let controller = DashboardController::new(dataset, EndBoundary::MonthStart);
        let selector = controller.selector(None, None);
        let app = App::new("dark", ViewMode::Dashboard, controller, selector);
        assert!(app.snapshot.is_empty());
        assert!(app.snapshot.range.is_none());
        assert_eq!(app.boundary_label, "month-start");
    }

    // ── handle_key ────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut a = app();
        assert!(!a.handle_key(press(KeyCode::Char('q'))));
        assert!(a.should_quit);

        let mut a = app();
        a.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(a.should_quit);

        let mut a = app();
        a.handle_key(press(KeyCode::Char('c')));
        assert!(!a.should_quit);
    }

    #[test]
    fn test_step_start_narrows_snapshot() {
        let mut a = app();
        assert!(a.handle_key(press(KeyCode::Right)));
        assert_eq!(a.selector.start().unwrap().to_string(), "2023-02");
        assert_eq!(a.snapshot.total_orders, 2);
        assert_eq!(a.snapshot.total_payments(), 3);
    }

    #[test]
    fn test_tab_switches_to_end_picker() {
        let mut a = app();
        assert!(!a.handle_key(press(KeyCode::Tab)));
        assert_eq!(a.selector.active(), Active::End);
        assert!(a.handle_key(press(KeyCode::Char('h'))));
        assert_eq!(a.selector.end().unwrap().to_string(), "2023-02");
        assert_eq!(a.snapshot.total_orders, 2);
    }

    #[test]
    fn test_step_at_edge_is_not_a_change() {
        let mut a = app();
        assert!(!a.handle_key(press(KeyCode::Left)));
        assert!(!a.handle_key(press(KeyCode::Home)));
    }

    #[test]
    fn test_inverted_selection_gives_empty_snapshot() {
        let mut a = app();
        a.handle_key(press(KeyCode::End));
        a.handle_key(press(KeyCode::BackTab));
        a.handle_key(press(KeyCode::Home));
        assert_eq!(a.selector.start().unwrap().to_string(), "2023-03");
        assert_eq!(a.selector.end().unwrap().to_string(), "2023-01");
        assert!(a.snapshot.is_empty());
        assert_eq!(a.snapshot.total_orders, 0);
    }

    #[test]
    fn test_reset_restores_full_range() {
        let mut a = app();
        a.handle_key(press(KeyCode::Right));
        assert!(a.handle_key(press(KeyCode::Char('r'))));
        assert_eq!(a.snapshot.total_orders, 3);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut a = app();
        let mut key = press(KeyCode::Right);
        key.kind = KeyEventKind::Release;
        assert!(!a.handle_key(key));
        assert_eq!(a.selector.start().unwrap().to_string(), "2023-01");
    }

    #[test]
    fn test_table_view_ignores_navigation_keys() {
        let mut a = app();
        a.view_mode = ViewMode::Table;
        assert!(!a.handle_key(press(KeyCode::Right)));
        assert!(!a.handle_key(press(KeyCode::Char('r'))));
        assert_eq!(a.selector.start().unwrap().to_string(), "2023-01");
        assert!(!a.should_quit);

        a.handle_key(press(KeyCode::Char('Q')));
        assert!(a.should_quit);
    }

    // ── shutdown ──────────────────────────────────────────────────────────────

    #[test]
    fn test_check_shutdown_sets_should_quit() {
        let mut a = app();
        let flag = AtomicBool::new(false);
        a.check_shutdown(&flag);
        assert!(!a.should_quit);

        flag.store(true, Ordering::Relaxed);
        a.check_shutdown(&flag);
        assert!(a.should_quit);
    }

    // ── with_restore ──────────────────────────────────────────────────────────

    #[test]
    fn test_restore_runs_when_body_fails() {
        let mut restored = false;
        let result: io::Result<()> = with_restore(
            &mut restored,
            |_| Err(io::Error::other("draw failed")),
            |flag| {
                *flag = true;
                Ok(())
            },
        );
        assert!(restored, "restore must run after a failing body");
        assert_eq!(result.unwrap_err().to_string(), "draw failed");
    }

    #[test]
    fn test_restore_runs_on_success_and_keeps_value() {
        let mut calls = Vec::new();
        let result = with_restore(
            &mut calls,
            |calls| {
                calls.push("body");
                Ok(7)
            },
            |calls| {
                calls.push("restore");
                Ok(())
            },
        );
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, vec!["body", "restore"]);
    }

    #[test]
    fn test_body_error_wins_over_restore_error() {
        let mut state = 0u8;
        let result: io::Result<()> = with_restore(
            &mut state,
            |_| Err(io::Error::other("body")),
            |_| Err(io::Error::other("restore")),
        );
        assert_eq!(result.unwrap_err().to_string(), "body");
    }

    #[test]
    fn test_restore_error_surfaces_after_successful_body() {
        let mut state = 0u8;
        let result = with_restore(&mut state, |_| Ok(()), |_| Err(io::Error::other("restore")));
        assert_eq!(result.unwrap_err().to_string(), "restore");
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_both_views_does_not_panic() {
        let mut a = app();
        for mode in [ViewMode::Dashboard, ViewMode::Table] {
            a.view_mode = mode;
            let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
            terminal.draw(|frame| a.render(frame)).unwrap();
        }
    }
}
