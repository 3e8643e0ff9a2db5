//! Start/end month selection driven by the keyboard.
//!
//! Both selectors pick from the same ordered list of available months. The
//! start selector may be moved past the end selector; [`RangeSelector::range`]
//! then yields an inverted range, which filters to nothing.

use dashboard_core::month::{MonthRange, YearMonth};

// ── Active ────────────────────────────────────────────────────────────────────

/// Which of the two month selectors receives movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Active {
    #[default]
    Start,
    End,
}

impl Active {
    fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

// ── RangeSelector ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RangeSelector {
    months: Vec<YearMonth>,
    start: usize,
    end: usize,
    active: Active,
}

impl RangeSelector {
    /// Create a selector over `months` (ascending).
    ///
    /// `initial_start` / `initial_end` preselect a month; a month that is not
    /// offered snaps to the nearest available one. `None` means the first
    /// (for start) or last (for end) month.
    pub fn new(
        months: Vec<YearMonth>,
        initial_start: Option<YearMonth>,
        initial_end: Option<YearMonth>,
    ) -> Self {
        let last = months.len().saturating_sub(1);
        let start = initial_start.map_or(0, |m| nearest_index(&months, m));
        let end = initial_end.map_or(last, |m| nearest_index(&months, m));
        Self {
            months,
            start,
            end,
            active: Active::Start,
        }
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn active(&self) -> Active {
        self.active
    }

    pub fn start(&self) -> Option<YearMonth> {
        self.months.get(self.start).copied()
    }

    pub fn end(&self) -> Option<YearMonth> {
        self.months.get(self.end).copied()
    }

    /// Positions of the start and end selectors in [`months`](Self::months).
    pub fn indices(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// The currently selected range, or `None` when no months are available.
    pub fn range(&self) -> Option<MonthRange> {
        Some(MonthRange::new(self.start()?, self.end()?))
    }

    /// Move the active selector by `delta` months, clamped to the list.
    ///
    /// Returns `true` when the selection changed.
    pub fn step(&mut self, delta: i32) -> bool {
        if self.months.is_empty() {
            return false;
        }
        let last = (self.months.len() - 1) as i64;
        let slot = self.active_slot();
        let moved = (*slot as i64 + i64::from(delta)).clamp(0, last) as usize;
        let changed = moved != *slot;
        *slot = moved;
        changed
    }

    /// Move the active selector to the earliest month.
    pub fn jump_first(&mut self) -> bool {
        self.jump_to(0)
    }

    /// Move the active selector to the latest month.
    pub fn jump_last(&mut self) -> bool {
        let last = self.months.len().saturating_sub(1);
        self.jump_to(last)
    }

    pub fn toggle_active(&mut self) {
        self.active = self.active.other();
    }

    /// Select the full span again and give focus back to the start selector.
    ///
    /// Returns `true` when the selection changed.
    pub fn reset(&mut self) -> bool {
        let full = (0, self.months.len().saturating_sub(1));
        let changed = (self.start, self.end) != full;
        (self.start, self.end) = full;
        self.active = Active::Start;
        changed
    }

    fn jump_to(&mut self, index: usize) -> bool {
        if self.months.is_empty() {
            return false;
        }
        let slot = self.active_slot();
        let changed = *slot != index;
        *slot = index;
        changed
    }

    fn active_slot(&mut self) -> &mut usize {
        match self.active {
            Active::Start => &mut self.start,
            Active::End => &mut self.end,
        }
    }
}

/// Index of `month` in `months`, or of the closest month when absent.
fn nearest_index(months: &[YearMonth], month: YearMonth) -> usize {
    match months.binary_search(&month) {
        Ok(i) => i,
        Err(i) => {
            tracing::warn!(%month, "requested month is not available; snapping to nearest");
            i.min(months.len().saturating_sub(1))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
