//! Page-number window shown under a list.

/// Visible window used by the dashboard tables.
pub const DEFAULT_WINDOW: u32 = 7;

/// One pagination control, in display order. Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Previous(u32),
    First,
    Ellipsis,
    Page { index: u32, active: bool },
    Last(u32),
    Next(u32),
}

/// The `[start, end)` range of page buttons around the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u32,
    pub end: u32,
    pub current: u32,
    pub total: u32,
}

impl PageWindow {
    /// Centres a window of `width` pages on `current`, then slides it back
    /// inside `[0, total)`. The window always holds `min(width, total)`
    /// pages. A zero width is treated as one.
    pub fn compute(current: u32, total: u32, width: u32) -> Self {
        let width = width.max(1);
        let start = current.saturating_sub(width / 2);
        let end = total.min(start.saturating_add(width));
        let start = end.saturating_sub(width);
        Self {
            start,
            end,
            current,
            total,
        }
    }

    pub fn pages(&self) -> Vec<u32> {
        (self.start..self.end).collect()
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn shows_first(&self) -> bool {
        self.start > 0
    }

    pub fn leading_ellipsis(&self) -> bool {
        self.start > 1
    }

    pub fn shows_last(&self) -> bool {
        self.end < self.total
    }

    pub fn trailing_ellipsis(&self) -> bool {
        self.end.saturating_add(1) < self.total
    }

    pub fn previous(&self) -> Option<u32> {
        (self.current > 0 && self.total > 0).then(|| self.current.min(self.total) - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.current
            .checked_add(1)
            .filter(|next| *next < self.total)
    }

    /// Full control strip: prev, first jump, window, last jump, next.
    pub fn controls(&self) -> Vec<PageControl> {
        let mut controls = Vec::with_capacity(self.len() as usize + 6);
        if let Some(prev) = self.previous() {
            controls.push(PageControl::Previous(prev));
        }
        if self.shows_first() {
            controls.push(PageControl::First);
            if self.leading_ellipsis() {
                controls.push(PageControl::Ellipsis);
            }
        }
        controls.extend((self.start..self.end).map(|index| PageControl::Page {
            index,
            active: index == self.current,
        }));
        if self.shows_last() {
            if self.trailing_ellipsis() {
                controls.push(PageControl::Ellipsis);
            }
            controls.push(PageControl::Last(self.total - 1));
        }
        if let Some(next) = self.next() {
            controls.push(PageControl::Next(next));
        }
        controls
    }
}

#[cfg(test)]
#[path = "tests/window_tests.rs"]
mod tests;
