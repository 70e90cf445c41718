use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::api::{PageResponse, User};
use crate::config::Colors;

use super::PanelScroll;

const PLACEHOLDER: &str = "Select User";
const LOADING_LABEL: &str = "Loading…";
const NO_MORE_LABEL: &str = "No more users";

/// Panel shows at most this many rows before scrolling.
const MAX_VISIBLE_ROWS: u16 = 10;
const MIN_PANEL_WIDTH: u16 = 24;
const CONTROL_HEIGHT: u16 = 3;

/// What a mouse-down position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The collapsed control.
    Control,
    /// A selectable row of the open panel.
    Item(usize),
    /// Panel chrome: borders, loading/no-more rows.
    Panel,
    /// Anywhere else on the screen.
    Outside,
}

/// Dropdown state: the accumulated user list, pagination cursor, selection,
/// and the geometry captured during the last render (used for hit-testing).
///
/// The list is append-only for the lifetime of the widget; the cursor only
/// advances when a page merges successfully, so a failed fetch is retried
/// with the same page number by the next trigger.
#[derive(Debug, Default)]
pub struct DropdownState {
    users: Vec<User>,
    selected_id: Option<u64>,
    pub open: bool,
    pub loading: bool,
    has_more: bool,
    next_page: u32,
    total: Option<u32>,
    pub scroll: PanelScroll,
    hover_row: Option<usize>,
    pinned_width: u16,
    control_area: Rect,
    panel_area: Rect,
}

impl DropdownState {
    pub fn new() -> Self {
        Self {
            has_more: true,
            next_page: 1,
            ..Default::default()
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Total count reported by the most recent page, if any page merged yet.
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    pub fn pinned_width(&self) -> u16 {
        self.pinned_width
    }

    /// Current selection, resolved by id against the accumulated list.
    pub fn selected(&self) -> Option<&User> {
        let id = self.selected_id?;
        self.users.iter().find(|u| u.id == id)
    }

    /// Flip open/closed. Returns the page to fetch when opening should
    /// trigger the initial load (nothing merged yet and more available).
    pub fn toggle_open(&mut self) -> Option<u32> {
        self.open = !self.open;
        if !self.open {
            self.hover_row = None;
        }
        (self.open && self.users.is_empty() && self.has_more && !self.loading)
            .then_some(self.next_page)
    }

    /// The panel scrolled to the end of its content. Returns the page to
    /// fetch when another page is available and nothing is in flight.
    pub fn reached_end(&mut self) -> Option<u32> {
        (self.has_more && !self.loading).then_some(self.next_page)
    }

    /// Mark a request as outstanding.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// Merge a successful page: append in payload order and advance the
    /// cursor. More pages are available while the delivered range ends
    /// short of the reported total.
    pub fn apply_page(&mut self, page: PageResponse) {
        self.users.extend(page.data);
        self.has_more = page.meta.to < page.meta.total;
        self.total = Some(page.meta.total);
        self.next_page += 1;
        self.loading = false;
    }

    /// A fetch failed: clear the in-flight flag and leave everything else
    /// alone so the same page is retried by the next trigger.
    pub fn fetch_failed(&mut self) {
        self.loading = false;
    }

    /// Commit the selection and close, regardless of prior state.
    pub fn select(&mut self, index: usize) {
        if let Some(user) = self.users.get(index) {
            self.selected_id = Some(user.id);
        }
        self.open = false;
        self.hover_row = None;
    }

    /// Close in response to a pointer-down outside the widget.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.hover_row = None;
    }

    /// Classify a pointer position against the geometry of the last render.
    pub fn hit(&self, column: u16, row: u16) -> Hit {
        let pos = Position::new(column, row);
        if self.control_area.contains(pos) {
            return Hit::Control;
        }
        if self.open && self.panel_area.contains(pos) {
            if let Some(index) = self.item_at(column, row) {
                return Hit::Item(index);
            }
            return Hit::Panel;
        }
        Hit::Outside
    }

    pub fn hover_at(&mut self, column: u16, row: u16) {
        self.hover_row = if self.open {
            self.item_at(column, row)
        } else {
            None
        };
    }

    /// Rows of the panel interior visible at once.
    pub fn panel_visible_rows(&self) -> usize {
        panel_inner(self.panel_area).height as usize
    }

    fn item_at(&self, column: u16, row: u16) -> Option<usize> {
        let inner = panel_inner(self.panel_area);
        if !inner.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.scroll.row_at((row - inner.y) as usize)?;
        // Trailing loading/no-more rows are not selectable.
        (index < self.users.len()).then_some(index)
    }

    /// Record the measured panel width. First measurement wins; reopening
    /// never changes it.
    fn pin_width(&mut self, width: u16) {
        if self.pinned_width == 0 {
            self.pinned_width = width;
        }
    }

    fn control_label(&self) -> String {
        match self.selected() {
            Some(user) => format!("{}, {}", user.display_name(), user.job_label()),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Rows the open panel holds: every user plus a trailing status row
    /// while loading or once the source is exhausted.
    fn panel_rows(&self) -> usize {
        let status = (self.loading || !self.has_more) as usize;
        self.users.len() + status
    }
}

/// Dropdown widget: the collapsed control plus, while open, the list panel.
pub struct Dropdown<'a> {
    colors: &'a Colors,
}

impl<'a> Dropdown<'a> {
    pub fn new(colors: &'a Colors) -> Self {
        Self { colors }
    }

    fn render_control(&self, area: Rect, buf: &mut Buffer, state: &mut DropdownState) {
        let label = state.control_label();
        let arrow = if state.open { "▲" } else { "▼" };

        let natural = label.width() as u16 + 6; // borders, padding, arrow
        let width = if state.pinned_width > 0 {
            state.pinned_width
        } else {
            natural.max(MIN_PANEL_WIDTH)
        }
        .min(area.width);

        let control = Rect {
            x: area.x,
            y: area.y,
            width,
            height: CONTROL_HEIGHT.min(area.height),
        };
        state.control_area = control;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.colors.border_style(state.open));
        let inner = block.inner(control);
        block.render(control, buf);
        if inner.height == 0 {
            return;
        }

        let label_style = if state.selected().is_some() {
            self.colors.style_text()
        } else {
            self.colors.style_muted()
        };
        let label_width = inner.width.saturating_sub(2) as usize;
        let text = truncate(&label, label_width);
        let pad = label_width.saturating_sub(text.width());
        let line = Line::from(vec![
            Span::styled(format!(" {}", text), label_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(arrow, self.colors.style_header()),
        ]);
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }

    fn render_panel(&self, area: Rect, buf: &mut Buffer, state: &mut DropdownState) {
        let rows = state.panel_rows().max(1);
        state.scroll.set_len(state.panel_rows());

        let below = area.height.saturating_sub(state.control_area.height);
        let height = (rows as u16).min(MAX_VISIBLE_ROWS).saturating_add(2).min(below);
        let width = if state.pinned_width > 0 {
            state.pinned_width
        } else {
            natural_panel_width(state).min(area.width)
        };

        let panel = Rect {
            x: area.x,
            y: area.y + state.control_area.height,
            width,
            height,
        };
        state.panel_area = panel;
        if !state.users.is_empty() {
            state.pin_width(panel.width);
        }

        let title = match state.total {
            Some(total) => format!("Users ({}/{})", state.users.len(), total),
            None => "Users".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.colors.border_style(true))
            .title(Span::styled(title, self.colors.style_header()));
        let inner = block.inner(panel);
        block.render(panel, buf);

        for visible_row in 0..inner.height as usize {
            let Some(index) = state.scroll.row_at(visible_row) else {
                break;
            };
            let y = inner.y + visible_row as u16;
            let line = if index < state.users.len() {
                let user = &state.users[index];
                let selected = state.selected_id == Some(user.id);
                let hovered = state.hover_row == Some(index);
                self.user_line(user, selected, hovered, inner.width as usize)
            } else if state.loading {
                Line::from(Span::styled(LOADING_LABEL, self.colors.style_muted()))
            } else {
                Line::from(Span::styled(NO_MORE_LABEL, self.colors.style_muted()))
            };
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }

    fn user_line(&self, user: &User, selected: bool, hovered: bool, width: usize) -> Line<'static> {
        let marker = if selected { "✓" } else { " " };
        let initial = user.last_name.chars().next().unwrap_or(' ');

        let (marker_style, name_style, job_style) = if hovered {
            let hover = self.colors.style_hover();
            (hover, hover, hover)
        } else if selected {
            (
                self.colors.style_selected(),
                self.colors.style_selected(),
                self.colors.style_muted(),
            )
        } else {
            (
                self.colors.style_muted(),
                self.colors.style_text(),
                self.colors.style_muted(),
            )
        };

        let name = format!("{},", user.display_name());
        let fixed = 5; // marker, icon, separators
        let name_width = name.width();
        let job = truncate(user.job_label(), width.saturating_sub(fixed + name_width));

        Line::from(vec![
            Span::styled(format!("{} ", marker), marker_style),
            Span::styled(format!("{} ", initial), self.colors.style_header()),
            Span::styled(name, name_style),
            Span::styled(format!(" {}", job), job_style),
        ])
    }
}

impl<'a> StatefulWidget for Dropdown<'a> {
    type State = DropdownState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        self.render_control(area, buf, state);

        if state.open {
            self.render_panel(area, buf, state);
        } else {
            state.panel_area = Rect::default();
        }
    }
}

fn panel_inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

/// Width the panel wants for its current content, borders included.
fn natural_panel_width(state: &DropdownState) -> u16 {
    let content = state
        .users
        .iter()
        .map(|user| {
            let row = format!("x X {}, {}", user.display_name(), user.job_label());
            row.width()
        })
        .max()
        .unwrap_or(0)
        .max(LOADING_LABEL.width());
    ((content as u16).saturating_add(2)).max(MIN_PANEL_WIDTH)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        s.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PageMeta;

    fn make_user(id: u64) -> User {
        User {
            id,
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            email: format!("user{}@example.com", id),
            job: (id % 2 == 0).then(|| "Engineer".to_string()),
        }
    }

    fn make_page(ids: std::ops::RangeInclusive<u64>, total: u32) -> PageResponse {
        let from = *ids.start() as u32;
        let to = *ids.end() as u32;
        PageResponse {
            data: ids.map(make_user).collect(),
            meta: PageMeta { from, to, total },
        }
    }

    fn loaded_state(pages: &[(std::ops::RangeInclusive<u64>, u32)]) -> DropdownState {
        let mut state = DropdownState::new();
        for (ids, total) in pages {
            state.begin_fetch();
            state.apply_page(make_page(ids.clone(), *total));
        }
        state
    }

    // --- Pagination ---

    #[test]
    fn open_triggers_initial_load_only() {
        let mut state = DropdownState::new();
        assert_eq!(state.toggle_open(), Some(1));
        assert!(state.open);

        // Closing fetches nothing.
        assert_eq!(state.toggle_open(), None);

        // Reopening after a successful load fetches nothing.
        state.begin_fetch();
        state.apply_page(make_page(1..=50, 120));
        assert_eq!(state.toggle_open(), None);
        assert!(state.open);
    }

    #[test]
    fn reopen_after_failed_initial_load_retries_page_one() {
        let mut state = DropdownState::new();
        assert_eq!(state.toggle_open(), Some(1));
        state.begin_fetch();
        state.fetch_failed();
        state.toggle_open();
        assert_eq!(state.toggle_open(), Some(1));
    }

    #[test]
    fn pages_append_in_order() {
        let state = loaded_state(&[(1..=50, 120), (51..=100, 120)]);
        assert_eq!(state.users().len(), 100);
        assert_eq!(state.users()[0].id, 1);
        assert_eq!(state.users()[49].id, 50);
        assert_eq!(state.users()[50].id, 51);
        assert_eq!(state.users()[99].id, 100);
        assert_eq!(state.next_page(), 3);
    }

    #[test]
    fn has_more_tracks_delivered_range() {
        let mut state = loaded_state(&[(1..=50, 120), (51..=100, 120)]);
        assert!(state.has_more());

        state.begin_fetch();
        state.apply_page(make_page(101..=120, 120));
        assert_eq!(state.users().len(), 120);
        assert!(!state.has_more());

        // Exhausted: scrolling to the end never fetches again.
        assert_eq!(state.reached_end(), None);
    }

    #[test]
    fn no_second_fetch_while_in_flight() {
        let mut state = loaded_state(&[(1..=50, 120)]);
        assert_eq!(state.reached_end(), Some(2));
        state.begin_fetch();
        assert_eq!(state.reached_end(), None);
        assert_eq!(state.toggle_open(), None);
    }

    #[test]
    fn failed_scroll_fetch_retries_same_page() {
        let mut state = loaded_state(&[(1..=50, 120)]);
        assert_eq!(state.reached_end(), Some(2));
        state.begin_fetch();
        state.fetch_failed();
        // Cursor did not advance on failure.
        assert_eq!(state.next_page(), 2);
        assert_eq!(state.reached_end(), Some(2));
    }

    #[test]
    fn duplicate_ids_pass_through_unchanged() {
        // No de-duplication by id: the list is the exact concatenation of
        // the merged payloads.
        let state = loaded_state(&[(1..=2, 4), (2..=3, 4)]);
        let ids: Vec<u64> = state.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 2, 3]);
    }

    // --- Selection and dismissal ---

    #[test]
    fn select_sets_selection_and_closes() {
        let mut state = loaded_state(&[(1..=10, 10)]);
        state.toggle_open();
        assert!(state.open);

        state.select(6);
        assert!(!state.open);
        assert_eq!(state.selected().map(|u| u.id), Some(7));
    }

    #[test]
    fn select_while_closed_still_selects() {
        let mut state = loaded_state(&[(1..=10, 10)]);
        state.select(0);
        assert!(!state.open);
        assert_eq!(state.selected().map(|u| u.id), Some(1));
    }

    #[test]
    fn selection_survives_later_pages() {
        let mut state = loaded_state(&[(1..=50, 120)]);
        state.select(6);
        state.begin_fetch();
        state.apply_page(make_page(51..=100, 120));
        assert_eq!(state.selected().map(|u| u.id), Some(7));
    }

    #[test]
    fn dismiss_closes() {
        let mut state = DropdownState::new();
        state.toggle_open();
        assert!(state.open);
        state.dismiss();
        assert!(!state.open);
        // Harmless when already closed.
        state.dismiss();
        assert!(!state.open);
    }

    // --- Hit testing ---

    fn rendered_open_state() -> DropdownState {
        let mut state = loaded_state(&[(1..=10, 10)]);
        state.toggle_open();
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let colors = Colors::dark();
        Dropdown::new(&colors).render(Rect::new(0, 0, 80, 24), &mut buf, &mut state);
        state
    }

    #[test]
    fn hit_classifies_control_items_and_outside() {
        let state = rendered_open_state();
        let control = state.control_area;
        let panel = state.panel_area;
        assert!(control.width > 0 && panel.width > 0);

        assert_eq!(state.hit(control.x + 1, control.y + 1), Hit::Control);
        // First visible row of the panel interior.
        assert_eq!(state.hit(panel.x + 1, panel.y + 1), Hit::Item(0));
        // Panel border is chrome, not an item.
        assert_eq!(state.hit(panel.x, panel.y), Hit::Panel);
        assert_eq!(state.hit(79, 23), Hit::Outside);
    }

    #[test]
    fn closed_panel_is_outside() {
        let mut state = rendered_open_state();
        state.dismiss();
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let colors = Colors::dark();
        Dropdown::new(&colors).render(Rect::new(0, 0, 80, 24), &mut buf, &mut state);
        // The old panel region no longer swallows clicks.
        assert_eq!(state.hit(2, 5), Hit::Outside);
    }

    #[test]
    fn status_row_is_not_selectable() {
        let mut state = loaded_state(&[(1..=3, 3)]);
        state.toggle_open();
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let colors = Colors::dark();
        Dropdown::new(&colors).render(Rect::new(0, 0, 80, 24), &mut buf, &mut state);

        let panel = state.panel_area;
        // Row after the last user is the "No more users" row.
        assert_eq!(state.hit(panel.x + 1, panel.y + 4), Hit::Panel);
    }

    // --- Width pinning ---

    #[test]
    fn panel_width_pins_once() {
        let mut state = rendered_open_state();
        let pinned = state.pinned_width();
        assert!(pinned > 0);

        // Longer content later never changes the pinned width.
        state.begin_fetch();
        let mut wide = make_user(999);
        wide.last_name = "Extraordinarily-Long-Surname".to_string();
        state.apply_page(PageResponse {
            data: vec![wide],
            meta: PageMeta { from: 11, to: 11, total: 11 },
        });
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let colors = Colors::dark();
        Dropdown::new(&colors).render(Rect::new(0, 0, 80, 24), &mut buf, &mut state);

        assert_eq!(state.pinned_width(), pinned);
        assert_eq!(state.panel_area.width, pinned);
        assert_eq!(state.control_area.width, pinned);
    }

    #[test]
    fn unopened_widget_never_pins() {
        let mut state = loaded_state(&[(1..=10, 10)]);
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let colors = Colors::dark();
        Dropdown::new(&colors).render(Rect::new(0, 0, 80, 24), &mut buf, &mut state);
        assert_eq!(state.pinned_width(), 0);
    }

    #[test]
    fn control_shows_selection() {
        let mut state = loaded_state(&[(1..=10, 10)]);
        assert_eq!(state.control_label(), PLACEHOLDER);
        state.select(1);
        assert_eq!(state.control_label(), "Last2 First2, Engineer");
        state.select(0);
        assert_eq!(state.control_label(), "Last1 First1, No Job");
    }
}
