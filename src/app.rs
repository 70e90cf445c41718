use anyhow::Result;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    text::{Line, Span},
    Frame,
};

use crate::api::UserClient;
use crate::async_loader::PageLoader;
use crate::config::Config;
use crate::event::KeyInput;
use crate::ui::{AppLayout, Dropdown, DropdownState, Hit};

/// Main application state
pub struct App {
    pub running: bool,
    pub config: Config,
    client: UserClient,
    loader: PageLoader,
    pub dropdown: DropdownState,
}

impl App {
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            running: true,
            config: Config::default(),
            client: UserClient::new(endpoint)?,
            loader: PageLoader::new(),
            dropdown: DropdownState::new(),
        })
    }

    /// Handle tick event - poll the background fetch
    pub fn handle_tick(&mut self) {
        if let Some((_page, result)) = self.loader.poll_page() {
            match result {
                Some(response) => self.dropdown.apply_page(response),
                None => self.dropdown.fetch_failed(),
            }
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if KeyInput::is_quit(&key) {
            self.running = false;
        }
    }

    /// Handle mouse input. Every mouse-down on the screen goes through the
    /// dropdown's hit test so interaction outside its boundary dismisses it.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_down(mouse.column, mouse.row);
            }
            MouseEventKind::ScrollDown => self.scroll_down(mouse.column, mouse.row),
            MouseEventKind::ScrollUp => self.scroll_up(mouse.column, mouse.row),
            MouseEventKind::Moved => self.dropdown.hover_at(mouse.column, mouse.row),
            _ => {}
        }
    }

    fn pointer_down(&mut self, column: u16, row: u16) {
        match self.dropdown.hit(column, row) {
            Hit::Control => {
                if let Some(page) = self.dropdown.toggle_open() {
                    self.request_page(page);
                }
            }
            Hit::Item(index) => self.dropdown.select(index),
            Hit::Panel => {}
            Hit::Outside => self.dropdown.dismiss(),
        }
    }

    fn scroll_down(&mut self, column: u16, row: u16) {
        if !self.over_panel(column, row) {
            return;
        }
        let visible = self.dropdown.panel_visible_rows();
        self.dropdown.scroll.scroll_down(visible);
        if self.dropdown.scroll.at_bottom(visible) {
            if let Some(page) = self.dropdown.reached_end() {
                self.request_page(page);
            }
        }
    }

    fn scroll_up(&mut self, column: u16, row: u16) {
        if self.over_panel(column, row) {
            self.dropdown.scroll.scroll_up();
        }
    }

    fn over_panel(&self, column: u16, row: u16) -> bool {
        matches!(self.dropdown.hit(column, row), Hit::Item(_) | Hit::Panel)
    }

    fn request_page(&mut self, page: u32) {
        if self.loader.is_loading() {
            return;
        }
        self.dropdown.begin_fetch();
        self.loader.load_page(self.client.clone(), page);
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let areas = AppLayout::default().compute(area);

        let dropdown = Dropdown::new(&self.config.colors);
        frame.render_stateful_widget(dropdown, areas.dropdown, &mut self.dropdown);

        self.render_status_bar(frame, areas.status_bar);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let colors = &self.config.colors;
        let total_width = area.width as usize;

        let left_content = format!(" {}", self.client.endpoint());
        let right_content = match self.dropdown.total() {
            Some(total) => format!("{} of {} users ", self.dropdown.users().len(), total),
            None => String::new(),
        };

        let left_width = left_content.chars().count();
        let right_width = right_content.chars().count();
        let padding = total_width.saturating_sub(left_width + right_width);

        let line = Line::from(vec![
            Span::styled(left_content, colors.style_status_bar()),
            Span::styled(" ".repeat(padding), colors.style_status_bar()),
            Span::styled(right_content, colors.style_status_bar()),
        ]);
        frame.render_widget(line, area);
    }
}
