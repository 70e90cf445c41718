use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout configuration
pub struct AppLayout {
    pub margin_x: u16,
    pub margin_y: u16,
}

impl Default for AppLayout {
    fn default() -> Self {
        Self {
            margin_x: 2,
            margin_y: 1,
        }
    }
}

/// Computed layout areas
pub struct LayoutAreas {
    pub dropdown: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn compute(&self, area: Rect) -> LayoutAreas {
        // Reserve space for status bar
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let main = chunks[0];
        let dropdown = Rect {
            x: main.x + self.margin_x.min(main.width),
            y: main.y + self.margin_y.min(main.height),
            width: main.width.saturating_sub(self.margin_x * 2),
            height: main.height.saturating_sub(self.margin_y),
        };

        LayoutAreas {
            dropdown,
            status_bar: chunks[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_last_row() {
        let areas = AppLayout::default().compute(Rect::new(0, 0, 80, 24));
        assert_eq!(areas.status_bar, Rect::new(0, 23, 80, 1));
        assert_eq!(areas.dropdown.x, 2);
        assert_eq!(areas.dropdown.y, 1);
    }
}
