use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct MainLayout {
    pub header: Rect,
    pub wheel: Rect,
    pub panel: Rect,
    pub controls: Rect,
    pub footer: Rect,
}

pub fn get_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Emoji + label
            Constraint::Length(3), // Mood wheel
            Constraint::Min(4),    // Player / fallback
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    MainLayout {
        header: chunks[0],
        wheel: chunks[1],
        panel: chunks[2],
        controls: chunks[3],
        footer: chunks[4],
    }
}
