use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// The visible part of the document. Pages alternate background so their
/// boundaries stay visible; the current page is drawn brighter.
pub struct PagesWidget;

impl PagesWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let current = app.engine.index();

        let lines: Vec<Line> = app
            .engine
            .host()
            .visible_rows()
            .into_iter()
            .map(|row| {
                let bg = if row.page % 2 == 0 { theme.bg0 } else { theme.bg1 };
                let fg = if Some(row.page) == current {
                    theme.fg1
                } else {
                    theme.grey2
                };
                Line::from(Span::styled(row.text.to_string(), Style::default().fg(fg)))
                    .style(Style::default().bg(bg))
            })
            .collect();

        let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }
}
