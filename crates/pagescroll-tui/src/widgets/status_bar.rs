use pagescroll_core::scroll::Interaction;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let engine = &app.engine;
        let bar = Style::default().bg(theme.bg2);

        let mode_str = if engine.interactions_paused() {
            "PAUSED"
        } else if engine.paging_on() == Some(true) {
            "PAGING"
        } else {
            "FREE"
        };
        let mode_color = if engine.interactions_paused() {
            theme.paused
        } else {
            theme.accent
        };

        let status_text = match &app.status_message {
            Some(msg) => format!(" {} ", msg),
            None => {
                let aligned = if engine.is_exact_index() { "" } else { " ~" };
                format!(" Page {}{} ", app.page_label(), aligned)
            }
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", mode_str),
                Style::default()
                    .fg(theme.bg0)
                    .bg(mode_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(status_text, bar.fg(theme.fg0)),
        ];

        for interaction in Interaction::ALL {
            let color = match (engine.is_on(interaction), engine.is_active(interaction)) {
                (true, true) => theme.active,
                (true, false) => theme.grey1,
                (false, _) => theme.inactive,
            };
            spans.push(Span::styled(format!("{} ", interaction), bar.fg(color)));
        }
        if engine.overflow_on() == Some(false) {
            spans.push(Span::styled("no-overflow ", bar.fg(theme.paused)));
        }

        let help_hint = " q:quit j/k:page g/G:ends o:overflow p:pause ";
        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        let padding_len = (area.width as usize).saturating_sub(used + help_hint.width());

        spans.push(Span::styled(" ".repeat(padding_len), bar));
        spans.push(Span::styled(help_hint, bar.fg(theme.grey2)));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
