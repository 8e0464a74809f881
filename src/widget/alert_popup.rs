use crate::notification::Alert;
use crate::theme::Base16Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Modal error dialog drawn over whatever view is active. Input handling
/// elsewhere swallows every key except the dismiss ones while this is up.
pub struct AlertPopup;

impl AlertPopup {
    pub fn render(f: &mut Frame, area: Rect, alert: &Alert, palette: &Base16Palette) {
        let popup_area = centered_rect(60, 30, area);
        f.render_widget(Clear, popup_area);

        let body = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                alert.message.clone(),
                Style::default().fg(palette.base_05),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to dismiss",
                Style::default().fg(palette.base_03),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.base_08))
                .style(Style::default().bg(palette.base_00)),
        );

        f.render_widget(body, popup_area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
