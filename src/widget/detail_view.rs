use crate::models::Document;
use crate::theme::Base16Palette;
use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const PAGE_WIDTH: usize = 6;
const CATEGORY_WIDTH: usize = 18;

/// The bookmark report for one completed document: a summary block on top
/// and a scrollable Page / Label / Category listing below it.
pub struct DetailView {
    pub selected: usize,
    list_state: ListState,
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default(),
        }
    }

    pub fn move_selection_down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
        self.list_state.select(Some(self.selected));
    }

    pub fn move_selection_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.list_state.select(Some(self.selected));
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.list_state = ListState::default();
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        document: &Document,
        palette: &Base16Palette,
    ) {
        let block = Block::default()
            .title(format!(" {} ", document.filename))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_04))
            .style(Style::default().bg(palette.base_00));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let date = document
            .date
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let summary = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(" Status: ", Style::default().fg(palette.base_04)),
                Span::styled(
                    document.status.display_name(),
                    Style::default().fg(palette.status_color(document.status)),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Date Uploaded: ", Style::default().fg(palette.base_04)),
                Span::styled(date, Style::default().fg(palette.base_05)),
            ]),
            Line::from(vec![
                Span::styled(" Bookmarks Detected: ", Style::default().fg(palette.base_04)),
                Span::styled(
                    document.bookmarks.len().to_string(),
                    Style::default().fg(palette.base_05),
                ),
            ]),
        ]);
        f.render_widget(summary, chunks[0]);

        if document.bookmarks.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                " No bookmarks were detected in this document",
                Style::default().fg(palette.base_03),
            )));
            f.render_widget(empty, chunks[2]);
            return;
        }

        let label_width = label_column_width(inner.width);
        let header = Line::from(Span::styled(
            format!(
                " {:>PAGE_WIDTH$}  {:<label_width$} {:<CATEGORY_WIDTH$}",
                "Page", "Label", "Category"
            ),
            Style::default()
                .fg(palette.base_04)
                .add_modifier(Modifier::BOLD),
        ));
        f.render_widget(Paragraph::new(header), chunks[1]);

        let items: Vec<ListItem> = document
            .bookmarks
            .iter()
            .map(|bookmark| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(" {:>PAGE_WIDTH$}", bookmark.page),
                        Style::default().fg(palette.base_05),
                    ),
                    Span::styled(
                        format!("  {:<label_width$}", truncate(&bookmark.label, label_width)),
                        Style::default().fg(palette.base_05),
                    ),
                    Span::styled(
                        format!(" {:<CATEGORY_WIDTH$}", bookmark.category.display_name()),
                        Style::default().fg(palette.category_color(bookmark.category)),
                    ),
                ]))
            })
            .collect();

        let (selection_bg, selection_fg) = palette.get_selection_colors(true);
        let list = List::new(items)
            .highlight_style(Style::default().bg(selection_bg).fg(selection_fg))
            .style(Style::default().bg(palette.base_00));

        self.list_state.select(Some(self.selected));
        f.render_stateful_widget(list, chunks[2], &mut self.list_state);
    }
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

fn label_column_width(total: u16) -> usize {
    let fixed = 1 + PAGE_WIDTH + 2 + 1 + CATEGORY_WIDTH;
    (total as usize).saturating_sub(fixed).max(8)
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_string()
    } else {
        let kept: String = label.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}\u{2026}")
    }
}
