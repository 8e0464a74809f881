use crate::models::Document;
use crate::theme::Base16Palette;
use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const DATE_WIDTH: usize = 12;
const STATUS_WIDTH: usize = 12;
const BOOKMARKS_WIDTH: usize = 10;

/// The document list screen. Holds only selection state; the rows are
/// rebuilt from the store on every frame so the list never goes stale.
pub struct DocumentTable {
    pub selected: usize,
    list_state: ListState,
}

impl DocumentTable {
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

    /// Keeps the cursor valid after the list was reloaded or shrank.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        documents: &[Document],
        palette: &Base16Palette,
    ) {
        let block = Block::default()
            .title(" Documents ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_04))
            .style(Style::default().bg(palette.base_00));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if documents.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No documents uploaded yet",
                    Style::default().fg(palette.base_05),
                )),
                Line::from(Span::styled(
                    "Upload your first PDF to get AI-generated bookmarks",
                    Style::default().fg(palette.base_03),
                )),
            ])
            .alignment(Alignment::Center);
            f.render_widget(empty, inner);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let name_width = name_column_width(inner.width);
        let header = Line::from(Span::styled(
            format!(
                " {:<name_width$} {:<DATE_WIDTH$} {:<STATUS_WIDTH$} {:<BOOKMARKS_WIDTH$}",
                "Name", "Date", "Status", "Bookmarks"
            ),
            Style::default()
                .fg(palette.base_04)
                .add_modifier(Modifier::BOLD),
        ));
        f.render_widget(Paragraph::new(header), chunks[0]);

        let items: Vec<ListItem> = documents
            .iter()
            .map(|doc| {
                let date = doc.date.with_timezone(&Local).format("%Y-%m-%d").to_string();
                let bookmarks = bookmarks_cell(doc);
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(" {:<name_width$}", truncate(&doc.filename, name_width)),
                        Style::default().fg(palette.base_05),
                    ),
                    Span::styled(
                        format!(" {date:<DATE_WIDTH$}"),
                        Style::default().fg(palette.base_03),
                    ),
                    Span::styled(
                        format!(" {:<STATUS_WIDTH$}", doc.status.display_name()),
                        Style::default().fg(palette.status_color(doc.status)),
                    ),
                    Span::styled(
                        format!(" {bookmarks:<BOOKMARKS_WIDTH$}"),
                        Style::default().fg(palette.base_03),
                    ),
                ]))
            })
            .collect();

        let (selection_bg, selection_fg) = palette.get_selection_colors(true);
        let list = List::new(items)
            .highlight_style(Style::default().bg(selection_bg).fg(selection_fg))
            .style(Style::default().bg(palette.base_00));

        self.list_state.select(Some(self.selected));
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }
}

impl Default for DocumentTable {
    fn default() -> Self {
        Self::new()
    }
}

fn name_column_width(total: u16) -> usize {
    let fixed = 1 + 1 + DATE_WIDTH + 1 + STATUS_WIDTH + 1 + BOOKMARKS_WIDTH;
    (total as usize).saturating_sub(fixed).max(8)
}

fn bookmarks_cell(doc: &Document) -> String {
    if doc.is_completed() {
        doc.bookmarks.len().to_string()
    } else {
        "-".to_string()
    }
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let kept: String = name.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}\u{2026}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bookmark, BookmarkCategory, DocumentId, DocumentStatus};
    use chrono::Utc;

    fn doc(status: DocumentStatus, bookmark_count: usize) -> Document {
        Document {
            id: DocumentId(1),
            filename: "scan.pdf".to_string(),
            date: Utc::now(),
            status,
            bookmarks: (0..bookmark_count)
                .map(|i| Bookmark {
                    page: i as u32 + 1,
                    label: format!("Bookmark {i}"),
                    category: BookmarkCategory::Other,
                })
                .collect(),
        }
    }

    #[test]
    fn bookmark_cell_shows_count_only_when_completed() {
        assert_eq!(bookmarks_cell(&doc(DocumentStatus::Completed, 3)), "3");
        assert_eq!(bookmarks_cell(&doc(DocumentStatus::Processing, 0)), "-");
        assert_eq!(bookmarks_cell(&doc(DocumentStatus::Failed, 0)), "-");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate("short.pdf", 20), "short.pdf");
        assert_eq!(truncate("a_rather_long_name.pdf", 10), "a_rather_\u{2026}");
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut table = DocumentTable::new();
        table.move_selection_down(3);
        table.move_selection_down(3);
        table.move_selection_down(3);
        assert_eq!(table.selected(), 2);

        table.clamp_selection(1);
        assert_eq!(table.selected(), 0);

        table.move_selection_up();
        assert_eq!(table.selected(), 0);
    }
}
