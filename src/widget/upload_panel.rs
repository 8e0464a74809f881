use crate::picker::PdfFileInfo;
use crate::theme::Base16Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// The upload screen: a pick list over the PDFs found in the scan
/// directory plus a one-line status footer.
pub struct UploadPanel {
    pub selected: usize,
    list_state: ListState,
}

impl UploadPanel {
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
        files: &[PdfFileInfo],
        uploading: bool,
        palette: &Base16Palette,
    ) {
        let block = Block::default()
            .title(" Upload a PDF ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_04))
            .style(Style::default().bg(palette.base_00));
        let inner = block.inner(area);
        f.render_widget(block, area);

        // While the upload is in flight the picker is hidden entirely.
        if uploading {
            let busy = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Uploading...",
                    Style::default().fg(palette.base_0a),
                )),
                Line::from(Span::styled(
                    "Hang tight, this can take a moment for large files",
                    Style::default().fg(palette.base_03),
                )),
            ])
            .alignment(Alignment::Center);
            f.render_widget(busy, inner);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(inner);

        if files.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No PDF files found in the scan directory",
                    Style::default().fg(palette.base_05),
                )),
                Line::from(Span::styled(
                    "Drop a PDF there and press r to rescan",
                    Style::default().fg(palette.base_03),
                )),
            ])
            .alignment(Alignment::Center);
            f.render_widget(empty, chunks[0]);
        } else {
            let items: Vec<ListItem> = files
                .iter()
                .map(|file| {
                    ListItem::new(Line::from(Span::styled(
                        format!(" {}", file.display_name),
                        Style::default().fg(palette.base_05),
                    )))
                })
                .collect();

            let (selection_bg, selection_fg) = palette.get_selection_colors(true);
            let list = List::new(items)
                .highlight_style(Style::default().bg(selection_bg).fg(selection_fg))
                .style(Style::default().bg(palette.base_00));

            self.list_state.select(Some(self.selected));
            f.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        let hint = Line::from(Span::styled(
            " Supported format: PDF (max 50MB)",
            Style::default().fg(palette.base_03),
        ));
        f.render_widget(Paragraph::new(hint), chunks[1]);
    }
}

impl Default for UploadPanel {
    fn default() -> Self {
        Self::new()
    }
}
