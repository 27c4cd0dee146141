use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::controller::{Field, FormController, PendingDelete};
use crate::error::RecordError;
use crate::models::COLUMN_TITLES;

use super::forms::{self, LEFT_COLUMN, RIGHT_COLUMN};
use super::helpers::{centered_rect, key_hints};

/// Rows taken by the bordered form: three field rows plus borders.
const FORM_HEIGHT: u16 = 5;
/// Rows taken by the bordered search box.
const SEARCH_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Cursor jump for PageUp/PageDown in the table.
const PAGE_STEP: isize = 10;
const SEARCH_PREFIX: &str = "Search: ";

/// Which part of the screen receives typed characters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Focus {
    Field(Field),
    Search,
    Table,
}

impl Focus {
    const ORDER: [Focus; 8] = [
        Focus::Field(Field::Name),
        Focus::Field(Field::Age),
        Focus::Field(Field::Grade),
        Focus::Field(Field::Email),
        Focus::Field(Field::Phone),
        Focus::Field(Field::Course),
        Focus::Search,
        Focus::Table,
    ];

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or_default()
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Modal state layered over the main screen.
enum Mode {
    Normal,
    ConfirmDelete(PendingDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal front-end state wrapped around the form controller.
pub struct App {
    /// Owns the store, the staged form and the displayed list.
    controller: FormController,
    /// Target of plain key presses.
    focus: Focus,
    /// Normal editing or the delete confirmation modal.
    mode: Mode,
    /// Last outcome shown in the footer, cleared by Esc.
    status: Option<StatusMessage>,
}

impl App {
    /// Start with focus on the name field and an empty footer.
    pub fn new(controller: FormController) -> Self {
        Self {
            controller,
            focus: Focus::Field(Field::Name),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Give the controller back so `main` can close the store.
    pub fn into_controller(self) -> FormController {
        self.controller
    }

    /// Handle a plain key press. Returns `true` when the app should exit.
    /// Storage failures are returned as errors and end the session.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mode = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code)?,
            Mode::ConfirmDelete(pending) => self.handle_confirm_delete(code, pending)?,
        };
        Ok(false)
    }

    /// Handle a key pressed together with Ctrl. These are the form actions.
    pub fn handle_ctrl(&mut self, code: KeyCode) -> Result<bool> {
        let KeyCode::Char(ch) = code else {
            return Ok(false);
        };
        if matches!(ch, 'q' | 'c') {
            return Ok(true);
        }
        if matches!(self.mode, Mode::ConfirmDelete(_)) {
            return Ok(false);
        }

        match ch {
            'a' => self.add_student()?,
            'u' => self.update_student()?,
            'd' => self.mode = self.begin_delete()?,
            'l' => {
                self.controller.clear();
                self.set_status("Fields cleared.", StatusKind::Info);
            }
            'r' => {
                self.controller.clear_search()?;
                self.clear_status();
            }
            'f' => self.focus = Focus::Search,
            _ => {}
        }
        Ok(false)
    }

    /// Dispatch a key to whichever part of the screen has focus and return
    /// the mode to continue in.
    fn handle_normal_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            _ => match self.focus {
                Focus::Field(field) => self.handle_field_key(code, field),
                Focus::Search => self.handle_search_key(code)?,
                Focus::Table => return self.handle_table_key(code),
            },
        }
        Ok(Mode::Normal)
    }

    /// Edit the focused form field. Enter and the arrow keys move between
    /// fields instead of submitting.
    fn handle_field_key(&mut self, code: KeyCode, field: Field) {
        match code {
            KeyCode::Char(ch) => {
                forms::push_char(self.controller.staged_mut(), field, ch);
            }
            KeyCode::Backspace => forms::backspace(self.controller.staged_mut(), field),
            KeyCode::Enter | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Esc => self.clear_status(),
            _ => {}
        }
    }

    /// Every keystroke in the search box re-runs the query.
    fn handle_search_key(&mut self, code: KeyCode) -> Result<()> {
        let mut query = self.controller.query().to_string();
        match code {
            KeyCode::Char(ch) if !ch.is_control() => query.push(ch),
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Enter => {}
            KeyCode::Esc => query.clear(),
            KeyCode::Down => {
                self.focus = Focus::Table;
                return Ok(());
            }
            _ => return Ok(()),
        }

        self.controller.search(&query)?;
        Ok(())
    }

    /// Table keys move the selection (prefilling the form) or start a
    /// delete, which switches to the confirmation modal.
    fn handle_table_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.select_at(0),
            KeyCode::End => {
                let len = self.controller.displayed().len();
                if len > 0 {
                    self.select_at(len - 1);
                }
            }
            KeyCode::Enter => self.focus = Focus::Field(Field::Name),
            KeyCode::Delete => return self.begin_delete(),
            KeyCode::Esc => self.clear_status(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Y/Enter deletes, N/Esc cancels, anything else keeps the modal open.
    fn handle_confirm_delete(&mut self, code: KeyCode, pending: PendingDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.controller.confirm_delete(pending) {
                    Ok(record) => {
                        self.set_status(format!("Deleted {record}."), StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            _ => Ok(Mode::ConfirmDelete(pending)),
        }
    }

    /// Ctrl+A: insert the staged student and return focus to the name field.
    fn add_student(&mut self) -> Result<()> {
        match self.controller.add() {
            Ok(id) => {
                self.focus = Focus::Field(Field::Name);
                self.set_status(
                    format!("Student added successfully (ID {id})."),
                    StatusKind::Info,
                );
                Ok(())
            }
            Err(err) => self.report(err),
        }
    }

    /// Ctrl+U: write the staged fields over the selected student.
    fn update_student(&mut self) -> Result<()> {
        match self.controller.update() {
            Ok(id) => {
                self.set_status(
                    format!("Student {id} updated successfully."),
                    StatusKind::Info,
                );
                Ok(())
            }
            Err(err) => self.report(err),
        }
    }

    /// Ask for confirmation before deleting the selected student. Without a
    /// selection the footer explains why nothing happened and the app stays
    /// in normal mode.
    fn begin_delete(&mut self) -> Result<Mode> {
        match self.controller.request_delete() {
            Ok(pending) => {
                self.clear_status();
                Ok(Mode::ConfirmDelete(pending))
            }
            Err(err) => {
                self.report(err)?;
                Ok(Mode::Normal)
            }
        }
    }

    /// Recoverable errors go to the footer; storage errors end the session.
    fn report(&mut self, err: RecordError) -> Result<()> {
        if err.is_fatal() {
            return Err(err.into());
        }
        self.set_status(err.to_string(), StatusKind::Error);
        Ok(())
    }

    /// Move the table cursor by `offset` rows, clamped to the list. With no
    /// selection, moving down starts at the top and moving up at the bottom.
    fn move_selection(&mut self, offset: isize) {
        let len = self.controller.displayed().len();
        if len == 0 {
            return;
        }
        let target = match self.controller.selected_index() {
            Some(current) => (current as isize + offset).clamp(0, len as isize - 1) as usize,
            None if offset < 0 => len - 1,
            None => 0,
        };
        self.select_at(target);
    }

    /// Select the displayed row at `index` and prefill the form from it.
    fn select_at(&mut self, index: usize) {
        if let Some(record) = self.controller.displayed().get(index).cloned() {
            self.controller.select(&record);
        }
    }

    /// Replace the footer message.
    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Render the form, search box, table and footer top to bottom, then the
    /// confirmation popup on top when one is pending.
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FORM_HEIGHT),
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_search(frame, chunks[1]);
        self.draw_table(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if let Mode::ConfirmDelete(pending) = &self.mode {
            self.draw_confirm_delete(frame, area, pending);
        }
    }

    /// Two-column form grid. The title shows which record is being edited.
    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let title = match self.controller.selected() {
            Some(record) => format!("Student #{}", record.id),
            None => "New Student".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        let staged = self.controller.staged();
        for (column, fields) in [LEFT_COLUMN, RIGHT_COLUMN].iter().enumerate() {
            let lines: Vec<Line> = fields
                .iter()
                .map(|field| forms::build_line(staged, *field, self.focus == Focus::Field(*field)))
                .collect();
            frame.render_widget(Paragraph::new(lines), columns[column]);
        }

        if let (Mode::Normal, Focus::Field(field)) = (&self.mode, self.focus) {
            let (column, row) = forms::grid_position(field);
            let column_area = columns[column];
            let x = column_area
                .x
                .saturating_add(forms::cursor_offset(staged, field));
            let y = column_area.y + row as u16;
            if x < column_area.right() && y < column_area.bottom() {
                frame.set_cursor_position((x, y));
            }
        }
    }

    /// Search box with the live query; highlighted while focused.
    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focus == Focus::Search {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Search");
        let paragraph = Paragraph::new(Span::raw(format!(
            "{SEARCH_PREFIX}{}",
            self.controller.query()
        )))
        .block(block.clone());
        frame.render_widget(paragraph, area);

        if matches!(self.mode, Mode::Normal) && self.focus == Focus::Search {
            let inner = block.inner(area);
            let offset = SEARCH_PREFIX.len() + self.controller.query().chars().count();
            let cursor_x = inner
                .x
                .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
            if cursor_x < inner.right() {
                frame.set_cursor_position((cursor_x, inner.y));
            }
        }
    }

    /// Record table with the selected row highlighted. The title counts the
    /// rows and says when a filter is active.
    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let displayed = self.controller.displayed();
        let header = Row::new(COLUMN_TITLES).style(Style::default().add_modifier(Modifier::BOLD));
        let rows = displayed.iter().map(|record| Row::new(record.cells()));
        let widths = [
            Constraint::Length(5),
            Constraint::Fill(2),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Fill(3),
            Constraint::Length(14),
            Constraint::Fill(2),
        ];

        let border_style = if self.focus == Focus::Table {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let title = if self.controller.query().is_empty() {
            format!("Students ({})", displayed.len())
        } else {
            format!("Students ({} matching)", displayed.len())
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default();
        state.select(self.controller.selected_index());
        frame.render_stateful_widget(table, area, &mut state);
    }

    /// Status message on the first line, key hints on the second.
    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    /// Key hints for the current mode and focus.
    fn footer_instructions(&self) -> Line<'static> {
        let hints: &[(&str, &str)] = match (&self.mode, self.focus) {
            (Mode::ConfirmDelete(_), _) => &[("Y", "Delete"), ("N/Esc", "Cancel")],
            (Mode::Normal, Focus::Table) => &[
                ("↑↓", "Select"),
                ("Enter", "Edit"),
                ("Del", "Delete"),
                ("Tab", "Next"),
                ("^Q", "Quit"),
            ],
            (Mode::Normal, Focus::Search) => &[
                ("Type", "Filter"),
                ("Esc", "Clear"),
                ("↓", "Table"),
                ("Tab", "Next"),
                ("^Q", "Quit"),
            ],
            (Mode::Normal, Focus::Field(_)) => &[
                ("^A", "Add"),
                ("^U", "Update"),
                ("^D", "Delete"),
                ("^L", "Clear Fields"),
                ("^F", "Search"),
                ("^R", "Clear Search"),
                ("Tab", "Next"),
                ("^Q", "Quit"),
            ],
        };
        Line::from(key_hints(hints))
    }

    /// Centered popup naming the student about to be deleted.
    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, pending: &PendingDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete this student record: {}?", pending.record())),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
