//! Application state and key handling for the TUI. The `App` owns the
//! repository and a separate in-memory `StudentList`; after every mutation the
//! list is re-read from the store rather than patched in place, so what is on
//! screen always matches the table. Store failures are logged and shown in the
//! footer while the last good list stays visible.

use std::mem;

use anyhow::{anyhow, Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::error;

use crate::db::StudentRepository;
use crate::models::{StudentName, FIXED_IDENTITY};

use super::forms::{ConfirmDelete, StudentField, StudentForm};
use super::helpers::{centered_rect, student_detail_lines, surface_error};
use super::screens::StudentList;

/// Height of the title bar.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the list column when the detail panel is shown.
const LIST_PERCENT: u16 = 45;

/// Modal state layered over the list view.
enum Mode {
    Normal,
    Adding(StudentForm),
    Editing { id: i64, form: StudentForm },
    ConfirmDelete(ConfirmDelete),
    ConfirmReplaceLast,
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

/// Central application state. The repository is the only path to the store;
/// `list` is a snapshot pulled from it after every change.
pub struct App {
    repo: StudentRepository,
    list: StudentList,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app and load the initial snapshot of the table.
    pub fn new(repo: StudentRepository) -> Result<Self> {
        let students = repo.list_all().context("failed to load students")?;
        Ok(Self {
            repo,
            list: StudentList::new(students),
            mode: Mode::Normal,
            status: None,
        })
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Adding(form) => self.handle_add(code, form),
            Mode::Editing { id, form } => self.handle_edit(code, id, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::ConfirmReplaceLast => self.handle_confirm_replace(code),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Char('h') | KeyCode::Char('H') => {
                let visible = self.list.toggle_visible();
                let message = if visible {
                    "Showing students."
                } else {
                    "Students hidden."
                };
                self.set_status(message, StatusKind::Info);
            }
            _ if self.list.visible => return self.handle_list_key(code),
            _ => return self.handle_hidden_key(code),
        }
        Mode::Normal
    }

    /// Keys available while the list is hidden: adding and "replace last".
    fn handle_hidden_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Char('+') => {
                self.clear_status();
                Mode::Adding(StudentForm::default())
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.clear_status();
                Mode::ConfirmReplaceLast
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Char('-') | KeyCode::Enter => {
                self.set_status("Press [h] to show the students first.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::Normal,
        }
    }

    /// Keys available while the list is shown: navigation, details, edit and
    /// delete of the selected row.
    fn handle_list_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::PageUp => self.list.move_selection(-5),
            KeyCode::PageDown => self.list.move_selection(5),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Enter => self.list.toggle_details(),
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(student) = self.list.current() {
                    let mode = Mode::Editing {
                        id: student.id,
                        form: StudentForm::from_record(student),
                    };
                    self.clear_status();
                    return mode;
                }
                self.set_status("No student selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') => {
                if let Some(student) = self.list.current() {
                    let confirm = ConfirmDelete::from_record(student);
                    self.clear_status();
                    return Mode::ConfirmDelete(confirm);
                }
                self.set_status("No student selected to delete.", StatusKind::Error);
            }
            KeyCode::Char('+') | KeyCode::Char('r') | KeyCode::Char('R') => {
                self.set_status("Press [h] to hide the students first.", StatusKind::Info);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add(&mut self, code: KeyCode, mut form: StudentForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add student cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok(name) => match self.save_new_student(&name) {
                    Ok(()) => return Mode::Normal,
                    Err(err) => {
                        log_failure(&err);
                        self.report_form_error(&mut form, &err);
                    }
                },
                Err(err) => self.report_form_error(&mut form, &err),
            },
            _ => Self::edit_form(&mut form, code),
        }
        Mode::Adding(form)
    }

    fn handle_edit(&mut self, code: KeyCode, id: i64, mut form: StudentForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok(name) => match self.save_existing_student(id, &name) {
                    Ok(()) => return Mode::Normal,
                    Err(err) => {
                        log_failure(&err);
                        self.report_form_error(&mut form, &err);
                    }
                },
                Err(err) => self.report_form_error(&mut form, &err),
            },
            _ => Self::edit_form(&mut form, code),
        }
        Mode::Editing { id, form }
    }

    fn edit_form(form: &mut StudentForm, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
    }

    /// Show an error inside the open form and in the footer. Logging is the
    /// caller's call: validation messages are not logged.
    fn report_form_error(&mut self, form: &mut StudentForm, err: &anyhow::Error) {
        let message = surface_error(err);
        form.error = Some(message.clone());
        self.set_status(message, StatusKind::Error);
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(err) = self.perform_delete(&confirm) {
                    self.report_error(&err);
                }
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_confirm_replace(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Replacement cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(err) = self.perform_replace_last() {
                    self.report_error(&err);
                }
                Mode::Normal
            }
            _ => Mode::ConfirmReplaceLast,
        }
    }

    // The mutations below return `Ok` once the store accepted the write. A
    // failed refresh afterwards is reported by `refresh` itself, and the
    // success message is skipped so the error stays visible.

    fn save_new_student(&mut self, name: &StudentName) -> Result<()> {
        let created = self
            .repo
            .create(name)
            .context("failed to add student")?;
        if self.refresh() {
            self.list.select_id(created.id);
            self.set_status(format!("Added {}.", name.full_name()), StatusKind::Info);
        }
        Ok(())
    }

    fn save_existing_student(&mut self, id: i64, name: &StudentName) -> Result<()> {
        let updated = self
            .repo
            .update_by_id(id, name)
            .context("failed to update student")?;
        let refreshed = self.refresh();
        if !updated {
            return Err(anyhow!("Student {id} no longer exists."));
        }
        if refreshed {
            self.set_status("Student updated.", StatusKind::Info);
        }
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        let deleted = self
            .repo
            .delete_by_id(confirm.id)
            .context("failed to delete student")?;
        if !self.refresh() {
            return Ok(());
        }
        if deleted {
            self.set_status(format!("Deleted {}.", confirm.label), StatusKind::Info);
        } else {
            self.set_status("Student was already removed.", StatusKind::Info);
        }
        Ok(())
    }

    fn perform_replace_last(&mut self) -> Result<()> {
        let replaced = self
            .repo
            .replace_last_with_fixed_identity()
            .context("failed to update the last student")?;
        match replaced {
            Some(student) => {
                if self.refresh() {
                    self.list.select_id(student.id);
                    self.set_status(
                        format!("Last student renamed to {}.", student.name().full_name()),
                        StatusKind::Info,
                    );
                }
            }
            None => self.set_status("No students found to update.", StatusKind::Info),
        }
        Ok(())
    }

    /// Pull a fresh snapshot. On failure the stale list stays on screen, the
    /// error is reported and `false` is returned.
    fn refresh(&mut self) -> bool {
        match self.repo.list_all().context("failed to load students") {
            Ok(students) => {
                self.list.replace(students);
                true
            }
            Err(err) => {
                self.report_error(&err);
                false
            }
        }
    }

    fn report_error(&mut self, err: &anyhow::Error) {
        log_failure(err);
        self.set_status(surface_error(err), StatusKind::Error);
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_students(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Adding(form) => self.draw_form(frame, area, "Add Student", form),
            Mode::Editing { form, .. } => self.draw_form(frame, area, "Edit Student", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm(
                frame,
                area,
                vec![
                    Line::from("Are you sure you want to delete the student?"),
                    Line::from(Span::styled(
                        confirm.label.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                ],
            ),
            Mode::ConfirmReplaceLast => {
                let (last, first, middle) = FIXED_IDENTITY;
                self.draw_confirm(
                    frame,
                    area,
                    vec![Line::from(format!(
                        "Change the last student's name to {last} {first} {middle}?"
                    ))],
                )
            }
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled("Students", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  ({} total)", self.list.students.len())),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, area);
    }

    fn draw_students(&self, frame: &mut Frame, area: Rect) {
        if !self.list.visible {
            let message = Paragraph::new("Students hidden. Press [h] to show them, [+] to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        }

        if self.list.students.is_empty() {
            let message = Paragraph::new("No students yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(LIST_PERCENT),
                Constraint::Percentage(100 - LIST_PERCENT),
            ])
            .split(area);

        let items: Vec<ListItem> = self
            .list
            .students
            .iter()
            .map(|student| ListItem::new(student.list_label()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("List"))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(self.list.selected));
        frame.render_stateful_widget(list, columns[0], &mut state);

        let details = match self.list.current() {
            Some(student) if self.list.details_open => {
                Paragraph::new(student_detail_lines(student)).wrap(Wrap { trim: false })
            }
            _ => Paragraph::new("Press Enter to show details.")
                .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(
            details.block(Block::default().borders(Borders::ALL).title("Details")),
            columns[1],
        );
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.kind.style())),
            None => Line::from(self.key_hints()),
        };
        let footer = Paragraph::new(line)
            .block(Block::default().borders(Borders::TOP))
            .wrap(Wrap { trim: true });
        frame.render_widget(footer, area);
    }

    fn key_hints(&self) -> &'static str {
        match self.mode {
            Mode::Normal if self.list.visible => {
                "[Enter] details  [e] edit  [-] delete  [h] hide students  [q] quit"
            }
            Mode::Normal => "[+] add  [r] replace last  [h] show students  [q] quit",
            Mode::Adding(_) | Mode::Editing { .. } => {
                "[Tab] next field  [Enter] save  [Esc] close"
            }
            Mode::ConfirmDelete(_) | Mode::ConfirmReplaceLast => "[y] yes  [n] no",
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
        let popup = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup);

        let mut lines: Vec<Line> = StudentField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        match &form.error {
            Some(message) => lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from(Span::styled(
                "[Enter] save  [Esc] close",
                Style::default().fg(Color::DarkGray),
            ))),
        }

        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let inner = block.inner(popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);

        let row = StudentField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let column = (form.active.label().chars().count() + 2 + form.value_len(form.active)) as u16;
        if inner.height > row && inner.width > 0 {
            frame.set_cursor_position(Position::new(
                inner.x + column.min(inner.width - 1),
                inner.y + row,
            ));
        }
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, mut lines: Vec<Line<'static>>) {
        let popup = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[y] Yes   [n] No",
            Style::default().fg(Color::DarkGray),
        )));
        let dialog = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Attention!"));
        frame.render_widget(dialog, popup);
    }
}

fn log_failure(err: &anyhow::Error) {
    error!(error = %format!("{err:#}"), "student operation failed");
}
