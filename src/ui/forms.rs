//! Dialog state for the add and edit forms and the delete confirmation. The
//! form keeps raw text per field and only turns it into a `StudentName` when
//! the user saves, which is where blank fields are rejected. Rendering helpers
//! live here too so the dialog looks the same whether it adds or edits.

use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{StudentName, StudentRecord};

/// Shown when any of the three fields is left blank.
pub(crate) const INCOMPLETE_MESSAGE: &str = "Please enter all the data!";

/// Input state for the add and edit dialogs.
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) last: String,
    pub(crate) first: String,
    pub(crate) middle: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

/// Fields in display order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum StudentField {
    #[default]
    Last,
    First,
    Middle,
}

impl StudentField {
    pub(crate) const ALL: [StudentField; 3] =
        [StudentField::Last, StudentField::First, StudentField::Middle];

    pub(crate) fn label(self) -> &'static str {
        match self {
            StudentField::Last => "Last name",
            StudentField::First => "First name",
            StudentField::Middle => "Middle name",
        }
    }

    fn next(self) -> Self {
        match self {
            StudentField::Last => StudentField::First,
            StudentField::First => StudentField::Middle,
            StudentField::Middle => StudentField::Last,
        }
    }

    fn previous(self) -> Self {
        match self {
            StudentField::Last => StudentField::Middle,
            StudentField::First => StudentField::Last,
            StudentField::Middle => StudentField::First,
        }
    }
}

impl StudentForm {
    /// Pre-fill the form with an existing record for editing.
    pub(crate) fn from_record(record: &StudentRecord) -> Self {
        Self {
            last: record.last_name.clone(),
            first: record.first_name.clone(),
            middle: record.middle_name.clone(),
            active: StudentField::Last,
            error: None,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn focus_previous(&mut self) {
        self.active = self.active.previous();
    }

    fn field_mut(&mut self, field: StudentField) -> &mut String {
        match field {
            StudentField::Last => &mut self.last,
            StudentField::First => &mut self.first,
            StudentField::Middle => &mut self.middle,
        }
    }

    pub(crate) fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::Last => &self.last,
            StudentField::First => &self.first,
            StudentField::Middle => &self.middle,
        }
    }

    /// Append a character to the active field. Control characters are refused.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let active = self.active;
        self.field_mut(active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let active = self.active;
        self.field_mut(active).pop();
    }

    /// Trimmed name, or an error when a field is blank.
    pub(crate) fn parse_inputs(&self) -> Result<StudentName> {
        let name = StudentName::new(self.last.trim(), self.first.trim(), self.middle.trim());
        if name.is_complete() {
            Ok(name)
        } else {
            Err(anyhow!(INCOMPLETE_MESSAGE))
        }
    }

    /// Render one `Label: value` line, highlighting the focused field.
    pub(crate) fn build_line(&self, field: StudentField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character count of a field, used to place the cursor.
    pub(crate) fn value_len(&self, field: StudentField) -> usize {
        self.value(field).chars().count()
    }
}

/// Pending delete awaiting a yes/no answer.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) label: String,
}

impl ConfirmDelete {
    pub(crate) fn from_record(record: &StudentRecord) -> Self {
        Self {
            id: record.id,
            label: record.name().full_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = StudentForm::default();
        for ch in "Doe".chars() {
            assert!(form.push_char(ch));
        }
        form.focus_next();
        form.push_char('J');
        form.focus_previous();
        form.backspace();

        assert_eq!(form.last, "Do");
        assert_eq!(form.first, "J");
        assert_eq!(form.middle, "");
        assert!(!form.push_char('\u{7}'));
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = StudentForm::default();
        form.focus_previous();
        assert_eq!(form.active, StudentField::Middle);
        form.focus_next();
        assert_eq!(form.active, StudentField::Last);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let form = StudentForm {
            last: "Doe".into(),
            first: "  ".into(),
            middle: "Q".into(),
            ..StudentForm::default()
        };
        let err = form.parse_inputs().unwrap_err();
        assert_eq!(err.to_string(), INCOMPLETE_MESSAGE);
    }

    #[test]
    fn parsed_name_is_trimmed() {
        let form = StudentForm {
            last: " Doe ".into(),
            first: "Jane".into(),
            middle: "Q ".into(),
            ..StudentForm::default()
        };
        assert_eq!(form.parse_inputs().unwrap(), StudentName::new("Doe", "Jane", "Q"));
    }

    #[test]
    fn edit_form_starts_from_record() {
        let record = StudentRecord {
            id: 3,
            last_name: "Сидоров".into(),
            first_name: "Сидор".into(),
            middle_name: "Сидорович".into(),
            added_time: "2024-05-01T12:00:00.000Z".into(),
        };
        let form = StudentForm::from_record(&record);
        assert_eq!(form.value(StudentField::First), "Сидор");
        assert_eq!(form.value_len(StudentField::Middle), 9);

        let confirm = ConfirmDelete::from_record(&record);
        assert_eq!(confirm.id, 3);
        assert_eq!(confirm.label, "Сидоров Сидор Сидорович");
    }
}
