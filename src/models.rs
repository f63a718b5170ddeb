//! Domain models that mirror the `students` table and get passed throughout the
//! TUI. These types stay light-weight data holders so the other layers can focus
//! on presentation and persistence.

use std::fmt;

/// Name used by the "replace last" action.
pub const FIXED_IDENTITY: (&str, &str, &str) = ("Иванов", "Иван", "Иванович");

/// The three editable name fields of a student. Create and update both take a
/// whole `StudentName`, so a partial update is not expressible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentName {
    pub last: String,
    pub first: String,
    pub middle: String,
}

impl StudentName {
    pub fn new(last: impl Into<String>, first: impl Into<String>, middle: impl Into<String>) -> Self {
        Self {
            last: last.into(),
            first: first.into(),
            middle: middle.into(),
        }
    }

    /// The constant identity written over the most recently added record.
    pub fn fixed_identity() -> Self {
        let (last, first, middle) = FIXED_IDENTITY;
        Self::new(last, first, middle)
    }

    /// True when none of the three fields is blank. The store accepts empty
    /// strings; this check belongs to the forms.
    pub fn is_complete(&self) -> bool {
        [&self.last, &self.first, &self.middle]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// `Last First Middle`, skipping blank parts.
    pub fn full_name(&self) -> String {
        [&self.last, &self.first, &self.middle]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// One row of the `students` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    /// Store-assigned primary key. Never reused, never changed.
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    /// RFC 3339 creation time, written once by `create` or the bootstrap.
    pub added_time: String,
}

impl StudentRecord {
    pub fn name(&self) -> StudentName {
        StudentName::new(
            self.last_name.clone(),
            self.first_name.clone(),
            self.middle_name.clone(),
        )
    }

    /// `id - LastName`, the label used in the list view.
    pub fn list_label(&self) -> String {
        format!("{} - {}", self.id, self.last_name)
    }
}
