use crate::models::StudentRecord;

/// In-memory copy of the table plus the list view's cursor. It is replaced
/// wholesale from `list_all()` after every mutation.
pub(crate) struct StudentList {
    pub(crate) students: Vec<StudentRecord>,
    pub(crate) selected: usize,
    /// Whether the detail panel for the selected row is open.
    pub(crate) details_open: bool,
    /// Whether the list is shown at all. It starts hidden; adding and
    /// "replace last" are offered only while it is.
    pub(crate) visible: bool,
}

impl StudentList {
    pub(crate) fn new(students: Vec<StudentRecord>) -> Self {
        Self {
            students,
            selected: 0,
            details_open: false,
            visible: false,
        }
    }

    /// Swap in a fresh copy of the table, keeping the cursor on the same id
    /// when it still exists.
    pub(crate) fn replace(&mut self, students: Vec<StudentRecord>) {
        let current_id = self.current().map(|student| student.id);
        self.students = students;
        if let Some(id) = current_id {
            if let Some(index) = self.students.iter().position(|s| s.id == id) {
                self.selected = index;
                return;
            }
            self.details_open = false;
        }
        self.ensure_in_bounds();
    }

    /// Move the cursor to a specific id, if present.
    pub(crate) fn select_id(&mut self, id: i64) {
        if let Some(index) = self.students.iter().position(|s| s.id == id) {
            self.selected = index;
        }
    }

    pub(crate) fn current(&self) -> Option<&StudentRecord> {
        self.students.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.students.is_empty() {
            return;
        }
        let last = self.students.len() as isize - 1;
        let new = (self.selected as isize + offset).clamp(0, last);
        if new as usize != self.selected {
            self.details_open = false;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.students.is_empty() {
            self.selected = 0;
            self.details_open = false;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.students.is_empty() {
            self.selected = self.students.len() - 1;
            self.details_open = false;
        }
    }

    pub(crate) fn toggle_details(&mut self) {
        if self.current().is_some() {
            self.details_open = !self.details_open;
        }
    }

    pub(crate) fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    fn ensure_in_bounds(&mut self) {
        if self.students.is_empty() {
            self.selected = 0;
            self.details_open = false;
        } else if self.selected >= self.students.len() {
            self.selected = self.students.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, last: &str) -> StudentRecord {
        StudentRecord {
            id,
            last_name: last.into(),
            first_name: "F".into(),
            middle_name: "M".into(),
            added_time: "2024-05-01T12:00:00.000Z".into(),
        }
    }

    #[test]
    fn selection_is_clamped() {
        let mut list = StudentList::new(vec![student(1, "A"), student(2, "B")]);
        list.move_selection(-3);
        assert_eq!(list.selected, 0);
        list.move_selection(5);
        assert_eq!(list.selected, 1);
        list.select_first();
        assert_eq!(list.current().map(|s| s.id), Some(1));
    }

    #[test]
    fn replace_keeps_cursor_on_same_id() {
        let mut list = StudentList::new(vec![student(1, "A"), student(2, "B"), student(3, "C")]);
        list.select_last();
        list.replace(vec![student(2, "B"), student(3, "C")]);
        assert_eq!(list.current().map(|s| s.id), Some(3));
    }

    #[test]
    fn replace_clamps_when_selected_row_disappears() {
        let mut list = StudentList::new(vec![student(1, "A"), student(2, "B")]);
        list.select_last();
        list.toggle_details();
        list.replace(vec![student(1, "A")]);
        assert_eq!(list.selected, 0);

        list.replace(Vec::new());
        assert!(list.current().is_none());
        assert!(!list.details_open);
    }

    #[test]
    fn moving_closes_details() {
        let mut list = StudentList::new(vec![student(1, "A"), student(2, "B")]);
        list.toggle_details();
        assert!(list.details_open);
        list.move_selection(1);
        assert!(!list.details_open);
    }

    #[test]
    fn details_need_a_selection() {
        let mut list = StudentList::new(Vec::new());
        list.toggle_details();
        assert!(!list.details_open);
        assert!(!list.visible);
        assert!(list.toggle_visible());
    }
}
