use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::StudentRecord;

/// Labelled rows for the detail panel.
pub(crate) fn student_detail_lines(student: &StudentRecord) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    [
        ("Id", student.id.to_string()),
        ("Last name", student.last_name.clone()),
        ("First name", student.first_name.clone()),
        ("Middle name", student.middle_name.clone()),
        ("Added", student.added_time.clone()),
    ]
    .into_iter()
    .map(|(label, value)| {
        Line::from(vec![
            Span::styled(format!("{label}: "), bold),
            Span::raw(value),
        ])
    })
    .collect()
}

/// A rectangle centered within `area` spanning the given percentages. Used for
/// modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// One-line footer text for an error: the outermost context followed by the
/// root cause, when they differ.
pub(crate) fn surface_error(err: &Error) -> String {
    let top = err.to_string();
    match err.chain().last().map(|cause| cause.to_string()) {
        Some(root) if root != top => format!("{top}: {root}"),
        _ => top,
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn detail_lines_cover_every_column() {
        let student = StudentRecord {
            id: 4,
            last_name: "Кузнецов".into(),
            first_name: "Кузьма".into(),
            middle_name: "Кузьмич".into(),
            added_time: "2024-05-01T12:00:00.000Z".into(),
        };
        let lines = student_detail_lines(&student);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].to_string(), "Id: 4");
        assert_eq!(lines[4].to_string(), "Added: 2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn surface_error_joins_context_and_cause() {
        let err = anyhow!("disk full").context("failed to add student");
        assert_eq!(surface_error(&err), "failed to add student: disk full");
        assert_eq!(surface_error(&anyhow!("plain")), "plain");
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, area);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 25);
    }
}
