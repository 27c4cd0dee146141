use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::controller::{Field, StagedFields};

/// Fields shown in the left column of the form; the rest go on the right.
pub(crate) const LEFT_COLUMN: [Field; 3] = [Field::Name, Field::Grade, Field::Phone];
pub(crate) const RIGHT_COLUMN: [Field; 3] = [Field::Age, Field::Email, Field::Course];

/// Column and row of `field` inside the two-column form grid.
pub(crate) fn grid_position(field: Field) -> (usize, usize) {
    if let Some(row) = LEFT_COLUMN.iter().position(|f| *f == field) {
        (0, row)
    } else {
        let row = RIGHT_COLUMN
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default();
        (1, row)
    }
}

/// Append a character to `field`. Control characters are ignored.
pub(crate) fn push_char(staged: &mut StagedFields, field: Field, ch: char) -> bool {
    if ch.is_control() {
        return false;
    }
    staged.get_mut(field).push(ch);
    true
}

pub(crate) fn backspace(staged: &mut StagedFields, field: Field) {
    staged.get_mut(field).pop();
}

pub(crate) fn field_prefix(field: Field) -> String {
    format!("{}: ", field.label())
}

/// Cursor column relative to the start of the field's line.
pub(crate) fn cursor_offset(staged: &StagedFields, field: Field) -> u16 {
    let len = field_prefix(field).chars().count() + staged.get(field).chars().count();
    u16::try_from(len).unwrap_or(u16::MAX)
}

/// Render one `Label: value` line, with a placeholder when empty.
pub(crate) fn build_line(staged: &StagedFields, field: Field, is_active: bool) -> Line<'static> {
    let value = staged.get(field);

    let display = if value.is_empty() {
        if field.is_required() {
            "<required>".to_string()
        } else {
            "<optional>".to_string()
        }
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
        Span::raw(field_prefix(field)),
        Span::styled(display, style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_matches_the_two_column_form() {
        assert_eq!(grid_position(Field::Name), (0, 0));
        assert_eq!(grid_position(Field::Age), (1, 0));
        assert_eq!(grid_position(Field::Grade), (0, 1));
        assert_eq!(grid_position(Field::Email), (1, 1));
        assert_eq!(grid_position(Field::Phone), (0, 2));
        assert_eq!(grid_position(Field::Course), (1, 2));
    }

    #[test]
    fn editing_targets_one_field() {
        let mut staged = StagedFields::default();

        assert!(push_char(&mut staged, Field::Email, 'a'));
        assert!(push_char(&mut staged, Field::Email, '@'));
        assert!(!push_char(&mut staged, Field::Email, '\u{7}'));
        backspace(&mut staged, Field::Email);

        assert_eq!(staged.email, "a");
        assert_eq!(staged.name, "");
        assert_eq!(cursor_offset(&staged, Field::Email), "Email: a".len() as u16);
    }

    #[test]
    fn empty_fields_show_placeholders() {
        let staged = StagedFields::default();

        let required: String = build_line(&staged, Field::Name, false)
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect();
        let optional: String = build_line(&staged, Field::Phone, false)
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect();

        assert_eq!(required, "Name: <required>");
        assert_eq!(optional, "Phone: <optional>");
    }
}
