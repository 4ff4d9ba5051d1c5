/// Inline keyboard attached to a menu message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl InlineKeyboard {
    /// Lay out `buttons` left to right, `row_width` per row.
    pub fn chunked(buttons: Vec<InlineButton>, row_width: usize) -> Self {
        let row_width = row_width.max(1);
        let rows = buttons
            .chunks(row_width)
            .map(|chunk| chunk.to_vec())
            .collect();
        Self { rows }
    }

    /// Append one more row of buttons (back/close rows under a menu).
    pub fn with_row(mut self, row: Vec<InlineButton>) -> Self {
        self.rows.push(row);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunked_splits_into_rows() {
        let buttons: Vec<InlineButton> = (0..7)
            .map(|i| InlineButton::new(format!("b{i}"), format!("cb{i}")))
            .collect();
        let kb = InlineKeyboard::chunked(buttons, 3);
        assert_eq!(kb.rows.len(), 3);
        assert_eq!(kb.rows[0].len(), 3);
        assert_eq!(kb.rows[2].len(), 1);
    }
}
