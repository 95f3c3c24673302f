use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Internal representation of the entry form fields.
#[derive(Default, Clone)]
pub(crate) struct RecordForm {
    pub(crate) reel_code: String,
    pub(crate) weight: String,
    pub(crate) zone: String,
    pub(crate) active: RecordField,
    pub(crate) error: Option<String>,
}

/// Fields available within the entry form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) enum RecordField {
    #[default]
    ReelCode,
    Weight,
    Zone,
}

impl RecordForm {
    /// Move focus to the next field, wrapping around.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            RecordField::ReelCode => RecordField::Weight,
            RecordField::Weight => RecordField::Zone,
            RecordField::Zone => RecordField::ReelCode,
        };
    }

    /// Move focus to the previous field, wrapping around.
    pub(crate) fn prev_field(&mut self) {
        self.active = match self.active {
            RecordField::ReelCode => RecordField::Zone,
            RecordField::Weight => RecordField::ReelCode,
            RecordField::Zone => RecordField::Weight,
        };
    }

    /// Append a character to the active field, validating allowed input.
    /// The weight field only accepts digits and a single decimal point.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            RecordField::ReelCode => {
                if !ch.is_control() {
                    self.reel_code.push(ch);
                    true
                } else {
                    false
                }
            }
            RecordField::Weight => {
                if ch.is_ascii_digit() || (ch == '.' && !self.weight.contains('.')) {
                    self.weight.push(ch);
                    true
                } else {
                    false
                }
            }
            RecordField::Zone => {
                if !ch.is_control() {
                    self.zone.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            RecordField::ReelCode => {
                self.reel_code.pop();
            }
            RecordField::Weight => {
                self.weight.pop();
            }
            RecordField::Zone => {
                self.zone.pop();
            }
        }
    }

    /// Validate the inputs and return typed values ready for persistence.
    pub(crate) fn parse_inputs(&self) -> Result<(String, f64, String)> {
        let reel_code = self.reel_code.trim();
        if reel_code.is_empty() {
            return Err(anyhow!("Reel code is required."));
        }
        let weight_raw = self.weight.trim();
        if weight_raw.is_empty() {
            return Err(anyhow!("Weight is required."));
        }
        let weight = weight_raw
            .parse::<f64>()
            .context("Weight must be a number.")?;
        let zone = self.zone.trim();
        if zone.is_empty() {
            return Err(anyhow!("Zone is required."));
        }
        Ok((reel_code.to_string(), weight, zone.to_string()))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: RecordField) -> Line<'static> {
        let (value, is_active) = match field {
            RecordField::ReelCode => (&self.reel_code, self.active == RecordField::ReelCode),
            RecordField::Weight => (&self.weight, self.active == RecordField::Weight),
            RecordField::Zone => (&self.zone, self.active == RecordField::Zone),
        };

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: RecordField) -> usize {
        match field {
            RecordField::ReelCode => self.reel_code.chars().count(),
            RecordField::Weight => self.weight.chars().count(),
            RecordField::Zone => self.zone.chars().count(),
        }
    }
}
