//! Form field value objects

/// What kind of input a field holds; drives which checks apply at submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Password,
    Text,
    Checkbox,
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: FieldValue,
    pub required: bool,
    /// Password fields start masked; the visibility toggle flips this
    pub masked: bool,
}

impl FormField {
    fn new(name: &str, label: &str, kind: FieldKind, value: FieldValue) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            value,
            required: true,
            masked: kind == FieldKind::Password,
        }
    }

    /// Create a new required text field
    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text, FieldValue::default())
    }

    /// Create a new required email field
    pub fn email(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Email, FieldValue::default())
    }

    /// Create a new required, masked password field
    pub fn password(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Password, FieldValue::default())
    }

    /// Create a new unchecked checkbox
    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Checkbox, FieldValue::Checked(false))
    }

    /// Builder-style override of the required flag
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Get the text value (returns empty string for checkboxes)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Checked(_) => "",
        }
    }

    /// Get the checked state (returns false for text fields)
    pub fn is_checked(&self) -> bool {
        match &self.value {
            FieldValue::Checked(c) => *c,
            FieldValue::Text(_) => false,
        }
    }

    /// True when a required check would consider this field unfilled
    pub fn is_blank(&self) -> bool {
        match self.kind {
            FieldKind::Checkbox => !self.is_checked(),
            _ => self.as_text().trim().is_empty(),
        }
    }

    /// Set the text value; checkboxes refuse text and return false
    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        if self.kind == FieldKind::Checkbox {
            return false;
        }
        self.value = FieldValue::Text(value.into());
        true
    }

    /// Set the checked state; only checkboxes accept it
    pub fn set_checked(&mut self, checked: bool) -> bool {
        if self.kind != FieldKind::Checkbox {
            return false;
        }
        self.value = FieldValue::Checked(checked);
        true
    }

    /// Push a character to the field value; space toggles a checkbox
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Checked(checked) => {
                if c == ' ' {
                    *checked = !*checked;
                }
            }
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Checked(_) => {}
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Checked(c) => *c = false,
        }
    }

    /// Flip password visibility; returns the new masked state
    pub fn toggle_visibility(&mut self) -> bool {
        if self.kind == FieldKind::Password {
            self.masked = !self.masked;
        }
        self.masked
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) if self.masked => "•".repeat(s.chars().count()),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Checked(true) => "[x]".to_string(),
            FieldValue::Checked(false) => "[ ]".to_string(),
        }
    }
}
