//! Field-level validity checks

/// Check the shape `local@domain.tld`
///
/// The local part, domain and top-level part must each be non-empty, and the
/// whole string may contain neither whitespace nor a second `@`.
pub fn validate_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, rest)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || rest.contains('@') {
        return false;
    }

    // Some dot in the remainder must have at least one char on each side
    rest.char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < rest.len())
}

/// Check that a password has at least `min` characters
pub fn validate_password_length(s: &str, min: usize) -> bool {
    s.chars().count() >= min
}

/// Exact equality of two fields; two empty values are "not compared yet"
pub fn fields_match(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

/// Live state of the password confirmation indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStatus {
    /// Nothing to compare yet
    #[default]
    Pending,
    Match,
    Mismatch,
}

impl MatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "",
            Self::Match => "Passwords match",
            Self::Mismatch => "Passwords do not match",
        }
    }
}

/// Compute the confirmation indicator for a password and its confirmation
pub fn match_status(password: &str, confirm: &str) -> MatchStatus {
    if fields_match(password, confirm) {
        MatchStatus::Match
    } else if !confirm.is_empty() {
        MatchStatus::Mismatch
    } else {
        MatchStatus::Pending
    }
}
