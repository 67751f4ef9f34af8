// 📐 Field Validation - inline, field-level form errors

// ============================================================================
// FIELD ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for FieldError {}

/// Errors of one form submission, in field order. At most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push(FieldError {
                field: field.to_string(),
                message: message.into(),
            });
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Drop the error of a field once the user edits it
    pub fn clear(&mut self, field: &str) {
        self.errors.retain(|e| e.field != field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

// ============================================================================
// FORMAT CHECKS
// ============================================================================

/// Entry time as `M:SS.CC` or `MM:SS.CC`: one or two minute digits, two
/// second digits, two hundredths digits. Nothing else, not even spaces.
pub fn is_valid_entry_time(value: &str) -> bool {
    let Some((minutes, rest)) = value.split_once(':') else {
        return false;
    };
    let Some((seconds, hundredths)) = rest.split_once('.') else {
        return false;
    };

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    (1..=2).contains(&minutes.len())
        && all_digits(minutes)
        && seconds.len() == 2
        && all_digits(seconds)
        && hundredths.len() == 2
        && all_digits(hundredths)
}

/// `local@domain.tld` with no whitespace and no extra `@`.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Needs a dot with something on both sides
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_time_accepts_valid_formats() {
        assert!(is_valid_entry_time("1:23.45"));
        assert!(is_valid_entry_time("01:23.45"));
        assert!(is_valid_entry_time("0:28.90"));
        assert!(is_valid_entry_time("16:59.99"));
    }

    #[test]
    fn test_entry_time_rejects_invalid_formats() {
        assert!(!is_valid_entry_time("123.45"));
        assert!(!is_valid_entry_time("1:2.45"));
        assert!(!is_valid_entry_time("1:23.4"));
        assert!(!is_valid_entry_time("123:45.67"));
        assert!(!is_valid_entry_time("1:23:45"));
        assert!(!is_valid_entry_time("1:23.456"));
        assert!(!is_valid_entry_time(" 1:23.45"));
        assert!(!is_valid_entry_time("a:23.45"));
        assert!(!is_valid_entry_time(""));
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("coach@club.fr"));
        assert!(is_valid_email("a.b@sub.domain.org"));

        assert!(!is_valid_email("coach@club"));
        assert!(!is_valid_email("coach.club.fr"));
        assert!(!is_valid_email("@club.fr"));
        assert!(!is_valid_email("coach@.fr"));
        assert!(!is_valid_email("coach@club."));
        assert!(!is_valid_email("co ach@club.fr"));
        assert!(!is_valid_email("a@b@club.fr"));
    }

    #[test]
    fn test_form_errors_first_message_wins() {
        let mut errors = FormErrors::new();
        errors.add("name", "Name is required");
        errors.add("name", "Something else");
        errors.add("email", "Invalid email format");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("Name is required"));

        errors.clear("name");
        assert!(!errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.into_result().is_err());
    }
}
