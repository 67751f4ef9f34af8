// 🏊 Swimmer Registration - form data, validation, records

use crate::store::new_timestamp_id;
use crate::validation::{is_valid_entry_time, FormErrors};
use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};

/// Oldest accepted birth year
pub const MIN_BIRTH_YEAR: i32 = 1950;

/// Races offered on the registration form.
pub const EVENTS: [&str; 21] = [
    "50m Freestyle",
    "100m Freestyle",
    "200m Freestyle",
    "400m Freestyle",
    "800m Freestyle",
    "1500m Freestyle",
    "50m Breaststroke",
    "100m Breaststroke",
    "200m Breaststroke",
    "50m Backstroke",
    "100m Backstroke",
    "200m Backstroke",
    "50m Butterfly",
    "100m Butterfly",
    "200m Butterfly",
    "200m Individual Medley",
    "400m Individual Medley",
    "4x50m Freestyle Relay",
    "4x100m Freestyle Relay",
    "4x50m Medley Relay",
    "4x100m Medley Relay",
];

// Field names, shared with the UI for inline errors
pub const FIELD_NAME: &str = "name";
pub const FIELD_BIRTH_YEAR: &str = "birth_year";
pub const FIELD_COMPETITION: &str = "competition";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_ENTRY_TIME: &str = "entry_time";

// ============================================================================
// FORM DATA
// ============================================================================

/// Athlete form as typed by the user, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwimmerForm {
    pub name: String,
    pub birth_year: String,
    pub competition: String,
    pub event: String,
    pub entry_time: String,
}

impl SwimmerForm {
    /// Check every field and collect one message per invalid field.
    pub fn validate(&self, current_year: i32) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if self.name.trim().is_empty() {
            errors.add(FIELD_NAME, "Name is required");
        }

        let year_ok = self
            .birth_year
            .trim()
            .parse::<i32>()
            .map(|year| (MIN_BIRTH_YEAR..=current_year).contains(&year))
            .unwrap_or(false);
        if !year_ok {
            errors.add(
                FIELD_BIRTH_YEAR,
                format!("Year must be between {} and {}", MIN_BIRTH_YEAR, current_year),
            );
        }

        if self.competition.trim().is_empty() {
            errors.add(FIELD_COMPETITION, "Competition is required");
        }

        if self.event.is_empty() {
            errors.add(FIELD_EVENT, "Event is required");
        }

        if self.entry_time.trim().is_empty() {
            errors.add(FIELD_ENTRY_TIME, "Entry time is required");
        } else if !is_valid_entry_time(&self.entry_time) {
            errors.add(FIELD_ENTRY_TIME, "Format: MM:SS.CC (e.g. 1:23.45)");
        }

        errors.into_result()
    }
}

// ============================================================================
// SWIMMER RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swimmer {
    pub id: String,
    pub name: String,
    pub birth_year: i32,
    pub competition: String,
    pub event: String,
    /// Kept exactly as entered, `MM:SS.CC`
    pub entry_time: String,
    pub registered_at: DateTime<Utc>,
}

impl Swimmer {
    /// Validate the form against the current year and build a new record.
    pub fn from_form(form: &SwimmerForm) -> Result<Swimmer, FormErrors> {
        Self::from_form_at(form, Utc::now())
    }

    pub fn from_form_at(form: &SwimmerForm, now: DateTime<Utc>) -> Result<Swimmer, FormErrors> {
        // The birth-year bound follows the user's calendar, not UTC
        form.validate(now.with_timezone(&Local).year())?;

        // validate() guarantees the year parses
        let birth_year = form.birth_year.trim().parse().unwrap_or(MIN_BIRTH_YEAR);

        Ok(Swimmer {
            id: new_timestamp_id(),
            name: form.name.clone(),
            birth_year,
            competition: form.competition.clone(),
            event: form.event.clone(),
            entry_time: form.entry_time.clone(),
            registered_at: now,
        })
    }

    pub fn age(&self, current_year: i32) -> i32 {
        current_year - self.birth_year
    }

    /// Registration day in local time, `DD/MM/YYYY`
    pub fn registration_date(&self) -> String {
        self.registered_at.with_timezone(&Local).format("%d/%m/%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn valid_form() -> SwimmerForm {
        SwimmerForm {
            name: "Léa Martin".to_string(),
            birth_year: "2010".to_string(),
            competition: "Regional Championships".to_string(),
            event: "100m Freestyle".to_string(),
            entry_time: "1:05.32".to_string(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate(2026).is_ok());
    }

    #[test]
    fn test_birth_year_out_of_range_rejected() {
        for year in ["1949", "2027", "abcd", ""] {
            let mut form = valid_form();
            form.birth_year = year.to_string();

            let errors = form.validate(2026).unwrap_err();
            assert_eq!(
                errors.get(FIELD_BIRTH_YEAR),
                Some("Year must be between 1950 and 2026"),
                "year {:?} should be rejected",
                year
            );
            assert_eq!(errors.len(), 1);
        }

        let mut form = valid_form();
        form.birth_year = "1950".to_string();
        assert!(form.validate(2026).is_ok());
        form.birth_year = "2026".to_string();
        assert!(form.validate(2026).is_ok());
    }

    #[test]
    fn test_entry_time_format() {
        let mut form = valid_form();
        form.entry_time = "123.45".to_string();
        let errors = form.validate(2026).unwrap_err();
        assert_eq!(errors.get(FIELD_ENTRY_TIME), Some("Format: MM:SS.CC (e.g. 1:23.45)"));

        form.entry_time = "   ".to_string();
        let errors = form.validate(2026).unwrap_err();
        assert_eq!(errors.get(FIELD_ENTRY_TIME), Some("Entry time is required"));

        form.entry_time = "1:23.45".to_string();
        assert!(form.validate(2026).is_ok());
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = SwimmerForm::default().validate(2026).unwrap_err();

        for field in [FIELD_NAME, FIELD_BIRTH_YEAR, FIELD_COMPETITION, FIELD_EVENT, FIELD_ENTRY_TIME] {
            assert!(errors.has(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_from_form_builds_record() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let swimmer = Swimmer::from_form_at(&valid_form(), now).unwrap();

        assert!(!swimmer.id.is_empty());
        assert!(swimmer.id.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(swimmer.birth_year, 2010);
        assert_eq!(swimmer.entry_time, "1:05.32");
        assert_eq!(swimmer.registered_at, now);
        assert_eq!(swimmer.age(2026), 16);
    }

    #[test]
    fn test_registration_date_is_local() {
        // Near midnight UTC, where most offsets land on another day
        let now = Utc.with_ymd_and_hms(2026, 1, 7, 23, 45, 0).unwrap();
        let swimmer = Swimmer::from_form_at(&valid_form(), now).unwrap();

        let expected = now.with_timezone(&Local).format("%d/%m/%Y").to_string();
        assert_eq!(swimmer.registration_date(), expected);
    }

    #[test]
    fn test_birth_year_bound_uses_local_year() {
        // 31 Dec 23:30 UTC is already 1 Jan in zones east of UTC
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 30, 0).unwrap();
        let local_year = now.with_timezone(&Local).year();

        let mut form = valid_form();
        form.birth_year = local_year.to_string();
        assert!(Swimmer::from_form_at(&form, now).is_ok());

        form.birth_year = (local_year + 1).to_string();
        assert!(Swimmer::from_form_at(&form, now).is_err());
    }

    #[test]
    fn test_event_catalogue() {
        assert_eq!(EVENTS.len(), 21);
        assert!(EVENTS.contains(&"1500m Freestyle"));
        assert!(EVENTS.contains(&"4x100m Medley Relay"));
    }
}
