//! Expiry date formats.
//!
//! Stored and displayed expiry dates use `DD/MM/YYYY`; the dashboard's
//! `<input type="date">` control speaks ISO `YYYY-MM-DD`. Conversion is
//! lenient in both directions: anything that does not parse is passed
//! through untouched, matching how the console has always treated
//! free-form expiry values.

use chrono::{Days, NaiveDate, Utc};

/// Format used in the store and in every rendered view.
const STORED_FORMAT: &str = "%d/%m/%Y";
/// Format produced and consumed by the date input control.
const INPUT_FORMAT: &str = "%Y-%m-%d";

/// Convert a date-input value (`YYYY-MM-DD`) to the stored `DD/MM/YYYY`
/// form. Unparseable input is returned as-is.
#[must_use]
pub fn from_input(input: &str) -> String {
    NaiveDate::parse_from_str(input, INPUT_FORMAT)
        .map_or_else(|_| input.to_owned(), |d| d.format(STORED_FORMAT).to_string())
}

/// Convert a stored `DD/MM/YYYY` value back to `YYYY-MM-DD` for the edit
/// control. Unparseable input is returned as-is.
#[must_use]
pub fn to_input(stored: &str) -> String {
    NaiveDate::parse_from_str(stored, STORED_FORMAT)
        .map_or_else(|_| stored.to_owned(), |d| d.format(INPUT_FORMAT).to_string())
}

/// Expiry date `days` days from today, in stored form.
#[must_use]
pub fn days_from_today(days: u64) -> String {
    let today = Utc::now().date_naive();
    today
        .checked_add_days(Days::new(days))
        .unwrap_or(today)
        .format(STORED_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_converts_to_stored_form() {
        assert_eq!(from_input("2025-03-07"), "07/03/2025");
    }

    #[test]
    fn stored_converts_back_to_input_form() {
        assert_eq!(to_input("07/03/2025"), "2025-03-07");
    }

    #[test]
    fn conversion_round_trips() {
        assert_eq!(to_input(&from_input("2031-12-01")), "2031-12-01");
    }

    #[test]
    fn garbage_passes_through_unchanged() {
        assert_eq!(from_input("whenever"), "whenever");
        assert_eq!(to_input("soon"), "soon");
        // Stored-form input to from_input has no dashes to reinterpret.
        assert_eq!(from_input("07/03/2025"), "07/03/2025");
    }

    #[test]
    fn trial_expiry_lands_in_the_future() {
        let today = Utc::now().date_naive();
        let expiry = days_from_today(3);
        let parsed = NaiveDate::parse_from_str(&expiry, "%d/%m/%Y").unwrap();
        assert_eq!(parsed, today.checked_add_days(Days::new(3)).unwrap());
    }
}
