//! Domain models passed between the store and the TUI. These stay light-weight
//! data holders so the store can focus on validation and the UI on
//! presentation.

use std::fmt;

use chrono::NaiveDate;

/// Date format shared by every surface that renders a booking range.
const DATE_FORMAT: &str = "%d.%m.%Y";

/// A single booking: a guest name plus the arrival and departure dates.
/// Entries are immutable once admitted to the store; editing is not
/// supported, only delete-and-re-add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingEntry {
    /// Uniqueness key within the store. Stored exactly as entered.
    pub name: String,
    /// First day of the stay.
    pub arrival_date: NaiveDate,
    /// Last day of the stay. Never precedes `arrival_date` for entries the
    /// store admitted.
    pub departure_date: NaiveDate,
}

impl BookingEntry {
    /// Compose the `dd.MM.yyyy - dd.MM.yyyy` range string shown on the list
    /// cards and in the add form's date field.
    pub fn date_range(&self) -> String {
        format!(
            "{} - {}",
            self.arrival_date.format(DATE_FORMAT),
            self.departure_date.format(DATE_FORMAT)
        )
    }
}

impl fmt::Display for BookingEntry {
    /// Write the guest name to any formatter so the type plays nicely with
    /// widgets that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Raw input collected by the add surface before the store has seen it. The
/// dates are optional because the surface forwards whatever the user has
/// picked so far; the store rejects incomplete candidates itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingCandidate {
    pub name: String,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
}

/// Render a single date with the shared format.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_uses_day_month_year_order() {
        let entry = BookingEntry {
            name: "Alice".to_string(),
            arrival_date: date(2024, 6, 1),
            departure_date: date(2024, 6, 5),
        };
        assert_eq!(entry.date_range(), "01.06.2024 - 05.06.2024");
    }

    #[test]
    fn display_shows_the_name() {
        let entry = BookingEntry {
            name: "Bob".to_string(),
            arrival_date: date(2024, 7, 1),
            departure_date: date(2024, 7, 1),
        };
        assert_eq!(entry.to_string(), "Bob");
    }

    #[test]
    fn equality_covers_all_fields() {
        let a = BookingEntry {
            name: "Alice".to_string(),
            arrival_date: date(2024, 6, 1),
            departure_date: date(2024, 6, 5),
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.departure_date = date(2024, 6, 6);
        assert_ne!(a, b);
    }
}
