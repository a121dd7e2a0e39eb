use chrono::{Duration, Months, NaiveDate};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{format_date, BookingCandidate, BookingEntry};

/// Internal representation of the add-booking form fields.
#[derive(Default, Clone)]
pub(crate) struct BookingForm {
    pub(crate) name: String,
    pub(crate) arrival_date: Option<NaiveDate>,
    pub(crate) departure_date: Option<NaiveDate>,
    pub(crate) active: BookingField,
    pub(crate) error: Option<String>,
}

/// Fields available within the add-booking form. The date range is a single
/// field because the pair is always picked together.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum BookingField {
    Name,
    DateRange,
}

impl Default for BookingField {
    fn default() -> Self {
        BookingField::Name
    }
}

impl BookingForm {
    /// Swap focus between the name and date-range fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            BookingField::Name => BookingField::DateRange,
            BookingField::DateRange => BookingField::Name,
        };
    }

    /// Append a character to the name field. The date-range field is
    /// read-only; its value only changes through the picker.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookingField::Name => {
                if !ch.is_control() {
                    self.name.push(ch);
                    true
                } else {
                    false
                }
            }
            BookingField::DateRange => false,
        }
    }

    /// Remove the last character from the name, or clear the picked dates
    /// when the date-range field is focused.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookingField::Name => {
                self.name.pop();
            }
            BookingField::DateRange => {
                self.arrival_date = None;
                self.departure_date = None;
            }
        }
    }

    /// Store the pair delivered by the picker.
    pub(crate) fn set_dates(&mut self, arrival: NaiveDate, departure: NaiveDate) {
        self.arrival_date = Some(arrival);
        self.departure_date = Some(departure);
    }

    /// The raw input to hand to the store. No validation happens here; the
    /// store rejects blank names, missing dates, and inverted ranges itself.
    pub(crate) fn candidate(&self) -> BookingCandidate {
        BookingCandidate {
            name: self.name.clone(),
            arrival_date: self.arrival_date,
            departure_date: self.departure_date,
        }
    }

    /// Display text for the date-range field, empty until both dates exist.
    pub(crate) fn date_range_text(&self) -> String {
        match (self.arrival_date, self.departure_date) {
            (Some(arrival), Some(departure)) => {
                format!("{} - {}", format_date(arrival), format_date(departure))
            }
            _ => String::new(),
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: BookingField) -> Line<'static> {
        let (value, placeholder, is_active) = match field {
            BookingField::Name => (
                self.name.clone(),
                "<required>",
                self.active == BookingField::Name,
            ),
            BookingField::DateRange => (
                self.date_range_text(),
                "<press Space to pick>",
                self.active == BookingField::DateRange,
            ),
        };

        let display = if value.is_empty() {
            placeholder.to_string()
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

    /// Character count of the name field, used for cursor placement.
    pub(crate) fn name_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// Which date the picker is currently asking for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum PickerStage {
    Arrival,
    Departure,
}

/// Two-stage date selection: the user picks the arrival date first, then the
/// departure date, with the cursor re-seeded on the arrival pick. The picker
/// itself accepts any pair; an inverted range is flagged by the caller and
/// rejected again by the store on submit.
#[derive(Clone)]
pub(crate) struct DateRangePicker {
    pub(crate) stage: PickerStage,
    pub(crate) cursor: NaiveDate,
    pub(crate) arrival: Option<NaiveDate>,
    initial: NaiveDate,
}

impl DateRangePicker {
    /// Open the picker on the given date, normally today.
    pub(crate) fn new(initial: NaiveDate) -> Self {
        Self {
            stage: PickerStage::Arrival,
            cursor: initial,
            arrival: None,
            initial,
        }
    }

    /// Move the cursor by whole days (arrow keys move 1, vertical moves 7).
    pub(crate) fn move_days(&mut self, offset: i64) {
        if let Some(next) = self.cursor.checked_add_signed(Duration::days(offset)) {
            self.cursor = next;
        }
    }

    /// Move the cursor by whole months, clamping to valid dates.
    pub(crate) fn move_months(&mut self, offset: i32) {
        let next = if offset >= 0 {
            self.cursor.checked_add_months(Months::new(offset as u32))
        } else {
            self.cursor
                .checked_sub_months(Months::new(offset.unsigned_abs()))
        };
        if let Some(next) = next {
            self.cursor = next;
        }
    }

    /// Jump back to the date the current stage started on.
    pub(crate) fn jump_to_start(&mut self) {
        self.cursor = match self.stage {
            PickerStage::Arrival => self.initial,
            PickerStage::Departure => self.arrival.unwrap_or(self.initial),
        };
    }

    /// Confirm the date under the cursor. The first confirmation records the
    /// arrival and advances to the departure stage; the second returns the
    /// completed pair.
    pub(crate) fn select(&mut self) -> Option<(NaiveDate, NaiveDate)> {
        match self.stage {
            PickerStage::Arrival => {
                self.arrival = Some(self.cursor);
                self.stage = PickerStage::Departure;
                None
            }
            PickerStage::Departure => {
                let arrival = self.arrival?;
                Some((arrival, self.cursor))
            }
        }
    }

    /// Dialog title for the current stage.
    pub(crate) fn title(&self) -> &'static str {
        match self.stage {
            PickerStage::Arrival => "Select Arrival Date",
            PickerStage::Departure => "Select Departure Date",
        }
    }
}

/// State for confirming the removal of a booking entry.
#[derive(Clone)]
pub(crate) struct ConfirmBookingDelete {
    pub(crate) entry: BookingEntry,
}

impl ConfirmBookingDelete {
    /// Build the confirmation state from the entry being considered.
    pub(crate) fn from(entry: BookingEntry) -> Self {
        Self { entry }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn name_field_accepts_text_and_date_field_does_not() {
        let mut form = BookingForm::default();
        assert!(form.push_char('A'));
        assert!(form.push_char(' '));
        assert!(!form.push_char('\u{8}'));

        form.toggle_field();
        assert!(!form.push_char('x'));
        assert_eq!(form.name, "A ");
    }

    #[test]
    fn backspace_on_date_field_clears_the_pair() {
        let mut form = BookingForm::default();
        form.set_dates(date(2024, 6, 1), date(2024, 6, 5));
        form.toggle_field();
        form.backspace();
        assert!(form.arrival_date.is_none());
        assert!(form.departure_date.is_none());
        assert_eq!(form.date_range_text(), "");
    }

    #[test]
    fn candidate_forwards_partial_input_untouched() {
        let mut form = BookingForm::default();
        form.name = "  Alice ".to_string();
        form.arrival_date = Some(date(2024, 6, 1));

        let candidate = form.candidate();
        assert_eq!(candidate.name, "  Alice ");
        assert_eq!(candidate.arrival_date, Some(date(2024, 6, 1)));
        assert_eq!(candidate.departure_date, None);
    }

    #[test]
    fn date_range_text_requires_both_dates() {
        let mut form = BookingForm::default();
        form.arrival_date = Some(date(2024, 6, 1));
        assert_eq!(form.date_range_text(), "");
        form.departure_date = Some(date(2024, 6, 5));
        assert_eq!(form.date_range_text(), "01.06.2024 - 05.06.2024");
    }

    #[test]
    fn picker_runs_arrival_then_departure() {
        let mut picker = DateRangePicker::new(date(2024, 6, 1));
        picker.move_days(2);
        assert_eq!(picker.select(), None);
        assert_eq!(picker.stage, PickerStage::Departure);
        // Departure stage starts from the arrival pick.
        assert_eq!(picker.cursor, date(2024, 6, 3));

        picker.move_days(7);
        assert_eq!(
            picker.select(),
            Some((date(2024, 6, 3), date(2024, 6, 10)))
        );
    }

    #[test]
    fn picker_allows_an_inverted_pair() {
        let mut picker = DateRangePicker::new(date(2024, 6, 10));
        picker.select();
        picker.move_days(-5);
        assert_eq!(
            picker.select(),
            Some((date(2024, 6, 10), date(2024, 6, 5)))
        );
    }

    #[test]
    fn month_moves_clamp_to_valid_dates() {
        let mut picker = DateRangePicker::new(date(2024, 1, 31));
        picker.move_months(1);
        // January 31st has no counterpart in February; chrono clamps.
        assert_eq!(picker.cursor, date(2024, 2, 29));
        picker.move_months(-1);
        assert_eq!(picker.cursor, date(2024, 1, 29));
    }

    #[test]
    fn jump_to_start_returns_to_the_stage_seed() {
        let mut picker = DateRangePicker::new(date(2024, 6, 1));
        picker.move_days(20);
        picker.jump_to_start();
        assert_eq!(picker.cursor, date(2024, 6, 1));

        picker.move_days(4);
        picker.select();
        picker.move_days(30);
        picker.jump_to_start();
        assert_eq!(picker.cursor, date(2024, 6, 5));
    }
}
