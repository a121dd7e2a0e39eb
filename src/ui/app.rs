use std::cell::RefCell;
use std::cmp::min;
use std::mem;
use std::rc::Rc;

use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::{format_date, BookingEntry};
use crate::store::{BookingStore, ValidationError};

use super::forms::{
    BookingField, BookingForm, ConfirmBookingDelete, DateRangePicker, PickerStage,
};
use super::helpers::{centered_rect, month_grid_lines, month_title};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per booking card in the list view: name line, date line,
/// and the surrounding border.
const BOOKING_CARD_HEIGHT: u16 = 4;

/// High-level navigation states. The list is the home surface; the add form
/// is a full screen of its own, reached with `+` and left on save or Esc.
enum Screen {
    Bookings,
    AddBooking(BookingForm),
}

/// Modal overlays scoped to the current screen.
enum Mode {
    Normal,
    PickingDates(DateRangePicker),
    ConfirmDelete(ConfirmBookingDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. The store owns the entry
/// list; the app only ever draws from the snapshot cell its subscription
/// keeps current.
pub struct App {
    store: BookingStore,
    bookings: Rc<RefCell<Vec<BookingEntry>>>,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Wire the UI to a store. The app subscribes immediately so every
    /// committed add or delete lands in the snapshot cell the draw code
    /// reads.
    pub fn new(mut store: BookingStore) -> Self {
        let bookings = Rc::new(RefCell::new(store.snapshot()));
        let sink = Rc::clone(&bookings);
        store.subscribe(move |entries| *sink.borrow_mut() = entries.to_vec());

        Self {
            store,
            bookings,
            selected: 0,
            screen: Screen::Bookings,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Dispatch a key press. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::PickingDates(picker) => self.handle_pick_dates(code, picker)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Bookings => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Up => self.move_selection(-1),
                    KeyCode::Down => self.move_selection(1),
                    KeyCode::PageUp => self.move_selection(-5),
                    KeyCode::PageDown => self.move_selection(5),
                    KeyCode::Char('+') => {
                        self.clear_status();
                        self.screen = Screen::AddBooking(BookingForm::default());
                    }
                    KeyCode::Char('-') | KeyCode::Delete => {
                        if let Some(entry) = self.current_booking() {
                            self.clear_status();
                            return Ok(Mode::ConfirmDelete(ConfirmBookingDelete::from(entry)));
                        } else {
                            self.set_status("No booking selected to remove.", StatusKind::Error);
                        }
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::AddBooking(ref mut form) => {
                let mut cancel = false;
                let mut open_picker = false;
                let mut submit = false;

                match code {
                    KeyCode::Esc => cancel = true,
                    KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Enter => submit = true,
                    KeyCode::Char(' ') if form.active == BookingField::DateRange => {
                        open_picker = true;
                    }
                    KeyCode::Char(ch) => {
                        if form.push_char(ch) {
                            form.error = None;
                        }
                    }
                    _ => {}
                }

                if cancel {
                    self.screen = Screen::Bookings;
                    self.set_status("Add booking cancelled.", StatusKind::Info);
                    return Ok(Mode::Normal);
                }
                if open_picker {
                    self.clear_status();
                    return Ok(Mode::PickingDates(DateRangePicker::new(
                        Local::now().date_naive(),
                    )));
                }
                if submit {
                    return Ok(self.submit_booking());
                }
                Ok(Mode::Normal)
            }
        }
    }

    /// Forward the form contents to the store. On success the new entry is
    /// focused on the list screen; on failure the form stays open and the
    /// error is shown in the footer, the store untouched.
    fn submit_booking(&mut self) -> Mode {
        let candidate = match &self.screen {
            Screen::AddBooking(form) => form.candidate(),
            Screen::Bookings => return Mode::Normal,
        };
        let name = candidate.name.trim().to_string();

        match self.store.add(candidate) {
            Ok(()) => {
                self.screen = Screen::Bookings;
                self.focus_last();
                self.set_status(format!("Added booking for {name}."), StatusKind::Info);
            }
            Err(err) => {
                let message = err.to_string();
                if let Screen::AddBooking(form) = &mut self.screen {
                    form.error = Some(message.clone());
                }
                self.set_status(message, StatusKind::Error);
            }
        }
        Mode::Normal
    }

    fn handle_pick_dates(&mut self, code: KeyCode, mut picker: DateRangePicker) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Date selection cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Left => {
                picker.move_days(-1);
                Ok(Mode::PickingDates(picker))
            }
            KeyCode::Right => {
                picker.move_days(1);
                Ok(Mode::PickingDates(picker))
            }
            KeyCode::Up => {
                picker.move_days(-7);
                Ok(Mode::PickingDates(picker))
            }
            KeyCode::Down => {
                picker.move_days(7);
                Ok(Mode::PickingDates(picker))
            }
            KeyCode::PageUp => {
                picker.move_months(-1);
                Ok(Mode::PickingDates(picker))
            }
            KeyCode::PageDown => {
                picker.move_months(1);
                Ok(Mode::PickingDates(picker))
            }
            KeyCode::Home => {
                picker.jump_to_start();
                Ok(Mode::PickingDates(picker))
            }
            KeyCode::Enter => {
                if let Some((arrival, departure)) = picker.select() {
                    if let Screen::AddBooking(form) = &mut self.screen {
                        form.set_dates(arrival, departure);
                        form.error = None;
                    }
                    // The pair is accepted as picked; an inverted range is
                    // flagged right away and rejected again on save.
                    if departure < arrival {
                        self.set_status(
                            ValidationError::InvertedDateRange.to_string(),
                            StatusKind::Error,
                        );
                    }
                    Ok(Mode::Normal)
                } else {
                    Ok(Mode::PickingDates(picker))
                }
            }
            _ => Ok(Mode::PickingDates(picker)),
        }
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmBookingDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.store.delete(&confirm.entry);
                self.ensure_selection_in_bounds();
                self.set_status(
                    format!("Deleted booking for {}.", confirm.entry.name),
                    StatusKind::Info,
                );
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Bookings => self.draw_booking_list(frame, content_area),
            Screen::AddBooking(form) => self.draw_add_booking(frame, content_area, form),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::PickingDates(picker) => self.draw_date_picker(frame, area, picker),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_booking_list(&self, frame: &mut Frame, area: Rect) {
        let bookings = self.bookings.borrow();
        if bookings.is_empty() {
            let message = Paragraph::new("No booking entries yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::NONE));
            frame.render_widget(message, area);
            return;
        }

        self.render_booking_cards(frame, area, &bookings, self.selected);
    }

    /// Render the visible slice of booking cards, keeping the selected entry
    /// inside the window.
    fn render_booking_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        bookings: &[BookingEntry],
        selected: usize,
    ) {
        if bookings.is_empty() || area.height == 0 {
            return;
        }

        let card_height = BOOKING_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = bookings.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(BOOKING_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let booking_index = start + idx;
            if booking_index >= len {
                break;
            }

            let booking = &bookings[booking_index];
            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if booking_index == selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let name = if booking_index == selected {
                format!("▶ {}", booking.name)
            } else {
                booking.name.clone()
            };
            let lines = vec![
                Line::from(Span::styled(
                    name,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    booking.date_range(),
                    Style::default().fg(Color::Gray),
                )),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_add_booking(&self, frame: &mut Frame, area: Rect, form: &BookingForm) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Add Booking Entry");
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let name_line = form.build_line("Name", BookingField::Name);
        let date_line = form.build_line("Date Range", BookingField::DateRange);

        let mut lines = vec![name_line, date_line, Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Space to pick dates • Esc to go back",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        // The date-range field has no text cursor; it is filled through the
        // picker only.
        if matches!(self.mode, Mode::Normal) && form.active == BookingField::Name {
            let prefix = "Name: ".len() as u16;
            frame.set_cursor_position((inner.x + prefix + form.name_len() as u16, inner.y));
        }
    }

    fn draw_date_picker(&self, frame: &mut Frame, area: Rect, picker: &DateRangePicker) {
        let popup_area = centered_rect(50, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(picker.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(Span::styled(
                month_title(picker.cursor),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(month_grid_lines(picker.cursor));
        lines.push(Line::from(""));

        if picker.stage == PickerStage::Departure {
            if let Some(arrival) = picker.arrival {
                lines.push(Line::from(Span::styled(
                    format!("Arrival: {}", format_date(arrival)),
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        lines.push(Line::from(Span::styled(
            "Enter to select • PgUp/PgDn to change month • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookingDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete the booking for '{}'?", confirm.entry.name)),
            Line::from(confirm.entry.date_range()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::PickingDates(_)) => Line::from(vec![
                Span::styled("[←→↑↓]", key_style),
                Span::raw(" Move   "),
                Span::styled("[PgUp/PgDn]", key_style),
                Span::raw(" Month   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmDelete(_)) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Bookings, _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::AddBooking(_), _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Pick Dates   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back"),
            ]),
        }
    }

    fn current_booking(&self) -> Option<BookingEntry> {
        self.bookings.borrow().get(self.selected).cloned()
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.bookings.borrow().len();
        if len == 0 {
            return;
        }
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len as isize {
            new = len as isize - 1;
        }
        self.selected = new as usize;
    }

    fn focus_last(&mut self) {
        let len = self.bookings.borrow().len();
        self.selected = len.saturating_sub(1);
    }

    fn ensure_selection_in_bounds(&mut self) {
        let len = self.bookings.borrow().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    /// Drive the whole add flow through key presses: open the form, type the
    /// name, pick today as arrival and a week later as departure, save.
    fn add_booking(app: &mut App, name: &str) {
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(app, name);
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Char(' ')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
    }

    #[test]
    fn add_flow_commits_to_the_store_and_returns_to_the_list() {
        let mut app = App::new(BookingStore::new());
        add_booking(&mut app, "Alice");

        assert!(matches!(app.screen, Screen::Bookings));
        assert!(matches!(app.mode, Mode::Normal));
        let bookings = app.bookings.borrow();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].name, "Alice");
        assert_eq!(
            bookings[0].departure_date - bookings[0].arrival_date,
            chrono::Duration::days(7)
        );
    }

    #[test]
    fn duplicate_submission_stays_on_the_form_with_the_error() {
        let mut app = App::new(BookingStore::new());
        add_booking(&mut app, "Alice");
        add_booking(&mut app, "Alice");

        assert!(matches!(
            &app.screen,
            Screen::AddBooking(form)
                if form.error.as_deref() == Some("Duplicate name is not allowed")
        ));
        assert_eq!(app.bookings.borrow().len(), 1);

        app.handle_key(KeyCode::Esc).unwrap();
        assert!(matches!(app.screen, Screen::Bookings));
        assert_eq!(app.bookings.borrow().len(), 1);
    }

    #[test]
    fn submitting_without_dates_reports_the_missing_range() {
        let mut app = App::new(BookingStore::new());
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Bob");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(
            &app.screen,
            Screen::AddBooking(form)
                if form.error.as_deref() == Some("Please select a valid date range")
        ));
        assert!(app.bookings.borrow().is_empty());
    }

    #[test]
    fn cancelling_the_picker_keeps_the_form_dates() {
        let mut app = App::new(BookingStore::new());
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Bob");
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Char(' ')).unwrap();
        app.handle_key(KeyCode::Esc).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(
            &app.screen,
            Screen::AddBooking(form)
                if form.arrival_date.is_none() && form.departure_date.is_none()
        ));
    }

    #[test]
    fn delete_asks_for_confirmation_first() {
        let mut app = App::new(BookingStore::new());
        add_booking(&mut app, "Alice");
        add_booking(&mut app, "Bob");

        // Bob was focused by the add flow; declining keeps him.
        app.handle_key(KeyCode::Char('-')).unwrap();
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.bookings.borrow().len(), 2);

        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();
        let bookings = app.bookings.borrow();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].name, "Alice");
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn deleting_on_an_empty_list_only_sets_a_status() {
        let mut app = App::new(BookingStore::new());
        app.handle_key(KeyCode::Char('-')).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.status.is_some());
    }

    #[test]
    fn q_exits_from_the_list_screen() {
        let mut app = App::new(BookingStore::new());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
