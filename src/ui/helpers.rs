use chrono::{Datelike, NaiveDate};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// `Month Year` heading for the calendar, e.g. `June 2024`.
pub(crate) fn month_title(cursor: NaiveDate) -> String {
    cursor.format("%B %Y").to_string()
}

/// Number of days in the month `date` falls in.
pub(crate) fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Build the calendar body for the month the cursor sits in: a weekday header
/// row followed by one row per week, Monday first, with the cursor day
/// highlighted. Each day cell is three characters wide so the grid stays
/// aligned without color support.
pub(crate) fn month_grid_lines(cursor: NaiveDate) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Mo Tu We Th Fr Sa Su",
        Style::default().fg(Color::Gray),
    ))];

    let first_of_month = match cursor.with_day(1) {
        Some(first) => first,
        None => return lines,
    };
    let leading_blanks = first_of_month.weekday().num_days_from_monday() as usize;
    let day_count = days_in_month(cursor);

    let mut spans: Vec<Span<'static>> = Vec::with_capacity(7);
    for _ in 0..leading_blanks {
        spans.push(Span::raw("   "));
    }

    for day in 1..=day_count {
        let cell = format!("{day:>2} ");
        if day == cursor.day() {
            spans.push(Span::styled(
                cell,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ));
        } else {
            spans.push(Span::raw(cell));
        }

        if spans.len() == 7 {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }

    lines
}
