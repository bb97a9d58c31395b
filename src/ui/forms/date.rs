//! Date field with a month calendar picker

use super::adapter::{bind_for_input, bind_for_render, AdapterAction, FieldSpec, InputAdapter};
use super::field_renderer::{draw_field_with_value, field_block};
use crate::state::{parse_iso_date, to_iso_date, FieldValue, FormContext};
use chrono::{Datelike, Days, Local, Months, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Title row, weekday header and six week rows, plus borders
const CALENDAR_HEIGHT: u16 = 10;

pub struct DateInput {
    spec: FieldSpec,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
    open: bool,
    cursor: NaiveDate,
}

impl DateInput {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            spec: FieldSpec::bound("Date", field, label),
            min: None,
            max: None,
            open: false,
            cursor: Local::now().date_naive(),
        }
    }

    pub fn min(mut self, date: NaiveDate) -> Self {
        self.min = Some(date);
        self
    }

    pub fn max(mut self, date: NaiveDate) -> Self {
        self.max = Some(date);
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    #[cfg(test)]
    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn stored_date(&self, ctx: &FormContext) -> Option<NaiveDate> {
        ctx.get_value(&self.spec.field)
            .and_then(|v| parse_iso_date(v.as_text()))
    }

    fn clamp(&self, date: NaiveDate) -> NaiveDate {
        let date = self.min.map_or(date, |min| date.max(min));
        self.max.map_or(date, |max| date.min(max))
    }

    fn in_bounds(&self, date: NaiveDate) -> bool {
        !matches!(self.min, Some(min) if date < min) && !matches!(self.max, Some(max) if date > max)
    }

    fn open_picker(&mut self, ctx: &FormContext) {
        let start = self
            .stored_date(ctx)
            .unwrap_or_else(|| Local::now().date_naive());
        self.cursor = self.clamp(start);
        self.open = true;
    }

    fn shift_days(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.cursor = self.clamp(date);
        }
    }

    fn shift_months(&mut self, forward: bool) {
        let moved = if forward {
            self.cursor.checked_add_months(Months::new(1))
        } else {
            self.cursor.checked_sub_months(Months::new(1))
        };
        if let Some(date) = moved {
            self.cursor = self.clamp(date);
        }
    }

    fn select(&mut self, ctx: &mut FormContext) -> AdapterAction {
        self.open = false;
        let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
            return AdapterAction::Ignored;
        };
        binding.set(FieldValue::Text(to_iso_date(self.cursor)));
        AdapterAction::Handled
    }

    fn calendar_lines(&self, selected: Option<NaiveDate>) -> Vec<Line<'static>> {
        let first = self.cursor.with_day(1).unwrap_or(self.cursor);
        let mut lines = vec![
            Line::from(Span::styled(
                first.format("  %B %Y").to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Mo Tu We Th Fr Sa Su",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let lead = first.weekday().num_days_from_monday() as usize;
        let mut week: Vec<Span> = vec![Span::raw(" ".repeat(lead * 3))];
        let mut day = first;
        while day.month() == first.month() {
            let style = if day == self.cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if Some(day) == selected {
                Style::default().fg(Color::Green)
            } else if !self.in_bounds(day) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            week.push(Span::raw(" "));
            week.push(Span::styled(format!("{:>2}", day.day()), style));

            if day.weekday().num_days_from_monday() == 6 {
                lines.push(Line::from(std::mem::take(&mut week)));
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        if !week.is_empty() {
            lines.push(Line::from(week));
        }
        lines
    }
}

impl InputAdapter for DateInput {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn height(&self) -> u16 {
        if self.open {
            3 + CALENDAR_HEIGHT
        } else {
            3
        }
    }

    fn is_capturing(&self) -> bool {
        self.is_open()
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        if bind_for_render(ctx, &self.spec.field).is_none() {
            return;
        }
        let selected = self.stored_date(ctx);
        let text = selected
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        if !self.open {
            draw_field_with_value(
                frame,
                area,
                &self.spec.label,
                &text,
                self.spec.placeholder.as_deref(),
                focused,
                false,
            );
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        draw_field_with_value(
            frame,
            chunks[0],
            &self.spec.label,
            &text,
            self.spec.placeholder.as_deref(),
            focused,
            false,
        );
        frame.render_widget(
            Paragraph::new(self.calendar_lines(selected)).block(field_block("Pick a date", true)),
            chunks[1],
        );
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction {
        if !self.open {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.open_picker(ctx);
                    AdapterAction::Handled
                }
                KeyCode::Backspace | KeyCode::Delete => {
                    let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
                        return AdapterAction::Ignored;
                    };
                    binding.set(FieldValue::Text(String::new()));
                    AdapterAction::Handled
                }
                _ => AdapterAction::Ignored,
            };
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.shift_days(-1),
            KeyCode::Right | KeyCode::Char('l') => self.shift_days(1),
            KeyCode::Up | KeyCode::Char('k') => self.shift_days(-7),
            KeyCode::Down | KeyCode::Char('j') => self.shift_days(7),
            KeyCode::PageUp => self.shift_months(false),
            KeyCode::PageDown => self.shift_months(true),
            KeyCode::Enter => return self.select(ctx),
            KeyCode::Esc => self.open = false,
            _ => {}
        }
        AdapterAction::Handled
    }
}
