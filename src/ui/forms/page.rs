//! A titled form: one context, the adapters bound to it, and focus handling
//!
//! Layout:
//! +-------------------------------------------+
//! | ✗ response error (when set)               |
//! | adapter                                   |
//! |  ! field error (when set)                 |
//! | adapter                                   |
//! | ...                                       |
//! | help text                                 |
//! +-------------------------------------------+

use super::adapter::{AdapterAction, InputAdapter};
use super::field_renderer::{draw_field_error, draw_help_text};
use crate::platform::{is_save_shortcut, SAVE_SHORTCUT};
use crate::state::{
    FormContext, PendingSubmit, SubmitHandler, SubmitOutcome, SubmitState, SubmitTicket,
    SubmitTrigger,
};
use crate::ui::widgets::wrap_text;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;

/// Width of the " ✗ " marker in front of the response error
const ERROR_INDENT: u16 = 3;
const MAX_ERROR_ROWS: usize = 4;

/// What the caller should do after the page saw a key
#[derive(Debug)]
pub enum PageAction {
    None,
    /// Run the handler against this snapshot, then call [`FormPage::settle`]
    Submit(PendingSubmit),
    Cancel,
}

pub struct FormPage {
    title: String,
    ctx: FormContext,
    adapters: Vec<Box<dyn InputAdapter>>,
    handler: Arc<dyn SubmitHandler>,
    /// Index into the visible adapters
    focus: usize,
}

impl FormPage {
    pub fn new(title: impl Into<String>, ctx: FormContext, handler: Arc<dyn SubmitHandler>) -> Self {
        Self {
            title: title.into(),
            ctx,
            adapters: Vec::new(),
            handler,
            focus: 0,
        }
    }

    pub fn with(mut self, adapter: impl InputAdapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn ctx(&self) -> &FormContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut FormContext {
        &mut self.ctx
    }

    pub fn handler(&self) -> Arc<dyn SubmitHandler> {
        Arc::clone(&self.handler)
    }

    fn visible(&self) -> Vec<usize> {
        let edit_mode = self.ctx.edit_mode();
        self.adapters
            .iter()
            .enumerate()
            .filter(|(_, a)| a.visible_in(edit_mode))
            .map(|(i, _)| i)
            .collect()
    }

    /// Labels of the adapters shown in the current mode, in order
    #[cfg(test)]
    pub fn visible_labels(&self) -> Vec<&str> {
        self.visible()
            .into_iter()
            .map(|i| self.adapters[i].label())
            .collect()
    }

    #[cfg(test)]
    pub fn focused_label(&self) -> Option<&str> {
        self.focused_index().map(|i| self.adapters[i].label())
    }

    fn focused_index(&self) -> Option<usize> {
        self.visible().get(self.focus).copied()
    }

    pub fn next_field(&mut self) {
        let count = self.visible().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.visible().len();
        if count == 0 {
            return;
        }
        if self.focus == 0 {
            self.focus = count - 1;
        } else {
            self.focus -= 1;
        }
    }

    fn begin(&mut self, trigger: SubmitTrigger) -> PageAction {
        PageAction::Submit(self.ctx.begin_submit(trigger))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PageAction {
        let focused = self.focused_index();

        if let Some(i) = focused.filter(|&i| self.adapters[i].is_capturing()) {
            return match self.adapters[i].handle_key(key, &mut self.ctx) {
                AdapterAction::Submit => self.begin(SubmitTrigger::SubmitButton),
                _ => PageAction::None,
            };
        }

        if is_save_shortcut(&key) {
            return self.begin(SubmitTrigger::Shortcut);
        }

        match key.code {
            KeyCode::Tab => {
                self.next_field();
                PageAction::None
            }
            KeyCode::BackTab => {
                self.prev_field();
                PageAction::None
            }
            KeyCode::Esc => PageAction::Cancel,
            _ => {
                let Some(i) = focused else {
                    return PageAction::None;
                };
                match self.adapters[i].handle_key(key, &mut self.ctx) {
                    AdapterAction::Submit => self.begin(SubmitTrigger::SubmitButton),
                    AdapterAction::Handled | AdapterAction::Ignored => PageAction::None,
                }
            }
        }
    }

    /// Load lazily fetched options for every adapter
    pub async fn load_options(&mut self) {
        for adapter in self.adapters.iter_mut() {
            adapter.load_options().await;
        }
    }

    pub fn settle(&mut self, ticket: SubmitTicket, outcome: SubmitOutcome) -> SubmitState {
        self.ctx.settle(ticket, outcome)
    }

    /// Tear the page down; results still in flight are dropped when they arrive
    pub fn unmount(&mut self) {
        self.ctx.unmount();
    }

    fn field_error(&self, index: usize) -> Option<&str> {
        let adapter = &self.adapters[index];
        if !adapter.is_field_bound() {
            return None;
        }
        self.ctx.bind(adapter.field()).ok()?.error()
    }

    fn slot_height(&self, index: usize) -> u16 {
        self.adapters[index].height() + u16::from(self.field_error(index).is_some())
    }

    /// First visible position to draw so the focused adapter fits in `available` rows
    fn scroll_start(&self, visible: &[usize], available: u16) -> usize {
        let mut start = 0;
        while start < self.focus {
            let needed: u16 = visible[start..=self.focus]
                .iter()
                .map(|&i| self.slot_height(i))
                .sum();
            if needed <= available {
                break;
            }
            start += 1;
        }
        start
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mode = if self.ctx.edit_mode() { "Edit" } else { "New" };
        let marker = if self.ctx.is_dirty() { " •" } else { "" };
        let block = Block::default()
            .title(format!(" {} {}{} ", mode, self.title, marker))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let error_lines = self
            .ctx
            .response_error()
            .map(|e| response_error_lines(&e.message, inner.width))
            .unwrap_or_default();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(error_lines.len() as u16), // Response error
                Constraint::Min(3),                            // Fields
                Constraint::Length(1),                         // Help text
            ])
            .split(inner);

        if !error_lines.is_empty() {
            frame.render_widget(Paragraph::new(error_lines), chunks[0]);
        }

        let visible = self.visible();
        let fields = chunks[1];
        let start = self.scroll_start(&visible, fields.height);
        let mut y = fields.y;
        let bottom = fields.y + fields.height;
        for (pos, &i) in visible.iter().enumerate().skip(start) {
            let adapter = &self.adapters[i];
            let height = adapter.height();
            if y + height > bottom {
                break;
            }
            let slot = Rect::new(fields.x, y, fields.width, height);
            adapter.render(frame, slot, &self.ctx, pos == self.focus);
            y += height;

            if let Some(message) = self.field_error(i) {
                if y < bottom {
                    draw_field_error(frame, Rect::new(fields.x, y, fields.width, 1), message);
                    y += 1;
                }
            }
        }

        draw_help_text(
            frame,
            chunks[2],
            &[
                ("Tab", "next field"),
                (SAVE_SHORTCUT, "save"),
                ("Esc", "cancel"),
            ],
        );
    }
}

/// The response error wrapped to `width`, marker on the first row
fn response_error_lines(message: &str, width: u16) -> Vec<Line<'static>> {
    let text_width = usize::from(width.saturating_sub(ERROR_INDENT)).max(1);
    let marker = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::Red);
    wrap_text(message, text_width)
        .into_iter()
        .take(MAX_ERROR_ROWS)
        .enumerate()
        .map(|(i, row)| {
            let lead = if i == 0 { " ✗ " } else { "   " };
            Line::from(vec![Span::styled(lead, marker), Span::styled(row, text)])
        })
        .collect()
}
