//! UI module for rendering the TUI

mod components;
pub mod forms;
mod home;
mod layout;
mod widgets;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    match (app.state.current_view, &app.form) {
        (View::Form, Some(form)) => form.render(frame, main_area),
        _ => home::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Error dialog overlays everything
    if let Some((message, waiting)) = app.state.current_error() {
        components::render_error_dialog(frame, message, waiting);
    }
}
