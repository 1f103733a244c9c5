//! TUI module for keytone
//!
//! A clickable piano keyboard above a status bar.

mod keyboard;
mod status;
pub mod view;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub use status::Status;
pub use view::PianoView;

use keyboard::{keys_in, render_keyboard};
use keytone::io::KeyArea;
use status::render_status;

/// Draw the whole screen and return the key areas for mouse hit testing.
pub fn render(frame: &mut Frame, view: &PianoView, status: &Status<'_>) -> Vec<KeyArea> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(6),    // Keyboard
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status(frame, chunks[0], status);

    let keys = keys_in(keyboard_area(chunks[1]));
    render_keyboard(frame, &keys, view);

    let help = Paragraph::new(
        " [a-k] Play  [Click] Play  [↑/↓] Volume  [←/→] Octave  [Tab] Waveform  [Esc] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);

    keys
}

/// Keep the keyboard a sensible size on very wide terminals.
fn keyboard_area(area: Rect) -> Rect {
    let width = area.width.min(96);
    let height = area.height.min(14);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, height)
}
