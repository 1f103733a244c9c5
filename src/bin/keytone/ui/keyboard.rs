//! On-screen piano keys - drawing; geometry comes from `keytone::io::layout`

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use keytone::io::{layout_keys, KeyArea, KeyRect};

use super::view::PianoView;

/// Lay the keys out in a terminal area.
pub fn keys_in(area: Rect) -> Vec<KeyArea> {
    layout_keys(KeyRect::new(area.x, area.y, area.width, area.height))
}

fn cell_rect(rect: KeyRect) -> Rect {
    Rect::new(rect.x, rect.y, rect.width, rect.height)
}

pub fn render_keyboard(frame: &mut Frame, keys: &[KeyArea], view: &PianoView) {
    for black in [false, true] {
        for area in keys.iter().filter(|k| k.black == black) {
            render_key(frame, area, view.is_pressed(area.key));
        }
    }
}

fn render_key(frame: &mut Frame, area: &KeyArea, pressed: bool) {
    let rect = cell_rect(area.rect);
    if rect.is_empty() {
        return;
    }
    let (fg, bg) = match (area.black, pressed) {
        (_, true) => (Color::Black, Color::LightCyan),
        (true, false) => (Color::White, Color::Black),
        (false, false) => (Color::Black, Color::White),
    };
    let style = Style::default().fg(fg).bg(bg);

    let mut lines = vec![Line::from("")];
    if rect.height > 4 {
        lines.resize(rect.height as usize - 4, Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        area.binding.note.name(),
        style.add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(area.key, style)));

    let key = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).style(style));
    frame.render_widget(Clear, rect);
    frame.render_widget(key, rect);
}
