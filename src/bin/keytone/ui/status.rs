//! Status bar widget - current note, controls and output level

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use keytone::synth::ControlState;

/// Snapshot of what the status bar shows.
pub struct Status<'a> {
    pub current_note: &'a str,
    pub control: &'a ControlState,
    pub voices: usize,
    pub level: f32,
}

pub fn render_status(frame: &mut Frame, area: Rect, status: &Status<'_>) {
    let block = Block::default().title(" keytone ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(24)])
        .split(inner);

    let audio = if status.control.backend_ready() {
        Span::styled("audio on", Style::default().fg(Color::Green))
    } else {
        Span::styled("press a key to start audio", Style::default().fg(Color::Yellow))
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {:<4} ", status.current_note),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Vol: {:>3}%  ", (status.control.volume() * 100.0).round()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Wave: {:<8}  ", status.control.waveform()),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("Oct: {}  ", status.control.default_octave()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Voices: {}  ", status.voices),
            Style::default().fg(Color::DarkGray),
        ),
        audio,
    ]);
    frame.render_widget(Paragraph::new(line), chunks[0]);

    let meter = Gauge::default()
        .gauge_style(Style::default().fg(Color::LightGreen))
        .ratio(status.level.clamp(0.0, 1.0) as f64)
        .label(format!("{:.2}", status.level));
    frame.render_widget(meter, chunks[1]);
}
