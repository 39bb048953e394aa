//! Terminal control surface for the live host
//!
//! Shows the four parameters as gauges in display units, plus a scope and
//! level meter fed from the output callback.

mod params;
mod state;
mod transport;
mod waveform;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use moorer_reverb::{ParamId, ReverbParams, ReverbSettings};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

pub use state::LiveInfo;

use params::{nudged, render_params};
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Knob steps per PageUp/PageDown.
const COARSE_STEPS: i32 = 10;

pub struct UiApp {
    params: Arc<ReverbParams>,
    /// Mono mix of the processed output
    scope_rx: Consumer<f32>,
    underruns: Arc<AtomicUsize>,
    info: LiveInfo,
    audio_buffer: Vec<f32>,
    selected: usize,
    preset: usize,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        params: Arc<ReverbParams>,
        scope_rx: Consumer<f32>,
        underruns: Arc<AtomicUsize>,
        info: LiveInfo,
    ) -> Self {
        Self {
            params,
            scope_rx,
            underruns,
            info,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            selected: 0,
            preset: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    /// Drain the scope ring, keeping the last VIS_BUFFER_SIZE samples.
    fn poll_audio(&mut self) {
        let mut new_samples = Vec::new();
        while let Ok(sample) = self.scope_rx.pop() {
            new_samples.push(sample);
        }

        if !new_samples.is_empty() {
            self.audio_buffer.extend(new_samples);
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
        }
    }

    fn selected_param(&self) -> ParamId {
        ParamId::ALL[self.selected]
    }

    fn nudge(&mut self, steps: i32) {
        let id = self.selected_param();
        let value = nudged(id, self.params.get(id), steps);
        self.params.set(id, value);
    }

    fn handle_key(&mut self, key: KeyCode) {
        let count = ParamId::ALL.len();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Left | KeyCode::Char('h') => self.nudge(-1),
            KeyCode::Right | KeyCode::Char('l') => self.nudge(1),
            KeyCode::PageDown => self.nudge(-COARSE_STEPS),
            KeyCode::PageUp => self.nudge(COARSE_STEPS),
            KeyCode::Char('r') => self.params.reset_to_default(self.selected_param()),
            KeyCode::Char('R') => self.params.load(&ReverbSettings::default()),
            KeyCode::Char('p') => {
                self.preset = (self.preset + 1) % ReverbSettings::PRESET_NAMES.len();
                let name = ReverbSettings::PRESET_NAMES[self.preset];
                if let Some(settings) = ReverbSettings::preset(name) {
                    self.params.load(&settings);
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Length(12), // Parameter gauges
                Constraint::Min(6),     // Scope
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        let underruns = self.underruns.load(Ordering::Relaxed);
        render_transport(frame, chunks[0], &self.info, &stats, underruns);

        render_params(frame, chunks[1], &self.params.snapshot(), self.selected);

        render_waveform(frame, chunks[2], &self.audio_buffer);

        let help = Paragraph::new(format!(
            " [Q] Quit  [↑↓] Select  [←→] Adjust  [PgUp/PgDn] Coarse  [R] Reset  [P] Preset ({})",
            ReverbSettings::PRESET_NAMES[self.preset]
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moorer_reverb::ChannelLayout;
    use rtrb::RingBuffer;

    fn app() -> UiApp {
        let (_, rx) = RingBuffer::<f32>::new(16);
        let info = LiveInfo {
            input_name: "in".into(),
            output_name: "out".into(),
            sample_rate: 48_000.0,
            layout: ChannelLayout::Stereo,
            latency_ms: 20.0,
        };
        UiApp::new(Arc::new(ReverbParams::default()), rx, Arc::new(AtomicUsize::new(0)), info)
    }

    #[test]
    fn test_keys_select_and_adjust() {
        let mut app = app();
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected_param(), ParamId::WetMix);

        // Wet mix starts at 100 %, one step down is 99 %.
        app.handle_key(KeyCode::Left);
        assert!((app.params.get(ParamId::WetMix) - 0.99).abs() < 1e-5);

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.params.get(ParamId::WetMix), 1.0);

        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_preset_key_loads_next_preset() {
        let mut app = app();
        app.handle_key(KeyCode::Char('p'));
        assert_eq!(app.params.snapshot(), ReverbSettings::room());
    }
}
