//! Status bar - devices, format and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::LiveInfo;

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }

    /// Peak in dBFS, floored at -96.
    pub fn peak_db(&self) -> f32 {
        (20.0 * self.peak.max(1e-12).log10()).max(-96.0)
    }
}

pub fn render_transport(frame: &mut Frame, area: Rect, info: &LiveInfo, stats: &AudioStats, underruns: usize) {
    let block = Block::default().title(" moorer ").borders(Borders::ALL);

    let sample_rate_khz = info.sample_rate / 1000.0;
    let level_color = if stats.peak >= 1.0 { Color::Red } else { Color::Magenta };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} → {}  ", info.input_name, info.output_name),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{:.1}kHz {:?}  ", sample_rate_khz, info.layout),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}ms  ", info.latency_ms),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2} ({:.1} dB)  RMS: {:.2}  ", stats.peak, stats.peak_db(), stats.rms),
            Style::default().fg(level_color),
        ),
        Span::styled(
            format!("xruns: {underruns}"),
            Style::default().fg(if underruns > 0 { Color::Yellow } else { Color::DarkGray }),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
