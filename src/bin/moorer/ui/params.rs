//! Parameter gauges, one per control, in display units

use moorer_reverb::{ParamId, ReverbSettings};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

/// Move `value` by `steps` knob steps, in display units, and convert back.
pub fn nudged(id: ParamId, value: f32, steps: i32) -> f32 {
    let display = id.to_display(value) + steps as f32 * id.display_step();
    id.from_display(display)
}

fn format_display(id: ParamId, value: f32) -> String {
    let display = id.to_display(value);
    match id {
        ParamId::ReverbTime => format!("{display:.2} {}", id.unit()),
        ParamId::Predelay => format!("{display:.1} {}", id.unit()),
        ParamId::Damping | ParamId::WetMix => format!("{display:.0} {}", id.unit()),
    }
}

/// Knob position, 0..=1.
fn knob_ratio(id: ParamId, value: f32) -> f64 {
    let (lo, hi) = id.display_range();
    (((id.to_display(value) - lo) / (hi - lo)) as f64).clamp(0.0, 1.0)
}

pub fn render_params(frame: &mut Frame, area: Rect, settings: &ReverbSettings, selected: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3); 4])
        .split(area);

    for (i, (id, row)) in ParamId::ALL.iter().zip(rows.iter()).enumerate() {
        let value = settings.get(*id);
        let is_selected = i == selected;

        let title_style = if is_selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let block = Block::default()
            .title(format!(" {} ", id.name()))
            .title_style(title_style)
            .borders(Borders::ALL);

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(if is_selected { Color::Cyan } else { Color::DarkGray }))
            .ratio(knob_ratio(*id, value))
            .label(format!("{}  ({value:.4})", format_display(*id, value)));
        frame.render_widget(gauge, *row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nudge_moves_in_display_steps() {
        // 0.875 is 3.0 s on the knob; one step is 0.02 s = 0.0025 engine units.
        let up = nudged(ParamId::ReverbTime, 0.875, 1);
        assert!((up - 0.8775).abs() < 1e-5);

        // 20 ms + 10 × 0.5 ms
        let pd = nudged(ParamId::Predelay, 0.02, 10);
        assert!((pd - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_nudge_stops_at_the_ends() {
        assert_eq!(nudged(ParamId::WetMix, 1.0, 5), 1.0);
        assert_eq!(nudged(ParamId::Damping, 0.0, -1), 0.5);
    }

    #[test]
    fn test_knob_ratio_and_labels() {
        assert_eq!(knob_ratio(ParamId::WetMix, 0.25), 0.25);
        assert_eq!(knob_ratio(ParamId::Damping, 0.0), 0.0);
        assert_eq!(format_display(ParamId::Predelay, 0.02), "20.0 ms");
        assert_eq!(format_display(ParamId::ReverbTime, 0.875), "3.00 s");
    }
}
