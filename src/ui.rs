//! UI rendering and layout utilities
//!
//! Everything here consumes a `MeterFrame` snapshot plus the resolved
//! config; no level math happens at render time.

use crate::config::{MeterConfig, Orientation};
use crate::meter::MeterFrame;
use crate::scale::{self, zone_boundaries};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Zone color for a cell at a given position on the 0-100 scale
fn cell_color(percent: f32, warning_pos: f32, danger_pos: f32, config: &MeterConfig) -> Color {
    if percent >= danger_pos {
        config.colors.danger
    } else if percent >= warning_pos {
        config.colors.warning
    } else {
        config.colors.peak
    }
}

/// Create a horizontal gradient bar filled to `percent`, colored by the
/// configured warning/danger zones.
pub fn create_gradient_bar(width: usize, percent: f32, config: &MeterConfig) -> Line<'static> {
    let (warning_pos, danger_pos) = zone_boundaries(config);
    let ratio = (percent / 100.0).clamp(0.0, 1.0) as f64;
    let filled = (ratio * width as f64) as usize;
    let partial_fill = (ratio * width as f64) - filled as f64;
    let mut spans = Vec::new();

    for i in 0..width {
        let pos = (i as f32 + 0.5) / width as f32 * 100.0;
        let color = cell_color(pos, warning_pos, danger_pos, config);

        let ch = if i < filled {
            '█'
        } else if i == filled && partial_fill > 0.0 {
            // Partial fill characters for smoother appearance
            match (partial_fill * 8.0) as usize {
                0 | 1 => '░',
                2 | 3 => '▒',
                4 | 5 => '▓',
                _ => '█',
            }
        } else {
            '░'
        };
        spans.push(Span::styled(ch.to_string(), Style::default().fg(color)));
    }

    Line::from(spans)
}

/// Overlay the peak-hold marker on a horizontal bar line.
pub fn overlay_hold_marker(
    line: &mut Line<'static>,
    width: usize,
    hold_percent: f32,
    clipping: bool,
    config: &MeterConfig,
) {
    if width == 0 || hold_percent <= 0.0 {
        return;
    }
    let pos = ((hold_percent / 100.0) * (width - 1) as f32).round() as usize;
    let color = if clipping {
        config.colors.danger
    } else {
        config.colors.hold
    };
    if let Some(span) = line.spans.get_mut(pos) {
        *span = Span::styled(
            "▌".to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }
}

/// Create the dB label line under a horizontal bar from the major ticks.
pub fn create_scale_labels(width: usize, config: &MeterConfig) -> Line<'static> {
    let mut row: Vec<char> = vec![' '; width];
    for tick in scale::ticks(config.db_min, config.db_max) {
        let Some(label) = tick.label else { continue };
        let pos = ((tick.percent / 100.0) * (width.saturating_sub(1)) as f32).round() as usize;
        // Shift left so labels at the top of the range still fit
        let start = pos.min(width.saturating_sub(label.chars().count()));
        for (offset, ch) in label.chars().enumerate() {
            if let Some(cell) = row.get_mut(start + offset) {
                *cell = ch;
            }
        }
    }
    Line::from(Span::styled(
        row.into_iter().collect::<String>(),
        Style::default().fg(config.colors.scale),
    ))
}

/// Build the rows of a vertical meter: bar columns side by side with the
/// scale labels on the right. Row 0 is the top of the range.
pub fn create_vertical_rows(
    height: usize,
    frame: &MeterFrame,
    config: &MeterConfig,
) -> Vec<Line<'static>> {
    let (warning_pos, danger_pos) = zone_boundaries(config);
    let ticks = scale::ticks(config.db_min, config.db_max);

    let hold_row = if config.show_hold && frame.hold_percent > 0.0 && height > 0 {
        Some((((100.0 - frame.hold_percent) / 100.0) * (height - 1) as f32).round() as usize)
    } else {
        None
    };

    let column = |percent: f32, row: usize, color_by_zone: bool, base: Color| -> Span<'static> {
        let ratio = (percent / 100.0).clamp(0.0, 1.0);
        let filled = (ratio * height as f32) as usize;
        let partial = ratio * height as f32 - filled as f32;
        let bottom_index = height - 1 - row;
        let pos = (bottom_index as f32 + 0.5) / height as f32 * 100.0;
        let color = if color_by_zone {
            cell_color(pos, warning_pos, danger_pos, config)
        } else {
            base
        };
        let ch = if bottom_index < filled {
            "██"
        } else if bottom_index == filled && partial > 0.5 {
            "▄▄"
        } else {
            "  "
        };
        Span::styled(ch.to_string(), Style::default().fg(color))
    };

    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let mut spans: Vec<Span<'static>> = Vec::new();

        if Some(row) == hold_row {
            let color = if frame.clipping {
                config.colors.danger
            } else {
                config.colors.hold
            };
            spans.push(Span::styled(
                "━━".to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(column(frame.peak_percent, row, true, config.colors.peak));
        }

        if config.show_rms {
            spans.push(Span::raw(" "));
            spans.push(column(frame.rms_percent, row, false, config.colors.rms));
        }
        if config.show_lufs {
            spans.push(Span::raw(" "));
            spans.push(column(frame.lufs_percent, row, false, config.colors.text));
        }

        if config.show_scale {
            // Right-aligned tick label for this row, if a major lands here
            let label = ticks
                .iter()
                .filter(|t| t.major)
                .find(|t| {
                    let tick_row =
                        (((100.0 - t.percent) / 100.0) * (height - 1) as f32).round() as usize;
                    tick_row == row
                })
                .and_then(|t| t.label.clone());
            spans.push(Span::styled(
                format!(" {}", label.unwrap_or_default()),
                Style::default().fg(config.colors.scale),
            ));
        }

        lines.push(Line::from(spans));
    }
    lines
}

/// Render the complete UI for one frame.
pub fn render_ui(
    f: &mut Frame,
    frame: &MeterFrame,
    config: &MeterConfig,
    device_name: &str,
    preset_name: &str,
) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(size);

    // Device and readouts
    let mut header_spans = vec![Span::raw(device_name.to_string())];
    if config.show_numeric {
        // Readout takes the zone color of the held level, bold on clip
        let style = if frame.clipping {
            Style::default()
                .fg(config.colors.danger)
                .add_modifier(Modifier::BOLD)
        } else if frame.hold_db > config.db_min {
            Style::default().fg(scale::color_for_level(frame.hold_db, config))
        } else {
            Style::default().fg(config.colors.text)
        };
        header_spans.push(Span::raw("  peak "));
        header_spans.push(Span::styled(frame.numeric.clone(), style));
        header_spans.push(Span::raw(" dB"));
    }
    if config.show_lufs {
        header_spans.push(Span::raw("  LUFS "));
        header_spans.push(Span::styled(
            frame.lufs_label.clone(),
            Style::default().fg(config.colors.text),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans)).block(
        Block::default()
            .title(format!("vumon [{}]", preset_name))
            .borders(Borders::ALL),
    );
    f.render_widget(header, chunks[0]);

    match config.orientation {
        Orientation::Horizontal => render_horizontal(f, chunks[1], frame, config),
        Orientation::Vertical => render_vertical(f, chunks[1], frame, config),
    }

    // Status and key hints
    let status = Paragraph::new("Esc/q quit   r reset hold   1-4 preset")
        .style(Style::default().fg(config.colors.scale))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);
}

fn render_horizontal(f: &mut Frame, area: Rect, frame: &MeterFrame, config: &MeterConfig) {
    let width = (area.width as usize).saturating_sub(crate::constants::ui::BAR_BORDER_WIDTH);
    if width == 0 {
        return;
    }

    let mut lines = Vec::new();

    let mut peak_line = create_gradient_bar(width, frame.peak_percent, config);
    if config.show_hold {
        overlay_hold_marker(&mut peak_line, width, frame.hold_percent, frame.clipping, config);
    }
    lines.push(peak_line);

    if config.show_rms {
        let ratio = (frame.rms_percent / 100.0).clamp(0.0, 1.0);
        let filled = (ratio * width as f32) as usize;
        let bar: String = (0..width).map(|i| if i < filled { '▬' } else { ' ' }).collect();
        lines.push(Line::from(Span::styled(
            bar,
            Style::default().fg(config.colors.rms),
        )));
    }

    if config.show_lufs {
        let ratio = (frame.lufs_percent / 100.0).clamp(0.0, 1.0);
        let filled = (ratio * width as f32) as usize;
        let bar: String = (0..width).map(|i| if i < filled { '▬' } else { ' ' }).collect();
        lines.push(Line::from(Span::styled(
            bar,
            Style::default().fg(config.colors.text),
        )));
    }

    if config.show_scale {
        lines.push(create_scale_labels(width, config));
    }

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Level"));
    f.render_widget(widget, area);
}

fn render_vertical(f: &mut Frame, area: Rect, frame: &MeterFrame, config: &MeterConfig) {
    let height = (area.height as usize).saturating_sub(crate::constants::ui::BAR_BORDER_WIDTH);
    if height == 0 {
        return;
    }

    let lines = create_vertical_rows(height, frame, config);
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Level"));
    f.render_widget(widget, area);
}
