//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────┐
//! │  bridgeview   http://…:8080   #42            │
//! ├───────┬────────┬───────┬─────────┬───────────┤
//! │ Sent  │ Recv   │ Loss  │ Avg RTT │ Success   │
//! ├───────┴────────┴───────┴─────────┴───────────┤
//! │  ╭ Packets ────────────────────────────────╮ │
//! │  ╭ Packet Loss ────────────────────────────╮ │
//! │  ╭ Round-Trip Time ────────────────────────╮ │
//! ├──────────────────────────────────────────────┤
//! │  Time      Source        Destination   …     │
//! ├──────────────────────────────────────────────┤
//! │  q: quit   p: pause   e: export             │
//! └──────────────────────────────────────────────┘
//!
//! Charts are rendered by handing the engine a [`RecordingSurface`] sized to
//! the panel's inner cells, then replaying the recorded primitives onto a
//! braille canvas. The y axis flips during replay: the engine draws y-down,
//! the canvas is y-up.

use bridgeview_core::surface::{self, DrawOp, HAlign, VAlign};
use bridgeview_core::{RecordingSurface, Sample, Severity, SummaryStats, fmt};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::{prelude::*, widgets::*};

use super::app::{App, Snapshot};

pub fn draw(f: &mut Frame, app: &mut App) {
    let snap = app.snapshot();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                       // title
            Constraint::Length(3),                       // stat tiles
            Constraint::Min(9),                          // charts
            Constraint::Length(TRAFFIC_ROWS as u16 + 3), // recent traffic
            Constraint::Length(1),                       // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app, &snap);
    draw_stats(f, rows[1], app);
    draw_charts(f, rows[2], app);
    draw_traffic(f, rows[3], app);
    draw_keys(f, rows[4]);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App, snap: &Snapshot) {
    let refreshes = snap.refreshes;
    let paused = if app.is_paused() { "  ⏸ paused" } else { "" };
    let note = match (&snap.last_error, &snap.status) {
        (Some(err), _) => format!("  ! {err}"),
        (None, Some(status)) => format!("  {status}"),
        (None, None) => String::new(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" bridgeview ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(app.url().to_string(), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!(
                    "  #{refreshes}  every {:.1}s{paused}{note} ",
                    app.refresh_rate_secs()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    f.render_widget(block, area);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let totals = app.dash.totals;
    let stats = SummaryStats::compute(app.dash.window());

    tile(
        f,
        tiles[0],
        "Sent",
        totals.sent().to_string(),
        Style::default().fg(Color::Blue),
    );
    tile(
        f,
        tiles[1],
        "Received",
        totals.received().to_string(),
        Style::default().fg(Color::Green),
    );
    match &stats {
        Some(s) => {
            tile(
                f,
                tiles[2],
                "Loss",
                format!("{:.1}%", s.total_loss),
                severity_style(Severity::for_loss(s.total_loss)),
            );
            tile(
                f,
                tiles[3],
                "Avg RTT",
                format!("{:.2} ms", s.avg_rtt),
                Style::default().fg(Color::Yellow),
            );
            tile(
                f,
                tiles[4],
                "Success",
                format!("{:.1}%", s.success_rate),
                severity_style(Severity::for_success(s.success_rate)),
            );
        }
        None => {
            for (i, label) in [(2usize, "Loss"), (3, "Avg RTT"), (4, "Success")] {
                tile(
                    f,
                    tiles[i],
                    label,
                    "—".to_string(),
                    Style::default().fg(Color::DarkGray),
                );
            }
        }
    }
}

fn tile(f: &mut Frame, area: Rect, label: &str, value: String, style: Style) {
    let p = Paragraph::new(Line::from(Span::styled(value, style.bold())))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(format!(" {label} ")));
    f.render_widget(p, area);
}

fn severity_style(sev: Severity) -> Style {
    match sev {
        Severity::Good => Style::default().fg(Color::Green),
        Severity::Warn => Style::default().fg(Color::Yellow),
        Severity::Danger => Style::default().fg(Color::Red),
    }
}

fn draw_charts(f: &mut Frame, area: Rect, app: &mut App) {
    let thirds = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    app.chart_areas.clear();
    for (i, &chunk) in thirds.iter().enumerate() {
        let title = app.dash.views()[i].spec.title;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "));
        let inner = block.inner(chunk);
        app.chart_areas.push((i, inner));

        let mut surface =
            RecordingSurface::new(inner.width as f64, inner.height as f64).cell_metrics();
        app.dash.draw(i, &mut surface);

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([0.0, inner.width as f64])
            .y_bounds([0.0, inner.height as f64])
            .paint(|ctx| replay(ctx, &surface.ops, inner.height as f64));
        f.render_widget(canvas, chunk);
    }
}

/// Records shown in the recent-traffic table.
const TRAFFIC_ROWS: usize = 5;

fn draw_traffic(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = traffic_rows(app.dash.window(), TRAFFIC_ROWS)
        .into_iter()
        .map(|cells| Row::new(cells.to_vec()))
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),  // time
            Constraint::Min(16),    // source
            Constraint::Min(20),    // destination
            Constraint::Length(6),  // sent
            Constraint::Length(8),  // received
            Constraint::Length(10), // rtt
        ],
    )
    .header(
        Row::new(vec!["Time", "Source", "Destination", "Sent", "Received", "RTT"])
            .style(Style::default().fg(Color::DarkGray)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recent Traffic "),
    );
    f.render_widget(table, area);
}

/// Table cells for the most recent records, newest first.
fn traffic_rows(window: &[Sample], limit: usize) -> Vec<[String; 6]> {
    window
        .iter()
        .rev()
        .take(limit)
        .map(|s| {
            [
                fmt::format_time(s.timestamp),
                s.source.clone().unwrap_or_else(|| "—".to_string()),
                s.destination.clone().unwrap_or_else(|| "—".to_string()),
                s.sent.to_string(),
                s.received.to_string(),
                format!("{:.2} ms", s.rtt),
            ]
        })
        .collect()
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let keys = Line::from(Span::styled(
        " q: quit   p: pause   e: export   mouse: inspect samples",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(keys), area);
}

// ---------------------------------------------------------------------------
// Primitive replay onto the braille canvas
// ---------------------------------------------------------------------------

/// Terminals have no alpha channel; fold alpha into brightness instead.
fn tui_color(c: surface::Color) -> Color {
    let dim = c.a.sqrt();
    Color::Rgb(
        (c.r as f32 * dim) as u8,
        (c.g as f32 * dim) as u8,
        (c.b as f32 * dim) as u8,
    )
}

fn replay(ctx: &mut Context, ops: &[DrawOp], height: f64) {
    for op in ops {
        match op {
            // The canvas starts each frame blank.
            DrawOp::Clear => {}
            DrawOp::Polyline { points, color, .. } => {
                for pair in points.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: height - pair[0].1,
                        x2: pair[1].0,
                        y2: height - pair[1].1,
                        color: tui_color(*color),
                    });
                }
            }
            DrawOp::Polygon { points, color } => fill_polygon(ctx, points, *color, height),
            DrawOp::Rect { x, y, w, h, color } => {
                let mut coords = Vec::new();
                let mut py = *y;
                while py <= y + h {
                    let mut px = *x;
                    while px <= x + w {
                        coords.push((px, height - py));
                        px += 0.5;
                    }
                    py += 0.5;
                }
                ctx.draw(&Points {
                    coords: &coords,
                    color: tui_color(*color),
                });
            }
            DrawOp::Text {
                text,
                x,
                y,
                color,
                align,
                baseline,
            } => {
                let w = text.chars().count() as f64;
                let x = match align {
                    HAlign::Left => *x,
                    HAlign::Center => x - w / 2.0,
                    HAlign::Right => x - w,
                };
                let y = match baseline {
                    VAlign::Top => y + 0.5,
                    VAlign::Middle => *y,
                    VAlign::Bottom => y - 0.5,
                };
                ctx.print(
                    x,
                    height - y,
                    Line::styled(text.clone(), Style::default().fg(tui_color(*color))),
                );
            }
            DrawOp::RotatedText { text, x, y, color } => {
                // Terminals cannot rotate text; stack the characters instead.
                let n = text.chars().count() as f64;
                for (i, ch) in text.chars().enumerate() {
                    let cy = y - n / 2.0 + i as f64 + 0.5;
                    ctx.print(
                        *x,
                        height - cy,
                        Line::styled(ch.to_string(), Style::default().fg(tui_color(*color))),
                    );
                }
            }
        }
    }
}

/// Even-odd scanline fill, sampled at half-cell resolution so the braille
/// dots read as a solid area.
fn fill_polygon(ctx: &mut Context, points: &[(f64, f64)], color: surface::Color, height: f64) {
    if points.len() < 3 {
        return;
    }
    let color = tui_color(color);
    let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let mut y = min_y;
    while y <= max_y {
        let mut xs: Vec<f64> = Vec::new();
        for i in 0..points.len() {
            let (x1, y1) = points[i];
            let (x2, y2) = points[(i + 1) % points.len()];
            if (y1 <= y && y < y2) || (y2 <= y && y < y1) {
                xs.push(x1 + (y - y1) / (y2 - y1) * (x2 - x1));
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));

        let mut coords = Vec::new();
        for pair in xs.chunks(2) {
            if let [a, b] = pair {
                let mut x = *a;
                while x <= *b {
                    coords.push((x, height - y));
                    x += 0.5;
                }
            }
        }
        if !coords.is_empty() {
            ctx.draw(&Points {
                coords: &coords,
                color,
            });
        }
        y += 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: f64, endpoints: bool) -> Sample {
        let mut s = Sample::synthetic(ts, 10, 9, 10.0, 12.5);
        if endpoints {
            s.source = Some("192.0.2.10".to_string());
            s.destination = Some("2001:db8:64::1".to_string());
        }
        s
    }

    #[test]
    fn test_traffic_rows_newest_first() {
        let window: Vec<Sample> = (0..10)
            .map(|i| record(1609459200.0 + i as f64, true))
            .collect();
        let rows = traffic_rows(&window, TRAFFIC_ROWS);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0][0], "00:00:09");
        assert_eq!(rows[4][0], "00:00:05");
    }

    #[test]
    fn test_traffic_rows_render_every_column() {
        let rows = traffic_rows(&[record(1609459230.0, true)], TRAFFIC_ROWS);
        assert_eq!(
            rows[0],
            [
                "00:00:30".to_string(),
                "192.0.2.10".to_string(),
                "2001:db8:64::1".to_string(),
                "10".to_string(),
                "9".to_string(),
                "12.50 ms".to_string(),
            ]
        );
    }

    #[test]
    fn test_traffic_rows_placeholder_for_missing_endpoints() {
        let rows = traffic_rows(&[record(0.0, false)], TRAFFIC_ROWS);
        assert_eq!(rows[0][1], "—");
        assert_eq!(rows[0][2], "—");
    }

    #[test]
    fn test_traffic_rows_short_window() {
        assert!(traffic_rows(&[], TRAFFIC_ROWS).is_empty());
        assert_eq!(traffic_rows(&[record(0.0, true)], TRAFFIC_ROWS).len(), 1);
    }
}
