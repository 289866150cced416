use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{self, Canvas, Circle},
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap,
    },
    Frame,
};
use timepiece_core::{format_hms_secs, hand_angles, read_clock, HourFormat, TimerState};

use crate::app::{App, AppMode, SettingsFocus};
use crate::swatches::SWATCHES;

const LOG_PANEL_HEIGHT: u16 = 6;

pub fn draw(f: &mut Frame, app: &App, log_lines: &[String]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
            Constraint::Length(LOG_PANEL_HEIGHT),
        ])
        .split(f.size());

    draw_header(f, app, chunks[0]);
    match app.mode() {
        AppMode::Analog => draw_analog(f, app, chunks[1]),
        AppMode::Digital => draw_digital(f, app, chunks[1]),
        AppMode::Stopwatch => draw_stopwatch(f, app, chunks[1]),
        AppMode::Timer => draw_countdown(f, app, chunks[1]),
    }
    draw_footer(f, app, chunks[2]);
    draw_logs(f, log_lines, chunks[3]);

    if let Some(cursor) = app.nav_cursor() {
        draw_menu(f, app, chunks[0], cursor);
    }
    if let Some(focus) = app.settings_focus() {
        draw_settings(f, app, focus);
    }
    if app.help_visible() {
        draw_help(f, app);
    }
}

fn accent_style(app: &App) -> Style {
    Style::default().fg(app.accent().color())
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let titles = AppMode::ALL.iter().map(|m| m.name()).collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(app.mode().index())
        .highlight_style(accent_style(app).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Timepiece"));
    f.render_widget(tabs, area);
}

/// The widget dropdown hangs off the header.
fn draw_menu(f: &mut Frame, app: &App, header: Rect, cursor: usize) {
    let height = AppMode::ALL.len() as u16 + 2;
    let area = Rect::new(header.x + 1, header.y + header.height, 20, height)
        .intersection(f.size());

    let items = AppMode::ALL
        .iter()
        .map(|m| {
            let marker = if *m == app.mode() { "• " } else { "  " };
            ListItem::new(format!("{}{}", marker, m.name()))
        })
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Widgets"))
        .highlight_style(accent_style(app).add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    state.select(Some(cursor));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_analog(f: &mut Frame, app: &App, area: Rect) {
    let wall = app.wall();
    let angles = hand_angles(wall.hour, wall.minute, wall.second);
    let accent = app.accent().color();

    let block = Block::default().borders(Borders::ALL).title("Analog");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    // Terminal cells are about twice as tall as wide.
    let face = rows[0];
    let width = face.width.min(face.height.saturating_mul(2));
    let face = Rect::new(face.x + (face.width - width) / 2, face.y, width, face.height);

    let hand = |degrees: f64, length: f64, color: Color| {
        let radians = degrees.to_radians();
        canvas::Line {
            x1: 0.0,
            y1: 0.0,
            x2: radians.sin() * length,
            y2: radians.cos() * length,
            color,
        }
    };
    let hour_hand = hand(angles.hour, 0.5, Color::White);
    let minute_hand = hand(angles.minute, 0.75, Color::White);
    let second_hand = hand(angles.second, 0.9, accent);

    let clock_face = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.1, 1.1])
        .y_bounds([-1.1, 1.1])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: 1.0,
                color: Color::Gray,
            });
            for tick in 0..12 {
                let radians = (tick as f64 * 30.0).to_radians();
                let (x, y) = (radians.sin(), radians.cos());
                ctx.draw(&canvas::Line {
                    x1: x * 0.85,
                    y1: y * 0.85,
                    x2: x * 0.97,
                    y2: y * 0.97,
                    color: Color::Gray,
                });
            }
            ctx.draw(&hour_hand);
            ctx.draw(&minute_hand);
            ctx.draw(&second_hand);
        });
    f.render_widget(clock_face, face);

    let date = Paragraph::new(wall.date_line.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(date, rows[1]);
}

fn draw_digital(f: &mut Frame, app: &App, area: Rect) {
    let wall = app.wall();
    let reading = read_clock(wall.hour, wall.minute, wall.second, app.hour_format());

    let mut time = vec![Span::styled(
        reading.main,
        accent_style(app).add_modifier(Modifier::BOLD),
    )];
    if let Some(meridiem) = reading.meridiem {
        time.push(Span::raw(" "));
        time.push(Span::styled(meridiem, Style::default().fg(Color::Gray)));
    }

    let lines = vec![
        Line::from(""),
        Line::from(time),
        Line::from(""),
        Line::from(Span::styled(
            wall.date_line.as_str(),
            Style::default().fg(Color::Gray),
        )),
    ];
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Digital [{}]",
            app.hour_format().label()
        )));
    f.render_widget(body, area);
}

fn draw_stopwatch(f: &mut Frame, app: &App, area: Rect) {
    let sw = app.stopwatch();
    let now = app.now_ms();
    let readout = sw.readout(now);

    let state = match app.stopwatch_state() {
        TimerState::Idle => "ready",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Stopwatch [{}]", state));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let mut time = vec![Span::styled(
        readout.main,
        accent_style(app).add_modifier(Modifier::BOLD),
    )];
    if let Some(sub) = readout.sub_second {
        time.push(Span::styled(sub, Style::default().fg(Color::DarkGray)));
    }
    let time = Paragraph::new(vec![Line::from(""), Line::from(time)]).alignment(Alignment::Center);
    f.render_widget(time, rows[0]);

    // Lap list (most recent first)
    let rows_out = sw.lap_rows();
    let items = if rows_out.is_empty() {
        vec![ListItem::new(Span::styled(
            "No laps yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        rows_out
            .into_iter()
            .map(|row| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("# {:<4}", row.number), accent_style(app)),
                    Span::raw(row.time.to_string()),
                    Span::styled(
                        format!("  • {}", row.label),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect()
    };
    let laps = List::new(items).block(
        Block::default()
            .borders(Borders::TOP)
            .title(format!("Laps ({})", sw.engine.lap_count())),
    );
    f.render_widget(laps, rows[1]);
}

fn draw_countdown(f: &mut Frame, app: &App, area: Rect) {
    let cd = app.countdown();
    let display = cd.timer.display();

    let state = if cd.editing.is_some() {
        "editing"
    } else if cd.timer.is_running() {
        "running"
    } else {
        "paused"
    };

    let readout_style = if display.overtime {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        accent_style(app).add_modifier(Modifier::BOLD)
    };
    let mut time = vec![Span::styled(display.text, readout_style)];
    if display.overtime {
        time.push(Span::styled("  OVERTIME", Style::default().fg(Color::Red)));
    }

    let mut fields = Vec::new();
    for (index, (value, unit)) in cd.fields.iter().zip(["h", "m", "s"]).enumerate() {
        let style = if cd.field_focused(index) {
            accent_style(app).add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        fields.push(Span::styled(format!("[{:>4}]", value), style));
        fields.push(Span::raw(format!(" {}  ", unit)));
    }

    let lines = vec![
        Line::from(""),
        Line::from(time),
        Line::from(""),
        Line::from(fields),
    ];
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Timer [{}] reset to {}",
            state,
            format_hms_secs(cd.timer.default_seconds().unsigned_abs())
        )));
    f.render_widget(body, area);
}

fn footer_hint(app: &App) -> &'static str {
    if app.countdown().editing.is_some() && app.mode() == AppMode::Timer {
        return "0-9=type  ←/→/Tab=next field  Enter/Esc=done";
    }
    mode_hint(app.mode())
}

fn mode_hint(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Analog => "Tab=widgets  s=settings  ?=help  q=quit",
        AppMode::Digital => "1=12h  2=24h  Tab=widgets  s=settings  ?=help  q=quit",
        AppMode::Stopwatch => {
            "space=start/pause  Enter=lap/reset  l=lap  r=reset  c=clear laps  m=ms  \
             Tab=widgets  s=settings  ?=help  q=quit"
        }
        AppMode::Timer => {
            "space=start/pause  r=reset  e=edit  Tab=widgets  s=settings  ?=help  q=quit"
        }
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let controls = Paragraph::new(footer_hint(app))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Blue))
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(controls, area);
}

fn draw_logs(f: &mut Frame, log_lines: &[String], area: Rect) {
    let log_height = area.height.saturating_sub(2) as usize;
    let start = log_lines.len().saturating_sub(log_height);
    let log_text = if log_lines.is_empty() {
        "No logs yet.".to_string()
    } else {
        log_lines[start..].join("\n")
    };

    let log_widget = Paragraph::new(log_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title("Logs"));
    f.render_widget(log_widget, area);
}

fn draw_settings(f: &mut Frame, app: &App, focus: SettingsFocus) {
    let area = centered_rect(f.size(), 64, 8);

    let focused = |on: bool, base: Style| {
        if on {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        }
    };

    let mut format_row = vec![Span::raw("Clock   ")];
    for format in [HourFormat::TwelveHour, HourFormat::TwentyFourHour] {
        let mut style = Style::default();
        if format == app.hour_format() {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        let style = focused(focus == SettingsFocus::Format(format), style);
        format_row.push(Span::styled(format!(" {} ", format.label()), style));
        format_row.push(Span::raw(" "));
    }

    let mut swatch_row = vec![Span::raw("Accent  ")];
    let active = app.accent().swatch_index();
    for (index, swatch) in SWATCHES.iter().enumerate() {
        let marker = if active == Some(index) { "■" } else { "□" };
        let style = focused(
            focus == SettingsFocus::Swatch(index),
            Style::default().fg(swatch.color),
        );
        swatch_row.push(Span::styled(format!("{} {}", marker, swatch.name), style));
        swatch_row.push(Span::raw(" "));
    }

    let lines = vec![
        Line::from(""),
        Line::from(format_row),
        Line::from(""),
        Line::from(swatch_row),
        Line::from(""),
        Line::from(Span::styled(
            "↑/↓=row  ←/→=choose  Enter=apply  Esc=close",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Settings")
            .border_style(accent_style(app)),
    );
    f.render_widget(Clear, area);
    f.render_widget(panel, area);
}

fn help_text(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Analog => {
            "ANALOG CLOCK\n\
             Hands follow the local time.\n\
             \n\
             Tab    choose a widget\n\
             s      settings (format, accent)\n\
             q      quit"
        }
        AppMode::Digital => {
            "DIGITAL CLOCK\n\
             \n\
             1      12-hour display\n\
             2      24-hour display\n\
             Tab    choose a widget\n\
             s      settings (format, accent)\n\
             q      quit"
        }
        AppMode::Stopwatch => {
            "STOPWATCH\n\
             \n\
             space  start / pause\n\
             Enter  lap while running, reset otherwise\n\
             l      lap\n\
             r      reset\n\
             c      clear laps\n\
             m      show / hide milliseconds\n\
             ↑/↓    scroll laps"
        }
        AppMode::Timer => {
            "TIMER\n\
             Counts past zero into overtime.\n\
             \n\
             space  start / pause\n\
             r      reset to the default\n\
             e      edit hours, minutes, seconds\n\
             Tab    next field while editing"
        }
    }
}

fn draw_help(f: &mut Frame, app: &App) {
    let text = help_text(app.mode());
    let height = text.lines().count() as u16 + 4;
    let area = centered_rect(f.size(), 52, height);

    let mut lines = text.lines().map(Line::from).collect::<Vec<_>>();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered_rect(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}
