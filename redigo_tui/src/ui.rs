//! Full-screen layout: terminal pane on the left, stats panel on the right.

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use redigo_console::config::{Palette, Rgb};
use redigo_console::stats::{self, StatRow};
use redigo_console::{Console, HealthState, Scrollback, Theme, Tone};
use std::io::{self, Stdout};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const STATS_WIDTH: u16 = 32;

/// Raw mode + alternate screen for as long as this lives.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let terminal = match Terminal::new(CrosstermBackend::new(io::stdout())) {
            Ok(t) => t,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(e);
            }
        };
        // From here on Drop restores the terminal.
        let mut tui = Self { terminal };
        execute!(tui.terminal.backend_mut(), EnterAlternateScreen)?;
        tui.terminal.clear()?;
        Ok(tui)
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> io::Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

pub fn render(frame: &mut Frame, console: &Console<Scrollback>, health: &HealthState, theme: Theme) {
    let palette = theme.palette();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(STATS_WIDTH)])
        .split(frame.area());

    render_terminal(frame, cols[0], console, &palette);
    render_stats(frame, cols[1], health, &palette);
}

fn render_terminal(frame: &mut Frame, area: Rect, console: &Console<Scrollback>, palette: &Palette) {
    let block = panel_block(" Terminal ", palette);
    let inner = block.inner(area);
    let width = inner.width as usize;
    let height = inner.height as usize;
    let surface = console.surface();

    let mut open = wrap_columns(surface.open_row(), width);
    let mut cursor_col = open.last().map_or(0, |r| r.width());
    if cursor_col >= width {
        open.push(String::new());
        cursor_col = 0;
    }

    // Bottom-anchored: collect wrapped lines newest first until the pane is full.
    let input = tone_style(Tone::Input, palette);
    let mut lines: Vec<Line> = open
        .into_iter()
        .rev()
        .map(|text| Line::styled(text, input))
        .collect();
    for row in surface.rows().rev() {
        if lines.len() >= height {
            break;
        }
        let style = tone_style(row.tone, palette);
        for text in wrap_columns(&row.text, width).into_iter().rev() {
            lines.push(Line::styled(text, style));
        }
    }
    lines.truncate(height.max(1));
    lines.reverse();
    let shown = u16::try_from(lines.len()).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if inner.width > 0 && inner.height > 0 {
        let col = u16::try_from(cursor_col).unwrap_or(u16::MAX);
        let x = inner.x + col.min(inner.width - 1);
        let y = inner.y + shown.min(inner.height).saturating_sub(1);
        frame.set_cursor_position((x, y));
    }
}

/// Split `text` into chunks of at most `width` columns, the way a terminal
/// soft-wraps. Always yields at least one chunk.
fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(ch);
        used += w;
    }
    chunks.push(current);
    chunks
}

fn render_stats(frame: &mut Frame, area: Rect, health: &HealthState, palette: &Palette) {
    let block = panel_block(" Server Stats ", palette);
    let width = block.inner(area).width as usize;
    let muted = with_fg(Style::default(), palette.muted);

    let mut lines = Vec::new();
    if health.is_connected() {
        lines.push(Line::styled("● connected", with_fg(Style::default(), palette.accent)));
    } else {
        lines.push(Line::styled(
            "○ disconnected",
            with_fg(Style::default(), palette.error).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::default());

    match health.stats() {
        Some(snapshot) if !snapshot.is_empty() => {
            for row in stats::panel(&snapshot) {
                lines.push(stat_line(row, width, palette));
            }
        }
        Some(_) => lines.push(Line::styled("(no stats reported)", muted)),
        None => lines.push(Line::styled("waiting for stats...", muted)),
    }

    if !health.is_connected() {
        if let Some(reason) = health.last_failure() {
            lines.push(Line::default());
            lines.push(Line::styled(format!("last poll: {reason}"), muted));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn stat_line(row: StatRow, width: usize, palette: &Palette) -> Line<'static> {
    let used = row.label.chars().count() + row.value.chars().count();
    let pad = width.saturating_sub(used).max(1);
    Line::from(vec![
        Span::styled(row.label, with_fg(Style::default(), palette.muted)),
        Span::raw(" ".repeat(pad)),
        Span::styled(row.value, with_fg(Style::default(), palette.foreground)),
    ])
}

fn panel_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    let mut style = Style::default();
    if let Some(bg) = color(palette.background) {
        style = style.bg(bg);
    }
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(with_fg(style, palette.foreground))
        .border_style(with_fg(Style::default(), palette.muted))
}

fn tone_style(tone: Tone, palette: &Palette) -> Style {
    let base = Style::default();
    match tone {
        Tone::Banner => with_fg(base, palette.accent).add_modifier(Modifier::BOLD),
        Tone::Input | Tone::Output => with_fg(base, palette.foreground),
        Tone::Help => with_fg(base, palette.help),
        Tone::Error => with_fg(base, palette.error).add_modifier(Modifier::BOLD),
    }
}

fn color(rgb: Option<Rgb>) -> Option<Color> {
    rgb.map(|Rgb(r, g, b)| Color::Rgb(r, g, b))
}

fn with_fg(style: Style, rgb: Option<Rgb>) -> Style {
    match color(rgb) {
        Some(c) => style.fg(c),
        None => style,
    }
}
