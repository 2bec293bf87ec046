//! Play command implementation - interactive TUI match against the AI.

// The TUI uses intentional casts for layout
#![allow(clippy::cast_possible_truncation)]

use super::{load_config, resolve_seed, CliError};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lanecrystal::game::{LANES, LANE_COUNT, CATALOG};
use lanecrystal::progress::{JsonFileStore, MemoryStore, ProgressStore};
use lanecrystal::{render, FrameClock, SimEvent, Snapshot, Session, Team};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::collections::VecDeque;
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Events kept in the sidebar log.
const LOG_LINES: usize = 8;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the terminal fails.
pub(crate) fn execute(
    config: Option<PathBuf>,
    seed: Option<u64>,
    progress: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let seed = resolve_seed(seed);
    info!(seed, "starting interactive match");

    match progress {
        Some(path) => run_tui(Session::new(config, seed, JsonFileStore::new(path))),
        None => run_tui(Session::new(config, seed, MemoryStore::default())),
    }
}

/// App state for the TUI.
struct App<S> {
    session: Session<S>,
    log: VecDeque<String>,
}

impl<S: ProgressStore> App<S> {
    fn new(session: Session<S>) -> Self {
        Self {
            session,
            log: VecDeque::with_capacity(LOG_LINES),
        }
    }

    fn frame(&mut self, dt: f32) {
        let lines: Vec<String> = self.session.frame(dt).iter().filter_map(describe).collect();
        for line in lines {
            if self.log.len() == LOG_LINES {
                self.log.pop_front();
            }
            self.log.push_back(line);
        }
    }

    fn shift_lane(&mut self, delta: isize) {
        let current = self.session.selected_lane().index();
        if let Some(next) = current.checked_add_signed(delta) {
            self.session.select_lane(next);
        }
    }

    fn deploy(&mut self, card: usize) {
        if self.session.state().is_playing() {
            let _ = self.session.deploy_card(card);
        }
    }

    fn restart(&mut self) {
        if !self.session.state().is_playing() {
            self.session.restart();
            self.log.clear();
        }
    }
}

fn describe(event: &SimEvent) -> Option<String> {
    match event {
        SimEvent::Spawned {
            team, archetype, lane, ..
        } => Some(format!("{} {archetype} -> {}", team.tag(), LANES[lane.index()].name)),
        SimEvent::Died { team, .. } => Some(format!("{} unit down", team.tag())),
        SimEvent::CrystalBonus { team, amount, .. } => {
            Some(format!("{} crystal +{amount:.0}", team.tag()))
        }
        SimEvent::MatchEnded { outcome } => Some(format!("match over: {outcome}")),
        _ => None,
    }
}

fn run_tui<S: ProgressStore>(session: Session<S>) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut clock = FrameClock::new(session.state().config().max_dt);
    let mut app = App::new(session);

    loop {
        app.frame(clock.tick(Instant::now()));

        terminal.draw(|f| ui(f, &app)).map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(16)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Esc => break,
                KeyCode::Char(c @ '1'..='3') => {
                    app.session.select_lane(usize::from(c as u8 - b'1'));
                }
                KeyCode::Left => app.shift_lane(-1),
                KeyCode::Right => app.shift_lane(1),
                KeyCode::Char('q') => app.deploy(0),
                KeyCode::Char('w') => app.deploy(1),
                KeyCode::Char('e') => app.deploy(2),
                KeyCode::Char('r') => app.deploy(3),
                KeyCode::Char(' ') => app.restart(),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui<S: ProgressStore>(f: &mut Frame, app: &App<S>) {
    let snapshot = app.session.snapshot();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Board and sidebar
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], &snapshot);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(31), Constraint::Min(20)])
        .split(chunks[1]);

    render_board(f, main_chunks[0], app, &snapshot);
    render_sidebar(f, main_chunks[1], app, &snapshot);
    render_footer(f, chunks[2], &snapshot);
}

fn render_header(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let status = match snapshot.outcome {
        Some(outcome) => outcome.to_string().to_uppercase(),
        None => "PLAYING".to_string(),
    };
    let p = snapshot.progression;
    let title = format!(
        " Lanecrystal | {:.1}s | {status} | Wins {} Level {} Tier {} ",
        snapshot.time, p.wins, p.level, p.tier
    );
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn cell_color(c: char) -> Color {
    match c {
        '#' => Color::Yellow,
        'x' | 'o' => Color::DarkGray,
        '*' => Color::Magenta,
        '~' => Color::Blue,
        '!' => Color::White,
        c if c.is_ascii_uppercase() => Color::Cyan,
        c if c.is_ascii_lowercase() => Color::Red,
        _ => Color::Gray,
    }
}

fn render_board<S: ProgressStore>(f: &mut Frame, area: Rect, app: &App<S>, snapshot: &Snapshot) {
    let rows = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = render::board(snapshot, rows)
        .into_iter()
        .map(|row| {
            Line::from(
                row.chars()
                    .map(|c| Span::styled(c.to_string(), Style::default().fg(cell_color(c))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let lane = app.session.selected_lane();
    let title = format!(" Board [{}] ", LANES[lane.index()].name);
    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(board, area);
}

fn render_sidebar<S: ProgressStore>(f: &mut Frame, area: Rect, app: &App<S>, snapshot: &Snapshot) {
    let mut lines = Vec::new();
    let mana = snapshot.mana(Team::Player);

    lines.push(Line::from(format!(
        "Mana {mana:4.1}/{:.0}   enemy {:4.1}",
        snapshot.mana_cap,
        snapshot.mana(Team::Enemy)
    )));
    lines.push(Line::from(format!(
        "Crystal {:.0}{}",
        snapshot.crystal.health,
        snapshot
            .crystal
            .last_hit_by
            .map_or(String::new(), |t| format!(" (last {})", t.tag()))
    )));
    lines.push(Line::from(""));

    for (key, archetype) in ['q', 'w', 'e', 'r'].iter().zip(CATALOG.iter()) {
        let style = if archetype.cost <= mana {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(
            format!(
                "[{key}] {:<7} {:<8} {:.0} mana",
                archetype.name,
                archetype.role(),
                archetype.cost
            ),
            style,
        )));
    }
    lines.push(Line::from(""));

    let lanes: Vec<Span> = (0..LANE_COUNT)
        .map(|i| {
            let style = if i == app.session.selected_lane().index() {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            Span::styled(format!(" {} {} ", i + 1, LANES[i].name), style)
        })
        .collect();
    lines.push(Line::from(lanes));

    if let Some(err) = app.session.last_rejection() {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(""));
    lines.extend(app.log.iter().map(|l| Line::from(l.as_str())));

    let sidebar = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(sidebar, area);
}

fn render_footer(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let controls = if snapshot.playing {
        " [Esc] Quit  [1-3/←→] Lane  [q w e r] Deploy "
    } else {
        " [Esc] Quit  [Space] Restart "
    };
    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
