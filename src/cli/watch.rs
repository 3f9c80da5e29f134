//! Watch command implementation - Interactive TUI viewer.

// CLI watch uses intentional casts for display and timing
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use std::collections::VecDeque;
use std::io::stdout;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use units::game::{PlanetSize, PlayerId, SimEvent, SimulationWorld};

use super::{CliError, load_config, resolve_seed};

/// Recent events shown in the log panel.
const EVENT_LOG_LEN: usize = 12;

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the TUI fails.
pub(crate) fn execute(
    seed: Option<u64>,
    speed: f64,
    config: Option<&Path>,
) -> Result<(), CliError> {
    let mut sim = load_config(config)?;
    sim.ai.control_human = true;
    let world = SimulationWorld::new(resolve_seed(seed), sim)?;

    run_tui(App::new(world, speed))
}

/// App state for the TUI.
struct App {
    world: SimulationWorld,
    paused: bool,
    speed: f64,
    last_frame: Instant,
    log: VecDeque<String>,
}

impl App {
    fn new(world: SimulationWorld, speed: f64) -> Self {
        Self {
            world,
            paused: false,
            speed: speed.clamp(0.25, 16.0),
            last_frame: Instant::now(),
            log: VecDeque::with_capacity(EVENT_LOG_LEN),
        }
    }

    /// Advance by the real time since the last frame, scaled by speed.
    fn tick(&mut self) {
        let elapsed = self.last_frame.elapsed().as_secs_f64();
        self.last_frame = Instant::now();
        if self.paused || self.world.is_game_over() {
            return;
        }

        let max_dt = self.world.config().simulation.max_dt;
        let mut remaining = elapsed * self.speed;
        while remaining > 0.0 {
            let step = remaining.min(max_dt);
            self.world.update(step);
            remaining -= step;
        }

        for (time, event) in self.world.drain_events() {
            if let Some(text) = describe_event(&self.world, event) {
                if self.log.len() == EVENT_LOG_LEN {
                    self.log.pop_front();
                }
                self.log.push_back(format!("{time:>6.1}s {text}"));
            }
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn increase_speed(&mut self) {
        self.speed = (self.speed * 2.0).min(16.0);
    }

    fn decrease_speed(&mut self) {
        self.speed = (self.speed / 2.0).max(0.25);
    }

    fn restart(&mut self) {
        self.world.init_game();
        self.log.clear();
        self.last_frame = Instant::now();
    }
}

fn player_name(world: &SimulationWorld, id: PlayerId) -> &str {
    world.player(id).map_or("?", |p| p.name.as_str())
}

/// One-line description of the events worth showing.
fn describe_event(world: &SimulationWorld, event: SimEvent) -> Option<String> {
    match event {
        SimEvent::PlanetCaptured { planet, player, .. } => Some(format!(
            "{} captured planet {planet}",
            player_name(world, player)
        )),
        SimEvent::PlanetCollapsed { planet, player } => Some(format!(
            "planet {planet} of {} collapsed",
            player_name(world, player)
        )),
        SimEvent::PlayerEliminated { player } => {
            Some(format!("{} eliminated", player_name(world, player)))
        }
        _ => None,
    }
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    loop {
        app.tick();
        terminal
            .draw(|f| ui(f, &app))
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(33)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Char('+' | '=') => app.increase_speed(),
                KeyCode::Char('-') => app.decrease_speed(),
                KeyCode::Char('r') => app.restart(),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(12), Constraint::Length(EVENT_LOG_LEN as u16 + 2)])
        .split(main_chunks[1]);

    render_map(f, main_chunks[0], app);
    render_stats(f, side_chunks[0], app);
    render_log(f, side_chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let status = if let Some(winner) = app.world.winner() {
        format!("{} WINS", player_name(&app.world, winner))
    } else if app.world.is_game_over() {
        "GAME OVER".to_string()
    } else if app.paused {
        "PAUSED".to_string()
    } else {
        "RUNNING".to_string()
    };

    let title = format!(
        " UNITS | Seed {} | {:.1}s | {} | Speed: {}x | {} attacks in flight ",
        app.world.seed(),
        app.world.game_time(),
        status,
        app.speed,
        app.world.attacks().len()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let width = usize::from(area.width.saturating_sub(2));
    let height = usize::from(area.height.saturating_sub(2));
    let mut grid: Vec<Vec<(char, Color)>> = vec![vec![(' ', Color::Reset); width]; height];

    let size = app.world.config().world.size;
    let to_cell = |x: f64, y: f64| -> Option<(usize, usize)> {
        if width == 0 || height == 0 || !(0.0..size).contains(&x) || !(0.0..size).contains(&y) {
            return None;
        }
        let cx = (x / size * width as f64) as usize;
        let cy = (y / size * height as f64) as usize;
        Some((cx.min(width - 1), cy.min(height - 1)))
    };

    for attack in app.world.attacks() {
        if let Some((cx, cy)) = app
            .world
            .attack_position(attack)
            .and_then(|(x, y)| to_cell(x, y))
        {
            grid[cy][cx] = ('·', player_color(Some(attack.owner)));
        }
    }

    for planet in app.world.planets() {
        if let Some((cx, cy)) = to_cell(planet.x, planet.y) {
            let ch = if app
                .world
                .players()
                .iter()
                .any(|p| p.home == planet.id && p.alive)
            {
                '@'
            } else if planet.is_moon() {
                'o'
            } else {
                size_glyph(planet.size)
            };
            grid[cy][cx] = (ch, player_color(planet.owner));
        }
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|(ch, color)| Span::styled(ch.to_string(), Style::default().fg(color)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let map_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Map "));
    f.render_widget(map_widget, area);
}

const fn size_glyph(size: PlanetSize) -> char {
    match size {
        PlanetSize::Asteroid => '.',
        PlanetSize::Small => '*',
        PlanetSize::Medium => 'O',
        PlanetSize::Large => 'Q',
        PlanetSize::Giant => 'G',
    }
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];

    for player in app.world.players() {
        let status = if player.alive { "" } else { " [ELIMINATED]" };

        lines.push(Line::from(vec![
            Span::styled(
                player.name.clone(),
                Style::default()
                    .fg(player_color(Some(player.id)))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(status),
        ]));

        if player.alive {
            let connected = app
                .world
                .planets()
                .iter()
                .filter(|p| p.is_owned_by(player.id) && p.connected)
                .count();
            lines.push(Line::from(format!(
                "  Planets: {} ({connected} supplied)",
                player.planet_count
            )));
            lines.push(Line::from(format!("  Units: {:.0}", player.total_units)));
            lines.push(Line::from(format!(
                "  Score: {:.0}",
                app.world.score(player.id)
            )));
        }
        lines.push(Line::from(""));
    }

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Players "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app.log.iter().map(|l| Line::from(l.as_str())).collect();
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Events "))
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}

fn player_color(owner: Option<PlayerId>) -> Color {
    match owner {
        Some(0) => Color::Cyan,
        Some(1) => Color::Red,
        Some(2) => Color::Magenta,
        Some(3) => Color::Green,
        Some(_) => Color::White,
        None => Color::DarkGray,
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.world.is_game_over() {
        " [q] Quit  [r] Restart "
    } else {
        " [q] Quit  [Space] Pause  [+/-] Speed  [r] Restart "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
