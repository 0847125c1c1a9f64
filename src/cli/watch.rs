//! Watch command implementation - Interactive TUI viewer.

// CLI watch uses intentional casts for display and timing
#![allow(
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use super::output::describe_effect;
use super::{CliError, read_program, seed_or_now};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gridbots::replay::{Recording, ReplayEngine};
use gridbots::{Agent, AgentKind, ArenaConfig};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if a program is not accepted or the TUI fails.
pub(crate) fn execute(
    program_path: PathBuf,
    config: ArenaConfig,
    seed: Option<u64>,
    enemy_script: Option<PathBuf>,
    speed: u64,
) -> Result<(), CliError> {
    let source = read_program(&program_path)?;
    let seed = seed_or_now(seed);

    let mut recording = Recording::new(seed, source, config);
    if let Some(path) = enemy_script {
        recording = recording.with_enemy_script(read_program(&path)?);
    }
    let engine = ReplayEngine::new(recording)?;

    run_tui(engine, speed)
}

/// App state for the TUI.
struct App {
    engine: ReplayEngine,
    paused: bool,
    speed_ms: u64,
    last_step: Instant,
}

impl App {
    fn new(engine: ReplayEngine, speed_ms: u64) -> Self {
        Self {
            engine,
            paused: true, // Start paused
            speed_ms,
            last_step: Instant::now(),
        }
    }

    fn step_forward(&mut self) {
        if !self.engine.is_round_over() {
            let _ = self.engine.step_forward();
            self.last_step = Instant::now();
        }
    }

    fn step_backward(&mut self) {
        let _ = self.engine.step_backward();
        self.last_step = Instant::now();
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn increase_speed(&mut self) {
        self.speed_ms = self.speed_ms.saturating_sub(100).max(50);
    }

    fn decrease_speed(&mut self) {
        self.speed_ms = (self.speed_ms + 100).min(2000);
    }

    fn should_auto_step(&self) -> bool {
        !self.paused
            && !self.engine.is_round_over()
            && self.last_step.elapsed() >= Duration::from_millis(self.speed_ms)
    }
}

/// Drive the viewer until the user quits.
pub(crate) fn run_tui(engine: ReplayEngine, speed: u64) -> Result<(), CliError> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(engine, speed);

    loop {
        terminal
            .draw(|f| ui(f, &app))
            .map_err(|e| CliError::new(e.to_string()))?;

        if app.should_auto_step() {
            app.step_forward();
        }

        if event::poll(Duration::from_millis(50)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Right | KeyCode::Char('l') => {
                    app.paused = true;
                    app.step_forward();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    app.paused = true;
                    app.step_backward();
                }
                KeyCode::Char('+' | '=') => app.increase_speed(),
                KeyCode::Char('-') => app.decrease_speed(),
                KeyCode::Char('r') => {
                    let _ = app.engine.goto_turn(0);
                    app.paused = true;
                }
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Arena and sidebar
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_arena(f, main_chunks[0], app);
    render_sidebar(f, main_chunks[1], app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let recording = app.engine.recording();
    let status = if app.engine.is_round_over() {
        "ROUND OVER"
    } else if app.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " Gridbots | Seed {} | Turn {}/{} | {} | Speed: {}ms ",
        recording.seed,
        app.engine.turn(),
        recording.config.turns_per_round,
        status,
        app.speed_ms
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_arena(f: &mut Frame, area: Rect, app: &App) {
    let world = app.engine.world();
    let width = usize::from(world.width());
    let height = usize::from(world.height());

    // Later agents in acting order are drawn over earlier ones
    let mut cells: Vec<Option<&Agent>> = vec![None; width * height];
    for agent in world.agents() {
        if world.contains(agent.position) {
            let index = agent.position.y as usize * width + agent.position.x as usize;
            cells[index] = Some(agent);
        }
    }

    let visible_width = usize::from(area.width.saturating_sub(2) / 2).min(width);
    let visible_height = usize::from(area.height.saturating_sub(2)).min(height);

    let lines: Vec<Line> = cells
        .chunks(width)
        .take(visible_height)
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .take(visible_width)
                .map(|cell| match cell {
                    Some(agent) => Span::styled(format!("{} ", glyph(agent)), agent_style(agent)),
                    None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let arena = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Arena {}x{} ", world.width(), world.height())),
    );

    f.render_widget(arena, area);
}

const fn glyph(agent: &Agent) -> char {
    match (agent.dead, agent.kind) {
        (true, _) => 'X',
        (false, AgentKind::Player) => '@',
        (false, AgentKind::Enemy) => '!',
    }
}

fn agent_style(agent: &Agent) -> Style {
    let color = match (agent.dead, agent.kind) {
        (true, _) => Color::Gray,
        (false, AgentKind::Player) => Color::Magenta,
        (false, AgentKind::Enemy) => Color::Red,
    };
    let mut style = Style::default().fg(color);
    if agent.active {
        style = style.add_modifier(Modifier::BOLD);
    }
    if agent.just_shot {
        style = style.bg(Color::Yellow);
    }
    style
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let world = app.engine.world();
    let mut lines = vec![Line::from("")];

    if let Some(player) = world.get(app.engine.player()) {
        let state = if player.dead { " [DEAD]" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(
                format!("Player {} ", player.id),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::raw(state),
        ]));
        lines.push(Line::from(format!("  At: {}", player.position)));
        lines.push(Line::from(format!("  Score: {}", player.score)));
        for (name, value) in &player.variables {
            lines.push(Line::from(format!("  ${name} = {value}")));
        }
    } else {
        lines.push(Line::from(Span::styled(
            format!("Player {} [EATEN]", app.engine.player()),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));

    let enemies = world.agents().iter().filter(|a| a.kind == AgentKind::Enemy);
    let (alive, dead) = enemies.fold((0, 0), |(alive, dead), a| {
        if a.dead { (alive, dead + 1) } else { (alive + 1, dead) }
    });
    lines.push(Line::from(format!("Enemies: {alive} alive, {dead} dead")));
    lines.push(Line::from(""));

    if let Some(outcome) = app.engine.last_outcome() {
        lines.push(Line::from(Span::styled(
            format!("Turn {}", outcome.report.turn + 1),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (agent, effect) in &outcome.report.effects {
            lines.push(Line::from(format!("  {}", describe_effect(*agent, effect))));
        }
        for (agent, error) in &outcome.report.failures {
            lines.push(Line::from(Span::styled(
                format!("  {agent}: {error}"),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let sidebar = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Agents "))
        .wrap(Wrap { trim: false });

    f.render_widget(sidebar, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.engine.is_round_over() {
        " [q] Quit  [r] Restart  [←/→] Step "
    } else {
        " [q] Quit  [Space] Pause  [←/→] Step  [+/-] Speed  [r] Restart "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
