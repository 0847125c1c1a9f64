//! ASCII renderer for terminal viewing with ANSI colors.

#![allow(clippy::format_push_string)]

use crate::arena::{Agent, AgentKind, World};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const PURPLE: &str = "\x1b[38;2;187;136;255m";
const SHOT: &str = "\x1b[43m";

/// Glyph for an agent, independent of colour.
#[must_use]
pub(crate) const fn glyph(agent: &Agent) -> char {
    if agent.dead {
        'X'
    } else {
        match agent.kind {
            AgentKind::Player => '@',
            AgentKind::Enemy => '!',
        }
    }
}

/// Render the world to ASCII with ANSI colors.
///
/// Output format:
/// ```text
/// Turn 3/25                               [#5: 2] [#9: 0]
/// ┌─────────────────────┐
/// │ . . . ! . . . . . . │
/// │ . @ . . . . X . . . │
/// └─────────────────────┘
///
/// Legend: @=Player  !=Enemy  X=Dead  yellow=Shot this turn
/// ```
#[must_use]
pub fn render_ascii(world: &World, turn: u32, max_turns: u32) -> String {
    let mut output = String::new();
    render_header(&mut output, world, turn, max_turns);
    render_grid(&mut output, world);
    output.push_str("\nLegend: @=Player  !=Enemy  X=Dead  yellow=Shot this turn\n");
    output
}

fn render_header(output: &mut String, world: &World, turn: u32, max_turns: u32) {
    let title = format!("Turn {turn}/{max_turns}");
    output.push_str(&title);
    let padding = 40usize.saturating_sub(title.len());
    output.push_str(&" ".repeat(padding));

    for player in world.agents().iter().filter(|a| a.kind == AgentKind::Player) {
        let style = if player.active { BOLD } else { DIM };
        output.push_str(&format!("{style}{PURPLE}[{}: {}]{RESET} ", player.id, player.score));
    }
    output.push('\n');
}

fn render_grid(output: &mut String, world: &World) {
    let width = usize::from(world.width());
    let height = usize::from(world.height());

    // Later agents in acting order are drawn over earlier ones.
    let mut cells: Vec<Option<&Agent>> = vec![None; width * height];
    for agent in world.agents() {
        if world.contains(agent.position) {
            let x = usize::try_from(agent.position.x).unwrap_or(0);
            let y = usize::try_from(agent.position.y).unwrap_or(0);
            cells[y * width + x] = Some(agent);
        }
    }

    let border = "─".repeat(width * 2 + 1);
    output.push_str(&format!("┌{border}┐\n"));
    for row in cells.chunks(width) {
        output.push_str("│ ");
        for cell in row {
            match cell {
                Some(agent) => render_agent(output, agent),
                None => output.push_str(&format!("{GRAY}.{RESET}")),
            }
            output.push(' ');
        }
        output.push_str("│\n");
    }
    output.push_str(&format!("└{border}┘\n"));
}

fn render_agent(output: &mut String, agent: &Agent) {
    let color = match (agent.kind, agent.dead) {
        (_, true) => GRAY,
        (AgentKind::Player, false) => PURPLE,
        (AgentKind::Enemy, false) => RED,
    };
    let weight = if agent.active { BOLD } else { "" };
    let background = if agent.just_shot { SHOT } else { "" };
    output.push_str(&format!("{background}{weight}{color}{}{RESET}", glyph(agent)));
}
