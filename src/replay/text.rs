//! Structured plain-text output.
//!
//! Machine-readable while remaining human-parseable; no colour codes.

#![allow(clippy::format_push_string)]

use crate::arena::{Agent, AgentKind, World};

/// Render the world to structured text.
///
/// Output format:
/// ```text
/// === TURN 3 OF 25 ===
///
/// ARENA (40x20): 1 player, 6 enemies (2 dead)
///
/// PLAYER #5 (active):
/// - Position: (12, 8)
/// - Status: alive
/// - Score: 2
/// - Variables: n = 3
///
/// ENEMIES:
/// - #0 at (3, 4) alive
/// - #1 at (9, 9) dead [shot]
/// ```
#[must_use]
pub fn render_text(world: &World, turn: u32, max_turns: u32) -> String {
    let mut output = String::new();
    output.push_str(&format!("=== TURN {turn} OF {max_turns} ===\n\n"));

    let (players, enemies): (Vec<&Agent>, Vec<&Agent>) = world
        .agents()
        .iter()
        .partition(|a| a.kind == AgentKind::Player);
    let dead = world.agents().iter().filter(|a| a.dead).count();

    output.push_str(&format!(
        "ARENA ({}x{}): {} player{}, {} enem{} ({dead} dead)\n",
        world.width(),
        world.height(),
        players.len(),
        if players.len() == 1 { "" } else { "s" },
        enemies.len(),
        if enemies.len() == 1 { "y" } else { "ies" },
    ));

    for player in players {
        render_player(&mut output, player);
    }

    if !enemies.is_empty() {
        output.push_str("\nENEMIES:\n");
        for enemy in enemies {
            output.push_str(&format!("- {} at {} {}", enemy.id, enemy.position, status(enemy)));
            if enemy.score != 0 {
                output.push_str(&format!(" score {}", enemy.score));
            }
            output.push('\n');
        }
    }

    output
}

fn status(agent: &Agent) -> &'static str {
    match (agent.dead, agent.just_shot) {
        (false, _) => "alive",
        (true, false) => "dead",
        (true, true) => "dead [shot]",
    }
}

fn render_player(output: &mut String, player: &Agent) {
    let state = if player.active { "active" } else { "retired" };
    output.push_str(&format!("\nPLAYER {} ({state}):\n", player.id));
    output.push_str(&format!("- Position: {}\n", player.position));
    output.push_str(&format!("- Status: {}\n", status(player)));
    output.push_str(&format!("- Score: {}\n", player.score));
    if !player.variables.is_empty() {
        let vars: Vec<String> = player
            .variables
            .iter()
            .map(|(name, value)| format!("{name} = {value}"))
            .collect();
        output.push_str(&format!("- Variables: {}\n", vars.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::arena::{Position, Value};
    use crate::lang::{Command, Expr, Program};

    #[test]
    fn test_render_text() {
        let mut world = World::new(6, 4).unwrap();
        let program = Arc::new(Program {
            assignments: Vec::new(),
            body: Expr::Command(Command::Eat),
        });
        let player = world.spawn(|id| Agent::player(id, Position::new(2, 1), program));
        world
            .get_mut(player)
            .unwrap()
            .variables
            .insert("n".to_string(), Value::Integer(3));
        let enemy = world.spawn(|id| Agent::enemy(id, Position::new(5, 3)));
        let enemy = world.get_mut(enemy).unwrap();
        enemy.dead = true;
        enemy.just_shot = true;

        let text = render_text(&world, 2, 25);
        assert!(text.starts_with("=== TURN 2 OF 25 ==="));
        assert!(text.contains("ARENA (6x4): 1 player, 1 enemy (1 dead)"));
        assert!(text.contains("PLAYER #0 (active):"));
        assert!(text.contains("- Position: (2, 1)"));
        assert!(text.contains("- Variables: n = 3"));
        assert!(text.contains("- #1 at (5, 3) dead [shot]"));
    }
}
