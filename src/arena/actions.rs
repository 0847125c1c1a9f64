//! Action execution.
//!
//! The only code that mutates agents. Every rule edge case (bounds, occupancy,
//! missing targets) resolves to a no-op or a state change, never an error.

use serde::Serialize;
use tracing::trace;

use crate::arena::{Action, AgentId, Decision, Position, World};

/// Points for a kill by shooting.
pub const SHOOT_REWARD: i64 = 1;

/// Points per corpse eaten.
pub const EAT_REWARD: i64 = 5;

/// Cost of duplicating.
pub const DUPLICATE_COST: i64 = 1;

/// What applying an action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Nothing happened: the actor is dead or unknown.
    Idle,
    /// The actor moved.
    Moved {
        /// New position.
        to: Position,
    },
    /// A live agent holds the destination.
    Blocked,
    /// The destination is off the grid; the actor died in place.
    FellOff,
    /// The shot killed an agent.
    Hit {
        /// Who was hit.
        target: AgentId,
    },
    /// Nothing on the firing line.
    Missed,
    /// Aimed at the own tile.
    HeldFire,
    /// Dead tile-mates were eaten.
    Ate {
        /// Corpses removed.
        corpses: u32,
    },
    /// The actor tried to eat a live agent and died.
    Choked {
        /// The live tile-mate.
        on: AgentId,
        /// Corpses removed before choking.
        corpses: u32,
    },
    /// A copy was placed.
    Duplicated {
        /// The new agent.
        child: AgentId,
    },
    /// The copy's tile is off the grid or taken.
    NoRoom,
}

/// Apply `decision` for `actor`.
///
/// The decision's bindings are merged into the actor's store first, even if
/// the actor is dead. A dead actor does nothing else.
pub fn apply(world: &mut World, actor: AgentId, decision: Decision) -> Effect {
    let Some(agent) = world.get_mut(actor) else {
        return Effect::Idle;
    };
    agent.variables.extend(decision.bindings);
    if agent.dead {
        return Effect::Idle;
    }

    let effect = match decision.action {
        Action::Move { to } => move_to(world, actor, to),
        Action::Shoot { at } => shoot(world, actor, at),
        Action::Eat => eat(world, actor),
        Action::Duplicate { to } => duplicate(world, actor, to),
    };
    trace!(%actor, action = %decision.action, ?effect, "applied action");
    effect
}

fn move_to(world: &mut World, actor: AgentId, to: Position) -> Effect {
    if world.has_live_agent_at(to) {
        return Effect::Blocked;
    }
    let inside = world.contains(to);
    let Some(agent) = world.get_mut(actor) else {
        return Effect::Idle;
    };
    if inside {
        agent.position = to;
        Effect::Moved { to }
    } else {
        agent.dead = true;
        Effect::FellOff
    }
}

/// Firing axis: which coordinate varies and in which direction.
#[derive(Clone, Copy)]
enum Ray {
    West,
    East,
    North,
    South,
}

impl Ray {
    fn toward(from: Position, at: Position) -> Option<Self> {
        if at.x < from.x {
            Some(Ray::West)
        } else if at.x > from.x {
            Some(Ray::East)
        } else if at.y < from.y {
            Some(Ray::North)
        } else if at.y > from.y {
            Some(Ray::South)
        } else {
            None
        }
    }

    /// Distance from `from` to `target` along the ray, if `target` is on it.
    fn distance(self, from: Position, target: Position) -> Option<i64> {
        let (along, across) = match self {
            Ray::West => (from.x.checked_sub(target.x)?, target.y == from.y),
            Ray::East => (target.x.checked_sub(from.x)?, target.y == from.y),
            Ray::North => (from.y.checked_sub(target.y)?, target.x == from.x),
            Ray::South => (target.y.checked_sub(from.y)?, target.x == from.x),
        };
        (across && along > 0).then_some(along)
    }
}

fn shoot(world: &mut World, actor: AgentId, at: Position) -> Effect {
    let Some(origin) = world.get(actor).map(|a| a.position) else {
        return Effect::Idle;
    };
    let Some(ray) = Ray::toward(origin, at) else {
        return Effect::HeldFire;
    };

    let target = world
        .agents()
        .iter()
        .filter_map(|a| ray.distance(origin, a.position).map(|d| (d, a.id)))
        .min_by_key(|&(d, _)| d)
        .map(|(_, id)| id);
    let Some(target) = target else {
        return Effect::Missed;
    };

    if let Some(victim) = world.get_mut(target) {
        victim.dead = true;
        victim.just_shot = true;
    }
    if let Some(shooter) = world.get_mut(actor) {
        shooter.score += SHOOT_REWARD;
    }
    Effect::Hit { target }
}

fn eat(world: &mut World, actor: AgentId) -> Effect {
    let Some(tile) = world.get(actor).map(|a| a.position) else {
        return Effect::Idle;
    };
    let mates: Vec<(AgentId, bool)> = world
        .agents()
        .iter()
        .filter(|a| a.position == tile)
        .map(|a| (a.id, a.dead))
        .collect();

    let mut corpses = 0;
    for (id, dead) in mates {
        if dead {
            world.remove(id);
            corpses += 1;
            if let Some(eater) = world.get_mut(actor) {
                eater.score += EAT_REWARD;
            }
        } else if id != actor {
            if let Some(eater) = world.get_mut(actor) {
                eater.dead = true;
            }
            return Effect::Choked { on: id, corpses };
        }
    }
    Effect::Ate { corpses }
}

fn duplicate(world: &mut World, actor: AgentId, to: Position) -> Effect {
    if !world.contains(to) || world.has_agent_at(to) {
        return Effect::NoRoom;
    }
    let Some(child) = world.duplicate(actor, to) else {
        return Effect::Idle;
    };
    if let Some(parent) = world.get_mut(actor) {
        parent.score -= DUPLICATE_COST;
    }
    Effect::Duplicated { child }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Agent, Bindings, Value};

    fn world_3x3() -> World {
        World::new(3, 3).unwrap()
    }

    fn enemy_at(world: &mut World, x: i64, y: i64) -> AgentId {
        world.spawn(|id| Agent::enemy(id, Position::new(x, y)))
    }

    fn act(world: &mut World, actor: AgentId, action: Action) -> Effect {
        apply(world, actor, Decision::bare(action))
    }

    #[test]
    fn test_move_updates_position() {
        let mut world = world_3x3();
        let a = enemy_at(&mut world, 1, 1);
        let effect = act(&mut world, a, Action::Move { to: Position::new(2, 1) });
        assert_eq!(effect, Effect::Moved { to: Position::new(2, 1) });
        assert_eq!(world.get(a).unwrap().position, Position::new(2, 1));
    }

    #[test]
    fn test_move_off_grid_kills_in_place() {
        for to in [Position::new(-1, 0), Position::new(0, 3), Position::new(5, -5)] {
            let mut world = world_3x3();
            let a = enemy_at(&mut world, 0, 0);
            assert_eq!(act(&mut world, a, Action::Move { to }), Effect::FellOff);
            let agent = world.get(a).unwrap();
            assert!(agent.dead);
            assert_eq!(agent.position, Position::new(0, 0));
        }
    }

    #[test]
    fn test_move_onto_live_agent_is_blocked() {
        let mut world = world_3x3();
        let a = enemy_at(&mut world, 0, 0);
        enemy_at(&mut world, 1, 0);
        assert_eq!(
            act(&mut world, a, Action::Move { to: Position::new(1, 0) }),
            Effect::Blocked
        );
        assert_eq!(world.get(a).unwrap().position, Position::new(0, 0));
    }

    #[test]
    fn test_move_onto_corpse_is_allowed() {
        let mut world = world_3x3();
        let a = enemy_at(&mut world, 0, 0);
        let b = enemy_at(&mut world, 1, 0);
        world.get_mut(b).unwrap().dead = true;
        act(&mut world, a, Action::Move { to: Position::new(1, 0) });
        assert_eq!(world.get(a).unwrap().position, Position::new(1, 0));
    }

    #[test]
    fn test_shoot_hits_right() {
        let mut world = world_3x3();
        let shooter = enemy_at(&mut world, 1, 1);
        let target = enemy_at(&mut world, 2, 1);
        let effect = act(&mut world, shooter, Action::Shoot { at: Position::new(2, 1) });

        assert_eq!(effect, Effect::Hit { target });
        assert_eq!(world.get(shooter).unwrap().score, 1);
        let target = world.get(target).unwrap();
        assert!(target.dead);
        assert!(target.just_shot);
    }

    #[test]
    fn test_shoot_hits_nearest() {
        let mut world = World::new(10, 1).unwrap();
        let shooter = enemy_at(&mut world, 0, 0);
        let far = enemy_at(&mut world, 7, 0);
        let near = enemy_at(&mut world, 3, 0);
        let effect = act(&mut world, shooter, Action::Shoot { at: Position::new(9, 0) });
        assert_eq!(effect, Effect::Hit { target: near });
        assert!(!world.get(far).unwrap().dead);
    }

    #[test]
    fn test_shoot_only_uses_direction_of_aim() {
        let mut world = World::new(10, 10).unwrap();
        let shooter = enemy_at(&mut world, 5, 5);
        let target = enemy_at(&mut world, 5, 1);
        // x equal, y smaller: fires north along the column regardless of distance
        let effect = act(&mut world, shooter, Action::Shoot { at: Position::new(5, 4) });
        assert_eq!(effect, Effect::Hit { target });
    }

    #[test]
    fn test_shoot_x_axis_takes_priority() {
        let mut world = World::new(10, 10).unwrap();
        let shooter = enemy_at(&mut world, 5, 5);
        enemy_at(&mut world, 5, 0);
        let effect = act(&mut world, shooter, Action::Shoot { at: Position::new(4, 0) });
        assert_eq!(effect, Effect::Missed);
        assert_eq!(world.get(shooter).unwrap().score, 0);
    }

    #[test]
    fn test_shoot_self_is_noop() {
        let mut world = world_3x3();
        let shooter = enemy_at(&mut world, 1, 1);
        assert_eq!(
            act(&mut world, shooter, Action::Shoot { at: Position::new(1, 1) }),
            Effect::HeldFire
        );
    }

    #[test]
    fn test_shoot_can_hit_corpse() {
        let mut world = world_3x3();
        let shooter = enemy_at(&mut world, 0, 0);
        let corpse = enemy_at(&mut world, 0, 2);
        world.get_mut(corpse).unwrap().dead = true;
        let effect = act(&mut world, shooter, Action::Shoot { at: Position::new(0, 1) });
        assert_eq!(effect, Effect::Hit { target: corpse });
        assert_eq!(world.get(shooter).unwrap().score, 1);
    }

    #[test]
    fn test_eat_removes_corpses() {
        let mut world = world_3x3();
        let eater = enemy_at(&mut world, 1, 1);
        for _ in 0..2 {
            let corpse = enemy_at(&mut world, 1, 1);
            world.get_mut(corpse).unwrap().dead = true;
        }
        assert_eq!(act(&mut world, eater, Action::Eat), Effect::Ate { corpses: 2 });
        assert_eq!(world.len(), 1);
        assert_eq!(world.get(eater).unwrap().score, 10);
    }

    #[test]
    fn test_eat_chokes_on_live_agent() {
        let mut world = world_3x3();
        let corpse = enemy_at(&mut world, 1, 1);
        world.get_mut(corpse).unwrap().dead = true;
        let eater = enemy_at(&mut world, 1, 1);
        let live = enemy_at(&mut world, 1, 1);
        let late_corpse = enemy_at(&mut world, 1, 1);
        world.get_mut(late_corpse).unwrap().dead = true;

        let effect = act(&mut world, eater, Action::Eat);
        assert_eq!(effect, Effect::Choked { on: live, corpses: 1 });
        assert!(world.get(eater).unwrap().dead);
        assert_eq!(world.get(eater).unwrap().score, 5);
        assert!(world.get(late_corpse).is_some());
    }

    #[test]
    fn test_duplicate_places_inactive_copy() {
        let mut world = world_3x3();
        let parent = enemy_at(&mut world, 0, 0);
        let effect = act(&mut world, parent, Action::Duplicate { to: Position::new(1, 0) });
        let Effect::Duplicated { child } = effect else {
            panic!("expected duplicate, got {effect:?}");
        };
        assert_ne!(child, parent);
        assert_eq!(world.get(parent).unwrap().score, -1);
        let child = world.get(child).unwrap();
        assert!(child.just_duplicated);
        assert!(!child.active);
        assert_eq!(child.kind, world.get(parent).unwrap().kind);
    }

    #[test]
    fn test_duplicate_needs_free_tile() {
        let mut world = world_3x3();
        let parent = enemy_at(&mut world, 0, 0);
        let corpse = enemy_at(&mut world, 1, 0);
        world.get_mut(corpse).unwrap().dead = true;
        assert_eq!(
            act(&mut world, parent, Action::Duplicate { to: Position::new(1, 0) }),
            Effect::NoRoom
        );
        assert_eq!(
            act(&mut world, parent, Action::Duplicate { to: Position::new(3, 0) }),
            Effect::NoRoom
        );
        assert_eq!(world.len(), 2);
        assert_eq!(world.get(parent).unwrap().score, 0);
    }

    #[test]
    fn test_dead_actor_still_merges_bindings() {
        let mut world = world_3x3();
        let a = enemy_at(&mut world, 0, 0);
        world.get_mut(a).unwrap().dead = true;
        let mut bindings = Bindings::new();
        bindings.insert("n".to_string(), Value::Integer(3));
        let effect = apply(
            &mut world,
            a,
            Decision {
                action: Action::Move { to: Position::new(1, 0) },
                bindings,
            },
        );
        assert_eq!(effect, Effect::Idle);
        let agent = world.get(a).unwrap();
        assert_eq!(agent.variables.get("n"), Some(&Value::Integer(3)));
        assert_eq!(agent.position, Position::new(0, 0));
    }
}
