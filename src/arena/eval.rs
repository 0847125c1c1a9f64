//! Tree-walking evaluator.
//!
//! Every turn the whole tree is evaluated bottom-up: children before parents,
//! both branches of a conditional and every branch of a sequence. An error
//! anywhere in the tree fails the turn, even in a branch that would not have
//! been selected.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::arena::{Action, Agent, AgentId, Bindings, Decision, Position, Predicate, Value, World};
use crate::error::{ArithmeticError, EvalError, EvalResult};
use crate::lang::{BoolExpr, Command, Direction, Expr, NumExpr, PredicateExpr, Program};

/// Evaluate `program` for agent `id` on `turn`.
///
/// The world is only read; randomness (`random`, `find`) is drawn from `rng`.
///
/// # Errors
///
/// Returns an error if any sub-expression references an unbound variable,
/// receives a value of the wrong kind, or overflows; if the body does not
/// produce an action; or if `id` is not in the world.
pub fn evaluate<R: Rng>(
    program: &Program,
    turn: u32,
    id: AgentId,
    world: &World,
    rng: &mut R,
) -> EvalResult<Decision> {
    let me = world.get(id).ok_or(EvalError::UnknownAgent(id))?;
    let mut evaluator = Evaluator {
        world,
        me,
        turn,
        rng,
        bindings: Bindings::new(),
    };

    for assignment in &program.assignments {
        let value = evaluator.expr(&assignment.value)?;
        evaluator.bindings.insert(assignment.name.clone(), value);
    }

    let action = match evaluator.expr(&program.body)? {
        Value::Action(action) => action,
        other => return Err(mismatch("program", "action", &other)),
    };

    Ok(Decision {
        action,
        bindings: evaluator.bindings,
    })
}

struct Evaluator<'w, R> {
    world: &'w World,
    me: &'w Agent,
    turn: u32,
    rng: &'w mut R,
    bindings: Bindings,
}

fn mismatch(context: &'static str, expected: &'static str, found: &Value) -> EvalError {
    EvalError::TypeMismatch {
        context,
        expected,
        found: found.kind_name(),
    }
}

fn overflow() -> EvalError {
    EvalError::Arithmetic(ArithmeticError::Overflow)
}

/// Modulo whose result takes the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    if b == 0 {
        return Err(ArithmeticError::ModuloByZero);
    }
    let r = a.checked_rem(b).ok_or(ArithmeticError::Overflow)?;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

impl<R: Rng> Evaluator<'_, R> {
    fn expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Command(command) => self.command(command).map(Value::Action),
            Expr::Direction(direction) => self.direction(direction).map(Value::Position),
            Expr::Bool(boolean) => self.boolean(boolean).map(Value::Boolean),
            Expr::Number(number) => self.number(number).map(Value::Integer),
            Expr::Predicate(predicate) => self.predicate(predicate).map(Value::Predicate),
            Expr::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.expr(cond)?;
                let then = self.expr(then)?;
                let otherwise = self.expr(otherwise)?;
                match cond {
                    Value::Boolean(true) => Ok(then),
                    Value::Boolean(false) => Ok(otherwise),
                    other => Err(mismatch("if", "boolean", &other)),
                }
            }
            Expr::Sequence(branches) => {
                let mut values = branches
                    .iter()
                    .map(|branch| self.expr(branch))
                    .collect::<EvalResult<Vec<_>>>()?;
                let index = self.turn as usize % values.len();
                Ok(values.swap_remove(index))
            }
            Expr::Var(name) => self.lookup(name),
        }
    }

    /// Current bindings first, then the acting agent's store.
    fn lookup(&self, name: &str) -> EvalResult<Value> {
        self.bindings
            .get(name)
            .or_else(|| self.me.variables.get(name))
            .cloned()
            .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))
    }

    fn command(&mut self, command: &Command) -> EvalResult<Action> {
        Ok(match command {
            Command::Move(target) => Action::Move {
                to: self.position(target, "move")?,
            },
            Command::Shoot(target) => Action::Shoot {
                at: self.position(target, "shoot")?,
            },
            Command::Eat => Action::Eat,
            Command::Dup(target) => Action::Duplicate {
                to: self.position(target, "dup")?,
            },
        })
    }

    fn direction(&mut self, direction: &Direction) -> EvalResult<Position> {
        let here = self.me.position;
        match direction {
            Direction::Up => Ok(here.offset(0, -1)),
            Direction::Right => Ok(here.offset(1, 0)),
            Direction::Down => Ok(here.offset(0, 1)),
            Direction::Left => Ok(here.offset(-1, 0)),
            Direction::Here => Ok(here),
            Direction::Random => Ok(Position::new(
                self.rng.gen_range(0..i64::from(self.world.width())),
                self.rng.gen_range(0..i64::from(self.world.height())),
            )),
            Direction::Pair(x, y) => {
                let x = self.integer(x, "position pair")?;
                let y = self.integer(y, "position pair")?;
                Ok(Position::new(x, y))
            }
            Direction::Plus(a, b) => {
                let a = self.direction(a)?;
                let b = self.direction(b)?;
                a.checked_add(b).ok_or_else(overflow)
            }
            Direction::Minus(a, b) => {
                let a = self.direction(a)?;
                let b = self.direction(b)?;
                a.checked_sub(b).ok_or_else(overflow)
            }
            Direction::Find(predicate) => {
                let predicate = self.predicate(predicate)?;
                let matches: Vec<Position> = self
                    .world
                    .agents()
                    .iter()
                    .filter(|agent| predicate.matches(agent))
                    .map(|agent| agent.position)
                    .collect();
                Ok(matches.choose(&mut *self.rng).copied().unwrap_or(here))
            }
        }
    }

    fn boolean(&mut self, boolean: &BoolExpr) -> EvalResult<bool> {
        match boolean {
            BoolExpr::Gt(a, b) => {
                let a = self.integer(a, ">")?;
                let b = self.integer(b, ">")?;
                Ok(a > b)
            }
            BoolExpr::Lt(a, b) => {
                let a = self.integer(a, "<")?;
                let b = self.integer(b, "<")?;
                Ok(a < b)
            }
            BoolExpr::Eq(a, b) => {
                let a = self.expr(a)?;
                let b = self.expr(b)?;
                match (&a, &b) {
                    (Value::Integer(x), Value::Integer(y)) => Ok(x == y),
                    (Value::Position(p), Value::Position(q)) => Ok(p == q),
                    (Value::Boolean(x), Value::Boolean(y)) => Ok(x == y),
                    (Value::Integer(_) | Value::Position(_) | Value::Boolean(_), _) => {
                        Err(mismatch("=", a.kind_name(), &b))
                    }
                    _ => Err(mismatch("=", "integer, position or boolean", &a)),
                }
            }
            BoolExpr::And(a, b) => {
                let a = self.truth(a, "and")?;
                let b = self.truth(b, "and")?;
                Ok(a && b)
            }
            BoolExpr::Or(a, b) => {
                let a = self.truth(a, "or")?;
                let b = self.truth(b, "or")?;
                Ok(a || b)
            }
            BoolExpr::Not(a) => Ok(!self.truth(a, "not")?),
        }
    }

    fn number(&mut self, number: &NumExpr) -> EvalResult<i64> {
        match number {
            NumExpr::Tick => Ok(i64::from(self.turn)),
            NumExpr::Int(n) => Ok(*n),
            NumExpr::Add(a, b) => {
                let a = self.integer(a, "+")?;
                let b = self.integer(b, "+")?;
                a.checked_add(b).ok_or_else(overflow)
            }
            NumExpr::Sub(a, b) => {
                let a = self.integer(a, "-")?;
                let b = self.integer(b, "-")?;
                a.checked_sub(b).ok_or_else(overflow)
            }
            NumExpr::Mod(a, b) => {
                let a = self.integer(a, "%")?;
                let b = self.integer(b, "%")?;
                Ok(floor_mod(a, b)?)
            }
            NumExpr::Abs(a) => self.integer(a, "abs")?.checked_abs().ok_or_else(overflow),
            NumExpr::X(a) => Ok(self.position(a, "x")?.x),
            NumExpr::Y(a) => Ok(self.position(a, "y")?.y),
        }
    }

    fn predicate(&mut self, predicate: &PredicateExpr) -> EvalResult<Predicate> {
        Ok(match predicate {
            PredicateExpr::Alive => Predicate::Alive,
            PredicateExpr::Dead => Predicate::Dead,
            PredicateExpr::Player => Predicate::Player,
            PredicateExpr::Enemy => Predicate::Enemy,
            PredicateExpr::And(a, b) => {
                Predicate::And(Box::new(self.predicate(a)?), Box::new(self.predicate(b)?))
            }
            PredicateExpr::Or(a, b) => {
                Predicate::Or(Box::new(self.predicate(a)?), Box::new(self.predicate(b)?))
            }
            PredicateExpr::Not(a) => Predicate::Not(Box::new(self.predicate(a)?)),
            PredicateExpr::Var(name) => match self.lookup(name)? {
                Value::Predicate(predicate) => predicate,
                other => return Err(mismatch("find", "predicate", &other)),
            },
        })
    }

    fn integer(&mut self, expr: &Expr, context: &'static str) -> EvalResult<i64> {
        match self.expr(expr)? {
            Value::Integer(n) => Ok(n),
            other => Err(mismatch(context, "integer", &other)),
        }
    }

    fn position(&mut self, expr: &Expr, context: &'static str) -> EvalResult<Position> {
        match self.expr(expr)? {
            Value::Position(p) => Ok(p),
            other => Err(mismatch(context, "position", &other)),
        }
    }

    fn truth(&mut self, expr: &Expr, context: &'static str) -> EvalResult<bool> {
        match self.expr(expr)? {
            Value::Boolean(b) => Ok(b),
            other => Err(mismatch(context, "boolean", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::arena::{AgentKind, Brain};
    use crate::lang::parse;

    fn world_with_player(at: Position) -> (World, AgentId) {
        let mut world = World::new(10, 10).unwrap();
        let id = world.spawn(|id| Agent::enemy(id, at));
        (world, id)
    }

    /// Evaluate every candidate of `source` and return the results in order.
    fn eval_all(source: &str, turn: u32, world: &World, id: AgentId) -> Vec<EvalResult<Decision>> {
        let parsed = parse(source).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        parsed
            .candidates()
            .iter()
            .map(|program| evaluate(program, turn, id, world, &mut rng))
            .collect()
    }

    fn first_ok(source: &str, turn: u32, world: &World, id: AgentId) -> Decision {
        eval_all(source, turn, world, id)
            .into_iter()
            .find_map(Result::ok)
            .unwrap()
    }

    #[test]
    fn test_compass_directions_are_relative() {
        let (world, id) = world_with_player(Position::new(4, 4));
        for (source, expected) in [
            ("move up", Position::new(4, 3)),
            ("move right", Position::new(5, 4)),
            ("move down", Position::new(4, 5)),
            ("move left", Position::new(3, 4)),
            ("move here", Position::new(4, 4)),
        ] {
            let decision = first_ok(source, 0, &world, id);
            assert_eq!(decision.action, Action::Move { to: expected }, "{source}");
        }
    }

    #[test]
    fn test_conditional_on_tick() {
        let (world, id) = world_with_player(Position::new(1, 1));
        let source = "if tick = 0 then move (0,0) else move (1,1)";
        assert_eq!(
            first_ok(source, 0, &world, id).action,
            Action::Move { to: Position::new(0, 0) }
        );
        assert_eq!(
            first_ok(source, 1, &world, id).action,
            Action::Move { to: Position::new(1, 1) }
        );
    }

    #[test]
    fn test_untaken_branch_still_fails() {
        let (world, id) = world_with_player(Position::new(1, 1));
        let results = eval_all("if 1 = 1 then move here else move $nowhere", 0, &world, id);
        assert!(!results.is_empty());
        for result in results {
            assert!(matches!(result, Err(EvalError::UnboundVariable(ref n)) if n == "nowhere"));
        }
    }

    #[test]
    fn test_sequence_cycles_with_turn() {
        let (world, id) = world_with_player(Position::new(5, 5));
        let parsed = parse("move up -> move down -> eat").unwrap();
        let flat = parsed
            .candidates()
            .iter()
            .find(|p| matches!(&p.body, Expr::Sequence(branches) if branches.len() == 3))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let actions: Vec<Action> = (0..6)
            .map(|turn| evaluate(flat, turn, id, &world, &mut rng).unwrap().action)
            .collect();
        assert_eq!(actions[..3], actions[3..]);
        assert_eq!(actions[2], Action::Eat);
    }

    #[test]
    fn test_assignments_bind_in_order() {
        let (world, id) = world_with_player(Position::new(0, 0));
        let decision = first_ok("a = 2; b = $a + 3; move ($b, $a)", 0, &world, id);
        assert_eq!(decision.action, Action::Move { to: Position::new(5, 2) });
        assert_eq!(decision.bindings.get("b"), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_variable_falls_back_to_agent_store() {
        let (mut world, id) = world_with_player(Position::new(0, 0));
        world
            .get_mut(id)
            .unwrap()
            .variables
            .insert("home".to_string(), Value::Position(Position::new(7, 7)));
        let decision = first_ok("move $home", 0, &world, id);
        assert_eq!(decision.action, Action::Move { to: Position::new(7, 7) });
        assert!(decision.bindings.is_empty());
    }

    #[test]
    fn test_find_falls_back_to_here() {
        let (world, id) = world_with_player(Position::new(3, 3));
        let decision = first_ok("shoot find player", 0, &world, id);
        assert_eq!(decision.action, Action::Shoot { at: Position::new(3, 3) });
    }

    #[test]
    fn test_find_picks_matching_agent() {
        let (mut world, id) = world_with_player(Position::new(3, 3));
        world.spawn(|id| Agent::new(id, AgentKind::Player, Position::new(8, 1), Brain::Random));
        let decision = first_ok("shoot find player and alive", 0, &world, id);
        assert_eq!(decision.action, Action::Shoot { at: Position::new(8, 1) });
    }

    #[test]
    fn test_random_is_in_bounds() {
        let (world, id) = world_with_player(Position::new(0, 0));
        let program = parse("move random").unwrap().candidates()[0].clone();
        let mut rng = StdRng::seed_from_u64(9);
        for turn in 0..100 {
            let decision = evaluate(&program, turn, id, &world, &mut rng).unwrap();
            let Action::Move { to } = decision.action else {
                panic!("expected move");
            };
            assert!(world.contains(to));
        }
    }

    #[test]
    fn test_type_mismatch() {
        let (world, id) = world_with_player(Position::new(0, 0));
        let results = eval_all("move 3", 0, &world, id);
        assert!(matches!(
            results[0],
            Err(EvalError::TypeMismatch { context: "move", .. })
        ));
        let results = eval_all("up", 0, &world, id);
        assert!(matches!(
            results[0],
            Err(EvalError::TypeMismatch { context: "program", .. })
        ));
    }

    #[test]
    fn test_modulo() {
        assert_eq!(floor_mod(7, 3), Ok(1));
        assert_eq!(floor_mod(-7, 3), Ok(2));
        assert_eq!(floor_mod(7, -3), Ok(-2));
        assert_eq!(floor_mod(1, 0), Err(ArithmeticError::ModuloByZero));

        let (world, id) = world_with_player(Position::new(0, 0));
        let results = eval_all("move (1 % 0, 0)", 0, &world, id);
        assert!(results.iter().all(|r| matches!(
            r,
            Err(EvalError::Arithmetic(ArithmeticError::ModuloByZero))
        )));
    }

    #[test]
    fn test_equality_on_positions() {
        let (world, id) = world_with_player(Position::new(2, 2));
        let decision = first_ok("if here = (2, 2) then eat else move up", 0, &world, id);
        assert_eq!(decision.action, Action::Eat);
    }

    #[test]
    fn test_equality_kind_mismatch() {
        let (world, id) = world_with_player(Position::new(2, 2));
        let results = eval_all("if here = 2 then eat else eat", 0, &world, id);
        assert!(results.iter().all(|r| matches!(
            r,
            Err(EvalError::TypeMismatch { context: "=", .. })
        )));
    }

    #[test]
    fn test_unknown_agent() {
        let (world, _) = world_with_player(Position::new(0, 0));
        let results = eval_all("eat", 0, &world, AgentId(99));
        assert_eq!(results[0], Err(EvalError::UnknownAgent(AgentId(99))));
    }

    #[test]
    fn test_predicate_variable() {
        let (world, id) = world_with_player(Position::new(4, 4));
        let decision = first_ok("p = enemy; shoot find $p", 0, &world, id);
        assert_eq!(decision.action, Action::Shoot { at: Position::new(4, 4) });
        assert_eq!(
            decision.bindings.get("p"),
            Some(&Value::Predicate(Predicate::Enemy))
        );
    }
}
