//! Syntax trees for bot programs.
//!
//! Trees are immutable once built. Predicates over agents live in their own
//! category ([`PredicateExpr`]) so `and`/`or` inside `find` never have to be
//! told apart from boolean `and`/`or` at evaluation time.

use std::fmt;

/// A parsed program: assignments evaluated in order, then the body that
/// must produce an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// `name = expr;` statements.
    pub assignments: Vec<Assignment>,
    /// The main expression.
    pub body: Expr,
}

/// `name = value;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Variable name (without the `$`).
    pub name: String,
    /// Value expression.
    pub value: Expr,
}

/// Any expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// An action-producing command.
    Command(Command),
    /// A position-producing expression.
    Direction(Direction),
    /// A boolean-producing expression.
    Bool(BoolExpr),
    /// An integer-producing expression.
    Number(NumExpr),
    /// A predicate used as a value (e.g. bound to a variable).
    Predicate(PredicateExpr),
    /// `if cond then a else b`; both branches are always evaluated.
    If {
        /// Condition, must be boolean.
        cond: Box<Expr>,
        /// Value when true.
        then: Box<Expr>,
        /// Value when false.
        otherwise: Box<Expr>,
    },
    /// `a -> b -> ...`: branch `turn mod len` is selected.
    Sequence(Vec<Expr>),
    /// `$name`
    Var(String),
}

/// Commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `move <position>`
    Move(Box<Expr>),
    /// `shoot <position>`
    Shoot(Box<Expr>),
    /// `eat`
    Eat,
    /// `dup <position>`
    Dup(Box<Expr>),
}

/// Position expressions. Compass directions are relative to the acting
/// agent's current tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    /// One tile towards y = 0.
    Up,
    /// One tile towards larger x.
    Right,
    /// One tile towards larger y.
    Down,
    /// One tile towards x = 0.
    Left,
    /// The agent's own tile.
    Here,
    /// A uniformly random tile of the grid.
    Random,
    /// `(x, y)` absolute position.
    Pair(Box<Expr>, Box<Expr>),
    /// Component-wise sum.
    Plus(Box<Direction>, Box<Direction>),
    /// Component-wise difference.
    Minus(Box<Direction>, Box<Direction>),
    /// Position of a random agent matching the predicate, or `here`.
    Find(PredicateExpr),
}

/// Boolean expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BoolExpr {
    Gt(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

/// Integer expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum NumExpr {
    /// The current turn index.
    Tick,
    Int(i64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mod(Box<Expr>, Box<Expr>),
    Abs(Box<Expr>),
    /// x component of a position.
    X(Box<Expr>),
    /// y component of a position.
    Y(Box<Expr>),
}

/// Predicates over agents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PredicateExpr {
    Alive,
    Dead,
    Player,
    Enemy,
    And(Box<PredicateExpr>, Box<PredicateExpr>),
    Or(Box<PredicateExpr>, Box<PredicateExpr>),
    Not(Box<PredicateExpr>),
    /// A variable that must hold a predicate.
    Var(String),
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for assignment in &self.assignments {
            write!(f, "{} = {}; ", assignment.name, assignment.value)?;
        }
        write!(f, "{}", self.body)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Command(c) => write!(f, "{c}"),
            Expr::Direction(d) => write!(f, "{d}"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Predicate(p) => write!(f, "{p}"),
            Expr::If {
                cond,
                then,
                otherwise,
            } => write!(f, "(if {cond} {then} {otherwise})"),
            Expr::Sequence(branches) => {
                write!(f, "(->")?;
                for branch in branches {
                    write!(f, " {branch}")?;
                }
                write!(f, ")")
            }
            Expr::Var(name) => write!(f, "${name}"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move(e) => write!(f, "(move {e})"),
            Command::Shoot(e) => write!(f, "(shoot {e})"),
            Command::Eat => write!(f, "eat"),
            Command::Dup(e) => write!(f, "(dup {e})"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Right => write!(f, "right"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Here => write!(f, "here"),
            Direction::Random => write!(f, "random"),
            Direction::Pair(x, y) => write!(f, "({x}, {y})"),
            Direction::Plus(a, b) => write!(f, "(dir+ {a} {b})"),
            Direction::Minus(a, b) => write!(f, "(dir- {a} {b})"),
            Direction::Find(p) => write!(f, "(find {p})"),
        }
    }
}

impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolExpr::Gt(a, b) => write!(f, "(> {a} {b})"),
            BoolExpr::Lt(a, b) => write!(f, "(< {a} {b})"),
            BoolExpr::Eq(a, b) => write!(f, "(= {a} {b})"),
            BoolExpr::And(a, b) => write!(f, "(and {a} {b})"),
            BoolExpr::Or(a, b) => write!(f, "(or {a} {b})"),
            BoolExpr::Not(a) => write!(f, "(not {a})"),
        }
    }
}

impl fmt::Display for NumExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumExpr::Tick => write!(f, "tick"),
            NumExpr::Int(n) => write!(f, "{n}"),
            NumExpr::Add(a, b) => write!(f, "(+ {a} {b})"),
            NumExpr::Sub(a, b) => write!(f, "(- {a} {b})"),
            NumExpr::Mod(a, b) => write!(f, "(% {a} {b})"),
            NumExpr::Abs(a) => write!(f, "(abs {a})"),
            NumExpr::X(a) => write!(f, "(x {a})"),
            NumExpr::Y(a) => write!(f, "(y {a})"),
        }
    }
}

impl fmt::Display for PredicateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateExpr::Alive => write!(f, "alive"),
            PredicateExpr::Dead => write!(f, "dead"),
            PredicateExpr::Player => write!(f, "player"),
            PredicateExpr::Enemy => write!(f, "enemy"),
            PredicateExpr::And(a, b) => write!(f, "(and {a} {b})"),
            PredicateExpr::Or(a, b) => write!(f, "(or {a} {b})"),
            PredicateExpr::Not(a) => write!(f, "(not {a})"),
            PredicateExpr::Var(name) => write!(f, "${name}"),
        }
    }
}
