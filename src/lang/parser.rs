//! Ambiguity-preserving chart parser.
//!
//! Every grammar category is parsed over a token span `[i, j)` and the
//! list of trees for that span is memoized. Binary operators are tried at
//! every position, so an ambiguous program yields every tree.
//!
//! Commands only derive in statement position: the program body, an
//! assignment's value, and the branches, parts and parenthesized inside of
//! a conditional, sequence or group that is itself in statement position.
//! Everywhere else an action could only reach an operator that rejects it.
//!
//! Emission order is fixed. Alternatives follow the production order of
//! `expr` (command, direction, boolean, number, predicate, conditional,
//! sequence, group, variable). Inside a production the operators keep a
//! fixed order (`+` before `-` before `%`, `>` before `<` before `=` before
//! `and` before `or`), so `tick % 3 + 1 - 2` yields every `+` split before
//! any `-` split. For one operator, splits go from the rightmost occurrence
//! to the leftmost, which puts the left-associative reading of a chain of
//! that operator first. Sequences are split at as many arrows as possible
//! first.
//!
//! Each list keeps only its first `limit` trees. Products and
//! concatenations of such prefixes are prefixes of the full lists, so the
//! candidates returned are exactly the first `limit` in emission order.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::ParseError;
use crate::lang::ast::{
    Assignment, BoolExpr, Command, Direction, Expr, NumExpr, PredicateExpr, Program,
};
use crate::lang::token::{Keyword, Token, TokenKind};

/// Deepest chain of nested sub-parses the parser follows before giving up.
pub const MAX_NESTING: usize = 256;

type Trees<T> = Rc<Vec<T>>;
type ParseResult<T> = Result<T, ParseError>;
type SpanParser<'t, T> = fn(&mut Chart<'t>, usize, usize) -> ParseResult<Trees<T>>;

/// Result of parsing program text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// `quit` or `exit`.
    Quit,
    /// The first trees the text derives, in emission order. Never empty.
    Candidates(Vec<Program>),
}

impl Parsed {
    /// Candidate trees, empty for `quit`.
    #[must_use]
    pub fn candidates(&self) -> &[Program] {
        match self {
            Parsed::Quit => &[],
            Parsed::Candidates(programs) => programs,
        }
    }
}

/// Parse a token stream into its first `limit` derivations.
///
/// # Errors
///
/// Returns [`ParseError::NoDerivation`] when nothing derives the tokens and
/// [`ParseError::TooDeep`] when the program nests deeper than
/// [`MAX_NESTING`].
pub fn parse_tokens(tokens: &[Token], limit: usize) -> ParseResult<Parsed> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    if let [only] = tokens {
        if only.is_keyword(Keyword::Quit) || only.is_keyword(Keyword::Exit) {
            return Ok(Parsed::Quit);
        }
    }

    let mut chart = Chart::new(tokens, limit.max(1));

    let mut prefixes: Vec<Vec<Assignment>> = vec![Vec::new()];
    let mut pos = 0;
    while let Some((name, semi)) = chart.assignment_at(pos) {
        let values = chart.expr(pos + 2, semi)?;
        if values.is_empty() {
            return Err(ParseError::NoDerivation);
        }
        let mut next = Vec::new();
        'fill: for prefix in &prefixes {
            for value in values.iter() {
                let mut assignments = prefix.clone();
                assignments.push(Assignment {
                    name: name.clone(),
                    value: value.clone(),
                });
                if !chart.push(&mut next, assignments) {
                    break 'fill;
                }
            }
        }
        prefixes = next;
        pos = semi + 1;
    }

    if pos >= tokens.len() {
        return Err(ParseError::NoDerivation);
    }
    let bodies = chart.expr(pos, tokens.len())?;
    if bodies.is_empty() {
        return Err(ParseError::NoDerivation);
    }

    let mut programs = Vec::new();
    'fill: for assignments in &prefixes {
        for body in bodies.iter() {
            let program = Program {
                assignments: assignments.clone(),
                body: body.clone(),
            };
            if !chart.push(&mut programs, program) {
                break 'fill;
            }
        }
    }
    Ok(Parsed::Candidates(programs))
}

/// Where an expression sits in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    /// May produce an action.
    Statement,
    /// Feeds an operator or a command.
    Operand,
}

/// Memo tables for one parse.
struct Chart<'t> {
    tokens: &'t [Token],
    limit: usize,
    depth: usize,
    exprs: HashMap<(usize, usize, Slot), Trees<Expr>>,
    directions: HashMap<(usize, usize), Trees<Direction>>,
    predicates: HashMap<(usize, usize), Trees<PredicateExpr>>,
}

impl<'t> Chart<'t> {
    fn new(tokens: &'t [Token], limit: usize) -> Self {
        Self {
            tokens,
            limit,
            depth: 0,
            exprs: HashMap::new(),
            directions: HashMap::new(),
            predicates: HashMap::new(),
        }
    }

    fn kind(&self, i: usize) -> Option<&TokenKind> {
        self.tokens.get(i).map(|t| &t.kind)
    }

    fn is(&self, i: usize, kind: &TokenKind) -> bool {
        self.kind(i) == Some(kind)
    }

    fn is_keyword(&self, i: usize, keyword: Keyword) -> bool {
        self.tokens.get(i).is_some_and(|t| t.is_keyword(keyword))
    }

    /// Append `item` unless `out` is full. Returns whether more fit.
    fn push<T>(&self, out: &mut Vec<T>, item: T) -> bool {
        if out.len() < self.limit {
            out.push(item);
        }
        out.len() < self.limit
    }

    fn extend<T: Clone>(&self, out: &mut Vec<T>, items: &[T]) {
        for item in items {
            if !self.push(out, item.clone()) {
                break;
            }
        }
    }

    fn full<T>(&self, out: &[T]) -> bool {
        out.len() >= self.limit
    }

    /// Run `parse` one level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep { limit: MAX_NESTING });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// `NAME = ... ;` starting at `pos`: the name and the position of the `;`.
    fn assignment_at(&self, pos: usize) -> Option<(String, usize)> {
        let Some(TokenKind::Name(name)) = self.kind(pos) else {
            return None;
        };
        if !self.is(pos + 1, &TokenKind::Eq) {
            return None;
        }
        let semi = (pos + 2..self.tokens.len()).find(|&k| self.is(k, &TokenKind::Semi))?;
        Some((name.clone(), semi))
    }

    /// Operator positions strictly inside `[i, j)` with non-empty operands
    /// on both sides, rightmost first.
    fn operators(&self, i: usize, j: usize, is_op: fn(&TokenKind) -> bool) -> Vec<usize> {
        ((i + 1)..j.saturating_sub(1))
            .rev()
            .filter(|&k| self.kind(k).is_some_and(is_op))
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn binary<L: Clone, R: Clone, T>(
        &mut self,
        i: usize,
        j: usize,
        is_op: fn(&TokenKind) -> bool,
        left: SpanParser<'t, L>,
        right: SpanParser<'t, R>,
        build: fn(L, R) -> T,
        out: &mut Vec<T>,
    ) -> ParseResult<()> {
        for k in self.operators(i, j, is_op) {
            if self.full(out) {
                break;
            }
            let lhs = left(self, i, k)?;
            if lhs.is_empty() {
                continue;
            }
            let rhs = right(self, k + 1, j)?;
            for l in lhs.iter() {
                for r in rhs.iter() {
                    if !self.push(out, build(l.clone(), r.clone())) {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    fn prefix<A: Clone, T>(
        &mut self,
        i: usize,
        j: usize,
        operand: SpanParser<'t, A>,
        build: fn(A) -> T,
        out: &mut Vec<T>,
    ) -> ParseResult<()> {
        if i + 1 >= j || self.full(out) {
            return Ok(());
        }
        let operands = operand(self, i + 1, j)?;
        for a in operands.iter() {
            if !self.push(out, build(a.clone())) {
                break;
            }
        }
        Ok(())
    }

    /// Whether `[i, j)` is `open ... close` around a non-empty inside.
    fn wrapped(&self, i: usize, j: usize, open: &TokenKind, close: &TokenKind) -> bool {
        j >= i + 3 && self.is(i, open) && self.is(j - 1, close)
    }

    fn product<T: Clone>(&self, lists: &[Trees<T>]) -> Vec<Vec<T>> {
        let mut rows: Vec<Vec<T>> = vec![Vec::new()];
        for list in lists {
            let mut next = Vec::new();
            'fill: for row in &rows {
                for item in list.iter() {
                    let mut extended = row.clone();
                    extended.push(item.clone());
                    if !self.push(&mut next, extended) {
                        break 'fill;
                    }
                }
            }
            rows = next;
        }
        rows
    }

    fn expr(&mut self, i: usize, j: usize) -> ParseResult<Trees<Expr>> {
        self.expr_in(i, j, Slot::Statement)
    }

    fn operand(&mut self, i: usize, j: usize) -> ParseResult<Trees<Expr>> {
        self.expr_in(i, j, Slot::Operand)
    }

    fn expr_in(&mut self, i: usize, j: usize, slot: Slot) -> ParseResult<Trees<Expr>> {
        if let Some(trees) = self.exprs.get(&(i, j, slot)) {
            return Ok(Rc::clone(trees));
        }
        let trees = Rc::new(self.nested(|chart| chart.expr_alternatives(i, j, slot))?);
        self.exprs.insert((i, j, slot), Rc::clone(&trees));
        Ok(trees)
    }

    fn expr_alternatives(&mut self, i: usize, j: usize, slot: Slot) -> ParseResult<Vec<Expr>> {
        let mut out = Vec::new();
        if i >= j {
            return Ok(out);
        }

        if slot == Slot::Statement {
            self.command(i, j, &mut out)?;
        }
        if !self.full(&out) {
            let directions = self.direction(i, j)?;
            for d in directions.iter() {
                if !self.push(&mut out, Expr::Direction(d.clone())) {
                    break;
                }
            }
        }
        self.boolean(i, j, &mut out)?;
        self.number(i, j, &mut out)?;
        if !self.full(&out) {
            let mut predicates = Vec::new();
            self.predicate_alternatives(i, j, true, &mut predicates)?;
            for p in predicates {
                if !self.push(&mut out, Expr::Predicate(p)) {
                    break;
                }
            }
        }
        self.conditional(i, j, slot, &mut out)?;
        self.sequence(i, j, slot, &mut out)?;
        if self.wrapped(i, j, &TokenKind::LParen, &TokenKind::RParen) && !self.full(&out) {
            let inner = self.expr_in(i + 1, j - 1, slot)?;
            self.extend(&mut out, &inner);
        }
        if j == i + 2 && self.is(i, &TokenKind::Dollar) {
            if let Some(TokenKind::Name(name)) = self.kind(i + 1) {
                let var = Expr::Var(name.clone());
                self.push(&mut out, var);
            }
        }
        Ok(out)
    }

    fn command(&mut self, i: usize, j: usize, out: &mut Vec<Expr>) -> ParseResult<()> {
        match self.kind(i) {
            Some(TokenKind::Keyword(Keyword::Move)) => self.prefix(
                i,
                j,
                Self::operand,
                |e| Expr::Command(Command::Move(Box::new(e))),
                out,
            ),
            Some(TokenKind::Keyword(Keyword::Shoot)) => self.prefix(
                i,
                j,
                Self::operand,
                |e| Expr::Command(Command::Shoot(Box::new(e))),
                out,
            ),
            Some(TokenKind::Keyword(Keyword::Dup)) => self.prefix(
                i,
                j,
                Self::operand,
                |e| Expr::Command(Command::Dup(Box::new(e))),
                out,
            ),
            Some(TokenKind::Keyword(Keyword::Eat)) if j == i + 1 => {
                self.push(out, Expr::Command(Command::Eat));
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn direction(&mut self, i: usize, j: usize) -> ParseResult<Trees<Direction>> {
        if let Some(trees) = self.directions.get(&(i, j)) {
            return Ok(Rc::clone(trees));
        }
        let trees = Rc::new(self.nested(|chart| chart.direction_alternatives(i, j))?);
        self.directions.insert((i, j), Rc::clone(&trees));
        Ok(trees)
    }

    fn direction_alternatives(&mut self, i: usize, j: usize) -> ParseResult<Vec<Direction>> {
        let mut out = Vec::new();
        if j == i + 1 {
            let atom = match self.kind(i) {
                Some(TokenKind::Keyword(Keyword::Up)) => Some(Direction::Up),
                Some(TokenKind::Keyword(Keyword::Right)) => Some(Direction::Right),
                Some(TokenKind::Keyword(Keyword::Down)) => Some(Direction::Down),
                Some(TokenKind::Keyword(Keyword::Left)) => Some(Direction::Left),
                Some(TokenKind::Keyword(Keyword::Here)) => Some(Direction::Here),
                Some(TokenKind::Keyword(Keyword::Random)) => Some(Direction::Random),
                _ => None,
            };
            out.extend(atom);
        }

        if self.wrapped(i, j, &TokenKind::LParen, &TokenKind::RParen) {
            self.binary(
                i + 1,
                j - 1,
                |k| *k == TokenKind::Comma,
                Self::operand,
                Self::operand,
                |x, y| Direction::Pair(Box::new(x), Box::new(y)),
                &mut out,
            )?;
        }

        self.binary(
            i,
            j,
            |k| *k == TokenKind::Plus,
            Self::direction,
            Self::direction,
            |a, b| Direction::Plus(Box::new(a), Box::new(b)),
            &mut out,
        )?;
        self.binary(
            i,
            j,
            |k| *k == TokenKind::Minus,
            Self::direction,
            Self::direction,
            |a, b| Direction::Minus(Box::new(a), Box::new(b)),
            &mut out,
        )?;
        if self.is_keyword(i, Keyword::Find) {
            self.prefix(i, j, Self::predicate, Direction::Find, &mut out)?;
        }
        Ok(out)
    }

    fn boolean(&mut self, i: usize, j: usize, out: &mut Vec<Expr>) -> ParseResult<()> {
        self.binary(
            i,
            j,
            |k| *k == TokenKind::Gt,
            Self::operand,
            Self::operand,
            |a, b| Expr::Bool(BoolExpr::Gt(Box::new(a), Box::new(b))),
            out,
        )?;
        self.binary(
            i,
            j,
            |k| *k == TokenKind::Lt,
            Self::operand,
            Self::operand,
            |a, b| Expr::Bool(BoolExpr::Lt(Box::new(a), Box::new(b))),
            out,
        )?;
        self.binary(
            i,
            j,
            |k| *k == TokenKind::Eq,
            Self::operand,
            Self::operand,
            |a, b| Expr::Bool(BoolExpr::Eq(Box::new(a), Box::new(b))),
            out,
        )?;
        self.binary(
            i,
            j,
            is_and,
            Self::operand,
            Self::operand,
            |a, b| Expr::Bool(BoolExpr::And(Box::new(a), Box::new(b))),
            out,
        )?;
        self.binary(
            i,
            j,
            is_or,
            Self::operand,
            Self::operand,
            |a, b| Expr::Bool(BoolExpr::Or(Box::new(a), Box::new(b))),
            out,
        )?;
        if self.kind(i).is_some_and(is_not) {
            self.prefix(
                i,
                j,
                Self::operand,
                |e| Expr::Bool(BoolExpr::Not(Box::new(e))),
                out,
            )?;
        }
        Ok(())
    }

    fn number(&mut self, i: usize, j: usize, out: &mut Vec<Expr>) -> ParseResult<()> {
        if j == i + 1 {
            match self.kind(i) {
                Some(TokenKind::Keyword(Keyword::Tick)) => {
                    self.push(out, Expr::Number(NumExpr::Tick));
                }
                Some(TokenKind::Int(n)) => {
                    let n = *n;
                    self.push(out, Expr::Number(NumExpr::Int(n)));
                }
                _ => {}
            }
        }
        if let Some(n) = self.signed_literal(i, j) {
            self.push(out, Expr::Number(NumExpr::Int(n)));
        }

        self.binary(
            i,
            j,
            |k| *k == TokenKind::Plus,
            Self::operand,
            Self::operand,
            |a, b| Expr::Number(NumExpr::Add(Box::new(a), Box::new(b))),
            out,
        )?;
        self.binary(
            i,
            j,
            |k| *k == TokenKind::Minus,
            Self::operand,
            Self::operand,
            |a, b| Expr::Number(NumExpr::Sub(Box::new(a), Box::new(b))),
            out,
        )?;
        self.binary(
            i,
            j,
            |k| *k == TokenKind::Percent,
            Self::operand,
            Self::operand,
            |a, b| Expr::Number(NumExpr::Mod(Box::new(a), Box::new(b))),
            out,
        )?;
        if self.is_keyword(i, Keyword::Abs) {
            self.prefix(
                i,
                j,
                Self::operand,
                |e| Expr::Number(NumExpr::Abs(Box::new(e))),
                out,
            )?;
        }
        if self.wrapped(i, j, &TokenKind::Pipe, &TokenKind::Pipe) && !self.full(out) {
            let inner = self.operand(i + 1, j - 1)?;
            for e in inner.iter() {
                if !self.push(out, Expr::Number(NumExpr::Abs(Box::new(e.clone())))) {
                    break;
                }
            }
        }
        if self.is_keyword(i, Keyword::X) {
            self.prefix(
                i,
                j,
                Self::operand,
                |e| Expr::Number(NumExpr::X(Box::new(e))),
                out,
            )?;
        }
        if self.is_keyword(i, Keyword::Y) {
            self.prefix(
                i,
                j,
                Self::operand,
                |e| Expr::Number(NumExpr::Y(Box::new(e))),
                out,
            )?;
        }
        Ok(())
    }

    /// `-3` or `+3` written without a space between sign and digits.
    fn signed_literal(&self, i: usize, j: usize) -> Option<i64> {
        if j != i + 2 {
            return None;
        }
        let (sign, digits) = (self.tokens.get(i)?, self.tokens.get(i + 1)?);
        let TokenKind::Int(n) = digits.kind else {
            return None;
        };
        if sign.end != digits.start {
            return None;
        }
        match sign.kind {
            TokenKind::Minus => Some(-n),
            TokenKind::Plus => Some(n),
            _ => None,
        }
    }

    fn predicate(&mut self, i: usize, j: usize) -> ParseResult<Trees<PredicateExpr>> {
        if let Some(trees) = self.predicates.get(&(i, j)) {
            return Ok(Rc::clone(trees));
        }
        let out = self.nested(|chart| {
            let mut out = Vec::new();
            chart.predicate_alternatives(i, j, false, &mut out)?;
            Ok(out)
        })?;
        let trees = Rc::new(out);
        self.predicates.insert((i, j), Rc::clone(&trees));
        Ok(trees)
    }

    /// Predicate trees for `[i, j)`. At the top of a plain expression the
    /// parenthesized and bare-variable forms are left out, since the
    /// expression grammar already derives those spans.
    fn predicate_alternatives(
        &mut self,
        i: usize,
        j: usize,
        top: bool,
        out: &mut Vec<PredicateExpr>,
    ) -> ParseResult<()> {
        if j == i + 1 {
            let atom = match self.kind(i) {
                Some(TokenKind::Keyword(Keyword::Alive)) => Some(PredicateExpr::Alive),
                Some(TokenKind::Keyword(Keyword::Dead)) => Some(PredicateExpr::Dead),
                Some(TokenKind::Keyword(Keyword::Player)) => Some(PredicateExpr::Player),
                Some(TokenKind::Keyword(Keyword::Enemy)) => Some(PredicateExpr::Enemy),
                _ => None,
            };
            if let Some(atom) = atom {
                self.push(out, atom);
            }
        }
        self.binary(
            i,
            j,
            is_and,
            Self::predicate,
            Self::predicate,
            |a, b| PredicateExpr::And(Box::new(a), Box::new(b)),
            out,
        )?;
        self.binary(
            i,
            j,
            is_or,
            Self::predicate,
            Self::predicate,
            |a, b| PredicateExpr::Or(Box::new(a), Box::new(b)),
            out,
        )?;
        if self.kind(i).is_some_and(is_not) {
            self.prefix(
                i,
                j,
                Self::predicate,
                |p| PredicateExpr::Not(Box::new(p)),
                out,
            )?;
        }
        if top {
            return Ok(());
        }
        if self.wrapped(i, j, &TokenKind::LParen, &TokenKind::RParen) && !self.full(out) {
            let inner = self.predicate(i + 1, j - 1)?;
            self.extend(out, &inner);
        }
        if j == i + 2 && self.is(i, &TokenKind::Dollar) {
            if let Some(TokenKind::Name(name)) = self.kind(i + 1) {
                let var = PredicateExpr::Var(name.clone());
                self.push(out, var);
            }
        }
        Ok(())
    }

    fn conditional(&mut self, i: usize, j: usize, slot: Slot, out: &mut Vec<Expr>) -> ParseResult<()> {
        if !self.is_keyword(i, Keyword::If) {
            return Ok(());
        }
        for k in (i + 2)..j {
            if self.full(out) {
                break;
            }
            if !self.is_keyword(k, Keyword::Then) {
                continue;
            }
            let conds = self.operand(i + 1, k)?;
            if conds.is_empty() {
                continue;
            }
            for m in (k + 2)..j.saturating_sub(1) {
                if !self.is_keyword(m, Keyword::Else) {
                    continue;
                }
                let thens = self.expr_in(k + 1, m, slot)?;
                if thens.is_empty() {
                    continue;
                }
                let elses = self.expr_in(m + 1, j, slot)?;
                for cond in conds.iter() {
                    for then in thens.iter() {
                        for otherwise in elses.iter() {
                            let tree = Expr::If {
                                cond: Box::new(cond.clone()),
                                then: Box::new(then.clone()),
                                otherwise: Box::new(otherwise.clone()),
                            };
                            if !self.push(out, tree) {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn sequence(&mut self, i: usize, j: usize, slot: Slot, out: &mut Vec<Expr>) -> ParseResult<()> {
        let mut arrows = self.operators(i, j, |k| *k == TokenKind::Arrow);
        if arrows.is_empty() {
            return Ok(());
        }
        arrows.reverse();

        let mut chain = Chain {
            arrows,
            end: j,
            slot,
            dead: HashSet::new(),
        };
        for cuts in (1..=chain.arrows.len()).rev() {
            if self.full(out) {
                break;
            }
            self.split(&mut chain, i, 0, cuts, &mut Vec::new(), out)?;
        }
        Ok(())
    }

    /// Split `[start, chain.end)` at `cuts` more arrows taken from
    /// `chain.arrows[from..]`, leftmost choices first. `branches` holds the
    /// trees of the segments already cut. Returns whether any split derives.
    fn split(
        &mut self,
        chain: &mut Chain,
        start: usize,
        from: usize,
        cuts: usize,
        branches: &mut Vec<Trees<Expr>>,
        out: &mut Vec<Expr>,
    ) -> ParseResult<bool> {
        if cuts == 0 {
            let last = self.expr_in(start, chain.end, chain.slot)?;
            if last.is_empty() {
                return Ok(false);
            }
            branches.push(last);
            for sequence in self.product(branches) {
                if !self.push(out, Expr::Sequence(sequence)) {
                    break;
                }
            }
            branches.pop();
            return Ok(true);
        }
        if chain.dead.contains(&(from, cuts)) {
            return Ok(false);
        }

        let mut derived = false;
        for c in from..=(chain.arrows.len() - cuts) {
            if self.full(out) {
                return Ok(true);
            }
            let arrow = chain.arrows[c];
            let segment = self.expr_in(start, arrow, chain.slot)?;
            if segment.is_empty() {
                continue;
            }
            branches.push(segment);
            let found = self.nested(|chart| chart.split(chain, arrow + 1, c + 1, cuts - 1, branches, out));
            branches.pop();
            derived |= found?;
        }
        if !derived {
            chain.dead.insert((from, cuts));
        }
        Ok(derived)
    }
}

/// An arrow chain being split into sequence branches.
struct Chain {
    /// Arrow positions, leftmost first.
    arrows: Vec<usize>,
    end: usize,
    slot: Slot,
    /// `(from, cuts)` states known to derive nothing.
    dead: HashSet<(usize, usize)>,
}

fn is_and(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Keyword(Keyword::And) | TokenKind::Amp)
}

fn is_or(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Keyword(Keyword::Or) | TokenKind::Pipe)
}

fn is_not(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Keyword(Keyword::Not) | TokenKind::Bang)
}
