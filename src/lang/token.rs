//! Tokenizer for bot programs.

use std::fmt;

use crate::error::ParseError;

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Keyword {
    Up,
    Right,
    Down,
    Left,
    Here,
    Random,
    Find,
    Alive,
    Dead,
    Player,
    Enemy,
    Move,
    Shoot,
    Eat,
    Dup,
    If,
    Then,
    Else,
    And,
    Or,
    Not,
    Abs,
    Tick,
    Quit,
    Exit,
    X,
    Y,
}

impl Keyword {
    const ALL: [Keyword; 27] = [
        Keyword::Up,
        Keyword::Right,
        Keyword::Down,
        Keyword::Left,
        Keyword::Here,
        Keyword::Random,
        Keyword::Find,
        Keyword::Alive,
        Keyword::Dead,
        Keyword::Player,
        Keyword::Enemy,
        Keyword::Move,
        Keyword::Shoot,
        Keyword::Eat,
        Keyword::Dup,
        Keyword::If,
        Keyword::Then,
        Keyword::Else,
        Keyword::And,
        Keyword::Or,
        Keyword::Not,
        Keyword::Abs,
        Keyword::Tick,
        Keyword::Quit,
        Keyword::Exit,
        Keyword::X,
        Keyword::Y,
    ];

    /// Look up a word.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == word)
    }

    /// The source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Up => "up",
            Keyword::Right => "right",
            Keyword::Down => "down",
            Keyword::Left => "left",
            Keyword::Here => "here",
            Keyword::Random => "random",
            Keyword::Find => "find",
            Keyword::Alive => "alive",
            Keyword::Dead => "dead",
            Keyword::Player => "player",
            Keyword::Enemy => "enemy",
            Keyword::Move => "move",
            Keyword::Shoot => "shoot",
            Keyword::Eat => "eat",
            Keyword::Dup => "dup",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
            Keyword::Abs => "abs",
            Keyword::Tick => "tick",
            Keyword::Quit => "quit",
            Keyword::Exit => "exit",
            Keyword::X => "x",
            Keyword::Y => "y",
        }
    }
}

/// Kind of a lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Unsigned integer literal; signs are separate tokens.
    Int(i64),
    /// Identifier that is not a keyword.
    Name(String),
    /// Reserved word.
    Keyword(Keyword),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `%`
    Percent,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `=`
    Eq,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `!`
    Bang,
    /// `->`
    Arrow,
    /// `$`
    Dollar,
    /// `;`
    Semi,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "{n}"),
            TokenKind::Name(name) => write!(f, "{name}"),
            TokenKind::Keyword(k) => write!(f, "{}", k.as_str()),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Amp => write!(f, "&"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::Dollar => write!(f, "$"),
            TokenKind::Semi => write!(f, ";"),
        }
    }
}

/// A token with its byte span in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    /// Whether this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

/// Split program text into tokens. Whitespace separates tokens and is
/// otherwise ignored.
///
/// # Errors
///
/// Returns an error on a character outside the language or an integer
/// literal that overflows.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch.is_ascii_digit() {
            let mut end = start;
            while let Some(&(i, c)) = chars.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                end = i + c.len_utf8();
                chars.next();
            }
            let literal = &source[start..end];
            let value = literal
                .parse::<i64>()
                .map_err(|_| ParseError::IntegerOutOfRange {
                    literal: literal.to_string(),
                    offset: start,
                })?;
            tokens.push(Token {
                kind: TokenKind::Int(value),
                start,
                end,
            });
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let mut end = start;
            while let Some(&(i, c)) = chars.peek() {
                if !(c.is_ascii_alphanumeric() || c == '_') {
                    break;
                }
                end = i + c.len_utf8();
                chars.next();
            }
            let word = &source[start..end];
            let kind = match Keyword::from_word(word) {
                Some(keyword) => TokenKind::Keyword(keyword),
                None => TokenKind::Name(word.to_string()),
            };
            tokens.push(Token { kind, start, end });
            continue;
        }

        chars.next();
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '+' => TokenKind::Plus,
            '-' => {
                if chars.peek().is_some_and(|&(_, c)| c == '>') {
                    chars.next();
                    tokens.push(Token {
                        kind: TokenKind::Arrow,
                        start,
                        end: start + 2,
                    });
                    continue;
                }
                TokenKind::Minus
            }
            '%' => TokenKind::Percent,
            '>' => TokenKind::Gt,
            '<' => TokenKind::Lt,
            '=' => TokenKind::Eq,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '!' => TokenKind::Bang,
            '$' => TokenKind::Dollar,
            ';' => TokenKind::Semi,
            other => {
                return Err(ParseError::UnexpectedChar {
                    ch: other,
                    offset: start,
                });
            }
        };
        tokens.push(Token {
            kind,
            start,
            end: start + ch.len_utf8(),
        });
    }

    Ok(tokens)
}
