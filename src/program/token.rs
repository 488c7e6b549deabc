//! Program vocabulary: operators, literals and variable references.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An operator with a fixed arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    Exp,
}

impl Op {
    /// Every operator, in declaration order.
    pub const ALL: [Op; 6] = [Op::Add, Op::Sub, Op::Mul, Op::Div, Op::Neg, Op::Exp];

    /// Number of operands consumed by this operator.
    pub fn arity(self) -> usize {
        match self {
            Op::Add | Op::Sub | Op::Mul | Op::Div => 2,
            Op::Neg | Op::Exp => 1,
        }
    }

    /// Textual token for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::Neg => "neg",
            Op::Exp => "exp",
        }
    }

    /// Looks up an operator by its textual token.
    pub fn from_symbol(symbol: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Operators sharing the given arity.
    pub fn with_arity(arity: usize) -> impl Iterator<Item = Op> {
        Op::ALL.into_iter().filter(move |op| op.arity() == arity)
    }

    /// Applies a unary operator. Binary operators are never passed here.
    pub(crate) fn apply_unary(self, a: f64) -> f64 {
        match self {
            Op::Neg => -a,
            Op::Exp => a.exp(),
            _ => unreachable!("{} is not unary", self.symbol()),
        }
    }

    /// Applies a binary operator with IEEE 754 semantics (no trapping).
    pub(crate) fn apply_binary(self, a: f64, b: f64) -> f64 {
        match self {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
            Op::Div => a / b,
            _ => unreachable!("{} is not binary", self.symbol()),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One element of a prefix-ordered program.
///
/// Equality, ordering and hashing are structural. Float literals compare by
/// bit pattern (via [`f64::total_cmp`]), so `nan` equals `nan` and `0.0`
/// differs from `-0.0`; this keeps `Eq`, `Ord` and `Hash` mutually consistent.
#[derive(Debug, Clone, Copy)]
pub enum Token {
    Op(Op),
    /// Reference to input column `$i`.
    Var(usize),
    Int(i64),
    Float(f64),
}

impl Token {
    /// Number of operands this token consumes (0 for leaves).
    pub fn arity(&self) -> usize {
        match self {
            Token::Op(op) => op.arity(),
            _ => 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.arity() == 0
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Int(_) | Token::Float(_))
    }

    /// Numeric value of a literal.
    pub fn literal_value(&self) -> Option<f64> {
        match *self {
            Token::Int(v) => Some(v as f64),
            Token::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Parses one whitespace-free token.
    ///
    /// Integers are tried before floats so that `3` stays an integer literal
    /// while `3.0`, `1e3`, `inf`, `-inf` and `nan` become float literals.
    /// Every NaN spelling (`nan`, `-nan`, `NaN`) parses to the same token.
    pub fn parse(text: &str) -> Option<Token> {
        if let Some(op) = Op::from_symbol(text) {
            return Some(Token::Op(op));
        }
        if let Some(index) = text.strip_prefix('$') {
            // `usize::from_str` accepts a leading `+`; variable indices do not.
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            return index.parse().ok().map(Token::Var);
        }
        if let Ok(v) = text.parse::<i64>() {
            return Some(Token::Int(v));
        }
        text.parse::<f64>().ok().map(|v| Token::Float(v).canonical())
    }

    /// Collapses every NaN literal to the single quiet NaN `f64::NAN`.
    ///
    /// Text cannot carry a NaN's sign or payload, so all NaN literals must be
    /// the same token for parsing and display to round-trip.
    pub(crate) fn canonical(self) -> Token {
        match self {
            Token::Float(v) if v.is_nan() => Token::Float(f64::NAN),
            other => other,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Token::Op(_) => 0,
            Token::Var(_) => 1,
            Token::Int(_) => 2,
            Token::Float(_) => 3,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Token {}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Op(a), Token::Op(b)) => a.cmp(b),
            (Token::Var(a), Token::Var(b)) => a.cmp(b),
            (Token::Int(a), Token::Int(b)) => a.cmp(b),
            (Token::Float(a), Token::Float(b)) => a.total_cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Token::Op(op) => op.hash(state),
            Token::Var(i) => i.hash(state),
            Token::Int(v) => v.hash(state),
            Token::Float(v) => v.to_bits().hash(state),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Op(op) => write!(f, "{op}"),
            Token::Var(i) => write!(f, "${i}"),
            Token::Int(v) => write!(f, "{v}"),
            // Debug keeps the decimal point (`2.0`), so the literal re-parses as a float.
            Token::Float(v) => write!(f, "{v:?}"),
        }
    }
}
