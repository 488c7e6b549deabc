//! Candidate programs.
//!
//! A [`Program`] is an immutable prefix-notation expression tree over a fixed
//! vocabulary ([`Op`], integer and float literals, `$i` variable references).
//! Programs are values: equality, ordering and hashing look only at the token
//! sequence, so two programs built from the same text are interchangeable as
//! map keys.
//!
//! # Text format
//!
//! Whitespace-separated prefix tokens, e.g. `add $0 mul 2 $1`.
//!
//! ```
//! use symreg::program::Program;
//!
//! let p = Program::new("add 3 sub 5 4", 0).unwrap();
//! assert_eq!(p.eval(None).unwrap().as_scalar(), Some(4.0));
//! assert_eq!(p.to_string(), "add 3 sub 5 4");
//! ```
//!
//! # Submodules
//!
//! - [`eval`](Program::eval): vectorised evaluation over a variable table
//! - [`mutation`]: point, growth and shrink operators

mod eval;
pub mod mutation;
mod token;

pub use eval::Value;
pub use mutation::{MutationConfig, MutationKind};
pub use token::{Op, Token};

use crate::error::ProgramError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// An expression tree stored as prefix-ordered tokens.
///
/// `max_arity` is the number of input variables the program may reference.
/// It bounds the variables that mutation introduces; it takes no part in
/// equality.
#[derive(Debug, Clone)]
pub struct Program {
    tokens: Vec<Token>,
    max_arity: usize,
}

impl Program {
    /// Parses whitespace-separated prefix text.
    pub fn new(text: &str, max_arity: usize) -> Result<Self, ProgramError> {
        Self::from_words(text.split_whitespace(), max_arity)
    }

    /// Builds a program from an already tokenised word sequence.
    pub fn from_words<I, S>(words: I, max_arity: usize) -> Result<Self, ProgramError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = words
            .into_iter()
            .enumerate()
            .map(|(position, word)| {
                let word = word.as_ref();
                Token::parse(word).ok_or_else(|| ProgramError::UnknownToken {
                    token: word.to_string(),
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tokens(tokens, max_arity)
    }

    /// Builds a program from parsed tokens, checking that they form exactly one tree.
    ///
    /// NaN literals are normalised to `f64::NAN`.
    pub fn from_tokens(tokens: Vec<Token>, max_arity: usize) -> Result<Self, ProgramError> {
        check_structure(&tokens)?;
        let tokens = tokens.into_iter().map(Token::canonical).collect();
        Ok(Self { tokens, max_arity })
    }

    /// Internal constructor for token vectors produced by the mutation operators,
    /// which preserve the tree structure by construction.
    pub(crate) fn from_valid(tokens: Vec<Token>, max_arity: usize) -> Self {
        debug_assert!(check_structure(&tokens).is_ok(), "malformed tokens: {tokens:?}");
        Self { tokens, max_arity }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn max_arity(&self) -> usize {
        self.max_arity
    }

    /// Returns the same program with a different variable bound.
    pub fn with_max_arity(mut self, max_arity: usize) -> Self {
        self.max_arity = max_arity;
        self
    }

    /// Number of tokens (nodes) in the tree.
    pub fn complexity(&self) -> usize {
        self.tokens.len()
    }

    /// Highest variable index referenced, if any.
    pub fn max_variable(&self) -> Option<usize> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Var(i) => Some(*i),
                _ => None,
            })
            .max()
    }

    /// One past the last token of the subtree rooted at `start`.
    pub(crate) fn subtree_end(&self, start: usize) -> usize {
        let mut needed = 1usize;
        let mut pos = start;
        while needed > 0 {
            needed = needed - 1 + self.tokens[pos].arity();
            pos += 1;
        }
        pos
    }

    /// Start positions of the direct children of the operator at `start`.
    pub(crate) fn children(&self, start: usize) -> Vec<usize> {
        let mut starts = Vec::with_capacity(self.tokens[start].arity());
        let mut pos = start + 1;
        for _ in 0..self.tokens[start].arity() {
            starts.push(pos);
            pos = self.subtree_end(pos);
        }
        starts
    }

    /// Copy of the tokens with `start..end` replaced by `replacement`.
    pub(crate) fn splice(&self, start: usize, end: usize, replacement: &[Token]) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.tokens.len() - (end - start) + replacement.len());
        tokens.extend_from_slice(&self.tokens[..start]);
        tokens.extend_from_slice(replacement);
        tokens.extend_from_slice(&self.tokens[end..]);
        tokens
    }
}

/// Verifies that `tokens` is exactly one prefix tree.
fn check_structure(tokens: &[Token]) -> Result<(), ProgramError> {
    if tokens.is_empty() {
        return Err(ProgramError::Empty);
    }

    // (operator, position, operands still missing)
    let mut open: Vec<(Op, usize, usize)> = Vec::new();
    for (position, token) in tokens.iter().enumerate() {
        if position > 0 && open.is_empty() {
            return Err(ProgramError::TrailingTokens {
                consumed: position,
                total: tokens.len(),
            });
        }
        if let Some((_, _, missing)) = open.last_mut() {
            *missing -= 1;
        }
        if let Token::Op(op) = token {
            open.push((*op, position, op.arity()));
        }
        while matches!(open.last(), Some(&(_, _, 0))) {
            open.pop();
        }
    }

    match open.last() {
        Some(&(op, position, _)) => Err(ProgramError::ArityUnderflow {
            op: op.symbol(),
            position,
        }),
        None => Ok(()),
    }
}

impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for Program {}

impl PartialOrd for Program {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Program {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tokens.cmp(&other.tokens)
    }
}

impl Hash for Program {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.hash(state);
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

impl FromStr for Program {
    type Err = ProgramError;

    /// Parses with `max_arity = 0`; use [`Program::with_max_arity`] to widen.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_tokens() {
        assert_eq!(Program::new("3", 0).unwrap().tokens(), &[Token::Int(3)]);
        assert_eq!(
            Program::new("add 3 4", 0).unwrap().tokens(),
            &[Token::Op(Op::Add), Token::Int(3), Token::Int(4)]
        );
        assert_eq!(Program::new("add add 1 2 3", 0).unwrap().complexity(), 5);
    }

    #[test]
    fn test_arity_underflow() {
        assert_eq!(
            Program::new("add 1", 0),
            Err(ProgramError::ArityUnderflow { op: "add", position: 0 })
        );
        assert_eq!(
            Program::new("add 1 neg", 0),
            Err(ProgramError::ArityUnderflow { op: "neg", position: 2 })
        );
    }

    #[test]
    fn test_trailing_and_empty() {
        assert_eq!(
            Program::new("1 2", 0),
            Err(ProgramError::TrailingTokens { consumed: 1, total: 2 })
        );
        assert_eq!(Program::new("   ", 0), Err(ProgramError::Empty));
        assert!(matches!(
            Program::new("add 1 foo", 0),
            Err(ProgramError::UnknownToken { position: 2, .. })
        ));
    }

    #[test]
    fn test_nan_literals_share_one_key() {
        let negative = Program::from_tokens(vec![Token::Float(-f64::NAN)], 0).unwrap();
        let positive = Program::new("nan", 0).unwrap();
        assert_eq!(negative, positive);
        assert_eq!(Program::new("-nan", 0).unwrap(), positive);
        let set: HashSet<Program> = [negative, positive].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_word_sequence() {
        let p = Program::from_words(["add", "1", "2"], 1).unwrap();
        assert_eq!(p, Program::new("add 1 2", 1).unwrap());
        assert_eq!(p.max_arity(), 1);
    }

    #[test]
    fn test_structural_identity() {
        let set: HashSet<Program> = [Program::new("123", 0).unwrap(), Program::new("123", 0).unwrap()]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
        // max_arity is not part of identity
        assert_eq!(Program::new("3", 0).unwrap(), Program::new("3", 2).unwrap());
        assert_ne!(Program::new("3", 0).unwrap(), Program::new("3.0", 0).unwrap());
    }

    #[test]
    fn test_subtree_helpers() {
        let p = Program::new("add mul $0 2 neg 3", 1).unwrap();
        assert_eq!(p.subtree_end(0), 6);
        assert_eq!(p.subtree_end(1), 4);
        assert_eq!(p.subtree_end(4), 6);
        assert_eq!(p.children(0), vec![1, 4]);
        assert_eq!(p.children(4), vec![5]);
        assert_eq!(p.max_variable(), Some(0));
        let spliced = p.splice(1, 4, &[Token::Var(0)]);
        assert_eq!(Program::from_tokens(spliced, 1).unwrap().to_string(), "add $0 neg 3");
    }

    #[test]
    fn test_text_round_trip_fixtures() {
        for text in ["3", "add 3 4", "div $0 -inf", "exp 1", "sub $0 neg -1", "nan", "-nan", "add -nan $0", "mul 2.0 $1"] {
            let p = Program::new(text, 2).unwrap();
            let again: Program = p.to_string().parse().unwrap();
            assert_eq!(p, again, "{text}");
        }
    }

    fn arb_token() -> impl Strategy<Value = Token> {
        prop_oneof![
            (0usize..4).prop_map(Token::Var),
            any::<i64>().prop_map(Token::Int),
            prop::num::f64::ANY.prop_map(Token::Float),
        ]
    }

    fn arb_program() -> impl Strategy<Value = Program> {
        arb_token()
            .prop_map(|t| vec![t])
            .prop_recursive(4, 32, 2, |inner| {
                prop_oneof![
                    (prop::sample::select(vec![Op::Neg, Op::Exp]), inner.clone()).prop_map(
                        |(op, a)| {
                            let mut v = vec![Token::Op(op)];
                            v.extend(a);
                            v
                        }
                    ),
                    (
                        prop::sample::select(vec![Op::Add, Op::Sub, Op::Mul, Op::Div]),
                        inner.clone(),
                        inner
                    )
                        .prop_map(|(op, a, b)| {
                            let mut v = vec![Token::Op(op)];
                            v.extend(a);
                            v.extend(b);
                            v
                        }),
                ]
            })
            .prop_map(|tokens| Program::from_tokens(tokens, 4).unwrap())
    }

    proptest! {
        #[test]
        fn prop_text_round_trip(p in arb_program()) {
            let again = Program::new(&p.to_string(), p.max_arity()).unwrap();
            prop_assert_eq!(&p, &again);
        }

        #[test]
        fn prop_word_round_trip(p in arb_program()) {
            let words: Vec<String> = p.tokens().iter().map(|t| t.to_string()).collect();
            let again = Program::from_words(&words, p.max_arity()).unwrap();
            prop_assert_eq!(p, again);
        }
    }
}
