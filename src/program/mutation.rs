//! Mutation operators for [`Program`].
//!
//! Every operator is a pure `&Program -> Program` function: the parent is
//! never modified and the child always differs from it structurally.
//!
//! - [`Program::point_mutation`]: replace one token by a compatible one
//! - [`Program::grow_root`]: wrap the whole tree in a new operator
//! - [`Program::grow_leaf`]: expand one leaf into a small subtree
//! - [`Program::shrink`]: hoist one operand over its operator
//!
//! [`Program::mutate`] picks one of these by weighted random choice, with
//! weights taken from [`MutationConfig`]. Growth never takes a program past
//! [`MutationConfig::max_size`]; at the limit it falls back to a point mutation.

use super::{Op, Program, Token};
use crate::error::ConfigError;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use rand_distr::StandardNormal;

/// Probabilities and spreads used by the mutation operators.
///
/// # Defaults
///
/// ```
/// use symreg::program::MutationConfig;
///
/// let config = MutationConfig::default();
/// assert_eq!(config.max_size, 64);
/// assert!((config.point_chance() - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutationConfig {
    /// Probability that a freshly created leaf is the literal `0`.
    pub zero_literal_chance: f64,

    /// Probability of choosing [`MutationKind::GrowRoot`].
    pub grow_root_chance: f64,

    /// Probability of choosing [`MutationKind::GrowLeaf`].
    pub grow_leaf_chance: f64,

    /// Probability of choosing [`MutationKind::Shrink`].
    pub shrink_chance: f64,

    /// Standard deviation of the step applied to integer literals.
    /// Steps are rounded and never zero.
    pub int_std: f64,

    /// Standard deviation of the step applied to float literals.
    pub float_std: f64,

    /// Largest token count growth operators may produce.
    pub max_size: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            zero_literal_chance: 0.5,
            grow_root_chance: 0.3,
            grow_leaf_chance: 0.4,
            shrink_chance: 0.1,
            int_std: 3.0,
            float_std: 4.0,
            max_size: 64,
        }
    }
}

impl MutationConfig {
    pub fn with_zero_literal_chance(mut self, p: f64) -> Self {
        self.zero_literal_chance = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_grow_root_chance(mut self, p: f64) -> Self {
        self.grow_root_chance = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_grow_leaf_chance(mut self, p: f64) -> Self {
        self.grow_leaf_chance = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_shrink_chance(mut self, p: f64) -> Self {
        self.shrink_chance = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_int_std(mut self, std: f64) -> Self {
        self.int_std = std;
        self
    }

    pub fn with_float_std(mut self, std: f64) -> Self {
        self.float_std = std;
        self
    }

    pub fn with_max_size(mut self, n: usize) -> Self {
        self.max_size = n;
        self
    }

    /// Probability mass left for [`MutationKind::Point`].
    pub fn point_chance(&self) -> f64 {
        (1.0 - self.grow_root_chance - self.grow_leaf_chance - self.shrink_chance).max(0.0)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("int_std", self.int_std), ("float_std", self.float_std)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSpread { name, value });
            }
        }
        for (name, value) in [
            ("zero_literal_chance", self.zero_literal_chance),
            ("grow_root_chance", self.grow_root_chance),
            ("grow_leaf_chance", self.grow_leaf_chance),
            ("shrink_chance", self.shrink_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        let growth = self.grow_root_chance + self.grow_leaf_chance + self.shrink_chance;
        if growth > 1.0 + 1e-9 {
            return Err(ConfigError::ProbabilityOverflow(growth));
        }
        if self.max_size == 0 {
            return Err(ConfigError::MaxSizeTooSmall);
        }
        Ok(())
    }

    /// Draws a mutation kind according to the configured probabilities.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> MutationKind {
        let weights = [
            self.point_chance(),
            self.grow_root_chance,
            self.grow_leaf_chance,
            self.shrink_chance,
        ];
        match WeightedIndex::new(weights) {
            Ok(dist) => MutationKind::ALL[dist.sample(rng)],
            Err(_) => MutationKind::Point,
        }
    }

    /// A new leaf for a program allowed `max_arity` variables.
    pub fn fresh_leaf<R: Rng>(&self, max_arity: usize, rng: &mut R) -> Token {
        if rng.random::<f64>() < self.zero_literal_chance {
            Token::Int(0)
        } else if max_arity > 0 {
            Token::Var(rng.random_range(0..max_arity))
        } else {
            Token::Int(self.int_step(rng))
        }
    }

    fn fresh_literal<R: Rng>(&self, rng: &mut R) -> Token {
        if rng.random::<f64>() < self.zero_literal_chance {
            Token::Int(0)
        } else {
            Token::Int(self.int_step(rng))
        }
    }

    fn int_step<R: Rng>(&self, rng: &mut R) -> i64 {
        let z: f64 = rng.sample(StandardNormal);
        (z * self.int_std).round() as i64
    }

    fn float_step<R: Rng>(&self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        z * self.float_std
    }

    /// Jitters a literal, returning a literal of the same kind that is
    /// guaranteed to differ from the input.
    fn perturb<R: Rng>(&self, literal: Token, rng: &mut R) -> Token {
        match literal {
            Token::Int(v) => {
                let mut step = self.int_step(rng);
                if step == 0 {
                    step = if rng.random::<bool>() { 1 } else { -1 };
                }
                Token::Int(v.checked_add(step).unwrap_or_else(|| v - step))
            }
            Token::Float(v) if v.is_finite() => {
                let next = v + self.float_step(rng);
                // a step lost to rounding still has to change the token
                Token::Float(if next.to_bits() == v.to_bits() { -v } else { next })
            }
            Token::Float(_) => Token::Float(self.float_step(rng)),
            other => other,
        }
    }
}

/// The mutation operators [`Program::mutate`] chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Point,
    GrowRoot,
    GrowLeaf,
    Shrink,
}

impl MutationKind {
    pub const ALL: [MutationKind; 4] = [
        MutationKind::Point,
        MutationKind::GrowRoot,
        MutationKind::GrowLeaf,
        MutationKind::Shrink,
    ];
}

impl Program {
    /// Applies one mutation chosen by [`MutationConfig::choose`].
    pub fn mutate<R: Rng>(&self, config: &MutationConfig, rng: &mut R) -> Program {
        self.mutate_with(config.choose(rng), config, rng)
    }

    /// Applies the given mutation operator.
    pub fn mutate_with<R: Rng>(
        &self,
        kind: MutationKind,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Program {
        match kind {
            MutationKind::Point => self.point_mutation_with(config, rng),
            MutationKind::GrowRoot => self.grow_root(config, rng),
            MutationKind::GrowLeaf => self.grow_leaf(config, rng),
            MutationKind::Shrink => self.shrink(config, rng),
        }
    }

    /// Point mutation with the default [`MutationConfig`].
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use symreg::program::Program;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    /// let p = Program::new("3", 0).unwrap();
    /// assert_ne!(p.point_mutation(&mut rng), p);
    /// ```
    pub fn point_mutation<R: Rng>(&self, rng: &mut R) -> Program {
        self.point_mutation_with(&MutationConfig::default(), rng)
    }

    /// Replaces exactly one token with a different, compatible token:
    ///
    /// - an operator becomes another operator of the same arity
    /// - a variable becomes another in-range variable or a literal
    /// - a literal is perturbed by `int_std` / `float_std`
    pub fn point_mutation_with<R: Rng>(&self, config: &MutationConfig, rng: &mut R) -> Program {
        let pos = rng.random_range(0..self.tokens.len());
        let replacement = match self.tokens[pos] {
            Token::Op(op) => Token::Op(other_op(op, rng)),
            Token::Var(index) => self.other_variable(index, config, rng),
            literal => config.perturb(literal, rng),
        };
        let mut tokens = self.tokens.clone();
        tokens[pos] = replacement;
        Program::from_valid(tokens, self.max_arity)
    }

    /// Makes the whole program an operand of a new random operator.
    pub fn grow_root<R: Rng>(&self, config: &MutationConfig, rng: &mut R) -> Program {
        if self.complexity() + 2 > config.max_size {
            return self.point_mutation_with(config, rng);
        }
        let op = random_op(rng);
        let mut tokens = Vec::with_capacity(self.complexity() + 2);
        tokens.push(Token::Op(op));
        if op.arity() == 1 {
            tokens.extend_from_slice(&self.tokens);
        } else {
            let leaf = config.fresh_leaf(self.max_arity, rng);
            if rng.random::<bool>() {
                tokens.extend_from_slice(&self.tokens);
                tokens.push(leaf);
            } else {
                tokens.push(leaf);
                tokens.extend_from_slice(&self.tokens);
            }
        }
        Program::from_valid(tokens, self.max_arity)
    }

    /// Replaces a random leaf with a random operator applied to that leaf
    /// (and a fresh leaf, for binary operators).
    pub fn grow_leaf<R: Rng>(&self, config: &MutationConfig, rng: &mut R) -> Program {
        if self.complexity() + 2 > config.max_size {
            return self.point_mutation_with(config, rng);
        }
        let leaves: Vec<usize> = (0..self.tokens.len())
            .filter(|&i| self.tokens[i].is_leaf())
            .collect();
        let pos = leaves[rng.random_range(0..leaves.len())];
        let leaf = self.tokens[pos];
        let op = random_op(rng);
        let subtree = if op.arity() == 1 {
            vec![Token::Op(op), leaf]
        } else {
            let fresh = config.fresh_leaf(self.max_arity, rng);
            if rng.random::<bool>() {
                vec![Token::Op(op), leaf, fresh]
            } else {
                vec![Token::Op(op), fresh, leaf]
            }
        };
        Program::from_valid(self.splice(pos, pos + 1, &subtree), self.max_arity)
    }

    /// Replaces a random operator's subtree with one of its operands.
    ///
    /// Single-token programs have nothing to hoist and get a point mutation.
    pub fn shrink<R: Rng>(&self, config: &MutationConfig, rng: &mut R) -> Program {
        let ops: Vec<usize> = (0..self.tokens.len())
            .filter(|&i| !self.tokens[i].is_leaf())
            .collect();
        if ops.is_empty() {
            return self.point_mutation_with(config, rng);
        }
        let pos = ops[rng.random_range(0..ops.len())];
        let children = self.children(pos);
        let child = children[rng.random_range(0..children.len())];
        let hoisted = self.tokens[child..self.subtree_end(child)].to_vec();
        let tokens = self.splice(pos, self.subtree_end(pos), &hoisted);
        Program::from_valid(tokens, self.max_arity)
    }

    fn other_variable<R: Rng>(&self, index: usize, config: &MutationConfig, rng: &mut R) -> Token {
        let in_range = index < self.max_arity;
        let others = if in_range {
            self.max_arity - 1
        } else {
            self.max_arity
        };
        if others > 0 && rng.random::<bool>() {
            let k = rng.random_range(0..others);
            Token::Var(if in_range && k >= index { k + 1 } else { k })
        } else {
            config.fresh_literal(rng)
        }
    }
}

fn random_op<R: Rng>(rng: &mut R) -> Op {
    Op::ALL[rng.random_range(0..Op::ALL.len())]
}

/// Another operator with the same arity. Every arity has at least two operators.
fn other_op<R: Rng>(op: Op, rng: &mut R) -> Op {
    let candidates: Vec<Op> = Op::with_arity(op.arity()).filter(|&o| o != op).collect();
    if candidates.is_empty() {
        return op;
    }
    candidates[rng.random_range(0..candidates.len())]
}
