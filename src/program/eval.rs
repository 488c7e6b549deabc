//! Vectorised program evaluation.

use super::{Program, Token};
use crate::error::EvalError;

/// Result of evaluating a program.
///
/// Constant sub-expressions stay scalar; anything touching a variable is a
/// per-sample vector. Binary operators broadcast a scalar against a vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Samples(Vec<f64>),
}

impl Value {
    /// The single value, if this is a scalar or a one-sample vector.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Samples(v) if v.len() == 1 => Some(v[0]),
            Value::Samples(_) => None,
        }
    }

    /// Expands to exactly `n` samples, broadcasting a scalar.
    pub fn into_samples(self, n: usize) -> Result<Vec<f64>, EvalError> {
        match self {
            Value::Scalar(v) => Ok(vec![v; n]),
            Value::Samples(v) if v.len() == n => Ok(v),
            Value::Samples(v) => Err(EvalError::ShapeMismatch {
                expected: n,
                found: v.len(),
            }),
        }
    }

    /// Whether any component is NaN.
    pub fn has_nan(&self) -> bool {
        match self {
            Value::Scalar(v) => v.is_nan(),
            Value::Samples(v) => v.iter().any(|x| x.is_nan()),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(a) => Value::Scalar(f(a)),
            Value::Samples(mut v) => {
                v.iter_mut().for_each(|x| *x = f(*x));
                Value::Samples(v)
            }
        }
    }

    fn zip(self, other: Value, f: impl Fn(f64, f64) -> f64) -> Result<Value, EvalError> {
        Ok(match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f(a, b)),
            (Value::Scalar(a), Value::Samples(mut v)) => {
                v.iter_mut().for_each(|x| *x = f(a, *x));
                Value::Samples(v)
            }
            (Value::Samples(mut v), Value::Scalar(b)) => {
                v.iter_mut().for_each(|x| *x = f(*x, b));
                Value::Samples(v)
            }
            (Value::Samples(mut a), Value::Samples(b)) => {
                if a.len() != b.len() {
                    return Err(EvalError::ShapeMismatch {
                        expected: a.len(),
                        found: b.len(),
                    });
                }
                a.iter_mut().zip(&b).for_each(|(x, &y)| *x = f(*x, y));
                Value::Samples(a)
            }
        })
    }
}

impl Program {
    /// Evaluates the program.
    ///
    /// `data` holds one row per variable and one column per sample
    /// (`data[i][s]` is variable `$i` in sample `s`). Pass `None` for
    /// variable-free programs. Extra rows are ignored.
    ///
    /// Arithmetic follows IEEE 754: `div 1 0` is `inf`, `div 1 inf` is `0`,
    /// and undefined results are NaN rather than errors.
    ///
    /// # Errors
    ///
    /// - [`EvalError::MissingData`] if a variable is referenced and `data` is `None`
    /// - [`EvalError::VariableOutOfRange`] if a variable index has no row
    /// - [`EvalError::ShapeMismatch`] if two rows used together differ in length
    ///
    /// ```
    /// use symreg::program::Program;
    ///
    /// let p = Program::new("add $0 $1", 2).unwrap();
    /// let out = p.eval(Some(&[vec![0.0, 1.0, 4.0], vec![2.0, 3.0, 5.0]])).unwrap();
    /// assert_eq!(out.into_samples(3).unwrap(), vec![2.0, 4.0, 9.0]);
    /// ```
    pub fn eval(&self, data: Option<&[Vec<f64>]>) -> Result<Value, EvalError> {
        // Walking the prefix stream backwards turns it into postfix: operands
        // are on the stack by the time their operator is reached, with the
        // leftmost operand on top.
        let mut stack: Vec<Value> = Vec::with_capacity(self.tokens.len());
        for token in self.tokens.iter().rev() {
            let value = match *token {
                Token::Var(index) => Value::Samples(resolve(data, index)?.to_vec()),
                Token::Op(op) => match op.arity() {
                    1 => pop(&mut stack).map(|a| op.apply_unary(a)),
                    _ => {
                        let a = pop(&mut stack);
                        let b = pop(&mut stack);
                        a.zip(b, |x, y| op.apply_binary(x, y))?
                    }
                },
                literal => Value::Scalar(literal.literal_value().unwrap_or(f64::NAN)),
            };
            stack.push(value);
        }
        Ok(pop(&mut stack))
    }
}

fn resolve(data: Option<&[Vec<f64>]>, index: usize) -> Result<&[f64], EvalError> {
    let rows = data.ok_or(EvalError::MissingData { index })?;
    rows.get(index)
        .map(Vec::as_slice)
        .ok_or(EvalError::VariableOutOfRange {
            index,
            available: rows.len(),
        })
}

/// Programs are structurally checked at construction, so the stack never underflows.
fn pop(stack: &mut Vec<Value>) -> Value {
    stack.pop().unwrap_or(Value::Scalar(f64::NAN))
}
