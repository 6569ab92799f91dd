//! Guard expressions over a combination.
//!
//! An [`Expr`] is an immutable tree of boolean combinators whose leaves are
//! individual bits. Evaluation is a pure function of the `u64` it is given,
//! so the compiler may evaluate the same guard any number of times.

use super::flag::{Combination, Flag, EMPTY};
use std::ops;

/// Boolean guard over a combination.
///
/// # Example
///
/// ```rust
/// use multistate::Expr;
///
/// // (bit 0 OR bit 1) AND NOT bit 2
/// let guard = Expr::and([Expr::or([Expr::bit(0), Expr::bit(1)]), !Expr::bit(2)]);
///
/// assert!(guard.eval(0b001));
/// assert!(guard.eval(0b010));
/// assert!(!guard.eval(0b101));
/// assert!(!guard.eval(0));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expr {
    /// True iff the bit is set.
    Bit(u8),
    /// True iff every operand is true.
    And(Vec<Expr>),
    /// True iff at least one operand is true.
    Or(Vec<Expr>),
    /// True iff exactly one operand is true.
    Xor(Vec<Expr>),
    Not(Box<Expr>),
    /// Always true.
    Any,
    /// True iff no bit is set.
    Empty,
}

impl Expr {
    /// Leaf that holds when `flag` is set.
    pub fn flag(flag: &Flag) -> Self {
        Self::Bit(flag.bit)
    }

    /// Leaf over a raw bit.
    pub fn bit(bit: u8) -> Self {
        Self::Bit(bit)
    }

    pub fn and(operands: impl IntoIterator<Item = Expr>) -> Self {
        Self::And(operands.into_iter().collect())
    }

    pub fn or(operands: impl IntoIterator<Item = Expr>) -> Self {
        Self::Or(operands.into_iter().collect())
    }

    pub fn xor(operands: impl IntoIterator<Item = Expr>) -> Self {
        Self::Xor(operands.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expr) -> Self {
        Self::Not(Box::new(operand))
    }

    pub fn any() -> Self {
        Self::Any
    }

    pub fn empty() -> Self {
        Self::Empty
    }

    /// Evaluate the guard against `combination`.
    ///
    /// Bits above 63 never match.
    pub fn eval(&self, combination: Combination) -> bool {
        match self {
            Self::Bit(bit) => combination.checked_shr(u32::from(*bit)).is_some_and(|v| v & 1 == 1),
            Self::And(operands) => operands.iter().all(|e| e.eval(combination)),
            Self::Or(operands) => operands.iter().any(|e| e.eval(combination)),
            Self::Xor(operands) => {
                let mut matched = false;
                for operand in operands {
                    if operand.eval(combination) {
                        if matched {
                            return false;
                        }
                        matched = true;
                    }
                }
                matched
            }
            Self::Not(operand) => !operand.eval(combination),
            Self::Any => true,
            Self::Empty => combination == EMPTY,
        }
    }
}

impl From<&Flag> for Expr {
    fn from(flag: &Flag) -> Self {
        Self::flag(flag)
    }
}

impl ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::Not(Box::new(self))
    }
}
