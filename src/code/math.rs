//! Arithmetic expression codes.

use rand::Rng;
use std::fmt;

use super::GeneratedCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
        }
    }

    pub fn apply(self, lhs: i32, rhs: i32) -> i32 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
        }
    }
}

/// `lhs op rhs` with `lhs` in 1..=10 and `rhs` in 1..=5.
///
/// Subtraction may go negative (`2 - 5` answers `-3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathCode {
    pub lhs: i32,
    pub rhs: i32,
    pub op: Operator,
}

impl MathCode {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let lhs = rng.random_range(1..=10);
        let rhs = rng.random_range(1..=5);
        let op = match rng.random_range(0..3) {
            0 => Operator::Add,
            1 => Operator::Subtract,
            _ => Operator::Multiply,
        };
        Self { lhs, rhs, op }
    }

    pub fn answer(&self) -> i32 {
        self.op.apply(self.lhs, self.rhs)
    }
}

impl fmt::Display for MathCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

impl From<MathCode> for GeneratedCode {
    fn from(code: MathCode) -> Self {
        GeneratedCode {
            secret: code.answer().to_string(),
            display: code.to_string(),
        }
    }
}
