//! Evaluation module for driving the resolver chains.
//!
//! This module contains the per-evaluation context and a small expression
//! tree whose nodes map one-to-one onto dispatch requests.

pub mod context;
pub mod expression;

pub use context::{ActiveEvaluation, EvaluationContext};
pub use expression::{evaluate_expression, Expr};
