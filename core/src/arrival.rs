//! Arrival-cost hooks: extra delay charged on reaching a node.
//!
//! The engine calls [`ArrivalCost::delay`] once per relaxed edge with the
//! pre-delay arrival time (`distance[u] + weight`). The returned delay is
//! added on top. Implementations must never return a negative value; the
//! label-setting invariant relies on it and the engine does not check it
//! outside debug builds.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::NodeId;

/// Waiting time charged at every intersection by default.
pub const DEFAULT_DELAY: f64 = 5.0;

/// Seed used when a random delay is requested without one.
pub const DEFAULT_SEED: u64 = 1_068_987;

pub trait ArrivalCost {
    /// Delay incurred by arriving at `node` at time `arrival`.
    fn delay(&mut self, node: NodeId, arrival: f64) -> f64;

    /// Called once at the start of every query, before any delay is drawn.
    /// Stateful implementations rewind here so that repeated queries on one
    /// engine see the same delays.
    fn start_query(&mut self) {}
}

impl<F> ArrivalCost for F
where
    F: FnMut(NodeId, f64) -> f64,
{
    fn delay(&mut self, node: NodeId, arrival: f64) -> f64 {
        self(node, arrival)
    }
}

/// No extra delay: plain Dijkstra over the edge weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl ArrivalCost for NoDelay {
    fn delay(&mut self, _node: NodeId, _arrival: f64) -> f64 {
        0.0
    }
}

/// The same delay at every node, independent of arrival time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDelay(pub f64);

impl Default for ConstantDelay {
    fn default() -> Self {
        Self(DEFAULT_DELAY)
    }
}

impl ArrivalCost for ConstantDelay {
    fn delay(&mut self, _node: NodeId, _arrival: f64) -> f64 {
        self.0
    }
}

/// Uniform random delay in `[0, scale)` from an owned, explicitly seeded generator.
///
/// Each relaxation draws a fresh sample, so the delay is path-dependent.
/// Two instances built from the same seed yield the same sequence; an
/// instance must not be shared between concurrent queries.
#[derive(Debug, Clone)]
pub struct SeededDelay {
    scale: f64,
    seed: u64,
    rng: StdRng,
}

impl SeededDelay {
    pub fn new(scale: f64, seed: u64) -> Self {
        debug_assert!(scale.is_finite() && scale >= 0.0, "invalid delay scale {scale}");
        Self {
            scale,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind the generator to its initial state.
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

impl ArrivalCost for SeededDelay {
    fn delay(&mut self, _node: NodeId, _arrival: f64) -> f64 {
        self.rng.gen::<f64>() * self.scale
    }

    fn start_query(&mut self) {
        self.reset();
    }
}

/// A cost function built from a [`DelayModel`].
#[derive(Debug, Clone)]
pub enum DelayFunction {
    None(NoDelay),
    Constant(ConstantDelay),
    Random(SeededDelay),
}

impl ArrivalCost for DelayFunction {
    fn delay(&mut self, node: NodeId, arrival: f64) -> f64 {
        match self {
            DelayFunction::None(f) => f.delay(node, arrival),
            DelayFunction::Constant(f) => f.delay(node, arrival),
            DelayFunction::Random(f) => f.delay(node, arrival),
        }
    }

    fn start_query(&mut self) {
        if let DelayFunction::Random(f) = self {
            f.start_query();
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DelayModelError {
    #[error("unknown delay model '{0}' (expected none, constant:<value> or random:<scale>[@<seed>])")]
    UnknownModel(String),
    #[error("invalid number '{0}' in delay model")]
    InvalidNumber(String),
    #[error("delay value must be finite and non-negative, got {0}")]
    Negative(f64),
}

/// Configuration-level description of an arrival-cost function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DelayModel {
    None,
    Constant { value: f64 },
    Random { scale: f64, seed: u64 },
}

impl Default for DelayModel {
    fn default() -> Self {
        DelayModel::Constant {
            value: DEFAULT_DELAY,
        }
    }
}

impl DelayModel {
    /// Instantiate the cost function. Random models get a freshly seeded generator.
    pub fn build(&self) -> DelayFunction {
        match *self {
            DelayModel::None => DelayFunction::None(NoDelay),
            DelayModel::Constant { value } => DelayFunction::Constant(ConstantDelay(value)),
            DelayModel::Random { scale, seed } => {
                DelayFunction::Random(SeededDelay::new(scale, seed))
            }
        }
    }

    /// Check that every parameter is finite and non-negative.
    pub fn validate(&self) -> Result<(), DelayModelError> {
        let value = match *self {
            DelayModel::None => return Ok(()),
            DelayModel::Constant { value } => value,
            DelayModel::Random { scale, .. } => scale,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(DelayModelError::Negative(value))
        }
    }
}

fn parse_number(s: &str) -> Result<f64, DelayModelError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| DelayModelError::InvalidNumber(s.to_string()))
}

impl FromStr for DelayModel {
    type Err = DelayModelError;

    /// Accepts `none`, `constant:<value>` and `random:<scale>[@<seed>]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (s, None),
        };

        let model = match (kind.to_lowercase().as_str(), arg) {
            ("none" | "zero", None) => DelayModel::None,
            ("constant" | "const", None) => DelayModel::default(),
            ("constant" | "const", Some(v)) => DelayModel::Constant {
                value: parse_number(v)?,
            },
            ("random" | "rand", arg) => {
                let arg = arg.unwrap_or("1");
                let (scale, seed) = match arg.split_once('@') {
                    Some((scale, seed)) => (
                        parse_number(scale)?,
                        seed.trim()
                            .parse::<u64>()
                            .map_err(|_| DelayModelError::InvalidNumber(seed.to_string()))?,
                    ),
                    None => (parse_number(arg)?, DEFAULT_SEED),
                };
                DelayModel::Random { scale, seed }
            }
            _ => return Err(DelayModelError::UnknownModel(s.to_string())),
        };

        model.validate()?;
        Ok(model)
    }
}

impl fmt::Display for DelayModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayModel::None => write!(f, "none"),
            DelayModel::Constant { value } => write!(f, "constant:{value}"),
            DelayModel::Random { scale, seed } => write!(f, "random:{scale}@{seed}"),
        }
    }
}
