//! Static kind registry and the randomized tree generator.
//!
//! The grammar is a closed set known at compile time, so kinds live in a
//! plain enum partitioned into two constant pools by arity. No runtime
//! discovery.

use rand::Rng;
use thiserror::Error;

use crate::expr::Expr;

/// Hard ceiling on nodes per generated tree. Sibling depth budgets are drawn
/// independently, so a large budget can occasionally balloon; past the cap
/// every remaining slot is filled with a terminal.
const MAX_NODES: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("grammar configuration error: {0}")]
    Configuration(&'static str),
    #[error("{kind:?} expects {expected} children, got {got}")]
    InvalidArity {
        kind: Kind,
        expected: usize,
        got: usize,
    },
}

/// Tag for every node kind in the grammar. Arity is a property of the kind,
/// never of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    XCoordinate,
    YCoordinate,
    RandomConstant,
    Product,
    Average,
    WeightedAverage,
    Sine,
    Triangle,
    Gravity,
}

/// Zero-arity kinds, picked once the depth budget runs out.
pub const TERMINALS: &[Kind] = &[Kind::XCoordinate, Kind::YCoordinate, Kind::RandomConstant];

/// Positive-arity kinds, picked while budget remains.
pub const COMBINATORS: &[Kind] = &[
    Kind::Product,
    Kind::Average,
    Kind::WeightedAverage,
    Kind::Sine,
    Kind::Triangle,
    Kind::Gravity,
];

impl Kind {
    /// Number of child sub-expressions this kind requires.
    pub const fn arity(self) -> usize {
        match self {
            Kind::XCoordinate | Kind::YCoordinate | Kind::RandomConstant => 0,
            Kind::Sine | Kind::Triangle | Kind::Gravity => 1,
            Kind::Product | Kind::Average => 2,
            Kind::WeightedAverage => 3,
        }
    }

    /// Instantiate this kind with the given children, sampling any per-node
    /// parameters from `rng`. The child count must match the declared arity.
    pub fn build<R: Rng + ?Sized>(
        self,
        children: Vec<Expr>,
        rng: &mut R,
    ) -> Result<Expr, GrammarError> {
        if children.len() != self.arity() {
            return Err(GrammarError::InvalidArity {
                kind: self,
                expected: self.arity(),
                got: children.len(),
            });
        }
        let mut children = children.into_iter().map(Box::new);
        // Arity was checked above; each kind consumes exactly its arity.
        let mut next = move || children.next().unwrap();
        Ok(match self {
            Kind::XCoordinate => Expr::XCoordinate,
            Kind::YCoordinate => Expr::YCoordinate,
            Kind::RandomConstant => {
                Expr::RandomConstant([rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()])
            }
            Kind::Product => Expr::Product(next(), next()),
            Kind::Average => Expr::Average(next(), next()),
            Kind::WeightedAverage => Expr::WeightedAverage {
                a: next(),
                b: next(),
                weight: next(),
            },
            Kind::Sine => Expr::Sine {
                child: next(),
                phase: rng.gen::<f32>() * std::f32::consts::PI,
                frequency: rng.gen::<f32>() * 5.0 + 1.0,
            },
            Kind::Triangle => Expr::Triangle(next()),
            Kind::Gravity => Expr::Gravity(next()),
        })
    }
}

/// The kind pools available to the generator. The default grammar carries the
/// full set; restricted grammars are useful for testing and for steering the
/// visual style.
#[derive(Debug, Clone, Copy)]
pub struct Grammar<'a> {
    pub terminals: &'a [Kind],
    pub combinators: &'a [Kind],
}

impl Default for Grammar<'static> {
    fn default() -> Self {
        Grammar {
            terminals: TERMINALS,
            combinators: COMBINATORS,
        }
    }
}

/// Build a random expression tree with the given depth budget.
///
/// A zero budget yields a single terminal. Otherwise a combinator is drawn
/// uniformly and each child slot gets an independent sub-budget uniform in
/// `[0, budget)`. Sibling budgets are uncorrelated, so `max_depth` is a
/// stochastic shape parameter rather than a hard depth ceiling; the loose
/// policy is what gives the generator its visual character.
pub fn generate<R: Rng + ?Sized>(
    grammar: &Grammar<'_>,
    rng: &mut R,
    max_depth: u32,
) -> Result<Expr, GrammarError> {
    let mut nodes = 0usize;
    generate_node(grammar, rng, max_depth, &mut nodes)
}

fn generate_node<R: Rng + ?Sized>(
    grammar: &Grammar<'_>,
    rng: &mut R,
    budget: u32,
    nodes: &mut usize,
) -> Result<Expr, GrammarError> {
    *nodes += 1;
    if budget == 0 || *nodes >= MAX_NODES {
        if grammar.terminals.is_empty() {
            return Err(GrammarError::Configuration("terminal pool is empty"));
        }
        let kind = grammar.terminals[rng.gen_range(0..grammar.terminals.len())];
        return kind.build(Vec::new(), rng);
    }

    if grammar.combinators.is_empty() {
        return Err(GrammarError::Configuration("combinator pool is empty"));
    }
    let kind = grammar.combinators[rng.gen_range(0..grammar.combinators.len())];
    let mut children = Vec::with_capacity(kind.arity());
    for _ in 0..kind.arity() {
        let sub = rng.gen_range(0..budget);
        children.push(generate_node(grammar, rng, sub, nodes)?);
    }
    kind.build(children, rng)
}
