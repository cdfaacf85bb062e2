//! Elimination orders for MAP queries.
//!
//! An `EliminationHeuristic` ranks every variable of a `Model`; `EliminationOrder::split` turns
//! that ranking into the order the MAP engine actually follows: every nuisance variable first,
//! then every MAP variable.

use crate::model::Model;
use crate::util::{BayesMapError, Result};
use crate::variable::Assignment;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;


/// Strategies for ordering the variables of a `Model` for elimination.
///
/// Each strategy is a pure function of the network structure and sorts stably, so ties are
/// broken by the model's own variable order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EliminationHeuristic {
    /// Fewest parents first
    LeastIncomingArcs,

    /// Contained in the fewest initial factors first
    FewestFactors
}

impl EliminationHeuristic {

    /// Every heuristic, in declaration order
    pub const ALL: [EliminationHeuristic; 2] = [
        EliminationHeuristic::LeastIncomingArcs,
        EliminationHeuristic::FewestFactors
    ];

    /// The recognized configuration names, in declaration order
    pub const NAMES: [&'static str; 2] = ["least-incoming-arcs", "fewest-factors"];

    /// Order every variable of `model` according to this heuristic.
    pub fn order<M: Model>(&self, model: &M) -> Vec<String> {
        match self {
            EliminationHeuristic::LeastIncomingArcs => least_incoming_arcs(model),
            EliminationHeuristic::FewestFactors => fewest_factors(model)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EliminationHeuristic::LeastIncomingArcs => EliminationHeuristic::NAMES[0],
            EliminationHeuristic::FewestFactors => EliminationHeuristic::NAMES[1]
        }
    }
}

impl Default for EliminationHeuristic {
    fn default() -> Self {
        EliminationHeuristic::LeastIncomingArcs
    }
}

impl fmt::Display for EliminationHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EliminationHeuristic {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "least-incoming-arcs" => Ok(EliminationHeuristic::LeastIncomingArcs),
            "fewest-factors" => Ok(EliminationHeuristic::FewestFactors),
            _ => Err(format!(
                "unknown elimination heuristic `{}`, expected one of: {}",
                s,
                EliminationHeuristic::NAMES.join(", ")
            ))
        }
    }
}


/// Sort the variables of `model` by the number of parents, ascending
fn least_incoming_arcs<M: Model>(model: &M) -> Vec<String> {
    let mut ranked: Vec<(usize, String)> = model
        .variables()
        .iter()
        .map(|v| {
            let arcs = model.parents(v.name()).map_or(0, |p| p.len());
            (arcs, String::from(v.name()))
        })
        .collect();

    ranked.sort_by_key(|&(arcs, _)| arcs);
    ranked.into_iter().map(|(_, name)| name).collect()
}


/// Sort the variables of `model` by the number of initial factors they appear in, ascending.
///
/// A variable appears in its own CPD and in the CPD of each of its children.
fn fewest_factors<M: Model>(model: &M) -> Vec<String> {
    let mut ranked: Vec<(usize, String)> = model
        .variables()
        .iter()
        .map(|v| {
            let own = model.cpd(v.name()).map_or(0, |_| 1);
            let count = own + model.children(v.name()).len();
            (count, String::from(v.name()))
        })
        .collect();

    ranked.sort_by_key(|&(count, _)| count);
    ranked.into_iter().map(|(_, name)| name).collect()
}


/// The two-phase elimination order of a MAP query.
///
/// Summing and maximizing do not commute, so every nuisance variable (neither queried nor
/// observed) is summed out before any MAP variable is maximized out. Within each phase the
/// relative order of the heuristic is kept. Observed variables are not eliminated at all: the
/// evidence already removed them from every factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EliminationOrder {
    nuisance: Vec<String>,
    map: Vec<String>
}

impl EliminationOrder {

    /// Split a heuristic's ordering of all network variables into the two-phase order.
    ///
    /// # Args
    /// * `raw`: a permutation of every network variable
    /// * `network`: the names of every network variable
    /// * `map_vars`: the MAP query variables
    /// * `evidence`: the observed variables
    ///
    /// # Errors
    /// * `BayesMapError::MalformedOrder` if `raw` is not a permutation of `network`, or misses
    ///   a MAP variable
    pub fn split(raw: &[String], network: &[&str], map_vars: &[&str], evidence: &Assignment) -> Result<Self> {
        let mut nuisance = Vec::new();
        let mut map = Vec::new();

        if let Some(missing) = network.iter().find(|n| ! raw.iter().any(|v| v == *n)) {
            return Err(BayesMapError::MalformedOrder(String::from(*missing)));
        }

        for v in raw.iter() {
            if ! network.contains(&v.as_str()) {
                return Err(BayesMapError::MalformedOrder(v.clone()));
            }

            if nuisance.contains(v) || map.contains(v) {
                return Err(BayesMapError::MalformedOrder(v.clone()));
            }

            if map_vars.contains(&v.as_str()) {
                map.push(v.clone());
            } else if ! evidence.contains(v) {
                nuisance.push(v.clone());
            }
        }

        if let Some(missing) = map_vars.iter().find(|m| ! map.iter().any(|v| v == *m)) {
            return Err(BayesMapError::MalformedOrder(String::from(*missing)));
        }

        Ok(EliminationOrder { nuisance, map })
    }

    /// The variables summed out, in elimination order
    pub fn nuisance(&self) -> &[String] {
        &self.nuisance
    }

    /// The variables maximized out, in elimination order
    pub fn map(&self) -> &[String] {
        &self.map
    }

    /// Every variable to eliminate, in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.nuisance.iter().chain(self.map.iter()).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.nuisance.len() + self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
