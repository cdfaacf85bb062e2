//! Defines a `MapInferenceEngine` that uses exact inference by variable elimination to answer
//! maximum a posteriori queries.
//!
//! Implementation of Koller & Friedman Algorithm 13.1 - Max-Product-VE, with the variables
//! outside the query summed out first as in Algorithm 9.1 - Sum-Product-VE.

use crate::config::MapConfig;
use crate::factor::{best_row, Factor};
use crate::model::Model;
use crate::util::{BayesMapError, Result};
use crate::variable::Assignment;
use super::order::{EliminationHeuristic, EliminationOrder};
use super::MapInferenceEngine;

use itertools::Itertools;
use tracing::{debug, info, trace};

use std::collections::HashSet;


/// The product factor of a MAP variable, taken just before the variable was maximized out
#[derive(Clone, Debug, PartialEq)]
struct Snapshot {
    variable: String,
    factor: Factor
}


/// Answers MAP queries ```argmax_y P(Y = y | E = e)``` over a `Model`.
///
/// The evidence `e` is bound at construction. Every query deep-copies the initial factors of
/// the model, so the model itself is only ever read and one engine can answer any number of
/// queries.
pub struct MapEliminationEngine<'a, M: Model> {

    /// The network to query
    model: &'a M,

    /// The observations every query is conditioned on
    evidence: &'a Assignment,

    /// Ranks the network variables for elimination
    heuristic: EliminationHeuristic

}


impl<'a, M: Model> MapEliminationEngine<'a, M> {

    /// Create an engine over `model` conditioned on `evidence`, using the default heuristic.
    pub fn new(model: &'a M, evidence: &'a Assignment) -> Self {
        MapEliminationEngine {
            model,
            evidence,
            heuristic: EliminationHeuristic::default()
        }
    }

    /// Use `heuristic` to order the variables for elimination.
    pub fn with_heuristic(mut self, heuristic: EliminationHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Apply the settings of a `MapConfig`.
    pub fn with_config(self, config: &MapConfig) -> Self {
        self.with_heuristic(config.resolved_heuristic())
    }

    pub fn heuristic(&self) -> EliminationHeuristic {
        self.heuristic
    }


    /// Reject queries the model cannot answer.
    ///
    /// # Errors
    /// * `BayesMapError::UnknownVariable` for a query or evidence variable not in the model
    /// * `BayesMapError::DuplicateQueryVariable` for a MAP variable listed twice
    /// * `BayesMapError::UnknownState` for an observed state outside the variable's domain
    /// * `BayesMapError::OverlappingQuery` for a variable both queried and observed
    fn validate(&self, map_vars: &[&str]) -> Result<()> {
        let mut seen = HashSet::new();
        for &v in map_vars.iter() {
            if self.model.lookup_variable(v).is_none() {
                return Err(BayesMapError::UnknownVariable(String::from(v)));
            }

            if ! seen.insert(v) {
                return Err(BayesMapError::DuplicateQueryVariable(String::from(v)));
            }
        }

        for (var, state) in self.evidence.iter() {
            let variable = self.model
                               .lookup_variable(var)
                               .ok_or_else(|| BayesMapError::UnknownVariable(String::from(var)))?;

            if ! variable.has_state(state) {
                return Err(BayesMapError::UnknownState {
                    variable: String::from(var),
                    state: String::from(state)
                });
            }
        }

        if let Some(&v) = map_vars.iter().find(|&&v| self.evidence.contains(v)) {
            return Err(BayesMapError::OverlappingQuery(String::from(v)));
        }

        Ok(())
    }


    /// Copy the initial factors of the model and reduce them by the evidence.
    ///
    /// Factors left with an empty scope say nothing about the unobserved variables and are
    /// dropped.
    fn clamp_evidence(&self) -> Result<Vec<Factor>> {
        let mut live = Vec::new();

        for cpd in self.model.factors() {
            let mut phi = cpd.clone();
            for (var, state) in self.evidence.iter() {
                if phi.contains(var) {
                    phi.reduce(var, state)?;
                }
            }

            if phi.is_trivial() {
                debug!(weight = phi.total(), "dropping fully observed factor");
            } else {
                debug!("clamped factor:\n{}", phi);
                live.push(phi);
            }
        }

        Ok(live)
    }
}


/// Eliminate every variable of `order` from the `live` factors.
///
/// Nuisance variables are summed out. Each MAP variable is maximized out after a snapshot of
/// its product factor is taken for backtracking. A MAP product over that variable alone is not
/// maximized: it goes back into the live set as it is.
///
/// # Returns
/// the factors still live at the end, and the snapshots in elimination order
///
/// # Errors
/// * `BayesMapError::NoFactors` if no live factor is left while variables remain
/// * `BayesMapError::MalformedOrder` if a variable is in no live factor
fn eliminate(mut live: Vec<Factor>, order: &EliminationOrder) -> Result<(Vec<Factor>, Vec<Snapshot>)> {
    let mut snapshots = Vec::with_capacity(order.map().len());
    let nuisance = order.nuisance().len();

    for (step, v) in order.iter().enumerate() {
        if live.is_empty() {
            return Err(BayesMapError::NoFactors);
        }

        let (joined, rest): (Vec<Factor>, Vec<Factor>) = live.into_iter()
                                                             .partition(|f| f.contains(v));
        live = rest;

        // product step
        let mut joined = joined.into_iter();
        let mut result = joined.next()
                               .ok_or_else(|| BayesMapError::MalformedOrder(String::from(v)))?;
        for phi in joined {
            result.multiply(phi, v)?;
        }
        debug!(variable = v, "product:\n{}", result);

        if step < nuisance {
            // sum step
            result.marginalize(v)?;
            if result.is_trivial() {
                debug!(variable = v, weight = result.total(), "discarding trivial factor");
                continue;
            }
            debug!(variable = v, "summed out:\n{}", result);
        } else {
            // max step
            snapshots.push(Snapshot { variable: String::from(v), factor: result.clone() });

            if result.scope().len() >= 2 {
                result.maximize(v)?;
                debug!(variable = v, "maxed out:\n{}", result);
            } else {
                debug!(variable = v, "single variable factor, keeping it live");
            }
        }

        live.push(result);
    }

    debug!(
        live = live.len(),
        snapshots = snapshots.len(),
        "elimination finished"
    );

    Ok((live, snapshots))
}


/// Recover the MAP assignment from the snapshots, last eliminated first.
///
/// Each snapshot decides exactly one variable: the one it was taken for. Its rows are
/// restricted to those consistent with the variables already decided, and the heaviest
/// remaining row gives the state.
///
/// # Errors
/// * `BayesMapError::Backtrack` if a snapshot does not leave exactly its own variable undecided
fn backtrack(mut snapshots: Vec<Snapshot>) -> Result<Assignment> {
    let mut assignment = Assignment::new();

    while let Some(Snapshot { variable, factor }) = snapshots.pop() {
        let undecided: Vec<&String> = factor.scope()
                                            .iter()
                                            .filter(|v| ! assignment.contains(v))
                                            .collect();

        if undecided.len() != 1 || *undecided[0] != variable {
            return Err(BayesMapError::Backtrack(format!(
                "snapshot for `{}` leaves [{}] undecided",
                variable,
                undecided.iter().join(", ")
            )));
        }

        let best = best_row(factor.rows().iter().filter(|r| r.assignment().agrees_with(&assignment)))
            .ok_or_else(|| BayesMapError::Backtrack(format!(
                "no row of the snapshot for `{}` agrees with {}",
                variable,
                assignment
            )))?;

        let state = best.value(&variable).ok_or_else(|| BayesMapError::Backtrack(format!(
            "snapshot row {} does not assign `{}`",
            best.assignment(),
            variable
        )))?;

        trace!(variable = %variable, state, weight = best.weight(), decided = %assignment, "backtrack");
        assignment.set(&variable, state);
    }

    Ok(assignment)
}


impl<'a, M: Model> MapInferenceEngine for MapEliminationEngine<'a, M> {

    fn infer(&self, map_vars: &[&str]) -> Result<Assignment> {
        self.validate(map_vars)?;
        info!(
            map_vars = ?map_vars,
            evidence = %self.evidence,
            heuristic = %self.heuristic,
            "MAP query"
        );

        let raw = self.heuristic.order(self.model);
        let network: Vec<&str> = self.model.variables().iter().map(|v| v.name()).collect();
        let order = EliminationOrder::split(&raw, &network, map_vars, self.evidence)?;
        info!(nuisance = ?order.nuisance(), map = ?order.map(), "elimination order");

        let live = self.clamp_evidence()?;
        if live.is_empty() && ! order.is_empty() {
            return Err(BayesMapError::NoFactors);
        }

        let (_, snapshots) = eliminate(live, &order)?;
        let decided = backtrack(snapshots)?;

        let query: Vec<String> = map_vars.iter().map(|v| String::from(*v)).collect();
        let assignment = decided.restrict(&query);
        info!(assignment = %assignment, "MAP assignment");

        Ok(assignment)
    }

}
