//! Defines a `Model`, the read-only view of a Bayesian network that inference engines and
//! elimination heuristics work against.

use crate::factor::Factor;
use crate::util::{BayesMapError, Result};
use crate::variable::{Assignment, Variable};

/// The `Model` trait represents a discrete Bayesian network: its variables, the parent set of
/// each, and the conditional probability table of each.
///
/// Implementations are never mutated by inference. Engines copy the CPDs they work on.
pub trait Model {

    /// Get all `Variable`s in the model, in the model's (topological) order.
    fn variables(&self) -> Vec<&Variable>;


    /// Lookup a `Variable` in the `Model` based on the name
    fn lookup_variable(&self, name: &str) -> Option<&Variable>;


    /// Get the names of the parents of the named `Variable`
    fn parents(&self, name: &str) -> Option<&[String]>;


    /// Get the conditional probability table ```P(name | parents(name))```
    fn cpd(&self, name: &str) -> Option<&Factor>;


    /// Get the number of `Variable`s in the the `Model`
    fn num_variables(&self) -> usize;


    /// Get the names of the children of the named `Variable`, in variable order
    fn children(&self, name: &str) -> Vec<&str> {
        self.variables()
            .into_iter()
            .map(|v| v.name())
            .filter(|&child| self.parents(child).map_or(false, |ps| ps.iter().any(|p| p == name)))
            .collect()
    }


    /// The initial factors of the model: one CPD per `Variable`, in variable order.
    fn factors(&self) -> Vec<&Factor> {
        self.variables()
            .into_iter()
            .filter_map(|v| self.cpd(v.name()))
            .collect()
    }


    /// Determine the probability of a full `Assignment` to the `Variable`s in the `Model`.
    ///
    /// Specifically, this computes ```P(zeta)```, where ```zeta``` is a full assignment.
    ///
    /// # Args
    /// * `assignment`: a full `Assignment` to the `Model`
    ///
    /// # Returns
    /// the probability of the `Assignment` given the `Model`
    ///
    /// # Errors
    /// * `BayesMapError::IncompleteAssignment` if a variable is unassigned
    fn probability(&self, assignment: &Assignment) -> Result<f64> {
        if self.variables().iter().any(|v| ! assignment.contains(v.name())) {
            return Err(BayesMapError::IncompleteAssignment);
        }

        // multiply the CPD entries together by the chain rule
        // but if there are any errors, just return the error
        self.factors()
            .iter()
            .map(|cpt| cpt.value(assignment))
            .fold(Ok(1.0), |acc, val| acc.and_then(|p| val.map(|v| p * v)))
    }
}

pub mod directed;
