//! Defines a `DirectedModel`, which is a Bayesian model that represents the factorization of
//! a probability distribution P

use crate::factor::Factor;
use crate::init::Initialization;
use crate::util::{BayesMapError, Result};
use crate::variable::Variable;
use super::Model;

use indexmap::IndexMap;


/// One node of a `DirectedModel`: the `Variable`, its parents and its CPD
#[derive(Clone, Debug)]
struct Node {
    variable: Variable,
    parents: Vec<String>,
    cpd: Factor
}


/// Represents a Bayesian Network - a Directed Probabilistic Graphical Model.
///
/// # Representation
/// The network is represented as a Directed Acyclic Graph (DAG). A traditional graph data
/// structure is not used; instead, the parents recorded for each `Variable` (equivalently, the
/// scope of its CPD) implicitly define the edges of the graph. The `Variable`s are held in
/// their topological order to faciliate efficient computations over the graph.
///
/// A `DirectedModel` is a plain value owned by its caller. Queries never mutate it, so one
/// model can serve any number of queries, from any number of threads.
#[derive(Clone, Debug)]
pub struct DirectedModel {

    /// The nodes of the network keyed by variable name, in topological order
    graph: IndexMap<String, Node>

}

impl Model for DirectedModel {

    fn variables(&self) -> Vec<&Variable> {
        self.graph.values().map(|n| &n.variable).collect()
    }

    fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.graph.get(name).map(|n| &n.variable)
    }

    fn parents(&self, name: &str) -> Option<&[String]> {
        self.graph.get(name).map(|n| n.parents.as_slice())
    }

    fn cpd(&self, name: &str) -> Option<&Factor> {
        self.graph.get(name).map(|n| &n.cpd)
    }

    fn num_variables(&self) -> usize {
        self.graph.len()
    }
}


/// An implementation of the [builder pattern] for creating a `DirectedModel`.
///
/// At the moment, models must be assembled in topological order: every parent has to be added
/// before its children.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct DirectedModelBuilder {

    /// The nodes added so far
    graph: IndexMap<String, Node>,

    /// The error state of the builder
    err: Option<BayesMapError>

}


impl DirectedModelBuilder {

    /// Construct a new `DirectedModelBuilder` representing an empty `DirectedModel`
    pub fn new() -> Self {
        DirectedModelBuilder {
            graph: IndexMap::new(),
            err: None
        }
    }


    /// Add a `Variable` to the `DirectedModel`.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `parents`: the names of the parent variables, in CPD table axis order. The parents must
    ///   already be in the model.
    /// * `init`: the initialization mechanism for the CPD of `var` in the model.
    pub fn with_variable(mut self, var: Variable, parents: &[&str], init: Initialization) -> Self {
        ///////////////////////////////////////////////////////////////////////
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Check for error conditions
        if let Some(p) = parents.iter().find(|p| ! self.graph.contains_key(**p)) {
            self.err = Some(BayesMapError::MissingParent(String::from(*p)));
            return self;
        }

        if self.graph.contains_key(var.name()) {
            self.err = Some(BayesMapError::DuplicateVariable(String::from(var.name())));
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 3) Build the factor based on the initialization
        let factor = {
            let parent_vars: Vec<&Variable> = parents.iter()
                                                     .map(|p| &self.graph[*p].variable)
                                                     .collect();
            init.build_cpd(&var, &parent_vars)
        };

        let cpd = match factor {
            Ok(f) => f,
            Err(e) => {
                self.err = Some(e);
                return self;
            }
        };

        ///////////////////////////////////////////////////////////////////////
        // 4) Add to current model
        let node = Node {
            parents: parents.iter().map(|p| String::from(*p)).collect(),
            variable: var,
            cpd
        };
        self.graph.insert(String::from(node.variable.name()), node);

        self
    }


    /// Complete building the model.
    ///
    /// # Returns
    /// the `DirectedModel`, or the first error generated during the building process
    ///
    /// # Postcondition
    /// This call consumes the `DirectedModelBuilder`
    pub fn build(self) -> Result<DirectedModel> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(DirectedModel { graph: self.graph })
        }
    }
}

impl Default for DirectedModelBuilder {
    fn default() -> Self {
        DirectedModelBuilder::new()
    }
}
