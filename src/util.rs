//! Defines the `Error` type for the bayesmap library

use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, BayesMapError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum BayesMapError {

    /// Represents an incomplete assignment where a complete assignment was required.
    #[error("missing assignments to the required variables")]
    IncompleteAssignment,

    /// Represents an error where a certain constraint on a scope was not satisfied
    #[error("scope did not satisfy constraints: {0}")]
    InvalidScope(String),

    /// Rows handed to a `Factor` do not form a proper table over its scope
    #[error("invalid factor rows: {0}")]
    InvalidRows(String),

    /// Exactly what it sounds like
    #[error("encountered division by zero")]
    DivideByZero,

    /// Represents an error where there was a parent variable expected, but not found
    #[error("missing parent `{0}` from the model")]
    MissingParent(String),

    /// Represents a variable that was present multiple times in a situation where it should only
    /// have been present once
    #[error("variable `{0}` was encountered twice")]
    DuplicateVariable(String),

    /// Represents the situation when we expected a CPD but did not receive one
    #[error("requires a conditional probability distribution")]
    NotACPD,

    /// Represents an attempt to initialize a variable with an incompatible Initialization
    #[error("an invalid initialization was provided")]
    InvalidInitialization,

    /// Represents a situation in which a negative (or NaN, or infinite) probability was provided
    #[error("encountered a negative or non-finite probability")]
    NegativeProbability,

    /// A query named a variable the model does not contain
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// Evidence assigned a state outside the variable's domain
    #[error("unknown state `{state}` for variable `{variable}`")]
    UnknownState { variable: String, state: String },

    /// A MAP query listed the same variable more than once
    #[error("variable `{0}` is queried more than once")]
    DuplicateQueryVariable(String),

    /// A variable appears both as a MAP variable and in the evidence
    #[error("variable `{0}` is both queried and observed")]
    OverlappingQuery(String),

    /// There were variables left to eliminate but no factors to eliminate them from
    #[error("no factors left to eliminate from")]
    NoFactors,

    /// A variable due for elimination is not in the scope of any live factor
    #[error("internal error: malformed elimination order, `{0}` is in no live factor")]
    MalformedOrder(String),

    /// The snapshot stack could not be unwound into an assignment
    #[error("internal error: backtracking failed: {0}")]
    Backtrack(String),

}

impl BayesMapError {

    /// `true` if the error rejects the query itself; nothing was computed.
    pub fn is_invalid_query(&self) -> bool {
        match self {
            BayesMapError::UnknownVariable(_)
            | BayesMapError::UnknownState { .. }
            | BayesMapError::OverlappingQuery(_)
            | BayesMapError::DuplicateQueryVariable(_)
            | BayesMapError::NoFactors => true,
            _ => false
        }
    }

    /// `true` if the error is a broken invariant of the elimination engine rather than bad input.
    pub fn is_internal(&self) -> bool {
        match self {
            BayesMapError::MalformedOrder(_) | BayesMapError::Backtrack(_) => true,
            _ => false
        }
    }

}
