//! Definition of the factor module
//!
//! A `Factor` represents a relationship between some set of `Variable`s: a table mapping every
//! full assignment over its scope to a non-negative weight. Factors are stored as explicit
//! (assignment, weight) rows so that every join, filter and grouping below works on variable
//! names rather than on table axes.

use crate::util::{BayesMapError, Result};
use crate::variable::{all_assignments, Assignment, Variable};

use indexmap::map::Entry;
use indexmap::IndexMap;
use ndarray::prelude as nd;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::mem;


/// Alias f64 ndarray::ArrayD as Table
pub type Table = nd::ArrayD<f64>;

/// Tolerance used when checking that a table is a conditional probability distribution
const CPD_TOLERANCE: f64 = 0.001;


/// One entry of a `Factor`: a full assignment over the factor's scope and its weight
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    assignment: Assignment,
    weight: f64
}

impl Row {

    pub fn new(assignment: Assignment, weight: f64) -> Self {
        Row { assignment, weight }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The state this row assigns to `var`
    pub fn value(&self, var: &str) -> Option<&str> {
        self.assignment.get(var)
    }
}


/// A table factor over a scope of named variables.
///
/// # Invariants
/// * every row assigns exactly the variables of the scope
/// * no two rows share an assignment
/// * all weights are non-negative
///
/// A `Factor` with an empty scope is *trivial*: it holds a single scalar and says nothing about
/// any variable.
///
/// The algebraic operations mutate the `Factor` in place. Call `clone` first to keep a copy;
/// the clone shares no state with the original.
#[derive(Clone, Debug, PartialEq)]
pub struct Factor {
    /// The names of the variables the `Factor` depends on, in column order
    scope: Vec<String>,

    /// The entries of the table
    rows: Vec<Row>
}


impl Factor {

    /// Create a new `Factor` from a table whose axes follow `scope`.
    ///
    /// # Args
    /// * `scope`: the `Variable`s of the `Factor`. Axis `i` of `table` ranges over the states of
    ///   `scope[i]`.
    /// * `table`: the weights
    ///
    /// # Errors
    /// * `BayesMapError::InvalidScope` if the scope is empty or does not match the table shape
    /// * `BayesMapError::DuplicateVariable` if a variable appears twice in the scope
    /// * `BayesMapError::NegativeProbability` if the table holds a negative or non-finite weight
    pub fn new(scope: &[&Variable], table: Table) -> Result<Self> {
        if scope.is_empty() {
            return Err(BayesMapError::InvalidScope(String::from("scope may not be empty")));
        } else if scope.len() != table.ndim() {
            return Err(BayesMapError::InvalidScope(format!(
                "scope has {} variables but the table has {} dimensions",
                scope.len(),
                table.ndim()
            )));
        }

        for (v, &t) in scope.iter().zip(table.shape().iter()) {
            if v.cardinality() != t {
                return Err(BayesMapError::InvalidScope(format!(
                    "`{}` has {} states but its table axis has length {}",
                    v.name(),
                    v.cardinality(),
                    t
                )));
            }
        }

        let mut seen = HashSet::new();
        for v in scope.iter() {
            if ! seen.insert(v.name()) {
                return Err(BayesMapError::DuplicateVariable(String::from(v.name())));
            }
        }

        // factors may only hold finite, non-negative values
        if table.iter().any(|&w| ! valid_weight(w)) {
            return Err(BayesMapError::NegativeProbability);
        }

        let rows = all_assignments(scope)
            .zip(table.iter())
            .map(|(assignment, &weight)| Row::new(assignment, weight))
            .collect();

        Ok(Factor {
            scope: scope.iter().map(|v| String::from(v.name())).collect(),
            rows
        })
    }


    /// Create a Conditional Probability Distribution ```P(var | parents)```.
    ///
    /// The axes of `table` are the parents, in order, followed by `var`; every slice along the
    /// last axis must sum to 1.
    ///
    /// # Errors
    /// Any error of `Factor::new`, or `BayesMapError::NotACPD` if a slice does not sum to 1.
    pub fn cpd(var: &Variable, parents: &[&Variable], table: Table) -> Result<Self> {
        let mut scope: Vec<&Variable> = parents.to_vec();
        scope.push(var);

        if table.ndim() == scope.len() {
            let ax = nd::Axis(table.ndim() - 1);
            if table.lanes(ax).into_iter().any(|lane| ! ((lane.sum() - 1.0).abs() <= CPD_TOLERANCE)) {
                return Err(BayesMapError::NotACPD);
            }
        }

        Factor::new(&scope, table)
    }


    /// Create a `Factor` from explicit rows.
    ///
    /// # Errors
    /// * `BayesMapError::DuplicateVariable` if a variable appears twice in the scope
    /// * `BayesMapError::InvalidRows` if a row does not assign exactly the scope, two rows share
    ///   an assignment, or a trivial factor has more than one row
    /// * `BayesMapError::NegativeProbability` if a weight is negative or not finite
    pub fn from_rows(scope: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = HashSet::new();
        for v in scope.iter() {
            if ! seen.insert(v.as_str()) {
                return Err(BayesMapError::DuplicateVariable(v.clone()));
            }
        }

        if scope.is_empty() && rows.len() > 1 {
            return Err(BayesMapError::InvalidRows(String::from(
                "a factor with an empty scope holds at most one row"
            )));
        }

        let mut keys = HashSet::new();
        for row in rows.iter() {
            if ! valid_weight(row.weight) {
                return Err(BayesMapError::NegativeProbability);
            }

            if row.assignment.len() != scope.len()
                || scope.iter().any(|v| ! row.assignment.contains(v)) {
                return Err(BayesMapError::InvalidRows(format!(
                    "row {} does not assign exactly [{}]",
                    row.assignment,
                    scope.join(", ")
                )));
            }

            if ! keys.insert(key(&row.assignment, &scope)) {
                return Err(BayesMapError::InvalidRows(format!(
                    "assignment {} appears twice",
                    row.assignment
                )));
            }
        }

        Ok(Factor { scope, rows })
    }


    /// Retrieve the scope of the `Factor`, in column order.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }


    /// Retrieve the rows of the `Factor`.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }


    /// Check if `var` is in the scope of the `Factor`
    pub fn contains(&self, var: &str) -> bool {
        self.scope.iter().any(|v| v == var)
    }


    /// Check if the `Factor` is trivial, i.e. has an empty scope
    pub fn is_trivial(&self) -> bool {
        self.scope.is_empty()
    }


    /// The sum of all weights in the `Factor`
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.weight).sum()
    }


    /// The row with the largest weight. Ties go to the earliest row.
    pub fn argmax(&self) -> Option<&Row> {
        best_row(self.rows.iter())
    }


    /// Retrieve the value for a complete assignment over the scope of this `Factor`
    ///
    /// # Args
    /// assignment: a full assignment to the scope of a `Factor`. The assignment's scope  may be a
    ///             superset  of the `Factor`s scope.
    ///
    /// # Returns
    /// the weight of the matching row. Assignments with no row (e.g. filtered out by `reduce`)
    /// have weight 0.
    ///
    /// # Errors
    /// * `BayesMapError::IncompleteAssignment`, if assignment is not a complete assignment to the
    ///   scope of the `Factor`
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        if self.scope.iter().any(|v| ! assignment.contains(v)) {
            return Err(BayesMapError::IncompleteAssignment);
        }

        Ok(self.rows
               .iter()
               .find(|r| r.assignment.agrees_with(assignment))
               .map_or(0.0, |r| r.weight))
    }


    /// Reduce the `Factor` by the observation ```variable = value```.
    ///
    /// Defined in Koller & Friedman 4.2.3
    ///
    /// Keeps the rows consistent with the observation and drops `variable` from the scope. If
    /// the scope becomes empty the `Factor` is trivial.
    ///
    /// # Errors
    /// * `BayesMapError::InvalidScope` if `variable` is not in the scope
    pub fn reduce(&mut self, variable: &str, value: &str) -> Result<()> {
        let idx = self.position(variable)?;

        self.rows.retain(|r| r.assignment.get(variable) == Some(value));
        for row in self.rows.iter_mut() {
            row.assignment.remove(variable);
        }
        self.scope.remove(idx);

        Ok(())
    }


    /// Product of this `Factor` and another `Factor` that share `variable`.
    ///
    /// Defined in Koller & Friedman Section 4.2.1
    ///
    /// The product is a natural join over *every* variable the two scopes share: rows that
    /// agree on all shared variables are combined and their weights multiplied. This `Factor`
    /// becomes the product, with scope ```self.scope() U other.scope()```.
    ///
    /// # Args
    /// * `other`: the `Factor` to multiply with. It is consumed.
    /// * `variable`: the variable the caller is joining on.
    ///
    /// # Errors
    /// * `BayesMapError::InvalidScope`, if `variable` is not in both scopes
    pub fn multiply(&mut self, other: Factor, variable: &str) -> Result<()> {
        if ! self.contains(variable) || ! other.contains(variable) {
            return Err(BayesMapError::InvalidScope(format!(
                "`{}` is not shared by [{}] and [{}]",
                variable,
                self.scope.join(", "),
                other.scope.join(", ")
            )));
        }

        let shared: Vec<String> = self.scope
                                      .iter()
                                      .filter(|v| other.contains(v))
                                      .cloned()
                                      .collect();

        // index the other factor's rows by their shared-variable states
        let mut index: HashMap<Vec<String>, Vec<&Row>> = HashMap::new();
        for row in other.rows.iter() {
            index.entry(key(&row.assignment, &shared)).or_insert_with(Vec::new).push(row);
        }

        let mut rows = Vec::new();
        for mine in self.rows.iter() {
            if let Some(matches) = index.get(&key(&mine.assignment, &shared)) {
                for theirs in matches.iter() {
                    rows.push(Row::new(
                        mine.assignment.merge(&theirs.assignment),
                        mine.weight * theirs.weight
                    ));
                }
            }
        }

        for v in other.scope.iter() {
            if ! self.contains(v) {
                self.scope.push(v.clone());
            }
        }
        self.rows = rows;

        Ok(())
    }


    /// Sum `variable` out of the `Factor`.
    ///
    /// Defined in Koller & Friedman 9.3.1
    ///
    /// # Errors
    /// * `BayesMapError::InvalidScope` if `variable` is not in the scope
    pub fn marginalize(&mut self, variable: &str) -> Result<()> {
        self.collapse(variable, |acc, row| acc.weight += row.weight)
    }


    /// Max `variable` out of the `Factor`, keeping the largest weight for each assignment to
    /// the rest of the scope.
    ///
    /// Defined in Koller & Friedman 13.2.1
    ///
    /// The state of `variable` that achieved the maximum is *not* recorded. Take a copy of the
    /// `Factor` beforehand if it has to be recovered.
    ///
    /// # Errors
    /// * `BayesMapError::InvalidScope` if `variable` is not in the scope, or if it is the only
    ///   variable in the scope
    pub fn maximize(&mut self, variable: &str) -> Result<()> {
        if self.scope.len() < 2 {
            return Err(BayesMapError::InvalidScope(format!(
                "cannot maximize `{}` out of a factor over [{}]",
                variable,
                self.scope.join(", ")
            )));
        }

        self.collapse(variable, |acc, row| {
            if row.weight > acc.weight {
                *acc = row;
            }
        })
    }


    /// Rescale the weights so that they sum to 1.
    ///
    /// # Errors
    /// * `BayesMapError::DivideByZero` if every weight is 0
    pub fn normalize(&mut self) -> Result<()> {
        let z = self.total();
        if z == 0.0 {
            return Err(BayesMapError::DivideByZero);
        }

        for row in self.rows.iter_mut() {
            row.weight /= z;
        }

        Ok(())
    }


    /// Index of `variable` in the scope
    fn position(&self, variable: &str) -> Result<usize> {
        self.scope.iter().position(|v| v == variable).ok_or_else(|| {
            BayesMapError::InvalidScope(format!(
                "`{}` is not in the scope [{}]",
                variable,
                self.scope.join(", ")
            ))
        })
    }


    /// Remove `variable` from the scope, merging the rows that become identical with `combine`.
    /// Groups keep the order in which they first appear.
    fn collapse<F>(&mut self, variable: &str, combine: F) -> Result<()>
        where F: Fn(&mut Row, Row)
    {
        let idx = self.position(variable)?;
        self.scope.remove(idx);

        let mut groups: IndexMap<Vec<String>, Row> = IndexMap::new();
        for mut row in mem::replace(&mut self.rows, Vec::new()) {
            row.assignment.remove(variable);
            match groups.entry(key(&row.assignment, &self.scope)) {
                Entry::Occupied(mut e) => combine(e.get_mut(), row),
                Entry::Vacant(e) => {
                    e.insert(row);
                }
            }
        }

        self.rows = groups.into_iter().map(|(_, row)| row).collect();
        Ok(())
    }

}


/// NaN and infinities fail this as well as negative weights
fn valid_weight(w: f64) -> bool {
    w >= 0.0 && w.is_finite()
}


/// The states of `vars` in `assignment`, in the order of `vars`
fn key(assignment: &Assignment, vars: &[String]) -> Vec<String> {
    vars.iter()
        .map(|v| assignment.get(v).map(String::from).unwrap_or_default())
        .collect()
}


/// The first row with the largest weight
pub(crate) fn best_row<'a, I>(rows: I) -> Option<&'a Row>
    where I: Iterator<Item = &'a Row>
{
    rows.fold(None, |best: Option<&Row>, row| match best {
        Some(b) if b.weight >= row.weight => Some(b),
        _ => Some(row)
    })
}


impl fmt::Display for Factor {

    /// Render the `Factor` as a table with one column per scope variable and a final `prob`
    /// column.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let weights: Vec<String> = self.rows.iter().map(|r| format!("{:.6}", r.weight)).collect();

        let mut widths: Vec<usize> = self.scope
            .iter()
            .map(|v| {
                self.rows
                    .iter()
                    .map(|r| r.value(v).map_or(0, |s| s.len()))
                    .chain(Some(v.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        widths.push(weights.iter().map(|w| w.len()).chain(Some(4)).max().unwrap_or(4));

        let header: Vec<String> = self.scope
            .iter()
            .map(|v| v.as_str())
            .chain(Some("prob"))
            .zip(widths.iter())
            .map(|(h, &w)| format!("{:<w$}", h, w = w))
            .collect();
        write!(f, "{}", header.join("  ").trim_end())?;

        for (row, weight) in self.rows.iter().zip(weights.iter()) {
            let cells: Vec<String> = self.scope
                .iter()
                .map(|v| row.value(v).unwrap_or(""))
                .chain(Some(weight.as_str()))
                .zip(widths.iter())
                .map(|(c, &w)| format!("{:<w$}", c, w = w))
                .collect();
            write!(f, "\n{}", cells.join("  ").trim_end())?;
        }

        Ok(())
    }

}
