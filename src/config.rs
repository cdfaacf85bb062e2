//! Query configuration and JSON query files.
//!
//! A query file holds named MAP queries:
//!
//! ```json
//! {
//!   "queries": [
//!     { "name": "alarm", "map_vars": ["Alarm"], "evidence": { "Burglary": "True" } },
//!     { "name": "calls", "map_vars": ["Burglary"], "heuristic": "fewest-factors",
//!       "evidence": { "JohnCalls": "True", "MaryCalls": "True" } }
//!   ]
//! }
//! ```
//!
//! Answers are a JSON object from query name to the MAP assignment, e.g.
//! ```{ "alarm": { "Alarm": "True" } }```.

use crate::inference::{EliminationHeuristic, MapEliminationEngine, MapInferenceEngine};
use crate::model::Model;
use crate::util::Result;
use crate::variable::Assignment;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;


/// Settings of the MAP elimination engine
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// The elimination order heuristic. `None` selects the default.
    pub heuristic: Option<EliminationHeuristic>
}

impl MapConfig {

    pub fn new(heuristic: EliminationHeuristic) -> Self {
        MapConfig { heuristic: Some(heuristic) }
    }

    /// The heuristic to use: the configured one, or `EliminationHeuristic::default()`
    pub fn resolved_heuristic(&self) -> EliminationHeuristic {
        self.heuristic.unwrap_or_default()
    }
}


/// One MAP query: the variables to decide and the evidence to condition on
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapQuery {
    pub map_vars: Vec<String>,

    #[serde(default)]
    pub evidence: Assignment,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<EliminationHeuristic>
}

impl MapQuery {

    pub fn new(map_vars: &[&str], evidence: Assignment) -> Self {
        MapQuery {
            map_vars: map_vars.iter().map(|v| String::from(*v)).collect(),
            evidence,
            heuristic: None
        }
    }

    pub fn with_heuristic(mut self, heuristic: EliminationHeuristic) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    pub fn config(&self) -> MapConfig {
        MapConfig { heuristic: self.heuristic }
    }

    /// Answer the query over `model`.
    ///
    /// # Errors
    /// Any error of `MapInferenceEngine::infer`
    pub fn run<M: Model>(&self, model: &M) -> Result<Assignment> {
        let map_vars: Vec<&str> = self.map_vars.iter().map(|v| v.as_str()).collect();

        MapEliminationEngine::new(model, &self.evidence)
            .with_config(&self.config())
            .infer(&map_vars)
    }
}


/// A `MapQuery` with a name to report its answer under
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedQuery {
    pub name: String,

    #[serde(flatten)]
    pub query: MapQuery
}


/// The answers to a `QuerySet`, keyed by query name, in query order
pub type Answers = IndexMap<String, Assignment>;


/// A collection of named queries, as read from a query file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySet {
    pub queries: Vec<NamedQuery>
}

impl QuerySet {

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Answer every query over `model`, stopping at the first failure.
    pub fn run<M: Model>(&self, model: &M) -> Result<Answers> {
        let mut answers = Answers::new();

        for q in self.queries.iter() {
            let assignment = q.query.run(model)?;
            info!(query = %q.name, assignment = %assignment, "answered");
            answers.insert(q.name.clone(), assignment);
        }

        Ok(answers)
    }
}


/// Parse an answers file
pub fn answers_from_json(json: &str) -> serde_json::Result<Answers> {
    serde_json::from_str(json)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::Initialization;
    use crate::model::directed::{DirectedModel, DirectedModelBuilder};
    use crate::util::BayesMapError;
    use crate::variable::Variable;

    fn burglary_alarm() -> DirectedModel {
        DirectedModelBuilder::new()
            .with_variable(Variable::binary("Burglary"), &[], Initialization::Binomial(0.01))
            .with_variable(
                Variable::binary("Alarm"),
                &["Burglary"],
                Initialization::Table(array![[0.9, 0.1], [0.1, 0.9]].into_dyn())
            )
            .build()
            .unwrap()
    }

    #[test]
    fn default_heuristic() {
        assert_eq!(EliminationHeuristic::LeastIncomingArcs, MapConfig::default().resolved_heuristic());

        let config: MapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(None, config.heuristic);

        let config: MapConfig = serde_json::from_str(r#"{"heuristic": "fewest-factors"}"#).unwrap();
        assert_eq!(MapConfig::new(EliminationHeuristic::FewestFactors), config);
        assert_eq!(EliminationHeuristic::FewestFactors, config.resolved_heuristic());

        assert!(serde_json::from_str::<MapConfig>(r#"{"heuristic": "min-fill"}"#).is_err());
    }

    #[test]
    fn parse_query_set() {
        let json = r#"{
            "queries": [
                { "name": "observed", "map_vars": ["Alarm"], "evidence": { "Burglary": "True" } },
                { "name": "prior", "map_vars": ["Burglary"], "heuristic": "fewest-factors" }
            ]
        }"#;

        let set = QuerySet::from_json(json).unwrap();
        assert_eq!(2, set.queries.len());

        let observed = &set.queries[0];
        assert_eq!("observed", observed.name);
        assert_eq!(vec![String::from("Alarm")], observed.query.map_vars);
        assert_eq!(Some("True"), observed.query.evidence.get("Burglary"));
        assert_eq!(None, observed.query.heuristic);

        let prior = &set.queries[1];
        assert!(prior.query.evidence.is_empty());
        assert_eq!(Some(EliminationHeuristic::FewestFactors), prior.query.heuristic);

        // and back again
        let again = QuerySet::from_json(&set.to_json_pretty().unwrap()).unwrap();
        assert_eq!(set, again);
    }

    #[test]
    fn run_query_set() {
        let set = QuerySet {
            queries: vec![
                NamedQuery {
                    name: String::from("observed"),
                    query: MapQuery::new(&["Alarm"], vec![("Burglary", "True")].into_iter().collect())
                },
                NamedQuery {
                    name: String::from("prior"),
                    query: MapQuery::new(&["Burglary"], Assignment::new())
                        .with_heuristic(EliminationHeuristic::FewestFactors)
                }
            ]
        };

        let answers = set.run(&burglary_alarm()).unwrap();
        let expected = answers_from_json(
            r#"{ "observed": { "Alarm": "True" }, "prior": { "Burglary": "False" } }"#
        ).unwrap();

        assert_eq!(expected, answers);
        assert_eq!(vec!["observed", "prior"], answers.keys().collect::<Vec<_>>());
    }

    #[test]
    fn failing_query() {
        let query = MapQuery::new(&["Alarm"], vec![("Burglary", "Maybe")].into_iter().collect());

        match query.run(&burglary_alarm()) {
            Err(BayesMapError::UnknownState { .. }) => (),
            r => panic!("wrong result {:?}", r)
        };
    }
}
