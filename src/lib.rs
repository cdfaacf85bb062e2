//! MAP queries over discrete Bayesian networks by variable elimination.
//!
//! Build a network with `DirectedModelBuilder`, bind the evidence in a `MapEliminationEngine`
//! and ask it for the most probable assignment to the query variables:
//!
//! ```
//! use bayesmap::{Assignment, DirectedModelBuilder, Initialization, MapEliminationEngine,
//!                MapInferenceEngine, Variable};
//!
//! let model = DirectedModelBuilder::new()
//!     .with_variable(Variable::binary("Burglary"), &[], Initialization::Binomial(0.01))
//!     .with_variable(
//!         Variable::binary("Alarm"),
//!         &["Burglary"],
//!         Initialization::Table(ndarray::array![[0.9, 0.1], [0.1, 0.9]].into_dyn())
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut evidence = Assignment::new();
//! evidence.set("Burglary", "True");
//!
//! let map = MapEliminationEngine::new(&model, &evidence).infer(&["Alarm"]).unwrap();
//! assert_eq!(Some("True"), map.get("Alarm"));
//! ```

#[cfg_attr(test, macro_use)]
extern crate itertools;
#[macro_use]
extern crate ndarray;

pub mod variable;
pub mod factor;
pub mod init;
pub mod model;
pub mod inference;
pub mod config;
pub mod util;

pub use config::{MapConfig, MapQuery, NamedQuery, QuerySet};
pub use factor::{Factor, Row, Table};
pub use inference::{EliminationHeuristic, EliminationOrder, MapEliminationEngine, MapInferenceEngine};
pub use init::Initialization;
pub use model::directed::{DirectedModel, DirectedModelBuilder};
pub use model::Model;
pub use util::{BayesMapError, Result};
pub use variable::{all_assignments, Assignment, Variable};
