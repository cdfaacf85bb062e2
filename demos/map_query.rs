//! Provides an example of how to use bayesmap to answer a MAP query on a Bayesian Network.
//!
//! Run with `RUST_LOG=bayesmap=debug` to follow every multiplication, summation and
//! maximization, or `RUST_LOG=bayesmap=trace` to see the backtracking as well.

use bayesmap as bm;
use bm::MapInferenceEngine;
use ndarray::array;
use tracing_subscriber::EnvFilter;

fn main() -> bm::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let model = build_model()?;

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence
    let mut evidence = bm::Assignment::new();
    evidence.set("JohnCalls", "True");
    evidence.set("MaryCalls", "True");

    /////////////////////////////////////////////////////
    // Step 3: Run the MAP query with each elimination heuristic
    let map_vars = ["Burglary", "Earthquake"];

    for &heuristic in bm::EliminationHeuristic::ALL.iter() {
        let engine = bm::MapEliminationEngine::new(&model, &evidence).with_heuristic(heuristic);
        let map = engine.infer(&map_vars)?;

        println!("MAP(Burglary, Earthquake | JohnCalls, MaryCalls) [{}] = {}", heuristic, map);
    }

    Ok(())
}

/// The burglary network of Russell & Norvig Figure 14.2
fn build_model() -> bm::Result<bm::DirectedModel> {
    bm::DirectedModelBuilder::new()
        .with_variable(bm::Variable::binary("Burglary"), &[], bm::Initialization::Binomial(0.01))
        .with_variable(bm::Variable::binary("Earthquake"), &[], bm::Initialization::Binomial(0.02))
        .with_variable(
            bm::Variable::binary("Alarm"),
            &["Burglary", "Earthquake"],
            bm::Initialization::Table(
                array![[[0.95, 0.05], [0.94, 0.06]],
                       [[0.29, 0.71], [0.001, 0.999]]].into_dyn()
            )
        )
        .with_variable(
            bm::Variable::binary("JohnCalls"),
            &["Alarm"],
            bm::Initialization::Table(array![[0.9, 0.1], [0.05, 0.95]].into_dyn())
        )
        .with_variable(
            bm::Variable::binary("MaryCalls"),
            &["Alarm"],
            bm::Initialization::Table(array![[0.7, 0.3], [0.01, 0.99]].into_dyn())
        )
        .build()
}
