//! Networks and a brute force MAP oracle shared by the integration tests
#![allow(dead_code)]

use bayesmap::{all_assignments, Assignment, DirectedModel, DirectedModelBuilder, Initialization,
               Model, Variable};
use indexmap::IndexMap;
use ndarray::array;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn table(t: ndarray::Array2<f64>) -> Initialization<'static> {
    Initialization::Table(t.into_dyn())
}

/// Russell & Norvig Figure 14.2
pub fn earthquake() -> DirectedModel {
    DirectedModelBuilder::new()
        .with_variable(Variable::binary("Burglary"), &[], Initialization::Binomial(0.01))
        .with_variable(Variable::binary("Earthquake"), &[], Initialization::Binomial(0.02))
        .with_variable(
            Variable::binary("Alarm"),
            &["Burglary", "Earthquake"],
            Initialization::Table(
                array![[[0.95, 0.05], [0.94, 0.06]],
                       [[0.29, 0.71], [0.001, 0.999]]].into_dyn()
            )
        )
        .with_variable(Variable::binary("JohnCalls"), &["Alarm"], table(array![[0.9, 0.1], [0.05, 0.95]]))
        .with_variable(Variable::binary("MaryCalls"), &["Alarm"], table(array![[0.7, 0.3], [0.01, 0.99]]))
        .build()
        .unwrap()
}

/// Poole & Mackworth Example 8.15
pub fn fire() -> DirectedModel {
    DirectedModelBuilder::new()
        .with_variable(Variable::binary("Tampering"), &[], Initialization::Binomial(0.02))
        .with_variable(Variable::binary("Fire"), &[], Initialization::Binomial(0.01))
        .with_variable(
            Variable::binary("Alarm"),
            &["Tampering", "Fire"],
            Initialization::Table(
                array![[[0.5, 0.5], [0.85, 0.15]],
                       [[0.99, 0.01], [0.0001, 0.9999]]].into_dyn()
            )
        )
        .with_variable(Variable::binary("Smoke"), &["Fire"], table(array![[0.9, 0.1], [0.01, 0.99]]))
        .with_variable(Variable::binary("Leaving"), &["Alarm"], table(array![[0.88, 0.12], [0.001, 0.999]]))
        .with_variable(Variable::binary("Report"), &["Leaving"], table(array![[0.75, 0.25], [0.01, 0.99]]))
        .build()
        .unwrap()
}

/// A network of `n` variables with two or three states, random parents among the earlier
/// variables and seeded CPDs. The same seed always gives the same network.
pub fn random_network(seed: u64, n: usize) -> DirectedModel {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = DirectedModelBuilder::new();
    let mut names: Vec<String> = Vec::new();

    for i in 0..n {
        let name = format!("V{}", i);
        let card = rng.gen_range(2..=3);
        let parents: Vec<&str> = names.iter()
                                      .filter(|_| rng.gen_bool(0.4))
                                      .take(3)
                                      .map(|p| p.as_str())
                                      .collect();

        builder = builder.with_variable(
            Variable::discrete(&name, card),
            &parents,
            Initialization::Seeded(seed.wrapping_add(i as u64))
        );
        names.push(name);
    }

    builder.build().unwrap()
}

/// A random query over `model`: at least one MAP variable, some observed variables
pub fn random_query(seed: u64, model: &DirectedModel) -> (Vec<String>, Assignment) {
    let mut rng = StdRng::seed_from_u64(seed.rotate_left(17));
    let mut map_vars = Vec::new();
    let mut evidence = Assignment::new();

    for v in model.variables() {
        match rng.gen_range(0..3) {
            0 => map_vars.push(String::from(v.name())),
            1 => {
                let state = &v.states()[rng.gen_range(0..v.cardinality())];
                evidence.set(v.name(), state);
            },
            _ => ()
        }
    }

    if map_vars.is_empty() {
        let first = String::from(model.variables()[0].name());
        evidence.remove(&first);
        map_vars.push(first);
    }

    (map_vars, evidence)
}

/// ```P(map, evidence)```, summing the full joint over every other variable
pub fn joint<M: Model>(model: &M, map: &Assignment, evidence: &Assignment) -> f64 {
    all_assignments(&model.variables())
        .filter(|a| map.agrees_with(a) && evidence.agrees_with(a))
        .map(|a| model.probability(&a).unwrap())
        .sum()
}

/// The largest ```P(map, evidence)``` over every assignment to `map_vars`
pub fn best_joint<M: Model>(model: &M, map_vars: &[&str], evidence: &Assignment) -> f64 {
    let scope: Vec<String> = map_vars.iter().map(|v| String::from(*v)).collect();
    let mut sums: IndexMap<String, f64> = IndexMap::new();

    for a in all_assignments(&model.variables()).filter(|a| evidence.agrees_with(a)) {
        let p = model.probability(&a).unwrap();
        *sums.entry(a.restrict(&scope).to_string()).or_insert(0.0) += p;
    }

    sums.values().cloned().fold(0.0, f64::max)
}

pub fn assignment(pairs: &[(&str, &str)]) -> Assignment {
    pairs.iter().cloned().collect()
}
