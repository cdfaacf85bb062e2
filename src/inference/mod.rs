//! Defines the interface to inference engines

use crate::util::Result;
use crate::variable::Assignment;

mod order;
mod variable_elimination;

pub use self::order::{EliminationHeuristic, EliminationOrder};
pub use self::variable_elimination::MapEliminationEngine;


/// A `MapInferenceEngine` is capable of answering Maximum a posteriori queries:
///     ```MAP(Y | E = e) = argmax_y P(Y = y | E = e)```
///
/// `MapInferenceEngine`s are stateful and must take the evidence `e` as an argument to whatever
/// construction mechanism they employ.
pub trait MapInferenceEngine {

    /// Infer the most probable assignment `Y = y` to the named variables given the evidence.
    ///
    /// The returned `Assignment` covers exactly `variables`.
    fn infer(&self, variables: &[&str]) -> Result<Assignment>;

}


#[cfg(test)]
/// Tests for the inference engines in this module. Tests are hoisted here to avoid duplication.
/// Any tests specific to the inference engine are held within that submodule's tests module.
///
/// The alarm networks are the textbook burglary/earthquake network of Russell & Norvig Figure
/// 14.2 and the fire/tampering network of Poole & Mackworth Example 8.15.
mod tests {
    use super::*;
    use crate::init::Initialization;
    use crate::model::directed::{DirectedModel, DirectedModelBuilder};
    use crate::model::Model;
    use crate::variable::Variable;

    fn assignment(pairs: &[(&str, &str)]) -> Assignment {
        pairs.iter().cloned().collect()
    }

    fn table(t: ndarray::Array2<f64>) -> Initialization<'static> {
        Initialization::Table(t.into_dyn())
    }

    /// Burglary -> Alarm
    fn burglary_alarm() -> DirectedModel {
        DirectedModelBuilder::new()
            .with_variable(Variable::binary("Burglary"), &[], Initialization::Binomial(0.01))
            .with_variable(
                Variable::binary("Alarm"),
                &["Burglary"],
                table(array![[0.9, 0.1], [0.1, 0.9]])
            )
            .build()
            .unwrap()
    }

    /// A -> B -> C
    fn chain() -> DirectedModel {
        DirectedModelBuilder::new()
            .with_variable(Variable::binary("A"), &[], Initialization::Binomial(0.6))
            .with_variable(Variable::binary("B"), &["A"], table(array![[0.7, 0.3], [0.2, 0.8]]))
            .with_variable(Variable::binary("C"), &["B"], table(array![[0.9, 0.1], [0.3, 0.7]]))
            .build()
            .unwrap()
    }

    fn earthquake() -> DirectedModel {
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
            .with_variable(
                Variable::binary("JohnCalls"),
                &["Alarm"],
                table(array![[0.9, 0.1], [0.05, 0.95]])
            )
            .with_variable(
                Variable::binary("MaryCalls"),
                &["Alarm"],
                table(array![[0.7, 0.3], [0.01, 0.99]])
            )
            .build()
            .unwrap()
    }

    fn fire() -> DirectedModel {
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
            .with_variable(
                Variable::binary("Leaving"),
                &["Alarm"],
                table(array![[0.88, 0.12], [0.001, 0.999]])
            )
            .with_variable(
                Variable::binary("Report"),
                &["Leaving"],
                table(array![[0.75, 0.25], [0.01, 0.99]])
            )
            .build()
            .unwrap()
    }

    /// Run a query with every heuristic and check that they agree on `expected`
    fn check(model: &DirectedModel, map_vars: &[&str], evidence: &[(&str, &str)], expected: &[(&str, &str)]) {
        let evidence = assignment(evidence);
        let expected = assignment(expected);

        for name in EliminationHeuristic::NAMES.iter() {
            let heuristic: EliminationHeuristic = name.parse().unwrap();
            let engine = MapEliminationEngine::new(model, &evidence).with_heuristic(heuristic);

            let result = engine.infer(map_vars).unwrap();
            assert_eq!(expected, result, "heuristic {}", heuristic);
            assert_eq!(map_vars.len(), result.len());
        }
    }

    #[test]
    fn observed_cause() {
        check(&burglary_alarm(), &["Alarm"], &[("Burglary", "True")], &[("Alarm", "True")]);
    }

    #[test]
    fn prior_dominates() {
        check(&burglary_alarm(), &["Burglary"], &[], &[("Burglary", "False")]);
    }

    #[test]
    fn chain_backtracking() {
        let model = chain();

        check(&model, &["A", "B"], &[("C", "True")], &[("A", "True"), ("B", "True")]);
        check(&model, &["A"], &[("C", "False")], &[("A", "False")]);
        check(&model, &["B", "A"], &[("C", "False")], &[("A", "False"), ("B", "False")]);
        check(&model, &["A", "B", "C"], &[], &[("A", "True"), ("B", "True"), ("C", "True")]);
    }

    #[test]
    fn earthquake_queries() {
        let model = earthquake();

        check(&model, &["Alarm"], &[("Burglary", "True")], &[("Alarm", "True")]);
        check(
            &model,
            &["Burglary", "Earthquake"],
            &[("JohnCalls", "True"), ("MaryCalls", "True")],
            &[("Burglary", "True"), ("Earthquake", "False")]
        );
        check(
            &model,
            &["Burglary"],
            &[("JohnCalls", "True"), ("MaryCalls", "True")],
            &[("Burglary", "True")]
        );
        check(
            &model,
            &["Alarm", "Burglary"],
            &[("MaryCalls", "True")],
            &[("Alarm", "False"), ("Burglary", "False")]
        );
        check(
            &model,
            &["JohnCalls", "MaryCalls"],
            &[],
            &[("JohnCalls", "False"), ("MaryCalls", "False")]
        );
        check(
            &model,
            &["Earthquake", "Alarm"],
            &[("JohnCalls", "True")],
            &[("Earthquake", "False"), ("Alarm", "False")]
        );
    }

    #[test]
    fn fire_queries() {
        let model = fire();

        check(
            &model,
            &["Tampering"],
            &[("Smoke", "True"), ("Report", "True")],
            &[("Tampering", "False")]
        );
        check(
            &model,
            &["Tampering", "Report"],
            &[("Smoke", "True")],
            &[("Tampering", "False"), ("Report", "False")]
        );
        check(
            &model,
            &["Fire", "Alarm"],
            &[("Report", "True")],
            &[("Fire", "False"), ("Alarm", "True")]
        );
        check(
            &model,
            &["Fire", "Tampering"],
            &[("Report", "True"), ("Smoke", "False")],
            &[("Fire", "False"), ("Tampering", "True")]
        );
        check(
            &model,
            &["Leaving", "Fire", "Tampering"],
            &[("Report", "True")],
            &[("Leaving", "True"), ("Fire", "False"), ("Tampering", "True")]
        );
    }

    #[test]
    fn repeated_queries_agree() {
        let model = earthquake();
        let evidence = assignment(&[("JohnCalls", "True"), ("MaryCalls", "True")]);
        let engine = MapEliminationEngine::new(&model, &evidence);

        let first = engine.infer(&["Burglary", "Earthquake"]).unwrap();
        for _ in 0..10 {
            assert_eq!(first, engine.infer(&["Burglary", "Earthquake"]).unwrap());
        }

        // and the model is untouched
        assert_eq!(5, model.factors().len());
        assert_eq!(&["Burglary"], model.cpd("Burglary").unwrap().scope());
    }
}
