//! Module containing initialization routines for the parameters of a model.

use crate::factor::{Factor, Table};
use crate::util::{BayesMapError, Result};
use crate::variable::Variable;

use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Defines possible ways to initialize a `Variable`s CPD.
pub enum Initialization<'a> {
    /// A uniform distribution over all possibilities
    Uniform,

    /// Randomly initialize the weights of the CPD.
    Random,

    /// Randomly initialize the weights of the CPD from a seeded generator, so the same seed
    /// always yields the same CPD.
    Seeded(u64),

    /// Initialize the CPD as a Binomial distribution with parameter ```p``` for the first state.
    /// Note that this `Initialization` is valid only to a `Variable` with no parents.
    Binomial(f64),

    /// Initialize the CPD as a Multinomial distribution with parameters ```p_0, p_1...```.
    /// Note that this `Initialization` is valid only to a `Variable` with no parents.
    Multinomial(&'a [f64]),

    /// User defined CPD. The axes are the parents, in order, followed by the variable itself.
    Table(Table)
}


impl<'a> Initialization<'a> {

    /// Construct a CPD, initialized based on ```self```
    ///
    /// # Args
    /// * `var`: the `Variable` the CPD is over
    /// * `parents`: the conditioning `Variable`s, in table axis order
    ///
    /// # Returns
    /// a `Factor` with scope ```parents U {var}```
    ///
    /// # Errors
    /// * `BayesMapError::InvalidInitialization` if a binomial/multinomial does not fit `var`
    /// * any error of `Factor::cpd`
    pub fn build_cpd(self, var: &Variable, parents: &[&Variable]) -> Result<Factor> {
        ///////////////////////////////////////////////////////////////////////////////
        // Check for errors
        if parents.is_empty() {

            match self {

                // A binomial distribution on a non-binary variable
                Initialization::Binomial(_) if var.cardinality() != 2 => {
                    return Err(BayesMapError::InvalidInitialization);
                },

                // A multinomial distribution with an incorrect number of parameters
                Initialization::Multinomial(ps) if ps.len() != var.cardinality() => {
                    return Err(BayesMapError::InvalidInitialization);
                },

                _ => ()
            }
        } else {
            match self {

                // A binomial/multinomial on a non-unit scope
                Initialization::Binomial(_) | Initialization::Multinomial(_) => {
                    return Err(BayesMapError::InvalidInitialization);
                },

                _ => ()
            }
        }

        ///////////////////////////////////////////////////////////////////////////////
        // now, build CPD
        let mut shape: Vec<usize> = parents.iter().map(|v| v.cardinality()).collect();
        shape.push(var.cardinality());

        let tbl = match self {
            Initialization::Uniform => {
                // normalizing constant is just the number of states
                let val = 1. / (var.cardinality() as f64);
                Table::from_elem(shape, val)
            },
            Initialization::Random => random_cpd(shape, &mut rand::thread_rng()),
            Initialization::Seeded(seed) => random_cpd(shape, &mut StdRng::seed_from_u64(seed)),
            Initialization::Binomial(p) => {
                array![p, (1.0 - p)].into_dyn()
            },
            Initialization::Multinomial(p) => {
                nd::Array::from(p.to_vec()).into_dyn()
            },
            Initialization::Table(t) => t
        };

        Factor::cpd(var, parents, tbl)
    }
}


/// Draw weights in ```[1, 100)``` and normalize them over the last axis
fn random_cpd<R: Rng>(shape: Vec<usize>, rng: &mut R) -> Table {
    let ax = nd::Axis(shape.len() - 1);
    let mut tbl = Table::random_using(shape, Uniform::new(1.0, 100.0), rng);

    for mut lane in tbl.lanes_mut(ax) {
        let z = lane.sum();
        lane.mapv_inplace(|e| e / z);
    }

    tbl
}
