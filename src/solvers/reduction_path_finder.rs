use super::specs::PathFinder;
use crate::{
    encodings::{PathDecoder, ReductionEncoder},
    formula::{FormulaSolver, TseitinFormulaSolver},
    sat::SatSolverFactory,
    tunnel::{Network, Step},
};
use log::{debug, info, log_enabled, Level};

/// A path finder reducing the problem to the satisfiability of a boolean formula.
///
/// The formula is built by a [`ReductionEncoder`] and its models are decoded by a [`PathDecoder`].
/// By default, formulas are checked by a [`TseitinFormulaSolver`] relying on the default SAT solver.
///
/// # Example
///
/// ```
/// # use tunnelsat::io::{NetworkReader, TunnelReader};
/// # use tunnelsat::solvers::{PathFinder, ReductionPathFinder};
/// let instance = "node(a, push_4_6).\nnode(b, pop_6_4).\nnode(c).\nedge(a,b).\nedge(b,c).\ninitial(a).\nfinal(c).\n";
/// let network = TunnelReader::default().read(&mut instance.as_bytes()).unwrap();
/// let mut finder = ReductionPathFinder::new(&network, 2);
/// assert_eq!(2, finder.find_path().unwrap().len());
/// ```
pub struct ReductionPathFinder<'a> {
    network: &'a dyn Network,
    length: usize,
    solver: Box<dyn FormulaSolver>,
}

impl<'a> ReductionPathFinder<'a> {
    /// Builds a new path finder using the default formula solver.
    ///
    /// # Panics
    ///
    /// Panics if the length is 0.
    pub fn new(network: &'a dyn Network, length: usize) -> Self {
        Self::new_with_formula_solver(network, length, Box::new(TseitinFormulaSolver::default()))
    }

    /// Builds a new path finder which formula solver relies on the SAT solvers given by the factory.
    ///
    /// # Panics
    ///
    /// Panics if the length is 0.
    pub fn new_with_sat_solver_factory(
        network: &'a dyn Network,
        length: usize,
        solver_factory: Box<dyn SatSolverFactory>,
    ) -> Self {
        Self::new_with_formula_solver(
            network,
            length,
            Box::new(TseitinFormulaSolver::new_with_sat_solver_factory(
                solver_factory,
            )),
        )
    }

    /// Builds a new path finder using the provided formula solver.
    ///
    /// # Panics
    ///
    /// Panics if the length is 0.
    pub fn new_with_formula_solver(
        network: &'a dyn Network,
        length: usize,
        solver: Box<dyn FormulaSolver>,
    ) -> Self {
        assert!(length >= 1, "the length of the path must be at least 1");
        Self {
            network,
            length,
            solver,
        }
    }
}

impl PathFinder for ReductionPathFinder<'_> {
    fn find_path(&mut self) -> Option<Vec<Step>> {
        let formula = ReductionEncoder::new(self.network, self.length).encode(self.solver.as_mut());
        info!("checking the satisfiability of the encoding");
        let model = self.solver.check_sat(formula).unwrap_model()?;
        let decoder = PathDecoder::new(self.network, self.length);
        if log_enabled!(Level::Debug) {
            decoder
                .describe_model(self.solver.as_mut(), model.as_ref())
                .iter()
                .for_each(|l| debug!("{}", l));
        }
        Some(decoder.decode_path(self.solver.as_mut(), model.as_ref()))
    }
}
