//! Boolean formulas and the solvers able to check their satisfiability.

mod formula_solver;
pub use formula_solver::Formula;
pub use formula_solver::FormulaModel;
pub use formula_solver::FormulaSolver;
pub use formula_solver::FormulaSolvingResult;

mod tseitin_formula_solver;
pub use tseitin_formula_solver::TseitinFormulaSolver;
