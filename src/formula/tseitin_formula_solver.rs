use super::{Formula, FormulaModel, FormulaSolver, FormulaSolvingResult};
use crate::sat::{
    Assignment, DefaultSatSolverFactory, Literal, SatSolver, SatSolverFactory, SolvingResult,
};
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Gate {
    True,
    Var(String),
    Not(Formula),
    And(Vec<Formula>),
    Or(Vec<Formula>),
}

/// A [`FormulaSolver`] that translates formulas into CNF using the Tseitin transformation.
///
/// Each formula is given a SAT variable, and gates are linked to their operands by equivalence clauses.
/// Structurally equal gates are shared, and trivial gates are simplified on the fly
/// (constants, double negations, single-operand conjunctions and disjunctions).
///
/// Each call to [`check_sat`](FormulaSolver::check_sat) runs a new SAT solver built by the underlying [`SatSolverFactory`].
///
/// # Example
///
/// ```
/// # use tunnelsat::formula::{FormulaSolver, TseitinFormulaSolver};
/// let mut solver = TseitinFormulaSolver::default();
/// let x = solver.bool_var("x");
/// let y = solver.bool_var("y");
/// let not_x = solver.not(x);
/// let formula = solver.and(vec![not_x, y]);
/// let model = solver.check_sat(formula).unwrap_model().unwrap();
/// assert!(!model.value_of(x));
/// assert!(model.value_of(y));
/// ```
pub struct TseitinFormulaSolver {
    gates: Vec<Gate>,
    gate_ids: HashMap<Gate, Formula>,
    solver_factory: Box<dyn SatSolverFactory>,
}

impl Default for TseitinFormulaSolver {
    fn default() -> Self {
        Self::new_with_sat_solver_factory(Box::new(DefaultSatSolverFactory))
    }
}

impl TseitinFormulaSolver {
    /// Builds a new formula solver which checks satisfiability with solvers given by the provided factory.
    pub fn new_with_sat_solver_factory(solver_factory: Box<dyn SatSolverFactory>) -> Self {
        let mut solver = Self {
            gates: vec![],
            gate_ids: HashMap::new(),
            solver_factory,
        };
        solver.new_gate(Gate::True);
        solver
    }

    /// Returns the number of formulas (variables and gates) built so far.
    pub fn n_formulas(&self) -> usize {
        self.gates.len()
    }

    /// Returns the name of a formula if it is a variable.
    pub fn var_name(&self, formula: Formula) -> Option<&str> {
        match &self.gates[formula.0] {
            Gate::Var(name) => Some(name),
            _ => None,
        }
    }

    /// Iterates over the variables, giving their index in the SAT solvers along with their names.
    pub fn iter_sat_var_names(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.gates.iter().enumerate().filter_map(|(i, g)| match g {
            Gate::Var(name) => Some((i + 1, name.as_str())),
            _ => None,
        })
    }

    /// Adds to a SAT solver the clauses that make the formula true.
    ///
    /// The SAT variable of a formula is its index plus one;
    /// the solver is made aware of all the variables, including the ones that appear in no clause.
    pub fn encode_into(&self, formula: Formula, solver: &mut dyn SatSolver) {
        debug!("translating {} formulas into CNF", self.n_formulas());
        solver.reserve(self.n_formulas());
        for (i, gate) in self.gates.iter().enumerate() {
            let out = to_lit(Formula(i));
            match gate {
                Gate::True => solver.add_clause(vec![out]),
                Gate::Var(_) => {}
                Gate::Not(op) => {
                    let op = to_lit(*op);
                    solver.add_clause(vec![out.negate(), op.negate()]);
                    solver.add_clause(vec![out, op]);
                }
                Gate::And(ops) => {
                    let mut long_cl = Vec::with_capacity(ops.len() + 1);
                    long_cl.push(out);
                    for op in ops.iter().map(|op| to_lit(*op)) {
                        solver.add_clause(vec![out.negate(), op]);
                        long_cl.push(op.negate());
                    }
                    solver.add_clause(long_cl);
                }
                Gate::Or(ops) => {
                    let mut long_cl = Vec::with_capacity(ops.len() + 1);
                    long_cl.push(out.negate());
                    for op in ops.iter().map(|op| to_lit(*op)) {
                        solver.add_clause(vec![out, op.negate()]);
                        long_cl.push(op);
                    }
                    solver.add_clause(long_cl);
                }
            }
        }
        solver.add_clause(vec![to_lit(formula)]);
    }

    fn new_gate(&mut self, gate: Gate) -> Formula {
        if let Some(f) = self.gate_ids.get(&gate) {
            return *f;
        }
        let f = Formula(self.gates.len());
        self.gates.push(gate.clone());
        self.gate_ids.insert(gate, f);
        f
    }

    fn true_formula(&self) -> Formula {
        Formula(0)
    }

    fn false_formula(&mut self) -> Formula {
        self.new_gate(Gate::Not(self.true_formula()))
    }
}

fn simplify_operands(mut operands: Vec<Formula>, neutral: Formula) -> Vec<Formula> {
    operands.retain(|f| *f != neutral);
    operands.sort_unstable();
    operands.dedup();
    operands
}

fn to_lit(formula: Formula) -> Literal {
    Literal::positive(formula.0 + 1)
}

impl FormulaSolver for TseitinFormulaSolver {
    fn bool_var(&mut self, name: &str) -> Formula {
        self.new_gate(Gate::Var(name.to_string()))
    }

    fn constant(&mut self, value: bool) -> Formula {
        if value {
            self.true_formula()
        } else {
            self.false_formula()
        }
    }

    fn and(&mut self, operands: Vec<Formula>) -> Formula {
        let t = self.true_formula();
        let f = self.false_formula();
        let operands = simplify_operands(operands, t);
        if operands.contains(&f) {
            return f;
        }
        match operands.len() {
            0 => t,
            1 => operands[0],
            _ => self.new_gate(Gate::And(operands)),
        }
    }

    fn or(&mut self, operands: Vec<Formula>) -> Formula {
        let t = self.true_formula();
        let f = self.false_formula();
        let operands = simplify_operands(operands, f);
        if operands.contains(&t) {
            return t;
        }
        match operands.len() {
            0 => f,
            1 => operands[0],
            _ => self.new_gate(Gate::Or(operands)),
        }
    }

    fn not(&mut self, operand: Formula) -> Formula {
        if let Gate::Not(inner) = self.gates[operand.0] {
            return inner;
        }
        self.new_gate(Gate::Not(operand))
    }

    fn check_sat(&mut self, formula: Formula) -> FormulaSolvingResult {
        let mut solver = self.solver_factory.new_solver();
        self.encode_into(formula, solver.as_mut());
        match solver.solve() {
            SolvingResult::Satisfiable(assignment) => {
                FormulaSolvingResult::Satisfiable(Box::new(TseitinModel(assignment)))
            }
            SolvingResult::Unsatisfiable => FormulaSolvingResult::Unsatisfiable,
            SolvingResult::Unknown => FormulaSolvingResult::Unknown,
        }
    }
}

struct TseitinModel(Assignment);

impl FormulaModel for TseitinModel {
    fn value_of(&self, formula: Formula) -> bool {
        self.0.value_of(formula.0 + 1).unwrap_or(false)
    }
}
