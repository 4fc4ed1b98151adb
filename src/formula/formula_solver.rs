/// A handle to a formula built by a [`FormulaSolver`].
///
/// Handles are plain values; they only make sense for the solver that built them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Formula(pub(crate) usize);

/// A model returned by a [`FormulaSolver`].
pub trait FormulaModel {
    /// Returns `true` iff the formula is true in this model.
    ///
    /// Variables the model does not constrain are considered false.
    fn value_of(&self, formula: Formula) -> bool;
}

/// The result of a satisfiability check.
pub enum FormulaSolvingResult {
    /// The formula is satisfiable; a model is provided.
    Satisfiable(Box<dyn FormulaModel>),
    /// The formula is unsatisfiable.
    Unsatisfiable,
    /// The underlying solver could not decide.
    Unknown,
}

impl FormulaSolvingResult {
    /// Returns the model if there is one, or [`Option::None`] if the formula is unsatisfiable.
    ///
    /// # Panics
    ///
    /// Panics if the result is [`FormulaSolvingResult::Unknown`].
    pub fn unwrap_model(self) -> Option<Box<dyn FormulaModel>> {
        match self {
            FormulaSolvingResult::Satisfiable(model) => Some(model),
            FormulaSolvingResult::Unsatisfiable => None,
            FormulaSolvingResult::Unknown => {
                panic!(r#"cannot unwrap solving result when the solver returned "Unknown""#)
            }
        }
    }
}

/// A trait for objects able to build boolean formulas and to check their satisfiability.
///
/// Variables are identified by their names: asking twice for the same name returns the same formula.
pub trait FormulaSolver {
    /// Creates a variable, or retrieves it if a variable with the same name already exists.
    fn bool_var(&mut self, name: &str) -> Formula;

    /// Returns a constant formula.
    fn constant(&mut self, value: bool) -> Formula;

    /// Builds the conjunction of some formulas; the conjunction of no formula is `true`.
    fn and(&mut self, operands: Vec<Formula>) -> Formula;

    /// Builds the disjunction of some formulas; the disjunction of no formula is `false`.
    fn or(&mut self, operands: Vec<Formula>) -> Formula;

    /// Builds the negation of a formula.
    fn not(&mut self, operand: Formula) -> Formula;

    /// Builds the implication `premise -> conclusion`.
    fn implies(&mut self, premise: Formula, conclusion: Formula) -> Formula {
        let not_premise = self.not(premise);
        self.or(vec![not_premise, conclusion])
    }

    /// Builds the equivalence of two formulas.
    fn iff(&mut self, left: Formula, right: Formula) -> Formula {
        let direct = self.implies(left, right);
        let converse = self.implies(right, left);
        self.and(vec![direct, converse])
    }

    /// Checks the satisfiability of a formula.
    fn check_sat(&mut self, formula: Formula) -> FormulaSolvingResult;
}
