use super::CadicalSolver;
use std::{fmt::Display, num::NonZeroIsize};

/// A literal in a SAT solver.
///
/// A literal is a non-null integer; its absolute value is the variable, and its sign gives its polarity.
/// Variables are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Returns the positive literal of a variable.
    ///
    /// # Panics
    ///
    /// Panics if the variable is 0.
    pub fn positive(var: usize) -> Self {
        Self::from(var as isize)
    }

    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> usize {
        self.0.unsigned_abs().get()
    }

    /// Returns `true` iff this literal is a positive one.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

impl From<isize> for Literal {
    fn from(l: isize) -> Self {
        match NonZeroIsize::new(l) {
            Some(n) => Self(n),
            None => panic!("cannot build a literal from 0"),
        }
    }
}

impl From<i32> for Literal {
    fn from(l: i32) -> Self {
        Self::from(l as isize)
    }
}

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.get()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of integers.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// An assignment returned by a SAT solver.
///
/// Some variables may be left unassigned, which is why values are returned as [`Option<bool>`].
#[derive(Debug, PartialEq, Eq)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    pub(crate) fn new(values: Vec<Option<bool>>) -> Self {
        Self(values)
    }

    /// Returns the value assigned to a variable.
    ///
    /// Variables the solver did not mention are reported as unassigned.
    pub fn value_of(&self, var: usize) -> Option<bool> {
        if var == 0 {
            return None;
        }
        self.0.get(var - 1).copied().flatten()
    }

    /// Returns the number of variables covered by this assignment.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff this assignment covers no variable.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The result of a call to a SAT solver.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable; a model is provided.
    Satisfiable(Assignment),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver could not decide.
    Unknown,
}

impl SolvingResult {
    /// Returns the model if there is one, or [`Option::None`] if the problem is unsatisfiable.
    ///
    /// # Panics
    ///
    /// Panics if the result is [`SolvingResult::Unknown`].
    pub fn unwrap_model(self) -> Option<Assignment> {
        match self {
            SolvingResult::Satisfiable(assignment) => Some(assignment),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => {
                panic!(r#"cannot unwrap solving result when the solver returned "Unknown""#)
            }
        }
    }

    /// Returns a short textual version of the result status.
    pub fn status(&self) -> &'static str {
        match self {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        }
    }
}

/// A trait for objects that want to be notified about SAT solver calls.
pub trait SolvingListener {
    /// Called when a solving process begins.
    fn solving_start(&self, n_vars: usize, n_clauses: usize);

    /// Called when a solving process ends.
    fn solving_end(&self, result: &SolvingResult);
}

/// A trait for SAT solvers.
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Solves the problem formed by the clauses added so far.
    fn solve(&mut self) -> SolvingResult;

    /// Returns the number of variables known by this solver.
    fn n_vars(&self) -> usize;

    /// Returns the number of clauses added so far.
    fn n_clauses(&self) -> usize;

    /// Makes the solver aware of all the variables up to `max_var`, even if they appear in no clause.
    fn reserve(&mut self, max_var: usize);

    /// Adds a listener notified at each call to [`solve`](Self::solve).
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);
}

/// A trait for objects that build new SAT solvers.
pub trait SatSolverFactory {
    /// Builds a new SAT solver.
    fn new_solver(&self) -> Box<dyn SatSolver>;
}

impl<F> SatSolverFactory for F
where
    F: Fn() -> Box<dyn SatSolver>,
{
    fn new_solver(&self) -> Box<dyn SatSolver> {
        (self)()
    }
}

/// The factory for the default SAT solver (CaDiCaL).
#[derive(Default)]
pub struct DefaultSatSolverFactory;

impl SatSolverFactory for DefaultSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        default_solver()
    }
}

/// Returns a new instance of the default SAT solver (CaDiCaL).
pub fn default_solver() -> Box<dyn SatSolver> {
    Box::<CadicalSolver>::default()
}
