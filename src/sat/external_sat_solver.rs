use super::{
    BufferedSatSolver, DimacsInstanceRead, Literal, SatSolver, SatSolverFactory, SolvingListener,
    SolvingResult,
};
use log::debug;
use std::{
    io::{Cursor, Read, Write},
    process::{Command, Stdio},
};

/// A SAT solver run as an external program.
///
/// The program receives the DIMACS instance on its standard input,
/// and must write its answer on its standard output using the SAT competitions format.
/// Options may be given to the program, e.g. to make it read its standard input.
pub struct ExternalSatSolver {
    buffered_sat_solver: BufferedSatSolver,
}

impl ExternalSatSolver {
    /// Builds a new external SAT solver given the program to execute and its options.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tunnelsat::sat::{ExternalSatSolver, Literal, SatSolver};
    /// let mut solver = ExternalSatSolver::new("/usr/bin/kissat".to_string(), vec![]);
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(-2)]);
    /// solver.add_clause(vec![Literal::from(1)]);
    /// let model = solver.solve().unwrap_model().unwrap();
    /// assert_eq!(Some(false), model.value_of(2));
    /// ```
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            buffered_sat_solver: BufferedSatSolver::new(Box::new(move |r| {
                exec_solver(r, &program, &options)
            })),
        }
    }
}

impl SatSolver for ExternalSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.buffered_sat_solver.add_clause(cl)
    }

    fn solve(&mut self) -> SolvingResult {
        self.buffered_sat_solver.solve()
    }

    fn n_vars(&self) -> usize {
        self.buffered_sat_solver.n_vars()
    }

    fn n_clauses(&self) -> usize {
        self.buffered_sat_solver.n_clauses()
    }

    fn reserve(&mut self, max_var: usize) {
        self.buffered_sat_solver.reserve(max_var)
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.buffered_sat_solver.add_listener(listener)
    }
}

fn exec_solver(mut instance: DimacsInstanceRead, program: &str, options: &[String]) -> Box<dyn Read> {
    let mut child = Command::new(program)
        .args(options)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!(r#"failed to launch SAT solver "{}": {}"#, program, e));
    let mut stdin = child.stdin.take().expect("failed to open the SAT solver stdin");
    let writer = std::thread::spawn(move || {
        let mut buffer = String::new();
        if instance.read_to_string(&mut buffer).is_ok() {
            if let Err(e) = stdin.write_all(buffer.as_bytes()) {
                debug!("the SAT solver did not read the whole instance: {}", e);
            }
        }
    });
    let mut output = Vec::new();
    child
        .stdout
        .take()
        .expect("failed to open the SAT solver stdout")
        .read_to_end(&mut output)
        .expect("failed to read the SAT solver output");
    child.wait().expect("failed to wait for the SAT solver");
    writer.join().expect("failed to write the SAT instance");
    Box::new(Cursor::new(output))
}

/// A factory for [`ExternalSatSolver`] instances.
///
/// Listener builders may be registered; each solver built by the factory gets one listener from each builder.
pub struct ExternalSatSolverFactory {
    program: String,
    options: Vec<String>,
    listener_builders: Vec<Box<dyn Fn() -> Box<dyn SolvingListener>>>,
}

impl ExternalSatSolverFactory {
    /// Builds a new factory given the program to execute and its options.
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            program,
            options,
            listener_builders: vec![],
        }
    }

    /// Adds a listener builder.
    pub fn add_solver_listener(&mut self, builder: Box<dyn Fn() -> Box<dyn SolvingListener>>) {
        self.listener_builders.push(builder);
    }
}

impl SatSolverFactory for ExternalSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        let mut solver = ExternalSatSolver::new(self.program.clone(), self.options.clone());
        self.listener_builders
            .iter()
            .for_each(|b| solver.add_listener((b)()));
        Box::new(solver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    fn get_echo_command(content: &str) -> Option<(String, Vec<String>)> {
        if cfg!(target_family = "unix") {
            Some(("echo".to_string(), vec![content.to_string()]))
        } else {
            None
        }
    }

    #[test]
    fn test_solve_output() {
        let (program, options) = match get_echo_command("s SATISFIABLE\nv 1 -2 0\n") {
            Some(cmd) => cmd,
            None => return,
        };
        let mut s = ExternalSatSolver::new(program, options);
        s.add_clause(clause![1, 2]);
        let model = s.solve().unwrap_model().unwrap();
        assert_eq!(Some(true), model.value_of(1));
        assert_eq!(Some(false), model.value_of(2));
        assert_eq!(2, s.n_vars());
    }

    #[test]
    fn test_program_ignoring_a_large_instance() {
        let (program, options) = match get_echo_command("s UNSATISFIABLE\n") {
            Some(cmd) => cmd,
            None => return,
        };
        let mut s = ExternalSatSolver::new(program, options);
        for i in 1..=20_000i32 {
            s.add_clause(clause![i, -(i + 1)]);
        }
        assert!(s.solve().unwrap_model().is_none());
    }

    #[test]
    fn test_factory() {
        let (program, options) = match get_echo_command("s UNSATISFIABLE\n") {
            Some(cmd) => cmd,
            None => return,
        };
        let factory = ExternalSatSolverFactory::new(program, options);
        let mut s = factory.new_solver();
        s.add_clause(clause![1]);
        assert!(s.solve().unwrap_model().is_none());
    }
}
