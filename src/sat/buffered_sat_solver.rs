use super::{Assignment, Literal, SatSolver, SolvingListener, SolvingResult};
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Cursor, Read, Write};

/// The type of functions that solve a DIMACS instance and return the solver output.
pub type SolvingFn = dyn Fn(DimacsInstanceRead) -> Box<dyn Read>;

/// A reader over a DIMACS instance, made of a preamble followed by the clauses.
pub struct DimacsInstanceRead {
    preamble: Cursor<String>,
    clauses: Cursor<String>,
}

impl Read for DimacsInstanceRead {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.preamble.read(buf)? {
            0 => self.clauses.read(buf),
            n => Ok(n),
        }
    }
}

const DEFAULT_BUFFER_CAP: usize = 1 << 20;

/// A SAT solver that stores the clauses as a DIMACS instance and delegates the solving to a function.
///
/// The solving function receives the instance and returns the output of a solver,
/// following the format of the SAT competitions (`s` and `v` lines).
/// Malformed outputs make the solver panic.
pub struct BufferedSatSolver {
    n_vars: usize,
    n_clauses: usize,
    clauses: String,
    solving_fn: Box<SolvingFn>,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl BufferedSatSolver {
    /// Builds a new buffered solver given its solving function.
    pub fn new(solving_fn: Box<SolvingFn>) -> Self {
        Self {
            n_vars: 0,
            n_clauses: 0,
            clauses: String::with_capacity(DEFAULT_BUFFER_CAP),
            solving_fn,
            listeners: Vec::new(),
        }
    }

    /// Writes the DIMACS instance made of the clauses added so far.
    pub fn write_instance(&self, writer: &mut dyn Write) -> Result<()> {
        let context = "while writing a DIMACS instance";
        std::io::copy(&mut self.instance(), writer).context(context)?;
        writer.flush().context(context)
    }

    fn instance(&self) -> DimacsInstanceRead {
        DimacsInstanceRead {
            preamble: Cursor::new(format!("p cnf {} {}\n", self.n_vars, self.n_clauses)),
            clauses: Cursor::new(self.clauses.clone()),
        }
    }
}

impl SatSolver for BufferedSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        for l in cl {
            self.n_vars = usize::max(self.n_vars, l.var());
            self.clauses.push_str(&l.to_string());
            self.clauses.push(' ');
        }
        self.clauses.push_str("0\n");
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars, self.n_clauses));
        let output = (self.solving_fn)(self.instance());
        let result = read_solver_output(output, self.n_vars);
        self.listeners.iter().for_each(|l| l.solving_end(&result));
        result
    }

    fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    fn reserve(&mut self, max_var: usize) {
        self.n_vars = usize::max(self.n_vars, max_var);
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }
}

const OUTPUT_ERROR_CONTEXT: &str = "error while reading the SAT solver output";

fn read_solver_output(output: Box<dyn Read>, n_vars: usize) -> SolvingResult {
    let mut status = None;
    let mut values = vec![None; n_vars];
    let mut value_line_seen = false;
    let mut value_line_ended = false;
    for line in BufReader::new(output).lines() {
        let line = line.unwrap_or_else(|e| panic!("{}: {}", OUTPUT_ERROR_CONTEXT, e));
        let mut words = line.split_ascii_whitespace();
        match words.next() {
            None | Some("c") => {}
            Some("s") => {
                if status.is_some() {
                    panic!("{}: multiple status lines", OUTPUT_ERROR_CONTEXT)
                }
                status = match words.next() {
                    Some("SATISFIABLE") => Some(true),
                    Some("UNSATISFIABLE") => Some(false),
                    _ => panic!(r#"{}: unexpected status line "{}""#, OUTPUT_ERROR_CONTEXT, line),
                };
            }
            Some("v") => {
                value_line_seen = true;
                for w in words {
                    let l = w.parse::<isize>().unwrap_or_else(|_| {
                        panic!(r#"{}: "{}" is not a literal"#, OUTPUT_ERROR_CONTEXT, w)
                    });
                    if l == 0 {
                        if value_line_ended {
                            panic!("{}: multiple zeroes on value lines", OUTPUT_ERROR_CONTEXT)
                        }
                        value_line_ended = true;
                        continue;
                    }
                    let v = l.unsigned_abs();
                    if v > n_vars {
                        panic!("{}: variable {} is out of bounds", OUTPUT_ERROR_CONTEXT, v)
                    }
                    values[v - 1] = Some(l > 0);
                }
            }
            Some(_) => panic!(r#"{}: unexpected line "{}""#, OUTPUT_ERROR_CONTEXT, line),
        }
    }
    match status {
        Some(true) if value_line_seen => SolvingResult::Satisfiable(Assignment::new(values)),
        Some(false) => SolvingResult::Unsatisfiable,
        _ => SolvingResult::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    fn input_check_solving_fn(expected_input: &'static str) -> Box<SolvingFn> {
        Box::new(move |mut r| {
            let mut buffer = String::new();
            r.read_to_string(&mut buffer).unwrap();
            assert_eq!(expected_input, buffer);
            Box::new("s UNSATISFIABLE\n".as_bytes())
        })
    }

    fn fake_output_solving_fn(output: &'static str) -> Box<SolvingFn> {
        Box::new(|_| Box::new(output.as_bytes()))
    }

    #[test]
    fn test_write_instance() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("s UNSATISFIABLE\n"));
        s.add_clause(clause![-2, 1]);
        let mut out = Vec::new();
        s.write_instance(&mut out).unwrap();
        assert_eq!("p cnf 2 1\n-2 1 0\n", String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_instance() {
        let mut s = BufferedSatSolver::new(input_check_solving_fn("p cnf 3 2\n1 2 0\n-1 -2 0\n"));
        s.reserve(3);
        s.add_clause(clause![1, 2]);
        s.add_clause(clause![-1, -2]);
        assert_eq!(SolvingResult::Unsatisfiable, s.solve());
    }

    #[test]
    fn test_empty_clause() {
        let mut s = BufferedSatSolver::new(input_check_solving_fn("p cnf 0 1\n0\n"));
        s.add_clause(clause![]);
        s.solve();
    }

    #[test]
    fn test_sat_output() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn(
            "c a comment\ns SATISFIABLE\nv -1\nv 2 0\n",
        ));
        s.add_clause(clause![-1, 2]);
        let assignment = s.solve().unwrap_model().unwrap();
        assert_eq!(Some(false), assignment.value_of(1));
        assert_eq!(Some(true), assignment.value_of(2));
    }

    #[test]
    fn test_sat_without_values() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("s SATISFIABLE\n"));
        s.add_clause(clause![1]);
        assert_eq!(SolvingResult::Unknown, s.solve());
    }

    #[test]
    fn test_no_status() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("c\n\n"));
        s.add_clause(clause![1]);
        assert_eq!(SolvingResult::Unknown, s.solve());
    }

    #[test]
    #[should_panic(expected = "error while reading the SAT solver output: multiple status lines")]
    fn test_multiple_status_lines() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn(
            "s UNSATISFIABLE\ns UNSATISFIABLE\n",
        ));
        s.add_clause(clause![1]);
        s.solve();
    }

    #[test]
    #[should_panic(expected = "error while reading the SAT solver output: variable 3 is out of bounds")]
    fn test_var_out_of_bounds() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("s SATISFIABLE\nv 1 -2 3 0\n"));
        s.add_clause(clause![1, 2]);
        s.solve();
    }

    #[test]
    #[should_panic(expected = r#"error while reading the SAT solver output: "x" is not a literal"#)]
    fn test_not_a_literal() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("s SATISFIABLE\nv 1 x 0\n"));
        s.add_clause(clause![1, 2]);
        s.solve();
    }

    #[test]
    #[should_panic(expected = r#"error while reading the SAT solver output: unexpected line "foo""#)]
    fn test_unexpected_line() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("foo\n"));
        s.add_clause(clause![1]);
        s.solve();
    }
}
