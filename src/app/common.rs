use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::BufReader,
    path::PathBuf,
};
use tunnelsat::{
    io::{NetworkReader, TunnelReader},
    sat::{self, ExternalSatSolverFactory, SatSolver, SatSolverFactory, SolvingListener, SolvingResult},
    tunnel::{Network, TunnelNetwork},
};

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the network")
        .required(true)
}

pub(crate) const ARG_LENGTH: &str = "LENGTH";

pub(crate) fn length_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_LENGTH)
        .short("l")
        .long("length")
        .empty_values(false)
        .multiple(false)
        .help("the exact length of the path")
        .required(true)
}

pub(crate) fn read_length(arg_matches: &ArgMatches<'_>) -> Result<usize> {
    let str_length = arg_matches
        .value_of(ARG_LENGTH)
        .ok_or_else(|| anyhow!("missing path length"))?;
    match str_length.parse::<usize>() {
        Ok(l) if l >= 1 => Ok(l),
        _ => Err(anyhow!(
            r#"the length of the path must be a positive integer, got "{}""#,
            str_length
        )),
    }
}

pub(crate) fn read_network_file(file_path: &str) -> Result<TunnelNetwork> {
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut reader = TunnelReader::default();
    reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
    let file = File::open(&canonicalized)
        .with_context(|| format!(r#"while opening file "{}""#, file_path))?;
    let network = reader
        .read(&mut BufReader::new(file))
        .with_context(|| format!(r#"while reading file "{}""#, file_path))?;
    info!(
        "the network has {} node(s) and {} edge(s)",
        network.n_nodes(),
        network.n_edges()
    );
    Ok(network)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

const ARG_EXTERNAL_SAT_SOLVER: &str = "EXTERNAL_SAT_SOLVER";
const ARG_EXTERNAL_SAT_SOLVER_OPTIONS: &str = "EXTERNAL_SAT_SOLVER_OPTIONS";

pub(crate) fn external_sat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER)
            .long("external-sat-solver")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external SAT solver to replace the embedded one")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
            .long("external-sat-solver-opt")
            .requires(ARG_EXTERNAL_SAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("an option to give to the external SAT solver")
            .required(false),
    ]
}

pub(crate) fn create_sat_solver_factory(
    arg_matches: &ArgMatches<'_>,
) -> Result<Box<dyn SatSolverFactory>> {
    let external_solver_options = arg_matches
        .values_of(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
        .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
        .unwrap_or_default();
    if let Some(s) = arg_matches.value_of(ARG_EXTERNAL_SAT_SOLVER) {
        let path = canonicalize_file_path(s)?;
        info!("using {:?} as SAT solver", path);
        let program = path
            .to_str()
            .ok_or_else(|| anyhow!("the path to the SAT solver is not valid UTF-8"))?
            .to_string();
        let mut factory = ExternalSatSolverFactory::new(program, external_solver_options);
        factory.add_solver_listener(Box::new(|| {
            Box::<SatSolvingLogger>::default() as Box<dyn SolvingListener>
        }));
        Ok(Box::new(factory))
    } else {
        info!("using the default SAT solver");
        Ok(Box::new(|| {
            let mut solver: Box<dyn SatSolver> = sat::default_solver();
            solver.add_listener(Box::<SatSolvingLogger>::default());
            solver
        }))
    }
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        info!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars, n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        info!("SAT solver ended with result {}", result.status());
    }
}
