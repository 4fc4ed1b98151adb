use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
};
use tunnelsat::{
    encodings::ReductionEncoder,
    formula::TseitinFormulaSolver,
    sat::{BufferedSatSolver, SatSolver},
};

const CMD_NAME: &str = "encode-to-sat";

const ARG_OUT: &str = "ARG_OUT";

pub(crate) struct EncodeToSatCommand;

impl EncodeToSatCommand {
    pub(crate) fn new() -> Self {
        EncodeToSatCommand
    }
}

impl<'a> Command<'a> for EncodeToSatCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Writes the DIMACS encoding of the path finding problem")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::length_arg())
            .arg(
                Arg::with_name(ARG_OUT)
                    .short("o")
                    .long("output")
                    .empty_values(false)
                    .multiple(false)
                    .help("the output file for the encoding")
                    .required(false),
            )
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches
            .value_of(common::ARG_INPUT)
            .ok_or_else(|| anyhow!("missing input file"))?;
        let length = common::read_length(arg_matches)?;
        let network = common::read_network_file(file)?;
        let mut formula_solver = TseitinFormulaSolver::default();
        let formula = ReductionEncoder::new(&network, length).encode(&mut formula_solver);
        let mut sat_solver =
            BufferedSatSolver::new(Box::new(|_| unreachable!("the instance is never solved")));
        formula_solver.encode_into(formula, &mut sat_solver);
        info!(
            "the encoding has {} variables and {} clauses",
            sat_solver.n_vars(),
            sat_solver.n_clauses()
        );
        let mut writer: Box<dyn Write> = match arg_matches.value_of(ARG_OUT) {
            Some(path) => Box::new(BufWriter::new(
                File::create(path).with_context(|| format!(r#"while creating file "{}""#, path))?,
            )),
            None => Box::new(std::io::stdout()),
        };
        for (var, name) in formula_solver.iter_sat_var_names() {
            writeln!(writer, "c {} {}", var, name).context("while writing variable names")?;
        }
        sat_solver.write_instance(writer.as_mut())
    }
}
