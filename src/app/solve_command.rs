use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use tunnelsat::{
    io::PathWriter,
    solvers::{BruteForcePathFinder, PathFinder, ReductionPathFinder},
    tunnel,
};

const CMD_NAME: &str = "solve";

const ARG_STRATEGY: &str = "STRATEGY";

const STRATEGY_BRUTE_FORCE: &str = "brute-force";
const STRATEGY_REDUCTION: &str = "reduction";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Looks for a path of a given length in a tunneling network")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::length_arg())
            .arg(
                Arg::with_name(ARG_STRATEGY)
                    .short("s")
                    .long("strategy")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&[STRATEGY_BRUTE_FORCE, STRATEGY_REDUCTION])
                    .default_value(STRATEGY_REDUCTION)
                    .help("the strategy used to look for a path"),
            )
            .args(&common::external_sat_solver_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches
            .value_of(common::ARG_INPUT)
            .ok_or_else(|| anyhow!("missing input file"))?;
        let length = common::read_length(arg_matches)?;
        let network = common::read_network_file(file)?;
        let strategy = arg_matches
            .value_of(ARG_STRATEGY)
            .unwrap_or(STRATEGY_REDUCTION);
        info!(
            "looking for a path of length {} using the {} strategy",
            length, strategy
        );
        let mut path_finder: Box<dyn PathFinder + '_> = match strategy {
            STRATEGY_BRUTE_FORCE => Box::new(BruteForcePathFinder::new(&network, length)),
            STRATEGY_REDUCTION => Box::new(ReductionPathFinder::new_with_sat_solver_factory(
                &network,
                length,
                common::create_sat_solver_factory(arg_matches)?,
            )),
            _ => unreachable!(),
        };
        let writer = PathWriter::default();
        let mut out = std::io::stdout();
        match path_finder.find_path() {
            Some(path) => {
                tunnel::check_path(&network, length, &path)
                    .context("the path found by the solver is not valid")?;
                info!("found a valid path");
                writer.write_path(&mut out, &network, &path)
            }
            None => {
                info!("no path of length {}", length);
                writer.write_no_path(&mut out)
            }
        }
    }
}
