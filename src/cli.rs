use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/version-server/config.toml";

pub struct Cli {
    pub config: PathBuf,
    pub port: Option<u16>,
}

impl From<ArgMatches> for Cli {
    fn from(matches: ArgMatches) -> Self {
        Cli {
            config: matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            port: matches.get_one::<u16>("port").copied(),
        }
    }
}

pub fn command() -> Command {
    Command::new("version-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("report running container versions and image poller state over http")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(format!(
                    "Path to the toml configuration file (default: {DEFAULT_CONFIG_PATH})"
                ))
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on, overrides the configuration")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16)),
        )
}

pub fn configure_cli() -> Cli {
    command().get_matches().into()
}
