use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

use crate::config::{Configuration, Error as ConfigError};

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

/// Flags that map one to one to a configuration property
const PROPERTY_FLAGS: [(&str, &str); 9] = [
    ("rinex-version", "RINEX_version"),
    ("prefix", "RINEX_prefix"),
    ("station", "RINEX_station"),
    ("rollover", "RINEX_week_rollover"),
    ("signal", "RINEX_signal"),
    ("agency", "RINEX_agency"),
    ("observer", "RINEX_observer"),
    ("marker", "RINEX_marker"),
    ("comment", "RINEX_comment"),
];

fn command() -> Command {
    Command::new("sdr2rinex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Software receiver outputs to RINEX collecter")
        .color(ColorChoice::Always)
        .arg_required_else_help(true)
        .next_help_heading("Inputs")
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .value_name("FILENAME")
                .action(ArgAction::Append)
                .required(true)
                .help("Load a single JSON lines file. Use as many as needed.
Each file descriptor is consumed one after the other, so load them in chronological order.
Gzip files are supported but they must be terminated with '.gz'. Use '-' for standard input."),
        )
        .next_help_heading("Configuration")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILENAME")
                .action(ArgAction::Set)
                .help("Load properties from a JSON configuration file.
Command line options always take precedence over this file."),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Define any configuration property, for example --set RINEX_antenna_type=TRM57971.00"),
        )
        .next_help_heading("RINEX Collection")
        .arg(
            Arg::new("rinex-version")
                .long("rinex-version")
                .short('v')
                .value_name("VERSION")
                .action(ArgAction::Set)
                .help("RINEX revision: 2.10, 2.11 or 3.01. Default is 2.11."),
        )
        .arg(
            Arg::new("station")
                .long("station")
                .short('n')
                .action(ArgAction::Set)
                .help("Define a custom station name. To respect standard naming conventions,
this should be a 4 letter code, usually named after your geodetic marker.
When not defined, the default value is \"SDRX\"."),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .action(ArgAction::Set)
                .help("Custom directory prefix for output products. Default is none!"),
        )
        .arg(
            Arg::new("gzip")
                .long("gzip")
                .action(ArgAction::SetTrue)
                .help("Gzip compress the RINEX output."),
        )
        .arg(
            Arg::new("rollover")
                .long("rollover")
                .value_name("WEEK")
                .action(ArgAction::Set)
                .help("First week of the current GPS week rollover era. Default is 1024 (1999-08-22)."),
        )
        .arg(
            Arg::new("signal")
                .long("signal")
                .action(ArgAction::Set)
                .help("Tracked signal, for example \"1C\" (default) or \"2S\""),
        )
        .arg(
            Arg::new("agency")
                .long("agency")
                .action(ArgAction::Set)
                .help("Define name of your Agency, to be used in all Headers"),
        )
        .arg(
            Arg::new("observer")
                .long("observer")
                .action(ArgAction::Set)
                .help("Define name of Observer, to be used in all Headers"),
        )
        .arg(
            Arg::new("marker")
                .long("marker")
                .action(ArgAction::Set)
                .help("Define the marker name, reported in Observation headers"),
        )
        .arg(
            Arg::new("comment")
                .long("comment")
                .action(ArgAction::Set)
                .help("Custom header comment, to be used in all Headers"),
        )
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: command().get_matches(),
        }
    }

    /// Input file paths
    pub fn filepaths(&self) -> Vec<&String> {
        if let Some(fp) = self.matches.get_many::<String>("file") {
            fp.collect()
        } else {
            Vec::new()
        }
    }

    /// Configuration file, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.matches
            .get_one::<String>("config")
            .map(|path| Path::new(path.as_str()))
    }

    /// Builds the [Configuration]: properties file first,
    /// then overridden by command line options.
    pub fn configuration(&self) -> Result<Configuration, ConfigError> {
        let mut cfg = match self.config_file() {
            Some(path) => Configuration::from_file(path),
            None => Configuration::default(),
        };

        if let Some(descriptions) = self.matches.get_many::<String>("set") {
            for description in descriptions {
                cfg.set_key_value(description)?;
            }
        }

        for (flag, property) in PROPERTY_FLAGS.iter() {
            if let Some(value) = self.matches.get_one::<String>(flag) {
                cfg.set_property(property, value);
            }
        }

        if self.matches.get_flag("gzip") {
            cfg.set_property("RINEX_gzip", "true");
        }

        Ok(cfg)
    }
}
