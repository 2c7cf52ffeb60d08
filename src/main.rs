#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

use env_logger::{Builder, Target};

use log::{error, info};

use hifitime::prelude::{Epoch, TimeScale};

use tokio::sync::mpsc;

mod cli;
mod collecter;
mod config;
mod ephemeris;
mod input;
mod printer;
mod runtime;
mod sbas;
mod synchro;

use crate::{
    cli::Cli,
    collecter::{Collecter, Message},
    input::Source,
    printer::{Printer, Settings},
};

#[tokio::main]
pub async fn main() {
    let mut builder = Builder::from_default_env();

    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let t_utc = Epoch::now()
        .unwrap_or_else(|e| panic!("Failed to determine system time: {}", e))
        .to_time_scale(TimeScale::UTC);

    // cli
    let cli = Cli::new();

    let cfg = cli.configuration().unwrap_or_else(|e| {
        error!("invalid command line: {}", e);
        std::process::exit(1);
    });

    // RINEX settings
    let settings = Settings::from_config(&cfg).unwrap_or_else(|e| {
        error!("invalid RINEX settings: {}", e);
        std::process::exit(1);
    });

    let printer = Printer::new(settings, t_utc).unwrap_or_else(|e| {
        error!("failed to deploy RINEX printer: {}", e);
        std::process::exit(1);
    });

    let (tx, rx) = mpsc::channel(128);

    let collecter = Collecter::new(printer, rx);

    let handle = tokio::spawn(async move {
        collecter.run().await;
    });

    info!("{} - application deployed", t_utc);

    for path in cli.filepaths() {
        let source = match Source::open(path) {
            Ok(source) => source,
            Err(e) => {
                error!("{}: {}", path, e);
                continue;
            },
        };

        info!("consuming {}", path);

        for record in source.records() {
            match record {
                Ok(record) => {
                    if tx.send(record.into()).await.is_err() {
                        error!("collecter is no longer listening");
                        break;
                    }
                },
                Err(e @ input::Error::Json { .. }) => {
                    error!("{}: {}", path, e);
                },
                Err(e) => {
                    error!("{}: {} - aborting this input", path, e);
                    break;
                },
            }
        }
    }

    info!("consumed all content");

    let _ = tx.send(Message::Shutdown).await;

    if let Err(e) = handle.await {
        error!("collecter task failure: {}", e);
    }
}
