//! RINEX printer: produces the navigation, observation and SBAS files.
//!
//! [Context] carries the immutable formatting state and emits
//! headers and records to any [Write]r. [Printer] owns the three
//! output files and routes each emission to the right one.
use std::{collections::BTreeMap, io::Write};

use hifitime::prelude::Epoch;
use log::debug;
use thiserror::Error;

pub mod codes;
pub mod fd;
pub mod formatting;
pub mod settings;
pub mod time;
pub mod version;

mod header;
mod navigation;
mod observation;
mod sbas;

pub use settings::{FileType, Settings};
pub use version::Version;

use crate::{
    ephemeris::{GpsEphemeris, IonoModel, UtcModel},
    sbas::SbasMessage,
    synchro::Synchro,
};

use codes::{Observable, observables};
use fd::OutputFile;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown RINEX version \"{0}\" (must be 2.10, 2.11 or 3.01)")]
    UnknownVersion(String),
    #[error("unknown signal: {0}")]
    UnknownSignal(#[from] codes::ParsingError),
}

/// Formatting context, read-only once built
#[derive(Debug, Clone)]
pub struct Context {
    /// Printer [Settings]
    pub settings: Settings,
    /// Creation date, reported in every header
    pub created: Epoch,
    /// Observables we produce, in emission order
    observables: Vec<Observable>,
}

impl Context {
    pub fn new(settings: Settings, created: Epoch) -> Self {
        let observables = observables(settings.signal);
        Self {
            settings,
            created,
            observables,
        }
    }

    pub fn version(&self) -> Version {
        self.settings.version
    }

    fn major(&self) -> u8 {
        self.settings.version.major()
    }

    /// Formats a floating point field, with the revision dependent exponent marker
    fn float(&self, value: f64, width: usize, precision: usize) -> String {
        formatting::fortran_exp(
            value,
            width,
            precision,
            self.settings.version.exponent_marker(),
        )
    }
}

/// Owns the RINEX output files.
/// Files nothing was written to are removed when the [Printer] is dropped.
pub struct Printer {
    context: Context,
    nav: OutputFile,
    obs: OutputFile,
    sbas: OutputFile,
}

impl Printer {
    /// Creates the three output files, named after `created`
    pub fn new(settings: Settings, created: Epoch) -> Result<Self, Error> {
        if let Some(prefix) = &settings.prefix {
            std::fs::create_dir_all(prefix)?;
        }

        let nav = OutputFile::create(
            settings.filename(FileType::Navigation, created),
            settings.gzip,
        )?;

        let obs = OutputFile::create(
            settings.filename(FileType::Observation, created),
            settings.gzip,
        )?;

        let sbas = OutputFile::create(settings.filename(FileType::Sbas, created), settings.gzip)?;

        debug!(
            "RINEX v{} printer deployed: {}, {}, {}",
            settings.version,
            nav.path().display(),
            obs.path().display(),
            sbas.path().display()
        );

        if let Some((week, tow)) = Settings::naming_gps_time(created) {
            debug!("file names refer to GPS week {} tow {}", week, tow);
        }

        Ok(Self {
            context: Context::new(settings, created),
            nav,
            obs,
            sbas,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn nav_file(&self) -> &OutputFile {
        &self.nav
    }

    pub fn obs_file(&self) -> &OutputFile {
        &self.obs
    }

    pub fn sbas_file(&self) -> &OutputFile {
        &self.sbas
    }

    pub fn write_nav_header(&mut self, iono: &IonoModel, utc: &UtcModel) -> Result<(), Error> {
        self.context.format_nav_header(&mut self.nav, iono, utc)?;
        Ok(())
    }

    pub fn write_obs_header(&mut self, eph: &GpsEphemeris, first_obs_tow: f64) -> Result<(), Error> {
        self.context
            .format_obs_header(&mut self.obs, eph, first_obs_tow)?;
        Ok(())
    }

    pub fn write_sbas_header(&mut self) -> Result<(), Error> {
        self.context.format_sbas_header(&mut self.sbas)?;
        Ok(())
    }

    pub fn write_nav_records(
        &mut self,
        ephemeris: &BTreeMap<u8, GpsEphemeris>,
    ) -> Result<(), Error> {
        self.context.format_nav_records(&mut self.nav, ephemeris)?;
        self.nav.flush()?;
        Ok(())
    }

    pub fn write_obs_records(
        &mut self,
        eph: &GpsEphemeris,
        obs_tow: f64,
        synchros: &BTreeMap<u8, Synchro>,
    ) -> Result<(), Error> {
        self.context
            .format_obs_records(&mut self.obs, eph, obs_tow, synchros)?;
        self.obs.flush()?;
        Ok(())
    }

    pub fn write_sbas_record(&mut self, msg: &SbasMessage) -> Result<(), Error> {
        self.context.format_sbas_record(&mut self.sbas, msg)?;
        self.sbas.flush()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::ephemeris::GpsEphemeris;
    use std::{path::PathBuf, str::FromStr};

    /// Test [Context] for this revision
    pub fn context(version: Version) -> Context {
        let settings = Settings {
            version,
            observer: "OBSERVER".to_string(),
            ..Default::default()
        };
        let created = Epoch::from_str("2014-01-21T09:05:33 UTC").unwrap();
        Context::new(settings, created)
    }

    /// Formats with `f` and returns the produced lines
    pub fn lines<F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>>(f: F) -> Vec<String> {
        let mut buf = Vec::<u8>::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|line| line.to_string())
            .collect()
    }

    /// Asserts every line is exactly 80 characters long
    pub fn assert_line_lengths(lines: &[String]) {
        for (nth, line) in lines.iter().enumerate() {
            assert_eq!(line.len(), 80, "line #{} \"{}\"", nth, line);
        }
    }

    fn temp_prefix(name: &str) -> PathBuf {
        std::env::temp_dir().join("sdr2rinex-printer").join(name)
    }

    #[test]
    fn unused_files_are_removed() {
        let prefix = temp_prefix("unused");
        let settings = Settings {
            prefix: Some(prefix.to_string_lossy().to_string()),
            ..Default::default()
        };

        let created = Epoch::from_str("2020-01-01T00:00:00 UTC").unwrap();
        let printer = Printer::new(settings, created).unwrap();

        let obs = prefix.join("SDRX001a00.20O");
        let nav = prefix.join("SDRX001a00.20N");
        let sbas = prefix.join("SDRX001a00.20B");

        assert!(obs.exists());
        assert!(nav.exists());
        assert!(sbas.exists());

        drop(printer);

        assert!(!obs.exists());
        assert!(!nav.exists());
        assert!(!sbas.exists());
    }

    #[test]
    fn written_files_persist() {
        let prefix = temp_prefix("written");
        let settings = Settings {
            prefix: Some(prefix.to_string_lossy().to_string()),
            ..Default::default()
        };

        let created = Epoch::from_str("2020-01-01T00:00:00 UTC").unwrap();
        let mut printer = Printer::new(settings, created).unwrap();

        printer
            .write_nav_header(&Default::default(), &Default::default())
            .unwrap();

        let eph = GpsEphemeris {
            prn: 1,
            week: 100,
            ..Default::default()
        };

        printer
            .write_nav_records(&BTreeMap::from([(1, eph)]))
            .unwrap();

        assert!(printer.nav_file().bytes_written() > 0);
        assert_eq!(printer.obs_file().bytes_written(), 0);
        assert_eq!(printer.sbas_file().bytes_written(), 0);

        drop(printer);

        let nav = prefix.join("SDRX001a00.20N");
        assert!(nav.exists());
        assert!(!prefix.join("SDRX001a00.20O").exists());
        assert!(!prefix.join("SDRX001a00.20B").exists());

        let content = std::fs::read_to_string(&nav).unwrap();
        let lines = content.lines().map(|l| l.to_string()).collect::<Vec<_>>();
        assert_line_lengths(&lines);
        assert!(lines[0].ends_with("RINEX VERSION / TYPE"));

        std::fs::remove_file(&nav).unwrap();
    }
}
