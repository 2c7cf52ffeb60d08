use std::{path::PathBuf, str::FromStr};

use hifitime::prelude::Epoch;

use crate::{
    config::Configuration,
    printer::{
        Error, Version,
        codes::ObservationCode,
        formatting::fixed_width,
        time::{DateTime, Rollover, day_of_year, to_week_tow},
    },
};

/// RINEX file types we produce
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileType {
    /// GPS navigation message file
    Navigation,
    /// Observation file
    Observation,
    /// SBAS broadcast data file
    Sbas,
}

impl FileType {
    /// Single letter file type, as used in file names
    pub fn letter(&self) -> char {
        match self {
            Self::Navigation => 'N',
            Self::Observation => 'O',
            Self::Sbas => 'B',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// RINEX revision
    pub version: Version,

    /// GZIP compression
    pub gzip: bool,

    /// 4 character station designator
    pub station: String,

    /// Custom file prefix (directory)
    pub prefix: Option<String>,

    /// Program name
    pub program: String,

    /// Publishing agency
    pub agency: String,

    /// Observer (operator)
    pub observer: String,

    /// Marker name
    pub marker: String,

    /// Receiver number
    pub receiver_number: String,

    /// Receiver type
    pub receiver_type: String,

    /// Receiver version
    pub receiver_version: String,

    /// Antenna number
    pub antenna_number: String,

    /// Antenna type
    pub antenna_type: String,

    /// Custom header comment
    pub header_comment: Option<String>,

    /// Tracked signal
    pub signal: ObservationCode,

    /// Week rollover era
    pub rollover: Rollover,

    /// Approximate marker position (ECEF, m)
    pub approx_position: (f64, f64, f64),

    /// Antenna height, eccentricities east and north (m)
    pub antenna_delta: (f64, f64, f64),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: Default::default(),
            gzip: false,
            station: "SDRX".to_string(),
            prefix: None,
            program: env!("CARGO_PKG_NAME").to_string(),
            agency: "SDR".to_string(),
            observer: default_observer(),
            marker: "DEFAULT MARKER NAME".to_string(),
            receiver_number: env!("CARGO_PKG_NAME").to_string(),
            receiver_type: "Software Receiver".to_string(),
            receiver_version: env!("CARGO_PKG_VERSION").to_string(),
            antenna_number: Default::default(),
            antenna_type: Default::default(),
            header_comment: None,
            signal: Default::default(),
            rollover: Default::default(),
            approx_position: (0.0, 0.0, 0.0),
            antenna_delta: (0.0, 0.0, 0.0),
        }
    }
}

/// Observer name defaults to the current user
fn default_observer() -> String {
    std::env::var("USER").unwrap_or_else(|_| "OBSERVER".to_string())
}

/// RINEX files are ASCII: any other character is replaced by '?'
fn ascii(value: String) -> String {
    if value.is_ascii() {
        value
    } else {
        value
            .chars()
            .map(|c| if c.is_ascii() { c } else { '?' })
            .collect()
    }
}

impl Settings {
    /// Builds [Settings] from [Configuration] properties.
    /// Fails on unknown RINEX revision or unknown signal.
    pub fn from_config(cfg: &Configuration) -> Result<Self, Error> {
        let defaults = Self::default();

        let version = if cfg.is_present("RINEX_version") {
            Version::from_str(&cfg.string_property("RINEX_version", ""))?
        } else {
            defaults.version
        };

        let signal = match cfg.optional_property("RINEX_signal") {
            Some(signal) => ObservationCode::from_str(&signal)?,
            None => defaults.signal,
        };

        let rollover = Rollover::new(cfg.property(
            "RINEX_week_rollover",
            defaults.rollover.era_start_week,
        ));

        Ok(Self {
            version,
            signal,
            rollover,
            gzip: cfg.property("RINEX_gzip", defaults.gzip),
            station: ascii(cfg.string_property("RINEX_station", &defaults.station)),
            prefix: cfg.optional_property("RINEX_prefix"),
            program: ascii(cfg.string_property("RINEX_program", &defaults.program)),
            agency: ascii(cfg.string_property("RINEX_agency", &defaults.agency)),
            observer: ascii(cfg.string_property("RINEX_observer", &defaults.observer)),
            marker: ascii(cfg.string_property("RINEX_marker", &defaults.marker)),
            receiver_number: ascii(cfg.string_property("RINEX_receiver_number", &defaults.receiver_number)),
            receiver_type: ascii(cfg.string_property("RINEX_receiver_type", &defaults.receiver_type)),
            receiver_version: ascii(cfg.string_property("RINEX_receiver_version", &defaults.receiver_version)),
            antenna_number: ascii(cfg.string_property("RINEX_antenna_number", &defaults.antenna_number)),
            antenna_type: ascii(cfg.string_property("RINEX_antenna_type", &defaults.antenna_type)),
            header_comment: cfg.optional_property("RINEX_comment").map(ascii),
            approx_position: (
                cfg.property("RINEX_approx_x", 0.0),
                cfg.property("RINEX_approx_y", 0.0),
                cfg.property("RINEX_approx_z", 0.0),
            ),
            antenna_delta: (
                cfg.property("RINEX_antenna_delta_h", 0.0),
                cfg.property("RINEX_antenna_delta_e", 0.0),
                cfg.property("RINEX_antenna_delta_n", 0.0),
            ),
        })
    }

    /// Output file path for this [FileType], created at `t`
    pub fn filename(&self, file_type: FileType, t: Epoch) -> PathBuf {
        let filename = self.short_filename(file_type, t);

        match &self.prefix {
            Some(prefix) => PathBuf::from(prefix).join(filename),
            None => PathBuf::from(filename),
        }
    }

    /// Calendar date and time file names are derived from
    fn naming_date(t: Epoch) -> DateTime {
        let (y, m, d, hh, mm, ss, _) = t.to_gregorian_utc();
        DateTime {
            year: y.max(0) as u32,
            month: m,
            day: d,
            hour: hh,
            minute: mm,
            second: ss,
        }
    }

    /// GPS (week, time of week) file names created at `t` refer to.
    /// None prior to the GPS epoch.
    pub fn naming_gps_time(t: Epoch) -> Option<(u32, u32)> {
        to_week_tow(&Self::naming_date(t))
    }

    /// `ssssdddhmm.yyt` file name, `h` being the hour letter (a..x)
    fn short_filename(&self, file_type: FileType, t: Epoch) -> String {
        let date = Self::naming_date(t);

        let doy = day_of_year(date.year, date.month, date.day);
        let hour = (b'a' + date.hour.min(23)) as char;

        let mut formatted = format!(
            "{}{:03}{}{:02}.{}{}",
            self.station,
            doy,
            hour,
            date.minute,
            fixed_width(date.year, 2, '0'),
            file_type.letter()
        );

        if self.gzip {
            formatted.push_str(".gz");
        }

        formatted
    }
}
