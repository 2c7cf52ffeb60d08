//! Observation records
use std::{
    collections::BTreeMap,
    io::{Result, Write},
};

use gnss::prelude::{Constellation, SV};
use itertools::Itertools;

use crate::{
    ephemeris::GpsEphemeris,
    printer::{
        Context,
        codes::ObservationType,
        formatting::{pad_line, write_line},
        time::round_seconds,
    },
    synchro::Synchro,
};

/// Satellites per RINEX 2 epoch line
const V2_SATELLITES_PER_LINE: usize = 12;

/// Observations per RINEX 2 line
const V2_OBSERVATIONS_PER_LINE: usize = 5;

impl Context {
    /// Formats every observation of one satellite: F14.3, blank LLI, SSI
    fn observation_fields(&self, synchro: &Synchro) -> Vec<String> {
        let ssi = synchro.signal_strength();

        self.observables
            .iter()
            .map(|observable| {
                let value = match observable.kind {
                    ObservationType::Pseudorange => synchro.pseudorange_m,
                    ObservationType::CarrierPhase => synchro.carrier_phase_cycles(),
                    ObservationType::Doppler => synchro.carrier_doppler_hz,
                    ObservationType::SignalStrength => synchro.cn0_db_hz,
                };
                format!("{:14.3} {}", value, ssi)
            })
            .collect()
    }

    /// Formats one epoch. `obs_tow` is the receiver time of week,
    /// within `eph` week.
    pub fn format_obs_records<W: Write>(
        &self,
        w: &mut W,
        eph: &GpsEphemeris,
        obs_tow: f64,
        synchros: &BTreeMap<u8, Synchro>,
    ) -> Result<()> {
        let t = self
            .settings
            .rollover
            .calendar(eph.week, round_seconds(obs_tow, 7));

        let satellites = synchros
            .keys()
            .map(|prn| SV::new(Constellation::GPS, *prn))
            .collect::<Vec<_>>();

        if self.major() < 3 {
            let epoch = format!(
                " {:02} {:>2} {:>2} {:>2} {:>2}{:11.7}  0{:>3}",
                t.short_year(),
                t.month,
                t.day,
                t.hour,
                t.minute,
                t.second,
                satellites.len()
            );

            let mut chunks = satellites.chunks(V2_SATELLITES_PER_LINE);

            let first = chunks.next().unwrap_or_default();
            write_line(w, &pad_line(&format!("{}{}", epoch, first.iter().join(""))))?;

            for chunk in chunks {
                let line = format!("{:32}{}", "", chunk.iter().join(""));
                write_line(w, &pad_line(&line))?;
            }

            for synchro in synchros.values() {
                let fields = self.observation_fields(synchro);
                for chunk in fields.chunks(V2_OBSERVATIONS_PER_LINE) {
                    write_line(w, &pad_line(&chunk.join("")))?;
                }
            }
        } else {
            let epoch = format!(
                "> {:04} {:02} {:02} {:02} {:02}{:11.7}  0{:>3}",
                t.year,
                t.month,
                t.day,
                t.hour,
                t.minute,
                t.second,
                satellites.len()
            );
            write_line(w, &pad_line(&epoch))?;

            for (sv, synchro) in satellites.iter().zip(synchros.values()) {
                let line = format!("{}{}", sv, self.observation_fields(synchro).join(""));
                write_line(w, &pad_line(&line))?;
            }
        }

        Ok(())
    }
}
