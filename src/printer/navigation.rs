//! Navigation (ephemeris) records
use std::{
    collections::BTreeMap,
    io::{Result, Write},
};

use itertools::Itertools;
use log::trace;

use crate::{
    ephemeris::GpsEphemeris,
    printer::{
        Context,
        formatting::{pad_line, write_line},
        time::round_seconds,
    },
};

impl Context {
    /// Broadcast orbit line: up to 4 fields, missing ones are blank spares
    fn orbit_line(&self, fields: &[Option<f64>]) -> String {
        let indent = if self.major() < 3 { 3 } else { 4 };

        let content = fields
            .iter()
            .map(|field| match field {
                Some(value) => self.float(*value, 19, 12),
                None => " ".repeat(19),
            })
            .join("");

        pad_line(&format!("{:indent$}{}", "", content, indent = indent))
    }

    /// SV / EPOCH / SV CLK line, epoch being the time of clock
    fn sv_epoch_line(&self, eph: &GpsEphemeris) -> String {
        let clock = [eph.af0, eph.af1, eph.af2]
            .iter()
            .map(|value| self.float(*value, 19, 12))
            .join("");

        let rollover = &self.settings.rollover;

        if self.major() < 3 {
            let t = rollover.calendar(eph.week, round_seconds(eph.toc, 1));
            pad_line(&format!(
                "{:>2} {:02} {:>2} {:>2} {:>2} {:>2}{:5.1}{}",
                eph.prn,
                t.short_year(),
                t.month,
                t.day,
                t.hour,
                t.minute,
                t.second,
                clock
            ))
        } else {
            let t = rollover.calendar(eph.week, eph.toc.round());
            pad_line(&format!(
                "{} {:04} {:02} {:02} {:02} {:02} {:02}{}",
                eph.sv(),
                t.year,
                t.month,
                t.day,
                t.hour,
                t.minute,
                t.second.round() as u8,
                clock
            ))
        }
    }

    /// Formats one record: epoch line followed by 7 broadcast orbits
    fn format_nav_record<W: Write>(&self, w: &mut W, eph: &GpsEphemeris) -> Result<()> {
        let week = self.settings.rollover.continuous_week(eph.week);

        write_line(w, &self.sv_epoch_line(eph))?;

        let orbits = [
            [
                Some(eph.iode as f64),
                Some(eph.crs),
                Some(eph.delta_n),
                Some(eph.m0),
            ],
            [Some(eph.cuc), Some(eph.e), Some(eph.cus), Some(eph.sqrt_a)],
            [Some(eph.toe), Some(eph.cic), Some(eph.omega0), Some(eph.cis)],
            [Some(eph.i0), Some(eph.crc), Some(eph.omega), Some(eph.omega_dot)],
            [
                Some(eph.idot),
                Some(eph.code_on_l2 as f64),
                Some(week as f64),
                Some(eph.l2p_flag as f64),
            ],
            [
                Some(eph.ura_meters()),
                Some(eph.sv_health as f64),
                Some(eph.tgd),
                Some(eph.iodc as f64),
            ],
            [Some(eph.tow), Some(eph.fit_interval() as f64), None, None],
        ];

        for orbit in orbits.iter() {
            write_line(w, &self.orbit_line(orbit))?;
        }

        trace!("{} - formatted", eph);
        Ok(())
    }

    /// Formats all ephemeris, in ascending PRN order
    pub fn format_nav_records<W: Write>(
        &self,
        w: &mut W,
        ephemeris: &BTreeMap<u8, GpsEphemeris>,
    ) -> Result<()> {
        for eph in ephemeris.values() {
            self.format_nav_record(w, eph)?;
        }
        Ok(())
    }
}
