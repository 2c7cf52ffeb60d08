//! Navigation, observation and SBAS headers
use std::io::{Result, Write};

use gnss::prelude::Constellation;
use itertools::Itertools;

use crate::{
    ephemeris::{GpsEphemeris, IonoModel, UtcModel},
    printer::{
        Context,
        codes::system_code,
        formatting::{comment_lines, fixed_decimal, header_line, right_justify, write_line},
        time::round_seconds,
    },
};

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

fn write_header_line<W: Write>(w: &mut W, content: &str, label: &str) -> Result<()> {
    write_line(w, &header_line(content, label))
}

/// Three F14.4 fields
fn position_fields(values: &[f64; 3]) -> String {
    values
        .iter()
        .map(|value| right_justify(&fixed_decimal(*value, 4), 14))
        .join("")
}

fn write_end_of_header<W: Write>(w: &mut W) -> Result<()> {
    write_header_line(w, "", "END OF HEADER")
}

impl Context {
    /// Creation date, as reported in the PGM / RUN BY / DATE field
    fn creation_date(&self) -> String {
        let (y, m, d, hh, mm, ss, _) = self.created.to_gregorian_utc();
        if self.major() < 3 {
            let month = MONTHS[(m.clamp(1, 12) - 1) as usize];
            format!(
                "{:>2}-{}-{:02} {:02}:{:02}",
                d,
                month,
                y.rem_euclid(100),
                hh,
                mm
            )
        } else {
            format!("{:04}{:02}{:02} {:02}{:02}{:02} UTC", y, m, d, hh, mm, ss)
        }
    }

    fn write_version_line<W: Write>(&self, w: &mut W, file_type: &str, system: &str) -> Result<()> {
        let content = format!(
            "{:>9}{:11}{:<20}{:<20}",
            self.settings.version.to_string(),
            "",
            file_type,
            system
        );
        write_header_line(w, &content, "RINEX VERSION / TYPE")
    }

    fn write_program_line<W: Write>(&self, w: &mut W, date: &str) -> Result<()> {
        let content = format!(
            "{:<20.20}{:<20.20}{:<20.20}",
            self.settings.program, self.settings.agency, date
        );
        write_header_line(w, &content, "PGM / RUN BY / DATE")
    }

    /// Generator comment, followed by the user comment (if any)
    fn write_comments<W: Write>(&self, w: &mut W, generated: &str) -> Result<()> {
        let generated = format!("{} GENERATED BY {}", generated, self.settings.program);

        for line in comment_lines(&generated.to_uppercase()) {
            write_line(w, &line)?;
        }

        if let Some(comment) = &self.settings.header_comment {
            for line in comment_lines(comment) {
                write_line(w, &line)?;
            }
        }

        Ok(())
    }

    /// Formats the navigation header
    pub fn format_nav_header<W: Write>(
        &self,
        w: &mut W,
        iono: &IonoModel,
        utc: &UtcModel,
    ) -> Result<()> {
        let rollover = &self.settings.rollover;

        if self.major() < 3 {
            self.write_version_line(w, "N: GPS NAV DATA", "")?;
        } else {
            let system = format!("{:x}: {:E}", Constellation::GPS, Constellation::GPS);
            self.write_version_line(w, "N: GNSS NAV DATA", &system)?;
        }

        self.write_program_line(w, &self.creation_date())?;
        self.write_comments(w, "GPS NAVIGATION MESSAGE FILE")?;

        if self.major() < 3 {
            let alpha = iono.alpha().iter().map(|v| self.float(*v, 12, 4)).join("");
            write_header_line(w, &format!("  {}", alpha), "ION ALPHA")?;

            let beta = iono.beta().iter().map(|v| self.float(*v, 12, 4)).join("");
            write_header_line(w, &format!("  {}", beta), "ION BETA")?;

            let content = format!(
                "   {}{}{:>9}{:>9}",
                self.float(utc.a0, 19, 12),
                self.float(utc.a1, 19, 12),
                utc.t_ot,
                rollover.continuous_week(utc.wn_t),
            );
            write_header_line(w, &content, "DELTA-UTC: A0,A1,T,W")?;

            write_header_line(w, &format!("{:>6}", utc.delta_t_ls), "LEAP SECONDS")?;
        } else {
            let alpha = iono.alpha().iter().map(|v| self.float(*v, 12, 4)).join("");
            write_header_line(w, &format!("GPSA {}", alpha), "IONOSPHERIC CORR")?;

            let beta = iono.beta().iter().map(|v| self.float(*v, 12, 4)).join("");
            write_header_line(w, &format!("GPSB {}", beta), "IONOSPHERIC CORR")?;

            let content = format!(
                "GPUT {}{}{:>7}{:>5}",
                self.float(utc.a0, 17, 10),
                self.float(utc.a1, 16, 9),
                utc.t_ot,
                rollover.continuous_week(utc.wn_t),
            );
            write_header_line(w, &content, "TIME SYSTEM CORR")?;

            let content = format!(
                "{:>6}{:>6}{:>6}{:>6}",
                utc.delta_t_ls, utc.delta_t_lsf, utc.wn_lsf, utc.dn
            );
            write_header_line(w, &content, "LEAP SECONDS")?;
        }

        write_end_of_header(w)
    }

    /// Formats the observation header. `first_obs_tow` is the receiver
    /// time of week of the first epoch, within `eph` week.
    pub fn format_obs_header<W: Write>(
        &self,
        w: &mut W,
        eph: &GpsEphemeris,
        first_obs_tow: f64,
    ) -> Result<()> {
        let settings = &self.settings;

        self.write_version_line(w, "OBSERVATION DATA", &system_code(Constellation::GPS))?;

        let legend = if self.major() < 3 {
            "BLANK OR G = GPS,  R = GLONASS,  E = GALILEO,  M = MIXED"
        } else {
            "G = GPS  R = GLONASS  E = GALILEO  S = GEO  M = MIXED"
        };
        write_header_line(w, legend, "COMMENT")?;

        self.write_program_line(w, &self.creation_date())?;
        self.write_comments(w, "GPS OBSERVATION DATA FILE")?;

        write_header_line(w, &settings.marker, "MARKER NAME")?;

        let content = format!("{:<20.20}{:<40.40}", settings.observer, settings.agency);
        write_header_line(w, &content, "OBSERVER / AGENCY")?;

        let content = format!(
            "{:<20.20}{:<20.20}{:<20.20}",
            settings.receiver_number, settings.receiver_type, settings.receiver_version
        );
        write_header_line(w, &content, "REC # / TYPE / VERS")?;

        let content = format!(
            "{:<20.20}{:<20.20}",
            settings.antenna_number, settings.antenna_type
        );
        write_header_line(w, &content, "ANT # / TYPE")?;

        let (x, y, z) = settings.approx_position;
        write_header_line(w, &position_fields(&[x, y, z]), "APPROX POSITION XYZ")?;

        let (h, e, n) = settings.antenna_delta;
        write_header_line(w, &position_fields(&[h, e, n]), "ANTENNA: DELTA H/E/N")?;

        if self.major() < 3 {
            write_header_line(w, &format!("{:>6}{:>6}", 1, 1), "WAVELENGTH FACT L1/2")?;

            let content = format!(
                "{:>6}{}",
                self.observables.len(),
                self.observables
                    .iter()
                    .map(|obs| format!("{:>6}", obs.v2_token()))
                    .join("")
            );
            write_header_line(w, &content, "# / TYPES OF OBSERV")?;
        } else {
            let content = format!(
                "{}  {:>3} {}",
                system_code(Constellation::GPS),
                self.observables.len(),
                self.observables.iter().map(|obs| obs.v3_token()).join(" ")
            );
            write_header_line(w, &content, "SYS / # / OBS TYPES")?;

            write_header_line(w, &format!("{:<20}", "DBHZ"), "SIGNAL STRENGTH UNIT")?;
        }

        let t = settings
            .rollover
            .calendar(eph.week, round_seconds(first_obs_tow, 7));

        let content = format!(
            "{:>6}{:>6}{:>6}{:>6}{:>6}{:>13.7}{:>8}",
            t.year, t.month, t.day, t.hour, t.minute, t.second, "GPS"
        );
        write_header_line(w, &content, "TIME OF FIRST OBS")?;

        write_end_of_header(w)
    }

    /// Formats the SBAS broadcast data header
    pub fn format_sbas_header<W: Write>(&self, w: &mut W) -> Result<()> {
        let content = format!("{:>9}{:11}{:<20}{:20}", "2.10", "", "B SBAS DATA", "");
        write_header_line(w, &content, "RINEX VERSION / TYPE")?;

        let (y, m, d, hh, mm, _, _) = self.created.to_gregorian_utc();
        let date = format!(
            "{:02}-{:02}-{:02} {:02}{:02}",
            d,
            m,
            y.rem_euclid(100),
            hh,
            mm
        );
        self.write_program_line(w, &date)?;

        let content = format!(
            "{:>3} {:<20.20} {:<20.20}",
            0, self.settings.receiver_type, self.settings.receiver_version
        );
        write_header_line(w, &content, "REC INDEX/TYPE/VERS")?;

        self.write_comments(w, "BROADCAST DATA FILE FOR GEO SV,")?;

        write_end_of_header(w)
    }
}

#[cfg(test)]
mod test {
    use crate::ephemeris::{GpsEphemeris, IonoModel, UtcModel};
    use crate::printer::{
        Version,
        test::{assert_line_lengths, context, lines},
    };

    fn iono() -> IonoModel {
        IonoModel {
            alpha0: 1.0244548320770E-08,
            alpha1: 2.2351741790771E-08,
            alpha2: -5.9604644775391E-08,
            alpha3: -1.1920928955078E-07,
            beta0: 8.8064000000000E+04,
            beta1: 4.9152000000000E+04,
            beta2: -1.3107200000000E+05,
            beta3: -3.2768000000000E+05,
        }
    }

    fn utc() -> UtcModel {
        UtcModel {
            a0: 1.862645149231E-09,
            a1: 1.065814104103E-14,
            t_ot: 405504,
            wn_t: 747,
            delta_t_ls: 16,
            wn_lsf: 137,
            dn: 7,
            delta_t_lsf: 16,
        }
    }

    #[test]
    fn v2_nav_header() {
        let ctx = context(Version::V2_11);
        let lines = lines(|w| ctx.format_nav_header(w, &iono(), &utc()));

        assert_line_lengths(&lines);

        assert_eq!(
            lines[0],
            "     2.11           N: GPS NAV DATA                         RINEX VERSION / TYPE"
        );
        assert_eq!(
            lines[1],
            "sdr2rinex           SDR                 21-JAN-14 09:05     PGM / RUN BY / DATE "
        );
        assert!(lines[2].starts_with("GPS NAVIGATION MESSAGE FILE GENERATED BY SDR2RINEX"));
        assert_eq!(
            lines[3],
            "    0.1024D-07  0.2235D-07 -0.5960D-07 -0.1192D-06          ION ALPHA           "
        );
        assert_eq!(
            lines[4],
            "    0.8806D+05  0.4915D+05 -0.1311D+06 -0.3277D+06          ION BETA            "
        );
        assert_eq!(
            lines[5],
            "    0.186264514923D-08 0.106581410410D-13   405504     1771 DELTA-UTC: A0,A1,T,W"
        );
        assert_eq!(
            lines[6],
            "    16                                                      LEAP SECONDS        "
        );
        assert_eq!(
            lines[7],
            "                                                            END OF HEADER       "
        );
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn v3_nav_header() {
        let ctx = context(Version::V3_01);
        let lines = lines(|w| ctx.format_nav_header(w, &iono(), &utc()));

        assert_line_lengths(&lines);

        assert_eq!(
            lines[0],
            "     3.01           N: GNSS NAV DATA    G: GPS              RINEX VERSION / TYPE"
        );
        assert_eq!(
            lines[1],
            "sdr2rinex           SDR                 20140121 090533 UTC PGM / RUN BY / DATE "
        );
        assert_eq!(
            lines[3],
            "GPSA   0.1024E-07  0.2235E-07 -0.5960E-07 -0.1192E-06       IONOSPHERIC CORR    "
        );
        assert!(lines[4].starts_with("GPSB   0.8806E+05"));
        assert_eq!(
            lines[5],
            "GPUT  0.1862645149E-08 0.106581410E-13 405504 1771          TIME SYSTEM CORR    "
        );
        assert_eq!(
            lines[6],
            "    16    16   137     7                                    LEAP SECONDS        "
        );
        assert!(lines[7].contains("END OF HEADER"));
    }

    #[test]
    fn user_comments() {
        let mut ctx = context(Version::V2_11);
        ctx.settings.header_comment = Some("roof antenna, clear sky".to_string());

        let lines = lines(|w| ctx.format_nav_header(w, &iono(), &utc()));
        assert_line_lengths(&lines);
        assert_eq!(
            lines[3],
            "roof antenna, clear sky                                     COMMENT             "
        );
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn v2_obs_header() {
        let ctx = context(Version::V2_11);
        let eph = GpsEphemeris {
            prn: 1,
            week: 100,
            ..Default::default()
        };

        let lines = lines(|w| ctx.format_obs_header(w, &eph, 86_400.0));
        assert_line_lengths(&lines);

        assert_eq!(
            lines[0],
            "     2.11           OBSERVATION DATA    G                   RINEX VERSION / TYPE"
        );
        assert!(lines[1].starts_with("BLANK OR G = GPS"));
        assert!(lines[2].ends_with("PGM / RUN BY / DATE "));
        assert!(lines[3].starts_with("GPS OBSERVATION DATA FILE GENERATED BY SDR2RINEX"));
        assert!(lines[4].starts_with("DEFAULT MARKER NAME"));
        assert_eq!(
            lines[5],
            "OBSERVER            SDR                                     OBSERVER / AGENCY   "
        );
        assert!(lines[6].ends_with("REC # / TYPE / VERS "));
        assert!(lines[7].ends_with("ANT # / TYPE        "));
        assert_eq!(
            lines[8],
            "        0.0000        0.0000        0.0000                  APPROX POSITION XYZ "
        );
        assert!(lines[9].ends_with("ANTENNA: DELTA H/E/N"));
        assert_eq!(
            lines[10],
            "     1     1                                                WAVELENGTH FACT L1/2"
        );
        assert_eq!(
            lines[11],
            "     4    C1    L1    D1    S1                              # / TYPES OF OBSERV "
        );
        assert_eq!(
            lines[12],
            "  2001     7    23     0     0    0.0000000     GPS         TIME OF FIRST OBS   "
        );
        assert!(lines[13].contains("END OF HEADER"));
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn v3_obs_header() {
        let ctx = context(Version::V3_01);
        let eph = GpsEphemeris {
            prn: 1,
            week: 100,
            ..Default::default()
        };

        let lines = lines(|w| ctx.format_obs_header(w, &eph, 86_412.5));
        assert_line_lengths(&lines);

        assert!(lines[0].starts_with("     3.01           OBSERVATION DATA    G"));
        assert!(lines[1].starts_with("G = GPS  R = GLONASS"));
        assert_eq!(
            lines[10],
            "G    4 C1C L1C D1C S1C                                      SYS / # / OBS TYPES "
        );
        assert_eq!(
            lines[11],
            "DBHZ                                                        SIGNAL STRENGTH UNIT"
        );
        assert_eq!(
            lines[12],
            "  2001     7    23     0     0   12.5000000     GPS         TIME OF FIRST OBS   "
        );
        assert!(lines[13].contains("END OF HEADER"));
    }

    #[test]
    fn sbas_header() {
        let ctx = context(Version::V3_01);
        let lines = lines(|w| ctx.format_sbas_header(w));
        assert_line_lengths(&lines);

        assert_eq!(
            lines[0],
            "     2.10           B SBAS DATA                             RINEX VERSION / TYPE"
        );
        assert_eq!(
            lines[1],
            "sdr2rinex           SDR                 21-01-14 0905       PGM / RUN BY / DATE "
        );
        assert!(lines[2].starts_with("  0 Software Receiver"));
        assert!(lines[2].ends_with("REC INDEX/TYPE/VERS "));
        assert!(lines[3].starts_with("BROADCAST DATA FILE FOR GEO SV, GENERATED BY SDR2RINEX"));
        assert!(lines[4].contains("END OF HEADER"));
    }
}
