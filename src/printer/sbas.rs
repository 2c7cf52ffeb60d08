//! SBAS broadcast data records
use std::io::{Result, Write};

use itertools::Itertools;

use crate::{
    printer::{
        Context,
        formatting::{pad_line, write_line},
        time::round_seconds,
    },
    sbas::SbasMessage,
};

/// Message bytes per data record line
const BYTES_PER_LINE: usize = 18;

/// Data record lines per message
const DATA_LINES: usize = 2;

impl Context {
    /// Formats one SBAS message: PRN / EPOCH / RCVR line and two data lines
    pub fn format_sbas_record<W: Write>(&self, w: &mut W, msg: &SbasMessage) -> Result<()> {
        let epoch = match msg.rx_time {
            Some(rx_time) => {
                // rounded first so the field never reads 60.0
                let t = self
                    .settings
                    .rollover
                    .calendar(rx_time.week, round_seconds(rx_time.tow, 1));
                format!(
                    "{:02} {:02} {:02} {:02} {:02} {:4.1}",
                    t.short_year(),
                    t.month,
                    t.day,
                    t.hour,
                    t.minute,
                    t.second
                )
            },
            None => " ".repeat(19),
        };

        let line = format!(
            "{:>3} {}  L1   {:>3}     0   SBA",
            msg.prn,
            epoch,
            msg.data.len()
        );
        write_line(w, &pad_line(&line))?;

        let mut chunks = msg.data.chunks(BYTES_PER_LINE);

        for nth in 0..DATA_LINES {
            let bytes = chunks
                .next()
                .map(|chunk| chunk.iter().map(|byte| format!("{:02x} ", byte)).join(""))
                .unwrap_or_default();

            let line = if nth == 0 {
                format!(" {:>2}    {}", msg.msg_type, bytes)
            } else {
                format!("{:7}{}", "", bytes)
            };

            write_line(w, &pad_line(&line))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::printer::{
        Version,
        test::{assert_line_lengths, context, lines},
    };
    use crate::sbas::{GpsTime, SbasMessage};

    fn message() -> SbasMessage {
        SbasMessage {
            prn: 120,
            rx_time: Some(GpsTime {
                week: 100,
                tow: 86_412.25,
            }),
            msg_type: 9,
            data: (0..32).collect(),
        }
    }

    #[test]
    fn sbas_record() {
        let ctx = context(Version::V2_11);
        let lines = lines(|w| ctx.format_sbas_record(w, &message()));

        assert_line_lengths(&lines);
        assert_eq!(lines.len(), 3);
        assert_eq!(&lines[0][25..27], "L1");

        assert_eq!(
            lines[0],
            "120 01 07 23 00 00 12.3  L1    32     0   SBA                                   "
        );
        assert_eq!(
            lines[1],
            "  9    00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f 10 11                    "
        );
        assert_eq!(
            lines[2],
            "       12 13 14 15 16 17 18 19 1a 1b 1c 1d 1e 1f                                "
        );
    }

    #[test]
    fn sbas_record_without_reception_time() {
        let ctx = context(Version::V3_01);
        let mut msg = message();
        msg.rx_time = None;
        msg.msg_type = 25;
        msg.data.truncate(3);

        let lines = lines(|w| ctx.format_sbas_record(w, &msg));
        assert_line_lengths(&lines);

        assert!(lines[0].starts_with(&format!("120{:22}L1     3     0   SBA", "")));
        assert_eq!(&lines[0][25..27], "L1");
        assert!(lines[1].starts_with(" 25    00 01 02 "));
        assert_eq!(lines[2].trim(), "");
    }

    #[test]
    fn sbas_seconds_tenths() {
        let ctx = context(Version::V2_11);
        let mut msg = message();
        msg.rx_time = Some(GpsTime {
            week: 100,
            tow: 86_412.2,
        });

        let lines = lines(|w| ctx.format_sbas_record(w, &msg));
        assert!(lines[0].starts_with("120 01 07 23 00 00 12.2  L1"));
    }

    #[test]
    fn sbas_seconds_rounding() {
        let ctx = context(Version::V2_11);
        let mut msg = message();
        msg.rx_time = Some(GpsTime {
            week: 100,
            tow: 86_459.96,
        });

        let lines = lines(|w| ctx.format_sbas_record(w, &msg));
        assert!(lines[0].starts_with("120 01 07 23 00 01  0.0"));
    }
}
