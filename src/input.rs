//! JSON lines inputs: one tagged [Record] per line
use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Stdin},
    path::Path,
};

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    collecter::Message,
    ephemeris::{GpsEphemeris, IonoModel, UtcModel},
    sbas::SbasMessage,
    synchro::ObservationEpoch,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
}

/// Decoded receiver output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Record {
    Iono(IonoModel),
    Utc(UtcModel),
    Ephemeris(GpsEphemeris),
    Observation(ObservationEpoch),
    Sbas(SbasMessage),
}

impl From<Record> for Message {
    fn from(record: Record) -> Self {
        match record {
            Record::Iono(iono) => Self::Iono(iono),
            Record::Utc(utc) => Self::Utc(utc),
            Record::Ephemeris(eph) => Self::Ephemeris(eph),
            Record::Observation(epoch) => Self::Observation(epoch),
            Record::Sbas(msg) => Self::Sbas(msg),
        }
    }
}

/// Input source
pub enum Source {
    /// Plain file
    Plain(File),
    /// Gzip compressed file, named with a `.gz` extension
    Gzip(GzDecoder<File>),
    /// Standard input
    Stdin(Stdin),
}

impl Source {
    /// Opens `path`. "-" designates the standard input.
    pub fn open(path: &str) -> Result<Self, Error> {
        if path == "-" {
            return Ok(Self::Stdin(std::io::stdin()));
        }

        let fd = File::open(path)?;

        let gzip = Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

        if gzip {
            Ok(Self::Gzip(GzDecoder::new(fd)))
        } else {
            Ok(Self::Plain(fd))
        }
    }

    /// Iterates over the [Record]s of this [Source]
    pub fn records(self) -> Records<BufReader<Self>> {
        Records::new(BufReader::new(self))
    }
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(fd) => fd.read(buf),
            Self::Gzip(fd) => fd.read(buf),
            Self::Stdin(stdin) => stdin.read(buf),
        }
    }
}

/// [Record]s iterator. Blank lines are skipped.
pub struct Records<R: BufRead> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();

            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;

                    let content = self.buf.trim();
                    if content.is_empty() {
                        continue;
                    }

                    return Some(serde_json::from_str(content).map_err(|source| Error::Json {
                        line: self.line,
                        source,
                    }));
                },
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::{Cursor, Write};

    use flate2::{Compression, write::GzEncoder};

    const SESSION: &str = r#"{"iono": {"alpha0": 1.0e-8, "beta0": 88064.0}}
{"utc": {"a0": 1.0e-9, "t_ot": 405504, "wn_t": 1771, "delta_t_ls": 16}}

{"ephemeris": {"prn": 12, "week": 100, "iode": 4, "iodc": 4, "block": "IIR-M"}}
{"observation": {"tow": 86400.5, "synchros": {"12": {"pseudorange_m": 2.1e7, "cn0_db_hz": 40.0}}}}
{"sbas": {"prn": 120, "msg_type": 9, "data": [1, 2, 3]}}
"#;

    #[test]
    fn session_records() {
        let records = Records::new(Cursor::new(SESSION))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(records.len(), 5);

        match &records[0] {
            Record::Iono(iono) => {
                assert_eq!(iono.alpha0, 1.0e-8);
                assert_eq!(iono.beta0, 88064.0);
                assert_eq!(iono.alpha1, 0.0);
            },
            other => panic!("unexpected record: {:?}", other),
        }

        match &records[1] {
            Record::Utc(utc) => {
                assert_eq!(utc.wn_t, 1771);
                assert_eq!(utc.delta_t_ls, 16);
            },
            other => panic!("unexpected record: {:?}", other),
        }

        match &records[2] {
            Record::Ephemeris(eph) => {
                assert_eq!(eph.prn, 12);
                assert_eq!(eph.iodc, 4);
            },
            other => panic!("unexpected record: {:?}", other),
        }

        match &records[3] {
            Record::Observation(epoch) => {
                assert_eq!(epoch.tow, 86400.5);
                assert_eq!(epoch.synchros[&12].cn0_db_hz, 40.0);
            },
            other => panic!("unexpected record: {:?}", other),
        }

        match Message::from(records[4].clone()) {
            Message::Sbas(msg) => {
                assert_eq!(msg.prn, 120);
                assert_eq!(msg.data, vec![1, 2, 3]);
                assert!(msg.rx_time.is_none());
            },
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn invalid_line_is_reported() {
        let content = "{\"iono\": {}}\n{\"almanac\": {}}\n";
        let mut records = Records::new(Cursor::new(content));

        assert!(matches!(records.next(), Some(Ok(Record::Iono(_)))));

        match records.next() {
            Some(Err(Error::Json { line, .. })) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(records.next().is_none());
    }

    #[test]
    fn gzip_source() {
        let dir = std::env::temp_dir().join("sdr2rinex-input");
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("session.jsonl.gz");

        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::new(5));
        encoder.write_all(SESSION.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let source = Source::open(path.to_str().unwrap()).unwrap();
        assert!(matches!(source, Source::Gzip(_)));
        assert_eq!(source.records().count(), 5);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Source::open("/nonexistent/session.jsonl"),
            Err(Error::Io(_))
        ));
    }
}
