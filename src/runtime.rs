use std::collections::BTreeMap;

use crate::ephemeris::{GpsEphemeris, IonoModel, UtcModel};

/// Latest broadcast data, gathered over the session
#[derive(Debug, Default)]
pub struct Runtime {
    /// Latest [IonoModel]
    pub iono: Option<IonoModel>,

    /// Latest [UtcModel]
    pub utc: Option<UtcModel>,

    /// Latest [GpsEphemeris], per PRN
    pub ephemeris: BTreeMap<u8, GpsEphemeris>,

    /// True once the NAV header has been released
    pub nav_header_released: bool,

    /// True once the OBS header has been released
    pub obs_header_released: bool,

    /// True once the SBAS header has been released
    pub sbas_header_released: bool,
}

impl Runtime {
    /// Latch a new [GpsEphemeris].
    /// Returns true when this is a new issue for this satellite.
    pub fn latch_ephemeris(&mut self, eph: GpsEphemeris) -> bool {
        match self.ephemeris.get(&eph.prn) {
            Some(latched) if latched.same_issue(&eph) => false,
            _ => {
                self.ephemeris.insert(eph.prn, eph);
                true
            },
        }
    }

    /// True when the NAV header may be released
    pub fn nav_header_ready(&self) -> bool {
        self.iono.is_some() && self.utc.is_some() && !self.ephemeris.is_empty()
    }

    /// Reference [GpsEphemeris] for observation time tagging:
    /// the lowest PRN we know of.
    pub fn reference_ephemeris(&self) -> Option<&GpsEphemeris> {
        self.ephemeris.values().next()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ephemeris_latching() {
        let mut runtime = Runtime::default();

        let eph = GpsEphemeris {
            prn: 5,
            iode: 10,
            iodc: 10,
            ..Default::default()
        };

        assert!(runtime.latch_ephemeris(eph.clone()));
        assert!(!runtime.latch_ephemeris(eph.clone()));

        let mut update = eph.clone();
        update.iode = 11;
        update.iodc = 11;
        assert!(runtime.latch_ephemeris(update));
        assert_eq!(runtime.ephemeris.len(), 1);
        assert_eq!(runtime.ephemeris[&5].iode, 11);
    }

    #[test]
    fn nav_header_readiness() {
        let mut runtime = Runtime::default();
        assert!(!runtime.nav_header_ready());

        runtime.iono = Some(Default::default());
        runtime.utc = Some(Default::default());
        assert!(!runtime.nav_header_ready());

        runtime.latch_ephemeris(GpsEphemeris {
            prn: 7,
            ..Default::default()
        });
        assert!(runtime.nav_header_ready());
        assert_eq!(runtime.reference_ephemeris().map(|eph| eph.prn), Some(7));
    }
}
