use std::collections::BTreeMap;

use gnss::prelude::{Constellation, SV};
use serde::{Deserialize, Serialize};

/// Per satellite observables, at one epoch
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Synchro {
    /// Pseudorange (m)
    pub pseudorange_m: f64,
    /// Accumulated carrier phase (rad)
    pub carrier_phase_rads: f64,
    /// Carrier Doppler (Hz)
    pub carrier_doppler_hz: f64,
    /// Carrier to noise density ratio (dB-Hz)
    pub cn0_db_hz: f64,
}

impl std::fmt::Display for Synchro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pr={:.7E} cp={:.7E} dop={:.7E} cn0={:.1}",
            self.pseudorange_m, self.carrier_phase_rads, self.carrier_doppler_hz, self.cn0_db_hz,
        )
    }
}

impl Synchro {
    /// Carrier phase in cycles
    pub fn carrier_phase_cycles(&self) -> f64 {
        self.carrier_phase_rads / std::f64::consts::TAU
    }

    /// RINEX signal strength indicator
    pub fn signal_strength(&self) -> u8 {
        signal_strength(self.cn0_db_hz)
    }
}

/// Maps C/N0 (dB-Hz) to the RINEX 1..9 signal strength indicator
pub fn signal_strength(cn0_db_hz: f64) -> u8 {
    if cn0_db_hz.is_nan() {
        return 1;
    }
    (cn0_db_hz / 6.0).floor().clamp(1.0, 9.0) as u8
}

/// All synchros gathered at one receiver time
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationEpoch {
    /// Receiver time of week (s)
    pub tow: f64,
    /// Synchros, by PRN
    pub synchros: BTreeMap<u8, Synchro>,
}

impl ObservationEpoch {
    /// Observed satellites, in ascending PRN order
    pub fn satellites(&self) -> impl Iterator<Item = SV> + '_ {
        self.synchros
            .keys()
            .map(|prn| SV::new(Constellation::GPS, *prn))
    }
}
