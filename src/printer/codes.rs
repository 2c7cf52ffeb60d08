//! Observation code tables.
//!
//! Every token we emit comes from an exhaustive match,
//! so a missing table entry is a compilation error.
use std::str::FromStr;

use gnss::prelude::Constellation;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsingError {
    #[error("unknown observation code \"{0}\"")]
    UnknownCode(String),
}

/// Physical quantity of an observable
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObservationType {
    Pseudorange,
    CarrierPhase,
    Doppler,
    SignalStrength,
}

impl ObservationType {
    /// Types we produce, in emission order
    pub const ALL: [Self; 4] = [
        Self::Pseudorange,
        Self::CarrierPhase,
        Self::Doppler,
        Self::SignalStrength,
    ];
}

impl std::fmt::Display for ObservationType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Pseudorange => write!(f, "C"),
            Self::CarrierPhase => write!(f, "L"),
            Self::Doppler => write!(f, "D"),
            Self::SignalStrength => write!(f, "S"),
        }
    }
}

/// GPS band and tracking mode, RINEX 3 two character code
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObservationCode {
    /// L1 C/A
    #[default]
    L1CA,
    /// L1 P
    L1P,
    /// L1 Z-tracking (AS on)
    L1Z,
    /// L1 Y
    L1Y,
    /// L1 M
    L1M,
    /// L1 codeless
    L1N,
    /// L2 C/A
    L2CA,
    /// L2 L1(C/A)+(P2-P1) semi-codeless
    L2D,
    /// L2C (M)
    L2CM,
    /// L2C (L)
    L2CL,
    /// L2C (M+L)
    L2CML,
    /// L2 P
    L2P,
    /// L2 Z-tracking (AS on)
    L2Z,
    /// L2 Y
    L2Y,
    /// L2 M
    L2M,
    /// L2 codeless
    L2N,
    /// L5 I
    L5I,
    /// L5 Q
    L5Q,
    /// L5 I+Q
    L5X,
}

impl std::fmt::Display for ObservationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code = match self {
            Self::L1CA => "1C",
            Self::L1P => "1P",
            Self::L1Z => "1W",
            Self::L1Y => "1Y",
            Self::L1M => "1M",
            Self::L1N => "1N",
            Self::L2CA => "2C",
            Self::L2D => "2D",
            Self::L2CM => "2S",
            Self::L2CL => "2L",
            Self::L2CML => "2X",
            Self::L2P => "2P",
            Self::L2Z => "2W",
            Self::L2Y => "2Y",
            Self::L2M => "2M",
            Self::L2N => "2N",
            Self::L5I => "5I",
            Self::L5Q => "5Q",
            Self::L5X => "5X",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for ObservationCode {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1C" => Ok(Self::L1CA),
            "1P" => Ok(Self::L1P),
            "1W" => Ok(Self::L1Z),
            "1Y" => Ok(Self::L1Y),
            "1M" => Ok(Self::L1M),
            "1N" => Ok(Self::L1N),
            "2C" => Ok(Self::L2CA),
            "2D" => Ok(Self::L2D),
            "2S" => Ok(Self::L2CM),
            "2L" => Ok(Self::L2CL),
            "2X" => Ok(Self::L2CML),
            "2P" => Ok(Self::L2P),
            "2W" => Ok(Self::L2Z),
            "2Y" => Ok(Self::L2Y),
            "2M" => Ok(Self::L2M),
            "2N" => Ok(Self::L2N),
            "5I" => Ok(Self::L5I),
            "5Q" => Ok(Self::L5Q),
            "5X" => Ok(Self::L5X),
            other => Err(ParsingError::UnknownCode(other.to_string())),
        }
    }
}

impl ObservationCode {
    /// Frequency band number (1, 2 or 5)
    pub fn band(&self) -> u8 {
        match self {
            Self::L1CA | Self::L1P | Self::L1Z | Self::L1Y | Self::L1M | Self::L1N => 1,
            Self::L5I | Self::L5Q | Self::L5X => 5,
            _ => 2,
        }
    }

    /// True when this signal is tracked on a P(Y) like code,
    /// which RINEX 2 reports as a P pseudorange.
    pub fn is_precise(&self) -> bool {
        matches!(
            self,
            Self::L1P
                | Self::L1Z
                | Self::L1Y
                | Self::L1M
                | Self::L1N
                | Self::L2D
                | Self::L2P
                | Self::L2Z
                | Self::L2Y
                | Self::L2M
                | Self::L2N
        )
    }
}

/// One observable: a quantity measured on a signal
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Observable {
    pub kind: ObservationType,
    pub code: ObservationCode,
}

impl Observable {
    pub fn new(kind: ObservationType, code: ObservationCode) -> Self {
        Self { kind, code }
    }

    /// RINEX 2 two character token (C1, P2, L1..)
    pub fn v2_token(&self) -> String {
        let kind = match self.kind {
            ObservationType::Pseudorange if self.code.is_precise() => "P".to_string(),
            kind => kind.to_string(),
        };
        format!("{}{}", kind, self.code.band())
    }

    /// RINEX 3 three character token (C1C, L1C..)
    pub fn v3_token(&self) -> String {
        format!("{}{}", self.kind, self.code)
    }
}

/// Observables produced for `code`, in emission order
pub fn observables(code: ObservationCode) -> Vec<Observable> {
    ObservationType::ALL
        .iter()
        .map(|kind| Observable::new(*kind, code))
        .collect()
}

/// Single character code of a satellite system
pub fn system_code(constellation: Constellation) -> String {
    format!("{:x}", constellation)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn observation_codes() {
        for token in [
            "1C", "1P", "1W", "1Y", "1M", "1N", "2C", "2D", "2S", "2L", "2X", "2P", "2W", "2Y",
            "2M", "2N", "5I", "5Q", "5X",
        ] {
            let code = ObservationCode::from_str(token).unwrap();
            assert_eq!(code.to_string(), token);
            assert_eq!(code.band().to_string(), &token[..1]);
        }

        assert_eq!(
            ObservationCode::from_str("7X"),
            Err(ParsingError::UnknownCode("7X".to_string()))
        );
    }

    #[test]
    fn gps_l1_ca_tokens() {
        let tokens = observables(ObservationCode::L1CA);
        assert_eq!(
            tokens.iter().map(|obs| obs.v2_token()).collect::<Vec<_>>(),
            vec!["C1", "L1", "D1", "S1"]
        );
        assert_eq!(
            tokens.iter().map(|obs| obs.v3_token()).collect::<Vec<_>>(),
            vec!["C1C", "L1C", "D1C", "S1C"]
        );
    }

    #[test]
    fn precise_code_tokens() {
        let tokens = observables(ObservationCode::L2Z);
        assert_eq!(tokens[0].v2_token(), "P2");
        assert_eq!(tokens[1].v2_token(), "L2");
        assert_eq!(tokens[0].v3_token(), "C2W");

        let tokens = observables(ObservationCode::L5X);
        assert_eq!(tokens[0].v2_token(), "C5");
    }

    #[test]
    fn system_codes() {
        assert_eq!(system_code(Constellation::GPS), "G");
        assert_eq!(system_code(Constellation::Galileo), "E");
        assert_eq!(system_code(Constellation::Glonass), "R");
    }
}
