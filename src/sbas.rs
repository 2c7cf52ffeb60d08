use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// GPS time of reception
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsTime {
    pub week: u32,
    /// Seconds of week
    pub tow: f64,
}

/// Raw SBAS message (250 bit frame, 32 bytes)
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SbasMessage {
    /// SBAS PRN (120..158)
    pub prn: u8,
    /// Reception time, when resolved
    pub rx_time: Option<GpsTime>,
    /// Message type
    pub msg_type: u8,
    /// Raw message bytes
    pub data: Vec<u8>,
}

impl std::fmt::Display for SbasMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "S{} type={} len={} [{:02x}]",
            self.prn,
            self.msg_type,
            self.data.len(),
            self.data.iter().format(" ")
        )
    }
}
