//! Collecter: consumes [Message]s and drives the RINEX [Printer]
use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, error, info, trace};

use tokio::sync::mpsc::Receiver as Rx;

use crate::{
    ephemeris::{GpsEphemeris, IonoModel, UtcModel},
    printer::Printer,
    runtime::Runtime,
    sbas::SbasMessage,
    synchro::ObservationEpoch,
};

#[derive(Debug, Clone)]
pub enum Message {
    /// New [IonoModel]
    Iono(IonoModel),
    /// New [UtcModel]
    Utc(UtcModel),
    /// New [GpsEphemeris]
    Ephemeris(GpsEphemeris),
    /// New [ObservationEpoch]
    Observation(ObservationEpoch),
    /// New [SbasMessage]
    Sbas(SbasMessage),
    /// End of session
    Shutdown,
}

pub struct Collecter {
    /// Receiver channel
    rx: Rx<Message>,

    /// [Printer] we own
    printer: Printer,

    /// [Runtime] state
    runtime: Runtime,
}

impl Collecter {
    /// Builds new [Collecter]
    pub fn new(printer: Printer, rx: Rx<Message>) -> Self {
        Self {
            rx,
            printer,
            runtime: Default::default(),
        }
    }

    /// Consumes messages until [Message::Shutdown] or the channel closes.
    /// The [Printer] is dropped on return.
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                Message::Iono(iono) => {
                    debug!("new ionospheric model");
                    self.runtime.iono = Some(iono);
                    self.release_nav_header();
                },
                Message::Utc(utc) => {
                    debug!("new UTC model");
                    self.runtime.utc = Some(utc);
                    self.release_nav_header();
                },
                Message::Ephemeris(eph) => self.ephemeris(eph),
                Message::Observation(epoch) => self.observation(epoch),
                Message::Sbas(msg) => self.sbas(msg),
                Message::Shutdown => {
                    info!("shutting down");
                    self.report();
                    return;
                },
            }
        }
        debug!("input channel closed");
        self.report();
    }

    /// Reports the collected volume, per file
    fn report(&self) {
        let files = [
            self.printer.nav_file(),
            self.printer.obs_file(),
            self.printer.sbas_file(),
        ];

        for file in files {
            if file.bytes_written() > 0 {
                info!(
                    "{} - RINEX v{}: {} bytes",
                    file.path().display(),
                    self.printer.context().version(),
                    file.bytes_written()
                );
            }
        }
    }

    /// Releases the NAV header, along with every ephemeris latched so far,
    /// as soon as all the required content is known
    fn release_nav_header(&mut self) {
        if self.runtime.nav_header_released || !self.runtime.nav_header_ready() {
            return;
        }

        let (Some(iono), Some(utc)) = (self.runtime.iono, self.runtime.utc) else {
            return;
        };

        if let Err(e) = self.printer.write_nav_header(&iono, &utc) {
            error!("failed to redact NAV header: {}", e);
            return;
        }

        self.runtime.nav_header_released = true;
        debug!("NAV header released");

        if let Err(e) = self.printer.write_nav_records(&self.runtime.ephemeris) {
            error!("failed to redact NAV records: {}", e);
        }
    }

    fn ephemeris(&mut self, eph: GpsEphemeris) {
        let prn = eph.prn;

        if !self.runtime.latch_ephemeris(eph) {
            trace!("G{:02} - ephemeris already known", prn);
            return;
        }

        if !self.runtime.nav_header_released {
            self.release_nav_header();
            return;
        }

        if let Some(eph) = self.runtime.ephemeris.get(&prn) {
            debug!("{} - new ephemeris", eph);

            let update = BTreeMap::from([(prn, eph.clone())]);

            if let Err(e) = self.printer.write_nav_records(&update) {
                error!("{} - failed to redact NAV record: {}", eph.sv(), e);
            }
        }
    }

    fn observation(&mut self, epoch: ObservationEpoch) {
        trace!("tow={} - {}", epoch.tow, epoch.satellites().join(","));

        let Some(eph) = self.runtime.reference_ephemeris().cloned() else {
            debug!("tow={} - no ephemeris yet: observation dropped", epoch.tow);
            return;
        };

        if !self.runtime.obs_header_released {
            if let Err(e) = self.printer.write_obs_header(&eph, epoch.tow) {
                error!("tow={} - failed to redact OBS header: {}", epoch.tow, e);
                return;
            }
            self.runtime.obs_header_released = true;
            debug!("tow={} - OBS header released", epoch.tow);
        }

        if let Err(e) = self
            .printer
            .write_obs_records(&eph, epoch.tow, &epoch.synchros)
        {
            error!("tow={} - failed to redact OBS record: {}", epoch.tow, e);
        }
    }

    fn sbas(&mut self, msg: SbasMessage) {
        if !self.runtime.sbas_header_released {
            if let Err(e) = self.printer.write_sbas_header() {
                error!("failed to redact SBAS header: {}", e);
                return;
            }
            self.runtime.sbas_header_released = true;
            debug!("SBAS header released");
        }

        trace!("{}", msg);

        if let Err(e) = self.printer.write_sbas_record(&msg) {
            error!("S{} - failed to redact SBAS record: {}", msg.prn, e);
        }
    }
}
