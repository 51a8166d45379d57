//! Octave-band grid shared by the acoustic engines.
//!
//! Absorption coefficients, RT60 estimates, noise spectra and speech levels
//! are all tabulated on the same six octave bands, 125 Hz through 4 kHz.
//! Material data above 4 kHz is too sparse to be useful, and below 125 Hz
//! room modes dominate and the statistical models stop applying.

use serde::{Deserialize, Serialize};

/// The six octave bands, in ascending frequency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OctaveBand {
    #[serde(rename = "125")]
    Hz125,
    #[serde(rename = "250")]
    Hz250,
    #[serde(rename = "500")]
    Hz500,
    #[serde(rename = "1000")]
    Hz1000,
    #[serde(rename = "2000")]
    Hz2000,
    #[serde(rename = "4000")]
    Hz4000,
}

impl OctaveBand {
    pub const ALL: [OctaveBand; 6] = [
        OctaveBand::Hz125,
        OctaveBand::Hz250,
        OctaveBand::Hz500,
        OctaveBand::Hz1000,
        OctaveBand::Hz2000,
        OctaveBand::Hz4000,
    ];

    /// Band center frequency in Hz.
    pub fn frequency_hz(self) -> f64 {
        match self {
            OctaveBand::Hz125 => 125.0,
            OctaveBand::Hz250 => 250.0,
            OctaveBand::Hz500 => 500.0,
            OctaveBand::Hz1000 => 1000.0,
            OctaveBand::Hz2000 => 2000.0,
            OctaveBand::Hz4000 => 4000.0,
        }
    }

    /// Position of the band in a [`BandValues`] array.
    pub fn index(self) -> usize {
        match self {
            OctaveBand::Hz125 => 0,
            OctaveBand::Hz250 => 1,
            OctaveBand::Hz500 => 2,
            OctaveBand::Hz1000 => 3,
            OctaveBand::Hz2000 => 4,
            OctaveBand::Hz4000 => 5,
        }
    }
}

/// One value per octave band, ordered 125 Hz → 4 kHz.
///
/// Serializes as a plain six-element array so JS callers can pass
/// `[0.1, 0.1, 0.2, 0.3, 0.4, 0.4]` directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandValues(pub [f64; 6]);

impl BandValues {
    pub const ZERO: BandValues = BandValues([0.0; 6]);

    /// The same value in every band.
    pub fn splat(value: f64) -> Self {
        BandValues([value; 6])
    }

    pub fn values(&self) -> &[f64; 6] {
        &self.0
    }

    /// Mean of the 500 Hz, 1 kHz and 2 kHz bands, the conventional
    /// single-number summary for speech-range behavior.
    pub fn speech_range_average(&self) -> f64 {
        (self[OctaveBand::Hz500] + self[OctaveBand::Hz1000] + self[OctaveBand::Hz2000]) / 3.0
    }
}

impl std::ops::Index<OctaveBand> for BandValues {
    type Output = f64;

    fn index(&self, band: OctaveBand) -> &f64 {
        &self.0[band.index()]
    }
}

impl std::ops::IndexMut<OctaveBand> for BandValues {
    fn index_mut(&mut self, band: OctaveBand) -> &mut f64 {
        &mut self.0[band.index()]
    }
}
