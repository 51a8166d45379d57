//! Speech Transmission Index via the modulation transfer function.
//!
//! Speech intelligibility degrades when a room's reverberant tail and its
//! background noise flatten the envelope modulations that carry speech.
//! The MTF model quantifies how much modulation survives per octave band
//! and per modulation frequency, converts that to an apparent SNR, and
//! folds the bands together with the standard importance weights.

use serde::{Deserialize, Serialize};

use crate::acoustics::bands::{BandValues, OctaveBand};

/// The fourteen standard modulation frequencies, Hz.
const MODULATION_FREQUENCIES: [f64; 14] = [
    0.63, 0.80, 1.00, 1.25, 1.60, 2.00, 2.50, 3.15, 4.00, 5.00, 6.30, 8.00, 10.00, 12.50,
];

/// Octave-band importance weights. They sum to 1.0; 8 kHz carries no
/// weight in the standard computation.
const OCTAVE_WEIGHTS: BandValues = BandValues([0.085, 0.127, 0.230, 0.233, 0.192, 0.133]);

/// Apparent-SNR clamp range, dB. The STI scale is a linear remap of this.
const SNR_CLAMP_DB: f64 = 15.0;

/// Per-band acoustic conditions for a full STI computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StiParameters {
    /// RT60 per octave band, seconds.
    pub rt60_values: BandValues,
    /// Background noise level per band, dB SPL.
    pub background_noise: BandValues,
    /// Speech or program signal level per band, dB SPL.
    pub signal_level: BandValues,
    /// Listener distance from the source, meters. Carried for reporting;
    /// the band levels are already distance-resolved.
    pub distance: f64,
}

/// Qualitative rating bands per IEC 60268-16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StiRating {
    Bad,
    Poor,
    Fair,
    Good,
    Excellent,
}

/// How much each degradation source contributed, as weighted modulation
/// loss. Level and nonlinearity effects are not modeled and report zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModificationFactors {
    pub noise: f64,
    pub reverberation: f64,
    pub level: f64,
    pub nonlinearity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StiResult {
    /// Overall STI on the 0..1 scale, rounded to two decimals.
    pub value: f64,
    /// Rating derived from the unrounded value.
    pub rating: StiRating,
    /// Per-band STI for the six weighted bands.
    pub octave_bands: BandValues,
    /// The 8 kHz band is carried for completeness and is always 0.
    pub band_8000: f64,
    pub modification_factors: ModificationFactors,
}

/// Modulation transfer function for one band and modulation frequency:
/// the product of the reverberation rolloff `1/√(1+(2π·fm·RT60/13.8)²)`
/// and the noise term `snr/(1+snr)` with snr in linear power units.
fn modulation_transfer(rt60: f64, signal_to_noise_db: f64, modulation_freq: f64) -> f64 {
    let reverb_term = 2.0 * std::f64::consts::PI * modulation_freq * rt60 / 13.8;
    let reverb_reduction = 1.0 / (1.0 + reverb_term * reverb_term).sqrt();
    let snr_ratio = 10.0_f64.powf(signal_to_noise_db / 10.0);
    let noise_reduction = snr_ratio / (1.0 + snr_ratio);
    reverb_reduction * noise_reduction
}

/// Converts a modulation index to an apparent SNR in dB, clamped to
/// ±15 dB. Degenerate indices pin to the clamp ends.
fn apparent_snr(modulation: f64) -> f64 {
    if modulation <= 0.0 {
        return -SNR_CLAMP_DB;
    }
    if modulation >= 1.0 {
        return SNR_CLAMP_DB;
    }
    let snr = 10.0 * (modulation / (1.0 - modulation)).log10();
    snr.clamp(-SNR_CLAMP_DB, SNR_CLAMP_DB)
}

/// Rating thresholds are half-open: a value sits in the highest band whose
/// lower bound it reaches.
pub fn sti_rating(sti: f64) -> StiRating {
    if sti < 0.30 {
        StiRating::Bad
    } else if sti < 0.45 {
        StiRating::Poor
    } else if sti < 0.60 {
        StiRating::Fair
    } else if sti < 0.75 {
        StiRating::Good
    } else {
        StiRating::Excellent
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the full STI from per-band RT60, noise and signal levels.
pub fn compute_sti(parameters: &StiParameters) -> StiResult {
    let mut octave_sti = BandValues::ZERO;
    let mut noise_factor = 0.0;
    let mut reverb_factor = 0.0;

    for band in OctaveBand::ALL {
        let snr = parameters.signal_level[band] - parameters.background_noise[band];
        let rt60 = parameters.rt60_values[band];

        let mut snr_sum = 0.0;
        let mut mtf_sum = 0.0;
        for modulation_freq in MODULATION_FREQUENCIES {
            let m = modulation_transfer(rt60, snr, modulation_freq);
            mtf_sum += m;
            snr_sum += apparent_snr(m);
        }

        let count = MODULATION_FREQUENCIES.len() as f64;
        let average_snr = snr_sum / count;
        octave_sti[band] = (average_snr + SNR_CLAMP_DB) / (2.0 * SNR_CLAMP_DB);

        // The simplified model cannot split the modulation loss between its
        // two causes, so both factors accumulate the combined loss.
        let degradation = (1.0 - mtf_sum / count) * OCTAVE_WEIGHTS[band];
        noise_factor += degradation;
        reverb_factor += degradation;
    }

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for band in OctaveBand::ALL {
        weighted_sum += octave_sti[band] * OCTAVE_WEIGHTS[band];
        weight_sum += OCTAVE_WEIGHTS[band];
    }
    let sti = weighted_sum / weight_sum;

    StiResult {
        value: round2(sti),
        rating: sti_rating(sti),
        octave_bands: octave_sti,
        band_8000: 0.0,
        modification_factors: ModificationFactors {
            noise: round2(noise_factor),
            reverberation: round2(reverb_factor),
            level: 0.0,
            nonlinearity: 0.0,
        },
    }
}

/// Quick single-number STI estimate from a broadband RT60 and SNR.
///
/// Deliberately a separate empirical model, not a shortcut through the MTF
/// computation: RT60 contributes up to 0.5, SNR up to 0.5, and the sum is
/// clamped to the 0..1 scale.
pub fn estimate_sti(rt60: f64, snr: f64) -> f64 {
    let rt60_factor = (0.5 - (rt60 - 0.5) * 0.3).max(0.0);
    let snr_factor = (snr / 50.0).clamp(0.0, 0.5);
    (rt60_factor + snr_factor).clamp(0.0, 1.0)
}

/// Acoustic conditions needed to reach a target STI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredConditions {
    /// Maximum workable RT60, seconds.
    pub max_rt60: f64,
    /// Minimum required SNR, dB.
    pub min_snr: f64,
    pub recommendations: Vec<String>,
}

/// Maps a target STI to the RT60 and SNR envelope that experience says is
/// needed to reach it, with advisory notes on how far the current room is
/// from that envelope.
pub fn required_conditions(
    target_sti: f64,
    current_rt60: f64,
    current_noise: f64,
) -> RequiredConditions {
    let mut recommendations = Vec::new();

    let (max_rt60, min_snr) = if target_sti >= 0.75 {
        recommendations
            .push("Excellent intelligibility requires very controlled acoustics".to_string());
        (0.5, 25.0)
    } else if target_sti >= 0.60 {
        recommendations
            .push("Good intelligibility is achievable with moderate acoustic treatment".to_string());
        (0.8, 20.0)
    } else if target_sti >= 0.45 {
        recommendations.push("Fair intelligibility - suitable for most applications".to_string());
        (1.2, 15.0)
    } else {
        recommendations.push("Poor intelligibility - significant improvements needed".to_string());
        (2.0, 10.0)
    };

    if current_rt60 > max_rt60 {
        let reduction = ((current_rt60 - max_rt60) / current_rt60 * 100.0).round() as i64;
        recommendations.push(format!(
            "Reduce reverberation time by {reduction}% (add acoustic treatment)"
        ));
    }
    if current_noise > 50.0 {
        recommendations
            .push("Reduce background noise levels (improve HVAC, add isolation)".to_string());
    }
    if min_snr > 20.0 {
        recommendations
            .push("Increase direct sound levels (add speakers, reduce distance)".to_string());
    }

    RequiredConditions {
        max_rt60,
        min_snr,
        recommendations,
    }
}
