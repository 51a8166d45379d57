//! RT60 reverberation time, Sabine and Eyring estimators.
//!
//! Both formulas predict the time for sound pressure to decay 60 dB after
//! the source stops. Sabine assumes a live, diffuse field and overshoots in
//! absorptive rooms; Eyring corrects for that, so short-RT rooms report the
//! Eyring figure as the recommended value.

use serde::{Deserialize, Serialize};

use crate::acoustics::bands::{BandValues, OctaveBand};
use crate::error::AcousticsError;
use crate::geometry::RoomDimensions;

/// Metric Sabine constant, s/m.
const SABINE_COEFFICIENT: f64 = 0.161;

/// Absorption area contributed per seated occupant, m².
const SEATED_OCCUPANT_AREA_M2: f64 = 0.5;

/// Sabine average below which the Eyring estimate is recommended instead.
/// Empirical threshold; changing it silently shifts recommended values, so
/// it stays as calibrated.
const EYRING_PREFERENCE_THRESHOLD_S: f64 = 1.5;

/// One bounding surface of the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSurface {
    /// Surface area, m².
    pub area: f64,
    /// Free-form material label, e.g. `"gypsum-board"`.
    pub material: String,
    /// Absorption coefficient per octave band, each in `[0, 1]`.
    pub absorption_coefficients: BandValues,
}

impl RoomSurface {
    /// Builds a surface from one of the built-in material presets.
    pub fn from_material(material: SurfaceMaterial, area: f64) -> Self {
        RoomSurface {
            area,
            material: material.key().to_string(),
            absorption_coefficients: material.coefficients(),
        }
    }
}

/// Room occupancy. Seated occupants add absorption; standing occupants are
/// carried for capacity planning but do not enter the RT60 model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    pub seated: u32,
    #[serde(default)]
    pub standing: u32,
}

/// Target RT60 range, seconds, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRt60 {
    pub min: f64,
    pub max: f64,
}

/// Per-band RT60 plus the 500 Hz / 1 kHz / 2 kHz average, seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rt60Estimate {
    pub bands: BandValues,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rt60Result {
    pub sabine: Rt60Estimate,
    pub eyring: Rt60Estimate,
    /// Single-number recommendation: the Eyring average when the Sabine
    /// average is under 1.5 s, the Sabine average otherwise.
    pub recommended: f64,
    pub within_target: bool,
}

/// Built-in absorption coefficient presets for common construction
/// materials, tabulated per octave band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceMaterial {
    ConcretePainted,
    BrickPainted,
    GypsumBoard,
    WoodFloor,
    CarpetHeavy,
    AcousticCeiling,
    CurtainsHeavy,
    GlassWindow,
    AudienceSeated,
}

impl SurfaceMaterial {
    pub const ALL: [SurfaceMaterial; 9] = [
        SurfaceMaterial::ConcretePainted,
        SurfaceMaterial::BrickPainted,
        SurfaceMaterial::GypsumBoard,
        SurfaceMaterial::WoodFloor,
        SurfaceMaterial::CarpetHeavy,
        SurfaceMaterial::AcousticCeiling,
        SurfaceMaterial::CurtainsHeavy,
        SurfaceMaterial::GlassWindow,
        SurfaceMaterial::AudienceSeated,
    ];

    /// Stable string key, matching the labels used by the web UI.
    pub fn key(self) -> &'static str {
        match self {
            SurfaceMaterial::ConcretePainted => "concrete-painted",
            SurfaceMaterial::BrickPainted => "brick-painted",
            SurfaceMaterial::GypsumBoard => "gypsum-board",
            SurfaceMaterial::WoodFloor => "wood-floor",
            SurfaceMaterial::CarpetHeavy => "carpet-heavy",
            SurfaceMaterial::AcousticCeiling => "acoustic-ceiling",
            SurfaceMaterial::CurtainsHeavy => "curtains-heavy",
            SurfaceMaterial::GlassWindow => "glass-window",
            SurfaceMaterial::AudienceSeated => "audience-seated",
        }
    }

    pub fn from_key(key: &str) -> Option<SurfaceMaterial> {
        SurfaceMaterial::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Absorption coefficients at 125/250/500/1000/2000/4000 Hz.
    pub fn coefficients(self) -> BandValues {
        match self {
            SurfaceMaterial::ConcretePainted => {
                BandValues([0.10, 0.05, 0.06, 0.07, 0.09, 0.08])
            }
            SurfaceMaterial::BrickPainted => BandValues([0.01, 0.01, 0.02, 0.02, 0.02, 0.03]),
            SurfaceMaterial::GypsumBoard => BandValues([0.29, 0.10, 0.05, 0.04, 0.07, 0.09]),
            SurfaceMaterial::WoodFloor => BandValues([0.15, 0.11, 0.10, 0.07, 0.06, 0.07]),
            SurfaceMaterial::CarpetHeavy => BandValues([0.02, 0.06, 0.14, 0.37, 0.60, 0.65]),
            SurfaceMaterial::AcousticCeiling => BandValues([0.65, 0.75, 0.80, 0.85, 0.80, 0.75]),
            SurfaceMaterial::CurtainsHeavy => BandValues([0.14, 0.35, 0.55, 0.72, 0.70, 0.65]),
            SurfaceMaterial::GlassWindow => BandValues([0.35, 0.25, 0.18, 0.12, 0.07, 0.04]),
            SurfaceMaterial::AudienceSeated => BandValues([0.60, 0.74, 0.88, 0.96, 0.93, 0.85]),
        }
    }
}

/// Air absorption in sabins for a given room volume. Negligible at and
/// below 500 Hz, rising with frequency.
fn air_absorption(volume: f64) -> BandValues {
    BandValues([
        0.0,
        0.0,
        0.0,
        0.003 * volume,
        0.007 * volume,
        0.02 * volume,
    ])
}

/// Sabine equation: `RT60 = 0.161 V / A`.
///
/// Returns +∞ at zero absorption. A room that absorbs nothing never decays;
/// callers must handle the non-finite value rather than expect a clamp.
pub fn sabine_rt60(volume: f64, total_absorption: f64) -> f64 {
    if total_absorption == 0.0 {
        return f64::INFINITY;
    }
    SABINE_COEFFICIENT * volume / total_absorption
}

/// Eyring equation: `RT60 = 0.161 V / (-S ln(1 - ᾱ))`.
///
/// Returns +∞ when the average coefficient is exactly 0 or 1; an average
/// above 1 (over-specified absorption) propagates as NaN.
pub fn eyring_rt60(volume: f64, surface_area: f64, average_absorption: f64) -> f64 {
    if average_absorption == 0.0 || average_absorption == 1.0 {
        return f64::INFINITY;
    }
    SABINE_COEFFICIENT * volume / (-surface_area * (1.0 - average_absorption).ln())
}

/// Predicts RT60 per octave band with both estimators.
///
/// Total absorption per band is the sum of surface absorption, air
/// absorption scaled by volume, and seated-occupant absorption at 0.5 m²
/// per person using the audience-seated coefficient set.
pub fn compute_rt60(
    dimensions: &RoomDimensions,
    surfaces: &[RoomSurface],
    occupancy: &Occupancy,
    target: &TargetRt60,
) -> Result<Rt60Result, AcousticsError> {
    dimensions.validate()?;
    let total_surface_area: f64 = surfaces.iter().map(|s| s.area).sum();
    if !(total_surface_area > 0.0) {
        return Err(AcousticsError::ZeroSurfaceArea);
    }

    let volume = dimensions.volume();
    let air = air_absorption(volume);
    let audience = SurfaceMaterial::AudienceSeated.coefficients();

    let mut sabine_bands = BandValues::ZERO;
    let mut eyring_bands = BandValues::ZERO;

    for band in OctaveBand::ALL {
        let mut total_absorption = air[band];
        for surface in surfaces {
            total_absorption += surface.area * surface.absorption_coefficients[band];
        }
        total_absorption += occupancy.seated as f64 * SEATED_OCCUPANT_AREA_M2 * audience[band];

        let average_absorption = total_absorption / total_surface_area;
        sabine_bands[band] = sabine_rt60(volume, total_absorption);
        eyring_bands[band] = eyring_rt60(volume, total_surface_area, average_absorption);
    }

    let sabine_average = sabine_bands.speech_range_average();
    let eyring_average = eyring_bands.speech_range_average();

    let recommended = if sabine_average < EYRING_PREFERENCE_THRESHOLD_S {
        eyring_average
    } else {
        sabine_average
    };
    let within_target = recommended >= target.min && recommended <= target.max;

    Ok(Rt60Result {
        sabine: Rt60Estimate {
            bands: sabine_bands,
            average: sabine_average,
        },
        eyring: Rt60Estimate {
            bands: eyring_bands,
            average: eyring_average,
        },
        recommended,
        within_target,
    })
}

/// A surface the venue can spare for treatment, e.g. `"ceiling"` with its
/// area in m².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSurface {
    pub location: String,
    pub area: f64,
}

/// One recommended treatment step: cover `area` m² of `location` with
/// `material`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentSuggestion {
    pub location: String,
    pub material: String,
    /// Treated area, m², rounded up to whole square meters.
    pub area: f64,
}

/// Treatment locations in descending order of effectiveness, with the
/// speech-range absorption coefficient of the material suggested there.
const TREATMENT_PRIORITY: [(&str, &str, f64); 3] = [
    ("ceiling", "acoustic-ceiling", 0.78),
    ("rear-wall", "curtains-heavy", 0.53),
    ("side-walls", "acoustic-panels", 0.65),
];

/// Suggests treatment to bring a room from `current_rt60` down to
/// `target_rt60`, spending the required added absorption across the
/// available surfaces in priority order. Returns an empty list when the
/// room already meets the target.
pub fn suggest_treatment(
    current_rt60: f64,
    target_rt60: f64,
    room_volume: f64,
    available_surfaces: &[AvailableSurface],
) -> Vec<TreatmentSuggestion> {
    let mut suggestions = Vec::new();
    if current_rt60 <= target_rt60 {
        return suggestions;
    }

    let current_absorption = SABINE_COEFFICIENT * room_volume / current_rt60;
    let target_absorption = SABINE_COEFFICIENT * room_volume / target_rt60;
    let mut remaining = target_absorption - current_absorption;

    for (location, material, coefficient) in TREATMENT_PRIORITY {
        let surface = available_surfaces
            .iter()
            .find(|s| s.location.contains(location));
        if let Some(surface) = surface {
            if remaining > 0.0 {
                let area_needed = (remaining / coefficient).min(surface.area);
                suggestions.push(TreatmentSuggestion {
                    location: surface.location.clone(),
                    material: material.to_string(),
                    area: area_needed.ceil(),
                });
                remaining -= area_needed * coefficient;
            }
        }
    }

    suggestions
}
