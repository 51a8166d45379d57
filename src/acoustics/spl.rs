//! Sound pressure level prediction and coverage planning.
//!
//! A speaker's direct-field SPL at a listener follows the point-source law
//! `SPL = sensitivity + 10·log10(P) − 20·log10(d) + DI`. Multiple speakers
//! combine by summing linear pressures, and a coverage grid samples that
//! combined field across the seating plane to judge uniformity.

use serde::{Deserialize, Serialize};

use crate::catalog::Speaker;
use crate::error::AcousticsError;
use crate::geometry::{Point3, RoomDimensions, angle_between_deg};

/// Distance floor, m. Keeps the inverse-square term finite when a grid
/// point lands on a speaker.
const MIN_SOURCE_DISTANCE_M: f64 = 0.1;

/// Flat penalty outside the nominal coverage pattern, dB.
const OUTSIDE_COVERAGE_PENALTY_DB: f64 = -12.0;

/// Rolloff reached exactly at the coverage edge, dB. Inside the pattern the
/// penalty grows quadratically from 0 on-axis to this value at the edge.
const EDGE_ROLLOFF_DB: f64 = -6.0;

/// Pushes the step count past float dust so the far room edge stays on the
/// grid when width is an exact multiple of the resolution.
const GRID_EDGE_EPSILON: f64 = 1e-9;

/// Fraction of each speaker's nominal coverage disc counted as effective,
/// leaving the rest for inter-speaker overlap.
const COVERAGE_OVERLAP_FACTOR: f64 = 0.7;

/// Headroom added over the target average when sizing power, dB.
const SPL_HEADROOM_DB: f64 = 10.0;

/// Largest acceptable max-minus-min spread across the grid, dB.
const MAX_VARIANCE_DB: f64 = 6.0;

/// Minimum target-over-ambient ratio for intelligible playback, dB.
const MIN_SIGNAL_TO_NOISE_DB: f64 = 15.0;

/// Constant-voltage speakers share amplifier channels in groups this size.
const CONSTANT_VOLTAGE_SPEAKERS_PER_CHANNEL: u32 = 4;

/// Grid spacing used when the caller has no opinion, m.
pub const DEFAULT_GRID_RESOLUTION_M: f64 = 1.0;

/// Seated ear height, m.
pub const DEFAULT_LISTENER_HEIGHT_M: f64 = 1.2;

/// Typical ceiling-speaker mounting height, m.
pub const DEFAULT_MOUNTING_HEIGHT_M: f64 = 3.0;

/// Amplifier headroom used when the caller has no opinion, dB.
pub const DEFAULT_AMPLIFIER_HEADROOM_DB: f64 = 3.0;

/// Safety margin applied to the recommended amplifier power.
pub const DEFAULT_AMPLIFIER_SAFETY_FACTOR: f64 = 1.25;

/// One sample of the combined sound field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Combined SPL of all speakers, dB. −∞ when no speakers are placed.
    pub spl: f64,
    /// Distance to the nearest speaker, m.
    pub distance: f64,
}

/// A speaker installed at a position and aimed at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerPlacement {
    pub speaker: Speaker,
    pub position: Point3,
    pub aim_point: Point3,
    pub tilt_angle: f64,
    pub pan_angle: f64,
}

impl SpeakerPlacement {
    /// Placement with no extra tilt or pan beyond the aim point.
    pub fn new(speaker: Speaker, position: Point3, aim_point: Point3) -> Self {
        SpeakerPlacement {
            speaker,
            position,
            aim_point,
            tilt_angle: 0.0,
            pan_angle: 0.0,
        }
    }
}

/// Target playback levels, dB SPL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpl {
    pub average: f64,
    pub peak: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplCalculationResult {
    #[serde(rename = "averageSPL")]
    pub average_spl: f64,
    #[serde(rename = "minSPL")]
    pub min_spl: f64,
    #[serde(rename = "maxSPL")]
    pub max_spl: f64,
    /// Max minus min across the grid, dB.
    pub variance: f64,
    pub coverage: Vec<SplPoint>,
    /// Power per speaker needed to hit the target average plus headroom, W.
    pub power_required: f64,
    pub speakers_required: u32,
    pub meets_requirement: bool,
}

/// Direct-field SPL of one speaker at a listener position.
///
/// With an aim point the off-axis angle against the aim vector picks up a
/// quadratic rolloff inside the coverage pattern and a flat −12 dB outside
/// it; without one the speaker is treated as on-axis everywhere.
pub fn spl_at_point(
    speaker: &Speaker,
    power: f64,
    listener: Point3,
    speaker_position: Point3,
    aim_point: Option<Point3>,
) -> f64 {
    let distance = listener.distance_to(&speaker_position);
    let effective_distance = distance.max(MIN_SOURCE_DISTANCE_M);

    let mut directivity_index = 0.0;
    if let Some(aim) = aim_point {
        let aim_vector = aim - speaker_position;
        let listener_vector = listener - speaker_position;
        let angle = angle_between_deg(aim_vector, listener_vector);
        let half_coverage = speaker.coverage.horizontal / 2.0;
        directivity_index = if angle > half_coverage {
            OUTSIDE_COVERAGE_PENALTY_DB
        } else {
            let edge_ratio = angle / half_coverage;
            EDGE_ROLLOFF_DB * edge_ratio * edge_ratio
        };
    }

    speaker.sensitivity + 10.0 * power.log10() - 20.0 * effective_distance.log10()
        + directivity_index
}

/// Samples the combined field of all placements over a regular lattice at
/// listener height, covering `[0, width] × [0, length]` inclusive.
///
/// Each speaker is driven at half its continuous rating (3 dB headroom).
/// Contributions sum as linear pressures, and each point also records its
/// distance to the nearest speaker.
pub fn coverage_grid(
    room: &RoomDimensions,
    placements: &[SpeakerPlacement],
    grid_resolution: f64,
    listener_height: f64,
) -> Result<Vec<SplPoint>, AcousticsError> {
    room.validate()?;
    if !(grid_resolution.is_finite() && grid_resolution > 0.0) {
        return Err(AcousticsError::InvalidParameter {
            name: "gridResolution",
            value: grid_resolution,
        });
    }

    let x_steps = (room.width / grid_resolution + GRID_EDGE_EPSILON).floor() as usize;
    let y_steps = (room.length / grid_resolution + GRID_EDGE_EPSILON).floor() as usize;
    let mut points = Vec::with_capacity((x_steps + 1) * (y_steps + 1));

    for xi in 0..=x_steps {
        let x = xi as f64 * grid_resolution;
        for yi in 0..=y_steps {
            let y = yi as f64 * grid_resolution;
            let point = Point3::new(x, y, listener_height);

            let mut total_pressure = 0.0;
            for placement in placements {
                let power = placement.speaker.power_handling.continuous / 2.0;
                let spl = spl_at_point(
                    &placement.speaker,
                    power,
                    point,
                    placement.position,
                    Some(placement.aim_point),
                );
                total_pressure += 10.0_f64.powf(spl / 20.0);
            }
            let total_spl = 20.0 * total_pressure.log10();

            let distance = placements
                .iter()
                .map(|p| point.distance_to(&p.position))
                .fold(f64::INFINITY, f64::min);

            points.push(SplPoint {
                x,
                y,
                z: listener_height,
                spl: total_spl,
                distance,
            });
        }
    }

    Ok(points)
}

/// Sizes a distributed system: how many of the given speaker model the room
/// needs, where a near-square layout puts them, and whether the resulting
/// field meets the target.
///
/// Coverage radius per speaker is `mountingHeight · tan(halfCoverage)`, of
/// which 70% counts after overlap. The returned grid is sampled at the
/// default 1 m resolution and seated ear height.
pub fn speaker_requirements(
    room: &RoomDimensions,
    target: &TargetSpl,
    ambient_noise_db: f64,
    speaker: &Speaker,
    mounting_height: f64,
) -> Result<SplCalculationResult, AcousticsError> {
    room.validate()?;
    let horizontal = speaker.coverage.horizontal;
    if !(horizontal.is_finite() && horizontal > 0.0) {
        return Err(AcousticsError::InvalidParameter {
            name: "coverage.horizontal",
            value: horizontal,
        });
    }
    if !(mounting_height.is_finite() && mounting_height > 0.0) {
        return Err(AcousticsError::InvalidParameter {
            name: "mountingHeight",
            value: mounting_height,
        });
    }

    let room_area = room.floor_area();
    let coverage_radius = mounting_height * (horizontal / 2.0).to_radians().tan();
    let coverage_area =
        std::f64::consts::PI * coverage_radius * coverage_radius * COVERAGE_OVERLAP_FACTOR;
    let speakers_required = ((room_area / coverage_area).ceil()).max(1.0) as u32;

    let n = speakers_required as f64;
    let rows = (n * room.length / room.width).sqrt().ceil() as usize;
    let cols = (n / rows as f64).ceil() as usize;

    let mut placements = Vec::with_capacity(speakers_required as usize);
    'layout: for row in 0..rows {
        for col in 0..cols {
            if placements.len() >= speakers_required as usize {
                break 'layout;
            }
            let x = (col as f64 + 0.5) * (room.width / cols as f64);
            let y = (row as f64 + 0.5) * (room.length / rows as f64);
            placements.push(SpeakerPlacement::new(
                speaker.clone(),
                Point3::new(x, y, mounting_height),
                Point3::new(x, y, DEFAULT_LISTENER_HEIGHT_M),
            ));
        }
    }

    let coverage = coverage_grid(
        room,
        &placements,
        DEFAULT_GRID_RESOLUTION_M,
        DEFAULT_LISTENER_HEIGHT_M,
    )?;

    let mut sum = 0.0;
    let mut min_spl = f64::INFINITY;
    let mut max_spl = f64::NEG_INFINITY;
    for point in &coverage {
        sum += point.spl;
        min_spl = min_spl.min(point.spl);
        max_spl = max_spl.max(point.spl);
    }
    let average_spl = sum / coverage.len() as f64;
    let variance = max_spl - min_spl;

    let signal_to_noise = target.average - ambient_noise_db;
    let required_spl = target.average + SPL_HEADROOM_DB;
    let power_required = 10.0_f64.powf((required_spl - speaker.sensitivity) / 10.0);

    let meets_requirement = min_spl >= target.average
        && variance <= MAX_VARIANCE_DB
        && signal_to_noise >= MIN_SIGNAL_TO_NOISE_DB;

    Ok(SplCalculationResult {
        average_spl,
        min_spl,
        max_spl,
        variance,
        coverage,
        power_required,
        speakers_required,
        meets_requirement,
    })
}

/// A line item in an amplifier sizing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerLoad {
    pub speaker: Speaker,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmplifierPowerResult {
    /// Sum of per-speaker continuous ratings with headroom applied, W.
    pub total_power: f64,
    pub channels_required: u32,
    /// Total power with the safety factor applied, W.
    pub recommended_amplifier_power: f64,
}

/// Totals amplifier power and channel count for a set of speaker loads.
///
/// Constant-voltage speakers share channels four to a channel; low-impedance
/// speakers take one channel each.
pub fn amplifier_power(
    loads: &[SpeakerLoad],
    headroom_db: f64,
    safety_factor: f64,
) -> AmplifierPowerResult {
    let mut total_power = 0.0;
    let mut channels_required = 0u32;

    for load in loads {
        let per_speaker =
            load.speaker.power_handling.continuous * 10.0_f64.powf(headroom_db / 10.0);
        total_power += per_speaker * load.quantity as f64;

        if load.speaker.is_constant_voltage() {
            channels_required += load.quantity.div_ceil(CONSTANT_VOLTAGE_SPEAKERS_PER_CHANNEL);
        } else {
            channels_required += load.quantity;
        }
    }

    AmplifierPowerResult {
        total_power,
        channels_required,
        recommended_amplifier_power: total_power * safety_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CoveragePattern, EquipmentBase, EquipmentCategory, FrequencyRange, PhysicalDimensions,
        PowerHandling, SpeakerConnector, SpeakerType, TransformerTap,
    };

    fn fixture_speaker(
        sensitivity: f64,
        horizontal_coverage: f64,
        continuous_power: f64,
        transformer: Option<TransformerTap>,
    ) -> Speaker {
        Speaker {
            base: EquipmentBase {
                id: "spk-fixture".to_string(),
                category: EquipmentCategory::Speaker,
                manufacturer: "Acme Audio".to_string(),
                model: "FX-1".to_string(),
                description: "test fixture".to_string(),
                price: 500.0,
                weight: 10.0,
                dimensions: PhysicalDimensions {
                    width: 300.0,
                    height: 500.0,
                    depth: 300.0,
                },
                power_consumption: None,
                warranty: 5,
            },
            speaker_type: SpeakerType::PointSource,
            frequency_response: FrequencyRange {
                low: 60.0,
                high: 18000.0,
            },
            sensitivity,
            max_spl: 126.0,
            impedance: 8.0,
            coverage: CoveragePattern {
                horizontal: horizontal_coverage,
                vertical: 60.0,
            },
            power_handling: PowerHandling {
                continuous: continuous_power,
                peak: continuous_power * 4.0,
            },
            connector_type: SpeakerConnector::Speakon,
            transformer,
        }
    }

    #[test]
    fn one_watt_at_one_meter_is_the_sensitivity() {
        let speaker = fixture_speaker(96.0, 90.0, 300.0, None);
        let spl = spl_at_point(
            &speaker,
            1.0,
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            None,
        );
        assert!((spl - 96.0).abs() < 1e-9, "got {spl}");
    }

    #[test]
    fn doubling_distance_costs_six_db() {
        let speaker = fixture_speaker(96.0, 90.0, 300.0, None);
        let origin = Point3::new(0.0, 0.0, 0.0);
        let near = spl_at_point(&speaker, 10.0, Point3::new(0.0, 2.0, 0.0), origin, None);
        let far = spl_at_point(&speaker, 10.0, Point3::new(0.0, 4.0, 0.0), origin, None);
        let drop = near - far;
        assert!((drop - 20.0 * 2.0_f64.log10()).abs() < 1e-9, "drop {drop}");
    }

    #[test]
    fn doubling_power_gains_three_db() {
        let speaker = fixture_speaker(96.0, 90.0, 300.0, None);
        let origin = Point3::new(0.0, 0.0, 0.0);
        let at = Point3::new(0.0, 3.0, 0.0);
        let single = spl_at_point(&speaker, 100.0, at, origin, None);
        let double = spl_at_point(&speaker, 200.0, at, origin, None);
        let gain = double - single;
        assert!((gain - 10.0 * 2.0_f64.log10()).abs() < 1e-9, "gain {gain}");
    }

    #[test]
    fn distance_is_floored_near_the_source() {
        let speaker = fixture_speaker(96.0, 90.0, 300.0, None);
        let origin = Point3::new(0.0, 0.0, 0.0);
        let on_top = spl_at_point(&speaker, 1.0, origin, origin, None);
        // 0.1 m floor adds 20 dB over the 1 m reference.
        assert!((on_top - 116.0).abs() < 1e-9, "got {on_top}");
    }

    #[test]
    fn directivity_rolls_off_and_caps_outside_coverage() {
        // 90° pattern: half-coverage 45°. Aimed due north from the origin.
        let speaker = fixture_speaker(96.0, 90.0, 300.0, None);
        let origin = Point3::new(0.0, 0.0, 0.0);
        let aim = Some(Point3::new(0.0, 1.0, 0.0));

        let at_angle = |deg: f64| {
            let rad = deg.to_radians();
            Point3::new(rad.sin(), rad.cos(), 0.0)
        };

        let baseline = spl_at_point(&speaker, 10.0, at_angle(0.0), origin, None);
        let on_axis = spl_at_point(&speaker, 10.0, at_angle(0.0), origin, aim);
        assert!((on_axis - baseline).abs() < 1e-9);

        // 30° of 45°: −6 × (2/3)² = −2.666… dB.
        let off_axis = spl_at_point(&speaker, 10.0, at_angle(30.0), origin, aim);
        assert!((baseline - off_axis - 6.0 * (2.0 / 3.0_f64).powi(2)).abs() < 1e-6);

        let outside = spl_at_point(&speaker, 10.0, at_angle(60.0), origin, aim);
        assert!((baseline - outside - 12.0).abs() < 1e-9);
    }

    #[test]
    fn identical_stacked_speakers_add_six_db() {
        // Pressure summation: equal contributions double the pressure,
        // raising the combined level by 20·log10(2).
        let speaker = fixture_speaker(96.0, 90.0, 100.0, None);
        let room = RoomDimensions::new(4.0, 4.0, 3.0);
        let position = Point3::new(2.0, 2.0, 3.0);
        let aim = Point3::new(2.0, 2.0, 1.2);

        let one = vec![SpeakerPlacement::new(speaker.clone(), position, aim)];
        let two = vec![
            SpeakerPlacement::new(speaker.clone(), position, aim),
            SpeakerPlacement::new(speaker, position, aim),
        ];

        let single = coverage_grid(&room, &one, 1.0, 1.2).unwrap();
        let stacked = coverage_grid(&room, &two, 1.0, 1.2).unwrap();
        for (a, b) in single.iter().zip(&stacked) {
            let gain = b.spl - a.spl;
            assert!((gain - 20.0 * 2.0_f64.log10()).abs() < 1e-9, "gain {gain}");
        }
    }

    #[test]
    fn grid_covers_both_room_edges_inclusive() {
        let speaker = fixture_speaker(96.0, 90.0, 100.0, None);
        let room = RoomDimensions::new(10.0, 8.0, 3.0);
        let placements = vec![SpeakerPlacement::new(
            speaker,
            Point3::new(4.0, 5.0, 3.0),
            Point3::new(4.0, 5.0, 1.2),
        )];
        let grid = coverage_grid(&room, &placements, 1.0, 1.2).unwrap();
        // x spans the width (9 samples), y the length (11 samples).
        assert_eq!(grid.len(), 9 * 11);
        let first = grid.first().unwrap();
        assert_eq!((first.x, first.y, first.z), (0.0, 0.0, 1.2));
        let last = grid.last().unwrap();
        assert_eq!((last.x, last.y), (8.0, 10.0));

        // Corner distance to the speaker at (4, 5, 3).
        let expected = (16.0_f64 + 25.0 + 1.8 * 1.8).sqrt();
        assert!((first.distance - expected).abs() < 1e-9);
    }

    #[test]
    fn fractional_resolution_still_reaches_the_far_edge() {
        let speaker = fixture_speaker(96.0, 90.0, 100.0, None);
        let room = RoomDimensions::new(0.6, 0.6, 3.0);
        let placements = vec![SpeakerPlacement::new(
            speaker,
            Point3::new(0.3, 0.3, 3.0),
            Point3::new(0.3, 0.3, 1.2),
        )];
        // 0.6 / 0.2 lands on 2.9999… without the epsilon nudge.
        let grid = coverage_grid(&room, &placements, 0.2, 1.2).unwrap();
        assert_eq!(grid.len(), 16);
        let last = grid.last().unwrap();
        assert!((last.x - 0.6).abs() < 1e-9, "last.x {}", last.x);
    }

    #[test]
    fn empty_placement_list_yields_silence() {
        let room = RoomDimensions::new(2.0, 2.0, 3.0);
        let grid = coverage_grid(&room, &[], 1.0, 1.2).unwrap();
        assert!(!grid.is_empty());
        for point in &grid {
            assert_eq!(point.spl, f64::NEG_INFINITY);
            assert_eq!(point.distance, f64::INFINITY);
        }
    }

    #[test]
    fn rejects_bad_grid_inputs() {
        let room = RoomDimensions::new(10.0, 8.0, 3.0);
        assert!(coverage_grid(&room, &[], 0.0, 1.2).is_err());
        assert!(coverage_grid(&room, &[], -1.0, 1.2).is_err());
        assert!(coverage_grid(&room, &[], f64::NAN, 1.2).is_err());
        let bad_room = RoomDimensions::new(0.0, 8.0, 3.0);
        assert!(coverage_grid(&bad_room, &[], 1.0, 1.2).is_err());
    }

    #[test]
    fn requirements_size_a_square_room() {
        let speaker = fixture_speaker(96.0, 90.0, 300.0, None);
        let room = RoomDimensions::new(10.0, 10.0, 4.0);
        let target = TargetSpl {
            average: 90.0,
            peak: 105.0,
        };
        let result = speaker_requirements(&room, &target, 40.0, &speaker, 3.0).unwrap();

        // r = 3·tan(45°) = 3 m, effective area ≈ 19.8 m², 100 m² floor.
        assert_eq!(result.speakers_required, 6);
        assert_eq!(result.coverage.len(), 11 * 11);

        assert!(result.min_spl <= result.average_spl);
        assert!(result.average_spl <= result.max_spl);
        assert!((result.variance - (result.max_spl - result.min_spl)).abs() < 1e-12);

        // 10 dB headroom over 90 dB target with 96 dB sensitivity.
        let expected_power = 10.0_f64.powf(0.4);
        assert!((result.power_required - expected_power).abs() < 1e-9);

        let recomputed = result.min_spl >= target.average
            && result.variance <= 6.0
            && (target.average - 40.0) >= 15.0;
        assert_eq!(result.meets_requirement, recomputed);
    }

    #[test]
    fn tiny_room_needs_one_speaker() {
        let speaker = fixture_speaker(96.0, 120.0, 100.0, None);
        let room = RoomDimensions::new(3.0, 3.0, 2.7);
        let target = TargetSpl {
            average: 80.0,
            peak: 95.0,
        };
        let result = speaker_requirements(&room, &target, 35.0, &speaker, 2.7).unwrap();
        assert_eq!(result.speakers_required, 1);
    }

    #[test]
    fn rejects_degenerate_coverage_angle() {
        let speaker = fixture_speaker(96.0, 0.0, 300.0, None);
        let room = RoomDimensions::new(10.0, 10.0, 4.0);
        let target = TargetSpl {
            average: 90.0,
            peak: 105.0,
        };
        let err = speaker_requirements(&room, &target, 40.0, &speaker, 3.0).unwrap_err();
        assert!(matches!(err, AcousticsError::InvalidParameter { .. }));
    }

    #[test]
    fn rejects_bad_mounting_height() {
        let speaker = fixture_speaker(96.0, 90.0, 300.0, None);
        let room = RoomDimensions::new(10.0, 10.0, 4.0);
        let target = TargetSpl {
            average: 90.0,
            peak: 105.0,
        };
        for height in [0.0, -2.0, f64::NAN] {
            let err = speaker_requirements(&room, &target, 40.0, &speaker, height).unwrap_err();
            assert!(matches!(err, AcousticsError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn amplifier_power_mixes_low_z_and_constant_voltage() {
        let loads = vec![
            SpeakerLoad {
                speaker: fixture_speaker(96.0, 90.0, 300.0, None),
                quantity: 2,
            },
            SpeakerLoad {
                speaker: fixture_speaker(89.0, 110.0, 30.0, Some(TransformerTap::Volts70)),
                quantity: 9,
            },
        ];
        let result = amplifier_power(
            &loads,
            DEFAULT_AMPLIFIER_HEADROOM_DB,
            DEFAULT_AMPLIFIER_SAFETY_FACTOR,
        );

        let headroom = 10.0_f64.powf(0.3);
        let expected_total = 300.0 * headroom * 2.0 + 30.0 * headroom * 9.0;
        assert!((result.total_power - expected_total).abs() < 1e-9);
        // 2 low-Z channels plus ceil(9/4) = 3 shared 70 V channels.
        assert_eq!(result.channels_required, 5);
        assert!(
            (result.recommended_amplifier_power - expected_total * 1.25).abs() < 1e-9
        );
    }

    #[test]
    fn explicit_none_tap_counts_as_low_impedance() {
        let loads = vec![SpeakerLoad {
            speaker: fixture_speaker(96.0, 90.0, 100.0, Some(TransformerTap::None)),
            quantity: 8,
        }];
        let result = amplifier_power(&loads, 3.0, 1.25);
        assert_eq!(result.channels_required, 8);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let speaker = fixture_speaker(93.5, 75.0, 250.0, None);
        let room = RoomDimensions::new(14.0, 9.0, 3.5);
        let target = TargetSpl {
            average: 88.0,
            peak: 102.0,
        };
        let a = speaker_requirements(&room, &target, 42.0, &speaker, 3.2).unwrap();
        let b = speaker_requirements(&room, &target, 42.0, &speaker, 3.2).unwrap();
        assert_eq!(a.average_spl.to_bits(), b.average_spl.to_bits());
        assert_eq!(a.coverage.len(), b.coverage.len());
        for (pa, pb) in a.coverage.iter().zip(&b.coverage) {
            assert_eq!(pa.spl.to_bits(), pb.spl.to_bits());
        }
    }
}
