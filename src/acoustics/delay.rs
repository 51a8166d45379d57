//! Delay alignment for distributed speaker systems.
//!
//! Remote zones must be delayed so their output arrives just after the
//! wavefront from the mains; the precedence effect then keeps the mains
//! perceived as the source. Delays derive from path length and the speed
//! of sound at the venue temperature, and are reported to 0.1 ms, the
//! resolution of typical DSP delay blocks.

use serde::{Deserialize, Serialize};

use crate::error::AcousticsError;
use crate::geometry::{Point3, RoomDimensions};

pub use crate::geometry::speed_of_sound;

/// Lip-sync tolerance, ms. Residual audio/video offsets within this window
/// pass unnoticed.
const LIP_SYNC_TOLERANCE_MS: f64 = 40.0;

/// Haas-effect offset added on top of a fill speaker's path delay, ms.
const FILL_HAAS_OFFSET_MS: f64 = 10.0;

/// Fill delays beyond this read as discrete echoes, ms.
const ECHO_WARNING_MS: f64 = 100.0;

/// Listeners closer than this to a fill speaker hear it localize, m.
const NEAR_LISTENER_M: f64 = 3.0;

/// Fraction of the room length delay zones should reach when the caller
/// has no opinion.
pub const DEFAULT_COVERAGE_FRACTION: f64 = 0.75;

/// A delay speaker to be aligned against the mains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelaySpeaker {
    pub name: String,
    pub position: Point3,
}

/// One aligned zone in the result, sorted by distance from the mains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayZone {
    pub name: String,
    pub position: Point3,
    pub distance_from_main: f64,
    /// Delay to dial in, ms, rounded to 0.1 ms.
    pub delay_time: f64,
    /// Acoustic path length the delay compensates, m.
    pub delay_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayCalculationResult {
    pub zones: Vec<DelayZone>,
    /// m/s at the given temperature.
    pub speed_of_sound: f64,
    /// °C, echoed back for the report.
    pub temperature: f64,
    /// Largest zone delay, ms. −∞ when no zones were supplied.
    pub max_delay: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvSyncResult {
    pub total_video_delay: f64,
    /// Processing plus acoustic path delay, ms.
    pub total_audio_delay: f64,
    /// Extra audio delay needed to line up with video, ms, rounded to
    /// 0.1 ms. Zero when audio already lags video.
    pub required_audio_delay: f64,
    pub in_sync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillDelayResult {
    /// Path delay from the nearest main speaker, ms.
    pub delay_from_main: f64,
    /// Path delay from the fill speaker to the listener, ms.
    pub delay_from_listener: f64,
    /// Delay to dial in: path delay plus the Haas offset, ms.
    pub recommended_delay: f64,
    /// Advisory text; empty when nothing stands out.
    pub notes: String,
}

fn round_tenth_ms(ms: f64) -> f64 {
    (ms * 10.0).round() / 10.0
}

/// Acoustic propagation delay over a distance, ms.
pub fn delay_time_ms(distance_m: f64, temperature_c: f64) -> f64 {
    distance_m / speed_of_sound(temperature_c) * 1000.0
}

/// Aligns every delay speaker against the main position.
///
/// `additional_delay_ms` is the precedence offset applied uniformly on top
/// of each zone's path delay, typically 10 to 20 ms. Zones come back sorted
/// ascending by distance from the mains.
pub fn system_delays(
    main_position: Point3,
    delay_speakers: &[DelaySpeaker],
    temperature_c: f64,
    additional_delay_ms: f64,
) -> DelayCalculationResult {
    let c = speed_of_sound(temperature_c);

    let mut zones: Vec<DelayZone> = delay_speakers
        .iter()
        .map(|speaker| {
            let distance = speaker.position.distance_to(&main_position);
            let total_delay = delay_time_ms(distance, temperature_c) + additional_delay_ms;
            DelayZone {
                name: speaker.name.clone(),
                position: speaker.position,
                distance_from_main: distance,
                delay_time: round_tenth_ms(total_delay),
                delay_distance: distance,
            }
        })
        .collect();

    zones.sort_by(|a, b| a.distance_from_main.total_cmp(&b.distance_from_main));

    let max_delay = zones
        .iter()
        .map(|z| z.delay_time)
        .fold(f64::NEG_INFINITY, f64::max);

    DelayCalculationResult {
        zones,
        speed_of_sound: c,
        temperature: temperature_c,
        max_delay,
    }
}

/// Computes the audio delay needed to land sound inside the lip-sync
/// window of the video path.
///
/// The acoustic flight time from the screen-front speakers is part of the
/// audio chain. Audio can only be delayed, never advanced, so when audio
/// already lags video the required delay is zero and the residual gap
/// decides `in_sync`.
pub fn audio_video_sync(
    video_processing_delay_ms: f64,
    audio_processing_delay_ms: f64,
    distance_to_screen_m: f64,
    temperature_c: f64,
) -> AvSyncResult {
    let acoustic_delay = delay_time_ms(distance_to_screen_m, temperature_c);

    let total_video_delay = video_processing_delay_ms;
    let total_audio_delay = audio_processing_delay_ms + acoustic_delay;

    let required_audio_delay = (total_video_delay - total_audio_delay).max(0.0);
    let sync_difference =
        (total_video_delay - (total_audio_delay + required_audio_delay)).abs();

    AvSyncResult {
        total_video_delay,
        total_audio_delay,
        required_audio_delay: round_tenth_ms(required_audio_delay),
        in_sync: sync_difference <= LIP_SYNC_TOLERANCE_MS,
    }
}

/// Aligns one fill speaker (under-balcony, side fill) against the nearest
/// main speaker and flags situations the installer should review.
pub fn fill_speaker_delay(
    main_speakers: &[Point3],
    fill_position: Point3,
    listener_position: Point3,
    temperature_c: f64,
) -> Result<FillDelayResult, AcousticsError> {
    if main_speakers.is_empty() {
        return Err(AcousticsError::EmptyInput {
            what: "main speaker",
        });
    }

    let min_distance = main_speakers
        .iter()
        .map(|main| fill_position.distance_to(main))
        .fold(f64::INFINITY, f64::min);

    let delay_from_main = delay_time_ms(min_distance, temperature_c);
    let listener_distance = fill_position.distance_to(&listener_position);
    let delay_from_listener = delay_time_ms(listener_distance, temperature_c);
    let recommended_delay = delay_from_main + FILL_HAAS_OFFSET_MS;

    let notes = if recommended_delay > ECHO_WARNING_MS {
        "Warning: Large delay may cause echo effects".to_string()
    } else if listener_distance < NEAR_LISTENER_M {
        "Fill speaker is very close to listener - consider reducing level".to_string()
    } else {
        String::new()
    };

    Ok(FillDelayResult {
        delay_from_main: round_tenth_ms(delay_from_main),
        delay_from_listener: round_tenth_ms(delay_from_listener),
        recommended_delay: round_tenth_ms(recommended_delay),
        notes,
    })
}

/// Proposes delay speaker rows for a rectangular room.
///
/// Rows start at twice the critical distance from the front wall and repeat
/// every 1.5 critical distances until `target_coverage` of the room length
/// is reached. The critical distance uses the rough `0.1·√V` rule; rooms
/// whose floor diagonal stays within twice that distance need no delays at
/// all. Speakers mount half a meter below the ceiling.
pub fn optimal_delay_positions(
    room: &RoomDimensions,
    target_coverage: f64,
) -> Result<Vec<DelaySpeaker>, AcousticsError> {
    room.validate()?;
    if !target_coverage.is_finite() {
        return Err(AcousticsError::InvalidParameter {
            name: "targetCoverage",
            value: target_coverage,
        });
    }

    let mut positions = Vec::new();

    let critical_distance = room.volume().sqrt() * 0.1;
    let floor_diagonal = (room.length * room.length + room.width * room.width).sqrt();
    if floor_diagonal <= critical_distance * 2.0 {
        return Ok(positions);
    }

    let speaker_spacing = critical_distance * 1.5;
    let mut current_distance = critical_distance * 2.0;
    let mut zone_number = 1;

    while current_distance < room.length * target_coverage {
        let speakers_wide = ((room.width / (speaker_spacing * 2.0)).ceil() as usize).max(1);
        for i in 0..speakers_wide {
            let x = (i as f64 + 0.5) * (room.width / speakers_wide as f64);
            positions.push(DelaySpeaker {
                name: format!("Delay Zone {zone_number}-{}", i + 1),
                position: Point3::new(x, current_distance, room.height - 0.5),
            });
        }
        current_distance += speaker_spacing;
        zone_number += 1;
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_meters_at_room_temperature() {
        let delay = delay_time_ms(10.0, 20.0);
        assert!((delay - 29.1189).abs() < 0.001, "got {delay}");
    }

    #[test]
    fn zones_pick_up_the_precedence_offset() {
        let main = Point3::new(0.0, 0.0, 2.0);
        let speakers = vec![DelaySpeaker {
            name: "Rear".to_string(),
            position: Point3::new(0.0, 10.0, 2.0),
        }];
        let result = system_delays(main, &speakers, 20.0, 10.0);
        assert_eq!(result.zones.len(), 1);
        // 29.1 ms of flight time plus the 10 ms offset, rounded to 0.1 ms.
        assert_eq!(result.zones[0].delay_time, 39.1);
        assert_eq!(result.max_delay, 39.1);
        assert!((result.speed_of_sound - 343.42).abs() < 1e-9);
        assert_eq!(result.temperature, 20.0);
    }

    #[test]
    fn zones_come_back_sorted_by_distance() {
        let main = Point3::new(0.0, 0.0, 2.0);
        let speakers = vec![
            DelaySpeaker {
                name: "Far".to_string(),
                position: Point3::new(0.0, 24.0, 2.0),
            },
            DelaySpeaker {
                name: "Near".to_string(),
                position: Point3::new(0.0, 8.0, 2.0),
            },
            DelaySpeaker {
                name: "Mid".to_string(),
                position: Point3::new(0.0, 16.0, 2.0),
            },
        ];
        let result = system_delays(main, &speakers, 20.0, 0.0);
        let names: Vec<&str> = result.zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, ["Near", "Mid", "Far"]);
        assert_eq!(result.max_delay, result.zones[2].delay_time);
        assert_eq!(result.zones[0].distance_from_main, 8.0);
        assert_eq!(result.zones[0].delay_distance, 8.0);
    }

    #[test]
    fn no_zones_reports_negative_infinity() {
        let result = system_delays(Point3::new(0.0, 0.0, 2.0), &[], 20.0, 0.0);
        assert!(result.zones.is_empty());
        assert_eq!(result.max_delay, f64::NEG_INFINITY);
    }

    #[test]
    fn av_sync_delays_audio_up_to_video() {
        // Video pipeline is 50 ms behind; audio chain is 10 ms plus
        // 14.56 ms of flight over 5 m.
        let result = audio_video_sync(50.0, 10.0, 5.0, 20.0);
        assert!((result.total_audio_delay - 24.5594).abs() < 0.001);
        assert_eq!(result.required_audio_delay, 25.4);
        // Delaying audio closes the gap completely.
        assert!(result.in_sync);
    }

    #[test]
    fn av_sync_cannot_advance_audio() {
        // Audio lags video by 59 ms and nothing can pull it forward.
        let result = audio_video_sync(0.0, 30.0, 10.0, 20.0);
        assert_eq!(result.required_audio_delay, 0.0);
        assert!(!result.in_sync);
    }

    #[test]
    fn av_sync_tolerance_is_inclusive() {
        let at_limit = audio_video_sync(0.0, 40.0, 0.0, 20.0);
        assert!(at_limit.in_sync);
        let past_limit = audio_video_sync(0.0, 40.1, 0.0, 20.0);
        assert!(!past_limit.in_sync);
    }

    #[test]
    fn fill_speaker_uses_nearest_main() {
        let mains = vec![Point3::new(-4.0, 0.0, 3.0), Point3::new(4.0, 0.0, 3.0)];
        let fill = Point3::new(4.0, 10.0, 3.0);
        let listener = Point3::new(4.0, 12.0, 1.2);
        let result = fill_speaker_delay(&mains, fill, listener, 20.0).unwrap();
        // Nearest main is 10 m away, not the 14.7 m one.
        assert_eq!(result.delay_from_main, 29.1);
        assert_eq!(result.recommended_delay, 39.1);
    }

    #[test]
    fn fill_notes_flag_echo_risk_first() {
        let mains = vec![Point3::new(0.0, 0.0, 3.0)];
        // 40 m of path delay blows past the echo threshold even though the
        // listener is also very close.
        let far = fill_speaker_delay(&mains, Point3::new(0.0, 40.0, 3.0), Point3::new(0.0, 41.0, 1.2), 20.0)
            .unwrap();
        assert!(far.notes.contains("echo"), "notes: {}", far.notes);

        let near = fill_speaker_delay(
            &mains,
            Point3::new(0.0, 10.0, 3.0),
            Point3::new(0.0, 11.0, 1.2),
            20.0,
        )
        .unwrap();
        assert!(near.notes.contains("reducing level"), "notes: {}", near.notes);

        let fine = fill_speaker_delay(
            &mains,
            Point3::new(0.0, 10.0, 3.0),
            Point3::new(0.0, 16.0, 1.2),
            20.0,
        )
        .unwrap();
        assert!(fine.notes.is_empty());
    }

    #[test]
    fn fill_requires_a_main_speaker() {
        let err = fill_speaker_delay(
            &[],
            Point3::new(0.0, 10.0, 3.0),
            Point3::new(0.0, 12.0, 1.2),
            20.0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AcousticsError::EmptyInput {
                what: "main speaker"
            }
        );
    }

    #[test]
    fn compact_room_needs_no_delay_zones() {
        // Tall, tiny floor: the diagonal never escapes the direct field.
        let room = RoomDimensions::new(2.0, 2.0, 60.0);
        let positions = optimal_delay_positions(&room, DEFAULT_COVERAGE_FRACTION).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn long_room_gets_rows_of_delay_zones() {
        let room = RoomDimensions::new(30.0, 12.0, 6.0);
        let positions = optimal_delay_positions(&room, DEFAULT_COVERAGE_FRACTION).unwrap();
        // Critical distance ≈ 4.65 m: rows at 9.30 m and 16.27 m, and the
        // third row would pass 75% of the length.
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].name, "Delay Zone 1-1");
        assert_eq!(positions[1].name, "Delay Zone 2-1");
        assert!((positions[0].position.y - 9.295).abs() < 0.01);
        assert!((positions[1].position.y - 16.267).abs() < 0.01);
        // Single column centered across the width, near the ceiling.
        assert_eq!(positions[0].position.x, 6.0);
        assert_eq!(positions[0].position.z, 5.5);
    }

    #[test]
    fn wide_room_gets_multiple_columns() {
        let room = RoomDimensions::new(30.0, 30.0, 6.0);
        let positions = optimal_delay_positions(&room, DEFAULT_COVERAGE_FRACTION).unwrap();
        let first_row: Vec<&DelaySpeaker> = positions
            .iter()
            .filter(|p| p.name.starts_with("Delay Zone 1-"))
            .collect();
        assert!(first_row.len() > 1);
        // Columns are centered in equal width slices.
        let slice = 30.0 / first_row.len() as f64;
        for (i, speaker) in first_row.iter().enumerate() {
            let expected = (i as f64 + 0.5) * slice;
            assert!((speaker.position.x - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_unbounded_coverage_target() {
        let room = RoomDimensions::new(30.0, 12.0, 6.0);
        assert!(optimal_delay_positions(&room, f64::INFINITY).is_err());
        assert!(optimal_delay_positions(&RoomDimensions::new(0.0, 12.0, 6.0), 0.75).is_err());
    }
}
