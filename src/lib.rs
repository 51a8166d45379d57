pub mod acoustics;
pub mod catalog;
pub mod error;
pub mod geometry;

use wasm_bindgen::prelude::*;

use crate::acoustics::{cable, delay, rt60, spl, sti, video};
use crate::catalog::Speaker;
use crate::geometry::{Point3, RoomDimensions};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the avsm-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn err_to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(err_to_js)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(err_to_js)
}

/// Wire shape for speaker lists that only carry a position.
#[derive(serde::Deserialize)]
struct PositionedSpeaker {
    position: Point3,
}

// ---- RT60 ----

/// WASM-exposed: Sabine/Eyring reverberation time per octave band.
#[wasm_bindgen(js_name = calculateRT60)]
pub fn calculate_rt60(
    dimensions: JsValue,
    surfaces: JsValue,
    occupancy: JsValue,
    target_rt60: JsValue,
) -> Result<JsValue, JsValue> {
    let dimensions: RoomDimensions = from_js(dimensions)?;
    let surfaces: Vec<rt60::RoomSurface> = from_js(surfaces)?;
    let occupancy: rt60::Occupancy = from_js(occupancy)?;
    let target: rt60::TargetRt60 = from_js(target_rt60)?;
    let result =
        rt60::compute_rt60(&dimensions, &surfaces, &occupancy, &target).map_err(err_to_js)?;
    to_js(&result)
}

/// WASM-exposed: absorption treatment needed to pull RT60 down to a target.
#[wasm_bindgen(js_name = suggestTreatment)]
pub fn suggest_treatment(
    current_rt60: f64,
    target_rt60: f64,
    room_volume: f64,
    available_surfaces: JsValue,
) -> Result<JsValue, JsValue> {
    let surfaces: Vec<rt60::AvailableSurface> = from_js(available_surfaces)?;
    let suggestions = rt60::suggest_treatment(current_rt60, target_rt60, room_volume, &surfaces);
    to_js(&suggestions)
}

// ---- STI ----

/// WASM-exposed: Speech Transmission Index from per-band RT60 and levels.
#[wasm_bindgen(js_name = calculateSTI)]
pub fn calculate_sti(parameters: JsValue) -> Result<JsValue, JsValue> {
    let parameters: sti::StiParameters = from_js(parameters)?;
    to_js(&sti::compute_sti(&parameters))
}

/// WASM-exposed: quick single-number STI estimate from RT60 and SNR.
#[wasm_bindgen(js_name = estimateSTI)]
pub fn estimate_sti(rt60: f64, snr: f64) -> f64 {
    sti::estimate_sti(rt60, snr)
}

/// WASM-exposed: RT60/SNR envelope needed to reach a target STI.
#[wasm_bindgen(js_name = calculateRequiredConditions)]
pub fn calculate_required_conditions(
    target_sti: f64,
    current_rt60: f64,
    current_noise: f64,
) -> Result<JsValue, JsValue> {
    to_js(&sti::required_conditions(target_sti, current_rt60, current_noise))
}

// ---- SPL / coverage ----

/// WASM-exposed: SPL a single speaker produces at one listening point.
/// Omit the aim point for an on-axis (non-directional) calculation.
#[wasm_bindgen(js_name = calculateSPLAtPoint)]
pub fn calculate_spl_at_point(
    speaker: JsValue,
    power: f64,
    listener_point: JsValue,
    speaker_position: JsValue,
    aim_point: JsValue,
) -> Result<f64, JsValue> {
    let speaker: Speaker = from_js(speaker)?;
    let listener: Point3 = from_js(listener_point)?;
    let position: Point3 = from_js(speaker_position)?;
    let aim: Option<Point3> = from_js(aim_point)?;
    Ok(spl::spl_at_point(&speaker, power, listener, position, aim))
}

/// WASM-exposed: combined SPL over a listener-height grid.
#[wasm_bindgen(js_name = calculateCoverageGrid)]
pub fn calculate_coverage_grid(
    room_dimensions: JsValue,
    speakers: JsValue,
    grid_resolution: Option<f64>,
    listener_height: Option<f64>,
) -> Result<JsValue, JsValue> {
    let room: RoomDimensions = from_js(room_dimensions)?;
    let placements: Vec<spl::SpeakerPlacement> = from_js(speakers)?;
    let grid = spl::coverage_grid(
        &room,
        &placements,
        grid_resolution.unwrap_or(spl::DEFAULT_GRID_RESOLUTION_M),
        listener_height.unwrap_or(spl::DEFAULT_LISTENER_HEIGHT_M),
    )
    .map_err(err_to_js)?;
    to_js(&grid)
}

/// WASM-exposed: speaker count, layout and power to hit a target SPL.
#[wasm_bindgen(js_name = calculateSpeakerRequirements)]
pub fn calculate_speaker_requirements(
    room_dimensions: JsValue,
    target_spl: JsValue,
    ambient_noise: f64,
    speaker: JsValue,
    mounting_height: Option<f64>,
) -> Result<JsValue, JsValue> {
    let room: RoomDimensions = from_js(room_dimensions)?;
    let target: spl::TargetSpl = from_js(target_spl)?;
    let speaker: Speaker = from_js(speaker)?;
    let result = spl::speaker_requirements(
        &room,
        &target,
        ambient_noise,
        &speaker,
        mounting_height.unwrap_or(spl::DEFAULT_MOUNTING_HEIGHT_M),
    )
    .map_err(err_to_js)?;
    to_js(&result)
}

/// WASM-exposed: amplifier power and channel count for a speaker set.
#[wasm_bindgen(js_name = calculateAmplifierPower)]
pub fn calculate_amplifier_power(
    speakers: JsValue,
    headroom: Option<f64>,
    safety_factor: Option<f64>,
) -> Result<JsValue, JsValue> {
    let loads: Vec<spl::SpeakerLoad> = from_js(speakers)?;
    let result = spl::amplifier_power(
        &loads,
        headroom.unwrap_or(spl::DEFAULT_AMPLIFIER_HEADROOM_DB),
        safety_factor.unwrap_or(spl::DEFAULT_AMPLIFIER_SAFETY_FACTOR),
    );
    to_js(&result)
}

// ---- Delay ----

/// WASM-exposed: speed of sound at a temperature (default 20 °C).
#[wasm_bindgen(js_name = calculateSpeedOfSound)]
pub fn calculate_speed_of_sound(temperature: Option<f64>) -> f64 {
    geometry::speed_of_sound(temperature.unwrap_or(geometry::DEFAULT_TEMPERATURE_C))
}

/// WASM-exposed: propagation delay in ms for a path length.
#[wasm_bindgen(js_name = calculateDelayTime)]
pub fn calculate_delay_time(distance: f64, temperature: Option<f64>) -> f64 {
    delay::delay_time_ms(distance, temperature.unwrap_or(geometry::DEFAULT_TEMPERATURE_C))
}

/// WASM-exposed: delay settings for every zone speaker, sorted by distance.
#[wasm_bindgen(js_name = calculateSystemDelays)]
pub fn calculate_system_delays(
    main_speaker_position: JsValue,
    delay_speakers: JsValue,
    temperature: Option<f64>,
    additional_delay: Option<f64>,
) -> Result<JsValue, JsValue> {
    let main: Point3 = from_js(main_speaker_position)?;
    let speakers: Vec<delay::DelaySpeaker> = from_js(delay_speakers)?;
    let result = delay::system_delays(
        main,
        &speakers,
        temperature.unwrap_or(geometry::DEFAULT_TEMPERATURE_C),
        additional_delay.unwrap_or(0.0),
    );
    to_js(&result)
}

/// WASM-exposed: delay speaker rows for a room too long for the mains.
#[wasm_bindgen(js_name = calculateOptimalDelayPositions)]
pub fn calculate_optimal_delay_positions(
    room_dimensions: JsValue,
    target_coverage: Option<f64>,
) -> Result<JsValue, JsValue> {
    let room: RoomDimensions = from_js(room_dimensions)?;
    let positions = delay::optimal_delay_positions(
        &room,
        target_coverage.unwrap_or(delay::DEFAULT_COVERAGE_FRACTION),
    )
    .map_err(err_to_js)?;
    to_js(&positions)
}

/// WASM-exposed: extra audio delay needed to stay lip-synced with video.
#[wasm_bindgen(js_name = calculateAudioVideoSync)]
pub fn calculate_audio_video_sync(
    video_processing_delay: f64,
    audio_processing_delay: f64,
    distance_to_screen: f64,
    temperature: Option<f64>,
) -> Result<JsValue, JsValue> {
    let result = delay::audio_video_sync(
        video_processing_delay,
        audio_processing_delay,
        distance_to_screen,
        temperature.unwrap_or(geometry::DEFAULT_TEMPERATURE_C),
    );
    to_js(&result)
}

/// WASM-exposed: delay for a fill speaker against the nearest main.
#[wasm_bindgen(js_name = calculateFillSpeakerDelays)]
pub fn calculate_fill_speaker_delays(
    main_speakers: JsValue,
    fill_speaker: JsValue,
    listener_position: JsValue,
    temperature: Option<f64>,
) -> Result<JsValue, JsValue> {
    let mains: Vec<PositionedSpeaker> = from_js(main_speakers)?;
    let main_positions: Vec<Point3> = mains.into_iter().map(|s| s.position).collect();
    let fill: delay::DelaySpeaker = from_js(fill_speaker)?;
    let listener: Point3 = from_js(listener_position)?;
    let result = delay::fill_speaker_delay(
        &main_positions,
        fill.position,
        listener,
        temperature.unwrap_or(geometry::DEFAULT_TEMPERATURE_C),
    )
    .map_err(err_to_js)?;
    to_js(&result)
}

// ---- Cable loss ----

/// WASM-exposed: resistive loss on a low-impedance speaker run.
/// Omit the voltage to derive it from rated power into the impedance.
#[wasm_bindgen(js_name = calculateLowImpedanceLoss)]
pub fn calculate_low_impedance_loss(
    cable_length: f64,
    speaker_impedance: f64,
    amplifier_power: f64,
    amplifier_voltage: Option<f64>,
    cable_gauge: Option<u16>,
) -> Result<JsValue, JsValue> {
    let voltage = amplifier_voltage
        .unwrap_or_else(|| cable::rated_amplifier_voltage(amplifier_power, speaker_impedance));
    let result = cable::low_impedance_loss(
        cable_length,
        speaker_impedance,
        amplifier_power,
        voltage,
        cable_gauge.unwrap_or(cable::DEFAULT_CABLE_GAUGE),
    )
    .map_err(err_to_js)?;
    to_js(&result)
}

/// WASM-exposed: voltage drop on a 70 V / 100 V distributed line.
#[wasm_bindgen(js_name = calculateDistributedSystemLoss)]
pub fn calculate_distributed_system_loss(
    cable_length: f64,
    system_voltage: u16,
    total_power: f64,
    cable_gauge: Option<u16>,
) -> Result<JsValue, JsValue> {
    let line = cable::ConstantVoltageLine::try_from(system_voltage)
        .map_err(|e| JsValue::from_str(&e))?;
    let result = cable::distributed_system_loss(
        cable_length,
        line,
        total_power,
        cable_gauge.unwrap_or(cable::DEFAULT_CABLE_GAUGE),
    )
    .map_err(err_to_js)?;
    to_js(&result)
}

/// WASM-exposed: longest run that keeps power loss within a budget.
#[wasm_bindgen(js_name = calculateMaxCableLength)]
pub fn calculate_max_cable_length(
    speaker_impedance: f64,
    amplifier_power: f64,
    max_loss_percent: Option<f64>,
    cable_gauge: Option<u16>,
) -> Result<f64, JsValue> {
    cable::max_cable_length(
        speaker_impedance,
        amplifier_power,
        max_loss_percent.unwrap_or(cable::LOW_IMPEDANCE_MAX_LOSS_PERCENT),
        cable_gauge.unwrap_or(cable::DEFAULT_CABLE_GAUGE),
    )
    .map_err(err_to_js)
}

// ---- Video ----

/// WASM-exposed: viewing angles from a seat to the display center.
#[wasm_bindgen(js_name = calculateViewingAngles)]
pub fn calculate_viewing_angles(
    viewer_position: JsValue,
    display_position: JsValue,
) -> Result<JsValue, JsValue> {
    let viewer: Point3 = from_js(viewer_position)?;
    let display: Point3 = from_js(display_position)?;
    to_js(&video::viewing_angles(viewer, display))
}

/// WASM-exposed: smallest display serving the furthest viewer.
#[wasm_bindgen(js_name = calculateDisplaySize)]
pub fn calculate_display_size(
    furthest_viewer_distance: f64,
    viewing_rule: JsValue,
    aspect_ratio: JsValue,
) -> Result<JsValue, JsValue> {
    let rule: Option<video::ViewingRule> = from_js(viewing_rule)?;
    let aspect: Option<video::AspectRatio> = from_js(aspect_ratio)?;
    let result = video::display_size(
        furthest_viewer_distance,
        rule.unwrap_or_default(),
        aspect.unwrap_or_default(),
    )
    .map_err(err_to_js)?;
    to_js(&result)
}

/// WASM-exposed: pixel density, LED pitch budget and readability.
#[wasm_bindgen(js_name = calculatePixelDensity)]
pub fn calculate_pixel_density(
    display_resolution: JsValue,
    display_size: JsValue,
    viewing_distance: f64,
) -> Result<JsValue, JsValue> {
    let resolution: video::Resolution = from_js(display_resolution)?;
    let size: video::DisplayDimensions = from_js(display_size)?;
    let result = video::pixel_density(resolution, size, viewing_distance).map_err(err_to_js)?;
    to_js(&result)
}

/// WASM-exposed: display brightness needed against ambient light.
#[wasm_bindgen(js_name = calculateBrightnessRequirements)]
pub fn calculate_brightness_requirements(
    ambient_light: f64,
    contrast_ratio: Option<f64>,
) -> Result<JsValue, JsValue> {
    let result = video::brightness_requirements(
        ambient_light,
        contrast_ratio.unwrap_or(video::DEFAULT_CONTRAST_RATIO),
    )
    .map_err(err_to_js)?;
    to_js(&result)
}

/// WASM-exposed: distance band a display size serves well.
#[wasm_bindgen(js_name = calculateOptimalViewingDistance)]
pub fn calculate_optimal_viewing_distance(
    display_size: JsValue,
    viewing_rule: JsValue,
) -> Result<JsValue, JsValue> {
    let size: video::DisplayDimensions = from_js(display_size)?;
    let rule: Option<video::ViewingRule> = from_js(viewing_rule)?;
    let result =
        video::optimal_viewing_distance(size, rule.unwrap_or_default()).map_err(err_to_js)?;
    to_js(&result)
}
