//! Display sizing and viewing geometry.
//!
//! Sizing follows the image-height rules of thumb: the furthest viewer
//! should sit no more than 4/6/8 screen heights away depending on how
//! closely the content must be read. Angle checks use the common ±45°
//! horizontal, 0-30° vertical envelope.

use serde::{Deserialize, Serialize};

use crate::error::AcousticsError;
use crate::geometry::Point3;

const INCHES_PER_METER: f64 = 39.3701;

const MAX_HORIZONTAL_ANGLE_DEG: f64 = 45.0;
const MAX_VERTICAL_ANGLE_DEG: f64 = 30.0;

/// One arc-minute, the eye's resolving limit, in radians.
const EYE_RESOLUTION_RAD: f64 = 0.0003;

/// Pixel pitch is padded to 2.5x the resolving limit for comfort.
const PIXEL_PITCH_COMFORT_FACTOR: f64 = 2.5;

/// Text needs roughly this many pixels per inch to stay legible.
const READABLE_MIN_PPI: f64 = 50.0;

const LUX_TO_FOOT_CANDLES: f64 = 0.0929;
const NITS_PER_FOOT_LAMBERT: f64 = 3.426;
const BRIGHTNESS_HEADROOM: f64 = 1.2;

/// Contrast ratio assumed when the caller has no requirement of their own.
pub const DEFAULT_CONTRAST_RATIO: f64 = 10.0;

/// Image-height viewing rule: furthest viewer at 4, 6 or 8 screen heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewingRule {
    /// Analytical content, fine detail.
    #[serde(rename = "4x")]
    FourX,
    /// General presentation content.
    #[default]
    #[serde(rename = "6x")]
    SixX,
    /// Passive viewing, video playback.
    #[serde(rename = "8x")]
    EightX,
}

impl ViewingRule {
    pub fn multiplier(self) -> f64 {
        match self {
            ViewingRule::FourX => 4.0,
            ViewingRule::SixX => 6.0,
            ViewingRule::EightX => 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    SixteenNine,
    #[serde(rename = "16:10")]
    SixteenTen,
    #[serde(rename = "4:3")]
    FourThree,
}

impl AspectRatio {
    /// Width divided by height.
    pub fn width_over_height(self) -> f64 {
        match self {
            AspectRatio::SixteenNine => 16.0 / 9.0,
            AspectRatio::SixteenTen => 16.0 / 10.0,
            AspectRatio::FourThree => 4.0 / 3.0,
        }
    }
}

/// Physical display size, m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayDimensions {
    pub width: f64,
    pub height: f64,
}

/// Native resolution, px.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingAngleResult {
    /// Magnitude of the off-axis angle, degrees.
    pub horizontal_angle: f64,
    /// Signed; negative means the viewer looks down at the display.
    pub vertical_angle: f64,
    pub distance: f64,
    pub acceptable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySizeResult {
    pub screen_width: f64,
    pub screen_height: f64,
    /// Rounded to the nearest whole inch.
    pub diagonal_inches: f64,
    pub aspect_ratio: AspectRatio,
    pub viewing_rule: ViewingRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelDensityResult {
    pub pixels_per_inch: f64,
    pub pixels_per_meter: f64,
    pub viewing_distance: f64,
    /// For direct-view LED walls, mm.
    pub minimum_pixel_pitch: f64,
    pub readable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrightnessResult {
    /// cd/m².
    pub required_brightness: f64,
    pub foot_lamberts: f64,
    /// Required brightness plus 20% headroom, rounded to whole nits.
    pub recommended_display_brightness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingDistanceResult {
    pub min_distance: f64,
    pub max_distance: f64,
    pub optimal_distance: f64,
}

/// Angles from a viewer to the display center.
///
/// Horizontal is atan2 of lateral offset over depth; vertical is measured
/// against the horizontal plane. Coincident points come out on-axis.
pub fn viewing_angles(viewer: Point3, display: Point3) -> ViewingAngleResult {
    let delta = display - viewer;
    let distance = delta.magnitude();
    let horizontal_distance = (delta.x * delta.x + delta.y * delta.y).sqrt();

    let horizontal_angle = delta.x.atan2(delta.y).to_degrees();
    let vertical_angle = delta.z.atan2(horizontal_distance).to_degrees();

    let acceptable = horizontal_angle.abs() <= MAX_HORIZONTAL_ANGLE_DEG
        && vertical_angle >= 0.0
        && vertical_angle <= MAX_VERTICAL_ANGLE_DEG;

    ViewingAngleResult {
        horizontal_angle: horizontal_angle.abs(),
        vertical_angle,
        distance,
        acceptable,
    }
}

/// Smallest display that serves a viewer at the given distance.
pub fn display_size(
    furthest_viewer_distance: f64,
    viewing_rule: ViewingRule,
    aspect_ratio: AspectRatio,
) -> Result<DisplaySizeResult, AcousticsError> {
    if !furthest_viewer_distance.is_finite() || furthest_viewer_distance <= 0.0 {
        return Err(AcousticsError::InvalidParameter {
            name: "furthestViewerDistance",
            value: furthest_viewer_distance,
        });
    }

    let height = furthest_viewer_distance / viewing_rule.multiplier();
    let width = height * aspect_ratio.width_over_height();
    let diagonal_meters = (width * width + height * height).sqrt();

    Ok(DisplaySizeResult {
        screen_width: width,
        screen_height: height,
        diagonal_inches: (diagonal_meters * INCHES_PER_METER).round(),
        aspect_ratio,
        viewing_rule,
    })
}

/// Pixel density of a display and the pitch budget at a viewing distance.
pub fn pixel_density(
    resolution: Resolution,
    display: DisplayDimensions,
    viewing_distance: f64,
) -> Result<PixelDensityResult, AcousticsError> {
    if !display.width.is_finite() || display.width <= 0.0 {
        return Err(AcousticsError::InvalidParameter {
            name: "displayWidth",
            value: display.width,
        });
    }
    if !display.height.is_finite() || display.height <= 0.0 {
        return Err(AcousticsError::InvalidParameter {
            name: "displayHeight",
            value: display.height,
        });
    }
    if !viewing_distance.is_finite() || viewing_distance <= 0.0 {
        return Err(AcousticsError::InvalidParameter {
            name: "viewingDistance",
            value: viewing_distance,
        });
    }

    let pixel_width = f64::from(resolution.width);
    let pixel_height = f64::from(resolution.height);
    let diagonal_pixels = (pixel_width * pixel_width + pixel_height * pixel_height).sqrt();
    let diagonal_inches =
        (display.width * display.width + display.height * display.height).sqrt()
            * INCHES_PER_METER;
    let pixels_per_inch = diagonal_pixels / diagonal_inches;

    let minimum_pixel_pitch =
        viewing_distance * EYE_RESOLUTION_RAD * PIXEL_PITCH_COMFORT_FACTOR * 1000.0;

    Ok(PixelDensityResult {
        pixels_per_inch,
        pixels_per_meter: pixels_per_inch / INCHES_PER_METER,
        viewing_distance,
        minimum_pixel_pitch,
        readable: pixels_per_inch >= READABLE_MIN_PPI,
    })
}

/// Display brightness needed to hold a contrast ratio against ambient light.
pub fn brightness_requirements(
    ambient_light_lux: f64,
    contrast_ratio: f64,
) -> Result<BrightnessResult, AcousticsError> {
    if !ambient_light_lux.is_finite() || ambient_light_lux < 0.0 {
        return Err(AcousticsError::InvalidParameter {
            name: "ambientLight",
            value: ambient_light_lux,
        });
    }
    if !contrast_ratio.is_finite() || contrast_ratio <= 0.0 {
        return Err(AcousticsError::InvalidParameter {
            name: "contrastRatio",
            value: contrast_ratio,
        });
    }

    let ambient_nits = ambient_light_lux * LUX_TO_FOOT_CANDLES * NITS_PER_FOOT_LAMBERT;
    let required_brightness = ambient_nits * contrast_ratio;

    Ok(BrightnessResult {
        required_brightness,
        foot_lamberts: required_brightness / NITS_PER_FOOT_LAMBERT,
        recommended_display_brightness: (required_brightness * BRIGHTNESS_HEADROOM).round(),
    })
}

/// Distance band a display of the given size serves well.
///
/// Minimum and maximum always come from the 4x and 8x rules; the optimal
/// point follows the requested rule.
pub fn optimal_viewing_distance(
    display: DisplayDimensions,
    viewing_rule: ViewingRule,
) -> Result<ViewingDistanceResult, AcousticsError> {
    if !display.height.is_finite() || display.height <= 0.0 {
        return Err(AcousticsError::InvalidParameter {
            name: "displayHeight",
            value: display.height,
        });
    }

    Ok(ViewingDistanceResult {
        min_distance: display.height * ViewingRule::FourX.multiplier(),
        max_distance: display.height * ViewingRule::EightX.multiplier(),
        optimal_distance: display.height * viewing_rule.multiplier(),
    })
}
