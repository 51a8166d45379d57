//! Equipment catalog types.
//!
//! These types map directly to the `equipment.json` schema shipped with the
//! AV Systems Manual web app. The engines treat catalog records as opaque
//! parameter sources: they read numeric specs, never mutate or persist them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentCategory {
    Speaker,
    Amplifier,
    Mixer,
    Microphone,
    Display,
    Control,
    Processing,
    Cable,
    Accessory,
}

/// Physical unit dimensions, millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Fields common to every catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentBase {
    pub id: String,
    pub category: EquipmentCategory,
    pub manufacturer: String,
    pub model: String,
    pub description: String,
    /// List price, USD.
    pub price: f64,
    /// kg
    pub weight: f64,
    pub dimensions: PhysicalDimensions,
    /// Watts, absent for passive units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_consumption: Option<f64>,
    /// Years.
    pub warranty: u32,
}

/// Passband limits, Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub low: f64,
    pub high: f64,
}

/// Nominal coverage pattern, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoveragePattern {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Power ratings, watts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerHandling {
    pub continuous: f64,
    pub peak: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeakerType {
    PointSource,
    LineArray,
    Column,
    Ceiling,
    Subwoofer,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeakerConnector {
    Speakon,
    BindingPost,
    Phoenix,
    EuroBlock,
}

/// Constant-voltage transformer tap, for distributed-line speakers.
/// `None` is an explicit catalog value distinct from the field being
/// absent; both mean the speaker runs low-impedance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformerTap {
    #[serde(rename = "70V")]
    Volts70,
    #[serde(rename = "100V")]
    Volts100,
    #[serde(rename = "none")]
    None,
}

impl TransformerTap {
    /// True for taps that put the speaker on a 70 V or 100 V line.
    pub fn is_constant_voltage(self) -> bool {
        matches!(self, TransformerTap::Volts70 | TransformerTap::Volts100)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    #[serde(flatten)]
    pub base: EquipmentBase,
    #[serde(rename = "type")]
    pub speaker_type: SpeakerType,
    pub frequency_response: FrequencyRange,
    /// dB SPL at 1 W / 1 m.
    pub sensitivity: f64,
    #[serde(rename = "maxSPL")]
    pub max_spl: f64,
    /// Nominal impedance, ohms.
    pub impedance: f64,
    pub coverage: CoveragePattern,
    pub power_handling: PowerHandling,
    pub connector_type: SpeakerConnector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer: Option<TransformerTap>,
}

impl Speaker {
    /// Whether this speaker hangs on a constant-voltage line.
    pub fn is_constant_voltage(&self) -> bool {
        self.transformer
            .is_some_and(TransformerTap::is_constant_voltage)
    }
}

/// Per-channel power ratings into standard loads, watts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerOutput {
    #[serde(rename = "at8ohms")]
    pub at_8_ohms: f64,
    #[serde(rename = "at4ohms")]
    pub at_4_ohms: f64,
    #[serde(rename = "at2ohms", default, skip_serializing_if = "Option::is_none")]
    pub at_2_ohms: Option<f64>,
    #[serde(rename = "at70V", default, skip_serializing_if = "Option::is_none")]
    pub at_70v: Option<f64>,
    #[serde(rename = "at100V", default, skip_serializing_if = "Option::is_none")]
    pub at_100v: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoolingType {
    Convection,
    ForcedAir,
    VariableSpeed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amplifier {
    #[serde(flatten)]
    pub base: EquipmentBase,
    pub channels: u32,
    pub power_output: PowerOutput,
    /// Total harmonic distortion, percent.
    pub thd: f64,
    /// dB
    pub signal_to_noise: f64,
    /// Damping factor, dimensionless.
    pub damping: f64,
    /// dBu
    pub input_sensitivity: f64,
    pub protection: Vec<String>,
    pub cooling: CoolingType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixerType {
    Analog,
    Digital,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixerInputs {
    pub mic: u32,
    pub line: u32,
    pub stereo_line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerOutputs {
    pub main: u32,
    pub aux: u32,
    pub monitor: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerEffects {
    pub internal: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EqType {
    Parametric,
    SemiParametric,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerEq {
    pub channels: EqType,
    pub bands: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalFeatures {
    /// kHz
    pub sample_rate: f64,
    pub bit_depth: u32,
    /// ms
    pub latency: f64,
    pub network_audio: bool,
    pub remote_control: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mixer {
    #[serde(flatten)]
    pub base: EquipmentBase,
    #[serde(rename = "type")]
    pub mixer_type: MixerType,
    pub inputs: MixerInputs,
    pub outputs: MixerOutputs,
    pub busses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<MixerEffects>,
    pub eq: MixerEq,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_features: Option<DigitalFeatures>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MicrophoneType {
    Dynamic,
    Condenser,
    Ribbon,
    Boundary,
    Gooseneck,
    Lavalier,
    Headset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolarPattern {
    Omnidirectional,
    Cardioid,
    Supercardioid,
    Hypercardioid,
    Bidirectional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MicConnector {
    Xlr,
    MiniXlr,
    Trs,
    Usb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirelessSpec {
    /// RF band, e.g. "470-636 MHz".
    pub frequency: String,
    pub channels: u32,
    /// Meters.
    pub range: f64,
    /// Hours.
    pub battery_life: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Microphone {
    #[serde(flatten)]
    pub base: EquipmentBase,
    #[serde(rename = "type")]
    pub microphone_type: MicrophoneType,
    pub polar_pattern: PolarPattern,
    pub frequency_response: FrequencyRange,
    /// mV/Pa.
    pub sensitivity: f64,
    #[serde(rename = "maxSPL")]
    pub max_spl: f64,
    pub impedance: f64,
    pub connector: MicConnector,
    pub phantom_power: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireless: Option<WirelessSpec>,
}

/// The full parsed catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDatabase {
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub amplifiers: Vec<Amplifier>,
    #[serde(default)]
    pub mixers: Vec<Mixer>,
    #[serde(default)]
    pub microphones: Vec<Microphone>,
}

impl EquipmentDatabase {
    /// Parses a catalog from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn speaker(&self, id: &str) -> Option<&Speaker> {
        self.speakers.iter().find(|s| s.base.id == id)
    }

    pub fn amplifier(&self, id: &str) -> Option<&Amplifier> {
        self.amplifiers.iter().find(|a| a.base.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_speaker() -> Speaker {
        Speaker {
            base: EquipmentBase {
                id: "spk-test-01".to_string(),
                category: EquipmentCategory::Speaker,
                manufacturer: "Acme Audio".to_string(),
                model: "CX-12".to_string(),
                description: "12-inch two-way point source".to_string(),
                price: 1299.0,
                weight: 18.5,
                dimensions: PhysicalDimensions {
                    width: 360.0,
                    height: 600.0,
                    depth: 350.0,
                },
                power_consumption: None,
                warranty: 5,
            },
            speaker_type: SpeakerType::PointSource,
            frequency_response: FrequencyRange {
                low: 60.0,
                high: 18000.0,
            },
            sensitivity: 96.0,
            max_spl: 126.0,
            impedance: 8.0,
            coverage: CoveragePattern {
                horizontal: 90.0,
                vertical: 60.0,
            },
            power_handling: PowerHandling {
                continuous: 300.0,
                peak: 1200.0,
            },
            connector_type: SpeakerConnector::Speakon,
            transformer: None,
        }
    }

    #[test]
    fn speaker_roundtrip_preserves_every_field() {
        let speaker = test_speaker();
        let json = serde_json::to_string_pretty(&speaker).unwrap();
        let back: Speaker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, speaker);
    }

    #[test]
    fn speaker_json_uses_schema_key_names() {
        let json = serde_json::to_string(&test_speaker()).unwrap();
        assert!(json.contains("\"maxSPL\":126.0"), "json: {json}");
        assert!(json.contains("\"powerHandling\""));
        assert!(json.contains("\"connectorType\""));
        assert!(json.contains("\"type\":\"point-source\""));
        // Flattened base fields sit at the top level.
        assert!(json.contains("\"manufacturer\":\"Acme Audio\""));
        // Absent transformer is omitted entirely.
        assert!(!json.contains("transformer"));
    }

    #[test]
    fn parses_schema_shaped_speaker_json() {
        let json = r#"{
            "id": "spk-ceiling-70v",
            "category": "speaker",
            "manufacturer": "Acme Audio",
            "model": "C6T",
            "description": "6.5-inch 70V ceiling speaker",
            "price": 189.0,
            "weight": 2.9,
            "dimensions": { "width": 239.0, "height": 239.0, "depth": 120.0 },
            "warranty": 5,
            "type": "ceiling",
            "frequencyResponse": { "low": 80.0, "high": 20000.0 },
            "sensitivity": 89.0,
            "maxSPL": 108.0,
            "impedance": 8.0,
            "coverage": { "horizontal": 110.0, "vertical": 110.0 },
            "powerHandling": { "continuous": 30.0, "peak": 60.0 },
            "connectorType": "euro-block",
            "transformer": "70V"
        }"#;
        let speaker: Speaker = serde_json::from_str(json).unwrap();
        assert_eq!(speaker.transformer, Some(TransformerTap::Volts70));
        assert!(speaker.is_constant_voltage());
        assert_eq!(speaker.speaker_type, SpeakerType::Ceiling);
        assert_eq!(speaker.base.power_consumption, None);
    }

    #[test]
    fn explicit_none_tap_is_not_constant_voltage() {
        let mut speaker = test_speaker();
        speaker.transformer = Some(TransformerTap::None);
        assert!(!speaker.is_constant_voltage());
        let json = serde_json::to_string(&speaker).unwrap();
        assert!(json.contains("\"transformer\":\"none\""));
    }

    #[test]
    fn amplifier_power_output_keys() {
        let output = PowerOutput {
            at_8_ohms: 250.0,
            at_4_ohms: 400.0,
            at_2_ohms: None,
            at_70v: Some(500.0),
            at_100v: None,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(json, r#"{"at8ohms":250.0,"at4ohms":400.0,"at70V":500.0}"#);
    }

    #[test]
    fn database_sections_default_to_empty() {
        let db = EquipmentDatabase::from_json(r#"{ "speakers": [] }"#).unwrap();
        assert!(db.speakers.is_empty());
        assert!(db.amplifiers.is_empty());
        assert!(db.speaker("anything").is_none());
    }

    #[test]
    fn database_lookup_by_id() {
        let db = EquipmentDatabase {
            speakers: vec![test_speaker()],
            ..EquipmentDatabase::default()
        };
        assert!(db.speaker("spk-test-01").is_some());
        assert!(db.speaker("spk-test-02").is_none());
    }
}
