//! Resistive cable loss for speaker runs.
//!
//! Low-impedance runs lose power across the conductor resistance in series
//! with the speaker; constant-voltage (70 V / 100 V) lines care about
//! voltage drop instead, with a tighter threshold. Both checks share the
//! same AWG reference table and recommend a thicker gauge when the supplied
//! one fails.

use serde::{Deserialize, Serialize};

use crate::error::AcousticsError;

/// Acceptable power loss for low-impedance runs, percent. The comparison
/// is strict: exactly 5% is already unacceptable.
pub const LOW_IMPEDANCE_MAX_LOSS_PERCENT: f64 = 5.0;

/// Acceptable voltage drop for constant-voltage lines, percent.
const DISTRIBUTED_MAX_DROP_PERCENT: f64 = 3.0;

/// Gauge assumed when the caller has not picked one.
pub const DEFAULT_CABLE_GAUGE: u16 = 14;

/// Length scan granularity for [`max_cable_length`], m.
const LENGTH_SCAN_RESOLUTION_M: f64 = 0.1;

/// Length scan upper bound: 5000 steps of 0.1 m = 500 m.
const LENGTH_SCAN_STEPS: u32 = 5000;

/// One row of the AWG reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableSpec {
    pub gauge: u16,
    /// Ω/m, single conductor.
    pub resistance_per_meter: f64,
    /// A, ampacity limit.
    pub max_current: f64,
}

/// Common speaker cable gauges, thickest first.
pub const CABLE_SPECS: [CableSpec; 6] = [
    CableSpec {
        gauge: 12,
        resistance_per_meter: 0.0053,
        max_current: 20.0,
    },
    CableSpec {
        gauge: 14,
        resistance_per_meter: 0.0085,
        max_current: 15.0,
    },
    CableSpec {
        gauge: 16,
        resistance_per_meter: 0.0135,
        max_current: 10.0,
    },
    CableSpec {
        gauge: 18,
        resistance_per_meter: 0.0214,
        max_current: 7.0,
    },
    CableSpec {
        gauge: 20,
        resistance_per_meter: 0.0339,
        max_current: 5.0,
    },
    CableSpec {
        gauge: 22,
        resistance_per_meter: 0.0538,
        max_current: 3.0,
    },
];

/// Looks up a gauge in the reference table.
pub fn cable_spec(gauge: u16) -> Option<&'static CableSpec> {
    CABLE_SPECS.iter().find(|spec| spec.gauge == gauge)
}

/// Constant-voltage line convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ConstantVoltageLine {
    Volts70,
    Volts100,
}

impl ConstantVoltageLine {
    pub fn volts(self) -> f64 {
        match self {
            ConstantVoltageLine::Volts70 => 70.0,
            ConstantVoltageLine::Volts100 => 100.0,
        }
    }
}

impl TryFrom<u16> for ConstantVoltageLine {
    type Error = String;

    fn try_from(volts: u16) -> Result<Self, Self::Error> {
        match volts {
            70 => Ok(ConstantVoltageLine::Volts70),
            100 => Ok(ConstantVoltageLine::Volts100),
            other => Err(format!("constant-voltage lines are 70 V or 100 V, got {other}")),
        }
    }
}

impl From<ConstantVoltageLine> for u16 {
    fn from(line: ConstantVoltageLine) -> u16 {
        match line {
            ConstantVoltageLine::Volts70 => 70,
            ConstantVoltageLine::Volts100 => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableLossResult {
    /// Out-and-back conductor resistance, Ω.
    pub total_resistance: f64,
    pub voltage_drop: f64,
    pub voltage_drop_percent: f64,
    pub power_loss: f64,
    pub power_loss_percent: f64,
    pub voltage_at_speaker: f64,
    pub power_at_speaker: f64,
    /// The supplied gauge when it passes, otherwise the thickest gauge in
    /// the table that does. Stays at the supplied gauge when nothing helps.
    pub recommended_gauge: u16,
    pub acceptable: bool,
}

/// RMS voltage an amplifier delivers at its rated power into a nominal
/// load: `V = √(P·Z)`. Callers without a measured drive voltage pass this.
pub fn rated_amplifier_voltage(amplifier_power: f64, speaker_impedance: f64) -> f64 {
    (amplifier_power * speaker_impedance).sqrt()
}

struct LossFigures {
    total_resistance: f64,
    voltage_drop: f64,
    voltage_drop_percent: f64,
    voltage_at_speaker: f64,
    power_at_speaker: f64,
    power_loss: f64,
    power_loss_percent: f64,
}

fn low_impedance_run(
    spec: &CableSpec,
    cable_length_m: f64,
    speaker_impedance: f64,
    amplifier_power: f64,
    amplifier_voltage: f64,
) -> LossFigures {
    let total_resistance = spec.resistance_per_meter * cable_length_m * 2.0;
    let current = amplifier_voltage / (speaker_impedance + total_resistance);
    let voltage_drop = current * total_resistance;
    let voltage_at_speaker = amplifier_voltage - voltage_drop;
    let power_at_speaker = voltage_at_speaker * voltage_at_speaker / speaker_impedance;
    let power_loss = amplifier_power - power_at_speaker;
    LossFigures {
        total_resistance,
        voltage_drop,
        voltage_drop_percent: voltage_drop / amplifier_voltage * 100.0,
        voltage_at_speaker,
        power_at_speaker,
        power_loss,
        power_loss_percent: power_loss / amplifier_power * 100.0,
    }
}

/// Loss figures for a low-impedance run.
///
/// `cable_length_m` is the one-way run; resistance doubles for the return
/// conductor. A run is acceptable while power loss stays strictly under 5%.
/// When it fails, thicker gauges are tried thickest-first and the first
/// that passes becomes the recommendation.
pub fn low_impedance_loss(
    cable_length_m: f64,
    speaker_impedance: f64,
    amplifier_power: f64,
    amplifier_voltage: f64,
    cable_gauge: u16,
) -> Result<CableLossResult, AcousticsError> {
    let spec = cable_spec(cable_gauge).ok_or(AcousticsError::UnsupportedGauge {
        gauge: cable_gauge,
    })?;

    let figures = low_impedance_run(
        spec,
        cable_length_m,
        speaker_impedance,
        amplifier_power,
        amplifier_voltage,
    );

    let mut recommended_gauge = cable_gauge;
    if figures.power_loss_percent > LOW_IMPEDANCE_MAX_LOSS_PERCENT {
        for candidate in &CABLE_SPECS {
            if candidate.gauge < cable_gauge {
                let test = low_impedance_run(
                    candidate,
                    cable_length_m,
                    speaker_impedance,
                    amplifier_power,
                    amplifier_voltage,
                );
                if test.power_loss_percent < LOW_IMPEDANCE_MAX_LOSS_PERCENT {
                    recommended_gauge = candidate.gauge;
                    break;
                }
            }
        }
    }

    Ok(CableLossResult {
        total_resistance: figures.total_resistance,
        voltage_drop: figures.voltage_drop,
        voltage_drop_percent: figures.voltage_drop_percent,
        power_loss: figures.power_loss,
        power_loss_percent: figures.power_loss_percent,
        voltage_at_speaker: figures.voltage_at_speaker,
        power_at_speaker: figures.power_at_speaker,
        recommended_gauge,
        acceptable: figures.power_loss_percent < LOW_IMPEDANCE_MAX_LOSS_PERCENT,
    })
}

/// Loss figures for a 70 V / 100 V distributed line.
///
/// Line current is fixed by the total tap power, so the judgment criterion
/// is voltage drop, acceptable strictly under 3%.
pub fn distributed_system_loss(
    cable_length_m: f64,
    line: ConstantVoltageLine,
    total_power: f64,
    cable_gauge: u16,
) -> Result<CableLossResult, AcousticsError> {
    let spec = cable_spec(cable_gauge).ok_or(AcousticsError::UnsupportedGauge {
        gauge: cable_gauge,
    })?;
    let system_voltage = line.volts();

    let total_resistance = spec.resistance_per_meter * cable_length_m * 2.0;
    let current = total_power / system_voltage;
    let voltage_drop = current * total_resistance;
    let voltage_drop_percent = voltage_drop / system_voltage * 100.0;
    let voltage_at_speaker = system_voltage - voltage_drop;

    // The tap load acts as a fixed resistance V²/P.
    let power_at_speaker =
        voltage_at_speaker * voltage_at_speaker / (system_voltage * system_voltage / total_power);
    let power_loss = total_power - power_at_speaker;
    let power_loss_percent = power_loss / total_power * 100.0;

    let mut recommended_gauge = cable_gauge;
    if voltage_drop_percent > DISTRIBUTED_MAX_DROP_PERCENT {
        for candidate in &CABLE_SPECS {
            if candidate.gauge < cable_gauge {
                let test_resistance = candidate.resistance_per_meter * cable_length_m * 2.0;
                let test_drop_percent = current * test_resistance / system_voltage * 100.0;
                if test_drop_percent < DISTRIBUTED_MAX_DROP_PERCENT {
                    recommended_gauge = candidate.gauge;
                    break;
                }
            }
        }
    }

    Ok(CableLossResult {
        total_resistance,
        voltage_drop,
        voltage_drop_percent,
        power_loss,
        power_loss_percent,
        voltage_at_speaker,
        power_at_speaker,
        recommended_gauge,
        acceptable: voltage_drop_percent < DISTRIBUTED_MAX_DROP_PERCENT,
    })
}

/// Longest low-impedance run that keeps power loss within
/// `max_loss_percent`, scanning in 0.1 m steps up to 500 m.
///
/// The drive voltage is the rated-power default. Returns 0 when even the
/// first step exceeds the limit. The bound here is inclusive, unlike the
/// acceptability flag.
pub fn max_cable_length(
    speaker_impedance: f64,
    amplifier_power: f64,
    max_loss_percent: f64,
    cable_gauge: u16,
) -> Result<f64, AcousticsError> {
    let spec = cable_spec(cable_gauge).ok_or(AcousticsError::UnsupportedGauge {
        gauge: cable_gauge,
    })?;
    let amplifier_voltage = rated_amplifier_voltage(amplifier_power, speaker_impedance);

    let mut max_length = 0.0;
    for step in 1..=LENGTH_SCAN_STEPS {
        let length = step as f64 * LENGTH_SCAN_RESOLUTION_M;
        let figures = low_impedance_run(
            spec,
            length,
            speaker_impedance,
            amplifier_power,
            amplifier_voltage,
        );
        if figures.power_loss_percent <= max_loss_percent {
            max_length = length;
        } else {
            break;
        }
    }

    Ok(max_length)
}
