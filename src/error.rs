use std::fmt;

/// Errors produced by the calculation engines.
///
/// Every variant is an invalid-input condition. The engines perform no I/O
/// and have no transient failure modes, so nothing here is retryable.
/// Degenerate-but-representable results (an infinite RT60 in a room with no
/// absorption) come back as non-finite floats, not as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AcousticsError {
    /// Room dimensions must be finite and strictly positive.
    InvalidDimensions {
        length: f64,
        width: f64,
        height: f64,
    },
    /// Reverberation estimates need at least one surface with nonzero area:
    /// Eyring divides by the total surface area.
    ZeroSurfaceArea,
    /// Cable gauge not present in the AWG reference table.
    UnsupportedGauge { gauge: u16 },
    /// A slice parameter that must not be empty was empty.
    EmptyInput { what: &'static str },
    /// A numeric parameter was NaN or outside its valid domain.
    InvalidParameter { name: &'static str, value: f64 },
}

impl fmt::Display for AcousticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcousticsError::InvalidDimensions {
                length,
                width,
                height,
            } => write!(
                f,
                "Room dimensions must be finite and positive, got {length} x {width} x {height} m"
            ),
            AcousticsError::ZeroSurfaceArea => {
                write!(
                    f,
                    "Total surface area is zero, need at least one surface with nonzero area"
                )
            }
            AcousticsError::UnsupportedGauge { gauge } => {
                write!(f, "Unsupported cable gauge: {gauge} AWG")
            }
            AcousticsError::EmptyInput { what } => write!(f, "Expected at least one {what}"),
            AcousticsError::InvalidParameter { name, value } => {
                write!(f, "Invalid value for {name}: {value}")
            }
        }
    }
}

impl std::error::Error for AcousticsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_values() {
        let err = AcousticsError::InvalidDimensions {
            length: -4.0,
            width: 6.0,
            height: 3.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("-4"), "message was: {msg}");

        let err = AcousticsError::UnsupportedGauge { gauge: 24 };
        assert!(err.to_string().contains("24 AWG"));

        let err = AcousticsError::EmptyInput {
            what: "main speaker",
        };
        assert!(err.to_string().contains("main speaker"));
    }
}
