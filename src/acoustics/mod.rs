//! Acoustic and AV calculation engines. Pure compute, no I/O.
//!
//! Every engine is a deterministic function of its arguments. The same code
//! powers both the web calculators (via WASM) and native callers such as
//! test rigs and batch specification tooling.

pub mod bands;
pub mod cable;
pub mod delay;
pub mod rt60;
pub mod spl;
pub mod sti;
pub mod video;
