//! Output of simulation results.
//!
//! Two concerns, kept separate:
//!
//! - [`DataSink`] — streaming data files: one breakthrough file per
//!   component and a frame-per-step column profile file, both plain
//!   whitespace-separated text with self-documenting header comments,
//! - [`plot_breakthrough_curves`] — a PNG rendering of the recorded
//!   breakthrough curves for quick inspection.
//!
//! The sink is write-only during a run; a fatal error elsewhere leaves the
//! files valid up to the last flushed frame.

pub mod data;
pub mod plot;

pub use data::DataSink;
pub use plot::plot_breakthrough_curves;
