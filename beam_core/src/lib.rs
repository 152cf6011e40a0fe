//! # beam_core - Beam Force Report Engine
//!
//! `beam_core` turns a table of beam force data (position, shear force,
//! bending moment) into a typeset PDF report with colour-graded shear force
//! and bending moment diagrams.
//!
//! ## Pipeline
//!
//! 1. **Load**: read the first sheet of a spreadsheet (or a CSV) into a
//!    [`Dataset`], resolving columns by name
//! 2. **Diagram**: resample each curve at 200 points and shade it strip by
//!    strip from a fixed colour ramp
//! 3. **Assemble**: build the Typst source of the whole report
//! 4. **Compile**: run a [`DocumentCompiler`] over the source and check the PDF
//!
//! Each stage returns a [`ReportResult`]; the first failure aborts the run
//! and names its [`Stage`].
//!
//! ## Quick Start
//!
//! ```rust
//! use beam_core::dataset::{Dataset, Sample};
//! use beam_core::diagrams::{synthesize, DiagramKind};
//!
//! let samples = (0..=10)
//!     .map(|i| {
//!         let x = i as f64 * 1.5;
//!         Sample::new(x, 45.0 - 6.0 * x, 45.0 * x - 3.0 * x * x)
//!     })
//!     .collect();
//! let dataset = Dataset::new(samples).unwrap();
//!
//! let moment = synthesize(&dataset, DiagramKind::Moment).unwrap();
//! assert!((moment.summary.max - 168.75).abs() < 0.5);
//! ```
//!
//! ## Modules
//!
//! - [`dataset`] - Samples, column resolution and validation
//! - [`file_io`] - Spreadsheet/CSV loading and atomic writes
//! - [`interpolation`] - Linear and quadratic spline resampling
//! - [`gradient`] - Colour ramps for diagram shading
//! - [`diagrams`] - Diagram data and Typst figure markup
//! - [`report`] - Report assembly and the end-to-end run
//! - [`compile`] - Typst compilation backends
//! - [`settings`] - Optional run settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod compile;
pub mod dataset;
pub mod diagrams;
pub mod errors;
pub mod file_io;
pub mod gradient;
pub mod interpolation;
pub mod report;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use compile::{CompileJob, DocumentCompiler, EmbeddedTypst, ExternalTypst};
pub use dataset::{Dataset, Field, Sample};
pub use diagrams::{Diagram, DiagramKind, DiagramSummary};
pub use errors::{ReportError, ReportResult, Stage};
pub use file_io::load_dataset;
pub use report::{generate_report, ReportArtifacts, ReportOutcome, ReportRequest};
pub use settings::{CompilerChoice, ReportSettings};
