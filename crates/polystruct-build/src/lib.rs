//! Build-script front end for polystruct.
//!
//! Scans the crate sources from `build.rs`, runs the generator in
//! module-unit mode and writes one file per scanned module into
//! `$OUT_DIR/polystruct/`. Each module then pulls its generated items in
//! with `include!`:
//!
//! ```ignore
//! // build.rs
//! fn main() {
//!     polystruct_build::Builder::new()
//!         .source_dir("src")
//!         .generate()
//!         .expect("polystruct generation failed");
//! }
//!
//! // src/states.rs
//! include!(concat!(env!("OUT_DIR"), "/polystruct/states.rs"));
//! ```
//!
//! Generation problems never fail the build script. They are printed as
//! `cargo:warning=` lines, and the downstream compile reports the missing
//! types.

mod builder;
mod error;
mod logging;

pub use builder::{module_path_for, BuildReport, Builder, OUTPUT_SUBDIR};
pub use error::BuildError;
pub use logging::init_logging;

pub use polystruct_core::{Diagnostic, GeneratorConfig, ModulePath, Severity};
