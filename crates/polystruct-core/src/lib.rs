//! polystruct core - flattens trait implementors into one tagged value type
//!
//! This crate holds the generator shared by the attribute macros and the
//! build-script front end:
//! - Declaration scanning over parsed `syn` items
//! - Member collection across supertrait hierarchies
//! - First-fit field-slot merging
//! - Emission of the merged type, its dispatch impls and the conversions
//!
//! # Examples
//!
//! ```
//! use polystruct_core::{CompilationUnit, Generator, GeneratorConfig, ModulePath};
//!
//! let unit = CompilationUnit::parse("shapes.rs", ModulePath::root(), r#"
//!     #[polymorphic_struct]
//!     pub trait IShape {
//!         fn area(&self) -> f32;
//!     }
//!
//!     pub struct Square { side: f32 }
//!     pub struct Rect { w: f32, h: f32 }
//!
//!     impl IShape for Square { fn area(&self) -> f32 { self.side * self.side } }
//!     impl IShape for Rect { fn area(&self) -> f32 { self.w * self.h } }
//! "#).unwrap();
//!
//! let output = Generator::new(GeneratorConfig::default()).generate(&[unit]);
//! assert!(!output.has_errors());
//! assert!(output.sources[0].text.contains("pub struct Shape {"));
//! ```

pub mod config;
pub mod convert;
pub mod declaration;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod generator;
pub mod members;
pub mod merge;
pub mod model;
pub mod scanner;
pub mod tokens;
pub mod uses;
pub mod writer;

pub use config::{ConfigError, GeneratorConfig, IndentStyle, OutputMode};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{GeneratorError, Result};
pub use generator::{
    render_module_unit, GeneratedSource, GenerationOutput, Generator, SourceKind, UseContext,
    WRAPPER_MODULE,
};
pub use members::{
    Member, MemberCollector, MemberSet, MethodMember, ParamMode, PropertyMember, ReceiverKind,
    OUT_ATTRIBUTE, PROPERTY_ATTRIBUTE,
};
pub use merge::{merge_fields, FieldSlot, SlotLayout};
pub use model::{ModulePath, MergedType, PolymorphicInterface, VariantType};
pub use scanner::{CompilationUnit, DeclarationScanner, ScanResult};
