//! polystruct - heap-free polymorphism over a closed set of structs
//!
//! Mark a trait with `#[polymorphic_struct]`, implement it on ordinary
//! structs, and the generator emits one flattened value type that stores any
//! of them and dispatches every trait method with a `match` on its
//! discriminant.
//!
//! # Example
//!
//! ```rust
//! use polystruct::prelude::*;
//!
//! #[polymorphic_structs]
//! mod shapes {
//!     #[polymorphic_struct]
//!     pub trait IShape {
//!         fn area(&self) -> f32;
//!     }
//!
//!     pub struct Square { pub side: f32 }
//!     pub struct Rect { pub w: f32, pub h: f32 }
//!
//!     impl IShape for Square { fn area(&self) -> f32 { self.side * self.side } }
//!     impl IShape for Rect { fn area(&self) -> f32 { self.w * self.h } }
//! }
//!
//! use shapes::{IShape, Rect, Shape, Square};
//!
//! let all: Vec<Shape> = vec![Square { side: 2.0 }.into(), Rect { w: 2.0, h: 3.0 }.into()];
//! let total: f32 = all.iter().map(|s| s.area()).sum();
//! assert_eq!(total, 10.0);
//! ```
//!
//! Multi-module crates use the `polystruct-build` build-script front end
//! instead; `#[polymorphic_struct]` then only marks the trait.

// User-facing macros
pub use polystruct_macros::{polymorphic_struct, polymorphic_structs};

pub mod prelude {
    pub use super::{polymorphic_struct, polymorphic_structs};
}
