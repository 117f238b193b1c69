//! Agents moving back and forth between two points.
//!
//! Every agent's state is a `states::State`, the merged value type generated
//! for `IState`, so the whole population lives in one contiguous `Vec`
//! without boxing.

pub mod machine;
pub mod states;

pub use machine::Simulation;
pub use states::{IState, Idle, Moving, State, StateContext};
