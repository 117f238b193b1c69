//! Agent states.
//!
//! `IState` is the polymorphic interface. The build script generates the
//! merged `State` next to it and the conversion routines next to every
//! state struct.

use polystruct::polymorphic_struct;

mod idle;
mod moving;

pub use idle::Idle;
pub use moving::Moving;

include!(concat!(env!("OUT_DIR"), "/polystruct/states.rs"));

/// Per-agent data shared by every state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateContext {
    pub position: f32,
    pub target: f32,
    /// Seconds an agent rests after reaching its target.
    pub rest: f32,
    pub speed: f32,
    pub transitions: u32,
}

#[polymorphic_struct]
pub trait IState {
    /// Seconds spent in the current state.
    #[property]
    fn elapsed(&self) -> f32;
    #[property]
    fn set_elapsed(&mut self, value: f32);

    fn name(&self) -> &'static str;

    /// Advances the state; returns the next state on a transition.
    fn update(&mut self, ctx: &mut StateContext, dt: f32) -> Option<State>;
}
