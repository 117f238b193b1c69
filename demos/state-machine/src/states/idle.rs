use super::{IState, Moving, State, StateContext};

/// Waiting in place until the rest period is over.
#[derive(Debug, Clone, PartialEq)]
pub struct Idle {
    pub elapsed: f32,
    pub delay: f32,
}

impl Idle {
    pub fn new(delay: f32) -> Self {
        Self { elapsed: 0.0, delay }
    }
}

impl IState for Idle {
    fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn set_elapsed(&mut self, value: f32) {
        self.elapsed = value;
    }

    fn name(&self) -> &'static str {
        "idle"
    }

    fn update(&mut self, ctx: &mut StateContext, _dt: f32) -> Option<State> {
        (self.elapsed >= self.delay).then(|| Moving::new(ctx.speed).into())
    }
}

include!(concat!(env!("OUT_DIR"), "/polystruct/states__idle.rs"));
