use super::{IState, Idle, State, StateContext};

/// Heading for the context target at a fixed speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Moving {
    pub elapsed: f32,
    pub speed: f32,
}

impl Moving {
    pub fn new(speed: f32) -> Self {
        Self {
            elapsed: 0.0,
            speed,
        }
    }
}

impl IState for Moving {
    fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn set_elapsed(&mut self, value: f32) {
        self.elapsed = value;
    }

    fn name(&self) -> &'static str {
        "moving"
    }

    fn update(&mut self, ctx: &mut StateContext, dt: f32) -> Option<State> {
        let remaining = ctx.target - ctx.position;
        let step = self.speed * dt;
        if step < remaining.abs() {
            ctx.position += step.copysign(remaining);
            return None;
        }
        // Arrived: turn around and rest.
        ctx.position = ctx.target;
        ctx.target = -ctx.target;
        Some(Idle::new(ctx.rest).into())
    }
}

include!(concat!(env!("OUT_DIR"), "/polystruct/states__moving.rs"));
