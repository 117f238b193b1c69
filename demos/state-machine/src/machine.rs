use tracing::{debug, trace};

use crate::states::{IState, Idle, State, StateContext};

/// A population of agents updated in lockstep.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    states: Vec<State>,
    contexts: Vec<StateContext>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an idle agent at `position` that will head for `target`.
    pub fn spawn(&mut self, position: f32, target: f32, speed: f32, rest: f32) -> usize {
        self.states.push(Idle::new(rest).into());
        self.contexts.push(StateContext {
            position,
            target,
            rest,
            speed,
            transitions: 0,
        });
        self.states.len() - 1
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, agent: usize) -> Option<&State> {
        self.states.get(agent)
    }

    pub fn context(&self, agent: usize) -> Option<&StateContext> {
        self.contexts.get(agent)
    }

    /// Advances every agent by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        for (agent, (state, ctx)) in self.states.iter_mut().zip(&mut self.contexts).enumerate() {
            state.set_elapsed(state.elapsed() + dt);
            if let Some(next) = state.update(ctx, dt) {
                debug!(agent, from = state.name(), to = next.name(), "Transition");
                *state = next;
                ctx.transitions += 1;
            }
            trace!(agent, state = state.name(), position = ctx.position);
        }
    }

    /// Number of agents currently in the state called `name`.
    pub fn count(&self, name: &str) -> usize {
        self.states.iter().filter(|s| s.name() == name).count()
    }
}
