use polystruct::prelude::*;

#[polymorphic_structs(serializable = false, emit_from_impls = false)]
mod states {
    #[polymorphic_struct]
    pub trait IState {
        fn tick(&mut self, dt: f32) -> bool;
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Idle {
        pub waited: f32,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Moving {
        pub distance: f32,
        pub speed: f32,
    }

    impl IState for Idle {
        fn tick(&mut self, dt: f32) -> bool {
            self.waited += dt;
            self.waited > 1.0
        }
    }

    impl IState for Moving {
        fn tick(&mut self, dt: f32) -> bool {
            self.distance += self.speed * dt;
            false
        }
    }
}

use states::{IState, Idle, Moving, State};

fn main() {
    let mut all: Vec<State> = vec![
        Idle { waited: 0.0 }.to_state(),
        Moving { distance: 0.0, speed: 2.0 }.to_state(),
    ];
    for state in &mut all {
        state.tick(0.5);
    }
    assert_eq!(Moving::from_state(&all[1]).distance, 1.0);
}
