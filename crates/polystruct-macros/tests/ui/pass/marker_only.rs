use polystruct::polymorphic_struct;

#[polymorphic_struct("reserved payload")]
pub trait IAction {
    #[property]
    fn cost(&self) -> u32;
    fn run(&mut self, #[out] spent: &mut u32);
}

struct Jump;

impl IAction for Jump {
    fn cost(&self) -> u32 {
        3
    }

    fn run(&mut self, spent: &mut u32) {
        *spent = self.cost();
    }
}

fn main() {
    let mut spent = 0;
    Jump.run(&mut spent);
    assert_eq!(spent, 3);
}
