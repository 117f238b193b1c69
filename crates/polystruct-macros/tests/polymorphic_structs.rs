//! Integration tests for the attribute macros.
//!
//! Each module below is expanded by `#[polymorphic_structs]`; the tests then
//! drive the generated merged types the same way user code would.

use polystruct::prelude::*;

#[polymorphic_structs]
mod fields {
    #[polymorphic_struct]
    pub trait IFieldTestStruct {
        fn foo(&self) -> i32;
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct FieldTestStructA {
        pub field: i32,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct FieldTestStructB {
        pub field: i32,
        pub field2: i32,
    }

    impl IFieldTestStruct for FieldTestStructA {
        fn foo(&self) -> i32 {
            self.field
        }
    }

    impl IFieldTestStruct for FieldTestStructB {
        fn foo(&self) -> i32 {
            self.field + self.field2
        }
    }
}

#[polymorphic_structs]
mod simple {
    #[polymorphic_struct]
    pub trait IInterfacesStruct {
        fn foo(&self) -> i32;
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    pub struct InterfacesStructA;

    impl IInterfacesStruct for InterfacesStructA {
        fn foo(&self) -> i32 {
            42
        }
    }
}

#[polymorphic_structs]
mod params {
    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    pub struct MethodParamTestStruct {
        pub field: i32,
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    pub struct MyInnerStruct {
        pub field: i32,
    }

    #[polymorphic_struct]
    pub trait IMethodParametersStruct {
        fn foo1(&self);
        fn foo2(&self) -> i32;
        fn foo3(&self, a: i32) -> i32;
        fn foo4(
            &mut self,
            a: &mut MyInnerStruct,
            b: &MethodParamTestStruct,
            #[out] c: &mut MethodParamTestStruct,
        );
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct MethodParametersStructA;

    impl IMethodParametersStruct for MethodParametersStructA {
        fn foo1(&self) {}

        fn foo2(&self) -> i32 {
            1
        }

        fn foo3(&self, a: i32) -> i32 {
            a
        }

        fn foo4(
            &mut self,
            a: &mut MyInnerStruct,
            b: &MethodParamTestStruct,
            c: &mut MethodParamTestStruct,
        ) {
            a.field = b.field;
            *c = MethodParamTestStruct { field: 42 };
        }
    }
}

#[polymorphic_structs]
mod hierarchy {
    pub trait IParentStruct {
        fn foo(&self, a: i32, b: bool) -> i32;
    }

    pub trait IParentStruct2 {
        fn bar(&self) -> i32;
    }

    #[polymorphic_struct]
    pub trait IChildStruct: IParentStruct + IParentStruct2 {}

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct InheritedStruct;

    impl IParentStruct for InheritedStruct {
        fn foo(&self, a: i32, b: bool) -> i32 {
            42 + a * i32::from(b)
        }
    }

    impl IParentStruct2 for InheritedStruct {
        fn bar(&self) -> i32 {
            13
        }
    }

    impl IChildStruct for InheritedStruct {}
}

#[polymorphic_structs]
mod actions {
    pub trait IAction {
        fn act(&self) -> i32;
    }

    #[polymorphic_struct]
    pub trait IMeleeEnemyAction: IAction {}

    #[polymorphic_struct]
    pub trait IRangedEnemyAction: IAction {}

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct MeleeIdleAction;

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct RangedIdleAction;

    impl IAction for MeleeIdleAction {
        fn act(&self) -> i32 {
            1
        }
    }

    impl IMeleeEnemyAction for MeleeIdleAction {}

    impl IAction for RangedIdleAction {
        fn act(&self) -> i32 {
            2
        }
    }

    impl IRangedEnemyAction for RangedIdleAction {}
}

#[polymorphic_structs]
mod properties {
    #[polymorphic_struct]
    pub trait IPropertiesStruct {
        #[property]
        fn prop1(&self) -> i32;
        #[property]
        fn set_prop1(&mut self, value: i32);
        #[property]
        fn prop2(&self) -> i32;
        #[property]
        fn set_prop2(&mut self, value: i32);
        #[property]
        fn product(&self) -> i32;
        #[property]
        fn set_doubled(&mut self, value: i32);
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct PropertiesStructA {
        prop1_backing: i32,
        pub prop2: i32,
    }

    impl IPropertiesStruct for PropertiesStructA {
        fn prop1(&self) -> i32 {
            self.prop1_backing
        }

        fn set_prop1(&mut self, value: i32) {
            self.prop1_backing = value;
        }

        fn prop2(&self) -> i32 {
            self.prop2
        }

        fn set_prop2(&mut self, value: i32) {
            self.prop2 = value;
        }

        fn product(&self) -> i32 {
            self.prop1() * self.prop2
        }

        fn set_doubled(&mut self, value: i32) {
            self.prop1_backing = value * 2;
        }
    }
}

#[polymorphic_structs(derives = "Clone, Debug, PartialEq", type_id_field = "kind")]
mod shapes {
    #[polymorphic_struct]
    pub trait IShape {
        fn area(&self) -> f32;
        fn scale(&mut self, by: f32);
        fn label(&self) -> &'static str;
        fn into_sides(self) -> u32;
        fn sum_with<T: Into<f32>>(&self, extra: T) -> f32;
        /// # Safety
        /// Always safe; exercises unsafe dispatch.
        unsafe fn raw_sides(&self) -> u32;
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Square(pub f32);

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Rect {
        pub w: f32,
        pub h: f32,
        pub scaled: u32,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Point;

    impl IShape for Square {
        fn area(&self) -> f32 {
            self.0 * self.0
        }
        fn scale(&mut self, by: f32) {
            self.0 *= by;
        }
        fn label(&self) -> &'static str {
            "square"
        }
        fn into_sides(self) -> u32 {
            4
        }
        fn sum_with<T: Into<f32>>(&self, extra: T) -> f32 {
            self.area() + extra.into()
        }
        unsafe fn raw_sides(&self) -> u32 {
            4
        }
    }

    impl IShape for Rect {
        fn area(&self) -> f32 {
            self.w * self.h
        }
        fn scale(&mut self, by: f32) {
            self.w *= by;
            self.h *= by;
            self.scaled += 1;
        }
        fn label(&self) -> &'static str {
            "rect"
        }
        fn into_sides(self) -> u32 {
            4
        }
        fn sum_with<T: Into<f32>>(&self, extra: T) -> f32 {
            self.area() + extra.into()
        }
        unsafe fn raw_sides(&self) -> u32 {
            4
        }
    }

    impl IShape for Point {
        fn area(&self) -> f32 {
            0.0
        }
        fn scale(&mut self, _by: f32) {}
        fn label(&self) -> &'static str {
            "point"
        }
        fn into_sides(self) -> u32 {
            0
        }
        fn sum_with<T: Into<f32>>(&self, extra: T) -> f32 {
            extra.into()
        }
        unsafe fn raw_sides(&self) -> u32 {
            0
        }
    }
}

#[polymorphic_structs]
mod naming {
    #[polymorphic_struct]
    pub trait IAccumulator {
        fn add(&mut self, instance: i32) -> i32;
        fn peek(&self, result: i32, merged: i32) -> i32;
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Plain {
        pub total: i32,
    }

    impl IAccumulator for Plain {
        fn add(&mut self, instance: i32) -> i32 {
            self.total += instance;
            self.total
        }
        fn peek(&self, result: i32, merged: i32) -> i32 {
            self.total + result * merged
        }
    }
}

#[test]
fn test_fields_are_merged_and_dispatched() {
    use fields::*;

    let base_a = FieldTestStructA { field: 1 }.to_field_test_struct();
    let base_b = FieldTestStructB { field: 2, field2: 3 }.to_field_test_struct();

    assert_eq!(base_a.current_type_id, Some(FieldTestStructTypeId::FieldTestStructA));
    assert_eq!(base_b.current_type_id, Some(FieldTestStructTypeId::FieldTestStructB));
    assert_eq!(base_a.foo(), 1);
    assert_eq!(base_b.foo(), 5);

    // `field` of both variants shares one slot; `field2` gets its own.
    assert_eq!(base_b.i32_0, 2);
    assert_eq!(base_b.i32_1, 3);
}

#[test]
fn test_round_trip() {
    use fields::*;

    let b = FieldTestStructB { field: 7, field2: -4 };
    let merged: FieldTestStruct = b.clone().into();
    assert_eq!(FieldTestStructB::from(&merged), b);
    assert_eq!(FieldTestStructB::from_field_test_struct(&b.to_field_test_struct()), b);

    let mut reused = FieldTestStructA { field: 9 }.to_field_test_struct();
    b.write_into_field_test_struct(&mut reused);
    assert_eq!(reused, merged);
}

#[test]
fn test_simple_interface() {
    use simple::*;

    fn call_through_interface<T: IInterfacesStruct>(obj: T) -> i32 {
        obj.foo()
    }

    let my_struct = InterfacesStructA;
    assert_eq!(my_struct.foo(), 42, "Direct Call");
    assert_eq!(my_struct.to_interfaces_struct().foo(), 42, "Polymorphic Call");
    assert_eq!(call_through_interface(my_struct), 42);
    assert_eq!(call_through_interface(my_struct.to_interfaces_struct()), 42);
}

#[test]
fn test_method_parameters() {
    use params::*;

    let mut my_struct = MethodParametersStructA.to_method_parameters_struct();
    my_struct.foo1();
    assert_eq!(my_struct.foo2(), 1);
    assert_eq!(my_struct.foo3(5), 5);

    let mut inner = MyInnerStruct { field: 5 };
    let mut out = MethodParamTestStruct::default();
    my_struct.foo4(&mut inner, &MethodParamTestStruct { field: 43 }, &mut out);
    assert_eq!(inner.field, 43, "ref works");
    assert_eq!(out.field, 42, "out works");
}

#[test]
fn test_default_branch_is_total() {
    use params::*;

    let mut unknown = MethodParametersStruct::default();
    assert_eq!(unknown.current_type_id, None);

    unknown.foo1();
    assert_eq!(unknown.foo2(), 0);
    assert_eq!(unknown.foo3(9), 0);

    let mut inner = MyInnerStruct { field: 5 };
    let mut out = MethodParamTestStruct { field: 7 };
    unknown.foo4(&mut inner, &MethodParamTestStruct { field: 43 }, &mut out);
    assert_eq!(inner.field, 5);
    assert_eq!(out, MethodParamTestStruct::default());
}

#[test]
fn test_members_from_parent_interfaces() {
    use hierarchy::*;

    let child = InheritedStruct.to_child_struct();
    assert_eq!(child.bar(), 13);
    assert_eq!(child.foo(1, false), 42);
    assert_eq!(child.foo(1, true), 43);
}

#[test]
fn test_hierarchies_share_common_parent() {
    use actions::*;

    fn action_common_code<T: IAction>(action: T) -> i32 {
        action.act()
    }

    assert_eq!(action_common_code(MeleeIdleAction.to_melee_enemy_action()), 1);
    assert_eq!(action_common_code(RangedIdleAction.to_ranged_enemy_action()), 2);
}

#[test]
fn test_properties() {
    use properties::*;

    let mut props = PropertiesStructA::default().to_properties_struct();
    assert_eq!(props.prop1(), 0, "Read default value");
    props.set_prop1(12);
    assert_eq!(props.prop1(), 12, "Read value that is set");
    props.set_prop2(10);
    assert_eq!(props.prop2(), 10, "Read value that is set");
    assert_eq!(props.product(), 120, "Read get-only property");
    props.set_doubled(21);
    assert_eq!(props.prop1(), 42, "Access mutated value");
}

#[test]
fn test_dispatch_matches_direct_calls() {
    use shapes::*;

    let variants: Vec<Shape> = vec![
        Square(2.0).into(),
        Rect { w: 2.0, h: 3.0, scaled: 0 }.into(),
        Point.into(),
    ];
    let expected_area = [4.0, 6.0, 0.0];
    let expected_label = ["square", "rect", "point"];

    for ((shape, area), label) in variants.iter().zip(expected_area).zip(expected_label) {
        assert_eq!(shape.area(), area);
        assert_eq!(shape.label(), label);
        assert_eq!(shape.sum_with(1.0_f32), area + 1.0);
        assert_eq!(unsafe { shape.raw_sides() }, if label == "point" { 0 } else { 4 });
        assert_eq!(shape.clone().into_sides(), if label == "point" { 0 } else { 4 });
    }

    // Mutations made through the merged value land in its slots.
    let mut direct = Rect { w: 1.0, h: 2.0, scaled: 0 };
    let mut merged = direct.to_shape();
    direct.scale(3.0);
    merged.scale(3.0);
    assert_eq!(Rect::from_shape(&merged), direct);
    assert_eq!(merged.kind, Some(ShapeTypeId::Rect));
}

#[test]
fn test_tuple_and_unit_variants() {
    use shapes::*;

    let square = Square(1.5).to_shape();
    assert_eq!(Square::from_shape(&square), Square(1.5));

    let point: Shape = Point.into();
    assert_eq!(point.kind, Some(ShapeTypeId::Point));
    assert_eq!(Point::from(&point), Point);
}

#[test]
fn test_parameters_named_like_arm_locals_are_forwarded() {
    use naming::*;

    let mut acc = Plain { total: 1 }.to_accumulator();
    assert_eq!(acc.add(4), 5);
    assert_eq!(acc.add(10), 15);
    assert_eq!(acc.peek(2, 3), 21);
    assert_eq!(Plain::from(&acc), Plain { total: 15 });
}

#[test]
fn test_ui_pass() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/pass/*.rs");
}
