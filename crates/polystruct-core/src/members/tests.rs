//! Tests for member collection.

use super::*;
use crate::scanner::{CompilationUnit, DeclarationScanner};

fn scan(source: &str) -> ScanResult {
    let unit = CompilationUnit::parse("members.rs", ModulePath::root(), source).unwrap();
    DeclarationScanner::new("polymorphic_struct").scan(&[unit])
}

fn collect(source: &str) -> Result<MemberSet> {
    let scan = scan(source);
    let interface = scan.interfaces[0].clone();
    MemberCollector::new(&scan).collect(&interface)
}

fn method<'a>(set: &'a MemberSet, name: &str) -> &'a MethodMember {
    set.methods().find(|m| m.name == name).unwrap()
}

#[test]
fn test_collects_methods_in_order() {
    let set = collect(
        r#"
        #[polymorphic_struct]
        trait IState {
            fn update(&mut self, dt: f32);
            fn score(&self) -> i32;
            fn finish(self) -> u8;
        }
        "#,
    )
    .unwrap();

    let names: Vec<_> = set.iter().map(Member::name).collect();
    assert_eq!(names, ["update", "score", "finish"]);
    assert_eq!(method(&set, "update").receiver, ReceiverKind::RefMut);
    assert!(!method(&set, "update").returns_value());
    assert_eq!(method(&set, "score").receiver, ReceiverKind::Ref);
    assert_eq!(method(&set, "finish").receiver, ReceiverKind::Value);
    assert_eq!(method(&set, "finish").receiver_text, "self");
}

#[test]
fn test_parameter_modes() {
    let set = collect(
        r#"
        #[polymorphic_struct]
        trait IParams {
            fn call(&mut self, a: i32, b: &i32, c: &mut i32, #[out] d: &mut i32, _: u8);
        }
        "#,
    )
    .unwrap();

    let call = method(&set, "call");
    let modes: Vec<_> = call.params.iter().map(|p| p.mode).collect();
    assert_eq!(
        modes,
        [
            ParamMode::Value,
            ParamMode::Shared,
            ParamMode::Exclusive,
            ParamMode::Out,
            ParamMode::Value
        ]
    );
    assert_eq!(call.params[4].name, "arg4");
    assert_eq!(call.out_params().count(), 1);
}

#[test]
fn test_out_requires_mutable_reference() {
    let err = collect(
        r#"
        #[polymorphic_struct]
        trait IBad {
            fn call(&self, #[out] d: i32);
        }
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, GeneratorError::UnsupportedMember { .. }));
}

#[test]
fn test_properties_fold_accessors() {
    let set = collect(
        r#"
        #[polymorphic_struct]
        trait IProps {
            #[property]
            fn value(&self) -> i32;
            fn tick(&mut self);
            #[property]
            fn set_value(&mut self, value: i32);
            #[property]
            fn read_only(&self) -> f32;
        }
        "#,
    )
    .unwrap();

    let names: Vec<_> = set.iter().map(Member::name).collect();
    assert_eq!(names, ["value", "tick", "read_only"]);

    let props: Vec<_> = set.properties().collect();
    assert!(props[0].has_get() && props[0].has_set());
    assert!(props[1].has_get() && !props[1].has_set());
    assert_eq!(set.methods().count(), 1);
}

#[test]
fn test_property_type_mismatch() {
    let err = collect(
        r#"
        #[polymorphic_struct]
        trait IProps {
            #[property]
            fn value(&self) -> i32;
            #[property]
            fn set_value(&mut self, value: i64);
        }
        "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("disagree"));
}

#[test]
fn test_parents_depth_first_once() {
    let set = collect(
        r#"
        #[polymorphic_struct]
        trait IChild: IA + IB + Copy {
            fn child(&self);
        }
        trait IA: IBase { fn a(&self); }
        trait IB: IBase { fn b(&self); }
        trait IBase { fn base(&self); }
        "#,
    )
    .unwrap();

    let traits: Vec<_> = set.traits.iter().map(|t| t.trait_name.as_str()).collect();
    assert_eq!(traits, ["IChild", "IA", "IBase", "IB"]);
    assert_eq!(set.len(), 4);
}

#[test]
fn test_rejects_unsupported_shapes() {
    let cases = [
        "fn make() -> i32;",
        "fn boxed(self: Box<Self>);",
        "async fn run(&self);",
        "fn same(&self) -> Self;",
        "fn name(&self) -> &str;",
        "fn other(&self, other: &Self);",
        "type Output;",
        "const ID: u32;",
    ];
    for case in cases {
        let source = format!("#[polymorphic_struct] trait IBad {{ {} }}", case);
        assert!(collect(&source).is_err(), "accepted `{}`", case);
    }
}

#[test]
fn test_static_borrows_allowed() {
    let set = collect(
        r#"
        #[polymorphic_struct]
        trait INamed {
            fn label(&self) -> &'static str;
            unsafe fn raw(&self) -> u32;
        }
        "#,
    )
    .unwrap();
    assert!(method(&set, "label").output.is_some());
    assert!(method(&set, "raw").is_unsafe);
}

#[test]
fn test_generic_trait_rejected() {
    let err = collect("#[polymorphic_struct] trait IGen<T> { fn get(&self) -> T; }").unwrap_err();
    assert!(matches!(err, GeneratorError::UnsupportedInterface { .. }));
}
