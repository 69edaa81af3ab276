//! Tests for class-body style construction: auto values, generation hooks and
//! the resulting registry.

use std::{cell::RefCell, rc::Rc};

use basicenum::{
    BaseType, EnumBuilder, EnumError, ExcType, HookError, Mixin, Object, ValueGenerator, auto, declare_enum,
};
use pretty_assertions::assert_eq;

fn values(builder: EnumBuilder) -> Vec<Object> {
    builder.build().unwrap().values().cloned().collect()
}

#[test]
fn auto_values_count_from_one() {
    let ty = EnumBuilder::new("Enum")
        .member("v1", auto())
        .member("v2", auto())
        .member("v3", auto())
        .build()
        .unwrap();
    for (expected, name) in [(1, "v1"), (2, "v2"), (3, "v3")] {
        let member = ty.member(name).unwrap();
        assert_eq!(member.name(), name);
        assert_eq!(member.value(), &Object::Int(expected));
    }
}

#[test]
fn auto_continues_after_explicit_int() {
    let got = values(EnumBuilder::new("Enum").member("v1", auto()).member("v2", 5).member("v3", auto()));
    assert_eq!(got, vec![Object::Int(1), Object::Int(5), Object::Int(6)]);
}

#[test]
fn auto_ignores_interleaved_str() {
    let got = values(EnumBuilder::new("Enum").member("v1", auto()).member("v2", "5").member("v3", auto()));
    assert_eq!(got, vec![Object::Int(1), Object::from("5"), Object::Int(2)]);
}

#[test]
fn auto_continues_after_bool() {
    let got = values(EnumBuilder::new("Enum").member("v1", true).member("v2", auto()));
    assert_eq!(got, vec![Object::Bool(true), Object::Int(2)]);
}

#[test]
fn auto_promotes_past_i64_max() {
    let got = values(EnumBuilder::new("Enum").member("max", i64::MAX).member("next", auto()));
    assert_eq!(got[1].py_repr(), "9223372036854775808");
}

#[test]
fn auto_generate_hook_on_base_enum() {
    let calls: Rc<RefCell<Vec<(String, i64, usize, Vec<Object>)>>> = Rc::default();
    let recorded = Rc::clone(&calls);
    let hook = ValueGenerator::infallible(move |name, start, index, last_values| {
        recorded
            .borrow_mut()
            .push((name.to_owned(), start, index, last_values.to_vec()));
        Object::from(name)
    });
    let auto_enum = EnumBuilder::new("AutoEnum").generate_next_value(hook).build().unwrap();

    let ty = EnumBuilder::new("Enum")
        .base(&auto_enum)
        .member("A", auto())
        .member("B", "HI")
        .member("C", auto())
        .build()
        .unwrap();

    assert_eq!(ty.get("A").unwrap().value(), &Object::from("A"));
    assert_eq!(ty.get("B").unwrap().value(), &Object::from("HI"));
    assert_eq!(ty.get("C").unwrap().value(), &Object::from("C"));
    assert_eq!(
        *calls.borrow(),
        vec![
            ("A".to_owned(), 1, 0, vec![]),
            ("C".to_owned(), 1, 2, vec![Object::from("A"), Object::from("HI")]),
        ]
    );
}

#[test]
fn hook_serves_every_auto_member() {
    let hook = ValueGenerator::infallible(|_, _, _, _| Object::Int(100));
    let got = values(
        EnumBuilder::new("Enum")
            .generate_next_value(hook)
            .member("a", auto())
            .member("b", 7)
            .member("c", auto()),
    );
    assert_eq!(got, vec![Object::Int(100), Object::Int(7), Object::Int(100)]);
}

#[test]
fn local_hook_beats_inherited_hook() {
    let base = Mixin::with_generator("Upper", ValueGenerator::name_as_value());
    let got = values(
        EnumBuilder::new("Enum")
            .base(base)
            .generate_next_value(ValueGenerator::lowercase_name())
            .member("A", auto()),
    );
    assert_eq!(got, vec![Object::from("a")]);
}

#[test]
fn hook_inherited_through_two_levels() {
    let root = EnumBuilder::new("Root")
        .generate_next_value(ValueGenerator::name_as_value())
        .build()
        .unwrap();
    let middle = EnumBuilder::new("Middle").base(&root).build().unwrap();
    let got = values(EnumBuilder::new("Leaf").base(&middle).member("X", auto()));
    assert_eq!(got, vec![Object::from("X")]);
}

#[test]
fn hook_error_propagates_unchanged() {
    let hook = ValueGenerator::new(|name, _, _, _| Err(HookError::new_msg(ExcType::RuntimeError, format!("no value for {name}"))));
    let err = EnumBuilder::new("Enum")
        .generate_next_value(hook)
        .member("ok", 1)
        .member("bad", auto())
        .build()
        .unwrap_err();
    let EnumError::Hook(hook_err) = &err else {
        panic!("expected hook error, got {err:?}");
    };
    assert_eq!(hook_err, &HookError::new_msg(ExcType::RuntimeError, "no value for bad"));
    assert_eq!(err.exc_type(), ExcType::RuntimeError);
    assert_eq!(err.to_string(), "RuntimeError: no value for bad");
}

#[test]
fn constants_and_mixed_types() {
    let ty = EnumBuilder::new("Enum")
        .members([("RED", "RED"), ("GREEN", "GREEN"), ("BLUE", "BLUE")])
        .build()
        .unwrap();
    for name in ["RED", "GREEN", "BLUE"] {
        assert_eq!(ty.get(name).unwrap().value(), &Object::from(name));
    }

    let got = values(EnumBuilder::new("Enum").member("v1", 1).member("v2", "2"));
    assert_eq!(got, vec![Object::Int(1), Object::from("2")]);
}

#[test]
fn underscore_names_are_class_attributes() {
    let ty = EnumBuilder::new("Enum")
        .member("_ignore_", "x")
        .member("a", auto())
        .member("__dunder__", 3)
        .build()
        .unwrap();
    assert_eq!(ty.len(), 1);
    assert!(ty.member("_ignore_").is_none());
    assert_eq!(ty.attribute("_ignore_"), Some(&Object::from("x")));
    assert_eq!(ty.attribute("__dunder__"), Some(&Object::Int(3)));
    assert_eq!(ty.get("_ignore_").unwrap_err().exc_type(), ExcType::KeyError);
}

#[test]
fn empty_enum() {
    let ty = EnumBuilder::new("Empty").build().unwrap();
    assert!(ty.is_empty());
    assert_eq!(ty.iter().count(), 0);
    assert_eq!(ty.qualname(), "Empty");
    assert_eq!(ty.module(), None);
    assert_eq!(ty.to_string(), "<class 'Empty'>");
}

#[test]
fn names_and_bases() {
    let mixin = Mixin::new("Sub");
    let ty = EnumBuilder::new("a")
        .qualname("c.b.a")
        .module("c.b")
        .base(&mixin)
        .build()
        .unwrap();
    assert_eq!(ty.name(), "a");
    assert_eq!(ty.qualname(), "c.b.a");
    assert_eq!(ty.module(), Some("c.b"));
    assert_eq!(ty.to_string(), "<class 'c.b.c.b.a'>");
    assert_eq!(ty.bases(), &[BaseType::Mixin(mixin.clone())]);
    assert!(ty.is_subclass(&BaseType::from(&mixin)));
    assert!(ty.is_subclass(&BaseType::from(&ty)));
    assert!(!ty.is_subclass(&BaseType::from(Mixin::new("Sub"))));
}

#[test]
fn is_subclass_is_transitive() {
    let root = Mixin::new("Root");
    let middle = EnumBuilder::new("Middle").base(&root).build().unwrap();
    let leaf = EnumBuilder::new("Leaf").base(&middle).build().unwrap();
    assert!(leaf.is_subclass(&BaseType::from(&middle)));
    assert!(leaf.is_subclass(&BaseType::from(&root)));
    assert!(!middle.is_subclass(&BaseType::from(&leaf)));
}

#[test]
fn declare_enum_macro() {
    let named = Mixin::with_generator("Named", ValueGenerator::name_as_value());
    let ty = declare_enum! {
        Shape(named) {
            CIRCLE = auto(),
            SQUARE = 4,
            _hidden_ = (),
        }
    }
    .unwrap();
    assert_eq!(ty.name(), "Shape");
    assert_eq!(ty.get("CIRCLE").unwrap().value(), &Object::from("CIRCLE"));
    assert_eq!(ty.get("SQUARE").unwrap().value(), &Object::Int(4));
    assert_eq!(ty.attribute("_hidden_"), Some(&Object::None));
}
