//! Tests for the uniqueness guard.

use basicenum::{CreateOptions, EnumBuilder, EnumError, ExcType, Object, auto, create, unique};
use pretty_assertions::assert_eq;

#[test]
fn duplicate_values_rejected() {
    let ty = EnumBuilder::new("Enum")
        .member("answer", 42)
        .member("answer_again", 42)
        .build()
        .unwrap();
    let err = unique(&ty).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::ValueError);
    assert_eq!(err.to_string(), "ValueError: <class 'Enum'> enum reused 42");
}

#[test]
fn reports_first_repeated_value() {
    let ty = EnumBuilder::new("Enum")
        .member("a", "x")
        .member("b", "y")
        .member("c", "y")
        .member("d", "x")
        .build()
        .unwrap();
    let Err(EnumError::DuplicateValue { value, .. }) = unique(&ty) else {
        panic!("expected duplicate value error");
    };
    assert_eq!(value, Object::from("y"));
}

#[test]
fn unique_values_pass() {
    let ty = EnumBuilder::new("Enum")
        .member("a", auto())
        .member("b", auto())
        .member("c", "1")
        .build()
        .unwrap();
    let same = unique(&ty).unwrap();
    assert_eq!(same, ty);
}

#[test]
fn auto_collision_with_explicit_value() {
    let ty = EnumBuilder::new("Enum")
        .member("a", 2)
        .member("b", 1)
        .member("c", auto())
        .build()
        .unwrap();
    let err = unique(&ty).unwrap_err();
    assert_eq!(err.to_string(), "ValueError: <class 'Enum'> enum reused 2");
}

#[test]
fn repr_includes_module() {
    let ty = create("Dup", vec![("a", 1), ("b", 1)], CreateOptions::new().module("pkg")).unwrap();
    let err = unique(&ty).unwrap_err();
    assert_eq!(err.to_string(), "ValueError: <class 'pkg.pkg.Dup'> enum reused 1");
}

#[test]
fn builder_flag_runs_guard() {
    let err = EnumBuilder::new("Enum")
        .member("a", 1)
        .member("b", 1.0)
        .unique(true)
        .build()
        .unwrap_err();
    assert!(matches!(err, EnumError::DuplicateValue { .. }));

    let ok = EnumBuilder::new("Enum").member("a", 1).member("b", 2).unique(true).build();
    assert!(ok.is_ok());
}

#[test]
fn unhashable_values_compare_by_equality() {
    let list = Object::List(vec![Object::Int(1)]);
    let ty = EnumBuilder::new("Enum")
        .member("a", list.clone())
        .member("b", list)
        .build()
        .unwrap();
    let err = unique(&ty).unwrap_err();
    assert_eq!(err.to_string(), "ValueError: <class 'Enum'> enum reused [1]");
}

#[test]
fn separate_nan_values_pass() {
    let ty = EnumBuilder::new("Enum")
        .member("a", f64::NAN)
        .member("b", f64::NAN)
        .member("c", 1.0)
        .build()
        .unwrap();
    assert!(unique(&ty).is_ok());

    let err = EnumBuilder::new("Enum")
        .member("a", f64::NAN)
        .member("b", 1)
        .member("c", true)
        .unique(true)
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "ValueError: <class 'Enum'> enum reused True");
}
