//! Tests for identity-preserving member serialization with postcard and JSON.

use basicenum::{CreateOptions, EnumBuilder, EnumError, EnumType, ExcType, MemberRef, TypeRegistry, auto, create};
use pretty_assertions::assert_eq;
use serde::de::DeserializeSeed;

fn compat_enum() -> EnumType {
    EnumBuilder::new("CompatEnum")
        .module("tests.serialization")
        .member("v1", auto())
        .member("v2", auto())
        .build()
        .unwrap()
}

#[test]
fn dump_load_returns_same_member() {
    let ty = compat_enum();
    let mut types = TypeRegistry::new();
    types.register(&ty);

    for member in &ty {
        let bytes = member.dump().unwrap();
        let loaded = types.load(&bytes).unwrap();
        assert_eq!(loaded, member);
        assert!(loaded.owner().ptr_eq(&ty));
    }
}

#[test]
fn reduce_names_owner_and_member() {
    let ty = compat_enum();
    assert_eq!(
        ty.get("v2").unwrap().reduce(),
        MemberRef {
            module: Some("tests.serialization".to_owned()),
            qualname: "CompatEnum".to_owned(),
            name: "v2".to_owned(),
        }
    );
}

#[test]
fn json_round_trip_through_seed() {
    let ty = create("Animal", "ANT BEE", CreateOptions::new().module("zoo")).unwrap();
    let mut types = TypeRegistry::new();
    types.register(&ty);

    let bee = ty.get("BEE").unwrap();
    let json = serde_json::to_string(&bee).unwrap();
    assert_eq!(json, r#"{"module":"zoo","qualname":"zoo.Animal","name":"BEE"}"#);

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let loaded = types.seed().deserialize(&mut deserializer).unwrap();
    assert_eq!(loaded, bee);
}

#[test]
fn type_without_module() {
    let ty = EnumBuilder::new("Local").member("a", 1).build().unwrap();
    let mut types = TypeRegistry::new();
    types.register(&ty);

    let a = ty.get("a").unwrap();
    assert_eq!(types.load(&a.dump().unwrap()).unwrap(), a);
    assert_eq!(types.resolve(None, "Local").unwrap(), ty);
    assert!(types.resolve(Some("other"), "Local").is_err());
}

#[test]
fn unregistered_type_fails() {
    let ty = compat_enum();
    let bytes = ty.get("v1").unwrap().dump().unwrap();
    let err = TypeRegistry::new().load(&bytes).unwrap_err();
    assert!(matches!(err, EnumError::UnknownType { .. }));
    assert_eq!(err.exc_type(), ExcType::AttributeError);
}

#[test]
fn missing_member_fails_with_key_error() {
    let old = EnumBuilder::new("Enum").member("gone", 1).build().unwrap();
    let bytes = old.get("gone").unwrap().dump().unwrap();

    let new = EnumBuilder::new("Enum").member("kept", 1).build().unwrap();
    let mut types = TypeRegistry::new();
    types.register(&new);
    let err = types.load(&bytes).unwrap_err();
    assert_eq!(err.to_string(), "KeyError: 'gone'");
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let types = TypeRegistry::new();
    let err = types.load(&[0xff, 0xff, 0xff]).unwrap_err();
    assert!(matches!(err, EnumError::Codec(_)));
    assert_eq!(err.exc_type(), ExcType::ValueError);
}

#[test]
fn json_seed_reports_unknown_type() {
    let types = TypeRegistry::new();
    let mut deserializer = serde_json::Deserializer::from_str(r#"{"module":null,"qualname":"Nope","name":"A"}"#);
    let err = types.seed().deserialize(&mut deserializer).unwrap_err();
    assert!(err.to_string().contains("Can't get attribute 'Nope'"));
}
