//! Tests for construction tracing.

use basicenum::{
    EnumBuilder, NoopTracer, Object, RecordingTracer, StderrTracer, TraceEvent, ValueGenerator, ValueOrigin, auto,
};
use pretty_assertions::assert_eq;

#[test]
fn records_every_step_in_order() {
    let mut tracer = RecordingTracer::new();
    EnumBuilder::new("Color")
        .generate_next_value(ValueGenerator::lowercase_name())
        .member("RED", "red")
        .member("_ignore_", 0)
        .member("GREEN", auto())
        .unique(true)
        .build_traced(&mut tracer)
        .unwrap();

    assert_eq!(
        tracer.into_events(),
        vec![
            TraceEvent::TypeStart {
                name: "Color".to_owned(),
                base_count: 0,
            },
            TraceEvent::Member {
                name: "RED".to_owned(),
                value: Object::from("red"),
                origin: ValueOrigin::Explicit,
                index: 0,
            },
            TraceEvent::ClassAttribute {
                name: "_ignore_".to_owned(),
            },
            TraceEvent::GeneratorCall {
                name: "GREEN".to_owned(),
                start: 1,
                index: 1,
                last_values: vec![Object::from("red")],
            },
            TraceEvent::Member {
                name: "GREEN".to_owned(),
                value: Object::from("green"),
                origin: ValueOrigin::Generated,
                index: 1,
            },
            TraceEvent::TypeComplete {
                name: "Color".to_owned(),
                member_count: 2,
            },
            TraceEvent::UniqueCheck {
                name: "Color".to_owned(),
                duplicate: None,
            },
        ]
    );
}

#[test]
fn auto_increment_origin() {
    let mut tracer = RecordingTracer::new();
    EnumBuilder::new("E")
        .member("a", auto())
        .member("b", 7)
        .member("c", auto())
        .build_traced(&mut tracer)
        .unwrap();
    let origins: Vec<_> = tracer
        .events()
        .iter()
        .filter_map(|event| match event {
            TraceEvent::Member { origin, value, .. } => Some((*origin, value.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        origins,
        vec![
            (ValueOrigin::AutoIncrement, Object::Int(1)),
            (ValueOrigin::Explicit, Object::Int(7)),
            (ValueOrigin::AutoIncrement, Object::Int(8)),
        ]
    );
    assert_eq!(tracer.member_names(), ["a", "b", "c"]);
}

#[test]
fn failed_unique_check_is_recorded() {
    let mut tracer = RecordingTracer::new();
    let result = EnumBuilder::new("E")
        .member("a", 1)
        .member("b", 1)
        .unique(true)
        .build_traced(&mut tracer);
    assert!(result.is_err());
    assert_eq!(
        tracer.events().last(),
        Some(&TraceEvent::UniqueCheck {
            name: "E".to_owned(),
            duplicate: Some(Object::Int(1)),
        })
    );
}

#[test]
fn hook_failure_stops_before_completion() {
    let mut tracer = RecordingTracer::new();
    let hook = ValueGenerator::new(|_, _, _, _| Err(basicenum::HookError::new(basicenum::ExcType::ValueError)));
    let result = EnumBuilder::new("E")
        .generate_next_value(hook)
        .member("a", auto())
        .build_traced(&mut tracer);
    assert!(result.is_err());
    assert!(matches!(tracer.events().last(), Some(TraceEvent::GeneratorCall { .. })));
    assert!(
        !tracer
            .events()
            .iter()
            .any(|event| matches!(event, TraceEvent::TypeComplete { .. }))
    );
}

#[test]
fn other_tracers_build_the_same_type() {
    let build = || EnumBuilder::new("E").member("a", auto()).member("b", "x");
    let quiet = build().build_traced(&mut NoopTracer).unwrap();
    let loud = build().build_traced(&mut StderrTracer::new()).unwrap();
    let quiet_values: Vec<_> = quiet.values().cloned().collect();
    let loud_values: Vec<_> = loud.values().cloned().collect();
    assert_eq!(quiet_values, loud_values);
    assert_eq!(ValueOrigin::AutoIncrement.to_string(), "auto_increment");
}
