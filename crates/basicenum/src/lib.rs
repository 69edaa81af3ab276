#![doc = include_str!("../../../README.md")]

mod builder;
mod declare;
mod enum_type;
mod exception;
mod functional;
mod member;
mod object;
pub mod py_hash;
mod registry;
pub mod tracer;
mod unique;

pub use crate::{
    builder::EnumBuilder,
    declare::{Declared, ValueGenerator, auto},
    enum_type::{BaseType, EnumType, Members, Mixin},
    exception::{EnumError, EnumResult, ExcType, HookError},
    functional::{CreateOptions, MemberSpec, create},
    member::{Member, MemberRef},
    object::Object,
    registry::{MemberSeed, TypeRegistry},
    tracer::{ConstructionTracer, NoopTracer, RecordingTracer, StderrTracer, TraceEvent, ValueOrigin},
    unique::unique,
};
