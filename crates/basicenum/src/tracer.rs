//! Construction tracing infrastructure.
//!
//! The type constructor reports every step it takes to a [`ConstructionTracer`].
//! The constructor is generic over the tracer, so with [`NoopTracer`] every hook
//! is inlined away and `EnumBuilder::build` pays nothing for it.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (default for `build()`) |
//! | [`StderrTracer`] | Human-readable construction log on stderr |
//! | [`RecordingTracer`] | Full event recording for tests and post-mortem inspection |
//!
//! ```
//! use basicenum::{EnumBuilder, RecordingTracer, TraceEvent, auto};
//!
//! let mut tracer = RecordingTracer::new();
//! EnumBuilder::new("Color").member("RED", auto()).build_traced(&mut tracer).unwrap();
//! assert!(matches!(tracer.events().last(), Some(TraceEvent::TypeComplete { member_count: 1, .. })));
//! ```

use crate::object::Object;

/// Where a member's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ValueOrigin {
    /// Written literally in the declaration.
    Explicit,
    /// Sequential value assigned to an auto marker.
    AutoIncrement,
    /// Returned by the type's value generation hook.
    Generated,
}

/// Event captured by [`RecordingTracer`].
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Construction of a type started.
    TypeStart {
        /// Type name.
        name: String,
        /// Number of declared bases.
        base_count: usize,
    },
    /// An underscore-prefixed attribute was kept as a plain class attribute.
    ClassAttribute {
        /// Attribute name.
        name: String,
    },
    /// The generation hook is about to be called.
    GeneratorCall {
        /// Member name passed to the hook.
        name: String,
        /// Start value passed to the hook.
        start: i64,
        /// Declaration index passed to the hook.
        index: usize,
        /// Values of the members declared so far.
        last_values: Vec<Object>,
    },
    /// A member was added to the registry.
    Member {
        /// Member name.
        name: String,
        /// Resolved member value.
        value: Object,
        /// How the value was obtained.
        origin: ValueOrigin,
        /// Declaration index of the member.
        index: usize,
    },
    /// Construction finished.
    TypeComplete {
        /// Type name.
        name: String,
        /// Number of members in the registry.
        member_count: usize,
    },
    /// The uniqueness guard ran.
    UniqueCheck {
        /// Type name.
        name: String,
        /// First repeated value, if any.
        duplicate: Option<Object>,
    },
}

/// Trait for construction tracing.
///
/// Every hook has an empty default body, so implementations only override the
/// events they care about.
pub trait ConstructionTracer: std::fmt::Debug {
    /// Called before the namespace is walked.
    #[inline(always)]
    fn on_type_start(&mut self, _name: &str, _base_count: usize) {}

    /// Called for each underscore-prefixed attribute kept off the registry.
    #[inline(always)]
    fn on_class_attribute(&mut self, _name: &str) {}

    /// Called right before the generation hook runs for an auto-marked member.
    #[inline(always)]
    fn on_generator_call(&mut self, _name: &str, _start: i64, _index: usize, _last_values: &[Object]) {}

    /// Called once a member's value is resolved and it joins the registry.
    #[inline(always)]
    fn on_member(&mut self, _name: &str, _value: &Object, _origin: ValueOrigin, _index: usize) {}

    /// Called after the registry has been installed on the new type.
    #[inline(always)]
    fn on_type_complete(&mut self, _name: &str, _member_count: usize) {}

    /// Called after the uniqueness guard scanned a type.
    #[inline(always)]
    fn on_unique_check(&mut self, _name: &str, _duplicate: Option<&Object>) {}
}

// ============================================================================
// NoopTracer
// ============================================================================

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl ConstructionTracer for NoopTracer {}

// ============================================================================
// StderrTracer
// ============================================================================

/// Tracer that prints a construction log to stderr.
///
/// Output format:
/// ```text
/// enum Color (bases=0)
///   [0] RED = 'red' (explicit)
///   [1] GREEN -> hook(start=1, last_values=1)
///   [1] GREEN = 'green' (generated)
///   _ignore_ (class attribute)
/// enum Color complete: 2 members
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrTracer;

impl StderrTracer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstructionTracer for StderrTracer {
    fn on_type_start(&mut self, name: &str, base_count: usize) {
        eprintln!("enum {name} (bases={base_count})");
    }

    fn on_class_attribute(&mut self, name: &str) {
        eprintln!("  {name} (class attribute)");
    }

    fn on_generator_call(&mut self, name: &str, start: i64, index: usize, last_values: &[Object]) {
        eprintln!(
            "  [{index}] {name} -> hook(start={start}, last_values={})",
            last_values.len()
        );
    }

    fn on_member(&mut self, name: &str, value: &Object, origin: ValueOrigin, index: usize) {
        eprintln!("  [{index}] {name} = {} ({origin})", value.py_repr());
    }

    fn on_type_complete(&mut self, name: &str, member_count: usize) {
        eprintln!("enum {name} complete: {member_count} members");
    }

    fn on_unique_check(&mut self, name: &str, duplicate: Option<&Object>) {
        match duplicate {
            Some(value) => eprintln!("enum {name} unique check: reused {}", value.py_repr()),
            None => eprintln!("enum {name} unique check: ok"),
        }
    }
}

// ============================================================================
// RecordingTracer
// ============================================================================

/// Tracer that records every event in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in the order they happened.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Consumes the tracer and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Returns the names of members in the order they were added.
    #[must_use]
    pub fn member_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraceEvent::Member { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ConstructionTracer for RecordingTracer {
    fn on_type_start(&mut self, name: &str, base_count: usize) {
        self.events.push(TraceEvent::TypeStart {
            name: name.to_owned(),
            base_count,
        });
    }

    fn on_class_attribute(&mut self, name: &str) {
        self.events.push(TraceEvent::ClassAttribute { name: name.to_owned() });
    }

    fn on_generator_call(&mut self, name: &str, start: i64, index: usize, last_values: &[Object]) {
        self.events.push(TraceEvent::GeneratorCall {
            name: name.to_owned(),
            start,
            index,
            last_values: last_values.to_vec(),
        });
    }

    fn on_member(&mut self, name: &str, value: &Object, origin: ValueOrigin, index: usize) {
        self.events.push(TraceEvent::Member {
            name: name.to_owned(),
            value: value.clone(),
            origin,
            index,
        });
    }

    fn on_type_complete(&mut self, name: &str, member_count: usize) {
        self.events.push(TraceEvent::TypeComplete {
            name: name.to_owned(),
            member_count,
        });
    }

    fn on_unique_check(&mut self, name: &str, duplicate: Option<&Object>) {
        self.events.push(TraceEvent::UniqueCheck {
            name: name.to_owned(),
            duplicate: duplicate.cloned(),
        });
    }
}
