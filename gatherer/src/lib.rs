//! # Data Gatherer Core
//!
//! A fire-and-forget telemetry engine for experiment sessions: configured
//! *bindings* reference readable members on registered source objects; every
//! export tick (periodic timer or discrete input trigger) samples them into
//! one CSV row and dispatches it to a local file and/or an HTTP endpoint.
//!
//! Member access is registration-based rather than reflective: components
//! implement [`source::Exportable`] and describe their members, including
//! header replacements and one-time advisory notices, as plain metadata.
//!
//! All sampling-path failures degrade: an unresolvable binding exports an
//! empty column, a failed HTTP post is logged and dropped, and the session
//! keeps running.

#[macro_use]
extern crate tracing;

pub mod binding;
pub mod columns;
pub mod csv;
pub mod gatherer;
pub mod overlay;
pub mod sinks;
pub mod source;
pub mod triggers;
pub mod value;

pub use binding::{
    Binding,
    BindingConfig,
    ComponentSelector,
    ResolvedMember,
    OBJECT_SELECTOR,
};
pub use gatherer::{
    DataGatherer,
    ExportMode,
    GathererSettings,
};
pub use source::{
    Exportable,
    MemberDescriptor,
    ObjectRegistry,
    SourceObject,
};
pub use triggers::{
    ExportTrigger,
    InputReadout,
};
pub use value::{
    ExportValue,
    ValueKind,
};
