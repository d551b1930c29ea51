//! The introspection capability consumed by the binding resolver.
//!
//! Instead of runtime reflection, every sampled component implements
//! [`Exportable`]: it lists its readable members as [`MemberDescriptor`]s and
//! serves reads by member name. Header replacements and advisory notices are
//! plain registration metadata on the descriptor.

use crate::value::{
    ExportValue,
    ValueKind,
};

/// Registration metadata for one exportable member of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    pub name: String,
    pub kind: ValueKind,
    /// The member's reader takes the export separator and pre-joins several
    /// logical columns into one string (a multi-column summary member).
    pub takes_separator: bool,
    /// Replacement CSV header column(s) used instead of the binding's
    /// configured column name. More than one entry declares that the member's
    /// value spans that many columns.
    pub header_replacement: Option<Vec<String>>,
    /// One-time advisory surfaced when a binding is (re)connected to this
    /// member.
    pub notice: Option<String>,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            takes_separator: false,
            header_replacement: None,
            notice: None,
        }
    }

    /// Marks the member's reader as taking the export separator.
    pub fn with_separator_arg(mut self) -> Self {
        self.takes_separator = true;
        self
    }

    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_replacement = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Number of CSV columns this member occupies in a row.
    pub fn column_span(&self) -> usize {
        match &self.header_replacement {
            Some(headers) if headers.len() > 1 => headers.len(),
            _ => 1,
        }
    }
}

/// Capability trait for components whose members can be sampled.
///
/// `read` returns `None` for unknown member names; readers must not panic.
/// The `separator` is only meaningful for members registered with
/// [`MemberDescriptor::with_separator_arg`], others are free to ignore it.
pub trait Exportable: Send + Sync {
    /// Human-readable component type name, as used in component selectors.
    fn type_name(&self) -> &str;

    fn members(&self) -> Vec<MemberDescriptor>;

    fn read(&self, member: &str, separator: char) -> Option<ExportValue>;
}

/// Intrinsic member names readable on a [`SourceObject`] itself.
pub const OBJECT_MEMBER_NAME: &str = "name";
pub const OBJECT_MEMBER_ACTIVE: &str = "active";

/// A named object carrying an ordered list of exportable components,
/// mirroring how a scene object carries components in attachment order.
pub struct SourceObject {
    name: String,
    active: bool,
    components: Vec<Box<dyn Exportable>>,
}

impl SourceObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: impl Exportable + 'static) -> Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Components in attachment order.
    pub fn components(&self) -> &[Box<dyn Exportable>] {
        &self.components
    }

    /// Members readable on the object itself (selector `"Game Object"`).
    pub fn object_members(&self) -> Vec<MemberDescriptor> {
        vec![
            MemberDescriptor::new(OBJECT_MEMBER_NAME, ValueKind::Str),
            MemberDescriptor::new(OBJECT_MEMBER_ACTIVE, ValueKind::Bool),
        ]
    }

    pub fn read_object_member(&self, member: &str) -> Option<ExportValue> {
        match member {
            OBJECT_MEMBER_NAME => Some(ExportValue::Str(self.name.clone())),
            OBJECT_MEMBER_ACTIVE => Some(ExportValue::Bool(self.active)),
            _ => None,
        }
    }
}

/// Ordered, name-keyed collection of source objects available for binding.
#[derive(Default)]
pub struct ObjectRegistry {
    objects: Vec<SourceObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object. A duplicate name replaces the earlier entry, with
    /// a warning, so bindings always resolve against one object per name.
    pub fn register(&mut self, object: SourceObject) {
        if let Some(existing) = self.objects.iter_mut().find(|o| o.name == object.name) {
            warn!(name = %object.name, "replacing already-registered source object");
            *existing = object;
        } else {
            self.objects.push(object);
        }
    }

    pub fn get(&self, name: &str) -> Option<&SourceObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn objects(&self) -> &[SourceObject] {
        &self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Probe;

    impl Exportable for Probe {
        fn type_name(&self) -> &str {
            "Probe"
        }

        fn members(&self) -> Vec<MemberDescriptor> {
            vec![MemberDescriptor::new("value", ValueKind::Int)]
        }

        fn read(&self, member: &str, _separator: char) -> Option<ExportValue> {
            (member == "value").then_some(ExportValue::Int(7))
        }
    }

    #[test]
    fn object_serves_intrinsic_members() {
        let object = SourceObject::new("rig");
        assert_eq!(
            object.read_object_member(OBJECT_MEMBER_NAME),
            Some(ExportValue::Str("rig".into()))
        );
        assert_eq!(
            object.read_object_member(OBJECT_MEMBER_ACTIVE),
            Some(ExportValue::Bool(true))
        );
        assert_eq!(object.read_object_member("missing"), None);
    }

    #[test]
    fn registry_replaces_duplicate_names() {
        let mut registry = ObjectRegistry::new();
        registry.register(SourceObject::new("rig").with_component(Probe));
        registry.register(SourceObject::new("rig"));
        assert_eq!(registry.objects().len(), 1);
        assert!(registry.get("rig").unwrap().components().is_empty());
    }

    #[test]
    fn column_span_follows_header_replacement() {
        let single = MemberDescriptor::new("value", ValueKind::Int);
        assert_eq!(single.column_span(), 1);
        let multi = MemberDescriptor::new("summary", ValueKind::Str)
            .with_separator_arg()
            .with_headers(["a", "b", "c"]);
        assert_eq!(multi.column_span(), 3);
    }
}
