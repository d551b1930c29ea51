//! Binding configuration and resolution.
//!
//! A binding names a value source as `(object, component selector, member)`.
//! Resolution walks the registry once per validation and degrades instead of
//! failing hard: an unresolvable binding exports an empty column and logs,
//! the session keeps running.

use crate::{
    csv,
    overlay::HeaderOverlay,
    source::{
        MemberDescriptor,
        ObjectRegistry,
    },
};
use serde::{
    Deserialize,
    Serialize,
};

/// Selector sentinel meaning "the object itself, not a component".
pub const OBJECT_SELECTOR: &str = "Game Object";

/// A parsed component selector.
///
/// The raw form is a component type name, optionally suffixed with `" (N)"`
/// where `N` is a zero-based disambiguation index for objects carrying several
/// components of the same type. The literal `"Game Object"` (or an empty
/// selector) addresses the object itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSelector {
    Object,
    Component { type_name: String, occurrence: usize },
}

impl ComponentSelector {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == OBJECT_SELECTOR {
            return ComponentSelector::Object;
        }
        if let Some((base, suffix)) = raw.rsplit_once(" (") {
            if let Some(digits) = suffix.strip_suffix(')') {
                if let Ok(occurrence) = digits.parse::<usize>() {
                    return ComponentSelector::Component {
                        type_name: base.to_string(),
                        occurrence,
                    };
                }
            }
        }
        ComponentSelector::Component {
            type_name: raw.to_string(),
            occurrence: 0,
        }
    }
}

/// Serializable binding configuration, as it appears in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Name of the registered source object.
    pub object: String,
    /// Component selector; defaults to the object itself.
    #[serde(default = "default_component")]
    pub component: String,
    /// Member name on the selected component or object.
    pub member: String,
    /// Column name used in the header unless the member declares replacements.
    pub column: String,
}

fn default_component() -> String {
    OBJECT_SELECTOR.to_string()
}

/// The concrete member a binding resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMember {
    pub object: String,
    /// Index into the object's component list; `None` for the object itself.
    pub component: Option<usize>,
    pub descriptor: MemberDescriptor,
}

impl ResolvedMember {
    /// Stable identity used to detect member changes across validations.
    pub(crate) fn identity(&self) -> String {
        match self.component {
            Some(index) => format!("{}#{}#{}", self.object, index, self.descriptor.name),
            None => format!("{}##{}", self.object, self.descriptor.name),
        }
    }
}

/// One configured value source, revalidated against the registry and read on
/// every export tick.
pub struct Binding {
    config: BindingConfig,
    selector: ComponentSelector,
    resolved: Option<ResolvedMember>,
    overlay: HeaderOverlay,
    arity_warned: bool,
}

impl Binding {
    pub fn new(config: BindingConfig) -> Self {
        let selector = ComponentSelector::parse(&config.component);
        Self {
            config,
            selector,
            resolved: None,
            overlay: HeaderOverlay::default(),
            arity_warned: false,
        }
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        format!("{}/{}/{}", self.config.object, self.config.component, self.config.member)
    }

    pub fn resolved(&self) -> Option<&ResolvedMember> {
        self.resolved.as_ref()
    }

    /// Resolves the binding against the registry. Idempotent and cheap, so it
    /// may be re-run at any time; returns whether the binding is valid.
    ///
    /// A member change (including becoming unresolved) is reported to the
    /// header overlay, which surfaces registration notices exactly once per
    /// change.
    pub fn validate(&mut self, registry: &ObjectRegistry) -> bool {
        let resolved = self.resolve(registry);
        let description = self.describe();
        self.overlay.observe(&description, resolved.as_ref());
        if resolved != self.resolved {
            self.arity_warned = false;
        }
        self.resolved = resolved;
        self.resolved.is_some()
    }

    fn resolve(&self, registry: &ObjectRegistry) -> Option<ResolvedMember> {
        let object = registry.get(&self.config.object)?;
        match &self.selector {
            ComponentSelector::Object => {
                let descriptor = object
                    .object_members()
                    .into_iter()
                    .find(|m| m.name == self.config.member)?;
                Some(ResolvedMember {
                    object: object.name().to_string(),
                    component: None,
                    descriptor,
                })
            }
            ComponentSelector::Component { type_name, occurrence } => {
                let (index, component) = object
                    .components()
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.type_name() == type_name.as_str())
                    .nth(*occurrence)?;
                let descriptor = component.members().into_iter().find(|m| m.name == self.config.member)?;
                Some(ResolvedMember {
                    object: object.name().to_string(),
                    component: Some(index),
                    descriptor,
                })
            }
        }
    }

    /// Effective header columns: the member's declared replacement headers,
    /// or the configured column name. Unresolved bindings keep their
    /// configured column so header width stays stable.
    pub fn header_columns(&self) -> Vec<String> {
        match self.resolved.as_ref().and_then(|r| r.descriptor.header_replacement.clone()) {
            Some(headers) if !headers.is_empty() => headers,
            _ => vec![self.config.column.clone()],
        }
    }

    /// Number of CSV columns this binding occupies in a row.
    fn column_span(&self) -> usize {
        self.resolved.as_ref().map_or(1, |r| r.descriptor.column_span())
    }

    /// Reads the current value, degrading to empty column(s) (plus an error
    /// log) when the binding is unresolved or the read fails. Multi-column
    /// members degrade to their declared width so the row stays aligned with
    /// the header.
    pub fn read(&mut self, registry: &ObjectRegistry, separator: char) -> String {
        let Some(resolved) = &self.resolved else {
            error!(binding = %self.describe(), "export read on unresolved binding");
            return csv::empty_columns(self.column_span(), separator);
        };

        let value = registry.get(&resolved.object).and_then(|object| match resolved.component {
            None => object.read_object_member(&resolved.descriptor.name),
            Some(index) => object
                .components()
                .get(index)
                .and_then(|c| c.read(&resolved.descriptor.name, separator)),
        });

        match value {
            Some(value) => {
                let text = value.to_string();
                self.check_arity(&text, separator);
                text
            }
            None => {
                error!(binding = %self.describe(), "export read failed");
                csv::empty_columns(self.column_span(), separator)
            }
        }
    }

    /// Warns once per resolved member when a multi-column value's textual
    /// width disagrees with its declared header count.
    fn check_arity(&mut self, text: &str, separator: char) {
        let Some(resolved) = &self.resolved else {
            return;
        };
        let declared = resolved.descriptor.column_span();
        if declared <= 1 || self.arity_warned || text.is_empty() {
            return;
        }
        let actual = text.matches(separator).count() + 1;
        if actual != declared {
            warn!(
                binding = %self.describe(),
                declared,
                actual,
                "multi-column value width does not match declared headers"
            );
            self.arity_warned = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        source::{
            Exportable,
            SourceObject,
        },
        value::{
            ExportValue,
            ValueKind,
        },
    };
    use pretty_assertions::assert_eq;

    struct Counter(i64);

    impl Exportable for Counter {
        fn type_name(&self) -> &str {
            "Counter"
        }

        fn members(&self) -> Vec<MemberDescriptor> {
            vec![MemberDescriptor::new("count", ValueKind::Int)]
        }

        fn read(&self, member: &str, _separator: char) -> Option<ExportValue> {
            (member == "count").then_some(ExportValue::Int(self.0))
        }
    }

    fn registry() -> ObjectRegistry {
        let mut registry = ObjectRegistry::new();
        registry.register(
            SourceObject::new("rig")
                .with_component(Counter(1))
                .with_component(Counter(2)),
        );
        registry
    }

    fn binding(component: &str, member: &str) -> Binding {
        Binding::new(BindingConfig {
            object: "rig".into(),
            component: component.into(),
            member: member.into(),
            column: "col".into(),
        })
    }

    #[test]
    fn selector_parses_occurrence_suffix() {
        assert_eq!(
            ComponentSelector::parse("Counter (1)"),
            ComponentSelector::Component {
                type_name: "Counter".into(),
                occurrence: 1,
            }
        );
        assert_eq!(
            ComponentSelector::parse("Counter"),
            ComponentSelector::Component {
                type_name: "Counter".into(),
                occurrence: 0,
            }
        );
        assert_eq!(ComponentSelector::parse("Game Object"), ComponentSelector::Object);
        assert_eq!(ComponentSelector::parse(""), ComponentSelector::Object);
        // A malformed suffix is treated as part of the type name.
        assert_eq!(
            ComponentSelector::parse("Counter (x)"),
            ComponentSelector::Component {
                type_name: "Counter (x)".into(),
                occurrence: 0,
            }
        );
    }

    #[test]
    fn validate_is_idempotent() {
        let registry = registry();
        let mut binding = binding("Counter (1)", "count");
        assert!(binding.validate(&registry));
        let first = binding.resolved().cloned();
        assert!(binding.validate(&registry));
        assert_eq!(binding.resolved().cloned(), first);
        assert_eq!(first.unwrap().component, Some(1));
    }

    #[test]
    fn out_of_range_occurrence_degrades_to_empty() {
        let registry = registry();
        let mut binding = binding("Counter (2)", "count");
        assert!(!binding.validate(&registry));
        assert_eq!(binding.read(&registry, ';'), "");
    }

    #[test]
    fn unknown_member_degrades_to_empty() {
        let registry = registry();
        let mut binding = binding("Counter", "missing");
        assert!(!binding.validate(&registry));
        assert_eq!(binding.read(&registry, ';'), "");
    }

    #[test]
    fn game_object_selector_reads_object_name() {
        let registry = registry();
        let mut binding = binding("Game Object", "name");
        assert!(binding.validate(&registry));
        assert_eq!(binding.read(&registry, ';'), "rig");
    }

    #[test]
    fn component_occurrences_resolve_in_attachment_order() {
        let registry = registry();
        let mut first = binding("Counter", "count");
        let mut second = binding("Counter (1)", "count");
        assert!(first.validate(&registry));
        assert!(second.validate(&registry));
        assert_eq!(first.read(&registry, ';'), "1");
        assert_eq!(second.read(&registry, ';'), "2");
    }

    #[test]
    fn header_columns_prefer_declared_replacements() {
        struct Summary;

        impl Exportable for Summary {
            fn type_name(&self) -> &str {
                "Summary"
            }

            fn members(&self) -> Vec<MemberDescriptor> {
                vec![MemberDescriptor::new("trial", ValueKind::Str)
                    .with_separator_arg()
                    .with_headers(["answer", "correct", "duration"])]
            }

            fn read(&self, member: &str, separator: char) -> Option<ExportValue> {
                (member == "trial").then(|| ExportValue::Str(format!("a{separator}true{separator}1.5")))
            }
        }

        let mut registry = ObjectRegistry::new();
        registry.register(SourceObject::new("quiz").with_component(Summary));
        let mut binding = Binding::new(BindingConfig {
            object: "quiz".into(),
            component: "Summary".into(),
            member: "trial".into(),
            column: "trial".into(),
        });
        assert!(binding.validate(&registry));
        assert_eq!(binding.header_columns(), vec!["answer", "correct", "duration"]);
        assert_eq!(binding.read(&registry, ';'), "a;true;1.5");

        // A failing multi-column read degrades to its declared width.
        let empty = ObjectRegistry::new();
        assert_eq!(binding.read(&empty, ';'), ";;");
    }
}
