//! Tracks which member a binding is connected to and surfaces per-member
//! advisory notices exactly once per change, never once per row.

use crate::binding::ResolvedMember;

#[derive(Debug, Default, Clone)]
pub struct HeaderOverlay {
    last: Option<String>,
}

impl HeaderOverlay {
    /// Observes the outcome of a validation. When the resolved member differs
    /// from the previously observed one (including becoming unresolved), the
    /// new member's notice is emitted.
    pub fn observe(&mut self, binding: &str, resolved: Option<&ResolvedMember>) {
        let key = resolved.map(ResolvedMember::identity);
        if key == self.last {
            return;
        }
        if let Some(resolved) = resolved {
            if let Some(notice) = &resolved.descriptor.notice {
                info!(binding, member = %resolved.descriptor.name, "{notice}");
            }
        }
        self.last = key;
    }

    #[cfg(test)]
    pub(crate) fn observed(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        source::MemberDescriptor,
        value::ValueKind,
    };
    use pretty_assertions::assert_eq;

    fn resolved(member: &str) -> ResolvedMember {
        ResolvedMember {
            object: "rig".into(),
            component: Some(0),
            descriptor: MemberDescriptor::new(member, ValueKind::Int).with_notice("heads up"),
        }
    }

    #[test]
    fn tracks_member_identity_across_observations() {
        let mut overlay = HeaderOverlay::default();
        overlay.observe("rig/Probe/count", Some(&resolved("count")));
        assert_eq!(overlay.observed(), Some("rig#0#count"));

        // Same member again: identity unchanged.
        overlay.observe("rig/Probe/count", Some(&resolved("count")));
        assert_eq!(overlay.observed(), Some("rig#0#count"));

        // Becoming unresolved is a change too.
        overlay.observe("rig/Probe/count", None);
        assert_eq!(overlay.observed(), None);

        overlay.observe("rig/Probe/other", Some(&resolved("other")));
        assert_eq!(overlay.observed(), Some("rig#0#other"));
    }
}
