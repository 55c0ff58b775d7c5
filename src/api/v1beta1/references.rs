use k8s_openapi::api::core::v1::ObjectReference as CoreObjectReference;
use kube::core::GroupVersionKind;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

/// ObjectReference references an API object by name and namespace. It may
/// become stale if the referent is deleted and recreated under the same
/// coordinates.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Hash, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub api_version: String,
}

impl ObjectReference {
    pub fn group_version_kind(&self) -> GroupVersionKind {
        from_api_version_and_kind(&self.api_version, &self.kind)
    }

    pub fn set_group_version_kind(&mut self, gvk: &GroupVersionKind) {
        self.api_version = to_api_version(gvk);
        self.kind = gvk.kind.clone();
    }

    /// Drops the namespace. Only valid where the namespace is implied by
    /// context.
    pub fn local_ref(&self) -> LocalObjectReference {
        LocalObjectReference {
            kind: self.kind.clone(),
            name: self.name.clone(),
            api_version: self.api_version.clone(),
        }
    }

    pub fn to_core_ref(&self) -> CoreObjectReference {
        CoreObjectReference {
            kind: non_empty(&self.kind),
            namespace: non_empty(&self.namespace),
            name: non_empty(&self.name),
            api_version: non_empty(&self.api_version),
            ..Default::default()
        }
    }

    pub fn from_core(reference: &CoreObjectReference) -> ObjectReference {
        ObjectReference {
            kind: reference.kind.clone().unwrap_or_default(),
            namespace: reference.namespace.clone().unwrap_or_default(),
            name: reference.name.clone().unwrap_or_default(),
            api_version: reference.api_version.clone().unwrap_or_default(),
        }
    }
}

/// PinnedObjectReference references one specific object instance by UID in
/// addition to its coordinates. It becomes invalid if the referent is
/// replaced by another object with the same name.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Hash, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PinnedObjectReference {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub api_version: String,
    pub uid: String,
}

impl PinnedObjectReference {
    pub fn group_version_kind(&self) -> GroupVersionKind {
        from_api_version_and_kind(&self.api_version, &self.kind)
    }

    pub fn set_group_version_kind(&mut self, gvk: &GroupVersionKind) {
        self.api_version = to_api_version(gvk);
        self.kind = gvk.kind.clone();
    }

    /// Drops the UID, weakening the reference to coordinates only.
    pub fn unpin(&self) -> ObjectReference {
        ObjectReference {
            kind: self.kind.clone(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            api_version: self.api_version.clone(),
        }
    }

    pub fn to_core_ref(&self) -> CoreObjectReference {
        CoreObjectReference {
            kind: non_empty(&self.kind),
            namespace: non_empty(&self.namespace),
            name: non_empty(&self.name),
            api_version: non_empty(&self.api_version),
            uid: non_empty(&self.uid),
            ..Default::default()
        }
    }

    pub fn from_core(reference: &CoreObjectReference) -> PinnedObjectReference {
        PinnedObjectReference {
            kind: reference.kind.clone().unwrap_or_default(),
            namespace: reference.namespace.clone().unwrap_or_default(),
            name: reference.name.clone().unwrap_or_default(),
            api_version: reference.api_version.clone().unwrap_or_default(),
            uid: reference.uid.clone().unwrap_or_default(),
        }
    }
}

/// LocalObjectReference references an object in the same namespace as the
/// referencing object.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Hash, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    pub kind: String,
    pub name: String,
    pub api_version: String,
}

impl LocalObjectReference {
    pub fn group_version_kind(&self) -> GroupVersionKind {
        from_api_version_and_kind(&self.api_version, &self.kind)
    }

    pub fn set_group_version_kind(&mut self, gvk: &GroupVersionKind) {
        self.api_version = to_api_version(gvk);
        self.kind = gvk.kind.clone();
    }

    /// Strengthens the reference to a full ObjectReference by adding a
    /// namespace.
    pub fn full_ref(&self, namespace: &str) -> ObjectReference {
        ObjectReference {
            kind: self.kind.clone(),
            namespace: namespace.to_string(),
            name: self.name.clone(),
            api_version: self.api_version.clone(),
        }
    }
}

fn from_api_version_and_kind(api_version: &str, kind: &str) -> GroupVersionKind {
    match api_version.split_once('/') {
        Some((group, version)) => GroupVersionKind::gvk(group, version, kind),
        // Core-group apiVersions carry no group segment.
        None => GroupVersionKind::gvk("", api_version, kind),
    }
}

fn to_api_version(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        gvk.version.clone()
    } else {
        format!("{}/{}", gvk.group, gvk.version)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ObjectReference {
        ObjectReference {
            kind: "Machine".to_string(),
            namespace: "ns1".to_string(),
            name: "worker-0".to_string(),
            api_version: "cluster.wheelhouse.dev/v1beta1".to_string(),
        }
    }

    #[test]
    fn test_group_version_kind_round_trip() {
        let mut named = reference();
        let gvk = named.group_version_kind();
        assert_eq!(gvk.group, "cluster.wheelhouse.dev");
        assert_eq!(gvk.version, "v1beta1");
        assert_eq!(gvk.kind, "Machine");
        named.set_group_version_kind(&gvk);
        assert_eq!(
            named, reference(),
            "setting the gvk read from a reference should not change it"
        );

        let mut core_group = ObjectReference {
            kind: "Node".to_string(),
            namespace: String::new(),
            name: "node-0".to_string(),
            api_version: "v1".to_string(),
        };
        let gvk = core_group.group_version_kind();
        assert_eq!(gvk.group, "", "core-group apiVersion has no group");
        assert_eq!(gvk.version, "v1");
        core_group.set_group_version_kind(&gvk);
        assert_eq!(
            core_group.api_version, "v1",
            "core-group apiVersion should round trip without a slash"
        );
    }

    #[test]
    fn test_local_ref_drops_exactly_the_namespace() {
        let local = reference().local_ref();
        assert_eq!(local.kind, "Machine");
        assert_eq!(local.name, "worker-0");
        assert_eq!(local.api_version, "cluster.wheelhouse.dev/v1beta1");
    }

    #[test]
    fn test_full_ref_local_ref_inverse() {
        let local = reference().local_ref();
        assert_eq!(
            local.full_ref("ns1").local_ref(),
            local,
            "local -> full -> local should be the identity on the local part"
        );
        assert_eq!(
            local.full_ref("other").local_ref(),
            local,
            "the namespace added by full_ref must not leak into the local part"
        );
    }

    #[test]
    fn test_unpin_drops_exactly_the_uid() {
        let pinned = PinnedObjectReference {
            kind: "Machine".to_string(),
            namespace: "ns1".to_string(),
            name: "worker-0".to_string(),
            api_version: "cluster.wheelhouse.dev/v1beta1".to_string(),
            uid: "abc".to_string(),
        };
        assert_eq!(pinned.unpin(), reference());
    }

    #[test]
    fn test_core_ref_bridge_maps_empty_to_absent() {
        let mut partial = reference();
        partial.namespace = String::new();
        let core = partial.to_core_ref();
        assert_eq!(core.namespace, None, "empty fields should map to absent");
        assert_eq!(core.kind.as_deref(), Some("Machine"));
        assert_eq!(
            ObjectReference::from_core(&core),
            partial,
            "the core bridge should round trip"
        );
    }
}
