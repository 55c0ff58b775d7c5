//! Hub version of the cluster descriptor family. Every other version
//! converts through the types in this module.

pub mod references;

pub use self::references::{LocalObjectReference, ObjectReference, PinnedObjectReference};

use crate::impl_fuzz;
use crate::util::conversion::Hub;
use crate::util::fuzz::Fuzz;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, Time};
use kube::CustomResource;
use rand::rngs::StdRng;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CONTROL_PLANE_INITIALIZED_CONDITION: &str = "ControlPlaneInitialized";
pub const CONDITION_TRUE: &str = "True";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    pub severity: Option<String>,
    pub last_transition_time: Option<Time>,
    pub reason: Option<String>,
    pub message: Option<String>,
}

pub fn is_condition_true(conditions: &Option<Vec<Condition>>, type_: &str) -> bool {
    conditions
        .as_ref()
        .map_or(false, |list| {
            list.iter()
                .any(|condition| condition.type_ == type_ && condition.status == CONDITION_TRUE)
        })
}

pub fn mark_condition_true(conditions: &mut Option<Vec<Condition>>, type_: &str) {
    let list = conditions.get_or_insert_with(Vec::new);
    if let Some(existing) = list.iter_mut().find(|condition| condition.type_ == type_) {
        existing.status = CONDITION_TRUE.to_string();
    } else {
        list.push(Condition {
            type_: type_.to_string(),
            status: CONDITION_TRUE.to_string(),
            severity: None,
            last_transition_time: None,
            reason: None,
            message: None,
        });
    }
}

/// Template-level object metadata. Identity fields live on the enclosing
/// object only.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub labels: Option<BTreeMap<String, String>>,
    pub annotations: Option<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    pub host: String,
    pub port: i32,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "cluster.wheelhouse.dev",
    version = "v1beta1",
    kind = "Cluster",
    namespaced
)]
#[kube(status = "ClusterStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    pub paused: bool,
    pub control_plane_endpoint: ApiEndpoint,
    pub control_plane_ref: Option<ObjectReference>,
    pub infrastructure_ref: Option<ObjectReference>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    pub phase: Option<String>,
    pub infrastructure_ready: bool,
    pub control_plane_ready: bool,
    pub observed_generation: Option<i64>,
    pub conditions: Option<Vec<Condition>>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bootstrap {
    pub config_ref: Option<ObjectReference>,
    pub data_secret_name: Option<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "cluster.wheelhouse.dev",
    version = "v1beta1",
    kind = "Machine",
    namespaced
)]
#[kube(status = "MachineStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    pub cluster_name: String,
    pub bootstrap: Bootstrap,
    pub infrastructure_ref: ObjectReference,
    pub version: Option<String>,
    pub provider_id: Option<String>,
    pub failure_domain: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineStatus {
    pub node_ref: Option<PinnedObjectReference>,
    pub phase: Option<String>,
    pub bootstrap_ready: bool,
    pub infrastructure_ready: bool,
    pub observed_generation: Option<i64>,
    pub conditions: Option<Vec<Condition>>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineTemplateSpec {
    pub metadata: ObjectMeta,
    pub spec: MachineSpec,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "cluster.wheelhouse.dev",
    version = "v1beta1",
    kind = "MachineSet",
    namespaced
)]
#[kube(status = "MachineSetStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct MachineSetSpec {
    pub cluster_name: String,
    pub replicas: Option<i32>,
    pub min_ready_seconds: Option<i32>,
    pub delete_policy: Option<String>,
    pub selector: LabelSelector,
    pub template: MachineTemplateSpec,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineSetStatus {
    pub replicas: i32,
    pub fully_labeled_replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub observed_generation: Option<i64>,
    pub conditions: Option<Vec<Condition>>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "cluster.wheelhouse.dev",
    version = "v1beta1",
    kind = "MachineDeployment",
    namespaced
)]
#[kube(status = "MachineDeploymentStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct MachineDeploymentSpec {
    pub cluster_name: String,
    pub replicas: Option<i32>,
    pub paused: bool,
    pub revision_history_limit: Option<i32>,
    pub selector: LabelSelector,
    pub template: MachineTemplateSpec,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineDeploymentStatus {
    pub observed_generation: Option<i64>,
    pub replicas: i32,
    pub updated_replicas: i32,
    pub ready_replicas: i32,
    pub unavailable_replicas: i32,
    pub phase: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnhealthyCondition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    pub timeout_seconds: i32,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "cluster.wheelhouse.dev",
    version = "v1beta1",
    kind = "MachineHealthCheck",
    namespaced
)]
#[kube(status = "MachineHealthCheckStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct MachineHealthCheckSpec {
    pub cluster_name: String,
    pub selector: LabelSelector,
    pub unhealthy_conditions: Vec<UnhealthyCondition>,
    pub max_unhealthy: Option<i32>,
    pub node_startup_timeout_seconds: Option<i64>,
    /// Remediation templates always live in the namespace of the health
    /// check, so the reference is local.
    pub remediation_template: Option<LocalObjectReference>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineHealthCheckStatus {
    pub expected_machines: i32,
    pub current_healthy: i32,
    pub remediations_allowed: i32,
    pub observed_generation: Option<i64>,
    pub conditions: Option<Vec<Condition>>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "cluster.wheelhouse.dev",
    version = "v1beta1",
    kind = "MachinePool",
    namespaced
)]
#[kube(status = "MachinePoolStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct MachinePoolSpec {
    pub cluster_name: String,
    pub replicas: Option<i32>,
    pub min_ready_seconds: Option<i32>,
    pub template: MachineTemplateSpec,
    pub provider_id_list: Option<Vec<String>>,
    pub failure_domains: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachinePoolStatus {
    pub replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub unavailable_replicas: i32,
    pub phase: Option<String>,
    pub conditions: Option<Vec<Condition>>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectTemplate {
    #[serde(rename = "ref")]
    pub ref_: Option<ObjectReference>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneClass {
    #[serde(rename = "ref")]
    pub ref_: Option<ObjectReference>,
    pub machine_infrastructure: Option<LocalObjectTemplate>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineDeploymentClassTemplate {
    pub metadata: ObjectMeta,
    pub bootstrap: LocalObjectTemplate,
    pub infrastructure: LocalObjectTemplate,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineDeploymentClass {
    pub class: String,
    pub template: MachineDeploymentClassTemplate,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkersClass {
    pub machine_deployments: Vec<MachineDeploymentClass>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "cluster.wheelhouse.dev",
    version = "v1beta1",
    kind = "ClusterClass",
    namespaced
)]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct ClusterClassSpec {
    pub infrastructure: LocalObjectTemplate,
    pub control_plane: ControlPlaneClass,
    pub workers: WorkersClass,
}

impl Hub for Cluster {}
impl Hub for ClusterClass {}
impl Hub for Machine {}
impl Hub for MachineSet {}
impl Hub for MachineDeployment {}
impl Hub for MachineHealthCheck {}
impl Hub for MachinePool {}

// Structural fuzzers for the round-trip verification harness.

impl Fuzz for Condition {
    fn fuzz(rng: &mut StdRng) -> Self {
        Condition {
            type_: Fuzz::fuzz(rng),
            status: Fuzz::fuzz(rng),
            severity: Fuzz::fuzz(rng),
            // Transition timestamps are populated by controllers at runtime
            // and are not part of the round-trip contract.
            last_transition_time: None,
            reason: Fuzz::fuzz(rng),
            message: Fuzz::fuzz(rng),
        }
    }
}

impl_fuzz!(ObjectReference { kind, namespace, name, api_version });
impl_fuzz!(PinnedObjectReference { kind, namespace, name, api_version, uid });
impl_fuzz!(LocalObjectReference { kind, name, api_version });
impl_fuzz!(ObjectMeta { labels, annotations });
impl_fuzz!(ApiEndpoint { host, port });
impl_fuzz!(ClusterSpec { paused, control_plane_endpoint, control_plane_ref, infrastructure_ref });
impl_fuzz!(ClusterStatus { phase, infrastructure_ready, control_plane_ready, observed_generation, conditions });
impl_fuzz!(Cluster { metadata, spec, status });
impl_fuzz!(Bootstrap { config_ref, data_secret_name });
impl_fuzz!(MachineSpec { cluster_name, bootstrap, infrastructure_ref, version, provider_id, failure_domain });
impl_fuzz!(MachineStatus { node_ref, phase, bootstrap_ready, infrastructure_ready, observed_generation, conditions });
impl_fuzz!(Machine { metadata, spec, status });
impl_fuzz!(MachineTemplateSpec { metadata, spec });
impl_fuzz!(MachineSetSpec { cluster_name, replicas, min_ready_seconds, delete_policy, selector, template });
impl_fuzz!(MachineSetStatus { replicas, fully_labeled_replicas, ready_replicas, available_replicas, observed_generation, conditions });
impl_fuzz!(MachineSet { metadata, spec, status });
impl_fuzz!(MachineDeploymentSpec { cluster_name, replicas, paused, revision_history_limit, selector, template });
impl_fuzz!(MachineDeploymentStatus { observed_generation, replicas, updated_replicas, ready_replicas, unavailable_replicas, phase });
impl_fuzz!(MachineDeployment { metadata, spec, status });
impl Fuzz for UnhealthyCondition {
    fn fuzz(rng: &mut StdRng) -> Self {
        UnhealthyCondition {
            type_: Fuzz::fuzz(rng),
            status: Fuzz::fuzz(rng),
            timeout_seconds: Fuzz::fuzz(rng),
        }
    }
}
impl_fuzz!(MachineHealthCheckSpec { cluster_name, selector, unhealthy_conditions, max_unhealthy, node_startup_timeout_seconds, remediation_template });
impl_fuzz!(MachineHealthCheckStatus { expected_machines, current_healthy, remediations_allowed, observed_generation, conditions });
impl_fuzz!(MachineHealthCheck { metadata, spec, status });
impl_fuzz!(MachinePoolSpec { cluster_name, replicas, min_ready_seconds, template, provider_id_list, failure_domains });
impl_fuzz!(MachinePoolStatus { replicas, ready_replicas, available_replicas, unavailable_replicas, phase, conditions });
impl_fuzz!(MachinePool { metadata, spec, status });
impl_fuzz!(LocalObjectTemplate { ref_ });
impl_fuzz!(ControlPlaneClass { ref_, machine_infrastructure });
impl_fuzz!(MachineDeploymentClassTemplate { metadata, bootstrap, infrastructure });
impl_fuzz!(MachineDeploymentClass { class, template });
impl_fuzz!(WorkersClass { machine_deployments });
impl_fuzz!(ClusterClassSpec { infrastructure, control_plane, workers });
impl_fuzz!(ClusterClass { metadata, spec });
