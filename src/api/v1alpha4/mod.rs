//! v1alpha4 spoke. Differences to the hub: object pointers are generic core
//! references, `MachineStatus.version` still exists, and health check
//! timeouts are duration strings.

pub mod conversion;
pub mod generated;

use crate::impl_fuzz;
use crate::util::fuzz::Fuzz;
use k8s_openapi::api::core::v1::ObjectReference as CoreObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, Time};
use kube::CustomResource;
use rand::rngs::StdRng;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

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
    version = "v1alpha4",
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
    pub control_plane_ref: Option<CoreObjectReference>,
    pub infrastructure_ref: Option<CoreObjectReference>,
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
    pub config_ref: Option<CoreObjectReference>,
    pub data_secret_name: Option<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "cluster.wheelhouse.dev",
    version = "v1alpha4",
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
    pub infrastructure_ref: CoreObjectReference,
    pub version: Option<String>,
    pub provider_id: Option<String>,
    pub failure_domain: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineStatus {
    pub node_ref: Option<CoreObjectReference>,
    pub phase: Option<String>,
    /// Removed in the hub; the kubelet version is reported by the node.
    pub version: Option<String>,
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
    version = "v1alpha4",
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
    version = "v1alpha4",
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
    version = "v1alpha4",
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
    /// Duration string in whole seconds, e.g. "90s".
    pub node_startup_timeout: Option<String>,
    pub remediation_template: Option<CoreObjectReference>,
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
    version = "v1alpha4",
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
    pub ref_: Option<CoreObjectReference>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneClass {
    #[serde(rename = "ref")]
    pub ref_: Option<CoreObjectReference>,
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
    version = "v1alpha4",
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

// Structural fuzzers for the round-trip verification harness.

impl Fuzz for Condition {
    fn fuzz(rng: &mut StdRng) -> Self {
        Condition {
            type_: Fuzz::fuzz(rng),
            status: Fuzz::fuzz(rng),
            severity: Fuzz::fuzz(rng),
            last_transition_time: None,
            reason: Fuzz::fuzz(rng),
            message: Fuzz::fuzz(rng),
        }
    }
}

impl Fuzz for UnhealthyCondition {
    fn fuzz(rng: &mut StdRng) -> Self {
        UnhealthyCondition {
            type_: Fuzz::fuzz(rng),
            status: Fuzz::fuzz(rng),
            timeout_seconds: Fuzz::fuzz(rng),
        }
    }
}

impl_fuzz!(ObjectMeta { labels, annotations });
impl_fuzz!(ApiEndpoint { host, port });
impl_fuzz!(ClusterSpec { paused, control_plane_endpoint, control_plane_ref, infrastructure_ref });
impl_fuzz!(ClusterStatus { phase, infrastructure_ready, control_plane_ready, observed_generation, conditions });
impl_fuzz!(Cluster { metadata, spec, status });
impl_fuzz!(Bootstrap { config_ref, data_secret_name });
impl_fuzz!(MachineSpec { cluster_name, bootstrap, infrastructure_ref, version, provider_id, failure_domain });
impl_fuzz!(MachineStatus { node_ref, phase, version, bootstrap_ready, infrastructure_ready, observed_generation, conditions });
impl_fuzz!(Machine { metadata, spec, status });
impl_fuzz!(MachineTemplateSpec { metadata, spec });
impl_fuzz!(MachineSetSpec { cluster_name, replicas, min_ready_seconds, delete_policy, selector, template });
impl_fuzz!(MachineSetStatus { replicas, fully_labeled_replicas, ready_replicas, available_replicas, observed_generation, conditions });
impl_fuzz!(MachineSet { metadata, spec, status });
impl_fuzz!(MachineDeploymentSpec { cluster_name, replicas, paused, revision_history_limit, selector, template });
impl_fuzz!(MachineDeploymentStatus { observed_generation, replicas, updated_replicas, ready_replicas, unavailable_replicas, phase });
impl_fuzz!(MachineDeployment { metadata, spec, status });
impl_fuzz!(MachineHealthCheckSpec { cluster_name, selector, unhealthy_conditions, max_unhealthy, node_startup_timeout, remediation_template });
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
