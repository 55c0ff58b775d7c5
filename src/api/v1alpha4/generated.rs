//! Field-by-field mappings between v1alpha4 and the hub. Purely mechanical,
//! the way a conversion generator would emit them: exhaustive struct
//! literals, no cross-field logic. Manual repairs live in `conversion.rs`.

use super::{
    Bootstrap, Cluster, ClusterClass, ClusterStatus, Condition, ControlPlaneClass,
    LocalObjectTemplate, Machine, MachineDeployment, MachineDeploymentClass,
    MachineDeploymentClassTemplate, MachineDeploymentStatus, MachineHealthCheck,
    MachineHealthCheckStatus, MachinePool, MachinePoolStatus, MachineSet, MachineSetStatus,
    MachineSpec, MachineStatus, MachineTemplateSpec, ObjectMeta, UnhealthyCondition, WorkersClass,
};
use crate::api::v1beta1;
use crate::util::error::{ConversionError, Result};

pub fn auto_convert_cluster_to_hub(src: &Cluster, dst: &mut v1beta1::Cluster) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = v1beta1::ClusterSpec {
        paused: src.spec.paused,
        control_plane_endpoint: v1beta1::ApiEndpoint {
            host: src.spec.control_plane_endpoint.host.clone(),
            port: src.spec.control_plane_endpoint.port,
        },
        control_plane_ref: src
            .spec
            .control_plane_ref
            .as_ref()
            .map(v1beta1::ObjectReference::from_core),
        infrastructure_ref: src
            .spec
            .infrastructure_ref
            .as_ref()
            .map(v1beta1::ObjectReference::from_core),
    };
    dst.status = src.status.as_ref().map(cluster_status_to_hub);
    Ok(())
}

pub fn auto_convert_hub_to_cluster(src: &v1beta1::Cluster, dst: &mut Cluster) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = super::ClusterSpec {
        paused: src.spec.paused,
        control_plane_endpoint: super::ApiEndpoint {
            host: src.spec.control_plane_endpoint.host.clone(),
            port: src.spec.control_plane_endpoint.port,
        },
        control_plane_ref: src
            .spec
            .control_plane_ref
            .as_ref()
            .map(|reference| reference.to_core_ref()),
        infrastructure_ref: src
            .spec
            .infrastructure_ref
            .as_ref()
            .map(|reference| reference.to_core_ref()),
    };
    dst.status = src.status.as_ref().map(cluster_status_from_hub);
    Ok(())
}

fn cluster_status_to_hub(src: &ClusterStatus) -> v1beta1::ClusterStatus {
    v1beta1::ClusterStatus {
        phase: src.phase.clone(),
        infrastructure_ready: src.infrastructure_ready,
        control_plane_ready: src.control_plane_ready,
        observed_generation: src.observed_generation,
        conditions: conditions_to_hub(&src.conditions),
    }
}

fn cluster_status_from_hub(src: &v1beta1::ClusterStatus) -> ClusterStatus {
    ClusterStatus {
        phase: src.phase.clone(),
        infrastructure_ready: src.infrastructure_ready,
        control_plane_ready: src.control_plane_ready,
        observed_generation: src.observed_generation,
        conditions: conditions_from_hub(&src.conditions),
    }
}

pub fn auto_convert_machine_to_hub(src: &Machine, dst: &mut v1beta1::Machine) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = machine_spec_to_hub(&src.spec);
    dst.status = src.status.as_ref().map(machine_status_to_hub);
    Ok(())
}

pub fn auto_convert_hub_to_machine(src: &v1beta1::Machine, dst: &mut Machine) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = machine_spec_from_hub(&src.spec);
    dst.status = src.status.as_ref().map(machine_status_from_hub);
    Ok(())
}

pub(super) fn machine_spec_to_hub(src: &MachineSpec) -> v1beta1::MachineSpec {
    v1beta1::MachineSpec {
        cluster_name: src.cluster_name.clone(),
        bootstrap: v1beta1::Bootstrap {
            config_ref: src
                .bootstrap
                .config_ref
                .as_ref()
                .map(v1beta1::ObjectReference::from_core),
            data_secret_name: src.bootstrap.data_secret_name.clone(),
        },
        infrastructure_ref: v1beta1::ObjectReference::from_core(&src.infrastructure_ref),
        version: src.version.clone(),
        provider_id: src.provider_id.clone(),
        failure_domain: src.failure_domain.clone(),
    }
}

pub(super) fn machine_spec_from_hub(src: &v1beta1::MachineSpec) -> MachineSpec {
    MachineSpec {
        cluster_name: src.cluster_name.clone(),
        bootstrap: Bootstrap {
            config_ref: src
                .bootstrap
                .config_ref
                .as_ref()
                .map(|reference| reference.to_core_ref()),
            data_secret_name: src.bootstrap.data_secret_name.clone(),
        },
        infrastructure_ref: src.infrastructure_ref.to_core_ref(),
        version: src.version.clone(),
        provider_id: src.provider_id.clone(),
        failure_domain: src.failure_domain.clone(),
    }
}

fn machine_status_to_hub(src: &MachineStatus) -> v1beta1::MachineStatus {
    v1beta1::MachineStatus {
        node_ref: src
            .node_ref
            .as_ref()
            .map(v1beta1::PinnedObjectReference::from_core),
        phase: src.phase.clone(),
        bootstrap_ready: src.bootstrap_ready,
        infrastructure_ready: src.infrastructure_ready,
        observed_generation: src.observed_generation,
        conditions: conditions_to_hub(&src.conditions),
    }
}

fn machine_status_from_hub(src: &v1beta1::MachineStatus) -> MachineStatus {
    MachineStatus {
        node_ref: src.node_ref.as_ref().map(|reference| reference.to_core_ref()),
        phase: src.phase.clone(),
        // No hub counterpart.
        version: None,
        bootstrap_ready: src.bootstrap_ready,
        infrastructure_ready: src.infrastructure_ready,
        observed_generation: src.observed_generation,
        conditions: conditions_from_hub(&src.conditions),
    }
}

pub fn auto_convert_machine_set_to_hub(
    src: &MachineSet,
    dst: &mut v1beta1::MachineSet,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = v1beta1::MachineSetSpec {
        cluster_name: src.spec.cluster_name.clone(),
        replicas: src.spec.replicas,
        min_ready_seconds: src.spec.min_ready_seconds,
        delete_policy: src.spec.delete_policy.clone(),
        selector: src.spec.selector.clone(),
        template: machine_template_to_hub(&src.spec.template),
    };
    dst.status = src.status.as_ref().map(|status| v1beta1::MachineSetStatus {
        replicas: status.replicas,
        fully_labeled_replicas: status.fully_labeled_replicas,
        ready_replicas: status.ready_replicas,
        available_replicas: status.available_replicas,
        observed_generation: status.observed_generation,
        conditions: conditions_to_hub(&status.conditions),
    });
    Ok(())
}

pub fn auto_convert_hub_to_machine_set(
    src: &v1beta1::MachineSet,
    dst: &mut MachineSet,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = super::MachineSetSpec {
        cluster_name: src.spec.cluster_name.clone(),
        replicas: src.spec.replicas,
        min_ready_seconds: src.spec.min_ready_seconds,
        delete_policy: src.spec.delete_policy.clone(),
        selector: src.spec.selector.clone(),
        template: machine_template_from_hub(&src.spec.template),
    };
    dst.status = src.status.as_ref().map(|status| MachineSetStatus {
        replicas: status.replicas,
        fully_labeled_replicas: status.fully_labeled_replicas,
        ready_replicas: status.ready_replicas,
        available_replicas: status.available_replicas,
        observed_generation: status.observed_generation,
        conditions: conditions_from_hub(&status.conditions),
    });
    Ok(())
}

pub fn auto_convert_machine_deployment_to_hub(
    src: &MachineDeployment,
    dst: &mut v1beta1::MachineDeployment,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = v1beta1::MachineDeploymentSpec {
        cluster_name: src.spec.cluster_name.clone(),
        replicas: src.spec.replicas,
        paused: src.spec.paused,
        revision_history_limit: src.spec.revision_history_limit,
        selector: src.spec.selector.clone(),
        template: machine_template_to_hub(&src.spec.template),
    };
    dst.status = src.status.as_ref().map(|status| v1beta1::MachineDeploymentStatus {
        observed_generation: status.observed_generation,
        replicas: status.replicas,
        updated_replicas: status.updated_replicas,
        ready_replicas: status.ready_replicas,
        unavailable_replicas: status.unavailable_replicas,
        phase: status.phase.clone(),
    });
    Ok(())
}

pub fn auto_convert_hub_to_machine_deployment(
    src: &v1beta1::MachineDeployment,
    dst: &mut MachineDeployment,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = super::MachineDeploymentSpec {
        cluster_name: src.spec.cluster_name.clone(),
        replicas: src.spec.replicas,
        paused: src.spec.paused,
        revision_history_limit: src.spec.revision_history_limit,
        selector: src.spec.selector.clone(),
        template: machine_template_from_hub(&src.spec.template),
    };
    dst.status = src.status.as_ref().map(|status| MachineDeploymentStatus {
        observed_generation: status.observed_generation,
        replicas: status.replicas,
        updated_replicas: status.updated_replicas,
        ready_replicas: status.ready_replicas,
        unavailable_replicas: status.unavailable_replicas,
        phase: status.phase.clone(),
    });
    Ok(())
}

pub fn auto_convert_machine_health_check_to_hub(
    src: &MachineHealthCheck,
    dst: &mut v1beta1::MachineHealthCheck,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = v1beta1::MachineHealthCheckSpec {
        cluster_name: src.spec.cluster_name.clone(),
        selector: src.spec.selector.clone(),
        unhealthy_conditions: src
            .spec
            .unhealthy_conditions
            .iter()
            .map(|condition| v1beta1::UnhealthyCondition {
                type_: condition.type_.clone(),
                status: condition.status.clone(),
                timeout_seconds: condition.timeout_seconds,
            })
            .collect(),
        max_unhealthy: src.spec.max_unhealthy,
        node_startup_timeout_seconds: match &src.spec.node_startup_timeout {
            Some(duration) => Some(parse_seconds(duration)?),
            None => None,
        },
        remediation_template: src
            .spec
            .remediation_template
            .as_ref()
            .map(|reference| v1beta1::ObjectReference::from_core(reference).local_ref()),
    };
    dst.status = src.status.as_ref().map(|status| v1beta1::MachineHealthCheckStatus {
        expected_machines: status.expected_machines,
        current_healthy: status.current_healthy,
        remediations_allowed: status.remediations_allowed,
        observed_generation: status.observed_generation,
        conditions: conditions_to_hub(&status.conditions),
    });
    Ok(())
}

pub fn auto_convert_hub_to_machine_health_check(
    src: &v1beta1::MachineHealthCheck,
    dst: &mut MachineHealthCheck,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = super::MachineHealthCheckSpec {
        cluster_name: src.spec.cluster_name.clone(),
        selector: src.spec.selector.clone(),
        unhealthy_conditions: src
            .spec
            .unhealthy_conditions
            .iter()
            .map(|condition| UnhealthyCondition {
                type_: condition.type_.clone(),
                status: condition.status.clone(),
                timeout_seconds: condition.timeout_seconds,
            })
            .collect(),
        max_unhealthy: src.spec.max_unhealthy,
        node_startup_timeout: src.spec.node_startup_timeout_seconds.map(format_seconds),
        // The namespace repair in conversion.rs fills in the owning
        // object's namespace.
        remediation_template: src
            .spec
            .remediation_template
            .as_ref()
            .map(|local| local.full_ref("").to_core_ref()),
    };
    dst.status = src.status.as_ref().map(|status| MachineHealthCheckStatus {
        expected_machines: status.expected_machines,
        current_healthy: status.current_healthy,
        remediations_allowed: status.remediations_allowed,
        observed_generation: status.observed_generation,
        conditions: conditions_from_hub(&status.conditions),
    });
    Ok(())
}

pub fn auto_convert_machine_pool_to_hub(
    src: &MachinePool,
    dst: &mut v1beta1::MachinePool,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = v1beta1::MachinePoolSpec {
        cluster_name: src.spec.cluster_name.clone(),
        replicas: src.spec.replicas,
        min_ready_seconds: src.spec.min_ready_seconds,
        template: machine_template_to_hub(&src.spec.template),
        provider_id_list: src.spec.provider_id_list.clone(),
        failure_domains: src.spec.failure_domains.clone(),
    };
    dst.status = src.status.as_ref().map(|status| v1beta1::MachinePoolStatus {
        replicas: status.replicas,
        ready_replicas: status.ready_replicas,
        available_replicas: status.available_replicas,
        unavailable_replicas: status.unavailable_replicas,
        phase: status.phase.clone(),
        conditions: conditions_to_hub(&status.conditions),
    });
    Ok(())
}

pub fn auto_convert_hub_to_machine_pool(
    src: &v1beta1::MachinePool,
    dst: &mut MachinePool,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = super::MachinePoolSpec {
        cluster_name: src.spec.cluster_name.clone(),
        replicas: src.spec.replicas,
        min_ready_seconds: src.spec.min_ready_seconds,
        template: machine_template_from_hub(&src.spec.template),
        provider_id_list: src.spec.provider_id_list.clone(),
        failure_domains: src.spec.failure_domains.clone(),
    };
    dst.status = src.status.as_ref().map(|status| MachinePoolStatus {
        replicas: status.replicas,
        ready_replicas: status.ready_replicas,
        available_replicas: status.available_replicas,
        unavailable_replicas: status.unavailable_replicas,
        phase: status.phase.clone(),
        conditions: conditions_from_hub(&status.conditions),
    });
    Ok(())
}

pub fn auto_convert_cluster_class_to_hub(
    src: &ClusterClass,
    dst: &mut v1beta1::ClusterClass,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = v1beta1::ClusterClassSpec {
        infrastructure: local_template_to_hub(&src.spec.infrastructure),
        control_plane: v1beta1::ControlPlaneClass {
            ref_: src
                .spec
                .control_plane
                .ref_
                .as_ref()
                .map(v1beta1::ObjectReference::from_core),
            machine_infrastructure: src
                .spec
                .control_plane
                .machine_infrastructure
                .as_ref()
                .map(local_template_to_hub),
        },
        workers: v1beta1::WorkersClass {
            machine_deployments: src
                .spec
                .workers
                .machine_deployments
                .iter()
                .map(|class| v1beta1::MachineDeploymentClass {
                    class: class.class.clone(),
                    template: v1beta1::MachineDeploymentClassTemplate {
                        metadata: object_meta_to_hub(&class.template.metadata),
                        bootstrap: local_template_to_hub(&class.template.bootstrap),
                        infrastructure: local_template_to_hub(&class.template.infrastructure),
                    },
                })
                .collect(),
        },
    };
    Ok(())
}

pub fn auto_convert_hub_to_cluster_class(
    src: &v1beta1::ClusterClass,
    dst: &mut ClusterClass,
) -> Result<()> {
    dst.metadata = src.metadata.clone();
    dst.spec = super::ClusterClassSpec {
        infrastructure: local_template_from_hub(&src.spec.infrastructure),
        control_plane: ControlPlaneClass {
            ref_: src
                .spec
                .control_plane
                .ref_
                .as_ref()
                .map(|reference| reference.to_core_ref()),
            machine_infrastructure: src
                .spec
                .control_plane
                .machine_infrastructure
                .as_ref()
                .map(local_template_from_hub),
        },
        workers: WorkersClass {
            machine_deployments: src
                .spec
                .workers
                .machine_deployments
                .iter()
                .map(|class| MachineDeploymentClass {
                    class: class.class.clone(),
                    template: MachineDeploymentClassTemplate {
                        metadata: object_meta_from_hub(&class.template.metadata),
                        bootstrap: local_template_from_hub(&class.template.bootstrap),
                        infrastructure: local_template_from_hub(&class.template.infrastructure),
                    },
                })
                .collect(),
        },
    };
    Ok(())
}

fn local_template_to_hub(src: &LocalObjectTemplate) -> v1beta1::LocalObjectTemplate {
    v1beta1::LocalObjectTemplate {
        ref_: src.ref_.as_ref().map(v1beta1::ObjectReference::from_core),
    }
}

fn local_template_from_hub(src: &v1beta1::LocalObjectTemplate) -> LocalObjectTemplate {
    LocalObjectTemplate {
        ref_: src.ref_.as_ref().map(|reference| reference.to_core_ref()),
    }
}

pub(super) fn machine_template_to_hub(src: &MachineTemplateSpec) -> v1beta1::MachineTemplateSpec {
    v1beta1::MachineTemplateSpec {
        metadata: object_meta_to_hub(&src.metadata),
        spec: machine_spec_to_hub(&src.spec),
    }
}

pub(super) fn machine_template_from_hub(src: &v1beta1::MachineTemplateSpec) -> MachineTemplateSpec {
    MachineTemplateSpec {
        metadata: object_meta_from_hub(&src.metadata),
        spec: machine_spec_from_hub(&src.spec),
    }
}

fn object_meta_to_hub(src: &ObjectMeta) -> v1beta1::ObjectMeta {
    v1beta1::ObjectMeta {
        labels: src.labels.clone(),
        annotations: src.annotations.clone(),
    }
}

fn object_meta_from_hub(src: &v1beta1::ObjectMeta) -> ObjectMeta {
    ObjectMeta {
        labels: src.labels.clone(),
        annotations: src.annotations.clone(),
    }
}

pub(super) fn conditions_to_hub(src: &Option<Vec<Condition>>) -> Option<Vec<v1beta1::Condition>> {
    src.as_ref()
        .map(|list| list.iter().map(condition_to_hub).collect())
}

pub(super) fn conditions_from_hub(src: &Option<Vec<v1beta1::Condition>>) -> Option<Vec<Condition>> {
    src.as_ref()
        .map(|list| list.iter().map(condition_from_hub).collect())
}

fn condition_to_hub(src: &Condition) -> v1beta1::Condition {
    v1beta1::Condition {
        type_: src.type_.clone(),
        status: src.status.clone(),
        severity: src.severity.clone(),
        last_transition_time: src.last_transition_time.clone(),
        reason: src.reason.clone(),
        message: src.message.clone(),
    }
}

fn condition_from_hub(src: &v1beta1::Condition) -> Condition {
    Condition {
        type_: src.type_.clone(),
        status: src.status.clone(),
        severity: src.severity.clone(),
        last_transition_time: src.last_transition_time.clone(),
        reason: src.reason.clone(),
        message: src.message.clone(),
    }
}

pub(super) fn parse_seconds(value: &str) -> Result<i64> {
    value
        .strip_suffix('s')
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| {
            ConversionError::MappingFailed(format!(
                "invalid duration {:?}: expected whole seconds with a trailing 's'",
                value
            ))
        })
}

pub(super) fn format_seconds(seconds: i64) -> String {
    format!("{}s", seconds)
}
