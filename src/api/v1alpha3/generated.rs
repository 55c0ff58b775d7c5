//! Field-by-field mappings between v1alpha3 and the hub, written the way a
//! conversion generator would emit them. Fields without a counterpart
//! (inline bootstrap data, template identity metadata, the control plane
//! initialized bool) are left to the adapters in `conversion.rs`.

use super::{
    Bootstrap, Cluster, ClusterStatus, Condition, Machine, MachineDeployment,
    MachineDeploymentStatus, MachineHealthCheck, MachineHealthCheckStatus, MachineSet,
    MachineSetStatus, MachineSpec, MachineStatus, MachineTemplateSpec, ObjectMeta,
    UnhealthyCondition,
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
    dst.status = src.status.as_ref().map(|status| v1beta1::ClusterStatus {
        phase: status.phase.clone(),
        infrastructure_ready: status.infrastructure_ready,
        control_plane_ready: status.control_plane_ready,
        observed_generation: status.observed_generation,
        conditions: conditions_to_hub(&status.conditions),
    });
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
    dst.status = src.status.as_ref().map(|status| ClusterStatus {
        phase: status.phase.clone(),
        infrastructure_ready: status.infrastructure_ready,
        // Derived from the hub condition by the adapter.
        control_plane_initialized: false,
        control_plane_ready: status.control_plane_ready,
        observed_generation: status.observed_generation,
        conditions: conditions_from_hub(&status.conditions),
    });
    Ok(())
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

fn machine_spec_to_hub(src: &MachineSpec) -> v1beta1::MachineSpec {
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

fn machine_spec_from_hub(src: &v1beta1::MachineSpec) -> MachineSpec {
    MachineSpec {
        cluster_name: src.cluster_name.clone(),
        bootstrap: Bootstrap {
            config_ref: src
                .bootstrap
                .config_ref
                .as_ref()
                .map(|reference| reference.to_core_ref()),
            // Inline bootstrap data was dropped after this version.
            data: None,
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

fn machine_template_to_hub(src: &MachineTemplateSpec) -> v1beta1::MachineTemplateSpec {
    v1beta1::MachineTemplateSpec {
        metadata: object_meta_to_hub(&src.metadata),
        spec: machine_spec_to_hub(&src.spec),
    }
}

fn machine_template_from_hub(src: &v1beta1::MachineTemplateSpec) -> MachineTemplateSpec {
    MachineTemplateSpec {
        metadata: object_meta_from_hub(&src.metadata),
        spec: machine_spec_from_hub(&src.spec),
    }
}

// Identity fields on template metadata were dropped after this version.
fn object_meta_to_hub(src: &ObjectMeta) -> v1beta1::ObjectMeta {
    v1beta1::ObjectMeta {
        labels: src.labels.clone(),
        annotations: src.annotations.clone(),
    }
}

fn object_meta_from_hub(src: &v1beta1::ObjectMeta) -> ObjectMeta {
    ObjectMeta {
        name: None,
        generate_name: None,
        namespace: None,
        labels: src.labels.clone(),
        annotations: src.annotations.clone(),
        owner_references: None,
    }
}

fn conditions_to_hub(src: &Option<Vec<Condition>>) -> Option<Vec<v1beta1::Condition>> {
    src.as_ref().map(|list| {
        list.iter()
            .map(|condition| v1beta1::Condition {
                type_: condition.type_.clone(),
                status: condition.status.clone(),
                severity: condition.severity.clone(),
                last_transition_time: condition.last_transition_time.clone(),
                reason: condition.reason.clone(),
                message: condition.message.clone(),
            })
            .collect()
    })
}

fn conditions_from_hub(src: &Option<Vec<v1beta1::Condition>>) -> Option<Vec<Condition>> {
    src.as_ref().map(|list| {
        list.iter()
            .map(|condition| Condition {
                type_: condition.type_.clone(),
                status: condition.status.clone(),
                severity: condition.severity.clone(),
                last_transition_time: condition.last_transition_time.clone(),
                reason: condition.reason.clone(),
                message: condition.message.clone(),
            })
            .collect()
    })
}

fn parse_seconds(value: &str) -> Result<i64> {
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

fn format_seconds(seconds: i64) -> String {
    format!("{}s", seconds)
}
