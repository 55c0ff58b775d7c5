//! Conversion adapters between v1alpha3 and the v1beta1 hub. Beyond the
//! namespace repair this version needs one asymmetric rule: the status bool
//! `control_plane_initialized` maps to the `ControlPlaneInitialized` hub
//! condition. Converting to the hub marks the condition from the bool;
//! converting back derives the bool and keeps the condition list verbatim.

use super::generated;
use super::{Cluster, Machine, MachineDeployment, MachineHealthCheck, MachineSet};
use crate::api::v1beta1;
use crate::util::conversion::Convertible;
use crate::util::error::Result;
use k8s_openapi::api::core::v1::ObjectReference as CoreObjectReference;

fn set_ref_namespace(reference: Option<&mut CoreObjectReference>, namespace: &Option<String>) {
    if let Some(reference) = reference {
        reference.namespace = namespace.clone();
    }
}

fn set_hub_ref_namespace(reference: Option<&mut v1beta1::ObjectReference>, namespace: &str) {
    if let Some(reference) = reference {
        reference.namespace = namespace.to_owned();
    }
}

impl Convertible for Cluster {
    type Hub = v1beta1::Cluster;

    fn convert_to(&self, dst: &mut v1beta1::Cluster) -> Result<()> {
        generated::auto_convert_cluster_to_hub(self, dst)?;
        let namespace = dst.metadata.namespace.clone().unwrap_or_default();
        set_hub_ref_namespace(dst.spec.control_plane_ref.as_mut(), &namespace);
        set_hub_ref_namespace(dst.spec.infrastructure_ref.as_mut(), &namespace);
        if let (Some(src_status), Some(dst_status)) = (self.status.as_ref(), dst.status.as_mut()) {
            if src_status.control_plane_initialized {
                v1beta1::mark_condition_true(
                    &mut dst_status.conditions,
                    v1beta1::CONTROL_PLANE_INITIALIZED_CONDITION,
                );
            }
        }
        Ok(())
    }

    fn convert_from(&mut self, src: &v1beta1::Cluster) -> Result<()> {
        generated::auto_convert_hub_to_cluster(src, self)?;
        let namespace = self.metadata.namespace.clone();
        set_ref_namespace(self.spec.control_plane_ref.as_mut(), &namespace);
        set_ref_namespace(self.spec.infrastructure_ref.as_mut(), &namespace);
        if let (Some(src_status), Some(status)) = (src.status.as_ref(), self.status.as_mut()) {
            status.control_plane_initialized = v1beta1::is_condition_true(
                &src_status.conditions,
                v1beta1::CONTROL_PLANE_INITIALIZED_CONDITION,
            );
        }
        Ok(())
    }
}

impl Convertible for Machine {
    type Hub = v1beta1::Machine;

    fn convert_to(&self, dst: &mut v1beta1::Machine) -> Result<()> {
        generated::auto_convert_machine_to_hub(self, dst)?;
        let namespace = dst.metadata.namespace.clone().unwrap_or_default();
        set_hub_ref_namespace(dst.spec.bootstrap.config_ref.as_mut(), &namespace);
        set_hub_ref_namespace(Some(&mut dst.spec.infrastructure_ref), &namespace);
        Ok(())
    }

    fn convert_from(&mut self, src: &v1beta1::Machine) -> Result<()> {
        generated::auto_convert_hub_to_machine(src, self)?;
        let namespace = self.metadata.namespace.clone();
        set_ref_namespace(self.spec.bootstrap.config_ref.as_mut(), &namespace);
        set_ref_namespace(Some(&mut self.spec.infrastructure_ref), &namespace);
        Ok(())
    }
}

impl Convertible for MachineSet {
    type Hub = v1beta1::MachineSet;

    fn convert_to(&self, dst: &mut v1beta1::MachineSet) -> Result<()> {
        generated::auto_convert_machine_set_to_hub(self, dst)?;
        let namespace = dst.metadata.namespace.clone().unwrap_or_default();
        set_hub_ref_namespace(dst.spec.template.spec.bootstrap.config_ref.as_mut(), &namespace);
        set_hub_ref_namespace(Some(&mut dst.spec.template.spec.infrastructure_ref), &namespace);
        Ok(())
    }

    fn convert_from(&mut self, src: &v1beta1::MachineSet) -> Result<()> {
        generated::auto_convert_hub_to_machine_set(src, self)?;
        let namespace = self.metadata.namespace.clone();
        set_ref_namespace(self.spec.template.spec.bootstrap.config_ref.as_mut(), &namespace);
        set_ref_namespace(Some(&mut self.spec.template.spec.infrastructure_ref), &namespace);
        Ok(())
    }
}

impl Convertible for MachineDeployment {
    type Hub = v1beta1::MachineDeployment;

    fn convert_to(&self, dst: &mut v1beta1::MachineDeployment) -> Result<()> {
        generated::auto_convert_machine_deployment_to_hub(self, dst)?;
        let namespace = dst.metadata.namespace.clone().unwrap_or_default();
        set_hub_ref_namespace(dst.spec.template.spec.bootstrap.config_ref.as_mut(), &namespace);
        set_hub_ref_namespace(Some(&mut dst.spec.template.spec.infrastructure_ref), &namespace);
        Ok(())
    }

    fn convert_from(&mut self, src: &v1beta1::MachineDeployment) -> Result<()> {
        generated::auto_convert_hub_to_machine_deployment(src, self)?;
        let namespace = self.metadata.namespace.clone();
        set_ref_namespace(self.spec.template.spec.bootstrap.config_ref.as_mut(), &namespace);
        set_ref_namespace(Some(&mut self.spec.template.spec.infrastructure_ref), &namespace);
        Ok(())
    }
}

impl Convertible for MachineHealthCheck {
    type Hub = v1beta1::MachineHealthCheck;

    fn convert_to(&self, dst: &mut v1beta1::MachineHealthCheck) -> Result<()> {
        // The remediation template becomes a local reference, so there is no
        // namespace left to repair on the hub side.
        generated::auto_convert_machine_health_check_to_hub(self, dst)
    }

    fn convert_from(&mut self, src: &v1beta1::MachineHealthCheck) -> Result<()> {
        generated::auto_convert_hub_to_machine_health_check(src, self)?;
        let namespace = self.metadata.namespace.clone();
        set_ref_namespace(self.spec.remediation_template.as_mut(), &namespace);
        Ok(())
    }
}
