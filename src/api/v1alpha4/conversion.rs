//! Conversion adapters between v1alpha4 and the v1beta1 hub. The generated
//! mappers do the field-by-field work; this module adds the manual repairs,
//! currently only re-homing nested object references to the owning object's
//! namespace.

use super::generated;
use super::{Cluster, ClusterClass, Machine, MachineDeployment, MachineHealthCheck, MachinePool, MachineSet};
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
        Ok(())
    }

    fn convert_from(&mut self, src: &v1beta1::Cluster) -> Result<()> {
        generated::auto_convert_hub_to_cluster(src, self)?;
        let namespace = self.metadata.namespace.clone();
        set_ref_namespace(self.spec.control_plane_ref.as_mut(), &namespace);
        set_ref_namespace(self.spec.infrastructure_ref.as_mut(), &namespace);
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

impl Convertible for MachinePool {
    type Hub = v1beta1::MachinePool;

    fn convert_to(&self, dst: &mut v1beta1::MachinePool) -> Result<()> {
        generated::auto_convert_machine_pool_to_hub(self, dst)?;
        let namespace = dst.metadata.namespace.clone().unwrap_or_default();
        set_hub_ref_namespace(dst.spec.template.spec.bootstrap.config_ref.as_mut(), &namespace);
        set_hub_ref_namespace(Some(&mut dst.spec.template.spec.infrastructure_ref), &namespace);
        Ok(())
    }

    fn convert_from(&mut self, src: &v1beta1::MachinePool) -> Result<()> {
        generated::auto_convert_hub_to_machine_pool(src, self)?;
        let namespace = self.metadata.namespace.clone();
        set_ref_namespace(self.spec.template.spec.bootstrap.config_ref.as_mut(), &namespace);
        set_ref_namespace(Some(&mut self.spec.template.spec.infrastructure_ref), &namespace);
        Ok(())
    }
}

impl Convertible for ClusterClass {
    type Hub = v1beta1::ClusterClass;

    fn convert_to(&self, dst: &mut v1beta1::ClusterClass) -> Result<()> {
        generated::auto_convert_cluster_class_to_hub(self, dst)?;
        let namespace = dst.metadata.namespace.clone().unwrap_or_default();
        set_hub_ref_namespace(dst.spec.infrastructure.ref_.as_mut(), &namespace);
        set_hub_ref_namespace(dst.spec.control_plane.ref_.as_mut(), &namespace);
        if let Some(template) = dst.spec.control_plane.machine_infrastructure.as_mut() {
            set_hub_ref_namespace(template.ref_.as_mut(), &namespace);
        }
        for class in &mut dst.spec.workers.machine_deployments {
            set_hub_ref_namespace(class.template.bootstrap.ref_.as_mut(), &namespace);
            set_hub_ref_namespace(class.template.infrastructure.ref_.as_mut(), &namespace);
        }
        Ok(())
    }

    fn convert_from(&mut self, src: &v1beta1::ClusterClass) -> Result<()> {
        generated::auto_convert_hub_to_cluster_class(src, self)?;
        let namespace = self.metadata.namespace.clone();
        set_ref_namespace(self.spec.infrastructure.ref_.as_mut(), &namespace);
        set_ref_namespace(self.spec.control_plane.ref_.as_mut(), &namespace);
        if let Some(template) = self.spec.control_plane.machine_infrastructure.as_mut() {
            set_ref_namespace(template.ref_.as_mut(), &namespace);
        }
        for class in &mut self.spec.workers.machine_deployments {
            set_ref_namespace(class.template.bootstrap.ref_.as_mut(), &namespace);
            set_ref_namespace(class.template.infrastructure.ref_.as_mut(), &namespace);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;
    use super::{set_hub_ref_namespace, set_ref_namespace};
    use crate::api::v1beta1;
    use crate::util::conversion::{fuzz_round_trip, Convertible, FuzzTestInput};
    use crate::util::error::ConversionError;
    use k8s_openapi::api::core::v1::ObjectReference as CoreObjectReference;
    use rand::rngs::StdRng;
    use rand::Rng;

    // Core references carry transport fields the typed hub references drop.
    fn scrub_core_ref(reference: Option<&mut CoreObjectReference>) {
        if let Some(reference) = reference {
            reference.field_path = None;
            reference.resource_version = None;
            reference.uid = None;
        }
    }

    // Node references keep their uid across the hub, so only the fields with
    // no pinned counterpart are zeroed.
    fn scrub_node_ref(reference: Option<&mut CoreObjectReference>) {
        if let Some(reference) = reference {
            reference.field_path = None;
            reference.resource_version = None;
        }
    }

    fn cluster_fuzzer(cluster: &mut Cluster, _: &mut StdRng) {
        let namespace = cluster.metadata.namespace.clone();
        scrub_core_ref(cluster.spec.control_plane_ref.as_mut());
        scrub_core_ref(cluster.spec.infrastructure_ref.as_mut());
        set_ref_namespace(cluster.spec.control_plane_ref.as_mut(), &namespace);
        set_ref_namespace(cluster.spec.infrastructure_ref.as_mut(), &namespace);
    }

    fn hub_cluster_fuzzer(cluster: &mut v1beta1::Cluster, _: &mut StdRng) {
        let namespace = cluster.metadata.namespace.clone().unwrap_or_default();
        set_hub_ref_namespace(cluster.spec.control_plane_ref.as_mut(), &namespace);
        set_hub_ref_namespace(cluster.spec.infrastructure_ref.as_mut(), &namespace);
    }

    fn machine_spec_fuzzer(spec: &mut MachineSpec, namespace: &Option<String>) {
        scrub_core_ref(spec.bootstrap.config_ref.as_mut());
        scrub_core_ref(Some(&mut spec.infrastructure_ref));
        set_ref_namespace(spec.bootstrap.config_ref.as_mut(), namespace);
        set_ref_namespace(Some(&mut spec.infrastructure_ref), namespace);
    }

    fn hub_machine_spec_fuzzer(spec: &mut v1beta1::MachineSpec, namespace: &str) {
        set_hub_ref_namespace(spec.bootstrap.config_ref.as_mut(), namespace);
        set_hub_ref_namespace(Some(&mut spec.infrastructure_ref), namespace);
    }

    fn machine_fuzzer(machine: &mut Machine, _: &mut StdRng) {
        let namespace = machine.metadata.namespace.clone();
        machine_spec_fuzzer(&mut machine.spec, &namespace);
        if let Some(status) = machine.status.as_mut() {
            scrub_node_ref(status.node_ref.as_mut());
            status.version = None;
        }
    }

    fn hub_machine_fuzzer(machine: &mut v1beta1::Machine, _: &mut StdRng) {
        let namespace = machine.metadata.namespace.clone().unwrap_or_default();
        hub_machine_spec_fuzzer(&mut machine.spec, &namespace);
    }

    fn machine_set_fuzzer(machine_set: &mut MachineSet, _: &mut StdRng) {
        let namespace = machine_set.metadata.namespace.clone();
        machine_spec_fuzzer(&mut machine_set.spec.template.spec, &namespace);
    }

    fn hub_machine_set_fuzzer(machine_set: &mut v1beta1::MachineSet, _: &mut StdRng) {
        let namespace = machine_set.metadata.namespace.clone().unwrap_or_default();
        hub_machine_spec_fuzzer(&mut machine_set.spec.template.spec, &namespace);
    }

    fn machine_deployment_fuzzer(deployment: &mut MachineDeployment, _: &mut StdRng) {
        let namespace = deployment.metadata.namespace.clone();
        machine_spec_fuzzer(&mut deployment.spec.template.spec, &namespace);
    }

    fn hub_machine_deployment_fuzzer(deployment: &mut v1beta1::MachineDeployment, _: &mut StdRng) {
        let namespace = deployment.metadata.namespace.clone().unwrap_or_default();
        hub_machine_spec_fuzzer(&mut deployment.spec.template.spec, &namespace);
    }

    fn machine_health_check_fuzzer(check: &mut MachineHealthCheck, rng: &mut StdRng) {
        let namespace = check.metadata.namespace.clone();
        scrub_core_ref(check.spec.remediation_template.as_mut());
        set_ref_namespace(check.spec.remediation_template.as_mut(), &namespace);
        // Freely fuzzed strings are not durations.
        if check.spec.node_startup_timeout.is_some() {
            check.spec.node_startup_timeout = Some(format!("{}s", rng.gen_range(0..86_400)));
        }
    }

    fn machine_pool_fuzzer(pool: &mut MachinePool, _: &mut StdRng) {
        let namespace = pool.metadata.namespace.clone();
        machine_spec_fuzzer(&mut pool.spec.template.spec, &namespace);
    }

    fn hub_machine_pool_fuzzer(pool: &mut v1beta1::MachinePool, _: &mut StdRng) {
        let namespace = pool.metadata.namespace.clone().unwrap_or_default();
        hub_machine_spec_fuzzer(&mut pool.spec.template.spec, &namespace);
    }

    fn cluster_class_fuzzer(class: &mut ClusterClass, _: &mut StdRng) {
        let namespace = class.metadata.namespace.clone();
        scrub_core_ref(class.spec.infrastructure.ref_.as_mut());
        scrub_core_ref(class.spec.control_plane.ref_.as_mut());
        set_ref_namespace(class.spec.infrastructure.ref_.as_mut(), &namespace);
        set_ref_namespace(class.spec.control_plane.ref_.as_mut(), &namespace);
        if let Some(template) = class.spec.control_plane.machine_infrastructure.as_mut() {
            scrub_core_ref(template.ref_.as_mut());
            set_ref_namespace(template.ref_.as_mut(), &namespace);
        }
        for worker in &mut class.spec.workers.machine_deployments {
            scrub_core_ref(worker.template.bootstrap.ref_.as_mut());
            scrub_core_ref(worker.template.infrastructure.ref_.as_mut());
            set_ref_namespace(worker.template.bootstrap.ref_.as_mut(), &namespace);
            set_ref_namespace(worker.template.infrastructure.ref_.as_mut(), &namespace);
        }
    }

    fn hub_cluster_class_fuzzer(class: &mut v1beta1::ClusterClass, _: &mut StdRng) {
        let namespace = class.metadata.namespace.clone().unwrap_or_default();
        set_hub_ref_namespace(class.spec.infrastructure.ref_.as_mut(), &namespace);
        set_hub_ref_namespace(class.spec.control_plane.ref_.as_mut(), &namespace);
        if let Some(template) = class.spec.control_plane.machine_infrastructure.as_mut() {
            set_hub_ref_namespace(template.ref_.as_mut(), &namespace);
        }
        for worker in &mut class.spec.workers.machine_deployments {
            set_hub_ref_namespace(worker.template.bootstrap.ref_.as_mut(), &namespace);
            set_hub_ref_namespace(worker.template.infrastructure.ref_.as_mut(), &namespace);
        }
    }

    #[test]
    fn test_fuzz_cluster() {
        let input = FuzzTestInput::<v1beta1::Cluster, Cluster> {
            hub_fuzzers: vec![hub_cluster_fuzzer],
            spoke_fuzzers: vec![cluster_fuzzer],
            ..Default::default()
        };
        let result = fuzz_round_trip(&input);
        assert!(result.is_ok(), "cluster round trip failed: {}", result.unwrap_err());
    }

    #[test]
    fn test_fuzz_machine() {
        let input = FuzzTestInput::<v1beta1::Machine, Machine> {
            hub_fuzzers: vec![hub_machine_fuzzer],
            spoke_fuzzers: vec![machine_fuzzer],
            ..Default::default()
        };
        let result = fuzz_round_trip(&input);
        assert!(result.is_ok(), "machine round trip failed: {}", result.unwrap_err());
    }

    #[test]
    fn test_fuzz_machine_set() {
        let input = FuzzTestInput::<v1beta1::MachineSet, MachineSet> {
            hub_fuzzers: vec![hub_machine_set_fuzzer],
            spoke_fuzzers: vec![machine_set_fuzzer],
            ..Default::default()
        };
        let result = fuzz_round_trip(&input);
        assert!(result.is_ok(), "machine set round trip failed: {}", result.unwrap_err());
    }

    #[test]
    fn test_fuzz_machine_deployment() {
        let input = FuzzTestInput::<v1beta1::MachineDeployment, MachineDeployment> {
            hub_fuzzers: vec![hub_machine_deployment_fuzzer],
            spoke_fuzzers: vec![machine_deployment_fuzzer],
            ..Default::default()
        };
        let result = fuzz_round_trip(&input);
        assert!(result.is_ok(), "machine deployment round trip failed: {}", result.unwrap_err());
    }

    #[test]
    fn test_fuzz_machine_health_check() {
        let input = FuzzTestInput::<v1beta1::MachineHealthCheck, MachineHealthCheck> {
            spoke_fuzzers: vec![machine_health_check_fuzzer],
            ..Default::default()
        };
        let result = fuzz_round_trip(&input);
        assert!(result.is_ok(), "machine health check round trip failed: {}", result.unwrap_err());
    }

    #[test]
    fn test_fuzz_machine_pool() {
        let input = FuzzTestInput::<v1beta1::MachinePool, MachinePool> {
            hub_fuzzers: vec![hub_machine_pool_fuzzer],
            spoke_fuzzers: vec![machine_pool_fuzzer],
            ..Default::default()
        };
        let result = fuzz_round_trip(&input);
        assert!(result.is_ok(), "machine pool round trip failed: {}", result.unwrap_err());
    }

    #[test]
    fn test_fuzz_cluster_class() {
        let input = FuzzTestInput::<v1beta1::ClusterClass, ClusterClass> {
            hub_fuzzers: vec![hub_cluster_class_fuzzer],
            spoke_fuzzers: vec![cluster_class_fuzzer],
            ..Default::default()
        };
        let result = fuzz_round_trip(&input);
        assert!(result.is_ok(), "cluster class round trip failed: {}", result.unwrap_err());
    }

    #[test]
    fn test_ref_namespace_repair_is_nil_tolerant_and_idempotent() {
        set_ref_namespace(None, &Some("ns1".to_owned()));

        let mut reference = CoreObjectReference {
            name: Some("infra".to_owned()),
            ..Default::default()
        };
        set_ref_namespace(Some(&mut reference), &Some("ns1".to_owned()));
        assert_eq!(reference.namespace.as_deref(), Some("ns1"));
        set_ref_namespace(Some(&mut reference), &Some("ns1".to_owned()));
        assert_eq!(reference.namespace.as_deref(), Some("ns1"), "repair must be idempotent");
    }

    #[test]
    fn test_machine_set_template_refs_get_owner_namespace() {
        let mut machine_set = MachineSet::default();
        machine_set.metadata.namespace = Some("ns1".to_owned());
        machine_set.spec.template.spec.bootstrap.config_ref = Some(CoreObjectReference {
            kind: Some("BootstrapConfig".to_owned()),
            name: Some("worker".to_owned()),
            namespace: Some("other".to_owned()),
            ..Default::default()
        });
        machine_set.spec.template.spec.infrastructure_ref = CoreObjectReference {
            kind: Some("InfraTemplate".to_owned()),
            name: Some("worker".to_owned()),
            ..Default::default()
        };

        let mut hub = v1beta1::MachineSet::default();
        machine_set.convert_to(&mut hub).expect("conversion to hub failed");

        let config_ref = hub.spec.template.spec.bootstrap.config_ref.as_ref().unwrap();
        assert_eq!(config_ref.namespace, "ns1", "stale namespace must be repaired");
        assert_eq!(hub.spec.template.spec.infrastructure_ref.namespace, "ns1");

        let mut back = MachineSet::default();
        back.convert_from(&hub).expect("conversion from hub failed");
        assert_eq!(
            back.spec.template.spec.infrastructure_ref.namespace.as_deref(),
            Some("ns1")
        );
    }

    #[test]
    fn test_transient_reference_fields_are_dropped() {
        let mut cluster = Cluster::default();
        cluster.metadata.namespace = Some("default".to_owned());
        cluster.spec.infrastructure_ref = Some(CoreObjectReference {
            kind: Some("InfraCluster".to_owned()),
            name: Some("prod".to_owned()),
            namespace: Some("default".to_owned()),
            field_path: Some("spec.foo".to_owned()),
            resource_version: Some("42".to_owned()),
            uid: Some("aaaa-bbbb".to_owned()),
            ..Default::default()
        });

        let mut hub = v1beta1::Cluster::default();
        cluster.convert_to(&mut hub).expect("conversion to hub failed");
        let mut back = Cluster::default();
        back.convert_from(&hub).expect("conversion from hub failed");

        let reference = back.spec.infrastructure_ref.unwrap();
        assert_eq!(reference.field_path, None);
        assert_eq!(reference.resource_version, None);
        assert_eq!(reference.uid, None);
        assert_eq!(reference.kind.as_deref(), Some("InfraCluster"));
        assert_eq!(reference.name.as_deref(), Some("prod"));
    }

    #[test]
    fn test_cluster_class_worker_refs_get_owner_namespace() {
        let worker_template = |kind: &str| LocalObjectTemplate {
            ref_: Some(CoreObjectReference {
                kind: Some(kind.to_owned()),
                name: Some("workers".to_owned()),
                ..Default::default()
            }),
        };
        let mut class = ClusterClass::default();
        class.metadata.namespace = Some("ns1".to_owned());
        class.spec.workers.machine_deployments = vec![
            MachineDeploymentClass {
                class: "small".to_owned(),
                template: MachineDeploymentClassTemplate {
                    metadata: ObjectMeta::default(),
                    bootstrap: worker_template("BootstrapTemplate"),
                    infrastructure: worker_template("InfraMachineTemplate"),
                },
            },
            MachineDeploymentClass {
                class: "large".to_owned(),
                template: MachineDeploymentClassTemplate {
                    metadata: ObjectMeta::default(),
                    bootstrap: worker_template("BootstrapTemplate"),
                    infrastructure: worker_template("InfraMachineTemplate"),
                },
            },
        ];

        let mut hub = v1beta1::ClusterClass::default();
        class.convert_to(&mut hub).expect("conversion to hub failed");
        for worker in &hub.spec.workers.machine_deployments {
            let bootstrap = worker.template.bootstrap.ref_.as_ref().unwrap();
            let infrastructure = worker.template.infrastructure.ref_.as_ref().unwrap();
            assert_eq!(bootstrap.namespace, "ns1", "every list element gets the owner namespace");
            assert_eq!(infrastructure.namespace, "ns1");
        }
    }

    #[test]
    fn test_absent_and_empty_conditions_stay_distinct() {
        let mut absent = Cluster::default();
        absent.metadata.namespace = Some("default".to_owned());
        absent.status = Some(ClusterStatus::default());

        let mut empty = absent.clone();
        empty.status.as_mut().unwrap().conditions = Some(Vec::new());

        for (cluster, expected) in [(&absent, None), (&empty, Some(0usize))] {
            let mut hub = v1beta1::Cluster::default();
            cluster.convert_to(&mut hub).expect("conversion to hub failed");
            let mut back = Cluster::default();
            back.convert_from(&hub).expect("conversion from hub failed");
            let lengths = back.status.unwrap().conditions.map(|list| list.len());
            assert_eq!(lengths, expected, "condition list presence must survive the hub");
        }
    }

    #[test]
    fn test_malformed_node_startup_timeout_fails_mapping() {
        let mut check = MachineHealthCheck::default();
        check.spec.node_startup_timeout = Some("90m".to_owned());

        let mut hub = v1beta1::MachineHealthCheck::default();
        let err = check.convert_to(&mut hub).unwrap_err();
        match err {
            ConversionError::MappingFailed(message) => {
                assert!(message.contains("90m"), "error should cite the bad value: {}", message)
            }
        }
    }

    #[test]
    fn test_machine_status_version_is_dropped() {
        let mut machine = Machine::default();
        machine.status = Some(MachineStatus {
            version: Some("v1.22.0".to_owned()),
            ..Default::default()
        });

        let mut hub = v1beta1::Machine::default();
        machine.convert_to(&mut hub).expect("conversion to hub failed");
        let mut back = Machine::default();
        back.convert_from(&hub).expect("conversion from hub failed");
        assert_eq!(back.status.unwrap().version, None, "status version has no hub field");
    }
}
