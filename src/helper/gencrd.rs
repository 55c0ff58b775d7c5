use crate::api::{v1alpha3, v1alpha4, v1beta1};
use crate::constants::{CRD_FILEPATH, HUB_VERSION};
use argh::FromArgs;
use kube::core::crd::merge_crds;
use kube::CustomResourceExt;
use std::fs;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "gencrd")]
/// Generate multi-version crd yaml
pub struct Args {
    /// file to write yaml to
    #[argh(option, short = 'f')]
    pub file: Option<String>,
}

pub fn run(args: Args) {
    // One definition per kind, all served versions merged, hub stored.
    let families = vec![
        vec![
            v1alpha3::Cluster::crd(),
            v1alpha4::Cluster::crd(),
            v1beta1::Cluster::crd(),
        ],
        vec![
            v1alpha3::Machine::crd(),
            v1alpha4::Machine::crd(),
            v1beta1::Machine::crd(),
        ],
        vec![
            v1alpha3::MachineSet::crd(),
            v1alpha4::MachineSet::crd(),
            v1beta1::MachineSet::crd(),
        ],
        vec![
            v1alpha3::MachineDeployment::crd(),
            v1alpha4::MachineDeployment::crd(),
            v1beta1::MachineDeployment::crd(),
        ],
        vec![
            v1alpha3::MachineHealthCheck::crd(),
            v1alpha4::MachineHealthCheck::crd(),
            v1beta1::MachineHealthCheck::crd(),
        ],
        vec![v1alpha4::ClusterClass::crd(), v1beta1::ClusterClass::crd()],
        vec![v1alpha4::MachinePool::crd(), v1beta1::MachinePool::crd()],
    ];

    let mut documents = Vec::new();
    for versions in families {
        let merged = merge_crds(versions, HUB_VERSION).expect("Could not merge crd versions");
        documents.push(
            serde_yaml::to_string(&merged).expect("Could not generate yaml from CRD definition"),
        );
    }

    let filepath = args.file.unwrap_or(CRD_FILEPATH.to_string());
    fs::write(filepath, documents.join("---\n")).expect("Unable to write crd yaml");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::API_GROUP;

    #[test]
    fn test_merged_crd_serves_all_versions_and_stores_the_hub() {
        let merged = merge_crds(
            vec![
                v1alpha3::Cluster::crd(),
                v1alpha4::Cluster::crd(),
                v1beta1::Cluster::crd(),
            ],
            HUB_VERSION,
        )
        .expect("merging the cluster crd versions failed");

        assert_eq!(merged.spec.group, API_GROUP);
        assert_eq!(merged.spec.versions.len(), 3);
        let stored: Vec<&str> = merged
            .spec
            .versions
            .iter()
            .filter(|version| version.storage)
            .map(|version| version.name.as_str())
            .collect();
        assert_eq!(stored, vec![HUB_VERSION], "exactly the hub version is stored");
    }
}
