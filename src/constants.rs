pub const API_GROUP: &str = "cluster.wheelhouse.dev";
pub const HUB_VERSION: &str = "v1beta1";
pub const CRD_FILEPATH: &str = "crds.yaml";
