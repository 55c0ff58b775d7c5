pub mod v1alpha3;
pub mod v1alpha4;
pub mod v1beta1;
