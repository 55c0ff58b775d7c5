use k8s_openapi::api::core::v1::ObjectReference as CoreObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta, OwnerReference};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;

/// Deterministic structural generation of a value from a seeded rng.
///
/// Every API type that takes part in a round-trip test implements this,
/// usually through the `impl_fuzz!` macro. For a fixed seed the produced
/// value sequence is identical across runs, which keeps harness failures
/// reproducible.
pub trait Fuzz {
    fn fuzz(rng: &mut StdRng) -> Self;
}

/// Implements `Fuzz` for a struct by fuzzing every named field. The struct
/// literal is exhaustive, so adding a field to the type without updating the
/// fuzzer is a compile error.
#[macro_export]
macro_rules! impl_fuzz {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::util::fuzz::Fuzz for $ty {
            fn fuzz(rng: &mut ::rand::rngs::StdRng) -> Self {
                Self {
                    $($field: $crate::util::fuzz::Fuzz::fuzz(rng)),*
                }
            }
        }
    };
}

impl Fuzz for String {
    fn fuzz(rng: &mut StdRng) -> Self {
        let len = rng.gen_range(1..12);
        (0..len)
            .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
            .collect()
    }
}

impl Fuzz for bool {
    fn fuzz(rng: &mut StdRng) -> Self {
        rng.gen()
    }
}

impl Fuzz for i32 {
    fn fuzz(rng: &mut StdRng) -> Self {
        rng.gen_range(0..=1024)
    }
}

impl Fuzz for i64 {
    fn fuzz(rng: &mut StdRng) -> Self {
        rng.gen_range(0..=1_000_000)
    }
}

impl<T: Fuzz> Fuzz for Option<T> {
    fn fuzz(rng: &mut StdRng) -> Self {
        if rng.gen() {
            Some(T::fuzz(rng))
        } else {
            None
        }
    }
}

impl<T: Fuzz> Fuzz for Vec<T> {
    fn fuzz(rng: &mut StdRng) -> Self {
        let len = rng.gen_range(0..3);
        (0..len).map(|_| T::fuzz(rng)).collect()
    }
}

impl Fuzz for BTreeMap<String, String> {
    fn fuzz(rng: &mut StdRng) -> Self {
        let len = rng.gen_range(0..3);
        (0..len)
            .map(|_| (String::fuzz(rng), String::fuzz(rng)))
            .collect()
    }
}

impl_fuzz!(CoreObjectReference {
    api_version,
    field_path,
    kind,
    name,
    namespace,
    resource_version,
    uid,
});

impl_fuzz!(OwnerReference {
    api_version,
    block_owner_deletion,
    controller,
    kind,
    name,
    uid,
});

impl Fuzz for ObjectMeta {
    fn fuzz(rng: &mut StdRng) -> Self {
        // Server-populated bookkeeping (uid, resourceVersion, managedFields,
        // timestamps) stays unset: it is not part of the conversion contract.
        ObjectMeta {
            name: Fuzz::fuzz(rng),
            namespace: Fuzz::fuzz(rng),
            labels: Fuzz::fuzz(rng),
            annotations: Fuzz::fuzz(rng),
            ..Default::default()
        }
    }
}

impl Fuzz for LabelSelector {
    fn fuzz(rng: &mut StdRng) -> Self {
        LabelSelector {
            match_labels: Fuzz::fuzz(rng),
            match_expressions: None,
        }
    }
}
