use crate::util::error::Result;
use crate::util::fuzz::Fuzz;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// Marker for the canonical schema version of a kind. Hub types never
/// convert to another hub; they are the fixed point of the conversion graph.
pub trait Hub {}

/// Capability of a spoke type: conversion to and from its hub, mutating a
/// destination object supplied by the caller. Adapters never mutate their
/// input and add no error kinds beyond the mapping failures they surface.
pub trait Convertible {
    type Hub: Hub;

    fn convert_to(&self, dst: &mut Self::Hub) -> Result<()>;
    fn convert_from(&mut self, src: &Self::Hub) -> Result<()>;
}

/// A loss-policy normalization applied to a freshly fuzzed object before it
/// is used as a round-trip baseline. Forces exactly the fields known to be
/// unrepresentable in the other version to their zero value.
pub type FuzzerFunc<T> = fn(&mut T, &mut StdRng);

/// Configuration for one differential fuzz run. Explicit and immutable:
/// there is no global policy registry.
pub struct FuzzTestInput<H, S> {
    pub iterations: usize,
    pub seed: u64,
    pub hub_fuzzers: Vec<FuzzerFunc<H>>,
    pub spoke_fuzzers: Vec<FuzzerFunc<S>>,
    /// Applied to the converted-back spoke before comparison, for fields
    /// that can never survive a hub hop in this direction.
    pub spoke_after_mutation: Option<fn(&mut S)>,
}

impl<H, S> Default for FuzzTestInput<H, S> {
    fn default() -> Self {
        FuzzTestInput {
            iterations: 1000,
            seed: 0x5eed,
            hub_fuzzers: Vec::new(),
            spoke_fuzzers: Vec::new(),
            spoke_after_mutation: None,
        }
    }
}

#[derive(Debug)]
pub enum RoundTripFailure {
    Conversion {
        direction: &'static str,
        iteration: usize,
        seed: u64,
        message: String,
    },
    Mismatch {
        direction: &'static str,
        iteration: usize,
        seed: u64,
        paths: Vec<String>,
        before: String,
        after: String,
    },
}

impl std::fmt::Display for RoundTripFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundTripFailure::Conversion {
                direction,
                iteration,
                seed,
                message,
            } => f.write_fmt(format_args!(
                "{} conversion failed (iteration {}, seed {}): {}",
                direction, iteration, seed, message
            )),
            RoundTripFailure::Mismatch {
                direction,
                iteration,
                seed,
                paths,
                before,
                after,
            } => f.write_fmt(format_args!(
                "{} round trip mismatch (iteration {}, seed {}) at: {}\nbefore: {}\nafter:  {}",
                direction,
                iteration,
                seed,
                paths.join(", "),
                before,
                after
            )),
        }
    }
}

/// Drives randomized hub→spoke→hub and spoke→hub→spoke cycles and checks
/// structural equality against the policy-normalized original. Any mismatch
/// is a conversion-design bug, not a flaky test; the failure names the
/// differing field paths so the adapter or the policy set can be fixed.
pub fn fuzz_round_trip<H, S>(input: &FuzzTestInput<H, S>) -> std::result::Result<(), RoundTripFailure>
where
    H: Hub + Fuzz + Default + Clone + PartialEq + Debug + Serialize,
    S: Convertible<Hub = H> + Fuzz + Default + Clone + PartialEq + Debug + Serialize,
{
    let mut rng = StdRng::seed_from_u64(input.seed);
    for iteration in 0..input.iterations {
        hub_spoke_hub(input, iteration, &mut rng)?;
        spoke_hub_spoke(input, iteration, &mut rng)?;
    }
    Ok(())
}

fn hub_spoke_hub<H, S>(
    input: &FuzzTestInput<H, S>,
    iteration: usize,
    rng: &mut StdRng,
) -> std::result::Result<(), RoundTripFailure>
where
    H: Hub + Fuzz + Default + Clone + PartialEq + Debug + Serialize,
    S: Convertible<Hub = H> + Fuzz + Default + Clone + PartialEq + Debug + Serialize,
{
    const DIRECTION: &str = "hub-spoke-hub";

    let mut hub_before = H::fuzz(rng);
    for normalize in &input.hub_fuzzers {
        normalize(&mut hub_before, rng);
    }

    let mut spoke = S::default();
    spoke
        .convert_from(&hub_before)
        .map_err(|err| conversion_failure(DIRECTION, iteration, input.seed, err))?;
    let mut hub_after = H::default();
    spoke
        .convert_to(&mut hub_after)
        .map_err(|err| conversion_failure(DIRECTION, iteration, input.seed, err))?;

    compare(DIRECTION, iteration, input.seed, &hub_before, &hub_after)
}

fn spoke_hub_spoke<H, S>(
    input: &FuzzTestInput<H, S>,
    iteration: usize,
    rng: &mut StdRng,
) -> std::result::Result<(), RoundTripFailure>
where
    H: Hub + Fuzz + Default + Clone + PartialEq + Debug + Serialize,
    S: Convertible<Hub = H> + Fuzz + Default + Clone + PartialEq + Debug + Serialize,
{
    const DIRECTION: &str = "spoke-hub-spoke";

    let mut spoke_before = S::fuzz(rng);
    for normalize in &input.spoke_fuzzers {
        normalize(&mut spoke_before, rng);
    }

    let mut hub = H::default();
    spoke_before
        .convert_to(&mut hub)
        .map_err(|err| conversion_failure(DIRECTION, iteration, input.seed, err))?;
    let mut spoke_after = S::default();
    spoke_after
        .convert_from(&hub)
        .map_err(|err| conversion_failure(DIRECTION, iteration, input.seed, err))?;
    if let Some(mutate) = input.spoke_after_mutation {
        mutate(&mut spoke_after);
    }

    compare(DIRECTION, iteration, input.seed, &spoke_before, &spoke_after)
}

fn conversion_failure<E: std::fmt::Display>(
    direction: &'static str,
    iteration: usize,
    seed: u64,
    err: E,
) -> RoundTripFailure {
    RoundTripFailure::Conversion {
        direction,
        iteration,
        seed,
        message: format!("{}", err),
    }
}

fn compare<T: PartialEq + Serialize>(
    direction: &'static str,
    iteration: usize,
    seed: u64,
    before: &T,
    after: &T,
) -> std::result::Result<(), RoundTripFailure> {
    if before == after {
        return Ok(());
    }
    let before_value = serde_json::to_value(before).unwrap_or(Value::Null);
    let after_value = serde_json::to_value(after).unwrap_or(Value::Null);
    let paths = diff_paths(&before_value, &after_value);
    log::debug!(
        "{} mismatch in iteration {} at {}",
        direction,
        iteration,
        paths.join(", ")
    );
    Err(RoundTripFailure::Mismatch {
        direction,
        iteration,
        seed,
        paths,
        before: before_value.to_string(),
        after: after_value.to_string(),
    })
}

/// Field paths at which two JSON documents differ, dotted for object keys
/// and indexed for arrays.
pub fn diff_paths(before: &Value, after: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    walk("", before, after, &mut paths);
    paths
}

fn walk(path: &str, before: &Value, after: &Value, out: &mut Vec<String>) {
    match (before, after) {
        (Value::Object(before_map), Value::Object(after_map)) => {
            let keys: std::collections::BTreeSet<&String> =
                before_map.keys().chain(after_map.keys()).collect();
            for key in keys {
                let b = before_map.get(key).unwrap_or(&Value::Null);
                let a = after_map.get(key).unwrap_or(&Value::Null);
                walk(&join(path, key), b, a, out);
            }
        }
        (Value::Array(before_items), Value::Array(after_items)) => {
            if before_items.len() != after_items.len() {
                out.push(format!("{}(length)", path));
                return;
            }
            for (index, (b, a)) in before_items.iter().zip(after_items.iter()).enumerate() {
                walk(&format!("{}[{}]", path, index), b, a, out);
            }
        }
        _ => {
            if before != after {
                out.push(if path.is_empty() {
                    ".".to_string()
                } else {
                    path.to_string()
                });
            }
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diff_paths_flags_changed_fields() {
        let before = json!({"spec": {"replicas": 3, "paused": false}, "status": null});
        let after = json!({"spec": {"replicas": 4, "paused": false}, "status": null});
        assert_eq!(
            diff_paths(&before, &after),
            vec!["spec.replicas".to_string()],
            "only the changed field should be reported"
        );
    }

    #[test]
    fn test_diff_paths_flags_missing_keys() {
        let before = json!({"spec": {"version": "v1.21.1"}});
        let after = json!({"spec": {}});
        assert_eq!(
            diff_paths(&before, &after),
            vec!["spec.version".to_string()],
            "a dropped field should be reported under its path"
        );
    }

    #[test]
    fn test_diff_paths_reports_array_elements() {
        let before = json!({"conditions": [{"type": "Ready"}, {"type": "Paused"}]});
        let after = json!({"conditions": [{"type": "Ready"}, {"type": "Degraded"}]});
        assert_eq!(
            diff_paths(&before, &after),
            vec!["conditions[1].type".to_string()],
            "the differing element should be reported with its index"
        );
    }

    #[test]
    fn test_diff_paths_reports_length_changes() {
        let before = json!({"conditions": []});
        let after = json!({"conditions": [{"type": "Ready"}]});
        assert_eq!(
            diff_paths(&before, &after),
            vec!["conditions(length)".to_string()],
            "a length change should be reported once"
        );
    }

    #[test]
    fn test_diff_paths_equal_documents() {
        let doc = json!({"spec": {"replicas": 3}, "items": [1, 2]});
        assert!(
            diff_paths(&doc, &doc).is_empty(),
            "equal documents should produce no paths"
        );
    }
}
