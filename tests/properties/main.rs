//! Property tests for directory visibility and removal.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use opdir::cluster::OperationType;
use opdir::test_utils::fixtures::ClusterFixture;

/// Where a generated operation lives: which node, and under which project.
#[derive(Debug, Clone, Copy)]
enum Owner {
    A,
    B,
    C,
}

impl Owner {
    const fn address(self) -> &'static str {
        match self {
            Self::A => ClusterFixture::NODE_A_ADDRESS,
            Self::B => ClusterFixture::NODE_B_ADDRESS,
            Self::C => ClusterFixture::NODE_C_ADDRESS,
        }
    }
}

fn arb_owner() -> impl Strategy<Value = Owner> {
    prop_oneof![Just(Owner::A), Just(Owner::B), Just(Owner::C)]
}

fn arb_project() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "default", ClusterFixture::PROJECT])
}

fn arb_operation_type() -> impl Strategy<Value = OperationType> {
    prop::sample::select(OperationType::ALL.to_vec())
}

type Registration = (Owner, &'static str, String, OperationType);

fn arb_writes() -> impl Strategy<Value = Vec<Registration>> {
    prop::collection::vec(
        (
            arb_owner(),
            arb_project(),
            "[a-f0-9]{1,2}",
            arb_operation_type(),
        ),
        0..16,
    )
}

fn apply(
    fx: &ClusterFixture,
    writes: &[Registration],
) -> HashMap<String, (Owner, &'static str, OperationType)> {
    let mut latest = HashMap::new();
    for (owner, project, uuid, op_type) in writes {
        let result = match owner {
            Owner::A => fx.on_node_a(|tx| tx.create_operation(project, uuid, *op_type)),
            Owner::B => fx.on_node_b(|tx| tx.create_operation(project, uuid, *op_type)),
            Owner::C => fx.on_node_c(|tx| tx.create_operation(project, uuid, *op_type)),
        };
        result.unwrap();
        latest.insert(uuid.clone(), (*owner, *project, *op_type));
    }
    latest
}

fn visible_in(project: &str, scope: &str) -> bool {
    scope.is_empty() || scope == project
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn node_addresses_match_model(writes in arb_writes(), project in arb_project()) {
        let fx = ClusterFixture::new();
        let latest = apply(&fx, &writes);

        let expected: BTreeSet<&str> = latest
            .values()
            .filter(|(_, scope, _)| visible_in(project, scope))
            .map(|(owner, _, _)| owner.address())
            .collect();
        let actual = fx.on_node_a(|tx| tx.nodes_with_operations(project)).unwrap();

        prop_assert_eq!(actual, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn by_type_matches_model(
        writes in arb_writes(),
        project in arb_project(),
        op_type in arb_operation_type(),
    ) {
        let fx = ClusterFixture::new();
        let latest = apply(&fx, &writes);

        let expected: BTreeSet<&str> = latest
            .iter()
            .filter(|(_, (_, scope, kind))| *kind == op_type && visible_in(project, scope))
            .map(|(uuid, _)| uuid.as_str())
            .collect();
        let actual = fx.on_node_b(|tx| tx.operations_of_type(project, op_type)).unwrap();

        prop_assert!(actual.iter().all(|op| op.op_type == op_type));
        let uuids: BTreeSet<&str> = actual.iter().map(|op| op.uuid.as_str()).collect();
        prop_assert_eq!(uuids, expected);
        prop_assert!(actual.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn local_listing_partitions_rows(writes in arb_writes()) {
        let fx = ClusterFixture::new();
        let latest = apply(&fx, &writes);

        let a = fx.on_node_a(|tx| tx.local_operation_uuids()).unwrap();
        let b = fx.on_node_b(|tx| tx.local_operation_uuids()).unwrap();
        let c = fx.on_node_c(|tx| tx.local_operation_uuids()).unwrap();

        prop_assert_eq!(a.len() + b.len() + c.len(), latest.len());
        for uuid in &a {
            prop_assert!(matches!(latest[uuid].0, Owner::A));
        }
    }

    #[test]
    fn purge_only_touches_one_node(writes in arb_writes()) {
        let fx = ClusterFixture::new();
        let latest = apply(&fx, &writes);
        let owned_by_b = latest.values().filter(|(owner, _, _)| matches!(owner, Owner::B)).count();

        let removed = fx.on_node_a(|tx| tx.remove_node_operations(fx.node_b)).unwrap();

        prop_assert_eq!(removed, owned_by_b);
        prop_assert!(fx.on_node_b(|tx| tx.local_operations()).unwrap().is_empty());
        prop_assert_eq!(fx.operation_count() as usize, latest.len() - owned_by_b);
    }
}
