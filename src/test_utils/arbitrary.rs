use proptest::prelude::*;

use crate::cluster::OperationType;
use crate::test_utils::fixtures::ClusterFixture;

/// Any known operation type.
pub fn arb_operation_type() -> impl Strategy<Value = OperationType> {
    prop::sample::select(OperationType::ALL.to_vec())
}

/// Global (empty) or one of the fixture's projects.
pub fn arb_project() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "default", ClusterFixture::PROJECT])
}

/// Short UUID-like identifiers so collisions are likely.
pub fn arb_uuid() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f0-9]{1,2}-[a-f0-9]{1,2}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn operation_type_code_roundtrip(op_type in arb_operation_type()) {
        prop_assert_eq!(OperationType::from_code(op_type.code()), Some(op_type));
        prop_assert_eq!(op_type.name().parse::<OperationType>().unwrap(), op_type);
    }

    #[test]
    fn last_create_wins(
        writes in prop::collection::vec((arb_project(), arb_uuid(), arb_operation_type()), 1..12),
    ) {
        let fx = ClusterFixture::new();
        for (project, uuid, op_type) in &writes {
            fx.on_node_a(|tx| tx.create_operation(project, uuid, *op_type)).unwrap();
        }

        let mut expected = std::collections::HashMap::new();
        for (_, uuid, op_type) in &writes {
            expected.insert(uuid.clone(), *op_type);
        }

        prop_assert_eq!(fx.operation_count() as usize, expected.len());
        for (uuid, op_type) in expected {
            let op = fx.on_node_b(|tx| tx.get_operation_by_uuid(&uuid)).unwrap();
            prop_assert_eq!(op.op_type, op_type);
            prop_assert_eq!(op.node_address.as_str(), ClusterFixture::NODE_A_ADDRESS);
        }
    }
}
