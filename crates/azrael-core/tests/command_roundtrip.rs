// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]

use azrael_core::{BodyId, BodyPatch, Command, TemplateId};
use proptest::prelude::*;

fn finite_component() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("finite and bounded", |v| v.is_finite() && v.abs() < 1.0e4)
}

fn patch_strategy() -> impl Strategy<Value = BodyPatch> {
    (
        proptest::option::of((finite_component(), finite_component(), finite_component())),
        proptest::option::of(finite_component()),
    )
        .prop_map(|(position, inv_mass)| BodyPatch {
            position: position.map(|(x, y, z)| [x, y, z]),
            inv_mass,
            ..BodyPatch::default()
        })
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        (any::<u64>(), patch_strategy())
            .prop_map(|(id, patch)| Command::SetBody { body_id: BodyId::new(id), patch }),
        any::<u64>().prop_map(|id| Command::Remove { body_id: BodyId::new(id) }),
        patch_strategy().prop_map(|overrides| Command::Spawn {
            template: TemplateId::new("unit_sphere"),
            overrides,
        }),
    ]
}

proptest! {
    #[test]
    fn command_survives_a_json_round_trip(command in command_strategy()) {
        let encoded = serde_json::to_string(&command).expect("command serializes");
        let decoded: Command = serde_json::from_str(&encoded).expect("command deserializes");
        prop_assert_eq!(decoded, command);
    }
}
