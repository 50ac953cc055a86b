//! Integration tests for saving and restoring full object snapshots

use perch_shared::{Replica, Replicated, ReplicationError, Vec2};
use perch_test::{protocol, Avatar, Barrel};

#[test]
fn snapshot_restores_every_attribute() {
    let protocol = protocol();
    let mut avatar = Avatar::new("ada", Vec2::new(12.0, -4.0));
    avatar.health.set(61);
    avatar.body.set_velocity(Vec2::new(3.0, 1.0));
    let original = protocol.object_kinds.replicate(avatar).unwrap();
    let bytes = original.save_snapshot();

    let net_id = protocol
        .object_kinds
        .net_id(&original.kind())
        .expect("avatar is registered");
    let mut restored = protocol.object_kinds.create(net_id).unwrap();
    restored.load_snapshot(&bytes).unwrap();

    let avatar = restored
        .as_any()
        .downcast_ref::<Replicated<Avatar>>()
        .unwrap()
        .object();
    assert_eq!(*avatar.name, "ada");
    assert_eq!(*avatar.health, 61);
    assert_eq!(avatar.body.position(), Vec2::new(12.0, -4.0));
    assert_eq!(avatar.body.velocity(), Vec2::new(3.0, 1.0));
    assert_eq!(restored.save_snapshot(), bytes);
}

#[test]
fn local_attributes_are_persisted() {
    let protocol = protocol();
    let mut barrel = Barrel::new(Vec2::ZERO);
    barrel.label.set("apples".to_string());
    let original = protocol.object_kinds.replicate(barrel).unwrap();

    let mut restored = protocol.object_kinds.replicate(Barrel::default()).unwrap();
    restored.load_snapshot(&original.save_snapshot()).unwrap();

    assert_eq!(*restored.object().label, "apples");
}

#[test]
fn loaded_snapshot_becomes_the_diff_baseline() {
    let protocol = protocol();
    let original = protocol
        .object_kinds
        .replicate(Avatar::new("ada", Vec2::ZERO))
        .unwrap();

    let mut restored = protocol.object_kinds.replicate(Avatar::default()).unwrap();
    restored.load_snapshot(&original.save_snapshot()).unwrap();

    assert!(restored.is_synchronized());
    assert!(restored.changed_indices().is_empty());
}

#[test]
fn truncated_snapshot_is_rejected() {
    let protocol = protocol();
    let original = protocol
        .object_kinds
        .replicate(Avatar::new("ada", Vec2::ZERO))
        .unwrap();
    let bytes = original.save_snapshot();

    let mut restored = protocol.object_kinds.replicate(Avatar::default()).unwrap();
    let result = restored.load_snapshot(&bytes[..bytes.len() / 2]);

    assert!(matches!(result, Err(ReplicationError::Serde(_))));
}
