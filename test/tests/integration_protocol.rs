//! Integration tests for object kind registration

use perch_shared::{ObjectKind, PropertyRegistry, Protocol, ProtocolError, RegistryError};
use perch_test::{outdated_protocol, protocol, Avatar, Barrel};

#[test]
fn net_ids_follow_registration_order() {
    let protocol = protocol();
    let kinds = &protocol.object_kinds;

    assert_eq!(kinds.len(), 2);
    assert_eq!(kinds.net_id(&ObjectKind::of::<Avatar>()), Some(0));
    assert_eq!(kinds.net_id(&ObjectKind::of::<Barrel>()), Some(1));
    assert_eq!(kinds.kind_from_net_id(1), Ok(ObjectKind::of::<Barrel>()));
    assert_eq!(kinds.name(&ObjectKind::of::<Avatar>()), Some("Avatar"));
}

#[test]
fn locked_protocol_refuses_new_kinds() {
    let mut protocol = protocol();
    assert!(protocol.is_locked());

    let result = protocol
        .try_add_object(Avatar::registry(), Avatar::default)
        .map(|_| ());
    assert_eq!(result, Err(ProtocolError::AlreadyLocked));
    assert_eq!(protocol.try_lock(), Err(ProtocolError::AlreadyLocked));
}

#[test]
#[should_panic]
fn adding_to_a_locked_protocol_panics() {
    let mut protocol = protocol();
    protocol.add_object(Barrel::registry(), Barrel::default);
}

#[test]
fn registering_a_kind_twice_fails() {
    let mut protocol = Protocol::builder();
    protocol
        .try_add_object(Avatar::registry(), Avatar::default)
        .unwrap();

    let result = protocol
        .try_add_object(Avatar::registry(), Avatar::default)
        .map(|_| ());
    assert!(matches!(result, Err(ProtocolError::DuplicateKind { .. })));
}

#[test]
fn unregistered_kind_cannot_be_replicated() {
    let mut protocol = Protocol::builder();
    protocol.add_object(Barrel::registry(), Barrel::default);
    protocol.lock();

    let result = protocol.object_kinds.replicate(Avatar::default()).map(|_| ());
    assert!(matches!(result, Err(ProtocolError::UnknownKind { .. })));
    assert_eq!(
        protocol.object_kinds.create(5).map(|_| ()),
        Err(ProtocolError::UnknownNetId { net_id: 5 })
    );
}

#[test]
fn fingerprint_tracks_layout_not_values() {
    let current = protocol();
    let outdated = outdated_protocol();
    let avatar = ObjectKind::of::<Avatar>();

    assert_eq!(
        current.object_kinds.fingerprint(&avatar),
        Some(Avatar::registry().fingerprint())
    );
    assert_ne!(
        current.object_kinds.fingerprint(&avatar),
        outdated.object_kinds.fingerprint(&avatar)
    );
}

#[test]
fn network_attributes_come_first() {
    let registry = Avatar::registry();

    assert_eq!(registry.network_count(), 5);
    assert_eq!(registry.last_network_index(), Some(4));
    let names: Vec<&str> = registry
        .descriptors()
        .iter()
        .map(|descriptor| descriptor.name())
        .collect();
    assert_eq!(
        names,
        vec![
            "body.size",
            "body.weight",
            "body.collides",
            "name",
            "health",
            "body.position",
            "body.velocity",
        ]
    );
}

#[test]
fn duplicate_attribute_names_are_rejected() {
    let result = PropertyRegistry::<Avatar>::builder("Avatar")
        .network("name", |avatar: &Avatar| &avatar.name, |avatar: &mut Avatar| &mut avatar.name)
        .local("name", |avatar: &Avatar| &avatar.name, |avatar: &mut Avatar| &mut avatar.name)
        .build()
        .map(|_| ());

    assert_eq!(
        result,
        Err(RegistryError::DuplicateAttribute {
            kind: "Avatar",
            name: "name",
        })
    );
}
