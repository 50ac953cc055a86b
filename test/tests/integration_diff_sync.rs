//! Integration tests for changed-attribute diffs between two copies of an
//! object

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use perch_shared::{
    BitReader, BitWrite, BitWriter, BoundedInteger, ObjectDiffSync, PropertyRegistry, ReplicationError,
    Serde, StreamWriter, Vec2,
};
use perch_test::{init_logger, Avatar};

struct Pair {
    registry: Arc<PropertyRegistry<Avatar>>,
    server: Avatar,
    server_sync: ObjectDiffSync<Avatar>,
    client: Avatar,
    client_sync: ObjectDiffSync<Avatar>,
}

/// Two avatars whose client copy was baselined from a full snapshot
fn baselined_pair() -> Pair {
    init_logger();
    let registry = Arc::new(Avatar::registry());

    let mut server = Avatar::new("ada", Vec2::new(3.0, 4.0));
    let server_sync = ObjectDiffSync::new(registry.clone(), &mut server);
    let mut client = Avatar::default();
    let mut client_sync = ObjectDiffSync::new(registry.clone(), &mut client);

    let mut writer = StreamWriter::new();
    server_sync.write_all(&server, &mut writer);
    let bytes = writer.to_bytes();
    client_sync
        .read_all(&mut client, &mut BitReader::new(&bytes))
        .expect("baseline applies");

    Pair {
        registry,
        server,
        server_sync,
        client,
        client_sync,
    }
}

fn snapshot(sync: &ObjectDiffSync<Avatar>, avatar: &Avatar) -> Vec<u8> {
    let mut writer = StreamWriter::new();
    sync.write_all(avatar, &mut writer);
    writer.to_bytes()
}

#[test]
fn mutating_one_attribute_sends_only_that_attribute() {
    let mut pair = baselined_pair();
    pair.server.health.set(75);

    let mut writer = BitWriter::new();
    let written = pair.server_sync.serialize(&pair.server, &mut writer).unwrap();
    assert_eq!(written, 1);

    let bytes = writer.to_bytes();
    let applied = pair
        .client_sync
        .deserialize(&mut pair.client, &mut BitReader::new(&bytes))
        .unwrap();

    assert_eq!(applied, vec![pair.registry.index_of("health").unwrap()]);
    assert_eq!(*pair.client.health, 75);
    assert_eq!(*pair.client.name, "ada");
}

#[test]
fn overflowed_writer_keeps_the_change_pending() {
    let mut pair = baselined_pair();
    pair.server.name.set("x".repeat(40));

    let mut cramped = BitWriter::with_max_bits(16);
    pair.server_sync.serialize(&pair.server, &mut cramped).unwrap();
    assert!(cramped.overflowed());
    assert!(!pair.server_sync.is_synchronized(&pair.server));

    let mut writer = BitWriter::new();
    assert_eq!(pair.server_sync.serialize(&pair.server, &mut writer).unwrap(), 1);
    let bytes = writer.to_bytes();
    pair.client_sync
        .deserialize(&mut pair.client, &mut BitReader::new(&bytes))
        .unwrap();
    assert_eq!(*pair.client.name, "x".repeat(40));
}

#[test]
fn second_serialize_without_mutation_is_empty() {
    let mut pair = baselined_pair();
    pair.server.name.set("grace".to_string());

    let mut first = BitWriter::new();
    assert_eq!(pair.server_sync.serialize(&pair.server, &mut first).unwrap(), 1);

    let mut second = BitWriter::new();
    assert_eq!(pair.server_sync.serialize(&pair.server, &mut second).unwrap(), 0);
    // count alone: five network attributes need three bits
    assert_eq!(second.bits_written(), 3);
}

#[test]
fn setting_the_same_value_is_not_a_change() {
    let mut pair = baselined_pair();
    pair.server.health.set(100);

    assert!(pair.server_sync.is_synchronized(&pair.server));
    let mut writer = BitWriter::new();
    assert_eq!(pair.server_sync.serialize(&pair.server, &mut writer).unwrap(), 0);
}

#[test]
fn counting_does_not_consume_changes() {
    let mut pair = baselined_pair();
    pair.server.health.set(12);

    let writer = BitWriter::new();
    let mut counter = writer.counter();
    assert_eq!(pair.server_sync.serialize(&pair.server, &mut counter).unwrap(), 1);
    assert!(!pair.server_sync.is_synchronized(&pair.server));

    let mut writer = BitWriter::new();
    assert_eq!(pair.server_sync.serialize(&pair.server, &mut writer).unwrap(), 1);
    assert!(pair.server_sync.is_synchronized(&pair.server));
}

#[test]
fn round_trip_reproduces_every_changed_value() {
    let mut pair = baselined_pair();
    pair.server.body.resize(Vec2::new(20.0, 24.0));
    pair.server.body.set_collides(false);
    pair.server.health.set(1);

    let mut writer = BitWriter::new();
    assert_eq!(pair.server_sync.serialize(&pair.server, &mut writer).unwrap(), 3);
    let bytes = writer.to_bytes();
    let applied = pair
        .client_sync
        .deserialize(&mut pair.client, &mut BitReader::new(&bytes))
        .unwrap();

    let expected: Vec<u8> = ["body.size", "body.collides", "health"]
        .iter()
        .map(|name| pair.registry.index_of(name).unwrap())
        .collect();
    assert_eq!(applied, expected);
    assert_eq!(pair.client.body.size(), Vec2::new(20.0, 24.0));
    assert!(!pair.client.body.collides());
    assert_eq!(*pair.client.name, "ada");
    assert_eq!(
        snapshot(&pair.server_sync, &pair.server),
        snapshot(&pair.client_sync, &pair.client)
    );
}

#[test]
fn local_attributes_are_never_diffed() {
    let mut pair = baselined_pair();
    pair.server.body.teleport(Vec2::new(90.0, 90.0));

    assert!(pair.server_sync.is_synchronized(&pair.server));
    let mut writer = BitWriter::new();
    assert_eq!(pair.server_sync.serialize(&pair.server, &mut writer).unwrap(), 0);
}

#[test]
fn observers_see_local_and_remote_mutations() {
    let mut pair = baselined_pair();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    pair.client_sync.observe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    pair.server.health.set(3);
    let mut writer = BitWriter::new();
    pair.server_sync.serialize(&pair.server, &mut writer).unwrap();
    let bytes = writer.to_bytes();
    pair.client_sync
        .deserialize(&mut pair.client, &mut BitReader::new(&bytes))
        .unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    pair.client.name.set("local".to_string());
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn repeated_index_is_rejected() {
    let mut pair = baselined_pair();
    let name = u32::from(pair.registry.index_of("name").unwrap());
    let last = u32::from(pair.registry.last_network_index().unwrap());

    let mut writer = BitWriter::new();
    BoundedInteger::new(2, 0, 5).unwrap().ser(&mut writer);
    BoundedInteger::new(name, 0, last).unwrap().ser(&mut writer);
    "mallory".to_string().ser(&mut writer);
    BoundedInteger::new(name, name, last).unwrap().ser(&mut writer);
    "again".to_string().ser(&mut writer);
    let bytes = writer.to_bytes();

    let result = pair
        .client_sync
        .deserialize(&mut pair.client, &mut BitReader::new(&bytes));
    assert_eq!(
        result,
        Err(ReplicationError::IndexNotIncreasing {
            previous: name as u8,
            index: name as u8,
        })
    );
}

#[test]
fn index_past_the_last_network_attribute_is_rejected() {
    let mut pair = baselined_pair();

    let mut writer = BitWriter::new();
    BoundedInteger::new(1, 0, 5).unwrap().ser(&mut writer);
    // same three-bit width as [0, 4], but one past any registered index
    BoundedInteger::new(7, 0, 7).unwrap().ser(&mut writer);
    let bytes = writer.to_bytes();

    let result = pair
        .client_sync
        .deserialize(&mut pair.client, &mut BitReader::new(&bytes));
    assert_eq!(result, Err(ReplicationError::IndexOutOfRange { index: 7, last: 4 }));
}

#[test]
fn count_above_the_network_attribute_count_is_rejected() {
    let mut pair = baselined_pair();

    let mut writer = BitWriter::new();
    BoundedInteger::new(7, 0, 7).unwrap().ser(&mut writer);
    let bytes = writer.to_bytes();

    let result = pair
        .client_sync
        .deserialize(&mut pair.client, &mut BitReader::new(&bytes));
    assert_eq!(result, Err(ReplicationError::CountOutOfRange { count: 7, limit: 5 }));
}

#[test]
fn truncated_diff_is_a_serde_error() {
    let mut pair = baselined_pair();
    pair.server.name.set("a rather long name".to_string());

    let mut writer = BitWriter::new();
    pair.server_sync.serialize(&pair.server, &mut writer).unwrap();
    let bytes = writer.to_bytes();

    let result = pair
        .client_sync
        .deserialize(&mut pair.client, &mut BitReader::new(&bytes[..2]));
    assert!(matches!(result, Err(ReplicationError::Serde(_))));
}
