//! Property tests for the resolver and the diff encoding

use std::sync::Arc;

use proptest::prelude::*;

use perch_shared::{
    BitReader, BitWriter, CollisionBox, ObjectDiffSync, SimWorld, StaticObstacle, StreamWriter,
    Vec2,
};
use perch_test::{no_gravity, protocol, Avatar};

fn wall() -> StaticObstacle {
    StaticObstacle::wall(Vec2::new(0.0, 0.0), Vec2::new(40.0, 40.0))
}

proptest! {
    #[test]
    fn resolver_never_leaves_a_body_inside_a_wall(
        x in -80i32..80,
        y in -80i32..80,
        width in 1i32..32,
        height in 1i32..32,
        vx in -40i32..40,
        vy in -40i32..40,
    ) {
        let position = Vec2::new(x as f32, y as f32);
        let size = Vec2::new(width as f32, height as f32);
        let wall_bounds = wall().bounds();
        prop_assume!(!CollisionBox::new(position, size).overlaps(&wall_bounds));

        let mut world = SimWorld::new(no_gravity(), Arc::new(protocol()));
        world.add_obstacle(wall());
        let mut avatar = Avatar::new("probe", position);
        avatar.body.resize(size);
        avatar.body.set_velocity(Vec2::new(vx as f32, vy as f32));
        let key = world.spawn(avatar).unwrap();

        world.tick(1.0);

        let bounds = world.get::<Avatar>(key).unwrap().body.bounds();
        prop_assert!(
            !bounds.overlaps(&wall_bounds),
            "body ended at {:?} inside {:?}",
            bounds,
            wall_bounds
        );
    }

    #[test]
    fn diff_indices_strictly_increase(changes in any::<[bool; 5]>()) {
        let registry = Arc::new(Avatar::registry());
        let mut server = Avatar::new("ada", Vec2::ZERO);
        let mut server_sync = ObjectDiffSync::new(registry.clone(), &mut server);
        let mut client = Avatar::default();
        let mut client_sync = ObjectDiffSync::new(registry.clone(), &mut client);

        let mut baseline = StreamWriter::new();
        server_sync.write_all(&server, &mut baseline);
        let bytes = baseline.to_bytes();
        client_sync.read_all(&mut client, &mut BitReader::new(&bytes)).unwrap();

        // mutate in reverse index order; the wire order must not depend on it
        if changes[4] {
            server.health.set(7);
        }
        if changes[3] {
            server.name.set("grace".to_string());
        }
        if changes[2] {
            server.body.set_collides(false);
        }
        if changes[1] {
            server.body.set_weight(2.5);
        }
        if changes[0] {
            server.body.resize(Vec2::new(30.0, 10.0));
        }

        let mut writer = BitWriter::new();
        server_sync.serialize(&server, &mut writer).unwrap();
        let bytes = writer.to_bytes();
        let applied = client_sync.deserialize(&mut client, &mut BitReader::new(&bytes)).unwrap();

        let expected: Vec<u8> = (0u8..5).filter(|index| changes[*index as usize]).collect();
        prop_assert_eq!(&applied, &expected);
        prop_assert!(applied.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
