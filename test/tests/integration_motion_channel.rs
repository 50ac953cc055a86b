//! Integration tests for the unacknowledged position/velocity channel

use perch_shared::{
    BitReader, BitWrite, BitWriter, Instant, PositionVelocityChannel, ResendConfig, SimObject,
    Vec2,
};
use perch_test::assert_vec2_near;

fn send(channel: &mut PositionVelocityChannel, now: &Instant, position: Vec2, velocity: Vec2) {
    let mut writer = BitWriter::new();
    channel.serialize(now, position, velocity, &mut writer);
}

#[test]
fn forced_sync_resends_exactly_three_times() {
    let mut channel = PositionVelocityChannel::new(ResendConfig::default());
    let position = Vec2::new(10.0, 10.0);
    let mut now = Instant::now();
    send(&mut channel, &now, position, Vec2::ZERO);

    channel.force_sync();
    let mut sends = 0;
    for _ in 0..20 {
        if channel.needs_sync(&now, Vec2::ZERO) {
            send(&mut channel, &now, position, Vec2::ZERO);
            sends += 1;
        }
        now = now.add_millis(100);
    }

    assert_eq!(sends, 3);
    assert_eq!(channel.state().force_resends, 0);
}

#[test]
fn forced_resends_wait_for_the_resend_delay() {
    let mut channel = PositionVelocityChannel::new(ResendConfig::default());
    let now = Instant::now();
    channel.force_sync();

    assert!(channel.needs_sync(&now, Vec2::ZERO));
    send(&mut channel, &now, Vec2::ZERO, Vec2::ZERO);

    assert!(!channel.needs_sync(&now.add_millis(99), Vec2::ZERO));
    assert!(channel.needs_sync(&now.add_millis(100), Vec2::ZERO));
}

#[test]
fn steady_motion_is_reconfirmed_each_heartbeat() {
    let mut channel = PositionVelocityChannel::new(ResendConfig::default());
    let velocity = Vec2::new(30.0, 0.0);
    let now = Instant::now();

    // moving and never sent
    assert!(channel.needs_sync(&now, velocity));
    send(&mut channel, &now, Vec2::ZERO, velocity);

    assert!(!channel.needs_sync(&now.add_millis(999), velocity));
    assert!(channel.needs_sync(&now.add_millis(1000), velocity));
    // a body at rest has nothing to reconfirm
    assert!(!channel.needs_sync(&now.add_millis(5000), Vec2::ZERO));
}

#[test]
fn counting_pass_does_not_record_a_send() {
    let mut channel = PositionVelocityChannel::new(ResendConfig::default());
    let now = Instant::now();
    channel.force_sync();

    let writer = BitWriter::new();
    let mut counter = writer.counter();
    channel.serialize(&now, Vec2::ZERO, Vec2::ZERO, &mut counter);

    assert_eq!(channel.state().force_resends, 3);
    assert_eq!(channel.state().last_sent, None);
}

#[test]
fn overflowed_writer_does_not_record_a_send() {
    let mut channel = PositionVelocityChannel::new(ResendConfig::default());
    let now = Instant::now();
    channel.force_sync();

    let mut cramped = BitWriter::with_max_bits(8);
    channel.serialize(&now, Vec2::new(1.0, 2.0), Vec2::ZERO, &mut cramped);

    assert!(cramped.overflowed());
    assert_eq!(channel.state().force_resends, 3);
    assert_eq!(channel.state().last_sent, None);
}

#[test]
fn bypass_drains_pending_resends_without_writing() {
    let mut channel = PositionVelocityChannel::new(ResendConfig::default());
    let mut now = Instant::now();
    channel.force_sync();

    for _ in 0..3 {
        assert!(channel.needs_sync(&now, Vec2::ZERO));
        channel.bypass(&now, Vec2::ZERO, Vec2::ZERO);
        now = now.add_millis(100);
    }
    assert!(!channel.needs_sync(&now, Vec2::ZERO));
}

#[test]
fn velocity_sign_change_forces_sync() {
    let mut body = SimObject::new(Vec2::ZERO, Vec2::new(16.0, 16.0), 1.0);
    let now = Instant::now();

    body.set_velocity(Vec2::new(5.0, 0.0));
    assert_eq!(body.motion().state().force_resends, 3);
    let (position, velocity) = (body.position(), body.velocity());
    body.motion_mut().mark_full_sync(&now, position, velocity);

    // same signs: predictable, no forced resend
    body.set_velocity(Vec2::new(9.0, 0.0));
    assert_eq!(body.motion().state().force_resends, 0);

    body.set_velocity(Vec2::new(-9.0, 0.0));
    assert_eq!(body.motion().state().force_resends, 3);
}

#[test]
fn received_motion_is_extrapolated() {
    let mut sender = PositionVelocityChannel::new(ResendConfig::default());
    let mut receiver = PositionVelocityChannel::default();
    let now = Instant::now();

    let mut writer = BitWriter::new();
    sender.serialize(&now, Vec2::new(100.0, 50.0), Vec2::new(20.0, -10.0), &mut writer);
    let bytes = writer.to_bytes();
    let motion = receiver
        .deserialize(&now, &mut BitReader::new(&bytes))
        .unwrap();

    assert_eq!(motion.position, Vec2::new(100.0, 50.0));
    assert_eq!(motion.velocity, Vec2::new(20.0, -10.0));
    assert_eq!(receiver.extrapolate(&now), Some(Vec2::new(100.0, 50.0)));
    assert_vec2_near!(
        receiver.extrapolate(&now.add_millis(500)).unwrap(),
        Vec2::new(110.0, 45.0),
        1e-3
    );
}

#[test]
fn nothing_to_extrapolate_before_first_receive() {
    let channel = PositionVelocityChannel::default();
    assert_eq!(channel.extrapolate(&Instant::now()), None);
}
