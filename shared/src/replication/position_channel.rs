use perch_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{geometry::Vec2, instant::Instant};

use super::config::ResendConfig;

/// What was last sent on a [`PositionVelocityChannel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResendState {
    pub last_position: Vec2,
    pub last_velocity: Vec2,
    pub last_sent: Option<Instant>,
    pub force_resends: u8,
}

/// What was last received on a [`PositionVelocityChannel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceivedMotion {
    pub position: Vec2,
    pub velocity: Vec2,
    pub received_at: Instant,
}

/// Loss-tolerant channel for an object's position and velocity.
///
/// Nothing is acknowledged. A surprising change (teleport, velocity flipping
/// sign) forces a burst of resends spaced by the resend delay, and a moving
/// object is re-sent at least once per heartbeat interval.
#[derive(Debug, Clone)]
pub struct PositionVelocityChannel {
    config: ResendConfig,
    state: ResendState,
    received: Option<ReceivedMotion>,
}

impl PositionVelocityChannel {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            state: ResendState {
                last_position: Vec2::ZERO,
                last_velocity: Vec2::ZERO,
                last_sent: None,
                force_resends: 0,
            },
            received: None,
        }
    }

    pub fn config(&self) -> &ResendConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ResendConfig) {
        self.config = config;
        self.state.force_resends = self.state.force_resends.min(config.max_force_resends);
    }

    pub fn state(&self) -> &ResendState {
        &self.state
    }

    pub fn force_sync(&mut self) {
        self.state.force_resends = self.config.max_force_resends;
    }

    pub fn needs_sync(&self, now: &Instant, velocity: Vec2) -> bool {
        let force_resends = self.state.force_resends;
        if force_resends > 0 && force_resends == self.config.max_force_resends {
            return true;
        }

        let Some(last_sent) = &self.state.last_sent else {
            return force_resends > 0 || !velocity.is_zero();
        };
        let elapsed = last_sent.elapsed(now);

        if force_resends > 0 && elapsed >= self.config.resend_delay {
            return true;
        }
        !velocity.is_zero() && elapsed >= self.config.heartbeat_interval
    }

    /// Writes both vectors unconditionally. A real writer (not a counter)
    /// that didn't overflow records the send.
    pub fn serialize(
        &mut self,
        now: &Instant,
        position: Vec2,
        velocity: Vec2,
        writer: &mut dyn BitWrite,
    ) {
        position.ser(writer);
        velocity.ser(writer);
        if !writer.is_counter() && !writer.overflowed() {
            self.record_send(now, position, velocity);
        }
    }

    /// Records a send without transmitting anything, for when nobody is
    /// listening.
    pub fn bypass(&mut self, now: &Instant, position: Vec2, velocity: Vec2) {
        self.record_send(now, position, velocity);
    }

    /// Records that the full state went out by another route (a spawn record),
    /// which settles any pending forced resends.
    pub fn mark_full_sync(&mut self, now: &Instant, position: Vec2, velocity: Vec2) {
        self.record_send(now, position, velocity);
        self.state.force_resends = 0;
    }

    fn record_send(&mut self, now: &Instant, position: Vec2, velocity: Vec2) {
        self.state.force_resends = self.state.force_resends.saturating_sub(1);
        self.state.last_position = position;
        self.state.last_velocity = velocity;
        self.state.last_sent = Some(*now);
    }

    pub fn deserialize(
        &mut self,
        now: &Instant,
        reader: &mut BitReader,
    ) -> Result<ReceivedMotion, SerdeErr> {
        let position = Vec2::de(reader)?;
        let velocity = Vec2::de(reader)?;
        Ok(self.receive(now, position, velocity))
    }

    /// Records motion that arrived by another route, e.g. a spawn snapshot
    pub fn receive(&mut self, now: &Instant, position: Vec2, velocity: Vec2) -> ReceivedMotion {
        let motion = ReceivedMotion {
            position,
            velocity,
            received_at: *now,
        };
        self.received = Some(motion);
        motion
    }

    pub fn received(&self) -> Option<&ReceivedMotion> {
        self.received.as_ref()
    }

    /// Predicted position at `now` from the last received motion, with
    /// velocity in units per second
    pub fn extrapolate(&self, now: &Instant) -> Option<Vec2> {
        let motion = self.received.as_ref()?;
        let elapsed = motion.received_at.elapsed(now).as_secs_f32();
        Some(motion.position + motion.velocity * elapsed)
    }
}

impl Default for PositionVelocityChannel {
    fn default() -> Self {
        Self::new(ResendConfig::default())
    }
}
