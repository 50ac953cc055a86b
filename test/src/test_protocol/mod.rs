//! Object kinds shared by the integration tests

use perch_shared::{Property, PropertyRegistry, Protocol, Replicate, SimObject, Vec2};

pub const AVATAR_SIZE: Vec2 = Vec2::new(16.0, 16.0);

pub struct Avatar {
    pub body: SimObject,
    pub name: Property<String>,
    pub health: Property<u16>,
}

impl Avatar {
    pub fn new(name: &str, position: Vec2) -> Self {
        Self {
            body: SimObject::new(position, AVATAR_SIZE, 1.0),
            name: Property::new(name.to_string()),
            health: Property::new(100),
        }
    }

    pub fn registry() -> PropertyRegistry<Self> {
        SimObject::register_properties(PropertyRegistry::builder("Avatar"))
            .network("name", |avatar: &Self| &avatar.name, |avatar: &mut Self| &mut avatar.name)
            .network(
                "health",
                |avatar: &Self| &avatar.health,
                |avatar: &mut Self| &mut avatar.health,
            )
            .build()
            .expect("avatar registry is valid")
    }

    /// The same fields with `health` demoted to a local attribute, as an
    /// older build might have declared them
    pub fn outdated_registry() -> PropertyRegistry<Self> {
        SimObject::register_properties(PropertyRegistry::builder("Avatar"))
            .network("name", |avatar: &Self| &avatar.name, |avatar: &mut Self| &mut avatar.name)
            .local(
                "health",
                |avatar: &Self| &avatar.health,
                |avatar: &mut Self| &mut avatar.health,
            )
            .build()
            .expect("outdated avatar registry is valid")
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new("", Vec2::ZERO)
    }
}

impl Replicate for Avatar {
    fn body(&self) -> &SimObject {
        &self.body
    }

    fn body_mut(&mut self) -> &mut SimObject {
        &mut self.body
    }
}

/// A heavy prop with one network attribute and a local-only label
pub struct Barrel {
    pub body: SimObject,
    pub contents: Property<u8>,
    pub label: Property<String>,
}

impl Barrel {
    pub fn new(position: Vec2) -> Self {
        Self {
            body: SimObject::new(position, Vec2::new(12.0, 20.0), 4.0),
            contents: Property::new(0),
            label: Property::new(String::new()),
        }
    }

    pub fn registry() -> PropertyRegistry<Self> {
        SimObject::register_properties(PropertyRegistry::builder("Barrel"))
            .network(
                "contents",
                |barrel: &Self| &barrel.contents,
                |barrel: &mut Self| &mut barrel.contents,
            )
            .local("label", |barrel: &Self| &barrel.label, |barrel: &mut Self| &mut barrel.label)
            .build()
            .expect("barrel registry is valid")
    }
}

impl Default for Barrel {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Replicate for Barrel {
    fn body(&self) -> &SimObject {
        &self.body
    }

    fn body_mut(&mut self) -> &mut SimObject {
        &mut self.body
    }
}

/// Avatar (net id 0) and Barrel (net id 1), locked
pub fn protocol() -> Protocol {
    let mut protocol = Protocol::builder();
    protocol
        .add_object(Avatar::registry(), Avatar::default)
        .add_object(Barrel::registry(), Barrel::default);
    protocol.lock();
    protocol.build()
}

/// Like [`protocol`] but with the outdated Avatar layout
pub fn outdated_protocol() -> Protocol {
    let mut protocol = Protocol::builder();
    protocol
        .add_object(Avatar::outdated_registry(), Avatar::default)
        .add_object(Barrel::registry(), Barrel::default);
    protocol.lock();
    protocol.build()
}
