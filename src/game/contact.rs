// Contact classification
//
// Turns raw collision events into per-character contact events and feeds
// them to the owning state machine. A pair is only interesting when one
// side belongs to a character; the other side's collision group is its tag.

use glam::Vec2;

use crate::engine::physics::{
    ColliderHandle, CollisionEvent, CollisionGroups, MotionBody, PhysicsWorld,
};
use crate::game::characters::{CharacterId, CharacterStateMachine};

/// Category of the surface on the other side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceTag {
    Ground,
    Wall,
    Vortex,
    Untagged,
}

impl From<Option<CollisionGroups>> for SurfaceTag {
    fn from(groups: Option<CollisionGroups>) -> Self {
        match groups {
            Some(CollisionGroups::Ground) => Self::Ground,
            Some(CollisionGroups::Wall) => Self::Wall,
            Some(CollisionGroups::Vortex) => Self::Vortex,
            Some(CollisionGroups::Player) | None => Self::Untagged,
        }
    }
}

/// Something that happened to one character
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    /// Physical contact began; `normal` points from the surface to the character
    ContactEnter { normal: Vec2, tag: SurfaceTag },
    ContactExit { tag: SurfaceTag },
    /// Started overlapping a vortex sensor
    OverlapEnter,
    OverlapExit,
}

impl ContactEvent {
    /// Feed this event to a character's state machine
    pub fn apply(self, state_machine: &mut CharacterStateMachine, body: &mut impl MotionBody) {
        match self {
            Self::ContactEnter { normal, tag } => state_machine.on_contact_enter(normal, tag, body),
            Self::ContactExit { tag } => state_machine.on_contact_exit(tag, body),
            Self::OverlapEnter => state_machine.on_volume_enter(body),
            Self::OverlapExit => state_machine.on_volume_exit(body),
        }
    }
}

fn tag_of(world: &PhysicsWorld, collider: ColliderHandle) -> SurfaceTag {
    world
        .get_collider(collider)
        .and_then(|collider| CollisionGroups::of(collider.collision_groups()))
        .into()
}

fn character_of(world: &PhysicsWorld, collider: ColliderHandle) -> Option<CharacterId> {
    world
        .entity_of_collider(collider)
        .and_then(|entity| CharacterId::try_from(entity).ok())
}

/// Event as seen by `character`, whose collider is `ours` and not `theirs`
fn classify_side(
    world: &PhysicsWorld,
    event: &CollisionEvent,
    ours: ColliderHandle,
    theirs: ColliderHandle,
) -> Option<(CharacterId, ContactEvent)> {
    let character = character_of(world, ours)?;
    let tag = tag_of(world, theirs);

    let contact = match *event {
        CollisionEvent::Started { sensor: true, .. } if tag == SurfaceTag::Vortex => {
            ContactEvent::OverlapEnter
        }
        CollisionEvent::Stopped { sensor: true, .. } if tag == SurfaceTag::Vortex => {
            ContactEvent::OverlapExit
        }
        // Sensors that are not vortices mean nothing to movement
        CollisionEvent::Started { sensor: true, .. }
        | CollisionEvent::Stopped { sensor: true, .. } => return None,
        CollisionEvent::Started {
            collider1, normal, ..
        } => {
            let normal = Vec2::new(normal.x, normal.y);
            // Rapier's normal points from collider1 toward collider2
            let normal = if collider1 == ours { -normal } else { normal };
            ContactEvent::ContactEnter { normal, tag }
        }
        CollisionEvent::Stopped { .. } => ContactEvent::ContactExit { tag },
    };

    Some((character, contact))
}

/// Classify one collision event for every character involved
pub fn classify(world: &PhysicsWorld, event: &CollisionEvent) -> Vec<(CharacterId, ContactEvent)> {
    let (collider1, collider2) = match *event {
        CollisionEvent::Started {
            collider1,
            collider2,
            ..
        }
        | CollisionEvent::Stopped {
            collider1,
            collider2,
            ..
        } => (collider1, collider2),
    };

    let classified: Vec<_> = [(collider1, collider2), (collider2, collider1)]
        .into_iter()
        .filter_map(|(ours, theirs)| classify_side(world, event, ours, theirs))
        .collect();

    if classified.is_empty() {
        log::trace!("collision event ignored: {:?}", event);
    }
    classified
}
