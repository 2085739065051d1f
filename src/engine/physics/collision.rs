use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
///
/// The group a collider belongs to is also its surface category: the
/// movement core asks whether it touched `Ground`, a `Wall` or a `Vortex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Player characters
    Player = 0b0000_0001,

    /// Floors and platforms
    Ground = 0b0000_0010,

    /// Clingable walls
    Wall = 0b0000_0100,

    /// Vortex effect volumes - sensors, never a physical response
    Vortex = 0b0000_1000,
}

impl CollisionGroups {
    /// Membership bits of this group
    pub fn group(self) -> Group {
        Group::from_bits_truncate(self as u32)
    }

    /// Everything a spawn probe treats as solid
    pub fn solid() -> Group {
        CollisionGroups::Ground.group() | CollisionGroups::Wall.group()
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let filter = match self {
            // Players stand on ground, cling to walls and drift through vortices
            // but never touch other players
            CollisionGroups::Player => Self::solid() | CollisionGroups::Vortex.group(),

            // Solid geometry collides with players only; static-static pairs are never solved
            CollisionGroups::Ground | CollisionGroups::Wall => CollisionGroups::Player.group(),

            // Vortices only report players entering and leaving
            CollisionGroups::Vortex => CollisionGroups::Player.group(),
        };

        InteractionGroups::new(self.group(), filter)
    }

    /// Find the category a collider was built with
    pub fn of(groups: InteractionGroups) -> Option<Self> {
        [
            CollisionGroups::Player,
            CollisionGroups::Ground,
            CollisionGroups::Wall,
            CollisionGroups::Vortex,
        ]
        .into_iter()
        .find(|candidate| groups.memberships.contains(candidate.group()))
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        /// World-space normal pointing from collider1 toward collider2
        normal: Vector<Real>,
        /// One of the pair is a sensor (overlap, not contact)
        sensor: bool,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },
}

/// Queue for storing collision events during physics step
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Take every event gathered so far, leaving the queue empty
    pub fn drain(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    /// Add a collision event
    pub(super) fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// First manifold normal of a contact pair, zero if the pair has none yet
fn pair_normal(contact_pair: Option<&ContactPair>) -> Vector<Real> {
    contact_pair
        .and_then(|pair| pair.manifolds.first())
        .map(|manifold| manifold.data.normal)
        .unwrap_or_else(Vector::zeros)
}

// Implement rapier2d's EventHandler trait for our event queue
impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                    normal: pair_normal(contact_pair),
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_groups_bits() {
        let groups = [
            CollisionGroups::Player,
            CollisionGroups::Ground,
            CollisionGroups::Wall,
            CollisionGroups::Vortex,
        ];

        for (i, group1) in groups.iter().enumerate() {
            for (j, group2) in groups.iter().enumerate() {
                if i != j {
                    assert_ne!(
                        *group1 as u32, *group2 as u32,
                        "Groups must have unique bits"
                    );
                }
            }
        }
    }

    #[test]
    fn test_player_doesnt_collide_with_player() {
        let player_groups = CollisionGroups::Player.to_interaction_groups();
        assert!(
            !player_groups.filter.contains(player_groups.memberships),
            "Players should not collide with other players"
        );
    }

    #[test]
    fn test_player_sees_vortex() {
        let player = CollisionGroups::Player.to_interaction_groups();
        let vortex = CollisionGroups::Vortex.to_interaction_groups();
        assert!(player.test(vortex));
    }

    #[test]
    fn test_solid_excludes_vortex() {
        assert!(CollisionGroups::solid().contains(CollisionGroups::Wall.group()));
        assert!(!CollisionGroups::solid().contains(CollisionGroups::Vortex.group()));
    }

    #[test]
    fn test_category_lookup() {
        let wall = CollisionGroups::Wall.to_interaction_groups();
        assert_eq!(CollisionGroups::of(wall), Some(CollisionGroups::Wall));
        assert_eq!(CollisionGroups::of(InteractionGroups::none()), None);
    }

    #[test]
    fn test_drain_empties_queue() {
        let queue = CollisionEventQueue::new();
        assert!(queue.drain().is_empty());
    }
}
