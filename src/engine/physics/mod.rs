// Physics system using rapier2d
//
// The movement core only sees two seams: `MotionBody` for a character's
// velocity and gravity scale, and `GeometryProbe` for spawn obstruction
// tests. Everything rapier-specific stays behind them.

pub mod body;
mod collision;
mod world;

pub use body::{BodyMut, ColliderHandle, MotionBody, RigidBodyHandle};
pub use collision::{CollisionEvent, CollisionGroups};
pub use world::{GeometryProbe, PhysicsWorld};

pub use rapier2d::prelude::{Group, Real, Vector};
