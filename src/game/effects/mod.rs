// Environmental effects placed by characters

pub mod vortex;

pub use vortex::{
    EffectVolumeInstance, SpawnOutcome, VolumeId, VortexConfig, VortexSpawner, AIR_VORTEX,
    FIRE_VORTEX,
};
