// Game logic: characters, contacts, effects and the scene that ties them together

pub mod characters;
pub mod contact;
pub mod effects;
pub mod scene;
