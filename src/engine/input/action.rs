// Game action definitions

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    /// Primary jump (space)
    Jump,
    /// Secondary jump that doubles as "hold to rise" (up)
    Ascend,

    // Abilities
    SpawnVortex,

    // Character switching
    SwitchAir,
    SwitchFire,
}

impl Action {
    /// Actions that produce a jump edge and count as holding the jump
    pub fn is_rise(self) -> bool {
        matches!(self, Self::Jump | Self::Ascend)
    }
}
