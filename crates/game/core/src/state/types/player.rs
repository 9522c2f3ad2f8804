use super::common::PlayerId;

/// Per-seat data consumed by combat: the scarce resource and the facing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    pub plasma: u32,
    pub flipped: bool,
}

impl Player {
    pub const fn new(id: PlayerId, plasma: u32) -> Self {
        Self {
            id,
            plasma,
            // Odd seats start on the right edge and face left.
            flipped: id.0 % 2 == 1,
        }
    }

    pub const fn has_plasma(&self) -> bool {
        self.plasma > 0
    }
}
