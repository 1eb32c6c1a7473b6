use crate::map::grid::Neighbor;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// An 8-bit record of which neighbors of a tile are land. Each [Neighbor] owns
/// one bit, weighted in scan order:
///
/// ```text
///   1 |  2 |   4
///  ---+----+----
///   8 |  x |  16
///  ---+----+----
///  32 | 64 | 128
/// ```
///
/// Masks stored on a generated map have been through
/// [Bitmask::without_redundant_corners], so only 47 of the 256 possible values
/// ever show up. See [Bitmask::realizable].
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Bitmask(u8);

impl Bitmask {
    /// No land neighbors at all
    pub const EMPTY: Self = Self(0);
    /// Land on all 8 sides
    pub const FULL: Self = Self(u8::MAX);

    /// The bit that a particular neighbor occupies
    pub const fn bit(neighbor: Neighbor) -> u8 {
        match neighbor {
            Neighbor::TopLeft => 1,
            Neighbor::Top => 2,
            Neighbor::TopRight => 4,
            Neighbor::Left => 8,
            Neighbor::Right => 16,
            Neighbor::BottomLeft => 32,
            Neighbor::Bottom => 64,
            Neighbor::BottomRight => 128,
        }
    }

    /// Build a raw mask with a bit set for each of the given neighbors. No
    /// corner correction is applied.
    pub fn from_neighbors(neighbors: impl IntoIterator<Item = Neighbor>) -> Self {
        neighbors
            .into_iter()
            .fold(Self::EMPTY, |mask, neighbor| mask.with(neighbor))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Is the bit for the given neighbor set?
    pub fn contains(self, neighbor: Neighbor) -> bool {
        self.0 & Self::bit(neighbor) != 0
    }

    /// Copy of this mask with the given neighbor's bit set
    #[must_use]
    pub fn with(self, neighbor: Neighbor) -> Self {
        Self(self.0 | Self::bit(neighbor))
    }

    /// Copy of this mask with the given neighbor's bit cleared
    #[must_use]
    pub fn without(self, neighbor: Neighbor) -> Self {
        Self(self.0 & !Self::bit(neighbor))
    }

    /// Clear every corner bit that isn't backed by both of its adjacent sides.
    /// E.g. the top-right bit only stays set if top and right are both set.
    ///
    /// Land that only touches a tile diagonally doesn't change which edge
    /// artwork the tile needs, so collapsing those cases keeps the variant
    /// table down to 47 entries. The check for each corner only looks at
    /// side bits, so the order corners are checked in doesn't matter.
    #[must_use]
    pub fn without_redundant_corners(self) -> Self {
        Neighbor::iter().fold(self, |mask, neighbor| {
            match corner_sides(neighbor) {
                Some((a, b))
                    if mask.contains(neighbor)
                        && !(mask.contains(a) && mask.contains(b)) =>
                {
                    mask.without(neighbor)
                }
                _ => mask,
            }
        })
    }

    /// Is this mask unchanged by [Self::without_redundant_corners]? Every mask
    /// on a generated map satisfies this.
    pub fn is_realizable(self) -> bool {
        self.without_redundant_corners() == self
    }

    /// Enumerate every mask that can come out of corner correction, in
    /// ascending order. There are exactly 47.
    pub fn realizable() -> impl Iterator<Item = Self> {
        (0..=u8::MAX).map(Self).filter(|mask| mask.is_realizable())
    }
}

/// For a corner neighbor, get the two side neighbors it touches. `None` for
/// side neighbors.
fn corner_sides(neighbor: Neighbor) -> Option<(Neighbor, Neighbor)> {
    match neighbor {
        Neighbor::TopLeft => Some((Neighbor::Left, Neighbor::Top)),
        Neighbor::TopRight => Some((Neighbor::Right, Neighbor::Top)),
        Neighbor::BottomLeft => Some((Neighbor::Left, Neighbor::Bottom)),
        Neighbor::BottomRight => Some((Neighbor::Right, Neighbor::Bottom)),
        Neighbor::Top | Neighbor::Left | Neighbor::Right | Neighbor::Bottom => {
            None
        }
    }
}
