use crate::map::bitmask::Bitmask;
use anyhow::anyhow;
use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// The category of a single tile. Every tile on a map is exactly one of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Water,
    Land,
}

impl Terrain {
    pub fn is_land(self) -> bool {
        self == Self::Land
    }

    pub fn is_water(self) -> bool {
        self == Self::Water
    }
}

/// Every bitmask that can appear on a land tile, paired with the index of the
/// grass artwork drawn for it. Mask 0 is a land tile with no land around it at
/// all, and it gets the last variant.
const BITMASK_VARIANTS: &[(u8, u8)] = &[
    (2, 1),
    (8, 2),
    (10, 3),
    (11, 4),
    (16, 5),
    (18, 6),
    (22, 7),
    (24, 8),
    (26, 9),
    (27, 10),
    (30, 11),
    (31, 12),
    (64, 13),
    (66, 14),
    (72, 15),
    (74, 16),
    (75, 17),
    (80, 18),
    (82, 19),
    (86, 20),
    (88, 21),
    (90, 22),
    (91, 23),
    (94, 24),
    (95, 25),
    (104, 26),
    (106, 27),
    (107, 28),
    (120, 29),
    (122, 30),
    (123, 31),
    (126, 32),
    (127, 33),
    (208, 34),
    (210, 35),
    (214, 36),
    (216, 37),
    (218, 38),
    (219, 39),
    (222, 40),
    (223, 41),
    (248, 42),
    (250, 43),
    (251, 44),
    (254, 45),
    (255, 46),
    (0, 47),
];

/// Marks a slot in [VARIANT_LOOKUP] that has no variant. Variant indexes
/// start at 1 so this can't collide.
const NO_VARIANT: u8 = 0;

/// [BITMASK_VARIANTS] flattened into a direct-indexed table, built at compile
/// time.
const VARIANT_LOOKUP: [u8; 256] = {
    let mut table = [NO_VARIANT; 256];
    let mut i = 0;
    while i < BITMASK_VARIANTS.len() {
        let (mask, variant) = BITMASK_VARIANTS[i];
        table[mask as usize] = variant;
        i += 1;
    }
    table
};

/// One of the grass tiles in the land artwork. Each variant draws a
/// particular arrangement of beach edges, chosen by the tile's [Bitmask].
/// Indexes are stable, and run contiguously from 1 to [LandVariant::COUNT].
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct LandVariant(u8);

impl LandVariant {
    /// Total number of land variants
    pub const COUNT: usize = 47;

    /// Look up the variant for a land tile's bitmask. Returns `None` if the
    /// mask isn't in the table, which can only happen if the mask didn't go
    /// through corner correction.
    pub fn from_bitmask(bitmask: Bitmask) -> Option<Self> {
        match VARIANT_LOOKUP[bitmask.value() as usize] {
            NO_VARIANT => None,
            index => Some(Self(index)),
        }
    }

    /// Index of this variant in the land artwork list
    pub fn index(self) -> u8 {
        self.0
    }

    /// Iterate over every (bitmask, variant) pair in the lookup table
    pub fn table() -> impl Iterator<Item = (Bitmask, Self)> {
        BITMASK_VARIANTS
            .iter()
            .map(|&(mask, variant)| (Bitmask::from(mask), Self(variant)))
    }
}

impl TryFrom<u8> for LandVariant {
    type Error = anyhow::Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if index >= 1 && index as usize <= Self::COUNT {
            Ok(Self(index))
        } else {
            Err(anyhow!(
                "land variant must be in [1, {}], but got {}",
                Self::COUNT,
                index
            ))
        }
    }
}

/// The artwork to draw for a single tile. Water tiles all look the same, land
/// tiles pick a [LandVariant] based on their neighbors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileVariant {
    Water,
    Land(LandVariant),
}

impl TileVariant {
    /// Name of the region list in the tile atlas that this variant draws from
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::Water => "tile/water",
            Self::Land(_) => "tile/grass",
        }
    }

    /// Index into the region list named by [Self::asset_name]
    pub fn asset_index(self) -> usize {
        match self {
            Self::Water => 0,
            Self::Land(variant) => variant.index() as usize,
        }
    }

    pub fn terrain(self) -> Terrain {
        match self {
            Self::Water => Terrain::Water,
            Self::Land(_) => Terrain::Land,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_de_tokens_error, assert_tokens, Token};
    use std::collections::HashSet;

    /// Every mask that corner correction can produce needs a variant, and the
    /// table shouldn't have anything else in it
    #[test]
    fn test_table_covers_realizable_masks() {
        let realizable: HashSet<Bitmask> = Bitmask::realizable().collect();
        let keys: HashSet<Bitmask> =
            LandVariant::table().map(|(mask, _)| mask).collect();
        assert_eq!(keys.len(), BITMASK_VARIANTS.len(), "duplicate keys");
        assert_eq!(keys, realizable);

        for mask in realizable {
            assert!(
                LandVariant::from_bitmask(mask).is_some(),
                "no variant for {}",
                mask
            );
        }
    }

    /// No two masks share a variant, and together they use every index
    #[test]
    fn test_variants_distinct_and_contiguous() {
        let mut indexes: Vec<u8> =
            LandVariant::table().map(|(_, v)| v.index()).collect();
        indexes.sort_unstable();
        let expected: Vec<u8> = (1..=LandVariant::COUNT as u8).collect();
        assert_eq!(indexes, expected);
    }

    #[test]
    fn test_from_bitmask() {
        // Isolated tile gets the highest index, not some special constant
        assert_eq!(
            LandVariant::from_bitmask(Bitmask::EMPTY).map(LandVariant::index),
            Some(47)
        );
        assert_eq!(
            LandVariant::from_bitmask(Bitmask::FULL).map(LandVariant::index),
            Some(46)
        );
        assert_eq!(
            LandVariant::from_bitmask(Bitmask::from(90)).map(LandVariant::index),
            Some(22)
        );
        // Uncorrected corner
        assert_eq!(LandVariant::from_bitmask(Bitmask::from(1)), None);
    }

    #[test]
    fn test_asset_names() {
        let land = TileVariant::Land(LandVariant::try_from(12).unwrap());
        assert_eq!(land.asset_name(), "tile/grass");
        assert_eq!(land.asset_index(), 12);
        assert_eq!(land.terrain(), Terrain::Land);
        assert_eq!(TileVariant::Water.asset_name(), "tile/water");
        assert_eq!(TileVariant::Water.asset_index(), 0);
    }

    #[test]
    fn test_serde() {
        assert_tokens(
            &TileVariant::Water,
            &[Token::UnitVariant {
                name: "TileVariant",
                variant: "water",
            }],
        );
        assert_tokens(
            &TileVariant::Land(LandVariant(3)),
            &[
                Token::NewtypeVariant {
                    name: "TileVariant",
                    variant: "land",
                },
                Token::U8(3),
            ],
        );
        assert_de_tokens_error::<LandVariant>(
            &[Token::U8(48)],
            "land variant must be in [1, 47], but got 48",
        );
        assert_de_tokens_error::<LandVariant>(
            &[Token::U8(0)],
            "land variant must be in [1, 47], but got 0",
        );
    }
}
