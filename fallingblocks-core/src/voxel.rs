//! Voxel states and their closed classification.
//!
//! The falling rules only care about a handful of block families. Rather than
//! inspecting open-ended block types, every state is mapped onto [`VoxelClass`].

use std::fmt::{self, Display};

use fallingblocks_utils::ResourceLocation;

/// The maximum number of snow layers. A snow block at this height is a full cube.
pub const MAX_SNOW_LAYERS: u8 = 8;

/// A voxel as the host reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoxelState {
    /// The block identifier.
    pub block: ResourceLocation,
    /// Layer count for layered blocks such as snow.
    pub layers: Option<u8>,
}

impl VoxelState {
    /// A state with no auxiliary data.
    #[must_use]
    pub const fn new(block: ResourceLocation) -> Self {
        Self {
            block,
            layers: None,
        }
    }

    /// A vanilla block state by path.
    #[must_use]
    pub const fn vanilla(path: &'static str) -> Self {
        Self::new(ResourceLocation::vanilla_static(path))
    }

    /// The default air state.
    #[must_use]
    pub const fn air() -> Self {
        Self::vanilla("air")
    }

    /// A snow layer state. `layers` is clamped to `1..=8`.
    #[must_use]
    pub fn snow(layers: u8) -> Self {
        Self {
            block: ResourceLocation::vanilla_static("snow"),
            layers: Some(layers.clamp(1, MAX_SNOW_LAYERS)),
        }
    }

    /// The closed class of this state.
    #[must_use]
    pub fn class(&self) -> VoxelClass {
        VoxelClass::of(self)
    }

    /// Whether this is any kind of air.
    #[must_use]
    pub fn is_air(&self) -> bool {
        self.class() == VoxelClass::Air
    }
}

impl Display for VoxelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layers {
            Some(layers) => write!(f, "{}[layers={layers}]", self.block),
            None => write!(f, "{}", self.block),
        }
    }
}

/// Block families the falling rules distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelClass {
    /// Air, cave air and void air.
    Air,
    /// Water and lava source or flowing blocks.
    Fluid,
    Bedrock,
    NetherPortal,
    EndPortal,
    EndPortalFrame,
    EndGateway,
    /// Flowers, saplings, grasses, crops and the rest of the plant family.
    Plant,
    Obsidian,
    /// Snow layers with their layer count.
    SnowLayer {
        /// Number of layers, `1..=8`.
        layers: u8,
    },
    /// Everything else.
    Solid,
}

impl VoxelClass {
    /// Classifies a voxel state.
    ///
    /// Blocks outside the vanilla namespace are always [`VoxelClass::Solid`].
    #[must_use]
    pub fn of(state: &VoxelState) -> Self {
        if !state.block.is_vanilla() {
            return Self::Solid;
        }
        match VANILLA_CLASSES.get(&*state.block.path) {
            Some(Kind::Air) => Self::Air,
            Some(Kind::Fluid) => Self::Fluid,
            Some(Kind::Bedrock) => Self::Bedrock,
            Some(Kind::NetherPortal) => Self::NetherPortal,
            Some(Kind::EndPortal) => Self::EndPortal,
            Some(Kind::EndPortalFrame) => Self::EndPortalFrame,
            Some(Kind::EndGateway) => Self::EndGateway,
            Some(Kind::Plant) => Self::Plant,
            Some(Kind::Obsidian) => Self::Obsidian,
            Some(Kind::Snow) => Self::SnowLayer {
                layers: state.layers.unwrap_or(1).clamp(1, MAX_SNOW_LAYERS),
            },
            None => Self::Solid,
        }
    }

    /// Structurally special blocks that must never fall.
    #[must_use]
    pub const fn is_denied(self) -> bool {
        matches!(
            self,
            Self::Bedrock
                | Self::NetherPortal
                | Self::EndPortal
                | Self::EndPortalFrame
                | Self::EndGateway
                | Self::Plant
        )
    }
}

// Table value; layer counts are filled in from the state.
#[derive(Clone, Copy)]
enum Kind {
    Air,
    Fluid,
    Bedrock,
    NetherPortal,
    EndPortal,
    EndPortalFrame,
    EndGateway,
    Plant,
    Obsidian,
    Snow,
}

static VANILLA_CLASSES: phf::Map<&'static str, Kind> = phf::phf_map! {
    "air" => Kind::Air,
    "cave_air" => Kind::Air,
    "void_air" => Kind::Air,

    "water" => Kind::Fluid,
    "lava" => Kind::Fluid,

    "bedrock" => Kind::Bedrock,
    "nether_portal" => Kind::NetherPortal,
    "end_portal" => Kind::EndPortal,
    "end_portal_frame" => Kind::EndPortalFrame,
    "end_gateway" => Kind::EndGateway,
    "obsidian" => Kind::Obsidian,
    "snow" => Kind::Snow,

    // Grasses and ferns
    "short_grass" => Kind::Plant,
    "tall_grass" => Kind::Plant,
    "fern" => Kind::Plant,
    "large_fern" => Kind::Plant,
    "short_dry_grass" => Kind::Plant,
    "tall_dry_grass" => Kind::Plant,
    "bush" => Kind::Plant,
    "dead_bush" => Kind::Plant,
    "seagrass" => Kind::Plant,
    "tall_seagrass" => Kind::Plant,
    "lily_pad" => Kind::Plant,

    // Flowers
    "dandelion" => Kind::Plant,
    "poppy" => Kind::Plant,
    "blue_orchid" => Kind::Plant,
    "allium" => Kind::Plant,
    "azure_bluet" => Kind::Plant,
    "red_tulip" => Kind::Plant,
    "orange_tulip" => Kind::Plant,
    "white_tulip" => Kind::Plant,
    "pink_tulip" => Kind::Plant,
    "oxeye_daisy" => Kind::Plant,
    "cornflower" => Kind::Plant,
    "lily_of_the_valley" => Kind::Plant,
    "wither_rose" => Kind::Plant,
    "torchflower" => Kind::Plant,
    "closed_eyeblossom" => Kind::Plant,
    "open_eyeblossom" => Kind::Plant,
    "sunflower" => Kind::Plant,
    "lilac" => Kind::Plant,
    "rose_bush" => Kind::Plant,
    "peony" => Kind::Plant,
    "pitcher_plant" => Kind::Plant,
    "pink_petals" => Kind::Plant,
    "wildflowers" => Kind::Plant,
    "leaf_litter" => Kind::Plant,
    "cactus_flower" => Kind::Plant,
    "firefly_bush" => Kind::Plant,

    // Saplings and propagules
    "oak_sapling" => Kind::Plant,
    "spruce_sapling" => Kind::Plant,
    "birch_sapling" => Kind::Plant,
    "jungle_sapling" => Kind::Plant,
    "acacia_sapling" => Kind::Plant,
    "dark_oak_sapling" => Kind::Plant,
    "pale_oak_sapling" => Kind::Plant,
    "cherry_sapling" => Kind::Plant,
    "mangrove_propagule" => Kind::Plant,
    "azalea" => Kind::Plant,
    "flowering_azalea" => Kind::Plant,

    // Crops
    "wheat" => Kind::Plant,
    "carrots" => Kind::Plant,
    "potatoes" => Kind::Plant,
    "beetroots" => Kind::Plant,
    "torchflower_crop" => Kind::Plant,
    "pitcher_crop" => Kind::Plant,
    "sweet_berry_bush" => Kind::Plant,
    "nether_wart" => Kind::Plant,

    // Fungi, mushrooms, roots and sprouts
    "brown_mushroom" => Kind::Plant,
    "red_mushroom" => Kind::Plant,
    "crimson_fungus" => Kind::Plant,
    "warped_fungus" => Kind::Plant,
    "crimson_roots" => Kind::Plant,
    "warped_roots" => Kind::Plant,
    "nether_sprouts" => Kind::Plant,
};
