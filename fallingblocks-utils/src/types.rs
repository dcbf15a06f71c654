//! Block positions and namespaced identifiers.

use std::{
    borrow::Cow,
    fmt::{self, Display},
    str::FromStr,
};

use crate::math::Vector3;

/// A block position on the integer voxel lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    /// Creates a block position from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The block containing the given point.
    #[must_use]
    pub fn containing(point: Vector3<f64>) -> Self {
        Self(point.floor())
    }

    /// The x coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.0.x
    }

    /// The y coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.0.y
    }

    /// The z coordinate.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.0.z
    }

    /// Returns this position moved by the given deltas.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dy, self.0.z + dz)
    }

    /// The position directly below.
    #[must_use]
    pub const fn below(&self) -> Self {
        self.offset(0, -1, 0)
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

/// A namespaced identifier such as `minecraft:stone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocation {
    /// Namespace, `minecraft` for vanilla blocks.
    pub namespace: Cow<'static, str>,
    /// Path within the namespace.
    pub path: Cow<'static, str>,
}

impl ResourceLocation {
    /// The namespace of vanilla content.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// A vanilla location from a static path.
    #[must_use]
    pub const fn vanilla_static(path: &'static str) -> Self {
        ResourceLocation {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    /// Whether this lives in the vanilla namespace.
    #[must_use]
    pub fn is_vanilla(&self) -> bool {
        self.namespace == Self::VANILLA_NAMESPACE
    }

    /// Characters allowed in a namespace.
    #[must_use]
    pub fn valid_namespace_char(namespace_char: char) -> bool {
        namespace_char == '_'
            || namespace_char == '-'
            || namespace_char.is_ascii_lowercase()
            || namespace_char.is_ascii_digit()
            || namespace_char == '.'
    }

    /// Characters allowed in a path: namespace characters plus `/`.
    #[must_use]
    pub fn valid_path_char(path_char: char) -> bool {
        Self::valid_namespace_char(path_char) || path_char == '/'
    }

    /// Whether every character of `namespace` is allowed.
    #[must_use]
    pub fn validate_namespace(namespace: &str) -> bool {
        namespace.chars().all(Self::valid_namespace_char)
    }

    /// Whether every character of `path` is allowed.
    #[must_use]
    pub fn validate_path(path: &str) -> bool {
        path.chars().all(Self::valid_path_char)
    }
}

impl Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceLocation {
    type Err = String;

    /// Parses `namespace:path`, or a bare `path` in the vanilla namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = match s.split_once(':') {
            Some((namespace, path)) => (namespace, path),
            None => (Self::VANILLA_NAMESPACE, s),
        };

        if path.is_empty() || path.contains(':') {
            return Err(format!("Invalid resource location: {s}"));
        }

        if !ResourceLocation::validate_namespace(namespace) {
            return Err(format!("Invalid namespace: {namespace}"));
        }

        if !ResourceLocation::validate_path(path) {
            return Err(format!("Invalid path: {path}"));
        }

        Ok(ResourceLocation {
            namespace: Cow::Owned(namespace.to_string()),
            path: Cow::Owned(path.to_string()),
        })
    }
}
