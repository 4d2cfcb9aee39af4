//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash`, so they work as map keys and sort keys.
//! The inner integer is `pub` so registries can index `Vec`s with
//! `id.0 as usize`; prefer `.index()` at call sites.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" (the inner type's `MAX`).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `true` unless this is the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an NPC agent in registry storage.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a flock (one leader plus its followers) in the flock registry.
    pub struct FlockId(u16);
}

typed_id! {
    /// Index of a static obstacle known to the spatial query service.
    pub struct ObstacleId(u32);
}

typed_id! {
    /// Identity of one odor marker.  Never reused within a run, so a sensor
    /// can tell a fresh marker from one it is already standing in.
    pub struct OdorId(u32);
}

typed_id! {
    /// Index of a patrol route.
    pub struct RouteId(u16);
}
