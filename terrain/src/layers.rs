use num_traits::{One, PrimInt};

/// The default primitive storage for collision layer masks.
/// Layer enums backed by smaller sizes (u8/u16) remain possible when appropriate.
pub type LayerBits = u32;

/// Trait implemented by collision layer enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index.
/// The backing integer type is chosen via the associated `Storage`.
pub trait LayerFlag {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A set of collision layers.
///
/// Every surface belongs to one or more layers; a terrain cast carries a mask of the layers it
/// is allowed to see. A surface is a candidate when the two masks share at least one bit.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask<T: PrimInt = LayerBits> {
    pub bits: T,
}

impl<T: PrimInt> LayerMask<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    /// Mask matching every layer.
    pub fn all() -> Self {
        Self { bits: !T::zero() }
    }

    /// Mask matching nothing.
    pub fn none() -> Self {
        Self { bits: T::zero() }
    }

    pub fn of<U: LayerFlag<Storage = T> + Copy>(layers: &[U]) -> Self {
        let mut mask = Self::none();
        mask.insert_many(layers);
        mask
    }

    // --- Single Layer Operations ---
    pub fn insert<U: LayerFlag<Storage = T>>(&mut self, layer: U) {
        self.bits = self.bits | layer.mask();
    }

    pub fn remove<U: LayerFlag<Storage = T>>(&mut self, layer: U) {
        self.bits = self.bits & !layer.mask();
    }

    pub fn contains<U: LayerFlag<Storage = T>>(&self, layer: U) -> bool {
        (self.bits & layer.mask()) != T::zero()
    }

    /// Builder form of [`LayerMask::insert`].
    pub fn with<U: LayerFlag<Storage = T>>(mut self, layer: U) -> Self {
        self.insert(layer);
        self
    }

    // --- Bulk Operations ---
    pub fn insert_many<U: LayerFlag<Storage = T> + Copy>(&mut self, layers: &[U]) {
        for &layer in layers {
            self.insert(layer);
        }
    }

    /// True when the two masks share at least one layer.
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

/// Declare a layer enum and implement `LayerFlag` for it.
///
/// Example:
/// ```rust
/// terrain::define_layers!(LevelLayer, u16, {
///     Ground,
///     Background,
///     Loops,
/// });
/// ```
#[macro_export]
macro_rules! define_layers {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::layers::LayerFlag for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_layers!(TerrainLayer, LayerBits, {
    Solid,
    Platforms,
    Areas,
    Features,
});

impl TerrainLayer {
    /// Mask used by a character's terrain probes when nothing more specific is configured.
    pub fn default_probe_mask() -> LayerMask {
        LayerMask::of(&[
            TerrainLayer::Solid,
            TerrainLayer::Platforms,
            TerrainLayer::Areas,
            TerrainLayer::Features,
        ])
    }
}
