//! Cache categories tracked per node

use bitflags::bitflags;

bitflags! {
    /// Cached values that may be stale
    ///
    /// The single-bit flags name one cache each. The composite flags describe
    /// what a particular mutation invalidates on the mutated node itself.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u16 {
        /// Scale matrix (from `scale`)
        const SCALE_MATRIX = 1 << 0;
        /// Homogeneous rotation matrix (from `orientation`)
        const ROTATION_MATRIX = 1 << 1;
        /// 3x3 orientation matrix (from `orientation`)
        const ORIENTATION_MATRIX = 1 << 2;
        /// Local matrix
        const LOCAL_MATRIX = 1 << 3;
        /// Local bounds
        const LOCAL_BOUNDS = 1 << 4;
        /// World matrix
        const WORLD_MATRIX = 1 << 5;
        /// World orientation
        const WORLD_ORIENTATION = 1 << 6;
        /// Normal matrix
        const NORMAL_MATRIX = 1 << 7;
        /// World bounds
        const WORLD_BOUNDS = 1 << 8;

        /// Everything derived from the world matrix; what descendants lose
        /// when an ancestor moves
        const WORLD = Self::WORLD_MATRIX.bits()
            | Self::WORLD_ORIENTATION.bits()
            | Self::NORMAL_MATRIX.bits()
            | Self::WORLD_BOUNDS.bits();
        /// Invalidated by a position change
        const POSITION = Self::LOCAL_MATRIX.bits()
            | Self::LOCAL_BOUNDS.bits()
            | Self::WORLD.bits();
        /// Invalidated by an orientation change
        const ORIENTATION = Self::ROTATION_MATRIX.bits()
            | Self::ORIENTATION_MATRIX.bits()
            | Self::POSITION.bits();
        /// Invalidated by a scale change
        const SCALE = Self::SCALE_MATRIX.bits() | Self::POSITION.bits();
    }
}
