//! Logical sides of a character and their mapping to surface normal angles.
//!
//! The four concrete sides split the circle into 90 degree arcs centered on
//! 0 / 90 / 180 / 270 with boundaries at 45 / 135 / 225 / 315:
//!
//! | side   | normal arc               | center |
//! |--------|--------------------------|--------|
//! | Right  | `[315, 360) ∪ [0, 45)`   | 0      |
//! | Top    | `[45, 135)`              | 90     |
//! | Left   | `[135, 225)`             | 180    |
//! | Bottom | `[225, 315)`             | 270    |
//!
//! A boundary angle belongs to the arc it opens (lower bound inclusive, upper bound exclusive).
//! That tie-break decides which side a character treats as "down" at the exact transition of
//! a loop or wall, so it is tested explicitly.

use crate::utils::positive_angle_deg;

/// Which face of the character is probing or touching terrain.
///
/// `Any` is a query wildcard ("accept hits on any side"). It never appears as a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LogicalSide {
    Right,
    Top,
    Left,
    Bottom,
    #[default]
    Any,
}

impl LogicalSide {
    /// The concrete sides in counter-clockwise order starting at `Right`.
    pub const ALL: [LogicalSide; 4] = [
        LogicalSide::Right,
        LogicalSide::Top,
        LogicalSide::Left,
        LogicalSide::Bottom,
    ];

    #[inline]
    pub fn is_any(self) -> bool {
        matches!(self, LogicalSide::Any)
    }

    /// The side facing the other way. `Any` stays `Any`.
    #[inline]
    pub fn opposite(self) -> LogicalSide {
        match self {
            LogicalSide::Right => LogicalSide::Left,
            LogicalSide::Top => LogicalSide::Bottom,
            LogicalSide::Left => LogicalSide::Right,
            LogicalSide::Bottom => LogicalSide::Top,
            LogicalSide::Any => LogicalSide::Any,
        }
    }

    /// Rotate counter-clockwise by `quarter_turns` quarter turns. `Any` stays `Any`.
    #[inline]
    pub fn rotate_ccw(self, quarter_turns: i32) -> LogicalSide {
        match self.index() {
            Some(i) => Self::ALL[(i as i32 + quarter_turns).rem_euclid(4) as usize],
            None => LogicalSide::Any,
        }
    }

    /// Position in [`LogicalSide::ALL`]; `None` for `Any`.
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            LogicalSide::Right => Some(0),
            LogicalSide::Top => Some(1),
            LogicalSide::Left => Some(2),
            LogicalSide::Bottom => Some(3),
            LogicalSide::Any => None,
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self.index() {
            Some(i) => 1 << i,
            None => SideMask::ALL.0,
        }
    }
}

/// Map a surface normal angle (degrees) to the side it faces.
///
/// The angle is wrapped into `[0, 360)` first, so `side_of(a) == side_of(a + 360 * k)`.
/// Total: every input maps to exactly one concrete side.
#[inline]
pub fn side_of(angle_deg: f32) -> LogicalSide {
    let normal = positive_angle_deg(angle_deg);
    if normal >= 315.0 || normal < 45.0 {
        LogicalSide::Right
    } else if normal < 135.0 {
        LogicalSide::Top
    } else if normal < 225.0 {
        LogicalSide::Left
    } else {
        LogicalSide::Bottom
    }
}

/// Center of the normal arc owned by `side`.
///
/// # Panics
/// `LogicalSide::Any` has no angle; passing it is a caller bug.
#[inline]
pub fn angle_of(side: LogicalSide) -> f32 {
    match side {
        LogicalSide::Right => 0.0,
        LogicalSide::Top => 90.0,
        LogicalSide::Left => 180.0,
        LogicalSide::Bottom => 270.0,
        LogicalSide::Any => panic!("angle_of called with LogicalSide::Any; it has no angle"),
    }
}

/// The body-local side that faces world direction `world_side` when the body is rotated by
/// `rotation_deg` (counter-clockwise).
///
/// A body rotated a quarter turn onto a right-hand wall has its `Bottom` facing world `Right`.
#[inline]
pub fn relative_side(world_side: LogicalSide, rotation_deg: f32) -> LogicalSide {
    if world_side.is_any() {
        return LogicalSide::Any;
    }
    let local = positive_angle_deg(angle_of(world_side) - rotation_deg);
    side_of(local)
}

/// A set of concrete sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SideMask(u8);

impl SideMask {
    pub const NONE: SideMask = SideMask(0);
    pub const ALL: SideMask = SideMask(0b1111);

    pub fn of(sides: &[LogicalSide]) -> Self {
        SideMask(sides.iter().fold(0, |acc, s| acc | s.bit()))
    }

    /// True when `side` is in the set. `Any` matches a non-empty set.
    pub fn contains(self, side: LogicalSide) -> bool {
        self.0 & side.bit() != 0
    }

    pub fn with(self, side: LogicalSide) -> Self {
        SideMask(self.0 | side.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_angles_resolve_to_the_arc_they_open() {
        assert_eq!(side_of(0.0), LogicalSide::Right);
        assert_eq!(side_of(44.999), LogicalSide::Right);
        assert_eq!(side_of(45.0), LogicalSide::Top);
        assert_eq!(side_of(134.999), LogicalSide::Top);
        assert_eq!(side_of(135.0), LogicalSide::Left);
        assert_eq!(side_of(225.0), LogicalSide::Bottom);
        assert_eq!(side_of(315.0), LogicalSide::Right);
        assert_eq!(side_of(359.999), LogicalSide::Right);
    }

    #[test]
    fn side_of_is_wrap_invariant() {
        // Sweep the circle in small steps and compare against shifted copies.
        let mut a = 0.0f32;
        while a < 360.0 {
            let base = side_of(a);
            assert!(!base.is_any());
            for k in [-3.0f32, -1.0, 1.0, 2.0] {
                assert_eq!(side_of(a + 360.0 * k), base, "angle {a} shifted by {k} turns");
            }
            a += 0.5;
        }
    }

    #[test]
    fn negative_angles_wrap_before_mapping() {
        assert_eq!(side_of(-90.0), LogicalSide::Bottom);
        assert_eq!(side_of(-45.0), LogicalSide::Right);
        assert_eq!(side_of(-46.0), LogicalSide::Bottom);
    }

    #[test]
    fn arc_centers_round_trip() {
        for side in LogicalSide::ALL {
            assert_eq!(side_of(angle_of(side)), side);
            assert_eq!(angle_of(side_of(angle_of(side))), angle_of(side));
        }
    }

    #[test]
    #[should_panic]
    fn angle_of_any_is_rejected() {
        let _ = angle_of(LogicalSide::Any);
    }

    #[test]
    fn opposite_and_rotation_cycle_through_sides() {
        assert_eq!(LogicalSide::Bottom.opposite(), LogicalSide::Top);
        assert_eq!(LogicalSide::Any.opposite(), LogicalSide::Any);
        assert_eq!(LogicalSide::Right.rotate_ccw(1), LogicalSide::Top);
        assert_eq!(LogicalSide::Right.rotate_ccw(-1), LogicalSide::Bottom);
        assert_eq!(LogicalSide::Left.rotate_ccw(6), LogicalSide::Right);
    }

    #[test]
    fn relative_side_follows_body_rotation() {
        // Upright body: world down is local bottom.
        assert_eq!(relative_side(LogicalSide::Bottom, 0.0), LogicalSide::Bottom);
        // Running up a right-hand wall (rotated 90): world right is the local bottom.
        assert_eq!(relative_side(LogicalSide::Right, 90.0), LogicalSide::Bottom);
        // Upside down on a loop ceiling.
        assert_eq!(relative_side(LogicalSide::Top, 180.0), LogicalSide::Bottom);
    }

    #[test]
    fn side_mask_membership() {
        let from_above = SideMask::of(&[LogicalSide::Bottom]);
        assert!(from_above.contains(LogicalSide::Bottom));
        assert!(!from_above.contains(LogicalSide::Top));
        assert!(from_above.contains(LogicalSide::Any));
        assert!(!SideMask::NONE.contains(LogicalSide::Any));
        assert_eq!(SideMask::of(&[LogicalSide::Any]), SideMask::ALL);
    }
}
