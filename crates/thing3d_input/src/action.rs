//! Named player actions

use bitflags::bitflags;

bitflags! {
    /// Set of high-level actions that input can activate
    ///
    /// Several actions can be active at once, so state is kept as a bit set
    /// rather than one flag per key.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Action: u16 {
        const MOVE_FORWARD = 1 << 0;
        const MOVE_LEFT = 1 << 1;
        const MOVE_RIGHT = 1 << 2;
        const MOVE_BACK = 1 << 3;
        const JUMP = 1 << 4;
        const PAUSE = 1 << 5;
        const SHOOT = 1 << 6;
        const AIM = 1 << 7;
        const RELOAD = 1 << 8;
        /// All four movement directions
        const MOVEMENT = Self::MOVE_FORWARD.bits()
            | Self::MOVE_LEFT.bits()
            | Self::MOVE_RIGHT.bits()
            | Self::MOVE_BACK.bits();
    }
}

impl Action {
    /// Movement input as (forward, right), each in -1.0..=1.0
    pub fn movement_axes(self) -> (f32, f32) {
        let axis = |pos: Action, neg: Action| {
            (self.contains(pos) as i32 - self.contains(neg) as i32) as f32
        };
        (
            axis(Action::MOVE_FORWARD, Action::MOVE_BACK),
            axis(Action::MOVE_RIGHT, Action::MOVE_LEFT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_axes() {
        assert_eq!(Action::empty().movement_axes(), (0.0, 0.0));
        assert_eq!(Action::MOVE_FORWARD.movement_axes(), (1.0, 0.0));
        assert_eq!((Action::MOVE_BACK | Action::MOVE_LEFT).movement_axes(), (-1.0, -1.0));
        // Opposite keys cancel
        assert_eq!((Action::MOVE_LEFT | Action::MOVE_RIGHT).movement_axes(), (0.0, 0.0));
    }

    #[test]
    fn test_movement_mask() {
        assert!(Action::MOVEMENT.contains(Action::MOVE_BACK));
        assert!(!Action::MOVEMENT.contains(Action::JUMP));
    }
}
