//! Touch input decoding.

use crate::error::RenderError;

/// Phase of a single-pointer touch gesture, as reported by the host view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

impl TryFrom<i32> for TouchPhase {
    type Error = RenderError;

    /// Host codes: 0 = down, 1 = move, 2 = up.
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TouchPhase::Down),
            1 => Ok(TouchPhase::Move),
            2 => Ok(TouchPhase::Up),
            other => Err(RenderError::UnknownTouchState(other)),
        }
    }
}
