use std::fmt;

use crate::core::EnvError;

/// Canvas coordinate as `(x, y)` = `(row, column)`.
pub type Coord = (usize, usize);

/// The three pen decisions an agent can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// Place a vertex, opening a polygon if none is open.
    PenDown = 0,
    /// Lift the pen, closing the open polygon at the given vertex.
    PenUp = 1,
    /// End the episode, closing the open polygon if any.
    Finish = 2,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::PenDown, ActionKind::PenUp, ActionKind::Finish];

    pub fn code(self) -> u32 { self as u32 }
}

impl TryFrom<u32> for ActionKind {
    type Error = EnvError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ActionKind::PenDown),
            1 => Ok(ActionKind::PenUp),
            2 => Ok(ActionKind::Finish),
            other => Err(EnvError::InvalidAction(format!("unknown action kind code {other}"))),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::PenDown => "PEN_DOWN",
            ActionKind::PenUp => "PEN_UP",
            ActionKind::Finish => "FINISH",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub kind: ActionKind,
    pub coord: Coord,
}

impl Action {
    pub fn new(kind: ActionKind, coord: Coord) -> Self { Self { kind, coord } }

    pub fn pen_down(x: usize, y: usize) -> Self { Self::new(ActionKind::PenDown, (x, y)) }
    pub fn pen_up(x: usize, y: usize) -> Self { Self::new(ActionKind::PenUp, (x, y)) }
    pub fn finish(x: usize, y: usize) -> Self { Self::new(ActionKind::Finish, (x, y)) }

    /// Decode the raw `(code, (x, y))` encoding used by policies.
    pub fn from_raw(code: u32, coord: Coord) -> Result<Self, EnvError> {
        Ok(Self::new(ActionKind::try_from(code)?, coord))
    }
}

impl From<(ActionKind, Coord)> for Action {
    fn from((kind, coord): (ActionKind, Coord)) -> Self { Self { kind, coord } }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.coord.0, self.coord.1)
    }
}
