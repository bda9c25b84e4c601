use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);
impl fmt::Display for BodyId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "BodyId({})", self.0) } }

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub u32);
impl fmt::Display for ColliderId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "ColliderId({})", self.0) } }

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SpringId(pub u32);
impl fmt::Display for SpringId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "SpringId({})", self.0) } }

/// Registered locomotion-controller instance in a world.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CtrlId(pub u32);
impl fmt::Display for CtrlId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "CtrlId({})", self.0) } }

/// Tracked motion controller. Exactly two per rig.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandId { Left, Right }

impl HandId {
    #[inline] pub fn index(self) -> usize {
        match self { HandId::Left => 0, HandId::Right => 1 }
    }
}
impl fmt::Display for HandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { HandId::Left => write!(f, "left"), HandId::Right => write!(f, "right") }
    }
}
