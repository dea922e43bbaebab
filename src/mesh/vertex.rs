use glam::DVec3;

use super::quadric::Quadric;

/// Handle into the vertex arena. Stable for the lifetime of a run; dense
/// renumbering only happens at compaction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VertId(pub u32);

impl From<usize> for VertId {
    fn from(value: usize) -> Self {
        VertId(value as u32)
    }
}

impl From<VertId> for usize {
    fn from(value: VertId) -> Self {
        value.0 as usize
    }
}

impl VertId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Vertex record: position (rewritten by every collapse that merges into
/// it), monotonically summed quadric, and an alive flag. Dead vertices stay
/// in the arena until compaction.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: DVec3,
    pub quadric: Quadric,
    pub alive: bool,
}

impl Vertex {
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            quadric: Quadric::ZERO,
            alive: true,
        }
    }
}
