use super::vertex::VertId;

/// Triangle face: three corner handles and an alive flag. Corners are
/// rewritten in place when a collapse re-parents one of them; the face dies
/// when its corners stop being distinct.
#[derive(Debug, Clone)]
pub struct Face {
    pub corners: [VertId; 3],
    pub alive: bool,
}

impl Face {
    pub fn new(corners: [VertId; 3]) -> Self {
        Self {
            corners,
            alive: true,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.corners;
        a == b || b == c || a == c
    }
}
