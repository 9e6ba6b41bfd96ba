#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    Forward,
    Backward,
}

impl EdgeDirection {
    pub fn opposite(&self) -> Self {
        match self {
            EdgeDirection::Forward => EdgeDirection::Backward,
            EdgeDirection::Backward => EdgeDirection::Forward,
        }
    }
}
