use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Which panel presents the loaded dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ViewKind {
    Map,
    Points,
}

pub trait Layer {
    fn id(&self) -> LayerId;

    fn view_kind(&self) -> ViewKind;

    fn is_loaded(&self) -> bool;

    /// Drops the source data and every derived view.
    fn clear(&mut self);
}
