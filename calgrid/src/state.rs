use crate::{ScrollPosition, Viewport};

/// A lightweight, serializable snapshot of one rendered frame.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: Viewport,
    pub scroll: ScrollPosition,
    /// `false` while the container is unmeasured or a resize is settling.
    pub is_ready: bool,
    pub hovered_date: Option<usize>,
}
