use serde::Serialize;

/// Upload flow: `Empty -> Staging (below the minimum) -> Ready`. Add and
/// remove move freely between the non-empty states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Empty,
    Staging,
    Ready,
}

impl FlowState {
    pub fn from_count(count: usize, min_images: usize) -> Self {
        if count == 0 {
            FlowState::Empty
        } else if count < min_images {
            FlowState::Staging
        } else {
            FlowState::Ready
        }
    }

    pub fn can_proceed(self) -> bool {
        self == FlowState::Ready
    }
}

/// How many more images are needed before the flow is ready
pub fn images_needed(count: usize, min_images: usize) -> usize {
    min_images.saturating_sub(count)
}
