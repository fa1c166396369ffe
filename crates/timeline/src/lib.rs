mod estimate;
mod range;
mod timeline;

pub use estimate::{DEFAULT_CLIP_SECS, resolve_estimates};
pub use range::{Position, TimeRange};
pub use timeline::{DEFAULT_GAP_SECS, Timeline};
