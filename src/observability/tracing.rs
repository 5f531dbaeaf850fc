use tracing::Span;

use crate::types::ids::FeedId;

pub fn trace_update_cycle(feed_id: &FeedId) -> Span {
    tracing::info_span!(
        "update_cycle",
        feed_id = %feed_id,
    )
}
