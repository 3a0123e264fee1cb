// Content calendar: scheduling approved posts and the dashboard figures
// derived from them. Storage goes through store::ContentStore.

pub mod handlers;
pub mod stats;
