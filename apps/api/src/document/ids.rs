use chrono::{DateTime, Utc};
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;

/// Generates a block id of the form `block-<unix-millis>-<9 lowercase alnum>`.
pub fn generate_block_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("block-{}-{}", now.timestamp_millis(), &random[..SUFFIX_LEN])
}
