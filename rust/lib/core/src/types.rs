/// Generate a record id from the current time (milliseconds since the Unix
/// epoch, decimal). Two ids created within the same millisecond collide.
pub fn new_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
