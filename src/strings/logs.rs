pub const STARTING: &str = "Starting word-cloud bot...";
pub const AUTH_SUCCESS: &str = "Authentication successful.";
pub const CHECK_SUCCESS: &str = "Validation run succeeded, exiting before streaming.";
pub const STREAM_START: &str = "Started streaming...";
pub const STREAM_END: &str = "Finished streaming.";

pub fn greeting(handle: &str) -> String {
    format!("Hello @{handle}!")
}

pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub fn tweeted(text: &str) -> String {
    format!("-> Tweeted \"{text}\"")
}

pub fn reply_failed(id: u64, err: &str) -> String {
    format!("Failed to reply to {id}: {err}")
}

pub fn image_saved(path: &str) -> String {
    format!("-> Saved a wordcloud image to \"{path}\"")
}
