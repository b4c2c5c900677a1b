//! Reading-time estimation

/// Default reading speed
pub const WORDS_PER_MINUTE: u32 = 200;

/// Estimated minutes to read `text` at the default speed.
///
/// Words are whitespace-separated runs; markdown syntax is counted as-is.
/// Empty or whitespace-only text takes 0 minutes.
pub fn calculate_reading_time(text: &str) -> u32 {
    reading_time_with_speed(text, WORDS_PER_MINUTE)
}

/// Estimated minutes to read `text` at `words_per_minute`, rounded up
pub fn reading_time_with_speed(text: &str, words_per_minute: u32) -> u32 {
    let words = text.split_whitespace().count();
    let speed = words_per_minute.max(1) as usize;
    words.div_ceil(speed) as u32
}
