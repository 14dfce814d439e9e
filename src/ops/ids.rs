use chrono::Utc;
use rand::Rng;

/// Milliseconds since the epoch, the base of every generated id
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Build `<prefix>-<millis>[<suffix>]`, appending `-2`, `-3`, … until
/// `taken` reports the candidate as free.
pub fn unique_id(prefix: &str, millis: i64, suffix: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{}-{}{}", prefix, millis, suffix);
    if !taken(&base) {
        return base;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

const TAIL_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TAIL_LEN: usize = 6;

/// Six random lowercase base-36 characters
fn random_tail(rng: &mut impl Rng) -> String {
    (0..TAIL_LEN)
        .map(|_| char::from(TAIL_ALPHABET[rng.gen_range(0..TAIL_ALPHABET.len())]))
        .collect()
}

/// A user id: `user-<millis>-<6 random base-36 chars>`
pub fn user_id(taken: impl Fn(&str) -> bool) -> String {
    let tail = random_tail(&mut rand::thread_rng());
    unique_id("user", now_millis(), &format!("-{}", tail), taken)
}
