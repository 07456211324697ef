//! Push-id insertion keys
//!
//! Generates 20-character keys in the realtime-database push-id format: eight
//! characters of millisecond timestamp followed by twelve random characters,
//! all drawn from a 64-symbol alphabet whose byte order matches its value
//! order. Keys therefore sort chronologically. Within one millisecond the
//! random tail is incremented instead of redrawn, so a single generator never
//! repeats a key.

use blindpoll_core::{InsertionKeyEffects, StorePath};
use parking_lot::Mutex;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIME_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;

/// Length of every generated key.
pub const PUSH_ID_LEN: usize = TIME_CHARS + RANDOM_CHARS;

#[derive(Debug, Default)]
struct PushIdState {
    last_ms: u64,
    last_random: [u8; RANDOM_CHARS],
}

/// Push-id generator backed by the system clock and thread RNG.
#[derive(Debug, Default)]
pub struct PushIdGenerator {
    state: Mutex<PushIdState>,
}

impl PushIdGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for wall-clock time `now_ms`.
    pub fn generate_at(&self, now_ms: u64) -> String {
        let mut state = self.state.lock();

        // Never step backwards, or keys would stop sorting by creation.
        let now_ms = now_ms.max(state.last_ms);
        let same_ms = now_ms == state.last_ms;
        state.last_ms = now_ms;

        if same_ms {
            increment(&mut state.last_random);
        } else {
            let mut rng = rand::thread_rng();
            for slot in state.last_random.iter_mut() {
                *slot = rng.gen_range(0..64);
            }
        }

        let mut key = String::with_capacity(PUSH_ID_LEN);
        let mut time_digits = [0u8; TIME_CHARS];
        let mut remaining = now_ms;
        for digit in time_digits.iter_mut().rev() {
            *digit = (remaining % 64) as u8;
            remaining /= 64;
        }
        key.extend(time_digits.iter().map(|&d| PUSH_CHARS[d as usize] as char));
        key.extend(
            state
                .last_random
                .iter()
                .map(|&d| PUSH_CHARS[d as usize] as char),
        );
        key
    }
}

impl InsertionKeyEffects for PushIdGenerator {
    fn new_insertion_key(&self, scope: &StorePath) -> String {
        let key = self.generate_at(now_ms());
        tracing::trace!(scope = %scope, key = %key, "generated push id");
        key
    }
}

/// Add one to a base-64 big-endian counter, wrapping at the top.
fn increment(digits: &mut [u8; RANDOM_CHARS]) {
    for digit in digits.iter_mut().rev() {
        if *digit == 63 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
