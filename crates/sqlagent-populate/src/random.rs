//! Random fact helpers. Pure functions over any [`Rng`]; no side effects.

use chrono::{Duration, NaiveDateTime};
use rand::{Rng, seq::SliceRandom};

pub const EMAIL_DOMAINS: [&str; 3] = ["example.com", "mail.com", "test.com"];

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Derive a plausible email from a display name:
/// `"Jane Doe"` → `jane.doe42@mail.com`.
///
/// Not unique across calls; callers that need uniqueness must check.
pub fn random_email<R: Rng + ?Sized>(rng: &mut R, name: &str) -> String {
  let local = name.to_lowercase().replace(' ', ".");
  let n: u32 = rng.gen_range(1..=100);
  let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or(EMAIL_DOMAINS[0]);
  format!("{local}{n}@{domain}")
}

/// `len` characters drawn uniformly from `a-zA-Z`.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
  (0..len)
    .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
    .collect()
}

/// A uniformly chosen instant `start + k days`, where `k` ranges over the
/// whole days in `[start, end)`.
///
/// When the span is shorter than one day (including `start == end` and
/// `end < start`) there is no offset to choose and `start` is returned.
pub fn random_date<R: Rng + ?Sized>(
  rng: &mut R,
  start: NaiveDateTime,
  end: NaiveDateTime,
) -> NaiveDateTime {
  let span_days = (end - start).num_days();
  if span_days <= 0 {
    return start;
  }
  start + Duration::days(rng.gen_range(0..span_days))
}
