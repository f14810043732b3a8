//! Price estimation: word count times base rate times domain multiplier.

use crate::job::Domain;

/// Price per word in the single supported currency.
pub const BASE_RATE: f64 = 0.05;

/// Number of whitespace-delimited tokens in the original text.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

fn domain_multiplier(domain: Domain) -> f64 {
    match domain {
        Domain::Legal => 1.5,
        Domain::Medical => 1.6,
        Domain::Technical => 1.3,
        Domain::Other => 1.0,
    }
}

/// Deterministic price estimate, rounded to two decimal places.
pub fn price(word_count: u64, domain: Domain) -> f64 {
    let amount = word_count as f64 * BASE_RATE * domain_multiplier(domain);
    (amount * 100.0).round() / 100.0
}
