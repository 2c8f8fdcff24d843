//! Random mailbox address generation.

use crate::Address;
use rand::Rng;

const PREFIXES: &[&str] = &[
    "anon", "temp", "secret", "private", "ghost", "stealth", "secure", "masked",
];
const DOMAINS: &[&str] = &["1secmail.com", "1secmail.org", "1secmail.net"];
const SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh random address: a vocabulary prefix plus a base-36
/// suffix, on one of the provider domains.
pub fn generate() -> Address {
    let mut rng = rand::thread_rng();
    let prefix = PREFIXES[rng.gen_range(0..PREFIXES.len())];
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    Address {
        local_part: format!("{prefix}{suffix}"),
        domain: pick_domain(&mut rng),
    }
}

/// Pair a caller-chosen local part with a random provider domain.
///
/// The local part is used verbatim; none of the random-prefix logic applies.
pub fn with_local_part(local_part: &str) -> Address {
    let mut rng = rand::thread_rng();
    Address {
        local_part: local_part.to_string(),
        domain: pick_domain(&mut rng),
    }
}

fn pick_domain<R: Rng>(rng: &mut R) -> String {
    DOMAINS[rng.gen_range(0..DOMAINS.len())].to_string()
}
