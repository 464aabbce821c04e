//! Account identifiers: deterministic generation and display formatting.
//!
//! Generated ids look like `ACC_JOHN_SMITH` or `ACC_HARBOR_CAPITAL`; the
//! display form of both is title case without the prefix.

use crate::rng::StreamRng;

pub struct NameGenerator;

impl NameGenerator {
    /// Personal (`PREFIX` + `FIRST_LAST`) or business (`PREFIX` + `WORD_KIND`) id.
    pub fn generate_account_id(rng: &mut StreamRng, prefix: &str) -> String {
        let (head, tail) = if rng.chance(0.7) {
            (Self::first_names(), Self::last_names())
        } else {
            (Self::business_words(), Self::business_kinds())
        };
        let first = rng.pick(head);
        let second = rng.pick(tail);
        format!("{prefix}{}_{}", first.to_uppercase(), second.to_uppercase())
    }

    /// `count` distinct ids. Collisions get a numeric suffix.
    pub fn generate_pool(rng: &mut StreamRng, prefix: &str, count: usize) -> Vec<String> {
        let mut pool: Vec<String> = Vec::with_capacity(count);
        while pool.len() < count {
            let mut id = Self::generate_account_id(rng, prefix);
            if pool.contains(&id) {
                id = format!("{id}_{}", pool.len());
            }
            pool.push(id);
        }
        pool
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "James", "Maria", "Robert", "Aisha", "Michael", "Chen", "William", "Fatima",
            "David", "Elena", "Joseph", "Priya", "Thomas", "Sofia", "Daniel", "Yuki",
            "Samuel", "Amara", "Lucas", "Ingrid", "Omar", "Grace", "Victor", "Nadia",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Garcia", "Johnson", "Okafor", "Brown", "Nguyen", "Miller", "Kowalski",
            "Davis", "Rossi", "Wilson", "Tanaka", "Moore", "Haddad", "Taylor", "Silva",
            "Anderson", "Mensah", "Clark", "Lindqvist", "Lewis", "Patel", "Walker", "Novak",
        ]
    }

    fn business_words() -> &'static [&'static str] {
        &[
            "Harbor", "Summit", "Northwind", "Atlas", "Meridian", "Cobalt", "Pioneer",
            "Sterling", "Redwood", "Keystone", "Beacon", "Granite",
        ]
    }

    fn business_kinds() -> &'static [&'static str] {
        &["Capital", "Holdings", "Trading", "Logistics", "Partners", "Ventures", "Imports"]
    }
}

/// Display form of an account id: prefix stripped, underscores to spaces,
/// each word capitalised. `ACC_JOHN_SMITH` becomes `John Smith`.
pub fn display_name(account_id: &str, prefix: &str) -> String {
    let body = account_id.strip_prefix(prefix).unwrap_or(account_id);
    let mut out = String::with_capacity(body.len());
    let mut at_word_start = true;
    for ch in body.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn display_names() {
        assert_eq!(display_name("ACC_JOHN_SMITH", "ACC_"), "John Smith");
        assert_eq!(display_name("ACC_offshore_llc", "ACC_"), "Offshore Llc");
        assert_eq!(display_name("VENDOR_42", "ACC_"), "Vendor 42");
        assert_eq!(display_name("ACC_O-NEIL", "ACC_"), "O-Neil");
        assert_eq!(display_name("", "ACC_"), "");
    }

    #[test]
    fn generation_is_deterministic() {
        let mut a = RngBank::new(12345).for_stream(StreamSlot::Accounts);
        let mut b = RngBank::new(12345).for_stream(StreamSlot::Accounts);
        assert_eq!(
            NameGenerator::generate_account_id(&mut a, "ACC_"),
            NameGenerator::generate_account_id(&mut b, "ACC_"),
            "Same seed should produce same id"
        );
    }

    #[test]
    fn pool_ids_are_distinct_and_prefixed() {
        let mut rng = RngBank::new(3).for_stream(StreamSlot::Accounts);
        let pool = NameGenerator::generate_pool(&mut rng, "ACC_", 200);
        assert_eq!(pool.len(), 200);

        let mut sorted = pool.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 200, "pool should have no duplicate ids");
        assert!(pool.iter().all(|id| id.starts_with("ACC_")));
    }
}
