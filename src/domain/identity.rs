use super::actor::{Actor, Role};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const DEFAULT_PASSWORD: &str = "Pass@123";
pub const DEFAULT_NID: &str = "123456789";

/// Random digits appended after the role prefix.
const PHONE_SUFFIX_DIGITS: usize = 6;

const FIRST_NAMES: &[&str] = &[
    "Abdul", "Amina", "Arif", "Farhana", "Hasan", "Jannat", "Karim", "Laila", "Mahmud", "Nadia",
    "Omar", "Rafi", "Sadia", "Tanvir", "Zara", "Ethan", "Olivia", "Lucas", "Maya", "Noah",
];

const LAST_NAMES: &[&str] = &[
    "Ahmed", "Begum", "Chowdhury", "Das", "Hossain", "Islam", "Khan", "Miah", "Rahman", "Sarkar",
    "Uddin", "Brown", "Garcia", "Miller", "Wilson",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.net", "example.org", "test.dev"];

/// Synthesizes throwaway identities for actors created during a run.
pub struct IdentityGenerator {
    rng: StdRng,
}

impl IdentityGenerator {
    /// Generator seeded from OS entropy, so every run creates fresh actors.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }

    /// Builds an actor for `role` with no platform id yet.
    pub fn actor(&mut self, role: Role) -> Actor {
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        let domain = self.pick(EMAIL_DOMAINS);
        let tag: u32 = self.rng.gen_range(0..10_000);

        Actor {
            name: format!("{first} {last}"),
            email: format!("{first}.{last}{tag}@{domain}").to_lowercase(),
            password: DEFAULT_PASSWORD.to_string(),
            phone: self.phone(role),
            nid: DEFAULT_NID.to_string(),
            role,
            id: None,
        }
    }

    pub fn phone(&mut self, role: Role) -> String {
        let suffix: u32 = self.rng.gen_range(0..1_000_000);
        format!(
            "{}{:0width$}",
            role.phone_prefix(),
            suffix,
            width = PHONE_SUFFIX_DIGITS
        )
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items.choose(&mut self.rng).copied().unwrap_or("User")
    }
}

impl Default for IdentityGenerator {
    fn default() -> Self {
        Self::new()
    }
}
