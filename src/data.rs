//! Generated test data
//!
//! Random identities and note content in the shape the target application
//! accepts. Emails use the reserved example.com domain so nothing generated
//! here can reach a real mailbox.

use rand::seq::SliceRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Clara", "Diego", "Elena", "Felix", "Greta", "Hugo", "Iris", "Jonas", "Karin",
    "Luca", "Marta", "Nils", "Olga", "Pavel", "Rosa", "Sven", "Tara", "Viktor",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Becker", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Haines", "Ivanov",
    "Jensen", "Keller", "Lindqvist", "Moreau", "Novak", "Okafor", "Petrov", "Rossi", "Silva",
    "Tanaka", "Weber",
];

const WORDS: &[&str] = &[
    "quiet", "ledger", "harbor", "crimson", "lattice", "meadow", "orbit", "pepper", "quartz",
    "ripple", "saffron", "timber", "umbra", "velvet", "willow", "zephyr", "anchor", "bramble",
    "cascade", "drift", "ember", "fathom", "glacier", "hollow", "ivory", "juniper", "kestrel",
    "lantern", "mosaic", "nectar",
];

const PASSWORD_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Note categories accepted by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Home,
    Work,
    Personal,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Home, Category::Work, Category::Personal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Home => "Home",
            Category::Work => "Work",
            Category::Personal => "Personal",
        }
    }

    pub fn random() -> Category {
        *Self::ALL.choose(&mut rand::thread_rng()).unwrap()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn full_name() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{} {}",
        FIRST_NAMES.choose(&mut rng).unwrap(),
        LAST_NAMES.choose(&mut rng).unwrap()
    )
}

/// Lowercased address on the reserved example.com domain, unique enough for
/// one suite run via a random numeric suffix.
pub fn email() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{}.{}{}@example.com",
        FIRST_NAMES.choose(&mut rng).unwrap().to_lowercase(),
        LAST_NAMES.choose(&mut rng).unwrap().to_lowercase(),
        rng.gen_range(100_000..1_000_000),
    )
}

pub fn password(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| *PASSWORD_CHARS.choose(&mut rng).unwrap() as char)
        .collect()
}

/// Space-separated random words, for titles and descriptions.
pub fn words(count: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| *WORDS.choose(&mut rng).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fixed-length string of random digits (phone numbers, scoping ids).
pub fn numeric(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(0..10).to_string()).collect()
}

/// Username-shaped company name.
pub fn company() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{}{}{}",
        WORDS.choose(&mut rng).unwrap(),
        WORDS.choose(&mut rng).unwrap(),
        rng.gen_range(10..100),
    )
}
