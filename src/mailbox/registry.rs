//! Mailbox registry
//!
//! Holds every registered mailbox under two keys, its address and its name.
//! Both maps share the same `Arc<Mailbox>` values and are only ever written
//! together, so each is injective and they always describe the same set.

use crate::crypto::UInt160;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Minimum name length in bytes (inclusive)
pub const MIN_NAME_LEN: usize = 5;

/// Maximum name length in bytes (exclusive)
pub const MAX_NAME_LEN: usize = 19;

/// A named, address-bound bridge endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Mailbox {
    pub name: String,
    pub address: UInt160,
}

/// Result of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RegistrationOutcome {
    Registered,
    AddressTaken,
    NameTaken,
    InvalidName,
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        *self == RegistrationOutcome::Registered
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationOutcome::Registered => "OK",
            RegistrationOutcome::AddressTaken => "Address already has a box",
            RegistrationOutcome::NameTaken => "Box name already exists",
            RegistrationOutcome::InvalidName => "Box name is invalid",
        }
    }
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a raw mailbox name: 5 to 18 bytes of `a-z`, `0-9` or `_`
pub fn is_valid_name(name: &[u8]) -> bool {
    (MIN_NAME_LEN..MAX_NAME_LEN).contains(&name.len())
        && name
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'_')
}

/// Registry of mailboxes keyed by address and by name
#[derive(Debug, Clone, Default)]
pub struct MailboxRegistry {
    by_address: HashMap<UInt160, Arc<Mailbox>>,
    by_name: HashMap<String, Arc<Mailbox>>,
}

impl MailboxRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            by_address: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Decide what registering `name` at `address` would do, without doing it.
    ///
    /// Checks run in a fixed order and the first failure wins: address
    /// taken, then name taken, then name format.
    pub fn evaluate(&self, address: &UInt160, name: &[u8]) -> RegistrationOutcome {
        let address_taken = self.by_address.contains_key(address);
        let name_key = String::from_utf8_lossy(name);
        let name_taken = self.by_name.contains_key(&*name_key);
        let name_valid = is_valid_name(name);

        if address_taken {
            RegistrationOutcome::AddressTaken
        } else if name_taken {
            RegistrationOutcome::NameTaken
        } else if !name_valid {
            RegistrationOutcome::InvalidName
        } else {
            RegistrationOutcome::Registered
        }
    }

    /// Register a mailbox. Rejections leave the registry untouched.
    pub fn register(&mut self, address: UInt160, name: &[u8]) -> RegistrationOutcome {
        let outcome = self.evaluate(&address, name);
        if outcome.is_registered() {
            // A valid name is pure ASCII
            let name = String::from_utf8_lossy(name).into_owned();
            self.insert(Mailbox { name, address });
        }
        outcome
    }

    fn insert(&mut self, mailbox: Mailbox) {
        let mailbox = Arc::new(mailbox);
        self.by_address.insert(mailbox.address, Arc::clone(&mailbox));
        self.by_name.insert(mailbox.name.clone(), mailbox);
    }

    /// Get a mailbox by address
    pub fn get_by_address(&self, address: &UInt160) -> Option<&Mailbox> {
        self.by_address.get(address).map(Arc::as_ref)
    }

    /// Get a mailbox by name
    pub fn get_by_name(&self, name: &str) -> Option<&Mailbox> {
        self.by_name.get(name).map(Arc::as_ref)
    }

    /// All mailboxes, sorted by name
    pub fn list(&self) -> Vec<&Mailbox> {
        let mut mailboxes: Vec<&Mailbox> = self.by_name.values().map(Arc::as_ref).collect();
        mailboxes.sort_by(|a, b| a.name.cmp(&b.name));
        mailboxes
    }

    /// Get mailbox count
    pub fn count(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}
