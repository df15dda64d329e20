//! Method dispatch
//!
//! Routes decoded contract calls to the registry. `registerMailbox` is the
//! only method with an effect; anything else is logged and dropped.

use crate::contract::ContractCall;
use crate::crypto::UInt160;
use crate::mailbox::registry::{MailboxRegistry, RegistrationOutcome};
use serde::Serialize;

/// Method name of the mailbox registration call
pub const REGISTER_MAILBOX: &str = "registerMailbox";

/// A processed `registerMailbox` call and what came of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub address: UInt160,
    pub name: String,
    pub outcome: RegistrationOutcome,
}

/// Apply one decoded call to the registry
pub fn dispatch(call: &ContractCall, registry: &mut MailboxRegistry) -> Option<Registration> {
    match call.method.as_str() {
        REGISTER_MAILBOX => register_mailbox(call, registry),
        other => {
            log::debug!("Ignoring call to {} at offset {}", other, call.offset);
            None
        }
    }
}

fn register_mailbox(call: &ContractCall, registry: &mut MailboxRegistry) -> Option<Registration> {
    let [address, name] = call.args.as_slice() else {
        log::warn!(
            "{} at offset {} has {} arguments, expected 2",
            REGISTER_MAILBOX,
            call.offset,
            call.args.len()
        );
        return None;
    };

    let address = match UInt160::from_slice(address) {
        Ok(address) => address,
        Err(e) => {
            log::warn!("{} at offset {}: bad address: {}", REGISTER_MAILBOX, call.offset, e);
            return None;
        }
    };

    let outcome = registry.register(address, name);
    let name = String::from_utf8_lossy(name).into_owned();
    log::info!("({}, {}) => {}", address.to_address(), name, outcome);

    Some(Registration {
        address,
        name,
        outcome,
    })
}
