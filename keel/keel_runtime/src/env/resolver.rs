//! Applies manifest environment directives to a store.

use super::store::EnvironmentStore;
use crate::manifest::{EnvDirective, EnvMode};
use keel_core::utils::{formalize, LIST_SEPARATOR};
use tracing::{debug, warn};

/// Apply directives in document order and return how many were applied.
///
/// Each value is formalized before it is written; formalization sees the
/// store as it stands, so a later directive can reference a variable set by
/// an earlier one in the same load. A directive whose formalization fails is
/// logged and skipped; there is no rollback of directives already applied.
pub fn apply_directives(store: &EnvironmentStore, directives: &[EnvDirective]) -> usize {
    let mut applied = 0;

    for directive in directives {
        let mut formalized = Vec::with_capacity(directive.values.len());
        let mut skipped = false;

        for raw in &directive.values {
            match formalize(raw, |name| store.get(name)) {
                Ok(value) => formalized.push(value),
                Err(err) => {
                    warn!(name = %directive.name, %err, "Skipping environment directive");
                    skipped = true;
                    break;
                }
            }
        }
        if skipped || formalized.is_empty() {
            continue;
        }

        match directive.mode {
            EnvMode::Replace => {
                store.set(&directive.name, &formalized[0]);
            }
            EnvMode::Prepend => {
                // Prepend one element at a time, in listed order, so the
                // last-listed element lands nearest the front.
                let mut front: Vec<String> = Vec::with_capacity(formalized.len());
                for value in formalized {
                    front.insert(0, value);
                }

                let mut joined = String::new();
                for (i, value) in front.iter().enumerate() {
                    if i > 0 {
                        joined.push(LIST_SEPARATOR);
                    }
                    joined.push_str(value);
                }
                if let Some(prior) = store.get(&directive.name) {
                    if !prior.is_empty() {
                        joined.push(LIST_SEPARATOR);
                        joined.push_str(&prior);
                    }
                }
                store.set(&directive.name, &joined);
            }
        }

        debug!(name = %directive.name, mode = ?directive.mode, "Applied environment directive");
        applied += 1;
    }

    applied
}
