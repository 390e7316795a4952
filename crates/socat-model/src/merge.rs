//! Merging collections of composite variables.

use tracing::debug;

use crate::composite::CompositeVariable;
use crate::error::{MetadataError, Result};

/// Treats a missing field and an empty string as the same value.
fn blank_equivalent(left: Option<&str>, right: Option<&str>) -> bool {
    left.unwrap_or("") == right.unwrap_or("")
}

/// True when every identity field of `candidate` matches the same field of `existing`.
pub fn same_identity(candidate: &CompositeVariable, existing: &CompositeVariable) -> bool {
    candidate
        .identity_fields()
        .iter()
        .all(|field| blank_equivalent(candidate.find_value(field), existing.find_value(field)))
}

fn ensure_unique_identities(variables: &[CompositeVariable]) -> Result<()> {
    for (index, variable) in variables.iter().enumerate() {
        if variables[..index]
            .iter()
            .any(|earlier| same_identity(variable, earlier))
        {
            return Err(MetadataError::DuplicateIdentity {
                variable: variable.path().to_string(),
                identity: variable.identity().join(", "),
            });
        }
    }
    Ok(())
}

/// Merges `new_values` into `dest` without touching either input.
///
/// Every variable of `new_values` comes first, in its own order: merged
/// into a copy of its identity match from `dest` when there is one, copied
/// as-is otherwise. Copies of the `dest` variables nobody matched follow in
/// `dest` order.
///
/// # Errors
///
/// [`MetadataError::DuplicateIdentity`] when either collection holds two
/// variables with the same identity, and [`MetadataError::Conflict`] if
/// uniting a matched pair would give an identity field two observations.
pub fn merge_variables(
    dest: &[CompositeVariable],
    new_values: &[CompositeVariable],
) -> Result<Vec<CompositeVariable>> {
    ensure_unique_identities(dest)?;
    ensure_unique_identities(new_values)?;

    let mut matched = vec![false; dest.len()];
    let mut merged = Vec::with_capacity(dest.len() + new_values.len());

    for incoming in new_values {
        let found = dest
            .iter()
            .enumerate()
            .find(|(index, existing)| !matched[*index] && same_identity(incoming, existing));
        match found {
            Some((index, existing)) => {
                debug!(
                    path = %existing.path(),
                    identity = %existing.identity().join(", "),
                    "merging matched variable"
                );
                matched[index] = true;
                let mut combined = existing.clone();
                combined.add_values(incoming.values())?;
                merged.push(combined);
            }
            None => merged.push(incoming.clone()),
        }
    }

    merged.extend(
        dest.iter()
            .zip(&matched)
            .filter(|(_, was_matched)| !**was_matched)
            .map(|(variable, _)| variable.clone()),
    );
    Ok(merged)
}
