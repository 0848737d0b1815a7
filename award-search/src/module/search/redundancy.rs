///! Redundancy inference against stored data
use award_common::{Query, RouteKey};

use crate::error::StorageError;
use crate::storage::{RouteHistory, Storage};

/// Is this query already answered by stored data?
///
/// The outbound leg decides first: if it is not redundant the query runs,
/// and the inbound leg is never consulted. For a round trip whose outbound
/// leg is covered, the inbound leg is checked the same way and both legs
/// must be covered for the query to be skipped. Pure read.
pub fn redundant<S: Storage + ?Sized>(storage: &S, query: &Query) -> Result<bool, StorageError> {
    let map = storage.find(query)?;

    if !leg_redundant(map.get(&RouteKey::outbound(query)), query.quantity) {
        return Ok(false);
    }

    if let Some(inbound) = RouteKey::inbound(query) {
        if !leg_redundant(map.get(&inbound), query.quantity) {
            return Ok(false);
        }
    }

    Ok(true)
}

/// One leg is redundant when a request already ran at this exact quantity,
/// or a confirmed-empty award exists at this quantity or fewer seats — a
/// search that found nothing for fewer passengers will find nothing for
/// more.
fn leg_redundant(history: Option<&RouteHistory>, quantity: u32) -> bool {
    let Some(history) = history else {
        return false;
    };
    if history.requests.iter().any(|r| r.quantity == quantity) {
        return true;
    }
    history
        .awards
        .iter()
        .any(|a| a.confirmed_empty() && a.quantity <= quantity)
}
