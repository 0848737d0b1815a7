///! Award deduplication
///!
///! A results page often lists the same physical itinerary once per fare
///! code. Those records collapse into a single award carrying the union of
///! fare codes.

use std::collections::HashMap;

use award_common::{Award, Cabin};

/// Structural identity of a bookable itinerary. Comparing a real tuple
/// instead of a joined string means separator characters inside the data
/// can never cause two itineraries to collide.
#[derive(Debug, PartialEq, Eq, Hash)]
struct DedupKey {
    flights: Vec<String>,
    cabin: Cabin,
    mixed: bool,
    quantity: u32,
    mileage: Option<u32>,
}

impl DedupKey {
    fn of(award: &Award) -> Self {
        Self {
            flights: award.segments.iter().map(|s| s.flight.clone()).collect(),
            cabin: award.cabin,
            mixed: award.mixed,
            quantity: award.quantity,
            mileage: award.mileage,
        }
    }
}

/// Merge awards describing the same itinerary. Output preserves the order
/// in which each distinct itinerary first appeared; merged fare codes keep
/// first-seen order with duplicates removed.
pub fn dedup_awards(awards: Vec<Award>) -> Vec<Award> {
    let mut merged: Vec<Award> = Vec::with_capacity(awards.len());
    let mut index: HashMap<DedupKey, usize> = HashMap::new();

    for award in awards {
        match index.get(&DedupKey::of(&award)) {
            Some(&at) => {
                let target = &mut merged[at];
                for code in award.fares {
                    if !code.is_empty() && !target.fares.contains(&code) {
                        target.fares.push(code);
                    }
                }
            }
            None => {
                index.insert(DedupKey::of(&award), merged.len());
                merged.push(award);
            }
        }
    }

    merged
}
