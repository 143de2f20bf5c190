//! Cross-provider deduplication.

use food_map_poi_models::CanonicalPoi;

use crate::config::{DedupConfig, MergePolicy};

/// Returns `true` if `a` and `b` describe the same place: identical names
/// and both axes within `tolerance_degrees`.
#[must_use]
pub fn is_duplicate(a: &CanonicalPoi, b: &CanonicalPoi, tolerance_degrees: f64) -> bool {
    a.name == b.name && a.location.within(&b.location, tolerance_degrees)
}

/// Collapses duplicates, keeping first-seen order.
///
/// Each incoming record is compared against the records kept so far; the
/// first match absorbs it. The kept record always carries the union of
/// both `source_providers`; its other fields follow `config.policy`.
#[must_use]
pub fn merge_pois(
    pois: impl IntoIterator<Item = CanonicalPoi>,
    config: &DedupConfig,
) -> Vec<CanonicalPoi> {
    let mut merged: Vec<CanonicalPoi> = Vec::new();

    for poi in pois {
        match merged
            .iter_mut()
            .find(|kept| is_duplicate(kept, &poi, config.tolerance_degrees))
        {
            Some(kept) => absorb(kept, poi, config.policy),
            None => merged.push(poi),
        }
    }

    merged
}

fn absorb(kept: &mut CanonicalPoi, incoming: CanonicalPoi, policy: MergePolicy) {
    log::debug!("Merging duplicate '{}' ({} into {})", incoming.name, incoming.id, kept.id);

    let mut sources = std::mem::take(&mut kept.source_providers);
    sources.extend(incoming.source_providers.iter().copied());

    if policy == MergePolicy::HigherRatingReplaces && incoming.rating > kept.rating {
        *kept = incoming;
    }
    kept.source_providers = sources;
}
