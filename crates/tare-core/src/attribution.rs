//! Weight-similarity user attribution.
//!
//! A reading carries no identity, so it is assigned to the known user whose
//! most recent weight is closest — or to a freshly minted user id when
//! nobody is close enough. A single fixed decision boundary; users of
//! near-identical weight will confound it, which is a documented limitation
//! of the heuristic rather than something to paper over here.

use std::collections::BTreeMap;

/// Decide which user a candidate weight belongs to.
///
/// `latest_by_user` maps each known user id to that user's most recent
/// logged weight in kilograms. Returns the id of the user with the smallest
/// absolute difference when that difference is within
/// `allowed_fluctuation_kg`; ties go to the smallest user id. An empty map
/// means this is the first ever reading, which belongs to user 1. When no
/// user is close enough, a new id of `max(existing) + 1` is minted.
#[must_use]
pub fn resolve_user(
    candidate_kg: f64,
    latest_by_user: &BTreeMap<u32, f64>,
    allowed_fluctuation_kg: f64,
) -> u32 {
    let Some((&closest_id, &closest_weight)) = latest_by_user
        .iter()
        // BTreeMap iterates in increasing id order, so a strict `<` keeps
        // the smallest id on ties.
        .fold(None, |best: Option<(&u32, &f64)>, (id, weight)| match best {
            Some((_, best_weight))
                if (weight - candidate_kg).abs() < (best_weight - candidate_kg).abs() =>
            {
                Some((id, weight))
            }
            Some(best) => Some(best),
            None => Some((id, weight)),
        })
    else {
        return 1;
    };

    if (closest_weight - candidate_kg).abs() > allowed_fluctuation_kg {
        let max_id = latest_by_user.keys().max().copied().unwrap_or(0);
        return max_id + 1;
    }
    closest_id
}
