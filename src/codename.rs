//! Codename selection
//!
//! Two strategies: the release helper walks a theme in data order and takes
//! the first unused name, while `generate` picks uniformly at random from
//! the theme after exclusions.

use crate::error::{Result, TagtasticError};
use crate::themes::{filter_items, normalize_name, CodeName, Theme};
use std::collections::HashSet;

/// First item of `theme` whose normalized name is not among `used`.
///
/// # Arguments
/// * `theme` - Theme to walk, in data order
/// * `used` - Codenames already taken (any casing or spacing)
///
/// # Returns
/// * `Ok(CodeName)` - The first free codename
/// * `Err` - Every codename in the theme has been used
pub fn next_codename<I, S>(theme: &Theme, used: I) -> Result<CodeName>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let taken: HashSet<String> = used
        .into_iter()
        .map(|name| normalize_name(name.as_ref()))
        .collect();

    theme
        .items
        .iter()
        .find(|item| !taken.contains(&normalize_name(&item.name)))
        .cloned()
        .ok_or_else(|| TagtasticError::codename("no available codenames left"))
}

/// Random codename from `items` after removing `exclude`.
///
/// The caller owns the generator, so a seeded `fastrand::Rng` gives a
/// reproducible pick.
pub fn pick_codename(
    items: &[CodeName],
    exclude: &[String],
    rng: &mut fastrand::Rng,
) -> Result<CodeName> {
    let candidates = filter_items(items, exclude);
    if candidates.is_empty() {
        return Err(TagtasticError::codename(
            "no available codenames after exclusions",
        ));
    }

    let index = rng.usize(..candidates.len());
    Ok(candidates[index].clone())
}

/// Random generator for an optional seed; `None` draws from entropy
pub fn rng_for_seed(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    }
}
