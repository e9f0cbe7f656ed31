use super::params::{FractalParams, ParamKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    /// No session running or no target to compare against
    Inactive,
    NoMatch,
    Matched,
}

/// Compare the player's parameters against the target.
///
/// Exact equality over [`ParamKey::COMPARED`]; rotation and color never count.
pub fn check_match(player: &FractalParams, target: Option<&FractalParams>, active: bool) -> MatchResult {
    let Some(target) = target else {
        return MatchResult::Inactive;
    };
    if !active {
        return MatchResult::Inactive;
    }

    if ParamKey::COMPARED.iter().all(|&key| player.get(key) == target.get(key)) {
        MatchResult::Matched
    } else {
        MatchResult::NoMatch
    }
}

/// Keys where the player still differs from the target
pub fn mismatched_keys(player: &FractalParams, target: &FractalParams) -> Vec<ParamKey> {
    ParamKey::COMPARED
        .iter()
        .copied()
        .filter(|&key| player.get(key) != target.get(key))
        .collect()
}
