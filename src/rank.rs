use crate::usd::Usd;

/// Orders `items` by value, largest first.
///
/// The sort is stable, so items with equal values keep the order the input
/// iterator gave them.
pub fn rank<L>(items: impl IntoIterator<Item = (L, Usd)>) -> Vec<(L, Usd)> {
    let mut ranked: Vec<_> = items.into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
    ranked
}
