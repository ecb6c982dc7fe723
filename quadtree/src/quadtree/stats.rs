use std::cell::Cell;

/// Work done by collision queries since the counters were last taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub query_calls: u64,
    pub node_visits: u64,
    pub circle_visits: u64,
}

#[inline(always)]
pub(crate) fn record<F>(stats: &Cell<QueryStats>, f: F)
where
    F: FnOnce(&mut QueryStats),
{
    let mut current = stats.get();
    f(&mut current);
    stats.set(current);
}
