use crate::push::PushRecord;

/// Select active pushes sorted by creation time, keeping the newest `limit`.
///
/// The sort is stable, so pushes with equal `created` keep their input
/// order. The slice is taken from the tail: with ascending order the last
/// `limit` entries are the most recent. A `limit` of zero keeps everything.
pub fn select_recent<'a, I>(pushes: I, limit: usize) -> Vec<PushRecord>
where
    I: IntoIterator<Item = &'a PushRecord>,
{
    let mut selected: Vec<PushRecord> = pushes
        .into_iter()
        .filter(|push| push.active)
        .cloned()
        .collect();

    selected.sort_by(|a, b| a.created.total_cmp(&b.created));

    if limit > 0 && selected.len() > limit {
        selected.drain(..selected.len() - limit);
    }

    selected
}
