/// Assigns dense ranks (ties share a rank, the next distinct key gets
/// rank + 1) to `rows`, which must already be sorted by `key` so that equal
/// keys are adjacent. Rows ranked above `max_rank` are dropped.
pub fn dense_rank<T, K, F>(rows: impl IntoIterator<Item = T>, max_rank: u32, key: F) -> Vec<(u32, T)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut ranked = Vec::new();
    let mut rank = 0;
    let mut previous: Option<K> = None;

    for row in rows {
        let current = key(&row);
        if previous.as_ref() != Some(&current) {
            rank += 1;
            previous = Some(current);
        }
        if rank > max_rank {
            break;
        }
        ranked.push((rank, row));
    }

    ranked
}
