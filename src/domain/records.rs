//! Keyed record lists: prepend, replace-by-key, remove-by-key.
//!
//! Same snapshot discipline as the forest: inputs are borrowed, a fresh
//! vector comes back.

pub trait Keyed {
    fn key(&self) -> &str;
}

/// New record first, existing order kept after it.
pub fn prepend<T: Clone>(records: &[T], record: T) -> Vec<T> {
    let mut out = Vec::with_capacity(records.len() + 1);
    out.push(record);
    out.extend_from_slice(records);
    out
}

/// Swap in `record` wherever its key already occurs. Unknown keys leave the
/// list as it was.
pub fn replace_by_key<T: Keyed + Clone>(records: &[T], record: T) -> Vec<T> {
    records
        .iter()
        .map(|r| {
            if r.key() == record.key() {
                record.clone()
            } else {
                r.clone()
            }
        })
        .collect()
}

pub fn remove_by_key<T: Keyed + Clone>(records: &[T], key: &str) -> Vec<T> {
    records.iter().filter(|r| r.key() != key).cloned().collect()
}

/// Apply `f` to every record carrying `key`.
pub fn update_by_key<T, F>(records: &[T], key: &str, f: F) -> Vec<T>
where
    T: Keyed + Clone,
    F: Fn(&T) -> T,
{
    records
        .iter()
        .map(|r| if r.key() == key { f(r) } else { r.clone() })
        .collect()
}

pub fn find_by_key<'a, T: Keyed>(records: &'a [T], key: &str) -> Option<&'a T> {
    records.iter().find(|r| r.key() == key)
}
