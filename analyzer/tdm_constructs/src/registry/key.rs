//! `name` + ordinal keys.
//!
//! A key names a construct by its name and its 1-based position among the
//! constructs of the same table sharing that name: `Len2` is the second
//! `Len`. Names that end in digits use an explicit `#` separator: `md5#1`.

use crate::error::LoadErrorKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Key<'a> {
    pub name: &'a str,
    pub ordinal: u64,
}

/// Split a key into name and ordinal.
///
/// With a `#`, the split happens at the last `#`. Otherwise the ordinal is
/// the run of trailing digits.
pub fn parse_key(key: &str) -> Result<Key<'_>, LoadErrorKind> {
    let malformed = || LoadErrorKind::MalformedKey {
        key: key.to_owned(),
    };

    let (name, digits) = match key.rsplit_once('#') {
        Some(split) => split,
        None => {
            let name = key.trim_end_matches(|c: char| c.is_ascii_digit());
            (name, &key[name.len()..])
        }
    };

    if name.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let ordinal = digits.parse::<u64>().map_err(|_| malformed())?;

    Ok(Key { name, ordinal })
}
