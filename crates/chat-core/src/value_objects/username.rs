/// Whether a username is empty or whitespace only.
///
/// Blank names are never admitted to the online set.
#[inline]
pub fn is_blank_username(username: &str) -> bool {
    username.trim().is_empty()
}
