use url::Url;

/// Check whether a resolved target parses as an absolute URL.
///
/// Relative paths and bare strings have no scheme and fail to parse.
pub fn is_well_formed_url(target: &str) -> bool {
	!target.is_empty() && Url::parse(target).is_ok()
}
