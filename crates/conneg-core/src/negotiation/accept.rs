//! Accept header parsing

use super::media_type::{MediaType, split_unquoted};

/// Represents an Accept header as an ordered preference list.
///
/// Entries keep the order the client sent them in, most preferred first.
/// Quality values are not used for ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptHeader {
	pub media_types: Vec<MediaType>,
}

impl AcceptHeader {
	/// Parses an Accept header string into an AcceptHeader struct
	///
	/// Entries that are not valid media types are skipped.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::negotiation::AcceptHeader;
	///
	/// let accept = AcceptHeader::parse("text/html; q=0.1, application/json, bogus");
	/// assert_eq!(accept.media_types.len(), 2);
	/// // Order is preserved, not sorted by quality
	/// assert_eq!(accept.media_types[0].subtype(), "html");
	/// assert_eq!(accept.media_types[1].subtype(), "json");
	/// ```
	pub fn parse(header: &str) -> Self {
		let media_types = split_unquoted(header, ',')
			.into_iter()
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.filter_map(|s| MediaType::parse(s).ok())
			.collect();

		Self { media_types }
	}

	pub fn is_empty(&self) -> bool {
		self.media_types.is_empty()
	}

	/// Renders the list back into a header value.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::negotiation::{AcceptHeader, MediaType};
	///
	/// let accept = AcceptHeader::from(vec![MediaType::json(), MediaType::yaml()]);
	/// assert_eq!(accept.to_header_value(), "application/json, application/yaml");
	/// ```
	pub fn to_header_value(&self) -> String {
		self.media_types
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join(", ")
	}
}

impl From<Vec<MediaType>> for AcceptHeader {
	fn from(media_types: Vec<MediaType>) -> Self {
		Self { media_types }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_accept_header_keeps_order() {
		let accept = AcceptHeader::parse("application/yaml;q=0.2, application/json;q=0.9");
		assert_eq!(
			accept.media_types,
			vec![MediaType::yaml(), MediaType::json()]
		);
	}

	#[test]
	fn test_parse_empty_and_garbage() {
		assert!(AcceptHeader::parse("").is_empty());
		assert!(AcceptHeader::parse(" , ,").is_empty());
		assert!(AcceptHeader::parse("nothing-here").is_empty());
	}

	#[test]
	fn test_parse_keeps_commas_inside_quotes() {
		let accept = AcceptHeader::parse(r#"text/plain; note="a, b", application/json"#);
		assert_eq!(accept.media_types.len(), 2);
		assert_eq!(accept.media_types[0].parameter("note"), Some("a, b"));
	}

	#[test]
	fn test_header_value_drops_quality() {
		let accept = AcceptHeader::parse("application/json;q=0.5, text/*");
		assert_eq!(accept.to_header_value(), "application/json, text/*");
	}
}
