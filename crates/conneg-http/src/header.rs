//! Header helpers shared by [`Request`](crate::Request) and
//! [`Response`](crate::Response).

use conneg_core::exception::{Error, NegotiationError, Result};
use conneg_core::negotiation::{AcceptHeader, MediaType};
use hyper::HeaderMap;
use hyper::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};

pub(crate) fn content_type(headers: &HeaderMap) -> std::result::Result<Option<MediaType>, NegotiationError> {
	let Some(value) = headers.get(CONTENT_TYPE) else {
		return Ok(None);
	};
	let value = value.to_str().map_err(|_| {
		NegotiationError::InvalidMediaType(String::from_utf8_lossy(value.as_bytes()).into_owned())
	})?;
	MediaType::parse(value).map(Some)
}

pub(crate) fn set_content_type(headers: &mut HeaderMap, media_type: &MediaType) -> Result<()> {
	let value = header_value(&media_type.to_string())?;
	headers.insert(CONTENT_TYPE, value);
	Ok(())
}

/// Every `Accept` header line, in order. Entries that do not parse are
/// skipped.
pub(crate) fn accept(headers: &HeaderMap) -> Vec<MediaType> {
	headers
		.get_all(ACCEPT)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| AcceptHeader::parse(value).media_types)
		.collect()
}

pub(crate) fn set_accept(headers: &mut HeaderMap, media_types: &[MediaType]) -> Result<()> {
	if media_types.is_empty() {
		headers.remove(ACCEPT);
		return Ok(());
	}
	let accept = AcceptHeader::from(media_types.to_vec());
	headers.insert(ACCEPT, header_value(&accept.to_header_value())?);
	Ok(())
}

pub(crate) fn set_content_length(headers: &mut HeaderMap, length: usize) {
	headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
}

fn header_value(value: &str) -> Result<HeaderValue> {
	HeaderValue::from_str(value).map_err(|e| Error::Http(format!("invalid header value {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_content_type_absent() {
		assert_eq!(content_type(&HeaderMap::new()), Ok(None));
	}

	#[rstest]
	#[case("application/json", MediaType::json())]
	#[case(
		"text/plain; charset=utf-8",
		MediaType::new("text", "plain").with_parameter("charset", "utf-8")
	)]
	fn test_content_type_parsed(#[case] raw: &'static str, #[case] expected: MediaType) {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static(raw));

		assert_eq!(content_type(&headers), Ok(Some(expected)));
	}

	#[rstest]
	fn test_content_type_invalid() {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("json"));

		assert!(matches!(
			content_type(&headers),
			Err(NegotiationError::InvalidMediaType(_))
		));
	}

	#[rstest]
	fn test_accept_spans_multiple_lines() {
		let mut headers = HeaderMap::new();
		headers.append(ACCEPT, HeaderValue::from_static("application/yaml, bogus"));
		headers.append(ACCEPT, HeaderValue::from_static("application/json"));

		assert_eq!(accept(&headers), vec![MediaType::yaml(), MediaType::json()]);
	}

	#[rstest]
	fn test_set_accept_empty_removes_header() {
		let mut headers = HeaderMap::new();
		set_accept(&mut headers, &[MediaType::json()]).unwrap();
		assert!(headers.contains_key(ACCEPT));

		set_accept(&mut headers, &[]).unwrap();
		assert!(!headers.contains_key(ACCEPT));
	}

	#[rstest]
	fn test_set_content_length() {
		let mut headers = HeaderMap::new();
		set_content_length(&mut headers, 7);

		assert_eq!(headers.get(CONTENT_LENGTH).unwrap(), "7");
	}
}
