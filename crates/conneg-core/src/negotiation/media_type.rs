//! Media type value and wildcard matching.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::exception::NegotiationError;

/// The wildcard accepted in either half of a media type.
pub const WILDCARD: &str = "*";

/// A `type/subtype` classifier with optional parameters.
///
/// `type` and `subtype` are stored lower-cased. Parameter keys are
/// lower-cased, parameter values keep their original case.
///
/// # Examples
///
/// ```
/// use conneg_core::negotiation::MediaType;
///
/// let media_type: MediaType = "Application/JSON; charset=UTF-8".parse().unwrap();
/// assert_eq!(media_type.type_(), "application");
/// assert_eq!(media_type.subtype(), "json");
/// assert_eq!(media_type.parameter("charset"), Some("UTF-8"));
/// assert_eq!(media_type.to_string(), "application/json; charset=UTF-8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
	type_: String,
	subtype: String,
	parameters: BTreeMap<String, String>,
}

impl MediaType {
	/// Creates a media type without parameters.
	///
	/// Both halves must be non-empty; use [`parse`](Self::parse) for
	/// untrusted input.
	///
	/// # Panics
	///
	/// In debug builds, if either half is empty after trimming.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::negotiation::MediaType;
	///
	/// let media_type = MediaType::new("TEXT", "Plain");
	/// assert_eq!(media_type.essence(), "text/plain");
	/// ```
	pub fn new(type_: impl AsRef<str>, subtype: impl AsRef<str>) -> Self {
		let (type_, subtype) = (type_.as_ref().trim(), subtype.as_ref().trim());
		debug_assert!(
			!type_.is_empty() && !subtype.is_empty(),
			"media type halves must be non-empty"
		);
		Self {
			type_: type_.to_ascii_lowercase(),
			subtype: subtype.to_ascii_lowercase(),
			parameters: BTreeMap::new(),
		}
	}

	/// `application/json`
	pub fn json() -> Self {
		Self::new("application", "json")
	}

	/// `application/yaml`
	pub fn yaml() -> Self {
		Self::new("application", "yaml")
	}

	/// `application/msgpack`
	pub fn msgpack() -> Self {
		Self::new("application", "msgpack")
	}

	/// `application/x-www-form-urlencoded`
	pub fn form_urlencoded() -> Self {
		Self::new("application", "x-www-form-urlencoded")
	}

	/// `*/*`
	pub fn any() -> Self {
		Self::new(WILDCARD, WILDCARD)
	}

	/// Parses a media type such as `application/json; charset=utf-8`.
	///
	/// A `q` parameter is dropped: preference is expressed by list order,
	/// not by weights.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::negotiation::MediaType;
	///
	/// let media_type = MediaType::parse("text/*; q=0.5").unwrap();
	/// assert_eq!(media_type.essence(), "text/*");
	/// assert_eq!(media_type.parameter("q"), None);
	///
	/// assert!(MediaType::parse("json").is_err());
	/// assert!(MediaType::parse("application/").is_err());
	/// ```
	pub fn parse(input: &str) -> Result<Self, NegotiationError> {
		let invalid = || NegotiationError::InvalidMediaType(input.to_string());

		let mut parts = split_unquoted(input, ';').into_iter();
		let essence = parts.next().ok_or_else(invalid)?.trim();
		let (type_, subtype) = essence.split_once('/').ok_or_else(invalid)?;
		if type_.trim().is_empty() || subtype.trim().is_empty() || subtype.contains('/') {
			return Err(invalid());
		}

		let mut media_type = Self::new(type_, subtype);
		for param in parts {
			let param = param.trim();
			if param.is_empty() {
				continue;
			}
			let (key, value) = param.split_once('=').ok_or_else(invalid)?;
			let key = key.trim().to_ascii_lowercase();
			if key.is_empty() {
				return Err(invalid());
			}
			if key == "q" {
				continue;
			}
			media_type.parameters.insert(key, unquote(value.trim()));
		}

		Ok(media_type)
	}

	/// Adds (or replaces) a parameter.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::negotiation::MediaType;
	///
	/// let media_type = MediaType::json().with_parameter("Charset", "utf-8");
	/// assert_eq!(media_type.parameter("charset"), Some("utf-8"));
	/// ```
	pub fn with_parameter(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.parameters
			.insert(key.as_ref().trim().to_ascii_lowercase(), value.into());
		self
	}

	/// Top-level type, e.g. `application`.
	pub fn type_(&self) -> &str {
		&self.type_
	}

	/// Subtype, e.g. `json`.
	pub fn subtype(&self) -> &str {
		&self.subtype
	}

	/// All parameters, ordered by key.
	pub fn parameters(&self) -> &BTreeMap<String, String> {
		&self.parameters
	}

	/// Looks up a parameter case-insensitively by name.
	pub fn parameter(&self, key: &str) -> Option<&str> {
		self.parameters
			.get(&key.to_ascii_lowercase())
			.map(String::as_str)
	}

	/// `type/subtype` without parameters.
	pub fn essence(&self) -> String {
		format!("{}/{}", self.type_, self.subtype)
	}

	/// Returns true if either half is the wildcard.
	pub fn is_wildcard(&self) -> bool {
		self.type_ == WILDCARD || self.subtype == WILDCARD
	}

	/// Returns true if both halves match, treating `*` on either side as
	/// matching anything. Parameters are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::negotiation::MediaType;
	///
	/// let json = MediaType::json();
	/// assert!(json.matches(&MediaType::parse("application/*").unwrap()));
	/// assert!(MediaType::any().matches(&json));
	/// assert!(json.matches(&json.clone().with_parameter("charset", "utf-8")));
	/// assert!(!json.matches(&MediaType::yaml()));
	/// ```
	pub fn matches(&self, other: &MediaType) -> bool {
		half_matches(&self.type_, &other.type_) && half_matches(&self.subtype, &other.subtype)
	}

	/// Like [`matches`](Self::matches), and additionally requires every
	/// parameter declared on `self` to be present on `other` with a
	/// case-insensitively equal value.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_core::negotiation::MediaType;
	///
	/// let binding = MediaType::parse("text/plain; charset=utf-8").unwrap();
	/// assert!(binding.matches_with_parameters(&MediaType::parse("text/plain; charset=UTF-8").unwrap()));
	/// assert!(!binding.matches_with_parameters(&MediaType::parse("text/plain").unwrap()));
	/// assert!(!binding.matches_with_parameters(&MediaType::parse("text/plain; charset=latin1").unwrap()));
	/// ```
	pub fn matches_with_parameters(&self, other: &MediaType) -> bool {
		self.matches(other)
			&& self.parameters.iter().all(|(key, value)| {
				other
					.parameters
					.get(key)
					.is_some_and(|candidate| candidate.eq_ignore_ascii_case(value))
			})
	}
}

fn half_matches(left: &str, right: &str) -> bool {
	left == WILDCARD || right == WILDCARD || left.eq_ignore_ascii_case(right)
}

/// Splits `input` on `separator`, ignoring separators inside quoted strings.
pub(crate) fn split_unquoted(input: &str, separator: char) -> Vec<&str> {
	let mut parts = Vec::new();
	let mut start = 0;
	let mut quoted = false;
	let mut escaped = false;
	for (index, c) in input.char_indices() {
		match c {
			_ if escaped => escaped = false,
			'\\' if quoted => escaped = true,
			'"' => quoted = !quoted,
			c if c == separator && !quoted => {
				parts.push(&input[start..index]);
				start = index + c.len_utf8();
			}
			_ => {}
		}
	}
	parts.push(&input[start..]);
	parts
}

fn unquote(value: &str) -> String {
	let Some(inner) = value
		.strip_prefix('"')
		.and_then(|rest| rest.strip_suffix('"'))
	else {
		return value.to_string();
	};
	let mut unquoted = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		match c {
			'\\' => unquoted.extend(chars.next()),
			c => unquoted.push(c),
		}
	}
	unquoted
}

fn is_token(value: &str) -> bool {
	!value.is_empty()
		&& value
			.bytes()
			.all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

impl fmt::Display for MediaType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.type_, self.subtype)?;
		for (key, value) in &self.parameters {
			if is_token(value) {
				write!(f, "; {}={}", key, value)?;
				continue;
			}
			write!(f, "; {}=\"", key)?;
			for c in value.chars() {
				if c == '"' || c == '\\' {
					f.write_char('\\')?;
				}
				f.write_char(c)?;
			}
			f.write_char('"')?;
		}
		Ok(())
	}
}

impl FromStr for MediaType {
	type Err = NegotiationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Serialize for MediaType {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for MediaType {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Self::parse(&raw).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("application/json", "application", "json")]
	#[case("  TEXT/Html ", "text", "html")]
	#[case("*/*", "*", "*")]
	#[case("image/*;q=0.2", "image", "*")]
	fn test_parse_essence(#[case] input: &str, #[case] type_: &str, #[case] subtype: &str) {
		let media_type = MediaType::parse(input).unwrap();

		assert_eq!(media_type.type_(), type_);
		assert_eq!(media_type.subtype(), subtype);
	}

	#[rstest]
	#[case("")]
	#[case("json")]
	#[case("/json")]
	#[case("application/")]
	#[case("a/b/c")]
	#[case("application/json; =utf-8")]
	#[case("application/json; charset")]
	fn test_parse_rejects(#[case] input: &str) {
		let result = MediaType::parse(input);

		assert!(matches!(result, Err(NegotiationError::InvalidMediaType(_))));
	}

	#[test]
	fn test_parse_parameters() {
		let media_type = MediaType::parse(r#"text/plain; Charset="utf-8"; format=flowed"#).unwrap();

		assert_eq!(media_type.parameter("charset"), Some("utf-8"));
		assert_eq!(media_type.parameter("FORMAT"), Some("flowed"));
		assert_eq!(
			media_type.to_string(),
			"text/plain; charset=utf-8; format=flowed"
		);
	}

	#[rstest]
	#[case(r#"multipart/form-data; boundary="a b;c""#, "a b;c")]
	#[case(r#"text/plain; title="say \"hi\"""#, r#"say "hi""#)]
	#[case(r#"text/plain; empty="""#, "")]
	fn test_quoted_parameter_survives_display(#[case] input: &str, #[case] value: &str) {
		let media_type = MediaType::parse(input).unwrap();
		let reparsed = MediaType::parse(&media_type.to_string()).unwrap();

		assert_eq!(
			media_type.parameters().values().next().map(String::as_str),
			Some(value)
		);
		assert_eq!(reparsed, media_type);
	}

	#[test]
	fn test_display_quotes_only_when_needed() {
		let media_type = MediaType::new("text", "plain")
			.with_parameter("charset", "utf-8")
			.with_parameter("note", "two words");

		assert_eq!(
			media_type.to_string(),
			r#"text/plain; charset=utf-8; note="two words""#
		);
	}

	#[test]
	#[cfg(debug_assertions)]
	#[should_panic(expected = "non-empty")]
	fn test_new_rejects_empty_halves() {
		let _ = MediaType::new("", "json");
	}

	#[rstest]
	#[case("application/json", "application/json", true)]
	#[case("application/json", "application/*", true)]
	#[case("application/*", "application/json", true)]
	#[case("*/*", "text/html", true)]
	#[case("*/json", "application/json", true)]
	#[case("application/json", "text/json", false)]
	#[case("application/json", "application/yaml", false)]
	#[case("text/*", "application/json", false)]
	fn test_matches(#[case] left: &str, #[case] right: &str, #[case] expected: bool) {
		let left = MediaType::parse(left).unwrap();
		let right = MediaType::parse(right).unwrap();

		assert_eq!(left.matches(&right), expected);
		assert_eq!(right.matches(&left), expected);
	}

	#[test]
	fn test_matches_ignores_parameters() {
		let plain = MediaType::json();
		let with_charset = MediaType::json().with_parameter("charset", "utf-8");

		assert!(plain.matches(&with_charset));
		assert!(with_charset.matches(&plain));
		assert!(!with_charset.matches_with_parameters(&plain));
		assert!(plain.matches_with_parameters(&with_charset));
	}

	#[test]
	fn test_serde_as_string() {
		let media_type = MediaType::yaml();

		let encoded = serde_json::to_string(&media_type).unwrap();
		let decoded: MediaType = serde_json::from_str(&encoded).unwrap();

		assert_eq!(encoded, r#""application/yaml""#);
		assert_eq!(decoded, media_type);
		assert!(serde_json::from_str::<MediaType>(r#""nonsense""#).is_err());
	}

	fn token() -> impl Strategy<Value = String> {
		prop_oneof![
			Just("*".to_string()),
			"[a-z][a-z0-9.+-]{0,8}",
		]
	}

	proptest! {
		#[test]
		fn prop_matches_reflexive(type_ in token(), subtype in token()) {
			let media_type = MediaType::new(&type_, &subtype);
			prop_assert!(media_type.matches(&media_type));
		}

		#[test]
		fn prop_matches_symmetric(a in token(), b in token(), c in token(), d in token()) {
			let left = MediaType::new(&a, &b);
			let right = MediaType::new(&c, &d);
			prop_assert_eq!(left.matches(&right), right.matches(&left));
		}

		#[test]
		fn prop_any_matches_everything(type_ in token(), subtype in token()) {
			let media_type = MediaType::new(&type_, &subtype);
			prop_assert!(MediaType::any().matches(&media_type));
			prop_assert!(media_type.matches(&MediaType::any()));
		}
	}
}
