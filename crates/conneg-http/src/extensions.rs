//! Per-message typed storage.
//!
//! Values are stored under string keys and read back with a checked
//! downcast. Reading a key that holds a value of another type is a
//! [`StorageError::TypeMismatch`], never a silent `None`.
//!
//! The storage is owned by a single request or response, so no locking is
//! involved.

use conneg_core::exception::StorageError;
use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

type Slot = Box<dyn Any + Send + Sync>;

/// Key/value storage attached to a [`Request`](crate::Request) or
/// [`Response`](crate::Response).
#[derive(Default)]
pub struct Extensions {
	map: HashMap<Cow<'static, str>, Slot>,
}

impl Extensions {
	/// Create a new Extensions instance
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// assert!(extensions.is_empty());
	/// ```
	pub fn new() -> Self {
		Self {
			map: HashMap::new(),
		}
	}

	/// Insert a value keyed by its type name
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// extensions.insert(42u32);
	/// extensions.insert("hello".to_string());
	///
	/// assert!(extensions.contains::<u32>());
	/// assert!(extensions.contains::<String>());
	/// ```
	pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
		self.insert_keyed(std::any::type_name::<T>(), value);
	}

	/// Insert a value under an explicit key, replacing whatever was there
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// extensions.insert_keyed("user.id", 7u64);
	///
	/// assert_eq!(extensions.get_keyed::<u64>("user.id").unwrap(), Some(&7));
	/// ```
	pub fn insert_keyed<T: Send + Sync + 'static>(
		&mut self,
		key: impl Into<Cow<'static, str>>,
		value: T,
	) {
		self.map.insert(key.into(), Box::new(value));
	}

	/// Get a value keyed by its type name
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// extensions.insert(42u32);
	///
	/// assert_eq!(extensions.get::<u32>(), Some(&42));
	/// assert_eq!(extensions.get::<String>(), None);
	/// ```
	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		// The key is derived from T, so the downcast cannot fail.
		self.map
			.get(std::any::type_name::<T>())
			.and_then(|slot| slot.downcast_ref::<T>())
	}

	/// Get a value stored under `key`
	///
	/// # Errors
	///
	/// Returns [`StorageError::TypeMismatch`] if `key` holds a value that
	/// is not a `T`.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// extensions.insert_keyed("count", 3i32);
	///
	/// assert_eq!(extensions.get_keyed::<i32>("count").unwrap(), Some(&3));
	/// assert_eq!(extensions.get_keyed::<i32>("missing").unwrap(), None);
	/// assert!(extensions.get_keyed::<String>("count").is_err());
	/// ```
	pub fn get_keyed<T: Send + Sync + 'static>(&self, key: &str) -> Result<Option<&T>, StorageError> {
		match self.map.get(key) {
			None => Ok(None),
			Some(slot) => slot
				.downcast_ref::<T>()
				.map(Some)
				.ok_or_else(|| mismatch::<T>(key)),
		}
	}

	/// Mutable variant of [`get_keyed`](Self::get_keyed)
	pub fn get_keyed_mut<T: Send + Sync + 'static>(
		&mut self,
		key: &str,
	) -> Result<Option<&mut T>, StorageError> {
		match self.map.get_mut(key) {
			None => Ok(None),
			Some(slot) => slot
				.downcast_mut::<T>()
				.map(Some)
				.ok_or_else(|| mismatch::<T>(key)),
		}
	}

	/// Remove the value stored under `key` and return it
	///
	/// On a type mismatch the value is left in place.
	///
	/// # Examples
	///
	/// ```
	/// use conneg_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// extensions.insert_keyed("n", 42u32);
	///
	/// assert!(extensions.remove_keyed::<String>("n").is_err());
	/// assert_eq!(extensions.remove_keyed::<u32>("n").unwrap(), Some(42));
	/// assert!(!extensions.contains_key("n"));
	/// ```
	pub fn remove_keyed<T: Send + Sync + 'static>(&mut self, key: &str) -> Result<Option<T>, StorageError> {
		let Some((stored_key, slot)) = self.map.remove_entry(key) else {
			return Ok(None);
		};
		match slot.downcast::<T>() {
			Ok(value) => Ok(Some(*value)),
			Err(slot) => {
				// Re-insert to prevent value loss on type mismatch
				self.map.insert(stored_key, slot);
				Err(mismatch::<T>(key))
			}
		}
	}

	/// Remove a value keyed by its type name
	pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
		self.remove_keyed::<T>(std::any::type_name::<T>())
			.ok()
			.flatten()
	}

	/// Check if a value of the given type exists
	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		self.contains_key(std::any::type_name::<T>())
	}

	/// Check if any value is stored under `key`
	pub fn contains_key(&self, key: &str) -> bool {
		self.map.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// Clear all extensions
	pub fn clear(&mut self) {
		self.map.clear();
	}
}

fn mismatch<T>(key: &str) -> StorageError {
	StorageError::TypeMismatch {
		key: key.to_string(),
		expected: std::any::type_name::<T>(),
	}
}

impl fmt::Debug for Extensions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut keys: Vec<&str> = self.map.keys().map(|k| k.as_ref()).collect();
		keys.sort_unstable();
		f.debug_struct("Extensions").field("keys", &keys).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Clone, Debug, PartialEq)]
	struct TestData {
		value: String,
	}

	#[test]
	fn test_insert_and_get() {
		let mut extensions = Extensions::new();
		let data = TestData {
			value: "test".to_string(),
		};

		extensions.insert(data.clone());
		let retrieved = extensions.get::<TestData>();

		assert_eq!(retrieved, Some(&data));
	}

	#[test]
	fn test_get_nonexistent() {
		let extensions = Extensions::new();

		assert_eq!(extensions.get::<TestData>(), None);
		assert_eq!(extensions.get_keyed::<TestData>("nope"), Ok(None));
	}

	#[test]
	fn test_type_mismatch_is_an_error() {
		let mut extensions = Extensions::new();
		extensions.insert_keyed("slot", 1u8);

		let error = extensions.get_keyed::<TestData>("slot").unwrap_err();

		assert_eq!(
			error,
			StorageError::TypeMismatch {
				key: "slot".to_string(),
				expected: std::any::type_name::<TestData>(),
			}
		);
	}

	#[test]
	fn test_get_keyed_mut() {
		let mut extensions = Extensions::new();
		extensions.insert_keyed("counter", 1u32);

		if let Some(counter) = extensions.get_keyed_mut::<u32>("counter").unwrap() {
			*counter += 1;
		}

		assert_eq!(extensions.get_keyed::<u32>("counter").unwrap(), Some(&2));
		assert!(extensions.get_keyed_mut::<String>("counter").is_err());
	}

	#[test]
	fn test_remove() {
		let mut extensions = Extensions::new();
		let data = TestData {
			value: "test".to_string(),
		};

		extensions.insert(data.clone());
		let removed = extensions.remove::<TestData>();

		assert_eq!(removed, Some(data));
		assert!(!extensions.contains::<TestData>());
	}

	#[test]
	fn test_remove_mismatch_keeps_value() {
		let mut extensions = Extensions::new();
		extensions.insert_keyed("slot", 5i64);

		assert!(extensions.remove_keyed::<u8>("slot").is_err());
		assert_eq!(extensions.get_keyed::<i64>("slot").unwrap(), Some(&5));
	}

	#[test]
	fn test_clear() {
		let mut extensions = Extensions::new();
		extensions.insert(TestData {
			value: "test".to_string(),
		});
		extensions.insert("another value".to_string());

		extensions.clear();

		assert!(extensions.is_empty());
	}

	#[test]
	fn test_typed_insert_uses_type_name_key() {
		let mut extensions = Extensions::new();
		extensions.insert(TestData {
			value: "typed".to_string(),
		});
		extensions.insert_keyed("other", 1u32);

		let key = std::any::type_name::<TestData>();
		assert!(extensions.contains_key(key));
		assert_eq!(
			extensions
				.get_keyed::<TestData>(key)
				.unwrap()
				.map(|d| d.value.as_str()),
			Some("typed")
		);
		assert_eq!(extensions.len(), 2);
	}
}
