//! Typed mapping of negotiated content.

use async_trait::async_trait;
use conneg_core::content::ContentMappable;
use conneg_core::exception::{ContentError, Result};
use conneg_http::{Handler, Middleware, Request, Response};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Builds a `T` from the request content and stores it for the handler.
///
/// Place it after a [`ServerContentNegotiator`](crate::ServerContentNegotiator)
/// and read the value with [`Request::mapped`]. Requests without content pass
/// through untouched. Content of the wrong shape is answered with 400 Bad
/// Request; any other construction error is returned as an error.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use conneg_core::content::{Content, ContentMappable, FromContent, from_content_deserialize};
/// use conneg_core::exception::ContentError;
/// use conneg_http::{Handler, Middleware, Request, Response};
/// use conneg_middleware::ContentMapperMiddleware;
/// use serde_json::json;
///
/// #[derive(serde::Deserialize)]
/// struct Login {
///     username: String,
/// }
///
/// impl FromContent for Login {
///     fn from_content(content: &Content) -> Result<Self, ContentError> {
///         from_content_deserialize(content)
///     }
/// }
///
/// impl ContentMappable for Login {}
///
/// struct Greet;
///
/// #[async_trait::async_trait]
/// impl Handler for Greet {
///     async fn handle(&self, request: Request) -> conneg_http::Result<Response> {
///         let name = request.mapped::<Login>()?.map(|l| l.username.clone()).unwrap_or_default();
///         Ok(Response::ok().with_body(format!("hello {name}")))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let mapper = ContentMapperMiddleware::<Login>::new();
/// let request = Request::builder().content(json!({"username": "ann"})).build().unwrap();
///
/// let response = mapper.process(request, Arc::new(Greet)).await.unwrap();
/// assert_eq!(&response.body[..], b"hello ann");
/// # });
/// ```
pub struct ContentMapperMiddleware<T> {
	_target: PhantomData<fn() -> T>,
}

impl<T: ContentMappable> ContentMapperMiddleware<T> {
	pub fn new() -> Self {
		Self {
			_target: PhantomData,
		}
	}
}

impl<T: ContentMappable> Default for ContentMapperMiddleware<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: ContentMappable> fmt::Debug for ContentMapperMiddleware<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContentMapperMiddleware")
			.field("key", &T::key())
			.finish()
	}
}

#[async_trait]
impl<T: ContentMappable> Middleware for ContentMapperMiddleware<T> {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let Some(mapped) = request.content()?.map(T::from_content) else {
			return next.handle(request).await;
		};

		match mapped {
			Ok(value) => {
				request.insert_mapped(value);
				next.handle(request).await
			}
			Err(error @ ContentError::IncompatibleType { .. }) => {
				tracing::warn!(key = T::key(), error = %error, "request content does not fit target type");
				Ok(Response::bad_request().with_stop_chain(true))
			}
			Err(error) => Err(error.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use conneg_core::content::{Content, FromContent, from_content_deserialize};
	use conneg_core::exception::Error;
	use hyper::StatusCode;
	use rstest::rstest;
	use serde::Deserialize;
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Debug, Deserialize, PartialEq)]
	struct Point {
		x: i64,
		y: i64,
	}

	impl FromContent for Point {
		fn from_content(content: &Content) -> std::result::Result<Self, ContentError> {
			from_content_deserialize(content)
		}
	}

	impl ContentMappable for Point {}

	// Fails with a non-shape error for anything but `"ok"`
	struct Picky;

	impl FromContent for Picky {
		fn from_content(content: &Content) -> std::result::Result<Self, ContentError> {
			match content.as_str() {
				Some("ok") => Ok(Picky),
				_ => Err(ContentError::Custom("lookup failed".into())),
			}
		}
	}

	impl ContentMappable for Picky {}

	// Records whether a mapped point reached it
	struct PointProbe {
		calls: AtomicUsize,
		seen: std::sync::Mutex<Option<(i64, i64)>>,
	}

	impl PointProbe {
		fn new() -> Arc<Self> {
			Arc::new(Self {
				calls: AtomicUsize::new(0),
				seen: std::sync::Mutex::new(None),
			})
		}
	}

	#[async_trait]
	impl Handler for PointProbe {
		async fn handle(&self, request: Request) -> Result<Response> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if let Some(point) = request.mapped::<Point>()? {
				*self.seen.lock().unwrap() = Some((point.x, point.y));
			}
			Ok(Response::ok())
		}
	}

	fn request_with(content: Option<Content>) -> Request {
		let mut builder = Request::builder();
		if let Some(content) = content {
			builder = builder.content(content);
		}
		builder.build().unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_maps_and_forwards() {
		let probe = PointProbe::new();
		let mapper = ContentMapperMiddleware::<Point>::new();

		let response = mapper
			.process(request_with(Some(json!({"x": 3, "y": 4}))), probe.clone())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(*probe.seen.lock().unwrap(), Some((3, 4)));
	}

	#[rstest]
	#[tokio::test]
	async fn test_no_content_passes_through() {
		let probe = PointProbe::new();
		let mapper = ContentMapperMiddleware::<Point>::new();

		let response = mapper.process(request_with(None), probe.clone()).await.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
		assert_eq!(*probe.seen.lock().unwrap(), None);
	}

	#[rstest]
	#[case(json!({"x": "three"}))]
	#[case(json!([1, 2]))]
	#[tokio::test]
	async fn test_incompatible_shape_is_bad_request(#[case] content: Content) {
		let probe = PointProbe::new();
		let mapper = ContentMapperMiddleware::<Point>::new();

		let response = mapper.process(request_with(Some(content)), probe.clone()).await.unwrap();

		assert_eq!(response.status, StatusCode::BAD_REQUEST);
		assert!(response.should_stop_chain());
		assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_other_errors_propagate() {
		let probe = PointProbe::new();
		let mapper = ContentMapperMiddleware::<Picky>::new();

		let error = mapper
			.process(request_with(Some(json!("nope"))), probe.clone())
			.await
			.unwrap_err();

		assert!(matches!(error, Error::Content(ContentError::Custom(_))));
		assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
	}

	#[rstest]
	fn test_debug_shows_key() {
		let mapper = ContentMapperMiddleware::<Point>::default();

		assert!(format!("{mapper:?}").contains("Point"));
	}
}
