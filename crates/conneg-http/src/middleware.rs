//! Handler and middleware traits, and the chain that composes them.
//!
//! ## Handler
//!
//! ```rust
//! use conneg_http::{Handler, Request, Response};
//! use async_trait::async_trait;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Handler for Echo {
//!     async fn handle(&self, request: Request) -> conneg_http::Result<Response> {
//!         let content = request.content()?.cloned().unwrap_or_default();
//!         Ok(Response::ok().with_content(content))
//!     }
//! }
//! ```
//!
//! ## Middleware
//!
//! ```rust
//! use conneg_http::{Handler, Middleware, Request, Response};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct RequireBody;
//!
//! #[async_trait]
//! impl Middleware for RequireBody {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> conneg_http::Result<Response> {
//!         if request.body.is_empty() {
//!             return Ok(Response::bad_request().with_stop_chain(true));
//!         }
//!         next.handle(request).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use conneg_core::exception::Result;
use std::sync::Arc;

use crate::{Request, Response};

/// Processes a request into a response.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles a request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Wraps the next handler in the chain.
///
/// A middleware may rewrite the request before calling `next`, rewrite the
/// response after it, or answer on its own without calling `next` at all.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request through this middleware.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware runs for `request`; skipped middleware are
	/// left out of the chain entirely.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Composes middleware around a terminal handler.
///
/// Middleware run in the order they were added: the first one added sees the
/// request first and the response last.
///
/// # Examples
///
/// ```rust
/// use conneg_http::{Handler, Middleware, MiddlewareChain, Request, Response};
/// use std::sync::Arc;
///
/// # struct Endpoint;
/// # struct Audit;
/// # #[async_trait::async_trait]
/// # impl Handler for Endpoint {
/// #     async fn handle(&self, _request: Request) -> conneg_http::Result<Response> {
/// #         Ok(Response::ok())
/// #     }
/// # }
/// # #[async_trait::async_trait]
/// # impl Middleware for Audit {
/// #     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> conneg_http::Result<Response> {
/// #         next.handle(request).await
/// #     }
/// # }
/// let mut chain = MiddlewareChain::new(Arc::new(Endpoint)).with_middleware(Arc::new(Audit));
/// chain.add_middleware(Arc::new(Audit));
/// ```
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware to the chain using builder pattern.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Adds a middleware to the chain.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		// Innermost first, so wrap in reverse insertion order.
		let handler = self
			.middlewares
			.iter()
			.rev()
			.filter(|mw| mw.should_continue(&request))
			.fold(self.handler.clone(), |next, middleware| {
				Arc::new(ComposedHandler {
					middleware: middleware.clone(),
					next,
				}) as Arc<dyn Handler>
			});

		handler.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}
