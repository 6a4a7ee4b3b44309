//! Composable request adapters.
//!
//! A [`BoxHandler`] is any type-erased request handler. An [`Adapter`] takes
//! a handler and returns a new one that does something around it. [`adapt`]
//! stacks a list of adapters over a base handler so that the first adapter
//! in the list runs first on the way in and last on the way out.
//!
//! ```text
//! adapt(h, &[&a, &b, &c])  ==  a.wrap(b.wrap(c.wrap(h)))
//! ```

use std::convert::Infallible;

use axum::extract::Request;
use axum::response::Response;
use tower::util::BoxCloneService;
use tower::Service;

/// A type-erased request handler.
pub type BoxHandler = BoxCloneService<Request, Response, Infallible>;

/// Wraps a handler in additional behavior.
pub trait Adapter: Send + Sync {
    fn wrap(&self, next: BoxHandler) -> BoxHandler;
}

impl<F> Adapter for F
where
    F: Fn(BoxHandler) -> BoxHandler + Send + Sync,
{
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        self(next)
    }
}

/// Stacks `adapters` over `handler`, first adapter outermost.
///
/// With no adapters the handler comes back unchanged.
pub fn adapt(handler: BoxHandler, adapters: &[&dyn Adapter]) -> BoxHandler {
    adapters
        .iter()
        .rev()
        .fold(handler, |next, adapter| adapter.wrap(next))
}

/// Erases the type of any infallible request service.
pub fn boxed<S>(service: S) -> BoxHandler
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    BoxCloneService::new(service)
}
