use std::future::Future;

use futures::Stream;

use crate::domain::{
    Account, Action, Error, HttpRequest, HttpResponse, Order, PaymentResult, RequestError,
};

/// Carries one request to the backend and hands back whatever came over the wire.
pub trait Transport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, RequestError>> + Send;
}

pub trait ActionStream {
    type Actions: Stream<Item = Result<Action, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::Actions;
}

/// User-facing one-line messages, the terminal's snackbar.
pub trait Notifier {
    fn error(&self, error: &Error);
    fn success(&self, message: &str);
}

pub trait Renderer {
    fn account(&mut self, account: Option<&Account>) -> Result<(), Error>;
    fn orders(&mut self, orders: &[Order]) -> Result<(), Error>;
    fn payments(&mut self, results: &[PaymentResult]) -> Result<(), Error>;
    fn flush(&mut self) -> Result<(), Error>;
}
