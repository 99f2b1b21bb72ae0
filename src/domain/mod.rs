pub mod account;
pub mod action;
pub mod error;
pub mod money;
pub mod order;
pub mod payment;
pub mod request;
pub mod traits;

pub use account::Account;
pub use action::{Action, Tab};
pub use error::{Error, Operation, RequestError};
pub use money::Money;
pub use order::{Order, OrderStatus};
pub use payment::PaymentResult;
pub use request::{HttpRequest, HttpResponse, Method, Surface};
pub use traits::{ActionStream, Notifier, Renderer, Transport};
