//! Values that travel through the request/response pipeline.

mod failure;
mod request;
mod response;

pub use failure::{ErrorBody, FailureKind, TransportFailure};
pub use request::{FormPart, FormPayload, OutgoingRequest, RequestBody};
pub use response::{InboundResponse, decode_body};
