//! Request/response interceptors and the ordered pipeline running them.
//!
//! Request interceptors may only mutate the outgoing request; they cannot
//! reject it. Response interceptors may transform a success and observe a
//! failure, but the failure itself is always handed back to the caller by
//! [`Pipeline::after_receive`], so no interceptor can swallow it.

mod auth;
mod report;

use std::sync::Arc;

use crate::http::{InboundResponse, OutgoingRequest, TransportFailure};

pub use auth::{BearerAuth, mask_token};
pub use report::ErrorReporter;

pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: &mut OutgoingRequest);
}

pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, response: InboundResponse) -> InboundResponse {
        response
    }

    fn on_failure(&self, _failure: &TransportFailure) {}
}

/// Interceptors in the order they run.
#[derive(Clone, Default)]
pub struct Pipeline {
    request: Vec<Arc<dyn RequestInterceptor>>,
    response: Vec<Arc<dyn ResponseInterceptor>>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn before_send(&self, request: &mut OutgoingRequest) {
        for interceptor in &self.request {
            interceptor.on_request(request);
        }
    }

    pub fn after_receive(
        &self,
        outcome: Result<InboundResponse, TransportFailure>,
    ) -> Result<InboundResponse, TransportFailure> {
        match outcome {
            Ok(response) => Ok(self
                .response
                .iter()
                .fold(response, |response, interceptor| interceptor.on_response(response))),
            Err(failure) => {
                for interceptor in &self.response {
                    interceptor.on_failure(&failure);
                }
                Err(failure)
            }
        }
    }
}

#[derive(Default)]
pub struct PipelineBuilder {
    pipeline: Pipeline,
}

impl PipelineBuilder {
    pub fn request(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.pipeline.request.push(Arc::new(interceptor));
        self
    }

    pub fn response(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.pipeline.response.push(Arc::new(interceptor));
        self
    }

    pub fn build(self) -> Pipeline {
        self.pipeline
    }
}
