mod request_id;

pub use request_id::{request_id_middleware, trace_span_for_request, RequestId};
