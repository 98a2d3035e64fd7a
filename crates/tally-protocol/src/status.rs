//! Status codes and close codes defined by the wire contract.

/// Request status codes carried in `RequestStatus.code`.
///
/// Only the codes the client acts on are named here; any other value still
/// travels through unchanged.
pub mod request_status {
    /// The request completed successfully.
    pub const SUCCESS: u16 = 100;
    /// The request type is not recognized by the endpoint.
    pub const UNKNOWN_REQUEST_TYPE: u16 = 204;
    /// A required request field is missing.
    pub const MISSING_REQUEST_FIELD: u16 = 300;
    /// The request references a resource that does not exist.
    pub const RESOURCE_NOT_FOUND: u16 = 600;
    /// The request tried to create a resource that already exists.
    pub const RESOURCE_ALREADY_EXISTS: u16 = 601;
    /// The resource exists but its state forbids the request.
    pub const INVALID_RESOURCE_STATE: u16 = 604;
    /// The endpoint failed while processing an otherwise valid request.
    pub const REQUEST_PROCESSING_FAILED: u16 = 702;
}

/// WebSocket close codes the endpoint uses to end a session.
pub mod close_code {
    /// The endpoint could not decode an incoming frame.
    pub const MESSAGE_DECODE_ERROR: u16 = 4002;
    /// A request was sent before the session was identified.
    pub const NOT_IDENTIFIED: u16 = 4007;
    /// The supplied authentication string was wrong.
    pub const AUTHENTICATION_FAILED: u16 = 4009;
    /// The client asked for an RPC version the endpoint does not speak.
    pub const UNSUPPORTED_RPC_VERSION: u16 = 4010;
    /// The endpoint invalidated the session (e.g. shutting down).
    pub const SESSION_INVALIDATED: u16 = 4011;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotency_codes_are_distinct() {
        assert_ne!(
            request_status::RESOURCE_NOT_FOUND,
            request_status::RESOURCE_ALREADY_EXISTS
        );
    }

    #[test]
    fn success_code_value() {
        assert_eq!(request_status::SUCCESS, 100);
    }

    #[test]
    fn auth_failed_close_code_value() {
        assert_eq!(close_code::AUTHENTICATION_FAILED, 4009);
    }
}
