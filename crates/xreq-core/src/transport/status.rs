//! Symbolic names and canonical reason phrases for HTTP status codes.

const STATUS: &[(u32, &str, &str)] = &[
    (100, "Continue", "Continue"),
    (101, "SwitchingProtocols", "Switching Protocols"),
    (200, "OK", "OK"),
    (201, "Created", "Created"),
    (202, "Accepted", "Accepted"),
    (203, "NonAuthoritativeInformation", "Non-Authoritative Information"),
    (204, "NoContent", "No Content"),
    (205, "ResetContent", "Reset Content"),
    (206, "PartialContent", "Partial Content"),
    (300, "MultipleChoices", "Multiple Choices"),
    (301, "MovedPermanently", "Moved Permanently"),
    (302, "Found", "Found"),
    (303, "SeeOther", "See Other"),
    (304, "NotModified", "Not Modified"),
    (305, "UseProxy", "Use Proxy"),
    (307, "TemporaryRedirect", "Temporary Redirect"),
    (308, "PermanentRedirect", "Permanent Redirect"),
    (400, "BadRequest", "Bad Request"),
    (401, "Unauthorized", "Unauthorized"),
    (402, "PaymentRequired", "Payment Required"),
    (403, "Forbidden", "Forbidden"),
    (404, "NotFound", "Not Found"),
    (405, "MethodNotAllowed", "Method Not Allowed"),
    (406, "NotAcceptable", "Not Acceptable"),
    (407, "ProxyAuthenticationRequired", "Proxy Authentication Required"),
    (408, "RequestTimeout", "Request Timeout"),
    (409, "Conflict", "Conflict"),
    (410, "Gone", "Gone"),
    (411, "LengthRequired", "Length Required"),
    (412, "PreconditionFailed", "Precondition Failed"),
    (413, "RequestEntityTooLarge", "Payload Too Large"),
    (414, "RequestUriTooLong", "URI Too Long"),
    (415, "UnsupportedMediaType", "Unsupported Media Type"),
    (416, "RequestedRangeNotSatisfiable", "Range Not Satisfiable"),
    (417, "ExpectationFailed", "Expectation Failed"),
    (422, "UnprocessableEntity", "Unprocessable Entity"),
    (426, "UpgradeRequired", "Upgrade Required"),
    (429, "TooManyRequests", "Too Many Requests"),
    (500, "InternalServerError", "Internal Server Error"),
    (501, "NotImplemented", "Not Implemented"),
    (502, "BadGateway", "Bad Gateway"),
    (503, "ServiceUnavailable", "Service Unavailable"),
    (504, "GatewayTimeout", "Gateway Timeout"),
    (505, "HttpVersionNotSupported", "HTTP Version Not Supported"),
];

/// PascalCase name (`NotFound`), or the number itself for unnamed codes.
pub fn status_name(code: u32) -> String {
    STATUS
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, name, _)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

pub fn canonical_reason(code: u32) -> &'static str {
    STATUS
        .iter()
        .find(|(c, _, _)| *c == code)
        .map_or("", |(_, _, reason)| *reason)
}
