pub mod config;
pub mod logging;

pub mod document;
pub mod error;
pub mod executor;
pub mod headers;
pub mod options;
pub mod request;
pub mod serialize;
pub mod trace;
pub mod transport;

pub use document::Element;
pub use error::RequestError;
pub use executor::{execute, execute_to_xml};
pub use request::RequestInputs;
pub use transport::{CurlTransport, Transport};
