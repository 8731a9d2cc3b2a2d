pub mod error;
pub mod jwt;
pub mod rate_limit;
pub mod swagger_doc;
