//! Response construction: the stable contract returned to callers.

mod builder;
mod types;

pub use builder::{
    AnalysisMetadata, ErrorParts, ResponseBuilder, ResponseConfig, RATE_LIMIT_MESSAGE,
};
pub use types::{
    Environment, ErrorKind, ErrorResponse, NormalizedResponse, ParseFailureResponse, Provenance,
    ResponseMeta, SanityChecks, SuccessResponse,
};
