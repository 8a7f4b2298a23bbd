mod file_bytes_stream;
mod file_response_builder;
mod open_with_metadata;
mod requested_path;

pub use self::file_bytes_stream::*;
pub use self::file_response_builder::*;

pub(crate) use self::open_with_metadata::*;
pub(crate) use self::requested_path::*;
