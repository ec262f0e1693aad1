//! Schema sources - local files and a remote repository listing

pub mod local;
pub mod remote;

pub use local::{parse_schema, read_schema_file};
pub use remote::{fetch_entries, fetch_entries_blocking, GithubFetcher, ListingItem, SchemaFetcher};
