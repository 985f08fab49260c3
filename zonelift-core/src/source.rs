//! Zone record source trait
//!
//! The capability the pipeline consumes: paginated record listing and zone
//! metadata lookup for one hosted zone id. The AWS implementation lives in
//! its own crate; tests substitute in-memory sources.

use async_trait::async_trait;
use thiserror::Error;

use crate::record::RecordSet;
use crate::zone::ZoneDetails;

/// Errors reading from a zone record source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Provider API failure (network, auth, permissions).
    #[error("API error: {0}")]
    Api(String),

    /// The provider returned a response the mapper cannot use.
    #[error("malformed zone data: {0}")]
    MalformedZone(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// A source of zone metadata and record sets.
///
/// Tag lookup inside `zone_details` is best-effort: implementations degrade
/// to empty tags on failure and set `ZoneDetails::tag_lookup_failed` rather
/// than erroring out.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// List every record set in the zone, following pagination to the end.
    async fn list_record_sets(&self, zone_id: &str) -> SourceResult<Vec<RecordSet>>;

    /// Look up zone metadata (name, privacy, comment, VPC associations and,
    /// when `include_tags` is set, tags) by zone id.
    async fn zone_details(&self, zone_id: &str, include_tags: bool) -> SourceResult<ZoneDetails>;
}
