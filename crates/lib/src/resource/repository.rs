use serde::Serialize;
use serde_json::{Value, json};

use crate::config::SeedArchive;

/// A named source-control repository.
///
/// Seeding from a remote archive is not part of the record; it is applied as
/// a `Code` property override (see [`SeedArchive::to_code_property`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRepository {
  pub name: String,
  pub description: String,
}

impl SourceRepository {
  pub fn properties(&self) -> Value {
    json!({
      "RepositoryName": self.name,
      "RepositoryDescription": self.description,
    })
  }
}

impl SeedArchive {
  /// Repository `Code` property seeding the branch from a zip archive.
  pub fn to_code_property(&self) -> Value {
    json!({
      "S3": { "Bucket": self.bucket, "Key": self.key },
      "BranchName": self.branch,
    })
  }
}
