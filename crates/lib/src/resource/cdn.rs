use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};

use crate::graph::{Expr, ResourceRef};
use crate::synth::Resolver;

/// Cache lifetimes for the distribution's default behavior.
///
/// `min_ttl <= default_ttl <= max_ttl` is expected but not checked here; the
/// provisioning engine rejects an inverted range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachePolicy {
  pub name: String,
  pub comment: String,
  pub default_ttl: Duration,
  pub min_ttl: Duration,
  pub max_ttl: Duration,
}

impl CachePolicy {
  pub fn properties(&self) -> Value {
    json!({
      "CachePolicyConfig": {
        "Name": self.name,
        "Comment": self.comment,
        "DefaultTTL": self.default_ttl.as_secs(),
        "MinTTL": self.min_ttl.as_secs(),
        "MaxTTL": self.max_ttl.as_secs(),
        "ParametersInCacheKeyAndForwardedToOrigin": {
          "CookiesConfig": { "CookieBehavior": "none" },
          "HeadersConfig": { "HeaderBehavior": "none" },
          "QueryStringsConfig": { "QueryStringBehavior": "none" },
          "EnableAcceptEncodingGzip": false,
          "EnableAcceptEncodingBrotli": false,
        },
      },
    })
  }
}

/// Principal the distribution uses to read a private bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginAccessIdentity {
  pub comment: String,
}

impl OriginAccessIdentity {
  pub fn properties(&self) -> Value {
    json!({ "CloudFrontOriginAccessIdentityConfig": { "Comment": self.comment } })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllowedMethods {
  GetHead,
  GetHeadOptions,
  All,
}

impl AllowedMethods {
  pub fn methods(&self) -> &'static [&'static str] {
    match self {
      AllowedMethods::GetHead => &["GET", "HEAD"],
      AllowedMethods::GetHeadOptions => &["GET", "HEAD", "OPTIONS"],
      AllowedMethods::All => &["GET", "HEAD", "OPTIONS", "PUT", "PATCH", "POST", "DELETE"],
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewerProtocolPolicy {
  AllowAll,
  RedirectToHttps,
  HttpsOnly,
}

impl ViewerProtocolPolicy {
  pub fn as_str(&self) -> &'static str {
    match self {
      ViewerProtocolPolicy::AllowAll => "allow-all",
      ViewerProtocolPolicy::RedirectToHttps => "redirect-to-https",
      ViewerProtocolPolicy::HttpsOnly => "https-only",
    }
  }
}

/// Bucket origin read through an origin access identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3Origin {
  pub id: String,
  /// Regional domain name of the bucket.
  pub bucket: ResourceRef,
  pub identity: ResourceRef,
}

/// CDN distribution with a single bucket origin and default behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
  pub origin: S3Origin,
  pub allowed_methods: AllowedMethods,
  pub viewer_protocol_policy: ViewerProtocolPolicy,
  pub cache_policy: ResourceRef,
  pub origin_request_policy_id: Option<String>,
  pub default_root_object: String,
}

impl Distribution {
  pub fn references(&self) -> Vec<&ResourceRef> {
    vec![&self.origin.bucket, &self.origin.identity, &self.cache_policy]
  }

  pub fn properties(&self, resolver: &Resolver<'_>) -> Value {
    let identity_path = Expr::Join(vec![
      Expr::literal("origin-access-identity/cloudfront/"),
      Expr::Ref(self.origin.identity.clone()),
    ]);

    let mut behavior = json!({
      "TargetOriginId": self.origin.id,
      "AllowedMethods": self.allowed_methods.methods(),
      "CachedMethods": ["GET", "HEAD"],
      "ViewerProtocolPolicy": self.viewer_protocol_policy.as_str(),
      "CachePolicyId": resolver.reference(&self.cache_policy),
      "Compress": true,
    });
    if let Some(id) = &self.origin_request_policy_id {
      behavior["OriginRequestPolicyId"] = json!(id);
    }

    json!({
      "DistributionConfig": {
        "Enabled": true,
        "HttpVersion": "http2",
        "IPV6Enabled": true,
        "DefaultRootObject": self.default_root_object,
        "Origins": [{
          "Id": self.origin.id,
          "DomainName": resolver.reference(&self.origin.bucket),
          "S3OriginConfig": { "OriginAccessIdentity": resolver.expr(&identity_path) },
        }],
        "DefaultCacheBehavior": behavior,
      },
    })
  }
}
