//! Crate-wide constants.

/// Application name, used for the CLI and default file names.
pub const APP_NAME: &str = "webstack";

/// Length of the truncated object hash used to name output directories.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Default options file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "webstack.toml";

/// Default build-step document, relative to the options file.
pub const DEFAULT_BUILDSPEC_FILE: &str = "buildspec.yaml";

/// Environment variable overriding the synthesis output root.
pub const OUT_DIR_ENV: &str = "WEBSTACK_OUT_DIR";

/// Synthesis output root when [`OUT_DIR_ENV`] is unset.
pub const DEFAULT_OUT_DIR: &str = "stack.out";

/// CloudFormation template format version.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// IAM / S3 policy language version.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Managed CloudFront origin request policy `CORS-S3Origin`.
pub const CORS_S3_ORIGIN_REQUEST_POLICY_ID: &str = "88a5eaf4-2fd4-4709-b370-b4c650ea3fcf";
