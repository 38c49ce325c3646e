//! Template content for `webstack init`.

/// Options file with every default spelled out.
pub const WEBSTACK_TOML_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/webstack.toml"));

/// Starter build-step document for a node-built static site.
pub const BUILDSPEC_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/buildspec.yaml"));
