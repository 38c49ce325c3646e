use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::consts::POLICY_VERSION;
use crate::graph::{Expr, ResourceRef};
use crate::synth::Resolver;

/// Service principal the build role trusts.
pub const BUILD_SERVICE_PRINCIPAL: &str = "codebuild.amazonaws.com";

/// Service principal the pipeline role trusts.
pub const PIPELINE_SERVICE_PRINCIPAL: &str = "codepipeline.amazonaws.com";

/// Service namespaces the build role may act on, across all resources.
pub const BUILD_ROLE_NAMESPACES: [&str; 7] = ["cloudwatch", "cloudformation", "logs", "s3", "ssm", "iam", "kms"];

pub const BUILD_ROLE_POLICY_NAME: &str = "allowBuildStuffs";
pub const BUILD_ROLE_STATEMENT_SID: &str = "allowServices";

/// Principal of a resource-policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Principal {
  Service(String),
  CanonicalUser(Expr),
}

/// A single `Allow` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
  pub sid: Option<String>,
  pub principal: Option<Principal>,
  pub actions: Vec<String>,
  pub resources: Vec<Expr>,
}

impl PolicyStatement {
  pub fn allow(actions: &[&str], resources: Vec<Expr>) -> Self {
    Self {
      sid: None,
      principal: None,
      actions: actions.iter().map(|a| a.to_string()).collect(),
      resources,
    }
  }

  pub fn with_sid(mut self, sid: &str) -> Self {
    self.sid = Some(sid.to_string());
    self
  }

  pub fn with_principal(mut self, principal: Principal) -> Self {
    self.principal = Some(principal);
    self
  }

  /// Service namespaces named by the statement's actions (`s3:*` -> `s3`).
  pub fn namespaces(&self) -> Vec<&str> {
    self
      .actions
      .iter()
      .map(|a| a.split_once(':').map(|(ns, _)| ns).unwrap_or(a.as_str()))
      .collect()
  }

  pub fn references(&self) -> Vec<&ResourceRef> {
    let mut refs: Vec<&ResourceRef> = self.resources.iter().flat_map(Expr::references).collect();
    if let Some(Principal::CanonicalUser(expr)) = &self.principal {
      refs.extend(expr.references());
    }
    refs
  }

  pub fn render(&self, resolver: &Resolver<'_>) -> Value {
    let mut out = Map::new();
    if let Some(sid) = &self.sid {
      out.insert("Sid".to_string(), json!(sid));
    }
    out.insert("Effect".to_string(), json!("Allow"));
    match &self.principal {
      Some(Principal::Service(service)) => {
        out.insert("Principal".to_string(), json!({ "Service": service }));
      }
      Some(Principal::CanonicalUser(expr)) => {
        out.insert("Principal".to_string(), json!({ "CanonicalUser": resolver.expr(expr) }));
      }
      None => {}
    }
    out.insert("Action".to_string(), single_or_list(self.actions.iter().map(|a| json!(a)).collect()));
    if !self.resources.is_empty() {
      out.insert(
        "Resource".to_string(),
        single_or_list(self.resources.iter().map(|r| resolver.expr(r)).collect()),
      );
    }
    Value::Object(out)
  }
}

fn single_or_list(mut values: Vec<Value>) -> Value {
  if values.len() == 1 {
    values.remove(0)
  } else {
    Value::Array(values)
  }
}

/// An identity assumed by a service, with inline permission documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Role {
  pub name: String,
  pub description: String,
  pub assumed_by: String,
  pub inline_policies: BTreeMap<String, Vec<PolicyStatement>>,
}

impl Role {
  /// The build execution role: wildcard actions over [`BUILD_ROLE_NAMESPACES`] on every resource.
  pub fn build_role(name: &str, description: &str) -> Self {
    let actions: Vec<String> = BUILD_ROLE_NAMESPACES.iter().map(|ns| format!("{}:*", ns)).collect();
    let actions: Vec<&str> = actions.iter().map(String::as_str).collect();
    let statement = PolicyStatement::allow(&actions, vec![Expr::literal("*")]).with_sid(BUILD_ROLE_STATEMENT_SID);
    Self {
      name: name.to_string(),
      description: description.to_string(),
      assumed_by: BUILD_SERVICE_PRINCIPAL.to_string(),
      inline_policies: BTreeMap::from([(BUILD_ROLE_POLICY_NAME.to_string(), vec![statement])]),
    }
  }

  pub fn references(&self) -> Vec<&ResourceRef> {
    self
      .inline_policies
      .values()
      .flatten()
      .flat_map(PolicyStatement::references)
      .collect()
  }

  pub fn properties(&self, resolver: &Resolver<'_>) -> Value {
    let trust = PolicyStatement::allow(&["sts:AssumeRole"], Vec::new())
      .with_principal(Principal::Service(self.assumed_by.clone()));
    let policies: Vec<Value> = self
      .inline_policies
      .iter()
      .map(|(name, statements)| {
        json!({
          "PolicyName": name,
          "PolicyDocument": {
            "Version": POLICY_VERSION,
            "Statement": statements.iter().map(|s| s.render(resolver)).collect::<Vec<_>>(),
          },
        })
      })
      .collect();

    json!({
      "RoleName": self.name,
      "Description": self.description,
      "AssumeRolePolicyDocument": {
        "Version": POLICY_VERSION,
        "Statement": [trust.render(resolver)],
      },
      "Policies": policies,
    })
  }
}

/// Read-only handle to an existing role, resolved by name.
///
/// Precondition: a role with this name exists when the definition is
/// applied. When the same graph declares it, the builder orders the handle
/// after it; otherwise it must be provisioned beforehand by another definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedRole {
  pub role_name: String,
  /// Always false: the handle never manages the role.
  pub mutable: bool,
}

impl ImportedRole {
  pub fn by_name(role_name: &str) -> Self {
    Self {
      role_name: role_name.to_string(),
      mutable: false,
    }
  }

  /// ARN expression built from the stable name.
  pub fn arn_expression(&self) -> String {
    format!("arn:${{AWS::Partition}}:iam::${{AWS::AccountId}}:role/{}", self.role_name)
  }
}
