use serde_json::{Value, json};

use crate::graph::{Expr, RefAttr, ResourceRef, StackGraph};
use crate::resource::ResourceKind;

/// Renders references and expressions into template intrinsics.
pub struct Resolver<'a> {
  graph: &'a StackGraph,
}

impl<'a> Resolver<'a> {
  pub fn new(graph: &'a StackGraph) -> Self {
    Self { graph }
  }

  /// `Ref` / `Fn::GetAtt` for a declared node, or a name-derived value for an imported handle.
  pub fn reference(&self, r: &ResourceRef) -> Value {
    if let Some(ResourceKind::ImportedRole(imported)) = self.graph.node(&r.target).map(|n| &n.kind) {
      return match r.attr {
        RefAttr::Name | RefAttr::Ref => json!(imported.role_name),
        _ => json!({ "Fn::Sub": imported.arn_expression() }),
      };
    }
    match r.attr {
      RefAttr::Ref => json!({ "Ref": r.target.as_str() }),
      attr => json!({ "Fn::GetAtt": [r.target.as_str(), attr.as_str()] }),
    }
  }

  /// Render an expression; joins collapse to a plain string when fully literal.
  pub fn expr(&self, expr: &Expr) -> Value {
    match expr {
      Expr::Literal(s) => json!(s),
      Expr::Ref(r) => self.reference(r),
      Expr::Join(parts) => {
        let mut flat: Vec<Value> = Vec::new();
        for part in parts {
          match self.expr(part) {
            Value::Object(obj) if obj.contains_key("Fn::Join") => {
              let inner = obj["Fn::Join"][1].as_array().cloned().unwrap_or_default();
              for value in inner {
                push_part(&mut flat, value);
              }
            }
            other => push_part(&mut flat, other),
          }
        }
        match flat.as_slice() {
          [] => json!(""),
          [Value::String(s)] => json!(s),
          _ => json!({ "Fn::Join": ["", flat] }),
        }
      }
    }
  }
}

/// Append to a join list, merging adjacent text.
fn push_part(flat: &mut Vec<Value>, value: Value) {
  if let Value::String(s) = &value {
    if let Some(Value::String(prev)) = flat.last_mut() {
      prev.push_str(s);
      return;
    }
  }
  flat.push(value);
}
