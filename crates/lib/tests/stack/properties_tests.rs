//! Structural guarantees of the assembled graph.

use webstack_lib::graph::RemovalPolicy;
use webstack_lib::resource::{Action, BUILD_ROLE_NAMESPACES, BUILD_ROLE_POLICY_NAME, ResourceKind};
use webstack_lib::stack::{AssembleError, assemble, ids};
use webstack_lib::synth::{TemplateFormat, synthesize};
use webstack_lib::util::hash::Hashable;

use super::common::{StackEnv, id};

#[test]
fn assembly_is_deterministic() {
  let env = StackEnv::new();

  let first = env.graph();
  let second = env.graph();
  assert_eq!(first, second);
  assert_eq!(first.edges(), second.edges());

  let a = synthesize(&first);
  let b = synthesize(&second);
  assert_eq!(
    a.render(TemplateFormat::Json).unwrap(),
    b.render(TemplateFormat::Json).unwrap()
  );
  assert_eq!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
}

#[test]
fn every_declared_node_is_retained() {
  let graph = StackEnv::new().graph();
  for node in graph.nodes().filter(|n| !n.kind.is_external()) {
    assert_eq!(node.removal_policy, RemovalPolicy::Retain, "{} is not retained", node.id);
  }
}

#[test]
fn pipeline_has_commit_then_build() {
  let graph = StackEnv::new().graph();
  let ResourceKind::Pipeline(pipeline) = &graph.node(&id(ids::PIPELINE)).unwrap().kind else {
    panic!("pipeline node is not a pipeline");
  };

  let names: Vec<&str> = pipeline.stages.iter().map(|s| s.name.as_str()).collect();
  assert_eq!(names, vec!["Commit", "Build"]);
  assert!(pipeline.stages.iter().all(|s| s.actions.len() == 1));

  let commit = &pipeline.stage(ids::COMMIT_STAGE).unwrap().actions[0];
  let build = &pipeline.stage(ids::BUILD_STAGE).unwrap().actions[0];
  assert_eq!(commit.name(), ids::SOURCE_ACTION);
  assert_eq!(build.name(), ids::BUILD_ACTION);
  assert!(pipeline.stage("Deploy").is_none());
  assert!(matches!(commit, Action::Source(_)));
  assert!(matches!(build, Action::Build(_)));
  assert_eq!(commit.outputs(), build.inputs());
  assert!(!commit.outputs().is_empty());
}

#[test]
fn execution_role_grants_exactly_declared_namespaces() {
  let graph = StackEnv::new().graph();
  let ResourceKind::Role(role) = &graph.node(&id(ids::EXECUTION_ROLE)).unwrap().kind else {
    panic!("execution role is not a role");
  };

  assert_eq!(role.inline_policies.len(), 1);
  let statements = &role.inline_policies[BUILD_ROLE_POLICY_NAME];
  assert_eq!(statements.len(), 1);

  let mut namespaces = statements[0].namespaces();
  namespaces.sort();
  let mut expected = BUILD_ROLE_NAMESPACES.to_vec();
  expected.sort();
  assert_eq!(namespaces, expected);
}

#[test]
fn build_project_binds_the_imported_role() {
  let graph = StackEnv::new().graph();
  let ResourceKind::BuildProject(project) = &graph.node(&id(ids::BUILD_PROJECT)).unwrap().kind else {
    panic!("build node is not a project");
  };

  assert_eq!(project.role.target, id(ids::IMPORTED_ROLE));
  assert_ne!(project.role.target, id(ids::EXECUTION_ROLE));

  let ResourceKind::ImportedRole(imported) = &graph.node(&id(ids::IMPORTED_ROLE)).unwrap().kind else {
    panic!("imported node is not a handle");
  };
  assert!(!imported.mutable);
}

#[test]
fn imported_role_waits_for_local_declaration() {
  let graph = StackEnv::new().graph();
  let role = graph.position(&id(ids::EXECUTION_ROLE)).unwrap();
  let handle = graph.position(&id(ids::IMPORTED_ROLE)).unwrap();
  let project = graph.position(&id(ids::BUILD_PROJECT)).unwrap();
  assert!(role < handle);
  assert!(handle < project);
}

#[test]
fn construction_order_respects_references() {
  let graph = StackEnv::new().graph();
  for (dependency, dependent) in graph.edges() {
    assert!(
      graph.position(dependency).unwrap() < graph.position(dependent).unwrap(),
      "{} should precede {}",
      dependency,
      dependent
    );
  }
}

#[test]
fn missing_buildspec_yields_no_graph() {
  let env = StackEnv::new();
  std::fs::remove_file(env.temp.path().join("buildspec.yaml")).unwrap();

  let result = assemble(&env.options);
  assert!(matches!(result, Err(AssembleError::BuildSpec(_))));
}

#[test]
fn unparsable_buildspec_yields_no_graph() {
  let env = StackEnv::new();
  std::fs::write(env.temp.path().join("buildspec.yaml"), "phases: [\n  - oops: {\n").unwrap();

  let err = assemble(&env.options).unwrap_err();
  assert!(err.to_string().contains("failed to parse build-step document"));
}

#[test]
fn seed_archive_override_reflects_locator() {
  let env = StackEnv::with_options(
    r#"
[repository.seed]
bucket = "seed-bucket"
key = "releases/site.zip"
branch = "trunk"
"#,
  );
  let graph = env.graph();
  let repo = graph.node(&id(ids::SOURCE_REPOSITORY)).unwrap();

  assert_eq!(
    repo.property_override("Code"),
    Some(&serde_json::json!({
      "S3": { "Bucket": "seed-bucket", "Key": "releases/site.zip" },
      "BranchName": "trunk",
    }))
  );
}
