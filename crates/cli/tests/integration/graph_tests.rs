//! Graph command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::TestEnv;

#[test]
fn graph_lists_nodes() {
  let env = TestEnv::from_fixtures();

  env
    .webstack_cmd()
    .arg("graph")
    .assert()
    .success()
    .stdout(predicate::str::contains("SiteStack (12 nodes)"))
    .stdout(predicate::str::contains("DeliveryPipeline"))
    .stdout(predicate::str::contains("ImportedRole"));
}

#[test]
fn graph_json_is_in_dependency_order() {
  let env = TestEnv::from_fixtures();

  let output = env.webstack_cmd().args(["graph", "--json"]).output().unwrap();
  assert!(output.status.success());

  let entries: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(entries.len(), 12);

  let position = |id: &str| entries.iter().position(|e| e["id"] == id).unwrap();
  for (i, entry) in entries.iter().enumerate() {
    for dependency in entry["depends_on"].as_array().unwrap() {
      assert!(position(dependency.as_str().unwrap()) < i);
    }
  }

  let imported = &entries[position("ImportedRole")];
  assert_eq!(imported["external"], true);
  assert_eq!(imported["depends_on"], serde_json::json!(["ExecutionRole"]));

  let project = &entries[position("BuildDefinition")];
  let deps: Vec<&str> = project["depends_on"]
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v.as_str().unwrap())
    .collect();
  assert!(deps.contains(&"ImportedRole"));
  assert!(deps.contains(&"SourceRepository"));
}

#[test]
fn graph_fails_for_missing_explicit_options_file() {
  let env = TestEnv::from_fixtures();

  env
    .webstack_cmd()
    .args(["graph", "staging.toml"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load stack options: staging.toml"));
}
