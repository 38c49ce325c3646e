//! Synthesized template content.

use serde_json::{Value, json};
use webstack_lib::resource::BUILD_ROLE_NAMESPACES;
use webstack_lib::stack::ids;
use webstack_lib::synth::TemplateFormat;

use super::common::StackEnv;

fn project_tag() -> Value {
  json!({ "Key": "project", "Value": "my-web" })
}

#[test]
fn every_resource_is_retained() {
  let template = StackEnv::new().template();
  assert_eq!(template.resources.len(), 11);
  for (name, resource) in &template.resources {
    assert_eq!(resource.deletion_policy.as_deref(), Some("Retain"), "{}", name);
    assert_eq!(resource.update_replace_policy.as_deref(), Some("Retain"), "{}", name);
  }
}

#[test]
fn every_top_level_resource_is_tagged() {
  let template = StackEnv::new().template();
  for name in ids::TOP_LEVEL {
    let tags = &template.resource(name).unwrap().properties["Tags"];
    assert_eq!(tags, &json!([project_tag()]), "{} is missing the project tag", name);
  }
}

#[test]
fn custom_tag_reaches_every_top_level_resource() {
  let template = StackEnv::with_options("[tag]\nkey = \"team\"\nvalue = \"web\"\n").template();
  for name in ids::TOP_LEVEL {
    assert_eq!(
      template.resource(name).unwrap().properties["Tags"],
      json!([{ "Key": "team", "Value": "web" }])
    );
  }
}

#[test]
fn repository_is_seeded_from_archive() {
  let template = StackEnv::new().template();
  let repo = &template.resource(ids::SOURCE_REPOSITORY).unwrap().properties;

  assert_eq!(repo["RepositoryName"], "my-web-repo-test");
  assert_eq!(
    repo["Code"],
    json!({ "S3": { "Bucket": "my-stuffs", "Key": "codeCDK/web/Archive.zip" }, "BranchName": "main" })
  );
}

#[test]
fn unseeded_repository_has_no_code() {
  let template = StackEnv::with_options("[repository]\nname = \"blank-repo\"\nseed = false\n").template();
  let repo = &template.resource(ids::SOURCE_REPOSITORY).unwrap().properties;

  assert_eq!(repo["RepositoryName"], "blank-repo");
  assert!(repo.get("Code").is_none());
  assert_eq!(repo["Tags"], json!([project_tag()]));
}

#[test]
fn distribution_fronts_bucket_through_identity() {
  let template = StackEnv::new().template();
  let config = &template.resource(ids::DISTRIBUTION).unwrap().properties["DistributionConfig"];

  assert_eq!(config["DefaultRootObject"], "index.html");
  let origin = &config["Origins"][0];
  assert_eq!(
    origin["DomainName"],
    json!({ "Fn::GetAtt": [ids::ARTIFACT_STORE, "RegionalDomainName"] })
  );
  assert_eq!(
    origin["S3OriginConfig"]["OriginAccessIdentity"],
    json!({ "Fn::Join": ["", ["origin-access-identity/cloudfront/", { "Ref": ids::ORIGIN_ACCESS_IDENTITY }]] })
  );

  let behavior = &config["DefaultCacheBehavior"];
  assert_eq!(behavior["AllowedMethods"], json!(["GET", "HEAD", "OPTIONS"]));
  assert_eq!(behavior["ViewerProtocolPolicy"], "https-only");
  assert_eq!(behavior["CachePolicyId"], json!({ "Ref": ids::CACHE_POLICY }));
}

#[test]
fn cache_policy_ttls_are_seconds() {
  let template = StackEnv::new().template();
  let config = &template.resource(ids::CACHE_POLICY).unwrap().properties["CachePolicyConfig"];

  assert_eq!(config["Name"], "myWebPolicy");
  assert_eq!(config["MinTTL"], 60);
  assert_eq!(config["DefaultTTL"], 172_800);
  assert_eq!(config["MaxTTL"], 864_000);
}

#[test]
fn bucket_policy_grants_identity_read() {
  let template = StackEnv::new().template();
  let policy = &template.resource(ids::ARTIFACT_STORE_POLICY).unwrap().properties;
  let statement = &policy["PolicyDocument"]["Statement"][0];

  assert_eq!(statement["Action"], "s3:GetObject");
  assert_eq!(
    statement["Principal"]["CanonicalUser"],
    json!({ "Fn::GetAtt": [ids::ORIGIN_ACCESS_IDENTITY, "S3CanonicalUserId"] })
  );
  assert_eq!(
    statement["Resource"],
    json!({ "Fn::Join": ["", [{ "Fn::GetAtt": [ids::ARTIFACT_STORE, "Arn"] }, "/*"]] })
  );
}

#[test]
fn execution_role_policy_in_template() {
  let template = StackEnv::new().template();
  let role = &template.resource(ids::EXECUTION_ROLE).unwrap().properties;

  assert_eq!(role["RoleName"], "codebuildRole");
  assert_eq!(
    role["AssumeRolePolicyDocument"]["Statement"][0]["Principal"]["Service"],
    "codebuild.amazonaws.com"
  );

  let policies = role["Policies"].as_array().unwrap();
  assert_eq!(policies.len(), 1);
  assert_eq!(policies[0]["PolicyName"], "allowBuildStuffs");
  let statement = &policies[0]["PolicyDocument"]["Statement"][0];
  let expected: Vec<String> = BUILD_ROLE_NAMESPACES.iter().map(|ns| format!("{}:*", ns)).collect();
  assert_eq!(statement["Action"], json!(expected));
  assert_eq!(statement["Resource"], "*");
  assert_eq!(statement["Sid"], "allowServices");
}

#[test]
fn build_project_uses_name_derived_role_arn() {
  let template = StackEnv::new().template();
  let project = template.resource(ids::BUILD_PROJECT).unwrap();

  assert_eq!(
    project.properties["ServiceRole"],
    json!({ "Fn::Sub": "arn:${AWS::Partition}:iam::${AWS::AccountId}:role/codebuildRole" })
  );
  assert_eq!(project.depends_on, vec![ids::EXECUTION_ROLE.to_string()]);
  assert!(template.resource(ids::IMPORTED_ROLE).is_none());
}

#[test]
fn build_project_embeds_reencoded_buildspec() {
  let env = StackEnv::new();
  let template = env.template();
  let source = &template.resource(ids::BUILD_PROJECT).unwrap().properties["Source"];

  assert_eq!(source["Type"], "CODECOMMIT");
  assert_eq!(
    source["Location"],
    json!({ "Fn::GetAtt": [ids::SOURCE_REPOSITORY, "CloneUrlHttp"] })
  );
  let embedded: serde_yaml::Value = serde_yaml::from_str(source["BuildSpec"].as_str().unwrap()).unwrap();
  let on_disk: serde_yaml::Value =
    serde_yaml::from_str(&std::fs::read_to_string(env.temp.path().join("buildspec.yaml")).unwrap()).unwrap();
  assert_eq!(embedded, on_disk);
}

#[test]
fn pipeline_stages_in_template() {
  let template = StackEnv::new().template();
  let pipeline = &template.resource(ids::PIPELINE).unwrap().properties;

  assert_eq!(pipeline["Name"], "my-web-pipelines");
  let stages = pipeline["Stages"].as_array().unwrap();
  assert_eq!(stages.len(), 2);
  assert_eq!(stages[0]["Name"], "Commit");
  assert_eq!(stages[1]["Name"], "Build");

  let source = &stages[0]["Actions"][0];
  let build = &stages[1]["Actions"][0];
  assert_eq!(source["OutputArtifacts"], build["InputArtifacts"]);
  assert_eq!(source["Configuration"]["BranchName"], "main");
  assert_eq!(build["Configuration"]["ProjectName"], json!({ "Ref": ids::BUILD_PROJECT }));
}

#[test]
fn build_variable_points_at_artifact_store() {
  let template = StackEnv::new().template();
  let pipeline = &template.resource(ids::PIPELINE).unwrap().properties;
  let variables = &pipeline["Stages"][1]["Actions"][0]["Configuration"]["EnvironmentVariables"];

  assert_eq!(
    variables,
    &json!({ "Fn::Join": ["", [
      "[{\"name\":\"S3BUCKET\",\"type\":\"PLAINTEXT\",\"value\":\"s3://",
      { "Ref": ids::ARTIFACT_STORE },
      "\"}]"
    ]] })
  );
}

#[test]
fn suffix_applies_to_environment_names() {
  let template = StackEnv::with_options("suffix = \"prod\"\n").template();

  assert_eq!(
    template.resource(ids::ARTIFACT_STORE).unwrap().properties["BucketName"],
    "my-web-test-1-prod"
  );
  assert_eq!(
    template.resource(ids::BUILD_PROJECT).unwrap().properties["Name"],
    "web-build-prod"
  );
  assert_eq!(
    template.resource(ids::EXECUTION_ROLE).unwrap().properties["RoleName"],
    "codebuildRole"
  );
}

#[test]
fn outputs_expose_site_and_repository() {
  let template = StackEnv::new().template();
  assert_eq!(
    template.outputs["DistributionDomainName"].value,
    json!({ "Fn::GetAtt": [ids::DISTRIBUTION, "DomainName"] })
  );
  assert_eq!(
    template.outputs["RepositoryCloneUrl"].value,
    json!({ "Fn::GetAtt": [ids::SOURCE_REPOSITORY, "CloneUrlHttp"] })
  );
}

#[test]
fn yaml_and_json_describe_the_same_template() {
  let template = StackEnv::new().template();
  let from_json: Value = serde_json::from_str(&template.render(TemplateFormat::Json).unwrap()).unwrap();
  let from_yaml: Value = serde_yaml::from_str(&template.render(TemplateFormat::Yaml).unwrap()).unwrap();
  assert_eq!(from_json, from_yaml);
}
