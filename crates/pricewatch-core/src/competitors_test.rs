use super::*;

#[test]
fn builtin_registry_keeps_configuration_order() {
    let registry = CompetitorRegistry::builtin();
    assert_eq!(
        registry.keys(),
        vec!["carta", "bolago", "nvr", "ledgy", "cakeequity", "mantle"]
    );
}

#[test]
fn builtin_registry_passes_validation() {
    let registry = CompetitorRegistry::builtin();
    let competitors: Vec<Competitor> = registry.iter().cloned().collect();
    assert!(validate_competitors(&competitors).is_ok());
}

#[test]
fn get_finds_competitor_by_key() {
    let registry = CompetitorRegistry::builtin();
    let cake = registry.get("cakeequity").expect("cakeequity configured");
    assert_eq!(cake.name, "Cake Equity");
    assert_eq!(cake.url, "https://www.cakeequity.com/pricing");
    assert!(registry.get("unknown-key").is_none());
}

#[test]
fn validate_rejects_empty_key() {
    let err = CompetitorRegistry::new(vec![Competitor::new(" ", "Acme", "https://acme.test")])
        .unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn validate_rejects_empty_name() {
    let err = CompetitorRegistry::new(vec![Competitor::new("acme", "", "https://acme.test")])
        .unwrap_err();
    assert!(err.to_string().contains("non-empty name"));
}

#[test]
fn validate_rejects_non_http_url() {
    let err = CompetitorRegistry::new(vec![Competitor::new(
        "acme",
        "Acme",
        "ftp://acme.test/pricing",
    )])
    .unwrap_err();
    assert!(err.to_string().contains("must be http(s)"));
}

#[test]
fn validate_rejects_duplicate_key() {
    let err = CompetitorRegistry::new(vec![
        Competitor::new("acme", "Acme", "https://acme.test"),
        Competitor::new("acme", "Acme Two", "https://two.acme.test"),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("duplicate competitor key"));
}

#[test]
fn empty_registry_is_allowed() {
    let registry = CompetitorRegistry::new(vec![]).unwrap();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn competitors_file_parses_yaml() {
    let yaml = r"
competitors:
  - key: acme
    name: Acme Corp
    url: https://acme.test/pricing
  - key: globex
    name: Globex
    url: http://globex.test/plans
";
    let file: CompetitorsFile = serde_yaml::from_str(yaml).expect("parse");
    assert_eq!(file.competitors.len(), 2);
    assert_eq!(file.competitors[1].key, "globex");
    assert_eq!(file.competitors[1].url, "http://globex.test/plans");
}

#[test]
fn load_competitors_reports_missing_file() {
    let result = load_competitors(Path::new("/definitely/not/here/competitors.yaml"));
    assert!(matches!(result, Err(ConfigError::CompetitorsFileIo { .. })));
}

#[test]
fn load_competitors_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("competitors.yaml");
    assert!(
        path.exists(),
        "competitors.yaml missing at {path:?} — required for this test"
    );
    let registry = load_competitors(&path).expect("failed to load competitors.yaml");
    assert_eq!(
        registry.keys(),
        CompetitorRegistry::builtin().keys(),
        "shipped competitors.yaml should mirror the built-in registry"
    );
}
