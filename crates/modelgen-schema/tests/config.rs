use modelgen_schema::{
    Error, RawBatch, ResolveConfig, load, load_with_toml,
    raw::{RawBelongsTo, RawClass, RawDocument},
};

fn batch() -> RawBatch {
    RawBatch::new().with_document(
        RawDocument::default()
            .with_class(RawClass::new("OAuthToken"))
            .with_class(RawClass::new("Session").belongs_to(RawBelongsTo::new("OAuthToken"))),
    )
}

#[test]
fn toml_config_drives_naming() {
    let registry = load_with_toml(
        &batch(),
        r#"
        storage_prefix = "auth_"

        [underscore_overrides]
        OAuthToken = "oauth_token"
        "#,
    )
    .expect("batch resolves");

    let token = registry.find("OAuthToken").expect("token is registered");
    assert_eq!(token.normalized_name(), "oauth_token");
    assert_eq!(token.storage_name(), "auth_oauth_tokens");
    assert!(
        registry
            .find("Session")
            .and_then(|s| s.get_own_property("oauth_token_id").cloned())
            .is_some()
    );
}

#[test]
fn invalid_toml_is_a_config_error() {
    let err = load_with_toml(&batch(), "storage_prefix = 3").unwrap_err();

    assert!(matches!(err, Error::ConfigError(_)));
}

#[test]
fn default_config_uses_standard_prefix() {
    let loaded = load(&batch(), &ResolveConfig::default());

    assert!(loaded.is_ok());
    assert_eq!(
        loaded
            .registry
            .find_by_normalized_name("session")
            .map(|c| c.storage_name().to_string()),
        Some("tpt_sessions".to_string())
    );
}
