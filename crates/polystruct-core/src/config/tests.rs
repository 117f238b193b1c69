//! Tests for generator configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = GeneratorConfig::default();
    assert_eq!(config.marker_attribute, "polymorphic_struct");
    assert_eq!(config.interface_prefix, "I");
    assert_eq!(config.type_id_field, "current_type_id");
    assert_eq!(config.mode, OutputMode::Inline);
    assert!(config.emit_from_impls);
    assert!(!config.serializable);
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        marker_attribute = "poly"
        derives = ["Clone", "Copy"]
        serializable = true
        mode = "module_units"
        indent = "tabs"
    "#;

    let config = GeneratorConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.marker_attribute, "poly");
    assert_eq!(config.derives, vec!["Clone", "Copy"]);
    assert!(config.serializable);
    assert_eq!(config.mode, OutputMode::ModuleUnits);
    assert_eq!(config.indent, IndentStyle::Tabs);
    // Unset keys keep their defaults
    assert_eq!(config.type_id_suffix, "TypeId");
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        interface_prefix: ""
        type_id_field: kind
        indent: tabs
    "#;

    let config = GeneratorConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.interface_prefix, "");
    assert_eq!(config.type_id_field, "kind");
    assert_eq!(config.indent.unit(), "\t");
}

#[test]
fn test_invalid_names_rejected() {
    let err = GeneratorConfig::from_toml_str(r#"type_id_field = "not valid""#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = GeneratorConfig::from_toml_str(r#"derives = ["serde::"]"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let config = GeneratorConfig::new().with_indent(IndentStyle::Spaces(0));
    assert!(config.validate().is_err());
}

#[test]
fn test_builder() {
    let config = GeneratorConfig::new()
        .with_mode(OutputMode::ModuleUnits)
        .with_derives(["Clone", "::serde::Serialize"])
        .with_serializable(true);

    assert_eq!(config.mode, OutputMode::ModuleUnits);
    assert_eq!(config.derives.len(), 2);
    assert!(config.validate().is_ok());
}
