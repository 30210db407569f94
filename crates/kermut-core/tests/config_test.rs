use std::path::PathBuf;

use kermut_core::config::*;
use kermut_core::errors::ConfigError;

const MINIMAL: &str = r#"
split = "fold_random_5"

[data]
DMS_input_folder = "data/DMS"
zero_shot = "data/zero_shot"
embeddings_multiples = "data/embeddings/multiples"
embeddings_singles = "data/embeddings/singles"
"#;

#[test]
fn config_loads_minimal_toml_with_defaults() {
    let config = KermutConfig::from_toml(MINIMAL).unwrap();

    assert_eq!(config.sequence_col, "mutated_sequence");
    assert_eq!(config.split, Split::FoldRandom5);
    assert!(!config.kernel.use_zero_shot);
    assert!(!config.kernel.use_sequence_kernel);
    assert_eq!(config.kernel.zero_shot_method, None);
    assert_eq!(config.kernel.composition, CompositionMode::WeightedSum);
    assert_eq!(config.data.dms_input_folder, PathBuf::from("data/DMS"));
    assert_eq!(config.data.read_attempts, 10);
    assert_eq!(config.data.read_retry_delay_secs, 10);
}

#[test]
fn config_loads_full_toml() {
    let toml = r#"
sequence_col = "seq"
split = "domain"

[kernel]
use_zero_shot = true
zero_shot_method = "ESM_IF1"
use_sequence_kernel = true
composition = "multiply"

[data]
DMS_input_folder = "in"
zero_shot = "zs"
embeddings_multiples = "em"
embeddings_singles = "es"
read_attempts = 3
read_retry_delay_secs = 1
"#;
    let config = KermutConfig::from_toml(toml).unwrap();
    assert_eq!(config.sequence_col, "seq");
    assert_eq!(config.split, Split::Domain);
    assert!(config.kernel.use_zero_shot);
    assert_eq!(config.kernel.zero_shot_column(), Some("esmif1_ll"));
    assert_eq!(config.kernel.composition, CompositionMode::Multiply);
    assert_eq!(config.data.read_attempts, 3);
    assert_eq!(config.data.read_retry_delay().as_secs(), 1);
}

#[test]
fn unknown_key_fails_fast() {
    let toml = format!("{MINIMAL}\nbogus = 1\n");
    let err = KermutConfig::from_toml(&toml).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn unknown_kernel_key_fails_fast() {
    let toml = r#"
split = "fold_random_5"

[kernel]
use_zero_shots = true

[data]
DMS_input_folder = "a"
zero_shot = "b"
embeddings_multiples = "c"
embeddings_singles = "d"
"#;
    assert!(matches!(
        KermutConfig::from_toml(toml),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn missing_required_data_path_fails() {
    let toml = r#"
split = "fold_random_5"

[data]
DMS_input_folder = "a"
zero_shot = "b"
embeddings_multiples = "c"
"#;
    let err = KermutConfig::from_toml(toml).unwrap_err();
    match err {
        ConfigError::ParseError { message, .. } => assert!(message.contains("embeddings_singles")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_split_fails() {
    let toml = MINIMAL.replace("split = \"fold_random_5\"", "");
    assert!(KermutConfig::from_toml(&toml).is_err());
}

#[test]
fn unknown_composition_fails_at_load() {
    let toml = format!("{MINIMAL}\n[kernel]\ncomposition = \"product\"\n");
    assert!(matches!(
        KermutConfig::from_toml(&toml),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn zero_shot_without_method_fails_validation() {
    let toml = format!("{MINIMAL}\n[kernel]\nuse_zero_shot = true\n");
    let err = KermutConfig::from_toml(&toml).unwrap_err();
    assert!(
        matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "kernel.zero_shot_method")
    );
}

#[test]
fn zero_shot_with_unknown_method_fails_validation() {
    let toml = format!(
        "{MINIMAL}\n[kernel]\nuse_zero_shot = true\nzero_shot_method = \"Oracle\"\n"
    );
    assert!(matches!(
        KermutConfig::from_toml(&toml),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn zero_read_attempts_fails_validation() {
    let toml = format!("{MINIMAL}read_attempts = 0\n");
    assert!(matches!(
        KermutConfig::from_toml(&toml),
        Err(ConfigError::ValidationFailed { ref field, .. }) if field == "data.read_attempts"
    ));
}

#[test]
fn from_file_reports_missing_file() {
    let err = KermutConfig::from_file(std::path::Path::new("/nonexistent/kermut.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn from_file_reads_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kermut.toml");
    std::fs::write(&path, MINIMAL).unwrap();
    let config = KermutConfig::from_file(&path).unwrap();
    assert_eq!(config.split, Split::FoldRandom5);
}

#[test]
fn config_toml_roundtrip() {
    let config = KermutConfig::from_toml(MINIMAL).unwrap();
    let toml_str = config.to_toml().unwrap();
    let roundtripped = KermutConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.split, config.split);
    assert_eq!(roundtripped.data.zero_shot, config.data.zero_shot);
}
