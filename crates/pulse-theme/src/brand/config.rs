//! Brand configs, their validator, and the runtime [`Brand`] handle.
//!
//! A brand document looks like this (JSON or YAML):
//!
//! ```json
//! {
//!   "id": "ibm",
//!   "name": "IBM",
//!   "version": "1.2.0",
//!   "description": "Carbon-flavoured brand",
//!   "figmaFileKey": "AbC123",
//!   "tokens": {
//!     "light": { "primary": "#0f62fe" },
//!     "dark":  { "primary": "#78a9ff" }
//!   }
//! }
//! ```
//!
//! `description` and `figmaFileKey` are optional, unknown extra fields are
//! ignored. Every path that accepts a document, whether from a file, an import
//! or a remote fetch, runs it through [`validate_value`] before decoding.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::{BrandParseError, RegistryError, ValidationError, ValidationIssue};
use super::tokens::TokenSet;
use crate::mode::ThemeMode;

/// The literal stored in place of "no brand".
///
/// Storage cannot represent an absent brand, so the built-in default is
/// persisted under this name. No real brand may use it as its id.
pub const NO_BRAND_ID: &str = "pulseui";

/// Brand file extensions in priority order.
pub const BRAND_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml"];

/// The light and dark token sets of a brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandTokens {
    pub light: TokenSet,
    pub dark: TokenSet,
}

impl BrandTokens {
    pub fn new(light: TokenSet, dark: TokenSet) -> Self {
        Self { light, dark }
    }

    /// Returns the token set for `mode`.
    pub fn for_mode(&self, mode: ThemeMode) -> &TokenSet {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

/// A named, versioned design identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandConfig {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figma_file_key: Option<String>,
    pub tokens: BrandTokens,
}

// A bare `description:` line in YAML decodes as null.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl BrandConfig {
    /// Creates a config with empty token sets.
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            description: String::new(),
            figma_file_key: None,
            tokens: BrandTokens::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_figma_file_key(mut self, key: impl Into<String>) -> Self {
        self.figma_file_key = Some(key.into());
        self
    }

    pub fn with_light(mut self, tokens: TokenSet) -> Self {
        self.tokens.light = tokens;
        self
    }

    pub fn with_dark(mut self, tokens: TokenSet) -> Self {
        self.tokens.dark = tokens;
        self
    }

    /// Checks the string fields of an already typed config.
    ///
    /// Token sets of a typed config are always mappings, so only `id`,
    /// `name` and `version` can be wrong here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("id", &self.id),
            ("name", &self.name),
            ("version", &self.version),
        ] {
            if value.trim().is_empty() {
                issues.push(ValidationIssue::EmptyField(field));
            }
        }
        if self.id == NO_BRAND_ID {
            issues.push(ValidationIssue::ReservedId(self.id.clone()));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(display_id(&self.id), issues))
        }
    }

    /// Validates and decodes a JSON value.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        validate_value(&value)?;
        let id = display_id(value.get("id").and_then(Value::as_str).unwrap_or("")).to_string();
        serde_json::from_value(value)
            .map_err(|e| ValidationError::new(id, vec![ValidationIssue::Malformed(e.to_string())]))
    }

    /// Parses, validates and decodes a JSON document.
    pub fn from_json(json: &str) -> Result<Self, BrandParseError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| BrandParseError::Syntax(e.to_string()))?;
        Ok(Self::from_value(value)?)
    }

    /// Parses, validates and decodes a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, BrandParseError> {
        let value: Value =
            serde_yaml::from_str(yaml).map_err(|e| BrandParseError::Syntax(e.to_string()))?;
        Ok(Self::from_value(value)?)
    }

    /// Loads a brand file, choosing the parser by extension.
    ///
    /// `.json` is parsed as JSON; `.yaml`/`.yml` (and anything else) as YAML,
    /// which also accepts JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let parsed = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        };
        parsed.map_err(|e| RegistryError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Serializes the config as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Returns true if `value` is a structurally valid brand document.
pub fn is_valid(value: &Value) -> bool {
    validate_value(value).is_ok()
}

/// Structural validation of a brand document.
///
/// A document is valid when `id`, `name` and `version` are non-empty strings,
/// the id is not the reserved "no brand" literal, and `tokens.light` and
/// `tokens.dark` are both mappings whose values are strings, numbers or
/// booleans. Pure: the value is not modified.
pub fn validate_value(value: &Value) -> Result<(), ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::new(
            "<unknown>",
            vec![ValidationIssue::NotAnObject],
        ));
    };

    let mut issues = Vec::new();

    for field in ["id", "name", "version"] {
        check_required_string(object, field, &mut issues);
    }
    for field in ["description", "figmaFileKey"] {
        match object.get(field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => issues.push(ValidationIssue::NotAString(field)),
        }
    }

    let id = object.get("id").and_then(Value::as_str).unwrap_or("");
    if id == NO_BRAND_ID {
        issues.push(ValidationIssue::ReservedId(id.to_string()));
    }

    match object.get("tokens") {
        None | Some(Value::Null) => issues.push(ValidationIssue::MissingField("tokens")),
        Some(Value::Object(tokens)) => {
            for mode in ThemeMode::ALL {
                check_token_set(tokens, mode, &mut issues);
            }
        }
        Some(_) => issues.push(ValidationIssue::NotAMapping("tokens".to_string())),
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(display_id(id), issues))
    }
}

fn check_required_string(
    object: &Map<String, Value>,
    field: &'static str,
    issues: &mut Vec<ValidationIssue>,
) {
    match object.get(field) {
        None | Some(Value::Null) => issues.push(ValidationIssue::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            issues.push(ValidationIssue::EmptyField(field))
        }
        Some(Value::String(_)) => {}
        Some(_) => issues.push(ValidationIssue::NotAString(field)),
    }
}

fn check_token_set(tokens: &Map<String, Value>, mode: ThemeMode, issues: &mut Vec<ValidationIssue>) {
    let field = format!("tokens.{}", mode);
    match tokens.get(mode.as_str()) {
        None | Some(Value::Null) => issues.push(ValidationIssue::MissingField(match mode {
            ThemeMode::Light => "tokens.light",
            ThemeMode::Dark => "tokens.dark",
        })),
        Some(Value::Object(set)) => {
            for (name, value) in set {
                if !matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
                    issues.push(ValidationIssue::InvalidTokenValue {
                        mode,
                        name: name.clone(),
                    });
                }
            }
        }
        Some(_) => issues.push(ValidationIssue::NotAMapping(field)),
    }
}

fn display_id(id: &str) -> &str {
    if id.trim().is_empty() {
        "<unknown>"
    } else {
        id
    }
}

/// Where a loaded brand came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrandOrigin {
    /// Registered in-process (programmatically, from files, or by import).
    Registry,
    /// Fetched from a URL.
    Remote { url: String },
}

/// A validated brand, as handed out by the loader.
///
/// Cheap to clone: the config is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    config: Arc<BrandConfig>,
    origin: BrandOrigin,
}

impl Brand {
    pub(crate) fn new(config: BrandConfig, origin: BrandOrigin) -> Self {
        Self {
            config: Arc::new(config),
            origin,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn config(&self) -> &BrandConfig {
        &self.config
    }

    pub fn origin(&self) -> &BrandOrigin {
        &self.origin
    }

    /// Returns the brand's token set for `mode`.
    pub fn tokens(&self, mode: ThemeMode) -> &TokenSet {
        self.config.tokens.for_mode(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ibm_json() -> Value {
        json!({
            "id": "ibm",
            "name": "IBM",
            "version": "1.0.0",
            "tokens": {
                "light": { "primary": "#0f62fe" },
                "dark": { "primary": "#78a9ff" }
            }
        })
    }

    #[test]
    fn test_validate_accepts_minimal_document() {
        assert!(is_valid(&ibm_json()));
    }

    #[test]
    fn test_validate_rejects_missing_dark() {
        let doc = json!({"id": "x", "name": "X", "version": "1.0", "tokens": {"light": {}}});
        let err = validate_value(&doc).unwrap_err();
        assert_eq!(err.id, "x");
        assert!(err.has_issue(&ValidationIssue::MissingField("tokens.dark")));
        assert!(!is_valid(&doc));
    }

    #[test]
    fn test_validate_rejects_non_mapping_token_sets() {
        for bad in [json!(null), json!("#fff"), json!(["a"]), json!(3)] {
            let mut doc = ibm_json();
            doc["tokens"]["light"] = bad;
            assert!(!is_valid(&doc), "accepted tokens.light = {}", doc["tokens"]["light"]);
        }
    }

    #[test]
    fn test_validate_rejects_empty_required_strings() {
        let mut doc = ibm_json();
        doc["name"] = json!("");
        doc["version"] = json!(1);
        let err = validate_value(&doc).unwrap_err();
        assert!(err.has_issue(&ValidationIssue::EmptyField("name")));
        assert!(err.has_issue(&ValidationIssue::NotAString("version")));
    }

    #[test]
    fn test_validate_rejects_reserved_id() {
        let mut doc = ibm_json();
        doc["id"] = json!(NO_BRAND_ID);
        let err = validate_value(&doc).unwrap_err();
        assert!(err.has_issue(&ValidationIssue::ReservedId(NO_BRAND_ID.to_string())));
    }

    #[test]
    fn test_validate_rejects_nested_token_values() {
        let mut doc = ibm_json();
        doc["tokens"]["dark"]["spacing"] = json!({"md": "8px"});
        let err = validate_value(&doc).unwrap_err();
        assert!(err.has_issue(&ValidationIssue::InvalidTokenValue {
            mode: ThemeMode::Dark,
            name: "spacing".to_string(),
        }));
    }

    #[test]
    fn test_validate_non_object_document() {
        let err = validate_value(&json!([1, 2])).unwrap_err();
        assert_eq!(err.id, "<unknown>");
        assert_eq!(err.issues, vec![ValidationIssue::NotAnObject]);
    }

    #[test]
    fn test_from_json_ignores_unknown_fields() {
        let mut doc = ibm_json();
        doc["homepage"] = json!("https://example.com");
        let config = BrandConfig::from_json(&doc.to_string()).unwrap();
        assert_eq!(config.id, "ibm");
        assert_eq!(config.tokens.light.get("primary"), Some("#0f62fe"));
        assert_eq!(config.description, "");
        assert_eq!(config.figma_file_key, None);
    }

    #[test]
    fn test_from_json_syntax_error() {
        let err = BrandConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, BrandParseError::Syntax(_)));
    }

    #[test]
    fn test_from_yaml() {
        let config = BrandConfig::from_yaml(
            r##"
            id: acme
            name: Acme
            version: "2.1"
            figmaFileKey: k123
            tokens:
              light:
                primary: "#ff0000"
                spacing.md: 16px
              dark:
                primary: "#ff8888"
            "##,
        )
        .unwrap();
        assert_eq!(config.figma_file_key.as_deref(), Some("k123"));
        assert_eq!(config.tokens.for_mode(ThemeMode::Light).get("spacing.md"), Some("16px"));
    }

    #[test]
    fn test_typed_validate() {
        assert!(BrandConfig::new("ibm", "IBM", "1.0").validate().is_ok());

        let err = BrandConfig::new("", "IBM", " ").validate().unwrap_err();
        assert_eq!(err.id, "<unknown>");
        assert!(err.has_issue(&ValidationIssue::EmptyField("id")));
        assert!(err.has_issue(&ValidationIssue::EmptyField("version")));
    }

    #[test]
    fn test_null_description_decodes_as_empty() {
        let mut value = ibm_json();
        value["description"] = Value::Null;
        assert!(is_valid(&value));

        let config = BrandConfig::from_json(&value.to_string()).unwrap();
        assert_eq!(config.description, "");

        let config = BrandConfig::from_yaml(
            "id: acme\nname: Acme\nversion: '1'\ndescription:\ntokens:\n  light: {}\n  dark: {}\n",
        )
        .unwrap();
        assert_eq!(config.id, "acme");
        assert_eq!(config.description, "");
    }

    #[test]
    fn test_json_round_trip_preserves_config() {
        let config = BrandConfig::new("ibm", "IBM", "1.0")
            .with_description("Carbon")
            .with_light(TokenSet::new().with("primary", "#0f62fe"))
            .with_dark(TokenSet::new().with("primary", "#78a9ff"));
        let json = config.to_json().unwrap();
        assert!(json.contains("\"tokens\""));
        assert_eq!(BrandConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_file_by_extension() {
        use std::fs;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("ibm.json");
        fs::write(&json_path, ibm_json().to_string()).unwrap();
        assert_eq!(BrandConfig::from_file(&json_path).unwrap().id, "ibm");

        let bad_path = dir.path().join("bad.yaml");
        fs::write(&bad_path, "id: bad\nname: Bad\nversion: '1'\ntokens:\n  light: {}\n").unwrap();
        let err = BrandConfig::from_file(&bad_path).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_brand_handle_accessors() {
        let config = BrandConfig::from_value(ibm_json()).unwrap();
        let brand = Brand::new(config, BrandOrigin::Registry);
        assert_eq!(brand.id(), "ibm");
        assert_eq!(brand.tokens(ThemeMode::Dark).get("primary"), Some("#78a9ff"));
        assert_eq!(brand.origin(), &BrandOrigin::Registry);
    }
}
