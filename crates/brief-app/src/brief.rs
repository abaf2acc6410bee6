//! The design brief submitted to the generation service.

use std::path::Path;

use brief_common::{BriefError, ConfigError};
use serde::{Deserialize, Serialize};

/// A UI design brief.
///
/// Missing optional fields take the service's request-model defaults.
/// [`Default`] is the sample brief used when no file is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignBrief {
    pub purpose: String,
    pub audience: String,
    pub tone: String,
    pub subject: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub constraints: String,
    #[serde(default)]
    pub ai_use_cases: String,
    /// Milliseconds.
    #[serde(default = "default_latency_budget")]
    pub latency_budget: u32,
    #[serde(default = "default_needs_citations")]
    pub needs_citations: String,
    #[serde(default = "default_safety_level")]
    pub safety_level: String,
    #[serde(default = "default_telemetry_opt_in")]
    pub telemetry_opt_in: String,
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

fn default_latency_budget() -> u32 {
    2000
}

fn default_needs_citations() -> String {
    "false".into()
}

fn default_safety_level() -> String {
    "moderate".into()
}

fn default_telemetry_opt_in() -> String {
    "off".into()
}

fn default_out_dir() -> String {
    "ui-agent-output".into()
}

impl Default for DesignBrief {
    fn default() -> Self {
        Self {
            purpose: "Research copilot for a knowledge base".into(),
            audience: "Analysts and PMs".into(),
            tone: "calm, precise, credible".into(),
            subject: "knowledge work".into(),
            brand: "#0EA5E9 as primary, #22C55E as success".into(),
            constraints: "dark+light themes, AA contrast, prefers shadcn".into(),
            ai_use_cases: "RAG search, multi-agent tool use with citations".into(),
            latency_budget: 1800,
            needs_citations: "true".into(),
            safety_level: default_safety_level(),
            telemetry_opt_in: default_telemetry_opt_in(),
            out_dir: default_out_dir(),
        }
    }
}

impl DesignBrief {
    /// Load a brief, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, BriefError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                BriefError::Config(ConfigError::FileNotFound(path.to_path_buf()))
            }
            _ => BriefError::Io(e),
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let brief = Self::parse(&contents, &extension)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
        brief.validate()?;
        Ok(brief)
    }

    fn parse(contents: &str, extension: &str) -> Result<Self, String> {
        match extension {
            "toml" => toml::from_str(contents).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(contents).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
            other => Err(format!(
                "unsupported brief format '{other}' (expected toml, json, yaml)"
            )),
        }
    }

    /// Reject briefs with blank required fields.
    pub fn validate(&self) -> Result<(), BriefError> {
        let required = [
            ("purpose", &self.purpose),
            ("audience", &self.audience),
            ("tone", &self.tone),
            ("subject", &self.subject),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BriefError::Brief(format!(
                "required fields are empty: {}",
                missing.join(", ")
            )))
        }
    }

    /// The JSON request body.
    pub fn to_payload(&self) -> Result<serde_json::Value, BriefError> {
        serde_json::to_value(self).map_err(|e| BriefError::Other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_toml_with_service_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "brief.toml",
            r#"
purpose = "Support inbox triage"
audience = "Support leads"
tone = "friendly"
subject = "customer support"
"#,
        );

        let brief = DesignBrief::load(&path).unwrap();
        assert_eq!(brief.purpose, "Support inbox triage");
        assert_eq!(brief.brand, "");
        assert_eq!(brief.latency_budget, 2000);
        assert_eq!(brief.needs_citations, "false");
        assert_eq!(brief.safety_level, "moderate");
        assert_eq!(brief.telemetry_opt_in, "off");
        assert_eq!(brief.out_dir, "ui-agent-output");
    }

    #[test]
    fn loads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json = write(
            &dir,
            "brief.json",
            r#"{"purpose":"p","audience":"a","tone":"t","subject":"s","latency_budget":900}"#,
        );
        let yaml = write(
            &dir,
            "brief.YML",
            "purpose: p\naudience: a\ntone: t\nsubject: s\nout_dir: gen\n",
        );

        assert_eq!(DesignBrief::load(&json).unwrap().latency_budget, 900);
        assert_eq!(DesignBrief::load(&yaml).unwrap().out_dir, "gen");
    }

    #[test]
    fn missing_required_field_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "brief.toml", "purpose = \"p\"\n");
        let err = DesignBrief::load(&path).unwrap_err();
        assert!(matches!(err, BriefError::Config(ConfigError::ParseError(_))));
        assert!(err.to_string().contains("audience"));
    }

    #[test]
    fn blank_required_field_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "brief.json",
            r#"{"purpose":"p","audience":"  ","tone":"t","subject":""}"#,
        );
        let err = DesignBrief::load(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid brief: required fields are empty: audience, subject"
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "brief.txt", "purpose = \"p\"");
        let err = DesignBrief::load(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported brief format 'txt'"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = DesignBrief::load(Path::new("/nonexistent/brief.toml")).unwrap_err();
        assert!(matches!(err, BriefError::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn sample_brief_is_valid_and_serializes_every_field() {
        let brief = DesignBrief::default();
        brief.validate().unwrap();
        let payload = brief.to_payload().unwrap();
        assert_eq!(payload["latency_budget"], 1800);
        assert_eq!(payload["needs_citations"], "true");
        assert_eq!(payload.as_object().unwrap().len(), 12);
    }
}
