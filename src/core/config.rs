use crate::core::error::{ExportError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use reqwest::Url;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_ENV_FILE: &str = "env_file.csv";

/// One named API deployment and the credential used against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub token: String,
    pub base_url: String,
}

impl Environment {
    /// Token with everything past the first four characters hidden, for display and logs.
    pub fn masked_token(&self) -> String {
        let visible: String = self.token.chars().take(4).collect();
        if self.token.chars().count() <= 4 {
            "****".to_string()
        } else {
            format!("{visible}****")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Prod,
    Dev,
}

impl RunMode {
    pub fn env_name(&self) -> &'static str {
        match self {
            RunMode::Prod => "prod",
            RunMode::Dev => "dev",
        }
    }
}

impl Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.env_name())
    }
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prod" => Ok(RunMode::Prod),
            "dev" => Ok(RunMode::Dev),
            _ => Err(anyhow::anyhow!("Invalid run mode: {} (expected prod or dev)", s)),
        }
    }
}

/// Environments from the env file, in file order.
#[derive(Debug, Clone)]
pub struct EnvironmentTable {
    path: PathBuf,
    environments: Vec<Environment>,
}

impl EnvironmentTable {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading environment file {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        Self::parse(path, &text)
    }

    /// Parses `name,token,base_url` lines. `path` is only used in error messages.
    pub fn parse<P: AsRef<Path>>(path: P, text: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut environments: Vec<Environment> = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index as u64 + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let malformed = |reason: String| ExportError::ConfigMalformed {
                path: path.clone(),
                line,
                reason,
            };
            let record = read_line(trimmed).map_err(|e| malformed(e.to_string()))?;
            let env = parse_record(&record).map_err(malformed)?;

            if environments.iter().any(|e| e.name == env.name) {
                return Err(malformed(format!(
                    "duplicate environment '{}'",
                    env.name
                )));
            }
            environments.push(env);
        }

        debug!("Loaded {} environments", environments.len());
        Ok(EnvironmentTable { path, environments })
    }

    pub fn select(&self, name: &str) -> Result<&Environment> {
        self.environments
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ExportError::ConfigNotFound {
                name: name.to_string(),
                path: self.path.clone(),
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.iter()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

/// Splits a single env file line into fields.
fn read_line(line: &str) -> csv::Result<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

fn parse_record(record: &StringRecord) -> std::result::Result<Environment, String> {
    if record.len() != 3 {
        return Err(format!(
            "expected 3 fields (name,token,base_url), found {}",
            record.len()
        ));
    }

    for (value, field) in record.iter().zip(["name", "token", "base_url"]) {
        if value.is_empty() {
            return Err(format!("empty {field}"));
        }
    }

    let base_url = &record[2];
    match Url::parse(base_url) {
        Ok(url) if !url.cannot_be_a_base() => {}
        Ok(_) => return Err(format!("invalid base_url '{base_url}': not a base URL")),
        Err(e) => return Err(format!("invalid base_url '{base_url}': {e}")),
    }

    Ok(Environment {
        name: record[0].to_string(),
        token: record[1].to_string(),
        base_url: record[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
dev,Tsk_123,https://sandbox.iexapis.com/stable/stock/
prod,pk_456,https://cloud.iexapis.com/stable/stock/
";

    #[test]
    fn test_select_existing_environment() {
        let table = EnvironmentTable::parse("env_file.csv", SAMPLE).unwrap();
        assert_eq!(table.len(), 2);

        let dev = table.select("dev").unwrap();
        assert_eq!(dev.token, "Tsk_123");
        assert_eq!(dev.base_url, "https://sandbox.iexapis.com/stable/stock/");

        let prod = table.select(RunMode::Prod.env_name()).unwrap();
        assert_eq!(prod.token, "pk_456");
        assert_eq!(prod.base_url, "https://cloud.iexapis.com/stable/stock/");
    }

    #[test]
    fn test_missing_environment() {
        let table =
            EnvironmentTable::parse("env_file.csv", "dev,testtoken,https://sandbox.example.com")
                .unwrap();
        let err = table.select("prod").unwrap_err();
        assert!(matches!(err, ExportError::ConfigNotFound { ref name, .. } if name == "prod"));
        assert_eq!(
            err.to_string(),
            "Environment 'prod' not found in env_file.csv"
        );
    }

    #[test]
    fn test_skips_blank_and_comment_lines_and_trims() {
        let text = "# name,token,url\n\n  dev , abc , http://localhost:8080 \n";
        let table = EnvironmentTable::parse("env_file.csv", text).unwrap();
        assert_eq!(table.len(), 1);
        let dev = table.select("dev").unwrap();
        assert_eq!(dev.token, "abc");
        assert_eq!(dev.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let text = "dev,abc,http://a\nprod,onlytoken\n";
        let err = EnvironmentTable::parse("env_file.csv", text).unwrap_err();
        match err {
            ExportError::ConfigMalformed { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("found 2"));
            }
            other => panic!("Expected ConfigMalformed, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_line_after_comments_reports_physical_line() {
        let text = "# header\n\ndev,a\n";
        let err = EnvironmentTable::parse("e", text).unwrap_err();
        assert!(matches!(err, ExportError::ConfigMalformed { line: 3, .. }));
        assert!(err.to_string().starts_with("Malformed environment file e at line 3:"));

        let text = "# one\n# two\n# three\ndev,a,http://a\n\n  # indented comment\nprod,b\n";
        let err = EnvironmentTable::parse("e", text).unwrap_err();
        assert!(matches!(err, ExportError::ConfigMalformed { line: 7, .. }));
    }

    #[test]
    fn test_base_url_without_scheme_is_malformed() {
        let text = "# name,token,url\ndev,123token,www.apiurl.com\n";
        let err = EnvironmentTable::parse("env_file.csv", text).unwrap_err();
        match err {
            ExportError::ConfigMalformed { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.starts_with("invalid base_url 'www.apiurl.com'"));
            }
            other => panic!("Expected ConfigMalformed, got {other:?}"),
        }

        let err = EnvironmentTable::parse("env_file.csv", "dev,t,mailto:a@b.com").unwrap_err();
        assert!(matches!(err, ExportError::ConfigMalformed { line: 1, .. }));
    }

    #[test]
    fn test_empty_field_is_malformed() {
        let err = EnvironmentTable::parse("env_file.csv", "dev,,http://a").unwrap_err();
        assert!(
            matches!(err, ExportError::ConfigMalformed { line: 1, ref reason, .. } if reason == "empty token")
        );
    }

    #[test]
    fn test_duplicate_name_is_malformed() {
        let err =
            EnvironmentTable::parse("env_file.csv", "dev,a,http://a\ndev,b,http://b").unwrap_err();
        assert!(matches!(err, ExportError::ConfigMalformed { line: 2, .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EnvironmentTable::load_from_path("/nonexistent/env_file.csv").unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_run_mode_parsing() {
        assert_eq!("prod".parse::<RunMode>().unwrap(), RunMode::Prod);
        assert_eq!("DEV".parse::<RunMode>().unwrap(), RunMode::Dev);
        assert!("test".parse::<RunMode>().is_err());
        assert_eq!(RunMode::Dev.to_string(), "dev");
    }

    #[test]
    fn test_masked_token() {
        let env = Environment {
            name: "dev".to_string(),
            token: "Tsk_32a0aad3142c".to_string(),
            base_url: "http://a".to_string(),
        };
        assert_eq!(env.masked_token(), "Tsk_****");

        let short = Environment {
            token: "abc".to_string(),
            ..env
        };
        assert_eq!(short.masked_token(), "****");
    }
}
