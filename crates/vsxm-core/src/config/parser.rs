//! TOML parser with line context in error messages

use super::schema::VsxmConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse vsxm.toml from disk
pub fn parse_vsxm_toml(path: &Path) -> Result<VsxmConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_vsxm_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse vsxm.toml content from string
pub fn parse_vsxm_toml_str(content: &str) -> Result<VsxmConfig> {
    let config: VsxmConfig =
        toml::from_str(content).map_err(|e| describe_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &VsxmConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}

fn describe_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    match error.span() {
        Some(span) => {
            let line_num = content[..span.start.min(content.len())]
                .matches('\n')
                .count()
                + 1;
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                line_context(content, line_num),
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

/// Lines around `line_num` (1-based) with the offending one marked
fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_vsxm_toml_str("").unwrap();
        assert_eq!(config, VsxmConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let toml = r#"
extensions_dir = "/data/extensions"

[marketplace]
base_url = "http://localhost:8080"
page_size = 50
timeout_secs = 5
user_agent = "test-agent"
"#;
        let config = parse_vsxm_toml_str(toml).unwrap();
        assert_eq!(
            config.extensions_dir,
            Some(PathBuf::from("/data/extensions"))
        );
        assert_eq!(config.marketplace.base_url, "http://localhost:8080");
        assert_eq!(config.marketplace.page_size, 50);
        assert_eq!(config.marketplace.timeout_secs, 5);
        assert_eq!(config.user_agent(), "test-agent");
    }

    #[test]
    fn syntax_error_reports_line() {
        let toml = "extensions_dir = \"/a\"\n[marketplace\nbase_url = 1\n";
        let err = parse_vsxm_toml_str(toml).unwrap_err().to_string();
        assert!(
            err.contains("TOML parsing error at line"),
            "unexpected error: {err}"
        );
        assert!(err.contains(">>>"));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let toml = "[marketplace]\nbase_url = \"not a url\"\n";
        assert!(parse_vsxm_toml_str(toml).is_err());
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = VsxmConfig::new();
        config.extensions_dir = Some(PathBuf::from("/x/y"));
        config.marketplace.page_size = 7;

        let text = to_toml(&config).unwrap();
        let parsed = parse_vsxm_toml_str(&text).unwrap();

        assert_eq!(parsed, config);
    }
}
