use crate::core::catalog::{Catalog, Slot};
use crate::core::quick_amounts::DEFAULT_MAX_VALUES;
use crate::core::{BetBounds, BoundsSource};
use crate::utils::error::{KioskError, Result};
use crate::utils::validation::{
    validate_bet_bounds, validate_non_empty_string, validate_path, validate_positive_number,
    validate_required_field, Validate,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KioskConfig {
    pub kiosk: KioskSection,
    pub bounds: Option<BoundsConfig>,
    pub report: Option<ReportConfig>,
    pub quick_amounts: Option<QuickAmountsConfig>,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KioskSection {
    pub branch_id: String,
    pub branch_name: Option<String>,
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundsConfig {
    pub minimum: Decimal,
    pub maximum: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickAmountsConfig {
    pub max_values: Option<usize>,
}

impl KioskConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(KioskError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| KioskError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${KIOSK_BRANCH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| KioskError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("kiosk.branch_id", &self.kiosk.branch_id)?;
        validate_path("kiosk.data_dir", &self.kiosk.data_dir)?;

        // 上下限缺少時直接拒絕，不可預設為 0
        self.bet_bounds()?;

        if let Some(report) = &self.report {
            validate_path("report.output_dir", &report.output_dir)?;
        }

        if let Some(max_values) = self.quick_amounts.as_ref().and_then(|q| q.max_values) {
            validate_positive_number("quick_amounts.max_values", max_values, 1)?;
        }

        let mut seen = HashSet::new();
        for slot in &self.slots {
            validate_non_empty_string("slots.code", &slot.code)?;
            if !seen.insert(slot.code.as_str()) {
                return Err(KioskError::InvalidConfigValueError {
                    field: "slots.code".to_string(),
                    value: slot.code.clone(),
                    reason: "Duplicate slot code".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn branch_id(&self) -> &str {
        &self.kiosk.branch_id
    }

    pub fn branch_name(&self) -> Option<&str> {
        self.kiosk.branch_name.as_deref()
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.kiosk.data_dir)
    }

    /// 未設定時，憑單寫到 data_dir/vouchers
    pub fn voucher_dir(&self) -> PathBuf {
        match &self.report {
            Some(report) => PathBuf::from(&report.output_dir),
            None => self.data_dir().join("vouchers"),
        }
    }

    pub fn quick_amounts_path(&self) -> PathBuf {
        self.data_dir().join("quick_amounts.json")
    }

    pub fn max_quick_amounts(&self) -> usize {
        self.quick_amounts
            .as_ref()
            .and_then(|q| q.max_values)
            .unwrap_or(DEFAULT_MAX_VALUES)
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::with_standard_animals(self.slots.clone())
    }
}

impl BoundsSource for KioskConfig {
    fn bet_bounds(&self) -> Result<BetBounds> {
        let bounds = validate_required_field("bounds", &self.bounds)?;
        let bounds = BetBounds::new(bounds.minimum, bounds.maximum);
        validate_bet_bounds("bounds", &bounds)?;
        Ok(bounds)
    }
}

impl Validate for KioskConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[kiosk]
branch_id = "01"
branch_name = "Sucursal Centro"
data_dir = "./data"

[bounds]
minimum = 1000
maximum = 50000

[[slots]]
code = "1"
description = "Sorteo 9 AM"
time = "09:00:00"

[[slots]]
code = "2"
description = "Sorteo 12 M"
time = "12:00:00"
active = false
"#;

    #[test]
    fn test_parse_basic_kiosk_config() {
        let config = KioskConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.branch_id(), "01");
        assert_eq!(config.branch_name(), Some("Sucursal Centro"));
        assert_eq!(
            config.bet_bounds().unwrap(),
            BetBounds::new(dec!(1000), dec!(50000))
        );
        assert_eq!(config.slots.len(), 2);
        assert_eq!(config.catalog().active_slots().len(), 1);
        assert_eq!(config.voucher_dir(), PathBuf::from("./data").join("vouchers"));
        assert_eq!(config.max_quick_amounts(), DEFAULT_MAX_VALUES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_bounds_fail_closed() {
        let toml_content = r#"
[kiosk]
branch_id = "01"
data_dir = "./data"
"#;

        let config = KioskConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.bet_bounds(),
            Err(KioskError::MissingConfigError { .. })
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let toml_content = r#"
[kiosk]
branch_id = "01"
data_dir = "./data"

[bounds]
minimum = 50000
maximum = 1000
"#;

        let config = KioskConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_slot_codes_are_rejected() {
        let toml_content = r#"
[kiosk]
branch_id = "01"
data_dir = "./data"

[bounds]
minimum = 1000
maximum = 50000

[[slots]]
code = "1"
description = "Sorteo 9 AM"
time = "09:00:00"

[[slots]]
code = "1"
description = "Sorteo 10 AM"
time = "10:00:00"
"#;

        let config = KioskConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LOTTO_KIOSK_TEST_BRANCH", "07");

        let toml_content = r#"
[kiosk]
branch_id = "${LOTTO_KIOSK_TEST_BRANCH}"
data_dir = "./data"

[bounds]
minimum = 1000
maximum = 50000
"#;

        let config = KioskConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.branch_id(), "07");

        std::env::remove_var("LOTTO_KIOSK_TEST_BRANCH");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = KioskConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.branch_id(), "01");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            KioskConfig::from_toml_str("[kiosk"),
            Err(KioskError::ConfigValidationError { .. })
        ));
    }
}
