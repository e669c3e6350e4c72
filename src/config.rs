use crate::error::ReconError;
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scoring: ScoringConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// 评分权重与容差
///
/// 一个评分器实例持有一份不可变的配置；需要调整时构造新的评分器，不要在批量评分过程中修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub amount_exact_weight: f64,
    /// 保留字段，当前不参与加权求和
    pub amount_close_weight: f64,
    pub date_proximity_weight: f64,
    pub text_similarity_weight: f64,
    pub amount_tolerance_percent: f64,
    pub date_proximity_days: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            amount_exact_weight: 0.4,
            amount_close_weight: 0.2,
            date_proximity_weight: 0.3,
            text_similarity_weight: 0.3,
            amount_tolerance_percent: 2.0,
            date_proximity_days: 3,
        }
    }
}

impl ScoringConfig {
    /// 校验权重与容差：必须是有限非负数。权重之和不做归一化。
    pub fn validate(&self) -> Result<(), ReconError> {
        let fields = [
            ("amount_exact_weight", self.amount_exact_weight),
            ("amount_close_weight", self.amount_close_weight),
            ("date_proximity_weight", self.date_proximity_weight),
            ("text_similarity_weight", self.text_similarity_weight),
            ("amount_tolerance_percent", self.amount_tolerance_percent),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ReconError::InvalidConfig(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// 应用单次调用的覆盖项，返回新的配置
    pub fn with_overrides(&self, overrides: &ScoringOverrides) -> Self {
        Self {
            amount_exact_weight: overrides.amount_exact_weight.unwrap_or(self.amount_exact_weight),
            amount_close_weight: overrides.amount_close_weight.unwrap_or(self.amount_close_weight),
            date_proximity_weight: overrides
                .date_proximity_weight
                .unwrap_or(self.date_proximity_weight),
            text_similarity_weight: overrides
                .text_similarity_weight
                .unwrap_or(self.text_similarity_weight),
            amount_tolerance_percent: overrides
                .amount_tolerance_percent
                .unwrap_or(self.amount_tolerance_percent),
            date_proximity_days: overrides.date_proximity_days.unwrap_or(self.date_proximity_days),
        }
    }
}

/// 单次调用的配置覆盖 (未设置的字段沿用评分器配置)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringOverrides {
    pub amount_exact_weight: Option<f64>,
    pub amount_close_weight: Option<f64>,
    pub date_proximity_weight: Option<f64>,
    pub text_similarity_weight: Option<f64>,
    pub amount_tolerance_percent: Option<f64>,
    pub date_proximity_days: Option<u32>,
}

impl ScoringOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// 请求未指定 top_n 时每张发票保留的候选数
    pub default_top_n: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { default_top_n: 5 }
    }
}

impl AppConfig {
    /// 加载配置：默认值 < recon.toml (可选) < RECON_* 环境变量
    ///
    /// 环境变量以 `__` 分隔层级，例如 `RECON_SCORING__AMOUNT_TOLERANCE_PERCENT=1.5`、
    /// `RECON_SERVER__PORT=9000`。
    pub fn from_env() -> Result<Self, ReconError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("recon").required(false))
            .add_source(
                config::Environment::with_prefix("RECON")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    /// 从 TOML 文本加载 (未出现的字段取默认值)
    pub fn from_toml_str(content: &str) -> Result<Self, ReconError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ReconError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.scoring.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ScoringConfig::default();
        assert_eq!(config.amount_exact_weight, 0.4);
        assert_eq!(config.amount_close_weight, 0.2);
        assert_eq!(config.date_proximity_weight, 0.3);
        assert_eq!(config.text_similarity_weight, 0.3);
        assert_eq!(config.amount_tolerance_percent, 2.0);
        assert_eq!(config.date_proximity_days, 3);
        assert_eq!(AppConfig::default().batch.default_top_n, 5);
    }

    #[test]
    fn toml_overrides_only_listed_fields() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 9000

            [scoring]
            amount_tolerance_percent = 5.0
            date_proximity_days = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.scoring.amount_tolerance_percent, 5.0);
        assert_eq!(config.scoring.date_proximity_days, 7);
        assert_eq!(config.scoring.amount_exact_weight, 0.4);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [scoring]
            text_similarity_weight = -0.1
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::InvalidConfig(_)));
    }

    #[test]
    fn overrides_replace_only_set_fields() {
        let base = ScoringConfig::default();
        let overrides = ScoringOverrides {
            date_proximity_weight: Some(0.5),
            date_proximity_days: Some(10),
            ..Default::default()
        };
        let merged = base.with_overrides(&overrides);

        assert_eq!(merged.date_proximity_weight, 0.5);
        assert_eq!(merged.date_proximity_days, 10);
        assert_eq!(merged.amount_exact_weight, base.amount_exact_weight);
        assert!(!overrides.is_empty());
        assert!(ScoringOverrides::default().is_empty());
    }
}
