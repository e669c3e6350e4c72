use thiserror::Error;

/// 对账核心错误
///
/// 只有前置条件错误会出现在这里；缺失可选字段、币种不一致等情况由评分策略处理，不视为错误。
#[derive(Debug, Error)]
pub enum ReconError {
    /// 金额无法解析为精确十进制
    #[error("record '{record_id}': cannot parse amount '{value}'")]
    InvalidAmount { record_id: String, value: String },

    /// 时间戳无法解析
    #[error("record '{record_id}': cannot parse timestamp '{value}'")]
    InvalidTimestamp { record_id: String, value: String },

    /// 银行流水缺少入账时间
    #[error("transaction '{transaction_id}': posted_at is required")]
    MissingPostedAt { transaction_id: String },

    /// 必填字段为空 (id / currency)
    #[error("record '{record_id}': field '{field}' must not be empty")]
    EmptyField { record_id: String, field: &'static str },

    /// 评分配置非法
    #[error("invalid scoring config: {0}")]
    InvalidConfig(String),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 后台评分任务异常退出
    #[error("scoring task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ReconError {
    /// 是否为调用方输入问题 (用于 HTTP 层区分 422 / 500)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::InvalidTimestamp { .. }
                | Self::MissingPostedAt { .. }
                | Self::EmptyField { .. }
                | Self::InvalidConfig(_)
        )
    }
}
