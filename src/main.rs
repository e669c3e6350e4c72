use invoice_recon::{api, AppConfig};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env()?;
    info!("Starting server with config: {:?}", config);

    // 评分器在进程生命周期内只构造一次
    let state = api::AppState::from_config(&config);
    info!("Scoring config in effect: {:?}", state.scorer.config());

    // 每个请求一个 span，记录方法、路径、状态码与耗时
    let app = api::router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/reconcile/score           - 单笔评分");
    info!("  POST /api/reconcile/candidates      - 批量生成匹配候选");
    info!("  POST /api/reconcile/candidates/csv  - 批量候选 CSV 导出");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
