use anyhow::Context;
use product_service::app::{build_app, product::handler::AppState, PRODUCTS_PREFIX};
use product_service::infrastructure::config::{load_config, ConfigSource};
use product_service::infrastructure::logger::init_logging;
use product_service::ProductService;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = load_config()?;
    config.validate()?;

    // 持有 guard 直到进程退出，保证文件日志刷新
    let _log_guard = init_logging(&config.logging)?;

    match &source {
        ConfigSource::File(path) => info!("从配置文件加载: {}", path.display()),
        ConfigSource::Default => info!("未找到配置文件，使用默认配置"),
    }

    let product_service = ProductService::in_memory();
    if config.catalog.seed_sample_data {
        product_service
            .seed_sample_data()
            .context("预置示例商品失败")?;
    }

    let app = build_app(AppState::new(product_service), &config.http);

    let addr = config.http.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法绑定到地址 {}", addr))?;

    info!("🚀 商品服务运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    {}              - 商品列表 (支持 category, q 查询参数)", PRODUCTS_PREFIX);
    info!("   POST   {}              - 创建商品", PRODUCTS_PREFIX);
    info!("   GET    {}/:id          - 获取商品", PRODUCTS_PREFIX);
    info!("   PUT    {}/:id          - 更新商品", PRODUCTS_PREFIX);
    info!("   DELETE {}/:id          - 删除商品", PRODUCTS_PREFIX);
    info!("   PATCH  {}/:id/stock    - 调整库存", PRODUCTS_PREFIX);
    info!("   GET    /health                    - 健康检查");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务器运行失败")?;

    info!("商品服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，开始优雅关闭");
}
