use anyhow::{Context, Result};
use axum::Router;
use taskboard_api::create_app;
use taskboard_core::AppConfig;
use taskboard_infrastructure::DatabaseManager;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{error, info};

/// 主应用程序：持有配置和数据库连接池
pub struct Application {
    config: AppConfig,
    database: DatabaseManager,
}

impl Application {
    /// 连接数据库并执行迁移；数据库不可用时返回错误
    pub async fn new(config: AppConfig) -> Result<Self> {
        info!("连接数据库: {}", mask_database_url(&config.database.url));
        let database = DatabaseManager::new(&config.database)
            .await
            .context("连接数据库失败")?;
        Ok(Self { config, database })
    }

    pub fn router(&self) -> Router {
        create_app(self.database.task_repository(), &self.config.api)
    }

    /// 绑定配置中的地址并运行，直到收到关闭信号
    pub async fn run(self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let bind_address = self.config.api.bind_address.clone();
        let listener = TcpListener::bind(&bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {bind_address}"))?;
        self.serve(listener, shutdown_rx).await
    }

    /// 在给定的监听器上提供服务；关闭后释放连接池
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let local_addr = listener.local_addr().context("读取监听地址失败")?;
        info!("API服务器启动在: {local_addr}");

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await;

        self.database.close().await;
        info!("数据库连接池已关闭");

        result.map_err(|e| {
            error!("API服务器运行失败: {e}");
            anyhow::Error::new(e).context("API服务器运行失败")
        })
    }
}

/// 隐藏连接串中的密码
fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let mut masked = url.to_string();
            masked.replace_range(colon_pos + 1..at_pos, "***");
            return masked;
        }
    }
    url.to_string()
}
