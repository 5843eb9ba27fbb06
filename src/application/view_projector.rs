// Projector trait for anything that renders dashboard views
use crate::domain::dashboard::DashboardView;
use async_trait::async_trait;

#[async_trait]
pub trait ViewProjector: Send + Sync {
    /// Render one refresh. Views arrive in the order the engine produced them.
    async fn project(&self, view: DashboardView) -> anyhow::Result<()>;
}
