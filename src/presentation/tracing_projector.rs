// View projector that renders each refresh as structured log lines
use crate::application::view_projector::ViewProjector;
use crate::domain::dashboard::DashboardView;
use crate::domain::hotspot::TemperatureBand;
use crate::domain::sample::format_m_ss;
use async_trait::async_trait;

#[derive(Clone, Default)]
pub struct TracingProjector;

impl TracingProjector {
    pub fn new() -> Self {
        Self
    }

    /// One-line summary of the headline tiles.
    pub fn summarize(view: &DashboardView) -> String {
        let mut parts: Vec<String> = ["battery", "signal", "thermalMax", "areaCovered", "envTempAvg"]
            .iter()
            .filter_map(|id| view.tile(id))
            .map(|tile| format!("{}={}", tile.title, tile.formatted()))
            .collect();

        if let Some(flight) = view.tile("droneFlightTime") {
            parts.push(format!("Flight={}", format_m_ss(flight.value.max(0.0) as u64)));
        }
        if let Some(badge) = &view.recording {
            parts.push(badge.clone());
        }
        if !view.live {
            parts.push("PAUSED".to_string());
        }
        parts.join(" | ")
    }
}

#[async_trait]
impl ViewProjector for TracingProjector {
    async fn project(&self, view: DashboardView) -> anyhow::Result<()> {
        tracing::info!("[{}] {}", view.title, Self::summarize(&view));

        if let Some(weakest) = view.performance.weakest() {
            tracing::debug!("Weakest performance axis {} ({:.0}/100)", weakest.metric, weakest.value);
        }
        if let Some(top) = view.hotspots.first() {
            tracing::debug!(
                "Top hotspot {} ({} risk, {})",
                top.area,
                top.risk,
                top.severity
            );
        }
        for band in TemperatureBand::ALL {
            tracing::trace!("{}: {:.1}%", band.label(), view.distribution.share(band));
        }
        Ok(())
    }
}
