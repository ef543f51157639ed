//! Prometheus metrics for dashboard renders

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::panels::PanelSet;

pub struct Metrics {
    registry: Registry,
    renders: IntCounter,
    chart_outcomes: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let renders = IntCounter::new("salesdash_renders_total", "Number of dashboard renders")?;
        let chart_outcomes = IntCounterVec::new(
            Opts::new(
                "salesdash_chart_outcomes_total",
                "Rendered chart slots by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(renders.clone()))?;
        registry.register(Box::new(chart_outcomes.clone()))?;

        Ok(Self {
            registry,
            renders,
            chart_outcomes,
        })
    }

    /// Count one render and the outcome of each of its charts
    pub fn observe(&self, panels: &PanelSet) {
        self.renders.inc();
        for slot in panels.slots() {
            self.chart_outcomes
                .with_label_values(&[slot.outcome.label()])
                .inc();
        }
    }

    /// Prometheus text exposition
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
