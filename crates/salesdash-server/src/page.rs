//! HTML page for the dashboard
//!
//! The page is fully server rendered from a [`PanelSet`]. Ready charts are
//! handed to ECharts in the browser; empty and failed slots render as notices.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::panels::{ChartOutcome, ChartSlot, PanelSet};

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

pub const PAGE_TITLE: &str = "E-commerce Dashboard";
pub const DATE_FILTER_WARNING: &str =
    "Date changes only affect the Sales Performance and Monthly New Customer Growth charts.";
pub const FOOTER_CAPTION: &str = "📊 Dashboard E-commerce Sales";

const STYLE: &str = r#"
body { margin: 0; display: flex; font-family: "Source Sans Pro", sans-serif; color: #31333f; }
.sidebar { width: 260px; min-height: 100vh; padding: 24px; background: #f0f2f6; box-sizing: border-box; }
.sidebar label { display: block; margin-top: 12px; font-size: 14px; }
.sidebar input { width: 100%; padding: 6px; margin-top: 4px; box-sizing: border-box; }
.sidebar button { margin-top: 16px; padding: 6px 16px; }
.warning { padding: 10px; background: #fffbe6; border-left: 4px solid #faca2b; font-size: 14px; }
main { flex: 1; padding: 24px 48px; }
.tabs { display: flex; gap: 8px; border-bottom: 1px solid #ddd; }
.tab { border: none; background: none; padding: 10px 14px; cursor: pointer; font-size: 15px; }
.tab[aria-selected="true"] { border-bottom: 3px solid #FF5733; font-weight: 600; }
.chart-canvas { width: 100%; height: 480px; }
.notice { padding: 16px; margin: 8px 0 24px; border-radius: 4px; }
.no-data { background: #e8f4fd; }
.error { background: #fdecea; }
.legend { list-style: none; display: flex; gap: 16px; padding: 0; }
.swatch { display: inline-block; width: 12px; height: 12px; margin-right: 6px; }
.caption { margin-top: 32px; color: #808495; font-size: 14px; }
"#;

const CHART_BOOTSTRAP: &str = r#"
(function () {
  const charts = {};

  function initCharts(panel) {
    panel.querySelectorAll('.chart-canvas').forEach((dom) => {
      if (charts[dom.id]) {
        charts[dom.id].resize();
        return;
      }
      const option = SALESDASH_CHARTS[dom.id];
      if (!option) return;
      const chart = echarts.init(dom);
      chart.setOption(option);
      window.addEventListener('resize', () => chart.resize());
      charts[dom.id] = chart;
    });
  }

  const tabs = document.querySelectorAll('.tab');
  tabs.forEach((tab) => tab.addEventListener('click', () => {
    tabs.forEach((t) => t.setAttribute('aria-selected', String(t === tab)));
    document.querySelectorAll('.panel').forEach((p) => { p.hidden = p.id !== tab.dataset.tab; });
    initCharts(document.getElementById(tab.dataset.tab));
  }));
  document.querySelectorAll('.panel:not([hidden])').forEach(initCharts);
})();
"#;

pub fn dashboard_page(panels: &PanelSet) -> Markup {
    let start = panels.range.start.to_string();
    let end = panels.range.end.to_string();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (PAGE_TITLE) }
                style { (PreEscaped(STYLE)) }
                script src=(ECHARTS_CDN) {}
            }
            body {
                aside class="sidebar" {
                    h2 { "Filter Data" }
                    p class="warning" { "⚠ " strong { (DATE_FILTER_WARNING) } }
                    form method="get" action="/" {
                        label for="start" { "Start Date" }
                        input type="date" id="start" name="start" value=(start);
                        label for="end" { "End Date" }
                        input type="date" id="end" name="end" value=(end);
                        button type="submit" { "Apply" }
                    }
                    @if panels.range.is_inverted() {
                        p class="notice error" { "Start date is after end date." }
                    }
                }
                main {
                    h1 { "📊 E-commerce Sales Dashboard" }
                    nav class="tabs" role="tablist" {
                        @for (i, panel) in panels.panels.iter().enumerate() {
                            button type="button" class="tab" role="tab"
                                data-tab=(panel.kind.id())
                                aria-selected=(if i == 0 { "true" } else { "false" }) {
                                (panel.kind.icon()) " " (panel.title)
                            }
                        }
                    }
                    @for (i, panel) in panels.panels.iter().enumerate() {
                        section id=(panel.kind.id()) class="panel" role="tabpanel" hidden[i != 0] {
                            @for slot in &panel.charts {
                                (chart_slot(slot))
                            }
                        }
                    }
                    footer class="caption" { (FOOTER_CAPTION) }
                }
                script { (PreEscaped(charts_script(panels))) }
            }
        }
    }
}

fn chart_slot(slot: &ChartSlot) -> Markup {
    html! {
        article class="chart" {
            h3 { (slot.title) }
            @match &slot.outcome {
                ChartOutcome::Ready { chart } => {
                    div id=(slot.id) class="chart-canvas" data-format=(chart.format().as_str()) {}
                    @if !chart.legend().is_empty() {
                        ul class="legend" {
                            @for entry in chart.legend() {
                                li {
                                    span class="swatch" style={ "background: " (entry.color) } {}
                                    (entry.label)
                                }
                            }
                        }
                    }
                }
                ChartOutcome::NoData { message } => {
                    div class="notice no-data" { (message) }
                }
                ChartOutcome::Failed { message } => {
                    div class="notice error" { "Could not render this chart: " (message) }
                }
            }
        }
    }
}

/// Inline script holding every ready chart's ECharts option, keyed by DOM id.
///
/// Options are JavaScript literals with inlined formatter functions, so the
/// map is assembled as text rather than through `serde_json`.
fn charts_script(panels: &PanelSet) -> String {
    let entries: Vec<String> = panels
        .slots()
        .filter_map(|slot| match &slot.outcome {
            ChartOutcome::Ready { chart } => Some(format!(
                "{}: {}",
                serde_json::Value::from(slot.id),
                chart.to_echarts()
            )),
            _ => None,
        })
        .collect();

    // Keep "</script>" inside labels from closing the tag early.
    let data = format!("{{{}}}", entries.join(",\n")).replace("</", "<\\/");
    format!("const SALESDASH_CHARTS = {};\n{}", data, CHART_BOOTSTRAP)
}
