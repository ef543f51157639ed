//! Panel computation
//!
//! [`render`] is the whole dashboard as a function of the date range: it
//! filters the monthly tables, builds every chart of every panel and returns
//! them as plain data. Failures stay inside the chart slot that produced them.

use salesdash_chart::{
    category_bar, top_n_bar, trend_with_peak, BarParams, Chart, ChartError, TrendParams,
    ValueFormat,
};
use salesdash_data::{CitySales, DataBundle, DateRange, ProductSummary, Table};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub const NO_DATA_MESSAGE: &str = "No data for the selected date range";

const TOP_CATEGORIES: usize = 10;
const TOP_CITIES: usize = 10;
const TOP_CLUSTERED_CITIES: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    SalesPerformance,
    ProductInsights,
    CustomerInsights,
}

impl PanelKind {
    pub const ALL: [PanelKind; 3] = [
        PanelKind::SalesPerformance,
        PanelKind::ProductInsights,
        PanelKind::CustomerInsights,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::SalesPerformance => "Sales Performance",
            PanelKind::ProductInsights => "Product Insights",
            PanelKind::CustomerInsights => "Customer Insights",
        }
    }

    /// DOM id of the tab
    pub fn id(&self) -> &'static str {
        match self {
            PanelKind::SalesPerformance => "sales-performance",
            PanelKind::ProductInsights => "product-insights",
            PanelKind::CustomerInsights => "customer-insights",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PanelKind::SalesPerformance => "📈",
            PanelKind::ProductInsights => "📦",
            PanelKind::CustomerInsights => "📍",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartOutcome {
    Ready { chart: Chart },
    NoData { message: String },
    Failed { message: String },
}

impl ChartOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ChartOutcome::Ready { .. } => "ready",
            ChartOutcome::NoData { .. } => "no_data",
            ChartOutcome::Failed { .. } => "failed",
        }
    }

    /// Wrap a renderer result. Empty input becomes a notice reading `empty_message`.
    fn from_result<C: Into<Chart>>(result: Result<C, ChartError>, empty_message: &str) -> Self {
        match result {
            Ok(chart) => ChartOutcome::Ready {
                chart: chart.into(),
            },
            Err(ChartError::EmptyInput) => ChartOutcome::NoData {
                message: empty_message.to_string(),
            },
            Err(err) => ChartOutcome::Failed {
                message: err.to_string(),
            },
        }
    }
}

/// Notice for a ranking whose unfiltered table has no rows
fn empty_table_message<T: Table>() -> String {
    format!("No rows in {}", T::NAME)
}

/// One subheading plus whatever the renderer produced for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlot {
    pub id: &'static str,
    pub title: &'static str,
    pub outcome: ChartOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub kind: PanelKind,
    pub title: &'static str,
    pub charts: Vec<ChartSlot>,
}

impl Panel {
    fn new(kind: PanelKind, charts: Vec<ChartSlot>) -> Self {
        Self {
            kind,
            title: kind.title(),
            charts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSet {
    pub range: DateRange,
    pub panels: Vec<Panel>,
}

impl PanelSet {
    pub fn slots(&self) -> impl Iterator<Item = &ChartSlot> {
        self.panels.iter().flat_map(|p| p.charts.iter())
    }

    pub fn slot(&self, id: &str) -> Option<&ChartSlot> {
        self.slots().find(|s| s.id == id)
    }

    /// SHA-256 over the JSON form, stable across reloads of identical data
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("panel set should always serialize");
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Compute every panel for `range`.
///
/// Only the sales trends and the new-customer trend are filtered; the product
/// and city rankings always cover the full tables.
pub fn render(bundle: &DataBundle, range: DateRange) -> PanelSet {
    let monthly = bundle.monthly_sales_in(&range);
    let new_customers = bundle.new_customers_in(&range);
    let products = bundle.product_summary();
    let cities = bundle.city_sales();
    let no_products = empty_table_message::<ProductSummary>();
    let no_cities = empty_table_message::<CitySales>();

    let sales_performance = Panel::new(
        PanelKind::SalesPerformance,
        vec![
            ChartSlot {
                id: "monthly-revenue",
                title: "Monthly Total Revenue",
                outcome: ChartOutcome::from_result(
                    trend_with_peak(
                        &monthly,
                        |r| r.year_month.to_string(),
                        |r| r.total_revenue,
                        TrendParams {
                            title: "Monthly Total Revenue - Delivered Orders Only".to_string(),
                            y_label: "Total Revenue (BRL)".to_string(),
                            series_label: "Total Revenue (BRL)".to_string(),
                            peak_label: "Peak Revenue".to_string(),
                            format: ValueFormat::Currency,
                        },
                    ),
                    NO_DATA_MESSAGE,
                ),
            },
            ChartSlot {
                id: "monthly-orders",
                title: "Monthly Total Orders",
                outcome: ChartOutcome::from_result(
                    trend_with_peak(
                        &monthly,
                        |r| r.year_month.to_string(),
                        |r| r.total_orders as f64,
                        TrendParams {
                            title: "Monthly Total Orders - Delivered Orders Only".to_string(),
                            y_label: "Total Orders".to_string(),
                            series_label: "Total Orders".to_string(),
                            peak_label: "Peak Orders".to_string(),
                            format: ValueFormat::Integer,
                        },
                    ),
                    NO_DATA_MESSAGE,
                ),
            },
        ],
    );

    let product_insights = Panel::new(
        PanelKind::ProductInsights,
        vec![
            ChartSlot {
                id: "top-categories-revenue",
                title: "Top 10 Product Categories by Revenue",
                outcome: ChartOutcome::from_result(
                    top_n_bar(
                        products,
                        |r| r.product_category_name_english.clone(),
                        |r| r.total_revenue,
                        BarParams {
                            title: "Top 10 Product Categories by Revenue".to_string(),
                            x_label: "Total Revenue (BRL)".to_string(),
                            limit: TOP_CATEGORIES,
                            format: ValueFormat::Currency,
                        },
                    ),
                    &no_products,
                ),
            },
            ChartSlot {
                id: "top-categories-items",
                title: "Top 10 Product Categories by Total Items Sold",
                outcome: ChartOutcome::from_result(
                    top_n_bar(
                        products,
                        |r| r.product_category_name_english.clone(),
                        |r| r.total_items_sold as f64,
                        BarParams {
                            title: "Top 10 Product Categories by Total Items Sold".to_string(),
                            x_label: "Total Items Sold".to_string(),
                            limit: TOP_CATEGORIES,
                            format: ValueFormat::Integer,
                        },
                    ),
                    &no_products,
                ),
            },
        ],
    );

    let customer_insights = Panel::new(
        PanelKind::CustomerInsights,
        vec![
            ChartSlot {
                id: "top-cities-orders",
                title: "Top Cities by Total Orders",
                outcome: ChartOutcome::from_result(
                    top_n_bar(
                        cities,
                        |r| r.customer_city.clone(),
                        |r| r.total_orders as f64,
                        BarParams {
                            title: "Top 10 Cities by Total Orders".to_string(),
                            x_label: "Total Orders".to_string(),
                            limit: TOP_CITIES,
                            format: ValueFormat::Integer,
                        },
                    ),
                    &no_cities,
                ),
            },
            ChartSlot {
                id: "city-clustering",
                title: "Top 15 Cities by Total Orders Clustering",
                outcome: ChartOutcome::from_result(
                    category_bar(
                        cities,
                        |r| r.customer_city.clone(),
                        |r| r.total_orders as f64,
                        |r| r.order_category,
                        BarParams {
                            title: "Top 15 Cities by Total Orders Clustering".to_string(),
                            x_label: "Total Orders".to_string(),
                            limit: TOP_CLUSTERED_CITIES,
                            format: ValueFormat::Integer,
                        },
                    ),
                    &no_cities,
                ),
            },
            ChartSlot {
                id: "new-customer-growth",
                title: "Monthly New Customer Growth",
                outcome: ChartOutcome::from_result(
                    trend_with_peak(
                        &new_customers,
                        |r| r.year_month.to_string(),
                        |r| r.new_customers as f64,
                        TrendParams {
                            title: "Monthly New Customer Growth".to_string(),
                            y_label: "New Customers".to_string(),
                            series_label: "New Customers (Count)".to_string(),
                            peak_label: "Highest Customer Growth".to_string(),
                            format: ValueFormat::Integer,
                        },
                    ),
                    NO_DATA_MESSAGE,
                ),
            },
        ],
    );

    let panels = PanelSet {
        range,
        panels: vec![sales_performance, product_insights, customer_insights],
    };

    for slot in panels.slots() {
        match &slot.outcome {
            ChartOutcome::Failed { message } => {
                tracing::warn!(chart = slot.id, error = %message, "Chart failed to render");
            }
            outcome => tracing::debug!(chart = slot.id, state = outcome.label(), "Chart rendered"),
        }
    }

    panels
}
