//! Salesdash data model
//!
//! Typed rows for the four pre-aggregated sales tables, the CSV loader that
//! reads them once at startup, and the date-range filter applied to the
//! monthly tables. Tables are immutable after load; filtering always returns
//! a new borrowed view.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

mod loader;
mod period;
mod types;

pub use loader::{load_table, DataSources, LoadError};
pub use period::*;
pub use types::*;

/// A table that can be read from a delimited file.
pub trait Table: DeserializeOwned {
    /// Human readable table name used in logs
    const NAME: &'static str;

    fn schema() -> Schema;
}

/// Revenue and orders for one calendar month, delivered orders only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub year_month: YearMonth,
    pub total_revenue: f64,
    pub total_orders: u64,
}

impl Periodic for MonthlySales {
    fn period(&self) -> YearMonth {
        self.year_month
    }
}

impl Table for MonthlySales {
    const NAME: &'static str = "monthly_sales";

    fn schema() -> Schema {
        Schema::new(
            Self::NAME,
            vec![
                FieldType::key("year_month", ColumnType::Period),
                FieldType::value("total_revenue", ColumnType::Decimal),
                FieldType::value("total_orders", ColumnType::Integer),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_category_name_english: String,
    pub total_revenue: f64,
    pub total_items_sold: u64,
}

impl Table for ProductSummary {
    const NAME: &'static str = "product_summary";

    fn schema() -> Schema {
        Schema::new(
            Self::NAME,
            vec![
                FieldType::key("product_category_name_english", ColumnType::Text),
                FieldType::value("total_revenue", ColumnType::Decimal),
                FieldType::value("total_items_sold", ColumnType::Integer),
            ],
        )
    }
}

/// Precomputed clustering label for a city's order volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderCategory {
    Low,
    Medium,
    High,
}

impl OrderCategory {
    pub const ALL: [OrderCategory; 3] = [
        OrderCategory::Low,
        OrderCategory::Medium,
        OrderCategory::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderCategory::Low => "Low",
            OrderCategory::Medium => "Medium",
            OrderCategory::High => "High",
        }
    }
}

impl fmt::Display for OrderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySales {
    pub customer_city: String,
    pub total_orders: u64,
    pub order_category: OrderCategory,
}

impl Table for CitySales {
    const NAME: &'static str = "city_sales";

    fn schema() -> Schema {
        Schema::new(
            Self::NAME,
            vec![
                FieldType::key("customer_city", ColumnType::Text),
                FieldType::value("total_orders", ColumnType::Integer),
                FieldType::value("order_category", ColumnType::OrderCategory),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomers {
    pub year_month: YearMonth,
    pub new_customers: u64,
}

impl Periodic for NewCustomers {
    fn period(&self) -> YearMonth {
        self.year_month
    }
}

impl Table for NewCustomers {
    const NAME: &'static str = "new_customers_trend";

    fn schema() -> Schema {
        Schema::new(
            Self::NAME,
            vec![
                FieldType::key("year_month", ColumnType::Period),
                FieldType::value("new_customers", ColumnType::Integer),
            ],
        )
    }
}

/// The four tables, loaded once and shared read-only with every render.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBundle {
    monthly_sales: Vec<MonthlySales>,
    product_summary: Vec<ProductSummary>,
    city_sales: Vec<CitySales>,
    new_customers: Vec<NewCustomers>,
}

impl DataBundle {
    pub fn from_tables(
        monthly_sales: Vec<MonthlySales>,
        product_summary: Vec<ProductSummary>,
        city_sales: Vec<CitySales>,
        new_customers: Vec<NewCustomers>,
    ) -> Self {
        Self {
            monthly_sales,
            product_summary,
            city_sales,
            new_customers,
        }
    }

    pub fn monthly_sales(&self) -> &[MonthlySales] {
        &self.monthly_sales
    }

    pub fn product_summary(&self) -> &[ProductSummary] {
        &self.product_summary
    }

    pub fn city_sales(&self) -> &[CitySales] {
        &self.city_sales
    }

    pub fn new_customers(&self) -> &[NewCustomers] {
        &self.new_customers
    }

    /// Monthly sales rows inside `range`
    pub fn monthly_sales_in(&self, range: &DateRange) -> Vec<&MonthlySales> {
        filter_by_period(&self.monthly_sales, range)
    }

    /// New-customer rows inside `range`
    pub fn new_customers_in(&self, range: &DateRange) -> Vec<&NewCustomers> {
        filter_by_period(&self.new_customers, range)
    }
}
