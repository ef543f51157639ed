//! Trend and ranking renderers
//!
//! Peak and rank-one selection are stable: among equal values the row that
//! comes first in the input wins.

use salesdash_data::OrderCategory;

use crate::{
    Bar, BarChart, BarParams, ChartError, LegendEntry, TrendChart, TrendParams, TrendPoint,
    BASE_COLOR, HIGHLIGHT_COLOR,
};

/// Fixed bar color per order category.
pub fn category_color(category: OrderCategory) -> &'static str {
    match category {
        OrderCategory::Low => "skyblue",
        OrderCategory::Medium => "orange",
        OrderCategory::High => "tomato",
    }
}

/// Plot `value` against `period` in input order and mark the first maximum.
pub fn trend_with_peak<T>(
    rows: &[T],
    period: impl Fn(&T) -> String,
    value: impl Fn(&T) -> f64,
    params: TrendParams,
) -> Result<TrendChart, ChartError> {
    if rows.is_empty() {
        return Err(ChartError::EmptyInput);
    }

    let points = rows
        .iter()
        .map(|row| finite_point(period(row), value(row)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut peak_index = 0;
    for (i, point) in points.iter().enumerate().skip(1) {
        if point.value > points[peak_index].value {
            peak_index = i;
        }
    }

    Ok(TrendChart {
        title: params.title,
        y_label: params.y_label,
        series_label: params.series_label,
        peak_label: params.peak_label,
        format: params.format,
        points,
        peak_index,
    })
}

/// The `limit` rows with the largest `value`, descending, ties in input order.
pub fn top_n<T>(rows: &[T], value: impl Fn(&T) -> f64, limit: usize) -> Vec<&T> {
    let mut ranked: Vec<&T> = rows.iter().collect();
    ranked.sort_by(|a, b| value(*b).total_cmp(&value(*a)));
    ranked.truncate(limit);
    ranked
}

/// Top-N horizontal bars with rank one highlighted.
pub fn top_n_bar<T>(
    rows: &[T],
    label: impl Fn(&T) -> String,
    value: impl Fn(&T) -> f64,
    params: BarParams,
) -> Result<BarChart, ChartError> {
    let ranked = ranked_rows(rows, &value, params.limit)?;

    let bars = ranked
        .into_iter()
        .enumerate()
        .map(|(rank, row)| {
            let color = if rank == 0 { HIGHLIGHT_COLOR } else { BASE_COLOR };
            make_bar(label(row), value(row), color, &params)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BarChart {
        title: params.title,
        x_label: params.x_label,
        format: params.format,
        bars,
        legend: Vec::new(),
    })
}

/// Top-N horizontal bars colored by order category instead of rank.
pub fn category_bar<T>(
    rows: &[T],
    label: impl Fn(&T) -> String,
    value: impl Fn(&T) -> f64,
    category: impl Fn(&T) -> OrderCategory,
    params: BarParams,
) -> Result<BarChart, ChartError> {
    let ranked = ranked_rows(rows, &value, params.limit)?;

    let bars = ranked
        .into_iter()
        .map(|row| make_bar(label(row), value(row), category_color(category(row)), &params))
        .collect::<Result<Vec<_>, _>>()?;

    let legend = OrderCategory::ALL
        .iter()
        .map(|c| LegendEntry {
            label: c.to_string(),
            color: category_color(*c).to_string(),
        })
        .collect();

    Ok(BarChart {
        title: params.title,
        x_label: params.x_label,
        format: params.format,
        bars,
        legend,
    })
}

fn ranked_rows<'a, T>(
    rows: &'a [T],
    value: &impl Fn(&T) -> f64,
    limit: usize,
) -> Result<Vec<&'a T>, ChartError> {
    if limit == 0 {
        return Err(ChartError::ZeroLimit);
    }
    if rows.is_empty() {
        return Err(ChartError::EmptyInput);
    }
    Ok(top_n(rows, value, limit))
}

fn make_bar(label: String, value: f64, color: &str, params: &BarParams) -> Result<Bar, ChartError> {
    let point = finite_point(label, value)?;
    Ok(Bar {
        annotation: params.format.format(point.value),
        label: point.label,
        value: point.value,
        color: color.to_string(),
    })
}

fn finite_point(label: String, value: f64) -> Result<TrendPoint, ChartError> {
    if value.is_finite() {
        Ok(TrendPoint { label, value })
    } else {
        Err(ChartError::NonFiniteValue { label })
    }
}
