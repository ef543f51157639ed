//! ECharts option export
//!
//! Options are built with `charming`. Axis ticks, tooltips and bar-end labels
//! share one `Intl.NumberFormat` formatter per [`ValueFormat`], so the browser
//! shows the same `R$1,234` text the artifacts carry.

use charming::{
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Label,
        LabelPosition, LineStyle, Symbol, Tooltip, Trigger,
    },
    series::{bar, Line, Scatter},
};

use crate::{BarChart, Chart, TrendChart, ValueFormat, BASE_COLOR, CURRENCY_PREFIX, HIGHLIGHT_COLOR};

impl Chart {
    /// ECharts option for this chart. Its `Display` form is a JavaScript
    /// object literal with the formatters inlined as functions.
    pub fn to_echarts(&self) -> charming::Chart {
        match self {
            Chart::Trend(chart) => trend_option(chart),
            Chart::Bar(chart) => bar_option(chart),
        }
    }
}

/// Whole numbers grouped by thousands, prefixed with `R$` for currency.
fn number_formatter(format: ValueFormat, arg: &str, expr: &str) -> JsFunction {
    let prefix = match format {
        ValueFormat::Currency => CURRENCY_PREFIX,
        ValueFormat::Integer => "",
    };
    JsFunction::new_with_args(
        arg,
        &format!(
            "const f = new Intl.NumberFormat('en-US', {{ maximumFractionDigits: 0 }}); \
             const v = {expr}; \
             return (v < 0 ? '-' : '') + '{prefix}' + f.format(Math.abs(v));"
        ),
    )
}

fn tick_formatter(format: ValueFormat) -> JsFunction {
    number_formatter(format, "value", "value")
}

fn label_formatter(format: ValueFormat) -> JsFunction {
    number_formatter(format, "params", "params.value")
}

fn trend_option(chart: &TrendChart) -> charming::Chart {
    let labels: Vec<String> = chart.points.iter().map(|p| p.label.clone()).collect();
    let values: Vec<f64> = chart.points.iter().map(|p| p.value).collect();
    let peak = chart.peak();

    charming::Chart::new()
        .title(Title::new().text(chart.title.as_str()).left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(tick_formatter(chart.format)),
        )
        .legend(
            Legend::new()
                .data(vec![chart.series_label.as_str(), chart.peak_label.as_str()])
                .top(30),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(labels)
                .axis_label(AxisLabel::new().rotate(45.0)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name(chart.y_label.as_str())
                .axis_label(AxisLabel::new().formatter(tick_formatter(chart.format))),
        )
        .series(
            Line::new()
                .name(chart.series_label.as_str())
                .symbol(Symbol::Circle)
                .symbol_size(7.0)
                .item_style(ItemStyle::new().color(BASE_COLOR))
                .line_style(LineStyle::new().color(BASE_COLOR))
                .data(values),
        )
        // A category axis places numeric x values by index.
        .series(
            Scatter::new()
                .name(chart.peak_label.as_str())
                .symbol_size(16.0)
                .item_style(ItemStyle::new().color(HIGHLIGHT_COLOR))
                .data(vec![vec![chart.peak_index as f64, peak.value]]),
        )
}

fn bar_option(chart: &BarChart) -> charming::Chart {
    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let data: Vec<DataPointItem> = chart
        .bars
        .iter()
        .map(|bar| {
            DataPointItem::new(bar.value).item_style(ItemStyle::new().color(bar.color.as_str()))
        })
        .collect();

    charming::Chart::new()
        .title(Title::new().text(chart.title.as_str()).left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(tick_formatter(chart.format))
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("10%")
                .bottom("8%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name(chart.x_label.as_str())
                .axis_label(AxisLabel::new().formatter(tick_formatter(chart.format))),
        )
        .y_axis(Axis::new().type_(AxisType::Category).inverse(true).data(labels))
        .series(
            bar::Bar::new()
                .label(
                    Label::new()
                        .show(true)
                        .position(LabelPosition::Right)
                        .formatter(label_formatter(chart.format)),
                )
                .data(data),
        )
}
