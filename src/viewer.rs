//! Native chart window. All chart data is computed up front in [`crate::chart`];
//! this module only draws it with `egui_plot` inside an `eframe` window.

use anyhow::{Result, anyhow};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::chart::{
    BubbleChart, JointChart, KdeCurve, PairGrid, PairPanel, BarChart as BarData,
};

/// The five charts rendered by the viewer, one tab each.
pub struct ChartBook {
    pub source: String,
    pub joint: JointChart,
    pub bar: BarData,
    pub kde: KdeCurve,
    pub bubble: BubbleChart,
    pub pair: PairGrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Joint,
    Bar,
    Kde,
    Bubble,
    Pair,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Joint, Tab::Bar, Tab::Kde, Tab::Bubble, Tab::Pair];

    fn label(self) -> &'static str {
        match self {
            Tab::Joint => "Joint",
            Tab::Bar => "Bar",
            Tab::Kde => "KDE",
            Tab::Bubble => "Bubble",
            Tab::Pair => "Pair",
        }
    }
}

struct ViewerApp {
    book: ChartBook,
    tab: Tab,
}

impl ViewerApp {
    fn new(book: ChartBook) -> Self {
        Self {
            book,
            tab: Tab::Joint,
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("chart_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.book.source).strong());
                ui.separator();
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.tab, tab, tab.label());
                }
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Joint => render_joint(ui, &self.book.joint),
            Tab::Bar => render_bar(ui, &self.book.bar),
            Tab::Kde => render_kde(ui, &self.book.kde),
            Tab::Bubble => render_bubble(ui, &self.book.bubble),
            Tab::Pair => render_pair(ui, &self.book.pair),
        });
    }
}

fn render_joint(ui: &mut egui::Ui, chart: &JointChart) {
    let margin_height = 120.0;
    let scatter_height = (ui.available_height() - 2.0 * margin_height).max(200.0);
    ui.vertical(|ui| {
        Plot::new("joint_scatter")
            .height(scatter_height)
            .x_axis_label(chart.x_name.clone())
            .y_axis_label(chart.y_name.clone())
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new("observations", PlotPoints::from(chart.points.clone()))
                        .radius(2.5),
                );
            });
        ui.columns(2, |columns| {
            density_plot(&mut columns[0], "joint_x_density", &chart.x_density, margin_height);
            density_plot(&mut columns[1], "joint_y_density", &chart.y_density, margin_height);
        });
    });
}

fn render_bar(ui: &mut egui::Ui, chart: &BarData) {
    let labels: Vec<String> = chart.bars.iter().map(|(label, _)| label.clone()).collect();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(idx, (label, value))| {
            Bar::new(idx as f64, *value)
                .width(0.7)
                .name(label.clone())
        })
        .collect();
    let formatter_labels = labels.clone();
    Plot::new("bar_means")
        .x_axis_label(chart.category_name.clone())
        .y_axis_label(format!("mean {}", chart.value_name))
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            formatter_labels
                .get(idx as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new("category means", bars));
        });
}

fn render_kde(ui: &mut egui::Ui, curve: &KdeCurve) {
    let height = ui.available_height();
    density_plot(ui, "kde_plot", curve, height);
}

fn density_plot(ui: &mut egui::Ui, id: &str, curve: &KdeCurve, height: f32) {
    Plot::new(id.to_string())
        .height(height)
        .x_axis_label(curve.column.clone())
        .y_axis_label("density")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(
                    curve.column.clone(),
                    PlotPoints::from(curve.points.clone()),
                )
                .fill(0.0)
                .width(1.5),
            );
        });
}

fn render_bubble(ui: &mut egui::Ui, chart: &BubbleChart) {
    let max_size = chart
        .points
        .iter()
        .map(|p| p.size)
        .fold(0.0_f64, f64::max);
    Plot::new("bubble_plot")
        .x_axis_label(chart.x_name.clone())
        .y_axis_label(chart.y_name.clone())
        .show(ui, |plot_ui| {
            for (idx, point) in chart.points.iter().enumerate() {
                let relative = if max_size > 0.0 {
                    point.size / max_size
                } else {
                    0.0
                };
                let radius = 2.0 + 12.0 * relative as f32;
                plot_ui.points(
                    Points::new(
                        format!("bubble_{idx}"),
                        PlotPoints::from(vec![[point.x, point.y]]),
                    )
                    .radius(radius),
                );
            }
        });
}

fn render_pair(ui: &mut egui::Ui, grid: &PairGrid) {
    let count = grid.columns.len();
    let panel_width = (ui.available_width() / count as f32 - 8.0).max(120.0);
    let panel_height = (ui.available_height() / count as f32 - 8.0).max(120.0);
    egui::ScrollArea::both().show(ui, |ui| {
        egui::Grid::new("pair_grid").show(ui, |ui| {
            for row in 0..count {
                for col in 0..count {
                    let panel = &grid.panels[row * count + col];
                    ui.allocate_ui(egui::vec2(panel_width, panel_height), |ui| {
                        pair_panel(ui, row, col, panel, grid);
                    });
                }
                ui.end_row();
            }
        });
    });
}

fn pair_panel(ui: &mut egui::Ui, row: usize, col: usize, panel: &PairPanel, grid: &PairGrid) {
    let plot = Plot::new(format!("pair_{row}_{col}"))
        .width(ui.available_width())
        .height(ui.available_height())
        .show_axes([row + 1 == grid.columns.len(), col == 0])
        .x_axis_label(grid.columns[col].clone())
        .y_axis_label(grid.columns[row].clone());
    match panel {
        PairPanel::Scatter(points) => {
            plot.show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new("observations", PlotPoints::from(points.clone())).radius(1.5),
                );
            });
        }
        PairPanel::Density(curve) => {
            plot.show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(
                        curve.column.clone(),
                        PlotPoints::from(curve.points.clone()),
                    )
                    .fill(0.0),
                );
            });
        }
    }
}

/// Opens the chart window and blocks until it is closed.
pub fn show(book: ChartBook) -> Result<()> {
    let title = format!("csv-explore: {}", book.source);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size([1080.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "csv-explore",
        options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::new(book)) as Box<dyn eframe::App>)),
    )
    .map_err(|err| anyhow!("Chart window failed: {err}"))
}
