use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke};

use super::ChartSurface;
use crate::model::NamedSeries;

const CHART_HEIGHT: f32 = 220.0;
const PLACEHOLDER_COLOR: Color32 = Color32::from_rgb(0x74, 0x78, 0x74);
const AXIS_COLOR: Color32 = Color32::from_gray(140);

const PALETTE: [Color32; 6] = [
    Color32::from_rgb(0xff, 0xa4, 0x1b),
    Color32::from_rgb(0x00, 0x8f, 0xfb),
    Color32::from_rgb(0x00, 0xe3, 0x96),
    Color32::from_rgb(0xfe, 0xb0, 0x19),
    Color32::from_rgb(0xff, 0x45, 0x60),
    Color32::from_rgb(0x77, 0x5d, 0xd0),
];

fn series_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// Paints the chart slots straight into an egui panel. Each slot is a
/// framed group sized from the available width at draw time.
pub struct EguiChartSurface<'a> {
    ui: &'a mut egui::Ui,
}

impl<'a> EguiChartSurface<'a> {
    pub fn new(ui: &'a mut egui::Ui) -> Self {
        Self { ui }
    }

    fn slot_frame(
        ui: &mut egui::Ui,
        slot: &str,
        add_body: impl FnOnce(&mut egui::Ui, Rect, &egui::Painter),
    ) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.vertical(|ui| {
                ui.heading(slot);
                let width = ui.available_width().max(120.0);
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(width, CHART_HEIGHT), Sense::hover());
                let painter = ui.painter_at(rect);
                add_body(ui, rect, &painter);
            });
        });
    }

    fn value_span(series: &[NamedSeries]) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for s in series {
            for v in &s.data {
                min = min.min(*v);
                max = max.max(*v);
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        if (max - min).abs() < f64::EPSILON {
            // Flat series still need a non-zero span to map onto pixels.
            return (min - 1.0, max + 1.0);
        }
        (min.min(0.0), max)
    }
}

impl ChartSurface for EguiChartSurface<'_> {
    fn line_chart(
        &mut self,
        slot: &str,
        categories: &[String],
        series: &[NamedSeries],
        fmt: &dyn Fn(f64) -> String,
    ) {
        let (min, max) = Self::value_span(series);
        Self::slot_frame(self.ui, slot, |ui, rect, painter| {
            let plot = rect.shrink2(egui::vec2(8.0, 14.0));
            let steps = categories.len().max(2) - 1;
            for (idx, s) in series.iter().enumerate() {
                let color = series_color(idx);
                let points: Vec<Pos2> = s
                    .data
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        let x = plot.left() + plot.width() * i as f32 / steps as f32;
                        let t = ((*v - min) / (max - min)) as f32;
                        let y = plot.bottom() - plot.height() * t;
                        Pos2::new(x, y)
                    })
                    .collect();
                for pair in points.windows(2) {
                    painter.line_segment([pair[0], pair[1]], Stroke::new(2.0, color));
                }
                for p in &points {
                    painter.circle_filled(*p, 2.5, color);
                }
            }
            painter.text(
                rect.left_top(),
                Align2::LEFT_TOP,
                fmt(max),
                FontId::proportional(11.0),
                AXIS_COLOR,
            );
            painter.text(
                rect.left_bottom(),
                Align2::LEFT_BOTTOM,
                fmt(min.min(0.0)),
                FontId::proportional(11.0),
                AXIS_COLOR,
            );
            if let (Some(first), Some(last)) = (categories.first(), categories.last()) {
                painter.text(
                    rect.center_bottom(),
                    Align2::CENTER_BOTTOM,
                    format!("{first} … {last}"),
                    FontId::proportional(11.0),
                    AXIS_COLOR,
                );
            }
            let named: Vec<&NamedSeries> = series.iter().filter(|s| !s.name.is_empty()).collect();
            if !named.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for (idx, s) in named.iter().enumerate() {
                        ui.colored_label(series_color(idx), "■");
                        ui.label(&s.name);
                    }
                });
            }
        });
    }

    fn pie_chart(
        &mut self,
        slot: &str,
        labels: &[String],
        values: &[f64],
        fmt: &dyn Fn(f64) -> String,
    ) {
        let total: f64 = values.iter().sum();
        let formatted: Vec<String> = values.iter().map(|v| fmt(*v)).collect();
        Self::slot_frame(self.ui, slot, |ui, rect, painter| {
            let radius = (rect.height() / 2.0 - 8.0).min(rect.width() / 4.0);
            let center = Pos2::new(rect.left() + radius + 8.0, rect.center().y);
            if total > 0.0 {
                let mut angle = -std::f32::consts::FRAC_PI_2;
                for (idx, value) in values.iter().enumerate() {
                    let sweep = (value / total) as f32 * std::f32::consts::TAU;
                    let mut points = vec![center];
                    let segments = ((sweep / 0.2).ceil() as usize).max(2);
                    for step in 0..=segments {
                        let a = angle + sweep * step as f32 / segments as f32;
                        points.push(Pos2::new(
                            center.x + radius * a.cos(),
                            center.y + radius * a.sin(),
                        ));
                    }
                    painter.add(egui::Shape::convex_polygon(
                        points,
                        series_color(idx),
                        Stroke::NONE,
                    ));
                    angle += sweep;
                }
            }
            // Legend on the right: swatch, label, formatted amount.
            let legend_x = center.x + radius + 16.0;
            let line_height = 16.0;
            for (idx, label) in labels.iter().enumerate() {
                let y = rect.top() + 8.0 + idx as f32 * line_height;
                if y + line_height > rect.bottom() {
                    break;
                }
                let swatch =
                    Rect::from_min_size(Pos2::new(legend_x, y + 3.0), egui::vec2(10.0, 10.0));
                painter.rect_filled(swatch, 2.0, series_color(idx));
                let amount = formatted.get(idx).map(String::as_str).unwrap_or("");
                painter.text(
                    Pos2::new(legend_x + 16.0, y),
                    Align2::LEFT_TOP,
                    format!("{label}  {amount}"),
                    FontId::proportional(12.0),
                    ui.visuals().text_color(),
                );
            }
        });
    }

    fn bar_chart(
        &mut self,
        slot: &str,
        categories: &[String],
        series: &[NamedSeries],
        fmt: &dyn Fn(f64) -> String,
    ) {
        // One horizontal bar per category. Instance-wise data ships one
        // single-point series per category; a lone series spanning all
        // categories is also accepted.
        let totals: Vec<f64> = if series.len() == 1 && series[0].data.len() == categories.len() {
            series[0].data.clone()
        } else {
            categories
                .iter()
                .enumerate()
                .map(|(idx, _)| {
                    series
                        .get(idx)
                        .map(|s| s.data.iter().sum())
                        .unwrap_or(0.0)
                })
                .collect()
        };
        let max = totals.iter().cloned().fold(0.0f64, f64::max).max(1.0);
        Self::slot_frame(self.ui, slot, |ui, rect, painter| {
            let label_width = rect.width() * 0.3;
            let bar_area = rect.width() - label_width - 8.0;
            let row_height = (rect.height() / categories.len().max(1) as f32).min(28.0);
            for (idx, (category, total)) in categories.iter().zip(&totals).enumerate() {
                let y = rect.top() + idx as f32 * row_height;
                painter.text(
                    Pos2::new(rect.left(), y + row_height / 2.0),
                    Align2::LEFT_CENTER,
                    category,
                    FontId::proportional(12.0),
                    ui.visuals().text_color(),
                );
                let bar_len = (bar_area * (*total / max) as f32).max(1.0);
                let bar = Rect::from_min_size(
                    Pos2::new(rect.left() + label_width, y + 4.0),
                    egui::vec2(bar_len, row_height - 8.0),
                );
                painter.rect_filled(bar, 2.0, series_color(idx));
                painter.text(
                    Pos2::new(bar.right() + 4.0, bar.center().y),
                    Align2::LEFT_CENTER,
                    fmt(*total),
                    FontId::proportional(11.0),
                    AXIS_COLOR,
                );
            }
        });
    }

    fn placeholder(&mut self, slot: &str, text: &str) {
        let message = text.to_string();
        Self::slot_frame(self.ui, slot, move |_ui, rect, painter| {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(16.0),
                PLACEHOLDER_COLOR,
            );
        });
    }

    fn reflow(&mut self) {
        self.ui.ctx().request_repaint();
    }
}
