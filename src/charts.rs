// src/charts.rs
//! Canvas rendering of [`ChartData`].
//!
//! Geometry math lives in free functions so it can be tested without a
//! renderer.

use std::f32::consts::{FRAC_PI_2, TAU};

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::{mouse, Color, Point, Rectangle, Renderer, Size, Theme};

use crate::chart_data::{ChartData, PieSlice, SeriesData};
use crate::ui::{series_color, LIGHT_THEME};

const MARGIN_LEFT: f32 = 64.0;
const MARGIN_RIGHT: f32 = 16.0;
const MARGIN_TOP: f32 = 16.0;
const MARGIN_BOTTOM: f32 = 36.0;
const GRID_LINES: usize = 5;
const MAX_X_LABELS: usize = 24;
const LABEL_SIZE: f32 = 12.0;
const DOT_RADIUS: f32 = 4.0;
const PIE_LABEL_GAP: f32 = 24.0;

pub struct ChartView {
    data: ChartData,
}

impl ChartView {
    pub fn new(data: ChartData) -> Self {
        ChartView { data }
    }
}

impl<Message> canvas::Program<Message> for ChartView {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        match &self.data {
            ChartData::Line(data) => {
                let plot = Plot::new(bounds.size(), data);
                plot.draw_axes(&mut frame, data);
                draw_lines(&mut frame, &plot, data);
            }
            ChartData::Bar(data) => {
                let plot = Plot::new(bounds.size(), data);
                plot.draw_axes(&mut frame, data);
                draw_bars(&mut frame, &plot, data);
            }
            ChartData::Pie(slices) => draw_pie(&mut frame, bounds.size(), slices),
        }

        vec![frame.into_geometry()]
    }
}

/// Y range covering every value and zero; never degenerate.
pub fn value_bounds(data: &SeriesData) -> (f64, f64) {
    let (lo, hi) = data
        .series
        .iter()
        .flat_map(|s| s.values.iter().flatten())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if hi > lo {
        (lo, hi)
    } else {
        (lo, lo + 1.0)
    }
}

/// Start and end angle of each slice, clockwise from twelve o'clock.
pub fn slice_angles(slices: &[PieSlice]) -> Vec<(f32, f32)> {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = -FRAC_PI_2;
    slices
        .iter()
        .map(|slice| {
            let end = start + (slice.value / total) as f32 * TAU;
            let span = (start, end);
            start = end;
            span
        })
        .collect()
}

pub fn slice_label(slice: &PieSlice, total: f64) -> String {
    format!("{}: {:.0}%", slice.name, slice.value / total * 100.0)
}

/// Every n-th x label is drawn so at most `MAX_X_LABELS` appear.
fn label_step(count: usize) -> usize {
    count.div_ceil(MAX_X_LABELS).max(1)
}

struct Plot {
    origin: Point,
    size: Size,
    lo: f64,
    hi: f64,
    rows: usize,
}

impl Plot {
    fn new(bounds: Size, data: &SeriesData) -> Self {
        let (lo, hi) = value_bounds(data);
        Plot {
            origin: Point::new(MARGIN_LEFT, MARGIN_TOP),
            size: Size::new(
                (bounds.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
                (bounds.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            ),
            lo,
            hi,
            rows: data.labels.len().max(1),
        }
    }

    fn y(&self, value: f64) -> f32 {
        let t = ((self.hi - value) / (self.hi - self.lo)) as f32;
        self.origin.y + t * self.size.height
    }

    fn slot_width(&self) -> f32 {
        self.size.width / self.rows as f32
    }

    fn x_center(&self, row: usize) -> f32 {
        self.origin.x + (row as f32 + 0.5) * self.slot_width()
    }

    fn draw_axes(&self, frame: &mut Frame, data: &SeriesData) {
        let theme = &*LIGHT_THEME;
        let right = self.origin.x + self.size.width;

        for i in 0..=GRID_LINES {
            let value = self.lo + (self.hi - self.lo) * i as f64 / GRID_LINES as f64;
            let y = self.y(value);
            frame.stroke(
                &Path::line(Point::new(self.origin.x, y), Point::new(right, y)),
                Stroke::default().with_color(theme.grid).with_width(1.0),
            );
            frame.fill_text(label(
                format!("{:.0}", value),
                Point::new(self.origin.x - 6.0, y),
                theme.muted_fg,
                Horizontal::Right,
                Vertical::Center,
            ));
        }

        let zero = self.y(0.0);
        frame.stroke(
            &Path::line(Point::new(self.origin.x, zero), Point::new(right, zero)),
            Stroke::default().with_color(theme.muted_fg).with_width(1.0),
        );

        let step = label_step(data.labels.len());
        let baseline = self.origin.y + self.size.height + 8.0;
        for (row, text) in data.labels.iter().enumerate().step_by(step) {
            frame.fill_text(label(
                text.clone(),
                Point::new(self.x_center(row), baseline),
                theme.muted_fg,
                Horizontal::Center,
                Vertical::Top,
            ));
        }
    }
}

fn draw_lines(frame: &mut Frame, plot: &Plot, data: &SeriesData) {
    for (index, series) in data.series.iter().enumerate() {
        let color = series_color(index);
        let points: Vec<Option<Point>> = series
            .values
            .iter()
            .enumerate()
            .map(|(row, v)| v.map(|v| Point::new(plot.x_center(row), plot.y(v))))
            .collect();

        let line = Path::new(|builder| {
            let mut pen_down = false;
            for point in &points {
                match point {
                    Some(p) if pen_down => builder.line_to(*p),
                    Some(p) => {
                        builder.move_to(*p);
                        pen_down = true;
                    }
                    None => pen_down = false,
                }
            }
        });
        frame.stroke(&line, Stroke::default().with_color(color).with_width(2.0));

        for point in points.iter().flatten() {
            frame.fill(&Path::circle(*point, DOT_RADIUS), color);
        }
    }
}

fn draw_bars(frame: &mut Frame, plot: &Plot, data: &SeriesData) {
    if data.series.is_empty() {
        return;
    }
    let group = plot.slot_width() * 0.8;
    let bar = group / data.series.len() as f32;
    let zero = plot.y(0.0);

    for (index, series) in data.series.iter().enumerate() {
        let color = series_color(index);
        for (row, value) in series.values.iter().enumerate() {
            let Some(value) = value else { continue };
            let x = plot.x_center(row) - group / 2.0 + bar * index as f32;
            let y = plot.y(*value);
            let top = y.min(zero);
            let height = (y - zero).abs();
            frame.fill(&Path::rectangle(Point::new(x, top), Size::new(bar, height)), color);
        }
    }
}

fn draw_pie(frame: &mut Frame, size: Size, slices: &[PieSlice]) {
    let center = Point::new(size.width / 2.0, size.height / 2.0);
    let radius = (size.width.min(size.height) / 2.0 - 48.0).max(8.0);
    let total: f64 = slices.iter().map(|s| s.value).sum();
    let theme = &*LIGHT_THEME;

    for (index, (slice, (start, end))) in slices.iter().zip(slice_angles(slices)).enumerate() {
        // Approximate the arc with a segment every ~2 degrees.
        let segments = (((end - start) / TAU * 180.0).ceil() as usize).max(1);
        let wedge = Path::new(|builder| {
            builder.move_to(center);
            for i in 0..=segments {
                let angle = start + (end - start) * i as f32 / segments as f32;
                builder.line_to(polar(center, radius, angle));
            }
            builder.close();
        });
        frame.fill(&wedge, series_color(index));
        frame.stroke(&wedge, Stroke::default().with_color(Color::WHITE).with_width(1.0));

        let mid = (start + end) / 2.0;
        let anchor = polar(center, radius + PIE_LABEL_GAP, mid);
        let horizontal = if mid.cos() >= 0.0 {
            Horizontal::Left
        } else {
            Horizontal::Right
        };
        frame.fill_text(label(
            slice_label(slice, total),
            anchor,
            theme.fg,
            horizontal,
            Vertical::Center,
        ));
    }
}

fn polar(center: Point, radius: f32, angle: f32) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

fn label(
    content: String,
    position: Point,
    color: Color,
    horizontal_alignment: Horizontal,
    vertical_alignment: Vertical,
) -> Text {
    Text {
        content,
        position,
        color,
        size: LABEL_SIZE,
        horizontal_alignment,
        vertical_alignment,
        ..Text::default()
    }
}
