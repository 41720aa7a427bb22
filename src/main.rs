// src/main.rs
use iced::widget::canvas::Canvas;
use iced::widget::{button, column, container, horizontal_space, row, scrollable, text};
use iced::widget::{Column, Row};
use iced::{
    executor, window, Application, Background, Color, Command, Element, Length, Settings, Theme,
};
use chrono::Utc;
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod chart_data;
mod charts;
mod csv_handler;
mod data_types;
mod error;
mod json_handler;
mod loader;
mod report;
mod sample;
mod schema;
mod session;
mod statistics;
mod ui;

use chart_data::{ChartData, ChartMode};
use charts::ChartView;
use error::{ExportError, LoadError};
use loader::LoadedTable;
use report::{report_file_name, write_report};
use session::Session;
use statistics::Statistic;
use ui::{series_color, Styles, LIGHT_THEME};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WINDOW_SIZE: (u32, u32) = (1200, 900);
const CHART_HEIGHT: f32 = 400.0;
const CARDS_PER_ROW: usize = 4;
const CELL_WIDTH: f32 = 120.0;
const DEFAULT_LOG_FILTER: &str = "stats_viewer=info";

pub fn main() -> iced::Result {
    init_tracing();
    info!(version = VERSION, "starting");

    StatsViewer::run(Settings {
        window: window::Settings {
            size: WINDOW_SIZE,
            resizable: true,
            ..Default::default()
        },
        ..Settings::default()
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct StatsViewer {
    session: Session,
    notice: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Clone)]
enum Message {
    OpenFile,
    FileSelected(Option<PathBuf>),
    FileLoaded(Result<LoadedTable, LoadError>),
    UseSample,
    SetChartMode(ChartMode),
    ToggleMetric(String),
    Export,
    Exported(Result<Option<PathBuf>, ExportError>),
    DismissNotice,
}

impl Application for StatsViewer {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        (
            StatsViewer {
                session: Session::new(),
                notice: None,
                status: None,
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        match self.session.source_name() {
            Some(name) => format!("Stats Viewer v{} - {}", VERSION, name),
            None => format!("Stats Viewer v{}", VERSION),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::OpenFile => Command::perform(
                async {
                    FileDialog::new()
                        .add_filter("CSV or JSON", &["csv", "json"])
                        .pick_file()
                },
                Message::FileSelected,
            ),

            Message::FileSelected(path_opt) => match path_opt {
                // Reads are not cancelled; whichever load finishes last wins.
                Some(path) => Command::perform(loader::load_file(path), Message::FileLoaded),
                None => Command::none(),
            },

            Message::FileLoaded(result) => {
                match self.session.apply_load(result) {
                    Ok(()) => {
                        self.notice = None;
                        self.status = None;
                    }
                    Err(err) => self.notice = Some(err.to_string()),
                }
                Command::none()
            }

            Message::UseSample => {
                self.session.load_sample();
                self.notice = None;
                self.status = None;
                Command::none()
            }

            Message::SetChartMode(mode) => {
                self.session.set_chart_mode(mode);
                Command::none()
            }

            Message::ToggleMetric(metric) => {
                self.session.toggle_metric(&metric);
                Command::none()
            }

            Message::Export => {
                let now = Utc::now();
                match self.session.report(now).render() {
                    Ok(contents) => Command::perform(
                        save_report(report_file_name(now), contents),
                        Message::Exported,
                    ),
                    Err(err) => {
                        error!(error = %err, "report serialization failed");
                        self.notice = Some(err.to_string());
                        Command::none()
                    }
                }
            }

            Message::Exported(Ok(Some(path))) => {
                self.status = Some(format!("Report saved to {}", path.display()));
                Command::none()
            }

            Message::Exported(Ok(None)) => Command::none(),

            Message::Exported(Err(err)) => {
                error!(error = %err, "export failed");
                self.notice = Some(err.to_string());
                Command::none()
            }

            Message::DismissNotice => {
                self.notice = None;
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let styles = &*LIGHT_THEME;

        let mut page = Column::new()
            .spacing(20)
            .padding(20)
            .push(self.header_view(styles))
            .push(self.source_view(styles));

        if let Some(notice) = &self.notice {
            page = page.push(notice_view(notice, styles));
        }

        let statistics = self.session.statistics();
        if !statistics.is_empty() {
            page = page.push(statistics_view(&statistics, styles));
        }

        page = page
            .push(self.controls_view(styles))
            .push(self.chart_view(styles));

        if !self.session.table().is_empty() {
            page = page.push(self.table_view(styles));
        }

        container(scrollable(page))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(ContainerStyle {
                bg: styles.bg,
                radius: 0.0,
            })))
            .into()
    }
}

impl StatsViewer {
    fn header_view(&self, styles: &Styles) -> Element<Message> {
        card(
            column![
                text("Data Analysis").size(30).style(styles.header_fg),
                text("Load a table, summarise it and chart it").size(16).style(styles.muted_fg),
            ]
            .spacing(4),
            styles.header_bg,
        )
    }

    fn source_view(&self, styles: &Styles) -> Element<Message> {
        let source = self.session.source_name().unwrap_or("Sample data");

        let mut info = column![
            text("Data source").size(22).style(styles.fg),
            text("CSV or JSON files").size(14).style(styles.muted_fg),
            text(source).size(16).style(styles.header_fg),
        ]
        .spacing(4);
        if let Some(status) = &self.status {
            info = info.push(text(status).size(14).style(styles.positive));
        }

        let actions = row![
            button(text("Open file"))
                .padding([10, 20])
                .on_press(Message::OpenFile)
                .style(iced::theme::Button::Primary),
            button(text("Use sample data"))
                .padding([10, 20])
                .on_press(Message::UseSample)
                .style(iced::theme::Button::Secondary),
            button(text("Export report"))
                .padding([10, 20])
                .on_press(Message::Export)
                .style(iced::theme::Button::Positive),
        ]
        .spacing(12);

        card(
            row![info, horizontal_space(Length::Fill), actions].align_items(iced::Alignment::Center),
            styles.card_bg,
        )
    }

    fn controls_view(&self, styles: &Styles) -> Element<Message> {
        let modes = ChartMode::ALL.iter().fold(Row::new().spacing(8), |modes, mode| {
            modes.push(
                button(text(mode.label()))
                    .padding([8, 16])
                    .on_press(Message::SetChartMode(*mode))
                    .style(toggle_style(self.session.chart_mode() == *mode)),
            )
        });

        let mut controls = Row::new().spacing(40).push(
            column![text("Chart type").size(14).style(styles.fg), modes].spacing(8),
        );

        let numeric = self.session.schema().numeric_columns;
        if self.session.chart_mode() != ChartMode::Pie && !numeric.is_empty() {
            let metrics = numeric.into_iter().fold(Row::new().spacing(8), |metrics, name| {
                let selected = self.session.is_selected(&name);
                metrics.push(
                    button(text(&name).size(14))
                        .padding([6, 12])
                        .on_press(Message::ToggleMetric(name))
                        .style(toggle_style(selected)),
                )
            });
            controls = controls
                .push(column![text("Metrics").size(14).style(styles.fg), metrics].spacing(8));
        }

        card(controls, styles.card_bg)
    }

    fn chart_view(&self, styles: &Styles) -> Element<Message> {
        let title = text("Chart").size(22).style(styles.fg);

        if self.session.table().is_empty() {
            return card(
                column![
                    title,
                    container(text("Load a file or use the sample data").style(styles.muted_fg))
                        .width(Length::Fill)
                        .padding(48)
                        .center_x(),
                ]
                .spacing(16),
                styles.card_bg,
            );
        }

        let data = self.session.chart_data();
        let legend_names: Vec<String> = match &data {
            ChartData::Line(series) | ChartData::Bar(series) => {
                series.series.iter().map(|s| s.name.clone()).collect()
            }
            ChartData::Pie(slices) => slices.iter().map(|s| s.name.clone()).collect(),
        };
        let legend = legend_names
            .into_iter()
            .enumerate()
            .fold(Row::new().spacing(16), |legend, (index, name)| {
                legend.push(text(format!("■ {}", name)).size(14).style(series_color(index)))
            });

        let chart = Canvas::new(ChartView::new(data))
            .width(Length::Fill)
            .height(Length::Fixed(CHART_HEIGHT));

        card(
            column![title, chart, container(legend).width(Length::Fill).center_x()].spacing(16),
            styles.card_bg,
        )
    }

    fn table_view(&self, styles: &Styles) -> Element<Message> {
        let table = self.session.table();
        let headers = table.headers();

        let header_row = headers.iter().fold(Row::new().spacing(1), |header_row, header| {
            header_row.push(
                container(text(*header).size(14).style(styles.fg))
                    .width(Length::Fixed(CELL_WIDTH))
                    .padding(6)
                    .style(iced::theme::Container::Custom(Box::new(ContainerStyle {
                        bg: styles.table_header_bg,
                        radius: 0.0,
                    }))),
            )
        });

        let rows = table.records.iter().fold(Column::new().spacing(1), |rows, record| {
            let cells = headers.iter().fold(Row::new().spacing(1), |cells, header| {
                let value = record.get(*header).map(|v| v.table_text()).unwrap_or_default();
                cells.push(
                    container(text(value).size(14).style(styles.fg))
                        .width(Length::Fixed(CELL_WIDTH))
                        .padding(6),
                )
            });
            rows.push(cells)
        });

        card(
            column![
                text("Raw data").size(22).style(styles.fg),
                column![header_row, rows].spacing(1),
            ]
            .spacing(12),
            styles.card_bg,
        )
    }
}

fn statistics_view<'a>(
    statistics: &indexmap::IndexMap<String, Statistic>,
    styles: &Styles,
) -> Element<'a, Message> {
    let cards: Vec<Element<'a, Message>> = statistics
        .iter()
        .map(|(name, stat)| statistic_card(name, stat, styles))
        .collect();

    let mut grid = Column::new().spacing(16);
    let mut cards = cards.into_iter().peekable();
    while cards.peek().is_some() {
        let line = cards
            .by_ref()
            .take(CARDS_PER_ROW)
            .fold(Row::new().spacing(16), |line, card| line.push(card));
        grid = grid.push(line);
    }
    grid.into()
}

fn statistic_card<'a>(name: &str, stat: &Statistic, styles: &Styles) -> Element<'a, Message> {
    let metric = |label: &str, value: String| -> Row<'a, Message> {
        row![
            text(label).size(14).style(styles.muted_fg),
            horizontal_space(Length::Fill),
            text(value).size(14).style(styles.fg),
        ]
    };

    let (arrow, trend_color) = if stat.trend >= 0.0 {
        ("↑", styles.positive)
    } else {
        ("↓", styles.negative)
    };

    let body = column![
        text(name).size(18).style(styles.fg),
        metric("Average", format!("{:.2}", stat.average)),
        metric("Median", format!("{:.2}", stat.median)),
        metric("Min", format!("{:.2}", stat.min)),
        metric("Max", format!("{:.2}", stat.max)),
        metric("Sum", format!("{:.2}", stat.sum)),
        row![
            text("Trend").size(14).style(styles.muted_fg),
            horizontal_space(Length::Fill),
            text(format!("{} {:.2}", arrow, stat.trend.abs()))
                .size(14)
                .style(trend_color),
        ],
    ]
    .spacing(6)
    .width(Length::Fixed(240.0));

    card(body, styles.card_bg)
}

fn notice_view<'a>(notice: &str, styles: &Styles) -> Element<'a, Message> {
    card(
        row![
            text(notice).size(16).style(styles.error_fg),
            horizontal_space(Length::Fill),
            button(text("Dismiss"))
                .on_press(Message::DismissNotice)
                .style(iced::theme::Button::Destructive),
        ]
        .align_items(iced::Alignment::Center),
        styles.error_bg,
    )
}

fn card<'a>(content: impl Into<Element<'a, Message>>, bg: Color) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .padding(20)
        .style(iced::theme::Container::Custom(Box::new(ContainerStyle {
            bg,
            radius: 8.0,
        })))
        .into()
}

fn toggle_style(active: bool) -> iced::theme::Button {
    if active {
        iced::theme::Button::Primary
    } else {
        iced::theme::Button::Secondary
    }
}

/// Opens the save dialog and writes the rendered report; `None` if cancelled.
async fn save_report(file_name: String, contents: String) -> Result<Option<PathBuf>, ExportError> {
    let Some(path) = FileDialog::new()
        .set_file_name(&file_name)
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        info!("export cancelled");
        return Ok(None);
    };

    write_report(&path, &contents)?;
    Ok(Some(path))
}

// Custom styles for containers
struct ContainerStyle {
    bg: Color,
    radius: f32,
}

impl container::StyleSheet for ContainerStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: None,
            background: Some(Background::Color(self.bg)),
            border_radius: self.radius.into(),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
        }
    }
}
