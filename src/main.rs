// src/main.rs
use std::time::{Duration, Instant};

use clap::Parser;
use iced::alignment::Horizontal;
use iced::widget::scrollable::{Direction, Properties};
use iced::widget::{
    button, column, container, row, scrollable, text, text_input, Column, Row, Space,
};
use iced::{
    executor, window, Alignment, Application, Command, Element, Length, Settings, Subscription,
    Theme,
};
use tracing::{error, info};

use sheet_viewer::data_types::DEFAULT_TAB_NAME;
use sheet_viewer::notice::NoticeKind;
use sheet_viewer::{
    logging, Config, DisplayMode, Excuse, FetchError, Generation, HttpFetcher, LoadTicket,
    SheetData, SheetLoader, TableData, Viewer,
};

mod ui;

use ui::{ButtonStyle, ContainerStyle, Styles};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const TICK: Duration = Duration::from_millis(250);

pub fn main() -> iced::Result {
    let config = Config::parse();
    if let Err(err) = logging::init(&config.log_filter) {
        eprintln!("failed to set up logging: {err}");
    }

    let fetcher = match HttpFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(err) => {
            error!(error = %err, "cannot build HTTP client");
            std::process::exit(1);
        }
    };
    let loader = SheetLoader::new(fetcher, config.endpoint.clone());
    info!(version = VERSION, endpoint = %config.endpoint, "starting sheet viewer");

    SheetViewer::run(Settings {
        window: window::Settings {
            size: (1024, 768),
            resizable: true,
            ..Default::default()
        },
        ..Settings::with_flags(Flags { config, loader })
    })
}

struct Flags {
    config: Config,
    loader: SheetLoader<HttpFetcher>,
}

struct SheetViewer {
    viewer: Viewer,
    loader: SheetLoader<HttpFetcher>,
    is_dark_mode: bool,
}

#[derive(Debug, Clone)]
enum Message {
    DocumentIdChanged(String),
    TabNameChanged(String),
    ModeSelected(DisplayMode),
    Load,
    ToggleAutoRefresh,
    Fetched(Generation, Result<SheetData, FetchError>),
    Copy(usize),
    Tick(Instant),
    ToggleTheme,
}

impl Application for SheetViewer {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = Flags;

    fn new(flags: Flags) -> (Self, Command<Message>) {
        let now = Instant::now();
        let mut app = SheetViewer {
            viewer: Viewer::from_config(&flags.config, now),
            loader: flags.loader,
            is_dark_mode: false,
        };
        let command = if app.viewer.source().has_document() {
            app.start_load(now)
        } else {
            Command::none()
        };
        (app, command)
    }

    fn title(&self) -> String {
        format!("Sheet Viewer v{}", VERSION)
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        let now = Instant::now();
        match message {
            Message::DocumentIdChanged(id) => {
                self.viewer.set_document_id(id, now);
                Command::none()
            }

            Message::TabNameChanged(tab) => {
                self.viewer.set_tab_name(tab, now);
                Command::none()
            }

            Message::ModeSelected(mode) => {
                if self.viewer.set_mode(mode) {
                    return self.start_load(now);
                }
                Command::none()
            }

            Message::Load => self.start_load(now),

            Message::ToggleAutoRefresh => {
                self.viewer.toggle_auto_refresh(now);
                Command::none()
            }

            Message::Fetched(generation, result) => {
                self.viewer.finish_load(generation, result, now);
                Command::none()
            }

            Message::Copy(id) => match self.viewer.copy_excuse(id, now) {
                Some(text) => iced::clipboard::write(text),
                None => Command::none(),
            },

            Message::Tick(now) => match self.viewer.poll(now) {
                Some(ticket) => self.perform(ticket),
                None => Command::none(),
            },

            Message::ToggleTheme => {
                self.is_dark_mode = !self.is_dark_mode;
                Command::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.viewer.needs_ticks() {
            iced::time::every(TICK).map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn theme(&self) -> Theme {
        if self.is_dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn view(&self) -> Element<Message> {
        let styles = ui::styles(self.is_dark_mode);
        let now = Instant::now();

        let content = column![
            self.header_view(styles),
            self.form_view(styles),
            self.notices_view(styles),
            self.data_view(styles, now),
            self.note_view(styles)
        ]
        .spacing(16)
        .padding(24)
        .max_width(960.0);

        container(scrollable(container(content).width(Length::Fill).center_x()))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(ContainerStyle::flat(styles.bg, styles.fg))
            .into()
    }
}

impl SheetViewer {
    fn start_load(&mut self, now: Instant) -> Command<Message> {
        match self.viewer.begin_load(now) {
            Ok(ticket) => self.perform(ticket),
            Err(_) => Command::none(),
        }
    }

    fn perform(&self, ticket: LoadTicket) -> Command<Message> {
        let loader = self.loader.clone();
        let generation = ticket.generation;
        Command::perform(
            async move { loader.fetch_and_render(&ticket.source, ticket.mode).await },
            move |result| Message::Fetched(generation, result),
        )
    }

    fn header_view(&self, styles: &'static Styles) -> Element<Message> {
        column![
            text("Sheet Viewer")
                .size(36)
                .style(styles.fg)
                .horizontal_alignment(Horizontal::Center),
            text("Rows of a published Google Sheet, as a list or a table")
                .size(16)
                .style(styles.muted)
                .horizontal_alignment(Horizontal::Center)
        ]
        .spacing(4)
        .width(Length::Fill)
        .align_items(Alignment::Center)
        .into()
    }

    fn form_view(&self, styles: &'static Styles) -> Element<Message> {
        let source = self.viewer.source();
        let loading = self.viewer.is_loading();
        let auto_refresh = self.viewer.auto_refresh();

        let inputs = row![
            column![
                text("Sheet ID or link").size(14).style(styles.fg),
                text_input("Sheet ID", &source.document_id)
                    .on_input(Message::DocumentIdChanged)
                    .padding(10)
            ]
            .spacing(6)
            .width(Length::FillPortion(2)),
            column![
                text("Sheet name").size(14).style(styles.fg),
                text_input(DEFAULT_TAB_NAME, &source.tab_name)
                    .on_input(Message::TabNameChanged)
                    .padding(10)
            ]
            .spacing(6)
            .width(Length::FillPortion(1))
        ]
        .spacing(16);

        let mut load = button(text(if loading { "Loading..." } else { "Load" }).size(16))
            .padding([10, 18])
            .style(ButtonStyle::custom(styles.accent, styles.on_accent, styles.accent_hover));
        if !loading {
            load = load.on_press(Message::Load);
        }

        let refresh = button(
            text(if auto_refresh {
                "Stop auto-refresh"
            } else {
                "Enable auto-refresh"
            })
            .size(16),
        )
        .padding([10, 18])
        .on_press(Message::ToggleAutoRefresh)
        .style(if auto_refresh {
            ButtonStyle::custom(styles.accent_hover, styles.on_accent, styles.accent)
        } else {
            ButtonStyle::custom(styles.panel_bg, styles.fg, styles.header_bg)
        });

        let mode_button = |mode: DisplayMode| {
            let style = if self.viewer.mode() == mode {
                ButtonStyle::custom(styles.header_bg, styles.header_fg, styles.header_bg)
            } else {
                ButtonStyle::custom(styles.panel_bg, styles.muted, styles.header_bg)
            };
            button(text(mode.label()).size(14))
                .padding([8, 12])
                .on_press(Message::ModeSelected(mode))
                .style(style)
        };

        let theme = button(text(if self.is_dark_mode { "Light" } else { "Dark" }).size(14))
            .padding([8, 12])
            .on_press(Message::ToggleTheme)
            .style(ButtonStyle::custom(styles.panel_bg, styles.muted, styles.header_bg));

        let actions = row![
            load,
            refresh,
            Space::with_width(Length::Fill),
            mode_button(DisplayMode::List),
            mode_button(DisplayMode::Table),
            Space::with_width(Length::Fixed(10.0)),
            theme
        ]
        .spacing(10)
        .align_items(Alignment::Center);

        container(column![inputs, actions].spacing(16))
            .padding(20)
            .width(Length::Fill)
            .style(ContainerStyle::card(styles.panel_bg, styles.fg, styles.item_border))
            .into()
    }

    fn notices_view(&self, styles: &'static Styles) -> Element<Message> {
        let notices = self
            .viewer
            .notices()
            .iter()
            .map(|notice| {
                let color = match notice.kind {
                    NoticeKind::Success => styles.success,
                    NoticeKind::Error => styles.error,
                };
                container(text(&notice.message).size(15).style(color))
                    .padding(10)
                    .width(Length::Fill)
                    .style(ContainerStyle::card(styles.panel_bg, color, color))
                    .into()
            })
            .collect();

        Column::with_children(notices).spacing(6).into()
    }

    fn data_view(&self, styles: &'static Styles, now: Instant) -> Element<Message> {
        match self.viewer.data() {
            Some(SheetData::List(excuses)) if !excuses.is_empty() => {
                column![
                    self.status_view(excuses.len(), "excuses", styles),
                    self.list_view(excuses, styles, now)
                ]
                .spacing(10)
                .into()
            }
            Some(SheetData::Table(table)) if !table.rows.is_empty() => column![
                self.status_view(table.rows.len(), "rows", styles),
                self.table_view(table, styles)
            ]
            .spacing(10)
            .into(),
            _ if self.viewer.is_loading() => self.placeholder_view("Loading...", "", styles),
            _ => self.placeholder_view(
                "Nothing to show",
                "Enter a Google Sheet ID and press \"Load\".",
                styles,
            ),
        }
    }

    fn status_view(&self, count: usize, noun: &str, styles: &'static Styles) -> Element<Message> {
        let mut status = format!("{} {}", count, noun);
        if self.viewer.auto_refresh() {
            let every = self.viewer.scheduler().interval().as_secs();
            status.push_str(&format!(" · refreshing every {} seconds", every));
        }
        if let Some(at) = self.viewer.last_loaded_at() {
            status.push_str(&format!(" · updated {}", at.format("%H:%M:%S")));
        }
        if self.viewer.session().last_error().is_some() {
            status.push_str(" · last refresh failed");
        }
        text(status).size(14).style(styles.muted).into()
    }

    fn list_view<'a>(
        &'a self,
        excuses: &'a [Excuse],
        styles: &'static Styles,
        now: Instant,
    ) -> Element<'a, Message> {
        let items = excuses
            .iter()
            .map(|excuse| {
                let copied = self.viewer.is_copied(excuse.id, now);
                let copy = button(text(if copied { "Copied" } else { "Copy" }).size(14))
                    .padding([6, 10])
                    .on_press(Message::Copy(excuse.id))
                    .style(if copied {
                        ButtonStyle::custom(styles.success, styles.on_accent, styles.success)
                    } else {
                        ButtonStyle::custom(styles.item_border, styles.fg, styles.accent)
                    });

                container(
                    row![
                        text("!").size(20).style(styles.accent),
                        text(&excuse.text).size(17).style(styles.fg).width(Length::Fill),
                        copy
                    ]
                    .spacing(14)
                    .align_items(Alignment::Center),
                )
                .padding(14)
                .width(Length::Fill)
                .style(ContainerStyle::card(styles.item_bg, styles.fg, styles.item_border))
                .into()
            })
            .collect();

        Column::with_children(items).spacing(10).into()
    }

    fn table_view<'a>(
        &'a self,
        data: &'a TableData,
        styles: &'static Styles,
    ) -> Element<'a, Message> {
        let column_width = |i: usize| {
            if i == 0 {
                Length::Fixed(200.0)
            } else {
                Length::Fixed(140.0)
            }
        };

        let headers = Row::with_children(
            data.columns
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    container(text(header).size(16).style(styles.header_fg))
                        .width(column_width(i))
                        .padding(6)
                        .style(ContainerStyle::flat(styles.header_bg, styles.header_fg))
                        .into()
                })
                .collect(),
        )
        .spacing(1);

        let rows = (0..data.rows.len()).map(|r| {
            let bg = if r % 2 == 0 { styles.panel_bg } else { styles.bg };
            Row::with_children(
                data.columns
                    .iter()
                    .enumerate()
                    .map(|(i, label)| {
                        container(text(data.cell(r, label)).size(16).style(styles.fg))
                            .width(column_width(i))
                            .padding(6)
                            .style(ContainerStyle::flat(bg, styles.fg))
                            .into()
                    })
                    .collect(),
            )
            .spacing(1)
            .into()
        });

        let content = column![headers]
            .push(Column::with_children(rows.collect()).spacing(1))
            .spacing(1);

        scrollable(content)
            .direction(Direction::Horizontal(Properties::default()))
            .into()
    }

    fn placeholder_view<'a>(
        &'a self,
        title: &'a str,
        hint: &'a str,
        styles: &'static Styles,
    ) -> Element<'a, Message> {
        container(
            column![
                text(title).size(20).style(styles.muted),
                text(hint).size(14).style(styles.muted)
            ]
            .spacing(8)
            .align_items(Alignment::Center),
        )
        .padding(48)
        .width(Length::Fill)
        .center_x()
        .style(ContainerStyle::card(styles.panel_bg, styles.fg, styles.item_border))
        .into()
    }

    fn note_view(&self, styles: &'static Styles) -> Element<Message> {
        let lines = [
            "The sheet must be published for public access.",
            "In Google Sheets: File → Share → Publish to web.",
            "The sheet id is the part of the link between /d/ and /edit; pasting the whole link works too.",
            "In list mode, press Copy next to an entry to put it on the clipboard.",
        ];

        let body = lines.iter().fold(
            column![text("Note").size(18).style(styles.note_fg)].spacing(6),
            |col, line| col.push(text(format!("• {}", line)).size(14).style(styles.note_fg)),
        );

        container(body)
            .padding(20)
            .width(Length::Fill)
            .style(ContainerStyle::card(styles.note_bg, styles.note_fg, styles.note_fg))
            .into()
    }
}
