use std::collections::HashMap;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use eframe::egui;

use datagrid::config::AppConfig;
use datagrid::data::Person;
use datagrid::engine::pipeline::{load_people, DataSource, LoadError};
use datagrid::net::image::PhotoLoader;
use datagrid::net::token::{StoredTokens, TokenStore};
use datagrid::render::camera::{CameraParams, Projector};
use datagrid::render::tiles::{self, TILE_WORLD_HEIGHT, TILE_WORLD_WIDTH};
use datagrid::scene::FormationName;
use datagrid::viz::Visualization;

/// Default morph duration for formation changes.
const TRANSITION_MS: u64 = 1_600;

fn main() {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "datagrid — 3D people grid",
        options,
        Box::new(|_cc| Ok(Box::new(GridApp::new()))),
    )
    .expect("Failed to start datagrid");
}

struct GridApp {
    config: AppConfig,
    token_store: Option<TokenStore>,
    tokens: StoredTokens,
    people: Option<Vec<Person>>,
    error: Option<String>,
    loading: bool,
    /// True when the in-flight load went through the values API.
    loading_via_api: bool,
    load_rx: Option<mpsc::Receiver<Result<Vec<Person>, LoadError>>>,
    viz: Option<Visualization>,
    camera: CameraParams,
    photos: PhotoLoader,
    photo_textures: HashMap<String, egui::TextureHandle>,
    last_frame: Instant,
}

impl GridApp {
    fn new() -> Self {
        let config = AppConfig::from_env();
        let token_store = TokenStore::default_location();
        let tokens = token_store
            .as_ref()
            .map(|s| s.load())
            .unwrap_or_default();

        let mut app = Self {
            config,
            token_store,
            tokens,
            people: None,
            error: None,
            loading: false,
            loading_via_api: false,
            load_rx: None,
            viz: None,
            camera: CameraParams::default(),
            photos: PhotoLoader::new(),
            photo_textures: HashMap::new(),
            last_frame: Instant::now(),
        };
        // Restore-session path: start loading right away when configured.
        if app.config.is_configured() {
            app.start_load();
        }
        app
    }

    fn start_load(&mut self) {
        self.error = None;
        let stored = if self.tokens.access_token.is_empty() {
            None
        } else {
            Some(self.tokens.access_token.as_str())
        };
        let source = match DataSource::from_config(&self.config, stored) {
            Ok(source) => source,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };
        self.loading_via_api = matches!(source, DataSource::SheetsApi { .. });
        self.loading = true;

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(load_people(&source));
        });
        self.load_rx = Some(rx);
    }

    fn sign_out(&mut self) {
        if let Some(store) = &self.token_store {
            if let Err(e) = store.clear() {
                log::warn!("failed to clear token file: {}", e);
            }
        }
        self.tokens = StoredTokens::default();
        if let Some(viz) = self.viz.take() {
            viz.dispose();
        }
        self.people = None;
        self.error = None;
    }

    fn poll_load(&mut self) {
        let Some(rx) = &self.load_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.load_rx = None;
        self.loading = false;

        match result {
            Ok(people) => {
                for person in &people {
                    self.photos.request(&person.photo);
                }
                self.viz = Some(Visualization::open(people.len(), None));
                self.camera = CameraParams::default();
                log::info!("visualization opened for {} people", people.len());
                self.people = Some(people);
            }
            Err(e) => {
                // A rejected API token is stale; drop it so the next attempt
                // asks for a fresh one.
                if self.loading_via_api && e.phase == "fetch" {
                    if let Some(store) = &self.token_store {
                        let _ = store.clear();
                    }
                    self.tokens = StoredTokens::default();
                }
                log::error!("load failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    fn poll_photos(&mut self, ctx: &egui::Context) {
        for url in self.photos.poll() {
            if let Some(data) = self.photos.get(&url) {
                let img = egui::ColorImage::from_rgba_unmultiplied(
                    [data.width as usize, data.height as usize],
                    &data.rgba,
                );
                let texture = ctx.load_texture(&url, img, egui::TextureOptions::LINEAR);
                self.photo_textures.insert(url, texture);
            }
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("datagrid");
                ui.separator();

                let current = self.viz.as_ref().map(|v| v.current_formation());
                for name in FormationName::ALL {
                    let selected = current == Some(name);
                    let label = name.as_str().to_uppercase();
                    if ui.selectable_label(selected, label).clicked() {
                        if let Some(viz) = self.viz.as_mut() {
                            if let Err(e) =
                                viz.transform(name, Duration::from_millis(TRANSITION_MS))
                            {
                                log::warn!("transition rejected: {}", e);
                            }
                        }
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.people.is_some() && ui.button("Sign out").clicked() {
                        self.sign_out();
                    }
                    if let Some(people) = &self.people {
                        ui.label(format!("{} people", people.len()));
                    }
                });
            });
        });
    }

    fn setup_view(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading("3D people grid");
            ui.add_space(12.0);

            if self.loading {
                ui.spinner();
                ui.label("Loading people…");
            } else if !self.config.is_configured() {
                ui.label("No data source configured.");
                ui.add_space(8.0);
                ui.monospace("DATAGRID_CSV_URL       published CSV export (no auth)");
                ui.monospace("DATAGRID_SHEET_ID      spreadsheet id (values API)");
                ui.monospace("DATAGRID_SHEET_NAME    tab name, default Sheet1");
                ui.monospace("DATAGRID_SHEET_RANGE   range, default A1:G999");
                ui.monospace("DATAGRID_ACCESS_TOKEN  bearer token for the API");
            } else if ui.button("Load data").clicked() {
                self.start_load();
            }

            if let Some(error) = &self.error {
                ui.add_space(12.0);
                ui.colored_label(egui::Color32::LIGHT_RED, error);
            }
        });
    }

    fn scene_view(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());

        if response.dragged() {
            let d = response.drag_delta();
            self.camera.orbit(glam::Vec2::new(d.x, d.y));
        }
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 && response.hovered() {
            self.camera.zoom(scroll);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(9, 12, 22));

        let (Some(viz), Some(people)) = (&self.viz, &self.people) else {
            return;
        };
        let projector = Projector::new(&self.camera, rect.width(), rect.height());

        // Project every card, then paint far-to-near.
        struct DrawCard {
            index: usize,
            screen: egui::Pos2,
            depth: f32,
            scale: f32,
            brightness: f32,
        }
        let mut cards: Vec<DrawCard> = Vec::with_capacity(viz.object_count());
        for (index, object) in viz.objects().iter().enumerate() {
            let pos = object.position();
            let world = glam::Vec3::new(pos.x as f32, pos.y as f32, pos.z as f32);
            let Some(projected) = projector.project(world) else {
                continue;
            };
            let facing = object.pose().facing();
            let facing = glam::Vec3::new(facing.x as f32, facing.y as f32, facing.z as f32);
            let to_eye = (projector.eye() - world).normalize_or_zero();
            let brightness = 0.35 + 0.65 * facing.dot(to_eye).max(0.0);
            cards.push(DrawCard {
                index,
                screen: egui::Pos2::new(
                    rect.left() + projected.screen.x,
                    rect.top() + projected.screen.y,
                ),
                depth: projected.depth,
                scale: projected.scale,
                brightness,
            });
        }
        cards.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        for card in &cards {
            let Some(person) = people.get(card.index) else {
                continue;
            };
            let size = egui::Vec2::new(
                TILE_WORLD_WIDTH * card.scale,
                TILE_WORLD_HEIGHT * card.scale,
            );
            if size.x < 2.0 {
                // Sub-pixel cards degenerate to a dot.
                painter.circle_filled(
                    card.screen,
                    1.0,
                    tiles::worth_band(person.net_worth).bar_fill(),
                );
                continue;
            }
            let tile_rect = egui::Rect::from_center_size(card.screen, size);
            if !rect.intersects(tile_rect) {
                continue;
            }
            let photo = self.photo_textures.get(&person.photo);
            tiles::draw_tile(&painter, tile_rect, person, photo, card.brightness);
        }
    }
}

impl eframe::App for GridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = (now - self.last_frame).min(Duration::from_millis(100));
        self.last_frame = now;

        self.poll_load();
        self.poll_photos(ctx);

        let animating = self
            .viz
            .as_mut()
            .map(|viz| viz.tick(dt))
            .unwrap_or(false);

        self.toolbar(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if self.viz.is_some() {
                    self.scene_view(ui);
                } else {
                    self.setup_view(ui);
                }
            });

        if animating || self.loading || self.photos.pending_count() > 0 {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
