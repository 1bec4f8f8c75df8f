use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::{PI, TAU};
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlImageElement, ImageData};

use crate::config::PictureConfig;
use crate::controller::Game;
use crate::error::GameError;
use crate::model::particles::ParticleKind;
use crate::model::pictures::{css_rgb, Picture, MUSEUM_PICTURES};
use crate::model::scene::{Museum, Outside, SecretRoom};
use crate::model::{ParticleSystem, Player, SceneId};
use crate::view::placeholder;

type Ctx = CanvasRenderingContext2d;

/// Draws the active scene, the player, particles and the vignette
pub struct CanvasRenderer {
    pub canvas: HtmlCanvasElement,
    ctx: Ctx,
    document: Document,
    width: f64,
    height: f64,
    images: Rc<RefCell<HashMap<&'static str, HtmlImageElement>>>,
    placeholders: HashMap<u32, HtmlCanvasElement>,
}

impl CanvasRenderer {
    pub fn new(document: &Document, canvas: HtmlCanvasElement) -> Result<Self, GameError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(GameError::MissingElement("2d context"))?
            .dyn_into::<Ctx>()
            .map_err(|_| GameError::Js("canvas context is not 2d".into()))?;
        Ok(Self {
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            canvas,
            ctx,
            document: document.clone(),
            images: Rc::new(RefCell::new(HashMap::new())),
            placeholders: HashMap::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.width = width as f64;
        self.height = height as f64;
    }

    /// Start loading the gallery photos; frames show placeholder art until
    /// a photo arrives, and forever if it fails.
    pub fn preload_images(&self) -> Result<(), JsValue> {
        for path in MUSEUM_PICTURES.iter().filter_map(|p| p.image_path) {
            let img = HtmlImageElement::new()?;

            let onload = {
                let images = self.images.clone();
                let img = img.clone();
                Closure::wrap(Box::new(move |_e: Event| {
                    debug!(path, "image loaded");
                    images.borrow_mut().insert(path, img.clone());
                }) as Box<dyn FnMut(Event)>)
            };
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            let onerror = Closure::wrap(Box::new(move |_e: Event| {
                warn!(path, "image failed to load, keeping placeholder art");
            }) as Box<dyn FnMut(Event)>);
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();

            img.set_src(path);
        }
        Ok(())
    }

    pub fn draw_frame(&mut self, game: &Game) -> Result<(), JsValue> {
        let camera_x = game.camera_x() as f64;
        let player_x = game.player_x() as f64;
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);

        match game.scene {
            SceneId::Outside => self.draw_outside(&game.scenes.outside, camera_x, player_x)?,
            SceneId::Museum => {
                self.draw_museum(&game.scenes.museum, &game.cfg.pictures, camera_x, player_x)?;
                self.draw_particles(&game.particles, camera_x)?;
            }
            SceneId::SecretRoom => {
                self.draw_secret_room(&game.scenes.secret_room, &game.cfg.pictures, camera_x, player_x)?;
                self.draw_particles(&game.particles, camera_x)?;
            }
        }

        self.draw_player(&game.player, camera_x)?;
        self.draw_vignette()
    }

    fn floor_y(&self) -> f64 {
        self.height * 0.75
    }

    fn on_screen(&self, screen_x: f64, margin: f64) -> bool {
        screen_x >= -margin && screen_x <= self.width + margin
    }

    fn vertical_gradient(&self, stops: &[(f32, &str)], bottom: f64) -> Result<(), JsValue> {
        let grad = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, bottom);
        for &(offset, color) in stops {
            grad.add_color_stop(offset, color)?;
        }
        self.ctx.set_fill_style_canvas_gradient(&grad);
        self.ctx.fill_rect(0.0, 0.0, self.width, bottom);
        Ok(())
    }

    fn glow(&self, x: f64, y: f64, radius: f64, inner: &str) -> Result<(), JsValue> {
        let grad = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius)?;
        grad.add_color_stop(0.0, inner)?;
        grad.add_color_stop(1.0, "rgba(0, 0, 0, 0)")?;
        self.ctx.set_fill_style_canvas_gradient(&grad);
        self.ctx.fill_rect(x - radius, y - radius, radius * 2.0, radius * 2.0);
        Ok(())
    }

    fn circle(&self, x: f64, y: f64, r: f64, color: &str) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.arc(x, y, r, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }

    /// Arched doorway outline used by the museum entrance, secret door and exit stairs
    fn arch_path(&self, left: f64, top: f64, width: f64, bottom: f64) {
        let mid = left + width / 2.0;
        self.ctx.begin_path();
        self.ctx.move_to(left, bottom);
        self.ctx.line_to(left, top + 30.0);
        self.ctx.quadratic_curve_to(left, top, mid, top - 10.0);
        self.ctx.quadratic_curve_to(left + width, top, left + width, top + 30.0);
        self.ctx.line_to(left + width, bottom);
        self.ctx.close_path();
    }

    fn draw_outside(&self, outside: &Outside, camera_x: f64, player_x: f64) -> Result<(), JsValue> {
        let ground_y = self.height * 0.65;
        self.vertical_gradient(&[(0.0, "#0f0c29"), (0.5, "#302b63"), (1.0, "#4a3f6b")], ground_y)?;

        // Stars and moon scroll slowly
        self.ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
        for i in 0..40u32 {
            let sx = ((i * 137) as f64 * 7.3 - camera_x * 0.05).rem_euclid(self.width);
            let sy = (i * 53 % 100) as f64 / 100.0 * ground_y * 0.6;
            self.ctx.fill_rect(sx, sy, 1.5, 1.5);
        }
        let moon_x = self.width * 0.8 - camera_x * 0.02;
        self.glow(moon_x, 70.0, 80.0, "rgba(245, 236, 208, 0.3)")?;
        self.circle(moon_x, 70.0, 28.0, "#f5ecd0")?;

        for cloud in &outside.clouds {
            let sx = cloud.x as f64 - camera_x * 0.3;
            self.ctx.set_fill_style_str("rgba(60, 50, 80, 0.4)");
            self.ctx.begin_path();
            self.ctx.ellipse(sx, cloud.y as f64, cloud.width as f64 / 2.0, 12.0, 0.0, 0.0, TAU)?;
            self.ctx.fill();
        }

        let grass = self.ctx.create_linear_gradient(0.0, ground_y, 0.0, self.height);
        grass.add_color_stop(0.0, "#2a3a2a")?;
        grass.add_color_stop(1.0, "#1a2a1a")?;
        self.ctx.set_fill_style_canvas_gradient(&grass);
        self.ctx.fill_rect(0.0, ground_y, self.width, self.height - ground_y);
        self.ctx.set_fill_style_str("#4a4a4a");
        self.ctx.fill_rect(0.0, self.floor_y(), self.width, 12.0);

        for tree in &outside.trees {
            let sx = tree.x as f64 - camera_x;
            if !self.on_screen(sx, 80.0) {
                continue;
            }
            let size = tree.size as f64;
            self.ctx.set_fill_style_str("#3a2a1a");
            self.ctx.fill_rect(sx - 6.0 * size, self.floor_y() - 60.0 * size, 12.0 * size, 60.0 * size);
            self.circle(sx, self.floor_y() - 75.0 * size, 35.0 * size, "#1a3a1a")?;
        }

        self.draw_museum_building(outside, camera_x, player_x)?;
        self.draw_ticket_booth(outside, camera_x, player_x)
    }

    fn draw_museum_building(&self, outside: &Outside, camera_x: f64, player_x: f64) -> Result<(), JsValue> {
        let sx = outside.entrance.x as f64 - camera_x;
        if !self.on_screen(sx, 300.0) {
            return Ok(());
        }
        let floor = self.floor_y();
        let (width, height) = (360.0, self.height * 0.5);

        self.ctx.set_fill_style_str("#3a3028");
        self.ctx.fill_rect(sx - width / 2.0, floor - height, width, height);
        self.ctx.set_fill_style_str("#4a4038");
        self.ctx.fill_rect(sx - width / 2.0 - 15.0, floor - height - 20.0, width + 30.0, 20.0);
        self.ctx.set_fill_style_str("#c9b896");
        self.ctx.set_font("bold 16px 'Crimson Text', serif");
        self.ctx.set_text_align("center");
        self.ctx.fill_text("MUSEUM OF US", sx, floor - height + 25.0)?;

        let (door_w, door_top) = (80.0, floor - 130.0);
        let door_left = sx - door_w / 2.0;
        self.ctx.set_fill_style_str("#0a0a0f");
        self.arch_path(door_left, door_top, door_w, floor);
        self.ctx.fill();

        let open = outside.door_open_amount as f64;
        if open > 0.0 {
            self.glow(sx, floor - 60.0, 90.0 * open, "rgba(255, 220, 150, 0.35)")?;
            // Door leaves slide apart
            let leaf = door_w / 2.0 * (1.0 - open);
            self.ctx.set_fill_style_str("#4a4038");
            self.ctx.fill_rect(door_left, door_top + 10.0, leaf, floor - door_top - 10.0);
            self.ctx.fill_rect(door_left + door_w - leaf, door_top + 10.0, leaf, floor - door_top - 10.0);
        } else {
            self.ctx.set_fill_style_str("#4a4038");
            self.ctx.fill_rect(door_left, door_top + 10.0, door_w, floor - door_top - 10.0);
            self.circle(sx + 8.0, floor - 60.0, 3.0, "#c9a84c")?;
        }

        if outside.is_near_entrance(player_x as f32) {
            self.ctx.set_stroke_style_str("rgba(245, 230, 211, 0.4)");
            self.ctx.set_line_width(2.0);
            self.arch_path(door_left - 6.0, door_top - 6.0, door_w + 12.0, floor);
            self.ctx.stroke();
        }
        Ok(())
    }

    fn draw_ticket_booth(&self, outside: &Outside, camera_x: f64, player_x: f64) -> Result<(), JsValue> {
        let sx = outside.ticket_booth.x as f64 - camera_x;
        if !self.on_screen(sx, 100.0) {
            return Ok(());
        }
        let floor = self.floor_y();
        let (w, h) = (90.0, 120.0);
        let top = floor - h;

        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
        self.ctx.fill_rect(sx - w / 2.0 + 5.0, top + 5.0, w, h);
        self.ctx.set_fill_style_str("#5a3028");
        self.ctx.fill_rect(sx - w / 2.0, top, w, h);
        self.ctx.set_fill_style_str("#2a1a10");
        self.ctx.fill_rect(sx - w / 2.0 + 10.0, top + 20.0, w - 20.0, 40.0);
        self.ctx.set_fill_style_str(if outside.has_ticket { "#6a8a6a" } else { "#c9b896" });
        self.ctx.set_font("bold 10px 'Quicksand', sans-serif");
        self.ctx.set_text_align("center");
        self.ctx.fill_text(if outside.has_ticket { "THANK YOU" } else { "TICKETS" }, sx, top + 12.0)?;
        self.glow(sx, top - 5.0, 40.0, "rgba(255, 220, 100, 0.3)")?;

        if !outside.has_ticket && outside.is_near_ticket_booth(player_x as f32) {
            self.ctx.set_stroke_style_str("rgba(249, 220, 100, 0.5)");
            self.ctx.set_line_width(2.0);
            self.ctx.stroke_rect(sx - w / 2.0 - 4.0, top - 4.0, w + 8.0, h + 8.0);
        }
        Ok(())
    }

    fn draw_museum(&mut self, museum: &Museum, frames: &PictureConfig, camera_x: f64, player_x: f64) -> Result<(), JsValue> {
        self.vertical_gradient(
            &[
                (0.0, "#2d3446"),
                (0.15, "#2d3446"),
                (0.18, "#e8ddd0"),
                (0.75, "#d9cec0"),
                (0.78, "#8b7355"),
                (1.0, "#7a6348"),
            ],
            self.height,
        )?;
        self.ctx.set_fill_style_str("#c4b5a0");
        self.ctx.fill_rect(0.0, self.height * 0.15, self.width, 8.0);
        self.ctx.set_fill_style_str("#6b5c4a");
        self.ctx.fill_rect(0.0, self.floor_y() - 12.0, self.width, 12.0);
        self.draw_floor_tiles(camera_x, "rgba(0, 0, 0, 0.06)", "rgba(255, 255, 255, 0.04)");

        for light in &museum.lights {
            let sx = light.x as f64 - camera_x;
            if !self.on_screen(sx, 100.0) {
                continue;
            }
            let ceiling = self.height * 0.15;
            self.ctx.set_fill_style_str("#4a4a4a");
            self.ctx.fill_rect(sx - 3.0, ceiling, 6.0, 15.0);
            self.glow(sx, ceiling + 20.0, 60.0 * light.flicker as f64, "rgba(255, 248, 220, 0.25)")?;
        }

        self.draw_booth(museum.welcome_booth.x as f64 - camera_x, "#8b7355", "WELCOME")?;
        self.draw_booth(museum.valentine_booth.x as f64 - camera_x, "#b5495b", "LUCKY CARD")?;
        self.draw_frames(museum.pictures, frames, camera_x, player_x, false)?;

        for &bench in &museum.benches {
            let sx = bench as f64 - camera_x;
            if !self.on_screen(sx, 100.0) {
                continue;
            }
            let y = self.floor_y() - 33.0;
            self.ctx.set_fill_style_str("#5a4a3a");
            self.ctx.fill_rect(sx - 35.0, y, 70.0, 8.0);
            self.ctx.fill_rect(sx - 30.0, y + 8.0, 6.0, 25.0);
            self.ctx.fill_rect(sx + 24.0, y + 8.0, 6.0, 25.0);
        }

        for plant in &museum.plants {
            let sx = plant.x as f64 - camera_x;
            if !self.on_screen(sx, 60.0) {
                continue;
            }
            let base = self.floor_y();
            let sway = (plant.sway as f64).sin() * 3.0;
            self.ctx.set_fill_style_str("#8b5a3a");
            self.ctx.fill_rect(sx - 14.0, base - 25.0, 28.0, 25.0);
            let leaf = if plant.tall { 22.0 } else { 15.0 };
            self.circle(sx + sway, base - 25.0 - leaf, leaf, "#4a7a4a")?;
        }

        self.draw_secret_door(museum, camera_x, player_x)
    }

    fn draw_booth(&self, sx: f64, color: &str, label: &str) -> Result<(), JsValue> {
        if !self.on_screen(sx, 100.0) {
            return Ok(());
        }
        let (w, h) = (110.0, 100.0);
        let top = self.floor_y() - h;
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(sx - w / 2.0, top, w, h);
        self.ctx.set_fill_style_str("#f5ecd0");
        self.ctx.fill_rect(sx - w / 2.0 + 5.0, top + 10.0, w - 10.0, 40.0);
        self.ctx.set_fill_style_str("#3a2a1a");
        self.ctx.set_font("bold 11px 'Quicksand', sans-serif");
        self.ctx.set_text_align("center");
        self.ctx.fill_text(label, sx, top + 35.0)
    }

    fn draw_secret_door(&self, museum: &Museum, camera_x: f64, player_x: f64) -> Result<(), JsValue> {
        let door = &museum.secret_door;
        let sx = door.landmark.x as f64 - camera_x;
        if !self.on_screen(sx, 200.0) {
            return Ok(());
        }
        let wall_y = self.height * 0.15;
        let floor = self.floor_y();
        let (door_w, door_top) = (90.0, wall_y + 10.0);
        let door_left = sx - door_w / 2.0;
        let door_h = floor - wall_y - 20.0;

        self.ctx.save();
        if door.is_shaking() {
            let t = door.shake_timer_ms as f64;
            self.ctx.translate((t * 0.9).sin() * 3.0, (t * 1.3).cos() * 1.5)?;
        }

        self.ctx.set_fill_style_str("#0a0a0f");
        self.arch_path(door_left, door_top, door_w, floor - 12.0);
        self.ctx.fill();

        if door.broken {
            for i in 0..5 {
                let step_y = floor - 12.0 - i as f64 * 18.0;
                let alpha = 0.15 - i as f64 * 0.025;
                self.ctx.set_fill_style_str(&format!("rgba(60, 50, 40, {alpha})"));
                self.ctx.fill_rect(door_left + 8.0, step_y - 4.0, door_w - 16.0, 4.0);
            }
            self.glow(sx, floor - door_h / 2.0, door_w, "rgba(80, 50, 30, 0.15)")?;
        }

        self.ctx.set_stroke_style_str("#5a4a3a");
        self.ctx.set_line_width(10.0);
        self.arch_path(door_left - 2.0, door_top - 5.0, door_w + 4.0, floor - 12.0);
        self.ctx.stroke();

        // One chain per remaining lock, crossing the arch
        self.ctx.set_stroke_style_str("#8a8a8a");
        self.ctx.set_line_width(4.0);
        for i in 0..door.chains_remaining {
            let y = door_top + door_h * (0.3 + 0.2 * i as f64);
            self.ctx.begin_path();
            self.ctx.move_to(door_left - 5.0, y - 10.0);
            self.ctx.line_to(door_left + door_w + 5.0, y + 10.0);
            self.ctx.stroke();
            self.circle(sx, y, 7.0, "#6a6a6a")?;
        }

        if museum.is_near_secret_door(player_x as f32) {
            self.ctx.set_stroke_style_str("rgba(245, 230, 211, 0.3)");
            self.ctx.set_line_width(2.0);
            self.arch_path(door_left - 8.0, door_top - 10.0, door_w + 16.0, floor - 12.0);
            self.ctx.stroke();
        }
        self.ctx.restore();
        Ok(())
    }

    fn draw_secret_room(&mut self, room: &SecretRoom, frames: &PictureConfig, camera_x: f64, player_x: f64) -> Result<(), JsValue> {
        self.vertical_gradient(
            &[
                (0.0, "#0d0b0a"),
                (0.15, "#0d0b0a"),
                (0.18, "#2a221c"),
                (0.75, "#1f1915"),
                (0.78, "#1a1410"),
                (1.0, "#0f0c0a"),
            ],
            self.height,
        )?;
        self.ctx.set_fill_style_str("rgba(80, 60, 50, 0.3)");
        self.ctx.fill_rect(0.0, self.height * 0.15, self.width, 6.0);
        self.ctx.set_fill_style_str("#2a1f18");
        self.ctx.fill_rect(0.0, self.floor_y() - 12.0, self.width, 12.0);
        self.draw_floor_tiles(camera_x, "rgba(0, 0, 0, 0.15)", "rgba(40, 30, 25, 0.1)");

        for torch in &room.torches {
            let sx = torch.x as f64 - camera_x;
            if !self.on_screen(sx, 150.0) {
                continue;
            }
            let y = self.height * 0.35;
            let flicker = torch.flicker as f64;
            self.ctx.set_fill_style_str("#3a2a1a");
            self.ctx.fill_rect(sx - 3.0, y, 6.0, 25.0);
            self.glow(sx, y - 5.0, 120.0 * flicker, "rgba(255, 140, 50, 0.25)")?;
            self.circle(sx, y - 5.0, 6.0 * flicker, "rgba(255, 200, 80, 0.9)")?;
        }

        let sx = room.exit_stairs.x as f64 - camera_x;
        if self.on_screen(sx, 150.0) {
            let floor = self.floor_y();
            let (w, top) = (80.0, floor - 150.0);
            self.ctx.set_fill_style_str("#1a180f");
            self.arch_path(sx - w / 2.0, top, w, floor - 12.0);
            self.ctx.fill();
            for i in 0..6 {
                let alpha = 0.08 + i as f64 * 0.015;
                self.ctx.set_fill_style_str(&format!("rgba(200, 180, 150, {alpha})"));
                self.ctx.fill_rect(sx - w / 2.0 + 8.0, floor - 18.0 - i as f64 * 16.0, w - 16.0, 3.0);
            }
            let near = room.is_near_exit(player_x as f32);
            self.ctx.set_fill_style_str(if near { "rgba(245, 230, 211, 0.6)" } else { "rgba(245, 230, 211, 0.25)" });
            self.ctx.set_font("bold 9px 'Quicksand', sans-serif");
            self.ctx.set_text_align("center");
            self.ctx.fill_text("↑ EXIT", sx, top - 15.0)?;
        }

        self.draw_frames(room.pictures, frames, camera_x, player_x, true)?;

        // Heavier darkness underground
        let grad = self.ctx.create_radial_gradient(
            self.width / 2.0,
            self.height / 2.0,
            self.height * 0.2,
            self.width / 2.0,
            self.height / 2.0,
            self.width * 0.7,
        )?;
        grad.add_color_stop(0.0, "rgba(0, 0, 0, 0)")?;
        grad.add_color_stop(1.0, "rgba(0, 0, 0, 0.5)")?;
        self.ctx.set_fill_style_canvas_gradient(&grad);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }

    fn draw_floor_tiles(&self, camera_x: f64, even: &str, odd: &str) {
        let tile = 60.0;
        let floor_y = self.height * 0.78;
        let mut x = -(camera_x % tile) - tile;
        while x < self.width + tile {
            let index = ((x + camera_x) / tile).floor() as i64;
            self.ctx.set_fill_style_str(if index % 2 == 0 { even } else { odd });
            self.ctx.fill_rect(x, floor_y, tile - 2.0, self.height * 0.22);
            x += tile;
        }
    }

    fn draw_frames(
        &mut self,
        pictures: &'static [Picture],
        frames: &PictureConfig,
        camera_x: f64,
        player_x: f64,
        secret: bool,
    ) -> Result<(), JsValue> {
        let (w, h, border) = (frames.frame_width as f64, frames.frame_height as f64, frames.border_width as f64);
        let frame_y = self.height * 0.22;

        for pic in pictures {
            let sx = pic.x as f64 - camera_x;
            if !self.on_screen(sx, 200.0) {
                continue;
            }
            let left = sx - w / 2.0;

            self.ctx.set_fill_style_str(if secret { "rgba(0, 0, 0, 0.4)" } else { "rgba(0, 0, 0, 0.15)" });
            self.ctx.fill_rect(left + 6.0, frame_y + 6.0, w + border * 2.0, h + border * 2.0);
            self.ctx.set_fill_style_str(&css_rgb(pic.frame_color));
            self.ctx.fill_rect(left - border, frame_y - border, w + border * 2.0, h + border * 2.0);
            self.ctx.set_fill_style_str(&css_rgb(pic.accent_color));
            self.ctx.fill_rect(left - border / 2.0, frame_y - border / 2.0, w + border, h + border);

            let loaded = pic.image_path.and_then(|path| self.images.borrow().get(path).cloned());
            if let Some(img) = loaded {
                let (dx, dy, dw, dh) = placeholder::cover_fit(
                    img.natural_width() as f32,
                    img.natural_height() as f32,
                    left as f32,
                    frame_y as f32,
                    w as f32,
                    h as f32,
                );
                self.ctx.save();
                self.ctx.begin_path();
                self.ctx.rect(left, frame_y, w, h);
                self.ctx.clip();
                self.ctx.draw_image_with_html_image_element_and_dw_and_dh(&img, dx as f64, dy as f64, dw as f64, dh as f64)?;
                self.ctx.restore();
            } else if secret {
                self.ctx.set_fill_style_str("#1a1818");
                self.ctx.fill_rect(left, frame_y, w, h);
                self.ctx.set_fill_style_str("rgba(255, 255, 255, 0.08)");
                self.ctx.set_font("bold 40px 'Crimson Text', serif");
                self.ctx.set_text_align("center");
                self.ctx.fill_text("?", sx, frame_y + h / 2.0 + 14.0)?;
            } else {
                let art = self.placeholder_canvas(pic, w as u32, h as u32)?;
                self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(&art, left, frame_y, w, h)?;
            }

            if ((player_x - pic.x as f64).abs() as f32) < frames.interaction_radius {
                let (stroke, dots) = if secret {
                    ("rgba(255, 150, 50, 0.5)", "rgba(255, 200, 100, 0.7)")
                } else {
                    ("rgba(255, 248, 220, 0.7)", "rgba(255, 255, 255, 0.9)")
                };
                self.ctx.set_stroke_style_str(stroke);
                self.ctx.set_line_width(4.0);
                self.ctx.stroke_rect(left - border - 5.0, frame_y - border - 5.0, w + border * 2.0 + 10.0, h + border * 2.0 + 10.0);

                let t = js_sys::Date::now() * 0.003;
                for i in 0..4 {
                    let angle = t + i as f64 * PI / 2.0;
                    let x = sx + angle.cos() * (w / 2.0 + 25.0);
                    let y = frame_y + h / 2.0 + angle.sin() * (h / 2.0 + 20.0);
                    self.circle(x, y, 2.5, dots)?;
                }
            }
        }
        Ok(())
    }

    /// Rasterised once per picture, then reused
    fn placeholder_canvas(&mut self, pic: &Picture, width: u32, height: u32) -> Result<HtmlCanvasElement, JsValue> {
        if let Some(canvas) = self.placeholders.get(&pic.id) {
            return Ok(canvas.clone());
        }
        let art = placeholder::abstract_art(pic.id, pic.accent_color, width, height);
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(art.as_raw().as_slice()), width, height)?;

        let canvas = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("failed to create placeholder canvas"))?;
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context for placeholder"))?
            .dyn_into::<Ctx>()?;
        ctx.put_image_data(&data, 0.0, 0.0)?;

        self.placeholders.insert(pic.id, canvas.clone());
        Ok(canvas)
    }

    fn draw_particles(&self, particles: &ParticleSystem, camera_x: f64) -> Result<(), JsValue> {
        for p in &particles.particles {
            let sx = p.x as f64 - camera_x;
            if !self.on_screen(sx, 20.0) {
                continue;
            }
            let (y, opacity) = (p.y as f64, p.opacity.max(0.0));
            match p.kind {
                ParticleKind::Sparkle => {
                    let size = p.size as f64 * 2.0;
                    self.ctx.set_stroke_style_str(&format!("rgba(255, 255, 240, {opacity})"));
                    self.ctx.set_line_width(1.0);
                    self.ctx.begin_path();
                    self.ctx.move_to(sx - size, y);
                    self.ctx.line_to(sx + size, y);
                    self.ctx.move_to(sx, y - size);
                    self.ctx.line_to(sx, y + size);
                    self.ctx.stroke();
                }
                ParticleKind::Dust => {
                    self.circle(sx, y, p.size as f64, &format!("rgba(255, 252, 240, {opacity})"))?;
                }
            }
        }
        Ok(())
    }

    fn draw_player(&self, player: &Player, camera_x: f64) -> Result<(), JsValue> {
        let w = player.width() as f64;
        let h = player.height() as f64;
        let sx = player.pos.x as f64 - camera_x;
        let base_y = player.base_y as f64;
        let y = player.pos.y as f64 - player.bob_offset as f64;
        let mid = w / 2.0;

        self.ctx.save();
        if player.facing_right {
            self.ctx.translate(sx, 0.0)?;
        } else {
            self.ctx.translate(sx + mid, 0.0)?;
            self.ctx.scale(-1.0, 1.0)?;
            self.ctx.translate(-mid, 0.0)?;
        }

        let shadow = (1.0 - (base_y - player.pos.y as f64) / 80.0).max(0.3);
        self.ctx.set_fill_style_str(&format!("rgba(0, 0, 0, {})", 0.15 * shadow));
        self.ctx.begin_path();
        self.ctx.ellipse(mid, base_y + h - 2.0, 16.0 * shadow, 5.0 * shadow, 0.0, 0.0, TAU)?;
        self.ctx.fill();

        let skin = "#f0d5c0";
        let hair = "#2a1a12";
        let dress = "#1a1a1a";

        let leg = if player.airborne { 4.0 } else { (player.walk_frame as f64 * PI / 2.0).sin() * 6.0 };
        self.ctx.set_stroke_style_str(skin);
        self.ctx.set_line_width(4.0);
        self.ctx.set_line_cap("round");
        for (hip, swing) in [(-4.0, -leg), (4.0, leg)] {
            self.ctx.begin_path();
            self.ctx.move_to(mid + hip, y + 38.0);
            self.ctx.line_to(mid + hip + swing, y + h - 2.0);
            self.ctx.stroke();
        }

        self.ctx.set_fill_style_str(dress);
        self.ctx.begin_path();
        self.ctx.move_to(mid - 6.0, y + 16.0);
        self.ctx.line_to(mid - 12.0, y + 40.0);
        self.ctx.line_to(mid + 12.0, y + 40.0);
        self.ctx.line_to(mid + 6.0, y + 16.0);
        self.ctx.close_path();
        self.ctx.fill();

        self.ctx.set_fill_style_str(skin);
        self.ctx.fill_rect(mid - 3.0, y + 12.0, 6.0, 5.0);
        self.circle(mid, y + 8.0, 9.0, skin)?;

        self.ctx.set_fill_style_str(hair);
        self.ctx.begin_path();
        self.ctx.arc(mid, y + 5.0, 10.0, PI, TAU)?;
        self.ctx.fill();
        self.ctx.fill_rect(mid - 10.0, y + 3.0, 3.0, 18.0);
        self.ctx.fill_rect(mid + 7.0, y + 3.0, 3.0, 18.0);

        self.ctx.set_fill_style_str("#3d3d3d");
        self.ctx.begin_path();
        self.ctx.arc(mid - 3.0, y + 8.0, 1.5, 0.0, TAU)?;
        self.ctx.arc(mid + 3.0, y + 8.0, 1.5, 0.0, TAU)?;
        self.ctx.fill();

        self.ctx.restore();
        Ok(())
    }

    fn draw_vignette(&self) -> Result<(), JsValue> {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let grad = self.ctx.create_radial_gradient(cx, cy, self.height * 0.3, cx, cy, self.height)?;
        grad.add_color_stop(0.0, "rgba(0, 0, 0, 0)")?;
        grad.add_color_stop(1.0, "rgba(0, 0, 0, 0.4)")?;
        self.ctx.set_fill_style_canvas_gradient(&grad);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }
}
