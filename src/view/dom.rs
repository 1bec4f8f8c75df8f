//! Page overlays built at startup and mirrored from `Overlay` every frame.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlVideoElement, MouseEvent};

use crate::controller::input::TouchButton;
use crate::controller::Game;
use crate::error::GameError;
use crate::model::{ModalKind, Overlay, Prompt, ScratchCard};
use crate::view::scratch::ScratchPad;

const STYLE: &str = "
.hidden { display: none !important; }
#titleOverlay, .modal, #fadeOverlay { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; }
#titleOverlay { background: rgba(15, 12, 41, 0.92); color: #f5ecd0; flex-direction: column; font-family: 'Crimson Text', serif; z-index: 30; }
.modal { background: rgba(0, 0, 0, 0.7); z-index: 20; }
.modal-card { background: #f8f4ef; color: #3a2a1a; border-radius: 10px; padding: 24px; max-width: 520px; font-family: 'Quicksand', sans-serif; }
.modal-card button { margin: 12px 8px 0 0; }
#prompt { position: fixed; bottom: 28%; left: 50%; transform: translateX(-50%); background: rgba(0, 0, 0, 0.6); color: #f5ecd0; padding: 6px 14px; border-radius: 14px; font-family: 'Quicksand', sans-serif; z-index: 10; }
#chainFeedback { position: fixed; top: 18%; left: 50%; transform: translateX(-50%); color: #f5ecd0; background: rgba(20, 15, 10, 0.8); padding: 8px 16px; border-radius: 8px; z-index: 15; }
#fadeOverlay { background: #000; opacity: 0; pointer-events: none; z-index: 25; }
#scratchCard { position: relative; width: 280px; height: 140px; margin: 12px auto; border-radius: 8px; overflow: hidden; background: #fff5e6; display: flex; align-items: center; justify-content: center; text-align: center; }
#scratchCanvas { position: absolute; inset: 0; width: 100%; height: 100%; cursor: pointer; touch-action: none; transition: opacity 0.8s ease; }
#scratchCanvas.cleared { opacity: 0; pointer-events: none; }
#videoPlayer { max-width: 90vw; max-height: 80vh; }
#touchControls { position: fixed; bottom: 12px; left: 0; right: 0; display: flex; justify-content: space-between; padding: 0 16px; z-index: 12; }
#touchControls button { width: 56px; height: 56px; border-radius: 50%; opacity: 0.75; }
#touchControls button.active { background: #c9a84c; }
@media (hover: hover) and (pointer: fine) { #touchControls { display: none; } }
";

const WELCOME_TEXT: &str = "Welcome to the Museum of Us. Walk the hall, stop by every frame, \
and press E to look closer. Some doors here are not what they seem.";
const SCRATCH_HINT: &str = "Scratch the gold to reveal your prize";
const REVEALED_TEXT: &str = "🎟 A lucky card for my Valentine";
const INVITATION_TEXT: &str = "Will you be my Valentine?";
const ACCEPTED_TEXT: &str = "💌 Your lucky card has been accepted!";
const PRIZE_TEXT: &str = "You won: one dinner date of your choice. Valid forever.";

fn element(document: &Document, tag: &str, id: &str, parent: &HtmlElement) -> Result<HtmlElement, JsValue> {
    let el = document.create_element(tag)?.dyn_into::<HtmlElement>()?;
    if !id.is_empty() {
        el.set_id(id);
    }
    parent.append_child(&el)?;
    Ok(el)
}

fn set_visible(el: &HtmlElement, visible: bool) -> Result<(), JsValue> {
    el.class_list().toggle_with_force("hidden", !visible)?;
    Ok(())
}

/// What the page currently shows, so unchanged state costs no DOM writes
#[derive(Default)]
struct Shown {
    prompt: Option<Prompt>,
    picture: Option<u32>,
    caption_len: usize,
    video: Option<&'static str>,
    feedback: Option<String>,
    valentine: bool,
}

pub struct DomOverlay {
    title: HtmlElement,
    prompt: HtmlElement,
    picture_modal: HtmlElement,
    picture_title: HtmlElement,
    picture_caption: HtmlElement,
    play_video: HtmlElement,
    close_picture: HtmlElement,
    welcome_modal: HtmlElement,
    close_welcome: HtmlElement,
    valentine_modal: HtmlElement,
    scratch_hint: HtmlElement,
    scratch_canvas: HtmlCanvasElement,
    scratch_revealed: HtmlElement,
    invitation: HtmlElement,
    accept: [HtmlElement; 2],
    accepted: HtmlElement,
    prize: HtmlElement,
    close_valentine: HtmlElement,
    scratch_pad: Option<ScratchPad>,
    video_modal: HtmlElement,
    video: HtmlVideoElement,
    close_video: HtmlElement,
    feedback: HtmlElement,
    fade: HtmlElement,
    touch: Vec<(TouchButton, HtmlElement)>,
    shown: Shown,
    game: Rc<RefCell<Game>>,
}

impl DomOverlay {
    /// Build every overlay element and wire its buttons to `game`
    pub fn new(document: &Document, game: Rc<RefCell<Game>>) -> Result<Self, GameError> {
        let body = document.body().ok_or(GameError::MissingElement("body"))?;
        let dom = Self::build(document, &body, game)?;
        dom.bind_buttons()?;
        Ok(dom)
    }

    fn build(document: &Document, body: &HtmlElement, game: Rc<RefCell<Game>>) -> Result<Self, JsValue> {
        element(document, "style", "", body)?.set_text_content(Some(STYLE));

        let title = element(document, "div", "titleOverlay", body)?;
        element(document, "h1", "", &title)?.set_text_content(Some("The Museum of Us"));
        element(document, "p", "", &title)?.set_text_content(Some("Press any key or tap to begin"));

        let prompt = element(document, "div", "prompt", body)?;

        let picture_modal = element(document, "div", "pictureModal", body)?;
        picture_modal.set_class_name("modal hidden");
        let card = element(document, "div", "", &picture_modal)?;
        card.set_class_name("modal-card");
        let picture_title = element(document, "h2", "pictureTitle", &card)?;
        let picture_caption = element(document, "p", "pictureDescription", &card)?;
        let play_video = element(document, "button", "playVideoBtn", &card)?;
        play_video.set_text_content(Some("▶ Play video"));
        let close_picture = element(document, "button", "closePictureBtn", &card)?;
        close_picture.set_text_content(Some("Close"));

        let welcome_modal = element(document, "div", "welcomeModal", body)?;
        welcome_modal.set_class_name("modal hidden");
        let card = element(document, "div", "", &welcome_modal)?;
        card.set_class_name("modal-card");
        element(document, "p", "", &card)?.set_text_content(Some(WELCOME_TEXT));
        let close_welcome = element(document, "button", "closeWelcomeBtn", &card)?;
        close_welcome.set_text_content(Some("Close"));

        let valentine_modal = element(document, "div", "valentineModal", body)?;
        valentine_modal.set_class_name("modal hidden");
        let card = element(document, "div", "", &valentine_modal)?;
        card.set_class_name("modal-card");
        let scratch_hint = element(document, "p", "scratchHint", &card)?;
        scratch_hint.set_text_content(Some(SCRATCH_HINT));
        let scratch = element(document, "div", "scratchCard", &card)?;
        let scratch_revealed = element(document, "p", "scratchRevealed", &scratch)?;
        scratch_revealed.set_text_content(Some(REVEALED_TEXT));
        let scratch_canvas = element(document, "canvas", "scratchCanvas", &scratch)?.dyn_into::<HtmlCanvasElement>()?;
        let invitation = element(document, "div", "acceptInvitation", &card)?;
        element(document, "p", "", &invitation)?.set_text_content(Some(INVITATION_TEXT));
        let accept = [
            element(document, "button", "acceptYesBtn", &invitation)?,
            element(document, "button", "acceptYesBtn2", &invitation)?,
        ];
        accept[0].set_text_content(Some("Yes"));
        accept[1].set_text_content(Some("Yes!"));
        let accepted = element(document, "p", "acceptedMessage", &card)?;
        accepted.set_text_content(Some(ACCEPTED_TEXT));
        let prize = element(document, "p", "prizeDetails", &card)?;
        prize.set_text_content(Some(PRIZE_TEXT));
        let close_valentine = element(document, "button", "closeValentineBtn", &card)?;
        close_valentine.set_text_content(Some("Close"));

        let video_modal = element(document, "div", "videoModal", body)?;
        video_modal.set_class_name("modal hidden");
        let card = element(document, "div", "", &video_modal)?;
        card.set_class_name("modal-card");
        let video = element(document, "video", "videoPlayer", &card)?.dyn_into::<HtmlVideoElement>()?;
        video.set_controls(true);
        let close_video = element(document, "button", "closeVideoBtn", &card)?;
        close_video.set_text_content(Some("Close"));

        let feedback = element(document, "div", "chainFeedback", body)?;
        let fade = element(document, "div", "fadeOverlay", body)?;

        let controls = element(document, "div", "touchControls", body)?;
        let touch = TouchButton::ALL
            .iter()
            .map(|&button| {
                let el = element(document, "button", button.element_id(), &controls)?;
                el.set_text_content(Some(button.label()));
                Ok::<_, JsValue>((button, el))
            })
            .collect::<Result<Vec<_>, JsValue>>()?;

        for el in [&prompt, &feedback] {
            set_visible(el, false)?;
        }

        Ok(Self {
            title,
            prompt,
            picture_modal,
            picture_title,
            picture_caption,
            play_video,
            close_picture,
            welcome_modal,
            close_welcome,
            valentine_modal,
            scratch_hint,
            scratch_canvas,
            scratch_revealed,
            invitation,
            accept,
            accepted,
            prize,
            close_valentine,
            scratch_pad: None,
            video_modal,
            video,
            close_video,
            feedback,
            fade,
            touch,
            shown: Shown::default(),
            game,
        })
    }

    pub fn touch_buttons(&self) -> impl Iterator<Item = (TouchButton, &HtmlElement)> + '_ {
        self.touch.iter().map(|(b, el)| (*b, el))
    }

    /// Clicks arrive between frames, so the game is free to borrow
    fn bind_buttons(&self) -> Result<(), JsValue> {
        let bind = |el: &HtmlElement, action: fn(&mut Overlay)| -> Result<(), JsValue> {
            let game = self.game.clone();
            let click = Closure::wrap(Box::new(move |e: MouseEvent| {
                e.stop_propagation();
                action(&mut game.borrow_mut().overlay);
            }) as Box<dyn FnMut(MouseEvent)>);
            el.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
            click.forget();
            Ok(())
        };

        bind(&self.play_video, |ui| {
            ui.play_current_video();
        })?;
        bind(&self.close_picture, |ui| ui.close(ModalKind::Picture))?;
        bind(&self.close_welcome, |ui| ui.close(ModalKind::Welcome))?;
        for yes in &self.accept {
            bind(yes, |ui| {
                ui.accept_invitation();
            })?;
        }
        bind(&self.close_valentine, |ui| ui.close(ModalKind::Valentine))?;
        bind(&self.close_video, |ui| ui.close(ModalKind::Video))?;
        Ok(())
    }

    pub fn sync(&mut self, overlay: &Overlay, sprint_toggled: bool) -> Result<(), JsValue> {
        set_visible(&self.title, overlay.title_visible)?;

        if self.shown.prompt != overlay.prompt {
            if let Some(prompt) = overlay.prompt {
                self.prompt.set_text_content(Some(prompt.text()));
            }
            set_visible(&self.prompt, overlay.prompt.is_some())?;
            self.shown.prompt = overlay.prompt;
        }

        self.sync_picture(overlay)?;
        set_visible(&self.welcome_modal, overlay.welcome_open)?;
        self.sync_valentine(overlay.valentine)?;
        self.sync_video(overlay.video)?;

        let feedback = overlay.feedback.as_ref().map(|f| f.text.clone());
        if self.shown.feedback != feedback {
            self.feedback.set_text_content(feedback.as_deref());
            set_visible(&self.feedback, feedback.is_some())?;
            self.shown.feedback = feedback;
        }

        self.fade.style().set_property("opacity", &format!("{:.3}", overlay.fade))?;

        for (button, el) in &self.touch {
            if *button == TouchButton::Sprint {
                el.class_list().toggle_with_force("active", sprint_toggled)?;
            }
        }
        Ok(())
    }

    fn sync_picture(&mut self, overlay: &Overlay) -> Result<(), JsValue> {
        let Some(view) = overlay.picture.as_ref() else {
            if self.shown.picture.take().is_some() {
                set_visible(&self.picture_modal, false)?;
            }
            return Ok(());
        };

        if self.shown.picture != Some(view.picture.id) {
            self.picture_title.set_text_content(Some(view.picture.title));
            set_visible(&self.play_video, view.picture.video_path.is_some())?;
            set_visible(&self.picture_modal, true)?;
            self.shown.picture = Some(view.picture.id);
            self.shown.caption_len = usize::MAX;
        }
        if self.shown.caption_len != view.chars_shown {
            self.picture_caption.set_text_content(Some(view.caption().as_str()));
            self.shown.caption_len = view.chars_shown;
        }
        Ok(())
    }

    /// The scratch listeners live only while the card is open
    fn sync_valentine(&mut self, card: Option<ScratchCard>) -> Result<(), JsValue> {
        if self.shown.valentine != card.is_some() {
            set_visible(&self.valentine_modal, card.is_some())?;
            match self.scratch_pad.take() {
                Some(pad) => pad.detach(),
                None => {
                    self.scratch_canvas.class_list().remove_1("cleared")?;
                    self.scratch_pad = Some(ScratchPad::attach(&self.scratch_canvas, self.game.clone())?);
                }
            }
            self.shown.valentine = card.is_some();
        }

        let Some(card) = card else {
            return Ok(());
        };
        let covered = card.is_covered();
        set_visible(&self.scratch_hint, covered)?;
        self.scratch_canvas.class_list().toggle_with_force("cleared", !covered)?;
        set_visible(&self.scratch_revealed, !covered)?;
        set_visible(&self.invitation, card.invitation_visible())?;
        set_visible(&self.accepted, matches!(card, ScratchCard::Accepted { .. }))?;
        set_visible(&self.prize, card.details_visible())?;
        Ok(())
    }

    fn sync_video(&mut self, video: Option<&'static str>) -> Result<(), JsValue> {
        if self.shown.video == video {
            return Ok(());
        }
        match video {
            Some(path) => {
                self.video.set_src(path);
                set_visible(&self.video_modal, true)?;
                if let Err(err) = self.video.play() {
                    warn!(path, ?err, "video playback refused");
                }
            }
            None => {
                self.video.pause()?;
                self.video.remove_attribute("src")?;
                set_visible(&self.video_modal, false)?;
            }
        }
        self.shown.video = video;
        Ok(())
    }
}
