//! State of the DOM overlays (title, prompts, modals, feedback toast).
//!
//! The game only ever talks to the overlays through this struct; the view
//! layer mirrors it into the page once per frame.

use crate::config::UiConfig;
use crate::model::pictures::Picture;

/// Contextual hint shown near a landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prompt {
    Interact,
    Welcome,
    Valentine,
    Door,
    Exit,
    Ticket,
    Entrance,
}

impl Prompt {
    pub const ALL: [Prompt; 7] = [
        Prompt::Interact,
        Prompt::Welcome,
        Prompt::Valentine,
        Prompt::Door,
        Prompt::Exit,
        Prompt::Ticket,
        Prompt::Entrance,
    ];

    pub fn text(&self) -> &'static str {
        match self {
            Prompt::Interact => "Press E to view",
            Prompt::Welcome => "Press E to read the welcome card",
            Prompt::Valentine => "Press E to redeem your lucky card",
            Prompt::Door => "Press E to try the door",
            Prompt::Exit => "Press E to go back upstairs",
            Prompt::Ticket => "Press E to buy a ticket",
            Prompt::Entrance => "Press E to enter the museum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Picture,
    Welcome,
    Valentine,
    Video,
}

/// Picture viewer with a typewriter caption
#[derive(Debug, Clone)]
pub struct PictureView {
    pub picture: &'static Picture,
    pub chars_shown: usize,
    elapsed_ms: f32,
}

impl PictureView {
    pub fn is_typing(&self) -> bool {
        self.chars_shown < self.picture.description.chars().count()
    }

    pub fn caption(&self) -> String {
        self.picture.description.chars().take(self.chars_shown).collect()
    }
}

/// Scratch card inside the valentine modal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScratchCard {
    /// Gold layer still on; the page reports how much has been scratched off
    Covered,
    /// Prize visible, accept-invitation prompt pending
    Revealed { elapsed_ms: f32, invitation_visible: bool },
    /// Invitation accepted, prize details pending
    Accepted { elapsed_ms: f32, details_visible: bool },
}

impl ScratchCard {
    pub fn is_covered(&self) -> bool {
        matches!(self, ScratchCard::Covered)
    }

    pub fn invitation_visible(&self) -> bool {
        matches!(self, ScratchCard::Revealed { invitation_visible: true, .. })
    }

    pub fn details_visible(&self) -> bool {
        matches!(self, ScratchCard::Accepted { details_visible: true, .. })
    }

    fn tick(&mut self, dt_ms: f32, cfg: &UiConfig) {
        match self {
            ScratchCard::Covered => {}
            ScratchCard::Revealed { elapsed_ms, invitation_visible } => {
                *elapsed_ms += dt_ms;
                *invitation_visible |= *elapsed_ms >= cfg.invitation_delay_ms;
            }
            ScratchCard::Accepted { elapsed_ms, details_visible } => {
                *elapsed_ms += dt_ms;
                *details_visible |= *elapsed_ms >= cfg.prize_reveal_delay_ms;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub text: String,
    pub remaining_ms: f32,
}

pub struct Overlay {
    pub title_visible: bool,
    pub prompt: Option<Prompt>,
    pub picture: Option<PictureView>,
    pub welcome_open: bool,
    pub valentine: Option<ScratchCard>,
    pub video: Option<&'static str>,
    pub feedback: Option<Feedback>,
    /// 0 = clear, 1 = fully black
    pub fade: f32,
    cfg: UiConfig,
}

impl Overlay {
    pub fn new(cfg: UiConfig) -> Self {
        Self {
            title_visible: true,
            prompt: None,
            picture: None,
            welcome_open: false,
            valentine: None,
            video: None,
            feedback: None,
            fade: 0.0,
            cfg,
        }
    }

    pub fn hide_title(&mut self) {
        self.title_visible = false;
    }

    pub fn show_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
    }

    pub fn hide_all_prompts(&mut self) {
        self.prompt = None;
    }

    pub fn is_any_open(&self) -> bool {
        self.picture.is_some() || self.welcome_open || self.valentine.is_some() || self.video.is_some()
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        match kind {
            ModalKind::Picture => self.picture.is_some(),
            ModalKind::Welcome => self.welcome_open,
            ModalKind::Valentine => self.valentine.is_some(),
            ModalKind::Video => self.video.is_some(),
        }
    }

    pub fn open_picture(&mut self, picture: &'static Picture) -> bool {
        if self.is_any_open() {
            return false;
        }
        self.picture = Some(PictureView { picture, chars_shown: 0, elapsed_ms: 0.0 });
        self.hide_all_prompts();
        true
    }

    pub fn open_welcome(&mut self) -> bool {
        if self.is_any_open() {
            return false;
        }
        self.welcome_open = true;
        self.hide_all_prompts();
        true
    }

    pub fn open_valentine(&mut self) -> bool {
        if self.is_any_open() {
            return false;
        }
        self.valentine = Some(ScratchCard::Covered);
        self.hide_all_prompts();
        true
    }

    /// Record how much of the scratch layer is cleared (0..=1). Returns true
    /// when this report reveals the card.
    pub fn report_scratch(&mut self, cleared: f32) -> bool {
        match self.valentine.as_mut() {
            Some(card) if card.is_covered() && cleared > self.cfg.reveal_fraction => {
                *card = ScratchCard::Revealed { elapsed_ms: 0.0, invitation_visible: false };
                true
            }
            _ => false,
        }
    }

    /// "Yes" on the invitation; only once the prompt is showing
    pub fn accept_invitation(&mut self) -> bool {
        match self.valentine.as_mut() {
            Some(card) if card.invitation_visible() => {
                *card = ScratchCard::Accepted { elapsed_ms: 0.0, details_visible: false };
                true
            }
            _ => false,
        }
    }

    /// Videos may stack on top of the picture viewer
    pub fn open_video(&mut self, path: Option<&'static str>) -> bool {
        match path {
            Some(path) => {
                self.video = Some(path);
                true
            }
            None => false,
        }
    }

    /// Play the video attached to the picture currently on screen
    pub fn play_current_video(&mut self) -> bool {
        let path = self.picture.as_ref().and_then(|view| view.picture.video_path);
        self.open_video(path)
    }

    pub fn close(&mut self, kind: ModalKind) {
        match kind {
            ModalKind::Picture => self.picture = None,
            ModalKind::Welcome => self.welcome_open = false,
            ModalKind::Valentine => self.valentine = None,
            ModalKind::Video => self.video = None,
        }
    }

    pub fn close_all(&mut self) {
        self.picture = None;
        self.welcome_open = false;
        self.valentine = None;
        self.video = None;
    }

    /// Reveal the whole caption at once. Returns false if it was already complete.
    pub fn skip_typewriter(&mut self) -> bool {
        match self.picture.as_mut() {
            Some(view) if view.is_typing() => {
                view.chars_shown = view.picture.description.chars().count();
                true
            }
            _ => false,
        }
    }

    pub fn show_feedback(&mut self, text: impl Into<String>) {
        self.feedback = Some(Feedback { text: text.into(), remaining_ms: self.cfg.feedback_ms });
    }

    /// Advance overlay timers; runs every frame, paused game or not
    pub fn tick(&mut self, dt_ms: f32) {
        if let Some(view) = self.picture.as_mut() {
            if view.is_typing() {
                view.elapsed_ms += dt_ms;
                let per_char = self.cfg.typewriter_ms_per_char.max(f32::EPSILON);
                let total = view.picture.description.chars().count();
                view.chars_shown = ((view.elapsed_ms / per_char) as usize).min(total);
            }
        }

        if let Some(card) = self.valentine.as_mut() {
            card.tick(dt_ms, &self.cfg);
        }

        if let Some(fb) = self.feedback.as_mut() {
            fb.remaining_ms -= dt_ms;
            if fb.remaining_ms <= 0.0 {
                self.feedback = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pictures::{MUSEUM_PICTURES, SECRET_PICTURES};

    fn overlay() -> Overlay {
        Overlay::new(UiConfig::default())
    }

    #[test]
    fn only_one_modal_at_a_time() {
        let mut ui = overlay();
        assert!(ui.open_welcome());
        assert!(!ui.open_picture(&MUSEUM_PICTURES[0]));
        assert!(!ui.open_valentine());
        assert!(ui.is_open(ModalKind::Welcome));
        assert!(!ui.is_open(ModalKind::Picture));
    }

    #[test]
    fn opening_a_modal_hides_prompts() {
        let mut ui = overlay();
        ui.show_prompt(Prompt::Valentine);
        ui.open_valentine();
        assert_eq!(ui.prompt, None);
    }

    #[test]
    fn typewriter_reveals_then_skips() {
        let mut ui = overlay();
        ui.open_picture(&MUSEUM_PICTURES[4]);
        ui.tick(12.0 * 5.0);
        assert_eq!(ui.picture.as_ref().unwrap().caption(), "Our f");

        assert!(ui.skip_typewriter());
        let view = ui.picture.as_ref().unwrap();
        assert!(!view.is_typing());
        assert_eq!(view.caption(), MUSEUM_PICTURES[4].description);
        assert!(!ui.skip_typewriter());
    }

    #[test]
    fn feedback_expires() {
        let mut ui = overlay();
        ui.show_feedback("hello");
        ui.tick(1999.0);
        assert!(ui.feedback.is_some());
        ui.tick(2.0);
        assert!(ui.feedback.is_none());
    }

    #[test]
    fn new_feedback_restarts_timer() {
        let mut ui = overlay();
        ui.show_feedback("first");
        ui.tick(1500.0);
        ui.show_feedback("second");
        ui.tick(1500.0);
        assert_eq!(ui.feedback.as_ref().map(|f| f.text.as_str()), Some("second"));
    }

    #[test]
    fn scratch_card_stays_covered_until_half_is_cleared() {
        let mut ui = overlay();
        ui.open_valentine();
        ui.tick(5000.0);
        assert_eq!(ui.valentine, Some(ScratchCard::Covered));

        assert!(!ui.report_scratch(0.3));
        // strictly more than half
        assert!(!ui.report_scratch(0.5));
        assert_eq!(ui.valentine, Some(ScratchCard::Covered));

        assert!(ui.report_scratch(0.51));
        assert_eq!(ui.valentine, Some(ScratchCard::Revealed { elapsed_ms: 0.0, invitation_visible: false }));
        // further scratching changes nothing
        assert!(!ui.report_scratch(0.9));
    }

    #[test]
    fn invitation_appears_after_reveal_delay() {
        let mut ui = overlay();
        ui.open_valentine();
        ui.report_scratch(0.8);

        ui.tick(1000.0);
        assert!(!ui.valentine.unwrap().invitation_visible());
        assert!(!ui.accept_invitation());

        ui.tick(200.0);
        assert!(ui.valentine.unwrap().invitation_visible());
    }

    #[test]
    fn accepting_shows_prize_details_later() {
        let mut ui = overlay();
        ui.open_valentine();
        ui.report_scratch(0.8);
        ui.tick(1200.0);
        assert!(ui.accept_invitation());
        assert!(!ui.accept_invitation());
        assert!(!ui.valentine.unwrap().invitation_visible());

        ui.tick(500.0);
        assert!(!ui.valentine.unwrap().details_visible());
        ui.tick(300.0);
        assert!(ui.valentine.unwrap().details_visible());
    }

    #[test]
    fn scratch_reports_need_an_open_card() {
        let mut ui = overlay();
        assert!(!ui.report_scratch(1.0));
        assert!(!ui.accept_invitation());
        assert_eq!(ui.valentine, None);
    }

    #[test]
    fn reopening_the_card_starts_covered() {
        let mut ui = overlay();
        ui.open_valentine();
        ui.report_scratch(0.8);
        ui.tick(1200.0);
        ui.accept_invitation();
        ui.tick(800.0);
        ui.close(ModalKind::Valentine);

        ui.open_valentine();
        assert_eq!(ui.valentine, Some(ScratchCard::Covered));
    }

    #[test]
    fn video_stacks_on_picture() {
        let mut ui = overlay();
        ui.open_picture(&MUSEUM_PICTURES[0]);
        assert!(ui.play_current_video());
        assert!(ui.is_open(ModalKind::Picture) && ui.is_open(ModalKind::Video));
        ui.close_all();
        assert!(!ui.is_any_open());

        // picture without a clip
        ui.open_picture(&MUSEUM_PICTURES[4]);
        assert!(!ui.play_current_video());
        assert!(!ui.open_video(None));
        assert!(ui.open_video(SECRET_PICTURES[0].video_path));
    }
}
