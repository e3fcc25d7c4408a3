//! Show/hide lifecycle of the card popup.
//!
//! Time is passed in explicitly. Scheduled work (entrance kickoff, auto-close,
//! hide completion, particle cleanup) is stored as deadlines and fired by
//! [`CardPopup::tick`], which the frame loop calls once per frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::card::{DisplayedCard, ReferenceDeck};
use crate::config::PopupConfig;
use crate::content::{AssetPaths, CardContent, FsProbe, ImageProbe};
use crate::loader::{JsonFileSource, LoadStatus, ReferenceLoader, ReferenceSource};
use crate::particles::{ParticleField, Point};

/// Scale and opacity of the popup box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub scale: f32,
    pub opacity: f32,
}

impl Appearance {
    pub const HIDDEN: Appearance = Appearance {
        scale: 0.8,
        opacity: 0.0,
    };
    pub const SHOWN: Appearance = Appearance {
        scale: 1.0,
        opacity: 1.0,
    };

    fn lerp(self, to: Appearance, t: f32) -> Appearance {
        Appearance {
            scale: self.scale + (to.scale - self.scale) * t,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Opening { starts_at: Instant, from: Appearance },
    Closing { started_at: Instant, from: Appearance },
}

/// What the caller can observe about a popup session.
/// `auto_close` is only ever set while `is_visible` is true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    pub is_visible: bool,
    pub current_card: Option<DisplayedCard>,
    pub auto_close: Option<Instant>,
}

pub struct CardPopup {
    config: PopupConfig,
    assets: AssetPaths,
    loader: ReferenceLoader,
    probe: Box<dyn ImageProbe>,
    state: PopupState,
    content: Option<CardContent>,
    /// Card waiting for the reference load to resolve
    pending: Option<DisplayedCard>,
    displayed: bool,
    hide_completes_at: Option<Instant>,
    motion: Motion,
    anchor: Point,
    particles: ParticleField,
    rng: StdRng,
}

impl CardPopup {
    /// Popup reading its catalogue from `config.data_path`
    pub fn new(config: PopupConfig) -> Self {
        let source = Arc::new(JsonFileSource::new(config.data_path.clone()));
        Self::with_source(config, source)
    }

    pub fn with_source(config: PopupConfig, source: Arc<dyn ReferenceSource>) -> Self {
        Self::with_loader(config, ReferenceLoader::new(source))
    }

    /// Popup whose catalogue is already in hand
    pub fn with_deck(config: PopupConfig, deck: ReferenceDeck) -> Self {
        Self::with_loader(config, ReferenceLoader::preloaded(deck))
    }

    fn with_loader(config: PopupConfig, loader: ReferenceLoader) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            assets: AssetPaths::new(config.image_dir.clone(), config.default_image.clone()),
            particles: ParticleField::new(config.particle_cleanup()),
            config,
            loader,
            probe: Box::new(FsProbe),
            state: PopupState::default(),
            content: None,
            pending: None,
            displayed: false,
            hide_completes_at: None,
            motion: Motion::Idle,
            anchor: Point::default(),
            rng,
        }
    }

    pub fn probe(mut self, probe: impl ImageProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    // ─── Queries ─────────────────────────────────────────────────────

    pub fn is_popup_visible(&self) -> bool {
        self.state.is_visible
    }

    /// True from `show` until the exit transition has finished
    pub fn is_overlay_displayed(&self) -> bool {
        self.displayed
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn content(&self) -> Option<&CardContent> {
        self.content.as_ref()
    }

    pub fn pending_card(&self) -> Option<&DisplayedCard> {
        self.pending.as_ref()
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn load_status(&self) -> LoadStatus {
        self.loader.status()
    }

    pub fn reference(&self) -> Option<&ReferenceDeck> {
        self.loader.deck()
    }

    pub fn appearance(&self, now: Instant) -> Appearance {
        match self.motion {
            Motion::Idle => Appearance::HIDDEN,
            Motion::Opening { starts_at, from } => {
                if now < starts_at {
                    from
                } else {
                    from.lerp(Appearance::SHOWN, self.eased(now - starts_at))
                }
            }
            Motion::Closing { started_at, from } => from.lerp(
                Appearance::HIDDEN,
                self.eased(now.saturating_duration_since(started_at)),
            ),
        }
    }

    // ─── Operations ──────────────────────────────────────────────────

    /// Kick off the catalogue load ahead of the first `show`
    pub fn preload(&mut self) {
        if self.loader.begin() {
            debug!("reference load started");
        }
    }

    /// The renderer reports where the popup box is centred on screen
    pub fn set_anchor(&mut self, center: Point) {
        self.anchor = center;
    }

    pub fn show(&mut self, card: DisplayedCard, now: Instant) {
        if self.loader.poll().is_resolved() {
            self.present(card, now);
            return;
        }

        self.preload();
        debug!(card = %card.name, "reference still loading, card parked");
        self.pending = Some(card);
    }

    pub fn hide(&mut self, now: Instant) {
        self.pending = None;
        if !self.state.is_visible {
            return;
        }

        self.state.auto_close = None;
        self.particles
            .spawn_burst(self.anchor, self.config.particle_count, now, &mut self.rng);

        let from = self.appearance(now);
        self.motion = Motion::Closing {
            started_at: now,
            from,
        };
        self.hide_completes_at = Some(now + self.config.transition());
        self.state.is_visible = false;
        debug!("card popup hidden");
    }

    /// Fire every deadline that has passed by `now` and step the particles
    pub fn tick(&mut self, now: Instant) {
        if self.pending.is_some() && self.loader.poll().is_resolved() {
            if let Some(card) = self.pending.take() {
                self.present(card, now);
            }
        }

        if let Some(deadline) = self.state.auto_close {
            if now >= deadline {
                debug!("auto-close fired");
                self.hide(deadline);
            }
        }

        if let Some(at) = self.hide_completes_at {
            if now >= at {
                self.displayed = false;
                self.hide_completes_at = None;
                self.motion = Motion::Idle;
            }
        }

        self.particles.advance(now);
    }

    fn present(&mut self, card: DisplayedCard, now: Instant) {
        // Whatever is presented now supersedes a card parked during the load
        self.pending = None;
        self.content = Some(CardContent::resolve(
            &card,
            self.loader.deck(),
            &self.assets,
            self.probe.as_ref(),
        ));
        info!(card = %card.name, reversed = card.is_reversed, "showing card");
        self.state.current_card = Some(card);

        self.displayed = true;
        // A show during the exit transition keeps the overlay up
        self.hide_completes_at = None;
        if !self.state.is_visible {
            let from = self.appearance(now);
            self.motion = Motion::Opening {
                starts_at: now + self.config.entrance_delay(),
                from,
            };
        }

        self.state.is_visible = true;
        self.state.auto_close = Some(now + self.config.auto_close());
    }

    fn eased(&self, elapsed: Duration) -> f32 {
        let total = self.config.transition();
        if total.is_zero() {
            return 1.0;
        }
        let t = (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0);
        1.0 - (1.0 - t).powi(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardReferenceEntry;
    use crate::error::Result;
    use crate::interpretation::GENERIC_REVERSED;
    use crate::particles::PARTICLE_COUNT;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;
    use std::thread;

    struct AllImages;

    impl ImageProbe for AllImages {
        fn can_load(&self, _path: &Path) -> bool {
            true
        }
    }

    struct NoImages;

    impl ImageProbe for NoImages {
        fn can_load(&self, _path: &Path) -> bool {
            false
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config() -> PopupConfig {
        PopupConfig {
            seed: Some(11),
            ..PopupConfig::default()
        }
    }

    fn deck() -> ReferenceDeck {
        ReferenceDeck::new(vec![
            CardReferenceEntry::new("The Fool", "0", "Major Arcana", "m00.jpg"),
            CardReferenceEntry::new("The Magician", "1", "Major Arcana", "m01.jpg"),
        ])
    }

    fn popup() -> CardPopup {
        CardPopup::with_deck(config(), deck()).probe(AllImages)
    }

    fn fool() -> DisplayedCard {
        DisplayedCard::new("The Fool", false).meanings("beginnings", "recklessness")
    }

    #[test]
    fn test_show_is_immediately_visible() {
        let t0 = Instant::now();
        let mut popup = popup();
        assert!(!popup.is_popup_visible());
        popup.show(fool(), t0);
        assert!(popup.is_popup_visible());
        assert!(popup.is_overlay_displayed());
        assert_eq!(popup.state().auto_close, Some(t0 + ms(3000)));
    }

    #[test]
    fn test_hide_marks_hidden_now_and_undisplays_after_transition() {
        let t0 = Instant::now();
        let mut popup = popup();
        popup.show(fool(), t0);
        popup.hide(t0 + ms(500));
        assert!(!popup.is_popup_visible());
        assert_eq!(popup.state().auto_close, None);

        popup.tick(t0 + ms(799));
        assert!(popup.is_overlay_displayed());
        popup.tick(t0 + ms(801));
        assert!(!popup.is_overlay_displayed());
    }

    #[test]
    fn test_auto_close_after_three_seconds() {
        let t0 = Instant::now();
        let mut popup = popup();
        popup.show(fool(), t0);
        popup.tick(t0 + ms(2999));
        assert!(popup.is_popup_visible());
        popup.tick(t0 + ms(3000));
        assert!(!popup.is_popup_visible());
        assert_eq!(popup.state().auto_close, None);
    }

    #[test]
    fn test_reshow_resets_auto_close_window() {
        let t0 = Instant::now();
        let mut popup = popup();
        popup.show(fool(), t0);
        popup.tick(t0 + ms(2000));
        popup.show(DisplayedCard::new("The Magician", false), t0 + ms(2000));
        assert_eq!(popup.state().auto_close, Some(t0 + ms(5000)));

        popup.tick(t0 + ms(4000));
        assert!(popup.is_popup_visible());
        assert_eq!(popup.content().unwrap().title, "The Magician");

        popup.tick(t0 + ms(5000));
        assert!(!popup.is_popup_visible());
        assert_eq!(popup.state().current_card.as_ref().unwrap().name, "The Magician");
    }

    #[test]
    fn test_show_during_exit_keeps_overlay() {
        let t0 = Instant::now();
        let mut popup = popup();
        popup.show(fool(), t0);
        popup.hide(t0 + ms(1000));
        popup.show(fool(), t0 + ms(1100));
        popup.tick(t0 + ms(1400));
        assert!(popup.is_overlay_displayed());
        assert!(popup.is_popup_visible());
    }

    #[test]
    fn test_appearance_transitions() {
        let t0 = Instant::now();
        let mut popup = popup();
        assert_eq!(popup.appearance(t0), Appearance::HIDDEN);

        popup.show(fool(), t0);
        // Entrance starts after the kickoff delay
        assert_eq!(popup.appearance(t0 + ms(5)), Appearance::HIDDEN);
        let mid = popup.appearance(t0 + ms(160));
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.scale > 0.8 && mid.scale < 1.0);
        assert_eq!(popup.appearance(t0 + ms(310)), Appearance::SHOWN);

        popup.hide(t0 + ms(1000));
        assert_eq!(popup.appearance(t0 + ms(1000)), Appearance::SHOWN);
        assert_eq!(popup.appearance(t0 + ms(1300)), Appearance::HIDDEN);
    }

    #[test]
    fn test_hide_spawns_burst_at_anchor() {
        let t0 = Instant::now();
        let mut popup = popup();
        popup.set_anchor(Point::new(320.0, 200.0));
        popup.show(fool(), t0);
        popup.hide(t0 + ms(100));

        assert_eq!(popup.particles().len(), PARTICLE_COUNT);
        assert!(popup
            .particles()
            .particles()
            .all(|p| p.origin == Point::new(320.0, 200.0)));

        popup.tick(t0 + ms(1100));
        assert!(popup.particles().len() <= PARTICLE_COUNT);
        popup.tick(t0 + ms(2100));
        assert!(popup.particles().is_empty());
    }

    #[test]
    fn test_hide_when_hidden_does_nothing() {
        let t0 = Instant::now();
        let mut popup = popup();
        popup.hide(t0);
        assert!(popup.particles().is_empty());
        assert!(!popup.is_overlay_displayed());
    }

    #[test]
    fn test_content_for_known_card() {
        let t0 = Instant::now();
        let mut popup = popup();
        popup.show(fool(), t0);
        let content = popup.content().unwrap();
        assert_eq!(content.number.as_deref(), Some("0"));
        assert_eq!(content.arcana.as_deref(), Some("Major Arcana"));
        assert_eq!(content.meaning, "beginnings");
        assert_eq!(content.interpretation, "勇敢踏上新的旅程，相信直觉的指引。");
    }

    #[test]
    fn test_content_for_unknown_reversed_card() {
        let t0 = Instant::now();
        let mut popup = popup();
        popup.show(DisplayedCard::new("Custom Card", true), t0);
        let content = popup.content().unwrap();
        assert_eq!(content.interpretation, GENERIC_REVERSED);
        assert!(content.number.is_none() && content.arcana.is_none() && content.suit.is_none());
    }

    #[test]
    fn test_missing_image_uses_default_path() {
        let t0 = Instant::now();
        let mut popup = CardPopup::with_deck(config(), deck()).probe(NoImages);
        popup.show(DisplayedCard::new("The Magician", false), t0);
        let image = &popup.content().unwrap().image;
        assert!(image.fell_back());
        assert_eq!(image.path, PathBuf::from(crate::config::DEFAULT_IMAGE));
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let t0 = Instant::now();
        let mut a = popup();
        let b = popup();
        a.show(fool(), t0);
        assert!(a.is_popup_visible());
        assert!(!b.is_popup_visible());
        assert!(b.content().is_none());
    }

    struct GatedSource {
        gate: Mutex<Receiver<()>>,
        calls: AtomicUsize,
    }

    impl ReferenceSource for GatedSource {
        fn fetch(&self) -> Result<ReferenceDeck> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.gate.lock().unwrap().recv();
            Ok(deck())
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    fn gated() -> (Arc<GatedSource>, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let source = Arc::new(GatedSource {
            gate: Mutex::new(rx),
            calls: AtomicUsize::new(0),
        });
        (source, tx)
    }

    fn tick_until_visible(popup: &mut CardPopup) -> bool {
        for _ in 0..500 {
            popup.tick(Instant::now());
            if popup.is_popup_visible() {
                return true;
            }
            thread::sleep(ms(2));
        }
        false
    }

    #[test]
    fn test_shows_during_load_share_one_fetch() {
        let (source, release) = gated();
        let mut popup = CardPopup::with_source(config(), source.clone()).probe(AllImages);

        popup.show(fool(), Instant::now());
        assert!(!popup.is_popup_visible());
        assert_eq!(popup.load_status(), LoadStatus::Loading);

        popup.show(DisplayedCard::new("The Magician", true), Instant::now());
        assert_eq!(popup.pending_card().unwrap().name, "The Magician");

        release.send(()).unwrap();
        assert!(tick_until_visible(&mut popup));
        assert_eq!(popup.load_status(), LoadStatus::Loaded);
        assert_eq!(popup.content().unwrap().title, "The Magician");
        assert_eq!(popup.content().unwrap().number.as_deref(), Some("1"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_show_after_load_replaces_parked_card() {
        let (source, release) = gated();
        let mut popup = CardPopup::with_source(config(), source).probe(AllImages);
        popup.show(fool(), Instant::now());
        assert_eq!(popup.pending_card().unwrap().name, "The Fool");

        // Load finishes, but no tick has polled it yet
        release.send(()).unwrap();
        thread::sleep(ms(100));

        let t = Instant::now();
        popup.show(DisplayedCard::new("The Magician", false), t);
        assert_eq!(popup.content().unwrap().title, "The Magician");
        assert!(popup.pending_card().is_none());

        popup.tick(t + ms(10));
        assert_eq!(popup.content().unwrap().title, "The Magician");
        assert_eq!(popup.state().auto_close, Some(t + ms(3000)));
    }

    #[test]
    fn test_hide_during_load_drops_pending_card() {
        let (source, release) = gated();
        let mut popup = CardPopup::with_source(config(), source).probe(AllImages);
        popup.show(fool(), Instant::now());
        popup.hide(Instant::now());
        assert!(popup.pending_card().is_none());

        release.send(()).unwrap();
        for _ in 0..50 {
            popup.tick(Instant::now());
            thread::sleep(ms(2));
        }
        assert!(!popup.is_popup_visible());
    }

    #[test]
    fn test_failed_load_degrades_content() {
        let cfg = PopupConfig {
            data_path: PathBuf::from("/no/such/tarot-images.json"),
            ..config()
        };
        let mut popup = CardPopup::new(cfg).probe(AllImages);
        popup.show(fool(), Instant::now());
        assert!(tick_until_visible(&mut popup));
        assert_eq!(popup.load_status(), LoadStatus::Failed);
        let content = popup.content().unwrap();
        assert!(!content.has_reference());
        assert_eq!(content.interpretation, "勇敢踏上新的旅程，相信直觉的指引。");
    }
}
