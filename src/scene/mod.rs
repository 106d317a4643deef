//! Scene orchestrator.
//!
//! Owns every entity snapshot, the cat state, the drag controller, the wash
//! minigame and all deferred work. Each tick runs timers, then the cat
//! behavior (unless loading or dragging); drawing is a separate pass in a
//! fixed paint order. Entities are only ever replaced wholesale.

pub mod clock;
pub mod events;
pub mod timers;

use std::sync::Arc;

use glam::Vec2;

pub use clock::SceneClock;
pub use events::SceneEvent;
pub use timers::{TimerId, Timers};

use crate::assets::{AssetError, Bitmap, LoadedAssets};
use crate::cat::behavior::{update_cat, RandomSource};
use crate::cat::{self, CatAnimation, CatSprite, CatState, BASE_POSE};
use crate::config::WASH_COMPLETE_DELAY;
use crate::input::{CanvasViewport, DragController, DragEvent};
use crate::render::Canvas;
use crate::sprite::{AnimatedSprite, AnimationKey, Bounds, StaticSprite};
use crate::tub::{self, TubAnimation, TubSprite};
use crate::wash::{TraceOutcome, WashInput, WashMinigame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Required assets failed; the scene stays here for good.
    Stalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SceneTimer {
    WashComplete,
}

struct World {
    statics: Vec<StaticSprite>,
    cat: CatSprite,
    tub: TubSprite,
    wash_sheet: Option<Arc<Bitmap>>,
}

pub struct Scene<R: RandomSource = fastrand::Rng> {
    load: LoadState,
    world: Option<World>,
    cat_state: CatState,
    /// Simulation time `cat_state` was entered.
    state_since: f64,
    clock: SceneClock,
    drag: DragController,
    wash: Option<WashMinigame>,
    wash_timer: Option<TimerId>,
    timers: Timers<SceneTimer>,
    events: Vec<SceneEvent>,
    rng: R,
    torn_down: bool,
    tick_count: u64,
}

impl<R: RandomSource> Scene<R> {
    pub fn new(rng: R) -> Self {
        Self {
            load: LoadState::Loading,
            world: None,
            cat_state: CatState::WalkingToSpot,
            state_since: 0.0,
            clock: SceneClock::default(),
            drag: DragController::default(),
            wash: None,
            wash_timer: None,
            timers: Timers::default(),
            events: Vec::new(),
            rng,
            torn_down: false,
            tick_count: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub fn on_assets_loaded(&mut self, result: Result<LoadedAssets, AssetError>) {
        if self.torn_down || self.load != LoadState::Loading {
            log::debug!("Ignoring asset result for inactive scene");
            return;
        }
        match result {
            Ok(assets) => {
                let now = self.clock.now();
                let cat = CatSprite {
                    last_frame_time: now,
                    ..assets.cat
                };
                self.world = Some(World {
                    statics: assets.static_sprites,
                    cat,
                    tub: assets.tub,
                    wash_sheet: assets.wash_sheet,
                });
                self.cat_state = CatState::WalkingToSpot;
                self.state_since = now;
                self.load = LoadState::Ready;
                self.events.push(SceneEvent::GameReady);
                log::info!("Scene ready, cat walking in");
            }
            Err(e) => {
                self.load = LoadState::Stalled;
                log::error!("Failed to load scene assets: {e}");
                let mut source = std::error::Error::source(&e);
                while let Some(cause) = source {
                    log::error!("  caused by: {cause}");
                    source = std::error::Error::source(cause);
                }
            }
        }
    }

    /// Revoke everything: pending timers, the drag session, the minigame.
    /// Afterwards every entry point is a no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.timers.cancel_all();
        self.wash_timer = None;
        self.drag.pointer_up();
        self.wash = None;
        log::info!("Scene torn down after {} ticks", self.tick_count);
    }

    // -----------------------------------------------------------------------
    // Update / draw
    // -----------------------------------------------------------------------

    /// One frame at wall-clock time `real_now` (ms).
    pub fn tick(&mut self, real_now: f64) {
        if self.torn_down {
            return;
        }
        self.clock.advance(real_now);
        self.tick_count += 1;
        let now = self.clock.now();

        for timer in self.timers.drain_due(now) {
            match timer {
                SceneTimer::WashComplete => {
                    self.wash_timer = None;
                    self.finish_wash();
                }
            }
        }

        if self.load != LoadState::Ready
            || self.drag.is_dragging()
            || self.cat_state.is_externally_driven()
        {
            return;
        }
        let Some(world) = self.world.as_mut() else {
            return;
        };

        if let Some(step) = update_cat(&world.cat, self.cat_state, self.state_since, now, &mut self.rng) {
            if step.state != self.cat_state {
                log::debug!("Cat: {} -> {}", self.cat_state.label(), step.state.label());
            }
            world.cat = step.cat;
            self.cat_state = step.state;
            self.state_since = step.state_since;
        }

        if self.cat_state == CatState::WalkingAway && world.cat.bounds().max().x < 0.0 {
            world.cat = cat::respawn(&world.cat, now);
            self.cat_state = CatState::WalkingToSpot;
            self.state_since = now;
            log::info!("Cat left the room, walking back in");
        }
    }

    /// Paint the frame: decorations, then tub and cat, with the cat under
    /// the tub rim while it sits in the tub.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.clear();
        let Some(world) = &self.world else {
            return;
        };

        for sprite in &world.statics {
            canvas.draw_image(&sprite.image, sprite.source(), round(sprite.bounds()));
        }

        if self.cat_state == CatState::InTub {
            draw_animated(canvas, &world.cat);
            draw_animated(canvas, &world.tub);
        } else {
            draw_animated(canvas, &world.tub);
            draw_animated(canvas, &world.cat);
        }
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    pub fn set_viewport(&mut self, viewport: CanvasViewport) {
        self.drag.set_viewport(viewport);
    }

    /// Whether a press on the cat would pick it up now.
    pub fn can_drag(&self) -> bool {
        self.load == LoadState::Ready
            && self.wash.is_none()
            && !self.torn_down
            && self.cat_state.is_grabbable()
    }

    /// Press at window position `client`. Returns whether a drag started.
    pub fn pointer_down(&mut self, client: Vec2) -> bool {
        let permitted = self.can_drag();
        let state = self.cat_state;
        let Some(world) = self.world.as_mut() else {
            return false;
        };
        let Some(DragEvent::Start { offset }) =
            self.drag.pointer_down(client, world.cat.bounds(), || permitted)
        else {
            return false;
        };

        let now = self.clock.now();
        if state == CatState::InTub {
            world.tub = world.tub.with_animation(TubAnimation::Empty, now);
        }
        world.cat = world.cat.with_animation(CatAnimation::Carried, now);
        self.cat_state = CatState::Dragged;
        self.state_since = now;
        log::debug!("Picked up cat at offset ({:.0}, {:.0})", offset.x, offset.y);
        true
    }

    pub fn pointer_move(&mut self, client: Vec2) {
        if let (Some(DragEvent::Move { pos }), Some(world)) =
            (self.drag.pointer_move(client), self.world.as_mut())
        {
            world.cat = world.cat.with_position(pos);
        }
    }

    /// Release anywhere. Ends the drag, if any, exactly once.
    pub fn pointer_up(&mut self) {
        if self.drag.pointer_up() == Some(DragEvent::End) {
            self.drop_cat();
        }
    }

    fn drop_cat(&mut self) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        let now = self.clock.now();
        if tub::holds(&world.tub, world.cat.bounds()) {
            let seat = tub::seat(&world.tub, world.cat.size);
            world.cat = world.cat.with_animation(CatAnimation::InTub, now).with_position(seat);
            world.tub = world.tub.with_animation(TubAnimation::Filled, now);
            self.cat_state = CatState::InTub;
            self.events.push(SceneEvent::WashAvailable);
            log::info!("Cat dropped in the tub");
        } else {
            world.cat = world
                .cat
                .with_animation(BASE_POSE, now)
                .with_position(cat::sitting_spot());
            self.cat_state = CatState::SittingAtSpot;
            log::debug!("Cat dropped outside the tub, back to its spot");
        }
        self.state_since = now;
    }

    // -----------------------------------------------------------------------
    // Wash
    // -----------------------------------------------------------------------

    pub fn wash_available(&self) -> bool {
        self.load == LoadState::Ready
            && !self.torn_down
            && self.wash.is_none()
            && self.cat_state == CatState::InTub
    }

    /// Open the minigame if the cat is waiting in the tub.
    pub fn open_wash(&mut self) -> bool {
        if !self.wash_available() {
            return false;
        }
        self.wash = Some(WashMinigame::new());
        log::info!("Wash started");
        true
    }

    pub fn wash_input(&mut self, input: WashInput) {
        let Some(wash) = self.wash.as_mut() else {
            return;
        };
        match wash.handle(input) {
            TraceOutcome::Ignored | TraceOutcome::Hit => {}
            TraceOutcome::PartComplete(part) => {
                log::info!("Wash: {} clean, next {}", part.label(), wash.game().current_part().label());
            }
            TraceOutcome::GameComplete => {
                log::info!("Wash: cat is clean");
                let due = self.clock.now() + WASH_COMPLETE_DELAY;
                self.wash_timer = self.timers.schedule(due, SceneTimer::WashComplete);
            }
        }
    }

    /// Dismiss the minigame. A finished wash completes right away; an
    /// unfinished one reports `WashClosed` and leaves the cat in the tub.
    pub fn close_wash(&mut self) {
        let Some(wash) = &self.wash else {
            return;
        };
        if wash.game().is_complete() {
            if let Some(id) = self.wash_timer.take() {
                self.timers.cancel(id);
            }
            self.finish_wash();
        } else {
            self.wash = None;
            self.events.push(SceneEvent::WashClosed);
            log::info!("Wash closed early");
        }
    }

    fn finish_wash(&mut self) {
        let finished = self.wash.as_ref().is_some_and(|w| w.game().is_complete());
        if !finished {
            return;
        }
        self.wash = None;
        let Some(world) = self.world.as_mut() else {
            return;
        };
        let now = self.clock.now();
        world.tub = world.tub.with_animation(TubAnimation::Empty, now);
        world.cat = world.cat.with_animation(CatAnimation::WalkLeft, now);
        self.cat_state = CatState::WalkingAway;
        self.state_since = now;
        self.events.push(SceneEvent::WashComplete);
        log::info!("Wash complete, cat walking away");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load != LoadState::Ready
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn cat_state(&self) -> CatState {
        self.cat_state
    }

    pub fn cat(&self) -> Option<&CatSprite> {
        self.world.as_ref().map(|w| &w.cat)
    }

    pub fn tub(&self) -> Option<&TubSprite> {
        self.world.as_ref().map(|w| &w.tub)
    }

    pub fn wash(&self) -> Option<&WashMinigame> {
        self.wash.as_ref()
    }

    pub fn wash_sheet(&self) -> Option<&Arc<Bitmap>> {
        self.world.as_ref().and_then(|w| w.wash_sheet.as_ref())
    }

    /// Simulation time (ms).
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}

/// Out-of-range frames draw nothing.
fn draw_animated<K: AnimationKey>(canvas: &mut impl Canvas, sprite: &AnimatedSprite<K>) {
    if let Some(frame) = sprite.current_frame() {
        canvas.draw_image(&sprite.image, frame, round(sprite.bounds()));
    }
}

fn round(bounds: Bounds) -> Bounds {
    Bounds::new(bounds.min.round(), bounds.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::load_game_assets;
    use crate::assets::testing::{loaded, MemorySource};
    use crate::config::{CAT_TARGET_X, MAX_DELTA_TIME, TUB_DEFAULT_X, TUB_DEFAULT_Y};
    use crate::render::SpriteBatch;
    use crate::sprite::SpriteFrame;
    use crate::wash::testing::finishing_cells;
    use crate::wash::BodyPart;

    const TICK: f64 = 16.0;

    /// A scene plus the wall clock driving it.
    struct Harness {
        scene: Scene,
        real: f64,
    }

    impl Harness {
        fn loading() -> Self {
            Self {
                scene: Scene::new(fastrand::Rng::with_seed(11)),
                real: 0.0,
            }
        }

        fn ready() -> Self {
            let mut h = Self::loading();
            h.scene.on_assets_loaded(Ok(loaded()));
            h.scene.drain_events();
            h
        }

        fn step(&mut self, ticks: usize) {
            for _ in 0..ticks {
                self.real += TICK;
                self.scene.tick(self.real);
            }
        }

        /// Ready scene with the cat sitting at its spot.
        fn sitting() -> Self {
            let mut h = Self::ready();
            h.step(52);
            assert_eq!(h.scene.cat_state(), CatState::SittingAtSpot);
            h
        }

        fn cat(&self) -> &CatSprite {
            self.scene.cat().unwrap()
        }

        fn cat_center(&self) -> Vec2 {
            self.cat().bounds().center()
        }

        /// Sitting cat carried into the tub.
        fn in_tub() -> Self {
            let mut h = Self::sitting();
            let grab = h.cat_center();
            assert!(h.scene.pointer_down(grab));
            h.scene.pointer_move(Vec2::new(400.0, 300.0));
            h.scene.pointer_up();
            assert_eq!(h.scene.cat_state(), CatState::InTub);
            h.scene.drain_events();
            h
        }

        fn wash_part(&mut self, part: BodyPart) {
            let cells = finishing_cells(part);
            self.scene.wash_input(WashInput::Down(cells[0]));
            for p in cells {
                self.scene.wash_input(WashInput::Move(p));
            }
            self.scene.wash_input(WashInput::Up);
        }

        fn wash_everything(&mut self) {
            assert!(self.scene.open_wash());
            for part in BodyPart::SEQUENCE {
                self.wash_part(part);
            }
            assert!(self.scene.wash().unwrap().game().is_complete());
        }
    }

    fn drawn(scene: &Scene) -> SpriteBatch {
        let mut batch = SpriteBatch::new();
        scene.draw(&mut batch);
        batch
    }

    #[test]
    fn loading_scene_draws_nothing_and_refuses_drag() {
        let mut h = Harness::loading();
        h.step(10);
        let mut batch = SpriteBatch::new();
        let stale = Arc::new(Bitmap::blank(1, 1));
        batch.draw_image(&stale, SpriteFrame::cell(0, 0, 1), Bounds::new(Vec2::ZERO, Vec2::ONE));
        h.scene.draw(&mut batch);
        assert!(batch.commands().is_empty());
        assert!(!h.scene.can_drag());
        assert!(!h.scene.pointer_down(Vec2::new(800.0, 40.0)));
        assert!(h.scene.drain_events().is_empty());
    }

    #[test]
    fn ready_scene_announces_itself() {
        let mut h = Harness::loading();
        h.scene.on_assets_loaded(Ok(loaded()));
        assert_eq!(h.scene.load_state(), LoadState::Ready);
        assert_eq!(h.scene.drain_events(), vec![SceneEvent::GameReady]);
        assert!(h.scene.drain_events().is_empty());
    }

    #[test]
    fn failed_load_stalls_for_good() {
        let mut h = Harness::loading();
        let err = load_game_assets(&MemorySource::empty()).unwrap_err();
        h.scene.on_assets_loaded(Err(err));
        assert_eq!(h.scene.load_state(), LoadState::Stalled);
        assert!(h.scene.is_loading());

        // A late success does not revive it.
        h.scene.on_assets_loaded(Ok(loaded()));
        h.step(5);
        assert_eq!(h.scene.load_state(), LoadState::Stalled);
        assert!(drawn(&h.scene).commands().is_empty());
        assert!(h.scene.drain_events().is_empty());
    }

    #[test]
    fn cat_walks_in_and_sits_after_52_ticks() {
        let mut h = Harness::ready();
        h.step(51);
        assert_eq!(h.scene.cat_state(), CatState::WalkingToSpot);
        assert_eq!(h.cat().pos.x, 698.0);
        h.step(1);
        assert_eq!(h.scene.cat_state(), CatState::SittingAtSpot);
        assert_eq!(h.cat().pos, cat::sitting_spot());
        assert_eq!(h.cat().animation, CatAnimation::SitBlink);
        assert_eq!(h.cat().frame, 0);
    }

    #[test]
    fn walking_cat_cannot_be_grabbed() {
        let mut h = Harness::ready();
        h.step(10);
        let center = h.cat_center();
        assert!(!h.scene.pointer_down(center));
        assert_eq!(h.scene.cat_state(), CatState::WalkingToSpot);
    }

    #[test]
    fn paint_order_flips_when_cat_is_in_tub() {
        let source = MemorySource::complete().with("sprites/background.png", 800, 600);
        let mut h = Harness::loading();
        h.scene.on_assets_loaded(load_game_assets(&source));
        h.step(52);

        let keys = |scene: &Scene| -> Vec<_> {
            drawn(scene).commands().iter().map(|c| c.image.key).collect()
        };
        let cat_key = h.cat().image.key;
        let tub_key = h.scene.tub().unwrap().image.key;

        let outside = keys(&h.scene);
        assert_eq!(outside.len(), 3);
        assert_eq!(&outside[1..], &[tub_key, cat_key]);

        let grab = h.cat_center();
        h.scene.pointer_down(grab);
        h.scene.pointer_move(Vec2::new(400.0, 300.0));
        h.scene.pointer_up();
        let inside = keys(&h.scene);
        assert_eq!(&inside[1..], &[cat_key, tub_key]);
        assert_eq!(inside[0], outside[0]);
    }

    #[test]
    fn positions_are_rounded_when_drawn() {
        let mut h = Harness::sitting();
        let grab = h.cat_center();
        h.scene.pointer_down(grab);
        h.scene.pointer_move(grab + Vec2::new(-100.3, 20.6));
        let batch = drawn(&h.scene);
        let cat = batch.commands().last().unwrap();
        assert_eq!(cat.dest.min, Vec2::new(596.0, 53.0));
    }

    #[test]
    fn out_of_range_frame_is_skipped() {
        let mut h = Harness::ready();
        if let Some(world) = h.scene.world.as_mut() {
            world.cat = CatSprite {
                frame: 99,
                ..world.cat.clone()
            };
        }
        let batch = drawn(&h.scene);
        assert_eq!(batch.commands().len(), 1);
        assert_eq!(batch.commands()[0].image.key, h.scene.tub().unwrap().image.key);
    }

    #[test]
    fn dragging_suspends_behavior() {
        let mut h = Harness::sitting();
        let grab = h.cat_center();
        assert!(h.scene.pointer_down(grab));
        assert_eq!(h.scene.cat_state(), CatState::Dragged);
        assert_eq!(h.cat().animation, CatAnimation::Carried);

        h.scene.pointer_move(grab + Vec2::new(-200.0, 100.0));
        let held = h.cat().clone();
        h.step(300);
        assert_eq!(h.cat().pos, held.pos);
        assert_eq!(h.cat().animation, CatAnimation::Carried);
        assert_eq!(h.scene.cat_state(), CatState::Dragged);
    }

    #[test]
    fn second_press_during_drag_is_ignored() {
        let mut h = Harness::sitting();
        let grab = h.cat_center();
        assert!(h.scene.pointer_down(grab));
        assert!(!h.scene.pointer_down(grab));
        h.scene.pointer_up();
        h.scene.pointer_up();
        assert!(!h.scene.is_dragging());
        assert_eq!(h.scene.cat_state(), CatState::SittingAtSpot);
    }

    #[test]
    fn drop_in_tub_fills_it_and_offers_wash() {
        let mut h = Harness::sitting();
        let grab = h.cat_center();
        h.scene.pointer_down(grab);
        h.scene.pointer_move(Vec2::new(390.0, 310.0));
        h.scene.pointer_up();

        assert_eq!(h.scene.cat_state(), CatState::InTub);
        assert_eq!(h.cat().pos, Vec2::new(TUB_DEFAULT_X, TUB_DEFAULT_Y));
        assert_eq!(h.cat().animation, CatAnimation::InTub);
        assert_eq!(h.scene.tub().unwrap().animation, TubAnimation::Filled);
        assert_eq!(h.scene.drain_events(), vec![SceneEvent::WashAvailable]);
        assert!(h.scene.wash_available());

        // The tub holds the cat still.
        let before = h.cat().clone();
        h.step(200);
        assert_eq!(h.cat().pos, before.pos);
        assert_eq!(h.cat().frame, before.frame);
        assert_eq!(h.cat().last_frame_time, before.last_frame_time);
        assert_eq!(h.scene.cat_state(), CatState::InTub);
    }

    #[test]
    fn drop_elsewhere_returns_cat_to_spot() {
        let mut h = Harness::sitting();
        let grab = h.cat_center();
        h.scene.pointer_down(grab);
        h.scene.pointer_move(Vec2::new(120.0, 500.0));
        h.scene.pointer_up();
        assert_eq!(h.scene.cat_state(), CatState::SittingAtSpot);
        assert_eq!(h.cat().pos, cat::sitting_spot());
        assert_eq!(h.cat().animation, BASE_POSE);
        assert!(h.scene.drain_events().is_empty());
    }

    #[test]
    fn lifting_cat_out_empties_tub() {
        let mut h = Harness::in_tub();
        let grab = h.cat_center();
        assert!(h.scene.pointer_down(grab));
        assert_eq!(h.scene.tub().unwrap().animation, TubAnimation::Empty);
        h.scene.pointer_move(Vec2::new(100.0, 100.0));
        h.scene.pointer_up();
        assert_eq!(h.scene.cat_state(), CatState::SittingAtSpot);
        assert_eq!(h.cat().pos.x, CAT_TARGET_X);
        assert!(!h.scene.wash_available());
    }

    #[test]
    fn open_wash_blocks_drag() {
        let mut h = Harness::in_tub();
        assert!(h.scene.open_wash());
        assert!(!h.scene.wash_available());
        assert!(!h.scene.open_wash());
        let grab = h.cat_center();
        assert!(!h.scene.pointer_down(grab));
    }

    #[test]
    fn wash_needs_cat_in_tub() {
        let mut h = Harness::sitting();
        assert!(!h.scene.open_wash());
        assert!(h.scene.wash().is_none());
    }

    #[test]
    fn completed_wash_sends_cat_away_after_delay() {
        let mut h = Harness::in_tub();
        h.wash_everything();
        assert_eq!(h.scene.pending_timers(), 1);

        // 496ms later nothing has happened yet.
        h.step(31);
        assert!(h.scene.drain_events().is_empty());
        assert!(h.scene.wash().is_some());

        h.step(1);
        assert_eq!(h.scene.drain_events(), vec![SceneEvent::WashComplete]);
        assert!(h.scene.wash().is_none());
        assert_eq!(h.scene.cat_state(), CatState::WalkingAway);
        assert_eq!(h.cat().animation, CatAnimation::WalkLeft);
        assert_eq!(h.scene.tub().unwrap().animation, TubAnimation::Empty);
    }

    #[test]
    fn closing_finished_wash_completes_at_once() {
        let mut h = Harness::in_tub();
        h.wash_everything();
        h.scene.close_wash();
        assert_eq!(h.scene.drain_events(), vec![SceneEvent::WashComplete]);
        assert_eq!(h.scene.pending_timers(), 0);
        h.step(100);
        assert!(h.scene.drain_events().is_empty());
    }

    #[test]
    fn closing_early_keeps_cat_in_tub() {
        let mut h = Harness::in_tub();
        assert!(h.scene.open_wash());
        h.wash_part(BodyPart::Head);
        h.scene.close_wash();
        assert_eq!(h.scene.drain_events(), vec![SceneEvent::WashClosed]);
        assert_eq!(h.scene.cat_state(), CatState::InTub);
        assert!(h.scene.wash_available());

        // Reopening starts over.
        assert!(h.scene.open_wash());
        assert_eq!(h.scene.wash().unwrap().game().current_part(), BodyPart::Head);
    }

    #[test]
    fn cat_walks_off_and_comes_back() {
        let mut h = Harness::in_tub();
        h.wash_everything();
        h.scene.close_wash();

        // From x=352 at 2px per tick the right edge clears x=0 after 225 ticks.
        h.step(224);
        assert_eq!(h.scene.cat_state(), CatState::WalkingAway);
        h.step(1);
        assert_eq!(h.scene.cat_state(), CatState::WalkingToSpot);
        assert_eq!(h.cat().pos, cat::spawn_point());
        assert_eq!(h.cat().animation, CatAnimation::WalkLeft);
    }

    #[test]
    fn teardown_revokes_pending_completion() {
        let mut h = Harness::in_tub();
        h.wash_everything();
        h.scene.teardown();
        assert_eq!(h.scene.pending_timers(), 0);
        assert!(h.scene.wash().is_none());

        let ticks = h.scene.tick_count();
        h.step(100);
        assert_eq!(h.scene.tick_count(), ticks);
        assert!(h.scene.drain_events().is_empty());
        assert_eq!(h.scene.cat_state(), CatState::InTub);
        assert!(!h.scene.open_wash());
        assert!(!h.scene.pointer_down(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn teardown_mid_drag_releases_it() {
        let mut h = Harness::sitting();
        let grab = h.cat_center();
        h.scene.pointer_down(grab);
        h.scene.teardown();
        assert!(!h.scene.is_dragging());
    }

    #[test]
    fn stalled_window_advances_at_most_max_delta() {
        let mut h = Harness::ready();
        h.step(1);
        let before = h.scene.now();
        h.real += 60_000.0;
        h.scene.tick(h.real);
        assert_eq!(h.scene.now() - before, MAX_DELTA_TIME);
    }
}
