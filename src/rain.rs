// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng};

use crate::config::RainConfig;
use crate::item::{FallingItem, ItemId, ItemKind, MAX_LEFT_PCT};
use crate::layout::{Point, Viewport};
use crate::timer::{catch_up_for, Interval};

pub const REPEL_RADIUS: f64 = 150.0;
pub const REPEL_MAX_OFFSET: f64 = 50.0;

// `active_items` always equals `items.len()` and never exceeds `max_items`.
pub struct RainEngine {
    cfg: RainConfig,
    rng: StdRng,
    raining: bool,
    spawn_timer: Option<Interval>,
    items: Vec<FallingItem>,
    active_items: usize,
    next_id: u64,
}

impl RainEngine {
    pub fn new(cfg: RainConfig, rng: StdRng) -> Self {
        Self {
            cfg,
            rng,
            raining: false,
            spawn_timer: None,
            items: Vec::new(),
            active_items: 0,
            next_id: 1,
        }
    }

    pub fn is_raining(&self) -> bool {
        self.raining
    }

    // oldest first, so newer items are drawn on top
    pub fn items(&self) -> &[FallingItem] {
        &self.items
    }

    pub fn start(&mut self, now: Instant) -> bool {
        if self.raining {
            return false;
        }
        self.raining = true;
        let catch_up = catch_up_for(self.cfg.spawn_interval, self.cfg.frame_period);
        self.spawn_timer =
            Some(Interval::new(self.cfg.spawn_interval, now).with_catch_up(catch_up));
        true
    }

    pub fn stop(&mut self) {
        self.spawn_timer = None;
        self.items.clear();
        self.active_items = 0;
        self.raining = false;
    }

    /// One spawn attempt. At the cap the attempt is dropped, not queued.
    pub fn try_spawn(&mut self, now: Instant) -> Option<ItemId> {
        if self.active_items >= self.cfg.max_items {
            return None;
        }
        let item = self.roll_item(now);
        let id = item.id;
        self.items.push(item);
        self.active_items += 1;
        debug_assert_eq!(self.active_items, self.items.len());
        Some(id)
    }

    fn roll_item(&mut self, now: Instant) -> FallingItem {
        let kind = if self.rng.random_bool(0.5) {
            ItemKind::Heart
        } else {
            ItemKind::Word
        };
        let pool = match kind {
            ItemKind::Heart => &self.cfg.hearts,
            ItemKind::Word => &self.cfg.words,
        };
        let content = if pool.is_empty() {
            String::from("♥")
        } else {
            pool[self.rng.random_range(0..pool.len())].clone()
        };
        let size = self.rng.random_range(kind.size_range());
        let left_pct = self.rng.random_range(0.0..MAX_LEFT_PCT);

        let (lo, hi) = (
            self.cfg.min_fall.as_secs_f64(),
            self.cfg.max_fall.as_secs_f64(),
        );
        let fall = Duration::from_secs_f64(self.rng.random_range(lo.min(hi)..=hi.max(lo)));

        let id = ItemId(self.next_id);
        self.next_id += 1;
        FallingItem::new(id, kind, content, size, left_pct, fall, now)
    }

    /// Removes a live item. Ids that are already gone (landed, or cleared by
    /// `stop`) are ignored and leave the counter untouched.
    pub fn despawn(&mut self, id: ItemId) -> bool {
        let Some(pos) = self.items.iter().position(|it| it.id == id) else {
            return false;
        };
        self.items.remove(pos);
        self.active_items -= 1;
        debug_assert_eq!(self.active_items, self.items.len());
        true
    }

    pub fn tick(&mut self, now: Instant) -> Vec<ItemId> {
        let due = match self.spawn_timer.as_mut() {
            Some(timer) => timer.poll(now),
            None => Vec::new(),
        };
        let spawned = due
            .into_iter()
            .filter_map(|at| self.try_spawn(at))
            .collect();

        let landed: Vec<ItemId> = self
            .items
            .iter()
            .filter(|it| it.is_finished(now))
            .map(|it| it.id)
            .collect();
        for id in landed {
            self.despawn(id);
        }
        spawned
    }

    pub fn toggle_glow_at(&mut self, viewport: Viewport, now: Instant, p: Point) -> Option<ItemId> {
        let item = self
            .items
            .iter_mut()
            .rev()
            .find(|it| it.hit_test(viewport, now, p))?;
        item.glow = !item.glow;
        Some(item.id)
    }

    /// Offsets are recomputed from scratch, never accumulated. Returns how
    /// many items were evaluated.
    pub fn repel(&mut self, viewport: Viewport, now: Instant, p: Point) -> usize {
        if self.active_items == 0 {
            return 0;
        }
        for it in &mut self.items {
            let c = it.base_center(viewport, now);
            it.offset = repel_offset(p, c);
        }
        self.items.len()
    }
}

pub fn repel_offset(pointer: Point, item: Point) -> Point {
    let dx = item.x - pointer.x;
    let dy = item.y - pointer.y;
    let dist = dx.hypot(dy);
    if dist >= REPEL_RADIUS {
        return Point::new(0.0, 0.0);
    }
    let angle = dy.atan2(dx);
    let force = (REPEL_RADIUS - dist) / REPEL_RADIUS;
    Point::new(
        angle.cos() * force * REPEL_MAX_OFFSET,
        angle.sin() * force * REPEL_MAX_OFFSET,
    )
}

#[cfg(test)]
impl RainEngine {
    pub fn active_items(&self) -> usize {
        self.active_items
    }

    pub fn max_items(&self) -> usize {
        self.cfg.max_items
    }

    pub fn item(&self, id: ItemId) -> Option<&FallingItem> {
        self.items.iter().find(|it| it.id == id)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn engine(max_items: usize) -> RainEngine {
        let cfg = RainConfig {
            max_items,
            ..RainConfig::default()
        };
        RainEngine::new(cfg, StdRng::seed_from_u64(0x1234567))
    }

    #[test]
    fn start_is_idempotent() {
        let t0 = Instant::now();
        let mut e = engine(50);
        assert!(e.start(t0));
        assert!(!e.start(t0 + ms(50)));
        assert!(e.is_raining());
    }

    #[test]
    fn third_spawn_at_cap_of_two_is_dropped() {
        let t0 = Instant::now();
        let mut e = engine(2);
        assert!(e.try_spawn(t0).is_some());
        assert!(e.try_spawn(t0).is_some());
        assert_eq!(e.try_spawn(t0), None);
        assert_eq!(e.active_items(), 2);
        assert_eq!(e.items().len(), 2);
    }

    #[test]
    fn timer_spawns_every_interval_until_the_cap() {
        let t0 = Instant::now();
        let mut e = engine(3);
        e.start(t0);

        assert!(e.tick(t0 + ms(199)).is_empty());
        assert_eq!(e.tick(t0 + ms(200)).len(), 1);
        assert_eq!(e.tick(t0 + ms(600)).len(), 2);
        // the cap holds even though two more periods elapse
        assert!(e.tick(t0 + ms(1000)).is_empty());
        assert_eq!(e.active_items(), 3);
    }

    #[test]
    fn counter_tracks_live_items_through_landing() {
        let t0 = Instant::now();
        let mut e = engine(50);
        e.start(t0);
        let mut now = t0;
        for _ in 0..100 {
            now += ms(150);
            e.tick(now);
            assert_eq!(e.active_items(), e.items().len());
            assert!(e.active_items() <= e.max_items());
        }
        // all spawned with the default 3..7 s fall; none should outlive 7 s
        for it in e.items() {
            assert!(now.saturating_duration_since(it.born) < Duration::from_secs(7));
        }
    }

    #[test]
    fn landed_items_are_removed() {
        let t0 = Instant::now();
        let mut e = engine(50);
        let id = e.try_spawn(t0).unwrap();
        let fall = e.item(id).unwrap().fall;
        e.tick(t0 + fall - ms(1));
        assert_eq!(e.active_items(), 1);
        e.tick(t0 + fall);
        assert_eq!(e.active_items(), 0);
        assert!(e.item(id).is_none());
    }

    #[test]
    fn glowing_repelled_item_still_lands() {
        let t0 = Instant::now();
        let vp = Viewport::new(80, 24);
        let mut e = engine(50);
        let id = e.try_spawn(t0).unwrap();
        let fall = e.item(id).unwrap().fall;

        let now = t0 + fall / 2;
        let c = e.item(id).unwrap().base_center(vp, now);
        assert_eq!(e.toggle_glow_at(vp, now, c), Some(id));
        e.repel(vp, now, Point::new(c.x - 20.0, c.y - 20.0));
        let it = e.item(id).unwrap();
        assert!(it.glow);
        assert_ne!(it.offset, Point::new(0.0, 0.0));

        e.tick(t0 + fall);
        assert!(e.item(id).is_none());
        assert_eq!(e.active_items(), 0);
    }

    #[test]
    fn slow_frames_still_spawn_every_interval() {
        let t0 = Instant::now();
        let cfg = RainConfig {
            frame_period: Duration::from_secs(1),
            ..RainConfig::default()
        };
        let mut e = RainEngine::new(cfg, StdRng::seed_from_u64(5));
        e.start(t0);
        let mut spawned = 0;
        for s in 1..=3 {
            spawned += e.tick(t0 + Duration::from_secs(s)).len();
        }
        // periods due at 200 ms .. 3000 ms; the earliest lands no sooner than 3.2 s
        assert_eq!(spawned, 15);
        assert_eq!(e.active_items(), 15);
    }

    #[test]
    fn stop_clears_everything_and_late_despawn_is_a_noop() {
        let t0 = Instant::now();
        let mut e = engine(50);
        e.start(t0);
        let a = e.try_spawn(t0).unwrap();
        e.try_spawn(t0).unwrap();

        e.stop();
        assert_eq!(e.active_items(), 0);
        assert!(e.items().is_empty());
        assert!(!e.is_raining());

        assert!(!e.despawn(a));
        assert_eq!(e.active_items(), 0);

        // timer is gone: nothing spawns until restarted
        assert!(e.tick(t0 + ms(5000)).is_empty());
        assert!(e.start(t0 + ms(5000)));
    }

    #[test]
    fn despawn_twice_only_counts_once() {
        let t0 = Instant::now();
        let mut e = engine(50);
        let a = e.try_spawn(t0).unwrap();
        e.try_spawn(t0).unwrap();
        assert!(e.despawn(a));
        assert!(!e.despawn(a));
        assert_eq!(e.active_items(), 1);
    }

    #[test]
    fn rolled_items_stay_in_range() {
        let t0 = Instant::now();
        let mut e = engine(5000);
        let (mut hearts, mut words) = (0, 0);
        for _ in 0..2000 {
            e.try_spawn(t0);
        }
        for it in e.items() {
            assert!(it.left_pct >= 0.0 && it.left_pct < 90.0);
            assert!(it.fall >= Duration::from_secs(3) && it.fall <= Duration::from_secs(7));
            assert!(it.kind.size_range().contains(&it.size));
            match it.kind {
                ItemKind::Heart => {
                    hearts += 1;
                    assert!(crate::config::DEFAULT_HEARTS.contains(&it.content.as_str()));
                }
                ItemKind::Word => {
                    words += 1;
                    assert!(crate::config::DEFAULT_WORDS.contains(&it.content.as_str()));
                }
            }
        }
        assert!(hearts > 800 && words > 800);
    }

    #[test]
    fn ids_are_never_reused() {
        let t0 = Instant::now();
        let mut e = engine(1);
        let a = e.try_spawn(t0).unwrap();
        e.stop();
        let b = e.try_spawn(t0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn two_clicks_restore_glow() {
        let t0 = Instant::now();
        let vp = Viewport::new(80, 24);
        let mut e = engine(50);
        let id = e.try_spawn(t0).unwrap();
        let now = t0 + ms(1000);
        let c = e.item(id).unwrap().base_center(vp, now);

        assert_eq!(e.toggle_glow_at(vp, now, c), Some(id));
        assert!(e.item(id).unwrap().glow);
        assert_eq!(e.toggle_glow_at(vp, now, c), Some(id));
        assert!(!e.item(id).unwrap().glow);
    }

    #[test]
    fn click_on_empty_space_hits_nothing() {
        let t0 = Instant::now();
        let vp = Viewport::new(80, 24);
        let mut e = engine(50);
        assert_eq!(e.toggle_glow_at(vp, t0, Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn repel_fast_path_with_no_items() {
        let t0 = Instant::now();
        let vp = Viewport::new(80, 24);
        let mut e = engine(50);
        e.start(t0);
        assert_eq!(e.repel(vp, t0, Point::new(100.0, 100.0)), 0);
    }

    #[test]
    fn repel_pushes_near_items_and_resets_far_ones() {
        let t0 = Instant::now();
        let vp = Viewport::new(80, 24);
        let mut e = engine(50);
        let id = e.try_spawn(t0).unwrap();
        let now = t0 + ms(500);
        let c = e.item(id).unwrap().base_center(vp, now);

        let pointer = Point::new(c.x - 30.0, c.y);
        assert_eq!(e.repel(vp, now, pointer), 1);
        let off = e.item(id).unwrap().offset;
        assert!(off.x > 0.0);
        assert!(off.y.abs() < 1e-9);

        // recomputed, not accumulated
        e.repel(vp, now, pointer);
        assert_eq!(e.item(id).unwrap().offset, off);

        e.repel(vp, now, Point::new(c.x + 500.0, c.y + 500.0));
        assert_eq!(e.item(id).unwrap().offset, Point::new(0.0, 0.0));
    }

    #[test]
    fn repel_offset_scales_with_distance() {
        let p = Point::new(0.0, 0.0);
        let at_zero_force = repel_offset(p, Point::new(REPEL_RADIUS, 0.0));
        assert_eq!(at_zero_force, Point::new(0.0, 0.0));

        let half = repel_offset(p, Point::new(0.0, REPEL_RADIUS / 2.0));
        assert!(half.x.abs() < 1e-9);
        assert!((half.y - REPEL_MAX_OFFSET / 2.0).abs() < 1e-9);
    }
}
