use glam::Vec2;
use instant::Instant;

use reefpop::config::{ConfigError, GameConfig};
use reefpop::ecs::components::EntityKind;
use reefpop::entity;
use reefpop::session::{Session, SessionEvent};
use reefpop::util::rand::RandomSource;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// Simulated session length (seconds).
const RUN_SECONDS: f64 = 180.0;
/// How often to log stats (simulated seconds).
const STATS_LOG_INTERVAL: f64 = 10.0;
/// Chance the scripted player aims at a fish instead of clicking blindly.
const PLAYER_AIM: f32 = 0.8;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    frames_since_log: u32,
    sim_since_log: f64,
    wall_since_log: Instant,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            frames_since_log: 0,
            sim_since_log: 0.0,
            wall_since_log: Instant::now(),
        }
    }

    /// Returns true when a stats line is due.
    fn record_frame(&mut self, dt: f64) -> bool {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.sim_since_log += dt;
        self.sim_since_log >= STATS_LOG_INTERVAL
    }

    fn log(&mut self, session: &Session) {
        let wall = self.wall_since_log.elapsed().as_secs_f64();
        let metrics = session.difficulty().metrics();
        log::info!(
            "t={:.0}s | entities: {} | score: {} (x{}, best x{}) | lives: {} | \
             difficulty: {:.2} -> {:.2} | accuracy: {:.0}% | spawn rate: {:.2}/s | speed x{:.2} | \
             {} frames in {:.1}ms",
            session.time(),
            session.entity_count(),
            session.score().score(),
            session.score().combo(),
            session.score().max_combo(),
            session.score().lives(),
            metrics.current,
            metrics.target,
            metrics.accuracy * 100.0,
            session.difficulty().spawn_rate(),
            session.difficulty().movement_speed_multiplier(),
            self.frames_since_log,
            wall * 1000.0,
        );
        log::debug!("Systems: {}", session.timers().summary());

        self.frames_since_log = 0;
        self.sim_since_log = 0.0;
        self.wall_since_log = Instant::now();
    }
}

// ---------------------------------------------------------------------------
// Scripted player
// ---------------------------------------------------------------------------

/// Stand-in for a human: clicks at a human-ish cadence, usually at the
/// nearest fish, sometimes blindly.
struct ScriptedPlayer {
    rng: fastrand::Rng,
    cursor: Vec2,
    next_click_in: f32,
}

impl ScriptedPlayer {
    fn new(start: Vec2) -> Self {
        let mut rng = fastrand::Rng::new();
        let next_click_in = rng.range(0.4, 0.9);
        Self {
            rng,
            cursor: start,
            next_click_in,
        }
    }

    /// Where to click this tick, if anywhere.
    fn think(&mut self, session: &Session, dt: f32) -> Option<Vec2> {
        self.next_click_in -= dt;
        if self.next_click_in > 0.0 {
            return None;
        }
        self.next_click_in = self.rng.range(0.4, 0.9);

        let viewport = session.config().viewport;
        let target = if self.rng.chance(PLAYER_AIM) {
            entity::nearest_of_kind(session.world(), EntityKind::Fish, self.cursor)
                .map(|(_, pos)| pos)
        } else {
            None
        };
        self.cursor = target.unwrap_or_else(|| {
            Vec2::new(
                self.rng.range(0.0, viewport.width),
                self.rng.range(0.0, viewport.height),
            )
        });
        Some(self.cursor)
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Headless driver: one session, fixed timestep, scripted input.
struct App {
    session: Session,
    player: ScriptedPlayer,
    rng: fastrand::Rng,

    // Fixed timestep
    accumulator: f64,
    tick_count: u64,
    sim_time: f64,

    // Frame timing
    frame_stats: FrameStats,

    games_played: u32,
}

impl App {
    fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let session = Session::new(config)?;
        let center = Vec2::new(config.viewport.width / 2.0, config.viewport.height / 2.0);
        Ok(Self {
            session,
            player: ScriptedPlayer::new(center),
            rng: fastrand::Rng::new(),
            accumulator: 0.0,
            tick_count: 0,
            sim_time: 0.0,
            frame_stats: FrameStats::new(),
            games_played: 1,
        })
    }

    /// Run fixed-timestep simulation ticks.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        while self.accumulator >= TICK_RATE {
            let dt = TICK_RATE as f32;
            let mut events = self.session.tick(dt);
            if let Some(pos) = self.player.think(&self.session, dt) {
                events.extend(self.session.click(pos));
            }
            self.handle_events(events);

            self.accumulator -= TICK_RATE;
            self.tick_count += 1;
        }
    }

    fn handle_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::CoachingTip(tip) => log::info!("Tip: {tip}"),
                SessionEvent::PowerUpCollected { kind } => log::info!("{} collected", kind.label()),
                SessionEvent::PowerUpExpired { kind } => log::debug!("{} wore off", kind.label()),
                SessionEvent::ShieldAbsorbed => log::info!("Shield absorbed a decoy"),
                SessionEvent::FishStartled { count } => {
                    log::trace!("{count} fish scattered");
                }
                SessionEvent::GameOver => {
                    log::info!(
                        "Game {} over: score {} after {:.0}s",
                        self.games_played,
                        self.session.score().score(),
                        self.session.time()
                    );
                    self.session.reset();
                    self.games_played += 1;
                    return;
                }
                _ => {}
            }
        }
    }

    fn run(&mut self) {
        // Frame pacing jitters like a real display would.
        while self.sim_time < RUN_SECONDS {
            let frame_dt = self.rng.range(1.0 / 75.0, 1.0 / 45.0) as f64;
            self.sim_time += frame_dt;
            self.run_fixed_update(frame_dt);
            if self.frame_stats.record_frame(frame_dt) {
                self.frame_stats.log(&self.session);
            }
        }
        log::info!(
            "Finished {} ticks over {} frames ({} games), final score {}",
            self.tick_count,
            self.frame_stats.frame_count,
            self.games_played,
            self.session.score().score()
        );
    }
}

/// Load the config (defaults when no path is given) and run a session.
pub fn run(config_path: Option<&str>) -> Result<(), ConfigError> {
    let config = match config_path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    log::info!(
        "Viewport {}x{}, spawn rate {:.1}-{:.1}/s",
        config.viewport.width,
        config.viewport.height,
        config.difficulty.min_spawn_rate,
        config.difficulty.max_spawn_rate
    );

    let mut app = App::new(config)?;
    app.run();
    Ok(())
}
