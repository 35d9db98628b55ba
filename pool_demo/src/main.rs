//! Turret demo application
//!
//! Runs a headless frame loop against the reference scene graph: a turret
//! fires pooled bullets, expired bullets turn into pooled explosions, and
//! halfway through the level is unloaded and the pool reinitialized the way
//! a scene reload would.

use entity_pool::foundation::logging;
use entity_pool::prelude::*;
use rand::Rng;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

const FRAME_COUNT: u32 = 240;
const RELOAD_FRAME: u32 = 120;
const BULLET_LIFETIME: u32 = 30;
const EXPLOSION_LIFETIME: u32 = 8;
const DEFAULT_POOL_ASSET: &str = "pool_demo/pools.ron";

#[derive(Debug, Error)]
enum DemoError {
    #[error("pool error: {0}")]
    Pool(#[from] PoolError),
}

/// Counts trail segments emitted by bullets while they are in flight
#[derive(Default)]
struct TrailEmitter {
    active_trails: Cell<i32>,
}

impl PoolAware for TrailEmitter {
    fn on_enable_by_pool(&self, _pool: &ObjectPool) {
        self.active_trails.set(self.active_trails.get() + 1);
    }

    fn on_disable_by_pool(&self, _pool: &ObjectPool) {
        self.active_trails.set(self.active_trails.get() - 1);
    }
}

/// Plays the explosion sound and tracks how many went off
#[derive(Default)]
struct ExplosionSound {
    played: Cell<u32>,
}

impl PoolAware for ExplosionSound {
    fn on_enable_by_pool(&self, _pool: &ObjectPool) {
        self.played.set(self.played.get() + 1);
        log::trace!("Boom #{}", self.played.get());
    }

    fn on_disable_by_pool(&self, _pool: &ObjectPool) {}
}

struct Live {
    entity: Entity,
    expires_at: u32,
}

struct TurretDemo {
    scene: Rc<RefCell<SceneGraph>>,
    pool: ObjectPool,
    definition: PoolDefinition,
    level: Entity,
    bullet: TemplateId,
    explosion: TemplateId,
    drone: TemplateId,
    bullets: Vec<Live>,
    explosions: Vec<Live>,
    trails: Rc<TrailEmitter>,
    sound: Rc<ExplosionSound>,
    dry_fires: u32,
}

impl TurretDemo {
    fn new(asset: &Path) -> Result<Self, DemoError> {
        let trails = Rc::new(TrailEmitter::default());
        let sound = Rc::new(ExplosionSound::default());

        let mut scene = SceneGraph::new();
        let trail_handler = Rc::clone(&trails);
        scene.register_prefab(
            TemplateId::new("bullet"),
            Prefab::new("Bullet").with_child(
                Prefab::new("Trail")
                    .with_handler(move || Rc::clone(&trail_handler) as Rc<dyn PoolAware>),
            ),
        );
        let sound_handler = Rc::clone(&sound);
        scene.register_prefab(
            TemplateId::new("explosion"),
            Prefab::new("Explosion")
                .with_handler(move || Rc::clone(&sound_handler) as Rc<dyn PoolAware>),
        );
        scene.register_prefab(TemplateId::new("drone"), Prefab::new("Drone"));
        let level = scene.spawn("Level", None);
        let scene = Rc::new(RefCell::new(scene));

        let definition = PoolDefinition::load_from_file(asset).unwrap_or_else(|e| {
            log::warn!(
                "Could not load pool asset {}: {}; using built-in definition",
                asset.display(),
                e
            );
            Self::fallback_definition()
        });
        let pool = ObjectPool::with_definition(scene.clone(), &definition)?;

        Ok(Self {
            scene,
            pool,
            definition,
            level,
            bullet: TemplateId::new("bullet"),
            explosion: TemplateId::new("explosion"),
            drone: TemplateId::new("drone"),
            bullets: Vec::new(),
            explosions: Vec::new(),
            trails,
            sound,
            dry_fires: 0,
        })
    }

    fn fallback_definition() -> PoolDefinition {
        PoolDefinition::new()
            .with_item(
                PoolItemSpec::new("bullet", 24).with_notification(NotificationMode::DeepNotify),
            )
            .with_item(
                PoolItemSpec::new("explosion", 4)
                    .expandable()
                    .with_notification(NotificationMode::ShallowNotify),
            )
            .with_item(PoolItemSpec::new("drone", 6))
    }

    fn update(&mut self, frame: u32, rng: &mut impl Rng) -> Result<(), DemoError> {
        if frame == RELOAD_FRAME {
            self.reload()?;
        }

        if rng.gen_bool(0.9) {
            let muzzle = Vec3::new(rng.gen_range(-5.0..5.0), 0.0, rng.gen_range(-5.0..5.0));
            let placement = Placement::under(self.level).with_position(muzzle);
            match self.pool.acquire_with_placement(&self.bullet, &placement)? {
                Some(entity) => self.bullets.push(Live {
                    entity,
                    expires_at: frame + BULLET_LIFETIME,
                }),
                None => self.dry_fires += 1,
            }
        }

        let (expired, flying): (Vec<Live>, Vec<Live>) =
            self.bullets.drain(..).partition(|live| live.expires_at <= frame);
        self.bullets = flying;
        for live in expired {
            let position = self
                .scene
                .borrow()
                .transform(live.entity)
                .map_or_else(Vec3::zeros, |transform| transform.position);
            self.pool.release(live.entity);

            let placement = Placement::under(self.level).with_position(position);
            if let Some(entity) = self.pool.acquire_with_placement(&self.explosion, &placement)? {
                self.explosions.push(Live {
                    entity,
                    expires_at: frame + EXPLOSION_LIFETIME,
                });
            }
        }

        let (finished, burning): (Vec<Live>, Vec<Live>) =
            self.explosions.drain(..).partition(|live| live.expires_at <= frame);
        self.explosions = burning;
        for live in finished {
            self.pool.release(live.entity);
        }

        Ok(())
    }

    /// Unload the level with everything still in flight and rebuild it
    fn reload(&mut self) -> Result<(), DemoError> {
        log::info!(
            "Reloading level with {} bullets and {} explosions in flight",
            self.bullets.len(),
            self.explosions.len()
        );
        {
            let mut scene = self.scene.borrow_mut();
            scene.unload_except(self.pool.pool_root());
            self.level = scene.spawn("Level", None);
        }
        self.bullets.clear();
        self.explosions.clear();

        self.pool.initialize(&self.definition)?;

        // Drones are handed out once per level and never returned
        for _ in 0..3 {
            let placement = Placement::under(self.level);
            if let Some(drone) = self.pool.acquire_with_placement(&self.drone, &placement)? {
                log::debug!("Spawned drone {:?}", drone);
            }
        }
        Ok(())
    }

    fn report(&self) {
        let stats = self.pool.stats();
        for template in [&self.bullet, &self.explosion, &self.drone] {
            log::info!(
                "'{}': {} idle, {} in use, {} total",
                template,
                self.pool.available_count(template).unwrap_or(0),
                self.pool.in_use_count(template).unwrap_or(0),
                self.pool.total_count(template).unwrap_or(0)
            );
        }
        log::info!(
            "Acquisitions {}, releases {}, growth {}, exhausted {}, discarded {}, peak in use {}",
            stats.acquisitions,
            stats.releases,
            stats.growth_events,
            stats.exhaustions,
            stats.discarded_invalid,
            stats.peak_in_use
        );
        log::info!(
            "Dry fires {}, unbalanced trail enables {}, explosions played {}",
            self.dry_fires,
            self.trails.active_trails.get(),
            self.sound.played.get()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let asset = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_POOL_ASSET), PathBuf::from);
    log::info!("Starting turret demo with pool asset {}", asset.display());

    let mut demo = TurretDemo::new(&asset)?;
    let mut rng = rand::thread_rng();
    for frame in 0..FRAME_COUNT {
        demo.update(frame, &mut rng)?;
    }

    demo.report();
    Ok(())
}
