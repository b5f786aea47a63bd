use log::debug;

use crate::{
    body::{BodyState, MovingBody},
    collision::{
        TerrainCaster, TerrainSource,
        query::SideProbe,
        settings::{
            DEFAULT_SKIN, DETACH_SPEED, DIST_EPS, GRAVITY, GROUND_STICK_DISTANCE,
            MAX_ATTACH_ANGLE_DEG, TERMINAL_FALL_SPEED,
        },
        types::{Point2, TerrainHit, Vec2},
    },
    contact::{ContactTracker, TerrainFeatures},
    layers::{LayerMask, TerrainLayer},
    side::{LogicalSide, relative_side, side_of},
    utils::{
        angle_difference_deg, decompose_velocity, normal_from_surface_angle, offset_point,
        unit_vector_deg,
    },
};

/// Per-character tuning for the surface-following step.
#[derive(Clone, Copy, Debug)]
pub struct ControllerConfig {
    /// Half of the body's width along its local X axis.
    pub half_width: f32,
    /// Half of the body's height along its local Y axis.
    pub half_height: f32,
    /// Foot probes sit at `±half_width * foot_spread` along the body's X axis.
    pub foot_spread: f32,
    pub gravity: f32,
    pub terminal_fall_speed: f32,
    /// Extra floor probe reach while grounded.
    pub ground_stick: f32,
    pub skin: f32,
    /// Largest surface angle change (degrees) followed in one step.
    pub max_attach_angle: f32,
    /// Minimum ground speed to stay on walls and ceilings.
    pub detach_speed: f32,
    /// Layers the body's probes can see.
    pub probe_mask: LayerMask,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            half_width: 0.5,
            half_height: 1.0,
            foot_spread: 0.8,
            gravity: GRAVITY,
            terminal_fall_speed: TERMINAL_FALL_SPEED,
            ground_stick: GROUND_STICK_DISTANCE,
            skin: DEFAULT_SKIN,
            max_attach_angle: MAX_ATTACH_ANGLE_DEG,
            detach_speed: DETACH_SPEED,
            probe_mask: TerrainLayer::default_probe_mask(),
        }
    }
}

/// Output of a single `SurfaceFollower::step()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepMovementResult {
    /// Whether the body stands on ground after the step.
    pub grounded: bool,
    /// The floor contact the body ended the step on, if any.
    pub floor: Option<TerrainHit>,
    pub wall: Option<TerrainHit>,
    pub ceiling: Option<TerrainHit>,
    /// The body was airborne and touched down this step.
    pub landed: bool,
    /// The body was grounded and left the ground this step.
    pub detached: bool,
}

/// Keeps a body glued to curved terrain: one fixed step at a time.
///
/// Behavior
/// - Grounded: advance along the surface tangent, stop at walls, probe the floor along the
///   body's rotated "down", snap onto it and adopt its angle. Losing the floor (or crawling up
///   a wall or ceiling too slowly) detaches the body, keeping its speed as world velocity.
/// - Airborne: apply gravity, move, resolve walls and ceilings, and land on a floor that
///   faces up. Landing converts world velocity into speed along the new surface.
/// - Every step ends by feeding this step's floor contact to the contact tracker, so terrain
///   features see begin/stay/end after the body's position is final.
#[derive(Debug, Default)]
pub struct SurfaceFollower {
    pub config: ControllerConfig,
    caster: TerrainCaster,
    tracker: ContactTracker,
    contacts: Vec<TerrainHit>,
}

impl SurfaceFollower {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    pub fn tracker(&self) -> &ContactTracker {
        &self.tracker
    }

    #[inline]
    pub fn caster(&self) -> &TerrainCaster {
        &self.caster
    }

    /// Advance `body` by one fixed step of `dt` seconds.
    pub fn step<S: TerrainSource + ?Sized>(
        &mut self,
        source: &S,
        body: &mut BodyState,
        features: &mut TerrainFeatures,
        dt: f32,
    ) -> StepMovementResult {
        let dt = dt.max(0.0);
        let mut result = StepMovementResult::default();
        self.contacts.clear();

        if body.grounded {
            self.step_grounded(source, body, dt, &mut result);
        } else {
            self.step_airborne(source, body, dt, &mut result);
        }

        if let Some(floor) = result.floor {
            self.contacts.push(floor);
        }
        self.tracker.update(&self.contacts, body, features, dt);

        result.grounded = body.grounded;
        result
    }

    /// Drop the body's open contacts (respawn, teleport), firing their end events.
    pub fn reset_contacts(&mut self, body: &mut BodyState, features: &mut TerrainFeatures) {
        self.tracker.clear(body, features);
    }

    fn step_grounded<S: TerrainSource + ?Sized>(
        &mut self,
        source: &S,
        body: &mut BodyState,
        dt: f32,
        result: &mut StepMovementResult,
    ) {
        let cfg = self.config;
        let tangent = unit_vector_deg(body.surface_angle);
        body.position += tangent * body.ground_velocity * dt;

        // 1) Walls in the direction of travel.
        if body.ground_velocity.abs() > DIST_EPS {
            let (side, dir) = if body.ground_velocity > 0.0 {
                (LogicalSide::Right, tangent)
            } else {
                (LogicalSide::Left, -tangent)
            };
            if let Some(hit) = self.probe(source, body.position, dir, cfg.half_width, side) {
                body.position += dir * (hit.distance - cfg.half_width);
                body.ground_velocity = 0.0;
                body.velocity = Vec2::zeros();
                result.wall = Some(hit);
            }
        }

        // 2) Floor along the body's own "down".
        let down = -unit_vector_deg(normal_from_surface_angle(body.surface_angle));
        let reach = cfg.half_height + cfg.ground_stick;
        let floor = self
            .probe_feet(
                source,
                body.position,
                body.surface_angle,
                down,
                reach,
                LogicalSide::Bottom,
            )
            .filter(|hit| {
                angle_difference_deg(body.surface_angle, hit.surface_angle()).abs()
                    <= cfg.max_attach_angle
            });

        let Some(hit) = floor else {
            debug!("lost ground at {:?}", body.position);
            body.detach();
            result.detached = true;
            return;
        };

        body.position += down * (hit.distance - cfg.half_height - cfg.skin);
        body.surface_angle = hit.surface_angle();
        body.rotation_deg = body.surface_angle;
        body.velocity = unit_vector_deg(body.surface_angle) * body.ground_velocity;

        // 3) Too slow to stay on a wall or ceiling.
        if side_of(hit.normal_angle) != LogicalSide::Top
            && body.ground_velocity.abs() < cfg.detach_speed
        {
            debug!(
                "fell off {:?}-facing surface at speed {:.2}",
                side_of(hit.normal_angle),
                body.ground_velocity
            );
            body.detach();
            result.detached = true;
            return;
        }

        result.floor = Some(hit);
    }

    fn step_airborne<S: TerrainSource + ?Sized>(
        &mut self,
        source: &S,
        body: &mut BodyState,
        dt: f32,
        result: &mut StepMovementResult,
    ) {
        let cfg = self.config;
        body.velocity.y = (body.velocity.y - cfg.gravity * dt).max(-cfg.terminal_fall_speed);
        body.position += body.velocity * dt;

        // Airborne probes run along world axes; tag them with the body side facing that way.
        let rotation = body.rotation_deg;
        let facing = |world_side| relative_side(world_side, rotation);

        // 1) Walls.
        for (side, dir) in [(LogicalSide::Right, Vec2::x()), (LogicalSide::Left, -Vec2::x())] {
            if body.velocity.dot(&dir) <= 0.0 {
                continue;
            }
            if let Some(hit) = self.probe(source, body.position, dir, cfg.half_width, facing(side))
            {
                body.position += dir * (hit.distance - cfg.half_width);
                body.velocity.x = 0.0;
                result.wall = Some(hit);
            }
        }

        // 2) Ceiling.
        if body.velocity.y > 0.0 {
            let up = Vec2::y();
            let side = facing(LogicalSide::Top);
            if let Some(hit) = self.probe(source, body.position, up, cfg.half_height, side) {
                body.position += up * (hit.distance - cfg.half_height);
                body.velocity.y = 0.0;
                result.ceiling = Some(hit);
            }
        }

        // 3) Floor: only land on surfaces that face up.
        if body.velocity.y > 0.0 {
            return;
        }
        let down = -Vec2::y();
        let Some(hit) = self
            .probe_feet(
                source,
                body.position,
                0.0,
                down,
                cfg.half_height,
                facing(LogicalSide::Bottom),
            )
            .filter(|hit| side_of(hit.normal_angle) == LogicalSide::Top)
        else {
            return;
        };

        body.position += down * (hit.distance - cfg.half_height - cfg.skin);
        let surface_angle = hit.surface_angle();
        let (along, _) = decompose_velocity(body.velocity, surface_angle);
        body.land(surface_angle, along);
        debug!("landed on {:?} at {:.1} deg, speed {:.2}", hit.surface, surface_angle, along);

        result.landed = true;
        result.floor = Some(hit);
    }

    fn probe<S: TerrainSource + ?Sized>(
        &mut self,
        source: &S,
        from: Point2,
        dir: Vec2,
        reach: f32,
        side: LogicalSide,
    ) -> Option<TerrainHit> {
        self.caster
            .query_terrain(source, self.config.probe_mask, from, from + dir * reach, side)
    }

    /// Two floor probes at the body's feet; the nearer accepted hit wins.
    fn probe_feet<S: TerrainSource + ?Sized>(
        &mut self,
        source: &S,
        center: Point2,
        rotation_deg: f32,
        down: Vec2,
        reach: f32,
        side: LogicalSide,
    ) -> Option<TerrainHit> {
        let spread = self.config.half_width * self.config.foot_spread;
        let probes = [-spread, spread].map(|x| {
            let start = offset_point(center, Vec2::new(x, 0.0), rotation_deg);
            SideProbe::new(side, start, start + down * reach)
        });
        self.caster
            .query_nearest(source, self.config.probe_mask, &probes)
    }
}
