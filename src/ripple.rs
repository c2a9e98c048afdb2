//! Pure model of the background ripples. The canvas side only reads
//! [`RingPair`]s out of [`RippleField::step`].

use crate::config::RippleConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub x: f64,
    pub y: f64,
    pub life: f64,
    pub radius: f64,
}

/// Geometry and opacity of the two concentric rings drawn for one ripple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingPair {
    pub x: f64,
    pub y: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub outer_alpha: f64,
    pub inner_alpha: f64,
}

impl Ripple {
    pub fn alpha(&self, cfg: &RippleConfig) -> f64 {
        (cfg.alpha_base - self.life / cfg.alpha_falloff).max(0.0)
    }

    pub fn rings(&self, cfg: &RippleConfig) -> RingPair {
        let outer_radius = self.radius + self.life * cfg.growth;
        let alpha = self.alpha(cfg);
        RingPair {
            x: self.x,
            y: self.y,
            outer_radius,
            // arc() throws on a negative radius
            inner_radius: (outer_radius - cfg.sheen_offset).max(0.0),
            outer_alpha: alpha,
            inner_alpha: alpha * cfg.sheen_alpha_scale,
        }
    }

    pub fn expired(&self, cfg: &RippleConfig) -> bool {
        self.life > cfg.max_life
    }
}

/// The animator's working set together with the viewport it spawns into.
#[derive(Clone, Debug)]
pub struct RippleField {
    cfg: RippleConfig,
    width: f64,
    height: f64,
    ripples: Vec<Ripple>,
}

impl RippleField {
    pub fn new(cfg: RippleConfig, width: f64, height: f64) -> Self {
        Self {
            cfg,
            width,
            height,
            ripples: Vec::new(),
        }
    }

    /// Field pre-populated with `initial_ripples` ripples.
    pub fn seeded(cfg: RippleConfig, width: f64, height: f64, random: &mut impl FnMut() -> f64) -> Self {
        let mut field = Self::new(cfg, width, height);
        for _ in 0..field.cfg.initial_ripples {
            field.spawn(random);
        }
        field
    }

    pub fn config(&self) -> &RippleConfig {
        &self.cfg
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    /// Only future spawns see the new bounds.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn spawn(&mut self, random: &mut impl FnMut() -> f64) {
        let x = random() * self.width;
        let y = random() * self.height;
        let radius = random() * self.cfg.base_radius_span + self.cfg.base_radius_min;
        self.ripples.push(Ripple {
            x,
            y,
            life: 0.0,
            radius,
        });
    }

    /// Advances one frame: ages every ripple, hands its rings to `draw`,
    /// drops the expired ones, then maybe spawns a new one.
    pub fn step(&mut self, random: &mut impl FnMut() -> f64, mut draw: impl FnMut(&RingPair)) {
        let cfg = &self.cfg;
        self.ripples.retain_mut(|ripple| {
            ripple.life += cfg.life_step;
            draw(&ripple.rings(cfg));
            !ripple.expired(cfg)
        });
        if random() < self.cfg.spawn_chance {
            self.spawn(random);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_spawn() -> impl FnMut() -> f64 {
        || 1.0
    }

    fn sequence(values: Vec<f64>) -> impl FnMut() -> f64 {
        let mut iter = values.into_iter().cycle();
        move || iter.next().unwrap_or(0.5)
    }

    #[test]
    fn seeds_initial_ripples_inside_viewport() {
        let mut random = sequence(vec![0.0, 0.25, 0.5, 0.75, 0.999]);
        let field = RippleField::seeded(RippleConfig::default(), 800.0, 600.0, &mut random);
        assert_eq!(field.ripples().len(), 6);
        for r in field.ripples() {
            assert!((0.0..800.0).contains(&r.x));
            assert!((0.0..600.0).contains(&r.y));
            assert!((30.0..90.0).contains(&r.radius));
            assert_eq!(r.life, 0.0);
        }
    }

    #[test]
    fn alpha_fades_linearly_and_clamps_at_zero() {
        let cfg = RippleConfig::default();
        let mut ripple = Ripple { x: 0.0, y: 0.0, life: 0.0, radius: 40.0 };
        assert!((ripple.alpha(&cfg) - 0.14).abs() < 1e-12);
        ripple.life = 22.0;
        assert!((ripple.alpha(&cfg) - 0.04).abs() < 1e-12);
        ripple.life = 100.0;
        assert_eq!(ripple.alpha(&cfg), 0.0);
    }

    #[test]
    fn rings_grow_with_age_and_sheen_sits_inside() {
        let cfg = RippleConfig::default();
        let ripple = Ripple { x: 5.0, y: 7.0, life: 10.0, radius: 40.0 };
        let rings = ripple.rings(&cfg);
        assert_eq!((rings.x, rings.y), (5.0, 7.0));
        assert!((rings.outer_radius - 56.0).abs() < 1e-12);
        assert!((rings.inner_radius - 46.0).abs() < 1e-12);
        assert!((rings.inner_alpha - rings.outer_alpha * 0.06).abs() < 1e-12);
    }

    #[test]
    fn inner_radius_never_negative() {
        let cfg = RippleConfig {
            sheen_offset: 500.0,
            ..RippleConfig::default()
        };
        let ripple = Ripple { x: 0.0, y: 0.0, life: 0.0, radius: 30.0 };
        assert_eq!(ripple.rings(&cfg).inner_radius, 0.0);
    }

    #[test]
    fn ripple_survives_until_age_exceeds_cutoff() {
        let cfg = RippleConfig::default();
        let mut field = RippleField::new(cfg.clone(), 100.0, 100.0);
        field.spawn(&mut sequence(vec![0.5]));
        let mut random = never_spawn();

        let mut frames = 0;
        loop {
            let before = field.ripples()[0].life;
            field.step(&mut random, |_| {});
            frames += 1;
            let aged = before + cfg.life_step;
            if field.ripples().is_empty() {
                assert!(aged > cfg.max_life, "dropped early at life {aged}");
                break;
            }
            assert!(field.ripples()[0].life <= cfg.max_life);
            assert!(frames < 1000, "ripple never expired");
        }
        // 140 / 0.8 = 175 frames reach the cutoff exactly; one more exceeds it.
        assert!((175..=177).contains(&frames), "frames={frames}");
    }

    #[test]
    fn expired_ripple_is_still_drawn_on_its_last_frame() {
        let cfg = RippleConfig::default();
        let mut field = RippleField::new(cfg.clone(), 100.0, 100.0);
        field.spawn(&mut sequence(vec![0.5]));
        let mut random = never_spawn();
        while !field.ripples().is_empty() {
            let mut drawn = 0;
            field.step(&mut random, |_| drawn += 1);
            assert_eq!(drawn, 1);
        }
    }

    #[test]
    fn spawns_only_below_chance() {
        let cfg = RippleConfig::default();
        let mut field = RippleField::new(cfg, 100.0, 100.0);
        field.step(&mut || 0.5, |_| {});
        assert!(field.ripples().is_empty());
        field.step(&mut sequence(vec![0.01, 0.5, 0.5, 0.5]), |_| {});
        assert_eq!(field.ripples().len(), 1);
    }

    #[test]
    fn resize_keeps_existing_ripples() {
        let mut random = sequence(vec![0.1, 0.2, 0.3, 0.4]);
        let mut field = RippleField::seeded(RippleConfig::default(), 400.0, 300.0, &mut random);
        let before = field.ripples().to_vec();
        field.resize(1920.0, 1080.0);
        assert_eq!(field.size(), (1920.0, 1080.0));
        assert_eq!(field.ripples(), before.as_slice());
    }

    #[test]
    fn population_stays_bounded_over_many_frames() {
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut random = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        };
        let mut field = RippleField::seeded(RippleConfig::default(), 800.0, 600.0, &mut random);
        let mut peak = 0;
        for _ in 0..20_000 {
            field.step(&mut random, |_| {});
            peak = peak.max(field.ripples().len());
        }
        assert!(peak < 40, "peak={peak}");
    }
}
