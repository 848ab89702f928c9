use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

const LEAF_SYMBOLS: [char; 6] = ['🍃', '🌿', '🌱', '✿', '❀', '*'];
const CHEERS: [&str; 5] = ["NEW TREE!", "WELL READ!", "GROWING!", "STEADY!", "LOVELY!"];

/// Fixed animation step (one UI tick)
const STEP_SECS: f64 = 0.1;
/// Upward drift is positive `rise`; gravity slowly pulls leaves back down
const GRAVITY: f64 = 6.0;

/// Leaf or letter drifting over the tree after a tree is completed
#[derive(Debug, Clone)]
pub struct LeafParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// Letters of the cheer settle on a target and stay there
    pub target: Option<(f64, f64)>,
}

impl LeafParticle {
    fn leaf(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-2.5..2.5),
            vel_y: rng.gen_range(-6.0..-2.0),
            symbol: *LEAF_SYMBOLS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..4),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
            target: None,
        }
    }

    fn letter(x: f64, y: f64, target: (f64, f64), symbol: char) -> Self {
        Self {
            x,
            y,
            vel_x: target.0 - x,
            vel_y: target.1 - y,
            symbol,
            color_index: 0,
            age: 0.0,
            max_age: 3.0,
            target: Some(target),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        match self.target {
            Some((tx, ty)) => {
                let dist = ((tx - self.x).powi(2) + (ty - self.y).powi(2)).sqrt();
                if dist > 0.5 {
                    self.x += self.vel_x * dt;
                    self.y += self.vel_y * dt;
                    self.vel_x *= 0.95;
                    self.vel_y *= 0.95;
                } else {
                    self.x = tx;
                    self.y = ty;
                    self.vel_x = 0.0;
                    self.vel_y = 0.0;
                }
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += GRAVITY * dt;
            }
        }
        self.age += dt;
        self.age < self.max_age
    }
}

/// Short burst of leaves shown when a tree is completed. Purely decorative:
/// it reads the tree count and never feeds anything back to the engine.
#[derive(Debug)]
pub struct TreeCelebration {
    pub particles: Vec<LeafParticle>,
    pub started_at: Instant,
    pub duration_secs: f64,
    pub is_active: bool,
    width: f64,
    height: f64,
}

impl TreeCelebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            started_at: Instant::now(),
            duration_secs: 2.5,
            is_active: false,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.started_at = Instant::now();
        self.is_active = true;
        self.width = width as f64;
        self.height = height as f64;

        let center_x = self.width / 2.0;
        let crown_y = self.height / 3.0;

        let cheer = CHEERS.choose(&mut rng).unwrap_or(&"NEW TREE!");
        let letter_gap = 2.0;
        let first_x = center_x - (cheer.chars().count() as f64 - 1.0) * letter_gap / 2.0;
        for (i, ch) in cheer.chars().enumerate().filter(|(_, c)| *c != ' ') {
            let target = (first_x + i as f64 * letter_gap, crown_y);
            let from = (
                center_x + rng.gen_range(-8.0..8.0),
                self.height - rng.gen_range(1.0..4.0),
            );
            self.particles
                .push(LeafParticle::letter(from.0, from.1, target, ch));
        }

        for _ in 0..20 {
            let x = center_x + rng.gen_range(-12.0..12.0);
            let y = crown_y + rng.gen_range(-2.0..4.0);
            self.particles.push(LeafParticle::leaf(x, y, &mut rng));
        }
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }
        if self.started_at.elapsed().as_secs_f64() >= self.duration_secs {
            self.stop();
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(STEP_SECS);
            let margin = 3.0;
            let off_screen =
                p.y > height + margin || p.y < -margin || p.x < -margin || p.x > width + margin;
            alive && (p.target.is_some() || !off_screen)
        });
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }
}

impl Default for TreeCelebration {
    fn default() -> Self {
        Self::new()
    }
}
