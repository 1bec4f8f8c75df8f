/// A fixed world-space point of interest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub radius: f32,
}

impl Landmark {
    pub const fn new(x: f32, radius: f32) -> Self {
        Self { x, radius }
    }

    /// One-dimensional proximity, strict so the radius edge itself is outside
    pub fn is_near(&self, player_x: f32) -> bool {
        (player_x - self.x).abs() < self.radius
    }

    pub fn distance(&self, player_x: f32) -> f32 {
        (player_x - self.x).abs()
    }
}
