//! Material and texture records

/// Linear RGBA color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);

    pub fn rgb(rgb: [f32; 3]) -> Self {
        Self([rgb[0], rgb[1], rgb[2], 1.0])
    }

    pub fn scaled(self, factor: f32) -> Self {
        let [r, g, b, a] = self.0;
        Self([r * factor, g * factor, b * factor, a])
    }
}

/// Texture referenced by file path; deduplicated by path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    pub path: String,
}

/// Layer blend operation with its engine code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum BlendOp {
    LinearLight = 0,
    SoftLight = 1,
    /// Shared by value and color blending
    Value = 2,
    Saturation = 3,
    Hue = 4,
    Lighten = 8,
    Darken = 9,
    Difference = 10,
    Divide = 11,
    Screen = 12,
    Subtract = 13,
    Multiply = 14,
    Add = 15,
    Mix = 16,
}

impl BlendOp {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Diffuse texture layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffuseLayer {
    pub texture: i32,
    pub op: BlendOp,
    pub factor: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Texture index or -1
    pub normal_texture: i32,
    /// Texture index or -1
    pub specular_texture: i32,
    pub diffuse_layers: Vec<DiffuseLayer>,
}

impl Material {
    /// Material used for empty material slots
    pub fn unassigned() -> Self {
        Self {
            name: "None".to_string(),
            ambient: Color::BLACK,
            diffuse: Color::BLACK,
            specular: Color::BLACK,
            normal_texture: -1,
            specular_texture: -1,
            diffuse_layers: Vec::new(),
        }
    }
}
