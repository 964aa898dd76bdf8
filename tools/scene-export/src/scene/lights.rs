use serde::{Deserialize, Serialize};

use crate::model::{Color, Falloff, Light, LightKind};
use crate::source::{SourceFalloff, SourceLight, SourceLightKind};

/// Numbering of the falloff code written for point and spot lights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalloffCodes {
    /// Constant 0, inverse square 1, inverse linear 2. Matches files
    /// produced by earlier exporters.
    #[default]
    Legacy,
    /// Constant 0, inverse linear 1, inverse square 2
    Documented,
}

impl FalloffCodes {
    pub fn code(self, falloff: Falloff) -> u32 {
        match (self, falloff) {
            (_, Falloff::Constant) => 0,
            (FalloffCodes::Legacy, Falloff::InverseSquare) => 1,
            (FalloffCodes::Legacy, Falloff::InverseLinear) => 2,
            (FalloffCodes::Documented, Falloff::InverseLinear) => 1,
            (FalloffCodes::Documented, Falloff::InverseSquare) => 2,
        }
    }
}

/// Convert a source light into its engine record.
///
/// Parameters that do not apply to the light kind keep neutral values.
pub fn convert_light(source: &SourceLight, codes: FalloffCodes) -> Light {
    let kind = match source.kind {
        SourceLightKind::Sun => LightKind::Directional,
        SourceLightKind::Point => LightKind::Point,
        SourceLightKind::Spot => LightKind::Spot,
        SourceLightKind::Hemi => LightKind::Hemisphere,
        SourceLightKind::Area => LightKind::Area,
    };

    let mut light = Light {
        kind,
        color: Color::rgb(source.color),
        strength: source.energy,
        radius: source.distance,
        specular: source.use_specular,
        spot_blend: 0.0,
        spot_size: 0.0,
        only_shadow: false,
        linear_attenuation: 0.0,
        quadratic_attenuation: 0.0,
        falloff: Falloff::Constant,
        falloff_code: 0,
        shadow_color: Color::BLACK,
        cast_shadows: false,
    };

    if kind == LightKind::Spot {
        light.spot_blend = source.spot_blend;
        light.spot_size = source.spot_size;
        light.only_shadow = source.only_shadow;
    }

    if matches!(kind, LightKind::Point | LightKind::Spot) {
        light.linear_attenuation = source.linear_attenuation;
        light.quadratic_attenuation = source.quadratic_attenuation;
        light.falloff = match source.falloff {
            SourceFalloff::Constant => Falloff::Constant,
            SourceFalloff::InverseLinear => Falloff::InverseLinear,
            SourceFalloff::InverseSquare => Falloff::InverseSquare,
            // Custom curves have no engine counterpart
            SourceFalloff::Custom => Falloff::InverseSquare,
        };
        light.falloff_code = codes.code(light.falloff);
    }

    if kind != LightKind::Hemisphere {
        light.shadow_color = Color::rgb(source.shadow_color);
        light.cast_shadows = source.cast_shadows;
    }

    light
}
