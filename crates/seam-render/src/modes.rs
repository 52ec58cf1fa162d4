use serde::Deserialize;

/// How much the view direction matters when ranking partitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Distance only.
    None,
    /// Distance, boosted for partitions in front of the camera.
    #[default]
    Balanced,
    /// Only partitions inside a zoom-dependent view cone.
    Strict,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    #[default]
    None,
    Pulse,
    /// Ramp in over the first 600 ms after a partition first appears.
    FadeIn,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    Lines,
    Faces,
    #[default]
    Both,
}

impl DrawMode {
    #[inline]
    pub fn faces(self) -> bool {
        matches!(self, DrawMode::Faces | DrawMode::Both)
    }

    #[inline]
    pub fn lines(self) -> bool {
        matches!(self, DrawMode::Lines | DrawMode::Both)
    }
}
