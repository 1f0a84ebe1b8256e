use serde::{Deserialize, Serialize};

use crate::error::DesignError;

/// One stimulus color, each channel on the device-independent [-1, 1] axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    pub fn channels(&self) -> [f32; 3] {
        self.0
    }

    fn in_range(&self) -> bool {
        self.0.iter().all(|c| (-1.0..=1.0).contains(c))
    }
}

/// Ordered color pool for a task, fixed once built.
///
/// Duplicates collapse to their first occurrence so draws without
/// replacement stay uniform over distinct colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, DesignError> {
        if colors.is_empty() {
            return Err(DesignError::invalid("palette must not be empty"));
        }
        if let Some(bad) = colors.iter().find(|c| !c.in_range()) {
            return Err(DesignError::invalid(format!(
                "color channel outside [-1, 1]: {:?}",
                bad.channels()
            )));
        }

        let mut unique: Vec<Color> = Vec::with_capacity(colors.len());
        for color in colors {
            if !unique.contains(&color) {
                unique.push(color);
            }
        }

        Ok(Self { colors: unique })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}
