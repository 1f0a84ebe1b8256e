use chdet_core::{Color, Condition, DesignError, KeyAssignment, Palette};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Per-trial color and response-key assignment.
#[derive(Debug, Clone)]
pub struct TrialComposer {
    palette: Palette,
    keys: KeyAssignment,
    repeat_stim_colors: bool,
    repeat_test_colors: bool,
}

/// Everything a trial needs besides its spatial layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub correct_response_key: char,
    pub stim_colors: Vec<Color>,
    pub test_index: usize,
    pub test_color: Color,
}

impl TrialComposer {
    pub fn new(
        palette: Palette,
        keys: KeyAssignment,
        repeat_stim_colors: bool,
        repeat_test_colors: bool,
    ) -> Self {
        Self {
            palette,
            keys,
            repeat_stim_colors,
            repeat_test_colors,
        }
    }

    /// Draws the key, tested slot, sample colors and test color for one
    /// trial. The test color is drawn for every trial but only applied on
    /// Different trials; see `Trial::probe_color`.
    pub fn compose<R: Rng>(
        &self,
        set_size: usize,
        condition: Condition,
        rng: &mut R,
    ) -> Result<Composition, DesignError> {
        let correct_response_key = self.keys.key_for(condition);
        let test_index = rng.random_range(0..set_size);
        let stim_colors = self.draw_stim_colors(set_size, rng)?;
        let test_color = self.draw_test_color(&stim_colors, test_index, rng)?;

        Ok(Composition {
            correct_response_key,
            stim_colors,
            test_index,
            test_color,
        })
    }

    fn draw_stim_colors<R: Rng>(
        &self,
        set_size: usize,
        rng: &mut R,
    ) -> Result<Vec<Color>, DesignError> {
        let colors = self.palette.colors();

        if self.repeat_stim_colors {
            return Ok((0..set_size)
                .map(|_| colors[rng.random_range(0..colors.len())])
                .collect());
        }

        if set_size > colors.len() {
            return Err(DesignError::PaletteExhausted {
                palette_len: colors.len(),
                required: set_size,
            });
        }
        Ok(colors.choose_multiple(rng, set_size).copied().collect())
    }

    fn draw_test_color<R: Rng>(
        &self,
        stim_colors: &[Color],
        test_index: usize,
        rng: &mut R,
    ) -> Result<Color, DesignError> {
        let colors = self.palette.colors();

        if self.repeat_test_colors {
            let studied = stim_colors[test_index];
            if colors.iter().all(|c| *c == studied) {
                return Err(DesignError::PaletteExhausted {
                    palette_len: colors.len(),
                    required: 2,
                });
            }
            // Resample until the probe differs from the studied color.
            loop {
                let draw = colors[rng.random_range(0..colors.len())];
                if draw != studied {
                    return Ok(draw);
                }
            }
        }

        let unused: Vec<Color> = colors
            .iter()
            .filter(|c| !stim_colors.contains(c))
            .copied()
            .collect();
        if unused.is_empty() {
            return Err(DesignError::PaletteExhausted {
                palette_len: colors.len(),
                required: stim_colors.len() + 1,
            });
        }
        Ok(unused[rng.random_range(0..unused.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn nine_colors() -> Palette {
        Palette::new(vec![
            Color::new(1.0, -1.0, -1.0),
            Color::new(-1.0, 1.0, -1.0),
            Color::new(-1.0, -1.0, 1.0),
            Color::new(1.0, 1.0, -1.0),
            Color::new(1.0, -1.0, 1.0),
            Color::new(-1.0, 1.0, 1.0),
            Color::new(1.0, 1.0, 1.0),
            Color::new(-1.0, -1.0, -1.0),
            Color::new(1.0, 0.0, -1.0),
        ])
        .unwrap()
    }

    fn keys() -> KeyAssignment {
        KeyAssignment {
            same: 's',
            different: 'd',
        }
    }

    #[test]
    fn unique_samples_are_pairwise_distinct() {
        let composer = TrialComposer::new(nine_colors(), keys(), false, false);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let c = composer.compose(6, Condition::Same, &mut rng).unwrap();
            for (i, a) in c.stim_colors.iter().enumerate() {
                assert!(!c.stim_colors[..i].contains(a));
            }
        }
    }

    #[test]
    fn unique_test_color_comes_from_the_unused_remainder() {
        let composer = TrialComposer::new(nine_colors(), keys(), false, false);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let c = composer
                .compose(6, Condition::Different, &mut rng)
                .unwrap();
            assert_eq!(c.stim_colors.len(), 6);
            assert!(!c.stim_colors.contains(&c.test_color));
            assert!(nine_colors().colors().contains(&c.test_color));
        }
    }

    #[test]
    fn repeated_test_color_still_differs_from_the_studied_slot() {
        let composer = TrialComposer::new(nine_colors(), keys(), true, true);
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..100 {
            let c = composer
                .compose(6, Condition::Different, &mut rng)
                .unwrap();
            assert_ne!(c.test_color, c.stim_colors[c.test_index]);
        }
    }

    #[test]
    fn condition_selects_the_response_key() {
        let composer = TrialComposer::new(nine_colors(), keys(), false, false);
        let mut rng = StdRng::seed_from_u64(17);

        let same = composer.compose(3, Condition::Same, &mut rng).unwrap();
        assert_eq!(same.correct_response_key, 's');
        let diff = composer
            .compose(3, Condition::Different, &mut rng)
            .unwrap();
        assert_eq!(diff.correct_response_key, 'd');
    }

    #[test]
    fn oversized_set_exhausts_the_palette() {
        let composer = TrialComposer::new(nine_colors(), keys(), false, true);
        let mut rng = StdRng::seed_from_u64(19);
        assert!(matches!(
            composer.compose(10, Condition::Same, &mut rng),
            Err(DesignError::PaletteExhausted {
                palette_len: 9,
                required: 10,
            })
        ));
    }

    #[test]
    fn full_palette_leaves_no_unique_test_color() {
        let composer = TrialComposer::new(nine_colors(), keys(), false, false);
        let mut rng = StdRng::seed_from_u64(23);
        assert!(matches!(
            composer.compose(9, Condition::Different, &mut rng),
            Err(DesignError::PaletteExhausted { .. })
        ));
    }
}
