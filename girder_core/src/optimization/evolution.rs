//! Differential evolution over the searched parameters
//!
//! Classic rand/1/bin: each target vector is challenged by a trial built
//! from three other population members, and the trial replaces the target
//! when it scores at least as well. Every vector is snapped onto its
//! parameter grid so the memo cache sees the same values a grid search
//! would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::space::{Assignment, ParameterRange};
use crate::errors::{CalcError, CalcResult};

/// Differential evolution configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionSettings {
    pub population_size: usize,
    /// Generations after the initial population
    pub generations: usize,
    /// Mutation scale F
    pub differential_weight: f64,
    /// Crossover probability CR
    pub crossover_rate: f64,
    /// Random seed (`None` seeds from entropy)
    pub seed: Option<u64>,
}

impl Default for EvolutionSettings {
    fn default() -> Self {
        EvolutionSettings {
            population_size: 20,
            generations: 40,
            differential_weight: 0.8,
            crossover_rate: 0.7,
            seed: None,
        }
    }
}

impl EvolutionSettings {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_differential_weight(mut self, weight: f64) -> Self {
        self.differential_weight = weight;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn validate(&self) -> CalcResult<()> {
        if self.population_size < 4 {
            return Err(CalcError::invalid_input(
                "population_size",
                self.population_size.to_string(),
                "Mutation needs at least four population members",
            ));
        }
        if !(self.differential_weight > 0.0 && self.differential_weight <= 2.0) {
            return Err(CalcError::invalid_input(
                "differential_weight",
                self.differential_weight.to_string(),
                "Must lie in (0, 2]",
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(CalcError::invalid_input(
                "crossover_rate",
                self.crossover_rate.to_string(),
                "Must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Population state between candidates
#[derive(Debug, Clone)]
pub(crate) struct EvolutionCursor {
    settings: EvolutionSettings,
    ranges: Vec<(String, ParameterRange)>,
    rng: StdRng,
    population: Vec<Vec<f64>>,
    scores: Vec<f64>,
    /// Generation 0 is the initial population
    generation: usize,
    index: usize,
    pending: Option<Vec<f64>>,
}

impl EvolutionCursor {
    pub(crate) fn new(ranges: Vec<(String, ParameterRange)>, settings: EvolutionSettings) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let population = (0..settings.population_size)
            .map(|_| {
                ranges
                    .iter()
                    .map(|(_, r)| r.snap(rng.gen_range(r.low..=r.high)))
                    .collect()
            })
            .collect();

        EvolutionCursor {
            scores: vec![f64::NEG_INFINITY; settings.population_size],
            settings,
            ranges,
            rng,
            population,
            generation: 0,
            index: 0,
            pending: None,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.generation > self.settings.generations
    }

    /// Next raw candidate; its score must be passed to [`Self::report`]
    /// before asking again
    pub(crate) fn next(&mut self) -> Option<Assignment> {
        if self.is_done() {
            return None;
        }
        let vector = if self.generation == 0 {
            self.population[self.index].clone()
        } else {
            self.trial(self.index)
        };
        let candidate = self
            .ranges
            .iter()
            .zip(&vector)
            .map(|((name, _), &v)| (name.clone(), v))
            .collect();
        self.pending = Some(vector);
        Some(candidate)
    }

    /// Score of the last candidate handed out (`-inf` when infeasible)
    pub(crate) fn report(&mut self, score: f64) {
        let Some(vector) = self.pending.take() else {
            return;
        };
        let i = self.index;
        if self.generation == 0 || score >= self.scores[i] {
            self.population[i] = vector;
            self.scores[i] = score;
        }

        self.index += 1;
        if self.index == self.settings.population_size {
            self.index = 0;
            self.generation += 1;
            let best = self.scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            log::debug!("Generation {} done, best score {:.6}", self.generation - 1, best);
        }
    }

    fn trial(&mut self, target: usize) -> Vec<f64> {
        let n = self.settings.population_size;
        let mut picks = [target; 3];
        for k in 0..3 {
            loop {
                let candidate = self.rng.gen_range(0..n);
                if candidate != target && !picks[..k].contains(&candidate) {
                    picks[k] = candidate;
                    break;
                }
            }
        }
        let [a, b, c] = picks.map(|p| &self.population[p]);

        let forced = self.rng.gen_range(0..self.ranges.len());
        let f = self.settings.differential_weight;
        let mut trial = self.population[target].clone();
        for (j, (_, range)) in self.ranges.iter().enumerate() {
            if j == forced || self.rng.gen::<f64>() < self.settings.crossover_rate {
                trial[j] = range.snap(a[j] + f * (b[j] - c[j]));
            }
        }
        trial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> Vec<(String, ParameterRange)> {
        vec![
            ("x".to_string(), ParameterRange::new(0.0, 10.0, 0.5).unwrap()),
            ("y".to_string(), ParameterRange::new(-5.0, 5.0, 1.0).unwrap()),
        ]
    }

    fn on_grid(value: f64, step: f64) -> bool {
        ((value / step).round() * step - value).abs() < 1e-9
    }

    #[test]
    fn test_settings_validation() {
        assert!(EvolutionSettings::default().validate().is_ok());
        assert!(EvolutionSettings::default().with_population_size(3).validate().is_err());
        assert!(EvolutionSettings::default().with_crossover_rate(1.5).validate().is_err());
        assert!(EvolutionSettings::default().with_differential_weight(0.0).validate().is_err());
    }

    #[test]
    fn test_candidates_stay_on_grid() {
        let settings = EvolutionSettings::default()
            .with_population_size(6)
            .with_generations(3)
            .with_seed(7);
        let mut cursor = EvolutionCursor::new(ranges(), settings);
        let mut count = 0;
        while let Some(c) = cursor.next() {
            assert!((0.0..=10.0).contains(&c["x"]) && on_grid(c["x"], 0.5));
            assert!((-5.0..=5.0).contains(&c["y"]) && on_grid(c["y"], 1.0));
            cursor.report(-(c["x"] - 3.0).abs());
            count += 1;
        }
        assert_eq!(count, 6 * 4);
        assert!(cursor.is_done());
    }

    #[test]
    fn test_same_seed_same_candidates() {
        let settings = EvolutionSettings::default()
            .with_population_size(5)
            .with_generations(2)
            .with_seed(42);
        let mut first = EvolutionCursor::new(ranges(), settings);
        let mut second = EvolutionCursor::new(ranges(), settings);
        while let Some(a) = first.next() {
            let b = second.next().unwrap();
            assert_eq!(a, b);
            let score = a["x"] + a["y"];
            first.report(score);
            second.report(score);
        }
        assert!(second.next().is_none());
    }
}
