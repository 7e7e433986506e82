// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/dustgrid-rs

//! Simulated Smart Dust mote

use chrono::{DateTime, Utc};
use rand::prelude::*;
use rand_distr::Normal;

use super::{Location, Reading};

// Particulate baselines for a fully clean site, in µg/m³
const PM25_CLEAN_BASE: f64 = 10.0;
const PM10_CLEAN_BASE: f64 = 20.0;

// How far the pollution profile (0..1) shifts the baselines
const PM25_PROFILE_SPAN: f64 = 40.0;
const PM10_PROFILE_SPAN: f64 = 60.0;

// Bounds for the ambient-condition random walks
const TEMPERATURE_MIN: f64 = 10.0;
const TEMPERATURE_MAX: f64 = 35.0;
const HUMIDITY_MIN: f64 = 0.0;
const HUMIDITY_MAX: f64 = 100.0;

/// A single simulated sensor node.
///
/// Each mote owns its generation state (RNG, spike-episode countdown and
/// ambient-condition walks); nothing here is shared between motes, so a
/// tick wave can run every mote on its own task.
pub struct Mote {
    id: String,
    location: Location,
    base_pollution: f64,
    spike_probability: f64,
    spike_ticks: u32,
    temperature: f64,
    humidity: f64,
    rng: StdRng,
}

impl Mote {
    /// Create a mote at `location` with a pollution profile in `0.0..=1.0`.
    ///
    /// The seed fixes the whole reading sequence, so runs are reproducible
    /// when the caller derives seeds deterministically.
    pub fn new(
        id: &str,
        location: Location,
        base_pollution: f64,
        spike_probability: f64,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let temperature = 20.0 + rng.gen_range(-2.0..2.0);
        let humidity = 40.0 + rng.gen_range(-10.0..10.0);

        Self {
            id: id.to_string(),
            location,
            base_pollution: base_pollution.clamp(0.0, 1.0),
            spike_probability,
            spike_ticks: 0,
            temperature,
            humidity,
            rng,
        }
    }

    /// Mote identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Mote position
    pub fn location(&self) -> Location {
        self.location
    }

    /// Produce the next reading for this mote.
    ///
    /// Particulate levels are the profile baseline with a shared
    /// multiplicative swing (wind, time of day) plus per-metric gaussian
    /// noise, clamped non-negative. Spike episodes last 2-5 ticks and push
    /// both metrics well above the safe thresholds. Never fails.
    pub fn generate_reading(&mut self, now: DateTime<Utc>) -> Reading {
        let pm25_base = PM25_CLEAN_BASE + self.base_pollution * PM25_PROFILE_SPAN;
        let pm10_base = PM10_CLEAN_BASE + self.base_pollution * PM10_PROFILE_SPAN;

        let swing = 1.0 + 0.3 * self.rng.sample::<f64, _>(Normal::new(0.0, 1.0).unwrap());
        let mut pm25 = pm25_base * swing + self.rng.sample::<f64, _>(Normal::new(0.0, 5.0).unwrap());
        let mut pm10 = pm10_base * swing + self.rng.sample::<f64, _>(Normal::new(0.0, 8.0).unwrap());

        if self.spike_ticks == 0 && self.rng.gen::<f64>() < self.spike_probability {
            self.spike_ticks = self.rng.gen_range(2..=5);
        }
        if self.spike_ticks > 0 {
            self.spike_ticks -= 1;
            pm25 += self.rng.gen_range(30.0..80.0);
            pm10 += self.rng.gen_range(60.0..130.0);
        }

        self.temperature = (self.temperature
            + self.rng.sample::<f64, _>(Normal::new(0.0, 0.4).unwrap()))
        .clamp(TEMPERATURE_MIN, TEMPERATURE_MAX);
        self.humidity = (self.humidity
            + self.rng.sample::<f64, _>(Normal::new(0.0, 1.5).unwrap()))
        .clamp(HUMIDITY_MIN, HUMIDITY_MAX);

        Reading {
            mote_id: self.id.clone(),
            timestamp: now,
            pm25: pm25.max(0.0),
            pm10: pm10.max(0.0),
            temperature: self.temperature,
            humidity: self.humidity,
            location: self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_mote(seed: u64) -> Mote {
        Mote::new(
            "MOTE-001",
            Location { x: 10.0, y: 20.0 },
            0.5,
            0.02,
            seed,
        )
    }

    #[test]
    fn test_readings_stay_in_bounds() {
        let mut mote = test_mote(7);
        for _ in 0..500 {
            let reading = mote.generate_reading(Utc::now());
            assert!(reading.pm25 >= 0.0);
            assert!(reading.pm10 >= 0.0);
            assert!(reading.temperature >= TEMPERATURE_MIN);
            assert!(reading.temperature <= TEMPERATURE_MAX);
            assert!(reading.humidity >= HUMIDITY_MIN);
            assert!(reading.humidity <= HUMIDITY_MAX);
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let mut a = test_mote(42);
        let mut b = test_mote(42);
        let now = Utc::now();

        for _ in 0..50 {
            let ra = a.generate_reading(now);
            let rb = b.generate_reading(now);
            assert_eq!(ra.pm25, rb.pm25);
            assert_eq!(ra.pm10, rb.pm10);
            assert_eq!(ra.temperature, rb.temperature);
            assert_eq!(ra.humidity, rb.humidity);
        }
    }

    #[test]
    fn test_spike_episodes_breach_thresholds() {
        let mut mote = Mote::new(
            "MOTE-002",
            Location { x: 0.0, y: 0.0 },
            0.1,
            1.0, // episodes run back to back
            3,
        );
        let mut peak_pm25: f64 = 0.0;
        let mut peak_pm10: f64 = 0.0;
        for _ in 0..10 {
            let reading = mote.generate_reading(Utc::now());
            peak_pm25 = peak_pm25.max(reading.pm25);
            peak_pm10 = peak_pm10.max(reading.pm10);
        }
        assert!(peak_pm25 > 25.0);
        assert!(peak_pm10 > 50.0);
    }
}
