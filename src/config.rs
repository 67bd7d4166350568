//! Run configuration: algorithm selection, array size and step delay.
//!
//! The UI widgets already constrain their inputs, but the core still clamps
//! every numeric value through [`Limits`] and rejects unknown algorithm names.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The nine supported sorting algorithms, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Adjacent swaps, largest element bubbles to the end.
    #[default]
    Bubble,
    /// Minimum of the unsorted remainder moves to the front.
    Selection,
    /// Grows a sorted prefix one element at a time.
    Insertion,
    /// Top-down merge sort.
    Merge,
    /// Lomuto-partition quicksort.
    Quick,
    /// Max-heap sort.
    Heap,
    /// Counting sort over the value range.
    Counting,
    /// LSD base-10 radix sort.
    Radix,
    /// Shell sort with halving gaps.
    Shell,
}

impl Algorithm {
    /// All algorithms in selector order.
    pub const ALL: [Self; 9] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Merge,
        Self::Quick,
        Self::Heap,
        Self::Counting,
        Self::Radix,
        Self::Shell,
    ];

    /// Display name shown in the selector.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Selection => "Selection Sort",
            Self::Insertion => "Insertion Sort",
            Self::Merge => "Merge Sort",
            Self::Quick => "Quick Sort",
            Self::Heap => "Heap Sort",
            Self::Counting => "Counting Sort",
            Self::Radix => "Radix Sort",
            Self::Shell => "Shell Sort",
        }
    }

    /// One-line explanation shown next to the selector.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Bubble => "Repeatedly swaps adjacent elements if they are in wrong order, bubbling the largest element to the end.",
            Self::Selection => "Selects the minimum element from unsorted part and places it at the beginning.",
            Self::Insertion => "Builds sorted array one item at a time by inserting elements in their correct position.",
            Self::Merge => "Divide and conquer algorithm that divides array and merges sorted halves.",
            Self::Quick => "Divide and conquer algorithm using a pivot to partition array and sort recursively.",
            Self::Heap => "Builds a heap and repeatedly extracts the maximum element.",
            Self::Counting => "Counts occurrences of each value and reconstructs sorted array.",
            Self::Radix => "Sorts numbers digit by digit starting from least significant digit.",
            Self::Shell => "Generalization of insertion sort that allows exchanges of distant elements.",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    /// Accepts the display name ("Quick Sort") or the short form ("quick"),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|algo| {
                let name = algo.name();
                name.eq_ignore_ascii_case(wanted)
                    || name
                        .strip_suffix(" Sort")
                        .is_some_and(|short| short.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| ConfigError::UnknownAlgorithm {
                name: wanted.to_string(),
            })
    }
}

/// Bounds applied to every externally supplied value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Smallest accepted array size.
    pub min_array_size: usize,
    /// Largest accepted array size.
    pub max_array_size: usize,
    /// Shortest accepted per-step delay in milliseconds.
    pub min_step_delay_ms: u64,
    /// Longest accepted per-step delay in milliseconds.
    pub max_step_delay_ms: u64,
    /// Re-check interval while a run is paused.
    pub pause_poll_ms: u64,
    /// Smallest generated value.
    pub min_value: u32,
    /// Largest generated value.
    pub max_value: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_array_size: 5,
            max_array_size: 50,
            min_step_delay_ms: 50,
            max_step_delay_ms: 1500,
            pause_poll_ms: 50,
            min_value: 10,
            max_value: 99,
        }
    }
}

impl Limits {
    /// Limits for headless use: no minimum delay, any array size up to 50.
    #[must_use]
    pub fn unpaced() -> Self {
        Self {
            min_array_size: 0,
            min_step_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Clamp an array size into range.
    #[must_use]
    pub fn clamp_array_size(&self, size: usize) -> usize {
        size.clamp(self.min_array_size, self.max_array_size.max(self.min_array_size))
    }

    /// Clamp a step delay into range.
    #[must_use]
    pub fn clamp_step_delay(&self, delay_ms: u64) -> u64 {
        delay_ms.clamp(self.min_step_delay_ms, self.max_step_delay_ms.max(self.min_step_delay_ms))
    }

    /// The inclusive range of generated values.
    #[must_use]
    pub fn value_range(&self) -> RangeInclusive<u32> {
        self.min_value..=self.max_value.max(self.min_value)
    }

    /// Pause poll interval as a duration.
    #[must_use]
    pub const fn pause_poll(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }
}

/// User-facing run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Selected algorithm.
    pub algorithm: Algorithm,
    /// Number of elements to generate.
    pub array_size: usize,
    /// Delay between steps in milliseconds.
    pub step_delay_ms: u64,
    /// Bounds for the fields above.
    pub limits: Limits,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            array_size: 10,
            step_delay_ms: 500,
            limits: Limits::default(),
        }
    }
}

impl VisualizerConfig {
    /// Build a config, clamping size and delay into `limits`.
    #[must_use]
    pub fn new(algorithm: Algorithm, array_size: usize, step_delay_ms: u64, limits: Limits) -> Self {
        Self {
            algorithm,
            array_size: limits.clamp_array_size(array_size),
            step_delay_ms: limits.clamp_step_delay(step_delay_ms),
            limits,
        }
    }

    /// Re-apply the limits to every numeric field.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.array_size = self.limits.clamp_array_size(self.array_size);
        self.step_delay_ms = self.limits.clamp_step_delay(self.step_delay_ms);
        self
    }

    /// Step delay as a duration.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}
