//! Controller-wide tuning properties that only make sense while logical
//! drives exist.
//!
//! Each property is tri-state. A property missing from the record stays
//! missing when the record is written back, so the reset applied after the
//! last drive is removed only touches what the controller actually reported.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A controller property that may be absent, explicitly unset, or set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Tunable<T> {
    /// The controller record does not carry this property.
    Absent,
    /// The property is present with a `null` value.
    Unset,
    /// The property is present with a concrete value.
    Value(T),
}

impl<T> Default for Tunable<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Tunable<T> {
    /// Returns `true` when the record does not carry the property.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the configured value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Unset => None,
        }
    }

    /// Clears a present property. Returns `true` when a value was dropped.
    pub fn reset(&mut self) -> bool {
        match self {
            Self::Absent | Self::Unset => false,
            Self::Value(_) => {
                *self = Self::Unset;
                true
            }
        }
    }
}

impl<T: Serialize> Serialize for Tunable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => serializer.serialize_some(value),
            Self::Absent | Self::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tunable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Unset, Self::Value))
    }
}

macro_rules! tuning_properties {
    ($( $(#[$meta:meta])* $field:ident: $ty:ty => $wire:literal ),+ $(,)?) => {
        /// Tuning properties cleared when a controller loses its last drive.
        #[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
        pub struct TuningProperties {
            $(
                $(#[$meta])*
                #[serde(rename = $wire, default, skip_serializing_if = "Tunable::is_absent")]
                pub $field: Tunable<$ty>,
            )+
        }

        /// Wire names of every tuning property.
        pub const TUNING_PROPERTY_NAMES: &[&str] = &[$($wire),+];

        impl TuningProperties {
            /// Unsets every property the record carries and returns how many
            /// held a value. Absent properties are left absent.
            pub fn reset_present(&mut self) -> usize {
                let mut cleared = 0;
                $(
                    if self.$field.reset() {
                        cleared += 1;
                    }
                )+
                cleared
            }

            /// Wire names of the properties currently holding a value.
            #[must_use]
            pub fn configured(&self) -> Vec<&'static str> {
                let mut names = Vec::new();
                $(
                    if self.$field.value().is_some() {
                        names.push($wire);
                    }
                )+
                names
            }
        }
    };
}

tuning_properties! {
    /// Whether a spare rebuild starts on predictive drive failure.
    predictive_spare_rebuild: String => "PredictiveSpareRebuild",
    /// Priority of background surface scans.
    surface_scan_analysis_priority: String => "SurfaceScanAnalysisPriority",
    /// Flexible latency scheduler mode.
    flexible_latency_scheduler_setting: String => "FlexibleLatencySchedulerSetting",
    /// Degraded-mode performance optimisation.
    degraded_performance_optimization: String => "DegradedPerformanceOptimization",
    /// Number of surface scans that may run in parallel.
    current_parallel_surface_scan_count: u32 => "CurrentParallelSurfaceScanCount",
    /// Idle delay before a surface scan starts.
    surface_scan_analysis_delay_seconds: u32 => "SurfaceScanAnalysisDelaySeconds",
    /// Idle delay before monitor and performance analysis starts.
    monitor_and_performance_analysis_delay_seconds: u32 => "MonitorAndPerformanceAnalysisDelaySeconds",
    /// Action taken on parity inconsistencies.
    inconsistency_repair_policy: String => "InconsistencyRepairPolicy",
    /// Physical drive write cache policy.
    drive_write_cache: String => "DriveWriteCache",
    /// Priority of array expansion.
    expand_priority: String => "ExpandPriority",
    /// Encryption licence acknowledgement.
    encryption_eula: String => "EncryptionEULA",
    /// Whether write cache is used without a battery.
    no_battery_write_cache: String => "NoBatteryWriteCache",
    /// Share of controller cache dedicated to reads.
    read_cache_percent: u32 => "ReadCachePercent",
    /// Writes above this size bypass the cache.
    write_cache_bypass_threshold_kib: u32 => "WriteCacheBypassThresholdKiB",
    /// Priority of rebuilds.
    rebuild_priority: String => "RebuildPriority",
    /// Controller queue depth.
    queue_depth: String => "QueueDepth",
    /// Elevator sort for write ordering.
    elevator_sort: String => "ElevatorSort",
}
