//! Energy accounting for base station, robots and sensor nodes.
//!
//! Instrumentation only: the coverage algorithm never reads these values.
//! Accumulators follow the additive model of the deployment study — baseline
//! power over elapsed time, per-operation radio and processing costs, a
//! linear mobility cost per meter and a quadratic sensing cost per meter of
//! perception range.

use serde::{Deserialize, Serialize};

/// Power and cost coefficients for one node class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyParams {
    /// Baseline draw in watts.
    pub baseline_power: f64,
    /// Transmit power in watts.
    pub transmit_power: f64,
    /// Receive power in watts.
    pub receive_power: f64,
    /// Processing power in watts.
    pub processing_power: f64,
    /// Seconds on air per transmitted message.
    pub tx_time: f64,
    /// Seconds on air per received message.
    pub rx_time: f64,
    /// Seconds per processing operation.
    pub processing_time: f64,
    /// Joules per meter of robot travel.
    pub mobility_coeff: f64,
    /// Joules per square meter of sensing range.
    pub sensing_coeff: f64,
}

impl EnergyParams {
    /// Coefficients for the base station.
    pub fn base_station() -> Self {
        Self {
            baseline_power: 0.0,
            transmit_power: 0.050,
            receive_power: 0.040,
            processing_power: 0.025,
            tx_time: 0.001,
            rx_time: 0.001,
            processing_time: 0.001,
            mobility_coeff: 0.0,
            sensing_coeff: 0.0,
        }
    }

    /// Coefficients for a mobile robot.
    pub fn robot() -> Self {
        Self {
            baseline_power: 0.030,
            transmit_power: 0.040,
            receive_power: 0.035,
            processing_power: 0.025,
            tx_time: 0.001,
            rx_time: 0.001,
            processing_time: 0.001,
            mobility_coeff: 0.0005,
            sensing_coeff: 0.0,
        }
    }

    /// Coefficients for a sensor node.
    pub fn sensor() -> Self {
        Self {
            baseline_power: 0.020,
            transmit_power: 0.030,
            receive_power: 0.025,
            processing_power: 0.015,
            tx_time: 0.001,
            rx_time: 0.001,
            processing_time: 0.001,
            mobility_coeff: 0.0,
            sensing_coeff: 0.0005,
        }
    }
}

/// Per-node energy accumulator.
#[derive(Debug, Clone, Serialize)]
pub struct EnergyMeter {
    params: EnergyParams,
    baseline: f64,
    radio: f64,
    processing: f64,
    mobility: f64,
    sensing: f64,
    tx_ops: u32,
    rx_ops: u32,
    moves: u32,
}

/// Snapshot of a meter's accumulators, in joules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBreakdown {
    pub baseline: f64,
    pub radio: f64,
    pub processing: f64,
    pub mobility: f64,
    pub sensing: f64,
    pub total: f64,
}

impl EnergyMeter {
    pub fn new(params: EnergyParams) -> Self {
        Self {
            params,
            baseline: 0.0,
            radio: 0.0,
            processing: 0.0,
            mobility: 0.0,
            sensing: 0.0,
            tx_ops: 0,
            rx_ops: 0,
            moves: 0,
        }
    }

    /// Account one transmitted message.
    pub fn record_tx(&mut self) {
        self.tx_ops += 1;
        self.radio += self.params.transmit_power * self.params.tx_time;
    }

    /// Account one received message.
    pub fn record_rx(&mut self) {
        self.rx_ops += 1;
        self.radio += self.params.receive_power * self.params.rx_time;
    }

    /// Account one processing operation.
    pub fn record_processing(&mut self) {
        self.processing += self.params.processing_power * self.params.processing_time;
    }

    /// Account `distance` meters of travel as a single move.
    pub fn record_travel(&mut self, distance: f64) {
        self.moves += 1;
        self.mobility += self.params.mobility_coeff * distance;
    }

    /// Account a sensing activation for the given perception range.
    pub fn record_sensing(&mut self, range: f64) {
        self.sensing += self.params.sensing_coeff * range * range;
    }

    /// Fold elapsed wall time into the baseline accumulator.
    pub fn settle(&mut self, elapsed_secs: f64) {
        if elapsed_secs > 0.0 {
            self.baseline += self.params.baseline_power * elapsed_secs;
        }
    }

    pub fn tx_ops(&self) -> u32 {
        self.tx_ops
    }

    pub fn rx_ops(&self) -> u32 {
        self.rx_ops
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn breakdown(&self) -> EnergyBreakdown {
        EnergyBreakdown {
            baseline: self.baseline,
            radio: self.radio,
            processing: self.processing,
            mobility: self.mobility,
            sensing: self.sensing,
            total: self.baseline
                + self.radio
                + self.processing
                + self.mobility
                + self.sensing,
        }
    }
}

impl Default for EnergyMeter {
    fn default() -> Self {
        Self::new(EnergyParams::robot())
    }
}
