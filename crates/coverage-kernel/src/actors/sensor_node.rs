//! SensorNode: one randomly deployed sensor as an actor.
//!
//! Uses the broker pub/sub pattern:
//! - Subscribes to `DiscoveryRequest` broadcasts and answers when in earshot
//! - Subscribes to `RedeployCommand` and applies orders addressed to its id

use acton_reactive::prelude::*;
use tracing::{debug, info};

use crate::energy::{EnergyMeter, EnergyParams};
use crate::messages::{DiscoveryReply, DiscoveryRequest, RedeployCommand};
use crate::registry::{SensorId, SensorStatus};
use crate::spatial::Point;

/// Actor state for a sensor node.
#[derive(Debug, Clone)]
pub struct SensorNodeState {
    sensor_id: SensorId,
    position: Point,
    status: SensorStatus,
    comm_range: f64,
    sensor_range: f64,
    energy: EnergyMeter,
}

impl Default for SensorNodeState {
    fn default() -> Self {
        Self {
            sensor_id: 0,
            position: Point::default(),
            status: SensorStatus::Idle,
            comm_range: 0.0,
            sensor_range: 0.0,
            energy: EnergyMeter::new(EnergyParams::sensor()),
        }
    }
}

/// A sensor node scattered over the disaster area.
///
/// Replies to discovery probes from robots within communication range and
/// repositions itself when a relocation order addressed to it arrives.
/// Stock-deployment orders carry no sensor id and are ignored here; the
/// robot's carried inventory fulfills those.
pub struct SensorNode {
    pub sensor_id: SensorId,
    pub position: Point,
    pub status: SensorStatus,
    pub comm_range: f64,
    pub sensor_range: f64,
    pub energy_params: EnergyParams,
}

impl SensorNode {
    /// Spawn this sensor node in the given runtime.
    pub async fn spawn(self, runtime: &mut ActorRuntime) -> ActorHandle {
        let mut actor = runtime
            .new_actor_with_name::<SensorNodeState>(format!("Sensor:{}", self.sensor_id));

        actor.model.sensor_id = self.sensor_id;
        actor.model.position = self.position;
        actor.model.status = self.status;
        actor.model.comm_range = self.comm_range;
        actor.model.sensor_range = self.sensor_range;
        actor.model.energy = EnergyMeter::new(self.energy_params);

        // Subscribe to broadcast traffic BEFORE starting
        actor.handle().subscribe::<DiscoveryRequest>().await;
        actor.handle().subscribe::<RedeployCommand>().await;

        // Answer discovery probes from robots in earshot
        actor.mutate_on::<DiscoveryRequest>(|actor, context| {
            let msg = context.message().clone();
            actor.model.energy.record_rx();

            let distance = actor.model.position.distance_to(msg.position);
            if distance > actor.model.comm_range {
                // Out of earshot: the probe never reached this node.
                return Reply::ready();
            }

            actor.model.energy.record_tx();
            let reply = DiscoveryReply {
                correlation_id: msg.correlation_id,
                robot_id: msg.robot_id,
                sensor_id: actor.model.sensor_id,
                position: actor.model.position,
                status: actor.model.status,
            };
            debug!(
                sensor = actor.model.sensor_id,
                robot = msg.robot_id,
                distance = format!("{distance:.1}"),
                "Answering discovery probe"
            );

            let broker = actor.broker().clone();
            Reply::pending(async move {
                broker.broadcast(reply).await;
            })
        });

        // Apply relocation orders addressed to this sensor
        actor.mutate_on::<RedeployCommand>(|actor, context| {
            let msg = context.message();
            if msg.sensor_id != Some(actor.model.sensor_id) {
                return Reply::ready();
            }

            let from = actor.model.position;
            actor.model.position = msg.target;
            actor.model.status = SensorStatus::Active;
            actor.model.energy.record_processing();
            let range = actor.model.sensor_range;
            actor.model.energy.record_sensing(range);

            info!(
                sensor = actor.model.sensor_id,
                from = %from,
                to = %msg.target,
                "Sensor relocated and activated"
            );
            Reply::ready()
        });

        actor.start().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sensor_node_spawns_and_shuts_down() {
        let mut runtime = ActonApp::launch_async().await;
        let node = SensorNode {
            sensor_id: 7,
            position: Point::new(120.0, 80.0),
            status: SensorStatus::Idle,
            comm_range: 100.0,
            sensor_range: 50.0,
            energy_params: EnergyParams::sensor(),
        };
        let _handle = node.spawn(&mut runtime).await;
        let _ = runtime.shutdown_all().await;
    }
}
