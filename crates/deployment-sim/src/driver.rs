//! Report driver actor for receiving DeploymentComplete from the base station.
//!
//! This simple actor bridges the kernel's actor-based coordination with the
//! simulation harness by forwarding the final coverage summary to an mpsc
//! channel.

use acton_reactive::prelude::*;
use tokio::sync::mpsc;

use coverage_kernel::deployment::CoverageSummary;
use coverage_kernel::messages::DeploymentComplete;

/// State for the report driver actor.
#[derive(Default, Clone)]
pub struct ReportDriverState {
    /// Channel sender for forwarding the final summary
    pub tx: Option<mpsc::Sender<CoverageSummary>>,
}

impl std::fmt::Debug for ReportDriverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportDriverState")
            .field("has_tx", &self.tx.is_some())
            .finish()
    }
}

/// Actor that receives DeploymentComplete and forwards it to a channel.
///
/// The harness creates this actor and registers it with the base station via
/// `RegisterReportDriver`. When every location area is processed, the base
/// station sends `DeploymentComplete` here, which forwards the summary to the
/// mpsc channel the harness is waiting on.
pub struct ReportDriver {
    /// Channel sender for forwarding the final summary
    tx: mpsc::Sender<CoverageSummary>,
}

impl ReportDriver {
    /// Create a new report driver with the given channel sender.
    pub fn new(tx: mpsc::Sender<CoverageSummary>) -> Self {
        Self { tx }
    }

    /// Spawn the actor in the runtime.
    ///
    /// Returns the actor handle which should be sent to the base station
    /// via `RegisterReportDriver`.
    pub async fn spawn(self, runtime: &mut ActorRuntime) -> ActorHandle {
        let mut actor =
            runtime.new_actor_with_name::<ReportDriverState>("ReportDriver".to_string());

        actor.model.tx = Some(self.tx);

        actor.act_on::<DeploymentComplete>(|actor, context| {
            let summary = context.message().summary.clone();
            let tx = actor.model.tx.clone();

            Reply::pending(async move {
                if let Some(tx) = tx {
                    // Ignore send errors - receiver may have been dropped
                    let _ = tx.send(summary).await;
                }
            })
        });

        actor.start().await
    }
}
