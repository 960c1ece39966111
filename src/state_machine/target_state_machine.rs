use super::{
    errors::{StateMachineError, StateMachineResult},
    events::TargetEvent,
    states::TargetStage,
};

/// Pure transition table for the per-target assessment lifecycle
///
/// The machine holds no I/O and no shared state; the mission actor owns the
/// current stage and applies transitions through it, which keeps replaying a
/// recorded event log deterministic.
pub struct TargetStateMachine;

impl TargetStateMachine {
    /// Determine the target stage reached from `current` on `event`
    ///
    /// `AnalysisComplete` with zero findings routes directly to `Abandoned`:
    /// there is no exploitable surface, so no exploit stage is entered.
    pub fn determine_target_stage(
        current: TargetStage,
        event: &TargetEvent,
    ) -> StateMachineResult<TargetStage> {
        if current.is_terminal() {
            return Err(StateMachineError::TerminalStage {
                stage: current.to_string(),
            });
        }

        let target = match (current, event) {
            (TargetStage::Discovered, TargetEvent::ScanComplete) => TargetStage::Scanned,

            (TargetStage::Scanned, TargetEvent::AnalysisComplete { findings: 0 }) => {
                TargetStage::Abandoned
            }
            (TargetStage::Scanned, TargetEvent::AnalysisComplete { .. }) => TargetStage::Analyzed,

            (TargetStage::Analyzed, TargetEvent::ExploitDispatched) => {
                TargetStage::ExploitAttempted
            }

            (TargetStage::ExploitAttempted, TargetEvent::ExploitSucceeded(_)) => {
                TargetStage::Compromised
            }

            (TargetStage::Compromised, TargetEvent::PersistenceEstablished) => {
                TargetStage::Persisted
            }

            // Abandon is legal from any non-terminal stage
            (_, TargetEvent::Abandon(_)) => TargetStage::Abandoned,

            (from, event) => {
                return Err(StateMachineError::InvalidTransition {
                    from: from.to_string(),
                    event: event.event_type().to_string(),
                })
            }
        };

        Ok(target)
    }
}
