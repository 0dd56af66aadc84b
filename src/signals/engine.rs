//! Signal pipeline: indicators, regime, strategy, structure, targets, filter.
//!
//! [`SignalEngine::evaluate`] is synchronous and side-effect free apart from
//! logging. The decision agent sits after it, in the runtime.

use crate::error::SignalError;
use crate::indicators::calculate_snapshot;
use crate::models::indicators::{Candle, IndicatorSnapshot};
use crate::models::regime::Regime;
use crate::models::signal::{CandidateSignal, Direction};
use crate::models::structure::StructureReport;
use crate::regime::{classify_regime_with, RegimeThresholds};
use crate::signals::scoring::{check_thresholds, score_candidate, Rejection, ScoringConfig};
use crate::signals::targets::{calculate_targets, TargetConfig};
use crate::strategies::{StrategySelection, StrategySet, StrategyWeights};
use crate::structure::{analyze_structure, StructureConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the pipeline can be tuned with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub regime: RegimeThresholds,
    pub weights: StrategyWeights,
    pub structure: StructureConfig,
    pub targets: TargetConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Candidate(CandidateSignal),
    Rejected(Rejection),
}

/// Full trace of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub symbol: String,
    pub snapshot: IndicatorSnapshot,
    pub regime: Regime,
    pub selection: StrategySelection,
    pub structure: StructureReport,
    pub outcome: EvaluationOutcome,
}

impl Evaluation {
    pub fn candidate(&self) -> Option<&CandidateSignal> {
        match &self.outcome {
            EvaluationOutcome::Candidate(candidate) => Some(candidate),
            EvaluationOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.outcome {
            EvaluationOutcome::Candidate(_) => None,
            EvaluationOutcome::Rejected(rejection) => Some(rejection),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    config: EngineConfig,
    strategies: StrategySet,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        let strategies = StrategySet::new(config.weights.clone());
        Self { config, strategies }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate the latest candle of `candles`
    ///
    /// Fails only with [`SignalError::InsufficientData`]. Threshold failures
    /// come back as [`EvaluationOutcome::Rejected`].
    pub fn evaluate(
        &self,
        symbol: &str,
        candles: &[Candle],
        orderbook_imbalance: Option<f64>,
    ) -> Result<Evaluation, SignalError> {
        let snapshot = calculate_snapshot(candles)?;
        let regime = classify_regime_with(&snapshot, &self.config.regime);
        let selection = self.strategies.select(&regime, &snapshot);
        let structure = analyze_structure(candles, snapshot.close, &self.config.structure);

        debug!(
            symbol = %symbol,
            regime = %regime,
            strategy = %selection.strategy,
            long = selection.signal.long_score,
            short = selection.signal.short_score,
            "Evaluated {} under {} regime",
            symbol,
            regime
        );

        let outcome = match selection.direction() {
            None => EvaluationOutcome::Rejected(Rejection::NoDirection),
            Some(direction) => self.build_candidate(
                symbol,
                direction,
                &snapshot,
                &regime,
                &selection,
                &structure,
                orderbook_imbalance,
            ),
        };

        if let EvaluationOutcome::Rejected(rejection) = &outcome {
            debug!(symbol = %symbol, reason = rejection.label(), "Candidate rejected: {}", rejection);
        }

        Ok(Evaluation {
            symbol: symbol.to_string(),
            snapshot,
            regime,
            selection,
            structure,
            outcome,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_candidate(
        &self,
        symbol: &str,
        direction: Direction,
        snapshot: &IndicatorSnapshot,
        regime: &Regime,
        selection: &StrategySelection,
        structure: &StructureReport,
        orderbook_imbalance: Option<f64>,
    ) -> EvaluationOutcome {
        let breakdown = score_candidate(
            direction,
            selection.score_for(direction),
            regime,
            structure,
            orderbook_imbalance,
            &self.config.scoring,
        );
        let score = breakdown.total();

        let plan = calculate_targets(
            direction,
            snapshot.close,
            snapshot.atr,
            structure,
            &self.config.targets,
        );

        if let Err(rejection) = check_thresholds(score, plan.risk_reward, &self.config.scoring) {
            return EvaluationOutcome::Rejected(rejection);
        }

        let mut reasons = selection.signal.reasons.clone();
        reasons.extend(breakdown.reasons().map(str::to_string));

        EvaluationOutcome::Candidate(CandidateSignal {
            symbol: symbol.to_string(),
            timestamp: snapshot.timestamp,
            direction,
            strategy: selection.strategy,
            regime: *regime,
            entry_price: snapshot.close,
            stop_loss: plan.stop_loss,
            take_profit: plan.take_profit,
            risk_reward: plan.risk_reward,
            score,
            atr: snapshot.atr,
            reasons,
            targets: plan,
        })
    }

    /// Same candidate pointed the other way, with stop and target recomputed
    pub fn retarget(
        &self,
        candidate: &CandidateSignal,
        direction: Direction,
        structure: &StructureReport,
    ) -> CandidateSignal {
        if candidate.direction == direction {
            return candidate.clone();
        }

        let plan = calculate_targets(
            direction,
            candidate.entry_price,
            candidate.atr,
            structure,
            &self.config.targets,
        );

        let mut reasons = candidate.reasons.clone();
        reasons.push(format!(
            "Direction overridden by decision agent ({} -> {})",
            candidate.direction, direction
        ));

        CandidateSignal {
            direction,
            stop_loss: plan.stop_loss,
            take_profit: plan.take_profit,
            risk_reward: plan.risk_reward,
            reasons,
            targets: plan,
            ..candidate.clone()
        }
    }
}
