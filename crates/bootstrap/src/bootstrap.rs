//! The analog walk.

use pluvio_calendar::NoLeapDate;
use pluvio_markov::{
    Candidate, N_STATES, ShiftSignal, TransitionTable, normalize_probs, sample_state,
};
use tracing::{debug, info, trace_span};

use crate::error::BootstrapError;
use crate::mapping::{BootstrapMapping, MappingEntry};
use crate::sample::weighted_index;
use crate::scorer::{AnalogQuery, AnalogScorer};

/// Walks `targets` day by day, choosing one historical analog per day.
///
/// 1. The prior state is the state of the analog chosen for the previous
///    target day (the first day uses the unconditional context).
/// 2. The next state is drawn from the context's empirical next-state
///    distribution, biased by `shift` when given. States with no analogs in
///    the context are masked out.
/// 3. Among analogs of that state, one is drawn with the `scorer`'s weights.
///
/// Replacement is allowed. Identical inputs and RNG state reproduce an
/// identical mapping.
///
/// # Errors
///
/// [`BootstrapError::EmptyTarget`] for no targets,
/// [`BootstrapError::NoAnalog`] when a required context is empty after the
/// window fallback, [`BootstrapError::DegenerateWeights`] when the scorer
/// zeroes every candidate.
#[tracing::instrument(skip_all, fields(n_days = targets.len(), shifted = shift.is_some()))]
pub fn bootstrap_dates(
    targets: &[NoLeapDate],
    table: &TransitionTable,
    shift: Option<&ShiftSignal>,
    scorer: &dyn AnalogScorer,
    rng: &mut impl rand::Rng,
) -> Result<BootstrapMapping, BootstrapError> {
    if targets.is_empty() {
        return Err(BootstrapError::EmptyTarget);
    }

    let mut entries: Vec<MappingEntry> = Vec::with_capacity(targets.len());
    let mut state_counts = [0usize; N_STATES];
    let mut n_masked = 0usize;

    for &target in targets {
        let _day = trace_span!("day", %target).entered();
        let prev = entries.last();
        let ctx = table
            .lookup(target.doy(), prev.map(|e| e.state))
            .map_err(|source| BootstrapError::NoAnalog {
                target: target.to_string(),
                source,
            })?;

        let base = ctx.next_probs();
        let mut probs = match shift {
            Some(signal) => signal.adjust(target, &base),
            None => base,
        };
        let available = ctx.available();
        for (p, ok) in probs.iter_mut().zip(available) {
            if !ok && *p > 0.0 {
                *p = 0.0;
                n_masked += 1;
            }
        }
        normalize_probs(&mut probs, base);
        let state = sample_state(&probs, rng);

        let pool: Vec<&Candidate> = ctx.with_state(state).collect();
        let query = AnalogQuery {
            target,
            prior_precip: prev.map(|e| e.precip),
            radius: ctx.radius(),
            precip_scale: table.precip_scale(),
        };
        let weights = scorer.score(&query, &pool);
        let pick = weighted_index(&weights, rng).ok_or_else(|| {
            BootstrapError::DegenerateWeights {
                target: target.to_string(),
                n_candidates: pool.len(),
            }
        })?;
        let chosen = pool[pick];

        state_counts[state.as_index()] += 1;
        entries.push(MappingEntry {
            target,
            source: chosen.date,
            source_index: chosen.index,
            precip: chosen.precip,
            state: chosen.state,
            radius: ctx.radius(),
        });
    }

    if n_masked > 0 {
        debug!(n_masked, "shifted probability moved to states without analogs");
    }
    info!(
        dry = state_counts[0],
        middle = state_counts[1],
        wet = state_counts[2],
        very_wet = state_counts[3],
        "bootstrap complete"
    );
    Ok(BootstrapMapping::from_entries(entries))
}
