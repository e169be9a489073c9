/// Ambient configuration for a [`crate::system::ConstraintSystem`], in the
/// same spirit as the reference workspace's `CircuitConfig`: a plain data
/// struct handed to the constructor once and never mutated afterward. It
/// has no effect on the produced gates, digest, or witness -- it only tunes
/// diagnostics (§4.11).
#[derive(Debug, Clone, Copy)]
pub struct SystemConfig {
    /// Emit a `log::debug!` record for every accepted constraint. Off by
    /// default since a hot loop accepting thousands of constraints would
    /// otherwise flood the log, mirroring how the reference workspace gates
    /// its most granular circuit-building traces behind explicit opt-in.
    pub log_constraint_batches: bool,
    /// Defensively check `next_internal_id` for overflow before
    /// incrementing. Always true in practice; exposed so tests can exercise
    /// the overflow branch without allocating `2^64` internal variables.
    pub check_overflow_on_internal_ids: bool,
}

impl SystemConfig {
    pub fn standard() -> Self {
        SystemConfig {
            log_constraint_batches: false,
            check_overflow_on_internal_ids: true,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::standard()
    }
}
