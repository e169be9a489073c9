//! A dedicated test binary for S7: installing a global `log::Log` collides
//! with any other test that also logs, so this scenario gets its own
//! process rather than sharing `tests/integration.rs`.

use anyhow::Result;
use log::{Level, Log, Metadata, Record};
use plonk_cs::{Constraint, ConstraintSystem, Expr, SystemConfig};
use plonk_cs_field::{Field, GoldilocksField as Fg};
use std::sync::Mutex;

struct CapturingLogger {
    records: Mutex<Vec<Level>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with("plonk_cs") {
            self.records.lock().unwrap().push(record.level());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger { records: Mutex::new(Vec::new()) };

/// S7 -- with `log_constraint_batches` on, accepting 5 constraints emits 5
/// debug records and `finalize_and_emit` emits exactly one info record.
#[test]
fn s7_logging_reflects_config() -> Result<()> {
    log::set_logger(&LOGGER).expect("logger already installed");
    log::set_max_level(log::LevelFilter::Debug);

    let mut config = SystemConfig::standard();
    config.log_constraint_batches = true;
    let mut sys = ConstraintSystem::<Fg>::with_config(config);
    for i in 0..5u32 {
        let n = Expr::<Fg>::constant(Fg::from_canonical_u64(i as u64));
        sys.add_constraint(Constraint::Equal(n.clone(), n))?;
    }

    sys.set_public_input_size(0);
    let mut sink = plonk_cs::VecSink::new();
    sys.finalize_and_emit(&mut sink);

    let records = LOGGER.records.lock().unwrap();
    let debug_count = records.iter().filter(|l| **l == Level::Debug).count();
    let info_count = records.iter().filter(|l| **l == Level::Info).count();
    assert_eq!(debug_count, 5);
    assert_eq!(info_count, 1);
    Ok(())
}
